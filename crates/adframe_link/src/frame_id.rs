// SPDX-License-Identifier: MIT OR Apache-2.0
//! GIF frame identifiers.
//!
//! Internally a frame is addressed by `(ad size, frame number)`. The string
//! form `gif-frame-<adSizeId>-<frameNumber>` exists only at the wire and
//! display boundary, and this module holds the single encode/decode pair.
//!
//! Because ad size ids usually contain a hyphen themselves (`frame-2`), the
//! parser takes the frame number from the last token and rejoins everything
//! between the `gif-frame` prefix and that token. The legacy 4-token form
//! `gif-frame-<n>-<n>` carries a bare ad size number and is normalized to
//! `frame-<n>`.

use crate::error::LinkError;
use crate::ids::AdSizeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PREFIX: [&str; 2] = ["gif", "frame"];
const AD_SIZE_TOKEN: &str = "frame";

/// Structured GIF frame identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct GifFrameId {
    /// Owning ad size
    pub ad_size: AdSizeId,
    /// Position in the sequence, starting at 1
    pub frame_number: u32,
}

impl GifFrameId {
    /// Create a frame ID
    pub fn new(ad_size: AdSizeId, frame_number: u32) -> Self {
        Self {
            ad_size,
            frame_number,
        }
    }

    /// The frame with the same number in another ad size
    pub fn sibling(&self, ad_size: &AdSizeId) -> Self {
        Self::new(ad_size.clone(), self.frame_number)
    }

    /// Parse the wire form
    pub fn parse(s: &str) -> Result<Self, LinkError> {
        s.parse()
    }
}

impl fmt::Display for GifFrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gif-frame-{}-{}", self.ad_size, self.frame_number)
    }
}

impl FromStr for GifFrameId {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LinkError::InvalidFrameId(s.to_string());

        let tokens: Vec<&str> = s.split('-').collect();
        if tokens.len() < 4 || tokens[..2] != PREFIX || tokens.iter().any(|t| t.is_empty()) {
            return Err(invalid());
        }

        let (number, ad_tokens) = tokens[2..].split_last().ok_or_else(invalid)?;
        let frame_number: u32 = number.parse().map_err(|_| invalid())?;

        let ad_size = match ad_tokens {
            // `frame` on its own names no ad size.
            [only] if *only == AD_SIZE_TOKEN => return Err(invalid()),
            [n] if n.parse::<u32>().is_ok() => format!("{AD_SIZE_TOKEN}-{n}"),
            _ => ad_tokens.join("-"),
        };

        Ok(Self::new(AdSizeId(ad_size), frame_number))
    }
}

impl From<GifFrameId> for String {
    fn from(id: GifFrameId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for GifFrameId {
    type Error = LinkError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
