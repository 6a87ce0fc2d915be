// SPDX-License-Identifier: MIT OR Apache-2.0
//! Entity graph errors.

use crate::frame_id::GifFrameId;
use crate::ids::{AdSizeId, LayerId};

/// Errors raised by the project store.
///
/// Propagation engines never return these for missing siblings; they skip
/// the sibling and record it in their report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinkError {
    /// Malformed GIF frame identifier
    #[error("Invalid GIF frame id: {0:?}")]
    InvalidFrameId(String),

    /// Layer not found
    #[error("Layer not found: {0}")]
    UnknownLayer(LayerId),

    /// GIF frame not found
    #[error("GIF frame not found: {0}")]
    UnknownFrame(GifFrameId),

    /// Ad size not found
    #[error("Ad size not found: {0}")]
    UnknownAdSize(AdSizeId),

    /// Layer ID already used in the project
    #[error("Duplicate layer id: {0}")]
    DuplicateLayer(LayerId),

    /// Ad size ID already used in the project
    #[error("Duplicate ad size id: {0}")]
    DuplicateAdSize(AdSizeId),

    /// Animation index out of range
    #[error("Layer {layer} has no animation #{index}")]
    AnimationIndex {
        /// Layer that was addressed
        layer: LayerId,
        /// Requested index
        index: usize,
    },
}

impl LinkError {
    /// Whether this is a missing-entity condition callers may treat as a no-op
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UnknownLayer(_)
                | Self::UnknownFrame(_)
                | Self::UnknownAdSize(_)
                | Self::AnimationIndex { .. }
        )
    }
}
