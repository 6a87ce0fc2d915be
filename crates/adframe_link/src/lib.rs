// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ad size entity graph for adframe.
//!
//! This crate provides:
//! - The plain data model (ad sizes, layers, animations, GIF frames)
//! - Structured GIF frame ids with a single string encode/decode pair
//! - The [`Project`] store owning all entities
//! - Name-based link groups ([`LinkRegistry`])
//! - Animation propagation across a group ([`AnimationSyncEngine`])
//! - GIF frame visibility mirroring ([`VisibilityOverrideTracker`])
//! - Flat export plans for encoders
//!
//! ## Architecture
//!
//! Every engine borrows the [`Project`] mutably for one call and returns a
//! report of what it did. Missing siblings are reported, not raised; only
//! malformed identifiers and unknown ids at the store API are errors.

pub mod export;
pub mod frame_id;
pub mod ids;
pub mod model;
pub mod project;
pub mod registry;
pub mod sync;
pub mod visibility;

mod error;

pub use error::LinkError;
pub use export::{ExportFrame, ExportKind, ExportLayer, ExportPlan};
pub use frame_id::GifFrameId;
pub use ids::{AdSizeId, GroupId, LayerId};
pub use model::{
    AdSize, Animation, AnimationKind, AnimationMode, Direction, Easing, EffectParams, GifFrame,
    Layer, LayerKind, LayerOverride, LinkInfo, SyncMode,
};
pub use project::Project;
pub use registry::{compute_groups, LinkGroup, LinkRegistry, NameGroup};
pub use sync::{AnimationSyncEngine, SyncReport, SyncTicket};
pub use visibility::{VisibilityOutcome, VisibilityOverrideTracker};
