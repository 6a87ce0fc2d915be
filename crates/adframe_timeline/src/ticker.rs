// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tick sources for the playback scheduler.
//!
//! The scheduler only needs monotonic deltas. [`ManualTicker`] is a virtual
//! clock driven by the caller, [`InstantTicker`] reads `std::time::Instant`.
//! [`TickLease`] starts a source and guarantees it is stopped when the lease
//! goes out of scope, whatever path the caller leaves by.

use crate::playback::PlaybackScheduler;
use std::fmt::Debug;
use std::ops::{Deref, DerefMut};
use std::time::Instant;

/// A source of monotonic wall-clock deltas
pub trait TickSource {
    /// Begin producing ticks
    fn start(&mut self);

    /// Stop producing ticks
    fn stop(&mut self);

    /// Whether ticks are being produced
    fn is_running(&self) -> bool;

    /// Seconds since the previous poll, or `None` while stopped
    fn poll(&mut self) -> Option<f32>;
}

/// Virtual clock advanced by hand
#[derive(Debug, Default)]
pub struct ManualTicker {
    running: bool,
    pending: f32,
}

impl ManualTicker {
    /// Create a stopped ticker
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `dt` seconds pass. Ignored while stopped.
    pub fn advance(&mut self, dt: f32) {
        if self.running {
            self.pending += dt.max(0.0);
        }
    }
}

impl TickSource for ManualTicker {
    fn start(&mut self) {
        self.running = true;
        self.pending = 0.0;
    }

    fn stop(&mut self) {
        self.running = false;
        self.pending = 0.0;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn poll(&mut self) -> Option<f32> {
        if !self.running {
            return None;
        }
        Some(std::mem::take(&mut self.pending))
    }
}

/// Real-time ticker backed by `Instant`
#[derive(Debug, Default)]
pub struct InstantTicker {
    last: Option<Instant>,
}

impl InstantTicker {
    /// Create a stopped ticker
    pub fn new() -> Self {
        Self::default()
    }
}

impl TickSource for InstantTicker {
    fn start(&mut self) {
        self.last = Some(Instant::now());
    }

    fn stop(&mut self) {
        self.last = None;
    }

    fn is_running(&self) -> bool {
        self.last.is_some()
    }

    fn poll(&mut self) -> Option<f32> {
        let last = self.last?;
        let now = Instant::now();
        self.last = Some(now);
        Some(now.saturating_duration_since(last).as_secs_f32())
    }
}

/// A started tick source that is stopped on drop
#[derive(Debug)]
pub struct TickLease<'a, S: TickSource + ?Sized> {
    source: &'a mut S,
}

impl<'a, S: TickSource + ?Sized> TickLease<'a, S> {
    /// Start `source` for the lifetime of the lease
    pub fn acquire(source: &'a mut S) -> Self {
        source.start();
        Self { source }
    }
}

impl<S: TickSource + ?Sized> Deref for TickLease<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.source
    }
}

impl<S: TickSource + ?Sized> DerefMut for TickLease<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.source
    }
}

impl<S: TickSource + ?Sized> Drop for TickLease<'_, S> {
    fn drop(&mut self) {
        if self.source.is_running() {
            self.source.stop();
            tracing::trace!("tick source released");
        }
    }
}

/// Feed one tick from `source` into `scheduler`.
///
/// Stops the source when the scheduler stops. Returns whether the loop
/// should be scheduled again.
pub fn pump<K, S>(scheduler: &mut PlaybackScheduler<K>, source: &mut S) -> bool
where
    K: Clone + PartialEq + Debug,
    S: TickSource + ?Sized,
{
    if !scheduler.is_playing() {
        source.stop();
        return false;
    }
    let Some(dt) = source.poll() else {
        return false;
    };

    scheduler.on_tick(dt);
    if !scheduler.is_playing() {
        source.stop();
        return false;
    }
    true
}
