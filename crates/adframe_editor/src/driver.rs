// SPDX-License-Identifier: MIT OR Apache-2.0
//! Background playback driver.
//!
//! [`ThreadTicker`] ticks a shared [`EditorSession`] from its own thread
//! until playback stops, [`ThreadTicker::stop`] is called, or the ticker is
//! dropped. The thread holds the session lock only for the tick itself.

use crate::session::EditorSession;
use adframe_timeline::{InstantTicker, TickLease};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Session shared between the host and the driver thread
pub type SharedSession = Arc<Mutex<EditorSession>>;

/// Drives playback from a background thread
#[derive(Debug)]
pub struct ThreadTicker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ThreadTicker {
    /// Spawn a driver ticking every `interval`.
    ///
    /// Start playback on the session first; the thread exits as soon as it
    /// finds the scheduler stopped.
    pub fn spawn(session: SharedSession, interval: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = std::thread::spawn(move || {
            let mut source = InstantTicker::new();
            let mut lease = TickLease::acquire(&mut source);
            tracing::debug!(?interval, "tick driver started");

            while !flag.load(Ordering::Acquire) {
                std::thread::sleep(interval);
                if !session.lock().pump(&mut *lease) {
                    break;
                }
            }
            tracing::debug!("tick driver exited");
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Spawn a driver at the session's configured tick interval
    pub fn from_config(session: SharedSession) -> Self {
        let interval = session.lock().config().tick_interval();
        Self::spawn(session, interval)
    }

    /// Whether the driver thread has exited
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop ticking and wait for the thread. Playback state is left as is.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("tick driver thread panicked");
            }
        }
    }
}

impl Drop for ThreadTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
