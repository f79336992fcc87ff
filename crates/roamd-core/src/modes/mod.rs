//! Run-state control for the scan-only operating mode.
//!
//! A two-state transition system (Idle, Started) driven by commands from a
//! FIFO queue. Commands are processed one at a time on a single logical
//! worker; handlers never block.

pub mod scan;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeState {
    Idle,
    Started,
}

impl fmt::Display for ModeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeState::Idle => write!(f, "Idle"),
            ModeState::Started => write!(f, "Started"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeCommand {
    Start,
    Stop,
    /// Status report from the underlying interface. Unhandled in both
    /// states; routed to the observer's fallback.
    InterfaceStatusChanged { up: bool },
}

/// Hooks for watching state changes. Entering and exiting states are
/// observable side effects; unhandled commands land here instead of being
/// silently dropped.
pub trait ModeObserver: Send + Sync {
    fn on_enter(&self, _state: ModeState) {}
    fn on_exit(&self, _state: ModeState) {}
    fn on_unhandled(&self, _state: ModeState, _command: &ModeCommand) {}
}

/// Observer that keeps the default no-op hooks.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl ModeObserver for NoopObserver {}

/// Re-export key types
pub use scan::{ModeManager, ScanModeManager};
