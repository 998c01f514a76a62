#![forbid(unsafe_code)]

//! Leaf value types for the fieldtip overlay component.
//!
//! This crate holds the pieces with no host dependency at all: rectangle
//! math, canonical input events, the cancelable timer set, configuration
//! snapshots, and the shared error type. Everything here is deterministic
//! and directly unit-testable.

pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod timer;

pub use config::{Config, IconKind, ParamBag, Placement, TriggerMode};
pub use error::{Error, Result};
pub use event::{Event, KeyCode, PointerTarget};
pub use geometry::{Rect, Side};
pub use timer::{TimerKind, Timers};
