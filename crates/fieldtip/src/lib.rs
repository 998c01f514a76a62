#![forbid(unsafe_code)]

//! Anchored info-tip overlay for host form pages.
//!
//! fieldtip renders a small trigger icon next to a form field supplied by
//! an embedding host and, on interaction, shows a floating content panel
//! anchored to that icon, kept fully inside the viewport.
//!
//! The interesting parts are the anchored-overlay subsystem:
//!
//! - [`anchor`] finds a usable anchor element inside an unpredictable,
//!   mutating host page;
//! - [`retry`] drives resolution on an escalating schedule until it
//!   succeeds or degrades to a fallback icon;
//! - [`placement`] picks a side for the panel with deterministic
//!   tie-break, fallback, and clamping behavior;
//! - [`visibility`] owns the debounced show/hide state machine.
//!
//! The embedding page sits behind the [`host::HostPage`] trait; the
//! `fieldtip-harness` crate provides a deterministic in-memory
//! implementation for tests and examples.
//!
//! # Example
//!
//! ```ignore
//! use fieldtip::FieldTip;
//! use fieldtip_core::ParamBag;
//! use web_time::Instant;
//!
//! let params = ParamBag::from_value(serde_json::json!({
//!     "target": "email",
//!     "content": "We only use this to reach you about your order.",
//! }));
//! let mut tip = FieldTip::init(&mut page, &params, || {}, Instant::now());
//! // ... forward events, tick timers, deliver frames ...
//! tip.destroy(&mut page);
//! ```

pub mod anchor;
pub mod component;
pub mod content;
pub mod host;
pub mod placement;
pub mod retry;
pub mod style;
pub mod visibility;

pub use component::{AnchorHandle, FieldTip, Outputs};
pub use host::{FieldQuery, FieldRole, HostPage, IconId, IconSlot, IconSpec, NodeId};
pub use placement::{PlacementInput, Resolution};
pub use retry::{RetrySchedule, RetryState};
pub use visibility::{VisibilityMachine, VisibilityState};

// Re-export the leaf types alongside the component API.
pub use fieldtip_core::{
    Config, Event, IconKind, KeyCode, ParamBag, Placement, PointerTarget, Rect, Side, TriggerMode,
};
