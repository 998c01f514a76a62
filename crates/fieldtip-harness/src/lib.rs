#![forbid(unsafe_code)]

//! Deterministic test harness for fieldtip.
//!
//! [`SimPage`] is a complete in-memory [`fieldtip::HostPage`]: a small
//! element tree with rectangles, plus recording of every mutation the
//! component performs (icons, panel, styles, navigations, frame
//! requests). [`Clock`] steps a `web_time::Instant` by hand so tests
//! control exactly when timers fire.
//!
//! Nothing here sleeps and nothing observes a real clock; a test drives
//! the component by interleaving events, `tick`, and `on_frame` itself.

mod clock;
mod page;

pub use clock::{Clock, ms};
pub use page::{SimIcon, SimKind, SimPage, SimPanel};
