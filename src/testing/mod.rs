//! Headless testing framework: Pilot, snapshot helpers.
//!
//! Use the [`Pilot`] to mount components into an in-memory document and
//! simulate clicks. Use [`shadow_markup`] and related helpers to capture
//! subtrees as text for snapshot-style assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::{EventLog, Pilot, Recorded};
pub use snapshot::{body_markup, content_markup, shadow_markup, vars_text};
