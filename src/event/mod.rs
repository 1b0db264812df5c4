//! Event system: notifications, listener handles, registrations, dispatch.

pub mod handler;
pub mod listener;
pub mod message;
pub mod registry;

pub use handler::{bubble_path, dispatch};
pub use listener::{Listener, ListenerOptions};
pub use message::{Event, EventInit, Phase};
pub use registry::{ListenerRegistry, Registration};
