//! Component base: lifecycle, state/attribute synchronization, delegated
//! listeners, the pre-mount command queue and scoped style variables.
//!
//! - [`Component`] drives one element.
//! - [`CustomElement`] is what a widget implements.
//! - [`AttributeHandlers`] maps `on<Pascal>Changed` names to handlers.

pub mod base;
pub mod config;
pub mod element;
pub mod emitter;
pub mod error;
pub mod id;
pub mod lifecycle;
pub mod state;

pub use base::{AttributeCallback, Command, Component};
pub use config::ComponentConfig;
pub use element::{AttributeHandler, AttributeHandlers, CustomElement, RenderContext};
pub use emitter::Emitter;
pub use error::{ComponentError, HandlerError, HandlerResult};
pub use id::InstanceId;
pub use lifecycle::{Lifecycle, LifecycleEvent, LifecyclePhase};
pub use state::{AttributeSync, State};
