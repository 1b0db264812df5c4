//! # glint-elements
//!
//! Encapsulated, attribute-driven UI components with scoped CSS custom properties.
//!
//! A [`Component`](component::Component) drives one element: it owns an
//! isolated subtree, keeps a local state mirrored onto the element's observed
//! attributes, delegates event listeners into its subtree, defers commands
//! until the first mount, and manages its style variables. Widgets only supply
//! templates and attribute reactions through
//! [`CustomElement`](component::CustomElement).
//!
//! ## Core Systems
//!
//! - **[`case`]**: camelCase ↔ kebab-case conversion for handler and variable names
//! - **[`css`]**: Selector tokenizer and parser, style-rule model and serializer
//! - **[`dom`]**: Slotmap-backed reference document with shadow roots and selector queries
//! - **[`host`]**: The `Host` trait components talk to
//! - **[`event`]**: Notifications, listener handles, registrations, dispatch
//! - **[`vars`]**: Scoped custom-property manager
//! - **[`component`]**: Component base: lifecycle, state, listeners, command queue
//! - **[`widgets`]**: Built-in widgets: GlowButton, Rule, TrafficLight, GlowText
//! - **[`testing`]**: Headless Pilot and snapshot helpers

// Foundation
pub mod case;
pub mod css;

// Host renderer
pub mod dom;
pub mod host;

// Events and styling
pub mod event;
pub mod vars;

// Component system
pub mod component;
pub mod widgets;

// Testing
pub mod testing;

pub use component::{Component, ComponentConfig, CustomElement};
pub use host::{Host, SharedHost};
