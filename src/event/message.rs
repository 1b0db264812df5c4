//! Notification objects: [`Event`] and its [`EventInit`] flags.
//!
//! The payload (`detail`) is any `'static` value and is read back by
//! downcasting, the same way message envelopes are inspected elsewhere in the
//! crate.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::dom::node::NodeId;

/// Flags fixed at event construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventInit {
    /// Propagate from the target up through its ancestors.
    pub bubbles: bool,
    /// Cross shadow-root boundaries into the host's tree.
    pub composed: bool,
    /// `prevent_default` has an effect.
    pub cancelable: bool,
}

impl EventInit {
    /// Bubbling, boundary-crossing, non-cancelable. The defaults for component notifications.
    pub fn notification() -> Self {
        Self {
            bubbles: true,
            composed: true,
            cancelable: false,
        }
    }

    pub fn bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    pub fn composed(mut self, composed: bool) -> Self {
        self.composed = composed;
        self
    }

    pub fn cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }
}

/// Dispatch phase an event is currently in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// A named notification with an arbitrary payload.
pub struct Event {
    name: String,
    detail: Option<Rc<dyn Any>>,
    init: EventInit,
    pub(crate) target: Option<NodeId>,
    pub(crate) current_target: Option<NodeId>,
    pub(crate) phase: Phase,
    pub(crate) in_passive_listener: bool,
    default_prevented: bool,
    pub(crate) propagation_stopped: bool,
    pub(crate) immediate_propagation_stopped: bool,
}

impl Event {
    /// A non-bubbling, non-composed, non-cancelable event without payload.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_init(name, EventInit::default())
    }

    pub fn with_init(name: impl Into<String>, init: EventInit) -> Self {
        Self {
            name: name.into(),
            detail: None,
            init,
            target: None,
            current_target: None,
            phase: Phase::None,
            in_passive_listener: false,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    /// Attach a payload (builder).
    pub fn detail(mut self, detail: impl Any) -> Self {
        self.detail = Some(Rc::new(detail));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn init(&self) -> EventInit {
        self.init
    }

    pub fn bubbles(&self) -> bool {
        self.init.bubbles
    }

    pub fn composed(&self) -> bool {
        self.init.composed
    }

    pub fn cancelable(&self) -> bool {
        self.init.cancelable
    }

    /// Attempt to downcast the payload to a concrete type.
    pub fn detail_ref<T: Any>(&self) -> Option<&T> {
        self.detail.as_deref().and_then(|d| d.downcast_ref::<T>())
    }

    pub fn has_detail(&self) -> bool {
        self.detail.is_some()
    }

    /// The target as seen from the node currently being visited.
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Cancel the default action. Ignored unless cancelable, and ignored inside
    /// passive listeners.
    pub fn prevent_default(&mut self) {
        if self.init.cancelable && !self.in_passive_listener {
            self.default_prevented = true;
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stop after the listeners of the current node have run.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop before any further listener runs.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("init", &self.init)
            .field("has_detail", &self.detail.is_some())
            .field("target", &self.target)
            .field("phase", &self.phase)
            .field("default_prevented", &self.default_prevented)
            .finish()
    }
}
