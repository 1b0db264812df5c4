use std::any::Any;

use crate::dom::node::NodeId;
use crate::event::{dispatch, Event, EventInit};
use crate::host::SharedHost;

/// A cloneable handle that dispatches notifications from a component element.
///
/// Listener closures cannot borrow the component, so they capture an emitter
/// instead.
#[derive(Clone)]
pub struct Emitter {
    host: SharedHost,
    element: NodeId,
}

impl Emitter {
    pub(crate) fn new(host: SharedHost, element: NodeId) -> Self {
        Self { host, element }
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    /// Current value of an attribute on the component element.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.host.borrow().attribute(self.element, name)
    }

    /// Dispatch a bubbling, composed, non-cancelable notification.
    pub fn emit(&self, name: &str, detail: impl Any) -> bool {
        self.emit_with(name, detail, EventInit::notification())
    }

    /// Dispatch with explicit flags. Returns `false` if a listener canceled it.
    pub fn emit_with(&self, name: &str, detail: impl Any, init: EventInit) -> bool {
        let mut event = Event::with_init(name, init).detail(detail);
        dispatch(&self.host, self.element, &mut event)
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("element", &self.element)
            .finish()
    }
}
