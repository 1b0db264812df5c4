//! Pilot: programmatic interaction with components in a headless document.
//!
//! The `Pilot` owns an in-memory [`Document`], mounts components into its
//! `<body>`, simulates clicks, and records notifications for assertions.

use std::cell::RefCell;
use std::rc::Rc;

use crate::component::{Component, ComponentError, CustomElement};
use crate::dom::node::NodeId;
use crate::dom::Document;
use crate::event::{dispatch, Event, EventInit, Listener, ListenerOptions};
use crate::host::SharedHost;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless document driver for testing.
///
/// # Examples
///
/// ```
/// use glint_elements::testing::Pilot;
/// use glint_elements::widgets::GlowButton;
///
/// let pilot = Pilot::new();
/// let mut button = GlowButton::create(pilot.host()).unwrap();
/// pilot.attach(&mut button);
/// let presses = pilot.record(button.element(), "press");
/// pilot.click_in(&button, ".btn");
/// assert_eq!(presses.count(), 1);
/// ```
pub struct Pilot {
    document: Rc<RefCell<Document>>,
}

impl Pilot {
    pub fn new() -> Self {
        Self {
            document: Rc::new(RefCell::new(Document::new())),
        }
    }

    /// The document as a [`SharedHost`] capability.
    pub fn host(&self) -> SharedHost {
        self.document.clone()
    }

    pub fn document(&self) -> &Rc<RefCell<Document>> {
        &self.document
    }

    pub fn body(&self) -> NodeId {
        self.document.borrow().body()
    }

    // ── Mounting ─────────────────────────────────────────────────────

    /// Construct a component without mounting it.
    pub fn create<W: CustomElement>(&self, widget: W) -> Result<Component<W>, ComponentError> {
        Component::new(self.host(), widget)
    }

    /// Construct a component and mount it into `<body>`.
    pub fn mount<W: CustomElement>(&self, widget: W) -> Result<Component<W>, ComponentError> {
        let mut component = self.create(widget)?;
        self.attach(&mut component);
        Ok(component)
    }

    /// Mount an existing component into `<body>`.
    pub fn attach<W: CustomElement>(&self, component: &mut Component<W>) {
        component.mount(self.body());
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Dispatch `event` at `target`. Returns `false` if it was canceled.
    pub fn dispatch(&self, target: NodeId, event: &mut Event) -> bool {
        dispatch(&self.host(), target, event)
    }

    /// Simulate a click: bubbling, composed, cancelable.
    pub fn click(&self, target: NodeId) -> bool {
        let mut event = Event::with_init("click", EventInit::notification().cancelable(true));
        self.dispatch(target, &mut event)
    }

    /// Click the first node in `component`'s subtree matching `selector`.
    ///
    /// Returns `false` when nothing matches.
    pub fn click_in<W: CustomElement>(&self, component: &Component<W>, selector: &str) -> bool {
        match self.query(component.shadow_root(), selector).first() {
            Some(&node) => {
                self.click(node);
                true
            }
            None => false,
        }
    }

    // ── Inspection ───────────────────────────────────────────────────

    /// Descendants of `scope` matching `selector`. Invalid selectors match nothing.
    pub fn query(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        self.document
            .borrow()
            .query_selector_all(scope, selector)
            .unwrap_or_default()
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.document
            .borrow()
            .get(node)
            .and_then(|data| data.attribute(name))
            .map(str::to_owned)
    }

    /// Number of listeners on `node` for `event`.
    pub fn listener_count(&self, node: NodeId, event: &str) -> usize {
        self.document.borrow().listeners_for(node, event).len()
    }

    /// Start recording `event` notifications reaching `node`.
    pub fn record(&self, node: NodeId, event: &str) -> EventLog {
        let log = EventLog::default();
        let entries = log.entries.clone();
        self.document.borrow_mut().add_listener(
            node,
            event,
            Listener::new(move |e| {
                entries.borrow_mut().push(Recorded {
                    target: e.target(),
                    default_prevented: e.default_prevented(),
                });
            }),
            ListenerOptions::new(),
        );
        log
    }

    /// Record the payloads of `event` notifications reaching `node`.
    ///
    /// Notifications whose payload is not a `T` are skipped.
    pub fn record_detail<T: Clone + 'static>(&self, node: NodeId, event: &str) -> Rc<RefCell<Vec<T>>> {
        let details = Rc::new(RefCell::new(Vec::new()));
        let sink = details.clone();
        self.document.borrow_mut().add_listener(
            node,
            event,
            Listener::new(move |e| {
                if let Some(detail) = e.detail_ref::<T>() {
                    sink.borrow_mut().push(detail.clone());
                }
            }),
            ListenerOptions::new(),
        );
        details
    }
}

impl Default for Pilot {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// EventLog
// ---------------------------------------------------------------------------

/// One recorded notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recorded {
    /// Target as seen from the recording node.
    pub target: Option<NodeId>,
    pub default_prevented: bool,
}

/// Notifications recorded by [`Pilot::record`].
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Rc<RefCell<Vec<Recorded>>>,
}

impl EventLog {
    pub fn count(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn entries(&self) -> Vec<Recorded> {
        self.entries.borrow().clone()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}
