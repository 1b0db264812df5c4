//! The host-renderer boundary.
//!
//! Components never touch a concrete document. They hold a [`SharedHost`]
//! capability and go through the [`Host`] trait for isolated subtrees,
//! attributes, selector queries, listener attachment, and text/markup writes.
//! [`Document`](crate::dom::Document) is the in-memory implementation used
//! headlessly and in tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::css::SelectorError;
use crate::dom::node::{NodeId, ShadowMode};
use crate::dom::DomError;
use crate::event::{Listener, ListenerOptions};

/// Shared, single-threaded handle to a host renderer.
pub type SharedHost = Rc<RefCell<dyn Host>>;

/// One step of an event's propagation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathEntry {
    /// The node whose listeners run at this step.
    pub node: NodeId,
    /// The event target as seen from `node` (retargeted to a shadow host
    /// outside the target's shadow tree).
    pub target: NodeId,
}

/// Operations a host renderer provides to components.
pub trait Host {
    // ── Tree ─────────────────────────────────────────────────────────

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> NodeId;

    /// Create a detached text node.
    fn create_text(&mut self, text: &str) -> NodeId;

    /// Append `child` to `parent`, detaching it from any previous parent.
    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Insert `child` before `reference` under `parent`; appends when `reference` is `None`
    /// or not a child of `parent`.
    fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>);

    /// Detach `node` from its parent, keeping it (and its subtree) alive.
    fn detach(&mut self, node: NodeId);

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.children(node).first().copied()
    }

    /// Whether `node` is reachable from the document root, through shadow hosts.
    fn is_connected(&self, node: NodeId) -> bool;

    fn head(&self) -> NodeId;

    fn body(&self) -> NodeId;

    // ── Isolated subtrees ────────────────────────────────────────────

    /// Attach an isolated subtree to `host`. Fails if one is already attached.
    fn attach_shadow(&mut self, host: NodeId, mode: ShadowMode) -> Result<NodeId, DomError>;

    /// The shadow root of `host`, if it has an open one.
    fn shadow_root(&self, host: NodeId) -> Option<NodeId>;

    // ── Attributes ───────────────────────────────────────────────────

    /// Lowercase tag of an element; `None` for other nodes.
    fn tag_name(&self, node: NodeId) -> Option<String>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// Set an attribute, returning the previous value.
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Option<String>;

    /// Remove an attribute, returning the previous value.
    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Option<String>;

    // ── Queries ──────────────────────────────────────────────────────

    /// Descendants of `scope` matching `selector`, in tree order.
    fn query_selector_all(&self, scope: NodeId, selector: &str)
        -> Result<Vec<NodeId>, SelectorError>;

    // ── Content ──────────────────────────────────────────────────────

    fn text_content(&self, node: NodeId) -> String;

    /// Replace all children of `node` with a single text node.
    fn set_text_content(&mut self, node: NodeId, text: &str);

    /// Replace all children of `node` with parsed `markup`, returning the new top-level nodes.
    fn replace_children_with_markup(&mut self, node: NodeId, markup: &str) -> Vec<NodeId>;

    /// Serialized markup of the children of `node`.
    fn inner_markup(&self, node: NodeId) -> String;

    /// Serialized markup of `node` itself, excluding any attached shadow tree.
    fn outer_markup(&self, node: NodeId) -> String;

    // ── Listeners ────────────────────────────────────────────────────

    fn add_event_listener(
        &mut self,
        node: NodeId,
        event: &str,
        listener: Listener,
        options: ListenerOptions,
    );

    /// Remove a listener matched by event name, identity, and capture flag.
    fn remove_event_listener(
        &mut self,
        node: NodeId,
        event: &str,
        listener: &Listener,
        capture: bool,
    ) -> bool;

    /// Snapshot of the listeners on `node` for `event`, in registration order.
    fn listeners(&self, node: NodeId, event: &str) -> Vec<(Listener, ListenerOptions)>;

    /// Propagation path for an event at `target`: target first, then ancestors.
    fn propagation_path(&self, target: NodeId, composed: bool) -> Vec<PathEntry>;
}
