//! The widget contract: [`CustomElement`], its [`AttributeHandlers`] registry,
//! and the [`RenderContext`] passed to `render`.

use std::fmt;

use tracing::warn;

use super::base::Component;
use super::error::HandlerResult;
use super::state::State;
use crate::case::handler_name;
use crate::dom::node::NodeId;
use crate::host::SharedHost;
use crate::vars::StyleVars;

// ---------------------------------------------------------------------------
// CustomElement
// ---------------------------------------------------------------------------

/// Implemented by every widget built on [`Component`].
///
/// A widget supplies its tag, the attributes it observes, style and markup
/// templates, attribute-change handlers, and a `render` that projects state
/// into the isolated subtree. All methods have no-op defaults except `TAG`.
pub trait CustomElement: Sized + 'static {
    /// Element tag. Must contain a hyphen.
    const TAG: &'static str;

    /// Attribute names whose changes run the attribute-change reaction.
    fn observed_attributes() -> &'static [&'static str] {
        &[]
    }

    /// Class-level attribute handlers, built once per instance at construction.
    fn attribute_handlers() -> AttributeHandlers<Self> {
        AttributeHandlers::new()
    }

    /// Style sheet text for the isolated subtree.
    fn styles(&self) -> &str {
        ""
    }

    /// Initial markup of the isolated subtree.
    fn template(&self) -> &str {
        ""
    }

    /// Project the current state into the isolated subtree.
    ///
    /// Called after every state mutation and on every mount, so it must be
    /// idempotent.
    fn render(&mut self, cx: &mut RenderContext<'_>) {
        let _ = cx;
    }
}

// ---------------------------------------------------------------------------
// AttributeHandlers
// ---------------------------------------------------------------------------

/// An attribute-change handler: `(component, old, new)`.
pub type AttributeHandler<W> = fn(&mut Component<W>, Option<&str>, Option<&str>) -> HandlerResult;

/// Handlers keyed by their conventional name (`on<Pascal>Changed`).
pub struct AttributeHandlers<W: CustomElement> {
    entries: Vec<(String, AttributeHandler<W>)>,
}

impl<W: CustomElement> AttributeHandlers<W> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register `handler` for `attribute` (builder). Replaces an earlier handler.
    pub fn on(self, attribute: &str, handler: AttributeHandler<W>) -> Self {
        self.named(&handler_name(attribute), handler)
    }

    /// Register `handler` under an explicit handler name (builder).
    pub fn named(mut self, name: &str, handler: AttributeHandler<W>) -> Self {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = handler,
            None => self.entries.push((name.to_owned(), handler)),
        }
        self
    }

    /// The handler registered under `name`.
    pub fn get(&self, name: &str) -> Option<AttributeHandler<W>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, handler)| *handler)
    }

    /// The handler for changes to `attribute`.
    pub fn for_attribute(&self, attribute: &str) -> Option<AttributeHandler<W>> {
        self.get(&handler_name(attribute))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<W: CustomElement> Default for AttributeHandlers<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: CustomElement> fmt::Debug for AttributeHandlers<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

// ---------------------------------------------------------------------------
// RenderContext
// ---------------------------------------------------------------------------

/// What a widget may read and touch while rendering.
pub struct RenderContext<'a> {
    pub(crate) host: &'a SharedHost,
    pub(crate) element: NodeId,
    pub(crate) shadow_root: NodeId,
    pub(crate) state: &'a State,
    pub(crate) vars: &'a mut StyleVars,
}

impl<'a> RenderContext<'a> {
    pub fn state(&self, key: &str) -> Option<&'a str> {
        self.state.get(key)
    }

    /// The value of `key`, or `default` when absent or null.
    pub fn state_or(&self, key: &str, default: &'a str) -> &'a str {
        self.state.get(key).unwrap_or(default)
    }

    pub fn has_state(&self, key: &str) -> bool {
        self.state.contains(key)
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    pub fn shadow_root(&self) -> NodeId {
        self.shadow_root
    }

    pub fn host(&self) -> &SharedHost {
        self.host
    }

    pub fn vars(&mut self) -> &mut StyleVars {
        self.vars
    }

    /// Nodes in the isolated subtree matching `selector`. Invalid selectors match nothing.
    pub fn query(&self, selector: &str) -> Vec<NodeId> {
        match self
            .host
            .borrow()
            .query_selector_all(self.shadow_root, selector)
        {
            Ok(nodes) => nodes,
            Err(err) => {
                warn!(selector, error = %err, "invalid selector in render");
                Vec::new()
            }
        }
    }

    pub fn query_one(&self, selector: &str) -> Option<NodeId> {
        self.query(selector).into_iter().next()
    }

    /// Replace the text of every node matching `selector`.
    pub fn set_text(&mut self, selector: &str, text: &str) {
        for node in self.query(selector) {
            self.host.borrow_mut().set_text_content(node, text);
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.host.borrow().attribute(node, name)
    }

    /// Set an attribute on an inner node; `None` removes it.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: Option<&str>) {
        let mut host = self.host.borrow_mut();
        match value {
            Some(value) => {
                host.set_attribute(node, name, value);
            }
            None => {
                host.remove_attribute(node, name);
            }
        }
    }

    /// Add or remove `class` in the `class` attribute of `node`.
    pub fn toggle_class(&mut self, node: NodeId, class: &str, on: bool) {
        let current = self.attribute(node, "class").unwrap_or_default();
        let mut classes: Vec<&str> = current.split_whitespace().collect();
        let present = classes.contains(&class);
        if present == on {
            return;
        }
        if on {
            classes.push(class);
        } else {
            classes.retain(|c| *c != class);
        }
        let joined = classes.join(" ");
        self.host.borrow_mut().set_attribute(node, "class", &joined);
    }
}
