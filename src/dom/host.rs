//! [`Host`] implementation for [`Document`].

use super::node::{NodeData, NodeId, NodeKind, ShadowMode};
use super::tree::Document;
use super::DomError;
use crate::css::SelectorError;
use crate::event::{Listener, ListenerOptions};
use crate::host::{Host, PathEntry};

impl Host for Document {
    fn create_element(&mut self, tag: &str) -> NodeId {
        self.insert(NodeData::element(tag))
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        self.insert(NodeData::text(text))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.append(parent, child);
    }

    fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        self.insert_at(parent, child, reference);
    }

    fn detach(&mut self, node: NodeId) {
        Document::detach(self, node);
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        Document::parent(self, node)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        Document::children(self, node).to_vec()
    }

    fn is_connected(&self, node: NodeId) -> bool {
        Document::is_connected(self, node)
    }

    fn head(&self) -> NodeId {
        Document::head(self)
    }

    fn body(&self) -> NodeId {
        Document::body(self)
    }

    fn attach_shadow(&mut self, host: NodeId, mode: ShadowMode) -> Result<NodeId, DomError> {
        Document::attach_shadow(self, host, mode)
    }

    fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        let root = self.shadow_of(host)?;
        match self.get(root)?.kind {
            NodeKind::ShadowRoot {
                mode: ShadowMode::Open,
            } => Some(root),
            _ => None,
        }
    }

    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.get(node)?.tag().map(str::to_owned)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.get(node)?.attribute(name).map(str::to_owned)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Option<String> {
        self.get_mut(node)?.set_attribute(name, value)
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Option<String> {
        self.get_mut(node)?.remove_attribute(name)
    }

    fn query_selector_all(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>, SelectorError> {
        Document::query_selector_all(self, scope, selector)
    }

    fn text_content(&self, node: NodeId) -> String {
        Document::text_content(self, node)
    }

    fn set_text_content(&mut self, node: NodeId, text: &str) {
        Document::set_text_content(self, node, text);
    }

    fn replace_children_with_markup(&mut self, node: NodeId, markup: &str) -> Vec<NodeId> {
        self.clear_children(node);
        self.append_markup(node, markup)
    }

    fn inner_markup(&self, node: NodeId) -> String {
        Document::inner_markup(self, node)
    }

    fn outer_markup(&self, node: NodeId) -> String {
        Document::outer_markup(self, node)
    }

    fn add_event_listener(
        &mut self,
        node: NodeId,
        event: &str,
        listener: Listener,
        options: ListenerOptions,
    ) {
        self.add_listener(node, event, listener, options);
    }

    fn remove_event_listener(
        &mut self,
        node: NodeId,
        event: &str,
        listener: &Listener,
        capture: bool,
    ) -> bool {
        self.remove_listener(node, event, listener, capture)
    }

    fn listeners(&self, node: NodeId, event: &str) -> Vec<(Listener, ListenerOptions)> {
        self.listeners_for(node, event)
    }

    fn propagation_path(&self, target: NodeId, composed: bool) -> Vec<PathEntry> {
        let mut path = Vec::new();
        if !self.contains(target) {
            return path;
        }
        let mut seen_target = target;
        let mut current = Some(target);
        while let Some(node) = current {
            path.push(PathEntry {
                node,
                target: seen_target,
            });
            current = match (Document::parent(self, node), self.host_of(node)) {
                (Some(parent), _) => Some(parent),
                (None, Some(host)) if composed => {
                    seen_target = host;
                    Some(host)
                }
                _ => None,
            };
        }
        path
    }
}
