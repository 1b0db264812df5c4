//! Document arena: insert, detach, reparent, walk, shadow attachment.

use slotmap::{SecondaryMap, SlotMap};

use super::node::{NodeData, NodeId, NodeKind, ShadowMode};
use super::DomError;
use crate::event::{Listener, ListenerOptions};

/// A listener attached to one node.
#[derive(Debug, Clone)]
pub(crate) struct AttachedListener {
    pub(crate) event: String,
    pub(crate) listener: Listener,
    pub(crate) options: ListenerOptions,
}

/// The in-memory document, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`. Parent/child relationships are stored
/// in secondary maps. Shadow roots are not children of their host: they hang
/// off a separate host map, so tree walks and queries never cross into them.
pub struct Document {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    /// host element -> shadow root
    shadow: SecondaryMap<NodeId, NodeId>,
    /// shadow root -> host element
    shadow_host: SecondaryMap<NodeId, NodeId>,
    pub(crate) listeners: SecondaryMap<NodeId, Vec<AttachedListener>>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
}

impl Document {
    /// Create a document with `<html>`, `<head>` and `<body>`.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeData::with_kind(NodeKind::Document));
        let mut doc = Self {
            nodes,
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            shadow: SecondaryMap::new(),
            shadow_host: SecondaryMap::new(),
            listeners: SecondaryMap::new(),
            root,
            head: root,
            body: root,
        };
        doc.children.insert(root, Vec::new());
        let html = doc.insert_child(root, NodeData::element("html"));
        doc.head = doc.insert_child(html, NodeData::element("head"));
        doc.body = doc.insert_child(html, NodeData::element("body"));
        doc
    }

    /// The document node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Insert a detached node.
    pub fn insert(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        id
    }

    /// Insert a node as the last child of `parent`.
    pub fn insert_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = self.insert(data);
        self.append(parent, id);
        id
    }

    /// Move `node` to the end of `new_parent`'s children.
    ///
    /// Does nothing if either node is missing or `new_parent` is inside `node`.
    pub fn append(&mut self, new_parent: NodeId, node: NodeId) {
        self.insert_at(new_parent, node, None);
    }

    /// Move `node` before `reference` under `new_parent` (append if no such child).
    pub fn insert_at(&mut self, new_parent: NodeId, node: NodeId, reference: Option<NodeId>) {
        if !self.contains(node) || !self.contains(new_parent) || node == new_parent {
            return;
        }
        if self.ancestors(new_parent).contains(&node) {
            return;
        }
        self.detach(node);
        self.parent.insert(node, new_parent);
        let Some(siblings) = self.children.get_mut(new_parent) else {
            return;
        };
        let index = reference
            .and_then(|r| siblings.iter().position(|&c| c == r))
            .unwrap_or(siblings.len());
        siblings.insert(index, node);
    }

    /// Detach `node` from its parent. The node and its subtree stay in the arena.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent_id) = self.parent.remove(node) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != node);
            }
        }
    }

    /// Remove a node and all its descendants (including attached shadow trees).
    ///
    /// Returns the `NodeData` for the removed node, or `None` if it didn't exist.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        if !self.contains(id) || id == self.root {
            return None;
        }
        self.detach(id);

        let mut to_remove = vec![id];
        let mut removed = None;
        while let Some(current) = to_remove.pop() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            if let Some(shadow) = self.shadow.remove(current) {
                to_remove.push(shadow);
            }
            self.shadow_host.remove(current);
            self.parent.remove(current);
            self.listeners.remove(current);
            let data = self.nodes.remove(current);
            if current == id {
                removed = data;
            }
        }
        removed
    }

    /// Remove every child of `node`.
    pub fn clear_children(&mut self, node: NodeId) {
        for child in self.children(node).to_vec() {
            self.remove(child);
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Children of a node; empty if it has none or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ancestors of `id` within its own tree, nearest first. Does not cross shadow roots.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Descendants of `id` in tree order (pre-order), excluding `id` and shadow trees.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        result
    }

    /// Attach a shadow root to `host`.
    pub fn attach_shadow(&mut self, host: NodeId, mode: ShadowMode) -> Result<NodeId, DomError> {
        let data = self.nodes.get(host).ok_or(DomError::NodeNotFound)?;
        if !data.is_element() {
            return Err(DomError::NotAnElement);
        }
        if self.shadow.contains_key(host) {
            return Err(DomError::ShadowAlreadyAttached);
        }
        let root = self.insert(NodeData::with_kind(NodeKind::ShadowRoot { mode }));
        self.shadow.insert(host, root);
        self.shadow_host.insert(root, host);
        Ok(root)
    }

    /// The shadow root of `host`, regardless of mode.
    pub fn shadow_of(&self, host: NodeId) -> Option<NodeId> {
        self.shadow.get(host).copied()
    }

    /// The host element of a shadow root.
    pub fn host_of(&self, shadow_root: NodeId) -> Option<NodeId> {
        self.shadow_host.get(shadow_root).copied()
    }

    /// The topmost node of `id`'s tree: the document, a shadow root, or a detached root.
    pub fn tree_root(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().copied().unwrap_or(id)
    }

    /// Whether `id` is reachable from the document node, through shadow hosts.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            let top = self.tree_root(current);
            if top == self.root {
                return true;
            }
            match self.host_of(top) {
                Some(host) => current = host,
                None => return false,
            }
        }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(NodeData {
            kind: NodeKind::Text(text),
            ..
        }) = self.nodes.get(id)
        {
            return text.clone();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|n| match &self.nodes.get(n)?.kind {
                NodeKind::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace all children of `id` with one text node (none for empty text).
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        if let Some(NodeData {
            kind: NodeKind::Text(existing),
            ..
        }) = self.nodes.get_mut(id)
        {
            *existing = text.to_owned();
            return;
        }
        self.clear_children(id);
        if !text.is_empty() {
            self.insert_child(id, NodeData::text(text));
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    // ── Listeners ────────────────────────────────────────────────────

    pub fn add_listener(
        &mut self,
        node: NodeId,
        event: &str,
        listener: Listener,
        options: ListenerOptions,
    ) {
        if !self.contains(node) {
            return;
        }
        let list = self.listeners.entry(node).map(|e| e.or_default());
        let Some(list) = list else {
            return;
        };
        // Re-adding the same (event, listener, capture) is a no-op.
        if list
            .iter()
            .any(|l| l.event == event && l.listener.same(&listener) && l.options.capture == options.capture)
        {
            return;
        }
        list.push(AttachedListener {
            event: event.to_owned(),
            listener,
            options,
        });
    }

    pub fn remove_listener(
        &mut self,
        node: NodeId,
        event: &str,
        listener: &Listener,
        capture: bool,
    ) -> bool {
        let Some(list) = self.listeners.get_mut(node) else {
            return false;
        };
        let Some(index) = list
            .iter()
            .position(|l| l.event == event && l.listener.same(listener) && l.options.capture == capture)
        else {
            return false;
        };
        list.remove(index);
        true
    }

    /// Listeners on `node` for `event`, in registration order.
    pub fn listeners_for(&self, node: NodeId, event: &str) -> Vec<(Listener, ListenerOptions)> {
        self.listeners
            .get(node)
            .map(|list| {
                list.iter()
                    .filter(|l| l.event == event)
                    .map(|l| (l.listener.clone(), l.options))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("shadow_roots", &self.shadow.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_has_head_and_body() {
        let doc = Document::new();
        assert_eq!(doc.get(doc.head()).unwrap().tag(), Some("head"));
        assert_eq!(doc.get(doc.body()).unwrap().tag(), Some("body"));
        assert!(doc.is_connected(doc.body()));
        assert_eq!(doc.len(), 4);
    }

    #[test]
    fn insert_is_detached() {
        let mut doc = Document::new();
        let div = doc.insert(NodeData::element("div"));
        assert!(doc.parent(div).is_none());
        assert!(!doc.is_connected(div));
        doc.append(doc.body(), div);
        assert_eq!(doc.parent(div), Some(doc.body()));
        assert!(doc.is_connected(div));
    }

    #[test]
    fn append_moves_between_parents() {
        let mut doc = Document::new();
        let a = doc.insert_child(doc.body(), NodeData::element("div"));
        let b = doc.insert_child(doc.body(), NodeData::element("div"));
        let c = doc.insert_child(a, NodeData::element("span"));
        doc.append(b, c);
        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), &[c]);
    }

    #[test]
    fn append_refuses_cycles() {
        let mut doc = Document::new();
        let a = doc.insert_child(doc.body(), NodeData::element("div"));
        let b = doc.insert_child(a, NodeData::element("div"));
        doc.append(b, a);
        assert_eq!(doc.parent(a), Some(doc.body()));
    }

    #[test]
    fn insert_at_reference() {
        let mut doc = Document::new();
        let parent = doc.insert(NodeData::element("div"));
        let a = doc.insert_child(parent, NodeData::element("a"));
        let b = doc.insert(NodeData::element("b"));
        doc.insert_at(parent, b, Some(a));
        assert_eq!(doc.children(parent), &[b, a]);

        let c = doc.insert(NodeData::element("c"));
        doc.insert_at(parent, c, None);
        assert_eq!(doc.children(parent), &[b, a, c]);
    }

    #[test]
    fn detach_keeps_node() {
        let mut doc = Document::new();
        let div = doc.insert_child(doc.body(), NodeData::element("div"));
        let span = doc.insert_child(div, NodeData::element("span"));
        doc.detach(div);
        assert!(doc.contains(div));
        assert_eq!(doc.children(div), &[span]);
        assert!(!doc.is_connected(span));
    }

    #[test]
    fn remove_deletes_subtree_and_shadow() {
        let mut doc = Document::new();
        let host = doc.insert_child(doc.body(), NodeData::element("x-host"));
        let shadow = doc.attach_shadow(host, ShadowMode::Open).unwrap();
        let inner = doc.insert_child(shadow, NodeData::element("div"));
        let before = doc.len();
        assert!(doc.remove(host).is_some());
        assert!(!doc.contains(shadow));
        assert!(!doc.contains(inner));
        assert_eq!(doc.len(), before - 3);
    }

    #[test]
    fn descendants_in_tree_order() {
        let mut doc = Document::new();
        let root = doc.insert(NodeData::element("div"));
        let a = doc.insert_child(root, NodeData::element("a"));
        let a1 = doc.insert_child(a, NodeData::element("i"));
        let b = doc.insert_child(root, NodeData::element("b"));
        assert_eq!(doc.descendants(root), vec![a, a1, b]);
    }

    #[test]
    fn shadow_attach_once() {
        let mut doc = Document::new();
        let host = doc.insert(NodeData::element("x-host"));
        let shadow = doc.attach_shadow(host, ShadowMode::Open).unwrap();
        assert_eq!(doc.shadow_of(host), Some(shadow));
        assert_eq!(doc.host_of(shadow), Some(host));
        assert_eq!(
            doc.attach_shadow(host, ShadowMode::Open),
            Err(DomError::ShadowAlreadyAttached)
        );
    }

    #[test]
    fn shadow_requires_element() {
        let mut doc = Document::new();
        let text = doc.insert(NodeData::text("hi"));
        assert_eq!(
            doc.attach_shadow(text, ShadowMode::Open),
            Err(DomError::NotAnElement)
        );
    }

    #[test]
    fn shadow_children_connected_through_host() {
        let mut doc = Document::new();
        let host = doc.insert(NodeData::element("x-host"));
        let shadow = doc.attach_shadow(host, ShadowMode::Open).unwrap();
        let inner = doc.insert_child(shadow, NodeData::element("div"));
        assert!(!doc.is_connected(inner));
        doc.append(doc.body(), host);
        assert!(doc.is_connected(inner));
        // Shadow trees are not part of the host's children.
        assert!(doc.descendants(doc.body()).iter().all(|&n| n != inner));
    }

    #[test]
    fn text_content_round_trip() {
        let mut doc = Document::new();
        let div = doc.insert(NodeData::element("div"));
        doc.insert_child(div, NodeData::element("span"));
        doc.set_text_content(div, "hello");
        assert_eq!(doc.children(div).len(), 1);
        assert_eq!(doc.text_content(div), "hello");
        doc.set_text_content(div, "");
        assert!(doc.children(div).is_empty());
    }

    #[test]
    fn listeners_dedup_and_remove() {
        let mut doc = Document::new();
        let div = doc.insert(NodeData::element("div"));
        let l = Listener::new(|_| {});
        doc.add_listener(div, "click", l.clone(), ListenerOptions::default());
        doc.add_listener(div, "click", l.clone(), ListenerOptions::default());
        assert_eq!(doc.listeners_for(div, "click").len(), 1);
        doc.add_listener(div, "click", l.clone(), ListenerOptions::new().capture(true));
        assert_eq!(doc.listeners_for(div, "click").len(), 2);

        assert!(doc.remove_listener(div, "click", &l, false));
        assert!(!doc.remove_listener(div, "click", &l, false));
        assert_eq!(doc.listeners_for(div, "click").len(), 1);
        assert!(doc.listeners_for(div, "focus").is_empty());
    }
}
