//! Selector queries: match parsed selectors against document nodes.

use super::node::{NodeData, NodeId};
use super::tree::Document;
use crate::css::model::{Combinator, CompoundSelector, Selector, SelectorComponent, SelectorPart};
use crate::css::{parse_selector_list, SelectorError};

impl Document {
    /// All descendants of `scope` matching `selector`, in tree order.
    ///
    /// Never descends into shadow trees attached below `scope`.
    pub fn query_selector_all(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>, SelectorError> {
        let selectors = parse_selector_list(selector)?;
        Ok(self
            .descendants(scope)
            .into_iter()
            .filter(|&node| selectors.iter().any(|sel| self.matches_selector(sel, node)))
            .collect())
    }

    /// The first descendant of `scope` matching `selector`.
    pub fn query_selector(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Option<NodeId>, SelectorError> {
        Ok(self.query_selector_all(scope, selector)?.first().copied())
    }

    /// Whether `node` matches a full selector.
    ///
    /// Walks the selector parts from right to left, matching compound
    /// selectors and navigating the tree via combinators.
    pub fn matches_selector(&self, selector: &Selector, node: NodeId) -> bool {
        let parts = &selector.parts;
        let Some(subject) = selector.subject() else {
            return false;
        };
        if !self.matches_node(subject, node) {
            return false;
        }

        let mut part_idx = parts.len() - 1;
        let mut current = node;

        while part_idx > 0 {
            part_idx -= 1;
            let SelectorPart::Combinator(combinator) = &parts[part_idx] else {
                return false;
            };
            if part_idx == 0 {
                // Combinator without a preceding compound.
                return false;
            }
            part_idx -= 1;
            let SelectorPart::Compound(compound) = &parts[part_idx] else {
                return false;
            };

            match combinator {
                Combinator::Child => match self.parent(current) {
                    Some(parent) if self.matches_node(compound, parent) => current = parent,
                    _ => return false,
                },
                Combinator::Descendant => {
                    match self
                        .ancestors(current)
                        .into_iter()
                        .find(|&ancestor| self.matches_node(compound, ancestor))
                    {
                        Some(ancestor) => current = ancestor,
                        None => return false,
                    }
                }
            }
        }

        true
    }

    fn matches_node(&self, compound: &CompoundSelector, node: NodeId) -> bool {
        self.get(node)
            .is_some_and(|data| data.is_element() && matches_compound(compound, data))
    }
}

/// Check whether a compound selector matches a single element's data.
fn matches_compound(compound: &CompoundSelector, node: &NodeData) -> bool {
    compound.components.iter().all(|component| match component {
        SelectorComponent::Type(name) => node.tag() == Some(name.as_str()),
        SelectorComponent::Class(name) => node.has_class(name),
        SelectorComponent::Id(name) => node.id() == Some(name.as_str()),
        SelectorComponent::Attribute { name, value } => match (node.attribute(name), value) {
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
            (None, _) => false,
        },
        SelectorComponent::Universal => true,
        // Pseudo-classes need runtime state the document does not track.
        SelectorComponent::PseudoClass(_) => false,
    })
}

#[cfg(test)]
mod tests {
    use crate::dom::node::{NodeData, NodeId, ShadowMode};
    use crate::dom::tree::Document;

    /// ```text
    /// body
    ///  └ div#panel.content
    ///     ├ button.btn.primary[type=submit]
    ///     ├ span.label
    ///     └ div.row
    ///        └ button.btn[disabled]
    /// ```
    fn build() -> (Document, NodeId, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let panel = doc.insert_child(
            doc.body(),
            NodeData::element("div")
                .with_attribute("id", "panel")
                .with_attribute("class", "content"),
        );
        let primary = doc.insert_child(
            panel,
            NodeData::element("button")
                .with_attribute("class", "btn primary")
                .with_attribute("type", "submit"),
        );
        doc.insert_child(panel, NodeData::element("span").with_attribute("class", "label"));
        let row = doc.insert_child(panel, NodeData::element("div").with_attribute("class", "row"));
        let disabled = doc.insert_child(
            row,
            NodeData::element("button")
                .with_attribute("class", "btn")
                .with_attribute("disabled", ""),
        );
        (doc, panel, primary, row, disabled)
    }

    #[test]
    fn query_by_class_in_tree_order() {
        let (doc, _, primary, _, disabled) = build();
        assert_eq!(
            doc.query_selector_all(doc.body(), ".btn").unwrap(),
            vec![primary, disabled]
        );
    }

    #[test]
    fn query_by_type_and_id() {
        let (doc, panel, ..) = build();
        assert_eq!(doc.query_selector_all(doc.body(), "#panel").unwrap(), vec![panel]);
        assert_eq!(doc.query_selector_all(doc.body(), "DIV").unwrap().len(), 2);
    }

    #[test]
    fn query_compound() {
        let (doc, _, primary, ..) = build();
        assert_eq!(
            doc.query_selector_all(doc.body(), "button.btn.primary").unwrap(),
            vec![primary]
        );
    }

    #[test]
    fn query_attributes() {
        let (doc, _, primary, _, disabled) = build();
        assert_eq!(
            doc.query_selector_all(doc.body(), "[disabled]").unwrap(),
            vec![disabled]
        );
        assert_eq!(
            doc.query_selector_all(doc.body(), "[type=submit]").unwrap(),
            vec![primary]
        );
        assert!(doc.query_selector_all(doc.body(), "[type=reset]").unwrap().is_empty());
    }

    #[test]
    fn query_child_vs_descendant() {
        let (doc, _, primary, _, disabled) = build();
        assert_eq!(
            doc.query_selector_all(doc.body(), "#panel > .btn").unwrap(),
            vec![primary]
        );
        assert_eq!(
            doc.query_selector_all(doc.body(), "#panel .btn").unwrap(),
            vec![primary, disabled]
        );
        assert_eq!(
            doc.query_selector_all(doc.body(), ".row > button").unwrap(),
            vec![disabled]
        );
    }

    #[test]
    fn query_selector_list() {
        let (doc, ..) = build();
        assert_eq!(doc.query_selector_all(doc.body(), ".label, .row").unwrap().len(), 2);
    }

    #[test]
    fn query_excludes_scope_itself() {
        let (doc, panel, ..) = build();
        assert!(!doc.query_selector_all(panel, "#panel").unwrap().contains(&panel));
    }

    #[test]
    fn query_first() {
        let (doc, _, primary, ..) = build();
        assert_eq!(doc.query_selector(doc.body(), "button").unwrap(), Some(primary));
        assert_eq!(doc.query_selector(doc.body(), "table").unwrap(), None);
    }

    #[test]
    fn query_does_not_cross_shadow_roots() {
        let mut doc = Document::new();
        let host = doc.insert_child(doc.body(), NodeData::element("x-host"));
        let shadow = doc.attach_shadow(host, ShadowMode::Open).unwrap();
        let inner = doc.insert_child(shadow, NodeData::element("span").with_attribute("class", "btn"));
        assert!(doc.query_selector_all(doc.body(), ".btn").unwrap().is_empty());
        assert_eq!(doc.query_selector_all(shadow, ".btn").unwrap(), vec![inner]);
        // Ancestors stop at the shadow root.
        assert!(doc.query_selector_all(shadow, "body .btn").unwrap().is_empty());
    }

    #[test]
    fn pseudo_classes_never_match() {
        let (doc, ..) = build();
        assert!(doc.query_selector_all(doc.body(), "button:hover").unwrap().is_empty());
    }

    #[test]
    fn invalid_selector_is_error() {
        let (doc, ..) = build();
        assert!(doc.query_selector_all(doc.body(), "..btn").is_err());
    }
}
