//! Markup snapshot helpers.
//!
//! Serialize component subtrees and style containers to strings for
//! `insta` snapshots and plain assertions.

use crate::component::{Component, CustomElement};
use crate::dom::Document;
use crate::vars::StyleVarsExt;

/// Markup of a component's isolated subtree.
pub fn shadow_markup<W: CustomElement>(component: &Component<W>) -> String {
    component
        .host()
        .borrow()
        .inner_markup(component.shadow_root())
}

/// Markup of the isolated subtree without its top-level `<style>` elements.
pub fn content_markup<W: CustomElement>(component: &Component<W>) -> String {
    let host = component.host().borrow();
    host.children(component.shadow_root())
        .into_iter()
        .filter(|&child| host.tag_name(child).as_deref() != Some("style"))
        .map(|child| host.outer_markup(child))
        .collect()
}

/// Text of the component's style-variable container.
pub fn vars_text<W: CustomElement>(component: &Component<W>) -> String {
    component
        .host()
        .borrow()
        .text_content(component.style_vars().container())
}

/// Serialized `<body>` content of a document.
pub fn body_markup(document: &Document) -> String {
    document.inner_markup(document.body())
}
