//! Scoped CSS custom properties.
//!
//! [`StyleVars`] owns one style container and presents its variables as a
//! name → value map. All variables live on a single rule keyed by the scope's
//! selector (`:host` or `:root`). The rule is created lazily on the first write
//! and the container's text is rewritten wholesale after every change.
//!
//! Names are accepted in either external (`buttonRadius`, `--buttonRadius`) or
//! internal (`button-radius`) form; see [`normalize_var_name`].

use tracing::trace;

use crate::case::{denormalize_var_name, normalize_var_name};
use crate::css::{RuleList, StyleRule};
use crate::dom::node::NodeId;
use crate::host::SharedHost;

/// Which root the variable rule applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VarScope {
    /// The component's own encapsulated root (`:host`).
    #[default]
    Host,
    /// The whole document (`:root`).
    Document,
}

impl VarScope {
    pub fn selector(self) -> &'static str {
        match self {
            VarScope::Host => ":host",
            VarScope::Document => ":root",
        }
    }
}

/// The custom-property manager for one style container.
pub struct StyleVars {
    host: SharedHost,
    container: NodeId,
    scope: VarScope,
    rules: RuleList,
}

impl StyleVars {
    /// Manage `container`, adopting whatever rules its text already holds.
    pub fn new(host: SharedHost, container: NodeId, scope: VarScope) -> Self {
        let rules = RuleList::parse(&host.borrow().text_content(container));
        Self {
            host,
            container,
            scope,
            rules,
        }
    }

    /// Create a `<style>` container in the document head and manage it at document scope.
    pub fn for_document(host: SharedHost) -> Self {
        let container = {
            let mut h = host.borrow_mut();
            let style = h.create_element("style");
            let head = h.head();
            h.append_child(head, style);
            style
        };
        Self::new(host, container, VarScope::Document)
    }

    pub fn scope(&self) -> VarScope {
        self.scope
    }

    /// The style element this manager writes to.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// The full rule list, as last synced to the container.
    pub fn rules(&self) -> &RuleList {
        &self.rules
    }

    /// The scope's rule, if any variable has ever been written.
    pub fn rule(&self) -> Option<&StyleRule> {
        self.rules.find(self.scope.selector())
    }

    /// The value of variable `name`.
    ///
    /// `None` when the scope's rule does not exist yet; an empty string when the
    /// rule exists but does not declare the property.
    pub fn get(&self, name: &str) -> Option<String> {
        let property = custom_property(name);
        self.rule()
            .map(|rule| rule.property(&property).unwrap_or_default().trim().to_owned())
    }

    /// Set variable `name` to `value` and rewrite the container.
    pub fn set(&mut self, name: &str, value: &str) {
        let property = custom_property(name);
        trace!(property = %property, value, "set style variable");
        self.rules
            .find_or_insert(self.scope.selector())
            .set_property(&property, value);
        self.sync();
    }

    /// Whether variable `name` is set to a non-empty value.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some_and(|value| !value.is_empty())
    }

    /// Remove variable `name`. Returns whether it was declared.
    pub fn remove(&mut self, name: &str) -> bool {
        let property = custom_property(name);
        let selector = self.scope.selector();
        let removed = self
            .rules
            .find_mut(selector)
            .is_some_and(|rule| rule.remove_property(&property));
        if removed {
            trace!(property = %property, "removed style variable");
            self.sync();
        }
        removed
    }

    /// Declared variable names in external (camelCase) form, in declaration order.
    pub fn names(&self) -> Vec<String> {
        self.rule()
            .map(|rule| {
                rule.custom_properties()
                    .map(|d| denormalize_var_name(&d.name))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `(name, value)` pairs in external form, in declaration order.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.rule()
            .map(|rule| {
                rule.custom_properties()
                    .map(|d| (denormalize_var_name(&d.name), d.value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Merge `updates` into the variable set.
    ///
    /// `Some(value)` sets the variable. `None` deletes it if it exists and is
    /// otherwise ignored.
    pub fn assign<I, K, V>(&mut self, updates: I)
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in updates {
            match value {
                Some(value) => self.set(name.as_ref(), value.as_ref()),
                None => {
                    if self.get(name.as_ref()).is_some_and(|v| !v.is_empty()) {
                        self.remove(name.as_ref());
                    }
                }
            }
        }
    }

    /// Re-read the container's text, discarding the in-memory rule list.
    pub fn reload(&mut self) {
        self.rules = RuleList::parse(&self.host.borrow().text_content(self.container));
    }

    fn sync(&self) {
        let text = self.rules.to_css_text();
        self.host
            .borrow_mut()
            .set_text_content(self.container, &text);
    }
}

impl std::fmt::Debug for StyleVars {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleVars")
            .field("container", &self.container)
            .field("scope", &self.scope)
            .field("rules", &self.rules)
            .finish()
    }
}

fn custom_property(name: &str) -> String {
    format!("--{}", normalize_var_name(name))
}

/// The variable set exposed as one bulk-assignable surface on an owning type.
pub trait StyleVarsExt {
    fn style_vars(&self) -> &StyleVars;

    fn style_vars_mut(&mut self) -> &mut StyleVars;

    /// Snapshot of every variable in external form.
    fn vars(&self) -> Vec<(String, String)> {
        self.style_vars().entries()
    }

    /// Merge a mapping into the variable set. See [`StyleVars::assign`].
    fn assign_vars<I, K, V>(&mut self, updates: I)
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.style_vars_mut().assign(updates);
    }
}

impl StyleVarsExt for StyleVars {
    fn style_vars(&self) -> &StyleVars {
        self
    }

    fn style_vars_mut(&mut self) -> &mut StyleVars {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, NodeData};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup(initial: &str) -> (Rc<RefCell<Document>>, StyleVars) {
        let doc = Rc::new(RefCell::new(Document::new()));
        let container = {
            let mut d = doc.borrow_mut();
            let body = d.body();
            let style = d.insert_child(body, NodeData::element("style"));
            d.set_text_content(style, initial);
            style
        };
        let vars = StyleVars::new(doc.clone(), container, VarScope::Host);
        (doc, vars)
    }

    fn text(doc: &Rc<RefCell<Document>>, vars: &StyleVars) -> String {
        doc.borrow().text_content(vars.container())
    }

    #[test]
    fn get_before_any_write_is_none() {
        let (_doc, vars) = setup("");
        assert_eq!(vars.get("buttonRadius"), None);
        assert!(!vars.has("buttonRadius"));
    }

    #[test]
    fn set_creates_rule_and_syncs_text() {
        let (doc, mut vars) = setup("");
        vars.set("buttonRadius", " 10px ");
        assert_eq!(vars.get("buttonRadius").as_deref(), Some("10px"));
        assert_eq!(vars.get("--button-radius").as_deref(), Some("10px"));
        assert_eq!(text(&doc, &vars), ":host { --button-radius: 10px; }");
    }

    #[test]
    fn absent_property_on_existing_rule_is_empty() {
        let (_doc, mut vars) = setup("");
        vars.set("a", "1");
        assert_eq!(vars.get("b").as_deref(), Some(""));
        assert!(!vars.has("b"));
    }

    #[test]
    fn rule_created_once_and_appended() {
        let (doc, mut vars) = setup(".btn { color: red; }");
        vars.set("a", "1");
        vars.set("b", "2");
        vars.set("a", "3");
        assert_eq!(vars.rules().len(), 2);
        insta::assert_snapshot!(text(&doc, &vars), @r"
        .btn { color: red; }
        :host { --a: 3; --b: 2; }
        ");
    }

    #[test]
    fn adopts_existing_rule() {
        let (_doc, vars) = setup(":host { --glow-radius: 4px; }");
        assert_eq!(vars.get("glowRadius").as_deref(), Some("4px"));
        assert_eq!(vars.names(), vec!["glowRadius"]);
    }

    #[test]
    fn remove_reports_and_syncs() {
        let (doc, mut vars) = setup("");
        assert!(!vars.remove("buttonRadius"));
        vars.set("buttonRadius", "10px");
        vars.set("buttonColor", "red");
        assert!(vars.remove("button-radius"));
        assert!(!vars.has("buttonRadius"));
        assert!(!vars.remove("buttonRadius"));
        assert_eq!(text(&doc, &vars), ":host { --button-color: red; }");
    }

    #[test]
    fn names_and_entries_are_denormalized() {
        let (_doc, mut vars) = setup("");
        vars.set("buttonRadius", "10px");
        vars.set("--glow-color", "cyan");
        assert_eq!(vars.names(), vec!["buttonRadius", "glowColor"]);
        assert_eq!(
            vars.entries(),
            vec![
                ("buttonRadius".to_owned(), "10px".to_owned()),
                ("glowColor".to_owned(), "cyan".to_owned()),
            ]
        );
    }

    #[test]
    fn names_skip_regular_properties() {
        let (_doc, vars) = setup(":host { display: block; --gap: 2px; }");
        assert_eq!(vars.names(), vec!["gap"]);
    }

    #[test]
    fn assign_merges() {
        let (_doc, mut vars) = setup("");
        vars.set("keep", "1");
        vars.set("drop", "2");
        vars.assign([
            ("drop", None),
            ("missing", None),
            ("added", Some("3")),
        ]);
        assert_eq!(vars.names(), vec!["keep", "added"]);
        assert_eq!(vars.get("missing").as_deref(), Some(""));
    }

    #[test]
    fn bulk_surface_through_trait() {
        let (_doc, mut vars) = setup("");
        vars.assign_vars([("lampSize", Some("12px"))]);
        assert_eq!(vars.vars(), vec![("lampSize".to_owned(), "12px".to_owned())]);
    }

    #[test]
    fn document_scope_lives_in_head() {
        let doc = Rc::new(RefCell::new(Document::new()));
        let mut vars = StyleVars::for_document(doc.clone());
        vars.set("pageGlow", "1");
        let d = doc.borrow();
        assert_eq!(d.parent(vars.container()), Some(d.head()));
        assert_eq!(d.text_content(vars.container()), ":root { --page-glow: 1; }");
    }

    #[test]
    fn reload_picks_up_external_edits() {
        let (doc, mut vars) = setup("");
        doc.borrow_mut()
            .set_text_content(vars.container(), ":host { --x: 9; }");
        assert_eq!(vars.get("x"), None);
        vars.reload();
        assert_eq!(vars.get("x").as_deref(), Some("9"));
    }
}
