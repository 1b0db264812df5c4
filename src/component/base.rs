//! [`Component`]: the lifecycle controller shared by every widget.
//!
//! A component owns its element's isolated subtree, a local [`State`] mirrored
//! onto observed attributes, a delegated listener registry, a pre-mount command
//! queue and a [`StyleVars`] manager. Widget behavior is supplied through
//! [`CustomElement`].
//!
//! Renders are batched: a public mutation and every reaction nested inside it
//! produce one `render` when the outermost call returns.

use std::any::Any;
use std::fmt;

use tracing::{debug, error, trace, warn};

use super::config::ComponentConfig;
use super::element::{AttributeHandlers, CustomElement, RenderContext};
use super::emitter::Emitter;
use super::error::{ComponentError, HandlerResult};
use super::id::InstanceId;
use super::lifecycle::Lifecycle;
use super::state::{AttributeSync, State};
use crate::case::handler_name;
use crate::dom::node::NodeId;
use crate::event::{EventInit, Listener, ListenerOptions, ListenerRegistry, Registration};
use crate::host::SharedHost;
use crate::vars::{StyleVars, StyleVarsExt, VarScope};

/// A deferred operation, run once at first mount.
pub type Command<W> = Box<dyn FnOnce(&mut Component<W>) -> HandlerResult>;

/// An instance-level attribute-change callback.
pub type AttributeCallback<W> =
    Box<dyn FnMut(&mut Component<W>, Option<&str>, Option<&str>) -> HandlerResult>;

pub struct Component<W: CustomElement> {
    id: InstanceId,
    host: SharedHost,
    element: NodeId,
    shadow_root: NodeId,
    config: ComponentConfig,
    widget: W,
    state: State,
    listeners: ListenerRegistry,
    handlers: AttributeHandlers<W>,
    // A `None` slot is a callback currently running.
    callbacks: Vec<(String, Option<AttributeCallback<W>>)>,
    queue: Vec<Command<W>>,
    lifecycle: Lifecycle,
    vars: StyleVars,
    batch_depth: usize,
    render_pending: bool,
    reaction_depth: usize,
    renders: usize,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl<W: CustomElement> Component<W> {
    /// Create a detached `<W::TAG>` element and build a component on it.
    pub fn new(host: SharedHost, widget: W) -> Result<Self, ComponentError> {
        Self::with_config(host, widget, ComponentConfig::default())
    }

    pub fn with_config(
        host: SharedHost,
        widget: W,
        config: ComponentConfig,
    ) -> Result<Self, ComponentError> {
        validate_tag(W::TAG)?;
        let element = host.borrow_mut().create_element(W::TAG);
        Self::upgrade(host, element, widget, config)
    }

    /// Build a component on an existing element, seeding state from its attributes.
    ///
    /// An element that is already in a live document is mounted before this
    /// returns.
    pub fn upgrade(
        host: SharedHost,
        element: NodeId,
        widget: W,
        config: ComponentConfig,
    ) -> Result<Self, ComponentError> {
        validate_tag(W::TAG)?;

        let found = host.borrow().tag_name(element);
        if let Some(found) = found.filter(|tag| tag != W::TAG) {
            return Err(ComponentError::TagMismatch {
                expected: W::TAG.to_owned(),
                found,
            });
        }

        // 1. Isolated subtree. The attach also checks that `element` exists.
        let shadow_root = host.borrow_mut().attach_shadow(element, config.shadow_mode)?;

        // 2. State from the observed attributes.
        let mut state = State::new();
        for &name in W::observed_attributes() {
            let value = host.borrow().attribute(element, name);
            state.set(name, value.as_deref());
        }

        // 3. Variable container.
        let vars = match config.var_scope {
            VarScope::Host => {
                let container = host.borrow_mut().create_element("style");
                StyleVars::new(host.clone(), container, VarScope::Host)
            }
            VarScope::Document => StyleVars::for_document(host.clone()),
        };

        // 4. Styles and template, with the variable container kept first.
        {
            let mut h = host.borrow_mut();
            let mut markup = String::new();
            if !widget.styles().is_empty() {
                markup.push_str("<style>");
                markup.push_str(widget.styles());
                markup.push_str("</style>");
            }
            markup.push_str(widget.template());
            h.replace_children_with_markup(shadow_root, &markup);
            if vars.scope() == VarScope::Host {
                let first = h.first_child(shadow_root);
                h.insert_before(shadow_root, vars.container(), first);
            }
        }

        let connected = host.borrow().is_connected(element);
        let mut component = Self {
            id: InstanceId::next(),
            host,
            element,
            shadow_root,
            config,
            widget,
            state,
            listeners: ListenerRegistry::new(),
            handlers: W::attribute_handlers(),
            callbacks: Vec::new(),
            queue: Vec::new(),
            lifecycle: Lifecycle::new(),
            vars,
            batch_depth: 0,
            render_pending: false,
            reaction_depth: 0,
            renders: 0,
        };
        debug!(id = %component.id, tag = W::TAG, "component constructed");
        if connected {
            component.connected();
        }
        Ok(component)
    }
}

fn validate_tag(tag: &str) -> Result<(), ComponentError> {
    let valid = tag.starts_with(|c: char| c.is_ascii_lowercase())
        && tag.contains('-')
        && tag
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(ComponentError::InvalidTag(tag.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl<W: CustomElement> Component<W> {
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// The shared host capability; the component's own attach/detach primitives.
    pub fn host(&self) -> &SharedHost {
        &self.host
    }

    pub fn element(&self) -> NodeId {
        self.element
    }

    pub fn shadow_root(&self) -> NodeId {
        self.shadow_root
    }

    pub fn config(&self) -> &ComponentConfig {
        &self.config
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle.is_mounted()
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Number of widget renders so far.
    pub fn render_count(&self) -> usize {
        self.renders
    }

    /// Commands waiting for the first mount.
    pub fn queued_commands(&self) -> usize {
        self.queue.len()
    }

    pub fn emitter(&self) -> Emitter {
        Emitter::new(self.host.clone(), self.element)
    }

    fn observed(name: &str) -> Option<&'static str> {
        W::observed_attributes()
            .iter()
            .copied()
            .find(|observed| observed.eq_ignore_ascii_case(name))
    }
}

impl<W: CustomElement> StyleVarsExt for Component<W> {
    fn style_vars(&self) -> &StyleVars {
        &self.vars
    }

    fn style_vars_mut(&mut self) -> &mut StyleVars {
        &mut self.vars
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

impl<W: CustomElement> Component<W> {
    /// The value of `key`. `None` for absent keys and null values alike.
    pub fn get_state(&self, key: &str) -> Option<&str> {
        self.state.get(key)
    }

    pub fn has_state(&self, key: &str) -> bool {
        self.state.contains(key)
    }

    pub fn state_keys(&self) -> Vec<String> {
        self.state.keys()
    }

    pub fn state_entries(&self) -> Vec<(String, Option<String>)> {
        self.state.entries()
    }

    /// Set `key`, mirroring it onto the matching observed attribute.
    pub fn set_state(&mut self, key: &str, value: Option<&str>) {
        self.set_state_with(key, value, AttributeSync::Propagate);
    }

    pub fn set_state_with(&mut self, key: &str, value: Option<&str>, sync: AttributeSync) {
        self.batch(|c| c.apply_state(key, value, sync));
    }

    /// Apply every update, then render once.
    pub fn set_multiple_state<I, K, V>(&mut self, updates: I, sync: AttributeSync)
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.batch(|c| {
            for (key, value) in updates {
                c.apply_state(key.as_ref(), value.as_ref().map(|v| v.as_ref()), sync);
            }
        });
    }

    fn apply_state(&mut self, key: &str, value: Option<&str>, sync: AttributeSync) {
        let observed = Self::observed(key);
        let key = observed.unwrap_or(key);
        self.state.set(key, value);
        if sync == AttributeSync::Propagate {
            if let Some(name) = observed {
                self.write_attribute(name, value);
            }
        }
        self.request_render();
    }
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

impl<W: CustomElement> Component<W> {
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.host.borrow().attribute(self.element, name)
    }

    /// Set an attribute on the element. Observed attributes react synchronously.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.write_attribute(name, Some(value));
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.write_attribute(name, None);
    }

    fn write_attribute(&mut self, name: &str, value: Option<&str>) {
        let old = {
            let mut host = self.host.borrow_mut();
            match value {
                Some(value) => host.set_attribute(self.element, name, value),
                None => host.remove_attribute(self.element, name),
            }
        };
        if old.as_deref() != value {
            self.attribute_changed(name, old.as_deref(), value);
        }
    }

    /// The attribute-change reaction.
    ///
    /// Hosts that mutate attributes behind the component's back call this
    /// directly. Unobserved names are ignored.
    pub fn attribute_changed(&mut self, name: &str, old: Option<&str>, new: Option<&str>) {
        let Some(name) = Self::observed(name) else {
            return;
        };
        self.batch(|c| {
            c.state.set(name, new);
            if c.reaction_depth >= c.config.max_reaction_depth {
                warn!(
                    id = %c.id,
                    attribute = name,
                    depth = c.reaction_depth,
                    "attribute reaction depth cap reached, handler skipped"
                );
            } else {
                c.reaction_depth += 1;
                c.run_attribute_handler(name, old, new);
                c.reaction_depth -= 1;
            }
            c.request_render();
        });
    }

    fn run_attribute_handler(&mut self, name: &str, old: Option<&str>, new: Option<&str>) {
        let handler = handler_name(name);
        let result = if let Some(handler_fn) = self.handlers.get(&handler) {
            handler_fn(self, old, new)
        } else if let Some(index) = self.callbacks.iter().position(|(attr, _)| attr == name) {
            let Some(mut callback) = self.callbacks[index].1.take() else {
                return;
            };
            let result = callback(self, old, new);
            // The callback may have replaced itself while running.
            if let Some((_, slot)) = self.callbacks.iter_mut().find(|(attr, _)| attr == name) {
                if slot.is_none() {
                    *slot = Some(callback);
                }
            }
            result
        } else {
            return;
        };
        if let Err(err) = result {
            error!(id = %self.id, attribute = name, handler = %handler, error = %err, "attribute handler failed");
        }
    }

    /// Register an instance-level callback for `attribute`, used when the
    /// widget has no class-level handler for it.
    pub fn on_attribute_changed(
        &mut self,
        attribute: &str,
        callback: impl FnMut(&mut Component<W>, Option<&str>, Option<&str>) -> HandlerResult + 'static,
    ) {
        let attribute = attribute.to_ascii_lowercase();
        let callback: AttributeCallback<W> = Box::new(callback);
        match self.callbacks.iter_mut().find(|(attr, _)| *attr == attribute) {
            Some((_, slot)) => *slot = Some(callback),
            None => self.callbacks.push((attribute, Some(callback))),
        }
    }
}

// ---------------------------------------------------------------------------
// Listeners
// ---------------------------------------------------------------------------

impl<W: CustomElement> Component<W> {
    /// Listen on the component element.
    pub fn on(&mut self, event: &str, listener: Listener) {
        self.on_with(event, None, listener, ListenerOptions::default());
    }

    /// Listen on every descendant of the isolated subtree matching `selector`.
    ///
    /// Matches are taken when the registration attaches (now, if mounted, or
    /// at the next mount). Nodes added later are not covered.
    pub fn on_selector(&mut self, event: &str, selector: &str, listener: Listener) {
        self.on_with(event, Some(selector), listener, ListenerOptions::default());
    }

    pub fn on_with(
        &mut self,
        event: &str,
        selector: Option<&str>,
        listener: Listener,
        options: ListenerOptions,
    ) {
        let mounted = self.is_mounted();
        let registration = self
            .listeners
            .add(event, Registration::new(selector, listener, options));
        if mounted {
            attach(&self.host, self.element, self.shadow_root, event, registration);
        }
    }

    pub fn off(&mut self, event: &str, listener: &Listener) {
        self.off_with(event, None, listener);
    }

    pub fn off_selector(&mut self, event: &str, selector: &str, listener: &Listener) {
        self.off_with(event, Some(selector), listener);
    }

    /// Remove the first registration with this event, selector and listener.
    /// Unknown registrations are ignored.
    pub fn off_with(&mut self, event: &str, selector: Option<&str>, listener: &Listener) {
        let Some(mut removed) = self.listeners.remove_first(event, selector, listener) else {
            return;
        };
        detach(&self.host, event, &mut removed, self.listeners.get(event));
    }

    /// Dispatch a bubbling, composed notification from the element.
    pub fn emit(&self, name: &str, detail: impl Any) -> bool {
        self.emitter().emit(name, detail)
    }

    pub fn emit_with(&self, name: &str, detail: impl Any, init: EventInit) -> bool {
        self.emitter().emit_with(name, detail, init)
    }

    fn attach_all(&mut self) {
        let (host, element, shadow_root) = (&self.host, self.element, self.shadow_root);
        for (event, registration) in self.listeners.iter_mut() {
            attach(host, element, shadow_root, event, registration);
        }
    }

    fn detach_all(&mut self) {
        let host = &self.host;
        for (event, registration) in self.listeners.iter_mut() {
            detach(host, event, registration, &[]);
        }
    }
}

fn attach(
    host: &SharedHost,
    element: NodeId,
    shadow_root: NodeId,
    event: &str,
    registration: &mut Registration,
) {
    if registration.is_live() {
        return;
    }
    let targets = match registration.selector.as_deref() {
        None => vec![element],
        Some(selector) => match host.borrow().query_selector_all(shadow_root, selector) {
            Ok(nodes) => nodes,
            Err(err) => {
                warn!(event, selector, error = %err, "listener selector is invalid, not attached");
                Vec::new()
            }
        },
    };
    let mut host = host.borrow_mut();
    for &node in &targets {
        host.add_event_listener(node, event, registration.listener.clone(), registration.options);
    }
    registration.attached = targets;
}

/// Undo `attach`. A node stays attached while another registration in
/// `remaining` holds the same listener on it.
fn detach(host: &SharedHost, event: &str, registration: &mut Registration, remaining: &[Registration]) {
    let mut host = host.borrow_mut();
    for node in std::mem::take(&mut registration.attached) {
        let shared = remaining.iter().any(|other| {
            other.listener.same(&registration.listener)
                && other.options.capture == registration.options.capture
                && other.attached.contains(&node)
        });
        if !shared {
            host.remove_event_listener(node, event, &registration.listener, registration.options.capture);
        }
    }
}

// ---------------------------------------------------------------------------
// Commands and lifecycle
// ---------------------------------------------------------------------------

impl<W: CustomElement> Component<W> {
    /// Defer `command` until the first mount. Ignored once the component has
    /// been mounted.
    pub fn queue_command(&mut self, command: impl FnOnce(&mut Component<W>) -> HandlerResult + 'static) {
        if self.lifecycle.has_mounted() {
            debug!(id = %self.id, "command queued after first mount ignored");
            return;
        }
        self.queue.push(Box::new(command));
    }

    /// Append the element to `parent` and run the mount reaction if it is now
    /// in a live document.
    pub fn mount(&mut self, parent: NodeId) {
        self.host.borrow_mut().append_child(parent, self.element);
        if self.host.borrow().is_connected(self.element) {
            self.connected();
        }
    }

    /// Detach the element and run the unmount reaction.
    pub fn unmount(&mut self) {
        self.host.borrow_mut().detach(self.element);
        self.disconnected();
    }

    /// The mount reaction: attach every registration, drain the command queue
    /// on the first mount, render.
    pub fn connected(&mut self) {
        let Some(first) = self.lifecycle.on_mount() else {
            return;
        };
        debug!(id = %self.id, first, "component mounted");
        self.batch(|c| {
            c.attach_all();
            if first {
                for command in std::mem::take(&mut c.queue) {
                    let _ = command(c);
                }
            }
            c.request_render();
        });
    }

    /// The unmount reaction: detach every live registration.
    pub fn disconnected(&mut self) {
        if !self.lifecycle.on_unmount() {
            return;
        }
        self.detach_all();
        debug!(id = %self.id, "component unmounted");
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

impl<W: CustomElement> Component<W> {
    /// Request a render. Runs immediately unless a mutation is in progress.
    pub fn render(&mut self) {
        self.batch(Self::request_render);
    }

    fn request_render(&mut self) {
        self.render_pending = true;
    }

    fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.batch_depth += 1;
        let result = f(self);
        self.batch_depth -= 1;
        if self.batch_depth == 0 && self.render_pending {
            self.render_pending = false;
            self.render_now();
        }
        result
    }

    fn render_now(&mut self) {
        self.renders += 1;
        trace!(id = %self.id, render = self.renders, "render");
        let mut cx = RenderContext {
            host: &self.host,
            element: self.element,
            shadow_root: self.shadow_root,
            state: &self.state,
            vars: &mut self.vars,
        };
        self.widget.render(&mut cx);
        self.lifecycle.on_update();
    }
}

impl<W: CustomElement> fmt::Debug for Component<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("tag", &W::TAG)
            .field("element", &self.element)
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .field("queued", &self.queue.len())
            .field("phase", &self.lifecycle.phase())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, NodeData, ShadowMode};
    use crate::dom::DomError;
    use crate::event::{dispatch, Event};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Probe {
        size_calls: Vec<(Option<String>, Option<String>)>,
        color_hops: usize,
        rendered: Vec<String>,
    }

    impl Probe {
        fn on_size_changed(c: &mut Component<Self>, old: Option<&str>, new: Option<&str>) -> HandlerResult {
            c.widget_mut()
                .size_calls
                .push((old.map(str::to_owned), new.map(str::to_owned)));
            Ok(())
        }

        fn on_color_changed(c: &mut Component<Self>, _: Option<&str>, new: Option<&str>) -> HandlerResult {
            c.widget_mut().color_hops += 1;
            if let Some(n) = new.and_then(|v| v.parse::<u32>().ok()) {
                c.set_state("color", Some(&(n + 1).to_string()));
            }
            Ok(())
        }

        fn on_mode_changed(_: &mut Component<Self>, _: Option<&str>, new: Option<&str>) -> HandlerResult {
            match new {
                Some("bad") => Err("unsupported mode".into()),
                _ => Ok(()),
            }
        }
    }

    impl CustomElement for Probe {
        const TAG: &'static str = "x-probe";

        fn observed_attributes() -> &'static [&'static str] {
            &["size", "color", "mode", "tone"]
        }

        fn attribute_handlers() -> AttributeHandlers<Self> {
            AttributeHandlers::new()
                .on("size", Self::on_size_changed)
                .on("color", Self::on_color_changed)
                .on("mode", Self::on_mode_changed)
        }

        fn styles(&self) -> &str {
            ".btn { color: red; }"
        }

        fn template(&self) -> &str {
            r#"<span class="label"></span><button class="btn">x</button><button class="btn">y</button>"#
        }

        fn render(&mut self, cx: &mut RenderContext<'_>) {
            let label = cx.state_or("size", "none");
            cx.set_text(".label", label);
            self.rendered.push(label.to_owned());
        }
    }

    struct BadTag;

    impl CustomElement for BadTag {
        const TAG: &'static str = "Bad";
    }

    fn setup() -> (Rc<RefCell<Document>>, Component<Probe>) {
        let doc = Rc::new(RefCell::new(Document::new()));
        let component = Component::new(doc.clone(), Probe::default()).unwrap();
        (doc, component)
    }

    fn mounted() -> (Rc<RefCell<Document>>, Component<Probe>) {
        let (doc, mut component) = setup();
        let body = doc.borrow().body();
        component.mount(body);
        (doc, component)
    }

    fn buttons(doc: &Rc<RefCell<Document>>, c: &Component<Probe>) -> Vec<NodeId> {
        doc.borrow()
            .query_selector_all(c.shadow_root(), ".btn")
            .unwrap()
    }

    fn click(doc: &Rc<RefCell<Document>>, node: NodeId) {
        let host: SharedHost = doc.clone();
        let mut event = Event::with_init("click", EventInit::notification());
        dispatch(&host, node, &mut event);
    }

    fn counter() -> (Rc<RefCell<usize>>, Listener) {
        let hits = Rc::new(RefCell::new(0));
        let h = hits.clone();
        (hits, Listener::new(move |_| *h.borrow_mut() += 1))
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn subtree_layout() {
        let (doc, c) = setup();
        insta::assert_snapshot!(
            doc.borrow().inner_markup(c.shadow_root()),
            @r#"<style></style><style>.btn { color: red; }</style><span class="label"></span><button class="btn">x</button><button class="btn">y</button>"#
        );
        assert_eq!(doc.borrow().children(c.shadow_root())[0], c.style_vars().container());
    }

    #[test]
    fn upgrade_seeds_state_from_attributes() {
        let doc = Rc::new(RefCell::new(Document::new()));
        let element = doc
            .borrow_mut()
            .insert(NodeData::element("x-probe").with_attribute("size", "small"));
        let c = Component::upgrade(doc.clone(), element, Probe::default(), ComponentConfig::new()).unwrap();
        assert_eq!(c.get_state("size"), Some("small"));
        assert!(c.has_state("color"));
        assert_eq!(c.get_state("color"), None);
        assert_eq!(c.state_keys(), vec!["size", "color", "mode", "tone"]);
        assert_eq!(c.render_count(), 0);
    }

    #[test]
    fn upgrade_in_live_document_mounts() {
        let doc = Rc::new(RefCell::new(Document::new()));
        let element = {
            let mut d = doc.borrow_mut();
            let body = d.body();
            d.insert_child(body, NodeData::element("x-probe").with_attribute("size", "small"))
        };
        let mut c = Component::upgrade(doc.clone(), element, Probe::default(), ComponentConfig::new()).unwrap();
        assert!(c.is_mounted());
        assert_eq!(c.render_count(), 1);
        assert_eq!(c.widget().rendered, vec!["small"]);

        let (hits, listener) = counter();
        c.on_selector("click", ".btn", listener);
        click(&doc, buttons(&doc, &c)[0]);
        assert_eq!(*hits.borrow(), 1);

        c.queue_command(|_| Ok(()));
        assert_eq!(c.queued_commands(), 0);
    }

    #[test]
    fn construction_errors() {
        let doc = Rc::new(RefCell::new(Document::new()));
        assert_eq!(
            Component::new(doc.clone(), BadTag).unwrap_err(),
            ComponentError::InvalidTag("Bad".into())
        );

        let div = doc.borrow_mut().insert(NodeData::element("div"));
        assert!(matches!(
            Component::upgrade(doc.clone(), div, Probe::default(), ComponentConfig::new()),
            Err(ComponentError::TagMismatch { .. })
        ));

        let c = Component::new(doc.clone(), Probe::default()).unwrap();
        assert_eq!(
            Component::upgrade(doc.clone(), c.element(), Probe::default(), ComponentConfig::new()).unwrap_err(),
            ComponentError::Host(DomError::ShadowAlreadyAttached)
        );
    }

    #[test]
    fn closed_shadow_is_still_rendered() {
        let doc = Rc::new(RefCell::new(Document::new()));
        let config = ComponentConfig::new().with_shadow_mode(ShadowMode::Closed);
        let mut c = Component::with_config(doc.clone(), Probe::default(), config).unwrap();
        c.set_state("size", Some("large"));
        assert!(doc.borrow().text_content(c.shadow_root()).contains("large"));
    }

    #[test]
    fn instance_ids_are_unique() {
        let (_doc, a) = setup();
        let (_doc2, b) = setup();
        assert_ne!(a.id(), b.id());
    }

    // ── Attribute reaction ───────────────────────────────────────────

    #[test]
    fn attribute_change_updates_state_and_calls_handler() {
        let (_doc, mut c) = setup();
        c.set_attribute("size", "large");
        assert_eq!(c.get_state("size"), Some("large"));
        assert_eq!(c.widget().size_calls, vec![(None, Some("large".to_owned()))]);
        assert_eq!(c.render_count(), 1);
    }

    #[test]
    fn attribute_names_are_case_insensitive() {
        let (_doc, mut c) = setup();
        c.set_attribute("SIZE", "large");
        assert_eq!(c.get_state("size"), Some("large"));
        assert_eq!(c.attribute("size").as_deref(), Some("large"));
    }

    #[test]
    fn unobserved_attribute_does_not_react() {
        let (_doc, mut c) = setup();
        c.set_attribute("title", "hi");
        assert!(!c.has_state("title"));
        assert_eq!(c.render_count(), 0);
    }

    #[test]
    fn handler_failure_is_contained() {
        let (_doc, mut c) = setup();
        c.set_attribute("mode", "bad");
        assert_eq!(c.get_state("mode"), Some("bad"));
        assert_eq!(c.render_count(), 1);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn handler_failure_is_logged_as_error() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::ERROR)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let (_doc, mut c) = setup();
            c.set_attribute("mode", "bad");
            c.set_attribute("mode", "fine");
        });

        let text = logs.text();
        let records: Vec<&str> = text.lines().collect();
        assert_eq!(records.len(), 1, "{text}");
        let record = records[0];
        assert!(record.contains("ERROR"), "{record}");
        assert!(record.contains("attribute handler failed"), "{record}");
        assert!(record.contains("handler=onModeChanged"), "{record}");
        assert!(record.contains("unsupported mode"), "{record}");
    }

    #[test]
    fn reentrant_reactions_are_capped() {
        let (_doc, mut c) = setup();
        c.set_attribute("color", "0");
        assert_eq!(c.widget().color_hops, 8);
        assert_eq!(c.get_state("color"), Some("8"));
        assert_eq!(c.attribute("color").as_deref(), Some("8"));
        assert_eq!(c.render_count(), 1);
    }

    #[test]
    fn instance_callback_without_class_handler() {
        let (_doc, mut c) = setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        c.on_attribute_changed("tone", move |_, old, new| {
            s.borrow_mut().push((old.map(str::to_owned), new.map(str::to_owned)));
            Ok(())
        });
        c.set_attribute("tone", "warm");
        c.remove_attribute("tone");
        assert_eq!(
            *seen.borrow(),
            vec![(None, Some("warm".to_owned())), (Some("warm".to_owned()), None)]
        );
        assert_eq!(c.get_state("tone"), None);
    }

    #[test]
    fn class_handler_wins_over_instance_callback() {
        let (_doc, mut c) = setup();
        let hits = Rc::new(RefCell::new(0));
        let h = hits.clone();
        c.on_attribute_changed("size", move |_, _, _| {
            *h.borrow_mut() += 1;
            Ok(())
        });
        c.set_attribute("size", "large");
        assert_eq!(*hits.borrow(), 0);
        assert_eq!(c.widget().size_calls.len(), 1);
    }

    // ── State ────────────────────────────────────────────────────────

    #[test]
    fn set_state_propagates_to_observed_attribute() {
        let (_doc, mut c) = setup();
        c.set_state("size", Some("large"));
        assert_eq!(c.attribute("size").as_deref(), Some("large"));
        assert_eq!(c.widget().size_calls, vec![(None, Some("large".to_owned()))]);
        assert_eq!(c.render_count(), 1);
    }

    #[test]
    fn skip_leaves_attribute_alone() {
        let (_doc, mut c) = setup();
        c.set_state_with("size", Some("large"), AttributeSync::Skip);
        assert_eq!(c.get_state("size"), Some("large"));
        assert_eq!(c.attribute("size"), None);
        assert!(c.widget().size_calls.is_empty());
        assert_eq!(c.render_count(), 1);
    }

    #[test]
    fn unobserved_state_never_touches_dom() {
        let (_doc, mut c) = setup();
        c.set_state("pressed", Some("yes"));
        assert_eq!(c.get_state("pressed"), Some("yes"));
        assert_eq!(c.attribute("pressed"), None);
    }

    #[test]
    fn null_state_removes_attribute() {
        let (_doc, mut c) = setup();
        c.set_state("size", Some("large"));
        c.set_state("size", None);
        assert_eq!(c.attribute("size"), None);
        assert!(c.has_state("size"));
        assert_eq!(c.widget().size_calls.last(), Some(&(Some("large".to_owned()), None)));
    }

    #[test]
    fn set_multiple_state_renders_once() {
        let (_doc, mut c) = setup();
        c.set_multiple_state([("color", Some("red")), ("size", Some("large"))], AttributeSync::Propagate);
        assert_eq!(c.attribute("color").as_deref(), Some("red"));
        assert_eq!(c.attribute("size").as_deref(), Some("large"));
        assert_eq!(c.render_count(), 1);
        assert_eq!(c.widget().rendered, vec!["large"]);
    }

    #[test]
    fn state_entries_are_snapshots() {
        let (_doc, mut c) = setup();
        let before = c.state_entries();
        c.set_state("size", Some("large"));
        assert_eq!(before[0], ("size".to_owned(), None));
        assert_eq!(c.state_entries()[0], ("size".to_owned(), Some("large".to_owned())));
    }

    // ── Listeners ────────────────────────────────────────────────────

    #[test]
    fn selector_listener_registered_before_mount() {
        let (doc, mut c) = setup();
        let (hits, listener) = counter();
        c.on_selector("click", ".btn", listener);
        let btns = buttons(&doc, &c);
        assert!(doc.borrow().listeners_for(btns[0], "click").is_empty());

        let body = doc.borrow().body();
        c.mount(body);
        for &btn in &btns {
            assert_eq!(doc.borrow().listeners_for(btn, "click").len(), 1);
        }
        click(&doc, btns[0]);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn root_listener_attaches_to_element() {
        let (doc, mut c) = mounted();
        let (hits, listener) = counter();
        c.on("click", listener);
        click(&doc, c.element());
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn on_off_symmetry() {
        let (doc, mut c) = mounted();
        let btns = buttons(&doc, &c);
        let before: Vec<usize> = btns
            .iter()
            .map(|&b| doc.borrow().listeners_for(b, "click").len())
            .collect();

        let (_hits, listener) = counter();
        c.on_selector("click", ".btn", listener.clone());
        c.off_selector("click", ".btn", &listener);

        let after: Vec<usize> = btns
            .iter()
            .map(|&b| doc.borrow().listeners_for(b, "click").len())
            .collect();
        assert_eq!(before, after);
        assert!(c.listeners().is_empty());
    }

    #[test]
    fn off_removes_first_match_only() {
        let (doc, mut c) = mounted();
        let btn = buttons(&doc, &c)[0];
        let (hits, listener) = counter();
        c.on_selector("click", ".btn", listener.clone());
        c.on_selector("click", ".btn", listener.clone());

        c.off_selector("click", ".btn", &listener);
        assert_eq!(c.listeners().len(), 1);
        click(&doc, btn);
        assert_eq!(*hits.borrow(), 1);

        c.off_selector("click", ".btn", &listener);
        click(&doc, btn);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn off_unknown_is_noop() {
        let (_doc, mut c) = mounted();
        let (_hits, listener) = counter();
        c.off("click", &listener);
        c.off_selector("click", ".btn", &listener);
        assert!(c.listeners().is_empty());
    }

    #[test]
    fn selector_snapshot_misses_later_nodes() {
        let (doc, mut c) = mounted();
        let (hits, listener) = counter();
        c.on_selector("click", ".btn", listener);
        let late = {
            let mut d = doc.borrow_mut();
            d.insert_child(c.shadow_root(), NodeData::element("button").with_attribute("class", "btn"))
        };
        click(&doc, late);
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn invalid_selector_attaches_nothing() {
        let (_doc, mut c) = mounted();
        let (_hits, listener) = counter();
        c.on_selector("click", "[", listener);
        assert_eq!(c.listeners().len(), 1);
        assert!(c.listeners().get("click")[0].attached().is_empty());
    }

    #[test]
    fn unmount_detaches_and_remount_reattaches() {
        let (doc, mut c) = mounted();
        let btn = buttons(&doc, &c)[0];
        let (hits, listener) = counter();
        c.on_selector("click", ".btn", listener);

        c.unmount();
        assert!(!c.is_mounted());
        assert!(doc.borrow().listeners_for(btn, "click").is_empty());
        assert_eq!(c.listeners().len(), 1);

        let body = doc.borrow().body();
        c.mount(body);
        click(&doc, btn);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn emit_bubbles_out_of_component() {
        let (doc, c) = mounted();
        let seen = Rc::new(RefCell::new(None));
        let s = seen.clone();
        let body = doc.borrow().body();
        doc.borrow_mut().add_listener(
            body,
            "press",
            Listener::new(move |e| *s.borrow_mut() = e.detail_ref::<u8>().copied()),
            ListenerOptions::new(),
        );
        assert!(c.emit("press", 5u8));
        assert_eq!(*seen.borrow(), Some(5));
    }

    // ── Commands and lifecycle ───────────────────────────────────────

    #[test]
    fn queue_drains_once_in_order() {
        let (doc, mut c) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        for n in 1..=3 {
            let log = log.clone();
            c.queue_command(move |_| {
                log.borrow_mut().push(n);
                if n == 2 {
                    return Err("failed".into());
                }
                Ok(())
            });
        }
        c.queue_command(|c| {
            c.set_state("size", Some("queued"));
            Ok(())
        });
        assert_eq!(c.queued_commands(), 4);

        let body = doc.borrow().body();
        c.mount(body);
        assert_eq!(*log.borrow(), vec![1, 2, 3]);
        assert_eq!(c.get_state("size"), Some("queued"));
        assert_eq!(c.render_count(), 1);

        let late = log.clone();
        c.queue_command(move |_| {
            late.borrow_mut().push(99);
            Ok(())
        });
        assert_eq!(c.queued_commands(), 0);
        c.unmount();
        c.mount(body);
        assert_eq!(*log.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn mount_into_detached_parent_waits() {
        let (doc, mut c) = setup();
        let detached = doc.borrow_mut().insert(NodeData::element("div"));
        c.mount(detached);
        assert!(!c.is_mounted());
        c.connected();
        assert!(c.is_mounted());
    }

    #[test]
    fn lifecycle_events_recorded() {
        let (_doc, mut c) = mounted();
        c.unmount();
        assert_eq!(
            c.lifecycle_mut().pending_events(),
            vec![
                crate::component::LifecycleEvent::Mount { first: true },
                crate::component::LifecycleEvent::Update,
                crate::component::LifecycleEvent::Unmount,
            ]
        );
    }

    #[test]
    fn repeated_renders_do_not_accumulate_events() {
        let (_doc, mut c) = mounted();
        for i in 0..10_000 {
            c.set_state("size", Some(&i.to_string()));
        }
        assert_eq!(c.render_count(), 10_001);
        assert_eq!(c.lifecycle_mut().pending_events().len(), 2);

        c.set_state("size", Some("again"));
        assert_eq!(
            c.lifecycle_mut().pending_events(),
            vec![crate::component::LifecycleEvent::Update]
        );
    }

    #[test]
    fn render_is_idempotent() {
        let (doc, mut c) = mounted();
        c.set_state("size", Some("large"));
        c.render();
        let first = doc.borrow().inner_markup(c.shadow_root());
        c.render();
        let second = doc.borrow().inner_markup(c.shadow_root());
        assert_eq!(first, second);
        assert_eq!(c.render_count(), 4);
    }

    #[test]
    fn style_vars_on_component() {
        let (doc, mut c) = setup();
        c.style_vars_mut().set("buttonRadius", "10px");
        assert_eq!(
            doc.borrow().text_content(c.style_vars().container()),
            ":host { --button-radius: 10px; }"
        );
        c.assign_vars([("buttonRadius", None::<&str>)]);
        assert!(!c.style_vars().has("buttonRadius"));
    }

    #[test]
    fn document_scoped_vars() {
        let doc = Rc::new(RefCell::new(Document::new()));
        let config = ComponentConfig::new().with_var_scope(VarScope::Document);
        let mut c = Component::with_config(doc.clone(), Probe::default(), config).unwrap();
        c.style_vars_mut().set("glow", "1");
        let d = doc.borrow();
        assert_eq!(d.parent(c.style_vars().container()), Some(d.head()));
        assert!(d.inner_markup(c.shadow_root()).starts_with("<style>.btn"));
    }
}
