//! Glow button: a labelled button that emits `press` when clicked.

use crate::component::{
    AttributeHandlers, Component, ComponentError, CustomElement, HandlerResult, RenderContext,
};
use crate::event::Listener;
use crate::host::SharedHost;
use crate::vars::StyleVarsExt;

const STYLES: &str = "\
:host { display: inline-block; }
.btn { padding: var(--button-padding, 8px 18px); border-radius: var(--button-radius, 6px); }
.btn[data-variant=primary] { box-shadow: 0 0 var(--glow-radius, 8px) var(--glow-color, currentColor); }
.btn[disabled] { opacity: 0.5; }";

const TEMPLATE: &str = r#"<button class="btn" part="button"></button>"#;

/// Payload of the `press` notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Press {
    pub label: Option<String>,
}

/// `<glint-button label variant size disabled>`.
///
/// Build it with [`GlowButton::create`], which wires the click handling.
#[derive(Debug, Default)]
pub struct GlowButton;

impl GlowButton {
    pub fn create(host: SharedHost) -> Result<Component<Self>, ComponentError> {
        let mut component = Component::new(host, GlowButton)?;
        let emitter = component.emitter();
        component.on_selector(
            "click",
            ".btn",
            Listener::new(move |_| {
                if emitter.attribute("disabled").is_some() {
                    return;
                }
                let label = emitter.attribute("label");
                emitter.emit("press", Press { label });
            }),
        );
        Ok(component)
    }

    /// Padding for a `size` value. Unknown sizes fall back to medium.
    pub fn padding_for(size: Option<&str>) -> &'static str {
        match size {
            Some("small") => "4px 10px",
            Some("large") => "12px 28px",
            _ => "8px 18px",
        }
    }

    fn on_size_changed(c: &mut Component<Self>, _old: Option<&str>, new: Option<&str>) -> HandlerResult {
        c.style_vars_mut().set("buttonPadding", Self::padding_for(new));
        Ok(())
    }
}

impl CustomElement for GlowButton {
    const TAG: &'static str = "glint-button";

    fn observed_attributes() -> &'static [&'static str] {
        &["label", "variant", "size", "disabled"]
    }

    fn attribute_handlers() -> AttributeHandlers<Self> {
        AttributeHandlers::new().on("size", Self::on_size_changed)
    }

    fn styles(&self) -> &str {
        STYLES
    }

    fn template(&self) -> &str {
        TEMPLATE
    }

    fn render(&mut self, cx: &mut RenderContext<'_>) {
        let Some(btn) = cx.query_one(".btn") else {
            return;
        };
        let label = cx.state_or("label", "");
        let variant = cx.state_or("variant", "default");
        let disabled = cx.state("disabled").is_some();
        cx.set_text(".btn", label);
        cx.set_attribute(btn, "data-variant", Some(variant));
        cx.set_attribute(btn, "disabled", disabled.then_some(""));
        cx.set_attribute(btn, "aria-disabled", Some(if disabled { "true" } else { "false" }));
    }
}
