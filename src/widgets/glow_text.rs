//! Text with an adjustable glow.

use thiserror::Error;

use crate::component::{AttributeHandlers, Component, CustomElement, HandlerResult, RenderContext};
use crate::vars::StyleVarsExt;

const STYLES: &str = "\
:host { display: inline; }
.glow { text-shadow: 0 0 var(--glow-radius, 6px) var(--glow-color, currentColor); }";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown glow intensity `{0}`")]
pub struct UnknownIntensity(pub String);

/// `<glint-glow-text text intensity>`.
#[derive(Debug, Default)]
pub struct GlowText;

impl GlowText {
    pub fn radius_for(intensity: &str) -> Result<&'static str, UnknownIntensity> {
        match intensity {
            "low" => Ok("2px"),
            "medium" => Ok("6px"),
            "high" => Ok("12px"),
            other => Err(UnknownIntensity(other.to_owned())),
        }
    }

    fn on_intensity_changed(c: &mut Component<Self>, _old: Option<&str>, new: Option<&str>) -> HandlerResult {
        let Some(intensity) = new else {
            c.style_vars_mut().remove("glowRadius");
            return Ok(());
        };
        let radius = Self::radius_for(intensity)?;
        c.style_vars_mut().set("glowRadius", radius);
        Ok(())
    }
}

impl CustomElement for GlowText {
    const TAG: &'static str = "glint-glow-text";

    fn observed_attributes() -> &'static [&'static str] {
        &["text", "intensity"]
    }

    fn attribute_handlers() -> AttributeHandlers<Self> {
        AttributeHandlers::new().on("intensity", Self::on_intensity_changed)
    }

    fn styles(&self) -> &str {
        STYLES
    }

    fn template(&self) -> &str {
        r#"<span class="glow"></span>"#
    }

    fn render(&mut self, cx: &mut RenderContext<'_>) {
        let text = cx.state_or("text", "");
        cx.set_text(".glow", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn intensity_maps_to_radius() {
        let doc = Rc::new(RefCell::new(Document::new()));
        let mut text = Component::new(doc.clone(), GlowText).unwrap();
        text.set_attribute("intensity", "high");
        assert_eq!(text.style_vars().get("glowRadius").as_deref(), Some("12px"));

        text.set_attribute("intensity", "blinding");
        assert_eq!(text.style_vars().get("glowRadius").as_deref(), Some("12px"));

        text.remove_attribute("intensity");
        assert!(!text.style_vars().has("glowRadius"));
    }

    #[test]
    fn renders_text() {
        let doc = Rc::new(RefCell::new(Document::new()));
        let mut text = Component::new(doc.clone(), GlowText).unwrap();
        text.set_state("text", Some("neon <3"));
        insta::assert_snapshot!(
            doc.borrow().inner_markup(text.shadow_root()),
            @r#"<style></style><style>:host { display: inline; }
.glow { text-shadow: 0 0 var(--glow-radius, 6px) var(--glow-color, currentColor); }</style><span class="glow">neon &lt;3</span>"#
        );
    }
}
