//! Horizontal rule with configurable thickness and tone.

use crate::component::{AttributeHandlers, Component, CustomElement, HandlerResult, RenderContext};
use crate::vars::StyleVarsExt;

const STYLES: &str = "\
:host { display: block; }
.rule { border: none; height: var(--rule-thickness, 1px); }
.rule[data-tone=bright] { box-shadow: 0 0 6px currentColor; }";

/// `<glint-rule thickness tone>`.
#[derive(Debug, Default)]
pub struct Rule;

impl Rule {
    /// A bare number is read as pixels. Other values pass through.
    pub fn thickness_value(thickness: &str) -> String {
        let thickness = thickness.trim();
        if !thickness.is_empty() && thickness.chars().all(|c| c.is_ascii_digit() || c == '.') {
            format!("{thickness}px")
        } else {
            thickness.to_owned()
        }
    }

    fn on_thickness_changed(c: &mut Component<Self>, _old: Option<&str>, new: Option<&str>) -> HandlerResult {
        match new {
            Some(value) => c.style_vars_mut().set("ruleThickness", &Self::thickness_value(value)),
            None => {
                c.style_vars_mut().remove("ruleThickness");
            }
        }
        Ok(())
    }
}

impl CustomElement for Rule {
    const TAG: &'static str = "glint-rule";

    fn observed_attributes() -> &'static [&'static str] {
        &["thickness", "tone"]
    }

    fn attribute_handlers() -> AttributeHandlers<Self> {
        AttributeHandlers::new().on("thickness", Self::on_thickness_changed)
    }

    fn styles(&self) -> &str {
        STYLES
    }

    fn template(&self) -> &str {
        r#"<hr class="rule">"#
    }

    fn render(&mut self, cx: &mut RenderContext<'_>) {
        if let Some(hr) = cx.query_one(".rule") {
            let tone = cx.state("tone");
            cx.set_attribute(hr, "data-tone", tone);
        }
    }
}
