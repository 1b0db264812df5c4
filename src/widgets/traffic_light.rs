//! Three-lamp traffic light driven by a `state` attribute.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::component::{AttributeHandlers, Component, CustomElement, HandlerResult, RenderContext};

const STYLES: &str = "\
:host { display: inline-flex; }
.housing { display: flex; flex-direction: column; gap: var(--lamp-gap, 4px); }
.lamp { width: var(--lamp-size, 16px); height: var(--lamp-size, 16px); border-radius: 50%; opacity: 0.2; }
.lamp.on { opacity: 1; box-shadow: 0 0 var(--glow-radius, 8px) currentColor; }";

const TEMPLATE: &str = r#"<div class="housing"><span class="lamp red"></span><span class="lamp yellow"></span><span class="lamp green"></span></div>"#;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LightState {
    Red,
    Yellow,
    Green,
    #[default]
    Off,
}

impl LightState {
    pub const LAMPS: [LightState; 3] = [LightState::Red, LightState::Yellow, LightState::Green];

    pub fn as_str(self) -> &'static str {
        match self {
            LightState::Red => "red",
            LightState::Yellow => "yellow",
            LightState::Green => "green",
            LightState::Off => "off",
        }
    }

    /// The next state in the red → green → yellow → red cycle. `Off` starts at red.
    pub fn next(self) -> Self {
        match self {
            LightState::Red => LightState::Green,
            LightState::Green => LightState::Yellow,
            LightState::Yellow | LightState::Off => LightState::Red,
        }
    }
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown traffic light state `{0}`")]
pub struct UnknownLightState(pub String);

impl FromStr for LightState {
    type Err = UnknownLightState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(LightState::Red),
            "yellow" => Ok(LightState::Yellow),
            "green" => Ok(LightState::Green),
            "off" | "" => Ok(LightState::Off),
            _ => Err(UnknownLightState(s.to_owned())),
        }
    }
}

/// `<glint-traffic-light state>`.
#[derive(Debug, Default)]
pub struct TrafficLight;

impl TrafficLight {
    /// Move to the next state of the cycle.
    pub fn advance(c: &mut Component<Self>) {
        let next = Self::current(c).next();
        c.set_state("state", Some(next.as_str()));
    }

    /// The current state. Absent or unknown values read as `Off`.
    pub fn current(c: &Component<Self>) -> LightState {
        c.get_state("state")
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    fn on_state_changed(_c: &mut Component<Self>, _old: Option<&str>, new: Option<&str>) -> HandlerResult {
        if let Some(value) = new {
            value.parse::<LightState>()?;
        }
        Ok(())
    }
}

impl CustomElement for TrafficLight {
    const TAG: &'static str = "glint-traffic-light";

    fn observed_attributes() -> &'static [&'static str] {
        &["state"]
    }

    fn attribute_handlers() -> AttributeHandlers<Self> {
        AttributeHandlers::new().on("state", Self::on_state_changed)
    }

    fn styles(&self) -> &str {
        STYLES
    }

    fn template(&self) -> &str {
        TEMPLATE
    }

    fn render(&mut self, cx: &mut RenderContext<'_>) {
        let active: LightState = cx
            .state("state")
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();
        for lamp in LightState::LAMPS {
            let selector = format!(".lamp.{lamp}");
            if let Some(node) = cx.query_one(&selector) {
                cx.toggle_class(node, "on", lamp == active);
            }
        }
    }
}
