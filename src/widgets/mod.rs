//! Built-in widgets: GlowButton, Rule, TrafficLight, GlowText.

pub mod button;
pub mod glow_text;
pub mod rule;
pub mod traffic_light;

pub use button::{GlowButton, Press};
pub use glow_text::{GlowText, UnknownIntensity};
pub use rule::Rule;
pub use traffic_light::{LightState, TrafficLight, UnknownLightState};
