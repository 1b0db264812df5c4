//! Per-component configuration.

use crate::dom::node::ShadowMode;
use crate::vars::VarScope;

/// Configuration applied when a component is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentConfig {
    /// Mode of the isolated subtree.
    pub shadow_mode: ShadowMode,
    /// Where style variables apply.
    pub var_scope: VarScope,
    /// Maximum nesting of attribute-change reactions. Deeper reactions still
    /// update state but skip the handler.
    pub max_reaction_depth: usize,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            shadow_mode: ShadowMode::Open,
            var_scope: VarScope::Host,
            max_reaction_depth: 8,
        }
    }
}

impl ComponentConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shadow mode (builder).
    pub fn with_shadow_mode(mut self, mode: ShadowMode) -> Self {
        self.shadow_mode = mode;
        self
    }

    /// Set the variable scope (builder).
    pub fn with_var_scope(mut self, scope: VarScope) -> Self {
        self.var_scope = scope;
        self
    }

    /// Set the reaction depth cap (builder).
    pub fn with_max_reaction_depth(mut self, depth: usize) -> Self {
        self.max_reaction_depth = depth;
        self
    }
}
