//! Component errors.

use thiserror::Error;

use crate::dom::DomError;

/// Failure reported by an attribute handler or queued command.
///
/// These never escape the component: handler failures are logged and
/// command failures are dropped.
pub type HandlerError = Box<dyn std::error::Error>;

pub type HandlerResult = Result<(), HandlerError>;

/// Errors from constructing a component.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComponentError {
    /// The host refused to create the isolated subtree.
    #[error("host error: {0}")]
    Host(#[from] DomError),

    /// Custom element tags must be lowercase, start with a letter and contain a hyphen.
    #[error("invalid custom element tag `{0}`")]
    InvalidTag(String),

    /// `upgrade` was given an element whose tag differs from the widget's.
    #[error("cannot upgrade `<{found}>` as `<{expected}>`")]
    TagMismatch { expected: String, found: String },
}
