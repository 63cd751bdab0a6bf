//! Render-adapter errors

use thiserror::Error;

use crate::layout::LayoutDomain;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("no geometry for the {0} domain")]
    UnsupportedDomain(LayoutDomain),
}

/// Result type for render-adapter operations.
pub type RenderResult<T> = Result<T, RenderError>;
