//! Application layer: tree documents and batched weight updates
//!
//! This layer feeds the domain from files and hands results to the view.

pub mod batch;
pub mod document;
pub mod error;
pub mod error_ext;

pub use batch::{apply_batch, parse_assignment, WeightChange};
pub use document::{NodeSpec, TreeDocument};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
