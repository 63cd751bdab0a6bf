//! Domain layer: the weighted tree and its change notifications
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod container;
pub mod error;
pub mod events;

pub use arena::{validate_weight, NodeId, NodeTags, TreeArena, TreeNode};
pub use container::{join_segments, split_path, TreeContainer};
pub use error::{DomainError, DomainResult};
pub use events::{ListenerId, ListenerRegistry, TreeEvent};
