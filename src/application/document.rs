//! Tree documents: a TOML description of a weighted forest.
//!
//! ```toml
//! [[node]]
//! label = "A"
//! weight = 3.0
//! color = 1
//! icon = 7
//!
//!   [[node.children]]
//!   label = "B"
//!   weight = 1.0
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{NodeId, NodeTags, TreeContainer};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeDocument {
    #[serde(default, rename = "node")]
    pub roots: Vec<NodeSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub label: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub color: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    fn tags(&self) -> NodeTags {
        NodeTags::new(self.color, self.icon)
    }
}

impl TreeDocument {
    /// Parse document content; `origin` is only used in error messages.
    pub fn parse(content: &str, origin: &Path) -> ApplicationResult<Self> {
        let doc: Self = toml::from_str(content).map_err(|e| ApplicationError::Document {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
        doc.validate(origin)?;
        Ok(doc)
    }

    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> ApplicationResult<Self> {
        let content = fs::read_to_string(path).with_path_context("read tree document", path)?;
        Self::parse(&content, path)
    }

    /// Labels become path segments, so they must be non-empty and slash-free.
    fn validate(&self, origin: &Path) -> ApplicationResult<()> {
        fn check(specs: &[NodeSpec], prefix: &str, origin: &Path) -> ApplicationResult<()> {
            let mut seen = HashSet::new();
            for spec in specs {
                if spec.label.is_empty() || spec.label.contains('/') {
                    return Err(ApplicationError::Document {
                        path: origin.to_path_buf(),
                        message: format!("invalid label {:?} under {:?}", spec.label, prefix),
                    });
                }
                let path = if prefix.is_empty() {
                    spec.label.clone()
                } else {
                    format!("{}/{}", prefix, spec.label)
                };
                if !seen.insert(spec.label.as_str()) {
                    warn!("duplicate path {}, lookups resolve to the first one", path);
                }
                check(&spec.children, &path, origin)?;
            }
            Ok(())
        }
        check(&self.roots, "", origin)
    }

    /// Builds a fresh container holding this document's forest.
    pub fn to_container(&self) -> ApplicationResult<TreeContainer> {
        let mut container = TreeContainer::new();
        self.populate(&mut container)?;
        Ok(container)
    }

    /// Appends this document's forest to `container`, in document order.
    ///
    /// Does not notify; the caller decides when the structure change is announced.
    pub fn populate(&self, container: &mut TreeContainer) -> ApplicationResult<()> {
        fn add_children(
            container: &mut TreeContainer,
            parent: NodeId,
            specs: &[NodeSpec],
        ) -> ApplicationResult<()> {
            for spec in specs {
                let id = container.add_child(parent, &spec.label, spec.weight, spec.tags())?;
                add_children(container, id, &spec.children)?;
            }
            Ok(())
        }

        for spec in &self.roots {
            let id = container.add_root(&spec.label, spec.weight, spec.tags())?;
            add_children(container, id, &spec.children)?;
        }
        debug!("populated container: {}", container);
        Ok(())
    }

    /// Snapshot of a container's current forest.
    pub fn from_container(container: &TreeContainer) -> Self {
        fn spec_of(container: &TreeContainer, id: NodeId) -> Option<NodeSpec> {
            let node = container.node(id)?;
            Some(NodeSpec {
                label: node.label().to_string(),
                weight: node.weight(),
                color: node.tags().color,
                icon: node.tags().icon,
                children: node
                    .children()
                    .iter()
                    .filter_map(|&child| spec_of(container, child))
                    .collect(),
            })
        }
        Self {
            roots: container
                .roots()
                .iter()
                .filter_map(|&id| spec_of(container, id))
                .collect(),
        }
    }

    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Document {
            path: PathBuf::from("<memory>"),
            message: e.to_string(),
        })
    }
}
