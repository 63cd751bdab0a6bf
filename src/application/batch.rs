//! Batched weight updates followed by a single notification.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{split_path, DomainError, TreeContainer};

/// One weight mutation addressed by a slash-joined label path.
#[derive(Debug, Clone, PartialEq)]
pub enum WeightChange {
    Set { path: String, weight: f64 },
    Add { path: String, delta: f64 },
}

impl WeightChange {
    pub fn path(&self) -> &str {
        match self {
            WeightChange::Set { path, .. } | WeightChange::Add { path, .. } => path,
        }
    }

    fn apply(&self, container: &mut TreeContainer) -> Result<(), DomainError> {
        let segments = split_path(self.path());
        match self {
            WeightChange::Set { weight, .. } => container.set_weight_at_path(*weight, &segments),
            WeightChange::Add { delta, .. } => container.add_weight_at_path(*delta, &segments),
        }
    }
}

impl fmt::Display for WeightChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightChange::Set { path, weight } => write!(f, "{} = {}", path, weight),
            WeightChange::Add { path, delta } => write!(f, "{} += {}", path, delta),
        }
    }
}

/// Parses the `PATH=VALUE` form; the caller decides whether it sets or adds.
pub fn parse_assignment(s: &str) -> Result<(String, f64), String> {
    let (path, value) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected PATH=VALUE, got {:?}", s))?;
    let path = path.trim();
    if path.is_empty() {
        return Err(format!("empty path in {:?}", s));
    }
    let value =
        f64::from_str(value.trim()).map_err(|e| format!("invalid number in {:?}: {}", s, e))?;
    Ok((path.to_string(), value))
}

/// Applies `changes` in order, then fires one weights-changed notification.
///
/// All or nothing: if any change fails, weights touched so far are restored,
/// no notification is sent and the error is returned.
pub fn apply_batch(
    container: &mut TreeContainer,
    changes: &[WeightChange],
) -> ApplicationResult<usize> {
    let mut undo: Vec<(String, f64)> = Vec::with_capacity(changes.len());
    for change in changes {
        let segments = split_path(change.path());
        let previous = container
            .find_path(&segments)
            .ok()
            .and_then(|id| container.node(id))
            .map(|n| n.weight());
        if let Err(e) = change.apply(container) {
            warn!("{} failed: {}, rolling back {} changes", change, e, undo.len());
            for (path, weight) in undo.iter().rev() {
                let _ = container.set_weight_at_path(*weight, &split_path(path));
            }
            return Err(ApplicationError::from(e));
        }
        if let Some(previous) = previous {
            undo.push((change.path().to_string(), previous));
        }
        debug!("applied {}", change);
    }
    if !changes.is_empty() {
        container.notify_weights_changed();
    }
    Ok(changes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("A/B=2.5"), Ok(("A/B".to_string(), 2.5)));
        assert_eq!(parse_assignment(" A = -1 "), Ok(("A".to_string(), -1.0)));
        assert!(parse_assignment("A/B").is_err());
        assert!(parse_assignment("=3").is_err());
        assert!(parse_assignment("A=x").is_err());
    }
}
