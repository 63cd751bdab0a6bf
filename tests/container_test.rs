//! Integration tests for the tree model and the container around it.

use std::cell::RefCell;
use std::rc::Rc;

use rstest::{fixture, rstest};

use sunburst::domain::{DomainError, NodeId, NodeTags, TreeContainer, TreeEvent};

/// ```text
/// fruit (0)
/// ├── apple (3)
/// │   ├── red (1)
/// │   └── green (2)
/// └── pear (1)
/// veg (4)
/// ```
#[fixture]
fn container() -> TreeContainer {
    let tags = NodeTags::default();
    let mut c = TreeContainer::new();
    let fruit = c.add_root_unweighted("fruit", tags);
    let apple = c.add_child(fruit, "apple", 3.0, tags).unwrap();
    c.add_child(apple, "red", 1.0, tags).unwrap();
    c.add_child(apple, "green", 2.0, tags).unwrap();
    c.add_child(fruit, "pear", 1.0, tags).unwrap();
    c.add_root("veg", 4.0, tags).unwrap();
    c
}

fn weights(c: &TreeContainer) -> Vec<(String, f64)> {
    c.tree()
        .iter()
        .map(|(id, node)| (c.tree().path(id).unwrap(), node.weight()))
        .collect()
}

// ============================================================
// Structure
// ============================================================

#[rstest]
fn given_forest_when_walking_then_every_child_is_one_deeper_than_its_parent(
    container: TreeContainer,
) {
    for (id, node) in container.tree().iter() {
        match node.parent() {
            None => assert_eq!(node.depth(), 1, "{}", node),
            Some(parent) => assert_eq!(
                node.depth(),
                container.tree().depth(parent).unwrap() + 1,
                "{:?}",
                id
            ),
        }
    }
    assert_eq!(container.max_depth(), 3);
    assert_eq!(container.roots().len(), 2);
}

#[rstest]
fn given_forest_when_resolving_paths_then_labels_are_matched_level_by_level(
    container: TreeContainer,
) {
    let green = container.find_path(&["fruit", "apple", "green"]).unwrap();
    assert_eq!(container.node(green).unwrap().label(), "green");
    assert_eq!(
        container.tree().path(green).as_deref(),
        Some("fruit/apple/green")
    );

    // intermediate segment that matches no sibling
    assert_eq!(
        container.find_path(&["fruit", "plum", "green"]),
        Err(DomainError::PathNotFound {
            path: "fruit/plum/green".into()
        })
    );
    // a label that only exists one level deeper
    assert!(container.find_path(&["apple"]).is_err());
    let empty: [&str; 0] = [];
    assert!(container.find_path(&empty).is_err());
}

#[test]
fn given_duplicate_sibling_labels_when_resolving_then_first_match_wins() {
    let mut c = TreeContainer::new();
    let first = c.add_root("a", 1.0, NodeTags::default()).unwrap();
    c.add_root("a", 2.0, NodeTags::default()).unwrap();

    assert_eq!(c.find_path(&["a"]), Ok(first));
}

#[test]
fn given_missing_parent_when_adding_child_then_invalid_node() {
    let mut other = TreeContainer::new();
    let foreign: NodeId = other.add_root("x", 1.0, NodeTags::default()).unwrap();
    let mut c = TreeContainer::new();

    let err = c.add_child(foreign, "y", 1.0, NodeTags::default()).unwrap_err();

    assert_eq!(err, DomainError::InvalidNode(foreign));
    assert!(c.tree().is_empty());
}

// ============================================================
// Weight mutation
// ============================================================

#[rstest]
fn given_existing_path_when_setting_weight_then_exactly_one_node_changes(
    mut container: TreeContainer,
) {
    let before = weights(&container);

    container
        .set_weight_at_path(9.0, &["fruit", "apple", "red"])
        .unwrap();

    let after = weights(&container);
    let changed: Vec<&str> = before
        .iter()
        .zip(after.iter())
        .filter(|(b, a)| b.1 != a.1)
        .map(|(_, a)| a.0.as_str())
        .collect();
    assert_eq!(changed, vec!["fruit/apple/red"]);
}

#[rstest]
fn given_unknown_path_when_setting_weight_then_not_found_and_nothing_changes(
    mut container: TreeContainer,
) {
    let before = weights(&container);

    let err = container
        .set_weight_at_path(9.0, &["fruit", "banana", "red"])
        .unwrap_err();

    assert!(matches!(err, DomainError::PathNotFound { .. }));
    assert_eq!(weights(&container), before);
}

#[rstest]
#[case(0.5)]
#[case(2.0)]
#[case(-1.0)]
fn given_delta_when_adding_and_subtracting_then_weight_round_trips(
    mut container: TreeContainer,
    #[case] delta: f64,
) {
    let path = ["fruit", "apple"];

    container.add_weight_at_path(delta, &path).unwrap();
    container.add_weight_at_path(-delta, &path).unwrap();

    let apple = container.find_path(&path).unwrap();
    assert_eq!(container.node(apple).unwrap().weight(), 3.0);
}

#[rstest]
fn given_delta_below_zero_when_adding_then_rejected_and_weight_kept(
    mut container: TreeContainer,
) {
    let err = container.add_weight_at_path(-5.0, &["veg"]).unwrap_err();

    assert_eq!(err, DomainError::InvalidWeight { weight: -1.0 });
    let veg = container.find_path(&["veg"]).unwrap();
    assert_eq!(container.node(veg).unwrap().weight(), 4.0);
}

#[test]
fn given_negative_weight_when_creating_node_then_rejected() {
    let mut c = TreeContainer::new();
    assert!(c.add_root("a", -1.0, NodeTags::default()).is_err());
    assert!(c.add_root("b", f64::NAN, NodeTags::default()).is_err());
    assert!(c.tree().is_empty());
}

#[rstest]
fn given_forest_when_resetting_then_every_weight_is_zero(mut container: TreeContainer) {
    container.reset_all_weights();

    assert!(container.tree().iter().all(|(_, n)| n.weight() == 0.0));
    assert_eq!(container.tree().len(), 6);
}

// ============================================================
// Notification
// ============================================================

#[rstest]
fn given_listener_when_mutating_then_only_explicit_notifications_arrive(
    mut container: TreeContainer,
) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    container.add_listener(move |event| sink.borrow_mut().push(event));

    container.set_weight_at_path(1.0, &["veg"]).unwrap();
    container.add_weight_at_path(1.0, &["fruit", "pear"]).unwrap();
    assert!(seen.borrow().is_empty());

    container.notify_weights_changed();
    container.notify_structure_changed();

    assert_eq!(
        *seen.borrow(),
        vec![TreeEvent::WeightsChanged, TreeEvent::StructureChanged]
    );
}

#[rstest]
fn given_subscription_when_notified_then_receiver_gets_events(mut container: TreeContainer) {
    let rx = container.subscribe();

    container.notify_structure_changed();
    container.notify_weights_changed();

    let events: Vec<TreeEvent> = rx.try_iter().collect();
    assert_eq!(
        events,
        vec![TreeEvent::StructureChanged, TreeEvent::WeightsChanged]
    );
}

#[rstest]
fn given_removed_listener_when_notified_then_not_called(mut container: TreeContainer) {
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let id = container.add_listener(move |_| *counter.borrow_mut() += 1);

    container.notify_weights_changed();
    assert!(container.remove_listener(id));
    container.notify_weights_changed();

    assert_eq!(*calls.borrow(), 1);
}
