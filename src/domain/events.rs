//! Change notification between the tree and whatever lays it out.

use std::fmt;
use std::sync::mpsc::{self, Receiver};

use generational_arena::{Arena, Index};
use tracing::{debug, trace};

/// What changed in the tree since the last notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    /// Nodes were added or the tree was loaded: derived layout must be rebuilt.
    StructureChanged,
    /// Same structure, only weights differ: relayout in place, possibly animated.
    WeightsChanged,
}

impl TreeEvent {
    /// Coalesces two pending events; a structural change dominates.
    pub fn merge(self, other: TreeEvent) -> TreeEvent {
        match (self, other) {
            (TreeEvent::WeightsChanged, TreeEvent::WeightsChanged) => TreeEvent::WeightsChanged,
            _ => TreeEvent::StructureChanged,
        }
    }
}

impl fmt::Display for TreeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeEvent::StructureChanged => write!(f, "structure changed"),
            TreeEvent::WeightsChanged => write!(f, "weights changed"),
        }
    }
}

/// Handle returned by [`ListenerRegistry::add`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Index);

type Callback = Box<dyn FnMut(TreeEvent) -> Delivery>;

/// Whether a listener wants further events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    Keep,
    Drop,
}

/// Callback registry for [`TreeEvent`]s.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Arena<Callback>,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F>(&mut self, mut listener: F) -> ListenerId
    where
        F: FnMut(TreeEvent) + 'static,
    {
        ListenerId(self.listeners.insert(Box::new(move |event| {
            listener(event);
            Delivery::Keep
        })))
    }

    /// Channel adapter: every event is sent to the returned receiver.
    ///
    /// Once the receiver is dropped the listener removes itself on the next
    /// notification.
    pub fn subscribe(&mut self) -> Receiver<TreeEvent> {
        let (tx, rx) = mpsc::channel();
        self.listeners.insert(Box::new(move |event| match tx.send(event) {
            Ok(()) => Delivery::Keep,
            Err(_) => Delivery::Drop,
        }));
        rx
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id.0).is_some()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Delivers `event` to every registered listener.
    pub fn notify(&mut self, event: TreeEvent) {
        trace!("notify {} listeners: {}", self.listeners.len(), event);
        let mut disconnected = Vec::new();
        for (idx, listener) in self.listeners.iter_mut() {
            if listener(event) == Delivery::Drop {
                disconnected.push(idx);
            }
        }
        for idx in disconnected {
            debug!("dropping disconnected subscriber");
            self.listeners.remove(idx);
        }
    }
}
