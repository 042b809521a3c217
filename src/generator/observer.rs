use crate::{grid::GridPosition, GeneratorError};

use super::PlacedTile;

/// Update sent by a [`crate::generator::Grid`] to its observers
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GenerationUpdate {
    /// A cell is down to a single template, either picked by a collapse or forced by propagation
    Collapsed(PlacedTile),
    /// A cell ran out of candidates and was removed from the grid
    Died(GridPosition),
    /// Every cell is either collapsed or dead
    Done,
    /// The generation stopped on a fatal error
    Failed(GeneratorError),
}

/// Observer with a queue of the [`GenerationUpdate`] sent by the grid it was registered on.
///
/// Register it on a [`crate::generator::builder::GridBuilder`] with `add_queued_observer`.
pub struct QueuedObserver {
    receiver: crossbeam_channel::Receiver<GenerationUpdate>,
}

impl QueuedObserver {
    pub(crate) fn create(receiver: crossbeam_channel::Receiver<GenerationUpdate>) -> Self {
        Self { receiver }
    }

    /// Dequeues all queued updates.
    ///
    /// Returns all retrieved [`GenerationUpdate`] in a `Vec`.
    /// The `Vec` may be empty if no update was queued.
    pub fn dequeue_all(&mut self) -> Vec<GenerationUpdate> {
        let mut updates = Vec::new();
        while let Ok(update) = self.receiver.try_recv() {
            updates.push(update);
        }
        updates
    }

    /// Dequeues 1 queued update.
    ///
    /// Returns [`Some(GenerationUpdate)`] if there was an update to process, else returns `None`.
    pub fn dequeue_one(&mut self) -> Option<GenerationUpdate> {
        self.receiver.try_recv().ok()
    }
}
