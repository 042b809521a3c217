use std::{collections::VecDeque, sync::Arc};

use bitvec::bitvec;

#[cfg(feature = "debug-traces")]
use tracing::trace;

use crate::{
    grid::{direction::Direction, GridPosition},
    GeneratorError,
};

use super::{template::Template, Grid};

/// Breadth-first propagation of the constraints of one cell to the rest of a [`Grid`].
///
/// Every shrink of a cell candidates enqueues its neighbours, so the process only stops once the grid is stable around the starting cell, or when the guard is exceeded.
pub struct PropagationProcess<'g> {
    grid: &'g mut Grid,
    queue: VecDeque<GridPosition>,
    max_steps: usize,
}

impl<'g> PropagationProcess<'g> {
    /// Creates a process on `grid`, with the guard configured on the grid.
    pub fn new(grid: &'g mut Grid) -> Self {
        let max_steps = grid.propagation_guard();
        Self {
            grid,
            queue: VecDeque::new(),
            max_steps,
        }
    }

    /// Propagates from the cell at `position` until the queue is empty.
    ///
    /// Fails with [`GeneratorError::GuardOverflow`] once more than `max_steps` cells were processed.
    pub fn start(&mut self, position: GridPosition) -> Result<(), GeneratorError> {
        self.enqueue(position);

        let mut steps = 0;
        while let Some(current) = self.queue.pop_front() {
            steps += 1;
            if steps > self.max_steps {
                return Err(GeneratorError::GuardOverflow {
                    x: position.x,
                    y: position.y,
                    steps: self.max_steps,
                });
            }
            self.propagate(current);
        }

        #[cfg(feature = "debug-traces")]
        trace!("Propagation from {} done in {} steps", position, steps);

        Ok(())
    }

    /// Filters every alive neighbour of the cell at `position` against its candidates. Does nothing if that cell is dead.
    pub fn propagate(&mut self, position: GridPosition) {
        if self.grid.get_tile_at(position.x, position.y).is_none() {
            return;
        }
        let definition = self.grid.definition();
        for (direction, neighbour) in definition.neighbours(position) {
            if self.grid.get_tile_at(neighbour.x, neighbour.y).is_some() {
                self.filter_target_templates(position, neighbour, direction);
            }
        }
    }

    /// Keeps, among the candidates of `target`, only those compatible with at least one candidate of `source`. `target` is the neighbour of `source` in `direction`.
    ///
    /// If `target` lost candidates, its neighbours are enqueued. If it lost all of them, it dies.
    pub fn filter_target_templates(
        &mut self,
        source: GridPosition,
        target: GridPosition,
        direction: Direction,
    ) {
        let catalog = Arc::clone(self.grid.catalog());
        let source_templates: Vec<Template> =
            match self.grid.get_tile_at(source.x, source.y) {
                Some(cell) => cell.candidates(&catalog).copied().collect(),
                None => return,
            };
        let target_indexes: Vec<usize> = match self.grid.get_tile_at(target.x, target.y) {
            Some(cell) => cell.candidate_indexes().collect(),
            None => return,
        };

        let mut filtered = bitvec![0; catalog.templates_count()];
        let mut kept = 0;
        for &index in target_indexes.iter() {
            let target_template = catalog.template_unchecked(index);
            if source_templates
                .iter()
                .any(|source_template| self.grid.check_tiles(source_template, target_template, direction))
            {
                filtered.set(index, true);
                kept += 1;
            }
        }

        if kept < target_indexes.len() {
            let definition = self.grid.definition();
            for (_, neighbour) in definition.neighbours(target) {
                self.enqueue(neighbour);
            }
        }
        self.grid.replace_candidates(target, filtered);
    }

    /// Dead cells are never enqueued.
    fn enqueue(&mut self, position: GridPosition) {
        if self.grid.get_tile_at(position.x, position.y).is_some() {
            self.queue.push_back(position);
        }
    }
}
