use std::sync::Arc;

use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};

#[cfg(feature = "debug-traces")]
use tracing::{debug, info, trace};

use crate::{
    grid::{direction::Direction, GridDefinition, GridPosition},
    GeneratorError,
};

use self::{
    builder::GridBuilder,
    cell::{Candidates, Cell, CellState},
    catalog::TemplateCatalog,
    node_heuristic::CellSelectionHeuristic,
    observer::GenerationUpdate,
    propagation::PropagationProcess,
    template::{Template, TemplateIndex, TileInstance},
};

/// Defines a [`GridBuilder`] used to create a grid
pub mod builder;
/// Defines the [`Cell`] of a grid and their candidates
pub mod cell;
/// Defines the [`TemplateCatalog`] and how it is expanded from base templates
pub mod catalog;
/// Defines the different possible [`CellSelectionHeuristic`]
pub mod node_heuristic;
/// Defines observers to follow the progress of a generation
pub mod observer;
/// Base template sets ready to be used
pub mod presets;
/// Defines the [`PropagationProcess`] run after each collapse
pub mod propagation;
/// Defines [`Template`] and their edges
pub mod template;

/// Different ways to seed the RNG of the grid.
pub enum RngMode {
    /// The grid will use the given seed for its random source.
    Seeded(u64),
    /// The grid will use a random seed for its random source.
    ///
    /// The randomly generated seed can still be retrieved by calling `seed` on the grid once created.
    RandomSeed,
}

/// Represents the current generation state, if not failed.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum GenerationStatus {
    /// The generation has not ended yet.
    Ongoing,
    /// The generation ended. Every cell is either collapsed or dead.
    Done,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum InternalGridStatus {
    /// Boundary collapsed but not propagated yet.
    Uninitialized,
    /// Some cells still have more than one candidate.
    Building,
    /// Generation ended.
    Done,
    /// Generation stopped on a fatal error.
    Failed(GeneratorError),
}

/// A template placed on the grid, as read by a renderer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PlacedTile {
    /// Position of the cell
    pub position: GridPosition,
    /// What to draw on the cell
    pub instance: TileInstance,
}

/// A square grid of [`Cell`] generated with a WFC-like algorithm.
///
/// Use [`Grid::new`] or a [`GridBuilder`] to get an instance.
pub struct Grid {
    // === Read-only configuration ===
    grid: GridDefinition,
    catalog: Arc<TemplateCatalog>,
    propagation_guard: usize,
    boundary_template: TemplateIndex,
    cell_selection_heuristic: CellSelectionHeuristic,

    // === Generation state ===
    seed: u64,
    rng: StdRng,
    status: InternalGridStatus,
    /// `cells[(x, y)]` is `None` once the cell at (x, y) is dead.
    cells: Array2<Option<Cell>>,
    dead_cells_count: usize,
    /// Count of edge compatibility checks, for diagnostics only.
    calls: u64,
    /// Observers signaled with updates of the cells.
    observers: Vec<crossbeam_channel::Sender<GenerationUpdate>>,
}

#[inline]
fn cell_index(position: &GridPosition) -> (usize, usize) {
    (position.x as usize, position.y as usize)
}

impl Grid {
    /// Creates a `size * size` grid using the [`presets::default_catalog`], with its outer ring already collapsed to the first template of the catalog.
    pub fn new(size: u32) -> Result<Grid, GeneratorError> {
        GridBuilder::new(size).build()
    }

    /// Returns a new [`GridBuilder`]
    pub fn builder(size: u32) -> GridBuilder {
        GridBuilder::new(size)
    }

    pub(crate) fn create(
        size: u32,
        catalog: Arc<TemplateCatalog>,
        rng_mode: RngMode,
        propagation_guard: usize,
        boundary_template: TemplateIndex,
        cell_selection_heuristic: CellSelectionHeuristic,
        observers: Vec<crossbeam_channel::Sender<GenerationUpdate>>,
    ) -> Result<Grid, GeneratorError> {
        if size == 0 {
            return Err(GeneratorError::InvalidSize(size));
        }

        let seed = match rng_mode {
            RngMode::Seeded(seed) => seed,
            RngMode::RandomSeed => rand::thread_rng().gen::<u64>(),
        };

        let templates_count = catalog.templates_count();
        let cells = Array2::from_shape_fn((size as usize, size as usize), |(x, y)| {
            Some(Cell::new(
                GridPosition::new(x as u32, y as u32),
                templates_count,
            ))
        });

        let mut grid = Self {
            grid: GridDefinition::new(size),
            catalog,
            propagation_guard,
            boundary_template,
            cell_selection_heuristic,

            rng: StdRng::seed_from_u64(seed),
            seed,

            status: InternalGridStatus::Uninitialized,
            cells,
            dead_cells_count: 0,
            calls: 0,
            observers,
        };

        #[cfg(feature = "debug-traces")]
        info!(
            "Creating grid {} with {} templates and seed {}",
            grid.grid, templates_count, seed
        );

        grid.collapse_boundary()?;
        Ok(grid)
    }

    /// Returns the seed that was used to initialize the grid RNG. See [`RngMode`].
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the size of the grid on each axis
    pub fn size(&self) -> u32 {
        self.grid.size()
    }

    /// Returns the [`GridDefinition`] of this grid
    pub fn definition(&self) -> GridDefinition {
        self.grid
    }

    /// Returns the catalog shared by the cells of this grid
    pub fn catalog(&self) -> &Arc<TemplateCatalog> {
        &self.catalog
    }

    /// Returns how many edge compatibility checks were performed so far. Only meant to report the cost of a generation.
    pub fn calls(&self) -> u64 {
        self.calls
    }

    /// Returns how many cells ran out of candidates
    pub fn dead_cells_count(&self) -> usize {
        self.dead_cells_count
    }

    /// Returns the [`GenerationStatus`] of the grid, or the error that stopped it.
    pub fn status(&self) -> Result<GenerationStatus, GeneratorError> {
        match self.status {
            InternalGridStatus::Uninitialized | InternalGridStatus::Building => {
                Ok(GenerationStatus::Ongoing)
            }
            InternalGridStatus::Done => Ok(GenerationStatus::Done),
            InternalGridStatus::Failed(err) => Err(err),
        }
    }

    #[inline]
    pub(crate) fn propagation_guard(&self) -> usize {
        self.propagation_guard
    }

    /// Returns the [`Cell`] at (x, y), or `None` if the position is outside of the grid or if the cell is dead.
    pub fn get_tile_at(&self, x: u32, y: u32) -> Option<&Cell> {
        if !self.grid.contains(x, y) {
            return None;
        }
        self.cells[(x as usize, y as usize)].as_ref()
    }

    /// Returns what to draw at (x, y) if the cell there is alive and collapsed.
    pub fn tile_instance_at(&self, x: u32, y: u32) -> Option<TileInstance> {
        self.get_tile_at(x, y)
            .and_then(|cell| cell.collapsed_template(&self.catalog))
            .map(|template| template.to_instance())
    }

    /// Iterates over every collapsed and alive cell. Dead and undecided cells are skipped.
    pub fn collapsed_tiles(&self) -> impl Iterator<Item = PlacedTile> + '_ {
        self.cells.iter().flatten().filter_map(move |cell| {
            cell.collapsed_template(&self.catalog)
                .map(|template| PlacedTile {
                    position: cell.position(),
                    instance: template.to_instance(),
                })
        })
    }

    /// Returns a copy of the grid content indexed by `(x, y)`, `None` where there is nothing to draw.
    pub fn to_tile_instances(&self) -> Array2<Option<TileInstance>> {
        self.cells.map(|slot| {
            slot.as_ref()
                .and_then(|cell| cell.collapsed_template(&self.catalog))
                .map(|template| template.to_instance())
        })
    }

    /// Returns `true` if the `this` edge in `direction` matches the opposite edge of `other`, meaning `other` can be placed next to `this` in `direction`.
    ///
    /// Every call is counted in [`Grid::calls`].
    pub fn check_tiles(&mut self, this: &Template, other: &Template, direction: Direction) -> bool {
        self.calls += 1;
        this.edge(direction) == other.edge(direction.opposite())
    }

    /// Collapses and propagates cells until every cell is either collapsed or dead.
    ///
    /// If the generation was already started by previous calls to `step`, this simply continues the generation.
    pub fn build(&mut self) -> Result<(), GeneratorError> {
        // Each successful step collapses one cell. We avoid an unnecessary while loop.
        for _i in 0..=self.grid.total_size() {
            match self.step()? {
                GenerationStatus::Done => return Ok(()),
                GenerationStatus::Ongoing => (),
            }
        }
        // Only reached if a step did not collapse any cell
        match self.status()? {
            GenerationStatus::Done => Ok(()),
            GenerationStatus::Ongoing => self.build(),
        }
    }

    /// Advances the generation by one "step": select a cell, collapse it and propagate the changes.
    ///
    /// The first call also propagates the constraints of the pre-collapsed outer ring.
    ///
    /// **Note**: One call to `step` **can** leave more than one cell collapsed if the propagation forces some other cell(s) down to a single template.
    pub fn step(&mut self) -> Result<GenerationStatus, GeneratorError> {
        match self.status {
            InternalGridStatus::Uninitialized => {
                if let Err(err) = self.propagate_boundary() {
                    self.signal_failure(err);
                    return Err(err);
                }
                self.status = InternalGridStatus::Building;
            }
            InternalGridStatus::Building => (),
            InternalGridStatus::Done => return Ok(GenerationStatus::Done),
            InternalGridStatus::Failed(err) => return Err(err),
        }

        match self.unchecked_step() {
            Ok(status) => Ok(status),
            Err(err) => {
                self.signal_failure(err);
                Err(err)
            }
        }
    }

    fn unchecked_step(&mut self) -> Result<GenerationStatus, GeneratorError> {
        let position = match self
            .cell_selection_heuristic
            .select_cell(&self.cells, &mut self.rng)
        {
            Some(position) => position,
            None => {
                #[cfg(feature = "debug-traces")]
                info!(
                    "Generation done after {} checks, {} dead cells",
                    self.calls, self.dead_cells_count
                );
                self.status = InternalGridStatus::Done;
                self.signal(GenerationUpdate::Done);
                return Ok(GenerationStatus::Done);
            }
        };

        // We found a cell not collapsed yet. Pick one of its candidates
        let selected = match self.cells[cell_index(&position)].as_mut() {
            Some(cell) => cell.collapse(&self.catalog, &mut self.rng)?,
            None => None,
        };
        if let Some(_template_index) = selected {
            #[cfg(feature = "debug-traces")]
            debug!(
                "Heuristics selected template {} for cell at {}",
                self.catalog.template_unchecked(_template_index),
                position
            );
            self.signal_collapsed(position);
        }

        PropagationProcess::new(self).start(position)?;

        Ok(GenerationStatus::Ongoing)
    }

    fn collapse_boundary(&mut self) -> Result<(), GeneratorError> {
        let grid = self.grid;
        for position in grid.positions().filter(|pos| grid.is_on_boundary(pos)) {
            if let Some(cell) = self.cells[cell_index(&position)].as_mut() {
                cell.collapse_to(self.boundary_template, &self.catalog)?;
            }
            self.signal_collapsed(position);
        }
        Ok(())
    }

    /// Propagates the constraints of the boundary cells towards the interior, so that no interior cell can later pick a template incompatible with the boundary.
    fn propagate_boundary(&mut self) -> Result<(), GeneratorError> {
        #[cfg(feature = "debug-traces")]
        debug!("Propagating boundary constraints");

        let grid = self.grid;
        for position in grid.positions().filter(|pos| grid.is_on_boundary(pos)) {
            PropagationProcess::new(self).start(position)?;
        }
        Ok(())
    }

    /// Replaces the candidates of the cell at `position`. If the cell runs out of candidates, it is removed from the grid.
    pub(crate) fn replace_candidates(&mut self, position: GridPosition, candidates: Candidates) {
        let index = cell_index(&position);
        let (state, previous_entropy) = match self.cells[index].as_mut() {
            Some(cell) => {
                let previous_entropy = cell.entropy();
                (cell.replace_candidates(candidates), previous_entropy)
            }
            None => return,
        };

        match state {
            CellState::Dead => {
                #[cfg(feature = "debug-traces")]
                debug!("Cell at {} died", position);
                self.cells[index] = None;
                self.dead_cells_count += 1;
                self.signal(GenerationUpdate::Died(position));
            }
            CellState::Collapsed if previous_entropy > 1 => {
                #[cfg(feature = "debug-traces")]
                trace!("Propagation forced a single template at {}", position);
                self.signal_collapsed(position);
            }
            _ => (),
        }
    }

    fn signal_collapsed(&mut self, position: GridPosition) {
        if self.observers.is_empty() {
            return;
        }
        let instance = self.tile_instance_at(position.x, position.y);
        if let Some(instance) = instance {
            self.signal(GenerationUpdate::Collapsed(PlacedTile { position, instance }));
        }
    }

    fn signal_failure(&mut self, err: GeneratorError) {
        #[cfg(feature = "debug-traces")]
        debug!("Generation failed: {}", err);

        self.status = InternalGridStatus::Failed(err);
        self.signal(GenerationUpdate::Failed(err));
    }

    fn signal(&mut self, update: GenerationUpdate) {
        for obs in &mut self.observers {
            let _ = obs.send(update);
        }
    }
}
