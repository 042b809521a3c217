use std::sync::Arc;

use crate::GeneratorError;

use super::{
    catalog::TemplateCatalog,
    node_heuristic::CellSelectionHeuristic,
    observer::{GenerationUpdate, QueuedObserver},
    presets::default_catalog,
    template::TemplateIndex,
    Grid, RngMode,
};

/// Default maximum number of cells a single propagation can process
pub const DEFAULT_PROPAGATION_GUARD: usize = 200;

/// Default index, in the catalog, of the template forced on the outer ring of the grid
pub const DEFAULT_BOUNDARY_TEMPLATE: TemplateIndex = 0;

/// Used to instantiate a new [`Grid`].
///
/// Only the size is mandatory. Without a catalog, the grid uses [`default_catalog`].
///
/// ### Example
///
/// Create a seeded `Grid` from a `GridBuilder` and generate it.
/// ```
/// use tilemap_wfc::generator::{builder::GridBuilder, catalog::CatalogBuilder, presets::weighted_base_templates, RngMode};
///
/// let catalog = CatalogBuilder::from_base_templates(weighted_base_templates())
///     .build()
///     .unwrap();
///
/// let mut grid = GridBuilder::new(16)
///     .with_catalog(catalog)
///     .with_rng(RngMode::Seeded(123))
///     .build()
///     .unwrap();
/// grid.build().unwrap();
/// for tile in grid.collapsed_tiles() {
///     println!("{:?}: sprite {} rotated by {}°", tile.position, tile.instance.id, tile.instance.rotation.value());
/// }
/// ```
pub struct GridBuilder {
    size: u32,
    catalog: Option<Arc<TemplateCatalog>>,
    rng_mode: RngMode,
    propagation_guard: usize,
    boundary_template: TemplateIndex,
    cell_selection_heuristic: CellSelectionHeuristic,
    observers: Vec<crossbeam_channel::Sender<GenerationUpdate>>,
}

impl GridBuilder {
    /// Creates a [`GridBuilder`] for a `size * size` grid, with its other values set to their default.
    pub fn new(size: u32) -> Self {
        Self {
            size,
            catalog: None,
            rng_mode: RngMode::RandomSeed,
            propagation_guard: DEFAULT_PROPAGATION_GUARD,
            boundary_template: DEFAULT_BOUNDARY_TEMPLATE,
            cell_selection_heuristic: CellSelectionHeuristic::MinimumRemainingValue,
            observers: Vec::new(),
        }
    }

    /// Sets the [`TemplateCatalog`] to be used by the [`Grid`]
    pub fn with_catalog(mut self, catalog: TemplateCatalog) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    /// Sets the [`TemplateCatalog`] to be used by the [`Grid`]. The `Grid` will hold a read-only reference onto this catalog, which can be safely shared by multiple grids.
    pub fn with_shared_catalog(mut self, catalog: Arc<TemplateCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Specifies the [`RngMode`] to be used by the [`Grid`]. Defaults to [`RngMode::RandomSeed`].
    pub fn with_rng(mut self, rng_mode: RngMode) -> Self {
        self.rng_mode = rng_mode;
        self
    }

    /// Specifies how many cells a single propagation may process before failing with [`GeneratorError::GuardOverflow`]. Defaults to [`DEFAULT_PROPAGATION_GUARD`].
    pub fn with_propagation_guard(mut self, max_steps: usize) -> Self {
        self.propagation_guard = max_steps;
        self
    }

    /// Specifies the catalog index of the template forced on every cell of the outer ring. Defaults to [`DEFAULT_BOUNDARY_TEMPLATE`].
    pub fn with_boundary_template(mut self, template_index: TemplateIndex) -> Self {
        self.boundary_template = template_index;
        self
    }

    /// Specifies the [`CellSelectionHeuristic`] to be used by the [`Grid`]. Defaults to [`CellSelectionHeuristic::MinimumRemainingValue`].
    pub fn with_cell_heuristic(mut self, heuristic: CellSelectionHeuristic) -> Self {
        self.cell_selection_heuristic = heuristic;
        self
    }

    /// Registers a new [`QueuedObserver`] which will receive every update of the built [`Grid`], including the boundary cells collapsed during construction.
    pub fn add_queued_observer(&mut self) -> QueuedObserver {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.observers.push(sender);
        QueuedObserver::create(receiver)
    }

    /// Instantiates a [`Grid`] as specified by the various builder parameters.
    ///
    /// Returns [`GeneratorError::InvalidSize`] for a size of 0 and [`GeneratorError::InvalidTemplateIndex`] if the boundary template is not in the catalog.
    pub fn build(self) -> Result<Grid, GeneratorError> {
        let catalog = self.catalog.unwrap_or_else(default_catalog);
        Grid::create(
            self.size,
            catalog,
            self.rng_mode,
            self.propagation_guard,
            self.boundary_template,
            self.cell_selection_heuristic,
            self.observers,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        generator::{
            catalog::CatalogBuilder,
            presets::default_catalog,
            template::{BorderKind, Template},
            RngMode,
        },
        GeneratorError,
    };

    use super::GridBuilder;

    #[test]
    fn zero_size_is_rejected() {
        assert_eq!(
            GridBuilder::new(0).build().err(),
            Some(GeneratorError::InvalidSize(0))
        );
    }

    #[test]
    fn boundary_template_must_exist() {
        let catalog = CatalogBuilder::new()
            .with_template(Template::uniform(0, BorderKind::VOID))
            .build()
            .unwrap();
        assert_eq!(
            GridBuilder::new(3)
                .with_catalog(catalog)
                .with_boundary_template(1)
                .build()
                .err(),
            Some(GeneratorError::InvalidTemplateIndex(1))
        );
    }

    #[test]
    fn seed_is_kept() {
        let grid = GridBuilder::new(4)
            .with_rng(RngMode::Seeded(99))
            .build()
            .unwrap();
        assert_eq!(grid.seed(), 99);
    }

    #[test]
    fn shared_catalog() {
        let catalog = default_catalog();
        let a = GridBuilder::new(3)
            .with_shared_catalog(Arc::clone(&catalog))
            .build()
            .unwrap();
        let b = GridBuilder::new(4).build().unwrap();
        assert!(Arc::ptr_eq(a.catalog(), &catalog));
        assert!(Arc::ptr_eq(b.catalog(), &catalog));
    }
}
