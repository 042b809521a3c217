pub mod generator;
pub mod grid;

/// Errors that can occur while building a [`generator::catalog::TemplateCatalog`]
#[derive(thiserror::Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum CatalogError {
    #[error("Invalid rotation of {0} quarter turns, expected a value in 0..=3")]
    InvalidRotation(u8),
    #[error("Empty base templates collection")]
    NoTemplates,
}

/// Fatal errors of a [`generator::Grid`]. A grid that returned one of these must not be trusted anymore.
///
/// Note that a cell running out of candidates is not an error: the cell is simply marked dead.
#[derive(thiserror::Error, Debug, Clone, Copy, Eq, PartialEq)]
pub enum GeneratorError {
    #[error("Invalid grid size {0}, expected at least 1")]
    InvalidSize(u32),
    #[error("No template with index {0} in the catalog")]
    InvalidTemplateIndex(usize),
    #[error("Cell at ({x}, {y}) has no candidate left to collapse")]
    EmptyCandidates { x: u32, y: u32 },
    #[error("Guard overflow: propagation started at ({x}, {y}) exceeded {steps} steps")]
    GuardOverflow { x: u32, y: u32, steps: usize },
}

#[cfg(test)]
mod tests {
    use crate::generator::{
        builder::GridBuilder,
        catalog::CatalogBuilder,
        presets::weighted_base_templates,
        Grid, RngMode,
    };

    #[test]
    fn generate_test() {
        let catalog = CatalogBuilder::from_base_templates(weighted_base_templates())
            .build()
            .unwrap();
        let mut grid = GridBuilder::new(8)
            .with_catalog(catalog)
            .with_rng(RngMode::Seeded(0))
            .build()
            .unwrap();
        grid.build().unwrap();
        assert!(grid.calls() > 0);
    }

    #[test]
    fn default_grid_test() {
        let mut grid = Grid::new(5).unwrap();
        grid.build().unwrap();
        assert_eq!(grid.size(), 5);
    }
}
