use bitvec::{bitvec, vec::BitVec};
use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng,
};

#[cfg(feature = "debug-traces")]
use tracing::trace;

use crate::{grid::GridPosition, GeneratorError};

use super::{
    catalog::TemplateCatalog,
    template::{Template, TemplateIndex},
};

/// Set of candidate templates, `candidates[template_index]` is true (1) if the template with index `template_index` in the catalog is still possible.
pub type Candidates = BitVec<usize>;

/// Outcome of a [`Cell::replace_candidates`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CellState {
    /// Still more than one candidate
    Undecided,
    /// Exactly one candidate left
    Collapsed,
    /// No candidate left, the cell must be removed from the grid.
    Dead,
}

/// One position of a [`super::Grid`] and the templates that can still be placed there.
#[derive(Clone, Debug)]
pub struct Cell {
    position: GridPosition,
    candidates: Candidates,
    /// Cached count of candidates
    entropy: usize,
    dead: bool,
}

impl Cell {
    /// Creates a cell where every template of a catalog of `templates_count` templates is possible.
    pub(crate) fn new(position: GridPosition, templates_count: usize) -> Self {
        Self {
            position,
            candidates: bitvec![1; templates_count],
            entropy: templates_count,
            dead: false,
        }
    }

    /// Returns the position of the cell in its grid
    pub fn position(&self) -> GridPosition {
        self.position
    }

    /// Returns the number of templates still possible on this cell
    #[inline]
    pub fn entropy(&self) -> usize {
        self.entropy
    }

    /// Returns `true` once the cell has no candidate left
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Returns `true` if exactly one template remains
    #[inline]
    pub fn is_collapsed(&self) -> bool {
        !self.dead && self.entropy == 1
    }

    /// Iterates over the indexes of the candidates, in catalog order
    pub fn candidate_indexes(&self) -> impl Iterator<Item = TemplateIndex> + '_ {
        self.candidates.iter_ones()
    }

    /// Iterates over the candidates, in catalog order
    pub fn candidates<'a>(
        &'a self,
        catalog: &'a TemplateCatalog,
    ) -> impl Iterator<Item = &'a Template> + 'a {
        self.candidate_indexes()
            .map(|index| catalog.template_unchecked(index))
    }

    /// Returns the only remaining template when the cell is collapsed
    pub fn collapsed_template<'a>(&self, catalog: &'a TemplateCatalog) -> Option<&'a Template> {
        match self.is_collapsed() {
            true => self
                .candidates
                .first_one()
                .map(|index| catalog.template_unchecked(index)),
            false => None,
        }
    }

    /// Picks one of the candidates at random, weighted by the templates weights, and makes it the only candidate.
    ///
    /// Returns `Ok(None)` without doing anything if the cell is dead, and [`GeneratorError::EmptyCandidates`] if there is nothing to pick from.
    pub(crate) fn collapse<R: Rng>(
        &mut self,
        catalog: &TemplateCatalog,
        rng: &mut R,
    ) -> Result<Option<TemplateIndex>, GeneratorError> {
        if self.dead {
            return Ok(None);
        }
        self.check_not_empty()?;

        let possible_templates: Vec<TemplateIndex> = self.candidate_indexes().collect();
        let picked = weighted_pick(
            possible_templates
                .iter()
                .map(|&index| catalog.template_unchecked(index).weight),
            rng,
        )
        // Catalog weights are never 0
        .unwrap_or(possible_templates.len() - 1);
        let selected = possible_templates[picked];

        self.set_single_candidate(selected);
        Ok(Some(selected))
    }

    /// Makes the catalog template at `index` the only candidate.
    ///
    /// Returns `Ok(())` without doing anything if the cell is dead.
    pub(crate) fn collapse_to(
        &mut self,
        index: TemplateIndex,
        catalog: &TemplateCatalog,
    ) -> Result<(), GeneratorError> {
        if self.dead {
            return Ok(());
        }
        self.check_not_empty()?;
        if index >= catalog.templates_count() || index >= self.candidates.len() {
            return Err(GeneratorError::InvalidTemplateIndex(index));
        }
        self.set_single_candidate(index);
        Ok(())
    }

    /// Replaces the candidates set. The cell dies if `new_candidates` is empty.
    pub(crate) fn replace_candidates(&mut self, new_candidates: Candidates) -> CellState {
        self.entropy = new_candidates.count_ones();
        self.candidates = new_candidates;

        match self.entropy {
            0 => {
                #[cfg(feature = "debug-traces")]
                trace!("Cell at {} has no candidate left", self.position);
                self.dead = true;
                CellState::Dead
            }
            1 => CellState::Collapsed,
            _ => CellState::Undecided,
        }
    }

    fn set_single_candidate(&mut self, index: TemplateIndex) {
        self.candidates.fill(false);
        self.candidates.set(index, true);
        self.entropy = 1;
    }

    fn check_not_empty(&self) -> Result<(), GeneratorError> {
        match self.entropy {
            0 => Err(GeneratorError::EmptyCandidates {
                x: self.position.x,
                y: self.position.y,
            }),
            _ => Ok(()),
        }
    }
}

/// Returns the index of one of the `weights`, picked with a probability proportional to its weight.
///
/// Returns `None` if there is no weight or if they are all 0.
pub(crate) fn weighted_pick<I, R>(weights: I, rng: &mut R) -> Option<usize>
where
    I: IntoIterator<Item = u32>,
    R: Rng,
{
    WeightedIndex::<u32>::new(weights)
        .ok()
        .map(|distribution| distribution.sample(rng))
}

#[cfg(test)]
mod tests {
    use bitvec::{bitvec, order::Lsb0};
    use rand::{rngs::StdRng, SeedableRng};

    use crate::{
        generator::{
            catalog::CatalogBuilder,
            template::{BorderKind, Template},
        },
        grid::GridPosition,
        GeneratorError,
    };

    use super::{weighted_pick, Cell, CellState};

    fn catalog() -> crate::generator::catalog::TemplateCatalog {
        CatalogBuilder::new()
            .with_template(Template::uniform(0, BorderKind::VOID))
            .with_template(Template::uniform(1, BorderKind::BORDER).with_weight(5))
            .with_template(Template::uniform(2, BorderKind::GREEN))
            .build()
            .unwrap()
    }

    #[test]
    fn new_cell_has_every_candidate() {
        let cell = Cell::new(GridPosition::new(1, 2), 3);
        assert_eq!(cell.entropy(), 3);
        assert!(!cell.is_dead());
        assert!(!cell.is_collapsed());
        assert_eq!(cell.candidate_indexes().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn collapse_keeps_one_candidate() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(7);
        let mut cell = Cell::new(GridPosition::new(0, 0), catalog.templates_count());
        let picked = cell.collapse(&catalog, &mut rng).unwrap().unwrap();
        assert_eq!(cell.entropy(), 1);
        assert!(cell.is_collapsed());
        assert_eq!(cell.candidate_indexes().collect::<Vec<_>>(), vec![picked]);
        assert_eq!(
            cell.collapsed_template(&catalog),
            catalog.template(picked)
        );
    }

    #[test]
    fn collapse_only_picks_candidates() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let mut cell = Cell::new(GridPosition::new(0, 0), catalog.templates_count());
            cell.replace_candidates(bitvec![1, 0, 1]);
            let picked = cell.collapse(&catalog, &mut rng).unwrap().unwrap();
            assert_ne!(picked, 1);
        }
    }

    #[test]
    fn collapse_to_forces_the_template() {
        let catalog = catalog();
        let mut cell = Cell::new(GridPosition::new(0, 0), catalog.templates_count());
        cell.collapse_to(2, &catalog).unwrap();
        assert_eq!(cell.candidate_indexes().collect::<Vec<_>>(), vec![2]);
        assert_eq!(cell.entropy(), 1);

        let mut cell = Cell::new(GridPosition::new(0, 0), catalog.templates_count());
        assert_eq!(
            cell.collapse_to(3, &catalog),
            Err(GeneratorError::InvalidTemplateIndex(3))
        );
    }

    #[test]
    fn empty_cell_cannot_collapse() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(0);
        let mut cell = Cell::new(GridPosition::new(4, 5), 0);
        assert_eq!(
            cell.collapse(&catalog, &mut rng),
            Err(GeneratorError::EmptyCandidates { x: 4, y: 5 })
        );
        assert_eq!(
            cell.collapse_to(0, &catalog),
            Err(GeneratorError::EmptyCandidates { x: 4, y: 5 })
        );
    }

    #[test]
    fn replace_with_nothing_kills_the_cell() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(0);
        let mut cell = Cell::new(GridPosition::new(0, 0), 3);
        assert_eq!(cell.replace_candidates(bitvec![1, 1, 0]), CellState::Undecided);
        assert_eq!(cell.entropy(), 2);
        assert_eq!(cell.replace_candidates(bitvec![0, 1, 0]), CellState::Collapsed);
        assert_eq!(cell.replace_candidates(bitvec![0, 0, 0]), CellState::Dead);
        assert!(cell.is_dead());
        assert_eq!(cell.entropy(), 0);
        // Dead cells ignore collapses
        assert_eq!(cell.collapse(&catalog, &mut rng), Ok(None));
        assert_eq!(cell.collapse_to(0, &catalog), Ok(()));
        assert!(cell.collapsed_template(&catalog).is_none());
    }

    #[test]
    fn weighted_pick_follows_weights() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = [0u32; 2];
        for _ in 0..2000 {
            counts[weighted_pick([1, 9], &mut rng).unwrap()] += 1;
        }
        assert!(counts[1] > counts[0] * 3);
        assert_eq!(weighted_pick([0, 4, 0], &mut rng), Some(1));
        assert_eq!(weighted_pick(Vec::<u32>::new(), &mut rng), None);
    }
}
