use ndarray::Array2;
use rand::Rng;

use crate::grid::GridPosition;

use super::cell::Cell;

/// Defines a heuristic for the choice of the next cell to collapse.
#[derive(Copy, Clone, Debug, Default)]
pub enum CellSelectionHeuristic {
    /// Among the cells with more than one candidate, the ones with the fewest candidates are kept and one of them is picked uniformly at random.
    #[default]
    MinimumRemainingValue,
    /// A random cell with more than one candidate is picked.
    ///
    /// Leads to many more dead cells, except for very simple catalogs.
    Random,
}

impl CellSelectionHeuristic {
    /// Picks a cell according to the heuristic. Dead cells and cells with a single candidate are never picked.
    ///
    /// Returns `None` when every cell is either dead or collapsed.
    pub(crate) fn select_cell<R: Rng>(
        &self,
        cells: &Array2<Option<Cell>>,
        rng: &mut R,
    ) -> Option<GridPosition> {
        let live_cells = cells.iter().flatten().filter(|cell| cell.entropy() > 1);
        let picked_candidates: Vec<GridPosition> = match self {
            CellSelectionHeuristic::MinimumRemainingValue => {
                let mut min = usize::MAX;
                let mut lowest = Vec::new();
                for cell in live_cells {
                    if cell.entropy() < min {
                        min = cell.entropy();
                        lowest.clear();
                    }
                    if cell.entropy() == min {
                        lowest.push(cell.position());
                    }
                }
                lowest
            }
            CellSelectionHeuristic::Random => live_cells.map(|cell| cell.position()).collect(),
        };

        match picked_candidates.len() {
            0 => None,
            len => Some(picked_candidates[rng.gen_range(0..len)]),
        }
    }
}

#[cfg(test)]
mod tests {
    use bitvec::{bitvec, order::Lsb0};
    use ndarray::Array2;
    use rand::{rngs::StdRng, SeedableRng};

    use crate::{generator::cell::Cell, grid::GridPosition};

    use super::CellSelectionHeuristic;

    fn cells() -> Array2<Option<Cell>> {
        Array2::from_shape_fn((3, 3), |(x, y)| {
            Some(Cell::new(GridPosition::new(x as u32, y as u32), 4))
        })
    }

    #[test]
    fn minimum_remaining_value_picks_lowest() {
        let mut cells = cells();
        let mut rng = StdRng::seed_from_u64(1);
        cells[(1, 2)]
            .as_mut()
            .unwrap()
            .replace_candidates(bitvec![1, 1, 0, 0]);
        cells[(2, 0)]
            .as_mut()
            .unwrap()
            .replace_candidates(bitvec![0, 1, 1, 0]);
        // Collapsed cells are skipped
        cells[(0, 0)]
            .as_mut()
            .unwrap()
            .replace_candidates(bitvec![0, 1, 0, 0]);
        // Dead slot
        cells[(0, 1)] = None;

        for _ in 0..20 {
            let picked = CellSelectionHeuristic::MinimumRemainingValue
                .select_cell(&cells, &mut rng)
                .unwrap();
            assert!(picked == GridPosition::new(1, 2) || picked == GridPosition::new(2, 0));
        }
    }

    #[test]
    fn nothing_left_to_select() {
        let mut cells = cells();
        let mut rng = StdRng::seed_from_u64(1);
        for slot in cells.iter_mut() {
            slot.as_mut().unwrap().replace_candidates(bitvec![0, 0, 1, 0]);
        }
        cells[(1, 1)] = None;
        assert_eq!(
            CellSelectionHeuristic::MinimumRemainingValue.select_cell(&cells, &mut rng),
            None
        );
        assert_eq!(
            CellSelectionHeuristic::Random.select_cell(&cells, &mut rng),
            None
        );
    }

    #[test]
    fn random_only_picks_live_cells() {
        let mut cells = cells();
        let mut rng = StdRng::seed_from_u64(5);
        for slot in cells.iter_mut() {
            slot.as_mut().unwrap().replace_candidates(bitvec![0, 0, 1, 0]);
        }
        cells[(2, 2)] = Some(Cell::new(GridPosition::new(2, 2), 4));
        assert_eq!(
            CellSelectionHeuristic::Random.select_cell(&cells, &mut rng),
            Some(GridPosition::new(2, 2))
        );
    }
}
