use std::{
    io::{stdin, stdout, Write},
    thread, time,
};

use tilemap_wfc::generator::{
    builder::GridBuilder,
    catalog::CatalogBuilder,
    node_heuristic::CellSelectionHeuristic,
    observer::GenerationUpdate,
    presets::weighted_base_templates,
    template::{BorderKind, Template},
    GenerationStatus, Grid, RngMode,
};

pub enum GenerationViewMode {
    StepByStep(u64),
    StepByStepPaused,
    Final,
}

const GENERATION_VIEW_MODE: GenerationViewMode = GenerationViewMode::Final;

const GRID_SIZE: u32 = 24;

// Indexed by a mask of the connected edges: top = 1, right = 2, bottom = 4, left = 8
const WALLS: &'static [char] = &[
    '·', '╹', '╺', '┗', '╻', '┃', '┏', '┣', '╸', '┛', '━', '┻', '┓', '┫', '┳', '╋',
];
const PATHS: &'static [char] = &[
    '·', '╵', '╶', '└', '╷', '│', '┌', '├', '╴', '┘', '─', '┴', '┐', '┤', '┬', '┼',
];

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let catalog = CatalogBuilder::from_base_templates(weighted_base_templates())
        .build()
        .unwrap();
    let mut builder = GridBuilder::new(GRID_SIZE)
        .with_catalog(catalog)
        .with_rng(RngMode::RandomSeed)
        .with_cell_heuristic(CellSelectionHeuristic::MinimumRemainingValue);
    let mut observer = builder.add_queued_observer();
    let mut grid = builder.build().unwrap();
    tracing::info!("Seed: {}", grid.seed());

    match GENERATION_VIEW_MODE {
        GenerationViewMode::Final => {
            grid.build().unwrap();
            println!("Final grid:");
            display_grid(&grid);
        }
        _ => {
            let mut step = 0;
            loop {
                let status = grid.step().unwrap();
                let died_this_step = observer
                    .dequeue_all()
                    .iter()
                    .filter(|update| matches!(update, GenerationUpdate::Died(_)))
                    .count();
                println!(
                    "Grid at iteration n°{} ({} dead cells, {} this step):",
                    step,
                    grid.dead_cells_count(),
                    died_this_step
                );
                display_grid(&grid);
                if status == GenerationStatus::Done {
                    break;
                }
                match GENERATION_VIEW_MODE {
                    GenerationViewMode::StepByStep(delay) => {
                        thread::sleep(time::Duration::from_millis(delay));
                    }
                    GenerationViewMode::StepByStepPaused => pause(),
                    _ => (),
                }
                step += 1;
            }
        }
    }
    println!(
        "{} edge checks, {} dead cells",
        grid.calls(),
        grid.dead_cells_count()
    );
}

fn glyph(template: &Template) -> char {
    let mask = |kind: BorderKind| {
        template
            .edges()
            .iter()
            .enumerate()
            .filter(|(_, edge)| **edge == kind)
            .fold(0, |mask, (i, _)| mask | 1 << i)
    };
    match mask(BorderKind::BORDER) {
        0 => PATHS[mask(BorderKind::GREEN)],
        walls => WALLS[walls],
    }
}

fn display_grid(grid: &Grid) {
    for y in 0..grid.size() {
        for x in 0..grid.size() {
            match grid.get_tile_at(x, y) {
                None => print!("✖"),
                Some(cell) => match cell.collapsed_template(grid.catalog()) {
                    Some(template) => print!("{}", glyph(template)),
                    None => print!("?"),
                },
            }
        }
        println!();
    }
}

fn pause() {
    let mut word = String::new();
    let mut stdout = stdout();
    stdout.write(b"Press Enter to continue").unwrap();
    stdout.flush().unwrap();
    stdin().read_line(&mut word).unwrap();
}
