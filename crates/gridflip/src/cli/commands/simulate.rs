//! Simulate command: animate a reversed in-memory grid.

use std::rc::Rc;
use std::time::Duration;

use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::cli::output;
use crate::config::GridOptions;
use crate::element::ChangeRecord;
use crate::error::GridResult;
use crate::geometry::Coords;
use crate::grid::wrap_grid;
use crate::headless::HeadlessGrid;
use crate::sync::{FrameLoop, FrameScheduler};

/// Cell edge length of the simulated grid, in pixels.
const CELL_SIZE: f64 = 100.0;

/// Gap between simulated cells, in pixels.
const CELL_GAP: f64 = 10.0;

/// Hard stop for a simulation that never settles.
const FRAME_LIMIT: usize = 10_000;

/// Arguments of `gridflip simulate`.
#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Number of grid items.
    #[arg(long, short = 'n', default_value_t = 6, value_parser = clap::value_parser!(u16).range(1..=1000))]
    pub items: u16,

    /// Number of grid columns.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u16).range(1..=100))]
    pub columns: u16,

    /// Frames per second of the simulated display.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u16).range(1..=240))]
    pub fps: u16,

    /// Output as JSON.
    #[arg(long, short)]
    pub json: bool,
}

/// Transform of one item at the end of a frame.
#[derive(Debug, Clone, Serialize)]
pub struct ItemSample {
    /// Item name.
    pub name: String,
    /// Applied transform; `None` once cleared.
    pub transform: Option<Coords>,
}

/// State of every item after one frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSnapshot {
    /// Frame number. Frame 0 is the state right after the FLIP jump.
    pub frame: u64,
    /// Frame time in milliseconds.
    pub time_ms: f64,
    /// Items in container order.
    pub items: Vec<ItemSample>,
}

/// Result of a simulation run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    /// Options the engine ran with.
    pub options: GridOptions,
    /// Number of items in the grid.
    pub items: usize,
    /// Number of grid columns.
    pub columns: usize,
    /// Number of items the reorder animated.
    pub animated: usize,
    /// Every frame until the loop went idle.
    pub frames: Vec<FrameSnapshot>,
}

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the engine rejects the simulated grid.
pub fn execute(args: &SimulateArgs, options: GridOptions) -> GridResult<()> {
    let simulation =
        run_simulation(options, usize::from(args.items), usize::from(args.columns), args.fps)?;

    if args.json {
        output::print_json(&simulation);
    } else {
        print_table(&simulation);
    }
    Ok(())
}

/// Reverses a grid of `items` cells and records every frame of the
/// resulting animation.
///
/// # Errors
///
/// Returns an error if the engine rejects the simulated grid.
pub fn run_simulation(
    options: GridOptions,
    items: usize,
    columns: usize,
    fps: u16,
) -> GridResult<Simulation> {
    let frame_loop = Rc::new(FrameLoop::new());
    let grid = HeadlessGrid::new(items, columns, CELL_SIZE, CELL_GAP);
    let animator = wrap_grid(grid.container().clone(), options.clone(), frame_loop.clone())?;

    grid.reverse();
    let report =
        animator.notify_mutations(&[ChangeRecord::child_list(items, items)])?.unwrap_or_default();
    tracing::debug!(animated = report.animated.len(), "simulation started");

    let snapshot = || FrameSnapshot {
        frame: frame_loop.frame(),
        time_ms: frame_loop.now().as_secs_f64() * 1000.0,
        items: grid
            .items()
            .iter()
            .map(|item| ItemSample { name: item.name(), transform: item.transform() })
            .collect(),
    };

    let interval = Duration::from_secs_f64(1.0 / f64::from(fps));
    let mut frames = vec![snapshot()];
    while frame_loop.has_pending_work() && frames.len() < FRAME_LIMIT {
        frame_loop.tick(frame_loop.now().saturating_add(interval));
        frames.push(snapshot());
    }

    if frame_loop.has_pending_work() {
        tracing::warn!(frames = frames.len(), "simulation stopped before the grid settled");
    }

    Ok(Simulation { options, items, columns, animated: report.animated.len(), frames })
}

fn print_table(simulation: &Simulation) {
    #[derive(Tabled)]
    struct FrameRow {
        #[tabled(rename = "Frame")]
        frame: u64,
        #[tabled(rename = "Time")]
        time: String,
        #[tabled(rename = "Item")]
        item: String,
        #[tabled(rename = "Translate X")]
        translate_x: String,
        #[tabled(rename = "Translate Y")]
        translate_y: String,
        #[tabled(rename = "Scale X")]
        scale_x: String,
        #[tabled(rename = "Scale Y")]
        scale_y: String,
    }

    let options = &simulation.options;
    output::print_heading(&format!(
        "Simulated {} items in {} columns ({} animated)",
        simulation.items, simulation.columns, simulation.animated
    ));
    let stagger = options
        .stagger
        .step()
        .map_or_else(|| "none".to_string(), |step| format!("{}ms", step.as_millis()));
    println!(
        "{}",
        format!(
            "duration {}ms, easing {}, stagger {stagger}",
            options.duration_ms, options.easing
        )
        .dimmed()
    );

    // Only rows where an item's transform changed since the previous frame.
    let mut previous: Vec<Option<Coords>> = vec![None; simulation.items];
    let mut rows = Vec::new();
    for snapshot in &simulation.frames {
        for (last, sample) in previous.iter_mut().zip(&snapshot.items) {
            if *last == sample.transform {
                continue;
            }
            *last = sample.transform;
            let (translate_x, translate_y, scale_x, scale_y) = sample.transform.map_or_else(
                || (output::format_transform(None), "-".to_string(), "-".to_string(), "-".to_string()),
                |coords| {
                    (
                        output::format_px(coords.translate_x),
                        output::format_px(coords.translate_y),
                        output::format_scale(coords.scale_x),
                        output::format_scale(coords.scale_y),
                    )
                },
            );
            rows.push(FrameRow {
                frame: snapshot.frame,
                time: format!("{:.1}ms", snapshot.time_ms),
                item: sample.name.clone(),
                translate_x,
                translate_y,
                scale_x,
                scale_y,
            });
        }
    }

    if rows.is_empty() {
        println!("{}", "Nothing moved.".dimmed());
        return;
    }

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::right()))
        .with(Modify::new(Columns::new(1..2)).with(Alignment::right()))
        .with(Modify::new(Columns::new(3..7)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    let settled = simulation.frames.last().map_or(0.0, |frame| frame.time_ms);
    println!("{}", format!("Settled after {settled:.1}ms").green());
}
