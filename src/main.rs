use std::path::{Path, PathBuf};

use clap::Parser;
use pallet_optimizer::config::PalletConfig;
use pallet_optimizer::layout::{combination_placements, layer_placements};
use pallet_optimizer::parse::{RawValue, mm_to_cm_string};
use pallet_optimizer::render::render_layout;
use pallet_optimizer::report::{Report, Sheet, limit_cm_label};
use pallet_optimizer::solver::Solver;
use pallet_optimizer::types::{Dims, Rect};

#[derive(Parser)]
#[command(
    name = "pallet_optimizer",
    about = "Box-per-pallet calculator with two-box combination check"
)]
struct Cli {
    /// Pallet footprint in mm (LxW, e.g. 1200x800)
    #[arg(long, default_value = "1200x800", value_parser = parse_footprint)]
    pallet: Rect,

    /// Allowed overhang past each pallet edge in mm
    #[arg(long, default_value_t = PalletConfig::DEFAULT_OVERHANG)]
    overhang: u32,

    /// Height limits in mm, highest priority first
    #[arg(long = "height-limits", num_args = 1.., default_values_t = PalletConfig::DEFAULT_HEIGHT_LIMITS)]
    height_limits: Vec<u32>,

    /// Boxes in cm as LxWxH, optionally with a pallet id (e.g. 40x30x20 12,5x10x8@P1)
    #[arg(long = "boxes", num_args = 1.., required_unless_present = "input", conflicts_with = "input")]
    boxes: Vec<String>,

    /// JSON sheet: {"columns": [...], "rows": [[...]], "pallet_id_column": ...}
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Show ASCII layouts for each box and feasible pair
    #[arg(long)]
    layout: bool,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Log level written to stderr
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,
}

fn parse_footprint(s: &str) -> Result<Rect, String> {
    let (length, width) = s
        .split_once('x')
        .ok_or_else(|| format!("invalid pallet '{}', expected LxW", s))?;
    let length = length
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid length in '{}'", s))?;
    let width = width
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    if length == 0 || width == 0 {
        return Err(format!("pallet dimensions must be non-zero in '{}'", s));
    }
    Ok(Rect::new(length, width))
}

/// `LxWxH[@ID]` into sheet cells. The numbers stay raw text so they go
/// through the same parsing as spreadsheet cells.
fn parse_box(s: &str) -> Result<(Vec<RawValue>, Option<String>), String> {
    let (dims, pallet_id) = match s.split_once('@') {
        Some((dims, id)) if !id.trim().is_empty() => (dims, Some(id.trim().to_string())),
        Some(_) => return Err(format!("empty pallet id in '{}'", s)),
        None => (s, None),
    };
    let cells: Vec<RawValue> = dims
        .split(['x', 'X', '×'])
        .map(RawValue::from)
        .collect();
    if cells.len() != 3 {
        return Err(format!("invalid box '{}', expected LxWxH", s));
    }
    Ok((cells, pallet_id))
}

fn sheet_from_boxes(boxes: &[String]) -> Result<Sheet, String> {
    let mut rows = Vec::with_capacity(boxes.len());
    let mut grouped = false;
    for b in boxes {
        let (mut cells, pallet_id) = parse_box(b)?;
        grouped |= pallet_id.is_some();
        cells.push(pallet_id.map_or(RawValue::Null, RawValue::Text));
        rows.push(cells);
    }
    Ok(Sheet {
        columns: ["length", "width", "height", "pallet"]
            .map(String::from)
            .to_vec(),
        rows,
        mapping: None,
        pallet_id_column: grouped.then(|| "pallet".to_string()),
    })
}

fn read_sheet(path: &Path) -> Result<Sheet, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read {}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid sheet {}: {}", path.display(), e))
}

fn cm(dims: Dims) -> String {
    format!(
        "{}×{}×{} cm",
        mm_to_cm_string(dims.length),
        mm_to_cm_string(dims.width),
        mm_to_cm_string(dims.height)
    )
}

fn print_report(report: &Report, footprint: Rect, show_layout: bool) {
    let limits = &report.pallet.height_limits;

    for row in &report.rows {
        let Some(metrics) = &row.metrics else {
            println!(
                "Row {}: {}",
                row.row + 1,
                row.note.as_deref().unwrap_or("no data")
            );
            continue;
        };
        let tag = row
            .pallet_id
            .as_ref()
            .map(|id| format!(" [pallet {}]", id))
            .unwrap_or_default();
        println!("Row {}: {}{}", row.row + 1, cm(metrics.sorted_dims_mm), tag);
        for &limit in limits {
            println!("  {} cm: {}", limit_cm_label(limit), row.scheme(limit));
            if show_layout && let Some(best) = metrics.best(limit) {
                print!("{}", render_layout(footprint, &layer_placements(best)));
            }
        }
        if let Some(label) = &row.combination {
            println!("  combination: {}", label);
        }
        println!();
    }

    if report.groups.is_empty() {
        return;
    }
    println!("Groups:");
    for group in &report.groups {
        match group.combination.selected_detail() {
            Some(detail) => {
                println!(
                    "  {}: {} ({}: A {} + B {})",
                    group.pallet_id,
                    group.label,
                    detail.arrangement,
                    cm(detail.orientation_a),
                    cm(detail.orientation_b)
                );
                if show_layout {
                    print!("{}", render_layout(footprint, &combination_placements(detail)));
                }
            }
            None => println!("  {}: {}", group.pallet_id, group.label),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(cli.log_level)
        .init();

    let config = PalletConfig {
        length: cli.pallet.length,
        width: cli.pallet.width,
        overhang: cli.overhang,
        height_limits: cli.height_limits.clone(),
    };

    let sheet = match &cli.input {
        Some(path) => read_sheet(path),
        None => sheet_from_boxes(&cli.boxes),
    }
    .and_then(|sheet| config.validate().map(|_| sheet))
    .unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let footprint = config.pallet().footprint();
    let solver = Solver::new(config);
    let report = solver.process(&sheet).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("Pallet {} mm, overhang {} mm", cli.pallet, cli.overhang);
    println!();
    print_report(&report, footprint, cli.layout);
}
