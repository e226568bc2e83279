//! # kortprint
//!
//! Command line access to the print geometry. Every subcommand prints JSON.
//!
//! ```bash
//! kortprint area --format A3 --scale 50000
//! kortprint pages --lng 10.2 --lat 56.16 --cols 2 --rows 2 --csv pages.csv
//! kortprint grid --lng 12.57 --lat 55.68 --all-corners
//! kortprint measure "LINESTRING(12.5683 55.6761, 10.2039 56.1629)"
//! kortprint plan --request print.json --share "c=56.0,10.4,7&s=50000"
//! RUST_LOG=debug kortprint utm --lat 55.6761 --lng 12.5683 --zone 32
//! ```

use clap::{Args, Parser, Subcommand};
use kortprint_rs::{
    CornerSampling, CsvMeasureConfig, DpiOption, GridOverlay, KortError, Orientation,
    PaperFormat, PrintPlan, PrintRequest, ShareState, calculate_multi_page_grid,
    calculate_print_area, csv_to_measured_csv, latlng_to_utm, measure_geometry_str,
    single_page_bounds, write_page_index_csv,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "kortprint")]
#[command(about = "Print frames, page grids, UTM grids and measurements for Danish maps")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct PaperArgs {
    #[arg(long, default_value = "A4")]
    format: PaperFormat,

    /// portrait | landscape (or p | l)
    #[arg(long, default_value = "portrait")]
    orientation: Orientation,

    /// Scale denominator, 25000 for 1:25 000
    #[arg(long, default_value_t = 25000.0)]
    scale: f64,

    #[arg(long, default_value_t = 10.0)]
    margin: f64,
}

#[derive(Args, Debug, Clone)]
struct CenterArgs {
    #[arg(long, allow_negative_numbers = true)]
    lng: f64,

    #[arg(long, allow_negative_numbers = true)]
    lat: f64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Printable paper size and the ground it covers
    Area {
        #[command(flatten)]
        paper: PaperArgs,
    },
    /// Lat/lng bounds of a single page centred on a point
    Bounds {
        #[command(flatten)]
        center: CenterArgs,
        #[command(flatten)]
        paper: PaperArgs,
    },
    /// Tiles a multi-page print
    Pages {
        #[command(flatten)]
        center: CenterArgs,
        #[command(flatten)]
        paper: PaperArgs,
        #[arg(long, default_value_t = 2)]
        cols: u32,
        #[arg(long, default_value_t = 2)]
        rows: u32,
        /// Overlap between neighbouring pages in mm
        #[arg(long, default_value_t = 10.0)]
        overlap: f64,
        /// Also write a page index CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// UTM grid for a single page as GeoJSON
    Grid {
        #[command(flatten)]
        center: CenterArgs,
        #[command(flatten)]
        paper: PaperArgs,
        /// Grid spacing in metres, derived from the scale by default
        #[arg(long)]
        interval: Option<f64>,
        #[arg(long)]
        zone: Option<u8>,
        /// Project all four corners when sizing the grid
        #[arg(long)]
        all_corners: bool,
    },
    /// Converts a position to UTM
    Utm {
        #[command(flatten)]
        center: CenterArgs,
        #[arg(long)]
        zone: Option<u8>,
    },
    /// Measures a WKT/GeoJSON geometry, or every row of a CSV file
    Measure {
        /// Geometry string in lng/lat
        geometry: Option<String>,
        #[arg(long, requires = "output")]
        csv: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, default_value = "geometry")]
        column: String,
    },
    /// Resolves a full print request into pages
    Plan {
        /// JSON print request, defaults apply to absent fields
        #[arg(long)]
        request: Option<PathBuf>,
        /// Shared link query string applied on top of the request
        #[arg(long)]
        share: Option<String>,
        #[arg(long)]
        grid: bool,
        #[arg(long)]
        dpi: Option<u32>,
    },
}

#[derive(Serialize)]
struct PlanSummary<'a> {
    page_width_mm: f64,
    page_height_mm: f64,
    canvas_px: (u32, u32),
    scale_bar: &'a str,
    pages: Vec<PageSummary<'a>>,
}

#[derive(Serialize)]
struct PageSummary<'a> {
    file_name: &'a str,
    label: Option<&'a str>,
    bounds: &'a kortprint_rs::PrintFrameBounds,
    grid_lines: usize,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), KortError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| KortError::IoError(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

fn request_from(center: &CenterArgs, paper: &PaperArgs) -> PrintRequest {
    PrintRequest::builder()
        .center(center.lng, center.lat)
        .format(paper.format)
        .orientation(paper.orientation)
        .scale(paper.scale)
        .margin_mm(paper.margin)
        .build()
}

fn run(command: Command) -> Result<(), KortError> {
    match command {
        Command::Area { paper } => {
            let area = calculate_print_area(paper.format, paper.orientation, paper.scale, paper.margin)?;
            print_json(&area)
        }
        Command::Bounds { center, paper } => {
            print_json(&single_page_bounds(&request_from(&center, &paper))?)
        }
        Command::Pages {
            center,
            paper,
            cols,
            rows,
            overlap,
            csv,
        } => {
            let grid = calculate_multi_page_grid(
                center.lng,
                center.lat,
                paper.format,
                paper.orientation,
                paper.scale,
                overlap,
                cols,
                rows,
            )?;
            if let Some(path) = csv {
                write_page_index_csv(&grid, &path)?;
                info!(path = %path.display(), pages = grid.len(), "page index written");
            }
            print_json(&grid)
        }
        Command::Grid {
            center,
            paper,
            interval,
            zone,
            all_corners,
        } => {
            let bounds = single_page_bounds(&request_from(&center, &paper))?;
            let mut builder = GridOverlay::builder().bounds(&bounds).scale(paper.scale);
            if let Some(interval) = interval {
                builder = builder.interval(interval);
            }
            if let Some(zone) = zone {
                builder = builder.zone(zone);
            }
            if all_corners {
                builder = builder.corner_sampling(CornerSampling::AllCorners);
            }
            print_json(&builder.build()?.to_feature_collection())
        }
        Command::Utm { center, zone } => print_json(&latlng_to_utm(center.lat, center.lng, zone)?),
        Command::Measure {
            geometry,
            csv,
            output,
            column,
        } => match (csv, output, geometry) {
            (Some(input), Some(output), _) => {
                let rows = csv_to_measured_csv(&input, &output, &CsvMeasureConfig::new(column))?;
                info!(rows, output = %output.display(), "measurements written");
                Ok(())
            }
            (_, _, Some(geometry)) => print_json(&measure_geometry_str(&geometry)?),
            _ => Err(KortError::MissingParameter("geometry or --csv")),
        },
        Command::Plan {
            request,
            share,
            grid,
            dpi,
        } => {
            let mut request = match request {
                Some(path) => {
                    let json = std::fs::read_to_string(&path)
                        .map_err(|e| KortError::IoError(e.to_string()))?;
                    PrintRequest::from_json(&json)?
                }
                None => PrintRequest::default(),
            };
            if let Some(query) = share {
                request = ShareState::from_query_string(&query).apply_to(&request);
            }
            if grid {
                request.grid = true;
            }
            if let Some(dpi) = dpi {
                request.dpi = DpiOption::try_from(dpi)?;
            }

            let plan = PrintPlan::new(&request)?;
            let summary = PlanSummary {
                page_width_mm: plan.layout.page_width_mm,
                page_height_mm: plan.layout.page_height_mm,
                canvas_px: (plan.layout.canvas_width_px, plan.layout.canvas_height_px),
                scale_bar: &plan.scale_bar.label,
                pages: plan
                    .pages
                    .iter()
                    .map(|p| PageSummary {
                        file_name: &p.file_name,
                        label: p.label.as_deref(),
                        bounds: &p.bounds,
                        grid_lines: p.grid_lines.len(),
                    })
                    .collect(),
            };
            print_json(&summary)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli.command)?;
    Ok(())
}
