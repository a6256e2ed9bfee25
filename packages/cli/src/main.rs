#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line tools for the mansion map.
//!
//! Loads the constituency and postcode feature collections and prints
//! legends, maxima and per-feature summaries, runs searches (including
//! the external place search), writes the data manifest, or starts the
//! API server.
//!
//! Uses `indicatif-log-bridge` (via [`mansion_map_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod output;
mod search;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use mansion_map_cli_utils::{IndicatifProgress, MultiProgress};
use mansion_map_property::{
    MapData,
    display,
    manifest::{build_manifest, write_manifest},
    search::SearchIndex,
};
use mansion_map_property_models::{
    CouncilTaxBand, Dataset, TxMetric, ViewState,
    manifest::{CONSTITUENCY_FILE, MANIFEST_FILE, POSTCODE_FILE},
};
use mansion_map_server::{ServerConfig, run_server};
use mansion_map_server_models::ViewQueryParams;

#[derive(Parser)]
#[command(name = "mansion_map", about = "Mansion map data tools")]
struct Cli {
    /// Directory holding the `GeoJSON` files and manifest
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the legend for a view
    Legend {
        #[command(flatten)]
        view: ViewArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the dataset-wide maxima used by comparison bars
    Maxima {
        #[arg(long)]
        json: bool,
    },
    /// Show the tooltip and summary for a constituency code or postcode
    Inspect {
        /// Constituency code (e.g. `E14000639`) or postcode
        target: String,
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long)]
        json: bool,
    },
    /// Search constituencies, or postcodes with a place-search fallback
    Search {
        /// Query; omit with `--interactive`
        query: Option<String>,
        /// Dataset whose search mode to use (postcodes by default)
        #[arg(long)]
        dataset: Option<Dataset>,
        /// Read queries line by line from stdin; each line supersedes the
        /// previous one
        #[arg(long)]
        interactive: bool,
    },
    /// Write the data manifest for the files in the data directory
    Manifest,
    /// Start the API server
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        bind_addr: String,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

/// View selection; anything omitted takes the default view's value.
#[derive(Args)]
struct ViewArgs {
    #[arg(long)]
    dataset: Option<Dataset>,
    /// Council tax band, e.g. `band_H`
    #[arg(long)]
    band: Option<CouncilTaxBand>,
    /// Transaction metric, e.g. `tx_2m_plus_count`
    #[arg(long)]
    metric: Option<TxMetric>,
}

impl ViewArgs {
    fn view(&self) -> ViewState {
        ViewQueryParams {
            dataset: self.dataset,
            band: self.band,
            metric: self.metric,
        }
        .view()
    }
}

fn load(data_dir: &Path, multi: &MultiProgress) -> Result<MapData, Box<dyn std::error::Error>> {
    let progress = IndicatifProgress::bytes_bar(multi, "Loading map data");
    Ok(MapData::load_dir(data_dir, progress.as_ref())?)
}

fn print_json(value: &impl serde::Serialize) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = mansion_map_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Legend { view, json } => {
            let data = load(&cli.data_dir, &multi)?;
            let view = view.view();
            let legend = display::legend(&view, &data.breaks(&view));
            if json {
                print_json(&legend)?;
            } else {
                output::print_lines(&output::legend_lines(&legend));
            }
        }
        Commands::Maxima { json } => {
            let data = load(&cli.data_dir, &multi)?;
            if json {
                print_json(data.maxima())?;
            } else {
                output::print_lines(&output::maxima_lines(data.maxima()));
            }
        }
        Commands::Inspect { target, view, json } => {
            let data = load(&cli.data_dir, &multi)?;
            inspect(&data, &target, &view.view(), json)?;
        }
        Commands::Search {
            query,
            dataset,
            interactive,
        } => {
            let data = load(&cli.data_dir, &multi)?;
            let index = SearchIndex::build(&data);
            let postcode_mode = dataset.is_none_or(Dataset::is_postcode);
            if interactive {
                search::interactive(&index, postcode_mode, &multi).await?;
            } else {
                let query = query.ok_or("a query is required unless --interactive is set")?;
                search::once(&index, postcode_mode, &query, &multi).await?;
            }
        }
        Commands::Manifest => {
            let manifest = build_manifest(
                &cli.data_dir.join(CONSTITUENCY_FILE),
                &cli.data_dir.join(POSTCODE_FILE),
            );
            write_manifest(&cli.data_dir.join(MANIFEST_FILE), &manifest)?;
            print_json(&manifest)?;
        }
        Commands::Serve { bind_addr, port } => {
            let config = ServerConfig {
                bind_addr,
                port,
                data_dir: cli.data_dir,
            };
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new().block_on(run_server(config))
            })
            .await??;
        }
    }

    Ok(())
}

/// Prints the constituency with code `target`, else the postcode `target`.
fn inspect(
    data: &MapData,
    target: &str,
    view: &ViewState,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(feature) = data.constituency(target.trim()) {
        let props = &feature.properties;
        let tooltip = display::tooltip(view, props);
        let summary = display::constituency_summary(props, data.maxima(), true);
        if json {
            print_json(&serde_json::json!({ "tooltip": tooltip, "summary": summary }))?;
        } else {
            output::print_lines(&output::tooltip_lines(&tooltip));
            println!();
            output::print_lines(&output::constituency_lines(&summary));
        }
        return Ok(());
    }

    if let Some(feature) = data.postcode(target) {
        let constituency = feature
            .properties
            .pcon_code
            .as_deref()
            .and_then(|code| data.constituency(code))
            .map(|c| &c.properties);
        let summary = display::postcode_summary(&feature.properties, constituency, data.maxima());
        if json {
            print_json(&summary)?;
        } else {
            output::print_lines(&output::postcode_lines(&summary));
        }
        return Ok(());
    }

    Err(format!("No constituency or postcode matches {target:?}").into())
}
