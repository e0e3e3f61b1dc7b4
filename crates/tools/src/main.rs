use std::env;
use std::path::{Path, PathBuf};

use catalog::prefs::Preferences;
use catalog::{CountryCatalog, DEFAULT_COUNTRIES_URL, Region};
use clap::{Parser, Subcommand};
use runtime::presentation::Speed;
use scene::export_file_name;
use tools::{
    OutputFormat, RenderRequest, build_network, collect_destinations, list_countries,
    load_catalog, open_prefs, presentation_order, presentation_timeline, render,
    resolve_country, show_prefs,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Delivery network map renderer")]
struct Args {
    /// Fetch the world country dataset instead of using only the embedded table.
    #[arg(long, default_value_t = false)]
    remote: bool,

    /// Country dataset URL (or set DELIVERYMAP_COUNTRIES_URL).
    #[arg(long)]
    countries_url: Option<String>,

    /// Preference file (or set DELIVERYMAP_PREFS).
    #[arg(long)]
    prefs: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a network and write it as JSON or SVG.
    Render {
        /// Origin country; defaults to the saved origin.
        #[arg(long)]
        origin: Option<String>,
        /// Destination countries.
        destinations: Vec<String>,
        /// Add every available country of a region.
        #[arg(long)]
        region: Option<String>,
        #[arg(long, default_value_t = false)]
        labels: bool,
        /// Fixed zoom level; omitted, the view is fitted to all points.
        #[arg(long)]
        zoom: Option<f64>,
        #[arg(long, default_value = "svg")]
        format: String,
        /// Output file or directory; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value_t = 1200)]
        width: u32,
        #[arg(long, default_value_t = 800)]
        height: u32,
        /// Date used in generated file names, e.g. 2024-05-01.
        #[arg(long)]
        date: Option<String>,
    },
    /// List known countries with flags and label abbreviations.
    Countries {
        #[arg(long)]
        region: Option<String>,
    },
    /// Inspect or change saved preferences.
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
    /// Print the timeline of a presentation run.
    Present {
        countries: Vec<String>,
        #[arg(long)]
        origin: Option<String>,
        #[arg(long)]
        region: Option<String>,
        #[arg(long, default_value = "medium")]
        speed: String,
        #[arg(long, default_value_t = false)]
        labels: bool,
    },
}

#[derive(Subcommand, Debug)]
enum PrefsAction {
    Show,
    SetOrigin { country: String },
    SetZoomThreshold { value: f64 },
    ResetZoomThreshold,
    SetPanelWidth { width: String },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main(Args::parse()).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn real_main(args: Args) -> Result<(), String> {
    let prefs_path = args.prefs.clone().unwrap_or_else(|| {
        env::var("DELIVERYMAP_PREFS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("deliverymap-prefs.json"))
    });
    let (store, mut prefs) = open_prefs(&prefs_path);

    let catalog = if args.remote {
        let url = args.countries_url.clone().unwrap_or_else(|| {
            env::var("DELIVERYMAP_COUNTRIES_URL")
                .unwrap_or_else(|_| DEFAULT_COUNTRIES_URL.to_string())
        });
        let client = reqwest::Client::new();
        load_catalog(&client, &url).await
    } else {
        CountryCatalog::embedded()
    };

    match args.command {
        Command::Render {
            origin,
            destinations,
            region,
            labels,
            zoom,
            format,
            out,
            title,
            width,
            height,
            date,
        } => {
            let format = parse_format(&format)?;
            let origin = pick_origin(&catalog, origin, &prefs)?;
            let region = parse_region(region.as_deref())?;
            let destinations =
                collect_destinations(&catalog, &destinations, region, Some(origin.as_str()))?;
            let request = RenderRequest {
                origin,
                destinations,
                labels,
                zoom,
                zoom_threshold: prefs.zoom_threshold,
                width,
                height,
            };
            let network = build_network(&catalog, &request)?;
            let body = render(&network, format, title.as_deref(), width, height)?;
            match out {
                Some(out) => {
                    let path = output_path(&out, title.as_deref(), date.as_deref(), format);
                    tokio::fs::write(&path, body)
                        .await
                        .map_err(|e| format!("write {}: {e}", path.display()))?;
                    info!(path = %path.display(), "network written");
                    println!("{}", path.display());
                }
                None => print!("{body}"),
            }
        }
        Command::Countries { region } => {
            let region = parse_region(region.as_deref())?;
            print!("{}", list_countries(&catalog, region));
        }
        Command::Prefs { action } => match action {
            PrefsAction::Show => print!("{}", show_prefs(&prefs)),
            PrefsAction::SetOrigin { country } => {
                let mut store = store?;
                prefs.origin_id = Some(resolve_country(&catalog, &country)?);
                prefs.save(&mut store).map_err(|e| e.to_string())?;
                print!("{}", show_prefs(&prefs));
            }
            PrefsAction::SetZoomThreshold { value } => {
                let mut store = store?;
                prefs
                    .set_zoom_threshold(value, &mut store)
                    .map_err(|e| e.to_string())?;
                print!("{}", show_prefs(&prefs));
            }
            PrefsAction::ResetZoomThreshold => {
                let mut store = store?;
                prefs
                    .reset_zoom_threshold(&mut store)
                    .map_err(|e| e.to_string())?;
                print!("{}", show_prefs(&prefs));
            }
            PrefsAction::SetPanelWidth { width } => {
                let mut store = store?;
                prefs
                    .set_panel_width(&width, &mut store)
                    .map_err(|e| e.to_string())?;
                print!("{}", show_prefs(&prefs));
            }
        },
        Command::Present {
            countries,
            origin,
            region,
            speed,
            labels,
        } => {
            let origin = pick_origin(&catalog, origin, &prefs)?;
            let region = parse_region(region.as_deref())?;
            let countries =
                collect_destinations(&catalog, &countries, region, Some(origin.as_str()))?;
            let speed: Speed = speed.parse().unwrap_or_default();
            if let Some((order, interval_ms)) = presentation_order(countries.clone(), speed) {
                info!(count = order.len(), interval_ms, "presenting");
            }
            print!(
                "{}",
                presentation_timeline(&catalog, &origin, countries, speed, labels)?
            );
        }
    }
    Ok(())
}

fn pick_origin(
    catalog: &CountryCatalog,
    origin: Option<String>,
    prefs: &Preferences,
) -> Result<String, String> {
    let raw = origin
        .or_else(|| prefs.origin_id.clone())
        .ok_or_else(|| "no origin: pass --origin or run `prefs set-origin`".to_string())?;
    resolve_country(catalog, &raw)
}

fn parse_region(raw: Option<&str>) -> Result<Option<Region>, String> {
    raw.map(|r| r.parse::<Region>().map_err(|e| e.to_string()))
        .transpose()
}

fn parse_format(raw: &str) -> Result<OutputFormat, String> {
    match raw.to_ascii_lowercase().as_str() {
        "json" => Ok(OutputFormat::Json),
        "svg" => Ok(OutputFormat::Svg),
        other => Err(format!("unknown format: {other} (expected json or svg)")),
    }
}

/// A directory gets a generated file name; anything else is used as given.
fn output_path(
    out: &Path,
    title: Option<&str>,
    date: Option<&str>,
    format: OutputFormat,
) -> PathBuf {
    if !out.is_dir() {
        return out.to_path_buf();
    }
    let ext = match format {
        OutputFormat::Json => "json",
        OutputFormat::Svg => "svg",
    };
    out.join(export_file_name(title.unwrap_or(""), date, ext))
}
