use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

use waste_viz::config::{Config, FORMAT_JSON, FORMAT_SVG};
use waste_viz::{
    DashboardEvent, DashboardState, WasteVizError, load_cached, on_interaction, save_chart,
    save_chart_json,
};

/// Visualize waste production per sector and the effect of improvement actions.
#[derive(Parser, Debug)]
#[command(name = "waste_viz", version)]
struct Args {
    /// Path to the waste CSV (Sector,Disposed,Recycle,Organics,Other)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Optional TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sector to render charts for
    #[arg(long)]
    sector: Option<String>,

    /// Improvement action label to enable (repeatable)
    #[arg(long = "enable", value_name = "LABEL")]
    enable: Vec<String>,

    /// Directory for generated charts
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Output format: svg or json
    #[arg(long)]
    format: Option<String>,

    /// List the sectors present in the dataset and exit
    #[arg(long)]
    list_sectors: bool,

    /// List the available improvement actions and exit
    #[arg(long)]
    list_actions: bool,
}

fn main() -> Result<()> {
    // Initialize logger - defaults to RUST_LOG if set, otherwise INFO
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    if let Some(data) = args.data {
        config.data.csv_path = data;
    }
    if let Some(dir) = args.output_dir {
        config.output.dir = dir;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    config.validate()?;

    let table = load_cached(&config.data.csv_path)?;
    info!(
        "Loaded {} sectors from {}",
        table.len(),
        config.data.csv_path.display()
    );

    let catalog = config.catalog()?;

    if args.list_sectors {
        for sector in table.sectors() {
            println!("{sector}");
        }
        return Ok(());
    }

    if args.list_actions {
        for action in catalog.actions() {
            println!(
                "{} ({}% reduction of {})",
                action.label,
                action.percent(),
                action.waste_type
            );
        }
        return Ok(());
    }

    let Some(sector) = args.sector else {
        info!("No sector selected; nothing to render. Use --sector, or --list-sectors to see choices.");
        return Ok(());
    };
    // The CLI has no selector widget to populate, so an unknown sector is a
    // reportable error rather than a silent skip.
    if !table.contains_sector(&sector) {
        return Err(WasteVizError::UnknownSector(sector).into());
    }

    let mut state = DashboardState::new();
    state.apply(DashboardEvent::SelectSector(Some(sector.clone())));
    for label in &args.enable {
        let action = catalog
            .find_by_label(label)
            .ok_or_else(|| WasteVizError::UnknownAction(label.clone()))?;
        info!(
            "Enabling '{}' ({}% reduction of {})",
            action.label,
            action.percent(),
            action.waste_type
        );
        state.apply(DashboardEvent::SetAction {
            waste_type: action.waste_type,
            label: action.label.clone(),
            active: true,
        });
    }

    let Some(output) = on_interaction(&state, table, &catalog) else {
        warn!("Nothing to render for sector '{sector}'");
        return Ok(());
    };

    let dir = &config.output.dir;
    let (overview_path, comparison_path) = match config.output.format.as_str() {
        FORMAT_JSON => (
            save_chart_json(&output.overview, dir, "overview")?,
            save_chart_json(&output.comparison, dir, "comparison")?,
        ),
        FORMAT_SVG => (
            save_chart(&output.overview, dir, "overview")?,
            save_chart(&output.comparison, dir, "comparison")?,
        ),
        other => {
            return Err(WasteVizError::Config(format!("Invalid output format: {other}")).into());
        }
    };

    info!("Overview chart saved to: {}", overview_path.display());
    info!("Comparison chart saved to: {}", comparison_path.display());

    let current = output.comparison.groups[0].total();
    let improved = output.comparison.groups[1].total();
    info!("Current total: {current:.2} tons/employee/year");
    info!("Improved total: {improved:.2} tons/employee/year");
    if current > 0.0 {
        info!("Potential reduction: {:.1}%", (1.0 - improved / current) * 100.0);
    }

    Ok(())
}
