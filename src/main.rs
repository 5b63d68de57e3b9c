//! tops-forecast - Stratigraphic Top Depth Forecast
//!
//! Runs one forecast per invocation: calibrates the reference well, propagates
//! the prognosis well, prints both tables and exports the workbook.
//!
//! # Usage
//!
//! ```bash
//! # Demo grids with the default uncertainties
//! cargo run --release
//!
//! # Analyst grids exported as CSV
//! ./tops-forecast --reference ref.csv --prognosis prog.csv --base-depth 1927
//!
//! # Check against the drilled well and print JSON
//! ./tops-forecast --config pozo.toml --actual real.csv --json
//! ```
//!
//! # Environment Variables
//!
//! - `TOPS_CONFIG`: Path to the analysis TOML (default: ./tops_config.toml)
//! - `RUST_LOG`: Logging level (default: info)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use tops_forecast::config::{self, AnalysisConfig};
use tops_forecast::{
    compare_with_actual, export_workbook, predict, tables, ActualResidual, DepthPrediction,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "tops-forecast")]
#[command(about = "Forecast stratigraphic top depths with a propagated uncertainty band")]
#[command(version)]
struct CliArgs {
    /// Analysis config TOML (uncertainties, anchor depth, inline tables)
    #[arg(long, env = "TOPS_CONFIG")]
    config: Option<PathBuf>,

    /// Reference well CSV (Surf, Cima, TVDSS (m), TWT (s), Vavg (m/s))
    #[arg(long)]
    reference: Option<PathBuf>,

    /// Prognosis well CSV (Superficie, Cima, TWT Pred (s), Vavg (m/s))
    #[arg(long)]
    prognosis: Option<PathBuf>,

    /// Drilled-well validation series CSV (TWT (s), TVDSS (m))
    #[arg(long)]
    actual: Option<PathBuf>,

    /// Two-way time uncertainty (s)
    #[arg(long)]
    delta_t: Option<f64>,

    /// Average velocity uncertainty (m/s)
    #[arg(long)]
    delta_v: Option<f64>,

    /// Fixed residual depth uncertainty (m)
    #[arg(long)]
    delta_err: Option<f64>,

    /// TVDSS of the first prognosis top (m)
    #[arg(long, allow_hyphen_values = true)]
    base_depth: Option<f64>,

    /// Workbook file stem
    #[arg(long)]
    name: Option<String>,

    /// Directory the workbook is written into
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Skip writing the workbook
    #[arg(long)]
    no_export: bool,

    /// Print the result as JSON instead of text tables
    #[arg(long)]
    json: bool,

    /// Emit log lines as JSON on stderr
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Print the effective configuration (after CLI overrides) as TOML
    PrintConfig,
}

// ============================================================================
// Configuration
// ============================================================================

fn resolve_config(args: &CliArgs) -> Result<AnalysisConfig> {
    let mut cfg = match &args.config {
        Some(path) => AnalysisConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::load().context("Failed to load analysis config")?,
    };

    if let Some(v) = args.delta_t {
        cfg.uncertainty.delta_t_s = v;
    }
    if let Some(v) = args.delta_v {
        cfg.uncertainty.delta_v_m_s = v;
    }
    if let Some(v) = args.delta_err {
        cfg.uncertainty.delta_err_m = v;
    }
    if let Some(v) = args.base_depth {
        cfg.analysis.base_tvdss_m = v;
    }
    if let Some(name) = &args.name {
        cfg.export.file_name.clone_from(name);
    }
    if let Some(dir) = &args.export_dir {
        cfg.export.directory.clone_from(dir);
    }

    cfg.validate().context("Invalid analysis settings")?;
    Ok(cfg)
}

// ============================================================================
// Output
// ============================================================================

fn print_tables(prediction: &DepthPrediction) {
    let cfg = config::get();
    println!("=== {} ===", cfg.analysis.name);
    println!(
        "  Anchor:      {:.1} m TVDSS",
        cfg.analysis.base_tvdss_m
    );
    println!(
        "  Uncertainty: dt={:.3} s  dv={:.1} m/s  derr={:.1} m",
        cfg.uncertainty.delta_t_s, cfg.uncertainty.delta_v_m_s, cfg.uncertainty.delta_err_m
    );

    println!();
    println!("Referencia");
    println!(
        "  {:<24} {:<10} {:>9} {:>7} {:>7} {:>9} {:>9} {:>8}",
        "Top", "Surface", "TVDSS", "TWT", "Vavg", "Thk", "SeisThk", "Err %"
    );
    for r in &prediction.reference {
        println!(
            "  {:<24} {:<10} {:>9.1} {:>7.3} {:>7.0} {:>9.1} {:>9.1} {:>8.2}",
            r.top_name,
            r.surface_type,
            r.tvdss_depth,
            r.two_way_time,
            r.avg_velocity,
            r.true_thickness,
            r.seismic_thickness,
            r.relative_error_pct
        );
    }

    println!();
    println!("Pronostico");
    println!(
        "  {:<24} {:>7} {:>9} {:>9} {:>9} {:>7} {:>9} {:>9}",
        "Top", "TWT", "Base", "Shallow", "Deep", "Sigma", "Min", "Max"
    );
    for r in &prediction.prognosis {
        println!(
            "  {:<24} {:>7.3} {:>9.1} {:>9.1} {:>9.1} {:>7.1} {:>9.1} {:>9.1}",
            r.top_name,
            r.predicted_two_way_time,
            r.predicted_base_depth,
            r.predicted_shallow_depth,
            r.predicted_deep_depth,
            r.cumulative_sigma,
            r.predicted_min_depth,
            r.predicted_max_depth
        );
    }
}

fn print_residuals(residuals: &[ActualResidual]) {
    println!();
    println!("Pozo real");
    println!(
        "  {:>7} {:>9} {:>9} {:>9} {:>7}",
        "TWT", "Actual", "Base", "Resid", "Band"
    );
    for r in residuals {
        println!(
            "  {:>7.3} {:>9.1} {:>9.1} {:>9.1} {:>7}",
            r.two_way_time,
            r.actual_tvdss,
            r.predicted_base_depth,
            r.residual,
            if r.within_band { "in" } else { "OUT" }
        );
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if args.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
    config::init(resolve_config(&args)?);
    let cfg = config::get();

    if matches!(args.command, Some(SubCommand::PrintConfig)) {
        print!("{}", cfg.to_toml()?);
        return Ok(());
    }

    let reference = match &args.reference {
        Some(path) => tables::read_reference_csv(path)?,
        None => cfg.reference_rows(),
    };
    let prognosis = match &args.prognosis {
        Some(path) => tables::read_prognosis_csv(path)?,
        None => cfg.prognosis_rows(),
    };
    let actual = match &args.actual {
        Some(path) => tables::read_actual_csv(path)?,
        None => cfg.actual.clone(),
    };

    let prediction = predict(
        &reference,
        &prognosis,
        &cfg.uncertainty_model(),
        cfg.analysis.base_tvdss_m,
    )
    .context("Depth prediction failed")?;

    let unmatched: Vec<&str> = prediction.unmatched_tops().collect();
    if !unmatched.is_empty() {
        warn!(tops = ?unmatched, "Prognosis tops without reference calibration were forecast with zero error");
    }

    let residuals = compare_with_actual(&prediction.prognosis, &actual);

    if args.json {
        let out = serde_json::json!({
            "analysis": cfg.analysis.name,
            "prediction": &prediction,
            "actual_residuals": &residuals,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_tables(&prediction);
        if !residuals.is_empty() {
            print_residuals(&residuals);
        }
    }

    if args.no_export {
        info!("Workbook export skipped");
    } else {
        let paths = export_workbook(&cfg.export.directory, &cfg.export.file_name, &prediction)
            .context("Workbook export failed")?;
        info!(
            prognosis = %paths.prognosis_csv.display(),
            reference = %paths.reference_csv.display(),
            json = %paths.json.display(),
            "Workbook written"
        );
    }

    Ok(())
}
