/*
    eblc: Kepler eclipsing binary light curves for ELC
    Oct - 16 - 2026
 */

mod commands;
mod config;
mod data_access;
mod error;
mod folding;
mod plotting;
mod statistical_methods;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;

use config::Config;

const DEFAULT_CONFIG: &str = "eblc.toml";

#[derive(Parser, Debug)]
#[command(name = "eblc", version, about = "Kepler eclipsing binary light curve preparation")]
struct Cli {
    /// TOML configuration file; `eblc.toml` is used when present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Orbital period in days.
    #[arg(long)]
    period: Option<f64>,

    /// Primary eclipse mid-time, full BJD.
    #[arg(long)]
    bjd0: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cotrend, normalize and stitch every quarter into one light curve.
    Stitch,
    /// Write the ELC input files: the whole light curve and one file per eclipse pair.
    ElcPrep {
        #[arg(long)]
        infile: Option<PathBuf>,
        #[arg(long)]
        outstub: Option<String>,
        #[arg(long)]
        phasemin: Option<f64>,
        #[arg(long)]
        phasemax: Option<f64>,
    },
    /// Plot the whole, folded and zoomed light curve.
    Figure {
        #[arg(long)]
        infile: Option<PathBuf>,
    },
    /// Plot the oscillation spectrum next to its seismic twin.
    Twin,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to read config {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).exists() => Config::load(Path::new(DEFAULT_CONFIG))
            .with_context(|| format!("failed to read config {DEFAULT_CONFIG}")),
        None => {
            info!("No {DEFAULT_CONFIG} found, using built-in defaults");
            Ok(Config::default())
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(period) = cli.period {
        config.target.period = period;
    }
    if let Some(bjd0) = cli.bjd0 {
        config.target.bjd0 = bjd0;
    }
    match &cli.command {
        Command::ElcPrep {
            infile,
            outstub,
            phasemin,
            phasemax,
        } => {
            if let Some(infile) = infile {
                config.elc.infile = infile.clone();
            }
            if let Some(outstub) = outstub {
                config.elc.outstub = outstub.clone();
            }
            if let Some(phasemin) = phasemin {
                config.elc.phasemin = *phasemin;
            }
            if let Some(phasemax) = phasemax {
                config.elc.phasemax = *phasemax;
            }
        }
        Command::Figure { infile: Some(infile) } => config.figure.infile = infile.clone(),
        _ => {}
    }
    config.validate().context("invalid configuration")?;

    info!(
        "KIC {}: period {} d, BJD0 {}",
        config.target.kic, config.target.period, config.target.bjd0
    );

    match cli.command {
        Command::Stitch => {
            let report = commands::stitch::run(&config).context("stitching failed")?;
            info!(
                "Stitched {} quarters, {} points, Kepler magnitude {:.3}",
                report.quarters, report.points, report.kepmag
            );
            for (name, lineup) in [("SAP", &report.sap_lineup), ("CBV", &report.cbv_lineup)] {
                info!(
                    "{name} gaps: {} passes, largest remaining jump {:.1}{}",
                    lineup.iterations,
                    lineup.largest_jump,
                    if lineup.converged { "" } else { " (not converged)" }
                );
            }
        }
        Command::ElcPrep { .. } => {
            let report = commands::elc_prep::run(&config).context("ELC preparation failed")?;
            info!("{} points in {} chunks", report.points, report.chunks);
        }
        Command::Figure { .. } => {
            commands::figure::run(&config).context("figure failed")?;
        }
        Command::Twin => {
            commands::twin::run(&config).context("twin plot failed")?;
        }
    }
    Ok(())
}
