use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

use rustymesa::hr::{default_hr_view, hr_overlay, track_from_history, HrConfig};
use rustymesa::loader::open_run;
use rustymesa::quantities::ProfileXAxis;
use rustymesa::scene::{composition_figure, convection_figure, fusion_figure};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum PlotKind {
    /// HR-diagram overlay for the default viewport
    Hr,
    /// Chained circular composition figure
    Composition,
    /// Fusion-rate circular figure
    Fusion,
    /// Convective-regions circular figure
    Convection,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Compute viewer scenes from exported stellar evolution runs", long_about = None)]
struct Cli {
    /// Run directory or zipped run export
    #[arg(value_name = "RUN")]
    run: String,

    /// Scene to compute
    #[arg(long, value_enum, default_value_t = PlotKind::Hr)]
    plot: PlotKind,

    /// Model number for profile scenes (defaults to the last available)
    #[arg(long)]
    model: Option<u32>,

    /// Use the mass coordinate instead of the radius on interior plots
    #[arg(long)]
    mass_coordinate: bool,

    /// Launch the interactive HR viewer instead of printing JSON
    #[cfg(feature = "egui")]
    #[arg(long)]
    view: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = Utf8PathBuf::from(&cli.run);
    let run = open_run(&path).with_context(|| format!("Failed to load run {}", path))?;

    #[cfg(feature = "egui")]
    if cli.view {
        return rustymesa::viewer::run_viewer(&run.history);
    }

    let json = match cli.plot {
        PlotKind::Hr => {
            let track = track_from_history(&run.history)?;
            let view = default_hr_view(1280.0, 720.0);
            let overlay = hr_overlay(&view, &track, cli.model, &HrConfig::default());
            serde_json::to_string_pretty(&overlay)?
        }
        PlotKind::Composition | PlotKind::Fusion | PlotKind::Convection => {
            let model = cli
                .model
                .or_else(|| run.history.model_numbers_available.last().copied())
                .context("run has no profiles")?;
            let profile = run
                .profile(model)
                .with_context(|| format!("no profile for model {}", model))?;
            let xaxis = if cli.mass_coordinate {
                ProfileXAxis::MassCoordinate
            } else {
                ProfileXAxis::Radius
            };
            let figure = match cli.plot {
                PlotKind::Composition => composition_figure(profile, &run.history, xaxis)?,
                PlotKind::Fusion => fusion_figure(profile, &run.history, xaxis)?,
                _ => convection_figure(profile, &run.history, xaxis)?,
            };
            serde_json::to_string_pretty(&figure)?
        }
    };
    println!("{}", json);
    Ok(())
}
