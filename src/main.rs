mod audio;
mod cli;
mod config;
mod intensity;
mod track;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use audio::descriptors::SpectralDescriptors;
use audio::features::Descriptor;
use cli::Cli;
use intensity::{IntensityOptions, IntensityReport, NormalizationMode, ReferenceStrategy};
use track::Track;

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    // Config values apply only when the CLI is at its default
    let config_path = cli.config.clone().or_else(config::find_config);
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            let analysis = cfg.analysis;
            if cli.sections == 10 { cli.sections = analysis.sections; }
            if cli.mode == NormalizationMode::LogScaled { cli.mode = analysis.mode; }
            if cli.reference == ReferenceStrategy::Track { cli.reference = analysis.reference; }
            if cli.jobs == 0 { cli.jobs = analysis.jobs; }
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    if cli.jobs > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.jobs)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    if !cli.input.exists() {
        anyhow::bail!("Input file not found: {}", cli.input.display());
    }

    let spinner = if cli.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));

    spinner.set_message(format!("Decoding {}", cli.input.display()));
    let mut track = Track::load(&cli.input)
        .with_context(|| format!("Failed to decode {}", cli.input.display()))?;
    if cli.title.is_some() {
        track.metadata.title = cli.title.take();
    }
    if cli.artist.is_some() {
        track.metadata.artist = cli.artist.take();
    }
    log::info!(
        "Track: {} ({:.1}s @ {}Hz)",
        track,
        track.audio.duration_secs(),
        track.audio.sample_rate
    );

    let options = IntensityOptions {
        section_count: cli.sections,
        mode: cli.mode,
        reference: cli.reference,
        parallel: true,
    };

    spinner.set_message(format!("Analyzing {} sections", options.section_count.max(1)));
    let report = intensity::compute_intensity(&track, &options, &SpectralDescriptors);
    spinner.finish_and_clear();

    if cli.json {
        let output = serde_json::json!({
            "path": track.path.display().to_string(),
            "metadata": track.metadata,
            "sample_rate": track.audio.sample_rate,
            "duration_secs": track.audio.duration_secs(),
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if cli.breakdown {
        print_breakdown(&report);
        println!();
    }
    println!("Heavy score for {}: {:.2}", track, report.score);
    Ok(())
}

/// Print the reference scale and a per-section score table.
fn print_breakdown(report: &IntensityReport) {
    match report.reference {
        Some(reference) => {
            println!("Reference ({:?}):", report.strategy);
            for (descriptor, value) in reference.descriptors().iter() {
                println!("  {:<20} {:>10.4}", descriptor.label(), value);
            }
        }
        None => println!("Reference: each section against itself (legacy)"),
    }
    println!();

    println!(
        "{:>4} {:>10} {:>10}  {:>6} {:>6} {:>6} {:>6} {:>6}  {:>7}",
        "#", "Start", "End", "Eng", "Cen", "ZCR", "Rng", "Tmp", "Score"
    );
    println!("{}", "-".repeat(74));
    for (i, s) in report.sections.iter().enumerate() {
        let n = |d: Descriptor| s.normalized.get(d);
        println!(
            "{:>4} {:>10} {:>10}  {:>6.3} {:>6.3} {:>6.3} {:>6.3} {:>6.3}  {:>7.2}",
            i + 1,
            s.section.start,
            s.section.end,
            n(Descriptor::Energy),
            n(Descriptor::SpectralCentroid),
            n(Descriptor::ZeroCrossingRate),
            n(Descriptor::DynamicRange),
            n(Descriptor::Tempo),
            s.score,
        );
    }
    println!();
    println!("Columns are normalized descriptors ({:?} mode)", report.mode);
}
