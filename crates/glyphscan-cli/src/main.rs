// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Glyphscan — extract and label hand-drawn pictograms from scanned grid forms.
//
// Entry point. Initialises logging, resolves the pipeline configuration,
// loads the template library and runs the batch.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use glyphscan_core::config::{Preset, SizeMetric};
use glyphscan_core::error::{GlyphscanError, Result};
use glyphscan_core::human_errors::humanize_error;
use glyphscan_core::PipelineConfig;
use glyphscan_document::{
    BatchReport, FormPipeline, ImageprocDetector, ImageprocMatcher, OutputRecorder,
    TemplateLibrary,
};

#[derive(Debug, Parser)]
#[command(name = "glyphscan")]
#[command(about = "Crop and label every cell of scanned pictogram grid forms")]
#[command(version)]
struct Cli {
    /// Directory holding the 17 reference images (`fire.png`, ..., `small.png`).
    #[arg(long, required_unless_present = "print_config")]
    templates: Option<PathBuf>,

    /// Directory for cell crops and metadata files. Created if missing.
    #[arg(long, required_unless_present = "print_config")]
    output: Option<PathBuf>,

    /// JSON configuration file. Replaces the preset; missing fields take defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Named threshold set.
    #[arg(long, value_enum, default_value_t = PresetArg::Current)]
    preset: PresetArg,

    /// Override the candidate size metric.
    #[arg(long, value_enum)]
    metric: Option<MetricArg>,

    /// Also write `{scripter}{page}_overlay.png` showing the detected grid.
    #[arg(long)]
    overlay: bool,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,

    /// Scans to process, each inside a `w<NNN>-scans` directory.
    #[arg(required_unless_present = "print_config")]
    images: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PresetArg {
    Current,
    Legacy,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Current => Preset::Current,
            PresetArg::Legacy => Preset::Legacy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MetricArg {
    LiteralXor,
    Euclidean,
}

impl From<MetricArg> for SizeMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::LiteralXor => SizeMetric::LiteralXor,
            MetricArg::Euclidean => SizeMetric::Euclidean,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let human = humanize_error(&err);
            tracing::error!(error = %err, "Run aborted");
            eprintln!("error: {}", human.message);
            eprintln!("  hint: {}", human.suggestion);
            eprintln!("  detail: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = effective_config(cli)?;
    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let report = run_batch(cli, config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Preset or config file, then command-line overrides.
fn effective_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::preset(cli.preset.into()),
    };
    if let Some(metric) = cli.metric {
        config.filter.metric = metric.into();
    }
    config.validate()?;
    Ok(config)
}

fn run_batch(cli: &Cli, config: PipelineConfig) -> Result<BatchReport> {
    let (Some(templates), Some(output)) = (&cli.templates, &cli.output) else {
        return Err(GlyphscanError::Config(
            "--templates and --output are required".into(),
        ));
    };

    tracing::info!(images = cli.images.len(), "Glyphscan starting");

    let library = Arc::new(TemplateLibrary::load(templates)?);
    let recorder = OutputRecorder::new(output)?;
    let pipeline = FormPipeline::new(
        config,
        ImageprocDetector::default(),
        ImageprocMatcher,
        library,
        recorder,
    )
    .with_overlay(cli.overlay);

    pipeline.run_batch(&cli.images)
}
