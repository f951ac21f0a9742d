use anyhow::{Context, Result};
use clap::Parser;
use simlens::analysis::Analysis;
use simlens::cli::{AnalyzeArgs, Cli, Command, IngestArgs, OutputFormat};
use simlens::config::AnalysisConfig;
use simlens::gem5_stats::{self, MetricSelection};
use simlens::record::LoadMode;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Apply command-line overrides on top of the file configuration
fn apply_analyze_overrides(config: &mut AnalysisConfig, args: &AnalyzeArgs) -> Result<()> {
    if args.summary && args.format == OutputFormat::Json {
        anyhow::bail!(
            "--summary only applies to the text report. The JSON report already carries the baseline and label lists."
        );
    }
    if let Some(field) = &args.throughput_field {
        config.fields.throughput = field.clone();
    }
    if let Some(field) = &args.duration_field {
        config.fields.duration = field.clone();
    }
    if args.lenient {
        config.mode = LoadMode::Lenient;
    }
    if args.annotate {
        config.plot.annotate = true;
    }
    if let Some(title) = &args.title {
        config.plot.title = Some(title.clone());
    }
    if let Some(plot) = &args.plot {
        config.plot.output = Some(plot.clone());
    }
    config.validate()?;
    Ok(())
}

fn run_analyze(mut config: AnalysisConfig, args: &AnalyzeArgs) -> Result<()> {
    apply_analyze_overrides(&mut config, args)?;

    let analysis = Analysis::load(&args.artifact, &config)
        .with_context(|| format!("Failed to analyze {}", args.artifact.display()))?;
    let labels = config.metric_labels();

    match args.format {
        OutputFormat::Text => {
            print!("{}", analysis.report_text(&labels));
            if args.summary {
                println!();
                print!("{}", analysis.aggregate_text(&labels));
            }
        }
        OutputFormat::Json => {
            let json = analysis
                .report_json()
                .context("Failed to serialize JSON report")?;
            println!("{}", json);
        }
    }

    if let Some(target) = &config.plot.output {
        analysis
            .render_plot(&config.scatter_options(), target)
            .with_context(|| format!("Failed to render plot {}", target.display()))?;
        eprintln!("Plot written to {}", target.display());
    }

    Ok(())
}

fn run_ingest(mut config: AnalysisConfig, args: &IngestArgs) -> Result<()> {
    if args.all_metrics {
        config.ingest.all_metrics = true;
    }

    let run_id = match (&args.run_id, &args.script) {
        (Some(id), _) => id.clone(),
        (None, Some(script)) => gem5_stats::run_id_from_script(script).with_context(|| {
            format!("Script path has no file name: {}", script.display())
        })?,
        (None, None) => {
            anyhow::bail!("Must specify either --run-id ID or --script PATH");
        }
    };

    let selection: MetricSelection = config.metric_selection();
    let stored = gem5_stats::ingest(&args.stats, &args.artifact, &run_id, &selection)
        .with_context(|| format!("Failed to ingest {}", args.stats.display()))?;

    eprintln!(
        "Stored {} metrics for '{}' in {}",
        stored,
        run_id,
        args.artifact.display()
    );
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };

    match &args.command {
        Command::Analyze(analyze) => run_analyze(config, analyze),
        Command::Ingest(ingest) => run_ingest(config, ingest),
    }
}
