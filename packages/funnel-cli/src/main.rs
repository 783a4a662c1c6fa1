//! Command-line front end for the funnel ad generator.
//!
//! Reads campaign inputs from flags, credentials from the environment, runs
//! the pipeline and writes the transparency report and ad workbook.

use ad_funnel::{
    Artifact, CampaignInput, Config, ContentCount, Document, FunnelGenerator, FunnelObjective,
    StatusEvent, StatusLevel, StatusLog,
};
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "funnel")]
#[command(about = "Generate funnel-stage ad copy for Email, LinkedIn, Facebook and Google")]
struct Cli {
    /// Company name (used in prompts, the report and output file names)
    #[arg(long)]
    company: String,

    /// Link to the demo booking or sales meeting page
    #[arg(long)]
    booking_link: String,

    /// Client website to pull company context from
    #[arg(long)]
    url: Option<String>,

    /// Additional company context (PDF or PPTX)
    #[arg(long, value_name = "FILE")]
    context_file: Option<PathBuf>,

    /// Lead magnet document (PDF)
    #[arg(long, value_name = "FILE")]
    lead_magnet: Option<PathBuf>,

    /// Funnel objective: "Demo Booking" or "Sales Meeting"
    #[arg(long, default_value = "Demo Booking")]
    objective: FunnelObjective,

    /// Destination for Brand Awareness ads
    #[arg(long, default_value = "")]
    learn_more_link: String,

    /// Destination for Demand Gen ads
    #[arg(long, default_value = "")]
    lead_magnet_link: String,

    /// Ad variations per funnel stage
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=20))]
    count: u32,

    /// Directory the report and workbook are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Environment file to load instead of ./.env
    #[arg(long, value_name = "FILE")]
    env_file: Option<PathBuf>,
}

impl Cli {
    fn campaign(&self) -> Result<CampaignInput> {
        let mut input = CampaignInput::new(&self.company, &self.booking_link)
            .with_objective(self.objective)
            .with_learn_more_link(&self.learn_more_link)
            .with_lead_magnet_link(&self.lead_magnet_link)
            .with_content_count(ContentCount::new(self.count)?);

        if let Some(url) = &self.url {
            input = input.with_client_url(url);
        }
        if let Some(path) = &self.context_file {
            input = input.with_additional_context(read_document(path)?);
        }
        if let Some(path) = &self.lead_magnet {
            input = input.with_lead_magnet(read_document(path)?);
        }

        input.validate()?;
        Ok(input)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load the environment first so RUST_LOG from it reaches the filter
    load_env(cli.env_file.as_deref())?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ad_funnel=debug,openai_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();

    let input = cli.campaign()?;
    tracing::info!(
        company = %input.company_name,
        objective = input.objective.label(),
        count = cli.count,
        "Starting funnel ad generation"
    );

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(model = config.model(), "Configuration loaded");
    let generator =
        FunnelGenerator::from_config(&config).context("Failed to create text extractors")?;

    let log = StatusLog::new().with_observer(print_event);
    let result = generator
        .run_with_log(&input, log)
        .await
        .context("Ad generation failed")?;

    let written = write_artifacts(result.artifacts(), &cli.out_dir)?;
    tracing::info!(files = written.len(), out_dir = %cli.out_dir.display(), "Artifacts written");
    for path in &written {
        println!("{} {}", "✓ Wrote".green(), path.display());
    }

    let placeholders = result.run.placeholder_count();
    if placeholders > 0 {
        println!(
            "{}",
            format!(
                "⚠ {} of {} ads are placeholders; see the messages above",
                placeholders,
                result.run.record_count()
            )
            .yellow()
        );
    }
    if !result.is_complete() {
        anyhow::bail!("not every artifact could be produced");
    }
    Ok(())
}

fn load_env(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }
    Ok(())
}

fn read_document(path: &Path) -> Result<Document> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Document::new(name, bytes))
}

fn write_artifacts<'a>(
    artifacts: impl Iterator<Item = &'a Artifact>,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    artifacts
        .map(|artifact| {
            let path = out_dir.join(&artifact.file_name);
            std::fs::write(&path, &artifact.bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(path)
        })
        .collect()
}

fn print_event(event: &StatusEvent) {
    let line = event.to_string();
    match event.level {
        StatusLevel::Info => println!("{}", line.dimmed()),
        StatusLevel::Warning => println!("{}", line.yellow()),
        StatusLevel::Error => println!("{}", line.red()),
    }
}
