use crate::cli::RunArgs;
use crate::config::Config;
use crate::discovery::collect_reviews;
use crate::document::PaperDocument;
use crate::logging;
use crate::output::{build_summary, print_summary, write_summary};
use crate::provider::create_agent;
use crate::runner::Orchestrator;
use anyhow::Context;
use std::path::Path;
use tracing::{info, warn};

const DEFAULT_CONFIG: &str = "reviewclash.yaml";

pub async fn execute(args: RunArgs, verbose: bool) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    // Apply CLI overrides
    if let Some(input) = args.input {
        config.input = input;
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(summary) = args.summary {
        config.summary_path = Some(summary);
    }

    config.validate()?;

    logging::init(verbose, config.debug_log.as_deref())
        .with_context(|| format!("Failed to open debug log {:?}", config.debug_log))?;

    info!("Loading papers from {:?}", config.input);
    let mut document = PaperDocument::load(&config.input)?;
    let instructions = config.instructions()?;

    if args.dry_run {
        info!("DRY RUN - no provider calls will be made");
        print_execution_plan(&config, &document);
        return Ok(());
    }

    let api_key = config.resolve_api_key(args.api_key.as_deref())?;
    let agent = create_agent(&config, api_key)?;
    let orchestrator = Orchestrator::new(&config, agent, instructions);
    let report = orchestrator.run(&mut document).await?;

    document.save(&config.output)?;
    info!("Wrote {:?}", config.output);

    let summary = build_summary(&report, &config.input, &config.output);
    print_summary(&summary);
    if let Some(path) = &config.summary_path {
        // The output document is already written; a lost summary is not fatal
        if let Err(e) = write_summary(path, &summary) {
            warn!("Failed to write summary {:?}: {}", path, e);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => Config::load(Path::new(DEFAULT_CONFIG))?,
        None => Config::default(),
    };
    Ok(config)
}

fn print_execution_plan(config: &Config, document: &PaperDocument) {
    println!("\n=== Execution Plan ===\n");
    println!("Input: {:?}", config.input);
    println!("Output: {:?}", config.output);
    println!(
        "Model: {} ({})",
        config.provider.model, config.provider.response_format
    );
    println!("Concurrency: {}", config.concurrency);
    println!("Result field: {}", config.result_field);

    println!("\nPapers:");
    for entry in document.papers() {
        let reviews = collect_reviews(&entry.record, config.review_order).len();
        let action = if reviews == 0 {
            "no reviews, empty result"
        } else {
            "extract"
        };
        println!("  - {} ({} reviews) -> {}", entry.paper_id, reviews, action);
    }
    println!();
}
