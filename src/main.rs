use anyhow::{bail, Context};
use clap::Parser;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use twinfinder::{cli, config, error, gemini, progress, report, source};
use cli::{Cli, Commands};
use config::Config;
use twinfinder_common::{
    run_comparison_with, ComparisonState, ComparisonView, ImageSlot, Outcome, RunOptions,
    StateHandle,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load().context("failed to load config")?;

    match cli.command {
        Commands::Compare { first, second, output, save_highlights } => {
            println!("🔍 TwinFinder - image comparison\n");
            let options = RunOptions { highlight: true };
            let view = compare(&config, &first, &second, options).await?;
            finish(&first, &second, &view, output.as_deref(), save_highlights.as_deref())?;
        }

        Commands::Score { first, second, output } => {
            println!("🔍 TwinFinder - similarity score\n");
            let options = RunOptions { highlight: false };
            let view = compare(&config, &first, &second, options).await?;
            finish(&first, &second, &view, output.as_deref(), None)?;
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                let key = match key {
                    Some(key) => key,
                    None => dialoguer::Password::new()
                        .with_prompt("Gemini API key")
                        .interact()
                        .context("failed to read API key")?,
                };
                config.set_api_key(key)?;
                println!("✔ API key saved: {}", Config::config_path()?.display());
            }

            if show {
                println!("Settings:");
                println!("  Score model: {}", config.score_model);
                println!("  Highlight model: {}", config.highlight_model);
                println!("  Timeout: {}s", config.timeout_seconds);
                let key_state = if config.get_api_key().is_ok() { "set" } else { "not set" };
                println!("  API key: {}", key_state);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

async fn compare(
    config: &Config,
    first: &Path,
    second: &Path,
    options: RunOptions,
) -> anyhow::Result<ComparisonView> {
    let client = gemini::GeminiClient::new(config)?;

    let state = RefCell::new(ComparisonState::new());
    for (slot, path) in [(ImageSlot::First, first), (ImageSlot::Second, second)] {
        let image = source::load_image(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        state.with_state(|s| s.set_image(slot, Some(image)));
    }

    let total_steps = if options.highlight { 2 } else { 1 };
    let bar = progress::spinner();
    let backend = progress::ProgressBackend::new(&client, &bar, total_steps);
    let outcome = run_comparison_with(&state, &backend, options).await;
    bar.finish_and_clear();

    let outcome = outcome.map_err(|e| error::TwinFinderError::Validation(e.to_string()))?;
    log::debug!("comparison outcome: {:?}", outcome);

    let view = state.borrow().view();
    if outcome == Outcome::Discarded {
        bail!("comparison was discarded before completion");
    }
    Ok(view)
}

fn finish(
    first: &Path,
    second: &Path,
    view: &ComparisonView,
    output: Option<&Path>,
    save_highlights: Option<&Path>,
) -> anyhow::Result<()> {
    if let Some(result) = &view.result {
        println!("{}\n", report::summary(result));
    }

    if let Some(path) = output {
        report::ComparisonReport::new(first, second, view)
            .write(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("✔ Report saved: {}", path.display());
    }

    if let (Some(dir), Some(result)) = (save_highlights, &view.result) {
        let written: Vec<PathBuf> = report::write_highlights(dir, result)
            .with_context(|| format!("failed to write highlights to {}", dir.display()))?;
        for path in &written {
            println!("✔ Highlighted image saved: {}", path.display());
        }
    }

    if let Some(err) = &view.error {
        return Err(error::TwinFinderError::ComparisonFailed(err.to_string()).into());
    }

    println!("\n✅ Done");
    Ok(())
}
