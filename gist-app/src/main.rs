use anyhow::{Context, Result, anyhow};
use clap::Parser;
use cli::{Cli, Command, HistoryCommand, SummarizeArgs, TranslateArgs};
use export::render;
use gist_common::observability::init_logging;
use gist_common::{ArticleStore, language_name};
use gist_config::{
    DEFAULT_OPENAI_ENDPOINT, DEFAULT_OPENAI_MODEL, GistConfig, GistConfigLoader, OpenAiConfig,
};
use gist_pipeline::sanitizer::sanitize;
use gist_pipeline::{ArticlePipeline, ProcessingFailed, build_pipeline};
use std::process::ExitCode;
use store::JsonFileStore;

mod cli;
mod export;
mod store;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if let Some(failed) = e.downcast_ref::<ProcessingFailed>() {
                tracing::error!(reason = ?failed.reason, detail = %failed.detail, "gist.failed");
                if verbose {
                    eprintln!("  cause: {}", failed.detail);
                }
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // 1) Config (file, then GIST__ env, then flags)
    let cfg = load_config(&cli)?;

    // 2) Logging
    let mut log = cfg.logging.to_log_config();
    if cli.verbose {
        log.emit_stderr = true;
        log.default_filter = "debug".into();
    }
    let log_dir = init_logging(log)?;
    tracing::debug!(log_dir = %log_dir.display(), "gist.logging_ready");

    let history_path = cli
        .history_file
        .clone()
        .or_else(|| cfg.history.path.clone())
        .unwrap_or_else(JsonFileStore::default_path);
    let mut store = JsonFileStore::open(&history_path, cfg.history.max_entries)
        .with_context(|| format!("opening history at {}", history_path.display()))?;

    match cli.command {
        Command::Summarize(args) => summarize(args, &cfg, &mut store).await,
        Command::Translate(args) => translate(args, &cfg, &mut store).await,
        Command::History(cmd) => history(cmd, &mut store),
    }
}

fn load_config(cli: &Cli) -> Result<GistConfig> {
    let loader = match &cli.config {
        Some(path) => GistConfigLoader::new().with_file(path),
        None => GistConfigLoader::new().with_optional_file("gist.yaml"),
    };
    let mut cfg = loader.load().context("loading configuration")?;

    if let Some(key) = &cli.rapidapi_key {
        cfg.providers.rapidapi_key = Some(key.clone());
    }
    if let Some(key) = &cli.openai_key {
        match cfg.providers.openai.as_mut() {
            Some(openai) => openai.api_key = key.clone(),
            None => {
                cfg.providers.openai = Some(OpenAiConfig {
                    api_key: key.clone(),
                    model: DEFAULT_OPENAI_MODEL.into(),
                    endpoint: DEFAULT_OPENAI_ENDPOINT.into(),
                })
            }
        }
    }
    Ok(cfg)
}

fn pipeline(cfg: &GistConfig) -> Result<ArticlePipeline> {
    build_pipeline(&cfg.providers).context("configuring providers")
}

async fn summarize(args: SummarizeArgs, cfg: &GistConfig, store: &mut JsonFileStore) -> Result<()> {
    let pipeline = pipeline(cfg)?;
    let style = args.style.unwrap_or(cfg.defaults.style);
    let lang = args.lang.unwrap_or_else(|| cfg.defaults.language.clone());

    let mut result = pipeline.process_article(&args.url, style, &lang).await?;
    if let Some(target) = &args.translate {
        result = pipeline.retranslate(&result, target).await;
    }

    if !args.no_save {
        store.add(result.clone()).context("saving to history")?;
    }
    println!("{}", render(&result, args.format)?);
    Ok(())
}

async fn translate(args: TranslateArgs, cfg: &GistConfig, store: &mut JsonFileStore) -> Result<()> {
    let url = sanitize(&args.url)?.to_string();
    let saved = store
        .get(&url)
        .ok_or_else(|| anyhow!("no saved summary for {url}; run `gist summarize` first"))?;

    let translated = pipeline(cfg)?.retranslate(&saved, &args.to).await;
    store.update(translated.clone()).context("saving to history")?;
    tracing::info!(%url, target = language_name(&args.to), "gist.translated");

    println!("{}", render(&translated, args.format)?);
    Ok(())
}

fn history(cmd: HistoryCommand, store: &mut JsonFileStore) -> Result<()> {
    match cmd {
        HistoryCommand::List => print_listing(&store.list()),
        HistoryCommand::Search { query } => print_listing(&store.search(&query)),
        HistoryCommand::Remove { url } => {
            let url = sanitize(&url).map(|u| u.to_string()).unwrap_or(url);
            if store.remove(&url)? {
                println!("Removed {url}");
            } else {
                println!("Not in history: {url}");
            }
        }
        HistoryCommand::Show { url, format } => {
            let url = sanitize(&url).map(|u| u.to_string()).unwrap_or(url);
            let saved = store
                .get(&url)
                .ok_or_else(|| anyhow!("no saved summary for {url}"))?;
            println!("{}", render(&saved, format)?);
        }
    }
    Ok(())
}

fn print_listing(entries: &[gist_common::ArticleResult]) {
    if entries.is_empty() {
        println!("No saved summaries.");
        return;
    }
    for a in entries {
        println!("{}  {}", a.timestamp.format("%Y-%m-%d %H:%M"), a.title);
        println!("    {}", a.url);
    }
}
