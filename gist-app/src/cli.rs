use crate::export::ExportFormat;
use clap::{Args, Parser, Subcommand};
use gist_common::SummaryStyle;
use std::path::PathBuf;

/// Summarize news articles from their URL.
#[derive(Debug, Parser)]
#[command(name = "gist", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./gist.yaml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Primary provider key; enables chat summaries and enrichment
    #[arg(long, env = "RAPID_API_ARTICLE_KEY", global = true, hide_env_values = true)]
    pub rapidapi_key: Option<String>,

    /// Optional OpenAI key used behind the primary chat provider
    #[arg(long, env = "OPENAI_API_KEY", global = true, hide_env_values = true)]
    pub openai_key: Option<String>,

    /// History file (overrides the configured path)
    #[arg(long, global = true)]
    pub history_file: Option<PathBuf>,

    /// Log debug output to stderr and print failure details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Summarize an article and save it to history
    Summarize(SummarizeArgs),

    /// Translate the summary of an article already in history
    Translate(TranslateArgs),

    /// Inspect saved summaries
    #[command(subcommand)]
    History(HistoryCommand),
}

#[derive(Debug, Args)]
pub struct SummarizeArgs {
    /// Article URL (http, https, or starting with www.)
    pub url: String,

    /// brief, balanced, detailed or bulletpoints
    #[arg(short, long)]
    pub style: Option<SummaryStyle>,

    /// Summary language code (en, es, fr, ...)
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Also translate the summary into this language code
    #[arg(short, long)]
    pub translate: Option<String>,

    #[arg(short, long, value_enum, default_value_t)]
    pub format: ExportFormat,

    /// Do not write the result to history
    #[arg(long)]
    pub no_save: bool,
}

#[derive(Debug, Args)]
pub struct TranslateArgs {
    pub url: String,

    /// Target language code
    #[arg(long)]
    pub to: String,

    #[arg(short, long, value_enum, default_value_t)]
    pub format: ExportFormat,
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// List saved summaries, newest first
    List,

    /// Find summaries whose URL or text contains QUERY
    Search { query: String },

    /// Delete a saved summary
    Remove { url: String },

    /// Print a saved summary
    Show {
        url: String,
        #[arg(short, long, value_enum, default_value_t)]
        format: ExportFormat,
    },
}
