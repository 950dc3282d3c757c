//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for assembled replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Render the reply as it is flushed
    Stream,
    /// Only the final text
    Final,
    /// JSON summary (status, text, updates, error)
    Json,
}

impl From<OutputFormat> for streamchat_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Stream => streamchat_domain::OutputFormat::Stream,
            OutputFormat::Final => streamchat_domain::OutputFormat::Final,
            OutputFormat::Json => streamchat_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for streamchat
#[derive(Parser, Debug)]
#[command(name = "streamchat")]
#[command(author, version, about = "Streaming chat client for OpenAI-compatible endpoints")]
#[command(long_about = r#"
streamchat sends a conversation to an OpenAI-compatible chat completion
endpoint and renders the streamed reply as it arrives.

Text is surfaced in small batches: whenever the buffered text reaches the
flush threshold (after a short pacing delay), at the end of a sentence-final
chunk, and when the stream ends.

Configuration files are loaded from (in priority order):
1. STREAMCHAT_<SECTION>__<KEY>   Environment variables
2. --config <path>               Explicit config file
3. ./streamchat.toml             Project-level config
4. ~/.config/streamchat/config.toml   Global config

Example:
  streamchat "Explain ownership in Rust in two sentences"
  streamchat --chat --model gpt-4o
  streamchat --replay recorded.sse --chunk-size 1 --chunk-delay-ms 20
"#)]
pub struct Cli {
    /// The message to send (not required in chat or replay mode)
    pub prompt: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Model to request (overrides provider.model)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// System prompt (overrides provider.system_prompt)
    #[arg(long, value_name = "TEXT")]
    pub system: Option<String>,

    /// Buffered characters that trigger a flush
    #[arg(long, value_name = "CHARS")]
    pub threshold: Option<usize>,

    /// Pause before each threshold flush, in milliseconds
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Replay a recorded stream instead of calling the endpoint
    #[arg(long, value_name = "FILE")]
    pub replay: Option<PathBuf>,

    /// Bytes per simulated network read when replaying
    #[arg(long, value_name = "BYTES", requires = "replay")]
    pub chunk_size: Option<usize>,

    /// Delay between simulated network reads when replaying
    #[arg(long, value_name = "MS", requires = "replay")]
    pub chunk_delay_ms: Option<u64>,

    /// Output format (overrides output.format)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write diagnostic logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_prompt() {
        let cli = Cli::try_parse_from(["streamchat", "hello there"]).unwrap();
        assert_eq!(cli.prompt.as_deref(), Some("hello there"));
        assert!(!cli.chat);
        assert!(cli.output.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "streamchat",
            "--chat",
            "-m",
            "gpt-4o",
            "--threshold",
            "8",
            "--delay-ms",
            "0",
            "-o",
            "json",
            "-vv",
        ])
        .unwrap();
        assert!(cli.chat);
        assert_eq!(cli.model.as_deref(), Some("gpt-4o"));
        assert_eq!(cli.threshold, Some(8));
        assert_eq!(cli.delay_ms, Some(0));
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_replay_options() {
        let cli = Cli::try_parse_from([
            "streamchat",
            "--replay",
            "stream.sse",
            "--chunk-size",
            "1",
            "--chunk-delay-ms",
            "20",
        ])
        .unwrap();
        assert_eq!(cli.replay, Some(PathBuf::from("stream.sse")));
        assert_eq!(cli.chunk_size, Some(1));
        assert_eq!(cli.chunk_delay_ms, Some(20));
    }

    #[test]
    fn test_chunk_size_requires_replay() {
        assert!(Cli::try_parse_from(["streamchat", "--chunk-size", "4", "hi"]).is_err());
    }

    #[test]
    fn test_output_format_maps_to_domain() {
        assert_eq!(
            streamchat_domain::OutputFormat::from(OutputFormat::Final),
            streamchat_domain::OutputFormat::Final
        );
    }
}
