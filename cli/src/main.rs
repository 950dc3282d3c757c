//! CLI entrypoint for streamchat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use streamchat_application::{AssemblyOutcome, ChatParams, CompletionTransport, SendMessageUseCase};
use streamchat_domain::{Conversation, Severity};
use streamchat_infrastructure::{
    ConfigLoader, FileConfig, HttpCompletionTransport, JsonlConversationLogger, ReplayTransport,
};
use streamchat_presentation::{ChatRepl, Cli, OutputConfig, ReplyPrinter};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Exit status for a reply interrupted with Ctrl-C.
const EXIT_CANCELLED: u8 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Held until exit so buffered file logs are flushed
    let _log_guard = init_tracing(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting streamchat");

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    // === Configuration ===
    let config = load_config(&cli)?;
    report_config_issues(&config)?;

    let params = apply_overrides(config.to_chat_params(), &cli);
    let output = OutputConfig {
        format: cli
            .output
            .map(Into::into)
            .or(config.output.format)
            .unwrap_or_default(),
        color: config.output.color,
        show_progress: config.output.show_progress && !cli.quiet,
    };
    if !output.color {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let transport = build_transport(&cli, &config)?;
    let mut use_case = SendMessageUseCase::new(transport);
    if let Some(path) = config.logging.conversation_log_path() {
        match JsonlConversationLogger::open(&path) {
            Ok(logger) => {
                info!("Transcript: {}", path.display());
                use_case = use_case.with_conversation_logger(Arc::new(logger));
            }
            Err(e) => warn!("Transcript disabled ({}): {}", path.display(), e),
        }
    }
    let printer = ReplyPrinter::new(output);

    // Chat mode
    if cli.chat {
        let mut repl = ChatRepl::new(use_case, printer, params);
        repl.run().await?;
        return Ok(ExitCode::SUCCESS);
    }

    // Single message mode - a prompt is required unless replaying
    let prompt = match (cli.prompt, &cli.replay) {
        (Some(prompt), _) => prompt,
        (None, Some(path)) => format!("(replay of {})", path.display()),
        (None, None) => bail!("A prompt is required. Use --chat for interactive mode."),
    };

    let cancellation = CancellationToken::new();
    let watcher = tokio::spawn({
        let token = cancellation.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        }
    });

    let mut conversation = Conversation::new();
    let outcome = printer
        .send(&use_case, &mut conversation, &prompt, &params, cancellation)
        .await?;
    watcher.abort();

    info!("Reply {} ({} bytes)", outcome.state(), outcome.text().len());

    Ok(match outcome {
        AssemblyOutcome::Completed(_) => ExitCode::SUCCESS,
        AssemblyOutcome::Failed { .. } => ExitCode::FAILURE,
        AssemblyOutcome::Cancelled(_) => ExitCode::from(EXIT_CANCELLED),
    })
}

/// Initialize logging based on verbosity level.
///
/// Diagnostics go to stderr (stdout carries the reply). With `--log-file`
/// they are also written to that file through a non-blocking writer.
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(EnvFilter::new(level))
            .with(stderr_layer)
            .init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("Invalid log file path: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(stderr_layer)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();

    Ok(Some(guard))
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    if let Some(path) = &cli.config
        && !path.exists()
    {
        bail!("Config file not found: {}", path.display());
    }
    ConfigLoader::load(cli.config.as_deref()).map_err(|e| anyhow!("Failed to load configuration: {}", e))
}

/// Print every config issue; fail if any of them is an error.
fn report_config_issues(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Error => eprintln!("{} {}", "config error:".red().bold(), issue.message),
            Severity::Warning => eprintln!("{} {}", "config warning:".yellow(), issue.message),
        }
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("Invalid configuration");
    }
    Ok(())
}

/// CLI flags take precedence over file values.
fn apply_overrides(mut params: ChatParams, cli: &Cli) -> ChatParams {
    if let Some(model) = &cli.model {
        params = params.with_model(model.trim());
    }
    if let Some(system) = &cli.system {
        params = params.with_system_prompt(system.clone());
    }
    if let Some(threshold) = cli.threshold {
        params.flush = params.flush.with_threshold_chars(threshold);
    }
    if let Some(delay_ms) = cli.delay_ms {
        params.flush = params.flush.with_delay(Duration::from_millis(delay_ms));
    }
    params
}

fn build_transport(cli: &Cli, config: &FileConfig) -> Result<Arc<dyn CompletionTransport>> {
    let Some(path) = &cli.replay else {
        let transport = HttpCompletionTransport::new(config.to_http_transport_config()?)?;
        info!("Endpoint: {}", transport.endpoint());
        return Ok(Arc::new(transport));
    };

    let mut transport = ReplayTransport::from_file(path)?
        .with_channel_capacity(config.stream.channel_capacity());
    info!("Replaying {} ({} bytes)", path.display(), transport.len());
    if let Some(chunk_size) = cli.chunk_size {
        transport = transport.with_chunk_size(chunk_size);
    }
    if let Some(delay_ms) = cli.chunk_delay_ms {
        transport = transport.with_chunk_delay(Duration::from_millis(delay_ms));
    }
    Ok(Arc::new(transport))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_file_values() {
        let cli = Cli::parse_from([
            "streamchat",
            "--model",
            "gpt-4o",
            "--system",
            "Be terse.",
            "--threshold",
            "0",
            "--delay-ms",
            "5",
            "hi",
        ]);
        let params = apply_overrides(ChatParams::default(), &cli);

        assert_eq!(params.model, "gpt-4o");
        assert_eq!(params.system_prompt.as_deref(), Some("Be terse."));
        assert_eq!(params.flush.threshold_chars(), 1);
        assert_eq!(params.flush.delay(), Duration::from_millis(5));
    }

    #[test]
    fn test_no_overrides_keep_params() {
        let cli = Cli::parse_from(["streamchat", "hi"]);
        assert_eq!(apply_overrides(ChatParams::default(), &cli), ChatParams::default());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = FileConfig::default();
        config.provider.base_url = "ftp://example.com".to_string();
        assert!(report_config_issues(&config).is_err());
        assert!(report_config_issues(&FileConfig::default()).is_ok());
    }
}
