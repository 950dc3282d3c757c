//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::config::ReplConfig;
use crate::output::ReplyPrinter;
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use streamchat_application::{ChatParams, SendMessageUseCase};
use streamchat_domain::{Conversation, Role};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const HISTORY_SIZE: usize = 1000;
const PREVIEW_CHARS: usize = 72;

/// What the loop should do after a slash command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandOutcome {
    Continue,
    Quit,
}

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: SendMessageUseCase,
    printer: ReplyPrinter,
    params: ChatParams,
    config: ReplConfig,
    conversation: Conversation,
}

impl ChatRepl {
    pub fn new(use_case: SendMessageUseCase, printer: ReplyPrinter, params: ChatParams) -> Self {
        Self {
            use_case,
            printer,
            params,
            config: ReplConfig::default(),
            conversation: Conversation::new(),
        }
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut line_editor = Reedline::create();
        if let Some(path) = &self.config.history_file {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match FileBackedHistory::with_file(HISTORY_SIZE, path.clone()) {
                Ok(history) => line_editor = line_editor.with_history(Box::new(history)),
                Err(e) => warn!("History disabled ({}): {}", path.display(), e),
            }
        }

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("you".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match line_editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line) == CommandOutcome::Quit {
                            break;
                        }
                        continue;
                    }

                    self.process_message(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
                #[allow(unreachable_patterns)]
                _ => continue,
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "streamchat - chat mode".bold());
        println!("Model: {}", self.params.model.cyan());
        println!("Type /help for commands, Ctrl-C stops a reply, Ctrl-D exits.");
        println!();
    }

    fn print_help() {
        println!();
        println!("Commands:");
        println!("  /help, /h, /?     - Show this help");
        println!("  /clear            - Forget the conversation so far");
        println!("  /model [NAME]     - Show or switch the model");
        println!("  /history          - Show the conversation so far");
        println!("  /quit, /exit, /q  - Exit chat");
        println!();
    }

    /// Handle slash commands.
    fn handle_command(&mut self, line: &str) -> CommandOutcome {
        let mut parts = line.splitn(2, char::is_whitespace);
        let command = parts.next().unwrap_or_default();
        let argument = parts.next().map(str::trim).filter(|a| !a.is_empty());

        match command {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                return CommandOutcome::Quit;
            }
            "/help" | "/h" | "/?" => Self::print_help(),
            "/clear" => {
                self.conversation.clear();
                println!("Conversation cleared.");
            }
            "/model" => match argument {
                Some(model) => {
                    self.params.model = model.to_string();
                    println!("Model set to {}", model.cyan());
                }
                None => println!("Current model: {}", self.params.model.cyan()),
            },
            "/history" => self.print_history(),
            _ => {
                println!("Unknown command: {}", command);
                println!("Type /help for available commands");
            }
        }
        CommandOutcome::Continue
    }

    fn print_history(&self) {
        if self.conversation.is_empty() {
            println!("(no messages yet)");
            return;
        }
        for message in self.conversation.messages() {
            let who = match message.role {
                Role::System => "system".dimmed(),
                Role::User => "you".green(),
                Role::Assistant => "assistant".cyan(),
            };
            println!("{:>9}: {}", who, preview(&message.content));
        }
    }

    async fn process_message(&mut self, input: &str) {
        println!();

        let cancellation = CancellationToken::new();
        let watcher = tokio::spawn({
            let token = cancellation.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    debug!("Ctrl-C: cancelling current reply");
                    token.cancel();
                }
            }
        });

        let result = self
            .printer
            .send(
                &self.use_case,
                &mut self.conversation,
                input,
                &self.params,
                cancellation,
            )
            .await;
        watcher.abort();

        if let Err(e) = result {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
        println!();
    }
}

/// First line of `text`, shortened for listing.
fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default();
    let mut preview: String = line.chars().take(PREVIEW_CHARS).collect();
    if line.chars().count() > PREVIEW_CHARS || text.lines().nth(1).is_some() {
        preview.push_str("...");
    }
    preview
}
