use crate::app::App;
use crate::render;
use colored::Colorize;
use finqa_core::{DocumentFile, UploadStatus};
use finqa_session::{CommandOutcome, SessionController};
use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

const PROGRESS_REDRAW: Duration = Duration::from_millis(100);

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Ask(String),
    Upload(PathBuf),
    Remove,
    Retry,
    Docs,
    Status,
    Help,
    Quit,
    Invalid(String),
    Empty,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            return ReplCommand::Quit;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return ReplCommand::Ask(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        match name.to_lowercase().as_str() {
            "upload" | "u" => match unquote(arg) {
                "" => ReplCommand::Invalid("/upload needs a file path".to_string()),
                path => ReplCommand::Upload(
                    finqa_config::expand_tilde(path).unwrap_or_else(|| PathBuf::from(path)),
                ),
            },
            "remove" | "rm" => ReplCommand::Remove,
            "retry" => ReplCommand::Retry,
            "docs" => ReplCommand::Docs,
            "status" => ReplCommand::Status,
            "help" | "?" => ReplCommand::Help,
            "quit" | "exit" | "q" => ReplCommand::Quit,
            other => ReplCommand::Invalid(format!("Unknown command /{}", other)),
        }
    }
}

/// Strip one pair of matching quotes, as left by drag-and-drop
fn unquote(arg: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = arg.strip_prefix(quote).and_then(|a| a.strip_suffix(quote)) {
            return inner;
        }
    }
    arg
}

pub async fn run(app: &App) -> anyhow::Result<()> {
    let controller = app.controller();
    controller.init();

    println!("{}", "📊 finqa · financial document Q&A".cyan().bold());
    println!(
        "{}",
        format!("Backend {} · session {}", app.api.base_url(), app.identity).dimmed()
    );
    println!("{}", "Type /help for commands, /quit to leave".dimmed());
    println!();

    let mut printed = print_new_messages(&controller, 0);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{} ", "You:".cyan().bold());
        io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                None
            }
        };
        let Some(line) = line else { break };

        match ReplCommand::parse(&line) {
            ReplCommand::Empty => continue,
            ReplCommand::Quit => break,
            ReplCommand::Help => print_help(app),
            ReplCommand::Ask(question) => {
                println!("{}", "Thinking…".dimmed());
                tokio::select! {
                    outcome = controller.send_message(&question) => report_ignored(outcome),
                    _ = tokio::signal::ctrl_c() => println!("{}", "Question cancelled".dimmed()),
                }
                printed = print_new_messages(&controller, printed);
            }
            ReplCommand::Upload(path) => match DocumentFile::from_path(&path).await {
                Ok(file) => {
                    upload_file(&controller, file).await?;
                    printed = print_new_messages(&controller, printed);
                }
                Err(e) => {
                    let message = format!("❌ Could not read {}: {}", path.display(), e);
                    println!("{}", message.red());
                }
            },
            ReplCommand::Retry => {
                upload_with_progress(&controller).await?;
                printed = print_new_messages(&controller, printed);
            }
            ReplCommand::Remove => {
                if controller.remove_file().is_applied() {
                    println!("{}", "File cleared".dimmed());
                }
            }
            ReplCommand::Docs => match controller.list_documents().await {
                Ok(documents) => println!("{}", render::documents(&documents)),
                Err(e) => {
                    tracing::warn!("Listing documents failed: {}", e);
                    println!("{}", format!("❌ {}", e.user_message()).red());
                }
            },
            ReplCommand::Status => println!("{}", render::status(&controller.view())),
            ReplCommand::Invalid(message) => {
                println!("{} {}", message.yellow(), "(type /help)".dimmed());
            }
        }
        println!();
    }

    controller.shutdown();
    println!("{}", "👋 Goodbye!".cyan());
    Ok(())
}

fn print_help(app: &App) {
    println!("{}", "Commands".bold());
    println!("  /upload <path>  select a document and upload it");
    println!("  /retry          upload the selected document again");
    println!("  /remove         clear the selected document");
    println!("  /docs           list documents processed for this session");
    println!("  /status         show the upload slot and active document");
    println!("  /quit           leave");
    let upload = &app.config.upload;
    println!(
        "{}",
        render::limit_hint(&upload.accepted_type, upload.max_size_bytes).dimmed()
    );
    println!("{}", "Anything else is sent as a question.".dimmed());
}

/// Print assistant messages added since `from`; typed questions are already on screen
fn print_new_messages(controller: &SessionController, from: usize) -> usize {
    let session = controller.snapshot();
    for message in session.messages.iter().skip(from).filter(|m| m.is_assistant()) {
        println!("{}", render::message(message));
    }
    session.messages.len()
}

fn report_ignored(outcome: CommandOutcome) {
    if let CommandOutcome::Ignored(reason) = outcome {
        println!("{}", format!("({})", reason).dimmed());
    }
}

/// Validate and upload a file, printing where it ended up
pub async fn upload_file(
    controller: &Arc<SessionController>,
    file: DocumentFile,
) -> anyhow::Result<CommandOutcome> {
    let outcome = controller.select_file(file);
    report_ignored(outcome);
    if outcome.is_ignored() {
        return Ok(outcome);
    }
    let view = controller.view();
    if view.upload_status == UploadStatus::Error {
        if let Some(line) = render::upload_status(&view) {
            println!("{}", line);
        }
        return Ok(outcome);
    }

    upload_with_progress(controller).await
}

/// Run `start_upload` while redrawing a progress bar on one line. Ctrl-C
/// abandons the upload and leaves the file selected.
pub async fn upload_with_progress(
    controller: &Arc<SessionController>,
) -> anyhow::Result<CommandOutcome> {
    upload_until(controller, tokio::signal::ctrl_c()).await
}

async fn upload_until<F: Future>(
    controller: &Arc<SessionController>,
    cancel: F,
) -> anyhow::Result<CommandOutcome> {
    let mut task = {
        let controller = Arc::clone(controller);
        tokio::spawn(async move { controller.start_upload().await })
    };
    let mut redraw = tokio::time::interval(PROGRESS_REDRAW);
    let mut drew = false;
    tokio::pin!(cancel);

    let outcome = loop {
        tokio::select! {
            result = &mut task => break Some(result?),
            _ = &mut cancel => {
                task.abort();
                let _ = (&mut task).await;
                break None;
            }
            _ = redraw.tick() => {
                let view = controller.view();
                if view.upload_status == UploadStatus::Uploading {
                    if let Some(line) = render::upload_status(&view) {
                        print!("\r{}", line);
                        io::stdout().flush()?;
                        drew = true;
                    }
                }
            }
        }
    };

    if drew {
        println!();
    }
    let outcome = match outcome {
        Some(outcome) => outcome,
        None => {
            println!("{}", "Upload cancelled".dimmed());
            CommandOutcome::Applied
        }
    };
    report_ignored(outcome);
    if outcome.is_applied() {
        if let Some(line) = render::upload_status(&controller.view()) {
            println!("{}", line);
        }
    }
    Ok(outcome)
}
