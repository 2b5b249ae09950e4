use colored::Colorize;
use finqa_client::DocumentInfo;
use finqa_core::{format_size, DocumentSource, FormattedContent, Message, Role, UploadStatus};
use finqa_session::ViewState;

const EXCERPT_CHARS: usize = 160;
const BAR_WIDTH: usize = 30;

pub fn message(message: &Message) -> String {
    match message.role {
        Role::User => format!(
            "{} {}\n{}",
            "You".cyan().bold(),
            message.display_time().dimmed(),
            message.content
        ),
        Role::Assistant => {
            let mut out = format!(
                "{} {}\n{}",
                "Assistant".green().bold(),
                message.display_time().dimmed(),
                body(&message.content)
            );
            if !message.sources.is_empty() {
                out.push('\n');
                out.push_str(&sources(&message.sources));
            }
            out
        }
    }
}

/// Assistant content with its emoji, headline and answer regions laid out
pub fn body(content: &str) -> String {
    let formatted = FormattedContent::parse(content);
    if !formatted.is_structured() {
        return formatted.plain.trim().to_string();
    }

    let mut lines = Vec::new();
    let headline = match (&formatted.emoji, &formatted.text) {
        (Some(emoji), Some(text)) => Some(format!("{} {}", emoji.trim(), text.trim())),
        (Some(emoji), None) => Some(emoji.trim().to_string()),
        (None, Some(text)) => Some(text.trim().to_string()),
        (None, None) => None,
    };
    if let Some(headline) = headline {
        lines.push(headline.bold().to_string());
    }
    if let Some(answer) = &formatted.answer {
        lines.push(answer.trim().to_string());
    }
    lines.join("\n\n")
}

pub fn sources(sources: &[DocumentSource]) -> String {
    let mut out = format!("{}", "Sources".yellow().bold());
    for (i, source) in sources.iter().enumerate() {
        out.push_str(&format!(
            "\n  [{}] {} {}\n      {}",
            i + 1,
            format!("page {}", source.page).yellow(),
            format!("score {:.2}", source.score).dimmed(),
            excerpt(&source.content, EXCERPT_CHARS).italic()
        ));
    }
    out
}

/// Collapse whitespace and cut to `max` characters
pub fn excerpt(text: &str, max: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max {
        return collapsed;
    }
    let cut: String = collapsed.chars().take(max).collect();
    format!("{}…", cut.trim_end())
}

pub fn progress_bar(progress: u8) -> String {
    let progress = progress.min(100) as usize;
    let filled = progress * BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled),
        progress
    )
}

/// One line describing the upload slot, or `None` when it is empty
pub fn upload_status(view: &ViewState) -> Option<String> {
    let name = view.file_name.as_deref().unwrap_or("document");
    match view.upload_status {
        UploadStatus::Idle => None,
        UploadStatus::Selected => Some(format!(
            "📎 {} ready. {}",
            name.bold(),
            "/retry to upload, /remove to clear".dimmed()
        )),
        UploadStatus::Uploading => {
            Some(format!("⏳ {} {}", name, progress_bar(view.upload_progress)))
        }
        UploadStatus::Success => Some(format!("✅ {} processed", name).green().to_string()),
        UploadStatus::Error => {
            let reason = view.upload_error.as_deref().unwrap_or("upload failed");
            let hint = if view.can_upload {
                "/retry to try again, /remove to clear"
            } else {
                "/upload <path> to choose another file"
            };
            Some(format!("{} {}", format!("❌ {}", reason).red(), hint.dimmed()))
        }
    }
}

pub fn status(view: &ViewState) -> String {
    let mut lines = vec![format!(
        "{} {}",
        "Active document:".bold(),
        view.active_document.as_deref().unwrap_or("none")
    )];
    lines.push(upload_status(view).unwrap_or_else(|| "No file selected".dimmed().to_string()));
    lines.push(format!("{} messages in this session", view.message_count).dimmed().to_string());
    if view.is_awaiting_answer {
        lines.push("Waiting for an answer…".yellow().to_string());
    }
    lines.join("\n")
}

pub fn documents(documents: &[DocumentInfo]) -> String {
    if documents.is_empty() {
        return "No documents uploaded yet".dimmed().to_string();
    }
    let mut out = format!("{}", "📚 Documents".cyan().bold());
    for doc in documents {
        let mut details = vec![format!("{} chunks", doc.chunks_count)];
        if let Some(status) = &doc.status {
            details.push(status.clone());
        }
        if let Some(date) = &doc.upload_date {
            details.push(date.clone());
        }
        out.push_str(&format!("\n  • {} {}", doc.filename.bold(), details.join(", ").dimmed()));
    }
    out
}

pub fn limit_hint(accepted_type: &str, max_size_bytes: u64) -> String {
    format!("Accepts {} files up to {}", accepted_type, format_size(max_size_bytes))
}
