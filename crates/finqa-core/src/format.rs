//! Structured assistant replies.
//!
//! The backend may wrap parts of an answer in `<emoji>`, `<text>` and
//! `<answer>` tags. Each region is optional; content with none of them is
//! plain markdown.

use once_cell::sync::Lazy;
use regex::Regex;

static EMOJI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<emoji>(.*?)</emoji>").unwrap());
static TEXT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<text>(.*?)</text>").unwrap());
static ANSWER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<answer>(.*?)</answer>").unwrap());

/// An assistant reply split into its display regions
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormattedContent {
    pub emoji: Option<String>,
    pub text: Option<String>,
    pub answer: Option<String>,
    /// The unescaped content, used when no region is present
    pub plain: String,
}

impl FormattedContent {
    pub fn parse(content: &str) -> Self {
        let unescaped = unescape(content);

        let emoji = capture(&EMOJI_RE, &unescaped);
        let text = capture(&TEXT_RE, &unescaped);
        let answer = capture(&ANSWER_RE, &unescaped).map(|a| a.replace("\\n", "\n"));

        Self {
            emoji,
            text,
            answer,
            plain: unescaped,
        }
    }

    /// True when at least one sentinel region was found
    pub fn is_structured(&self) -> bool {
        self.emoji.is_some() || self.text.is_some() || self.answer.is_some()
    }
}

fn unescape(input: &str) -> String {
    input.replace("&lt;", "<").replace("&gt;", ">")
}

fn capture(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
