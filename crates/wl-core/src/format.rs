//! Inline markup for dialogue lines.
//!
//! A line is compiled once into a list of [`FormatRun`]s. Four tags are
//! recognized:
//!
//! - `<i>text</i>` italic text
//! - `<b>text</b>` bold text
//! - `<w=1.5>` pause the reveal for 1.5 seconds
//! - `<s>` dismiss the line as soon as this point is revealed
//!
//! Anything else, including an opening tag with no matching close, is plain
//! text. `Wait` and `Skip` are directives: they occupy no display length.

use std::ops::Range;

use logos::Logos;
use serde::{Deserialize, Serialize};

/// Visual style of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    /// Unstyled text.
    #[default]
    Plain,
    /// Italic text.
    Italic,
    /// Bold text.
    Bold,
}

/// One element of a formatted line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormatRun {
    /// Displayable text.
    Text {
        /// Style applied to every character of the run.
        style: TextStyle,
        /// The text itself, with markup removed.
        text: String,
    },
    /// Pause the reveal once this point is reached.
    Wait {
        /// Pause length in seconds.
        seconds: f64,
    },
    /// Dismiss the line without waiting for acknowledgment.
    Skip,
}

impl FormatRun {
    /// Create an unstyled text run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Text {
            style: TextStyle::Plain,
            text: text.into(),
        }
    }

    /// Create an italic text run.
    pub fn italic(text: impl Into<String>) -> Self {
        Self::Text {
            style: TextStyle::Italic,
            text: text.into(),
        }
    }

    /// Create a bold text run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::Text {
            style: TextStyle::Bold,
            text: text.into(),
        }
    }

    /// Whether this run is a control directive rather than text.
    pub fn is_directive(&self) -> bool {
        !matches!(self, Self::Text { .. })
    }

    /// The run's text, if it is a text run.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Number of displayable characters in this run (0 for directives).
    pub fn display_len(&self) -> usize {
        self.text().map_or(0, |t| t.chars().count())
    }
}

/// Raw markup tokens. Every byte of input lexes into some token, so the
/// lexer never reports an error for well-formed UTF-8.
#[derive(Logos, Debug, Clone, PartialEq)]
enum Markup {
    #[token("<i>")]
    ItalicOpen,

    #[token("</i>")]
    ItalicClose,

    #[token("<b>")]
    BoldOpen,

    #[token("</b>")]
    BoldClose,

    #[token("<s>")]
    Skip,

    #[regex(r"<w=[0-9]+(\.[0-9]+)?>", parse_wait)]
    Wait(f64),

    #[token("<")]
    #[regex(r"[^<]+")]
    Literal,
}

fn parse_wait(lex: &mut logos::Lexer<Markup>) -> Option<f64> {
    let slice = lex.slice();
    slice[3..slice.len() - 1].parse().ok()
}

/// Compile a line of dialogue into format runs.
///
/// Scans left to right for the earliest tag. Untagged text before a tag
/// becomes a plain run; paired tags take everything up to the first matching
/// close tag verbatim. A paired tag never spans a newline; without a close on
/// the same line it stays plain text.
pub fn format_line(text: &str) -> Vec<FormatRun> {
    let tokens: Vec<(Markup, Range<usize>)> = Markup::lexer(text)
        .spanned()
        .map(|(token, span)| (token.unwrap_or(Markup::Literal), span))
        .collect();

    let mut runs = Vec::new();
    let mut plain_start: Option<usize> = None;
    let mut i = 0;

    while i < tokens.len() {
        let (token, span) = &tokens[i];
        let matched = match token {
            Markup::ItalicOpen => find_close(text, &tokens, i, &Markup::ItalicClose).map(|j| {
                let body = &text[span.end..tokens[j].1.start];
                (j, FormatRun::italic(body))
            }),
            Markup::BoldOpen => find_close(text, &tokens, i, &Markup::BoldClose).map(|j| {
                let body = &text[span.end..tokens[j].1.start];
                (j, FormatRun::bold(body))
            }),
            Markup::Skip => Some((i, FormatRun::Skip)),
            Markup::Wait(seconds) => Some((i, FormatRun::Wait { seconds: *seconds })),
            _ => None,
        };

        match matched {
            Some((end, run)) => {
                flush_plain(&mut runs, text, &mut plain_start, span.start);
                runs.push(run);
                i = end + 1;
            }
            None => {
                plain_start.get_or_insert(span.start);
                i += 1;
            }
        }
    }
    flush_plain(&mut runs, text, &mut plain_start, text.len());

    runs
}

/// First matching close tag on the same line as the opening tag.
fn find_close(
    text: &str,
    tokens: &[(Markup, Range<usize>)],
    open: usize,
    close: &Markup,
) -> Option<usize> {
    let j = tokens[open + 1..]
        .iter()
        .position(|(token, _)| token == close)
        .map(|offset| open + 1 + offset)?;
    let body = &text[tokens[open].1.end..tokens[j].1.start];
    (!body.contains('\n')).then_some(j)
}

fn flush_plain(runs: &mut Vec<FormatRun>, text: &str, start: &mut Option<usize>, end: usize) {
    if let Some(begin) = start.take()
        && begin < end
    {
        runs.push(FormatRun::plain(&text[begin..end]));
    }
}

/// Truncate runs so that at most `pos` displayable characters remain.
///
/// Directive runs inside the prefix pass through unchanged. A text run that
/// ends exactly at `pos` is kept whole and scanning continues, so directives
/// immediately after it are part of the prefix. The run straddling `pos` is
/// cut and scanning stops.
pub fn format_up_to(runs: &[FormatRun], pos: usize) -> Vec<FormatRun> {
    let mut shown = 0;
    let mut out = Vec::new();

    for run in runs {
        match run {
            FormatRun::Text { style, text } => {
                let len = text.chars().count();
                if shown + len <= pos {
                    out.push(run.clone());
                    shown += len;
                } else {
                    out.push(FormatRun::Text {
                        style: *style,
                        text: text.chars().take(pos - shown).collect(),
                    });
                    break;
                }
            }
            directive => out.push(directive.clone()),
        }
    }

    out
}

/// Total displayable length of a run list, excluding directives.
pub fn max_length(runs: &[FormatRun]) -> usize {
    runs.iter().map(FormatRun::display_len).sum()
}

/// Concatenate the text of every non-directive run.
pub fn plain_text(runs: &[FormatRun]) -> String {
    runs.iter().filter_map(FormatRun::text).collect()
}
