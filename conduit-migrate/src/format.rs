//! Whitespace formatting applied to every file a migration writes.
//!
//! Line endings become `\n`, trailing whitespace is trimmed, runs of blank
//! lines collapse to one, leading blank lines are dropped and the file ends
//! with exactly one newline. Indentation is left alone.
//!
//! Text forwarded verbatim from a legacy config (the `withReact` argument)
//! can carry template literals whose blank lines and trailing spaces are part
//! of a string value. [`format_text_keeping`] leaves every line touching that
//! text as it is.

use std::ops::Range;

pub fn format_text(content: &str) -> String {
    format_text_keeping(content, None)
}

/// [`format_text`], except that lines overlapping the first occurrence of
/// `keep` are copied unchanged.
pub fn format_text_keeping(content: &str, keep: Option<&str>) -> String {
    let content = unix_newlines(content);
    let kept: Option<Range<usize>> = keep
        .map(unix_newlines)
        .filter(|k| !k.is_empty())
        .and_then(|k| content.find(&k).map(|at| at..at + k.len()));

    let mut out = String::with_capacity(content.len());
    let mut blank_run = false;
    let mut start = 0;
    for raw in content.split('\n') {
        let end = start + raw.len();
        let verbatim = kept.as_ref().is_some_and(|r| start < r.end && end > r.start);
        start = end + 1;

        let line = if verbatim { raw } else { raw.trim_end() };
        if line.is_empty() && !verbatim {
            if !out.is_empty() {
                blank_run = true;
            }
            continue;
        }
        if blank_run {
            out.push('\n');
            blank_run = false;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn unix_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
