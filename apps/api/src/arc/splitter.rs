//! Unit Splitter: breaks a text into the atomic units placed on the arc.
//!
//! Runs once per session; every later layout pass reuses its output.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Non-breaking space used in place of a lone space character, so the unit
/// keeps a measurable width once rendered as an inline block.
pub const NBSP: &str = "\u{a0}";

/// Token every line break is rewritten to before splitting in line mode.
///
/// Input that already contains this literal string is split at it as well;
/// that is an accepted limitation.
pub const LINE_SENTINEL: &str = "eefec303079ad17405c889e092e105b0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    #[default]
    Characters,
    Words,
    Lines,
}

/// One atomic piece of text positioned independently on the arc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayUnit {
    pub index: usize,
    pub content: String,
    /// True when `content` is the NBSP standing in for a single space.
    pub placeholder: bool,
    /// Separator that follows the unit in the host's inline flow. It sits
    /// outside the unit and is not measured.
    pub trailing: String,
}

pub fn split(text: &str, mode: SplitMode) -> Vec<DisplayUnit> {
    if text.is_empty() {
        return Vec::new();
    }

    match mode {
        SplitMode::Characters => inject(text.graphemes(true), ""),
        SplitMode::Words => inject(text.split(' '), " "),
        SplitMode::Lines => {
            let marked = replace_line_breaks(text);
            inject(marked.split(LINE_SENTINEL), "")
        }
    }
}

fn inject<'a>(pieces: impl Iterator<Item = &'a str>, trailing: &str) -> Vec<DisplayUnit> {
    pieces
        .enumerate()
        .map(|(index, piece)| {
            let placeholder = piece == " ";
            DisplayUnit {
                index,
                content: if placeholder { NBSP.to_string() } else { piece.to_string() },
                placeholder,
                trailing: trailing.to_string(),
            }
        })
        .collect()
}

/// Rewrites `\n` and `<br>`, `<br/>`, `<br />` (any case) to [`LINE_SENTINEL`].
fn replace_line_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find(['<', '\n']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with('\n') {
            out.push_str(LINE_SENTINEL);
            rest = &tail[1..];
            continue;
        }

        match br_tag_len(tail) {
            Some(len) => {
                out.push_str(LINE_SENTINEL);
                rest = &tail[len..];
            }
            None => {
                out.push('<');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Byte length of a `<br>` tag at the start of `s`, if there is one.
fn br_tag_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.len() < 4 || !bytes[1..3].eq_ignore_ascii_case(b"br") {
        return None;
    }
    let mut i = 3;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'/' {
        i += 1;
    }
    (i < bytes.len() && bytes[i] == b'>').then_some(i + 1)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
