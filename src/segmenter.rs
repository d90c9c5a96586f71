//! Size-based text segmentation.
//!
//! [`split_by_size`] divides raw text into pieces bounded by a byte budget,
//! preferring paragraph boundaries and falling back to sentence boundaries
//! for oversized paragraphs. It is a pure, total function: any string input
//! (including empty) produces a well-defined result with no I/O and no
//! logging, which keeps it trivially testable.
//!
//! Lengths are measured in bytes. No byte index ever lands inside a UTF-8
//! code point because only whole paragraphs and sentences are joined; the
//! function never slices mid-string.

use std::sync::LazyLock;

use regex::Regex;

/// A paragraph break is a run of two or more newlines.
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("paragraph break pattern"));

/// Split `text` into ordered pieces of at most `max_size` bytes.
///
/// Paragraphs (separated by blank lines) accumulate greedily into a buffer,
/// re-joined by `"\n\n"`; the separator counts toward the budget. A paragraph
/// that alone exceeds `max_size` is split on sentence boundaries (`.`, `!`,
/// or `?` followed by whitespace), with sentences re-joined by a single
/// space. A single sentence longer than `max_size` is emitted unsplit; there
/// is no word-level splitting. After an oversized paragraph is consumed, its
/// trailing sentence buffer stays open and keeps accumulating the paragraphs
/// that follow.
///
/// Whitespace-only paragraphs are skipped, so every returned piece is
/// non-empty. Empty input yields an empty vector.
pub fn split_by_size(text: &str, max_size: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut buf = String::new();

    for paragraph in PARAGRAPH_BREAK.split(text) {
        if paragraph.trim().is_empty() {
            continue;
        }

        if fits(&buf, paragraph.len(), 2, max_size) {
            push_joined(&mut buf, paragraph, "\n\n");
            continue;
        }

        if !buf.is_empty() {
            pieces.push(std::mem::take(&mut buf));
        }

        if paragraph.len() > max_size {
            for sentence in split_sentences(paragraph) {
                if fits(&buf, sentence.len(), 1, max_size) {
                    push_joined(&mut buf, sentence, " ");
                } else {
                    if !buf.is_empty() {
                        pieces.push(std::mem::take(&mut buf));
                    }
                    buf.push_str(sentence);
                }
            }
        } else {
            buf.push_str(paragraph);
        }
    }

    if !buf.is_empty() {
        pieces.push(buf);
    }

    pieces
}

/// Would appending `add` bytes (plus a `sep`-byte joiner for a non-empty
/// buffer) keep `buf` within `max`?
fn fits(buf: &str, add: usize, sep: usize, max: usize) -> bool {
    if buf.is_empty() {
        add <= max
    } else {
        buf.len() + sep + add <= max
    }
}

fn push_joined(buf: &mut String, piece: &str, sep: &str) {
    if !buf.is_empty() {
        buf.push_str(sep);
    }
    buf.push_str(piece);
}

/// Split a paragraph at sentence terminators (`.`, `!`, `?`) that are
/// followed by whitespace. The terminator stays with its sentence; the
/// whitespace run between sentences is consumed.
///
/// Hand-rolled because the `regex` crate has no lookbehind.
fn split_sentences(paragraph: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = paragraph.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let Some(&(_, next)) = chars.peek() else {
            continue;
        };
        if !next.is_whitespace() {
            continue;
        }

        sentences.push(&paragraph[start..i + c.len_utf8()]);
        while let Some(&(_, w)) = chars.peek() {
            if !w.is_whitespace() {
                break;
            }
            chars.next();
        }
        start = chars.peek().map_or(paragraph.len(), |&(j, _)| j);
    }

    if start < paragraph.len() {
        sentences.push(&paragraph[start..]);
    }

    sentences
}
