//! Width-budgeted truncation.

use std::borrow::Cow;

use crate::escape::ESC;
use crate::graphemes::{ByteGraphemes, Graphemes};
use crate::{bytes_width, str_width, Options};

/// Truncates `s` so that its display width fits `max_width` columns,
/// appending `tail` (an ellipsis, usually) whenever anything was cut.
///
/// The cut never splits a grapheme cluster, and room for the tail is
/// reserved inside the budget. When control sequence recognition is on,
/// zero-width escapes from the cut-off remainder are re-appended after the
/// tail so that color and style resets survive. Input that already fits is
/// returned borrowed, without the tail.
pub fn truncate_str<'a>(s: &'a str, max_width: usize, tail: &str, opts: Options) -> Cow<'a, str> {
    let cut = match cut_point(s.as_bytes(), max_width, str_width(tail, opts), opts) {
        Some(cut) => cut,
        None => return Cow::Borrowed(s),
    };
    let mut out = String::with_capacity(cut + tail.len());
    out.push_str(&s[..cut]);
    out.push_str(tail);
    if opts.control_sequences || opts.control_sequences_8bit {
        for g in Graphemes::new(&s[cut..], opts) {
            if g.width() == 0 && is_escape_lead(g.as_str().as_bytes(), opts) {
                out.push_str(g.as_str());
            }
        }
    }
    Cow::Owned(out)
}

/// Byte-slice counterpart of [`truncate_str`]; produces byte-identical
/// output for identical input.
pub fn truncate_bytes<'a>(
    bytes: &'a [u8],
    max_width: usize,
    tail: &[u8],
    opts: Options,
) -> Cow<'a, [u8]> {
    let cut = match cut_point(bytes, max_width, bytes_width(tail, opts), opts) {
        Some(cut) => cut,
        None => return Cow::Borrowed(bytes),
    };
    let mut out = Vec::with_capacity(cut + tail.len());
    out.extend_from_slice(&bytes[..cut]);
    out.extend_from_slice(tail);
    if opts.control_sequences || opts.control_sequences_8bit {
        for g in ByteGraphemes::new(&bytes[cut..], opts) {
            if g.width() == 0 && is_escape_lead(g.as_bytes(), opts) {
                out.extend_from_slice(g.as_bytes());
            }
        }
    }
    Cow::Owned(out)
}

/// Walks the input and decides whether truncation is needed: the byte
/// offset of the largest prefix whose width fits the tail-adjusted budget,
/// or `None` when the whole input fits `max_width` as is.
fn cut_point(input: &[u8], max_width: usize, tail_width: usize, opts: Options) -> Option<usize> {
    let budget = max_width.saturating_sub(tail_width);
    let mut cut = 0;
    let mut total = 0;
    for g in ByteGraphemes::new(input, opts) {
        total += g.width();
        if total > max_width {
            return Some(cut);
        }
        if total <= budget {
            cut = g.end();
        }
    }
    None
}

/// A cluster that begins a recognized escape sequence under the given
/// options.
fn is_escape_lead(cluster: &[u8], opts: Options) -> bool {
    match cluster.first() {
        Some(&ESC) => opts.control_sequences,
        Some(b) => (0x80..=0x9F).contains(b) && opts.control_sequences_8bit,
        None => false,
    }
}
