#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

mod ascii;
mod escape;
mod graphemes;
mod property;
#[allow(warnings)]
mod table;
mod truncate;


pub use graphemes::{ByteGrapheme, ByteGraphemes, Grapheme, Graphemes};
pub use table::UNICODE_VERSION;
pub use truncate::{truncate_bytes, truncate_str};

/// Width measurement options. The default (all off) matches a Western
/// locale terminal that renders escape sequences it is handed.
///
/// Options are plain data: there is no global state, every call site picks
/// its own settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Options {
    /// Treat East Asian Ambiguous characters as double width, as CJK
    /// locale terminals commonly do.
    pub east_asian_width: bool,
    /// Recognize 7-bit ANSI escape sequences (introduced by ESC) as
    /// zero-width clusters.
    pub control_sequences: bool,
    /// Recognize 8-bit C1 introducers (`0x80..=0x9F`) and their payloads
    /// as zero-width clusters.
    pub control_sequences_8bit: bool,
}

/// Computes the display width of a string in terminal columns.
#[inline]
pub fn str_width(s: &str, opts: Options) -> usize {
    width_of(s.as_bytes(), opts)
}

/// Computes the display width of a byte slice in terminal columns.
///
/// Agrees with [`str_width`] on valid UTF-8. Invalid bytes count one
/// column each; the result for malformed input is well defined but not
/// guaranteed to match any particular terminal.
#[inline]
pub fn bytes_width(bytes: &[u8], opts: Options) -> usize {
    width_of(bytes, opts)
}

fn width_of(bytes: &[u8], opts: Options) -> usize {
    let mut total = 0;
    let mut pos = 0;
    'swar: while pos < bytes.len() {
        if let Some(run) = ascii::printable_ascii_run(&bytes[pos..]) {
            total += run;
            pos += run;
            continue;
        }
        for g in ByteGraphemes::new(&bytes[pos..], opts) {
            total += g.width();
            if ascii::printable_run_ahead(&bytes[pos + g.end()..]) {
                pos += g.end();
                continue 'swar;
            }
        }
        break;
    }
    total
}

/// Computes the display width of a single scalar value.
///
/// This is advisory: terminals advance by grapheme cluster, and a scalar
/// measured out of context can disagree with the cluster it ends up in
/// (combining marks, variation selectors, flags). Prefer [`str_width`].
pub fn char_width(c: char, opts: Options) -> usize {
    if c.is_ascii() {
        return ascii::ascii_width(c as u8);
    }
    let mut buf = [0u8; 4];
    let cluster = c.encode_utf8(&mut buf);
    property::cluster_property(cluster.as_bytes()).width(opts)
}

/// Iterates the grapheme clusters of a string together with their widths.
///
/// The widths sum to exactly [`str_width`] of the same input.
#[inline]
pub fn str_graphemes(s: &str, opts: Options) -> Graphemes<'_> {
    Graphemes::new(s, opts)
}

/// Iterates the grapheme clusters of a byte slice together with their
/// widths. Invalid bytes come out as single-byte clusters.
#[inline]
pub fn bytes_graphemes(bytes: &[u8], opts: Options) -> ByteGraphemes<'_> {
    ByteGraphemes::new(bytes, opts)
}
