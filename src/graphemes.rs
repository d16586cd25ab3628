//! Grapheme cluster iteration over strings and raw bytes.
//!
//! Both iterators walk their input without allocating and yield each
//! cluster together with its resolved width. With the ANSI toggles set, a
//! whole control sequence becomes one zero-width cluster.

use unicode_segmentation::UnicodeSegmentation;

use crate::escape::{escape_sequence_len, ESC};
use crate::property::cluster_property;
use crate::Options;

/// One grapheme cluster of a byte slice, with its display width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteGrapheme<'a> {
    cluster: &'a [u8],
    width: usize,
    end: usize,
}

impl<'a> ByteGrapheme<'a> {
    /// The bytes of the cluster.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.cluster
    }

    /// Columns the cluster occupies.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Byte offset one past the cluster within the original input.
    pub fn end(&self) -> usize {
        self.end
    }
}

/// One grapheme cluster of a string slice, with its display width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grapheme<'a> {
    cluster: &'a str,
    width: usize,
    end: usize,
}

impl<'a> Grapheme<'a> {
    /// The cluster text.
    pub fn as_str(&self) -> &'a str {
        self.cluster
    }

    /// Columns the cluster occupies.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Byte offset one past the cluster within the original input.
    pub fn end(&self) -> usize {
        self.end
    }
}

/// Iterator over the grapheme clusters of a byte slice.
///
/// Invalid UTF-8 never stalls iteration: every invalid byte forms its own
/// single-byte cluster of width one.
#[derive(Debug, Clone)]
pub struct ByteGraphemes<'a> {
    input: &'a [u8],
    pos: usize,
    opts: Options,
    /// Validated UTF-8 region starting at `pos`; empty when unknown or
    /// when `pos` sits on an invalid byte.
    region: &'a str,
}

impl<'a> ByteGraphemes<'a> {
    pub fn new(input: &'a [u8], opts: Options) -> ByteGraphemes<'a> {
        ByteGraphemes {
            input,
            pos: 0,
            opts,
            region: "",
        }
    }

    /// Revalidates the input from `pos` up to the next invalid byte.
    fn refill_region(&mut self) {
        if !self.region.is_empty() {
            return;
        }
        let rest = &self.input[self.pos..];
        self.region = match std::str::from_utf8(rest) {
            Ok(s) => s,
            Err(err) => {
                let (valid, _) = rest.split_at(err.valid_up_to());
                std::str::from_utf8(valid).unwrap_or_default()
            }
        };
    }

    fn advance(&mut self, len: usize, width: usize) -> ByteGrapheme<'a> {
        let cluster = &self.input[self.pos..self.pos + len];
        self.pos += len;
        ByteGrapheme {
            cluster,
            width,
            end: self.pos,
        }
    }
}

impl<'a> Iterator for ByteGraphemes<'a> {
    type Item = ByteGrapheme<'a>;

    fn next(&mut self) -> Option<ByteGrapheme<'a>> {
        let rest = &self.input[self.pos..];
        let &first = rest.first()?;

        if (first == ESC && self.opts.control_sequences)
            || ((0x80..=0x9F).contains(&first) && self.opts.control_sequences_8bit)
        {
            let len = escape_sequence_len(rest, self.opts.control_sequences_8bit);
            // Sequences end on scalar boundaries, so the region can be
            // carried over unless the sequence ran past it.
            if len <= self.region.len() {
                self.region = &self.region[len..];
            } else {
                self.region = "";
            }
            return Some(self.advance(len, 0));
        }

        self.refill_region();
        if self.region.is_empty() {
            // Invalid byte: step over it so iteration always terminates.
            let width = cluster_property(&rest[..1]).width(self.opts);
            return Some(self.advance(1, width));
        }

        let len = self.region.graphemes(true).next().map_or(1, str::len);
        self.region = &self.region[len..];
        let width = cluster_property(&rest[..len]).width(self.opts);
        Some(self.advance(len, width))
    }
}

/// Iterator over the grapheme clusters of a string slice.
#[derive(Debug, Clone)]
pub struct Graphemes<'a> {
    input: &'a str,
    inner: ByteGraphemes<'a>,
}

impl<'a> Graphemes<'a> {
    pub fn new(input: &'a str, opts: Options) -> Graphemes<'a> {
        Graphemes {
            input,
            inner: ByteGraphemes::new(input.as_bytes(), opts),
        }
    }
}

impl<'a> Iterator for Graphemes<'a> {
    type Item = Grapheme<'a>;

    fn next(&mut self) -> Option<Grapheme<'a>> {
        let g = self.inner.next()?;
        let start = g.end() - g.as_bytes().len();
        Some(Grapheme {
            cluster: &self.input[start..g.end()],
            width: g.width(),
            end: g.end(),
        })
    }
}
