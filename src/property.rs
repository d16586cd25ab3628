//! Width property lookup for scalars and grapheme clusters.
//!
//! The per-scalar properties live in the generated three level tables in
//! [`crate::table`]; everything that depends on the surrounding cluster
//! (variation selectors, flags, keycap bases) is resolved here.

use crate::table::{TABLE_0, TABLE_1, TABLE_2};
use crate::Options;

/// Width property of a Unicode scalar value, as stored in the generated
/// lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum Property {
    /// Ordinary narrow character, including anything unknown to the tables.
    Default = 0,
    /// Controls, combining marks and format characters.
    ZeroWidth = 1,
    /// East Asian Wide and Fullwidth.
    EastAsianWide = 2,
    /// East Asian Ambiguous; narrow unless [`Options::east_asian_width`].
    EastAsianAmbiguous = 3,
    /// Default emoji presentation; wide unless VS15 selects text style.
    EmojiPresentation = 4,
}

/// Columns per property tag, indexed by the tag byte.
const WIDTHS: [usize; 5] = [1, 0, 2, 1, 2];

impl Property {
    fn from_byte(byte: u8) -> Property {
        match byte {
            1 => Property::ZeroWidth,
            2 => Property::EastAsianWide,
            3 => Property::EastAsianAmbiguous,
            4 => Property::EmojiPresentation,
            _ => Property::Default,
        }
    }

    /// Columns a cluster with this resolved property occupies.
    #[inline]
    pub(crate) fn width(self, opts: Options) -> usize {
        if self == Property::EastAsianAmbiguous && opts.east_asian_width {
            return 2;
        }
        WIDTHS[self as usize]
    }
}

/// Looks up the property of the scalar encoded at the start of `bytes` and
/// returns it together with the number of bytes consumed. Malformed input
/// consumes a single byte and maps to [`Property::Default`] so that callers
/// always make progress.
pub(crate) fn lookup(bytes: &[u8]) -> (Property, usize) {
    match decode_scalar(bytes) {
        Some((cp, len)) => (lookup_scalar(cp), len),
        None => (Property::Default, 1),
    }
}

#[inline]
fn lookup_scalar(cp: u32) -> Property {
    let cp = cp as usize;

    let t1_offset = TABLE_0[cp >> 13] as usize;

    // Each sub-table in TABLE_1 covers 7 bits and stores 16-bit handles,
    // so each sub-table is 128 entries long.
    // (Sub-tables are selected using the handle from the previous table.)
    let t2_offset = TABLE_1[(t1_offset << 7) + (cp >> 6 & 0x7F)] as usize;

    // Each sub-table in TABLE_2 covers the final 6 bits and stores one
    // property byte per scalar.
    Property::from_byte(TABLE_2[(t2_offset << 6) + (cp & 0x3F)])
}

/// Decodes the UTF-8 scalar at the start of `bytes`. Returns `None` for
/// truncated or malformed sequences; overlong forms and surrogates are
/// rejected the same way `str::from_utf8` rejects them.
pub(crate) fn decode_scalar(bytes: &[u8]) -> Option<(u32, usize)> {
    let b0 = u32::from(*bytes.first()?);
    match b0 {
        0x00..=0x7F => Some((b0, 1)),
        0xC2..=0xDF => {
            let b1 = continuation(bytes, 1)?;
            Some((((b0 & 0x1F) << 6) | b1, 2))
        }
        0xE0..=0xEF => {
            let b1 = continuation(bytes, 1)?;
            let b2 = continuation(bytes, 2)?;
            let cp = ((b0 & 0x0F) << 12) | (b1 << 6) | b2;
            match cp {
                0x800..=0xD7FF | 0xE000..=0xFFFF => Some((cp, 3)),
                _ => None,
            }
        }
        0xF0..=0xF4 => {
            let b1 = continuation(bytes, 1)?;
            let b2 = continuation(bytes, 2)?;
            let b3 = continuation(bytes, 3)?;
            let cp = ((b0 & 0x07) << 18) | (b1 << 12) | (b2 << 6) | b3;
            (0x10000..=0x10FFFF).contains(&cp).then_some((cp, 4))
        }
        _ => None,
    }
}

#[inline]
fn continuation(bytes: &[u8], index: usize) -> Option<u32> {
    let b = *bytes.get(index)?;
    (b & 0xC0 == 0x80).then_some(u32::from(b & 0x3F))
}

/// Resolves the final property of one grapheme cluster: the table entry of
/// the first scalar, adjusted for variation selectors, regional indicator
/// pairs and keycap bases.
pub(crate) fn cluster_property(cluster: &[u8]) -> Property {
    let b0 = match cluster.first() {
        Some(&b) => b,
        None => return Property::Default,
    };
    if b0 < 0x20 || b0 == 0x7F {
        return Property::ZeroWidth;
    }
    if b0 < 0x80 {
        // An ASCII base can still pick a presentation, e.g. the keycap
        // sequence `1` + VS16 + U+20E3.
        return match &cluster[1..] {
            // text variation selector U+FE0E as bytes
            [0xEF, 0xB8, 0x8E, ..] => Property::Default,
            // emoji variation selector U+FE0F as bytes
            [0xEF, 0xB8, 0x8F, ..] => Property::EastAsianWide,
            _ => Property::Default,
        };
    }
    if is_flag(cluster) {
        return Property::EastAsianWide;
    }
    let (prop, consumed) = lookup(cluster);
    match &cluster[consumed..] {
        [0xEF, 0xB8, 0x8F, ..] => Property::EastAsianWide,
        // VS15 selects text presentation; the column count only changes for
        // characters whose default presentation is emoji-exclusive.
        [0xEF, 0xB8, 0x8E, ..] if prop == Property::EmojiPresentation => Property::Default,
        _ => prop,
    }
}

/// Two adjacent regional indicators (U+1F1E6..=U+1F1FF) form a flag.
#[inline]
fn is_flag(cluster: &[u8]) -> bool {
    matches!(
        cluster,
        [0xF0, 0x9F, 0x87, a, 0xF0, 0x9F, 0x87, b, ..]
            if (0xA6..=0xBF).contains(a) && (0xA6..=0xBF).contains(b)
    )
}
