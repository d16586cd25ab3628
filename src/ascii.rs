//! ASCII fast paths: single-byte widths and a SWAR scanner that measures
//! long printable runs eight bytes at a time.

const LO: u64 = 0x0101_0101_0101_0101;
const HI: u64 = 0x8080_8080_8080_8080;

/// Width of a single ASCII byte: control characters and DEL occupy no
/// columns, everything else one.
#[inline]
pub(crate) fn ascii_width(b: u8) -> usize {
    usize::from(b >= 0x20 && b != 0x7F)
}

/// Returns the length of the leading printable-ASCII run, or `None` when
/// the input starts with fewer than eight printable bytes.
///
/// Every counted byte occupies one column and is a complete grapheme on
/// its own: the final byte of the run is only counted when the byte after
/// it is ASCII too, so a trailing combining mark or variation selector can
/// never be separated from its base.
pub(crate) fn printable_ascii_run(buf: &[u8]) -> Option<usize> {
    let mut len = 0;
    while let Some(word) = buf.get(len..len + 8).and_then(load) {
        if !word_is_printable(word) {
            break;
        }
        len += 8;
    }
    if len == 0 {
        return None;
    }
    if buf.get(len).map_or(false, |&b| b >= 0x80) {
        len -= 1;
    }
    Some(len)
}

/// Cheap probe for re-entering the SWAR path mid-iteration: true when the
/// next eight bytes are all printable ASCII.
#[inline]
pub(crate) fn printable_run_ahead(buf: &[u8]) -> bool {
    buf.get(..8).and_then(load).map_or(false, word_is_printable)
}

#[inline]
fn load(chunk: &[u8]) -> Option<u64> {
    Some(u64::from_le_bytes(chunk.try_into().ok()?))
}

/// True when all eight bytes are in `0x20..=0x7E`: no high bit, nothing
/// below space, no DEL.
#[inline]
fn word_is_printable(word: u64) -> bool {
    if word & HI != 0 {
        return false;
    }
    // A byte below 0x20 underflows when 0x20 is subtracted from its lane.
    let below_space = word.wrapping_sub(LO * 0x20) & !word & HI;
    // DEL xors to zero, then the classic zero-byte test applies.
    let xored = word ^ (LO * 0x7F);
    let del = xored.wrapping_sub(LO) & !xored & HI;
    (below_space | del) == 0
}
