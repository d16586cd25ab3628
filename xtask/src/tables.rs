use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use proc_macro2::{Literal, TokenStream};
use quote::{quote, ToTokens};
use xshell::Shell;

use crate::flags::GenTables;
use crate::reformat;

const NUM_CODEPOINTS: u32 = 0x110000;
type UncompressedTable = [u8; NUM_CODEPOINTS as usize];

// Property bytes as stored in the emitted tables; must stay in sync with
// the runtime `Property` enum.
const DEFAULT: u8 = 0;
const ZERO_WIDTH: u8 = 1;
const EAST_ASIAN_WIDE: u8 = 2;
const EAST_ASIAN_AMBIGUOUS: u8 = 3;
const EMOJI_PRESENTATION: u8 = 4;

/// Sentinel for scalars no data file has touched yet.
const UNASSIGNED: u8 = u8::MAX;

/// Format and combining marks that widely deployed width implementations
/// render as a visible column, excluded from the zero-width class: soft
/// hyphen plus the Arabic and Indic prepended concatenation marks. VS15
/// and VS16 are excluded as well because the runtime applies their
/// presentation semantics against the preceding base itself.
///
/// Open question (tracked in DESIGN.md): it is unclear whether every entry
/// is terminal-accurate or inherited compatibility behavior; the list is
/// kept in one place so it can be audited against real emulators.
const EXEMPT_FORMAT_MARKS: &[RangeInclusive<u32>] = &[
    0x00AD..=0x00AD,
    0x0600..=0x0605,
    0x06DD..=0x06DD,
    0x070F..=0x070F,
    0x0890..=0x0891,
    0x08E2..=0x08E2,
    0x110BD..=0x110BD,
    0x110CD..=0x110CD,
    0xFE0E..=0xFE0F,
];

fn retrieve_file(version: &str, file: &str) -> Result<String> {
    let url = format!("http://unicode.org/Public/{version}/ucd/{file}.txt");
    println!("downloading {url}...");
    ureq::get(&url)
        .call()?
        .into_string()
        .context("download failed")
}

fn parse_codepoint(s: &str) -> Result<u32> {
    u32::from_str_radix(s, 16).context("failed to parse codepoint")
}

fn parse_codepoints(s: &str) -> Result<RangeInclusive<u32>> {
    let (start, end) = match s.split_once("..") {
        Some(range) => range,
        None => (s, s),
    };
    let start = parse_codepoint(start)?;
    let end = parse_codepoint(end)?;
    Ok(start..=end)
}

fn parse_data_line(mut line: &str) -> Option<Vec<&str>> {
    line = line.trim();
    if line.starts_with('#') || line.is_empty() {
        return None;
    }
    let line = line.split_once('#').map_or(line, |(line, _comment)| line);
    Some(line.split(';').map(str::trim).collect())
}

struct RawUnicodeData {
    /// Contents of UnicodeData.txt used to retrieve general categories
    unicode_data: String,
    /// Contents of EastAsianWidth.txt used to retrieve east asian widths
    eaw_data: String,
    /// Contents of emoji-data.txt used to retrieve emoji presentation
    emoji_data: String,
}

impl RawUnicodeData {
    pub fn new(version: &str) -> Result<RawUnicodeData> {
        let data = RawUnicodeData {
            unicode_data: retrieve_file(version, "UnicodeData")?,
            eaw_data: retrieve_file(version, "EastAsianWidth")?,
            emoji_data: retrieve_file(version, "emoji/emoji-data")?,
        };
        Ok(data)
    }

    fn properties(&self) -> Result<Box<UncompressedTable>> {
        println!("assigning codepoint properties...");
        let mut table: Box<UncompressedTable> = vec![UNASSIGNED; NUM_CODEPOINTS as usize]
            .try_into()
            .unwrap();
        self.fill_east_asian_widths(&mut table)?;
        self.fill_zero_width_categories(&mut table)?;
        self.fill_emoji_presentation(&mut table)?;
        Self::fill_special_cases(&mut table);
        for prop in table.iter_mut() {
            if *prop == UNASSIGNED {
                *prop = DEFAULT;
            }
        }
        Ok(table)
    }

    fn fill_east_asian_widths(&self, table: &mut UncompressedTable) -> Result<()> {
        for line in self.eaw_data.lines() {
            let Some(fields) = parse_data_line(line) else { continue };
            let [codepoints, class] = fields.as_slice() else { continue };
            let codepoints = parse_codepoints(codepoints)?;
            let prop = match *class {
                "F" | "W" => EAST_ASIAN_WIDE,
                "A" => EAST_ASIAN_AMBIGUOUS,
                _ => DEFAULT,
            };
            for cp in codepoints {
                table[cp as usize] = prop;
            }
        }

        // Apply the following special cases:
        //  - The unassigned code points in the following blocks default to "W":
        //         CJK Unified Ideographs Extension A: U+3400..U+4DBF
        //         CJK Unified Ideographs:             U+4E00..U+9FFF
        //         CJK Compatibility Ideographs:       U+F900..U+FAFF
        //  - All undesignated code points in Planes 2 and 3, whether inside or
        //      outside of allocated blocks, default to "W":
        //         Plane 2:                            U+20000..U+2FFFD
        //         Plane 3:                            U+30000..U+3FFFD
        let wide_ranges = [
            0x3400..=0x4DBF,
            0x4E00..=0x9FFF,
            0xF900..=0xFAFF,
            0x20000..=0x2FFFD,
            0x30000..=0x3FFFD,
        ];
        for wide_range in wide_ranges {
            for code_point in wide_range {
                if table[code_point] == UNASSIGNED {
                    table[code_point] = EAST_ASIAN_WIDE;
                }
            }
        }
        Ok(())
    }

    fn fill_zero_width_categories(&self, table: &mut UncompressedTable) -> Result<()> {
        for line in self.unicode_data.lines() {
            let Some(fields) = parse_data_line(line) else { continue };
            let [codepoints, _, category, ..] = fields.as_slice() else { continue };
            let codepoints = parse_codepoints(codepoints)?;
            // Mc is deliberately absent: spacing marks take a column in
            // practically every terminal.
            if matches!(*category, "Mn" | "Me" | "Cf" | "Cc" | "Zl" | "Zp") {
                for cp in codepoints {
                    table[cp as usize] = ZERO_WIDTH;
                }
            }
        }

        Ok(())
    }

    fn fill_emoji_presentation(&self, table: &mut UncompressedTable) -> Result<()> {
        for line in self.emoji_data.lines() {
            let Some(fields) = parse_data_line(line) else { continue };
            let [codepoints, prop, ..] = fields.as_slice() else {
                bail!("invalid emoji data line {line}");
            };
            let codepoints = parse_codepoints(codepoints)?;
            // Default emoji presentation trumps the east asian class; this
            // is what lets VS15 narrow a watch while CJK stays wide.
            if *prop == "Emoji_Presentation" {
                for cp in codepoints {
                    table[cp as usize] = EMOJI_PRESENTATION;
                }
            }
        }
        Ok(())
    }

    fn fill_special_cases(table: &mut UncompressedTable) {
        let mut zero_width_ranges = vec![
            // surrogates
            0xD800..=0xDBFF,
            0xDC00..=0xDFFF,
            // noncharacters
            0xFDD0..=0xFDEF,
        ];
        // See "noncharacters" discussion at https://www.unicode.org/faq/private_use.html
        // "Last two code points of each of the 16 supplementary planes" and also BMP (plane 0).
        for plane in 0..=16u32 {
            let codepoint = 0x10000 * plane + 0xFFFE;
            zero_width_ranges.push(codepoint..=codepoint + 1);
        }
        for range in zero_width_ranges {
            for cp in range {
                table[cp as usize] = ZERO_WIDTH;
            }
        }
        for range in EXEMPT_FORMAT_MARKS {
            for cp in range.clone() {
                table[cp as usize] = DEFAULT;
            }
        }
    }
}

/// The three level trie: two u16 handle tables and a dense property table.
///
/// A handle selects a 128-entry block of TABLE_1 or a 64-entry block of
/// TABLE_2; identical blocks are stored once.
struct Trie {
    table0: Vec<u16>,
    table1: Vec<u16>,
    table2: Vec<u8>,
}

fn compress(props: &UncompressedTable) -> Trie {
    println!("compressing leaf blocks...");
    let mut leaf_blocks: Vec<[u8; 64]> = Vec::new();
    let mut leaf_index: HashMap<[u8; 64], u16> = HashMap::new();
    let mut leaf_handles: Vec<u16> = Vec::new();
    for block in props.chunks_exact(64) {
        let block: [u8; 64] = block.try_into().unwrap();
        let handle = *leaf_index.entry(block).or_insert_with(|| {
            leaf_blocks.push(block);
            (leaf_blocks.len() - 1) as u16
        });
        leaf_handles.push(handle);
    }
    println!("found {} unique leaf blocks", leaf_blocks.len());

    println!("compressing handle blocks...");
    let mut mid_blocks: Vec<[u16; 128]> = Vec::new();
    let mut mid_index: HashMap<[u16; 128], u16> = HashMap::new();
    let mut table0: Vec<u16> = Vec::new();
    for block in leaf_handles.chunks_exact(128) {
        let block: [u16; 128] = block.try_into().unwrap();
        let handle = *mid_index.entry(block).or_insert_with(|| {
            mid_blocks.push(block);
            (mid_blocks.len() - 1) as u16
        });
        table0.push(handle);
    }
    println!("found {} unique handle blocks", mid_blocks.len());

    Trie {
        table0,
        table1: mid_blocks.concat(),
        table2: leaf_blocks.concat(),
    }
}

fn emit_tables(trie: Trie, version: &str) -> Result<TokenStream> {
    let mut res = TokenStream::new();
    let version_components: Result<Vec<_>, _> =
        version.trim().split('.').map(u8::from_str).collect();
    let Ok([major, minor, patch]) = version_components.as_deref() else {
        bail!("Invalid version {version}")
    };
    quote! {
        /// Version of the UCD used to generate the property lookup tables
        pub const UNICODE_VERSION: (u8, u8, u8) = (#major, #minor, #patch);
    }
    .to_tokens(&mut res);
    let Trie {
        table0,
        table1,
        table2,
    } = trie;
    let (len0, len1, len2) = (table0.len(), table1.len(), table2.len());
    // unsuffixed literals keep the emitted file readable
    let table0 = table0.iter().map(|&v| Literal::u16_unsuffixed(v));
    let table1 = table1.iter().map(|&v| Literal::u16_unsuffixed(v));
    let table2 = table2.iter().map(|&v| Literal::u8_unsuffixed(v));
    quote! {
        pub(crate) static TABLE_0: [u16; #len0] = [#(#table0),*];
        pub(crate) static TABLE_1: [u16; #len1] = [#(#table1),*];
        pub(crate) static TABLE_2: [u8; #len2] = [#(#table2),*];
    }
    .to_tokens(&mut res);

    Ok(res)
}

impl GenTables {
    pub fn run(self, sh: &Shell) -> Result<()> {
        let version = self.unicode_version;
        println!("generating tables for Unicode {version}");
        let raw_data = RawUnicodeData::new(&version)?;
        let props = raw_data.properties()?;
        let trie = compress(&props);
        println!("generating table.rs...");
        let table = emit_tables(trie, &version)?;
        let table = reformat(sh, table.to_string());
        let table = format!("//! Generated by `cargo xtask gen-tables`, do not edit by hand.\n//! This file contains a three level LUT mapping a scalar value to its width property.\n//! It was generated from UCD {version}\n\n{table}");
        if self.check {
            let current = sh
                .read_file("src/table.rs")
                .context("src/table.rs is missing")?;
            if current != table {
                bail!("src/table.rs is out of date, rerun `cargo xtask gen-tables {version}`");
            }
            println!("src/table.rs is up to date");
        } else {
            sh.write_file("src/table.rs", table)?;
        }
        Ok(())
    }
}
