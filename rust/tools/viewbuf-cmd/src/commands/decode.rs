//! Decode command implementation

use std::{collections::BTreeMap, sync::Arc};

use anyhow::{Context, Result};
use serde::Serialize;
use viewbuf_bytes::LookupBuffer;
use viewbuf_lookup::{
    CollectionStats, DecodeOptions, Entry, ReadMask, ScanInfo, decode_lookup_buffer,
};
use viewbuf_values::{
    Latin1TextDecoder, NativeTextDecoder, TimeZoneContext, TypedValue, Utf8TextDecoder,
};

use crate::utils::validate_file_exists;

pub struct DecodeArgs {
    pub mask: String,
    pub count: usize,
    pub lazy_text: bool,
    pub utc_offset_minutes: i32,
    pub dst: bool,
    pub latin1: bool,
    pub lookup_name: Option<String>,
    pub output: Option<String>,
    pub file: String,
}

#[derive(Serialize)]
struct DecodeSummary {
    file: String,
    buffer_size: usize,
    mask: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<StatsInfo>,
    entry_count: usize,
    entries: Vec<EntryInfo>,
}

#[derive(Serialize)]
struct StatsInfo {
    top_level_entries: u32,
    last_modified: u32,
}

#[derive(Serialize)]
struct EntryInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    note_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note_class: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    siblings: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    descendants: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    any_unread: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    indent_levels: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unread: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    column_values: Option<Vec<TypedValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    column_value_sizes: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<BTreeMap<String, TypedValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lookup_name: Option<String>,
}

pub fn run(args: DecodeArgs) -> Result<()> {
    let mask = parse_mask(&args.mask)?;
    validate_file_exists(&args.file)?;
    let bytes =
        std::fs::read(&args.file).with_context(|| format!("Failed to read {}", args.file))?;

    let time_zone = TimeZoneContext::new(args.utc_offset_minutes, args.dst)
        .context("Invalid time zone")?;
    let text_decoder: Arc<dyn NativeTextDecoder> = if args.latin1 {
        Arc::new(Latin1TextDecoder)
    } else {
        Arc::new(Utf8TextDecoder)
    };
    let mut options = DecodeOptions::default()
        .with_lazy_text(args.lazy_text)
        .with_time_zone(time_zone)
        .with_text_decoder(text_decoder);
    if let Some(name) = &args.lookup_name {
        options = options.with_single_column_lookup_name(name);
    }

    let buffer = LookupBuffer::from(bytes);
    let result = decode_lookup_buffer(&buffer, args.count, mask, ScanInfo::default(), &options)
        .with_context(|| format!("Failed to decode {}", args.file))?;
    log::debug!(
        "decoded {} entries from {} ({} bytes)",
        result.returned_count(),
        args.file,
        buffer.len()
    );

    let entries = result
        .entries()
        .iter()
        .map(entry_info)
        .collect::<Result<Vec<_>>>()?;
    let summary = DecodeSummary {
        file: args.file.clone(),
        buffer_size: buffer.len(),
        mask: mask
            .iter_names()
            .map(|(name, _)| name.to_string())
            .collect(),
        stats: result.stats().map(stats_info),
        entry_count: entries.len(),
        entries,
    };
    buffer.release();

    let json = serde_json::to_string_pretty(&summary)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {path}"))?
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Parses a read mask given as flag names separated by `|` or `,`, or as a
/// decimal or `0x`-prefixed hex number.
pub fn parse_mask(text: &str) -> Result<ReadMask> {
    let text = text.trim();
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        let bits = u32::from_str_radix(hex, 16).with_context(|| format!("Invalid mask: {text}"))?;
        return Ok(ReadMask::from_bits_retain(bits));
    }
    if let Ok(bits) = text.parse::<u32>() {
        return Ok(ReadMask::from_bits_retain(bits));
    }

    let mut mask = ReadMask::empty();
    let names = text
        .split(['|', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty());
    for name in names {
        let flag = ReadMask::from_name(&name.to_ascii_uppercase())
            .with_context(|| format!("Unknown read mask flag: {name}"))?;
        mask |= flag;
    }
    if mask.is_empty() {
        anyhow::bail!("Empty read mask: {text:?}");
    }
    Ok(mask)
}

fn stats_info(stats: &CollectionStats) -> StatsInfo {
    StatsInfo {
        top_level_entries: stats.top_level_entries,
        last_modified: stats.last_modified,
    }
}

fn entry_info(entry: &Entry) -> Result<EntryInfo> {
    let column_values = entry
        .column_values
        .as_ref()
        .map(|table| -> Result<Vec<TypedValue>> {
            Ok(table.values()?.into_iter().cloned().collect())
        })
        .transpose()?;
    let summary = entry
        .summary
        .as_ref()
        .map(|table| table.to_map())
        .transpose()?;

    Ok(EntryInfo {
        note_id: entry.note_id,
        category: entry.note_id.map(|_| entry.is_category()),
        unid: entry.unid.map(|unid| unid.to_string()),
        note_class: entry.note_class.map(|class| class.bits()),
        siblings: entry.sibling_count,
        children: entry.child_count,
        descendants: entry.descendant_count,
        any_unread: entry.any_unread,
        indent_levels: entry.indent_levels,
        score: entry.score,
        unread: entry.unread,
        position: entry.position.as_ref().map(|pos| pos.to_string()),
        column_values,
        column_value_sizes: entry.column_value_sizes(),
        summary,
        lookup_name: entry.single_column_lookup_name.clone(),
    })
}
