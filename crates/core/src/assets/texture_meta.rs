//! Line-oriented texture atlas metadata.
//!
//! Each non-blank line is `name x y w h` for a static texture or
//! `name x y w h frames` for an animation strip of horizontally adjacent frames.

use tracing::warn;

use crate::error::{CrawlerError, Result};
use crate::types::TextureRef;

pub const FLIPPED_SUFFIX: &str = "_flipped";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtlasRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextureEntry {
    Static { texture: TextureRef, region: AtlasRegion },
    Animated { name: String, frames: Vec<TextureRef>, regions: Vec<AtlasRegion> },
}

impl TextureEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::Static { texture, .. } => &texture.name,
            Self::Animated { name, .. } => name,
        }
    }

    /// Mirrored copy of an animation strip, registered under `<name>_flipped`.
    pub fn flipped(&self) -> Option<(String, Vec<TextureRef>)> {
        let Self::Animated { name, frames, .. } = self else {
            return None;
        };
        let flipped = frames
            .iter()
            .map(|frame| TextureRef {
                name: format!("{}{FLIPPED_SUFFIX}", frame.name),
                width: frame.width,
                height: frame.height,
            })
            .collect();
        Some((format!("{name}{FLIPPED_SUFFIX}"), flipped))
    }
}

/// Parses one metadata line. Blank lines yield `Ok(None)`.
pub fn parse_entry(line: &str, source_name: &str) -> Result<Option<TextureEntry>> {
    let chunks: Vec<&str> = line.split_whitespace().collect();
    let number = |index: usize| -> Result<u32> {
        chunks[index].parse::<u32>().map_err(|_| {
            CrawlerError::malformed(
                source_name,
                format!("field {} of `{}` is not a non-negative integer", index + 1, line.trim()),
            )
        })
    };

    match chunks.len() {
        0 => Ok(None),
        5 => {
            let region =
                AtlasRegion { x: number(1)?, y: number(2)?, width: number(3)?, height: number(4)? };
            let texture = TextureRef {
                name: chunks[0].to_string(),
                width: region.width,
                height: region.height,
            };
            Ok(Some(TextureEntry::Static { texture, region }))
        }
        6 => {
            let (x, y, width, height, count) =
                (number(1)?, number(2)?, number(3)?, number(4)?, number(5)?);
            if count == 0 {
                return Err(CrawlerError::malformed(
                    source_name,
                    format!("animation `{}` has zero frames", chunks[0]),
                ));
            }
            let name = chunks[0].to_string();
            let frames = (0..count)
                .map(|index| TextureRef { name: format!("{name}_{index}"), width, height })
                .collect();
            let regions =
                (0..count).map(|index| AtlasRegion { x: x + width * index, y, width, height }).collect();
            Ok(Some(TextureEntry::Animated { name, frames, regions }))
        }
        other => Err(CrawlerError::malformed(
            source_name,
            format!("expected 5 or 6 fields, found {other} in `{}`", line.trim()),
        )),
    }
}

/// Parses a whole metadata file, logging and skipping malformed lines.
pub fn parse_meta(text: &str, source_name: &str) -> Vec<TextureEntry> {
    let mut entries = Vec::new();
    for (line_index, line) in text.lines().enumerate() {
        match parse_entry(line, source_name) {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => {}
            Err(error) => {
                warn!(
                    source = source_name,
                    line = line_index + 1,
                    error = %error,
                    "texture_meta_entry_skipped"
                );
            }
        }
    }
    entries
}
