//! Read-only registry of textures, sounds and entity templates, looked up by name.

pub mod entity_config;
pub mod texture_meta;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::entity::EntityPrototype;
use crate::error::{AssetKind, CrawlerError, Result};
use crate::types::{SoundRef, TextureRef};

pub use entity_config::{EntityConfig, parse_entity_config};
pub use texture_meta::{AtlasRegion, TextureEntry};

pub const TEXTURE_META_FILE: &str = "textures/textures_meta.txt";
pub const ENTITY_DIR: &str = "entities";
pub const SOUND_EFFECT_DIR: &str = "sounds/effects";
pub const MUSIC_DIR: &str = "sounds/music";

#[derive(Clone, Debug, Default)]
pub struct AssetRepository {
    static_textures: BTreeMap<String, TextureRef>,
    animated_textures: BTreeMap<String, Vec<TextureRef>>,
    regions: BTreeMap<String, AtlasRegion>,
    sound_effects: BTreeMap<String, SoundRef>,
    music: BTreeMap<String, SoundRef>,
    entities: BTreeMap<String, EntityPrototype>,
}

impl AssetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an asset directory laid out as `textures/textures_meta.txt`,
    /// `sounds/{effects,music}/*` and `entities/*.json`.
    ///
    /// Malformed metadata lines and entity files are logged and skipped. A texture
    /// or sound referenced by an entity that does not exist fails the whole load.
    pub fn load_dir(root: &Path) -> Result<Self> {
        info!(root = %root.display(), "asset_load_started");
        let mut assets = Self::new();

        let meta_path = root.join(TEXTURE_META_FILE);
        let meta = fs::read_to_string(&meta_path)?;
        let texture_count = assets.load_texture_meta(&meta, &meta_path.display().to_string());

        for path in sorted_files(&root.join(SOUND_EFFECT_DIR))? {
            if let Some(stem) = file_stem(&path) {
                assets.insert_sound_effect(SoundRef { name: stem });
            }
        }
        for path in sorted_files(&root.join(MUSIC_DIR))? {
            if let Some(stem) = file_stem(&path) {
                assets.insert_music(SoundRef { name: stem });
            }
        }

        for path in sorted_files(&root.join(ENTITY_DIR))? {
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let text = fs::read_to_string(&path)?;
            match assets.load_entity_config(&text, &path.display().to_string()) {
                Ok(name) => debug!(entity = %name, "entity_template_loaded"),
                Err(error @ CrawlerError::MalformedData { .. }) => {
                    warn!(path = %path.display(), error = %error, "entity_config_skipped");
                }
                Err(error) => return Err(error),
            }
        }

        info!(
            textures = texture_count,
            sound_effects = assets.sound_effects.len(),
            music_tracks = assets.music.len(),
            entities = assets.entities.len(),
            "asset_load_finished"
        );
        Ok(assets)
    }

    /// Registers every well-formed entry of a metadata file and returns how many were added.
    pub fn load_texture_meta(&mut self, text: &str, source_name: &str) -> usize {
        let entries = texture_meta::parse_meta(text, source_name);
        let count = entries.len();
        for entry in entries {
            self.insert_texture_entry(entry);
        }
        count
    }

    pub fn insert_texture_entry(&mut self, entry: TextureEntry) {
        if let Some((flipped_name, flipped_frames)) = entry.flipped() {
            self.animated_textures.insert(flipped_name, flipped_frames);
        }
        match entry {
            TextureEntry::Static { texture, region } => {
                self.regions.insert(texture.name.clone(), region);
                self.static_textures.insert(texture.name.clone(), texture);
            }
            TextureEntry::Animated { name, frames, regions } => {
                for (frame, region) in frames.iter().zip(regions) {
                    self.regions.insert(frame.name.clone(), region);
                }
                self.animated_textures.insert(name, frames);
            }
        }
    }

    /// Parses an entity definition, resolves it and registers the prototype under its name.
    pub fn load_entity_config(&mut self, text: &str, source_name: &str) -> Result<String> {
        let prototype = parse_entity_config(text, source_name)?.into_prototype(self)?;
        let name = prototype.name.clone();
        self.insert_entity(prototype);
        Ok(name)
    }

    pub fn insert_static_texture(&mut self, texture: TextureRef) {
        self.static_textures.insert(texture.name.clone(), texture);
    }

    pub fn insert_animated_texture(&mut self, name: &str, frames: Vec<TextureRef>) {
        self.animated_textures.insert(name.to_string(), frames);
    }

    pub fn insert_sound_effect(&mut self, sound: SoundRef) {
        self.sound_effects.insert(sound.name.clone(), sound);
    }

    pub fn insert_music(&mut self, track: SoundRef) {
        self.music.insert(track.name.clone(), track);
    }

    pub fn insert_entity(&mut self, prototype: EntityPrototype) {
        self.entities.insert(prototype.name.clone(), prototype);
    }

    pub fn static_texture(&self, name: &str) -> Result<&TextureRef> {
        self.static_textures.get(name).ok_or_else(|| CrawlerError::not_found(AssetKind::Texture, name))
    }

    pub fn animated_texture(&self, name: &str) -> Result<&[TextureRef]> {
        self.animated_textures
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| CrawlerError::not_found(AssetKind::Animation, name))
    }

    pub fn atlas_region(&self, frame_name: &str) -> Option<&AtlasRegion> {
        self.regions.get(frame_name)
    }

    pub fn sound_effect(&self, name: &str) -> Result<&SoundRef> {
        self.sound_effects
            .get(name)
            .ok_or_else(|| CrawlerError::not_found(AssetKind::SoundEffect, name))
    }

    pub fn music(&self, name: &str) -> Result<&SoundRef> {
        self.music.get(name).ok_or_else(|| CrawlerError::not_found(AssetKind::Music, name))
    }

    /// Returns an independent copy of the named template.
    pub fn entity_template(&self, name: &str) -> Result<EntityPrototype> {
        self.entities.get(name).cloned().ok_or_else(|| CrawlerError::not_found(AssetKind::Entity, name))
    }

    pub fn hostile_template_names(&self) -> Vec<String> {
        // BTreeMap iteration is already sorted by name.
        self.entities.values().filter(|p| p.is_hostile()).map(|p| p.name.clone()).collect()
    }
}

fn sorted_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().and_then(|stem| stem.to_str()).map(str::to_string)
}
