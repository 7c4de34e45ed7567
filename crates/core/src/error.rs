use std::fmt;
use std::io;
use std::result;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    Texture,
    Animation,
    Entity,
    SoundEffect,
    Music,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Texture => "texture",
            Self::Animation => "animation",
            Self::Entity => "entity",
            Self::SoundEffect => "sound effect",
            Self::Music => "music track",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("no such {kind}: {name}")]
    NotFound { kind: AssetKind, name: String },
    #[error("malformed {source_name} entry: {detail}")]
    MalformedData { source_name: String, detail: String },
    #[error("unable to determine entry/exit rooms: {candidates} candidate room(s) without a top connection")]
    GenerationFailure { candidates: usize },
    #[error("invalid config: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl CrawlerError {
    pub fn not_found(kind: AssetKind, name: &str) -> Self {
        Self::NotFound { kind, name: name.to_string() }
    }

    pub fn malformed(source_name: &str, detail: impl Into<String>) -> Self {
        Self::MalformedData { source_name: source_name.to_string(), detail: detail.into() }
    }
}

pub type Result<T, E = CrawlerError> = result::Result<T, E>;
