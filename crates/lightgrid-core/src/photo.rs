//! Photo manifest and the ordered collection built from it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Number of leading thumbnails requested eagerly; the rest load lazily.
pub const EAGER_LOAD_COUNT: usize = 24;
/// Reveal animation stagger per grid position.
pub const REVEAL_STAGGER_MS: u32 = 3;
/// Upper bound for the staggered reveal delay.
pub const MAX_REVEAL_DELAY_MS: u32 = 500;

/// Manifest loading errors.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Invalid manifest JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Duplicate photo id: {0}")]
    DuplicateId(String),
    #[error("Photo at position {0} has an empty id")]
    EmptyId(usize),
}

/// Result type for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;

/// A single photo record from the manifest.
///
/// Paths are relative to the site root and are handed to the presentation
/// layer untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    #[serde(rename = "thumb")]
    pub thumb_path: String,
    #[serde(rename = "full")]
    pub full_path: String,
}

impl Photo {
    pub fn new(
        id: impl Into<String>,
        thumb_path: impl Into<String>,
        full_path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            thumb_path: thumb_path.into(),
            full_path: full_path.into(),
        }
    }
}

/// Presentation descriptor for one grid slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridItem<'a> {
    pub index: usize,
    pub photo: &'a Photo,
    /// Delay before the reveal animation starts.
    pub reveal_delay_ms: u32,
    /// Whether the thumbnail should bypass lazy loading.
    pub eager: bool,
}

impl GridItem<'_> {
    /// Alternative text for the thumbnail (1-based).
    pub fn alt_text(&self) -> String {
        format!("Photo {}", self.index + 1)
    }
}

/// Ordered, immutable set of photos in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoCollection {
    photos: Vec<Photo>,
}

impl PhotoCollection {
    /// Build a collection, rejecting empty or duplicate ids.
    pub fn new(photos: Vec<Photo>) -> ManifestResult<Self> {
        let mut seen = HashSet::with_capacity(photos.len());
        for (i, photo) in photos.iter().enumerate() {
            if photo.id.is_empty() {
                return Err(ManifestError::EmptyId(i));
            }
            if !seen.insert(photo.id.as_str()) {
                return Err(ManifestError::DuplicateId(photo.id.clone()));
            }
        }
        Ok(Self { photos })
    }

    /// Parse a manifest JSON array.
    pub fn from_json(json: &str) -> ManifestResult<Self> {
        let photos: Vec<Photo> = serde_json::from_str(json)?;
        let collection = Self::new(photos)?;
        log::info!("Loaded manifest with {} photos", collection.len());
        Ok(collection)
    }

    /// Read and parse a manifest file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: &std::path::Path) -> ManifestResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Photo> {
        self.photos.get(index)
    }

    /// Find the grid position of a photo by id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.photos.iter().position(|p| p.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Photo> {
        self.photos.iter()
    }

    /// Grid slot descriptors in display order.
    pub fn grid_items(&self) -> impl Iterator<Item = GridItem<'_>> {
        self.photos.iter().enumerate().map(|(index, photo)| GridItem {
            index,
            photo,
            reveal_delay_ms: (index as u32)
                .saturating_mul(REVEAL_STAGGER_MS)
                .min(MAX_REVEAL_DELAY_MS),
            eager: index < EAGER_LOAD_COUNT,
        })
    }
}

impl<'a> IntoIterator for &'a PhotoCollection {
    type Item = &'a Photo;
    type IntoIter = std::slice::Iter<'a, Photo>;

    fn into_iter(self) -> Self::IntoIter {
        self.photos.iter()
    }
}
