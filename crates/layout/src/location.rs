//! Location model: grid bounds, static blocked terrain and the ordered list
//! of placements, plus the registry that loads locations from disk.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{LOCATIONS_DIR, LOCATIONS_MANIFEST};
use crate::grid::Rect;
use crate::placement::{Placement, PlacementId};

/// Static description of a location as stored in `locations/<key>.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationBounds {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    pub grid_width: u32,
    pub grid_height: u32,
    #[serde(default)]
    pub indoors: bool,
    #[serde(default)]
    pub blocked_areas: Vec<Rect>,
}

/// A location being edited.
///
/// `placements` is only ever mutated by [`crate::store::PlacementStore`];
/// everything else reads it through [`Location::placements`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub key: String,
    pub name: String,
    pub grid_width: u32,
    pub grid_height: u32,
    pub indoors: bool,
    pub blocked_areas: Vec<Rect>,
    pub(crate) placements: Vec<Placement>,
}

impl Location {
    pub fn from_bounds(bounds: LocationBounds) -> Self {
        Self {
            key: bounds.key,
            name: bounds.name,
            grid_width: bounds.grid_width,
            grid_height: bounds.grid_height,
            indoors: bounds.indoors,
            blocked_areas: bounds.blocked_areas,
            placements: Vec::new(),
        }
    }

    pub fn bounds(&self) -> LocationBounds {
        LocationBounds {
            key: self.key.clone(),
            name: self.name.clone(),
            grid_width: self.grid_width,
            grid_height: self.grid_height,
            indoors: self.indoors,
            blocked_areas: self.blocked_areas.clone(),
        }
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn placement(&self, id: PlacementId) -> Option<&Placement> {
        self.placements.iter().find(|p| p.id == id)
    }

    /// The whole map as a rectangle of cells.
    pub fn grid_rect(&self) -> Rect {
        Rect::new(0, 0, self.grid_width, self.grid_height)
    }

    pub fn pixel_size(&self, tile_size: f32) -> Vec2 {
        Vec2::new(self.grid_width as f32, self.grid_height as f32) * tile_size
    }
}

/// Listing entry for a location picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSummary {
    pub key: String,
    pub name: String,
    pub grid_width: u32,
    pub grid_height: u32,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Location data could not be loaded. Always fatal: without bounds nothing
/// can be validated.
#[derive(Debug)]
pub enum LocationError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    UnknownLocation(String),
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationError::Io { path, source } => {
                write!(f, "Failed to load location {}: {source}", path.display())
            }
            LocationError::Parse { path, source } => {
                write!(f, "Invalid location file {}: {source}", path.display())
            }
            LocationError::UnknownLocation(key) => write!(f, "Unknown location: {key}"),
        }
    }
}

impl std::error::Error for LocationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LocationError::Io { source, .. } => Some(source),
            LocationError::Parse { source, .. } => Some(source),
            LocationError::UnknownLocation(_) => None,
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, LocationError> {
    let text = std::fs::read_to_string(path).map_err(|source| LocationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LocationError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Every location listed in the manifest, keyed by location key. Loaded once.
#[derive(Debug, Clone, Default)]
pub struct LocationRegistry {
    order: Vec<String>,
    locations: BTreeMap<String, LocationBounds>,
}

impl LocationRegistry {
    /// Build from already-loaded bounds, keeping iteration order.
    pub fn from_bounds(entries: impl IntoIterator<Item = LocationBounds>) -> Self {
        let mut registry = Self::default();
        for bounds in entries {
            registry.insert(bounds);
        }
        registry
    }

    fn insert(&mut self, bounds: LocationBounds) {
        if !self.locations.contains_key(&bounds.key) {
            self.order.push(bounds.key.clone());
        }
        self.locations.insert(bounds.key.clone(), bounds);
    }

    /// Read `<dir>/locations-manifest.json` (a JSON array of keys) and then
    /// `<dir>/locations/<key>.json` for each key.
    pub fn load_from_dir(dir: &Path) -> Result<Self, LocationError> {
        let keys: Vec<String> = read_json(&dir.join(LOCATIONS_MANIFEST))?;
        let mut registry = Self::default();
        for key in keys {
            let path = dir.join(LOCATIONS_DIR).join(format!("{key}.json"));
            let mut bounds: LocationBounds = read_json(&path)?;
            bounds.key = key;
            registry.insert(bounds);
        }
        info!("Locations data loaded: {:?}", registry.order);
        Ok(registry)
    }

    pub fn get(&self, key: &str) -> Result<&LocationBounds, LocationError> {
        self.locations
            .get(key)
            .ok_or_else(|| LocationError::UnknownLocation(key.to_string()))
    }

    pub fn first_key(&self) -> Option<&str> {
        self.order.first().map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn available(&self) -> Vec<LocationSummary> {
        self.order
            .iter()
            .filter_map(|key| self.locations.get(key))
            .map(|b| LocationSummary {
                key: b.key.clone(),
                name: b.name.clone(),
                grid_width: b.grid_width,
                grid_height: b.grid_height,
            })
            .collect()
    }
}
