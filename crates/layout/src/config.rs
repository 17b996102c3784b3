use bevy::prelude::*;

/// Edge length of one grid tile in pixels.
pub const TILE_SIZE: f32 = 32.0;

/// Largest footprint edge, in cells. Catalog values above it are clamped.
pub const MAX_FOOTPRINT: u32 = 64;

/// Objects in this category go through the wallpaper/flooring path, never
/// through regular placement.
pub const WALLPAPER_CATEGORY: &str = "wallpaper";

/// Catalog files under `<data>/objects/`, merged in this order. A key defined
/// in a later file overrides the same key in an earlier one.
pub const OBJECT_CATEGORY_FILES: [&str; 5] = ["buildings", "crops", "decor", "machines", "wallpaper"];

pub const LOCATIONS_MANIFEST: &str = "locations-manifest.json";
pub const LOCATIONS_DIR: &str = "locations";
pub const OBJECTS_DIR: &str = "objects";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_SAVE_PATH: &str = "saves/layout.tgl";

pub const ENV_DATA_DIR: &str = "TILEGRID_DATA_DIR";
pub const ENV_SAVE_PATH: &str = "TILEGRID_SAVE_PATH";
pub const ENV_START_LOCATION: &str = "TILEGRID_START_LOCATION";

/// Runtime configuration for an editing surface.
///
/// Defaults come from the constants above; `from_env` lets a launcher point
/// the editor at another data set or save file without a rebuild.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub tile_size: f32,
    pub data_dir: String,
    pub save_path: String,
    /// Location opened once loading finishes. `None` opens the first entry
    /// of the manifest.
    pub start_location: Option<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            data_dir: DEFAULT_DATA_DIR.to_string(),
            save_path: DEFAULT_SAVE_PATH.to_string(),
            start_location: None,
        }
    }
}

impl EditorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup. Empty values are
    /// ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            tile_size: defaults.tile_size,
            data_dir: get(ENV_DATA_DIR).unwrap_or(defaults.data_dir),
            save_path: get(ENV_SAVE_PATH).unwrap_or(defaults.save_path),
            start_location: get(ENV_START_LOCATION),
        }
    }

    pub fn objects_dir(&self) -> std::path::PathBuf {
        std::path::Path::new(&self.data_dir).join(OBJECTS_DIR)
    }
}
