//! Object catalog: every placeable object definition, keyed by object key.
//!
//! The catalog is assembled once from the per-category JSON files and then
//! only read. Lookups go through [`DefinitionLookup`] so the validator can be
//! driven by the real catalog or by a test fixture alike.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::{MAX_FOOTPRINT, OBJECT_CATEGORY_FILES};
use crate::placement::Layer;

/// Immutable description of a placeable object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDefinition {
    /// Filled from the map key when loaded from a category file.
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "one", deserialize_with = "footprint_dimension")]
    pub footprint_width: u32,
    #[serde(default = "one", deserialize_with = "footprint_dimension")]
    pub footprint_height: u32,
    #[serde(default = "yes")]
    pub placeable_indoors: bool,
    #[serde(default)]
    pub default_layer: Layer,
    /// Seasonal sprite lists collapse to their first entry.
    #[serde(default, deserialize_with = "first_sprite")]
    pub sprite: Option<String>,
}

impl ObjectDefinition {
    /// Footprint in cells, each edge within `1..=MAX_FOOTPRINT`.
    pub fn footprint(&self) -> (u32, u32) {
        (
            self.footprint_width.clamp(1, MAX_FOOTPRINT),
            self.footprint_height.clamp(1, MAX_FOOTPRINT),
        )
    }
}

fn one() -> u32 {
    1
}

fn yes() -> bool {
    true
}

/// Missing, null and zero all mean a single cell. Oversized edges are
/// clamped to `MAX_FOOTPRINT`.
fn footprint_dimension<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Option::<u32>::deserialize(deserializer)?;
    Ok(value.filter(|v| *v > 0).map_or(1, |v| v.min(MAX_FOOTPRINT)))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SpriteField {
    One(String),
    Many(Vec<String>),
}

fn first_sprite<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<SpriteField>::deserialize(deserializer)? {
        Some(SpriteField::One(path)) => Some(path),
        Some(SpriteField::Many(paths)) => paths.into_iter().next(),
        None => None,
    })
}

/// Resolves an object key to its definition.
pub trait DefinitionLookup {
    fn definition(&self, object_key: &str) -> Option<&ObjectDefinition>;
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures that make the catalog unusable. Individual broken category files
/// are not errors; they are logged and skipped.
#[derive(Debug)]
pub enum CatalogError {
    /// The objects directory itself could not be read.
    Unreachable { path: PathBuf, source: std::io::Error },
    /// A category document was not valid catalog JSON.
    Parse {
        category: String,
        source: serde_json::Error,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Unreachable { path, source } => {
                write!(f, "Object catalog unreachable at {}: {source}", path.display())
            }
            CatalogError::Parse { category, source } => {
                write!(f, "Invalid object catalog '{category}': {source}")
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Unreachable { source, .. } => Some(source),
            CatalogError::Parse { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectCatalog {
    objects: BTreeMap<String, ObjectDefinition>,
}

impl ObjectCatalog {
    pub fn from_definitions(definitions: impl IntoIterator<Item = ObjectDefinition>) -> Self {
        Self {
            objects: definitions
                .into_iter()
                .map(|def| (def.key.clone(), def))
                .collect(),
        }
    }

    /// Merge category documents in order; later documents override keys of
    /// earlier ones.
    pub fn from_category_json<'a>(
        documents: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for (category, json) in documents {
            catalog.merge_json(category, json)?;
        }
        Ok(catalog)
    }

    fn merge_json(&mut self, category: &str, json: &str) -> Result<usize, CatalogError> {
        let parsed: BTreeMap<String, ObjectDefinition> =
            serde_json::from_str(json).map_err(|source| CatalogError::Parse {
                category: category.to_string(),
                source,
            })?;
        let count = parsed.len();
        for (key, mut def) in parsed {
            def.key.clone_from(&key);
            self.objects.insert(key, def);
        }
        Ok(count)
    }

    /// Load `<dir>/<category>.json` for every known category.
    ///
    /// A category file that is missing or malformed contributes nothing and
    /// is logged; only an unreadable directory is fatal.
    pub fn load_from_dir(dir: &Path) -> Result<Self, CatalogError> {
        std::fs::read_dir(dir).map_err(|source| CatalogError::Unreachable {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut catalog = Self::default();
        for category in OBJECT_CATEGORY_FILES {
            let path = dir.join(format!("{category}.json"));
            let json = match std::fs::read_to_string(&path) {
                Ok(json) => json,
                Err(e) => {
                    warn!("Object category {} skipped: {}", path.display(), e);
                    continue;
                }
            };
            match catalog.merge_json(category, &json) {
                Ok(count) => debug!("Loaded {} objects from {}", count, path.display()),
                Err(e) => warn!("Object category {} skipped: {}", path.display(), e),
            }
        }
        info!("Objects data loaded: {} objects", catalog.len());
        Ok(catalog)
    }

    pub fn get(&self, object_key: &str) -> Option<&ObjectDefinition> {
        self.objects.get(object_key)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectDefinition> {
        self.objects.values()
    }

    /// Palette listing: every definition of `category`, ordered by key.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a ObjectDefinition> + 'a {
        self.objects.values().filter(move |def| def.category == category)
    }

    /// Palette search: definitions of `category` whose name contains `term`,
    /// case-insensitively. An empty term lists the whole category.
    pub fn search<'a>(&'a self, category: &'a str, term: &str) -> Vec<&'a ObjectDefinition> {
        let needle = term.trim().to_lowercase();
        self.in_category(category)
            .filter(|def| needle.is_empty() || def.name.to_lowercase().contains(&needle))
            .collect()
    }
}

impl DefinitionLookup for ObjectCatalog {
    fn definition(&self, object_key: &str) -> Option<&ObjectDefinition> {
        self.get(object_key)
    }
}
