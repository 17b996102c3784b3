//! Plain JSON export of one location's layout, for hand editing and for
//! sharing layouts between save files.

use std::path::{Path, PathBuf};

use layout::SavedLayout;

use crate::save_error::SaveError;

pub fn export_json(layout: &SavedLayout) -> Result<String, SaveError> {
    Ok(serde_json::to_string_pretty(layout)?)
}

pub fn import_json(json: &str) -> Result<SavedLayout, SaveError> {
    let layout: SavedLayout = serde_json::from_str(json)?;
    if layout.location_key.trim().is_empty() {
        return Err(SaveError::NoData);
    }
    Ok(layout)
}

/// `<save dir>/<location key>.json`.
pub fn export_path(save_path: &Path, location_key: &str) -> PathBuf {
    save_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(format!("{location_key}.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout::{Layer, LayoutRecord};

    fn cellar() -> SavedLayout {
        SavedLayout {
            location_key: "cellar".into(),
            placements: vec![
                LayoutRecord {
                    id: 4,
                    object_key: "keg".into(),
                    grid_x: 2,
                    grid_y: 3,
                    layer: Layer::default(),
                },
                LayoutRecord {
                    id: 9,
                    object_key: "rug".into(),
                    grid_x: 0,
                    grid_y: 0,
                    layer: Layer::new("floor"),
                },
            ],
        }
    }

    #[test]
    fn test_export_uses_camel_case_fields() {
        let json = export_json(&cellar()).unwrap();
        assert!(json.contains("\"locationKey\": \"cellar\""), "got: {json}");
        assert!(json.contains("\"objectKey\": \"keg\""), "got: {json}");
        assert!(json.contains("\"gridX\": 2"), "got: {json}");
        assert!(json.contains("\"gridY\": 3"), "got: {json}");
    }

    #[test]
    fn test_export_then_import_keeps_the_layout() {
        let layout = cellar();
        let back = import_json(&export_json(&layout).unwrap()).unwrap();
        assert_eq!(back, layout);
        assert_eq!(back.logical_set(), layout.logical_set());
    }

    #[test]
    fn test_import_hand_written_layout() {
        let json = r#"{
            "locationKey": "farm",
            "placements": [
                { "id": 1, "objectKey": "parsnip", "gridX": 5, "gridY": 6, "layer": "objects" }
            ]
        }"#;
        let layout = import_json(json).unwrap();
        assert_eq!(layout.location_key, "farm");
        assert_eq!(layout.placements[0].grid_x, 5);
    }

    #[test]
    fn test_import_rejects_bad_json_and_blank_keys() {
        assert!(matches!(import_json("{ nope"), Err(SaveError::Json(_))));
        let blank = r#"{ "locationKey": " ", "placements": [] }"#;
        assert!(matches!(import_json(blank), Err(SaveError::NoData)));
    }

    #[test]
    fn test_export_path_sits_next_to_the_save_file() {
        assert_eq!(
            export_path(Path::new("saves/layout.tgl"), "farm"),
            PathBuf::from("saves/farm.json")
        );
        assert_eq!(export_path(Path::new("layout.tgl"), "farm"), PathBuf::from("farm.json"));
    }
}
