//! Layout persistence: the `.tgl` save file (header, checksum, optional lz4
//! compression), per-location JSON export/import and the `SavePlugin` that
//! wires both to the editing core.

mod atomic_write;
mod file_header;
mod json_export;
mod save_codec;
mod save_error;
mod save_plugin;
mod save_types;

pub use file_header::{FileHeader, HEADER_SIZE, MAGIC};
pub use json_export::{export_json, export_path, import_json};
pub use save_codec::{decode_save, encode_save, read_save_file, write_save_file};
pub use save_error::SaveError;
pub use save_plugin::{
    CompressSaves, ExportLayoutEvent, ImportLayoutEvent, LoadLayoutEvent, SaveLayoutEvent, SavePlugin,
};
pub use save_types::{SaveFile, CURRENT_SAVE_VERSION};
