// ---------------------------------------------------------------------------
// save_codec – SaveFile <-> `.tgl` bytes, and the file-level read/write
// ---------------------------------------------------------------------------

use std::path::Path;

use crate::atomic_write::atomic_write;
use crate::file_header::{unwrap_header, wrap_with_header, FLAG_COMPRESSED};
use crate::save_error::SaveError;
use crate::save_types::{SaveFile, CURRENT_SAVE_VERSION};

/// Encode `save` into a complete file image, lz4-compressing the payload
/// when `compress` is set.
pub fn encode_save(save: &SaveFile, compress: bool) -> Result<Vec<u8>, SaveError> {
    let raw = save.encode();
    let size = u32::try_from(raw.len())
        .map_err(|_| SaveError::Encode(format!("payload of {} bytes is too large", raw.len())))?;

    if compress {
        let packed = lz4_flex::compress(&raw);
        Ok(wrap_with_header(&packed, FLAG_COMPRESSED, size))
    } else {
        Ok(wrap_with_header(&raw, 0, size))
    }
}

/// Decode a file image. The checksum is verified before decompressing and
/// the decompressed size is checked against the header.
pub fn decode_save(bytes: &[u8]) -> Result<SaveFile, SaveError> {
    let (header, payload) = unwrap_header(bytes)?;
    let expected = header.uncompressed_size as usize;

    let raw = if header.is_compressed() {
        lz4_flex::decompress(payload, expected)?
    } else {
        payload.to_vec()
    };
    if raw.len() != expected {
        return Err(SaveError::Decode(format!(
            "payload is {} bytes, header says {expected}",
            raw.len()
        )));
    }

    let save = SaveFile::decode(&raw)?;
    if save.version > CURRENT_SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected_max: CURRENT_SAVE_VERSION,
            found: save.version,
        });
    }
    Ok(save)
}

pub fn write_save_file(path: &Path, save: &SaveFile, compress: bool) -> Result<(), SaveError> {
    let bytes = encode_save(save, compress)?;
    atomic_write(path, &bytes)?;
    Ok(())
}

pub fn read_save_file(path: &Path) -> Result<SaveFile, SaveError> {
    let bytes = std::fs::read(path)?;
    decode_save(&bytes)
}
