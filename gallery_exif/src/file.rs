use std::{fs::File, io::Read as _, path::Path};

use chrono::{DateTime, Utc};

use crate::{extract_exif, metadata::ExtractedMetadata};

/// Reads a file from disk and extracts its Exif.
///
/// The file's modification time is the fallback timestamp. If the platform
/// can't report one, the current time is used instead.
///
/// # Errors
///
/// Only I/O errors are returned. Files without (readable) Exif still give a
/// record; see [`extract_exif`].
pub fn extract_exif_from_path(path: impl AsRef<Path>) -> std::io::Result<ExtractedMetadata> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let fallback: DateTime<Utc> = match file.metadata().and_then(|m| m.modified()) {
        Ok(modified) => DateTime::<Utc>::from(modified),
        Err(e) => {
            log::warn!(
                "Couldn't get the modification time of `{}`. Using the current time. err: {e}",
                path.display()
            );
            Utc::now()
        }
    };

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    log::trace!("Read `{}` bytes from `{}`.", bytes.len(), path.display());

    Ok(extract_exif(&bytes, fallback))
}
