use std::path::{Path, PathBuf};

use hotrod_core::{FileError, ManifestRecord};
use hotrod_logging::{hotrod_debug, hotrod_warn};

use crate::decode::{decode_utf8, strip_bom};

pub const MANIFEST_FILENAME: &str = "package.json";

/// One-shot reader for the package manifest at a fixed path.
#[derive(Debug, Clone)]
pub struct ManifestReader {
    path: PathBuf,
}

impl ManifestReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reader for `package.json` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(MANIFEST_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read(&self) -> ManifestRecord {
        let record = self.read_inner().await;
        match &record {
            Ok(_) => hotrod_debug!("Manifest loaded from {:?}", self.path),
            Err(err) => hotrod_warn!("Manifest unavailable: {}", err),
        }
        record
    }

    async fn read_inner(&self) -> ManifestRecord {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|err| FileError::read(&self.path, err))?;
        let text = decode_utf8(&bytes).map_err(|err| FileError::decode(&self.path, err))?;
        parse_manifest(&self.path, &text)
    }
}

/// Parse manifest text after dropping a leading byte-order mark.
pub fn parse_manifest(path: &Path, text: &str) -> ManifestRecord {
    serde_json::from_str(strip_bom(text)).map_err(|err| FileError::parse(path, err))
}
