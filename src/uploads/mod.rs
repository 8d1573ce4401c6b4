use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use thiserror::Error;
use uuid::Uuid;

/// Marker that distinguishes an inline payload from an external URL.
const DATA_URL_PREFIX: &str = "data:image";

/// Route prefix under which stored images are served.
pub const PUBLIC_ROUTE: &str = "/uploads";

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("invalid base64 image payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("image file i/o failed: {0}")]
    Io(#[from] io::Error),
}

/// Materializes inline base64 image payloads as files under
/// `<public>/uploads` and removes them when their owning event lets go of
/// them. External URLs pass through untouched.
#[derive(Debug, Clone)]
pub struct ImageStore {
    public_dir: PathBuf,
}

impl ImageStore {
    pub fn new(public_dir: impl Into<PathBuf>) -> Self {
        Self {
            public_dir: public_dir.into(),
        }
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.public_dir.join("uploads")
    }

    pub fn is_inline(value: &str) -> bool {
        value.starts_with(DATA_URL_PREFIX)
    }

    /// Turns a request's image field into the value stored on the row:
    /// inline payloads are written to disk and replaced by their public
    /// path, anything else is passed through as-is.
    pub fn resolve(&self, image: Option<&str>) -> Result<Option<String>, ImageError> {
        match image {
            None => Ok(None),
            Some(value) if Self::is_inline(value) => self.materialize(value).map(Some),
            Some(value) => Ok(Some(value.to_string())),
        }
    }

    /// Decodes an inline payload and writes it under the uploads
    /// directory, returning the public path to the new file.
    pub fn materialize(&self, data_url: &str) -> Result<String, ImageError> {
        let encoded = match data_url.split_once(";base64,") {
            Some((_, body)) => body,
            None => data_url,
        };
        let bytes = BASE64.decode(encoded.trim())?;

        let dir = self.uploads_dir();
        fs::create_dir_all(&dir)?;

        let name = format!("{}.{}", Uuid::new_v4(), extension(data_url));
        fs::write(dir.join(&name), &bytes)?;

        tracing::debug!(file = %name, size = bytes.len(), "stored uploaded image");
        Ok(format!("{PUBLIC_ROUTE}/{name}"))
    }

    /// Removes a previously stored file. Paths outside `/uploads/` and
    /// already-missing files are ignored.
    pub fn remove(&self, stored_path: &str) -> Result<(), ImageError> {
        let Some(name) = stored_path
            .strip_prefix(PUBLIC_ROUTE)
            .and_then(|rest| rest.strip_prefix('/'))
        else {
            return Ok(());
        };
        if Path::new(name)
            .components()
            .any(|part| !matches!(part, Component::Normal(_)))
        {
            return Ok(());
        }

        match fs::remove_file(self.uploads_dir().join(name)) {
            Ok(()) => {
                tracing::debug!(file = %name, "removed stored image");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// File extension derived from the declared image subtype, e.g.
/// `data:image/png;...` -> `png`. Best effort: an unrecognizable subtype
/// falls back to a generic extension.
fn extension(data_url: &str) -> String {
    data_url
        .strip_prefix("data:image/")
        .map(|rest| {
            rest.chars()
                .take_while(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
        })
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| "img".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PIXEL: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x01];

    fn data_url(subtype: &str) -> String {
        if subtype.is_empty() {
            format!("data:image;base64,{}", BASE64.encode(PIXEL))
        } else {
            format!("data:image/{subtype};base64,{}", BASE64.encode(PIXEL))
        }
    }

    #[test]
    fn materializes_inline_payload() {
        let tmp = TempDir::new().unwrap();
        let store = ImageStore::new(tmp.path());

        let stored = store.resolve(Some(&data_url("png"))).unwrap().unwrap();
        assert!(stored.starts_with("/uploads/"));
        assert!(stored.ends_with(".png"));

        let on_disk = tmp.path().join(stored.trim_start_matches('/'));
        assert_eq!(fs::read(on_disk).unwrap(), PIXEL);
    }

    #[test]
    fn passes_external_url_through() {
        let tmp = TempDir::new().unwrap();
        let store = ImageStore::new(tmp.path());

        let url = "https://example.com/banner.png";
        assert_eq!(store.resolve(Some(url)).unwrap().as_deref(), Some(url));
        assert!(!store.uploads_dir().exists());
    }

    #[test]
    fn resolves_absent_image_to_none() {
        let store = ImageStore::new("public");
        assert!(store.resolve(None).unwrap().is_none());
    }

    #[test]
    fn missing_subtype_gets_fallback_extension() {
        let tmp = TempDir::new().unwrap();
        let store = ImageStore::new(tmp.path());

        let stored = store.materialize(&data_url("")).unwrap();
        assert!(stored.ends_with(".img"), "got {stored}");
    }

    #[test]
    fn compound_subtype_keeps_alphanumeric_prefix() {
        let tmp = TempDir::new().unwrap();
        let store = ImageStore::new(tmp.path());

        let stored = store.materialize(&data_url("svg+xml")).unwrap();
        assert!(stored.ends_with(".svg"), "got {stored}");
    }

    #[test]
    fn rejects_malformed_base64() {
        let tmp = TempDir::new().unwrap();
        let store = ImageStore::new(tmp.path());

        let err = store.materialize("data:image/png;base64,@@@").unwrap_err();
        assert!(matches!(err, ImageError::Decode(_)));
    }

    #[test]
    fn remove_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let store = ImageStore::new(tmp.path());

        let stored = store.materialize(&data_url("png")).unwrap();
        store.remove(&stored).unwrap();
        assert!(!tmp.path().join(stored.trim_start_matches('/')).exists());

        // second removal of the same path is a no-op
        store.remove(&stored).unwrap();
    }

    #[test]
    fn remove_ignores_paths_outside_uploads() {
        let tmp = TempDir::new().unwrap();
        let store = ImageStore::new(tmp.path());

        store.remove("https://example.com/banner.png").unwrap();
        store.remove("/uploads/../Cargo.toml").unwrap();
    }

    #[test]
    fn replacement_swaps_files() {
        let tmp = TempDir::new().unwrap();
        let store = ImageStore::new(tmp.path());

        let old = store.materialize(&data_url("png")).unwrap();
        store.remove(&old).unwrap();
        let new = store.materialize(&data_url("jpeg")).unwrap();

        assert!(!tmp.path().join(old.trim_start_matches('/')).exists());
        assert!(tmp.path().join(new.trim_start_matches('/')).exists());
    }
}
