//! Uploaded image storage

use image::{DynamicImage, ImageError, ImageFormat};
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

/// Longer side of a stored upload, in pixels
const MAX_STORED_SIDE: u32 = 1024;

/// Decode an upload, rejecting anything the image crate cannot read
pub fn decode_upload(bytes: &[u8]) -> Result<DynamicImage, ImageError> {
    image::load_from_memory(bytes)
}

/// Directory of uploads, one PNG per record
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Save as `<id>.png` and return the reference stored on the record
    pub fn save(&self, id: Uuid, image: &DynamicImage) -> Result<String, ImageError> {
        fs::create_dir_all(&self.dir)?;

        let reference = format!("{}.png", id);
        let scaled;
        let image = if image.width() > MAX_STORED_SIDE || image.height() > MAX_STORED_SIDE {
            scaled = image.thumbnail(MAX_STORED_SIDE, MAX_STORED_SIDE);
            &scaled
        } else {
            image
        };

        DynamicImage::ImageRgb8(image.to_rgb8())
            .save_with_format(self.dir.join(&reference), ImageFormat::Png)?;
        Ok(reference)
    }

    /// PNG bytes for a reference; `None` if it is missing or not a plain file name
    pub fn load(&self, reference: &str) -> Option<Vec<u8>> {
        if !is_plain_name(reference) {
            tracing::warn!("Refusing image reference '{}'", reference);
            return None;
        }

        match fs::read(self.dir.join(reference)) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::debug!("Image {} unavailable: {}", reference, e);
                None
            }
        }
    }

    /// Delete a stored upload that no record will point at
    pub fn remove(&self, reference: &str) {
        if !is_plain_name(reference) {
            tracing::warn!("Refusing image reference '{}'", reference);
            return;
        }

        match fs::remove_file(self.dir.join(reference)) {
            Ok(()) => tracing::debug!("Removed image {}", reference),
            Err(e) => tracing::warn!("Could not remove image {}: {}", reference, e),
        }
    }
}

fn is_plain_name(reference: &str) -> bool {
    !reference.is_empty()
        && !reference.contains(&['/', '\\'][..])
        && reference != "."
        && reference != ".."
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn sample(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([20, 160, 60])))
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().join("uploads"));
        let id = Uuid::new_v4();

        let reference = store.save(id, &sample(16, 8)).unwrap();
        assert_eq!(reference, format!("{}.png", id));

        let bytes = store.load(&reference).unwrap();
        let decoded = decode_upload(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[test]
    fn test_large_uploads_are_downscaled() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let reference = store.save(Uuid::new_v4(), &sample(2048, 512)).unwrap();
        let decoded = decode_upload(&store.load(&reference).unwrap()).unwrap();
        assert_eq!(decoded.width(), MAX_STORED_SIDE);
    }

    #[test]
    fn test_load_rejects_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        assert!(store.load("../secret.png").is_none());
        assert!(store.load("..").is_none());
        assert!(store.load("missing.png").is_none());
    }

    #[test]
    fn test_remove_deletes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        let reference = store.save(Uuid::new_v4(), &sample(4, 4)).unwrap();

        store.remove(&reference);
        assert!(store.load(&reference).is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

        // missing files and path-like references are ignored
        store.remove(&reference);
        store.remove("../elsewhere.png");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_upload(b"definitely not an image").is_err());
    }
}
