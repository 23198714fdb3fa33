//! Layer image loading.
//!
//! The compositor only asks for pixels by layer name. Where they come from is
//! up to the [`ImageLoader`] it is handed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::Result;

/// Source of layer pixels, addressed by entry name.
pub trait ImageLoader {
    /// Load the pixels for a layer, or `None` when they are unavailable.
    ///
    /// Sources without alpha must come back with opaque alpha.
    fn load(&self, name: &str) -> Option<RgbaImage>;
}

impl<F> ImageLoader for F
where
    F: Fn(&str) -> Option<RgbaImage>,
{
    fn load(&self, name: &str) -> Option<RgbaImage> {
        self(name)
    }
}

/// Loads `{dir}/{name}.png` from disk.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    dir: PathBuf,
}

impl DirectoryLoader {
    /// Create a loader over a directory.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// The directory layers are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the companion image for a layer.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.png", name))
    }

    /// Load a layer, telling an absent file apart from a broken one.
    ///
    /// Returns `Ok(None)` when the file does not exist and an error when it
    /// exists but cannot be decoded.
    pub fn try_load(&self, name: &str) -> Result<Option<RgbaImage>> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Ok(None);
        }
        let image = image::open(&path)?;
        Ok(Some(image.to_rgba8()))
    }
}

impl ImageLoader for DirectoryLoader {
    fn load(&self, name: &str) -> Option<RgbaImage> {
        match self.try_load(name) {
            Ok(Some(image)) => Some(image),
            Ok(None) => {
                tracing::debug!(path = %self.path_for(name).display(), "layer image not found");
                None
            }
            Err(e) => {
                tracing::warn!(path = %self.path_for(name).display(), error = %e, "failed to decode layer image");
                None
            }
        }
    }
}

/// In-memory layer store.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    images: HashMap<String, RgbaImage>,
}

impl MemoryLoader {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a layer's pixels.
    pub fn insert(&mut self, name: impl Into<String>, image: RgbaImage) {
        self.images.insert(name.into(), image);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, image: RgbaImage) -> Self {
        self.insert(name, image);
        self
    }

    /// Number of stored layers.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageLoader for MemoryLoader {
    fn load(&self, name: &str) -> Option<RgbaImage> {
        self.images.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba};

    #[test]
    fn test_directory_loader_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DirectoryLoader::new(dir.path());

        assert!(loader.try_load("NOPE").unwrap().is_none());
        assert!(loader.load("NOPE").is_none());
    }

    #[test]
    fn test_directory_loader_rgb_gets_opaque_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let rgb = RgbImage::from_pixel(3, 2, Rgb([10, 20, 30]));
        rgb.save(dir.path().join("FACE.png")).unwrap();

        let loader = DirectoryLoader::new(dir.path());
        let image = loader.load("FACE").unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(*image.get_pixel(2, 1), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_directory_loader_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("BAD.png"), b"not a png").unwrap();
        let loader = DirectoryLoader::new(dir.path());

        assert!(loader.try_load("BAD").is_err());
        assert!(loader.load("BAD").is_none());
    }

    #[test]
    fn test_memory_and_closure_loaders() {
        let red = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 255]));
        let memory = MemoryLoader::new().with("RED", red.clone());
        assert_eq!(memory.len(), 1);
        assert_eq!(memory.load("RED"), Some(red.clone()));
        assert!(memory.load("BLUE").is_none());

        let closure = |name: &str| (name == "RED").then(|| red.clone());
        assert!(closure.load("RED").is_some());
        assert!(closure.load("BLUE").is_none());
    }
}
