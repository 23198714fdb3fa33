//! Saving composites.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::Result;

/// Default stem for extracted composites.
pub const DEFAULT_STEM: &str = "synthesized_image";

/// Write a canvas as a PNG with full alpha, creating parent directories.
pub fn save_png<P: AsRef<Path>>(canvas: &RgbaImage, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    canvas.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// First `{dir}/{stem}_{n}.png` that does not exist yet, counting from 0.
pub fn unique_output_path<P: AsRef<Path>>(dir: P, stem: &str) -> PathBuf {
    let dir = dir.as_ref();
    (0u64..)
        .map(|n| dir.join(format!("{}_{}.png", stem, n)))
        .find(|path| !path.exists())
        .unwrap_or_else(|| dir.join(format!("{}.png", stem)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_save_png_keeps_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.png");
        let canvas = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 64]));

        save_png(&canvas, &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded, canvas);
    }

    #[test]
    fn test_unique_output_path_skips_existing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            unique_output_path(dir.path(), DEFAULT_STEM),
            dir.path().join("synthesized_image_0.png")
        );

        fs::write(dir.path().join("synthesized_image_0.png"), b"").unwrap();
        fs::write(dir.path().join("synthesized_image_1.png"), b"").unwrap();
        assert_eq!(
            unique_output_path(dir.path(), DEFAULT_STEM),
            dir.path().join("synthesized_image_2.png")
        );
    }
}
