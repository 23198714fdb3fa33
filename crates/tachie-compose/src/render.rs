//! Layer compositing.
//!
//! Layers are painted in list order onto a fully transparent canvas with
//! "over" blending. A layer whose image is unavailable or does not fit on
//! the canvas is skipped, never cropped, and painting carries on.

use std::fmt;

use image::{Rgba, RgbaImage};
use tachie_lsf::{AssetIndex, Entry};

use crate::loader::ImageLoader;
use crate::resolve::{resolve, Selection};
use crate::Result;

/// Why a layer was left out of a composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The loader had no image for the layer.
    Missing,
    /// The image placed at the layer offset would pass the canvas edge.
    OutOfBounds {
        x: u16,
        y: u16,
        width: u32,
        height: u32,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Missing => write!(f, "image missing"),
            SkipReason::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "{}x{} image at ({}, {}) exceeds canvas",
                width, height, x, y
            ),
        }
    }
}

/// A layer the compositor did not paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLayer {
    /// Layer name.
    pub name: String,
    /// Reason it was skipped.
    pub reason: SkipReason,
}

/// Canvas plus the layers that could not be painted.
#[derive(Debug, Clone)]
pub struct RenderReport {
    /// The composited image.
    pub canvas: RgbaImage,
    /// Layers left out, in paint order.
    pub skipped: Vec<SkippedLayer>,
}

impl RenderReport {
    /// Whether every layer made it onto the canvas.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Composite layers onto a transparent `width × height` canvas.
pub fn render<L: ImageLoader + ?Sized>(
    width: u32,
    height: u32,
    layers: &[Entry],
    loader: &L,
) -> RgbaImage {
    render_report(width, height, layers, loader).canvas
}

/// Composite layers and report which ones were skipped.
pub fn render_report<L: ImageLoader + ?Sized>(
    width: u32,
    height: u32,
    layers: &[Entry],
    loader: &L,
) -> RenderReport {
    let mut canvas = RgbaImage::new(width, height);
    let mut skipped = Vec::new();

    for layer in layers {
        let Some(image) = loader.load(&layer.name) else {
            tracing::warn!(layer = %layer.name, "layer image missing, skipping");
            skipped.push(SkippedLayer {
                name: layer.name.clone(),
                reason: SkipReason::Missing,
            });
            continue;
        };

        if let Err(reason) = paint(&mut canvas, &image, layer.x, layer.y) {
            tracing::warn!(layer = %layer.name, %reason, "layer out of canvas bounds, skipping");
            skipped.push(SkippedLayer {
                name: layer.name.clone(),
                reason,
            });
            continue;
        }

        tracing::debug!(layer = %layer.name, x = layer.x, y = layer.y, "painted layer");
    }

    RenderReport { canvas, skipped }
}

/// Resolve a selection and render it at the index's canvas size.
pub fn compose<L: ImageLoader + ?Sized>(
    index: &AssetIndex,
    selection: &Selection,
    loader: &L,
) -> Result<RenderReport> {
    let layers = resolve(index, selection)?;
    let (width, height) = index.canvas_size();
    Ok(render_report(width, height, &layers, loader))
}

/// Blend `src` onto `canvas` with its top-left corner at `(x, y)`.
///
/// Fails without touching the canvas when `src` does not fit entirely.
pub fn paint(canvas: &mut RgbaImage, src: &RgbaImage, x: u16, y: u16) -> std::result::Result<(), SkipReason> {
    let (src_w, src_h) = src.dimensions();
    let (x0, y0) = (u32::from(x), u32::from(y));

    if x0.saturating_add(src_w) > canvas.width() || y0.saturating_add(src_h) > canvas.height() {
        return Err(SkipReason::OutOfBounds {
            x,
            y,
            width: src_w,
            height: src_h,
        });
    }

    for (sx, sy, pixel) in src.enumerate_pixels() {
        let dst = canvas.get_pixel_mut(x0 + sx, y0 + sy);
        *dst = over(*dst, *pixel);
    }

    Ok(())
}

/// Straight-alpha "over" of one pixel.
///
/// `rgb = src.rgb * a + dst.rgb * (1 - a)`, `alpha = a + dst.a * (1 - a)`.
pub fn over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = u16::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255 - sa;
    let mut out = [0u8; 4];
    for i in 0..3 {
        out[i] = mul_div255(u16::from(src[i]), sa)
            .saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out[3] = src[3].saturating_add(mul_div255(u16::from(dst[3]), inv));
    Rgba(out)
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryLoader;
    use tachie_lsf::builder::LsfBuilder;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    fn layer(name: &str, x: u16, y: u16) -> Entry {
        Entry {
            index: 0,
            name: name.to_string(),
            x,
            y,
            kind: 0,
            group_id: 0,
            mode: 0,
        }
    }

    #[test]
    fn test_over_transparent_src_is_noop() {
        let dst = Rgba([10, 20, 30, 40]);
        assert_eq!(over(dst, Rgba([255, 255, 255, 0])), dst);
    }

    #[test]
    fn test_over_opaque_src_replaces_dst() {
        assert_eq!(over(BLUE, RED), RED);
    }

    #[test]
    fn test_over_half_alpha() {
        let out = over(Rgba([0, 0, 200, 255]), Rgba([200, 0, 0, 128]));
        assert_eq!(out, Rgba([100, 0, 100, 255]));

        let onto_clear = over(CLEAR, Rgba([200, 0, 0, 128]));
        assert_eq!(onto_clear, Rgba([100, 0, 0, 128]));
    }

    #[test]
    fn test_red_square_on_clear_canvas() {
        let loader = MemoryLoader::new().with("BASE", RgbaImage::from_pixel(50, 50, RED));
        let canvas = render(200, 300, &[layer("BASE", 10, 20)], &loader);

        assert_eq!(canvas.dimensions(), (200, 300));
        for (x, y, pixel) in canvas.enumerate_pixels() {
            let inside = (10..60).contains(&x) && (20..70).contains(&y);
            assert_eq!(*pixel, if inside { RED } else { CLEAR }, "pixel ({}, {})", x, y);
        }
    }

    #[test]
    fn test_later_layer_paints_on_top() {
        let loader = MemoryLoader::new()
            .with("A", RgbaImage::from_pixel(4, 4, RED))
            .with("B", RgbaImage::from_pixel(4, 4, BLUE));
        let canvas = render(4, 4, &[layer("A", 0, 0), layer("B", 0, 0)], &loader);

        assert_eq!(*canvas.get_pixel(0, 0), BLUE);
    }

    #[test]
    fn test_missing_layer_is_skipped() {
        let loader = MemoryLoader::new().with("A", RgbaImage::from_pixel(2, 2, RED));
        let report = render_report(4, 4, &[layer("A", 0, 0), layer("GONE", 2, 2)], &loader);

        assert_eq!(
            report.skipped,
            vec![SkippedLayer {
                name: "GONE".to_string(),
                reason: SkipReason::Missing
            }]
        );
        assert_eq!(*report.canvas.get_pixel(0, 0), RED);
        assert_eq!(*report.canvas.get_pixel(3, 3), CLEAR);
    }

    #[test]
    fn test_out_of_bounds_layer_is_skipped_whole() {
        let loader = MemoryLoader::new()
            .with("BIG", RgbaImage::from_pixel(5, 5, RED))
            .with("OK", RgbaImage::from_pixel(1, 1, BLUE));
        let layers = [layer("BIG", 0, 0), layer("OK", 3, 3)];
        let report = render_report(4, 4, &layers, &loader);

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].name, "BIG");
        assert!(matches!(report.skipped[0].reason, SkipReason::OutOfBounds { .. }));
        assert_eq!(*report.canvas.get_pixel(0, 0), CLEAR);
        assert_eq!(*report.canvas.get_pixel(3, 3), BLUE);
    }

    #[test]
    fn test_layer_touching_edge_fits() {
        let loader = MemoryLoader::new().with("EDGE", RgbaImage::from_pixel(2, 2, RED));
        let report = render_report(4, 4, &[layer("EDGE", 2, 2)], &loader);

        assert!(report.is_complete());
        assert_eq!(*report.canvas.get_pixel(3, 3), RED);
    }

    #[test]
    fn test_render_is_idempotent() {
        let loader = MemoryLoader::new()
            .with("A", RgbaImage::from_pixel(3, 3, Rgba([200, 10, 10, 90])))
            .with("B", RgbaImage::from_pixel(3, 3, Rgba([10, 200, 10, 170])));
        let layers = [layer("A", 0, 0), layer("B", 1, 1)];

        let first = render(5, 5, &layers, &loader);
        let second = render(5, 5, &layers, &loader);
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn test_compose_uses_index_canvas() {
        let data = LsfBuilder::new(200, 300)
            .record("BASE", 10, 20, 0, 0, 0)
            .build();
        let index = AssetIndex::parse(&data).unwrap();
        let loader = MemoryLoader::new().with("BASE", RgbaImage::from_pixel(50, 50, RED));

        let report = compose(&index, &Selection::new(99), &loader).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.canvas.dimensions(), (200, 300));
        assert_eq!(*report.canvas.get_pixel(10, 20), RED);
        assert_eq!(*report.canvas.get_pixel(9, 20), CLEAR);
    }

    #[test]
    fn test_compose_paints_in_name_order() {
        // "B" is stored first and shared into base group 1, so the group
        // reads [B, A] until the name sort puts "B" on top.
        let data = LsfBuilder::new(4, 4)
            .record("B", 0, 0, 0, 0, 0)
            .record("A", 0, 0, 3, 1, 0)
            .build();
        let index = AssetIndex::parse(&data).unwrap();
        assert_eq!(index.base_images()[&1][0].name, "B");

        let loader = MemoryLoader::new()
            .with("A", RgbaImage::from_pixel(4, 4, RED))
            .with("B", RgbaImage::from_pixel(4, 4, BLUE));

        let report = compose(&index, &Selection::new(1), &loader).unwrap();
        assert!(report.is_complete());
        assert_eq!(*report.canvas.get_pixel(0, 0), BLUE);
    }
}
