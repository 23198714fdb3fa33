//! Variant resolution and layer compositing for LSF portraits.
//!
//! Given a parsed [`AssetIndex`](tachie_lsf::AssetIndex), this crate turns a
//! caller's [`Selection`] into the ordered list of layers to paint, then
//! blends those layers onto a transparent canvas.
//!
//! # Pipeline
//!
//! 1. [`resolve`] clamps the selection against the index and sorts the
//!    resulting layers by name, which is the paint order.
//! 2. [`render`] loads each layer through an [`ImageLoader`] and paints it
//!    with "over" blending. Missing or out-of-bounds layers are skipped with
//!    a warning.
//!
//! # Example
//!
//! ```no_run
//! use tachie_compose::{compose, save_png, DirectoryLoader, Selection};
//! use tachie_lsf::AssetIndex;
//!
//! let index = AssetIndex::open("assets/EV_A02.lsf")?;
//! let loader = DirectoryLoader::new("assets");
//!
//! let selection = Selection::new(3).with_face(1, 2).with_effect(1, 1);
//! let report = compose(&index, &selection, &loader)?;
//!
//! for skipped in &report.skipped {
//!     eprintln!("skipped {}: {}", skipped.name, skipped.reason);
//! }
//! save_png(&report.canvas, "out.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod loader;
mod output;
mod render;
mod resolve;
mod variants;

pub use error::{Error, Result};
pub use loader::{DirectoryLoader, ImageLoader, MemoryLoader};
pub use output::{save_png, unique_output_path, DEFAULT_STEM};
pub use render::{compose, over, paint, render, render_report, RenderReport, SkipReason, SkippedLayer};
pub use resolve::{base_layers, resolve, sort_layers, Selection, DEFAULT_FACE_DIFFERENCE, NONE};
pub use variants::{face_difference_variants, Variant};

/// Re-export of the pixel buffer type produced by the compositor.
pub use image::RgbaImage;
