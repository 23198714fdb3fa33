//! Tachie - LSF portrait index parsing and layer compositing library.
//!
//! This crate provides a unified interface to the Tachie crates.
//!
//! # Crates
//!
//! - [`tachie_common`] - Common utilities (bounded binary reading)
//! - [`tachie_lsf`] - `.lsf` index parsing and layer classification
//! - [`tachie_compose`] - Variant resolution and compositing
//!
//! # Example
//!
//! ```no_run
//! use tachie::prelude::*;
//!
//! let index = AssetIndex::open("data/ev_0/EV_B09.lsf")?;
//! let loader = DirectoryLoader::new("data/ev_0");
//!
//! let layers = resolve(&index, &Selection::new(5).with_face(1, 2))?;
//! let (width, height) = index.canvas_size();
//! let canvas = render(width, height, &layers, &loader);
//! save_png(&canvas, "output/output.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use tachie_common as common;
pub use tachie_compose as compose;
pub use tachie_lsf as lsf;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tachie_common::BinaryReader;
    pub use tachie_compose::{
        base_layers, compose, face_difference_variants, render, render_report, resolve,
        save_png, unique_output_path, DirectoryLoader, ImageLoader, MemoryLoader, RenderReport,
        Selection, SkipReason,
    };
    pub use tachie_lsf::{header_diff, AssetIndex, Entry, Role};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
