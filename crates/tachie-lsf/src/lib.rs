//! LSF portrait layer index parser.
//!
//! An `.lsf` file describes how a character portrait is assembled from PNG
//! layers that sit next to it on disk. Each record names one layer, places it
//! on the canvas and tags it with a role code.
//!
//! # File Format
//!
//! All multi-byte fields are little-endian:
//! - 28 bytes: Header
//!   - byte 10: record count
//!   - bytes 12-13: canvas width
//!   - bytes 16-17: canvas height
//!   - byte 25: file kind
//! - N × 164 bytes: Records
//!   - bytes 0-19: NUL-padded name
//!   - bytes 128-129: x
//!   - bytes 132-133: y
//!   - byte 152: kind
//!   - byte 153: group id
//!   - byte 154: mode (non-zero = inactive)
//!
//! # Role Codes
//!
//! | kind                | role                          |
//! |---------------------|-------------------------------|
//! | 0, 3                | base image, grouped by id     |
//! | 1, or `k % 10 == 0` | face difference, slot `k/10`  |
//! | 2, or `k % 10 == 1` | face effect, slot `(k-1)/10`  |
//! | 255                 | holy light                    |
//!
//! # Example
//!
//! ```no_run
//! use tachie_lsf::AssetIndex;
//!
//! let index = AssetIndex::open("EV_A02.lsf")?;
//! println!("Canvas: {}x{}", index.canvas_width(), index.canvas_height());
//!
//! for (slot, ids) in index.face_difference_keys() {
//!     println!("face slot {}: {:?}", slot, ids);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod entry;
mod error;
mod header;
mod index;

pub mod builder;

pub use entry::{Entry, Role, HOLY_LIGHT_KIND};
pub use error::{Error, Result};
pub use header::{
    header_diff, HeaderDifference, LsfHeader, LsfRecord, HEADER_SIZE, NAME_SIZE, RECORD_SIZE,
    RECORD_TAIL_OFFSET,
};
pub use index::AssetIndex;
