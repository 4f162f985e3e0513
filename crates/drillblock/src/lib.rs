#![warn(missing_docs)]

//! Parametric drill-block generator.
//!
//! A drill block is a rectangular box with an axial bore, a pair of crossing
//! through-holes at every hole level and, optionally, grooves across the side
//! and end faces. This crate computes the cutter layout, subtracts it from the
//! box with [`drillblock_csg`], keeps the resulting scene, and exports it as a
//! mesh or as a script that rebuilds the same blocks in a CAD tool.
//!
//! # Example
//!
//! ```rust
//! use drillblock::{generate, Configuration};
//!
//! let config = Configuration::single(2, 3.0, 0.5).with_segments(8);
//! let blocks = generate(&config);
//! assert_eq!(blocks.len(), 1);
//! assert_eq!(blocks[0].layout.box_height(), 40.0);
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod layout;
pub mod pipeline;
pub mod scene;
pub mod script;

pub use app::{AppState, Debouncer, RegenerationReport, DEBOUNCE_INTERVAL};
pub use config::{parse_batch_list, Configuration, Mode, RawInput, Settings};
pub use error::{ConfigError, ExportError};
pub use export::{export_scene, MeshFormat, OBJ_FILENAME, STL_FILENAME};
pub use layout::{compute_layout, Axis, BlockLayout, Cutter, CutterKind, Vec3};
pub use pipeline::{generate, BlockStats, GeneratedBlock};
pub use scene::{DisplaySink, MeshHandle, MeshStore, Scene};
pub use script::{emit, write_script, ScriptTarget, ScriptWriter, SCRIPT_FILENAME};
