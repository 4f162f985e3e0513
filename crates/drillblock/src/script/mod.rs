//! CAD script emission.
//!
//! A script rebuilds the blocks inside an external CAD tool. It carries the
//! layout constants and the configuration as literals, a routine that
//! recomputes one block's cutters in layout order, and a driver that walks
//! the batch list. Each script also lists the per-block values computed here
//! as comments so the two sides can be compared.

mod openscad;
mod rhino;

pub use openscad::OpenScadWriter;
pub use rhino::RhinoPythonWriter;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Configuration;
use crate::error::Result;
use crate::export::write_file;
use crate::layout::batch_offset;

/// Fixed name of the Rhino Python script.
pub const SCRIPT_FILENAME: &str = "drill_block.py";
/// Fixed name of the OpenSCAD script.
pub const SCAD_FILENAME: &str = "drill_block.scad";

/// Trait for script writers that turn a configuration into CAD source.
pub trait ScriptWriter {
    /// Output filename.
    fn filename(&self) -> &'static str;

    /// Line comment prefix of the target language.
    fn comment(&self) -> &'static str;

    /// Imports, layout constants and configuration literals.
    fn header(&self, config: &Configuration) -> String;

    /// Routine that builds one block from a hole count and an X offset.
    fn block_routine(&self) -> String;

    /// Loop over the batch list and the completion message.
    fn driver(&self, config: &Configuration) -> String;

    /// Generate the complete script.
    fn generate(&self, config: &Configuration) -> String {
        let mut output = String::new();
        output.push_str(&self.header(config));
        output.push_str(&layout_summary(config, self.comment()));
        output.push_str(&self.block_routine());
        output.push_str(&self.driver(config));
        output
    }
}

/// Supported CAD targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptTarget {
    /// Rhino with `rhinoscriptsyntax`.
    #[default]
    Rhino,
    /// OpenSCAD.
    OpenScad,
}

impl ScriptTarget {
    /// Writer for this target.
    pub fn writer(self) -> Box<dyn ScriptWriter> {
        match self {
            ScriptTarget::Rhino => Box::new(RhinoPythonWriter),
            ScriptTarget::OpenScad => Box::new(OpenScadWriter),
        }
    }
}

/// Script text for `config`.
pub fn emit(config: &Configuration, target: ScriptTarget) -> String {
    target.writer().generate(config)
}

/// Write the script for `config` into `dir`. Returns the path written.
pub fn write_script(config: &Configuration, target: ScriptTarget, dir: &Path) -> Result<PathBuf> {
    let writer = target.writer();
    let path = dir.join(writer.filename());
    write_file(&path, writer.generate(config).as_bytes())?;
    info!(path = %path.display(), blocks = config.hole_counts.len(), "exported script");
    Ok(path)
}

/// Format a float as a literal both Python and OpenSCAD read back exactly.
pub fn literal(value: f64) -> String {
    let s = format!("{value}");
    if s.contains('.') || !value.is_finite() {
        s
    } else {
        format!("{s}.0")
    }
}

fn layout_summary(config: &Configuration, comment: &str) -> String {
    let mut out = String::new();
    for (index, layout) in config.layouts().iter().enumerate() {
        out.push_str(&format!(
            "{comment} block {index}: hole_count={} offset_x={} box_height={} cutters={} side_groove={} cap_groove={}\n",
            layout.hole_count,
            literal(batch_offset(index)),
            literal(layout.box_height()),
            layout.cutter_count(),
            literal(layout.side_groove_offset()),
            literal(layout.cap_groove_offset()),
        ));
    }
    out.push('\n');
    out
}
