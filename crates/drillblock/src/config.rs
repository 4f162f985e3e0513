//! Generation parameters.
//!
//! [`Settings`] is the editable parameter model (what a form or a settings
//! file holds). [`Configuration`] is the sanitized view the pipeline and
//! script emitters consume. Text input goes through [`RawInput`] and never
//! fails: bad numbers keep the previous value, out-of-range numbers clamp.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::layout::{compute_layout, BlockLayout, RADIUS_FLOOR};

/// Default cylinder tessellation.
pub const DEFAULT_SEGMENTS: u32 = 32;
/// Fewest segments a cylinder can have.
pub const MIN_SEGMENTS: u32 = 3;
/// Most hole levels a block can have. Larger counts are clamped to this.
pub const MAX_HOLES: u32 = 100;

/// Whether one block or a row of blocks is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One block with `num_holes` levels.
    #[default]
    Single,
    /// One block per `batch_list` entry.
    Batch,
}

impl FromStr for Mode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Mode::Single),
            "batch" => Ok(Mode::Batch),
            _ => Err(()),
        }
    }
}

/// Sanitized generation input.
///
/// Every `hole_counts` entry lies in `1..=MAX_HOLES`, `drill_radius` is
/// positive and `groove_depth` is never negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Selected mode.
    pub mode: Mode,
    /// Hole count per block, in placement order (one entry in single mode).
    pub hole_counts: Vec<u32>,
    /// Radius of every cutter.
    pub drill_radius: f64,
    /// Groove depth; 0 disables grooves.
    pub groove_depth: f64,
    /// Cylinder tessellation used for the preview mesh.
    pub segments: u32,
}

impl Configuration {
    /// Single block configuration.
    pub fn single(num_holes: u32, drill_radius: f64, groove_depth: f64) -> Self {
        Settings {
            mode: Mode::Single,
            num_holes,
            drill_radius,
            groove_depth,
            ..Settings::default()
        }
        .configuration()
    }

    /// Batch configuration.
    pub fn batch(hole_counts: &[u32], drill_radius: f64, groove_depth: f64) -> Self {
        Settings {
            mode: Mode::Batch,
            batch_list: hole_counts.to_vec(),
            drill_radius,
            groove_depth,
            ..Settings::default()
        }
        .configuration()
    }

    /// Same configuration with a different tessellation.
    pub fn with_segments(mut self, segments: u32) -> Self {
        self.segments = segments.max(MIN_SEGMENTS);
        self
    }

    /// One layout per block, in placement order.
    pub fn layouts(&self) -> Vec<BlockLayout> {
        self.hole_counts
            .iter()
            .map(|&n| compute_layout(n, self.drill_radius, self.groove_depth))
            .collect()
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Settings::default().configuration()
    }
}

/// Editable parameter model, also the on-disk settings format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Selected mode.
    pub mode: Mode,
    /// Hole levels in single mode.
    pub num_holes: u32,
    /// Hole counts in batch mode.
    pub batch_list: Vec<u32>,
    /// Drill radius.
    pub drill_radius: f64,
    /// Groove depth.
    pub groove_depth: f64,
    /// Cylinder tessellation.
    pub segments: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::Single,
            num_holes: 5,
            batch_list: vec![3, 2, 5],
            drill_radius: 4.0,
            groove_depth: 0.5,
            segments: DEFAULT_SEGMENTS,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(text)?;
        Ok(settings.sanitized())
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded settings");
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> String {
        // Plain struct of scalars and an integer array always serializes.
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Apply the clamping rules to every field.
    pub fn sanitized(mut self) -> Self {
        self.num_holes = self.num_holes.clamp(1, MAX_HOLES);
        let kept: Vec<u32> = self
            .batch_list
            .iter()
            .filter(|&&n| n > 0)
            .map(|&n| n.min(MAX_HOLES))
            .collect();
        self.batch_list = if kept.is_empty() {
            Settings::default().batch_list
        } else {
            kept
        };
        self.drill_radius = sanitize_radius(self.drill_radius);
        self.groove_depth = sanitize_depth(self.groove_depth);
        self.segments = self.segments.max(MIN_SEGMENTS);
        self
    }

    /// Sanitized configuration for the current mode.
    pub fn configuration(&self) -> Configuration {
        let s = self.clone().sanitized();
        let hole_counts = match s.mode {
            Mode::Single => vec![s.num_holes],
            Mode::Batch => s.batch_list,
        };
        Configuration {
            mode: s.mode,
            hole_counts,
            drill_radius: s.drill_radius,
            groove_depth: s.groove_depth,
            segments: s.segments,
        }
    }

    /// Apply every present text field of `input`.
    pub fn apply_input(&mut self, input: &RawInput) {
        if let Some(mode) = &input.mode {
            self.set_mode(mode);
        }
        if let Some(text) = &input.num_holes {
            self.set_num_holes(text);
        }
        if let Some(text) = &input.batch_list {
            self.batch_list = parse_batch_list(text, &self.batch_list);
        }
        if let Some(text) = &input.drill_radius {
            self.set_drill_radius(text);
        }
        if let Some(text) = &input.groove_depth {
            self.set_groove_depth(text);
        }
        if let Some(text) = &input.segments {
            self.set_segments(text);
        }
    }

    /// Apply one `key=value` edit.
    ///
    /// Only the shape of the edit can fail; the value itself follows the same
    /// recovery rules as [`RawInput`].
    pub fn apply_edit(&mut self, edit: &str) -> Result<(), ConfigError> {
        let (key, value) = edit
            .split_once('=')
            .ok_or_else(|| ConfigError::MalformedEdit(edit.to_string()))?;
        let mut input = RawInput::default();
        let value = Some(value.trim().to_string());
        match key.trim() {
            "mode" => input.mode = value,
            "num_holes" | "holes" => input.num_holes = value,
            "batch_list" | "batch" => input.batch_list = value,
            "drill_radius" | "radius" => input.drill_radius = value,
            "groove_depth" | "depth" => input.groove_depth = value,
            "segments" => input.segments = value,
            other => return Err(ConfigError::UnknownParameter(other.to_string())),
        }
        self.apply_input(&input);
        Ok(())
    }

    fn set_mode(&mut self, text: &str) {
        match text.parse() {
            Ok(mode) => self.mode = mode,
            Err(()) => debug!(input = text, "ignoring unknown mode"),
        }
    }

    fn set_num_holes(&mut self, text: &str) {
        match text.trim().parse::<i64>() {
            Ok(n) => self.num_holes = n.clamp(1, MAX_HOLES as i64) as u32,
            Err(_) => debug!(input = text, "ignoring non-numeric hole count"),
        }
    }

    fn set_drill_radius(&mut self, text: &str) {
        match text.trim().parse::<f64>() {
            Ok(r) => self.drill_radius = sanitize_radius(r),
            Err(_) => debug!(input = text, "ignoring non-numeric drill radius"),
        }
    }

    fn set_groove_depth(&mut self, text: &str) {
        match text.trim().parse::<f64>() {
            Ok(d) => self.groove_depth = sanitize_depth(d),
            Err(_) => debug!(input = text, "ignoring non-numeric groove depth"),
        }
    }

    fn set_segments(&mut self, text: &str) {
        match text.trim().parse::<i64>() {
            Ok(n) => self.segments = n.clamp(MIN_SEGMENTS as i64, u32::MAX as i64) as u32,
            Err(_) => debug!(input = text, "ignoring non-numeric segment count"),
        }
    }
}

/// Text fields as a form supplies them. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInput {
    /// `single` or `batch`.
    pub mode: Option<String>,
    /// Integer hole count.
    pub num_holes: Option<String>,
    /// Comma-separated hole counts.
    pub batch_list: Option<String>,
    /// Drill radius.
    pub drill_radius: Option<String>,
    /// Groove depth.
    pub groove_depth: Option<String>,
    /// Cylinder tessellation.
    pub segments: Option<String>,
}

/// Parse a comma-separated batch list, keeping positive integers only.
/// Entries above [`MAX_HOLES`] are clamped to it.
///
/// Returns `previous` when nothing usable remains.
pub fn parse_batch_list(text: &str, previous: &[u32]) -> Vec<u32> {
    let parsed: Vec<u32> = text
        .split(',')
        .filter_map(|item| item.trim().parse::<i64>().ok())
        .filter(|&n| n > 0)
        .map(|n| n.min(MAX_HOLES as i64) as u32)
        .collect();
    if parsed.is_empty() {
        debug!(input = text, "batch list has no valid entries, keeping previous");
        previous.to_vec()
    } else {
        parsed
    }
}

/// Replace a non-positive or non-finite drill radius with [`RADIUS_FLOOR`].
/// Positive radii pass through unchanged, however small.
pub fn sanitize_radius(radius: f64) -> f64 {
    if radius.is_finite() && radius > 0.0 {
        radius
    } else {
        RADIUS_FLOOR
    }
}

/// Clamp a groove depth to be non-negative. NaN and infinities become 0.
pub fn sanitize_depth(depth: f64) -> f64 {
    if !depth.is_finite() {
        warn!(depth, "non-finite groove depth replaced with 0");
        0.0
    } else if depth < 0.0 {
        warn!(depth, "negative groove depth clamped to 0");
        0.0
    } else {
        depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn test_defaults() {
        let config = Configuration::default();
        assert_eq!(config.mode, Mode::Single);
        assert_eq!(config.hole_counts, vec![5]);
        assert_eq!(config.drill_radius, 4.0);
        assert_eq!(config.groove_depth, 0.5);
        assert_eq!(config.segments, DEFAULT_SEGMENTS);
    }

    #[test]
    fn test_parse_batch_list_filters() {
        assert_eq!(parse_batch_list("3, 2,5", &[1]), vec![3, 2, 5]);
        assert_eq!(parse_batch_list("3, x, -1, 0, 4", &[1]), vec![3, 4]);
        assert_eq!(parse_batch_list("", &[7, 8]), vec![7, 8]);
        assert_eq!(parse_batch_list("a,b", &[7]), vec![7]);
    }

    #[test]
    fn test_radius_floor() {
        assert_eq!(sanitize_radius(0.0), RADIUS_FLOOR);
        assert_eq!(sanitize_radius(-3.0), RADIUS_FLOOR);
        assert_eq!(sanitize_radius(2.5), 2.5);
        assert_eq!(sanitize_radius(f64::NAN), RADIUS_FLOOR);
        assert_eq!(sanitize_radius(f64::INFINITY), RADIUS_FLOOR);
    }

    #[test]
    fn test_small_radius_is_kept() {
        assert_eq!(sanitize_radius(0.05), 0.05);
        assert_eq!(Configuration::single(1, 0.05, 0.0).drill_radius, 0.05);

        let mut settings = Settings::default();
        settings.apply_edit("radius=0.02").unwrap();
        assert_eq!(settings.configuration().drill_radius, 0.02);
    }

    #[test]
    fn test_hole_count_is_capped() {
        let mut settings = Settings::default();
        settings.apply_edit("num_holes=4294967295").unwrap();
        assert_eq!(settings.num_holes, MAX_HOLES);
        settings.apply_edit("num_holes=99999999999").unwrap();
        assert_eq!(settings.num_holes, MAX_HOLES);

        assert_eq!(parse_batch_list("2, 4294967295", &[1]), vec![2, MAX_HOLES]);

        let config = Configuration::single(u32::MAX, 2.0, 0.0);
        assert_eq!(config.hole_counts, vec![MAX_HOLES]);
        let layout = &config.layouts()[0];
        assert_eq!(layout.levels().len(), MAX_HOLES as usize);

        let config = Configuration::batch(&[u32::MAX, 3], 2.0, 0.0);
        assert_eq!(config.hole_counts, vec![MAX_HOLES, 3]);

        let settings = Settings::from_toml_str("num_holes = 4000000000").unwrap();
        assert_eq!(settings.num_holes, MAX_HOLES);
    }

    #[test]
    fn test_depth_clamp() {
        assert_eq!(sanitize_depth(-1.0), 0.0);
        assert_eq!(sanitize_depth(0.0), 0.0);
        assert_eq!(sanitize_depth(1.5), 1.5);
        assert_eq!(sanitize_depth(f64::NAN), 0.0);
        assert_eq!(sanitize_depth(f64::INFINITY), 0.0);
        assert_eq!(sanitize_depth(f64::NEG_INFINITY), 0.0);
    }

    /// Log sink shared between a test and its subscriber.
    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl CapturedLog {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLog {
        type Writer = CapturedLog;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn warnings_for(depth: f64) -> String {
        let log = CapturedLog::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(log.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            sanitize_depth(depth);
        });
        log.text()
    }

    #[test]
    fn test_depth_warning_names_the_problem() {
        let nan = warnings_for(f64::NAN);
        assert!(nan.contains("non-finite groove depth"), "{nan}");
        assert!(!nan.contains("negative"), "{nan}");

        let inf = warnings_for(f64::INFINITY);
        assert!(inf.contains("non-finite groove depth"), "{inf}");

        let negative = warnings_for(-0.5);
        assert!(negative.contains("negative groove depth"), "{negative}");

        assert!(warnings_for(0.5).is_empty());
    }

    #[test]
    fn test_apply_input_recovers() {
        let mut settings = Settings::default();
        settings.apply_input(&RawInput {
            mode: Some("BATCH".into()),
            num_holes: Some("0".into()),
            batch_list: Some("oops".into()),
            drill_radius: Some("abc".into()),
            groove_depth: Some("-2".into()),
            segments: Some("1".into()),
        });
        assert_eq!(settings.mode, Mode::Batch);
        assert_eq!(settings.num_holes, 1);
        assert_eq!(settings.batch_list, vec![3, 2, 5]);
        assert_eq!(settings.drill_radius, 4.0);
        assert_eq!(settings.groove_depth, 0.0);
        assert_eq!(settings.segments, MIN_SEGMENTS);
    }

    #[test]
    fn test_configuration_follows_mode() {
        let mut settings = Settings::default();
        assert_eq!(settings.configuration().hole_counts, vec![5]);
        settings.mode = Mode::Batch;
        assert_eq!(settings.configuration().hole_counts, vec![3, 2, 5]);
    }

    #[test]
    fn test_apply_edit() {
        let mut settings = Settings::default();
        settings.apply_edit("radius = 2.5").unwrap();
        settings.apply_edit("batch=1,2").unwrap();
        assert_eq!(settings.drill_radius, 2.5);
        assert_eq!(settings.batch_list, vec![1, 2]);
        assert!(matches!(
            settings.apply_edit("radius"),
            Err(ConfigError::MalformedEdit(_))
        ));
        assert!(matches!(
            settings.apply_edit("color=red"),
            Err(ConfigError::UnknownParameter(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let settings = Settings::from_toml_str(
            r#"
mode = "batch"
batch_list = [4, 0, 2]
drill_radius = -1.0
"#,
        )
        .unwrap();
        assert_eq!(settings.mode, Mode::Batch);
        assert_eq!(settings.batch_list, vec![4, 2]);
        assert_eq!(settings.drill_radius, RADIUS_FLOOR);
        assert_eq!(settings.num_holes, 5);

        let again = Settings::from_toml_str(&settings.to_toml_string()).unwrap();
        assert_eq!(again, settings);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Settings::from_toml_str("mode = 3"),
            Err(ConfigError::Toml(_))
        ));
    }
}
