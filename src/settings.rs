//! Layered settings.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. `wafdiff.toml` in the working directory (optional), or the file given
//!    with `--config` (required)
//! 3. `WAFDIFF_*` environment variables, e.g. `WAFDIFF_RAW_OUTPUT=/tmp/runs`
//!
//! Command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::report::{ColorMode, Surface};

/// Base name of the optional settings file.
pub const DEFAULT_FILE: &str = "wafdiff";

/// Prefix of the environment variables read into [`Settings`].
pub const ENV_PREFIX: &str = "WAFDIFF";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding one sub-directory of collector output per test.
    pub raw_output: PathBuf,
    /// Directory holding `<tool>.threshold.json` files. Thresholds are not
    /// evaluated when unset.
    pub threshold_conf: Option<PathBuf>,
    pub color: ColorMode,
    /// Smallest terminal plots are rendered on.
    pub min_columns: u16,
    pub min_lines: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            raw_output: PathBuf::from("./data"),
            threshold_conf: None,
            color: ColorMode::Auto,
            min_columns: Surface::MINIMUM.columns,
            min_lines: Surface::MINIMUM.lines,
        }
    }
}

impl Settings {
    /// Load settings from the default sources, or from `path` instead of the
    /// default settings file.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let builder = Config::builder()
            .set_default("raw_output", defaults.raw_output.to_string_lossy().into_owned())?
            .set_default("color", "auto")?
            .set_default("min_columns", i64::from(defaults.min_columns))?
            .set_default("min_lines", i64::from(defaults.min_lines))?;

        let builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name(DEFAULT_FILE).required(false)),
        };

        let settings: Settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        tracing::debug!("settings: {:?}", settings);
        Ok(settings)
    }

    pub fn minimum_surface(&self) -> Surface {
        Surface::new(self.min_columns, self.min_lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.raw_output, PathBuf::from("./data"));
        assert_eq!(settings.threshold_conf, None);
        assert_eq!(settings.color, ColorMode::Auto);
        assert_eq!(settings.minimum_surface(), Surface::MINIMUM);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "raw_output = \"/var/lib/wafdiff\"\nthreshold_conf = \"./thresholds\"\ncolor = \"never\"\nmin_lines = 20"
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.raw_output, PathBuf::from("/var/lib/wafdiff"));
        assert_eq!(settings.threshold_conf, Some(PathBuf::from("./thresholds")));
        assert_eq!(settings.color, ColorMode::Never);
        assert_eq!(settings.min_lines, 20);
        assert_eq!(settings.min_columns, 120);
    }

    #[test]
    fn test_explicit_file_must_exist() {
        assert!(Settings::load(Some(Path::new("/nonexistent/wafdiff.toml"))).is_err());
    }

    #[test]
    fn test_invalid_color_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "color = \"sometimes\"").unwrap();
        assert!(Settings::load(Some(file.path())).is_err());
    }
}
