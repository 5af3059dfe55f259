use std::path::PathBuf;

use octofhir_extract::output::{CsvWriter, JsonArrayWriter, OutputFormat, OutputWriter};
use octofhir_extract::{ExtensionMatch, ExtractorConfig, Profile, ProjectorOptions};
use serde::{Deserialize, Serialize};

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "octofhir-extract.toml";

/// Prefix of environment overrides, e.g. `OCTOFHIR_EXTRACT__OUTPUT__FORMAT=ndjson`.
pub const ENV_PREFIX: &str = "OCTOFHIR_EXTRACT";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExtractConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ExtractConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.input.dir.as_os_str().is_empty() {
            return Err("input.dir must not be empty".into());
        }
        if self.input.suffix.is_empty() {
            return Err("input.suffix must not be empty".into());
        }
        if self.output.dir.as_os_str().is_empty() {
            return Err("output.dir must not be empty".into());
        }
        if self.output.delimiter_byte().is_none() {
            return Err("output.delimiter must be a single ASCII character".into());
        }
        if self.output.quote_byte().is_none() {
            return Err("output.quote must be a single ASCII character".into());
        }
        if self.extraction.profiles.is_empty() {
            return Err("extraction.profiles must name at least one profile".into());
        }
        if self.extraction.emergency_class_code.trim().is_empty() {
            return Err("extraction.emergency_class_code must not be empty".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }

    /// Library settings for one run.
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig::new(&self.input.dir)
            .with_suffix(self.input.suffix.clone())
            .with_sorted(self.input.sort_files)
            .with_profiles(self.extraction.profiles.iter().copied())
            .with_options(ProjectorOptions {
                extension_match: self.extraction.extension_match,
                emergency_class_code: self.extraction.emergency_class_code.clone(),
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_input_dir")]
    pub dir: PathBuf,
    /// Case-sensitive file name suffix of Bundle files.
    #[serde(default = "default_suffix")]
    pub suffix: String,
    /// Process files in name order; otherwise in directory order.
    #[serde(default = "default_true")]
    pub sort_files: bool,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("synthea/output/fhir")
}
fn default_suffix() -> String {
    octofhir_extract::DEFAULT_SUFFIX.into()
}
fn default_true() -> bool {
    true
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: default_input_dir(),
            suffix: default_suffix(),
            sort_files: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default)]
    pub format: OutputFormat,
    /// CSV field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// CSV quote character.
    #[serde(default = "default_quote")]
    pub quote: String,
    #[serde(default = "default_true")]
    pub include_header: bool,
    /// Pretty-print the `json` format.
    #[serde(default)]
    pub pretty: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_delimiter() -> String {
    ",".into()
}
fn default_quote() -> String {
    "\"".into()
}

fn single_ascii(value: &str) -> Option<u8> {
    match value.as_bytes() {
        [b] if b.is_ascii() => Some(*b),
        _ => None,
    }
}

impl OutputConfig {
    /// The delimiter as a byte, if it is exactly one ASCII character.
    pub fn delimiter_byte(&self) -> Option<u8> {
        single_ascii(&self.delimiter)
    }

    pub fn quote_byte(&self) -> Option<u8> {
        single_ascii(&self.quote)
    }

    /// Writer for the configured format, carrying the format settings.
    pub fn writer(&self) -> Box<dyn OutputWriter> {
        match self.format {
            OutputFormat::Csv => Box::new(
                CsvWriter::new()
                    .with_header(self.include_header)
                    .with_delimiter(self.delimiter_byte().unwrap_or(b','))
                    .with_quote(self.quote_byte().unwrap_or(b'"')),
            ),
            OutputFormat::Json => Box::new(JsonArrayWriter::new().with_pretty(self.pretty)),
            other => other.writer(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: OutputFormat::default(),
            delimiter: default_delimiter(),
            quote: default_quote(),
            include_header: true,
            pretty: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default = "default_profiles")]
    pub profiles: Vec<Profile>,
    /// `Encounter.class.code` selecting emergency encounters.
    #[serde(default = "default_emergency_class_code")]
    pub emergency_class_code: String,
    /// Which entry wins when an extension URL repeats.
    #[serde(default)]
    pub extension_match: ExtensionMatch,
}

fn default_profiles() -> Vec<Profile> {
    vec![Profile::Detailed]
}
fn default_emergency_class_code() -> String {
    octofhir_extract::projector::DEFAULT_EMERGENCY_CLASS_CODE.into()
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            profiles: default_profiles(),
            emergency_class_code: default_emergency_class_code(),
            extension_match: ExtensionMatch::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "warn".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub mod loader {
    use super::{DEFAULT_CONFIG_FILE, ENV_PREFIX, ExtractConfig};
    use config::{Config, Environment, File};
    use std::path::Path;

    /// Load the configuration file (if present) and environment overrides.
    ///
    /// An explicit `path` must exist; the default file is optional. The
    /// result is not validated, so command line overrides can still apply.
    pub fn load_config(path: Option<&Path>) -> Result<ExtractConfig, String> {
        let builder = base_builder(path)?;
        let cfg = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("extraction.profiles"),
            )
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        cfg.try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))
    }

    fn base_builder(
        path: Option<&Path>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, String> {
        let builder = Config::builder();
        match path {
            Some(p) if p.exists() => Ok(builder.add_source(File::from(p))),
            Some(p) => Err(format!("config file not found: {}", p.display())),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Ok(builder.add_source(File::from(default_path)))
                } else {
                    Ok(builder)
                }
            }
        }
    }
}
