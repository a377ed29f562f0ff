use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{Error, Result};

pub const DEFAULT_TOLERANCE: u32 = 1;
pub const MAX_TOLERANCE: u32 = 10;
pub const DEFAULT_OUTPUT_NAME: &str = "filtered_images.zip";

/// Which folder of a file's relative path carries its `<W>x<H>` size tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeFolder {
    /// First path component below the extraction root.
    #[default]
    FirstSegment,
    /// The folder directly containing the file.
    ImmediateParent,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tolerance: u32,
    pub size_folder: SizeFolder,
    pub ignore_patterns: Vec<String>,
    pub output_name: String,
    pub work_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            size_folder: SizeFolder::default(),
            ignore_patterns: Vec::new(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            work_dir: None,
        }
    }
}

impl AppConfig {
    pub fn with_tolerance(mut self, tolerance: u32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_size_folder(mut self, size_folder: SizeFolder) -> Self {
        self.size_folder = size_folder;
        self
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.tolerance > MAX_TOLERANCE {
            return Err(Error::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }
}

/// Load `Config.toml` (optional) and `IMG_SIEVE_*` environment overrides.
pub fn load_configuration() -> Result<AppConfig> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(
            Environment::with_prefix("IMG_SIEVE")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("ignore_patterns"),
        )
        .build()?;
    let config = builder.try_deserialize::<AppConfig>()?;
    config.validate()?;
    Ok(config)
}
