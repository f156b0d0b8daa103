//! Loader configuration
//!
//! Read from an optional YAML file. Every field has a default, so an empty
//! file (or none at all) gives a working configuration. NCBI credentials
//! come from the environment only.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub database: PathBuf,
    /// When set, every graph write is also appended here as Cypher
    pub cypher_journal: Option<PathBuf>,
    /// Defaults to `dead_letters.tsv` next to the database
    pub dead_letter_log: Option<PathBuf>,
    pub pipeline: PipelineSettings,
    pub pubmed: PubMedSettings,
    pub cosmic: CosmicSettings,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            cypher_journal: None,
            dead_letter_log: None,
            pipeline: PipelineSettings::default(),
            pubmed: PubMedSettings::default(),
            cosmic: CosmicSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub channel_capacity: usize,
    pub records_per_second: Option<u32>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
            records_per_second: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PubMedSettings {
    pub base_url: String,
    pub batch_size: usize,
    pub retry_delay_ms: u64,
    pub expand_citations: bool,
    /// Overrides the NCBI default of 10/s with an API key and 3/s without
    pub requests_per_second: Option<u32>,
}

impl Default for PubMedSettings {
    fn default() -> Self {
        Self {
            base_url: "https://eutils.ncbi.nlm.nih.gov/entrez/eutils".to_string(),
            batch_size: 100,
            retry_delay_ms: 1000,
            expand_citations: false,
            requests_per_second: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CosmicSettings {
    /// TSV with `Abbreviation` and `TumorType` columns
    pub tumor_type_abbreviations: Option<PathBuf>,
}

impl LoaderConfig {
    /// Read and validate a YAML config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> ConfigResult<Self> {
        // an empty document deserializes to unit, not a map
        let mut config: LoaderConfig = if text.trim().is_empty() {
            LoaderConfig::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.expand_paths();
        config.validate()?;
        Ok(config)
    }

    fn expand_paths(&mut self) {
        self.database = expand_home(&self.database);
        for path in [
            &mut self.cypher_journal,
            &mut self.dead_letter_log,
            &mut self.cosmic.tumor_type_abbreviations,
        ]
        .into_iter()
        .flatten()
        {
            *path = expand_home(path);
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.pipeline.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "pipeline.channel_capacity must be at least 1".into(),
            ));
        }
        if self.pubmed.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "pubmed.batch_size must be at least 1".into(),
            ));
        }
        if self.pubmed.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("pubmed.base_url is empty".into()));
        }
        Ok(())
    }

    pub fn dead_letter_path(&self) -> PathBuf {
        self.dead_letter_log
            .clone()
            .unwrap_or_else(|| self.database.with_file_name("dead_letters.tsv"))
    }
}

/// NCBI account details. Only their presence changes behavior.
#[derive(Clone, Default)]
pub struct NcbiCredentials {
    pub email: Option<String>,
    pub api_key: Option<String>,
}

impl NcbiCredentials {
    /// `NCBI_EMAIL` and `NCBI_API_KEY`; blank values count as unset.
    pub fn from_env() -> Self {
        let var = |name: &str| {
            std::env::var(name)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            email: var("NCBI_EMAIL"),
            api_key: var("NCBI_API_KEY"),
        }
    }
}

impl std::fmt::Debug for NcbiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NcbiCredentials")
            .field("email", &self.email)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// `~/.local/share/cosmicgraph/cosmicgraph.db` or the platform equivalent
pub fn default_database_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("cosmicgraph").join("cosmicgraph.db")
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir().unwrap_or_default().join(rest),
        Err(_) => path.to_path_buf(),
    }
}
