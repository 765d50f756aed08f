use crate::clustering::kmeans::{KMeansParams, DEFAULT_MAX_ITERATIONS};
use crate::error::{ClusteringError, Result};
use log::{error, LevelFilter};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

#[derive(Debug, Deserialize)]
pub struct ClusteringParamsConfig {
    pub dimensionality: usize,
    pub k: usize,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String, // Log level, e.g., "info", "debug", "warn", "error"
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub clustering_params: ClusteringParamsConfig,
    pub data_file: Option<String>,   // CSV file with one point per line
    pub logging: LoggingConfig,      // Logging settings
    pub output_path: Option<String>, // Where the clustered points are written
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "  Clustering Parameters:")?;
        writeln!(
            f,
            "    Dimensionality: {}",
            self.clustering_params.dimensionality
        )?;
        writeln!(f, "    K: {}", self.clustering_params.k)?;
        writeln!(
            f,
            "    Max Iterations: {}",
            self.clustering_params.max_iterations
        )?;
        if let Some(data_file) = &self.data_file {
            writeln!(f, "  Data File: {}", data_file)?;
        } else {
            writeln!(f, "  Data File: None")?;
        }
        writeln!(f, "  Logging:")?;
        writeln!(f, "    Level: {}", self.logging.level)?;
        if let Some(output_path) = &self.output_path {
            writeln!(f, "  Output Path: {}", output_path)?;
        } else {
            writeln!(f, "  Output Path: None")?;
        }
        Ok(())
    }
}

impl Config {
    /// Reads the YAML configuration file and returns a validated `Config`.
    pub fn from_file<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let file_content = std::fs::read_to_string(file_path)?;
        Self::from_yaml_str(&file_content)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.clustering_params.dimensionality == 0 {
            return Err(ClusteringError::InvalidConfiguration(
                "dimensionality must be greater than 0".to_string(),
            ));
        }
        if self.clustering_params.k == 0 {
            return Err(ClusteringError::InvalidConfiguration(
                "k must be greater than 0".to_string(),
            ));
        }
        if self.clustering_params.max_iterations == 0 {
            return Err(ClusteringError::InvalidConfiguration(
                "max_iterations must be greater than 0".to_string(),
            ));
        }
        self.level_filter()?;
        Ok(())
    }

    /// Converts `ClusteringParamsConfig` into `KMeansParams`.
    pub fn to_params(&self) -> KMeansParams {
        KMeansParams::new(
            self.clustering_params.dimensionality,
            self.clustering_params.k,
        )
        .with_max_iterations(self.clustering_params.max_iterations)
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        match self.logging.level.to_lowercase().as_str() {
            "debug" => Ok(LevelFilter::Debug),
            "info" => Ok(LevelFilter::Info),
            "warn" => Ok(LevelFilter::Warn),
            "error" => Ok(LevelFilter::Error),
            _ => Err(ClusteringError::InvalidConfiguration(format!(
                "unsupported log level: {}",
                self.logging.level
            ))),
        }
    }

    /// Sets up logging based on the logging level in the configuration.
    pub fn setup_logging(&self) -> Result<()> {
        let level_filter = self.level_filter()?;

        if let Err(e) = env_logger::Builder::new()
            .filter_level(level_filter)
            .try_init()
        {
            error!("Failed to initialize logger: {}", e);
        }
        Ok(())
    }
}
