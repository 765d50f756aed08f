use std::error::Error;

use kmeans_core::clustering::{Config, KMeans};
use kmeans_core::io::{CsvClusterSink, CsvPointSource, VecSource};
use kmeans_core::visualization::print_cluster_analysis;
use log::{info, warn};

const DEFAULT_CONFIG: &str = "demos/config.yaml";

fn main() -> Result<(), Box<dyn Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = Config::from_file(&config_path)?;
    config.setup_logging()?;
    info!("Loaded configuration from {}", config_path);
    info!("{}", config);

    let params = config.to_params();
    let mut kmeans = match &config.data_file {
        Some(data_file) => KMeans::with_source(params, CsvPointSource::from_path(data_file)?)?,
        None => {
            warn!("No data_file configured, clustering an empty set");
            KMeans::with_source(params, VecSource::default())?
        }
    };

    let state = kmeans.run()?;
    info!("Clustering finished: {:?}", state);
    print_cluster_analysis(&kmeans);

    if let Some(output_path) = &config.output_path {
        let mut sink = CsvClusterSink::from_path(output_path)?;
        kmeans.export(&mut sink)?;
        info!("Wrote {} clustered points to {}", kmeans.point_count(), output_path);
    } else {
        print!("{}", kmeans);
    }
    Ok(())
}
