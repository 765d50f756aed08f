#[cfg(test)]
mod tests {
    use kmeans_core::clustering::{Config, KMeans};
    use kmeans_core::io::{CsvClusterSink, CsvPointSource, PointSource};

    fn drain<S: PointSource>(mut source: S) -> Vec<Vec<f64>> {
        let mut records = Vec::new();
        while let Some(record) = source.next_record() {
            records.push(record.unwrap());
        }
        records
    }

    #[test]
    fn test_demo_config_loads() {
        let config = Config::from_file("demos/config.yaml").unwrap();
        let params = config.to_params();
        assert_eq!(params.dimensionality, 5);
        assert_eq!(params.k, 4);
        assert_eq!(config.data_file.as_deref(), Some("demos/points4.csv"));
    }

    #[test]
    fn test_missing_config_is_io_error() {
        assert!(matches!(
            Config::from_file("demos/does_not_exist.yaml"),
            Err(kmeans_core::ClusteringError::Io(_))
        ));
    }

    #[test]
    fn test_clustered_file_reads_back() {
        let config = Config::from_file("demos/config.yaml").unwrap();
        let source = CsvPointSource::from_path("demos/points4.csv").unwrap();
        let mut kmeans = KMeans::with_source(config.to_params(), source).unwrap();
        kmeans.run().unwrap();

        let path = std::env::temp_dir().join(format!("kmeans_core_io_{}.csv", std::process::id()));
        let mut sink = CsvClusterSink::from_path(&path).unwrap();
        kmeans.export(&mut sink).unwrap();
        drop(sink);

        let records = drain(CsvPointSource::from_path(&path).unwrap());
        std::fs::remove_file(&path).unwrap();

        assert_eq!(records.len(), 4);
        let input = drain(CsvPointSource::from_path("demos/points4.csv").unwrap());
        for record in &records {
            assert_eq!(record.len(), 6);
            assert!(input.contains(&record[..5].to_vec()));
        }
    }
}
