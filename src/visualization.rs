use crate::clustering::utils::compute_mean;
use crate::clustering::{Cluster, KMeans};
use crate::core::id::ClusterId;
use crate::core::point::Point;
use colored::Colorize;
use ndarray::ArrayView1;
use std::fmt;

pub fn print_cluster_analysis(kmeans: &KMeans) {
    println!("\n{}", "=== Cluster Analysis ===".bold());

    let stats = calculate_cluster_stats(kmeans);
    print_summary_statistics(kmeans, &stats);
    print_detailed_cluster_info(&stats);
}

pub fn calculate_cluster_stats(kmeans: &KMeans) -> Vec<ClusterStats> {
    kmeans
        .clusters()
        .iter()
        .enumerate()
        .map(|(index, cluster)| {
            let (avg_distance, sum_distance) = calculate_distance_stats(cluster);
            ClusterStats {
                index,
                cluster_id: cluster.id(),
                size: cluster.len(),
                avg_distance_to_centroid: avg_distance,
                sum_distance_to_centroid: sum_distance,
                intra_distance: cluster.intra_cluster_distance(),
            }
        })
        .collect()
}

fn calculate_distance_stats(cluster: &Cluster) -> (f64, f64) {
    if cluster.is_empty() {
        return (0.0, 0.0);
    }

    // a stale cache is recomputed locally; the cluster itself is left alone
    let centroid = match cluster.centroid() {
        Some(centroid) => centroid.clone(),
        None => {
            let rows: Vec<ArrayView1<f64>> = cluster.iter().map(|p| p.view()).collect();
            match compute_mean(&rows) {
                Some(mean) => Point::from(mean),
                None => return (0.0, 0.0),
            }
        }
    };

    let sum_distance: f64 = cluster
        .iter()
        .filter_map(|point| point.distance_to(&centroid).ok())
        .sum();

    let avg_distance = sum_distance / cluster.len() as f64;
    (avg_distance, sum_distance)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterStats {
    pub index: usize,
    pub cluster_id: ClusterId,
    pub size: usize,
    pub avg_distance_to_centroid: f64,
    pub sum_distance_to_centroid: f64,
    pub intra_distance: f64,
}

impl fmt::Display for ClusterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cluster {} (id {}): {} points, Avg Distance: {:.2}, Sum Distance: {:.2}, Intra Distance: {:.2}",
            self.index,
            self.cluster_id,
            self.size,
            self.avg_distance_to_centroid,
            self.sum_distance_to_centroid,
            self.intra_distance
        )
    }
}

fn print_summary_statistics(kmeans: &KMeans, stats: &[ClusterStats]) {
    println!("\n{}", "Summary Statistics:".bold());
    println!("Total Clusters: {}", stats.len());

    let total_points: usize = stats.iter().map(|s| s.size).sum();
    let non_empty = stats.iter().filter(|s| s.size > 0).count();
    let avg_cluster_size = if stats.is_empty() {
        0.0
    } else {
        total_points as f64 / stats.len() as f64
    };
    let total_sum_distance: f64 = stats.iter().map(|s| s.sum_distance_to_centroid).sum();
    let overall_avg_distance = if total_points == 0 {
        0.0
    } else {
        total_sum_distance / total_points as f64
    };

    println!("Total Points: {}", total_points);
    println!("Non-empty Clusters: {}", non_empty);
    println!("Average Cluster Size: {:.2}", avg_cluster_size);
    println!(
        "State: {:?} after {} iterations",
        kmeans.state(),
        kmeans.iterations()
    );
    println!("Clustering Score: {:.2}", kmeans.score());
    println!("Total Sum of Distances: {:.2}", total_sum_distance);
    println!("Overall Average Distance: {:.2}", overall_avg_distance);
}

fn print_detailed_cluster_info(stats: &[ClusterStats]) {
    println!("\n{}", "Detailed Cluster Information:".bold());
    for stat in stats {
        let info = format!("{}", stat);
        match stat.size {
            0 => println!("{}", info.red()),
            1 => println!("{}", info.yellow()),
            _ => println!("{}", info.green()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::KMeansParams;
    use crate::io::VecSource;

    #[test]
    fn test_stats_after_run() {
        let points = vec![vec![0.0, 0.0], vec![0.0, 2.0], vec![10.0, 0.0]];
        let mut kmeans = KMeans::with_source(KMeansParams::new(2, 3), VecSource::new(points)).unwrap();
        kmeans.run().unwrap();

        let stats = calculate_cluster_stats(&kmeans);
        assert_eq!(stats.len(), 3);
        assert_eq!(stats.iter().map(|s| s.size).sum::<usize>(), 3);
        for stat in &stats {
            assert_eq!(stat.sum_distance_to_centroid, 0.0);
        }
    }

    #[test]
    fn test_stale_centroid_is_recomputed_locally() {
        let points = vec![vec![0.0, 0.0], vec![0.0, 2.0]];
        let kmeans = KMeans::with_source(KMeansParams::new(2, 1), VecSource::new(points)).unwrap();
        assert!(!kmeans.clusters()[0].is_centroid_valid());

        let stats = calculate_cluster_stats(&kmeans);
        assert_eq!(stats[0].sum_distance_to_centroid, 2.0);
        assert_eq!(stats[0].avg_distance_to_centroid, 1.0);
        assert_eq!(stats[0].intra_distance, 2.0);
        assert!(!kmeans.clusters()[0].is_centroid_valid());
    }

    #[test]
    fn test_empty_cluster_stats() {
        let kmeans = KMeans::new(KMeansParams::new(3, 2)).unwrap();
        let stats = calculate_cluster_stats(&kmeans);
        assert_eq!(stats[1].size, 0);
        assert_eq!(stats[1].avg_distance_to_centroid, 0.0);
        assert!(stats[1].to_string().starts_with("Cluster 1 (id "));
    }
}
