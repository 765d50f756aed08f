use crate::clustering::cluster::{redistribute, Cluster};
use crate::core::point::Point;
use crate::distances::squared_euclidean;
use crate::error::{ClusteringError, Result};
use crate::io::{ClusterSink, PointSource};
use log::{debug, info};
use rayon::prelude::*;
use std::borrow::Cow;
use std::fmt;

/// Iteration cap used when none is configured
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KMeansParams {
    pub dimensionality: usize,
    pub k: usize,
    pub max_iterations: usize,
}

impl KMeansParams {
    pub fn new(dimensionality: usize, k: usize) -> Self {
        Self {
            dimensionality,
            k,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Where the partition stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusteringState {
    /// Points are loaded but no assign phase has run
    Unclustered,
    /// At least one assign phase ran and the loop is still going
    Assigned,
    /// An assign phase moved no point
    Converged,
    /// The iteration cap was hit before convergence
    MaxIterationsReached,
}

/// K-means over a fixed number of clusters.
///
/// The instance is the sole owner of every point it clusters and is
/// deliberately not `Clone`.
#[derive(Debug)]
pub struct KMeans {
    params: KMeansParams,
    clusters: Vec<Cluster>,
    score: f64,
    state: ClusteringState,
    iterations: usize,
}

impl KMeans {
    /// Create `k` empty clusters
    pub fn new(params: KMeansParams) -> Result<Self> {
        if params.dimensionality == 0 {
            return Err(ClusteringError::InvalidConfiguration(
                "dimensionality must be greater than 0".to_string(),
            ));
        }
        let clusters = (0..params.k)
            .map(|_| Cluster::new(params.dimensionality))
            .collect();
        Ok(Self {
            params,
            clusters,
            score: 0.0,
            state: ClusteringState::Unclustered,
            iterations: 0,
        })
    }

    /// Create `k` clusters and load every record of `source` into cluster 0
    pub fn with_source<S: PointSource>(params: KMeansParams, mut source: S) -> Result<Self> {
        let mut kmeans = Self::new(params)?;
        match kmeans.clusters.first_mut() {
            Some(holder) => {
                let loaded = holder.load(&mut source)?;
                debug!("Loaded {} points for k-means with k = {}", loaded, params.k);
            }
            None => {
                if let Some(record) = source.next_record() {
                    record?;
                    return Err(ClusteringError::InvalidConfiguration(
                        "k = 0 leaves no cluster to hold the input points".to_string(),
                    ));
                }
            }
        }
        Ok(kmeans)
    }

    pub fn params(&self) -> &KMeansParams {
        &self.params
    }

    pub fn k(&self) -> usize {
        self.params.k
    }

    pub fn dimensionality(&self) -> usize {
        self.params.dimensionality
    }

    pub fn state(&self) -> ClusteringState {
        self.state
    }

    /// Number of assign/update rounds the last `run` performed
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// The last computed clustering score
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Total points held across all clusters
    pub fn point_count(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn cluster(&self, index: usize) -> Result<&Cluster> {
        let len = self.clusters.len();
        self.clusters
            .get(index)
            .ok_or(ClusteringError::IndexOutOfRange { index, len })
    }

    pub fn cluster_mut(&mut self, index: usize) -> Result<&mut Cluster> {
        let len = self.clusters.len();
        self.clusters
            .get_mut(index)
            .ok_or(ClusteringError::IndexOutOfRange { index, len })
    }

    /// Sum of intra-cluster distances over all clusters; lower is better
    pub fn compute_clustering_score(&mut self) -> f64 {
        self.score = self
            .clusters
            .iter()
            .map(Cluster::intra_cluster_distance)
            .sum();
        self.score
    }

    /// Run the assign/update loop until no point moves or the iteration cap
    /// is reached, then score the result.
    ///
    /// Empty input terminates immediately as `Converged`; `k == 0` is an
    /// `InvalidConfiguration`.
    pub fn run(&mut self) -> Result<ClusteringState> {
        if self.params.k == 0 {
            return Err(ClusteringError::InvalidConfiguration(
                "k must be greater than 0".to_string(),
            ));
        }
        self.gather()?;
        self.iterations = 0;

        let n_points = self.point_count();
        if n_points == 0 {
            info!("No points to cluster");
            self.state = ClusteringState::Converged;
            self.compute_clustering_score();
            return Ok(self.state);
        }

        info!(
            "Running k-means with k = {} over {} points (max {} iterations)",
            self.params.k, n_points, self.params.max_iterations
        );
        self.seed_centroids()?;
        self.state = ClusteringState::Unclustered;

        let final_state = loop {
            if self.iterations >= self.params.max_iterations {
                break ClusteringState::MaxIterationsReached;
            }
            let moved = self.assign_points()?;
            self.state = ClusteringState::Assigned;
            self.update_centroids();
            self.iterations += 1;
            debug!(
                "Iteration {}: {} points changed cluster",
                self.iterations, moved
            );
            // The first pass compares against the initial holding cluster,
            // not against a previous assignment.
            if moved == 0 && self.iterations > 1 {
                break ClusteringState::Converged;
            }
        };
        self.state = final_state;

        let score = self.compute_clustering_score();
        info!(
            "k-means finished as {:?} after {} iterations, score {}",
            self.state, self.iterations, score
        );
        Ok(self.state)
    }

    /// Hand every point to `sink`, cluster order then member order
    pub fn export<S: ClusterSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        for cluster in &self.clusters {
            cluster.export(sink)?;
        }
        sink.finish()
    }

    /// Move every point into cluster 0. A point identity held by several
    /// clusters is kept once.
    fn gather(&mut self) -> Result<()> {
        if let Some((holder, rest)) = self.clusters.split_first_mut() {
            for other in rest {
                holder.union_with(other)?;
                other.clear();
            }
        }
        Ok(())
    }

    /// Seed every cluster's centroid from the holding cluster's picks
    fn seed_centroids(&mut self) -> Result<()> {
        let seeds: Vec<Point> = match self.clusters.first() {
            Some(holder) => holder
                .pick_points(self.params.k)
                .into_iter()
                .map(Cow::into_owned)
                .collect(),
            None => return Ok(()),
        };
        for (cluster, seed) in self.clusters.iter_mut().zip(seeds) {
            cluster.set_centroid(seed)?;
        }
        Ok(())
    }

    /// Move each point to its nearest centroid, returning how many moved
    fn assign_points(&mut self) -> Result<usize> {
        let dims = self.params.dimensionality;
        let centroids: Vec<Point> = self
            .clusters
            .iter()
            .map(|c| c.centroid().cloned().unwrap_or_else(|| Point::max_value(dims)))
            .collect();

        let members: Vec<&Point> = self
            .clusters
            .iter()
            .flat_map(|cluster| cluster.iter().map(|point| point.point()))
            .collect();

        let targets = members
            .par_iter()
            .map(|point| nearest_centroid(point, &centroids))
            .collect::<Result<Vec<usize>>>()?;

        redistribute(&mut self.clusters, &targets)
    }

    fn update_centroids(&mut self) {
        self.clusters
            .par_iter_mut()
            .for_each(|cluster| cluster.compute_centroid());
    }
}

/// Index of the nearest centroid; ties go to the lowest index.
///
/// A NaN distance counts as infinitely far.
fn nearest_centroid(point: &Point, centroids: &[Point]) -> Result<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, centroid) in centroids.iter().enumerate() {
        let distance = squared_euclidean(&point.view(), &centroid.view())?;
        let distance = if distance.is_nan() {
            f64::INFINITY
        } else {
            distance
        };
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }
    Ok(best.map_or(0, |(index, _)| index))
}

impl fmt::Display for KMeans {
    /// Every cluster's members, one `x1, ..., xd : <cluster id>` line each
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cluster in &self.clusters {
            match f.precision() {
                Some(precision) => write!(f, "{:.*}", precision, cluster)?,
                None => write!(f, "{}", cluster)?,
            }
        }
        Ok(())
    }
}
