//! Clusters: identified containers that exclusively own their points.
//!
//! Membership is decided by [`PointId`], never by coordinates. Every
//! membership change marks the cached centroid stale; only
//! [`Cluster::compute_centroid`] and [`Cluster::set_centroid`] make it
//! fresh again.

use crate::clustering::utils::compute_mean;
use crate::core::id::{cluster_ids, point_ids, ClusterId, IdAllocator, PointId};
use crate::core::point::Point;
use crate::error::{ClusteringError, Result};
use crate::io::{ClusterSink, PointSource};
use fxhash::FxHashSet;
use log::debug;
use ndarray::ArrayView1;
use std::borrow::Cow;
use std::fmt;
use std::ops::{Add, Deref, DerefMut, Sub};

/// A point together with the identity its owner tracks it by.
///
/// Cloning keeps the identity, so a clone is "the same point" to every
/// membership test. That is how copied clusters keep comparing equal.
#[derive(Clone, Debug)]
pub struct OwnedPoint {
    id: PointId,
    point: Point,
}

impl OwnedPoint {
    /// Wrap `point` under a fresh identity
    pub fn new(point: Point) -> Self {
        Self::with_id_allocator(point, point_ids())
    }

    pub fn with_id_allocator(point: Point, ids: &IdAllocator) -> Self {
        Self {
            id: ids.next_point_id(),
            point,
        }
    }

    pub fn id(&self) -> PointId {
        self.id
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    pub fn into_point(self) -> Point {
        self.point
    }
}

impl Deref for OwnedPoint {
    type Target = Point;

    fn deref(&self) -> &Point {
        &self.point
    }
}

impl DerefMut for OwnedPoint {
    fn deref_mut(&mut self) -> &mut Point {
        &mut self.point
    }
}

impl From<Point> for OwnedPoint {
    fn from(point: Point) -> Self {
        Self::new(point)
    }
}

/// Cached centroid state
#[derive(Clone, Debug, PartialEq)]
pub enum Centroid {
    /// Membership changed since the last recompute (or nothing was computed yet)
    Stale,
    Fresh(Point),
}

#[derive(Clone, Debug)]
pub struct Cluster {
    id: ClusterId,
    dims: usize,
    points: Vec<OwnedPoint>,
    members: FxHashSet<PointId>,
    centroid: Centroid,
}

impl Cluster {
    /// Create an empty cluster with an id from the process-wide allocator.
    ///
    /// With `dims == 0` the cluster stays empty: every point is rejected.
    pub fn new(dims: usize) -> Self {
        Self::with_id_allocator(dims, cluster_ids())
    }

    /// Create an empty cluster drawing its id from `ids`
    pub fn with_id_allocator(dims: usize, ids: &IdAllocator) -> Self {
        Self {
            id: ids.next_cluster_id(),
            dims,
            points: Vec::new(),
            members: FxHashSet::default(),
            centroid: Centroid::Stale,
        }
    }

    pub fn id(&self) -> ClusterId {
        self.id
    }

    pub fn dimensionality(&self) -> usize {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Take ownership of `point`.
    ///
    /// The point must match the cluster's dimensionality, have at least one
    /// coordinate and be finite everywhere.
    pub fn add(&mut self, point: OwnedPoint) -> Result<()> {
        self.check_point(&point)?;
        if !self.members.insert(point.id()) {
            return Err(ClusteringError::DuplicateMember {
                point: point.id(),
                cluster: self.id,
            });
        }
        self.points.push(point);
        self.centroid = Centroid::Stale;
        Ok(())
    }

    /// Take ownership of a plain point under a fresh identity
    pub fn insert(&mut self, point: Point) -> Result<PointId> {
        let owned = OwnedPoint::new(point);
        let id = owned.id();
        self.add(owned)?;
        Ok(id)
    }

    /// Release the member with identity `id` back to the caller
    pub fn remove(&mut self, id: PointId) -> Result<OwnedPoint> {
        let position = self
            .points
            .iter()
            .position(|p| p.id() == id)
            .ok_or(ClusteringError::NotAMember { cluster: self.id })?;
        Ok(self.take_at(position))
    }

    /// Release the first member whose coordinates equal `point`
    pub fn remove_value(&mut self, point: &Point) -> Result<OwnedPoint> {
        let position = self
            .points
            .iter()
            .position(|p| p.point() == point)
            .ok_or(ClusteringError::NotAMember { cluster: self.id })?;
        Ok(self.take_at(position))
    }

    fn take_at(&mut self, position: usize) -> OwnedPoint {
        let point = self.points.remove(position);
        self.members.remove(&point.id());
        self.centroid = Centroid::Stale;
        point
    }

    /// Drop every member
    pub fn clear(&mut self) {
        if !self.points.is_empty() {
            self.points.clear();
            self.members.clear();
            self.centroid = Centroid::Stale;
        }
    }

    /// Member at 0-based `index` in insertion order
    pub fn get(&self, index: usize) -> Result<&OwnedPoint> {
        self.points
            .get(index)
            .ok_or(ClusteringError::IndexOutOfRange {
                index,
                len: self.points.len(),
            })
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.members.contains(&id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OwnedPoint> {
        self.points.iter()
    }

    pub fn points(&self) -> &[OwnedPoint] {
        &self.points
    }

    /// Read every record of `source` into new members, returning how many were added.
    ///
    /// All records are read and checked before any is inserted; on error the
    /// cluster is left as it was.
    pub fn load<S: PointSource>(&mut self, mut source: S) -> Result<usize> {
        let mut loaded = Vec::new();
        while let Some(record) = source.next_record() {
            let point = Point::from_vec(record?);
            self.check_point(&point)?;
            loaded.push(OwnedPoint::new(point));
        }
        let count = loaded.len();
        for point in loaded {
            self.add(point)?;
        }
        debug!("Loaded {} points into cluster {}", count, self.id);
        Ok(count)
    }

    /// Hand every member to `sink` as `(coordinates, cluster id)`
    pub fn export<S: ClusterSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        for point in &self.points {
            sink.write_point(point.as_slice(), self.id)?;
        }
        Ok(())
    }

    /// Recompute the centroid as the coordinate-wise mean of the members.
    ///
    /// An empty cluster gets the `f64::MAX` sentinel point.
    pub fn compute_centroid(&mut self) {
        let mean = {
            let rows: Vec<ArrayView1<f64>> = self.points.iter().map(|p| p.view()).collect();
            compute_mean(&rows)
        };
        let centroid = match mean {
            Some(mean) => Point::from(mean),
            None => Point::max_value(self.dims),
        };
        self.centroid = Centroid::Fresh(centroid);
    }

    /// The cached centroid, `None` while stale. Never recomputes.
    pub fn centroid(&self) -> Option<&Point> {
        match &self.centroid {
            Centroid::Fresh(point) => Some(point),
            Centroid::Stale => None,
        }
    }

    pub fn centroid_state(&self) -> &Centroid {
        &self.centroid
    }

    pub fn is_centroid_valid(&self) -> bool {
        matches!(self.centroid, Centroid::Fresh(_))
    }

    /// Override the centroid directly, e.g. with a seed
    pub fn set_centroid(&mut self, centroid: Point) -> Result<()> {
        if centroid.dimensionality() != self.dims {
            return Err(ClusteringError::DimensionMismatch {
                expected: self.dims,
                actual: centroid.dimensionality(),
            });
        }
        self.centroid = Centroid::Fresh(centroid);
        Ok(())
    }

    fn check_point(&self, point: &Point) -> Result<()> {
        if point.dimensionality() == 0 {
            return Err(ClusteringError::ZeroDimensional);
        }
        if point.dimensionality() != self.dims {
            return Err(ClusteringError::DimensionMismatch {
                expected: self.dims,
                actual: point.dimensionality(),
            });
        }
        if let Some(i) = point.as_slice().iter().position(|x| !x.is_finite()) {
            return Err(ClusteringError::NonFiniteCoordinate { index: i + 1 });
        }
        Ok(())
    }

    fn check_dims(&self, other: &Cluster) -> Result<()> {
        if self.dims != other.dims {
            return Err(ClusteringError::DimensionMismatch {
                expected: self.dims,
                actual: other.dims,
            });
        }
        Ok(())
    }

    /// Union: move every member of `other` that is not already here into `self`.
    ///
    /// Members present on both sides stay where they are. Each side's
    /// centroid goes stale only if that side's membership changed.
    pub fn union_with(&mut self, other: &mut Cluster) -> Result<()> {
        self.check_dims(other)?;
        let (stay, moving): (Vec<OwnedPoint>, Vec<OwnedPoint>) = std::mem::take(&mut other.points)
            .into_iter()
            .partition(|p| self.contains(p.id()));
        other.points = stay;
        if moving.is_empty() {
            return Ok(());
        }
        for point in moving {
            other.members.remove(&point.id());
            self.members.insert(point.id());
            self.points.push(point);
        }
        self.centroid = Centroid::Stale;
        other.centroid = Centroid::Stale;
        Ok(())
    }

    /// Difference: drop every member of `self` that is also a member of `other`
    pub fn difference_with(&mut self, other: &Cluster) -> Result<()> {
        self.check_dims(other)?;
        let before = self.points.len();
        let members = &mut self.members;
        self.points.retain(|p| {
            if other.contains(p.id()) {
                members.remove(&p.id());
                false
            } else {
                true
            }
        });
        if self.points.len() != before {
            self.centroid = Centroid::Stale;
        }
        Ok(())
    }

    /// Select `k` seed points.
    ///
    /// With `k <= len()` the seeds are members spread evenly by index.
    /// Otherwise every member is returned followed by `k - len()` owned
    /// `f64::MAX` sentinels.
    pub fn pick_points(&self, k: usize) -> Vec<Cow<'_, Point>> {
        let n = self.points.len();
        if k <= n {
            (0..k)
                .map(|i| Cow::Borrowed(self.points[i * n / k].point()))
                .collect()
        } else {
            self.points
                .iter()
                .map(|p| Cow::Borrowed(p.point()))
                .chain((n..k).map(|_| Cow::Owned(Point::max_value(self.dims))))
                .collect()
        }
    }

    /// Sum of distances over all unordered pairs of members
    pub fn intra_cluster_distance(&self) -> f64 {
        let mut total = 0.0;
        for (i, a) in self.points.iter().enumerate() {
            for b in &self.points[i + 1..] {
                // members always share the cluster's dimensionality
                total += a.distance_to(b).unwrap_or(0.0);
            }
        }
        total
    }

    /// Number of unordered member pairs
    pub fn cluster_edges(&self) -> usize {
        let n = self.points.len();
        n * n.saturating_sub(1) / 2
    }
}

/// Sum of distances over every `(member of a, member of b)` pair
pub fn inter_cluster_distance(a: &Cluster, b: &Cluster) -> Result<f64> {
    a.check_dims(b)?;
    let mut total = 0.0;
    for p in &a.points {
        for q in &b.points {
            total += p.distance_to(q)?;
        }
    }
    Ok(total)
}

/// Number of `(member of a, member of b)` pairs
pub fn inter_cluster_edges(a: &Cluster, b: &Cluster) -> usize {
    a.len() * b.len()
}

/// Route every member of `clusters` in a single pass: the i-th point in
/// cluster-then-member order goes to `clusters[targets[i]]`, and each
/// destination receives its points in that same order.
///
/// Returns how many points changed cluster. Only clusters whose membership
/// changed have their centroid marked stale. Nothing is touched on error.
pub(crate) fn redistribute(clusters: &mut [Cluster], targets: &[usize]) -> Result<usize> {
    let total: usize = clusters.iter().map(Cluster::len).sum();
    if targets.len() != total {
        return Err(ClusteringError::IndexOutOfRange {
            index: targets.len(),
            len: total,
        });
    }
    if let Some(&index) = targets.iter().find(|&&to| to >= clusters.len()) {
        return Err(ClusteringError::IndexOutOfRange {
            index,
            len: clusters.len(),
        });
    }
    for pair in clusters.windows(2) {
        pair[0].check_dims(&pair[1])?;
    }

    let mut buckets: Vec<Vec<OwnedPoint>> = clusters
        .iter()
        .map(|c| Vec::with_capacity(c.len()))
        .collect();
    let mut moved = 0;
    let mut routes = targets.iter().copied();
    for (from, cluster) in clusters.iter_mut().enumerate() {
        for point in cluster.points.drain(..) {
            // lengths were checked above
            let to = routes.next().unwrap_or(from);
            if to != from {
                moved += 1;
            }
            buckets[to].push(point);
        }
    }

    for (cluster, points) in clusters.iter_mut().zip(buckets) {
        let changed = points.len() != cluster.members.len()
            || points.iter().any(|p| !cluster.members.contains(&p.id()));
        if changed {
            cluster.members = points.iter().map(OwnedPoint::id).collect();
            cluster.centroid = Centroid::Stale;
        }
        cluster.points = points;
    }
    Ok(moved)
}

impl PartialEq for Cluster {
    /// Same set of point identities; id and centroid are ignored
    fn eq(&self, other: &Self) -> bool {
        self.members.len() == other.members.len()
            && self.members.iter().all(|id| other.members.contains(id))
    }
}

impl Eq for Cluster {}

impl Add<&Cluster> for &Cluster {
    type Output = Result<Cluster>;

    /// Union into a copy of `self`; neither operand changes
    fn add(self, rhs: &Cluster) -> Self::Output {
        let mut result = self.clone();
        let mut other = rhs.clone();
        result.union_with(&mut other)?;
        Ok(result)
    }
}

impl Sub<&Cluster> for &Cluster {
    type Output = Result<Cluster>;

    fn sub(self, rhs: &Cluster) -> Self::Output {
        let mut result = self.clone();
        result.difference_with(rhs)?;
        Ok(result)
    }
}

impl Add<&OwnedPoint> for &Cluster {
    type Output = Result<Cluster>;

    fn add(self, rhs: &OwnedPoint) -> Self::Output {
        let mut result = self.clone();
        Cluster::add(&mut result, rhs.clone())?;
        Ok(result)
    }
}

impl Sub<PointId> for &Cluster {
    type Output = Result<Cluster>;

    fn sub(self, rhs: PointId) -> Self::Output {
        let mut result = self.clone();
        result.remove(rhs)?;
        Ok(result)
    }
}

impl<'a> IntoIterator for &'a Cluster {
    type Item = &'a OwnedPoint;
    type IntoIter = std::slice::Iter<'a, OwnedPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl fmt::Display for Cluster {
    /// One line per member: `x1, x2, ..., xd : <cluster id>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for point in &self.points {
            match f.precision() {
                Some(precision) => writeln!(f, "{:.*} : {}", precision, point.point(), self.id)?,
                None => writeln!(f, "{} : {}", point.point(), self.id)?,
            }
        }
        Ok(())
    }
}

/// Transfer of one point between two clusters.
///
/// All preconditions are checked before either side is touched, so a
/// failed move leaves both clusters as they were.
pub struct Move<'a> {
    point: PointId,
    from: &'a mut Cluster,
    to: &'a mut Cluster,
}

impl<'a> Move<'a> {
    pub fn new(point: PointId, from: &'a mut Cluster, to: &'a mut Cluster) -> Self {
        Self { point, from, to }
    }

    pub fn perform(self) -> Result<()> {
        if !self.from.contains(self.point) {
            return Err(ClusteringError::NotAMember {
                cluster: self.from.id,
            });
        }
        if self.to.contains(self.point) {
            return Err(ClusteringError::DuplicateMember {
                point: self.point,
                cluster: self.to.id,
            });
        }
        self.from.check_dims(self.to)?;
        let point = self.from.remove(self.point)?;
        self.to.add(point)
    }
}
