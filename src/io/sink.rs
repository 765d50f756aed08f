use crate::core::id::ClusterId;
use crate::error::{ClusteringError, Result};
use csv::{Writer, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Consumer of a finished clustering, one call per point.
///
/// Points arrive in cluster order, then member order within each cluster.
pub trait ClusterSink {
    fn write_point(&mut self, coordinates: &[f64], cluster: ClusterId) -> Result<()>;

    /// Called once after the last point.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: ClusterSink + ?Sized> ClusterSink for &mut S {
    fn write_point(&mut self, coordinates: &[f64], cluster: ClusterId) -> Result<()> {
        (**self).write_point(coordinates, cluster)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

impl ClusterSink for Vec<(Vec<f64>, ClusterId)> {
    fn write_point(&mut self, coordinates: &[f64], cluster: ClusterId) -> Result<()> {
        self.push((coordinates.to_vec(), cluster));
        Ok(())
    }
}

/// Writes `x1,...,xd,<cluster id>` rows without a header
pub struct CsvClusterSink<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> CsvClusterSink<W> {
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: WriterBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_writer(writer),
        }
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| ClusteringError::Io(e.into_error()))
    }
}

impl CsvClusterSink<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> ClusterSink for CsvClusterSink<W> {
    fn write_point(&mut self, coordinates: &[f64], cluster: ClusterId) -> Result<()> {
        let fields = coordinates
            .iter()
            .map(|value| value.to_string())
            .chain(std::iter::once(cluster.to_string()));
        self.writer.write_record(fields)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::id::IdAllocator;

    #[test]
    fn test_vec_sink_collects_points() {
        let ids = IdAllocator::new(3);
        let cluster = ids.next_cluster_id();
        let mut sink: Vec<(Vec<f64>, ClusterId)> = Vec::new();
        sink.write_point(&[1.0, 2.0], cluster).unwrap();
        sink.finish().unwrap();
        assert_eq!(sink, vec![(vec![1.0, 2.0], cluster)]);
    }

    #[test]
    fn test_csv_sink_writes_rows() {
        let ids = IdAllocator::new(42);
        let cluster = ids.next_cluster_id();
        let mut sink = CsvClusterSink::from_writer(Vec::new());
        sink.write_point(&[1.5, -2.0], cluster).unwrap();
        sink.write_point(&[0.25, 3.0], cluster).unwrap();
        sink.finish().unwrap();

        let bytes = sink.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "1.5,-2,42\n0.25,3,42\n");
    }
}
