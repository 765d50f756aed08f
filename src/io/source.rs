use crate::error::{ClusteringError, Result};
use csv::{ReaderBuilder, StringRecordsIntoIter, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A finite, lazily read sequence of coordinate records.
///
/// Each record becomes one owned point; its length is the point's
/// dimensionality. Sources are consumed once; re-reading means building a
/// new source.
pub trait PointSource {
    /// Pull the next record, `None` once the source is exhausted.
    fn next_record(&mut self) -> Option<Result<Vec<f64>>>;
}

impl<S: PointSource + ?Sized> PointSource for &mut S {
    fn next_record(&mut self) -> Option<Result<Vec<f64>>> {
        (**self).next_record()
    }
}

/// In-memory records, mostly for tests and benchmarks
#[derive(Debug, Default)]
pub struct VecSource {
    records: std::vec::IntoIter<Vec<f64>>,
}

impl VecSource {
    pub fn new(records: Vec<Vec<f64>>) -> Self {
        Self {
            records: records.into_iter(),
        }
    }
}

impl From<Vec<Vec<f64>>> for VecSource {
    fn from(records: Vec<Vec<f64>>) -> Self {
        Self::new(records)
    }
}

impl PointSource for VecSource {
    fn next_record(&mut self) -> Option<Result<Vec<f64>>> {
        self.records.next().map(Ok)
    }
}

/// Reads comma-separated coordinates, one point per line, no header.
///
/// Fields are trimmed, blank lines are skipped and lines starting with `#`
/// are treated as comments. Records may differ in width; the consumer
/// decides whether a width matches its dimensionality.
pub struct CsvPointSource<R: Read> {
    records: StringRecordsIntoIter<R>,
}

impl<R: Read> CsvPointSource<R> {
    pub fn from_reader(reader: R) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);
        Self {
            records: reader.into_records(),
        }
    }
}

impl CsvPointSource<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> PointSource for CsvPointSource<R> {
    fn next_record(&mut self) -> Option<Result<Vec<f64>>> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };
        Some(
            record
                .iter()
                .map(|field| field.parse::<f64>().map_err(ClusteringError::from))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<S: PointSource>(mut source: S) -> Vec<Result<Vec<f64>>> {
        let mut out = Vec::new();
        while let Some(record) = source.next_record() {
            out.push(record);
        }
        out
    }

    #[test]
    fn test_vec_source() {
        let records = drain(VecSource::new(vec![vec![1.0, 2.0], vec![3.0, 4.0]]));
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].as_ref().unwrap(), &vec![3.0, 4.0]);
    }

    #[test]
    fn test_csv_source_parses_records() {
        let data = "1.5, 2.5,3\n\n# comment\n-4,5.25 , 6e2\n";
        let records = drain(CsvPointSource::from_reader(data.as_bytes()));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].as_ref().unwrap(), &vec![1.5, 2.5, 3.0]);
        assert_eq!(records[1].as_ref().unwrap(), &vec![-4.0, 5.25, 600.0]);
    }

    #[test]
    fn test_csv_source_keeps_ragged_rows() {
        let data = "1,2,3\n1,2\n";
        let records = drain(CsvPointSource::from_reader(data.as_bytes()));
        assert_eq!(records[1].as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_csv_source_reports_bad_numbers() {
        let data = "1,2,x\n";
        let records = drain(CsvPointSource::from_reader(data.as_bytes()));
        assert!(matches!(records[0], Err(ClusteringError::ParseFloat(_))));
    }
}
