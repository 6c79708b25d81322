use std::{
    fs,
    io::{self, BufRead, BufReader, Read},
    num::ParseFloatError,
    path::Path,
};

use mzpeaks::CentroidPeak;
use thiserror::Error;

use crate::peaks::{DataFileRef, Run, Scan, ScanRef};

#[derive(Debug, Error)]
pub enum ScanTableError {
    #[error("An I/O error occurred while reading the scan table: {0}")]
    IOError(
        #[from]
        #[source]
        io::Error,
    ),
    #[error("Line {line}: failed to parse the {column} column from {text:?}: {source}")]
    InvalidNumber {
        line: usize,
        column: &'static str,
        text: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("Line {line}: the {column} column must be finite, got {value}")]
    NonFiniteValue {
        line: usize,
        column: &'static str,
        value: f64,
    },
    #[error("Line {line}: expected time, m/z and intensity columns, found {text:?}")]
    MissingColumns { line: usize, text: String },
    #[error("Line {line}: time {time} is earlier than the current scan's time {previous}")]
    NonMonotonicTime {
        line: usize,
        time: f64,
        previous: f64,
    },
}

/// A single parsed row of the table
#[derive(Debug, Clone, Copy)]
struct Row {
    line: usize,
    time: f64,
    mz: f64,
    intensity: f32,
}

fn parse_column(
    line: usize,
    column: &'static str,
    text: &str,
) -> Result<f64, ScanTableError> {
    let value = text
        .parse::<f64>()
        .map_err(|source| ScanTableError::InvalidNumber {
            line,
            column,
            text: text.to_string(),
            source,
        })?;
    if !value.is_finite() {
        return Err(ScanTableError::NonFiniteValue {
            line,
            column,
            value,
        });
    }
    Ok(value)
}

/**
Reads centroided scans from a delimited text table.

Each row holds `<time> <m/z> <intensity>` separated by spaces, tabs or commas, and
consecutive rows that share a time make up one scan. Scans are numbered from zero in the
order they appear. Blank lines and lines starting with `#` are skipped, as is a leading
header row whose columns are all non-numeric. Any further columns are ignored.

Times must not decrease from one row to the next. Reading stops at the first error.
*/
pub struct ScanTableReader<R: Read> {
    handle: BufReader<R>,
    buffer: String,
    line_number: usize,
    rows_read: usize,
    scans_read: usize,
    pending: Option<Row>,
    done: bool,
}

const BUFFER_SIZE: usize = 8192;

impl ScanTableReader<fs::File> {
    pub fn open_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let handle = fs::File::open(path)?;
        Ok(Self::new(handle))
    }
}

impl<R: Read> ScanTableReader<R> {
    pub fn new(handle: R) -> Self {
        Self::with_buffer_capacity(handle, BUFFER_SIZE)
    }

    pub fn with_buffer_capacity(handle: R, capacity: usize) -> Self {
        Self {
            handle: BufReader::with_capacity(capacity, handle),
            buffer: String::new(),
            line_number: 0,
            rows_read: 0,
            scans_read: 0,
            pending: None,
            done: false,
        }
    }

    fn read_row(&mut self) -> Result<Option<Row>, ScanTableError> {
        loop {
            self.buffer.clear();
            let z = self.handle.read_line(&mut self.buffer)?;
            if z == 0 {
                return Ok(None);
            }
            self.line_number += 1;
            let line = self.line_number;
            let trimmed = self.buffer.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = trimmed
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|s| !s.is_empty())
                .collect();
            if fields.len() < 3 {
                return Err(ScanTableError::MissingColumns {
                    line,
                    text: trimmed.to_string(),
                });
            }
            if self.rows_read == 0 && fields[..3].iter().all(|f| f.parse::<f64>().is_err()) {
                log::trace!("Skipping header {trimmed:?}");
                continue;
            }
            let time = parse_column(line, "time", fields[0])?;
            let mz = parse_column(line, "m/z", fields[1])?;
            let intensity = parse_column(line, "intensity", fields[2])? as f32;
            self.rows_read += 1;
            return Ok(Some(Row {
                line,
                time,
                mz,
                intensity,
            }));
        }
    }

    /// Read the next scan, `None` once the table is exhausted
    pub fn read_next_scan(&mut self) -> Result<Option<Scan>, ScanTableError> {
        let first = match self.pending.take() {
            Some(row) => row,
            None => match self.read_row()? {
                Some(row) => row,
                None => return Ok(None),
            },
        };
        let time = first.time;
        let mut peaks = vec![CentroidPeak::new(first.mz, first.intensity, 0)];
        while let Some(row) = self.read_row()? {
            if row.time == time {
                peaks.push(CentroidPeak::new(row.mz, row.intensity, peaks.len() as u32));
            } else if row.time > time {
                self.pending = Some(row);
                break;
            } else {
                return Err(ScanTableError::NonMonotonicTime {
                    line: row.line,
                    time: row.time,
                    previous: time,
                });
            }
        }
        let scan = Scan::new(ScanRef::new(self.scans_read, time), peaks);
        self.scans_read += 1;
        Ok(Some(scan))
    }

    /// Read every remaining scan into a [`Run`] for `data_file`
    pub fn read_run(&mut self, data_file: DataFileRef) -> Result<Run, ScanTableError> {
        let scans = self.by_ref().collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "Read {} scans with {} points for {data_file}",
            scans.len(),
            self.rows_read
        );
        Ok(Run::new(data_file, scans))
    }
}

impl<R: Read> Iterator for ScanTableReader<R> {
    type Item = Result<Scan, ScanTableError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_next_scan() {
            Ok(Some(scan)) => Some(Ok(scan)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn read_all(text: &str) -> Result<Vec<Scan>, ScanTableError> {
        ScanTableReader::new(text.as_bytes()).collect()
    }

    #[test_log::test]
    fn test_read_fixture() -> Result<(), ScanTableError> {
        let mut reader = ScanTableReader::open_path("./test/data/three_scans.txt")?;
        let run = reader.read_run(DataFileRef::new("three_scans"))?;
        assert_eq!(run.len(), 3);
        let times: Vec<_> = run.scans.iter().map(|s| s.time()).collect();
        assert_eq!(times, vec![1.0, 2.0, 3.0]);
        let indices: Vec<_> = run.scans.iter().map(|s| s.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(run.scans[1].len(), 2);
        assert_eq!(run.scans[1].base_peak().unwrap().mz, 100.0);
        assert_eq!(run.scans[1].peaks[1].index, 1);
        Ok(())
    }

    #[test_log::test]
    fn test_fixture_to_peak_table() -> Result<(), Box<dyn std::error::Error>> {
        use crate::connector::{PeakBuilder, PeakBuilderParameters, SimpleConnectorParameters};
        use crate::io::PeakTableWriter;
        use mzpeaks::Tolerance;

        let run = ScanTableReader::open_path("./test/data/three_scans.txt")?
            .read_run(DataFileRef::new("three_scans"))?;
        let params: PeakBuilderParameters =
            SimpleConnectorParameters::new(Tolerance::Da(0.01), 0.9, 1.5, 20.0).into();
        let mut builder = params.build()?;
        let peaks = builder.build_peaks(run.iter_scans(), &run.data_file);
        assert_eq!(peaks.len(), 1);

        let mut writer = PeakTableWriter::new(Vec::new());
        writer.write_peaks(&peaks)?;
        let text = String::from_utf8(writer.into_inner()?)?;
        assert_eq!(text, "label,retention_time\nmz_100.0000,2\n");
        Ok(())
    }

    #[test_log::test]
    fn test_delimiters_comments_and_header() {
        let text = "time\tmz\tintensity\n# a comment\n\n0.5\t200.1\t10\n0.5, 300.2, 20\n1.0 200.1 12 extra\n";
        let scans = read_all(text).unwrap();
        assert_eq!(scans.len(), 2);
        assert_eq!(scans[0].len(), 2);
        assert_eq!(scans[0].peaks[1].mz, 300.2);
        assert_eq!(scans[0].total_ion_current(), 30.0);
        assert_eq!(scans[1].len(), 1);
    }

    #[test]
    fn test_empty_table() {
        assert!(read_all("").unwrap().is_empty());
        assert!(read_all("# nothing\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_missing_columns() {
        let err = read_all("1.0 100.0 5\n2.0 100.0\n").unwrap_err();
        assert!(matches!(err, ScanTableError::MissingColumns { line: 2, .. }));
    }

    #[test]
    fn test_invalid_number() {
        let err = read_all("1.0 100.0 5\n2.0 abc 5\n").unwrap_err();
        match err {
            ScanTableError::InvalidNumber { line, column, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, "m/z");
            }
            e => panic!("Unexpected error {e}"),
        }
        let err = read_all("1.0 100.0 inf\n").unwrap_err();
        assert!(matches!(err, ScanTableError::NonFiniteValue { line: 1, .. }));
    }

    #[test]
    fn test_non_monotonic_time() {
        let mut reader = ScanTableReader::new("1.0 100 5\n2.0 100 5\n1.5 100 5\n3.0 100 5\n".as_bytes());
        assert!(reader.next().unwrap().is_ok());
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            ScanTableError::NonMonotonicTime {
                line: 3,
                time: 1.5,
                previous: 2.0
            }
        ));
        // Iteration stops after an error
        assert!(reader.next().is_none());
    }
}
