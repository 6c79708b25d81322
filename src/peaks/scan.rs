use std::fmt;

use mzpeaks::CentroidPeak;

use super::connected::{DataFileRef, ScanRef};

/// The centroided peaks of a single scan
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scan {
    pub scan: ScanRef,
    pub peaks: Vec<CentroidPeak>,
}

impl Scan {
    pub fn new(scan: ScanRef, peaks: Vec<CentroidPeak>) -> Self {
        Self { scan, peaks }
    }

    pub fn index(&self) -> usize {
        self.scan.index
    }

    pub fn time(&self) -> f64 {
        self.scan.time
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    /// The most intense peak of the scan
    pub fn base_peak(&self) -> Option<&CentroidPeak> {
        self.peaks
            .iter()
            .max_by(|a, b| a.intensity.total_cmp(&b.intensity))
    }

    pub fn total_ion_current(&self) -> f32 {
        self.peaks.iter().map(|p| p.intensity).sum()
    }
}

impl fmt::Display for Scan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scan({}, {} peaks)", self.scan, self.peaks.len())
    }
}

/// All the scans of one data file, in acquisition order
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Run {
    pub data_file: DataFileRef,
    pub scans: Vec<Scan>,
}

impl Run {
    pub fn new(data_file: DataFileRef, scans: Vec<Scan>) -> Self {
        Self { data_file, scans }
    }

    pub fn len(&self) -> usize {
        self.scans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }

    /// The scans as `(scan, peaks)` pairs, the shape a peak builder consumes
    pub fn iter_scans(&self) -> impl Iterator<Item = (ScanRef, &[CentroidPeak])> + '_ {
        self.scans.iter().map(|s| (s.scan, s.peaks.as_slice()))
    }
}
