//! The chromatographic peak model: points observed in individual scans and the
//! peaks assembled from them.
pub mod connected;
pub mod scan;
pub mod weighting;

pub use crate::peaks::connected::{ConnectedMzPeak, ConnectedPeak, DataFileRef, PeakStatus, ScanRef};
pub use crate::peaks::scan::{Run, Scan};
pub use crate::peaks::weighting::{UnknownWeighting, Weighting};
