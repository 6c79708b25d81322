//! `mzconnect` builds chromatographic peaks out of the centroided peaks of consecutive
//! mass spectra.
//!
//! Scans are streamed through a [`PeakBuilder`](crate::connector::PeakBuilder) in
//! retention time order. The [`SimpleConnector`] strategy extends each peak under
//! construction with the best matching point of the next scan, finishes peaks once they
//! stop growing, and reports those that are long and tall enough, optionally splitting
//! them on intensity dips first.
//!
//! ```
//! use mzconnect::prelude::*;
//! use mzconnect::{CentroidPeak, DataFileRef, ScanRef, SimpleConnectorParameters, Tolerance};
//!
//! let params = SimpleConnectorParameters::new(Tolerance::Da(0.01), 0.9, 1.5, 20.0);
//! let mut builder = mzconnect::PeakBuilderParameters::from(params).build().unwrap();
//! let data_file = DataFileRef::new("sample.mzML");
//! for (i, intensity) in [10.0, 50.0, 10.0].into_iter().enumerate() {
//!     let peaks = vec![CentroidPeak::new(100.0, intensity, 0)];
//!     builder.add_scan(ScanRef::new(i, (i + 1) as f64), &peaks, &data_file);
//! }
//! let peaks = builder.finish_peaks();
//! assert_eq!(peaks.len(), 1);
//! assert_eq!(peaks[0].rt_range(), (1.0, 3.0));
//! ```
pub mod connector;
pub mod io;
pub mod peaks;
pub mod prelude;

pub use mzpeaks::{CentroidPeak, Tolerance};

pub use crate::connector::{
    build_peaks_for_runs, ConnectorConfigError, PeakBuilderParameters, PeakBuilderStrategy,
    SimpleConnector, SimpleConnectorParameters,
};
pub use crate::peaks::{
    ConnectedMzPeak, ConnectedPeak, DataFileRef, PeakStatus, Run, Scan, ScanRef, Weighting,
};
