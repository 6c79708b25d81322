//! Assemble chromatographic peaks from the centroided peaks of consecutive scans.
//!
//! [`SimpleConnector`] is the streaming builder. It is usually driven through the
//! [`PeakBuilder`] trait, with [`PeakBuilderParameters`] selecting and configuring the
//! strategy at run time.
pub mod batch;
pub mod builder;
pub mod params;
pub mod score;
pub mod simple;
pub mod threshold;

pub use batch::{build_peaks_for_run, build_peaks_for_runs};
pub use builder::{PeakBuilder, PeakBuilderParameters, PeakBuilderStrategy};
pub use params::{ConnectorConfigError, SimpleConnectorParameters};
pub use score::{MatchScore, MatchScorer};
pub use simple::SimpleConnector;
pub use threshold::{quantile, ChromatographicThreshold};
