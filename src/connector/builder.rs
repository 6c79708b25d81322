//! Interchangeable peak building strategies.
use mzpeaks::CentroidLike;

use super::params::{ConnectorConfigError, SimpleConnectorParameters};
use super::simple::SimpleConnector;
use crate::peaks::{ConnectedPeak, DataFileRef, ScanRef};

/// A streaming peak builder: scans go in one at a time in retention time order and
/// finished chromatographic peaks come out.
pub trait PeakBuilder {
    /// Consume the centroided peaks of one scan, returning any peaks finished by it
    fn add_scan<C: CentroidLike>(
        &mut self,
        scan: ScanRef,
        peaks: &[C],
        data_file: &DataFileRef,
    ) -> Vec<ConnectedPeak>;

    /// Finish every peak still under construction
    fn finish_peaks(&mut self) -> Vec<ConnectedPeak>;

    /// Run a whole sequence of scans through the builder, returning every finished peak
    /// in the order they were completed.
    fn build_peaks<'a, C, I>(&mut self, scans: I, data_file: &DataFileRef) -> Vec<ConnectedPeak>
    where
        C: CentroidLike + 'a,
        I: IntoIterator<Item = (ScanRef, &'a [C])>,
    {
        let mut peaks = Vec::new();
        for (scan, centroids) in scans {
            peaks.extend(self.add_scan(scan, centroids, data_file));
        }
        peaks.extend(self.finish_peaks());
        peaks
    }
}

impl PeakBuilder for SimpleConnector {
    fn add_scan<C: CentroidLike>(
        &mut self,
        scan: ScanRef,
        peaks: &[C],
        data_file: &DataFileRef,
    ) -> Vec<ConnectedPeak> {
        SimpleConnector::add_scan(self, scan, peaks, data_file)
    }

    fn finish_peaks(&mut self) -> Vec<ConnectedPeak> {
        SimpleConnector::finish_peaks(self)
    }
}

/// The parameters of each available peak building strategy
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "strategy", rename_all = "snake_case")
)]
pub enum PeakBuilderParameters {
    SimpleConnector(SimpleConnectorParameters),
}

impl Default for PeakBuilderParameters {
    fn default() -> Self {
        Self::SimpleConnector(SimpleConnectorParameters::default())
    }
}

impl From<SimpleConnectorParameters> for PeakBuilderParameters {
    fn from(value: SimpleConnectorParameters) -> Self {
        Self::SimpleConnector(value)
    }
}

impl PeakBuilderParameters {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SimpleConnector(_) => "Simple connector",
        }
    }

    pub fn validate(&self) -> Result<(), ConnectorConfigError> {
        match self {
            Self::SimpleConnector(params) => params.validate(),
        }
    }

    /// Validate the parameters and construct a fresh builder from them
    pub fn build(&self) -> Result<PeakBuilderStrategy, ConnectorConfigError> {
        match self {
            Self::SimpleConnector(params) => {
                Ok(PeakBuilderStrategy::SimpleConnector(SimpleConnector::new(*params)?))
            }
        }
    }
}

/// A peak builder chosen at run time from [`PeakBuilderParameters`]
#[derive(Debug, Clone)]
pub enum PeakBuilderStrategy {
    SimpleConnector(SimpleConnector),
}

impl PeakBuilder for PeakBuilderStrategy {
    fn add_scan<C: CentroidLike>(
        &mut self,
        scan: ScanRef,
        peaks: &[C],
        data_file: &DataFileRef,
    ) -> Vec<ConnectedPeak> {
        match self {
            Self::SimpleConnector(builder) => builder.add_scan(scan, peaks, data_file),
        }
    }

    fn finish_peaks(&mut self) -> Vec<ConnectedPeak> {
        match self {
            Self::SimpleConnector(builder) => builder.finish_peaks(),
        }
    }
}

impl From<SimpleConnector> for PeakBuilderStrategy {
    fn from(value: SimpleConnector) -> Self {
        Self::SimpleConnector(value)
    }
}

#[cfg(test)]
mod test {
    use mzpeaks::{CentroidPeak, Tolerance};

    use super::*;

    #[test_log::test]
    fn test_strategy_dispatch() {
        let params: PeakBuilderParameters =
            SimpleConnectorParameters::new(Tolerance::Da(0.01), 0.9, 1.0, 0.0).into();
        assert_eq!(params.name(), "Simple connector");
        let mut builder = params.build().unwrap();

        let scans: Vec<(ScanRef, Vec<CentroidPeak>)> = (0..4)
            .map(|i| {
                (
                    ScanRef::new(i, i as f64 * 0.5),
                    vec![
                        CentroidPeak::new(250.0, 10.0 + i as f32, 0),
                        CentroidPeak::new(400.0, 5.0, 0),
                    ],
                )
            })
            .collect();
        let file = DataFileRef::new("dispatch");
        let peaks = builder.build_peaks(
            scans.iter().map(|(s, p)| (*s, p.as_slice())),
            &file,
        );
        assert_eq!(peaks.len(), 2);
        assert!(peaks.iter().all(|p| p.len() == 4 && p.rt_range() == (0.0, 1.5)));
    }

    #[test]
    fn test_build_rejects_invalid() {
        let params = PeakBuilderParameters::SimpleConnector(
            SimpleConnectorParameters::default().with_minimum_peak_height(-2.0),
        );
        assert!(params.validate().is_err());
        assert!(matches!(
            params.build(),
            Err(ConnectorConfigError::InvalidMinimumPeakHeight(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_parameters_json() {
        let params = PeakBuilderParameters::default();
        let text = serde_json::to_string(&params).unwrap();
        assert!(text.contains("\"strategy\":\"simple_connector\""));
        let back: PeakBuilderParameters = serde_json::from_str(&text).unwrap();
        assert_eq!(back, params);
    }
}
