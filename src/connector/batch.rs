//! Build peaks for many independent runs at once.
#[cfg(feature = "parallelism")]
use rayon::prelude::*;

use super::builder::{PeakBuilder, PeakBuilderParameters};
use super::params::ConnectorConfigError;
use crate::peaks::{ConnectedPeak, Run};

/// Build the peaks of each run in `runs` with a fresh builder from `parameters`,
/// returning one peak list per run in the same order as `runs`.
///
/// If the `parallelism` feature is enabled, each run is processed on a separate
/// thread. Runs never share a builder.
pub fn build_peaks_for_runs(
    parameters: &PeakBuilderParameters,
    runs: &[Run],
) -> Result<Vec<Vec<ConnectedPeak>>, ConnectorConfigError> {
    parameters.validate()?;
    #[cfg(not(feature = "parallelism"))]
    {
        runs.iter()
            .map(|run| build_peaks_for_run(parameters, run))
            .collect()
    }
    #[cfg(feature = "parallelism")]
    {
        runs.par_iter()
            .map(|run| build_peaks_for_run(parameters, run))
            .collect()
    }
}

pub fn build_peaks_for_run(
    parameters: &PeakBuilderParameters,
    run: &Run,
) -> Result<Vec<ConnectedPeak>, ConnectorConfigError> {
    let mut builder = parameters.build()?;
    let peaks = builder.build_peaks(run.iter_scans(), &run.data_file);
    log::debug!(
        "{} produced {} peaks from {} scans of {}",
        parameters.name(),
        peaks.len(),
        run.len(),
        run.data_file
    );
    Ok(peaks)
}

#[cfg(test)]
mod test {
    use mzpeaks::{CentroidPeak, Tolerance};

    use super::*;
    use crate::connector::SimpleConnectorParameters;
    use crate::peaks::{DataFileRef, Scan, ScanRef};

    fn make_run(name: &str, mzs: &[f64], n_scans: usize) -> Run {
        let scans = (0..n_scans)
            .map(|i| {
                let peaks = mzs
                    .iter()
                    .map(|mz| CentroidPeak::new(*mz, 100.0, 0))
                    .collect();
                Scan::new(ScanRef::new(i, i as f64), peaks)
            })
            .collect();
        Run::new(DataFileRef::new(name), scans)
    }

    #[test_log::test]
    fn test_runs_are_independent() {
        let runs = vec![
            make_run("a", &[100.0], 3),
            make_run("b", &[100.0, 200.0, 300.0], 5),
            make_run("c", &[], 2),
        ];
        let params: PeakBuilderParameters =
            SimpleConnectorParameters::new(Tolerance::Da(0.01), 0.5, 1.0, 0.0).into();
        let results = build_peaks_for_runs(&params, &runs).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].len(), 1);
        assert_eq!(results[1].len(), 3);
        assert!(results[2].is_empty());
        for (run, peaks) in runs.iter().zip(results.iter()) {
            assert!(peaks.iter().all(|p| p.data_file() == &run.data_file));
        }
        assert!(results[1].iter().all(|p| p.len() == 5));
    }

    #[test]
    fn test_invalid_parameters() {
        let params: PeakBuilderParameters = SimpleConnectorParameters::default()
            .with_intensity_tolerance(2.0)
            .into();
        assert!(build_peaks_for_runs(&params, &[make_run("a", &[1.0], 1)]).is_err());
    }
}
