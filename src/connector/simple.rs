use std::mem;

use log::{debug, trace};
use mzpeaks::CentroidLike;

use super::params::{ConnectorConfigError, SimpleConnectorParameters};
use super::score::MatchScorer;
use super::threshold::ChromatographicThreshold;
use crate::peaks::{ConnectedMzPeak, ConnectedPeak, DataFileRef, ScanRef};

/// A peak builder which connects each scan's peaks to the peaks built from the
/// previous scans.
///
/// For every scan, every pairing of an under-construction peak with a new point that
/// falls within the m/z tolerance is scored with [`MatchScorer`], and pairs are
/// accepted greedily from the lowest cost up, so that each peak gains at most one point
/// and each point joins at most one peak. Peaks that did not gain a point are finished,
/// optionally split with a [`ChromatographicThreshold`], and emitted if they are long
/// and tall enough. Points that joined no peak start new ones.
///
/// Scans must be supplied in increasing retention time order.
#[derive(Debug, Clone)]
pub struct SimpleConnector {
    parameters: SimpleConnectorParameters,
    scorer: MatchScorer,
    threshold: Option<ChromatographicThreshold>,
    under_construction: Vec<ConnectedPeak>,
    growing: Vec<bool>,
}

impl SimpleConnector {
    pub fn new(parameters: SimpleConnectorParameters) -> Result<Self, ConnectorConfigError> {
        parameters.validate()?;
        let scorer = MatchScorer::new(parameters.mz_tolerance, parameters.intensity_tolerance);
        let threshold = if parameters.chromatographic_threshold_filter {
            Some(ChromatographicThreshold::new(
                parameters.chromatographic_threshold_level,
            ))
        } else {
            None
        };
        Ok(Self {
            parameters,
            scorer,
            threshold,
            under_construction: Vec::new(),
            growing: Vec::new(),
        })
    }

    pub fn parameters(&self) -> &SimpleConnectorParameters {
        &self.parameters
    }

    /// The peaks which may still grow, in the order they were started
    pub fn under_construction(&self) -> &[ConnectedPeak] {
        &self.under_construction
    }

    /// Whether `peak` satisfies the minimum duration and height.
    ///
    /// Heights compare at the `f32` precision intensities are stored in. Durations
    /// allow for the rounding error of subtracting two retention times, so a peak
    /// spanning exactly the minimum duration passes.
    pub fn accepts(&self, peak: &ConnectedPeak) -> bool {
        let (start, end) = peak.rt_range();
        let slack = f64::EPSILON * 16.0 * start.abs().max(end.abs()).max(1.0);
        peak.duration() + slack >= self.parameters.minimum_peak_duration
            && peak.height() >= self.parameters.minimum_peak_height as f32
    }

    /// Finalize `peak` and push whatever survives splitting and filtering onto `finished`
    fn finish_peak(&self, mut peak: ConnectedPeak, finished: &mut Vec<ConnectedPeak>) {
        peak.finalize();
        match &self.threshold {
            Some(threshold) => {
                for sub_peak in threshold.split(&peak) {
                    if self.accepts(&sub_peak) {
                        finished.push(sub_peak);
                    }
                }
            }
            None => {
                if self.accepts(&peak) {
                    finished.push(peak);
                }
            }
        }
    }

    /// Connect the peaks detected in `scan` to the peaks under construction, returning
    /// any peaks that were finished by this scan.
    pub fn add_scan<C: CentroidLike>(
        &mut self,
        scan: ScanRef,
        peaks: &[C],
        data_file: &DataFileRef,
    ) -> Vec<ConnectedPeak> {
        let mut candidates: Vec<ConnectedMzPeak> = peaks
            .iter()
            .map(|p| ConnectedMzPeak::new(scan, p.as_centroid()))
            .collect();
        let mut connected = vec![false; candidates.len()];

        let scores = self.scorer.score_all(&self.under_construction, &candidates);

        let mut growing = mem::take(&mut self.growing);
        growing.clear();
        growing.resize(self.under_construction.len(), false);

        let mut n_connected = 0usize;
        for score in scores.iter() {
            if connected[score.candidate] || growing[score.peak] {
                continue;
            }
            let point = mem::take(&mut candidates[score.candidate]);
            trace!(
                "Connecting {point} to {} with cost {}",
                self.under_construction[score.peak],
                score.cost
            );
            self.under_construction[score.peak].add_point(point);
            growing[score.peak] = true;
            connected[score.candidate] = true;
            n_connected += 1;
        }

        let mut finished = Vec::new();
        let pool = mem::take(&mut self.under_construction);
        let mut kept = Vec::with_capacity(pool.len() + candidates.len() - n_connected);
        for (peak, grew) in pool.into_iter().zip(growing.iter().copied()) {
            if grew {
                kept.push(peak);
            } else {
                self.finish_peak(peak, &mut finished);
            }
        }
        growing.clear();
        self.growing = growing;

        let mut n_started = 0usize;
        for (point, was_connected) in candidates.into_iter().zip(connected) {
            if !was_connected {
                kept.push(ConnectedPeak::new(data_file.clone(), point));
                n_started += 1;
            }
        }
        self.under_construction = kept;

        debug!(
            "Scan {} at {:.4}: {} points, {} connected from {} scores, {} started, {} finished, {} under construction",
            scan.index,
            scan.time,
            peaks.len(),
            n_connected,
            scores.len(),
            n_started,
            finished.len(),
            self.under_construction.len()
        );
        finished
    }

    /// Finish every remaining peak, returning those which pass the filters. The
    /// connector is empty afterwards.
    pub fn finish_peaks(&mut self) -> Vec<ConnectedPeak> {
        let pool = mem::take(&mut self.under_construction);
        let n = pool.len();
        let mut finished = Vec::new();
        for peak in pool {
            self.finish_peak(peak, &mut finished);
        }
        self.growing.clear();
        debug!(
            "Finished {n} remaining peaks, {} were accepted",
            finished.len()
        );
        finished
    }
}
