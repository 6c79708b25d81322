//! Split finished peaks into the regions that rise above a per-peak intensity
//! threshold.
use crate::peaks::{ConnectedMzPeak, ConnectedPeak};

/// Compute the `q`-th quantile of `values`, averaging the two nearest ranks when
/// `(n - 1) * q` falls between them. `q` is clamped to `[0, 1]`, an empty slice
/// gives `0`.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    match values.len() {
        0 => 0.0,
        1 => values[0],
        n => {
            let mut sorted = values.to_vec();
            sorted.sort_by(|a, b| a.total_cmp(b));
            let q = q.clamp(0.0, 1.0);
            let pos = (n - 1) as f64 * q;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            (sorted[lo] + sorted[hi]) / 2.0
        }
    }
}

/// The chromatographic threshold criterion: points of a peak whose intensity is below
/// the `level` quantile of that peak's intensities are treated as noise, and the
/// contiguous runs between them become peaks of their own.
///
/// Points exactly at the threshold are kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromatographicThreshold {
    pub level: f64,
}

impl ChromatographicThreshold {
    pub fn new(level: f64) -> Self {
        Self { level }
    }

    pub fn threshold_for(&self, peak: &ConnectedPeak) -> f64 {
        let intensities: Vec<f64> = peak.points().iter().map(|p| p.intensity() as f64).collect();
        quantile(&intensities, self.level)
    }

    /// Split `peak` into finalized sub-peaks, in retention time order. The result may be
    /// empty.
    pub fn split(&self, peak: &ConnectedPeak) -> Vec<ConnectedPeak> {
        let threshold = self.threshold_for(peak);
        let mut sub_peaks = Vec::new();
        let mut run = Vec::new();

        for point in peak.points() {
            if point.intensity() as f64 >= threshold {
                run.push(point.clone());
            } else if !run.is_empty() {
                self.close_run(peak, &mut run, &mut sub_peaks);
            }
        }
        if !run.is_empty() {
            self.close_run(peak, &mut run, &mut sub_peaks);
        }

        log::trace!(
            "Split {peak} at threshold {threshold} into {} sub-peaks",
            sub_peaks.len()
        );
        sub_peaks
    }

    fn close_run(
        &self,
        peak: &ConnectedPeak,
        run: &mut Vec<ConnectedMzPeak>,
        sub_peaks: &mut Vec<ConnectedPeak>,
    ) {
        if let Some(mut sub_peak) =
            ConnectedPeak::from_points(peak.data_file().clone(), std::mem::take(run))
        {
            sub_peak.finalize();
            sub_peaks.push(sub_peak);
        }
    }
}
