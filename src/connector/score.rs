use std::cmp::Ordering;

use mzpeaks::Tolerance;

use crate::peaks::{ConnectedMzPeak, ConnectedPeak};

/// A candidate pairing of an under-construction peak with a point from the current scan.
///
/// Scores order by ascending `cost`, then by peak slot and candidate index so that
/// equal costs always resolve the same way.
#[derive(Debug, Clone, Copy)]
pub struct MatchScore {
    /// The slot of the peak in the connector's pool
    pub peak: usize,
    /// The index of the candidate in the current scan
    pub candidate: usize,
    pub cost: f64,
}

impl MatchScore {
    pub fn new(peak: usize, candidate: usize, cost: f64) -> Self {
        Self {
            peak,
            candidate,
            cost,
        }
    }
}

impl PartialEq for MatchScore {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MatchScore {}

impl PartialOrd for MatchScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MatchScore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.peak.cmp(&other.peak))
            .then_with(|| self.candidate.cmp(&other.candidate))
    }
}

/// Computes the cost of extending a peak with a candidate point.
///
/// The cost is `dmz / mz_tol + dint / intensity_tolerance` where `dmz` is the
/// absolute m/z error in the units of the [`Tolerance`] and `dint` is the
/// intensity difference relative to the larger of the two intensities.
/// Pairs with `dmz > mz_tol` are not candidates at all. `dmz == mz_tol` is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScorer {
    pub mz_tolerance: Tolerance,
    pub intensity_tolerance: f64,
}

impl MatchScorer {
    pub fn new(mz_tolerance: Tolerance, intensity_tolerance: f64) -> Self {
        Self {
            mz_tolerance,
            intensity_tolerance,
        }
    }

    /// The m/z error of `candidate` relative to `reference`, `None` when out of tolerance
    #[inline]
    pub fn mz_error(&self, reference: f64, candidate: f64) -> Option<f64> {
        let err = self.mz_tolerance.call(candidate, reference).abs();
        if err <= self.mz_tolerance.tol() {
            Some(err)
        } else {
            None
        }
    }

    /// Symmetric relative intensity difference in `[0, 1]`
    #[inline]
    pub fn intensity_difference(reference: f64, candidate: f64) -> f64 {
        let denom = reference.max(candidate);
        if denom <= 0.0 {
            0.0
        } else {
            (reference - candidate).abs() / denom
        }
    }

    /// Score `candidate` against the most recently added point of `peak`
    pub fn score(&self, peak: &ConnectedPeak, candidate: &ConnectedMzPeak) -> Option<f64> {
        self.score_points(peak.last_point(), candidate)
    }

    pub fn score_points(
        &self,
        last_point: &ConnectedMzPeak,
        candidate: &ConnectedMzPeak,
    ) -> Option<f64> {
        let dmz = self.mz_error(last_point.mz(), candidate.mz())?;
        let dint = Self::intensity_difference(
            last_point.intensity() as f64,
            candidate.intensity() as f64,
        );
        Some(dmz / self.mz_tolerance.tol() + dint / self.intensity_tolerance)
    }

    /// Compute every in-tolerance score between the peaks in `pool` and `candidates`,
    /// sorted best first.
    ///
    /// `candidates` are looked up through an m/z ordered index so each peak only
    /// visits the candidates inside its tolerance window.
    pub fn score_all(
        &self,
        pool: &[ConnectedPeak],
        candidates: &[ConnectedMzPeak],
    ) -> Vec<MatchScore> {
        let mut scores = Vec::new();
        if pool.is_empty() || candidates.is_empty() {
            return scores;
        }

        let mut order: Vec<usize> = (0..candidates.len()).collect();
        order.sort_by(|a, b| {
            candidates[*a]
                .mz()
                .total_cmp(&candidates[*b].mz())
                .then_with(|| a.cmp(b))
        });

        for (slot, peak) in pool.iter().enumerate() {
            let last = peak.last_point();
            // Widened so rounding in the window never hides a pair `mz_error` accepts
            let (lower, upper) = self.mz_tolerance.bounds(last.mz());
            let slack = (upper - lower).abs() * 1e-3;
            let (lower, upper) = (lower - slack, upper + slack);
            let start = order.partition_point(|i| candidates[*i].mz() < lower);
            for i in order[start..].iter().copied() {
                let candidate = &candidates[i];
                if candidate.mz() > upper {
                    break;
                }
                if let Some(cost) = self.score_points(last, candidate) {
                    scores.push(MatchScore::new(slot, i, cost));
                }
            }
        }
        scores.sort_unstable();
        scores
    }
}
