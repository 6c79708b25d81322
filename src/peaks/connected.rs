use std::fmt;
use std::sync::Arc;

use mzpeaks::coordinate::{Time, MZ};
use mzpeaks::feature::{SimpleFeature, TimeInterval};
use mzpeaks::CentroidPeak;

use super::weighting::Weighting;

/// An opaque handle on the raw data file a peak was built from. It is carried
/// through the peak builder unchanged so downstream consumers can attribute peaks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataFileRef(Arc<str>);

impl DataFileRef {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataFileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DataFileRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DataFileRef {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// The position of a scan in the acquisition
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanRef {
    /// The index of the scan in its source
    pub index: usize,
    /// The retention time of the scan
    pub time: f64,
}

impl ScanRef {
    pub fn new(index: usize, time: f64) -> Self {
        Self { index, time }
    }
}

impl fmt::Display for ScanRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScanRef({}, {})", self.index, self.time)
    }
}

/// A centroided peak paired with the scan it was observed in.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectedMzPeak {
    pub scan: ScanRef,
    pub peak: CentroidPeak,
}

impl ConnectedMzPeak {
    pub fn new(scan: ScanRef, peak: CentroidPeak) -> Self {
        Self { scan, peak }
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.scan.time
    }

    #[inline]
    pub fn mz(&self) -> f64 {
        self.peak.mz
    }

    #[inline]
    pub fn intensity(&self) -> f32 {
        self.peak.intensity
    }
}

impl fmt::Display for ConnectedMzPeak {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ConnectedMzPeak({}, {}, {})",
            self.scan.time, self.peak.mz, self.peak.intensity
        )
    }
}

impl PartialEq for ConnectedMzPeak {
    fn eq(&self, other: &Self) -> bool {
        self.scan == other.scan
            && (self.peak.mz - other.peak.mz).abs() <= 1e-6
            && (self.peak.intensity - other.peak.intensity).abs() <= 1e-3
    }
}

/// Whether a [`ConnectedPeak`] may still receive points
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PeakStatus {
    #[default]
    UnderConstruction,
    /// The peak is finished and its points are frozen
    Detected,
}

impl fmt::Display for PeakStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnderConstruction => f.write_str("UNDER_CONSTRUCTION"),
            Self::Detected => f.write_str("DETECTED"),
        }
    }
}

/// A chromatographic peak built by connecting [`ConnectedMzPeak`]s from
/// consecutive scans.
///
/// A `ConnectedPeak` always holds at least one point, its points are in strictly
/// increasing retention time order, and once its status is [`PeakStatus::Detected`]
/// no further points may be added.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectedPeak {
    data_file: DataFileRef,
    points: Vec<ConnectedMzPeak>,
    status: PeakStatus,
    height: f32,
}

impl ConnectedPeak {
    /// Start a new under-construction peak from a single point
    pub fn new(data_file: DataFileRef, seed: ConnectedMzPeak) -> Self {
        let height = seed.intensity();
        Self {
            data_file,
            points: vec![seed],
            status: PeakStatus::UnderConstruction,
            height,
        }
    }

    /// Build a peak from an already ordered run of points, or `None` if the
    /// run is empty.
    pub fn from_points(data_file: DataFileRef, points: Vec<ConnectedMzPeak>) -> Option<Self> {
        let mut it = points.into_iter();
        let mut peak = Self::new(data_file, it.next()?);
        peak.points.reserve(it.len());
        for p in it {
            peak.add_point(p);
        }
        Some(peak)
    }

    pub(crate) fn add_point(&mut self, point: ConnectedMzPeak) {
        debug_assert!(
            !self.is_finalized(),
            "Cannot add {point} to a finalized peak"
        );
        debug_assert!(
            point.time() > self.last_point().time(),
            "Points must be added in increasing time order, {} <= {}",
            point.time(),
            self.last_point().time()
        );
        self.height = self.height.max(point.intensity());
        self.points.push(point);
    }

    /// Freeze the point sequence and mark the peak as [`PeakStatus::Detected`]
    pub fn finalize(&mut self) {
        self.status = PeakStatus::Detected;
    }

    pub fn status(&self) -> PeakStatus {
        self.status
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self.status, PeakStatus::Detected)
    }

    pub fn data_file(&self) -> &DataFileRef {
        &self.data_file
    }

    pub fn points(&self) -> &[ConnectedMzPeak] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_point(&self) -> &ConnectedMzPeak {
        &self.points[0]
    }

    /// The most recently added point, which is what new candidates are scored against
    pub fn last_point(&self) -> &ConnectedMzPeak {
        &self.points[self.points.len() - 1]
    }

    /// The retention time of the first and last points
    pub fn rt_range(&self) -> (f64, f64) {
        (self.first_point().time(), self.last_point().time())
    }

    /// The width of [`ConnectedPeak::rt_range`], zero for a single point
    pub fn duration(&self) -> f64 {
        let (start, end) = self.rt_range();
        end - start
    }

    /// The maximum intensity over all points
    pub fn height(&self) -> f32 {
        self.height
    }

    /// The most intense point, the earliest one if there are several
    pub fn apex(&self) -> &ConnectedMzPeak {
        let mut best = self.first_point();
        for p in self.points.iter().skip(1) {
            if p.intensity() > best.intensity() {
                best = p;
            }
        }
        best
    }

    /// The intensity weighted mean m/z of the peak
    pub fn mz(&self) -> f64 {
        self.weighted_mz(Weighting::Linear)
    }

    /// The mean m/z of the peak using `weighting` to transform intensities into weights.
    /// Falls back to the unweighted mean when all weights are zero.
    pub fn weighted_mz(&self, weighting: Weighting) -> f64 {
        let mut acc = 0.0;
        let mut norm = 0.0;
        for p in self.points.iter() {
            let w = weighting.transform(p.intensity() as f64);
            acc += p.mz() * w;
            norm += w;
        }
        if norm == 0.0 || !norm.is_finite() {
            self.points.iter().map(|p| p.mz()).sum::<f64>() / self.len() as f64
        } else {
            acc / norm
        }
    }

    /// Iterate over `(mz, time, intensity)` triples
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, f32)> + '_ {
        self.points
            .iter()
            .map(|p| (p.mz(), p.time(), p.intensity()))
    }

    pub fn to_simple_feature(&self) -> SimpleFeature<MZ, Time> {
        let mut f = SimpleFeature::<MZ, Time>::empty(self.mz());
        f.extend(self.iter());
        f
    }
}

impl TimeInterval<Time> for ConnectedPeak {
    fn start_time(&self) -> Option<f64> {
        self.points.first().map(|p| p.time())
    }

    fn end_time(&self) -> Option<f64> {
        self.points.last().map(|p| p.time())
    }

    fn apex_time(&self) -> Option<f64> {
        if self.points.is_empty() {
            None
        } else {
            Some(self.apex().time())
        }
    }

    fn area(&self) -> f32 {
        let mut area = 0.0f64;
        for pair in self.points.windows(2) {
            let dt = pair[1].time() - pair[0].time();
            area += dt * (pair[0].intensity() as f64 + pair[1].intensity() as f64) / 2.0;
        }
        area as f32
    }

    fn iter_time(&self) -> impl Iterator<Item = f64> {
        self.points.iter().map(|p| p.time())
    }
}

impl fmt::Display for ConnectedPeak {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (start, end) = self.rt_range();
        write!(
            f,
            "ConnectedPeak({:.4}, {}-{}, {}, <{} points>, {})",
            self.mz(),
            start,
            end,
            self.height,
            self.len(),
            self.status
        )
    }
}
