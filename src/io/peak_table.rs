use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use csv::WriterBuilder;
use mzpeaks::feature::TimeInterval;
use thiserror::Error;

use crate::peaks::{ConnectedPeak, Weighting};

#[derive(Debug, Error)]
pub enum PeakTableError {
    #[error("An I/O error occurred while writing the peak table: {0}")]
    IOError(
        #[from]
        #[source]
        io::Error,
    ),
    #[error("Failed to write a peak table record: {0}")]
    CSVError(
        #[from]
        #[source]
        csv::Error,
    ),
}

/// Which columns a [`PeakTableWriter`] writes
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PeakTableStyle {
    /// One `label, retention_time` row per peak
    #[default]
    Summary,
    /// The summary columns followed by the peak's m/z, extent, height, area, point
    /// count and data file
    Detailed,
}

impl PeakTableStyle {
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            Self::Summary => &["label", "retention_time"],
            Self::Detailed => &[
                "label",
                "retention_time",
                "mz",
                "rt_start",
                "rt_end",
                "height",
                "area",
                "points",
                "data_file",
            ],
        }
    }
}

/// The label a peak gets when the caller does not supply one, `mz_` followed by the
/// peak's m/z to four decimal places
pub fn default_label(peak: &ConnectedPeak, weighting: Weighting) -> String {
    format!("mz_{:.4}", peak.weighted_mz(weighting))
}

/// Writes finished peaks as a delimited table with a header row.
///
/// The retention time of a peak is the time of its apex.
pub struct PeakTableWriter<W: Write> {
    handle: csv::Writer<W>,
    style: PeakTableStyle,
    weighting: Weighting,
    wrote_header: bool,
    peak_count: usize,
}

impl PeakTableWriter<fs::File> {
    pub fn create_path<P: AsRef<Path>>(
        path: P,
        style: PeakTableStyle,
    ) -> Result<Self, PeakTableError> {
        let handle = fs::File::create(path)?;
        Ok(Self::with_style(handle, style))
    }
}

impl<W: Write> PeakTableWriter<W> {
    pub fn new(handle: W) -> Self {
        Self::with_style(handle, PeakTableStyle::default())
    }

    pub fn with_style(handle: W, style: PeakTableStyle) -> Self {
        Self::with_delimiter(handle, style, b',')
    }

    pub fn with_delimiter(handle: W, style: PeakTableStyle, delimiter: u8) -> Self {
        let handle = WriterBuilder::default()
            .has_headers(false)
            .delimiter(delimiter)
            .from_writer(handle);
        Self {
            handle,
            style,
            weighting: Weighting::default(),
            wrote_header: false,
            peak_count: 0,
        }
    }

    /// Set the weighting used for the m/z of default labels and the `mz` column
    pub fn set_weighting(&mut self, weighting: Weighting) {
        self.weighting = weighting;
    }

    pub fn style(&self) -> PeakTableStyle {
        self.style
    }

    /// The number of peaks written so far
    pub fn peak_count(&self) -> usize {
        self.peak_count
    }

    /// Write the header row. This happens automatically before the first peak.
    pub fn write_header(&mut self) -> Result<(), PeakTableError> {
        if !self.wrote_header {
            self.handle.write_record(self.style.header())?;
            self.wrote_header = true;
        }
        Ok(())
    }

    pub fn write_peak(&mut self, peak: &ConnectedPeak) -> Result<(), PeakTableError> {
        let label = default_label(peak, self.weighting);
        self.write_labeled_peak(&label, peak)
    }

    pub fn write_labeled_peak(
        &mut self,
        label: &str,
        peak: &ConnectedPeak,
    ) -> Result<(), PeakTableError> {
        self.write_header()?;
        let retention_time = peak.apex().time().to_string();
        match self.style {
            PeakTableStyle::Summary => {
                self.handle.write_record([label, retention_time.as_str()])?;
            }
            PeakTableStyle::Detailed => {
                let (start, end) = peak.rt_range();
                self.handle.write_record([
                    label.to_string(),
                    retention_time,
                    peak.weighted_mz(self.weighting).to_string(),
                    start.to_string(),
                    end.to_string(),
                    peak.height().to_string(),
                    peak.area().to_string(),
                    peak.len().to_string(),
                    peak.data_file().to_string(),
                ])?;
            }
        }
        self.peak_count += 1;
        Ok(())
    }

    /// Write every peak in `peaks` with its default label, returning how many were written
    pub fn write_peaks<'a, I: IntoIterator<Item = &'a ConnectedPeak>>(
        &mut self,
        peaks: I,
    ) -> Result<usize, PeakTableError> {
        let mut n = 0;
        for peak in peaks {
            self.write_peak(peak)?;
            n += 1;
        }
        Ok(n)
    }

    pub fn flush(&mut self) -> Result<(), PeakTableError> {
        self.handle.flush()?;
        Ok(())
    }

    /// Flush the table and recover the underlying writer
    pub fn into_inner(self) -> Result<W, PeakTableError> {
        self.handle
            .into_inner()
            .map_err(|e| PeakTableError::IOError(e.into_error()))
    }
}
