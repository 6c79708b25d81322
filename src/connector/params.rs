use mzpeaks::Tolerance;
use thiserror::Error;

/// Errors raised when building a peak builder from parameters outside of their domains
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConnectorConfigError {
    #[error("The m/z tolerance must be a positive, finite number, got {0}")]
    InvalidMzTolerance(f64),
    #[error("The intensity tolerance must be in (0, 1], got {0}")]
    InvalidIntensityTolerance(f64),
    #[error("The minimum peak duration must be a non-negative, finite number, got {0}")]
    InvalidMinimumPeakDuration(f64),
    #[error("The minimum peak height must be a non-negative, finite number, got {0}")]
    InvalidMinimumPeakHeight(f64),
    #[error("The chromatographic threshold level must be in [0, 1], got {0}")]
    InvalidChromatographicThresholdLevel(f64),
}

/// Parameters controlling [`SimpleConnector`](super::SimpleConnector)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleConnectorParameters {
    /// The largest m/z difference between the last point of a peak and a candidate
    /// for the candidate to be considered
    pub mz_tolerance: Tolerance,
    /// The relative intensity difference that is worth one full m/z tolerance
    /// when scoring a connection
    pub intensity_tolerance: f64,
    /// The minimum retention time span of an accepted peak
    pub minimum_peak_duration: f64,
    /// The minimum height of an accepted peak
    pub minimum_peak_height: f64,
    /// Whether to split finished peaks on intensity dips below
    /// [`SimpleConnectorParameters::chromatographic_threshold_level`]
    pub chromatographic_threshold_filter: bool,
    /// The intensity quantile of a peak's points below which points count as noise
    pub chromatographic_threshold_level: f64,
}

impl Default for SimpleConnectorParameters {
    fn default() -> Self {
        Self {
            mz_tolerance: Tolerance::Da(0.01),
            intensity_tolerance: 0.5,
            minimum_peak_duration: 0.0,
            minimum_peak_height: 0.0,
            chromatographic_threshold_filter: false,
            chromatographic_threshold_level: 0.0,
        }
    }
}

impl SimpleConnectorParameters {
    pub fn new(
        mz_tolerance: Tolerance,
        intensity_tolerance: f64,
        minimum_peak_duration: f64,
        minimum_peak_height: f64,
    ) -> Self {
        Self {
            mz_tolerance,
            intensity_tolerance,
            minimum_peak_duration,
            minimum_peak_height,
            ..Default::default()
        }
    }

    pub fn with_mz_tolerance(mut self, mz_tolerance: Tolerance) -> Self {
        self.mz_tolerance = mz_tolerance;
        self
    }

    pub fn with_intensity_tolerance(mut self, intensity_tolerance: f64) -> Self {
        self.intensity_tolerance = intensity_tolerance;
        self
    }

    pub fn with_minimum_peak_duration(mut self, minimum_peak_duration: f64) -> Self {
        self.minimum_peak_duration = minimum_peak_duration;
        self
    }

    pub fn with_minimum_peak_height(mut self, minimum_peak_height: f64) -> Self {
        self.minimum_peak_height = minimum_peak_height;
        self
    }

    /// Enable the chromatographic threshold filter at the given quantile
    pub fn with_chromatographic_threshold(mut self, level: f64) -> Self {
        self.chromatographic_threshold_filter = true;
        self.chromatographic_threshold_level = level;
        self
    }

    pub fn without_chromatographic_threshold(mut self) -> Self {
        self.chromatographic_threshold_filter = false;
        self
    }

    /// Check every parameter against its domain. The threshold level is only
    /// checked when the filter is enabled.
    pub fn validate(&self) -> Result<(), ConnectorConfigError> {
        let tol = self.mz_tolerance.tol();
        if !(tol > 0.0 && tol.is_finite()) {
            return Err(ConnectorConfigError::InvalidMzTolerance(tol));
        }
        if !(self.intensity_tolerance > 0.0 && self.intensity_tolerance <= 1.0) {
            return Err(ConnectorConfigError::InvalidIntensityTolerance(
                self.intensity_tolerance,
            ));
        }
        if !(self.minimum_peak_duration >= 0.0 && self.minimum_peak_duration.is_finite()) {
            return Err(ConnectorConfigError::InvalidMinimumPeakDuration(
                self.minimum_peak_duration,
            ));
        }
        if !(self.minimum_peak_height >= 0.0 && self.minimum_peak_height.is_finite()) {
            return Err(ConnectorConfigError::InvalidMinimumPeakHeight(
                self.minimum_peak_height,
            ));
        }
        if self.chromatographic_threshold_filter
            && !(0.0..=1.0).contains(&self.chromatographic_threshold_level)
        {
            return Err(ConnectorConfigError::InvalidChromatographicThresholdLevel(
                self.chromatographic_threshold_level,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimpleConnectorParameters::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_tolerances() {
        let params = SimpleConnectorParameters::default().with_mz_tolerance(Tolerance::Da(0.0));
        assert_eq!(
            params.validate(),
            Err(ConnectorConfigError::InvalidMzTolerance(0.0))
        );
        let params = SimpleConnectorParameters::default().with_mz_tolerance(Tolerance::PPM(-5.0));
        assert!(matches!(
            params.validate(),
            Err(ConnectorConfigError::InvalidMzTolerance(_))
        ));
        let params =
            SimpleConnectorParameters::default().with_mz_tolerance(Tolerance::Da(f64::NAN));
        assert!(params.validate().is_err());

        for bad in [0.0, -0.1, 1.5, f64::NAN] {
            let params = SimpleConnectorParameters::default().with_intensity_tolerance(bad);
            assert!(
                matches!(
                    params.validate(),
                    Err(ConnectorConfigError::InvalidIntensityTolerance(_))
                ),
                "{bad} should be rejected"
            );
        }
        let params = SimpleConnectorParameters::default().with_intensity_tolerance(1.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_filters() {
        let params = SimpleConnectorParameters::default().with_minimum_peak_duration(-1.0);
        assert_eq!(
            params.validate(),
            Err(ConnectorConfigError::InvalidMinimumPeakDuration(-1.0))
        );
        let params = SimpleConnectorParameters::default().with_minimum_peak_height(-1.0);
        assert_eq!(
            params.validate(),
            Err(ConnectorConfigError::InvalidMinimumPeakHeight(-1.0))
        );
        let params = SimpleConnectorParameters::default().with_chromatographic_threshold(1.2);
        assert_eq!(
            params.validate(),
            Err(ConnectorConfigError::InvalidChromatographicThresholdLevel(1.2))
        );
        // Only checked while the filter is on
        let params = params.without_chromatographic_threshold();
        assert!(params.validate().is_ok());
    }
}
