use std::fmt;
use std::str::FromStr;

/// A transform applied to intensities before they are used as weights,
/// e.g. when computing the characteristic m/z of a [`ConnectedPeak`](super::ConnectedPeak).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Weighting {
    /// Every point has weight 1
    None,
    /// The intensity itself
    #[default]
    Linear,
    /// `log10(v)`, zero intensity gets zero weight
    Log10,
    /// `log2(v)`, zero intensity gets zero weight
    Log2,
    Sqrt,
    Cbrt,
}

impl Weighting {
    pub const ALL: [Weighting; 6] = [
        Self::None,
        Self::Linear,
        Self::Log10,
        Self::Log2,
        Self::Sqrt,
        Self::Cbrt,
    ];

    #[inline]
    pub fn transform(&self, value: f64) -> f64 {
        match self {
            Self::None => 1.0,
            Self::Linear => value,
            Self::Log10 => {
                if value == 0.0 {
                    0.0
                } else {
                    value.log10()
                }
            }
            Self::Log2 => {
                if value == 0.0 {
                    0.0
                } else {
                    value.log2()
                }
            }
            Self::Sqrt => value.sqrt(),
            Self::Cbrt => value.cbrt(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Linear => "LINEAR",
            Self::Log10 => "LOG10",
            Self::Log2 => "LOG2",
            Self::Sqrt => "SQRT",
            Self::Cbrt => "CBRT",
        }
    }
}

impl fmt::Display for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown weighting {0:?}")]
pub struct UnknownWeighting(pub String);

impl FromStr for Weighting {
    type Err = UnknownWeighting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|w| w.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownWeighting(s.to_string()))
    }
}
