pub use crate::connector::PeakBuilder;
pub use mzpeaks::feature::TimeInterval;
pub use mzpeaks::CentroidLike;
