//! Distribution/Profile Engine: histograms of closes and returns, and the volume
//! profile with its point of control and value area.
//!
//! Sample standard deviation (`n - 1`) is used for every `std_dev` reported here;
//! skewness and kurtosis are population standardized moments.

pub mod histogram;
pub mod price;
pub mod returns;
pub mod stats;
pub mod volume_profile;

pub use histogram::{DistributionBin, histogram};
pub use price::{PriceDistribution, PriceStatistics, price_distribution};
pub use returns::{Percentiles, ReturnDistribution, RiskMetrics, return_distribution};
pub use volume_profile::{
    PointOfControl, ProfileBin, VALUE_AREA_SHARE, ValueArea, VolumeProfile, volume_profile,
};
