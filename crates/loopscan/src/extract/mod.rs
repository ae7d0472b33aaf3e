//! Loop feature extraction: coercive field, remanent magnetization, noise
//! estimation, and enclosed loop area.

mod area;
mod estimate;
mod hc;
mod mrem;
mod noise;

pub use area::loop_area;
pub use estimate::Estimate;
pub use hc::{hc_of, HcOptions};
pub use mrem::{mrem_of, MremOptions};
pub use noise::{proj_sigma, sigma_y};
