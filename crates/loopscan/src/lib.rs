//! Loopscan: hysteresis-loop processing for scanning magneto-optic
//! measurements.
//!
//! A measured loop arrives as a raw field sweep with instrument offsets,
//! drift, and noise. Loopscan cleans it through an ordered, filterable
//! transform pipeline and extracts the loop parameters (coercive field,
//! remanent magnetization) with uncertainties.
//!
//! # Core Principles
//!
//! - **Composable**: transforms are uniform functions arranged by integer
//!   slot, so a pipeline can be assembled, inspected, and spliced
//! - **Selective**: each pipeline entry carries a filter, applying it to
//!   every curve, to path-matched curves, or by gleaned metadata
//! - **Honest uncertainties**: extracted parameters carry a one-sigma
//!   bracket, degraded to a distinguishable point estimate when no
//!   uncertainty can be derived
//!
//! # Example
//!
//! ```
//! use loopscan::{Curve, Filter, TransformOptions, Transformer};
//! use loopscan::transform::ops;
//!
//! let mut pipeline = Transformer::new();
//! pipeline
//!     .add(10, "scale", ops::scale, TransformOptions::new().with_xsc(0.1), Filter::Any)
//!     .unwrap();
//!
//! let curve = Curve::new(vec![100.0, -100.0], vec![1.0, -1.0]).unwrap();
//! let curve = pipeline.apply(curve, "loop.dat").unwrap();
//! assert_eq!(curve.x(), &[10.0, -10.0]);
//! ```

pub mod curve;
pub mod error;
pub mod extract;
pub mod glean;
pub mod input;
pub mod numeric;
pub mod params;
pub mod scan;
pub mod transform;

pub use curve::{Axis, Curve, Limit};
pub use error::{LoopscanError, Result};
pub use extract::{hc_of, loop_area, mrem_of, proj_sigma, sigma_y, Estimate, HcOptions, MremOptions};
pub use glean::{Gleaner, NameGleaner};
pub use input::load_curve;
pub use params::ParamCluster;
pub use scan::{analyze_scan, standard_pipeline, LoopFeatures, ScanGrid, ScanSettings};
pub use transform::{Filter, Polarity, RunState, TransformOptions, Transformer};
