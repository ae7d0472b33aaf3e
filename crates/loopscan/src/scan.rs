//! Batch analysis of a scanning measurement directory.
//!
//! A scan directory holds one averaged loop file per grid position, named so
//! a [`NameGleaner`] can recover the position, plus a `parameters.json`
//! cluster with the grid extent. [`analyze_scan`] runs every averaged loop
//! through a transform pipeline and extracts the coercive field and
//! remanent magnetization into a [`ScanGrid`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LoopscanError, Result};
use crate::extract::{hc_of, mrem_of, Estimate, HcOptions, MremOptions};
use crate::glean::{Gleaner, NameGleaner};
use crate::input::load_curve;
use crate::params::ParamCluster;
use crate::transform::{ops, Filter, TransformOptions, Transformer};

/// Settings of the standard scan analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Lower edge of the saturated segment used for noise fits.
    pub thresh: f64,
    /// Upper edge of the saturated segment.
    pub max: f64,
    /// Median filter window width for the raw loops.
    pub filt_ks: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            thresh: 7.0,
            max: 10.0,
            filt_ks: 157,
        }
    }
}

/// The features extracted from one loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopFeatures {
    pub hc: Estimate,
    pub mrem: Estimate,
}

/// Row-major grids of extracted loop features over a scan.
///
/// `hc` and `mrem` hold central values with `0.0` at positions where no
/// loop was analyzed; `cells` holds the full estimates, `None` where
/// extraction failed or no file existed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanGrid {
    pub rows: usize,
    pub cols: usize,
    pub hc: Vec<Vec<f64>>,
    pub mrem: Vec<Vec<f64>>,
    pub cells: Vec<Vec<Option<LoopFeatures>>>,
}

impl ScanGrid {
    fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            hc: vec![vec![0.0; cols]; rows],
            mrem: vec![vec![0.0; cols]; rows],
            cells: vec![vec![None; cols]; rows],
        }
    }

    fn set(&mut self, row: usize, col: usize, features: LoopFeatures) {
        self.hc[row][col] = features.hc.central();
        self.mrem[row][col] = features.mrem.central();
        self.cells[row][col] = Some(features);
    }
}

/// The standard raw-loop pipeline: field scaling to the display unit at
/// slot 10 and a periodic median filter at slot 30, leaving the gaps for
/// per-scan corrections.
pub fn standard_pipeline(settings: &ScanSettings) -> Result<Transformer> {
    let mut transformer = Transformer::new();
    transformer.add(
        10,
        "scale",
        ops::scale,
        TransformOptions::new().with_xsc(0.1),
        Filter::Any,
    )?;
    transformer.add(
        30,
        "wrapped_medfilt",
        ops::wrapped_medfilt,
        TransformOptions::new().with_ks(settings.filt_ks),
        Filter::Any,
    )?;
    Ok(transformer)
}

/// Analyze every averaged loop file under `root` into a [`ScanGrid`].
///
/// The grid extent comes from `Rows` and `Cols` in `root/parameters.json`.
/// Files whose gleaned fields lack the `averaged` marker are skipped, as
/// are files with unparseable or out-of-grid positions. Load and transform
/// failures abort the batch; a failed feature extraction only logs a
/// warning and leaves that cell empty.
pub fn analyze_scan(
    root: impl AsRef<Path>,
    transformer: &mut Transformer,
    gleaner: &NameGleaner,
    settings: &ScanSettings,
) -> Result<ScanGrid> {
    let root = root.as_ref();
    let params = ParamCluster::from_file(root.join("parameters.json"))?;
    let rows = params.get_usize("Rows")?;
    let cols = params.get_usize("Cols")?;
    let mut grid = ScanGrid::empty(rows, cols);

    let hc_options = HcOptions::new().with_fit_interval(settings.thresh, settings.max);
    let mrem_options = MremOptions::new().with_fit_interval(settings.thresh, settings.max);

    transformer.reset_run();

    let mut paths: Vec<_> = std::fs::read_dir(root)
        .map_err(|source| LoopscanError::Io {
            path: root.to_path_buf(),
            source,
        })?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    for path in paths {
        let target = path.to_string_lossy().into_owned();
        let fields = gleaner.glean(&target);
        if fields.get("averaged").map_or(true, |v| v.is_empty()) {
            log::debug!("skipping non-averaged file {target}");
            continue;
        }
        let Some((col, row)) = grid_position(&fields) else {
            log::warn!("skipping {target}: no grid position in the file name");
            continue;
        };
        if row >= rows || col >= cols {
            log::warn!("skipping {target}: position ({col}, {row}) outside the {cols}x{rows} grid");
            continue;
        }

        let curve = transformer.apply(load_curve(&path)?, &target)?;
        match (hc_of(&curve, &hc_options), mrem_of(&curve, &mrem_options)) {
            (Ok(hc), Ok(mrem)) => {
                log::info!(
                    "({col}, {row}): Hc = {:.4}, Mrem = {:.4}",
                    hc.central(),
                    mrem.central()
                );
                grid.set(row, col, LoopFeatures { hc, mrem });
            }
            (hc, mrem) => {
                for err in hc.err().into_iter().chain(mrem.err()) {
                    log::warn!("extraction failed for {target}: {err}");
                }
            }
        }
    }
    Ok(grid)
}

fn grid_position(fields: &indexmap::IndexMap<String, String>) -> Option<(usize, usize)> {
    let col = fields.get("x")?.parse().ok()?;
    let row = fields.get("y")?.parse().ok()?;
    Some((col, row))
}
