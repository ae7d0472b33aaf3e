//! Integration tests for the batch scan analysis.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tempfile::TempDir;

use loopscan::{analyze_scan, standard_pipeline, LoopscanError, NameGleaner, ScanSettings};

/// Write a tab-separated loop file in instrument units: four equal quarters
/// starting at zero field, branches `tanh((0.1 x -/+ 5))`, so the analysis
/// pipeline's 0.1 field scaling lands the crossings at +/-5.
fn write_loop_file(path: &Path, q: usize) {
    let step = 200.0 / q as f64;
    let mut rows: Vec<(f64, f64)> = Vec::with_capacity(4 * q);
    for i in 0..q {
        let xi = i as f64 * step;
        rows.push((xi, (0.1 * xi - 5.0).tanh()));
    }
    for i in 0..q {
        let xi = 200.0 - i as f64 * step;
        rows.push((xi, (0.1 * xi + 5.0).tanh()));
    }
    for i in 0..q {
        let xi = -(i as f64) * step;
        rows.push((xi, (0.1 * xi + 5.0).tanh()));
    }
    for i in 0..q {
        let xi = -200.0 + i as f64 * step;
        rows.push((xi, (0.1 * xi - 5.0).tanh()));
    }

    let mut contents = String::from("field\tsignal\n");
    for (x, y) in rows {
        writeln!(contents, "{x}\t{y}").unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn settings() -> ScanSettings {
    ScanSettings {
        thresh: 15.0,
        max: 19.9,
        filt_ks: 5,
        ..ScanSettings::default()
    }
}

#[test]
fn test_analyze_scan_fills_the_grid() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("parameters.json"),
        r#"{"Rows": 1, "Cols": 2, "Sample": "Pt/Co/Pt"}"#,
    )
    .unwrap();

    // A good loop at (0, 0).
    write_loop_file(&dir.path().join("scan=1_x=0_y=0_averaged.dat"), 200);
    // A sweep at (1, 0) too short for the quarter partition: extraction
    // fails, the cell stays empty, the batch continues.
    fs::write(
        dir.path().join("scan=1_x=1_y=0_averaged.dat"),
        "field\tsignal\n1\t0.5\n2\t0.6\n3\t0.7\n4\t0.8\n5\t0.9\n6\t1.0\n",
    )
    .unwrap();
    // A raw (non-averaged) repeat that must be skipped entirely.
    fs::write(
        dir.path().join("scan=1_x=0_y=0_rep=4.dat"),
        "field\tsignal\n1\t1\n",
    )
    .unwrap();

    let settings = settings();
    let mut pipeline = standard_pipeline(&settings).unwrap();
    let gleaner = NameGleaner::scan_files().unwrap();
    let grid = analyze_scan(dir.path(), &mut pipeline, &gleaner, &settings).unwrap();

    assert_eq!(grid.rows, 1);
    assert_eq!(grid.cols, 2);

    let features = grid.cells[0][0].expect("the good loop must be analyzed");
    assert!((features.hc.central() - 5.0).abs() < 0.2, "Hc = {}", features.hc.central());
    assert!((features.mrem.central() - 1.0).abs() < 0.05);
    assert!(features.hc.sigma().is_some());
    assert_eq!(grid.hc[0][0], features.hc.central());
    assert_eq!(grid.mrem[0][0], features.mrem.central());

    // The failed cell keeps its sentinel.
    assert!(grid.cells[0][1].is_none());
    assert_eq!(grid.hc[0][1], 0.0);
    assert_eq!(grid.mrem[0][1], 0.0);
}

#[test]
fn test_analyze_scan_ignores_out_of_grid_positions() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("parameters.json"), r#"{"Rows": 1, "Cols": 1}"#).unwrap();
    write_loop_file(&dir.path().join("scan=1_x=0_y=0_averaged.dat"), 200);
    write_loop_file(&dir.path().join("scan=1_x=5_y=0_averaged.dat"), 200);

    let settings = settings();
    let mut pipeline = standard_pipeline(&settings).unwrap();
    let gleaner = NameGleaner::scan_files().unwrap();
    let grid = analyze_scan(dir.path(), &mut pipeline, &gleaner, &settings).unwrap();

    assert!(grid.cells[0][0].is_some());
}

#[test]
fn test_analyze_scan_requires_parameters() {
    let dir = TempDir::new().unwrap();
    let settings = settings();
    let mut pipeline = standard_pipeline(&settings).unwrap();
    let gleaner = NameGleaner::scan_files().unwrap();

    let err = analyze_scan(dir.path(), &mut pipeline, &gleaner, &settings).unwrap_err();
    assert!(matches!(err, LoopscanError::Io { .. }));
}

#[test]
fn test_analyze_scan_requires_grid_extent() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("parameters.json"), r#"{"Rows": 1}"#).unwrap();
    let settings = settings();
    let mut pipeline = standard_pipeline(&settings).unwrap();
    let gleaner = NameGleaner::scan_files().unwrap();

    let err = analyze_scan(dir.path(), &mut pipeline, &gleaner, &settings).unwrap_err();
    assert!(matches!(err, LoopscanError::MissingParameter(ref k) if k == "Cols"));
}

#[test]
fn test_analyze_scan_propagates_malformed_averaged_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("parameters.json"), r#"{"Rows": 1, "Cols": 1}"#).unwrap();
    fs::write(
        dir.path().join("scan=1_x=0_y=0_averaged.dat"),
        "field\tsignal\noops\t1.0\n",
    )
    .unwrap();

    let settings = settings();
    let mut pipeline = standard_pipeline(&settings).unwrap();
    let gleaner = NameGleaner::scan_files().unwrap();

    let err = analyze_scan(dir.path(), &mut pipeline, &gleaner, &settings).unwrap_err();
    assert!(matches!(err, LoopscanError::Parse { line: 2, .. }));
}
