//! Acquisition parameter clusters.
//!
//! A scan directory carries a `parameters.json` describing the acquisition
//! (grid extent, dwell times, instrument settings). The cluster is kept as a
//! dynamic value with typed getters, since only a handful of keys matter to
//! the analysis and the rest varies by instrument.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{LoopscanError, Result};

/// A nested key/value parameter cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamCluster {
    root: Value,
}

impl ParamCluster {
    /// Load a cluster from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| LoopscanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            root: serde_json::from_str(&contents)?,
        })
    }

    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Raw access to a top-level entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    pub fn get_f64(&self, key: &str) -> Result<f64> {
        self.get(key)
            .and_then(Value::as_f64)
            .ok_or_else(|| LoopscanError::MissingParameter(key.to_string()))
    }

    pub fn get_usize(&self, key: &str) -> Result<usize> {
        self.get(key)
            .and_then(Value::as_u64)
            .map(|v| v as usize)
            .ok_or_else(|| LoopscanError::MissingParameter(key.to_string()))
    }

    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| LoopscanError::MissingParameter(key.to_string()))
    }
}
