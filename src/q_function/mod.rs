//! # Q-Function Backends
//!
//! A Q-function maps a state-action key to a scalar value estimate and can be
//! nudged toward a target. The learning controller only ever talks to the
//! [`QFunction`] trait, so the exact lookup table and the trainable network are
//! interchangeable.
//!
//! - [`LookupTable`]: dense 5-dimensional table plus visit counts
//! - [`NeuralNetwork`](crate::network::NeuralNetwork): one-hidden-layer regression network
//!
//! Both persist to human-readable UTF-8 text.

pub mod lookup_table;

pub use lookup_table::{KeyEncoding, LookupTable};

use std::fs::File;
use std::io::{BufReader, BufWriter, BufRead, Write};
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::types::KEY_LEN;

/// The capability set shared by every Q-function backend.
pub trait QFunction {
    /// Current estimate for the state-action vector `x`.
    fn output_for(&self, x: &[f64]) -> Result<f64>;

    /// Move the estimate for `x` toward `target`.
    fn train(&mut self, x: &[f64], target: f64) -> Result<()>;

    /// Write the full backend state as text.
    fn save(&self, writer: &mut dyn Write) -> Result<()>;

    /// Replace the backend state with one previously written by [`QFunction::save`].
    ///
    /// On error the backend is left as it was before the call.
    fn load(&mut self, reader: &mut dyn BufRead) -> Result<()>;

    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    /// Cardinality of each key component, for backends that address discrete cells.
    fn key_dims(&self) -> Option<[usize; KEY_LEN]> {
        None
    }
}

/// Save a backend to `path`, creating or truncating the file.
pub fn save_to_path(q_function: &dyn QFunction, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    q_function.save(&mut writer)?;
    writer.flush()?;
    info!(backend = q_function.name(), path = %path.display(), "saved q-function");
    Ok(())
}

/// Load a backend from `path`.
pub fn load_from_path(q_function: &mut dyn QFunction, path: &Path) -> Result<()> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    q_function.load(&mut reader)?;
    info!(backend = q_function.name(), path = %path.display(), "loaded q-function");
    Ok(())
}
