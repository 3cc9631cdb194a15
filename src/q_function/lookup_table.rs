use std::io::{BufRead, Write};

use ndarray::Array5;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use serde::{Serialize, Deserialize};
use tracing::{debug, warn};

use super::QFunction;
use crate::error::{LearnError, Result};
use crate::types::KEY_LEN;

/// Largest cardinality a fixed-width key can address: one decimal digit per axis
pub const FIXED_WIDTH_MAX_DIM: usize = 10;

/// How a cell address is written in the persisted table
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyEncoding {
    /// Five characters, one digit per axis (`"01234"`). Every axis must have at most 10 buckets.
    #[default]
    FixedWidth,
    /// Comma-separated indices (`"0,1,2,3,4"`), no cardinality limit.
    Delimited,
}

/// Exact tabular Q-function.
///
/// A dense `[d1][d2][d3][d4][actions]` array of values with an identically shaped
/// array of visit counts. Cells are addressed by truncating each key component
/// toward zero.
#[derive(Clone, Debug)]
pub struct LookupTable {
    values: Array5<f64>,
    visits: Array5<u32>,
    dims: [usize; KEY_LEN],
    random_init: bool,
    key_encoding: KeyEncoding,
}

impl LookupTable {
    /// Create a table for four state axes and the action axis, then initialize it.
    pub fn new(dims: [usize; KEY_LEN], random_init: bool) -> Result<Self> {
        Self::with_encoding(dims, random_init, KeyEncoding::FixedWidth)
    }

    pub fn with_encoding(dims: [usize; KEY_LEN], random_init: bool, key_encoding: KeyEncoding) -> Result<Self> {
        if let Some(axis) = dims.iter().position(|&d| d == 0) {
            return Err(LearnError::invalid_parameter(
                "dims".to_string(),
                format!("axis {} has zero cardinality", axis),
            ));
        }
        if key_encoding == KeyEncoding::FixedWidth {
            if let Some(axis) = dims.iter().position(|&d| d > FIXED_WIDTH_MAX_DIM) {
                return Err(LearnError::invalid_parameter(
                    "dims".to_string(),
                    format!(
                        "axis {} has {} buckets; fixed-width keys allow at most {}, use delimited keys",
                        axis, dims[axis], FIXED_WIDTH_MAX_DIM
                    ),
                ));
            }
        }

        let mut table = LookupTable {
            values: Array5::zeros(dims),
            visits: Array5::zeros(dims),
            dims,
            random_init,
            key_encoding,
        };
        table.initialize(random_init);
        Ok(table)
    }

    /// Fill every value with uniform `[0, 1)` noise (or zero) and clear all visit counts.
    pub fn initialize(&mut self, random_init: bool) {
        self.random_init = random_init;
        self.values = if random_init {
            Array5::random(self.dims, Uniform::new(0.0, 1.0))
        } else {
            Array5::zeros(self.dims)
        };
        self.visits.fill(0);
    }

    pub fn dims(&self) -> [usize; KEY_LEN] {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn key_encoding(&self) -> KeyEncoding {
        self.key_encoding
    }

    /// Number of times `x` has been trained.
    pub fn visit_count(&self, x: &[f64]) -> Result<u32> {
        let index = self.index(x)?;
        Ok(self.visits[index])
    }

    fn index(&self, x: &[f64]) -> Result<[usize; KEY_LEN]> {
        if x.len() != KEY_LEN {
            return Err(LearnError::dimension_mismatch(
                format!("{} key components", KEY_LEN),
                format!("{} key components", x.len()),
            ));
        }
        let mut index = [0usize; KEY_LEN];
        for (axis, (&component, &dim)) in x.iter().zip(self.dims.iter()).enumerate() {
            let truncated = component.trunc();
            if !(truncated >= 0.0 && truncated < dim as f64) {
                return Err(LearnError::IndexOutOfRange { axis, index: component, dim });
            }
            index[axis] = truncated as usize;
        }
        Ok(index)
    }

    fn format_key(&self, index: [usize; KEY_LEN]) -> String {
        let parts = index.iter().map(|i| i.to_string());
        match self.key_encoding {
            KeyEncoding::FixedWidth => parts.collect::<String>(),
            KeyEncoding::Delimited => parts.collect::<Vec<_>>().join(","),
        }
    }

    /// Decode either key encoding. Fixed-width keys are read by character position.
    fn parse_key(&self, key: &str, line: usize) -> Result<[usize; KEY_LEN]> {
        let components: Vec<usize> = if key.contains(',') {
            key.split(',')
                .map(|part| {
                    part.trim()
                        .parse::<usize>()
                        .map_err(|e| LearnError::parse(line, format!("bad key component '{}': {}", part, e)))
                })
                .collect::<Result<_>>()?
        } else {
            key.chars()
                .map(|c| {
                    c.to_digit(10)
                        .map(|d| d as usize)
                        .ok_or_else(|| LearnError::parse(line, format!("bad key digit '{}' in '{}'", c, key)))
                })
                .collect::<Result<_>>()?
        };

        if components.len() != KEY_LEN {
            return Err(LearnError::parse(
                line,
                format!("key '{}' has {} components, expected {}", key, components.len(), KEY_LEN),
            ));
        }

        let mut index = [0usize; KEY_LEN];
        for (axis, (&component, &dim)) in components.iter().zip(self.dims.iter()).enumerate() {
            if component >= dim {
                return Err(LearnError::dimension_mismatch(
                    format!("axis {} index below {}", axis, dim),
                    format!("index {} on line {}", component, line),
                ));
            }
            index[axis] = component;
        }
        Ok(index)
    }
}

impl QFunction for LookupTable {
    fn output_for(&self, x: &[f64]) -> Result<f64> {
        let index = self.index(x)?;
        Ok(self.values[index])
    }

    fn train(&mut self, x: &[f64], target: f64) -> Result<()> {
        let index = self.index(x)?;
        self.values[index] = target;
        self.visits[index] += 1;
        Ok(())
    }

    fn save(&self, writer: &mut dyn Write) -> Result<()> {
        for ((a, b, c, d, e), value) in self.values.indexed_iter() {
            let index = [a, b, c, d, e];
            writeln!(writer, "{}\t{:?}\t{}", self.format_key(index), value, self.visits[index])?;
        }
        Ok(())
    }

    fn load(&mut self, reader: &mut dyn BufRead) -> Result<()> {
        let mut values = self.values.clone();
        let mut visits = self.visits.clone();
        let mut records = 0usize;

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = number + 1;
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.trim_end().split('\t').collect();
            if fields.len() != 3 {
                return Err(LearnError::parse(
                    line_no,
                    format!("expected 3 tab-separated fields, found {}", fields.len()),
                ));
            }

            let index = self.parse_key(fields[0], line_no)?;
            let value = fields[1]
                .parse::<f64>()
                .map_err(|e| LearnError::parse(line_no, format!("bad value '{}': {}", fields[1], e)))?;
            let count = fields[2]
                .parse::<u32>()
                .map_err(|e| LearnError::parse(line_no, format!("bad visit count '{}': {}", fields[2], e)))?;

            values[index] = value;
            visits[index] = count;
            records += 1;
        }

        self.values = values;
        self.visits = visits;
        if records != self.len() {
            warn!(records, cells = self.len(), "partial lookup table restored, unlisted cells kept");
        }
        debug!(records, "lookup table records restored");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "lookup_table"
    }

    fn key_dims(&self) -> Option<[usize; KEY_LEN]> {
        Some(self.dims)
    }
}
