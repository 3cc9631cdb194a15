//! Mapping from raw observations to the state vector a Q-function consumes.

use serde::{Serialize, Deserialize};

use crate::error::{LearnError, Result};
use crate::types::{State, STATE_AXES};

/// Raw readings delivered by the host simulation on each scan event
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub x: f64,
    pub y: f64,
    pub distance: f64,
    /// Bearing to the opponent in degrees, `[-180, 180)`
    pub bearing: f64,
    pub energy: f64,
}

impl Observation {
    pub fn new(x: f64, y: f64, distance: f64, bearing: f64, energy: f64) -> Self {
        Observation { x, y, distance, bearing, energy }
    }

    pub fn field(&self, field: ObservationField) -> f64 {
        match field {
            ObservationField::X => self.x,
            ObservationField::Y => self.y,
            ObservationField::Distance => self.distance,
            ObservationField::Bearing => self.bearing,
            ObservationField::Energy => self.energy,
        }
    }
}

/// Which observation reading feeds an axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationField {
    X,
    Y,
    Distance,
    Bearing,
    Energy,
}

/// Per-axis quantization rule
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AxisQuantizer {
    /// `floor(v / width)`, clamped into `[0, buckets)`
    Linear { width: f64, buckets: usize },
    /// `floor((v + 180) / width)`, clamped into `[0, buckets)`
    Bearing { width: f64, buckets: usize },
    /// Non-uniform energy breakpoints at 0, 33 and 66
    Energy,
    /// Continuous `v / factor`, for function approximators
    Scaled { factor: f64 },
}

impl AxisQuantizer {
    pub fn quantize(&self, value: f64) -> f64 {
        match *self {
            AxisQuantizer::Linear { width, buckets } => bucket(value / width, buckets),
            AxisQuantizer::Bearing { width, buckets } => bucket((value + 180.0) / width, buckets),
            AxisQuantizer::Energy => energy_bucket(value) as f64,
            AxisQuantizer::Scaled { factor } => value / factor,
        }
    }

    /// Number of buckets, or `None` for a continuous axis.
    pub fn cardinality(&self) -> Option<usize> {
        match *self {
            AxisQuantizer::Linear { buckets, .. } | AxisQuantizer::Bearing { buckets, .. } => Some(buckets),
            AxisQuantizer::Energy => Some(4),
            AxisQuantizer::Scaled { .. } => None,
        }
    }

    pub(crate) fn validate(&self) -> std::result::Result<(), String> {
        match *self {
            AxisQuantizer::Linear { width, buckets } | AxisQuantizer::Bearing { width, buckets } => {
                if !(width > 0.0) {
                    return Err(format!("bucket width must be positive, got {}", width));
                }
                if buckets == 0 {
                    return Err("bucket count must be non-zero".to_string());
                }
                Ok(())
            }
            AxisQuantizer::Energy => Ok(()),
            AxisQuantizer::Scaled { factor } => {
                if factor == 0.0 || !factor.is_finite() {
                    return Err(format!("scale factor must be finite and non-zero, got {}", factor));
                }
                Ok(())
            }
        }
    }
}

fn bucket(scaled: f64, buckets: usize) -> f64 {
    let index = scaled.floor().max(0.0) as usize;
    index.min(buckets.saturating_sub(1)) as f64
}

/// Energy bucket: exactly 0 (or below) is bucket 0, then `(0, 33]`, `(33, 66]`, above 66.
pub fn energy_bucket(energy: f64) -> usize {
    if energy <= 0.0 {
        0
    } else if energy <= 33.0 {
        1
    } else if energy <= 66.0 {
        2
    } else {
        3
    }
}

/// One state axis: where its reading comes from and how it is bucketed
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub field: ObservationField,
    pub quantizer: AxisQuantizer,
}

impl AxisSpec {
    pub fn new(field: ObservationField, quantizer: AxisQuantizer) -> Self {
        AxisSpec { field, quantizer }
    }
}

/// Maps an [`Observation`] to a [`State`], one [`AxisSpec`] per axis
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quantizer {
    pub axes: [AxisSpec; STATE_AXES],
}

impl Quantizer {
    pub fn new(axes: [AxisSpec; STATE_AXES]) -> Self {
        Quantizer { axes }
    }

    /// x (8 buckets of 100), y (6 buckets of 100), distance (4 buckets of 250),
    /// bearing (4 buckets of 90 degrees).
    pub fn lookup_table() -> Self {
        Quantizer::new([
            AxisSpec::new(ObservationField::X, AxisQuantizer::Linear { width: 100.0, buckets: 8 }),
            AxisSpec::new(ObservationField::Y, AxisQuantizer::Linear { width: 100.0, buckets: 6 }),
            AxisSpec::new(ObservationField::Distance, AxisQuantizer::Linear { width: 250.0, buckets: 4 }),
            AxisSpec::new(ObservationField::Bearing, AxisQuantizer::Bearing { width: 90.0, buckets: 4 }),
        ])
    }

    /// Continuous x, y and distance scaled by 100, energy scaled by 10.
    pub fn neural() -> Self {
        Quantizer::new([
            AxisSpec::new(ObservationField::X, AxisQuantizer::Scaled { factor: 100.0 }),
            AxisSpec::new(ObservationField::Y, AxisQuantizer::Scaled { factor: 100.0 }),
            AxisSpec::new(ObservationField::Distance, AxisQuantizer::Scaled { factor: 100.0 }),
            AxisSpec::new(ObservationField::Energy, AxisQuantizer::Scaled { factor: 10.0 }),
        ])
    }

    pub fn quantize(&self, observation: &Observation) -> State {
        let mut values = [0.0; STATE_AXES];
        for (value, axis) in values.iter_mut().zip(self.axes.iter()) {
            *value = axis.quantizer.quantize(observation.field(axis.field));
        }
        State::from_array(values)
    }

    /// Bucket counts per axis, or `None` if any axis is continuous.
    pub fn cardinalities(&self) -> Option<[usize; STATE_AXES]> {
        let mut dims = [0; STATE_AXES];
        for (dim, axis) in dims.iter_mut().zip(self.axes.iter()) {
            *dim = axis.quantizer.cardinality()?;
        }
        Some(dims)
    }

    pub fn is_discrete(&self) -> bool {
        self.cardinalities().is_some()
    }

    /// Check every axis rule, naming the first offending axis.
    pub fn validate(&self) -> Result<()> {
        for (axis, spec) in self.axes.iter().enumerate() {
            spec.quantizer
                .validate()
                .map_err(|reason| LearnError::invalid_parameter(format!("quantizer axis {} ({:?})", axis, spec.field), reason))?;
        }
        Ok(())
    }
}

impl Default for Quantizer {
    fn default() -> Self {
        Self::lookup_table()
    }
}
