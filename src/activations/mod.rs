//! # Activation Functions Module
//!
//! Squashing functions for the regression backend's hidden and output units.
//!
//! ## Available Activations
//!
//! - **Binary**: `1 / (1 + e^(-x))`, outputs between 0 and 1
//! - **Bipolar**: `2 / (1 + e^(-x)) - 1`, outputs between -1 and 1
//! - **Bounded**: the logistic curve rescaled into an arbitrary `[lower, upper]`
//! - **Linear**: identity
//!
//! Derivatives are computed from the unit's output rather than its input,
//! which is what backpropagation has at hand after a forward pass:
//! for an output `y` in `[a, b]` the slope is `(y - a)(b - y) / (b - a)`.
//!
//! ```rust
//! use tdlearn::activations::Activation;
//!
//! let bipolar = Activation::Bipolar;
//! assert_eq!(bipolar.value(0.0), 0.0);
//! assert_eq!(bipolar.derivative_from_output(0.0), 0.5);
//! ```

pub mod functions;

pub use functions::Activation;
