use std::io::{BufRead, Write};

use ndarray::{Array1, Array2, ArrayView1};
use tracing::debug;

use crate::activations::Activation;
use crate::error::{LearnError, Result};
use crate::layers::{DenseLayer, WeightInit};
use crate::optimizer::{Momentum, Optimizer};
use crate::q_function::QFunction;

const HIDDEN: usize = 0;
const OUTPUT: usize = 1;

/// A feed-forward regression network with one hidden layer and a single output.
///
/// Hidden units use the configured activation; the output unit is a sigmoid
/// bounded by `[output_lower, output_upper]`. Training is plain backpropagation
/// on the squared error with a momentum term. The network must be seeded with
/// [`NeuralNetwork::initialize_weights`] (or loaded) before it answers queries.
#[derive(Clone, Debug)]
pub struct NeuralNetwork {
    pub hidden: DenseLayer,
    pub output: DenseLayer,
    pub optimizer: Momentum,
    weight_init: WeightInit,
    initialized: bool,
}

impl NeuralNetwork {
    /// Create a network with the given activation, layer sizes, learning rate,
    /// momentum coefficient and output bounds.
    pub fn new(
        activation: Activation,
        num_inputs: usize,
        num_hidden: usize,
        learning_rate: f64,
        momentum: f64,
        output_lower: f64,
        output_upper: f64,
    ) -> Result<Self> {
        if num_inputs == 0 || num_hidden == 0 {
            return Err(LearnError::invalid_parameter(
                "layer_sizes".to_string(),
                format!("inputs ({}) and hidden units ({}) must be non-zero", num_inputs, num_hidden),
            ));
        }
        if !(learning_rate > 0.0) {
            return Err(LearnError::invalid_parameter(
                "learning_rate".to_string(),
                format!("must be positive, got {}", learning_rate),
            ));
        }
        if !(0.0..1.0).contains(&momentum) {
            return Err(LearnError::invalid_parameter(
                "momentum".to_string(),
                format!("must lie in [0, 1), got {}", momentum),
            ));
        }
        if !(output_lower < output_upper) {
            return Err(LearnError::invalid_parameter(
                "output_bounds".to_string(),
                format!("lower ({}) must be below upper ({})", output_lower, output_upper),
            ));
        }

        let hidden = DenseLayer::new(num_inputs, num_hidden, activation);
        let output = DenseLayer::new(
            num_hidden,
            1,
            Activation::Bounded {
                lower: output_lower,
                upper: output_upper,
            },
        );
        let optimizer = Momentum::new(&[&hidden, &output], learning_rate, momentum);

        Ok(NeuralNetwork {
            hidden,
            output,
            optimizer,
            weight_init: WeightInit::default(),
            initialized: false,
        })
    }

    pub fn with_weight_init(mut self, weight_init: WeightInit) -> Self {
        self.weight_init = weight_init;
        self
    }

    pub fn num_inputs(&self) -> usize {
        self.hidden.input_size()
    }

    pub fn num_hidden(&self) -> usize {
        self.hidden.output_size()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Seed every weight and bias from the configured initializer and clear momentum.
    pub fn initialize_weights(&mut self) {
        self.hidden.initialize(self.weight_init);
        self.output.initialize(self.weight_init);
        self.optimizer.reset();
        self.initialized = true;
    }

    /// Zero the momentum accumulators so the next update carries no previous change.
    pub fn reset_momentum(&mut self) {
        self.optimizer.reset();
    }

    fn check_ready(&self, x: &[f64]) -> Result<()> {
        if !self.initialized {
            return Err(LearnError::NotReady(
                "neural network queried before initialize_weights() or load()".to_string(),
            ));
        }
        if x.len() != self.num_inputs() {
            return Err(LearnError::dimension_mismatch(
                format!("{} inputs", self.num_inputs()),
                format!("{} inputs", x.len()),
            ));
        }
        Ok(())
    }

    fn forward(&mut self, input: ArrayView1<f64>) -> Array1<f64> {
        let hidden = self.hidden.forward(input);
        self.output.forward(hidden.view())
    }

    /// One backpropagation step on `0.5 * (y - target)^2`; returns the error before the step.
    fn backpropagate(&mut self, x: &[f64], target: f64) -> Result<f64> {
        let input = ArrayView1::from(x);
        let prediction = self.forward(input)[0];
        let output_error = Array1::from_elem(1, prediction - target);

        let missing = || LearnError::NotReady("no forward pass recorded".to_string());
        let (output_delta, output_w_grad, output_b_grad) =
            self.output.backward(output_error.view()).ok_or_else(missing)?;
        let hidden_error = self.output.weights.dot(&output_delta);
        let (_, hidden_w_grad, hidden_b_grad) =
            self.hidden.backward(hidden_error.view()).ok_or_else(missing)?;

        self.optimizer.update_weights(OUTPUT, &mut self.output.weights, &output_w_grad);
        self.optimizer.update_biases(OUTPUT, &mut self.output.biases, &output_b_grad);
        self.optimizer.update_weights(HIDDEN, &mut self.hidden.weights, &hidden_w_grad);
        self.optimizer.update_biases(HIDDEN, &mut self.hidden.biases, &hidden_b_grad);

        Ok(prediction - target)
    }

    fn write_weights(&self, writer: &mut dyn Write) -> std::io::Result<()> {
        writeln!(writer, "inputs\t{}", self.num_inputs())?;
        writeln!(writer, "hidden\t{}", self.num_hidden())?;
        for ((i, j), w) in self.hidden.weights.indexed_iter() {
            writeln!(writer, "hidden_weight\t{}\t{}\t{:?}", i, j, w)?;
        }
        for (j, b) in self.hidden.biases.iter().enumerate() {
            writeln!(writer, "hidden_bias\t{}\t{:?}", j, b)?;
        }
        for ((j, _), w) in self.output.weights.indexed_iter() {
            writeln!(writer, "output_weight\t{}\t{:?}", j, w)?;
        }
        writeln!(writer, "output_bias\t{:?}", self.output.biases[0])?;
        Ok(())
    }
}

fn parse_field<T: std::str::FromStr>(field: Option<&str>, what: &str, line: usize) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    let field = field.ok_or_else(|| LearnError::parse(line, format!("missing {}", what)))?;
    field
        .parse::<T>()
        .map_err(|e| LearnError::parse(line, format!("bad {} '{}': {}", what, field, e)))
}

/// Which records a weights file has supplied so far
struct RecordsSeen {
    inputs: bool,
    hidden: bool,
    hidden_weights: Array2<bool>,
    hidden_biases: Array1<bool>,
    output_weights: Array1<bool>,
    output_bias: bool,
}

impl RecordsSeen {
    fn new(num_inputs: usize, num_hidden: usize) -> Self {
        RecordsSeen {
            inputs: false,
            hidden: false,
            hidden_weights: Array2::from_elem((num_inputs, num_hidden), false),
            hidden_biases: Array1::from_elem(num_hidden, false),
            output_weights: Array1::from_elem(num_hidden, false),
            output_bias: false,
        }
    }

    fn first_missing(&self) -> Option<String> {
        if !self.inputs {
            return Some("an inputs header".to_string());
        }
        if !self.hidden {
            return Some("a hidden header".to_string());
        }
        if let Some(((i, j), _)) = self.hidden_weights.indexed_iter().find(|&(_, &s)| !s) {
            return Some(format!("hidden_weight {} {}", i, j));
        }
        if let Some((j, _)) = self.hidden_biases.indexed_iter().find(|&(_, &s)| !s) {
            return Some(format!("hidden_bias {}", j));
        }
        if let Some((j, _)) = self.output_weights.indexed_iter().find(|&(_, &s)| !s) {
            return Some(format!("output_weight {}", j));
        }
        if !self.output_bias {
            return Some("an output_bias".to_string());
        }
        None
    }
}

fn mark(flag: &mut bool, record: &str, line: usize) -> Result<()> {
    if *flag {
        return Err(LearnError::parse(line, format!("duplicate {} record", record)));
    }
    *flag = true;
    Ok(())
}

fn check_index(index: usize, bound: usize, what: &str, line: usize) -> Result<usize> {
    if index >= bound {
        return Err(LearnError::parse(line, format!("{} index {} out of range 0..{}", what, index, bound)));
    }
    Ok(index)
}

impl QFunction for NeuralNetwork {
    fn output_for(&self, x: &[f64]) -> Result<f64> {
        self.check_ready(x)?;
        let hidden = self.hidden.evaluate(ArrayView1::from(x));
        Ok(self.output.evaluate(hidden.view())[0])
    }

    fn train(&mut self, x: &[f64], target: f64) -> Result<()> {
        self.check_ready(x)?;
        let error = self.backpropagate(x, target)?;
        debug!(target, error, "network trained");
        Ok(())
    }

    fn save(&self, writer: &mut dyn Write) -> Result<()> {
        if !self.initialized {
            return Err(LearnError::NotReady("cannot save an uninitialized network".to_string()));
        }
        self.write_weights(writer)?;
        Ok(())
    }

    fn load(&mut self, reader: &mut dyn BufRead) -> Result<()> {
        let (num_inputs, num_hidden) = (self.num_inputs(), self.num_hidden());
        let mut hidden = self.hidden.clone();
        let mut output = self.output.clone();
        let mut seen = RecordsSeen::new(num_inputs, num_hidden);
        let mut last_line = 0;

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = number + 1;
            last_line = line_no;
            if line.trim().is_empty() {
                continue;
            }

            let mut fields = line.trim_end().split('\t');
            let record = fields.next().unwrap_or_default();
            match record {
                "inputs" | "hidden" => {
                    let expected = if record == "inputs" { num_inputs } else { num_hidden };
                    let found: usize = parse_field(fields.next(), record, line_no)?;
                    if found != expected {
                        return Err(LearnError::dimension_mismatch(
                            format!("{} {}", expected, record),
                            format!("{} {} in saved weights", found, record),
                        ));
                    }
                    let flag = if record == "inputs" { &mut seen.inputs } else { &mut seen.hidden };
                    mark(flag, record, line_no)?;
                }
                "hidden_weight" => {
                    let i = check_index(parse_field(fields.next(), "input index", line_no)?, num_inputs, "input", line_no)?;
                    let j = check_index(parse_field(fields.next(), "hidden index", line_no)?, num_hidden, "hidden", line_no)?;
                    hidden.weights[[i, j]] = parse_field(fields.next(), "weight", line_no)?;
                    mark(&mut seen.hidden_weights[[i, j]], record, line_no)?;
                }
                "hidden_bias" => {
                    let j = check_index(parse_field(fields.next(), "hidden index", line_no)?, num_hidden, "hidden", line_no)?;
                    hidden.biases[j] = parse_field(fields.next(), "bias", line_no)?;
                    mark(&mut seen.hidden_biases[j], record, line_no)?;
                }
                "output_weight" => {
                    let j = check_index(parse_field(fields.next(), "hidden index", line_no)?, num_hidden, "hidden", line_no)?;
                    output.weights[[j, 0]] = parse_field(fields.next(), "weight", line_no)?;
                    mark(&mut seen.output_weights[j], record, line_no)?;
                }
                "output_bias" => {
                    output.biases[0] = parse_field(fields.next(), "bias", line_no)?;
                    mark(&mut seen.output_bias, record, line_no)?;
                }
                other => {
                    return Err(LearnError::parse(line_no, format!("unknown record '{}'", other)));
                }
            }

            if fields.next().is_some() {
                return Err(LearnError::parse(line_no, "trailing fields"));
            }
        }

        if let Some(missing) = seen.first_missing() {
            return Err(LearnError::parse(last_line, format!("weights file ended without {}", missing)));
        }

        self.hidden = hidden;
        self.output = output;
        self.optimizer.reset();
        self.initialized = true;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "neural_network"
    }
}
