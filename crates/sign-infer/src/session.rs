use crate::{InferError, Tensor};
use std::collections::HashMap;

/// One loaded model. Sessions hold whatever backend resources the
/// model needs and release them on drop.
pub trait Session {
    fn run(&mut self, inputs: &[(&str, Tensor)]) -> Result<HashMap<String, Tensor>, InferError>;
    fn input_names(&self) -> &[String];
    fn output_names(&self) -> &[String];
}
