use crate::{Backend, Device, InferError, ModelSource, Session, Tensor};
use log::debug;
use ndarray::ArrayD;
use ort::{inputs, session::Session as OrtSession, value::TensorRef};
use std::collections::HashMap;

pub struct OnnxBackend {
    device: Device,
}

impl OnnxBackend {
    pub fn new(device: Device) -> Self {
        Self { device }
    }
}

impl Backend for OnnxBackend {
    fn name(&self) -> &str {
        "onnx"
    }

    fn load_model(&self, model: ModelSource) -> Result<Box<dyn Session>, InferError> {
        let mut builder = OrtSession::builder()
            .map_err(|e| InferError::BackendError(format!("failed to create session builder: {e}")))?;

        builder = match &self.device {
            Device::Cpu => {
                debug!("onnx: using CPU execution provider");
                builder
            }
            #[cfg(feature = "cuda")]
            Device::Cuda { device_id } => {
                use ort::execution_providers::CUDAExecutionProvider;
                let ep = CUDAExecutionProvider::default().with_device_id(*device_id);
                debug!("onnx: CUDA execution provider requested (device_id={device_id})");
                builder.with_execution_providers([ep.build()]).map_err(|e| {
                    InferError::BackendError(format!("CUDA provider unavailable: {e}"))
                })?
            }
            #[cfg(not(feature = "cuda"))]
            Device::Cuda { .. } => {
                return Err(InferError::BackendError(
                    "CUDA requested but the cuda feature is not enabled".to_string(),
                ));
            }
        };

        let session = match model {
            ModelSource::File(path) => builder
                .commit_from_file(path)
                .map_err(|e| InferError::ModelLoad(format!("failed to load model from file: {e}")))?,
            ModelSource::Memory(bytes) => builder
                .commit_from_memory(&bytes)
                .map_err(|e| InferError::ModelLoad(format!("failed to load model from memory: {e}")))?,
        };

        let input_names: Vec<String> = session
            .inputs()
            .iter()
            .map(|input| input.name().to_string())
            .collect();
        let output_names: Vec<String> = session
            .outputs()
            .iter()
            .map(|output| output.name().to_string())
            .collect();

        Ok(Box::new(OnnxSession {
            session,
            input_names,
            output_names,
        }))
    }
}

pub struct OnnxSession {
    session: OrtSession,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl Session for OnnxSession {
    fn run(&mut self, inputs: &[(&str, Tensor)]) -> Result<HashMap<String, Tensor>, InferError> {
        // Both models in this pipeline are single-input
        let [(name, tensor)] = inputs else {
            return Err(InferError::BackendError(format!(
                "expected exactly one input, got {}",
                inputs.len()
            )));
        };
        if !self.input_names.iter().any(|n| n == name) {
            return Err(InferError::BackendError(format!(
                "unknown input '{name}', model expects {:?}",
                self.input_names
            )));
        }

        let array = tensor_to_ndarray(tensor.clone())?;
        let tensor_ref = TensorRef::from_array_view(array.view())
            .map_err(|e| InferError::BackendError(format!("failed to create tensor ref: {e}")))?;
        let outputs = self
            .session
            .run(inputs![*name => tensor_ref])
            .map_err(|e| InferError::BackendError(format!("inference failed: {e}")))?;

        let mut result = HashMap::new();
        for output_name in &self.output_names {
            let value = &outputs[output_name.as_str()];
            let array = value.try_extract_array::<f32>().map_err(|e| {
                InferError::BackendError(format!("output '{output_name}' is not f32: {e}"))
            })?;
            result.insert(
                output_name.clone(),
                Tensor::new(array.shape().to_vec(), array.iter().copied().collect())?,
            );
        }

        Ok(result)
    }

    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }
}

fn tensor_to_ndarray(tensor: Tensor) -> Result<ArrayD<f32>, InferError> {
    ArrayD::from_shape_vec(tensor.shape.clone(), tensor.data)
        .map_err(|e| InferError::BackendError(format!("failed to create ndarray from tensor: {e}")))
}
