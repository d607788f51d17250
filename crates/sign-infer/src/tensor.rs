use crate::InferError;
use std::fmt;

/// Owned f32 tensor passed across the inference session seam.
#[derive(Clone, PartialEq)]
pub struct Tensor {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("len", &self.data.len())
            .finish()
    }
}

impl Tensor {
    /// Create a tensor, validating that the data length matches the shape.
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Result<Self, InferError> {
        let mut product: usize = 1;
        for &dim in &shape {
            product = product.checked_mul(dim).ok_or_else(|| InferError::ShapeMismatch {
                expected: "non-overflowing shape".to_string(),
                got: format!("{shape:?}"),
            })?;
        }
        if product != data.len() {
            return Err(InferError::ShapeMismatch {
                expected: format!("{product} elements for shape {shape:?}"),
                got: format!("{} elements", data.len()),
            });
        }
        Ok(Self { shape, data })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
