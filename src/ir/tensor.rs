use serde::{Deserialize, Serialize};

/// Element type of a [`TensorDescriptor`]. Only the width matters to the
/// roofline model; precision semantics beyond byte width are out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    F32,
    F16,
    I32,
    I8,
}

impl DataType {
    pub fn width_bytes(self) -> u64 {
        match self {
            DataType::F32 | DataType::I32 => 4,
            DataType::F16 => 2,
            DataType::I8 => 1,
        }
    }
}

impl Default for DataType {
    fn default() -> Self {
        DataType::F32
    }
}

/// Shape + element type of a tensor flowing between operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorDescriptor {
    pub shape: Vec<u64>,
    #[serde(default)]
    pub dtype: DataType,
}

impl TensorDescriptor {
    pub fn new(shape: Vec<u64>) -> Self {
        Self {
            shape,
            dtype: DataType::default(),
        }
    }

    pub fn with_dtype(shape: Vec<u64>, dtype: DataType) -> Self {
        Self { shape, dtype }
    }

    /// Total element count, or `None` if the shape is empty or contains a
    /// zero dimension (the caller should surface this as `NaNInputShape`).
    pub fn num_elements(&self) -> Option<u64> {
        if self.shape.is_empty() || self.shape.iter().any(|&d| d == 0) {
            return None;
        }
        Some(self.shape.iter().product())
    }

    /// Total byte size, or `None` under the same conditions as
    /// [`Self::num_elements`].
    pub fn byte_size(&self) -> Option<u64> {
        self.num_elements().map(|n| n * self.dtype.width_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_elements_multiplies_dims() {
        let t = TensorDescriptor::new(vec![4, 64]);
        assert_eq!(t.num_elements(), Some(256));
    }

    #[test]
    fn num_elements_none_on_empty_shape() {
        let t = TensorDescriptor::new(vec![]);
        assert_eq!(t.num_elements(), None);
    }

    #[test]
    fn num_elements_none_on_zero_dim() {
        let t = TensorDescriptor::new(vec![4, 0]);
        assert_eq!(t.num_elements(), None);
    }

    #[test]
    fn byte_size_scales_by_dtype_width() {
        let t = TensorDescriptor::with_dtype(vec![2, 8], DataType::F16);
        assert_eq!(t.byte_size(), Some(32));
    }

    #[test]
    fn default_dtype_is_f32() {
        let t = TensorDescriptor::new(vec![1]);
        assert_eq!(t.dtype, DataType::F32);
    }
}
