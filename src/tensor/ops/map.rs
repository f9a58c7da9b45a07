use crate::errors::TensorError;
use crate::tensor::Tensor;

impl Tensor {
    /// 对每个元素应用`f`，返回同形新张量
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            data: self.data.mapv(f),
        }
    }

    /// 对两个同形张量逐元素应用`f`
    pub fn zip_map(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        assert!(
            self.is_same_shape(other),
            "{}",
            TensorError::OperatorError {
                operator: "逐元素运算",
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: other.shape().to_vec(),
            }
        );
        let mut data = self.data.clone();
        data.zip_mut_with(&other.data, |a, &b| *a = f(*a, b));
        Self { data }
    }
}
