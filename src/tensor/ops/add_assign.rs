use crate::errors::TensorError;
use crate::tensor::Tensor;
use std::ops::AddAssign;

impl<'a> AddAssign<&'a Self> for Tensor {
    /// 形状不一致时panic（图在构造期已保证形状）
    fn add_assign(&mut self, other: &'a Self) {
        assert!(
            self.is_same_shape(other),
            "{}",
            TensorError::OperatorError {
                operator: "自相加",
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: other.shape().to_vec(),
            }
        );
        self.data += &other.data;
    }
}

impl AddAssign for Tensor {
    fn add_assign(&mut self, other: Self) {
        *self += &other;
    }
}

impl AddAssign<f64> for Tensor {
    fn add_assign(&mut self, scalar: f64) {
        self.data += scalar;
    }
}

impl Tensor {
    /// `self += alpha * other`
    pub fn scaled_add(&mut self, alpha: f64, other: &Self) {
        assert!(
            self.is_same_shape(other),
            "{}",
            TensorError::OperatorError {
                operator: "加权相加",
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: other.shape().to_vec(),
            }
        );
        self.data.scaled_add(alpha, &other.data);
    }

    /// 将所有元素置为`value`
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }
}
