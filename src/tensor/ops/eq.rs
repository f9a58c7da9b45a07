use crate::tensor::Tensor;
use approx::AbsDiffEq;

// 供`approx::assert_abs_diff_eq!`比较两个张量
impl AbsDiffEq for Tensor {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.is_same_shape(other)
            && self
                .data_as_slice()
                .iter()
                .zip(other.data_as_slice())
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}
