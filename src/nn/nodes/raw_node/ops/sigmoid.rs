use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::raw_node::shape_rules;
use crate::nn::{GraphError, NodeShape};
use crate::tensor::Tensor;

/// 输入截断范围，避免`exp`溢出
const SIGMOID_CLAMP: f64 = 10.0;

/// Sigmoid 激活：`y = 1 / (1 + e^(-clamp(x, ±10)))`
///
/// 反向直接使用输出值：`∂y/∂x = y * (1 - y)`
#[derive(Debug, Clone)]
pub(crate) struct Sigmoid;

impl Sigmoid {
    pub(crate) fn new(parents: &[NodeShape]) -> Result<(Self, NodeShape), GraphError> {
        Ok((Self, shape_rules::elementwise_unary("Sigmoid", parents)?))
    }
}

impl TraitNode for Sigmoid {
    fn kind_name(&self) -> &'static str {
        "Sigmoid"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor], value: &mut Tensor) {
        *value = parents[0].map(|x| {
            let x = x.clamp(-SIGMOID_CLAMP, SIGMOID_CLAMP);
            1.0 / (1.0 + (-x).exp())
        });
    }

    fn calc_grads_to_parents(
        &mut self,
        _parents: &[&Tensor],
        value: &Tensor,
        grad: &Tensor,
    ) -> Vec<Tensor> {
        vec![value.zip_map(grad, |y, g| g * y * (1.0 - y))]
    }
}
