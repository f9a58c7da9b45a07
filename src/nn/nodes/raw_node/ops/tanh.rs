use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::raw_node::shape_rules;
use crate::nn::{GraphError, NodeShape};
use crate::tensor::Tensor;

const TANH_CLAMP: f64 = 10.0;

/// Tanh 激活：`y = tanh(clamp(x, ±10))`，反向为`1 - y²`
#[derive(Debug, Clone)]
pub(crate) struct Tanh;

impl Tanh {
    pub(crate) fn new(parents: &[NodeShape]) -> Result<(Self, NodeShape), GraphError> {
        Ok((Self, shape_rules::elementwise_unary("Tanh", parents)?))
    }
}

impl TraitNode for Tanh {
    fn kind_name(&self) -> &'static str {
        "Tanh"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor], value: &mut Tensor) {
        *value = parents[0].map(|x| x.clamp(-TANH_CLAMP, TANH_CLAMP).tanh());
    }

    fn calc_grads_to_parents(
        &mut self,
        _parents: &[&Tensor],
        value: &Tensor,
        grad: &Tensor,
    ) -> Vec<Tensor> {
        vec![value.zip_map(grad, |y, g| g * (1.0 - y * y))]
    }
}
