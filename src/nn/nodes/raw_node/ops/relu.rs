use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::raw_node::shape_rules;
use crate::nn::{GraphError, NodeShape};
use crate::tensor::Tensor;

/// ReLU：`y = max(x, 0)`。反向只在`x >= 0`处传递梯度（x恰为0时视作导数为1）。
#[derive(Debug, Clone)]
pub(crate) struct ReLU;

impl ReLU {
    pub(crate) fn new(parents: &[NodeShape]) -> Result<(Self, NodeShape), GraphError> {
        Ok((Self, shape_rules::elementwise_unary("ReLU", parents)?))
    }
}

impl TraitNode for ReLU {
    fn kind_name(&self) -> &'static str {
        "ReLU"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor], value: &mut Tensor) {
        *value = parents[0].map(|x| x.max(0.0));
    }

    fn calc_grads_to_parents(
        &mut self,
        parents: &[&Tensor],
        _value: &Tensor,
        grad: &Tensor,
    ) -> Vec<Tensor> {
        vec![parents[0].zip_map(grad, |x, g| if x >= 0.0 { g } else { 0.0 })]
    }
}
