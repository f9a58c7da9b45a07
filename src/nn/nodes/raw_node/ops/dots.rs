use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::raw_node::shape_rules;
use crate::nn::{GraphError, NodeShape};
use crate::tensor::Tensor;

/// 内积：`c = Σ a_i * b_i`，输出标量
///
/// ## 梯度
/// - `∂c/∂a_i = b_i * g`
/// - `∂c/∂b_i = a_i * g`
#[derive(Debug, Clone)]
pub(crate) struct Dots;

impl Dots {
    pub(crate) fn new(parents: &[NodeShape]) -> Result<(Self, NodeShape), GraphError> {
        Ok((Self, shape_rules::reduce_pair("Dots", parents)?))
    }
}

impl TraitNode for Dots {
    fn kind_name(&self) -> &'static str {
        "Dots"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor], value: &mut Tensor) {
        value[0] = parents[0]
            .data_as_slice()
            .iter()
            .zip(parents[1].data_as_slice())
            .map(|(a, b)| a * b)
            .sum::<f64>();
    }

    fn calc_grads_to_parents(
        &mut self,
        parents: &[&Tensor],
        _value: &Tensor,
        grad: &Tensor,
    ) -> Vec<Tensor> {
        let g = grad[0];
        vec![parents[1].map(|b| b * g), parents[0].map(|a| a * g)]
    }
}
