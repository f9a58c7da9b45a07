use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::raw_node::shape_rules;
use crate::nn::{GraphError, NodeShape};
use crate::tensor::Tensor;

/// 逐元素减法：`c = a - b`（系数+1/-1）
#[derive(Debug, Clone)]
pub(crate) struct Sub;

impl Sub {
    pub(crate) fn new(parents: &[NodeShape]) -> Result<(Self, NodeShape), GraphError> {
        Ok((Self, shape_rules::elementwise_pair("Sub", parents)?))
    }
}

impl TraitNode for Sub {
    fn kind_name(&self) -> &'static str {
        "Sub"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor], value: &mut Tensor) {
        *value = parents[0].zip_map(parents[1], |a, b| a - b);
    }

    fn calc_grads_to_parents(
        &mut self,
        _parents: &[&Tensor],
        _value: &Tensor,
        grad: &Tensor,
    ) -> Vec<Tensor> {
        vec![grad.clone(), grad.map(|g| -g)]
    }
}
