use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::raw_node::shape_rules;
use crate::nn::{GraphError, NodeShape};
use crate::tensor::Tensor;

/// 逐元素加法：`c = a + b`，两个父节点形状必须一致。
/// 反向时上游梯度原样传给两个父节点（系数+1/+1）。
#[derive(Debug, Clone)]
pub(crate) struct Add;

impl Add {
    pub(crate) fn new(parents: &[NodeShape]) -> Result<(Self, NodeShape), GraphError> {
        Ok((Self, shape_rules::elementwise_pair("Add", parents)?))
    }
}

impl TraitNode for Add {
    fn kind_name(&self) -> &'static str {
        "Add"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor], value: &mut Tensor) {
        *value = parents[0].zip_map(parents[1], |a, b| a + b);
    }

    fn calc_grads_to_parents(
        &mut self,
        _parents: &[&Tensor],
        _value: &Tensor,
        grad: &Tensor,
    ) -> Vec<Tensor> {
        vec![grad.clone(), grad.clone()]
    }
}
