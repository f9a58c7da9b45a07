use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::raw_node::shape_rules;
use crate::nn::{GraphError, NodeShape};
use crate::tensor::Tensor;

/// 欧氏范数：`y = sqrt(Σ x_i²)`，输出标量
///
/// 反向为`x_i / y * g`；当`y == 0`时该导数不存在，此时返回全零梯度。
#[derive(Debug, Clone)]
pub(crate) struct Norm2;

impl Norm2 {
    pub(crate) fn new(parents: &[NodeShape]) -> Result<(Self, NodeShape), GraphError> {
        Ok((Self, shape_rules::reduce_unary("Norm2", parents)?))
    }
}

impl TraitNode for Norm2 {
    fn kind_name(&self) -> &'static str {
        "Norm2"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor], value: &mut Tensor) {
        value[0] = parents[0]
            .data_as_slice()
            .iter()
            .map(|x| x * x)
            .sum::<f64>()
            .sqrt();
    }

    fn calc_grads_to_parents(
        &mut self,
        parents: &[&Tensor],
        value: &Tensor,
        grad: &Tensor,
    ) -> Vec<Tensor> {
        let norm = value[0];
        if norm == 0.0 {
            let p = parents[0];
            return vec![Tensor::zeros(p.height(), p.width())];
        }
        let scale = grad[0] / norm;
        vec![parents[0].map(|x| x * scale)]
    }
}
