use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::raw_node::shape_rules;
use crate::nn::{GraphError, NodeShape};
use crate::tensor::Tensor;

/// MSE（均方误差）损失节点
///
/// ## 公式
/// `MSE = Σ(a - b)² / n`，n 为父节点的元素个数
///
/// ## 梯度
/// - `∂L/∂a = 2 * (a - b) * g / n`
/// - `∂L/∂b = -2 * (a - b) * g / n`
///
/// ## 输入
/// - 父节点 0: 预测值
/// - 父节点 1: 目标值
///
/// ## 输出
/// - 标量 [1, 1]
#[derive(Debug, Clone)]
pub(crate) struct Mse {
    numel: usize,
}

impl Mse {
    pub(crate) fn new(parents: &[NodeShape]) -> Result<(Self, NodeShape), GraphError> {
        let shape = shape_rules::reduce_pair("MSE", parents)?;
        Ok((
            Self {
                numel: shape.domain_size,
            },
            shape,
        ))
    }
}

impl TraitNode for Mse {
    fn kind_name(&self) -> &'static str {
        "MSE"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor], value: &mut Tensor) {
        let sum: f64 = parents[0]
            .data_as_slice()
            .iter()
            .zip(parents[1].data_as_slice())
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
        value[0] = sum / self.numel as f64;
    }

    fn calc_grads_to_parents(
        &mut self,
        parents: &[&Tensor],
        _value: &Tensor,
        grad: &Tensor,
    ) -> Vec<Tensor> {
        let scale = 2.0 * grad[0] / self.numel as f64;
        let to_a = parents[0].zip_map(parents[1], |a, b| scale * (a - b));
        let to_b = to_a.map(|g| -g);
        vec![to_a, to_b]
    }
}
