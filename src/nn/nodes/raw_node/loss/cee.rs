use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::raw_node::shape_rules;
use crate::nn::{GraphError, NodeShape};
use crate::tensor::Tensor;

/// 防止 log(0) 的下限
pub(crate) const CEE_EPSILON: f64 = 1e-10;

/// CEE（交叉熵）损失节点
///
/// ## 公式
/// `CEE = -Σ b_i * ln(max(a_i, ε))`，ε = 1e-10
///
/// 预测概率恰为0时损失仍是有限值（被截断），不会产生 NaN/inf。
///
/// ## 梯度（与前向使用同一截断值）
/// - `∂L/∂a_i = -b_i / max(a_i, ε) * g`
/// - `∂L/∂b_i = -ln(max(a_i, ε)) * g`
///
/// ## 输入
/// - 父节点 0: 预测概率（通常来自 Softmax）
/// - 父节点 1: 目标分布（通常为 one-hot）
#[derive(Debug, Clone)]
pub(crate) struct Cee;

impl Cee {
    pub(crate) fn new(parents: &[NodeShape]) -> Result<(Self, NodeShape), GraphError> {
        let shape = shape_rules::reduce_pair("CEE", parents)?;
        Ok((Self, shape))
    }
}

impl TraitNode for Cee {
    fn kind_name(&self) -> &'static str {
        "CEE"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor], value: &mut Tensor) {
        value[0] = -parents[0]
            .data_as_slice()
            .iter()
            .zip(parents[1].data_as_slice())
            .map(|(a, b)| b * a.max(CEE_EPSILON).ln())
            .sum::<f64>();
    }

    fn calc_grads_to_parents(
        &mut self,
        parents: &[&Tensor],
        _value: &Tensor,
        grad: &Tensor,
    ) -> Vec<Tensor> {
        let g = grad[0];
        let to_a = parents[0].zip_map(parents[1], |a, b| -b / a.max(CEE_EPSILON) * g);
        let to_b = parents[0].map(|a| -a.max(CEE_EPSILON).ln() * g);
        vec![to_a, to_b]
    }
}
