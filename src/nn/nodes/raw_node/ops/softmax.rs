/*
 * @Description  : Softmax 节点（数值稳定版）
 *
 * 前向：先减去最大值，再把指数参数截断在 SOFTMAX_EXP_FLOOR 之上，
 *       保证输入量级很大（≥1e4）时也不会出现 inf/NaN，且输出和为1。
 * 反向：完整的雅可比-向量积 `∂L/∂x_i = Σ_j y_i(δ_ij - y_j)·g_j`，O(n²)。
 */

use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::raw_node::shape_rules;
use crate::nn::{GraphError, NodeShape};
use crate::tensor::Tensor;

/// 指数参数（已减去最大值）的下限
pub(crate) const SOFTMAX_EXP_FLOOR: f64 = -10.0;

#[derive(Debug, Clone)]
pub(crate) struct Softmax;

impl Softmax {
    pub(crate) fn new(parents: &[NodeShape]) -> Result<(Self, NodeShape), GraphError> {
        Ok((Self, shape_rules::elementwise_unary("Softmax", parents)?))
    }
}

impl TraitNode for Softmax {
    fn kind_name(&self) -> &'static str {
        "Softmax"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor], value: &mut Tensor) {
        let input = parents[0];
        let max = input
            .data_as_slice()
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let exps = input.map(|x| (x - max).max(SOFTMAX_EXP_FLOOR).exp());
        let sum = exps.sum();
        *value = exps.map(|e| e / sum);
    }

    fn calc_grads_to_parents(
        &mut self,
        _parents: &[&Tensor],
        value: &Tensor,
        grad: &Tensor,
    ) -> Vec<Tensor> {
        let y = value.data_as_slice();
        let g = grad.data_as_slice();
        let mut to_parent = Tensor::zeros(value.height(), value.width());
        for (i, out) in to_parent.data_as_slice_mut().iter_mut().enumerate() {
            *out = y
                .iter()
                .zip(g)
                .enumerate()
                .map(|(j, (&yj, &gj))| {
                    let delta = if i == j { 1.0 } else { 0.0 };
                    y[i] * (delta - yj) * gj
                })
                .sum();
        }
        vec![to_parent]
    }
}
