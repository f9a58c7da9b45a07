/*
 * @Description  : Affine（全连接）层
 *
 * 父节点：
 * - parents[0]: 输入，按行主序展平为长度为 d 的向量
 *
 * 参数：
 * - weight: (d+1) × out，最后一行是偏置行，与标量 bias（默认1）相乘
 */

use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::raw_node::shape_rules;
use crate::nn::{GraphError, NodeShape};
use crate::tensor::Tensor;

/// 偏置行的默认乘数
pub(crate) const DEFAULT_AFFINE_BIAS: f64 = 1.0;

/// `out_i = Σ_j W[j][i]·in_j + W[d][i]·bias`
///
/// ## 梯度
/// - 对输入：`Σ_i W[j][i]·g_i`
/// - 对权重：`in_j·g_i`（偏置行为`bias·g_i`），**累加**直到`apply_update`
#[derive(Debug, Clone)]
pub(crate) struct Affine {
    weight: Tensor,
    grad_weight: Tensor,
    bias: f64,
    domain_size: usize,
}

impl Affine {
    pub(crate) fn new(
        parents: &[NodeShape],
        weight: Tensor,
        bias: f64,
    ) -> Result<(Self, NodeShape), GraphError> {
        shape_rules::expect_parent_count("Affine", parents, 1)?;
        let domain_size = parents[0].size();
        if weight.height() != domain_size + 1 || weight.width() == 0 {
            return Err(GraphError::ShapeMismatch {
                expected: vec![domain_size + 1, weight.width().max(1)],
                got: weight.shape().to_vec(),
                message: format!(
                    "Affine的权重必须为(输入长度+1)×输出长度，输入长度为{domain_size}"
                ),
            });
        }
        let out = weight.width();
        let grad_weight = Tensor::zeros(weight.height(), out);
        Ok((
            Self {
                weight,
                grad_weight,
                bias,
                domain_size,
            },
            NodeShape::new(domain_size, out, 1),
        ))
    }

    pub(crate) const fn weight(&self) -> &Tensor {
        &self.weight
    }

    pub(crate) const fn bias(&self) -> f64 {
        self.bias
    }

    pub(crate) const fn domain_size(&self) -> usize {
        self.domain_size
    }
}

impl TraitNode for Affine {
    fn kind_name(&self) -> &'static str {
        "Affine"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor], value: &mut Tensor) {
        let input = parents[0].data_as_slice();
        let d = self.domain_size;
        for i in 0..value.size() {
            let mut sum = self.weight[[d, i]] * self.bias;
            for (j, x) in input.iter().enumerate() {
                sum += self.weight[[j, i]] * x;
            }
            value[i] = sum;
        }
    }

    fn calc_grads_to_parents(
        &mut self,
        parents: &[&Tensor],
        _value: &Tensor,
        grad: &Tensor,
    ) -> Vec<Tensor> {
        let input = parents[0];
        let d = self.domain_size;
        let g = grad.data_as_slice();
        let mut to_parent = Tensor::zeros(input.height(), input.width());
        for j in 0..d {
            let x = input[j];
            let mut sum = 0.0;
            for (i, gi) in g.iter().enumerate() {
                sum += self.weight[[j, i]] * gi;
                self.grad_weight[[j, i]] += x * gi;
            }
            to_parent[j] = sum;
        }
        for (i, gi) in g.iter().enumerate() {
            self.grad_weight[[d, i]] += self.bias * gi;
        }
        vec![to_parent]
    }

    fn apply_update(&mut self, eta: f64) {
        self.weight.scaled_add(-eta, &self.grad_weight);
        self.grad_weight.fill(0.0);
    }

    fn param_count(&self) -> usize {
        self.weight.size()
    }

    fn parameters(&self) -> Option<Vec<Tensor>> {
        Some(vec![self.weight.clone()])
    }

    fn parameter_grads(&self) -> Option<Vec<Tensor>> {
        Some(vec![self.grad_weight.clone()])
    }
}
