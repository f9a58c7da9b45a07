/*
 * @Description  : Concatenation 节点：把 N 个列向量首尾相接成一个列向量
 *
 * 父节点：
 * - parents[0..n]: 宽度均为1的向量，高度可以不同
 */

use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::{GraphError, NodeShape};
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub(crate) struct Concatenation {
    /// 前缀偏移表：`offsets[k]`为第k个父节点在输出中的起始下标，末尾多存一个总长度
    offsets: Vec<usize>,
}

impl Concatenation {
    pub(crate) fn new(parents: &[NodeShape]) -> Result<(Self, NodeShape), GraphError> {
        if parents.is_empty() {
            return Err(GraphError::InvalidOperation(
                "Concatenation节点至少需要1个父节点".to_string(),
            ));
        }
        let mut offsets = Vec::with_capacity(parents.len() + 1);
        let mut total = 0;
        for p in parents {
            if p.width != 1 {
                return Err(GraphError::ShapeMismatch {
                    expected: vec![p.height, 1],
                    got: p.dims().to_vec(),
                    message: "Concatenation节点的父节点必须都是列向量（宽为1）".to_string(),
                });
            }
            offsets.push(total);
            total += p.height;
        }
        offsets.push(total);
        Ok((Self { offsets }, NodeShape::new(total, total, 1)))
    }

    pub(crate) fn channel_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// 把输出中的平坦下标映射为（父节点槽位, 该父节点内的偏移）
    pub(crate) fn resolve(&self, index: usize) -> (usize, usize) {
        debug_assert!(index < self.offsets[self.channel_count()]);
        // 第一个起点大于index的槽位的前一个，即为index所在的槽位
        let slot = self.offsets.partition_point(|&start| start <= index) - 1;
        (slot, index - self.offsets[slot])
    }
}

impl TraitNode for Concatenation {
    fn kind_name(&self) -> &'static str {
        "Concatenation"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor], value: &mut Tensor) {
        for index in 0..value.size() {
            let (slot, local) = self.resolve(index);
            value[index] = parents[slot][local];
        }
    }

    fn calc_grads_to_parents(
        &mut self,
        parents: &[&Tensor],
        _value: &Tensor,
        grad: &Tensor,
    ) -> Vec<Tensor> {
        let mut grads: Vec<Tensor> = parents
            .iter()
            .map(|p| Tensor::zeros(p.height(), p.width()))
            .collect();
        for index in 0..grad.size() {
            let (slot, local) = self.resolve(index);
            grads[slot][local] += grad[index];
        }
        grads
    }
}
