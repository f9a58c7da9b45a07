/*
 * @Description  : 源节点（Leaf1 / Leaf2）：没有父节点，值由外部喂入
 *
 * 喂入数据时的尺寸校验在 Graph::set_input / set_input_2d 中完成，
 * 这里的前向与反向都不做任何计算。
 */

use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::{GraphError, NodeShape};
use crate::tensor::Tensor;

fn expect_non_empty(kind: &str, height: usize, width: usize) -> Result<(), GraphError> {
    if height == 0 || width == 0 {
        return Err(GraphError::ShapeMismatch {
            expected: vec![1, 1],
            got: vec![height, width],
            message: format!("{kind}节点的高和宽都必须≥1"),
        });
    }
    Ok(())
}

/// 一维输入：`size × 1`的列向量
#[derive(Debug, Clone)]
pub(crate) struct Leaf1;

impl Leaf1 {
    pub(crate) fn new(size: usize) -> Result<(Self, NodeShape), GraphError> {
        expect_non_empty("Leaf1", size, 1)?;
        Ok((Self, NodeShape::new(0, size, 1)))
    }
}

impl TraitNode for Leaf1 {
    fn kind_name(&self) -> &'static str {
        "Leaf1"
    }

    fn calc_value_by_parents(&mut self, _parents: &[&Tensor], _value: &mut Tensor) {}

    fn calc_grads_to_parents(
        &mut self,
        _parents: &[&Tensor],
        _value: &Tensor,
        _grad: &Tensor,
    ) -> Vec<Tensor> {
        Vec::new()
    }
}

/// 二维输入：`height × width`，按行主序存放（如单通道图像）
#[derive(Debug, Clone)]
pub(crate) struct Leaf2;

impl Leaf2 {
    pub(crate) fn new(height: usize, width: usize) -> Result<(Self, NodeShape), GraphError> {
        expect_non_empty("Leaf2", height, width)?;
        Ok((Self, NodeShape::new(0, height, width)))
    }
}

impl TraitNode for Leaf2 {
    fn kind_name(&self) -> &'static str {
        "Leaf2"
    }

    fn calc_value_by_parents(&mut self, _parents: &[&Tensor], _value: &mut Tensor) {}

    fn calc_grads_to_parents(
        &mut self,
        _parents: &[&Tensor],
        _value: &Tensor,
        _grad: &Tensor,
    ) -> Vec<Tensor> {
        Vec::new()
    }
}
