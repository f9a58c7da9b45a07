/*
 * @Description  : 按父节点形状推导输出形状的公共规则
 *                 （二元同形→同形、二元同形→标量、一元→同形、一元→标量）
 */

use crate::nn::{GraphError, NodeShape};

pub(super) fn expect_parent_count(
    kind: &str,
    parents: &[NodeShape],
    count: usize,
) -> Result<(), GraphError> {
    if parents.len() != count {
        return Err(GraphError::InvalidOperation(format!(
            "{kind}节点需要{count}个父节点，但得到{}个",
            parents.len()
        )));
    }
    Ok(())
}

fn expect_same_shape(kind: &str, a: &NodeShape, b: &NodeShape) -> Result<(), GraphError> {
    if a.dims() != b.dims() {
        return Err(GraphError::ShapeMismatch {
            expected: a.dims().to_vec(),
            got: b.dims().to_vec(),
            message: format!("{kind}节点的两个父节点形状必须一致"),
        });
    }
    Ok(())
}

/// 两个同形父节点 → 同形输出（Add、Sub）
pub(super) fn elementwise_pair(kind: &str, parents: &[NodeShape]) -> Result<NodeShape, GraphError> {
    expect_parent_count(kind, parents, 2)?;
    expect_same_shape(kind, &parents[0], &parents[1])?;
    let p = parents[0];
    Ok(NodeShape::new(p.size(), p.height, p.width))
}

/// 两个同形父节点 → 标量输出（Dots、MSE、CEE）
pub(super) fn reduce_pair(kind: &str, parents: &[NodeShape]) -> Result<NodeShape, GraphError> {
    expect_parent_count(kind, parents, 2)?;
    expect_same_shape(kind, &parents[0], &parents[1])?;
    Ok(NodeShape::new(parents[0].size(), 1, 1))
}

/// 一个父节点 → 同形输出（激活函数、Softmax）
pub(super) fn elementwise_unary(kind: &str, parents: &[NodeShape]) -> Result<NodeShape, GraphError> {
    expect_parent_count(kind, parents, 1)?;
    let p = parents[0];
    Ok(NodeShape::new(p.size(), p.height, p.width))
}

/// 一个父节点 → 标量输出（Norm2）
pub(super) fn reduce_unary(kind: &str, parents: &[NodeShape]) -> Result<NodeShape, GraphError> {
    expect_parent_count(kind, parents, 1)?;
    Ok(NodeShape::new(parents[0].size(), 1, 1))
}
