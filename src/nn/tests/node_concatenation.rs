/*
 * @Description  : Concatenation 节点单元测试
 */

use crate::assert_err;
use crate::nn::{Graph, GraphError, NodeShape};
use crate::tensor::Tensor;

#[test]
fn test_concatenation_forward_backward() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let a = graph.new_leaf1(2)?;
    let b = graph.new_leaf1(3)?;
    let w = graph.new_leaf1(5)?;
    let concat = graph.new_concatenation(&[a, b])?;
    let loss = graph.new_dots(concat, w)?;
    assert_eq!(graph.shape(concat)?, NodeShape::new(5, 5, 1));

    graph.set_input(a, &[1.0, 2.0])?;
    graph.set_input(b, &[3.0, 4.0, 5.0])?;
    graph.set_input(w, &[1.0, 2.0, 3.0, 4.0, 5.0])?;
    graph.forward()?;
    assert_eq!(
        graph.value(concat)?,
        &Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0], &[5])
    );

    graph.backward(loss)?;
    assert_eq!(graph.grad(a)?, &Tensor::new(&[1.0, 2.0], &[2]));
    assert_eq!(graph.grad(b)?, &Tensor::new(&[3.0, 4.0, 5.0], &[3]));
    Ok(())
}

/// 同一父节点出现两次时，两段的梯度都累加到该父节点上
#[test]
fn test_concatenation_repeated_parent() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let a = graph.new_leaf1(2)?;
    let w = graph.new_leaf1(4)?;
    let concat = graph.new_concatenation(&[a, a])?;
    let loss = graph.new_dots(concat, w)?;
    assert_eq!(graph.children(a)?, &[concat, concat]);

    graph.set_input(a, &[1.0, -1.0])?;
    graph.set_input(w, &[1.0, 2.0, 10.0, 20.0])?;
    graph.forward()?;
    assert_eq!(graph.backward(loss)?, 1.0 - 2.0 + 10.0 - 20.0);
    assert_eq!(graph.grad(a)?, &Tensor::new(&[11.0, 22.0], &[2]));
    Ok(())
}

#[test]
fn test_concatenation_invalid_parents() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let a = graph.new_leaf1(2)?;
    let m = graph.new_leaf2(2, 2)?;

    assert_err!(
        graph.new_concatenation(&[a, m]),
        GraphError::ShapeMismatch([2, 1], [2, 2], "Concatenation节点的父节点必须都是列向量（宽为1）")
    );
    assert_err!(
        graph.new_concatenation(&[]),
        GraphError::InvalidOperation("Concatenation节点至少需要1个父节点")
    );
    Ok(())
}
