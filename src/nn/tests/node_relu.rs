use crate::assert_err;
use crate::nn::{Graph, GraphError, NodeId, NodeShape};
use crate::tensor::Tensor;

#[test]
fn test_relu_forward_backward() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = graph.new_leaf1(3)?;
    let w = graph.new_leaf1(3)?;
    let relu = graph.new_relu(x)?;
    let loss = graph.new_dots(relu, w)?;
    assert_eq!(graph.shape(relu)?, NodeShape::new(3, 3, 1));

    graph.set_input(x, &[-1.0, 0.0, 2.0])?;
    graph.set_input(w, &[1.0, 1.0, 1.0])?;
    graph.forward()?;
    assert_eq!(graph.value(relu)?, &Tensor::new(&[0.0, 0.0, 2.0], &[3]));

    graph.backward(loss)?;
    // x = 0 处按次梯度1传递
    assert_eq!(graph.grad(x)?, &Tensor::new(&[0.0, 1.0, 1.0], &[3]));
    Ok(())
}

#[test]
fn test_relu_keeps_2d_shape() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = graph.new_leaf2(2, 3)?;
    let relu = graph.new_relu(x)?;
    assert_eq!(graph.shape(relu)?.dims(), [2, 3]);
    assert_err!(graph.new_relu(NodeId(9)), GraphError::NodeNotFound(NodeId(9)));
    Ok(())
}
