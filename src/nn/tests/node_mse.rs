use crate::assert_err;
use crate::nn::{Graph, GraphError};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_mse_forward_backward() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let a = graph.new_leaf1(3)?;
    let b = graph.new_leaf1(3)?;
    let loss = graph.new_mse(a, b)?;
    assert_eq!(graph.kind_name(loss)?, "MSE");

    graph.set_input(a, &[1.0, 2.0, 3.0])?;
    graph.set_input(b, &[1.0, 0.0, 0.0])?;
    graph.forward()?;

    let value = graph.backward(loss)?;
    assert_abs_diff_eq!(value, 13.0 / 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(
        graph.grad(a)?,
        &Tensor::new(&[0.0, 4.0 / 3.0, 2.0], &[3]),
        epsilon = 1e-12
    );
    assert_abs_diff_eq!(
        graph.grad(b)?,
        &Tensor::new(&[0.0, -4.0 / 3.0, -2.0], &[3]),
        epsilon = 1e-12
    );
    Ok(())
}

#[test]
fn test_mse_shape_mismatch() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let a = graph.new_leaf1(3)?;
    let b = graph.new_leaf2(1, 3)?;
    assert_err!(
        graph.new_mse(a, b),
        GraphError::ShapeMismatch([3, 1], [1, 3], "MSE节点的两个父节点形状必须一致")
    );
    Ok(())
}
