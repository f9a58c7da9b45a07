use crate::nn::{Graph, GraphError};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_sigmoid_forward_backward() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = graph.new_leaf1(2)?;
    let w = graph.new_leaf1(2)?;
    let sigmoid = graph.new_sigmoid(x)?;
    let loss = graph.new_dots(sigmoid, w)?;

    graph.set_input(x, &[0.0, 0.0])?;
    graph.set_input(w, &[1.0, 2.0])?;
    graph.forward()?;
    assert_eq!(graph.value(sigmoid)?, &Tensor::new(&[0.5, 0.5], &[2]));

    graph.backward(loss)?;
    assert_abs_diff_eq!(
        graph.grad(x)?,
        &Tensor::new(&[0.25, 0.5], &[2]),
        epsilon = 1e-12
    );
    Ok(())
}

/// 输入先被截断到[-10, 10]，极端输入不会溢出
#[test]
fn test_sigmoid_clamps_extreme_inputs() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = graph.new_leaf1(3)?;
    let sigmoid = graph.new_sigmoid(x)?;

    graph.set_input(x, &[100.0, -1e6, 10.0])?;
    graph.forward()?;
    let y = graph.value(sigmoid)?;
    assert_abs_diff_eq!(y[0], 0.9999546021312976, epsilon = 1e-15);
    assert_abs_diff_eq!(y[0], y[2], epsilon = 1e-15);
    assert_abs_diff_eq!(y[1], 1.0 - 0.9999546021312976, epsilon = 1e-15);
    assert!(y.is_all_finite());
    Ok(())
}
