/*
 * @Description  : MaxPooling2d 节点单元测试
 */

use crate::assert_err;
use crate::nn::{Graph, GraphError, Window};
use crate::tensor::Tensor;

#[test]
fn test_max_pool2d_forward_backward() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = graph.new_leaf2(4, 4)?;
    let w = graph.new_leaf2(2, 2)?;
    let pool = graph.new_max_pool2d(x, Window::with_stride(2, 2, 2))?;
    let loss = graph.new_dots(pool, w)?;
    assert_eq!(graph.param_count(), 0);

    let input: Vec<f64> = (1..=16).map(f64::from).collect();
    graph.set_input(x, &input)?;
    graph.set_input(w, &[1.0, 2.0, 3.0, 4.0])?;
    graph.forward()?;
    assert_eq!(
        graph.value(pool)?,
        &Tensor::new(&[6.0, 8.0, 14.0, 16.0], &[2, 2])
    );

    graph.backward(loss)?;
    let mut expected = vec![0.0; 16];
    expected[5] = 1.0;
    expected[7] = 2.0;
    expected[13] = 3.0;
    expected[15] = 4.0;
    assert_eq!(graph.grad(x)?, &Tensor::new(&expected, &[4, 4]));
    Ok(())
}

/// 并列最大值平分梯度
#[test]
fn test_max_pool2d_ties_split_gradient() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = graph.new_leaf2(2, 2)?;
    let pool = graph.new_max_pool2d(x, Window::valid(2, 2))?;

    graph.set_input_2d(x, &[vec![3.0, 1.0], vec![3.0, 2.0]])?;
    graph.forward()?;
    assert_eq!(graph.value(pool)?[0], 3.0);

    graph.backward(pool)?;
    let grad = graph.grad(x)?;
    assert_eq!(grad, &Tensor::new(&[0.5, 0.0, 0.5, 0.0], &[2, 2]));
    assert_eq!(grad.sum(), 1.0);
    Ok(())
}

/// 填充区不参与取最大值（输入全为负时结果不是0）
#[test]
fn test_max_pool2d_skips_padding() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = graph.new_leaf2(3, 3)?;
    let pool = graph.new_max_pool2d(x, Window::explicit(2, 2, 2, (1, 1), (2, 2)))?;

    let input: Vec<f64> = (1..=9).map(|v| -f64::from(v)).collect();
    graph.set_input(x, &input)?;
    graph.forward()?;
    assert_eq!(
        graph.value(pool)?,
        &Tensor::new(&[-1.0, -2.0, -4.0, -5.0], &[2, 2])
    );
    Ok(())
}

#[test]
fn test_max_pool2d_degenerate_window() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = graph.new_leaf2(3, 3)?;

    assert_err!(
        graph.new_max_pool2d(x, Window::explicit(2, 2, 1, (0, 0), (5, 5))),
        GraphError::DegenerateWindow { row: 0, col: 3 }
    );
    assert_err!(
        graph.new_max_pool2d(x, Window::explicit(2, 2, 1, (2, 0), (2, 2))),
        GraphError::DegenerateWindow { row: 0, col: 0 }
    );
    assert_eq!(graph.nodes_count(), 1);
    Ok(())
}
