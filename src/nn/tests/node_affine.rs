/*
 * @Description  : Affine 节点单元测试
 */

use crate::assert_err;
use crate::nn::{Graph, GraphError, NodeShape};
use crate::tensor::Tensor;

fn weight_3x3() -> Tensor {
    Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0], &[3, 3])
}

#[test]
fn test_affine_forward() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = graph.new_leaf1(2)?;
    let affine = graph.new_affine(x, weight_3x3())?;
    let half_bias = graph.new_affine_with_bias(x, weight_3x3(), 0.5)?;
    assert_eq!(graph.shape(affine)?, NodeShape::new(2, 3, 1));
    assert_eq!(graph.param_count(), 18);

    graph.set_input(x, &[1.0, 2.0])?;
    graph.forward()?;
    // 最后一行是偏置行
    assert_eq!(
        graph.value(affine)?,
        &Tensor::new(&[16.0, 20.0, 24.0], &[3])
    );
    assert_eq!(
        graph.value(half_bias)?,
        &Tensor::new(&[12.5, 16.0, 19.5], &[3])
    );
    Ok(())
}

#[test]
fn test_affine_backward_and_update() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = graph.new_leaf1(2)?;
    let ones = graph.new_leaf1(3)?;
    let affine = graph.new_affine(x, weight_3x3())?;
    let loss = graph.new_dots(affine, ones)?;

    graph.set_input(x, &[1.0, 2.0])?;
    graph.set_input(ones, &[1.0, 1.0, 1.0])?;
    graph.forward()?;
    graph.backward(loss)?;

    assert_eq!(graph.grad(x)?, &Tensor::new(&[6.0, 15.0], &[2]));
    let expected_grad_w = Tensor::new(&[1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 1.0, 1.0, 1.0], &[3, 3]);
    assert_eq!(
        graph.parameter_grads(affine)?,
        Some(vec![expected_grad_w.clone()])
    );

    // 参数梯度在多次反向之间累加
    graph.backward(loss)?;
    let doubled = expected_grad_w.map(|g| 2.0 * g);
    assert_eq!(graph.parameter_grads(affine)?, Some(vec![doubled.clone()]));

    graph.update(loss, 0.5)?;
    let mut expected_w = weight_3x3();
    expected_w.scaled_add(-0.5, &doubled);
    assert_eq!(graph.parameters(affine)?, Some(vec![expected_w]));
    assert_eq!(
        graph.parameter_grads(affine)?,
        Some(vec![Tensor::zeros(3, 3)])
    );
    Ok(())
}

/// 二维父节点按行主序展平
#[test]
fn test_affine_flattens_2d_parent() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = graph.new_leaf2(2, 2)?;
    let weight = Tensor::new(&[1.0, 1.0, 1.0, 1.0, 0.0], &[5, 1]);
    let affine = graph.new_affine(x, weight)?;
    assert_eq!(graph.shape(affine)?, NodeShape::new(4, 1, 1));

    graph.set_input_2d(x, &[vec![1.0, 2.0], vec![3.0, 4.0]])?;
    graph.forward()?;
    assert_eq!(graph.value(affine)?[0], 10.0);

    graph.backward(affine)?;
    assert_eq!(graph.grad(x)?, &Tensor::new(&[1.0, 1.0, 1.0, 1.0], &[2, 2]));
    Ok(())
}

#[test]
fn test_affine_weight_shape_mismatch() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = graph.new_leaf1(2)?;
    assert_err!(
        graph.new_affine(x, Tensor::zeros(2, 3)),
        GraphError::ShapeMismatch(
            [3, 3],
            [2, 3],
            "Affine的权重必须为(输入长度+1)×输出长度，输入长度为2"
        )
    );
    assert_eq!(graph.nodes_count(), 1);
    Ok(())
}
