/*
 * @Description  : Graph 的创建、拓扑访问器与错误处理
 */

use crate::assert_err;
use crate::nn::{Graph, GraphError, NodeId};
use crate::tensor::Tensor;

#[test]
fn test_new_graph() {
    let graph = Graph::new();
    assert_eq!(graph.name(), "default_graph");
    assert_eq!(graph.nodes_count(), 0);
    assert_eq!(graph.last_forward_pass_id(), 0);
    assert_eq!(graph.last_backward_pass_id(), 0);
    assert!(graph.sources().is_empty());

    let named = Graph::with_name("xor");
    assert_eq!(named.name(), "xor");
    assert_eq!(Graph::default().name(), "default_graph");
}

/// 父/子节点列表都保留重复，且 id 按创建顺序递增
#[test]
fn test_topology_accessors() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = graph.new_leaf1(2)?;
    let y = graph.new_leaf1(2)?;
    let double = graph.new_add(x, x)?;
    let diff = graph.new_sub(double, y)?;
    let loss = graph.new_norm2(diff)?;

    assert_eq!(graph.nodes(), vec![x, y, double, diff, loss]);
    assert_eq!(graph.parents(double)?, &[x, x]);
    assert_eq!(graph.children(x)?, &[double, double]);
    assert_eq!(graph.children(double)?, &[diff]);
    assert_eq!(graph.sources(), vec![x, y]);
    assert_eq!(graph.sinks(), vec![loss]);
    assert_eq!(graph.node_name(diff)?, "Sub_3");
    assert_eq!(graph.kind_name(loss)?, "Norm2");
    assert_eq!(graph.shape(diff)?.domain_size, 4);
    assert!(x < loss);
    Ok(())
}

#[test]
fn test_node_not_found() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = graph.new_leaf1(2)?;
    let missing = NodeId(7);

    assert_err!(graph.value(missing), GraphError::NodeNotFound(NodeId(7)));
    assert_err!(graph.grad(missing), GraphError::NodeNotFound(NodeId(7)));
    assert_err!(graph.new_add(x, missing), GraphError::NodeNotFound(NodeId(7)));
    assert_err!(graph.set_input(missing, &[1.0]), GraphError::NodeNotFound(NodeId(7)));
    assert_err!(graph.backward(missing), GraphError::NodeNotFound(NodeId(7)));
    // 失败的构建不登记子节点
    assert!(graph.children(x)?.is_empty());
    Ok(())
}

#[test]
fn test_parameters_of_parameterless_node() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = graph.new_leaf1(3)?;
    let relu = graph.new_relu(x)?;
    assert_eq!(graph.parameters(relu)?, None);
    assert_eq!(graph.parameter_grads(x)?, None);
    assert_eq!(graph.param_count(), 0);

    let affine = graph.new_affine(relu, Tensor::zeros(4, 2))?;
    assert_eq!(graph.parameters(affine)?, Some(vec![Tensor::zeros(4, 2)]));
    assert_eq!(graph.param_count(), 8);
    Ok(())
}

#[test]
fn test_forward_on_empty_graph() {
    let mut graph = Graph::new();
    assert_err!(
        graph.forward(),
        GraphError::InvalidOperation("空图无法执行前向传播")
    );
}

#[test]
fn test_cloned_graph_is_independent() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = graph.new_leaf1(2)?;
    let norm = graph.new_norm2(x)?;
    graph.set_input(x, &[3.0, 4.0])?;

    let mut copy = graph.clone();
    copy.set_input(x, &[6.0, 8.0])?;
    graph.forward()?;
    copy.forward()?;
    assert_eq!(graph.value(norm)?[0], 5.0);
    assert_eq!(copy.value(norm)?[0], 10.0);
    Ok(())
}
