/*
 * @Description  : describe / summary / dump_node 单元测试
 */

use crate::nn::{Graph, GraphDescriptor, GraphError, NodeTypeDescriptor, Window};
use crate::tensor::Tensor;

fn small_graph() -> Result<Graph, GraphError> {
    let mut graph = Graph::with_name("demo");
    let x = graph.new_leaf2(3, 3)?;
    let conv = graph.new_conv2d(&[x], &[Tensor::zeros(2, 2)], 0.0, Window::valid(2, 2))?;
    let pool = graph.new_max_pool2d(conv, Window::valid(2, 2))?;
    let affine = graph.new_affine(pool, Tensor::zeros(2, 3))?;
    graph.new_norm2(affine)?;
    Ok(graph)
}

#[test]
fn test_describe() -> Result<(), GraphError> {
    let graph = small_graph()?;
    let desc = graph.describe();

    assert_eq!(desc.name, "demo");
    assert_eq!(desc.nodes.len(), 5);
    assert_eq!(desc.total_params(), 5 + 6);

    let conv = &desc.nodes[1];
    assert_eq!(conv.name, "Convolution2d_1");
    assert_eq!(conv.output_shape, [2, 2]);
    assert_eq!(conv.parents, vec![0]);
    assert_eq!(conv.param_count, Some(5));
    assert_eq!(
        conv.kind,
        NodeTypeDescriptor::Convolution2d {
            channels: 1,
            kernel: (2, 2),
            stride: 1,
            padding: (0, 0),
            bias: 0.0,
        }
    );
    assert_eq!(
        desc.nodes[2].kind,
        NodeTypeDescriptor::MaxPooling2d {
            kernel: (2, 2),
            stride: 1,
            padding: (0, 0),
        }
    );
    assert_eq!(desc.nodes[3].kind, NodeTypeDescriptor::Affine { bias: 1.0 });
    assert_eq!(desc.nodes[4].kind.kind_name(), "Norm2");
    assert_eq!(desc.nodes[4].param_count, None);
    Ok(())
}

#[test]
fn test_descriptor_json_round_trip() -> Result<(), GraphError> {
    let desc = small_graph()?.describe();
    let json = desc.to_json().map_err(|e| GraphError::Io(e.to_string()))?;
    assert!(json.contains("\"type\": \"Convolution2d\""));
    // 无参数的节点不输出 param_count 字段
    assert_eq!(json.matches("param_count").count(), 2);

    let restored = GraphDescriptor::from_json(&json).map_err(|e| GraphError::Io(e.to_string()))?;
    assert_eq!(restored, desc);
    Ok(())
}

#[test]
fn test_summary() -> Result<(), GraphError> {
    let summary = small_graph()?.summary();
    let lines: Vec<&str> = summary.lines().collect();

    assert!(lines[0].starts_with('┌'));
    assert!(lines[1].contains("节点名称"));
    assert!(summary.contains("Convolution2d_1"));
    assert!(summary.contains("MaxPooling2d_2"));
    assert!(summary.contains("总参数量: 11"));
    assert!(lines.last().is_some_and(|l| l.starts_with('└')));
    // 不含汉字的行按字符数都等宽
    let width = lines[0].chars().count();
    let total_row = lines.len() - 2;
    for (index, line) in lines.iter().enumerate() {
        if index != 1 && index != total_row {
            assert_eq!(line.chars().count(), width, "{line}");
        }
    }
    Ok(())
}

#[test]
fn test_dump_node() -> Result<(), GraphError> {
    let mut graph = Graph::new();
    let x = graph.new_leaf1(2)?;
    let norm = graph.new_norm2(x)?;
    graph.set_input(x, &[3.0, 4.0])?;
    graph.forward()?;
    graph.backward(norm)?;

    let dump = graph.dump_node(x)?;
    assert!(dump.starts_with("节点[id=0, 类型=Leaf1]"));
    assert!(dump.contains("形状: [2, 1]，定义域大小: 0"));
    assert!(dump.contains("父节点数: 0，子节点数: 1"));
    assert!(dump.contains("0.6000"));
    assert!(graph.dump_node(crate::nn::NodeId(5)).is_err());
    Ok(())
}
