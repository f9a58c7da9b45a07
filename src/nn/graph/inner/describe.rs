/*
 * @Description  : Graph describe/summary/dump_node 相关方法
 */

use super::super::error::GraphError;
use super::Graph;
use crate::nn::descriptor::{GraphDescriptor, NodeDescriptor, NodeTypeDescriptor};
use crate::nn::nodes::{NodeType, TraitNode};
use crate::nn::NodeId;
use std::fmt::Write;

impl Graph {
    // ========== 图描述（describe）==========

    /// 导出图的描述符（拓扑、形状与超参数，不含参数数值）
    ///
    /// # 示例
    /// ```ignore
    /// let json = graph.describe().to_json()?;
    /// ```
    pub fn describe(&self) -> GraphDescriptor {
        let mut descriptor = GraphDescriptor::new(&self.name);
        for node in &self.nodes {
            let param_count = node.node_type().param_count();
            descriptor.add_node(NodeDescriptor {
                id: node.id().0,
                name: node.name(),
                kind: Self::node_type_to_descriptor(node.node_type()),
                output_shape: node.shape().dims(),
                parents: node.parents().iter().map(|p| p.0).collect(),
                param_count: (param_count > 0).then_some(param_count),
            });
        }
        descriptor
    }

    // ========== 模型摘要（summary）==========

    /// 返回模型摘要（Unicode 文本表格，用于控制台输出）
    ///
    /// ```text
    /// ┌──────────┬──────────┬──────────┬────────────┬────────┐
    /// │ 节点名称 │ 类型     │ 输出形状 │     参数量 │ 父节点 │
    /// ├──────────┼──────────┼──────────┼────────────┼────────┤
    /// │ Leaf1_0  │ Leaf1    │ [2, 1]   │          - │ -      │
    /// ...
    /// ```
    pub fn summary(&self) -> String {
        let desc = self.describe();

        let name_width = desc
            .nodes
            .iter()
            .map(|n| Self::display_width(&n.name))
            .max()
            .unwrap_or(8)
            .max(8);
        let type_width = desc
            .nodes
            .iter()
            .map(|n| n.kind.kind_name().len())
            .max()
            .unwrap_or(8)
            .max(8);
        let shape_width = desc
            .nodes
            .iter()
            .map(|n| format!("{:?}", n.output_shape).len())
            .max()
            .unwrap_or(8)
            .max(8);
        let param_width = 10;
        let parent_width = desc
            .nodes
            .iter()
            .map(|n| Self::format_parent_names(&desc, &n.parents).len())
            .max()
            .unwrap_or(8)
            .max(6);

        let total_width = name_width + type_width + shape_width + param_width + parent_width + 16; // 边框和间距
        let rule = |left: &str, mid: &str, right: &str| {
            format!(
                "{left}{}{mid}{}{mid}{}{mid}{}{mid}{}{right}\n",
                "─".repeat(name_width + 2),
                "─".repeat(type_width + 2),
                "─".repeat(shape_width + 2),
                "─".repeat(param_width + 2),
                "─".repeat(parent_width + 2),
            )
        };

        let mut output = String::new();
        output.push_str(&rule("┌", "┬", "┐"));
        // 表头中每个汉字占两列，故按字符数补齐时要减去多出的宽度
        output.push_str(&format!(
            "│ {:<name_w$} │ {:<type_w$} │ {:<shape_w$} │ {:>param_w$} │ {:<parent_w$} │\n",
            "节点名称",
            "类型",
            "输出形状",
            "参数量",
            "父节点",
            name_w = name_width - 4,
            type_w = type_width - 2,
            shape_w = shape_width - 4,
            param_w = param_width - 3,
            parent_w = parent_width - 3,
        ));
        output.push_str(&rule("├", "┼", "┤"));

        for node in &desc.nodes {
            let shape_str = format!("{:?}", node.output_shape);
            let param_str = node
                .param_count
                .map_or_else(|| "-".to_string(), Self::format_number);
            let parent_str = Self::format_parent_names(&desc, &node.parents);
            output.push_str(&format!(
                "│ {:<name_w$} │ {:<type_w$} │ {:<shape_w$} │ {:>param_w$} │ {:<parent_w$} │\n",
                node.name,
                node.kind.kind_name(),
                shape_str,
                param_str,
                parent_str,
                name_w = name_width,
                type_w = type_width,
                shape_w = shape_width,
                param_w = param_width,
                parent_w = parent_width,
            ));
        }

        output.push_str(&rule("├", "┴", "┤"));
        let total = format!("总参数量: {}", Self::format_number(desc.total_params()));
        output.push_str(&format!(
            "│ {:<width$} │\n",
            total,
            width = total_width - 4 - (Self::display_width(&total) - total.chars().count()),
        ));
        output.push_str(&format!("└{}┘\n", "─".repeat(total_width - 2)));

        output
    }

    /// 单个节点的调试信息：种类、形状、父/子节点数、当前的值与梯度
    pub fn dump_node(&self, id: NodeId) -> Result<String, GraphError> {
        let node = self.get_node(id)?;
        let mut out = String::new();
        writeln!(out, "{node}")?;
        writeln!(
            out,
            "形状: {:?}，定义域大小: {}",
            node.shape().dims(),
            node.shape().domain_size
        )?;
        writeln!(
            out,
            "父节点数: {}，子节点数: {}",
            node.parents().len(),
            node.children().len()
        )?;
        writeln!(out, "值:\n{}", node.value())?;
        write!(out, "梯度:\n{}", node.grad())?;
        Ok(out)
    }

    /// 格式化数字为千分位分隔形式
    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        for (i, c) in s.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }
        result.chars().rev().collect()
    }

    /// 格式化父节点名称列表
    fn format_parent_names(desc: &GraphDescriptor, parent_ids: &[usize]) -> String {
        if parent_ids.is_empty() {
            "-".to_string()
        } else {
            parent_ids
                .iter()
                .filter_map(|id| desc.nodes.get(*id))
                .map(|n| n.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    /// 计算字符串显示宽度（考虑中文字符）
    fn display_width(s: &str) -> usize {
        s.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum()
    }

    /// 将 `NodeType` 转换为 `NodeTypeDescriptor`
    pub(in crate::nn::graph) fn node_type_to_descriptor(node_type: &NodeType) -> NodeTypeDescriptor {
        match node_type {
            NodeType::Leaf1(_) => NodeTypeDescriptor::Leaf1,
            NodeType::Leaf2(_) => NodeTypeDescriptor::Leaf2,
            NodeType::Add(_) => NodeTypeDescriptor::Add,
            NodeType::Sub(_) => NodeTypeDescriptor::Sub,
            NodeType::Dots(_) => NodeTypeDescriptor::Dots,
            NodeType::ReLU(_) => NodeTypeDescriptor::ReLU,
            NodeType::Sigmoid(_) => NodeTypeDescriptor::Sigmoid,
            NodeType::Tanh(_) => NodeTypeDescriptor::Tanh,
            NodeType::Softmax(_) => NodeTypeDescriptor::Softmax,
            NodeType::Norm2(_) => NodeTypeDescriptor::Norm2,
            NodeType::Concatenation(node) => NodeTypeDescriptor::Concatenation {
                channels: node.channel_count(),
            },
            NodeType::Affine(node) => NodeTypeDescriptor::Affine { bias: node.bias() },
            NodeType::Convolution2d(node) => {
                let filter = node.filter();
                NodeTypeDescriptor::Convolution2d {
                    channels: node.kernels().len(),
                    kernel: filter.kernel,
                    stride: filter.stride,
                    padding: filter.padding,
                    bias: node.bias(),
                }
            }
            NodeType::MaxPooling2d(node) => {
                let filter = node.filter();
                NodeTypeDescriptor::MaxPooling2d {
                    kernel: filter.kernel,
                    stride: filter.stride,
                    padding: filter.padding,
                }
            }
            NodeType::AveragePooling2d(node) => {
                let filter = node.filter();
                NodeTypeDescriptor::AveragePooling2d {
                    kernel: filter.kernel,
                    stride: filter.stride,
                    padding: filter.padding,
                }
            }
            NodeType::Mse(_) => NodeTypeDescriptor::Mse,
            NodeType::Cee(_) => NodeTypeDescriptor::Cee,
        }
    }
}
