/*
 * @Description  : 图的文本格式编码（Converter）
 *
 * 从损失节点出发深度优先地输出：节点在其全部父节点之后才写出（后序），
 * 编号按写出顺序从1开始分配，因此每个 back 引用都指向更早定义的块。
 * 每个块形如：
 *
 * ```text
 * id <编号>
 * Node <类型>
 * <类型相关字段>
 * <空行>
 * ```
 *
 * 浮点数使用`f64`的`Display`（最短的可精确往返表示），解析后逐位还原。
 */

use super::super::error::GraphError;
use super::Graph;
use crate::nn::NodeId;
use crate::nn::nodes::raw_node::Filter2d;
use crate::nn::nodes::{NodeHandle, NodeType};
use crate::tensor::Tensor;
use std::fmt::Write;

impl Graph {
    /// 把以`loss`为汇点的子图编码为文本
    pub fn to_text(&self, loss: NodeId) -> Result<String, GraphError> {
        let node = self.get_node(loss)?;
        if !node.children().is_empty() {
            return Err(GraphError::PreconditionViolation(format!(
                "{node}不是汇点，无法作为序列化的起点"
            )));
        }

        let mut file_ids: Vec<Option<u64>> = vec![None; self.nodes.len()];
        let mut next_id = 0;
        let mut out = String::new();

        // 显式栈模拟后序遍历：(节点, 下一个待访问的父节点槽位)
        let mut stack = vec![(loss, 0usize)];
        while let Some((id, slot)) = stack.pop() {
            let parents = &self.nodes[id.0].parents;
            if let Some(&parent) = parents.get(slot) {
                stack.push((id, slot + 1));
                if file_ids[parent.0].is_none() {
                    stack.push((parent, 0));
                }
                continue;
            }
            if file_ids[id.0].is_some() {
                continue;
            }
            next_id += 1;
            file_ids[id.0] = Some(next_id);
            self.write_block(&self.nodes[id.0], next_id, &file_ids, &mut out)?;
        }

        log::debug!(
            "图[{}]从{}出发编码了{next_id}个节点",
            self.name,
            self.nodes[loss.0]
        );
        Ok(out)
    }

    fn write_block(
        &self,
        node: &NodeHandle,
        file_id: u64,
        file_ids: &[Option<u64>],
        out: &mut String,
    ) -> Result<(), GraphError> {
        let back = node
            .parents()
            .iter()
            .map(|p| {
                file_ids[p.0].map(|id| id.to_string()).ok_or_else(|| {
                    GraphError::InvalidOperation(format!("父节点{p:?}尚未编码"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?
            .join(" ");
        let shape = node.shape();

        writeln!(out, "id {file_id}")?;
        writeln!(out, "Node {}", node.kind_name())?;
        match node.node_type() {
            NodeType::Leaf1(_) => writeln!(out, "data {}", shape.height)?,
            NodeType::Leaf2(_) => writeln!(out, "data {} {}", shape.height, shape.width)?,
            NodeType::Add(_)
            | NodeType::Sub(_)
            | NodeType::Dots(_)
            | NodeType::Mse(_)
            | NodeType::Cee(_)
            | NodeType::ReLU(_)
            | NodeType::Sigmoid(_)
            | NodeType::Tanh(_)
            | NodeType::Softmax(_)
            | NodeType::Norm2(_) => writeln!(out, "back {back}")?,
            NodeType::Concatenation(concat) => {
                writeln!(out, "channel {}", concat.channel_count())?;
                writeln!(out, "back {back}")?;
            }
            NodeType::Affine(affine) => {
                writeln!(out, "back {back}")?;
                writeln!(out, "bias {}", affine.bias())?;
                writeln!(
                    out,
                    "weight {} {}",
                    affine.domain_size(),
                    affine.weight().width()
                )?;
                write_matrix(affine.weight(), out)?;
            }
            NodeType::Convolution2d(conv) => {
                let filter = conv.filter();
                writeln!(out, "channel {}", conv.kernels().len())?;
                writeln!(out, "back {back}")?;
                writeln!(out, "data {} {}", shape.height, shape.width)?;
                writeln!(out, "stride {}", filter.stride)?;
                writeln!(out, "padding {} {}", filter.padding.0, filter.padding.1)?;
                writeln!(out, "bias {}", conv.bias())?;
                writeln!(out, "kernel {} {}", filter.kernel.0, filter.kernel.1)?;
                for kernel in conv.kernels() {
                    write_matrix(kernel, out)?;
                }
            }
            NodeType::MaxPooling2d(pool) => write_pooling(pool.filter(), shape.dims(), &back, out)?,
            NodeType::AveragePooling2d(pool) => {
                write_pooling(pool.filter(), shape.dims(), &back, out)?;
            }
        }
        writeln!(out)?;
        Ok(())
    }
}

fn write_pooling(
    filter: &Filter2d,
    dims: [usize; 2],
    back: &str,
    out: &mut String,
) -> Result<(), GraphError> {
    writeln!(out, "data {} {}", dims[0], dims[1])?;
    writeln!(out, "back {back}")?;
    writeln!(out, "stride {}", filter.stride)?;
    writeln!(out, "padding {} {}", filter.padding.0, filter.padding.1)?;
    writeln!(out, "filter {} {}", filter.kernel.0, filter.kernel.1)?;
    Ok(())
}

/// 每行一行矩阵元素，空格分隔
fn write_matrix(matrix: &Tensor, out: &mut String) -> Result<(), GraphError> {
    for row in matrix.to_rows() {
        let line = row
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{line}")?;
    }
    Ok(())
}
