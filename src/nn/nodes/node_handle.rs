use super::raw_node::{NodeType, TraitNode};
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 节点在图（arena）中的稳定下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// 节点的静态形状属性，构造后不再改变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeShape {
    /// 父节点输出的总元素数（叶子节点为0）
    pub domain_size: usize,
    pub height: usize,
    /// 平坦向量的宽为1
    pub width: usize,
}

impl NodeShape {
    pub const fn new(domain_size: usize, height: usize, width: usize) -> Self {
        Self {
            domain_size,
            height,
            width,
        }
    }

    /// 输出元素个数：`height * width`
    pub const fn size(&self) -> usize {
        self.height * self.width
    }

    pub const fn dims(&self) -> [usize; 2] {
        [self.height, self.width]
    }
}

/// arena 中的一个槽位：节点种类 + 值/梯度缓冲 + 双向边
///
/// `parents`（前驱）在构造时固定；`children`（后继）在后来的节点以本节点为父时自动追加，
/// 只用于遍历同步，不表示所有权。同一个父节点可以在`parents`中出现多次（如`Add(x, x)`），
/// 对应地在其`children`中也出现多次。
#[derive(Debug, Clone)]
pub(crate) struct NodeHandle {
    pub(in crate::nn) id: NodeId,
    pub(in crate::nn) shape: NodeShape,
    pub(in crate::nn) raw_node: NodeType,
    pub(in crate::nn) value: Tensor,
    pub(in crate::nn) grad: Tensor,
    pub(in crate::nn) parents: Vec<NodeId>,
    pub(in crate::nn) children: Vec<NodeId>,
}

impl NodeHandle {
    pub(in crate::nn) fn new<T: Into<NodeType>>(
        id: NodeId,
        raw_node: T,
        shape: NodeShape,
        parents: Vec<NodeId>,
    ) -> Self {
        Self {
            id,
            shape,
            raw_node: raw_node.into(),
            value: Tensor::zeros(shape.height, shape.width),
            grad: Tensor::zeros(shape.height, shape.width),
            parents,
            children: Vec::new(),
        }
    }

    pub(in crate::nn) const fn id(&self) -> NodeId {
        self.id
    }

    pub(in crate::nn) const fn shape(&self) -> NodeShape {
        self.shape
    }

    pub(in crate::nn) const fn node_type(&self) -> &NodeType {
        &self.raw_node
    }

    pub(in crate::nn) fn kind_name(&self) -> &'static str {
        self.raw_node.kind_name()
    }

    /// 自动生成的节点名，如"Add_3"
    pub(in crate::nn) fn name(&self) -> String {
        format!("{}_{}", self.kind_name(), self.id.0)
    }

    pub(in crate::nn) const fn value(&self) -> &Tensor {
        &self.value
    }

    pub(in crate::nn) const fn grad(&self) -> &Tensor {
        &self.grad
    }

    pub(in crate::nn) fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    pub(in crate::nn) fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(in crate::nn) const fn is_leaf(&self) -> bool {
        matches!(self.raw_node, NodeType::Leaf1(_) | NodeType::Leaf2(_))
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "节点[id={}, 类型={}]", self.id.0, self.kind_name())
    }
}
