/*
 * @Description  : Graph 核心操作 + 前向传播
 */

use super::super::error::GraphError;
use super::super::pass::JoinCounters;
use super::Graph;
use crate::nn::nodes::{NodeHandle, NodeType, TraitNode};
use crate::nn::{NodeId, NodeShape};
use crate::tensor::Tensor;

impl Graph {
    // ========== 创建 ==========

    pub fn new() -> Self {
        Self::with_name("default_graph")
    }

    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: Vec::new(),
            last_forward_pass_id: 0,
            last_backward_pass_id: 0,
            forward_is_current: false,
            has_pending_grads: false,
        }
    }

    // ========== 基础访问器 ==========

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    /// 按创建顺序列出所有节点
    pub fn nodes(&self) -> Vec<NodeId> {
        self.nodes.iter().map(NodeHandle::id).collect()
    }

    pub const fn last_forward_pass_id(&self) -> u64 {
        self.last_forward_pass_id
    }

    pub const fn last_backward_pass_id(&self) -> u64 {
        self.last_backward_pass_id
    }

    pub(in crate::nn) fn get_node(&self, id: NodeId) -> Result<&NodeHandle, GraphError> {
        self.nodes.get(id.0).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn) fn get_node_mut(&mut self, id: NodeId) -> Result<&mut NodeHandle, GraphError> {
        self.nodes.get_mut(id.0).ok_or(GraphError::NodeNotFound(id))
    }

    pub fn value(&self, id: NodeId) -> Result<&Tensor, GraphError> {
        Ok(self.get_node(id)?.value())
    }

    pub fn grad(&self, id: NodeId) -> Result<&Tensor, GraphError> {
        Ok(self.get_node(id)?.grad())
    }

    pub fn shape(&self, id: NodeId) -> Result<NodeShape, GraphError> {
        Ok(self.get_node(id)?.shape())
    }

    pub fn parents(&self, id: NodeId) -> Result<&[NodeId], GraphError> {
        Ok(self.get_node(id)?.parents())
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], GraphError> {
        Ok(self.get_node(id)?.children())
    }

    pub fn kind_name(&self, id: NodeId) -> Result<&'static str, GraphError> {
        Ok(self.get_node(id)?.kind_name())
    }

    /// 自动生成的节点名，如"Affine_4"
    pub fn node_name(&self, id: NodeId) -> Result<String, GraphError> {
        Ok(self.get_node(id)?.name())
    }

    /// 所有源节点（无父节点），按创建顺序
    pub fn sources(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.parents().is_empty())
            .map(NodeHandle::id)
            .collect()
    }

    /// 所有汇点（无子节点），按创建顺序
    pub fn sinks(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.children().is_empty())
            .map(NodeHandle::id)
            .collect()
    }

    /// 节点的参数快照（Affine 为权重；Convolution2d 为各通道卷积核 + 1×1 偏置）
    pub fn parameters(&self, id: NodeId) -> Result<Option<Vec<Tensor>>, GraphError> {
        Ok(self.get_node(id)?.node_type().parameters())
    }

    /// 参数梯度累加器的快照，与[`Graph::parameters`]一一对应
    pub fn parameter_grads(&self, id: NodeId) -> Result<Option<Vec<Tensor>>, GraphError> {
        Ok(self.get_node(id)?.node_type().parameter_grads())
    }

    /// 图中可训练参数的总数
    pub fn param_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| n.node_type().param_count())
            .sum()
    }

    // ========== 喂数据 ==========

    /// 给源节点喂入数据（行主序），长度必须恰为`高×宽`
    pub fn set_input(&mut self, id: NodeId, values: &[f64]) -> Result<(), GraphError> {
        let node = self.get_node_mut(id)?;
        if !node.is_leaf() {
            return Err(GraphError::InvalidOperation(format!(
                "{node}不是源节点，不能喂入数据"
            )));
        }
        let shape = node.shape();
        if values.len() != shape.size() {
            return Err(GraphError::ShapeMismatch {
                expected: shape.dims().to_vec(),
                got: vec![values.len()],
                message: format!("{node}需要{}个值", shape.size()),
            });
        }
        node.value.data_as_slice_mut().copy_from_slice(values);
        Ok(())
    }

    /// 给 Leaf2 节点按行喂入二维数据，行数与每行长度都必须与节点一致
    pub fn set_input_2d(&mut self, id: NodeId, rows: &[Vec<f64>]) -> Result<(), GraphError> {
        let node = self.get_node(id)?;
        if !matches!(node.node_type(), NodeType::Leaf2(_)) {
            return Err(GraphError::InvalidOperation(format!(
                "{node}不是Leaf2节点，不能按行喂入二维数据"
            )));
        }
        let shape = node.shape();
        let ragged = rows.iter().any(|row| row.len() != shape.width);
        if rows.len() != shape.height || ragged {
            return Err(GraphError::ShapeMismatch {
                expected: shape.dims().to_vec(),
                got: vec![rows.len(), rows.first().map_or(0, Vec::len)],
                message: format!("{node}需要{}行、每行{}个值", shape.height, shape.width),
            });
        }
        let flat: Vec<f64> = rows.concat();
        self.set_input(id, &flat)
    }

    // ========== 添加节点 ==========

    /// 把构造好的节点放入 arena，并在每个父节点上登记子节点（重复父节点登记多次）
    pub(in crate::nn::graph) fn add_node<T: Into<NodeType>>(
        &mut self,
        raw_node: T,
        shape: NodeShape,
        parents: &[NodeId],
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        for &parent in parents {
            self.nodes[parent.0].children.push(id);
        }
        let node = NodeHandle::new(id, raw_node, shape, parents.to_vec());
        log::debug!(
            "图[{}]新增{}，形状{:?}，父节点{:?}",
            self.name,
            node,
            shape.dims(),
            parents
        );
        self.nodes.push(node);
        self.forward_is_current = false;
        id
    }

    /// 校验父节点存在并收集其形状
    pub(in crate::nn::graph) fn parent_shapes(
        &self,
        parents: &[NodeId],
    ) -> Result<Vec<NodeShape>, GraphError> {
        parents
            .iter()
            .map(|&id| self.get_node(id).map(NodeHandle::shape))
            .collect()
    }

    // ========== 前向传播 ==========

    /// 从所有源节点（按创建顺序）同时出发的前向传播
    ///
    /// 节点在其所有父节点都已到达后才触发：先清零自身梯度，再由父节点的值计算自身的值，
    /// 然后依次通知每个子节点。每个节点在一轮中恰好触发一次。
    pub fn forward(&mut self) -> Result<(), GraphError> {
        if self.nodes.is_empty() {
            return Err(GraphError::InvalidOperation(
                "空图无法执行前向传播".to_string(),
            ));
        }
        let mut counters = JoinCounters::new(self.nodes.iter().map(|n| n.parents.len()).collect());
        for source in self.sources() {
            self.fire_forward(source, &mut counters);
        }
        debug_assert!(counters.is_settled());

        self.last_forward_pass_id += 1;
        self.forward_is_current = true;
        log::debug!(
            "图[{}]完成第{}次前向传播",
            self.name,
            self.last_forward_pass_id
        );
        Ok(())
    }

    /// 深度优先地从`start`出发传播；用显式栈代替递归，避免深图爆栈
    fn fire_forward(&mut self, start: NodeId, counters: &mut JoinCounters) {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            if !counters.arrive(id.0) {
                continue;
            }
            self.compute_value(id);
            // 逆序入栈，使第一个子节点最先被访问
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
    }

    fn compute_value(&mut self, id: NodeId) {
        // 父节点 id 必小于本节点 id，故可把 arena 切成不相交的两段同时借用
        let (before, rest) = self.nodes.split_at_mut(id.0);
        let node = &mut rest[0];
        let inputs: Vec<&Tensor> = node.parents.iter().map(|p| &before[p.0].value).collect();
        node.grad.fill(0.0);
        node.raw_node.calc_value_by_parents(&inputs, &mut node.value);
    }
}
