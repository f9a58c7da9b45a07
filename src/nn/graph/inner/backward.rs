/*
 * @Description  : Graph 反向传播与参数更新
 *
 * 两者共享同一套遍历：从损失（汇点）出发，沿父边深度优先地走，
 * 节点要等到其所有（位于损失上游的）子节点都到达后才触发。
 * 区别只在于触发时做什么：backward 计算并累加梯度，update 执行一步梯度下降。
 */

use super::super::error::GraphError;
use super::super::pass::JoinCounters;
use super::Graph;
use crate::nn::NodeId;
use crate::nn::nodes::TraitNode;
use crate::tensor::Tensor;

/// 反向类遍历在节点触发时执行的动作
#[derive(Debug, Clone, Copy)]
enum ReverseAction {
    /// 计算对各父节点的梯度贡献并累加
    Backward,
    /// 以学习率更新参数，并清零参数梯度与节点梯度
    Update(f64),
}

impl Graph {
    /// 从损失节点出发的反向传播，返回损失值
    ///
    /// 损失节点的梯度被置为1；其余节点的梯度是各子节点贡献之和（累加）。
    /// 带参数的节点同时累加参数梯度，直到下一次[`Graph::update`]才清零。
    ///
    /// # 错误
    /// - `loss`不是汇点（还有子节点）或不是标量：`PreconditionViolation`
    /// - 自图构建（或最近一次增加节点）以来尚未完整执行过前向传播：`PreconditionViolation`
    pub fn backward(&mut self, loss: NodeId) -> Result<f64, GraphError> {
        self.check_loss_node(loss)?;
        if !self.forward_is_current {
            return Err(GraphError::PreconditionViolation(
                "反向传播前必须先完整执行一次前向传播".to_string(),
            ));
        }

        let loss_node = &mut self.nodes[loss.0];
        loss_node.grad.fill(1.0);
        let loss_value = loss_node.value[0];

        self.traverse_reverse(loss, ReverseAction::Backward);

        self.last_backward_pass_id += 1;
        self.has_pending_grads = true;
        log::debug!(
            "图[{}]完成第{}次反向传播，损失={loss_value}",
            self.name,
            self.last_backward_pass_id
        );
        Ok(loss_value)
    }

    /// 从损失节点出发的参数更新：每个带参数的节点执行`参数 -= eta * 参数梯度`并清零参数梯度
    ///
    /// 被访问到的节点梯度也一并清零，因此`update`之后图中不残留任何梯度。
    /// `eta = 0`时参数不变，但梯度仍被清零。
    pub fn update(&mut self, loss: NodeId, eta: f64) -> Result<(), GraphError> {
        self.check_loss_node(loss)?;
        if !self.forward_is_current {
            return Err(GraphError::PreconditionViolation(
                "参数更新前必须先完整执行一次前向传播".to_string(),
            ));
        }
        if !self.has_pending_grads {
            log::warn!(
                "图[{}]在没有反向传播的情况下调用了update，参数不会改变",
                self.name
            );
        }

        self.traverse_reverse(loss, ReverseAction::Update(eta));

        self.has_pending_grads = false;
        log::debug!("图[{}]以学习率{eta}完成参数更新", self.name);
        Ok(())
    }

    /// 反向/更新的起点必须是标量汇点
    fn check_loss_node(&self, loss: NodeId) -> Result<(), GraphError> {
        let node = self.get_node(loss)?;
        if !node.children().is_empty() {
            return Err(GraphError::PreconditionViolation(format!(
                "{node}还有{}个子节点，不是汇点",
                node.children().len()
            )));
        }
        if node.shape().size() != 1 {
            return Err(GraphError::PreconditionViolation(format!(
                "{node}的输出形状为{:?}，不是标量",
                node.shape().dims()
            )));
        }
        Ok(())
    }

    /// 标记所有能到达`loss`的节点（含`loss`自身）
    ///
    /// 父节点 id 总小于子节点 id，所以从`loss`往下标号单向扫一遍即可。
    pub(in crate::nn::graph) fn ancestors_of(&self, loss: NodeId) -> Vec<bool> {
        let mut marked = vec![false; self.nodes.len()];
        marked[loss.0] = true;
        for index in (0..=loss.0).rev() {
            if marked[index] {
                for parent in &self.nodes[index].parents {
                    marked[parent.0] = true;
                }
            }
        }
        marked
    }

    /// 反向类遍历：汇合条件只计入位于`loss`上游的子节点（不通往`loss`的子节点永远不会到达）
    fn traverse_reverse(&mut self, loss: NodeId, action: ReverseAction) {
        let marked = self.ancestors_of(loss);
        let expected = self
            .nodes
            .iter()
            .map(|n| n.children.iter().filter(|c| marked[c.0]).count())
            .collect();
        let mut counters = JoinCounters::new(expected);

        let mut stack = vec![loss];
        while let Some(id) = stack.pop() {
            if !counters.arrive(id.0) {
                continue;
            }
            match action {
                ReverseAction::Backward => self.propagate_grads(id),
                ReverseAction::Update(eta) => {
                    let node = &mut self.nodes[id.0];
                    node.raw_node.apply_update(eta);
                    node.grad.fill(0.0);
                }
            }
            stack.extend(self.nodes[id.0].parents.iter().rev().copied());
        }
        debug_assert!(counters.is_settled());
    }

    fn propagate_grads(&mut self, id: NodeId) {
        let (before, rest) = self.nodes.split_at_mut(id.0);
        let node = &mut rest[0];
        let inputs: Vec<&Tensor> = node.parents.iter().map(|p| &before[p.0].value).collect();
        let contributions = node
            .raw_node
            .calc_grads_to_parents(&inputs, &node.value, &node.grad);
        debug_assert_eq!(contributions.len(), node.parents.len());
        // 同一父节点出现多次时（如 Add(x, x)），各槽位的贡献分别累加
        for (parent, contribution) in node.parents.iter().zip(&contributions) {
            before[parent.0].grad += contribution;
        }
    }
}
