/*
 * @Description  : Network：把一张图与其（输入, 目标, 输出, 损失）四个节点绑在一起的训练句柄
 *
 * 图的构建（网络拓扑、权重初始化）由调用方负责，这里只负责喂数据与训练循环。
 */

use super::{Graph, GraphError, NodeId, TrainingConfig};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Network {
    graph: Graph,
    input: NodeId,
    target: NodeId,
    output: NodeId,
    loss: NodeId,
}

impl Network {
    /// `loss`必须是标量汇点，`input`与`target`必须是源节点
    pub fn new(
        graph: Graph,
        input: NodeId,
        target: NodeId,
        output: NodeId,
        loss: NodeId,
    ) -> Result<Self, GraphError> {
        for (role, id) in [("输入", input), ("目标", target)] {
            if !graph.parents(id)?.is_empty() {
                return Err(GraphError::InvalidOperation(format!(
                    "{role}节点{}不是源节点",
                    graph.node_name(id)?
                )));
            }
        }
        graph.shape(output)?;
        if !graph.children(loss)?.is_empty() || graph.shape(loss)?.size() != 1 {
            return Err(GraphError::PreconditionViolation(format!(
                "损失节点{}必须是标量汇点",
                graph.node_name(loss)?
            )));
        }
        Ok(Self {
            graph,
            input,
            target,
            output,
            loss,
        })
    }

    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    pub const fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub const fn input(&self) -> NodeId {
        self.input
    }

    pub const fn target(&self) -> NodeId {
        self.target
    }

    pub const fn output(&self) -> NodeId {
        self.output
    }

    pub const fn loss(&self) -> NodeId {
        self.loss
    }

    /// 推理：喂入输入、前向，返回输出节点的值
    pub fn expect(&mut self, input: &[f64]) -> Result<Vec<f64>, GraphError> {
        self.graph.set_input(self.input, input)?;
        self.graph.forward()?;
        Ok(self.graph.value(self.output)?.to_vec())
    }

    /// 喂入输入与目标、前向，返回损失值（不计算梯度）
    pub fn test(&mut self, input: &[f64], target: &[f64]) -> Result<f64, GraphError> {
        self.graph.set_input(self.input, input)?;
        self.graph.set_input(self.target, target)?;
        self.graph.forward()?;
        Ok(self.graph.value(self.loss)?[0])
    }

    /// 同[`Network::test`]，之后再反向传播；梯度累加，直到[`Network::update`]
    pub fn train(&mut self, input: &[f64], target: &[f64]) -> Result<f64, GraphError> {
        self.test(input, target)?;
        self.graph.backward(self.loss)
    }

    pub fn update(&mut self, eta: f64) -> Result<(), GraphError> {
        self.graph.update(self.loss, eta)
    }

    /// 训练循环，返回每一轮的损失之和
    ///
    /// 每个样本都执行一次前向与反向；参数按`config.update_every`个样本更新一次，
    /// 未设置时每轮结束更新一次（梯度在整轮内累加）。
    pub fn fit(
        &mut self,
        inputs: &[Vec<f64>],
        targets: &[Vec<f64>],
        config: &TrainingConfig,
    ) -> Result<Vec<f64>, GraphError> {
        if inputs.len() != targets.len() {
            return Err(GraphError::ShapeMismatch {
                expected: vec![inputs.len()],
                got: vec![targets.len()],
                message: "输入样本数与目标样本数必须一致".to_string(),
            });
        }
        if inputs.is_empty() {
            return Err(GraphError::InvalidOperation("训练集为空".to_string()));
        }
        if config.update_every == Some(0) {
            return Err(GraphError::InvalidOperation(
                "update_every 必须≥1".to_string(),
            ));
        }

        let mut history = Vec::with_capacity(config.epochs);
        for epoch in 0..config.epochs {
            let mut epoch_loss = 0.0;
            let mut pending = 0;
            for (input, target) in inputs.iter().zip(targets) {
                epoch_loss += self.train(input, target)?;
                pending += 1;
                if config.update_every == Some(pending) {
                    self.update(config.learning_rate)?;
                    pending = 0;
                }
            }
            if pending > 0 {
                self.update(config.learning_rate)?;
            }
            history.push(epoch_loss);

            let is_last = epoch + 1 == config.epochs;
            if config.verbose && (epoch % config.log_every.max(1) == 0 || is_last) {
                log::info!(
                    "Epoch {}/{}: loss = {:.6}",
                    epoch + 1,
                    config.epochs,
                    epoch_loss
                );
            }
        }
        Ok(history)
    }

    /// 以文本格式保存整张图（从损失节点出发）
    pub fn save_text<P: AsRef<Path>>(&self, path: P) -> Result<(), GraphError> {
        self.graph.save_text(self.loss, path)
    }

    /// 从文本格式加载，并按文件中的编号指定输入、目标与输出节点；损失节点为文件中最后一个节点
    pub fn load_text<P: AsRef<Path>>(
        path: P,
        input: u64,
        target: u64,
        output: u64,
    ) -> Result<Self, GraphError> {
        let parsed = Graph::load_text(path)?;
        let (input, target, output) = (
            parsed.node(input)?,
            parsed.node(target)?,
            parsed.node(output)?,
        );
        Self::new(parsed.graph, input, target, output, parsed.loss)
    }
}
