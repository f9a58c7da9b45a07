/*
 * @Description  : Graph 计算图的底层实现
 *
 * 各 impl 块分散在子模块中：
 * - core.rs: 基础操作 + 喂数据 + forward
 * - backward.rs: backward / update
 * - node_builders.rs: new_*
 * - describe.rs: describe / summary / dump_node
 * - serialization.rs: 文本格式编码（Converter）
 * - parser.rs: 文本格式解码（Parser）
 * - model_io.rs: 文本格式的文件读写
 */

mod backward;
mod core;
mod describe;
mod model_io;
mod node_builders;
mod parser;
mod serialization;

pub use parser::ParsedGraph;

use crate::nn::nodes::NodeHandle;

/// 计算图：节点 arena 的唯一所有者
///
/// 节点以创建顺序存放，`NodeId`即其下标；节点只能引用已存在的节点作为父节点，
/// 因此父节点的 id 总是小于子节点的 id，图天然无环。
/// 整张图作为一个整体创建和销毁，中途不会删除单个节点。
#[derive(Debug, Clone)]
pub struct Graph {
    pub(in crate::nn::graph) name: String,
    pub(in crate::nn::graph) nodes: Vec<NodeHandle>,
    /// 最后一次前向传播的 id
    pub(in crate::nn::graph) last_forward_pass_id: u64,
    /// 最后一次反向传播的 id
    pub(in crate::nn::graph) last_backward_pass_id: u64,
    /// 自上次结构变化以来是否完整执行过前向传播
    pub(in crate::nn::graph) forward_is_current: bool,
    /// 是否有尚未被 update 消费的反向梯度
    pub(in crate::nn::graph) has_pending_grads: bool,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
