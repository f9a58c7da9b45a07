/*
 * @Description  : 负责计算图（computation graph）的构建、遍历、训练与持久化
 */

mod config;
mod descriptor;
mod graph;
mod network;
mod nodes;

pub use config::TrainingConfig;
pub use descriptor::{GraphDescriptor, NodeDescriptor, NodeTypeDescriptor};
pub use graph::{Graph, GraphError, ParsedGraph};
pub use network::Network;
pub use nodes::{NodeId, NodeShape, Window};

#[cfg(test)]
mod tests;
