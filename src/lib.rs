//! # Only CG
//!
//! `only_cg`是一个用纯rust从零实现的计算图（DAG）自动微分引擎：
//! 由源节点喂入数据，从所有源节点同时出发做前向传播，从标量损失节点出发做反向传播并累加梯度，
//! 再沿同样的拓扑做参数更新。图可以编码为文本格式保存，并原样解析回来继续训练。
//!
//! ```ignore
//! use only_cg::nn::Graph;
//!
//! let mut graph = Graph::new();
//! let x = graph.new_leaf1(2)?;
//! let y = graph.new_leaf1(2)?;
//! let loss = graph.new_mse(x, y)?;
//! graph.set_input(x, &[1.0, 2.0])?;
//! graph.set_input(y, &[0.0, 2.0])?;
//! graph.forward()?;
//! graph.backward(loss)?;
//! ```

pub mod errors;
pub mod nn;
pub mod tensor;
pub mod utils;
