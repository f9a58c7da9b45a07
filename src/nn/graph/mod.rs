/*
 * @Description  : Graph 模块：计算图（节点 arena）的核心实现
 *
 * 公开 API：
 * - `Graph`: 拥有全部节点的计算图
 * - `GraphError`: 错误类型
 * - `ParsedGraph`: 文本格式解析结果
 */

mod error;
mod inner;
mod pass;

pub use error::GraphError;
pub use inner::{Graph, ParsedGraph};
