/*
 * @Description  : Graph 模块的错误类型
 */

use crate::nn::NodeId;
use thiserror::Error;

/// Graph 操作错误类型
///
/// 所有错误都在检测点直接返回，图保持原样（不会残留半成品节点），
/// 调用方不应尝试在出错的图上继续部分求值。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("节点{0:?}不存在")]
    NodeNotFound(NodeId),
    /// 构造或喂入数据时，父节点/输入的尺寸不一致
    #[error("形状不匹配：预期{expected:?}，实际{got:?}（{message}）")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },
    /// 反向/更新的起点不是标量汇点、尚未前向，或窗口配置越界
    #[error("前置条件不满足：{0}")]
    PreconditionViolation(String),
    /// 文本格式的图无法解析
    #[error("第{line}行解析失败：{message}")]
    ParseError { line: usize, message: String },
    /// 池化窗口不含任何输入范围内的单元
    #[error("输出位置[{row}, {col}]的池化窗口完全落在填充区内")]
    DegenerateWindow { row: usize, col: usize },
    #[error("非法操作：{0}")]
    InvalidOperation(String),
    #[error("I/O错误：{0}")]
    Io(String),
}

impl From<std::io::Error> for GraphError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<std::fmt::Error> for GraphError {
    fn from(e: std::fmt::Error) -> Self {
        Self::Io(e.to_string())
    }
}
