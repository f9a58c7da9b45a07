/*
 * @Description  : 图描述符（Graph Descriptor）
 *                 可序列化为 JSON 的中间表示，用于调试输出、摘要和外部工具
 */

use serde::{Deserialize, Serialize};

/// 图的可序列化描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDescriptor {
    /// 格式版本（用于向后兼容）
    pub version: String,
    pub name: String,
    /// 所有节点描述（按创建顺序）
    pub nodes: Vec<NodeDescriptor>,
}

/// 节点描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    /// 节点在 arena 中的下标
    pub id: usize,
    /// 自动生成的节点名，如"Add_3"
    pub name: String,
    pub kind: NodeTypeDescriptor,
    /// 输出形状`[高, 宽]`
    pub output_shape: [usize; 2],
    /// 父节点 ID 列表（定义拓扑，可含重复）
    pub parents: Vec<usize>,
    /// 参数数量（仅带参数的层有意义）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param_count: Option<usize>,
}

/// 节点类型描述（包含类型特定的超参数，不含参数数值）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeTypeDescriptor {
    Leaf1,
    Leaf2,
    Add,
    Sub,
    Dots,
    #[serde(rename = "MSE")]
    Mse,
    #[serde(rename = "CEE")]
    Cee,
    ReLU,
    Sigmoid,
    Tanh,
    Softmax,
    Norm2,
    Concatenation {
        channels: usize,
    },
    Affine {
        bias: f64,
    },
    Convolution2d {
        channels: usize,
        kernel: (usize, usize),
        stride: usize,
        padding: (usize, usize),
        bias: f64,
    },
    MaxPooling2d {
        kernel: (usize, usize),
        stride: usize,
        padding: (usize, usize),
    },
    AveragePooling2d {
        kernel: (usize, usize),
        stride: usize,
        padding: (usize, usize),
    },
}

impl NodeTypeDescriptor {
    /// 与文本格式中`Node <Kind>`一致的类型名
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Leaf1 => "Leaf1",
            Self::Leaf2 => "Leaf2",
            Self::Add => "Add",
            Self::Sub => "Sub",
            Self::Dots => "Dots",
            Self::Mse => "MSE",
            Self::Cee => "CEE",
            Self::ReLU => "ReLU",
            Self::Sigmoid => "Sigmoid",
            Self::Tanh => "Tanh",
            Self::Softmax => "Softmax",
            Self::Norm2 => "Norm2",
            Self::Concatenation { .. } => "Concatenation",
            Self::Affine { .. } => "Affine",
            Self::Convolution2d { .. } => "Convolution2d",
            Self::MaxPooling2d { .. } => "MaxPooling2d",
            Self::AveragePooling2d { .. } => "AveragePooling2d",
        }
    }
}

impl GraphDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: name.to_string(),
            nodes: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: NodeDescriptor) {
        self.nodes.push(node);
    }

    /// 获取总参数量
    pub fn total_params(&self) -> usize {
        self.nodes.iter().filter_map(|n| n.param_count).sum()
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
