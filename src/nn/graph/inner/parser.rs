/*
 * @Description  : 图的文本格式解码（Parser）
 *
 * 以空白分隔的记号流逐块读取，块内换行无关紧要。back 引用必须指向更早定义的块，
 * 通过“文件编号 → NodeId”映射逐步解析。最后定义的节点即为损失节点（必然是汇点）。
 * 任何不符合格式的输入都会以`GraphError::ParseError`报告出错的行号。
 */

use super::super::error::GraphError;
use super::Graph;
use crate::nn::NodeId;
use crate::nn::nodes::Window;
use crate::tensor::Tensor;
use std::collections::HashMap;
use std::str::FromStr;

/// 文本解析的结果
#[derive(Debug, Clone)]
pub struct ParsedGraph {
    pub graph: Graph,
    /// 最后定义的节点（损失/汇点）
    pub loss: NodeId,
    /// 文件中的编号 → 新图中的 NodeId
    pub ids: HashMap<u64, NodeId>,
}

impl ParsedGraph {
    /// 按文件中的编号查找节点
    pub fn node(&self, file_id: u64) -> Result<NodeId, GraphError> {
        self.ids.get(&file_id).copied().ok_or_else(|| {
            GraphError::InvalidOperation(format!("文件中不存在编号为{file_id}的节点"))
        })
    }
}

/// 带行号的记号流
struct Tokens<'a> {
    tokens: Vec<(usize, &'a str)>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        let tokens = text
            .lines()
            .enumerate()
            .flat_map(|(index, line)| line.split_whitespace().map(move |t| (index + 1, t)))
            .collect();
        Self { tokens, pos: 0 }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// 当前位置所在的行（已读完时为最后一个记号的行）
    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |&(line, _)| line)
    }

    fn next(&mut self, what: &str) -> Result<(usize, &'a str), GraphError> {
        let token = self.tokens.get(self.pos).copied().ok_or_else(|| GraphError::ParseError {
            line: self.line(),
            message: format!("输入意外结束，缺少{what}"),
        })?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, keyword: &str) -> Result<(), GraphError> {
        let (line, token) = self.next(&format!("关键字`{keyword}`"))?;
        if token != keyword {
            return Err(GraphError::ParseError {
                line,
                message: format!("预期关键字`{keyword}`，实际为`{token}`"),
            });
        }
        Ok(())
    }

    fn number<T: FromStr>(&mut self, what: &str) -> Result<T, GraphError> {
        let (line, token) = self.next(what)?;
        token.parse().map_err(|_| GraphError::ParseError {
            line,
            message: format!("{what}必须是数字，实际为`{token}`"),
        })
    }

    /// 读取一个`rows × cols`的矩阵（行主序），`header_line`为声明尺寸的那一行
    ///
    /// 尺寸来自文件，不按其预分配；数值不足时在读到末尾处报错。
    fn matrix(
        &mut self,
        header_line: usize,
        rows: usize,
        cols: usize,
        what: &str,
    ) -> Result<Tensor, GraphError> {
        let count = rows.checked_mul(cols).ok_or_else(|| GraphError::ParseError {
            line: header_line,
            message: format!("{what}的尺寸{rows}×{cols}超出可表示的范围"),
        })?;
        let mut data = Vec::new();
        for _ in 0..count {
            data.push(self.number::<f64>(what)?);
        }
        Tensor::try_new(&data, &[rows, cols]).map_err(|e| GraphError::ParseError {
            line: self.line(),
            message: e.to_string(),
        })
    }
}

/// 正在解析中的图
struct Parser<'a> {
    tokens: Tokens<'a>,
    graph: Graph,
    ids: HashMap<u64, NodeId>,
}

impl<'a> Parser<'a> {
    fn back(&mut self) -> Result<NodeId, GraphError> {
        let line = self.tokens.line();
        let file_id: u64 = self.tokens.number("back 引用")?;
        self.ids.get(&file_id).copied().ok_or_else(|| GraphError::ParseError {
            line,
            message: format!("back 引用了未定义（或定义在其后）的节点编号{file_id}"),
        })
    }

    fn backs(&mut self, count: usize) -> Result<Vec<NodeId>, GraphError> {
        self.tokens.expect("back")?;
        (0..count).map(|_| self.back()).collect()
    }

    fn pair(&mut self, keyword: &str) -> Result<(usize, usize), GraphError> {
        self.tokens.expect(keyword)?;
        Ok((self.tokens.number(keyword)?, self.tokens.number(keyword)?))
    }

    fn single<T: FromStr>(&mut self, keyword: &str) -> Result<T, GraphError> {
        self.tokens.expect(keyword)?;
        self.tokens.number(keyword)
    }

    fn channel_count(&mut self) -> Result<usize, GraphError> {
        let line = self.tokens.line();
        let count: usize = self.single("channel")?;
        if count == 0 {
            return Err(GraphError::ParseError {
                line,
                message: "channel 必须≥1".to_string(),
            });
        }
        Ok(count)
    }

    /// 解析一个块，返回新建的节点
    fn block(&mut self) -> Result<NodeId, GraphError> {
        self.tokens.expect("id")?;
        let id_line = self.tokens.line();
        let file_id: u64 = self.tokens.number("节点编号")?;
        if self.ids.contains_key(&file_id) {
            return Err(GraphError::ParseError {
                line: id_line,
                message: format!("节点编号{file_id}重复定义"),
            });
        }
        self.tokens.expect("Node")?;
        let (kind_line, kind) = self.tokens.next("节点类型")?;

        let built = match kind {
            "Leaf1" => {
                let size = self.single("data")?;
                self.graph.new_leaf1(size)
            }
            "Leaf2" => {
                let (h, w) = self.pair("data")?;
                self.graph.new_leaf2(h, w)
            }
            "Add" | "Sub" | "Dots" | "MSE" | "CEE" => {
                let p = self.backs(2)?;
                match kind {
                    "Add" => self.graph.new_add(p[0], p[1]),
                    "Sub" => self.graph.new_sub(p[0], p[1]),
                    "Dots" => self.graph.new_dots(p[0], p[1]),
                    "MSE" => self.graph.new_mse(p[0], p[1]),
                    _ => self.graph.new_cee(p[0], p[1]),
                }
            }
            "ReLU" | "Sigmoid" | "Tanh" | "Softmax" | "Norm2" => {
                let p = self.backs(1)?[0];
                match kind {
                    "ReLU" => self.graph.new_relu(p),
                    "Sigmoid" => self.graph.new_sigmoid(p),
                    "Tanh" => self.graph.new_tanh(p),
                    "Softmax" => self.graph.new_softmax(p),
                    _ => self.graph.new_norm2(p),
                }
            }
            "Concatenation" => {
                let count = self.channel_count()?;
                let parents = self.backs(count)?;
                self.graph.new_concatenation(&parents)
            }
            "Affine" => {
                let parent = self.backs(1)?[0];
                let bias = self.single::<f64>("bias")?;
                let weight_line = self.tokens.line();
                let (domain, out) = self.pair("weight")?;
                let rows = domain.checked_add(1).ok_or_else(|| GraphError::ParseError {
                    line: weight_line,
                    message: format!("权重的定义域大小{domain}超出可表示的范围"),
                })?;
                let weight = self.tokens.matrix(weight_line, rows, out, "权重")?;
                self.graph.new_affine_with_bias(parent, weight, bias)
            }
            "Convolution2d" => {
                let count = self.channel_count()?;
                let channels = self.backs(count)?;
                let output = self.pair("data")?;
                let stride = self.single("stride")?;
                let padding = self.pair("padding")?;
                let bias = self.single::<f64>("bias")?;
                let kernel_line = self.tokens.line();
                let (kh, kw) = self.pair("kernel")?;
                let kernels = (0..count)
                    .map(|_| self.tokens.matrix(kernel_line, kh, kw, "卷积核"))
                    .collect::<Result<Vec<_>, _>>()?;
                let window = Window::explicit(kh, kw, stride, padding, output);
                self.graph.new_conv2d(&channels, &kernels, bias, window)
            }
            "MaxPooling2d" | "AveragePooling2d" => {
                let output = self.pair("data")?;
                let parent = self.backs(1)?[0];
                let stride = self.single("stride")?;
                let padding = self.pair("padding")?;
                let (kh, kw) = self.pair("filter")?;
                let window = Window::explicit(kh, kw, stride, padding, output);
                if kind == "MaxPooling2d" {
                    self.graph.new_max_pool2d(parent, window)
                } else {
                    self.graph.new_avg_pool2d(parent, window)
                }
            }
            other => {
                return Err(GraphError::ParseError {
                    line: kind_line,
                    message: format!("未知的节点类型`{other}`"),
                });
            }
        };

        // 构建失败（形状、窗口等）同样归为解析错误，定位到该块的类型行
        let node = built.map_err(|e| GraphError::ParseError {
            line: kind_line,
            message: e.to_string(),
        })?;
        self.ids.insert(file_id, node);
        Ok(node)
    }
}

impl Graph {
    /// 从文本解析出一张新图
    pub fn from_text(text: &str) -> Result<ParsedGraph, GraphError> {
        let mut parser = Parser {
            tokens: Tokens::new(text),
            graph: Self::new(),
            ids: HashMap::new(),
        };

        let mut last = None;
        while !parser.tokens.is_empty() {
            last = Some(parser.block()?);
        }
        let loss = last.ok_or_else(|| GraphError::ParseError {
            line: 1,
            message: "输入中没有任何节点".to_string(),
        })?;

        // back 只能引用更早的块，所以最后定义的节点必然是汇点
        let loss_node = parser.graph.get_node(loss)?;
        debug_assert!(loss_node.children().is_empty());

        log::debug!(
            "从文本解析出{}个节点，损失节点为{}",
            parser.graph.nodes_count(),
            loss_node
        );
        Ok(ParsedGraph {
            graph: parser.graph,
            loss,
            ids: parser.ids,
        })
    }
}
