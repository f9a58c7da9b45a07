/*
 * @Description  : Graph 节点构建方法（new_*）
 *
 * 每个构建方法都先校验父节点存在、形状合法，再放入 arena；
 * 任一校验失败都直接返回错误，图保持原样。
 */

use super::super::error::GraphError;
use super::Graph;
use crate::nn::nodes::Window;
use crate::nn::nodes::raw_node::{
    Add, Affine, AveragePooling2d, Cee, Concatenation, Convolution2d, DEFAULT_AFFINE_BIAS, Dots,
    Leaf1, Leaf2, MaxPooling2d, Mse, Norm2, ReLU, Sigmoid, Softmax, Sub, Tanh,
};
use crate::nn::NodeId;
use crate::tensor::Tensor;

impl Graph {
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓源节点↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/

    /// 创建一维源节点（`size × 1`），初始值全为0
    pub fn new_leaf1(&mut self, size: usize) -> Result<NodeId, GraphError> {
        let (node, shape) = Leaf1::new(size)?;
        Ok(self.add_node(node, shape, &[]))
    }

    /// 创建二维源节点（`height × width`），初始值全为0
    pub fn new_leaf2(&mut self, height: usize, width: usize) -> Result<NodeId, GraphError> {
        let (node, shape) = Leaf2::new(height, width)?;
        Ok(self.add_node(node, shape, &[]))
    }

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓二元运算↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/

    pub fn new_add(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, GraphError> {
        let parents = [a, b];
        let (node, shape) = Add::new(&self.parent_shapes(&parents)?)?;
        Ok(self.add_node(node, shape, &parents))
    }

    pub fn new_sub(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, GraphError> {
        let parents = [a, b];
        let (node, shape) = Sub::new(&self.parent_shapes(&parents)?)?;
        Ok(self.add_node(node, shape, &parents))
    }

    pub fn new_dots(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, GraphError> {
        let parents = [a, b];
        let (node, shape) = Dots::new(&self.parent_shapes(&parents)?)?;
        Ok(self.add_node(node, shape, &parents))
    }

    /// 均方误差损失：`a`为预测值，`b`为目标值
    pub fn new_mse(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, GraphError> {
        let parents = [a, b];
        let (node, shape) = Mse::new(&self.parent_shapes(&parents)?)?;
        Ok(self.add_node(node, shape, &parents))
    }

    /// 交叉熵损失：`a`为预测概率，`b`为目标分布
    pub fn new_cee(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, GraphError> {
        let parents = [a, b];
        let (node, shape) = Cee::new(&self.parent_shapes(&parents)?)?;
        Ok(self.add_node(node, shape, &parents))
    }

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓一元运算↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/

    pub fn new_relu(&mut self, x: NodeId) -> Result<NodeId, GraphError> {
        let (node, shape) = ReLU::new(&self.parent_shapes(&[x])?)?;
        Ok(self.add_node(node, shape, &[x]))
    }

    pub fn new_sigmoid(&mut self, x: NodeId) -> Result<NodeId, GraphError> {
        let (node, shape) = Sigmoid::new(&self.parent_shapes(&[x])?)?;
        Ok(self.add_node(node, shape, &[x]))
    }

    pub fn new_tanh(&mut self, x: NodeId) -> Result<NodeId, GraphError> {
        let (node, shape) = Tanh::new(&self.parent_shapes(&[x])?)?;
        Ok(self.add_node(node, shape, &[x]))
    }

    pub fn new_softmax(&mut self, x: NodeId) -> Result<NodeId, GraphError> {
        let (node, shape) = Softmax::new(&self.parent_shapes(&[x])?)?;
        Ok(self.add_node(node, shape, &[x]))
    }

    pub fn new_norm2(&mut self, x: NodeId) -> Result<NodeId, GraphError> {
        let (node, shape) = Norm2::new(&self.parent_shapes(&[x])?)?;
        Ok(self.add_node(node, shape, &[x]))
    }

    /// 把若干列向量首尾相接成一个列向量
    pub fn new_concatenation(&mut self, parents: &[NodeId]) -> Result<NodeId, GraphError> {
        let (node, shape) = Concatenation::new(&self.parent_shapes(parents)?)?;
        Ok(self.add_node(node, shape, parents))
    }

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓带参数的层↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/

    /// 全连接层，偏置乘数取默认值1
    ///
    /// `weight`的形状必须为`(x的元素数 + 1) × 输出长度`，最后一行为偏置行。
    pub fn new_affine(&mut self, x: NodeId, weight: Tensor) -> Result<NodeId, GraphError> {
        self.new_affine_with_bias(x, weight, DEFAULT_AFFINE_BIAS)
    }

    pub fn new_affine_with_bias(
        &mut self,
        x: NodeId,
        weight: Tensor,
        bias: f64,
    ) -> Result<NodeId, GraphError> {
        let (node, shape) = Affine::new(&self.parent_shapes(&[x])?, weight, bias)?;
        Ok(self.add_node(node, shape, &[x]))
    }

    /// 二维卷积：`channels[c]`与`kernels[c]`一一对应，所有通道共享一个标量偏置
    pub fn new_conv2d(
        &mut self,
        channels: &[NodeId],
        kernels: &[Tensor],
        bias: f64,
        window: Window,
    ) -> Result<NodeId, GraphError> {
        let (node, shape) = Convolution2d::new(
            &self.parent_shapes(channels)?,
            kernels.to_vec(),
            bias,
            window,
        )?;
        Ok(self.add_node(node, shape, channels))
    }

    pub fn new_max_pool2d(&mut self, x: NodeId, window: Window) -> Result<NodeId, GraphError> {
        let (node, shape) = MaxPooling2d::new(&self.parent_shapes(&[x])?, window)?;
        Ok(self.add_node(node, shape, &[x]))
    }

    /// 平均池化，除数恒为窗口面积（填充区按0计入）
    pub fn new_avg_pool2d(&mut self, x: NodeId, window: Window) -> Result<NodeId, GraphError> {
        let (node, shape) = AveragePooling2d::new(&self.parent_shapes(&[x])?, window)?;
        Ok(self.add_node(node, shape, &[x]))
    }
}
