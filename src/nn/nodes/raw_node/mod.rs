mod leaf;
mod loss;
mod ops;
mod shape_rules;

pub(crate) use leaf::{Leaf1, Leaf2};
pub(crate) use loss::{Cee, Mse};
pub(crate) use ops::*;
pub use ops::Window;

use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;

/// 全部节点种类（封闭的和类型）。编码/解码时对其做穷尽匹配，
/// 新增种类而漏掉任何一处处理都会在编译期报错。
#[enum_dispatch]
#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓输入↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    Leaf1(Leaf1),
    Leaf2(Leaf2),
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓算子↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    Add(Add),
    Sub(Sub),
    Dots(Dots),
    ReLU(ReLU),
    Sigmoid(Sigmoid),
    Tanh(Tanh),
    Softmax(Softmax),
    Norm2(Norm2),
    Concatenation(Concatenation),
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓带参数的层↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    Affine(Affine),
    Convolution2d(Convolution2d),
    MaxPooling2d(MaxPooling2d),
    AveragePooling2d(AveragePooling2d),
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓损失↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    Mse(Mse),
    Cee(Cee),
}

#[enum_dispatch(NodeType)]
pub(crate) trait TraitNode {
    /// 文本格式与图描述中使用的类型名，如"Add"、"Convolution2d"
    fn kind_name(&self) -> &'static str;

    /// 根据父节点的值计算本节点的值（由Graph保证所有父节点在本轮前向中已先算好）
    fn calc_value_by_parents(&mut self, parents: &[&Tensor], value: &mut Tensor);

    /// 计算本节点对每个父节点槽位的梯度贡献，按`parents`顺序一一对应返回；
    /// Graph 负责把贡献**累加**到父节点的梯度上。带参数的节点同时在此累加参数梯度。
    fn calc_grads_to_parents(
        &mut self,
        parents: &[&Tensor],
        value: &Tensor,
        grad: &Tensor,
    ) -> Vec<Tensor>;

    /// 以学习率`eta`做一步梯度下降，并清零参数梯度（无参数的节点什么都不做）
    fn apply_update(&mut self, _eta: f64) {}

    /// 可训练参数的个数
    fn param_count(&self) -> usize {
        0
    }

    /// 参数张量的快照（无参数的节点返回None）
    fn parameters(&self) -> Option<Vec<Tensor>> {
        None
    }

    /// 参数梯度累加器的快照，与`parameters`一一对应
    fn parameter_grads(&self) -> Option<Vec<Tensor>> {
        None
    }
}
