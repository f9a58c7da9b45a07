/*
 * @Description  : 计算图节点所用的稠密二维张量（行主序，f64）
 */

use ndarray::Array2;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::TensorError;

mod ops {
    pub mod add_assign;
    pub mod eq;
    pub mod map;
}

mod index;
mod print;
mod property;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。本库中所有节点的值、梯度与参数都是`高×宽`的二维张量；
/// 向量统一以列向量`[n, 1]`存放（即宽为1）。
/// 注：通常意义上的数字（类型为usize、f64等）就只是纯数（number），在这里不被认为是张量。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    data: Array2<f64>,
}

impl Tensor {
    /// 创建一个张量，`shape`可以是`[n]`（视为列向量`[n, 1]`）或`[h, w]`。
    /// 注：`data`的长度必须和`shape`中所有元素的乘积相等，否则panic；
    /// 需要错误处理时请使用[`Tensor::try_new`]。
    pub fn new(data: &[f64], shape: &[usize]) -> Self {
        match Self::try_new(data, shape) {
            Ok(tensor) => tensor,
            Err(e) => panic!("{e}"),
        }
    }

    /// 同[`Tensor::new`]，但以`Result`返回形状错误
    pub fn try_new(data: &[f64], shape: &[usize]) -> Result<Self, TensorError> {
        let (height, width) = match *shape {
            [n] => (n, 1),
            [h, w] => (h, w),
            _ => return Err(TensorError::UnsupportedRank(shape.to_vec())),
        };
        if data.len() != height * width {
            return Err(TensorError::InconsistentShape {
                data_len: data.len(),
                shape: shape.to_vec(),
            });
        }
        let data = Array2::from_shape_vec((height, width), data.to_vec()).map_err(|_| {
            TensorError::InconsistentShape {
                data_len: data.len(),
                shape: shape.to_vec(),
            }
        })?;
        Ok(Self { data })
    }

    /// 创建一个全零张量
    pub fn zeros(height: usize, width: usize) -> Self {
        Self {
            data: Array2::zeros((height, width)),
        }
    }

    /// 由若干等长的行构造张量（行主序）
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, TensorError> {
        let first = rows.first().ok_or(TensorError::EmptyRows)?;
        let width = first.len();
        let mut data = Vec::with_capacity(rows.len() * width);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != width {
                return Err(TensorError::RaggedRows {
                    row,
                    expected: width,
                    got: values.len(),
                });
            }
            data.extend_from_slice(values);
        }
        Self::try_new(&data, &[rows.len(), width])
    }

    /// 创建一个随机张量，其值在[min, max]的闭区间
    pub fn new_random(min: f64, max: f64, shape: &[usize]) -> Self {
        Self::new_random_with_rng(min, max, shape, &mut rand::thread_rng())
    }

    /// 同[`Tensor::new_random`]，但使用调用方给定的随机数生成器（便于复现）
    pub fn new_random_with_rng<R: Rng>(min: f64, max: f64, shape: &[usize], rng: &mut R) -> Self {
        let dist = Uniform::from(min..=max);
        let data = (0..shape.iter().product::<usize>())
            .map(|_| dist.sample(rng))
            .collect::<Vec<_>>();
        Self::new(&data, shape)
    }
}
