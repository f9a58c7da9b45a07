/*
 * @Description  : 本文件仅包含一些属性方法，不包含任何运算方法
 */

use super::Tensor;

impl Tensor {
    /// 张量形状，恒为`[高, 宽]`
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    /// 计算张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 判断两个张量的形状是否严格一致
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /// 判断张量是否为标量（仅含1个元素）
    pub fn is_scalar(&self) -> bool {
        self.size() == 1
    }

    /// 转化为纯数（number）。若为标量，则返回Some(number)，否则返回None
    pub fn number(&self) -> Option<f64> {
        if self.is_scalar() {
            self.data.iter().next().copied()
        } else {
            None
        }
    }

    /// 以行主序的切片形式访问数据
    pub fn data_as_slice(&self) -> &[f64] {
        // 构造时总是标准布局
        self.data
            .as_slice()
            .expect("张量数据必须是连续的标准布局")
    }

    pub fn data_as_slice_mut(&mut self) -> &mut [f64] {
        self.data
            .as_slice_mut()
            .expect("张量数据必须是连续的标准布局")
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.data_as_slice().to_vec()
    }

    /// 按行拆分为嵌套的`Vec`
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.outer_iter().map(|row| row.to_vec()).collect()
    }

    pub fn sum(&self) -> f64 {
        self.data.sum()
    }

    /// 所有元素都是有限数（非NaN、非无穷）
    pub fn is_all_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }
}
