use super::Tensor;
use std::ops::{Index, IndexMut};

// 按行主序的扁平下标索引
impl Index<usize> for Tensor {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data_as_slice()[index]
    }
}

impl IndexMut<usize> for Tensor {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data_as_slice_mut()[index]
    }
}

// 按[行, 列]索引
impl Index<[usize; 2]> for Tensor {
    type Output = f64;

    fn index(&self, index: [usize; 2]) -> &Self::Output {
        &self.data[index]
    }
}

impl IndexMut<[usize; 2]> for Tensor {
    fn index_mut(&mut self, index: [usize; 2]) -> &mut Self::Output {
        &mut self.data[index]
    }
}
