/*
 * @Description  : AveragePooling2d（单通道二维平均池化）
 *
 * 除数恒为 kh·kw：落在填充区的单元按0计入平均值（而不是只除以有效单元数）。
 * 反向时每个落在输入范围内的窗口单元得到 g / (kh·kw)。
 */

use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::raw_node::ops::{Filter2d, Window};
use crate::nn::nodes::raw_node::shape_rules;
use crate::nn::{GraphError, NodeShape};
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub(crate) struct AveragePooling2d {
    filter: Filter2d,
}

impl AveragePooling2d {
    pub(crate) fn new(
        parents: &[NodeShape],
        window: Window,
    ) -> Result<(Self, NodeShape), GraphError> {
        shape_rules::expect_parent_count("AveragePooling2d", parents, 1)?;
        let filter = Filter2d::new("AveragePooling2d", parents[0], window)?;
        filter.check_windows_nonempty()?;
        Ok((Self { filter }, filter.output_shape(parents[0].size())))
    }

    pub(crate) const fn filter(&self) -> &Filter2d {
        &self.filter
    }

    fn divisor(&self) -> f64 {
        (self.filter.kernel.0 * self.filter.kernel.1) as f64
    }
}

impl TraitNode for AveragePooling2d {
    fn kind_name(&self) -> &'static str {
        "AveragePooling2d"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor], value: &mut Tensor) {
        let input = parents[0];
        let divisor = self.divisor();
        let (out_h, out_w) = self.filter.output;
        for a in 0..out_h {
            for b in 0..out_w {
                let mut sum = 0.0;
                self.filter
                    .for_each_in_window(a, b, |_, _, index| sum += input[index]);
                value[[a, b]] = sum / divisor;
            }
        }
    }

    fn calc_grads_to_parents(
        &mut self,
        parents: &[&Tensor],
        _value: &Tensor,
        grad: &Tensor,
    ) -> Vec<Tensor> {
        let input = parents[0];
        let divisor = self.divisor();
        let (out_h, out_w) = self.filter.output;
        let mut to_parent = Tensor::zeros(input.height(), input.width());
        for a in 0..out_h {
            for b in 0..out_w {
                let share = grad[[a, b]] / divisor;
                self.filter
                    .for_each_in_window(a, b, |_, _, index| to_parent[index] += share);
            }
        }
        vec![to_parent]
    }
}
