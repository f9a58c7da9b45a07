/*
 * @Description  : MaxPooling2d（单通道二维最大池化）
 *
 * 前向：扫描窗口内落在输入范围内的单元，记录最大值及与之相等的单元个数（并列数）。
 * 反向：把 g / 并列数 分给窗口内每个等于该最大值的输入单元，
 *       并列时梯度被平分，既不丢失也不重复。
 */

use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::raw_node::ops::{Filter2d, Window};
use crate::nn::nodes::raw_node::shape_rules;
use crate::nn::{GraphError, NodeShape};
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub(crate) struct MaxPooling2d {
    filter: Filter2d,
    /// 每个输出位置上与最大值相等的输入单元个数（前向时写入）
    tie_counts: Vec<usize>,
}

impl MaxPooling2d {
    pub(crate) fn new(
        parents: &[NodeShape],
        window: Window,
    ) -> Result<(Self, NodeShape), GraphError> {
        shape_rules::expect_parent_count("MaxPooling2d", parents, 1)?;
        let filter = Filter2d::new("MaxPooling2d", parents[0], window)?;
        filter.check_windows_nonempty()?;
        let (out_h, out_w) = filter.output;
        Ok((
            Self {
                filter,
                tie_counts: vec![0; out_h * out_w],
            },
            filter.output_shape(parents[0].size()),
        ))
    }

    pub(crate) const fn filter(&self) -> &Filter2d {
        &self.filter
    }
}

impl TraitNode for MaxPooling2d {
    fn kind_name(&self) -> &'static str {
        "MaxPooling2d"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor], value: &mut Tensor) {
        let input = parents[0];
        let (out_h, out_w) = self.filter.output;
        for a in 0..out_h {
            for b in 0..out_w {
                let mut max: Option<f64> = None;
                let mut count = 0;
                self.filter.for_each_in_window(a, b, |_, _, index| {
                    let x = input[index];
                    match max {
                        Some(m) if x == m => count += 1,
                        Some(m) if x < m => {}
                        _ => {
                            max = Some(x);
                            count = 1;
                        }
                    }
                });
                // 构造时已排除空窗口
                debug_assert!(count > 0);
                value[[a, b]] = max.unwrap_or(0.0);
                self.tie_counts[a * out_w + b] = count;
            }
        }
    }

    fn calc_grads_to_parents(
        &mut self,
        parents: &[&Tensor],
        value: &Tensor,
        grad: &Tensor,
    ) -> Vec<Tensor> {
        let input = parents[0];
        let (out_h, out_w) = self.filter.output;
        let mut to_parent = Tensor::zeros(input.height(), input.width());
        for a in 0..out_h {
            for b in 0..out_w {
                let max = value[[a, b]];
                let share = grad[[a, b]] / self.tie_counts[a * out_w + b] as f64;
                self.filter.for_each_in_window(a, b, |_, _, index| {
                    if input[index] == max {
                        to_parent[index] += share;
                    }
                });
            }
        }
        vec![to_parent]
    }
}
