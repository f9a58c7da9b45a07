/*
 * @Description  : Convolution2d（多通道输入、单通道输出的二维卷积）
 *
 * 父节点：
 * - parents[c]: 第c个输入通道，所有通道形状一致
 *
 * 参数：
 * - kernels[c]: 第c个通道的卷积核切片（kh × kw）
 * - bias: 所有输出位置共享的一个标量偏置
 *
 * 前向：out[a][b] = bias + Σ_c Σ_i Σ_j K[c][i][j] · x_c[a·s+i-pt][b·s+j-pl]
 */

use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::raw_node::ops::{Filter2d, Window};
use crate::nn::{GraphError, NodeShape};
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub(crate) struct Convolution2d {
    filter: Filter2d,
    kernels: Vec<Tensor>,
    grad_kernels: Vec<Tensor>,
    bias: f64,
    grad_bias: f64,
}

impl Convolution2d {
    pub(crate) fn new(
        parents: &[NodeShape],
        kernels: Vec<Tensor>,
        bias: f64,
        window: Window,
    ) -> Result<(Self, NodeShape), GraphError> {
        let first = *parents.first().ok_or_else(|| {
            GraphError::InvalidOperation("Convolution2d节点至少需要1个输入通道".to_string())
        })?;
        for p in parents {
            if p.dims() != first.dims() {
                return Err(GraphError::ShapeMismatch {
                    expected: first.dims().to_vec(),
                    got: p.dims().to_vec(),
                    message: "Convolution2d各输入通道的形状必须一致".to_string(),
                });
            }
        }
        if kernels.len() != parents.len() {
            return Err(GraphError::InvalidOperation(format!(
                "Convolution2d的卷积核切片数({})必须等于输入通道数({})",
                kernels.len(),
                parents.len()
            )));
        }
        let (kh, kw) = window.kernel();
        for k in &kernels {
            if k.shape() != [kh, kw] {
                return Err(GraphError::ShapeMismatch {
                    expected: vec![kh, kw],
                    got: k.shape().to_vec(),
                    message: "卷积核切片的形状必须与窗口一致".to_string(),
                });
            }
        }

        let filter = Filter2d::new("Convolution2d", first, window)?;
        let domain_size = parents.iter().map(NodeShape::size).sum();
        let grad_kernels = kernels.iter().map(|_| Tensor::zeros(kh, kw)).collect();
        Ok((
            Self {
                filter,
                kernels,
                grad_kernels,
                bias,
                grad_bias: 0.0,
            },
            filter.output_shape(domain_size),
        ))
    }

    pub(crate) const fn filter(&self) -> &Filter2d {
        &self.filter
    }

    pub(crate) fn kernels(&self) -> &[Tensor] {
        &self.kernels
    }

    pub(crate) const fn bias(&self) -> f64 {
        self.bias
    }
}

impl TraitNode for Convolution2d {
    fn kind_name(&self) -> &'static str {
        "Convolution2d"
    }

    fn calc_value_by_parents(&mut self, parents: &[&Tensor], value: &mut Tensor) {
        let (out_h, out_w) = self.filter.output;
        for a in 0..out_h {
            for b in 0..out_w {
                let mut sum = self.bias;
                for (channel, kernel) in parents.iter().zip(&self.kernels) {
                    self.filter.for_each_in_window(a, b, |i, j, index| {
                        sum += kernel[[i, j]] * channel[index];
                    });
                }
                value[[a, b]] = sum;
            }
        }
    }

    fn calc_grads_to_parents(
        &mut self,
        parents: &[&Tensor],
        _value: &Tensor,
        grad: &Tensor,
    ) -> Vec<Tensor> {
        let (out_h, out_w) = self.filter.output;
        let mut grads: Vec<Tensor> = parents
            .iter()
            .map(|p| Tensor::zeros(p.height(), p.width()))
            .collect();
        for a in 0..out_h {
            for b in 0..out_w {
                let g = grad[[a, b]];
                self.grad_bias += g;
                for c in 0..parents.len() {
                    let kernel = &self.kernels[c];
                    let grad_kernel = &mut self.grad_kernels[c];
                    let channel = parents[c];
                    let to_channel = &mut grads[c];
                    self.filter.for_each_in_window(a, b, |i, j, index| {
                        to_channel[index] += kernel[[i, j]] * g;
                        grad_kernel[[i, j]] += channel[index] * g;
                    });
                }
            }
        }
        grads
    }

    fn apply_update(&mut self, eta: f64) {
        for (kernel, grad) in self.kernels.iter_mut().zip(&mut self.grad_kernels) {
            kernel.scaled_add(-eta, grad);
            grad.fill(0.0);
        }
        self.bias -= eta * self.grad_bias;
        self.grad_bias = 0.0;
    }

    fn param_count(&self) -> usize {
        self.kernels.iter().map(Tensor::size).sum::<usize>() + 1
    }

    fn parameters(&self) -> Option<Vec<Tensor>> {
        let mut params = self.kernels.clone();
        params.push(Tensor::new(&[self.bias], &[1, 1]));
        Some(params)
    }

    fn parameter_grads(&self) -> Option<Vec<Tensor>> {
        let mut grads = self.grad_kernels.clone();
        grads.push(Tensor::new(&[self.grad_bias], &[1, 1]));
        Some(grads)
    }
}
