/*
 * @Description  : 二维窗口（卷积核/池化窗）的公共几何
 *
 * 输出尺寸：`floor((in + 2·pad - k) / stride) + 1`。
 * 越界（落在填充区）的读取视为0，且不回传梯度。
 */

use crate::nn::{GraphError, NodeShape};

/// 二维窗口配置。除`Explicit`外，其余三种会按输入尺寸推导出缺省的填充或输出尺寸。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// 直接指定步长、(上, 左)填充与输出尺寸
    Explicit {
        kernel: (usize, usize),
        stride: usize,
        padding: (usize, usize),
        output: (usize, usize),
    },
    /// 指定输出尺寸，填充取居中值`(stride·(h-1) + k - in) / 2`
    Output {
        kernel: (usize, usize),
        stride: usize,
        output: (usize, usize),
    },
    /// 指定步长，输出取`ceil((in - k) / stride) + 1`，填充居中
    Stride {
        kernel: (usize, usize),
        stride: usize,
    },
    /// 步长1、无填充，输出为`in - k + 1`
    Valid { kernel: (usize, usize) },
}

impl Window {
    pub const fn explicit(
        kernel_height: usize,
        kernel_width: usize,
        stride: usize,
        padding: (usize, usize),
        output: (usize, usize),
    ) -> Self {
        Self::Explicit {
            kernel: (kernel_height, kernel_width),
            stride,
            padding,
            output,
        }
    }

    pub const fn with_output(
        kernel_height: usize,
        kernel_width: usize,
        stride: usize,
        output: (usize, usize),
    ) -> Self {
        Self::Output {
            kernel: (kernel_height, kernel_width),
            stride,
            output,
        }
    }

    pub const fn with_stride(kernel_height: usize, kernel_width: usize, stride: usize) -> Self {
        Self::Stride {
            kernel: (kernel_height, kernel_width),
            stride,
        }
    }

    pub const fn valid(kernel_height: usize, kernel_width: usize) -> Self {
        Self::Valid {
            kernel: (kernel_height, kernel_width),
        }
    }

    pub const fn kernel(&self) -> (usize, usize) {
        match *self {
            Self::Explicit { kernel, .. }
            | Self::Output { kernel, .. }
            | Self::Stride { kernel, .. }
            | Self::Valid { kernel } => kernel,
        }
    }
}

/// 由输入尺寸和[`Window`]解析出的完整几何，构造后不再改变
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Filter2d {
    pub(crate) input: (usize, usize),
    pub(crate) kernel: (usize, usize),
    pub(crate) stride: usize,
    pub(crate) padding: (usize, usize),
    pub(crate) output: (usize, usize),
}

impl Filter2d {
    pub(crate) fn new(kind: &str, input: NodeShape, window: Window) -> Result<Self, GraphError> {
        let (in_h, in_w) = (input.height, input.width);
        let (kh, kw) = window.kernel();

        if kh == 0 || kw == 0 || kh > in_h || kw > in_w {
            return Err(GraphError::ShapeMismatch {
                expected: vec![in_h, in_w],
                got: vec![kh, kw],
                message: format!("{kind}的窗口必须非空且不能大于输入"),
            });
        }

        let (stride, padding, output) = match window {
            Window::Explicit {
                stride,
                padding,
                output,
                ..
            } => (stride, padding, output),
            Window::Output { stride, output, .. } => {
                let padding = centered_padding(kind, stride, (in_h, in_w), (kh, kw), output)?;
                (stride, padding, output)
            }
            Window::Stride { stride, .. } => {
                expect_positive_stride(kind, stride)?;
                let output = ((in_h - kh).div_ceil(stride) + 1, (in_w - kw).div_ceil(stride) + 1);
                let padding = centered_padding(kind, stride, (in_h, in_w), (kh, kw), output)?;
                (stride, padding, output)
            }
            Window::Valid { .. } => (1, (0, 0), (in_h - kh + 1, in_w - kw + 1)),
        };

        expect_positive_stride(kind, stride)?;
        if output.0 == 0 || output.1 == 0 {
            return Err(GraphError::PreconditionViolation(format!(
                "{kind}的输出尺寸必须≥1，实际为{output:?}"
            )));
        }
        // 保证后续`a·stride + i`形式的下标计算不会溢出
        window_span(kind, stride, output.0, kh)?;
        window_span(kind, stride, output.1, kw)?;

        Ok(Self {
            input: (in_h, in_w),
            kernel: (kh, kw),
            stride,
            padding,
            output,
        })
    }

    pub(crate) const fn output_shape(&self, domain_size: usize) -> NodeShape {
        NodeShape::new(domain_size, self.output.0, self.output.1)
    }

    /// 每个输出位置的窗口都至少覆盖一个输入单元，否则返回第一个（行主序）退化位置
    ///
    /// 对池化而言，这等价于上、下、左、右四个方向的填充都小于窗口在该方向上的尺寸
    /// （下/右填充为`stride·(h-1) + k - in - pad`）：某一侧填充≥窗口尺寸时，
    /// 该侧最外一排窗口必然完全落在填充区内。
    pub(crate) fn check_windows_nonempty(&self) -> Result<(), GraphError> {
        let row_ok = |a: usize| (0..self.kernel.0).any(|i| self.input_row(a, i).is_some());
        let col_ok = |b: usize| (0..self.kernel.1).any(|j| self.input_col(b, j).is_some());
        for row in 0..self.output.0 {
            for col in 0..self.output.1 {
                if !row_ok(row) || !col_ok(col) {
                    return Err(GraphError::DegenerateWindow { row, col });
                }
            }
        }
        Ok(())
    }

    fn input_row(&self, a: usize, i: usize) -> Option<usize> {
        (a * self.stride + i)
            .checked_sub(self.padding.0)
            .filter(|&r| r < self.input.0)
    }

    fn input_col(&self, b: usize, j: usize) -> Option<usize> {
        (b * self.stride + j)
            .checked_sub(self.padding.1)
            .filter(|&c| c < self.input.1)
    }

    /// 输出位置`(a, b)`的窗口内偏移`(i, j)`对应的输入平坦下标；落在填充区时为None
    pub(crate) fn input_index(&self, a: usize, b: usize, i: usize, j: usize) -> Option<usize> {
        let row = self.input_row(a, i)?;
        let col = self.input_col(b, j)?;
        Some(row * self.input.1 + col)
    }

    /// 依次访问输出位置`(a, b)`窗口内所有落在输入范围内的单元：`f(i, j, 输入下标)`
    pub(crate) fn for_each_in_window(
        &self,
        a: usize,
        b: usize,
        mut f: impl FnMut(usize, usize, usize),
    ) {
        for i in 0..self.kernel.0 {
            for j in 0..self.kernel.1 {
                if let Some(index) = self.input_index(a, b, i, j) {
                    f(i, j, index);
                }
            }
        }
    }
}

fn expect_positive_stride(kind: &str, stride: usize) -> Result<(), GraphError> {
    if stride == 0 {
        return Err(GraphError::PreconditionViolation(format!(
            "{kind}的步长必须≥1"
        )));
    }
    Ok(())
}

/// 窗口在一个方向上的总覆盖范围`stride·(output-1) + kernel`，要求`output ≥ 1`
fn window_span(kind: &str, stride: usize, output: usize, kernel: usize) -> Result<usize, GraphError> {
    stride
        .checked_mul(output - 1)
        .and_then(|span| span.checked_add(kernel))
        .ok_or_else(|| {
            GraphError::PreconditionViolation(format!(
                "{kind}的窗口覆盖范围超出可表示的范围：步长{stride}，输出尺寸{output}，窗口尺寸{kernel}"
            ))
        })
}

fn centered_padding(
    kind: &str,
    stride: usize,
    input: (usize, usize),
    kernel: (usize, usize),
    output: (usize, usize),
) -> Result<(usize, usize), GraphError> {
    expect_positive_stride(kind, stride)?;
    if output.0 == 0 || output.1 == 0 {
        return Err(GraphError::PreconditionViolation(format!(
            "{kind}的输出尺寸必须≥1，实际为{output:?}"
        )));
    }
    let span_h = window_span(kind, stride, output.0, kernel.0)?;
    let span_w = window_span(kind, stride, output.1, kernel.1)?;
    if span_h < input.0 || span_w < input.1 {
        return Err(GraphError::PreconditionViolation(format!(
            "{kind}的窗口覆盖范围{:?}小于输入{input:?}，无法推导居中填充",
            (span_h, span_w)
        )));
    }
    Ok(((span_h - input.0) / 2, (span_w - input.1) / 2))
}
