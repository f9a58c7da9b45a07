use thiserror::Error;

/// 张量构造/运算时的错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    #[error("数据长度{data_len}与形状{shape:?}不一致")]
    InconsistentShape { data_len: usize, shape: Vec<usize> },
    #[error("张量形状必须为1阶或2阶，得到{0:?}")]
    UnsupportedRank(Vec<usize>),
    #[error("二维输入的行列表为空")]
    EmptyRows,
    #[error("二维输入的第{row}行长度为{got}，预期为{expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error(
        "形状不一致，故无法{operator}：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}"
    )]
    OperatorError {
        operator: &'static str,
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },
}
