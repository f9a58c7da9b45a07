mod add;
mod affine;
mod avg_pool2d;
mod concatenation;
mod conv2d;
mod dots;
mod filter2d;
mod max_pool2d;
mod norm2;
mod relu;
mod sigmoid;
mod softmax;
mod subtract;
mod tanh;

pub(crate) use add::Add;
pub(crate) use affine::{Affine, DEFAULT_AFFINE_BIAS};
pub(crate) use avg_pool2d::AveragePooling2d;
pub(crate) use concatenation::Concatenation;
pub(crate) use conv2d::Convolution2d;
pub(crate) use dots::Dots;
pub(crate) use filter2d::Filter2d;
pub use filter2d::Window;
pub(crate) use max_pool2d::MaxPooling2d;
pub(crate) use norm2::Norm2;
pub(crate) use relu::ReLU;
pub(crate) use sigmoid::Sigmoid;
pub(crate) use softmax::Softmax;
pub(crate) use subtract::Sub;
pub(crate) use tanh::Tanh;
