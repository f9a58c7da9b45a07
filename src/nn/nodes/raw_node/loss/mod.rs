mod cee;
mod mse;

pub(crate) use cee::Cee;
pub(crate) use mse::Mse;
