/*
 * @Description  : 训练配置
 */

use serde::{Deserialize, Serialize};

/// [`Network::fit`](crate::nn::Network::fit)的训练配置（builder 风格）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// 训练轮数
    pub epochs: usize,
    pub learning_rate: f64,
    /// 每累积多少个样本的梯度执行一次 update；None 表示每轮结束时 update 一次
    pub update_every: Option<usize>,
    /// 每隔多少轮输出一次 info 日志
    pub log_every: usize,
    /// 是否输出训练进度日志
    pub verbose: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 10,
            learning_rate: 0.001,
            update_every: None,
            log_every: 1,
            verbose: true,
        }
    }
}

impl TrainingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub const fn learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    /// 设为`Some(1)`即逐样本更新
    pub const fn update_every(mut self, examples: Option<usize>) -> Self {
        self.update_every = examples;
        self
    }

    pub const fn log_every(mut self, epochs: usize) -> Self {
        self.log_every = epochs;
        self
    }

    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
