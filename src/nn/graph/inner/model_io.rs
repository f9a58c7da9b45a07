/*
 * @Description  : Graph 文本格式的文件读写（save_text/load_text）
 *
 * 与 serialization.rs / parser.rs 的区别：
 * - serialization.rs / parser.rs：内存中的字符串编解码
 * - model_io.rs：文件 I/O，I/O 错误统一映射为`GraphError::Io`
 */

use super::super::error::GraphError;
use super::{Graph, ParsedGraph};
use crate::nn::NodeId;
use std::path::Path;

impl Graph {
    /// 把以`loss`为汇点的子图以文本格式保存到文件
    ///
    /// # 示例
    /// ```ignore
    /// graph.save_text(loss, "models/xor.cg")?;
    /// ```
    pub fn save_text<P: AsRef<Path>>(&self, loss: NodeId, path: P) -> Result<(), GraphError> {
        let path = path.as_ref();
        let text = self.to_text(loss)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, text)?;
        log::info!("图[{}]已保存到{}", self.name, path.display());
        Ok(())
    }

    /// 从文本格式的文件加载一张新图
    pub fn load_text<P: AsRef<Path>>(path: P) -> Result<ParsedGraph, GraphError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let parsed = Self::from_text(&text)?;
        log::info!(
            "已从{}加载{}个节点",
            path.display(),
            parsed.graph.nodes_count()
        );
        Ok(parsed)
    }
}
