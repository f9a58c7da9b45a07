/*
 * @Description  : 单次遍历（前向/反向/更新）的汇合计数器
 *
 * 每次遍历都新建一份，遍历结束即丢弃，因此同一个图可以安全地反复遍历，
 * 不存在“上一轮没清零”的问题。
 */

/// 每个节点一个计数器：`arrived[i]`为本轮已到达的边数，`expected[i]`为需要等待的边数。
/// 到齐后计数器自动归零。
#[derive(Debug, Clone)]
pub(in crate::nn::graph) struct JoinCounters {
    arrived: Vec<usize>,
    expected: Vec<usize>,
}

impl JoinCounters {
    pub(in crate::nn::graph) fn new(expected: Vec<usize>) -> Self {
        Self {
            arrived: vec![0; expected.len()],
            expected,
        }
    }

    /// 记录一条边到达节点`index`；若所有边均已到达则返回true（节点可以触发）
    pub(in crate::nn::graph) fn arrive(&mut self, index: usize) -> bool {
        self.arrived[index] += 1;
        if self.arrived[index] < self.expected[index] {
            return false;
        }
        self.arrived[index] = 0;
        true
    }

    /// 所有计数器都已归零（即没有“只到了一半”的节点）
    pub(in crate::nn::graph) fn is_settled(&self) -> bool {
        self.arrived.iter().all(|&n| n == 0)
    }
}
