use crate::node::{Node, NodeKind};
use crate::rectangle::Rectangle;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// 默认叶子容量（每个叶子的最大矩形数）
pub const DEFAULT_BUNDLE_FACTOR: usize = 1024;

/// 默认扇出（每个索引节点的最大子节点数）
pub const DEFAULT_FANOUT: usize = 128;

/// R-tree主结构
///
/// 由批量装载器一次性构建（见`algorithms::bulk_load`），之后只读。
/// 不提供任何插入/删除/再平衡接口：树是不可变的，可以在多个线程间
/// 以共享引用安全地并发查询，读取无需任何同步。
#[derive(Debug, Clone)]
pub struct RTree {
    /// 根节点；空数据集装载后为None
    root: Option<Box<Node>>,
    /// 叶子容量
    bundle_factor: usize,
    /// 索引节点扇出
    fanout: usize,
}

/// R-tree结构统计信息
///
/// 由一次只读全遍历得到：节点总数、叶子数、索引节点数、最大深度（根为1）。
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[display(
    fmt = "Total Nodes: {}, Index Nodes: {}, Leaf Nodes: {}, Levels: {}",
    total_nodes,
    index_nodes,
    leaf_nodes,
    max_depth
)]
pub struct RTreeStats {
    pub total_nodes: usize,
    pub leaf_nodes: usize,
    pub index_nodes: usize,
    pub max_depth: usize,
}

impl RTreeStats {
    /// 导出为JSON字符串，供外部报告层持久化或打印
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl RTree {
    /// 内部方法：由批量装载器用根节点和参数组装树
    pub(crate) fn from_root(root: Option<Node>, bundle_factor: usize, fanout: usize) -> Self {
        RTree {
            root: root.map(Box::new),
            bundle_factor,
            fanout,
        }
    }

    /// 检查R-tree是否为空
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// 获取R-tree的根节点MBR
    pub fn root_mbr(&self) -> Option<&Rectangle> {
        self.root.as_ref().map(|node| &node.mbr)
    }

    /// 获取叶子容量
    pub fn bundle_factor(&self) -> usize {
        self.bundle_factor
    }

    /// 获取扇出
    pub fn fanout(&self) -> usize {
        self.fanout
    }

    /// 获取树中存储的矩形总数
    pub fn len(&self) -> usize {
        self.root.as_deref().map_or(0, count_rects)
    }

    /// 获取树的深度（根为1，空树为0）
    ///
    /// STR自底向上构建保证所有叶子在同一层，沿第一个子节点下降即可。
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            depth += 1;
            current = match &node.kind {
                NodeKind::Index { children } => children.first(),
                NodeKind::Leaf { .. } => None,
            };
        }
        depth
    }

    /// 收集树的结构统计信息
    ///
    /// 纯观测性的全遍历，不做任何剪枝；对同一棵树重复调用结果相同。
    pub fn stats(&self) -> RTreeStats {
        let mut stats = RTreeStats::default();
        if let Some(root) = self.root.as_deref() {
            collect_stats(root, 1, &mut stats);
        }
        stats
    }

    /// 内部方法：获取根节点的引用
    pub(crate) fn root_ref(&self) -> Option<&Node> {
        self.root.as_deref()
    }
}

/// 递归收集统计信息（depth从1起算）
fn collect_stats(node: &Node, depth: usize, stats: &mut RTreeStats) {
    stats.total_nodes += 1;
    if depth > stats.max_depth {
        stats.max_depth = depth;
    }

    match &node.kind {
        NodeKind::Leaf { .. } => stats.leaf_nodes += 1,
        NodeKind::Index { children } => {
            stats.index_nodes += 1;
            for child in children {
                collect_stats(child, depth + 1, stats);
            }
        }
    }
}

/// 统计子树中的矩形数量
fn count_rects(node: &Node) -> usize {
    match &node.kind {
        NodeKind::Leaf { rects } => rects.len(),
        NodeKind::Index { children } => children.iter().map(count_rects).sum(),
    }
}
