use crate::rectangle::Rectangle;

/// R-tree节点
///
/// 树中每个节点都持有一个MBR和对应的载荷。节点的MBR恒等于其载荷
/// （叶子矩形或子节点MBR）的并集；该不变量在构造时一次性建立，
/// 树批量装载完成后只读，不再变更。
#[derive(Debug, Clone)]
pub struct Node {
    /// 节点的最小边界矩形（载荷的并集）
    pub mbr: Rectangle,

    /// 节点载荷：叶子矩形或子节点
    pub kind: NodeKind,
}

/// 节点载荷
///
/// 用带标签的和类型明确区分两种节点形态，不存在读错载荷的可能：
/// - 叶子节点：持有用户矩形的拷贝（数量不超过叶子容量）
/// - 索引节点：持有子节点（数量不超过扇出；独占所有权，严格树形，无共享无环）
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// 叶子节点：存储真实数据矩形
    Leaf { rects: Vec<Rectangle> },
    /// 索引节点：存储子节点，用于导航
    Index { children: Vec<Node> },
}

impl Node {
    /// 从一段矩形创建叶子节点
    ///
    /// 叶子持有输入矩形的拷贝，MBR从空哨兵值出发逐个并入累积得到。
    pub fn leaf(rects: &[Rectangle]) -> Self {
        let mut mbr = Rectangle::EMPTY;
        for rect in rects {
            mbr.expand(rect);
        }
        Node {
            mbr,
            kind: NodeKind::Leaf {
                rects: rects.to_vec(),
            },
        }
    }

    /// 从一组子节点创建索引节点
    ///
    /// 父节点取得所有子节点的所有权，MBR为子节点MBR的并集。
    pub fn index(children: Vec<Node>) -> Self {
        let mut mbr = Rectangle::EMPTY;
        for child in &children {
            mbr.expand(&child.mbr);
        }
        Node {
            mbr,
            kind: NodeKind::Index { children },
        }
    }

    /// 检查是否为叶子节点
    pub fn is_leaf_node(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// 检查是否为索引节点
    pub fn is_index_node(&self) -> bool {
        matches!(self.kind, NodeKind::Index { .. })
    }

    /// 节点直接持有的条目数（叶子为矩形数，索引节点为子节点数）
    pub fn entry_count(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf { rects } => rects.len(),
            NodeKind::Index { children } => children.len(),
        }
    }
}
