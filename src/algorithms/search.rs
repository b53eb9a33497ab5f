//! 窗口查询
//!
//! 统计与查询矩形相交的数据矩形数量。唯一的剪枝规则是节点MBR与
//! 查询矩形的相交测试：不相交的子树整体跳过，这也是平均情形下
//! 搜索代价亚线性于数据集规模的原因。叶子内部做全量扫描，兄弟
//! 节点之间除逐个MBR测试外不做进一步过滤。

use crate::node::{Node, NodeKind};
use crate::rectangle::Rectangle;
use crate::rtree::RTree;

/// 迭代搜索的显式栈上限
///
/// 不是树深的硬限制：栈满时对应子树回退为递归下降，结果不受影响。
const SEARCH_STACK_LIMIT: usize = 256;

impl RTree {
    /// 窗口查询（递归形式）
    ///
    /// 返回与查询矩形相交的矩形数量；空树返回0。
    /// 边相触按相交计（闭区间语义）。
    ///
    /// # 示例
    /// ```rust
    /// use strtree::{RTree, Rectangle};
    ///
    /// let mut rects = vec![Rectangle::new(0, 0, 1, 1), Rectangle::new(5, 5, 6, 6)];
    /// let tree = RTree::bulk_load(&mut rects);
    /// assert_eq!(tree.search(&Rectangle::new(0, 0, 2, 2)), 1);
    /// ```
    pub fn search(&self, query: &Rectangle) -> usize {
        self.root_ref().map_or(0, |root| search_node(root, query))
    }

    /// 窗口查询（显式栈迭代形式）
    ///
    /// 与递归形式结果完全一致。栈容量有固定上限，病态的
    /// 扇出/容量配置导致栈将要溢出时，溢出的子树改用递归下降处理。
    pub fn search_iterative(&self, query: &Rectangle) -> usize {
        let Some(root) = self.root_ref() else {
            return 0;
        };

        let mut stack: Vec<&Node> = Vec::with_capacity(SEARCH_STACK_LIMIT);
        stack.push(root);

        let mut count = 0;
        while let Some(node) = stack.pop() {
            // 剪枝：MBR与查询不相交则整个子树跳过
            if !node.mbr.intersects(query) {
                continue;
            }

            match &node.kind {
                NodeKind::Leaf { rects } => {
                    // 叶子全量扫描
                    count += rects.iter().filter(|r| r.intersects(query)).count();
                }
                NodeKind::Index { children } => {
                    for child in children {
                        if stack.len() >= SEARCH_STACK_LIMIT {
                            // 栈满：该子树回退为递归下降
                            count += search_node(child, query);
                        } else {
                            stack.push(child);
                        }
                    }
                }
            }
        }
        count
    }
}

/// 递归搜索：MBR剪枝 + 叶子全扫描
fn search_node(node: &Node, query: &Rectangle) -> usize {
    if !node.mbr.intersects(query) {
        return 0;
    }

    match &node.kind {
        NodeKind::Leaf { rects } => rects.iter().filter(|r| r.intersects(query)).count(),
        NodeKind::Index { children } => children.iter().map(|c| search_node(c, query)).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_rects(count: usize, seed: u64) -> Vec<Rectangle> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                let x = rng.gen_range(-5000..5000);
                let y = rng.gen_range(-5000..5000);
                Rectangle::new(x, y, x + rng.gen_range(0..200), y + rng.gen_range(0..200))
            })
            .collect()
    }

    /// 暴力线性扫描，与树搜索使用同一个相交谓词
    fn brute_force(rects: &[Rectangle], query: &Rectangle) -> usize {
        rects.iter().filter(|r| r.intersects(query)).count()
    }

    #[test]
    fn test_empty_tree_returns_zero() {
        let mut rects: Vec<Rectangle> = Vec::new();
        let tree = RTree::bulk_load(&mut rects);
        let query = Rectangle::new(0, 0, 100, 100);

        assert_eq!(tree.search(&query), 0);
        assert_eq!(tree.search_iterative(&query), 0);
    }

    #[test]
    fn test_single_rect() {
        let mut rects = vec![Rectangle::new(10, 10, 20, 20)];
        let tree = RTree::bulk_load(&mut rects);

        assert_eq!(tree.search(&Rectangle::new(15, 15, 16, 16)), 1);
        assert_eq!(tree.search(&Rectangle::new(30, 30, 40, 40)), 0);
    }

    #[test]
    fn test_touching_edge_counts() {
        // 查询恰好触到矩形边界：闭区间语义下计数为1
        let mut rects = vec![Rectangle::new(10, 10, 20, 20)];
        let tree = RTree::bulk_load(&mut rects);

        let touching = Rectangle::new(20, 20, 30, 30);
        assert_eq!(tree.search(&touching), 1);
        assert_eq!(tree.search_iterative(&touching), 1);
    }

    #[test]
    fn test_matches_brute_force() {
        let original = random_rects(2000, 7);
        let mut rects = original.clone();
        let tree = RTree::bulk_load_with(&mut rects, 16, 8);

        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..100 {
            let x = rng.gen_range(-6000..6000);
            let y = rng.gen_range(-6000..6000);
            let query = Rectangle::new(x, y, x + rng.gen_range(0..2000), y + rng.gen_range(0..2000));

            let expected = brute_force(&original, &query);
            assert_eq!(tree.search(&query), expected);
            assert_eq!(tree.search_iterative(&query), expected);
        }
    }

    #[test]
    fn test_iterative_stack_fallback() {
        // 叶子容量1、扇出200、两万个矩形：根有100个子节点，展开任一
        // 子节点的200个叶子时栈超过上限，溢出部分走递归回退路径
        let original = random_rects(20_000, 13);
        let mut rects = original.clone();
        let tree = RTree::bulk_load_with(&mut rects, 1, 200);

        let query = Rectangle::new(-5000, -5000, 5000, 5000);
        let expected = brute_force(&original, &query);
        assert_eq!(tree.search(&query), expected);
        assert_eq!(tree.search_iterative(&query), expected);
    }

    #[test]
    fn test_query_covering_everything() {
        let original = random_rects(500, 21);
        let mut rects = original.clone();
        let tree = RTree::bulk_load_with(&mut rects, 4, 4);

        let all = Rectangle::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(tree.search(&all), 500);
        assert_eq!(tree.search_iterative(&all), 500);
    }
}
