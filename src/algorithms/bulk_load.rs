//! STR（Sort-Tile-Recurse）批量装载
//!
//! 自底向上一次性构建整棵树：叶子层先对全量矩形按中心x排序、
//! 切成近似正方形的竖条、条内按中心y排序后打包成叶子；上层对
//! 节点序列以MBR中心递归套用同样的两阶段铺砖，直到只剩一个根。
//! 总代价是每层排序的O(N log N)，无需逐条插入，也不存在再平衡。

use crate::node::Node;
use crate::rectangle::Rectangle;
use crate::rtree::{DEFAULT_BUNDLE_FACTOR, DEFAULT_FANOUT, RTree};
use tracing::info;

/// STR切片数：ceil(sqrt(n / cap))，至少为1
fn slice_count(n: usize, cap: usize) -> usize {
    let s = (n as f64 / cap as f64).sqrt().ceil() as usize;
    s.max(1)
}

/// 索引节点排序键：MBR中心x（用i64和值代替中点，排序等价且无溢出）
fn node_center_x(node: &Node) -> i64 {
    node.mbr.min[0] as i64 + node.mbr.max[0] as i64
}

/// 索引节点排序键：MBR中心y
fn node_center_y(node: &Node) -> i64 {
    node.mbr.min[1] as i64 + node.mbr.max[1] as i64
}

impl RTree {
    /// 使用默认参数批量装载
    ///
    /// 等价于`bulk_load_with(rects, DEFAULT_BUNDLE_FACTOR, DEFAULT_FANOUT)`。
    pub fn bulk_load(rects: &mut [Rectangle]) -> Self {
        Self::bulk_load_with(rects, DEFAULT_BUNDLE_FACTOR, DEFAULT_FANOUT)
    }

    /// STR批量装载（完全递归变体）
    ///
    /// 装载过程会通过排序原地重排调用者的矩形切片；叶子持有各自
    /// 片段的拷贝，不保留对输入切片的引用。空切片得到无根的空树，
    /// 这不是错误，由调用者决定是否视为失败。
    ///
    /// # 参数
    /// * `rects` - 待索引的矩形序列（会被原地重排）
    /// * `bundle_factor` - 叶子容量，必须 >= 1
    /// * `fanout` - 索引节点扇出，必须 >= 2
    pub fn bulk_load_with(rects: &mut [Rectangle], bundle_factor: usize, fanout: usize) -> Self {
        assert!(bundle_factor >= 1, "Bundle factor must be at least 1");
        assert!(fanout >= 2, "Fanout must be at least 2");

        if rects.is_empty() {
            return RTree::from_root(None, bundle_factor, fanout);
        }

        let leaves = build_leaf_level(rects, bundle_factor);
        let leaf_count = leaves.len();
        let root = group_nodes(leaves, fanout);

        info!("Bulk loaded {} rects into {} leaves", rects.len(), leaf_count);
        RTree::from_root(root, bundle_factor, fanout)
    }
}

/// 叶子层STR铺砖
///
/// 全量按中心x排序，切成S = ceil(sqrt(total/bundle_factor))个连续条，
/// 条内按中心y排序，再按bundle_factor打包成叶子（每条最后一个叶子
/// 可能不满）。x切片聚拢相近的x区间、条内y排序聚拢相近的y区间，
/// 无需预知数据全域范围即可近似网格铺砖。
fn build_leaf_level(rects: &mut [Rectangle], bundle_factor: usize) -> Vec<Node> {
    let total = rects.len();
    rects.sort_unstable_by_key(Rectangle::center_x);

    let slices = slice_count(total, bundle_factor);
    let slice_size = total.div_ceil(slices);

    let mut leaves = Vec::with_capacity(total.div_ceil(bundle_factor));
    for slice in rects.chunks_mut(slice_size) {
        slice.sort_unstable_by_key(Rectangle::center_y);
        for pack in slice.chunks(bundle_factor) {
            leaves.push(Node::leaf(pack));
        }
    }
    leaves
}

/// 对一层节点递归套用STR分组，直到只剩一个节点
///
/// n=0不产生任何节点；n=1时该节点本身就是结果（不做多余包装）；
/// n<=cap时构建唯一父节点收下全部子节点；否则按MBR中心x排序、
/// 切片、片内按MBR中心y排序、按cap打包父节点，再对父节点序列递归。
fn group_nodes(mut nodes: Vec<Node>, cap: usize) -> Option<Node> {
    let n = nodes.len();
    if n == 0 {
        return None;
    }
    if n == 1 {
        return nodes.pop();
    }
    if n <= cap {
        return Some(Node::index(nodes));
    }

    nodes.sort_unstable_by_key(node_center_x);

    let slices = slice_count(n, cap);
    let slice_size = n.div_ceil(slices);

    // 片内y排序先在原序列上就地完成
    let mut start = 0;
    while start < n {
        let end = (start + slice_size).min(n);
        nodes[start..end].sort_unstable_by_key(node_center_y);
        start = end;
    }

    // 逐条打包父节点；打包不跨条边界（每条最后一个父节点可能不满）
    let mut parents = Vec::with_capacity(n.div_ceil(cap));
    let mut iter = nodes.into_iter();
    let mut slice_start = 0;
    while slice_start < n {
        let slice_end = (slice_start + slice_size).min(n);
        let mut pos = slice_start;
        while pos < slice_end {
            let take = cap.min(slice_end - pos);
            let children: Vec<Node> = iter.by_ref().take(take).collect();
            parents.push(Node::index(children));
            pos += take;
        }
        slice_start = slice_end;
    }

    group_nodes(parents, cap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_rects(count: usize, seed: u64) -> Vec<Rectangle> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                let x = rng.gen_range(-10_000..10_000);
                let y = rng.gen_range(-10_000..10_000);
                Rectangle::new(x, y, x + rng.gen_range(0..100), y + rng.gen_range(0..100))
            })
            .collect()
    }

    /// 递归校验容量与MBR不变量，返回子树中所有叶子矩形的并集
    ///
    /// 根节点允许不满（数据集很小时），容量上限对所有节点一致。
    fn check_invariants(node: &Node, bundle_factor: usize, fanout: usize) -> Rectangle {
        let mut union = Rectangle::EMPTY;
        match &node.kind {
            NodeKind::Leaf { rects } => {
                assert!(!rects.is_empty());
                assert!(rects.len() <= bundle_factor);
                for rect in rects {
                    union.expand(rect);
                }
            }
            NodeKind::Index { children } => {
                assert!(!children.is_empty());
                assert!(children.len() <= fanout);
                for child in children {
                    union.expand(&check_invariants(child, bundle_factor, fanout));
                }
            }
        }
        // 节点MBR恒等于载荷的并集
        assert_eq!(node.mbr, union);
        union
    }

    #[test]
    fn test_empty_input_yields_empty_tree() {
        let mut rects: Vec<Rectangle> = Vec::new();
        let tree = RTree::bulk_load(&mut rects);
        assert!(tree.is_empty());
        assert_eq!(tree.search(&Rectangle::new(0, 0, 100, 100)), 0);
    }

    #[test]
    fn test_single_rect() {
        let mut rects = vec![Rectangle::new(2, 3, 4, 5)];
        let tree = RTree::bulk_load(&mut rects);

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root_mbr(), Some(&Rectangle::new(2, 3, 4, 5)));
    }

    #[test]
    fn test_concrete_scenario() {
        // 三个矩形，叶子容量2、扇出2
        let mut rects = vec![
            Rectangle::new(0, 0, 1, 1),
            Rectangle::new(5, 5, 6, 6),
            Rectangle::new(10, 10, 11, 11),
        ];
        let tree = RTree::bulk_load_with(&mut rects, 2, 2);

        assert_eq!(tree.search(&Rectangle::new(0, 0, 2, 2)), 1);
        assert_eq!(tree.search(&Rectangle::new(-1, -1, 20, 20)), 3);
        assert_eq!(tree.search(&Rectangle::new(2, 2, 4, 4)), 0);
    }

    #[test]
    fn test_invariants_small_factors() {
        let mut rects = random_rects(1000, 11);
        let tree = RTree::bulk_load_with(&mut rects, 4, 4);

        let root = tree.root_ref().unwrap();
        let union = check_invariants(root, 4, 4);
        assert_eq!(&union, tree.root_mbr().unwrap());
        assert_eq!(tree.len(), 1000);
    }

    #[test]
    fn test_invariants_default_factors() {
        let mut rects = random_rects(5000, 23);
        let tree = RTree::bulk_load(&mut rects);

        let root = tree.root_ref().unwrap();
        check_invariants(root, DEFAULT_BUNDLE_FACTOR, DEFAULT_FANOUT);
        assert_eq!(tree.len(), 5000);
    }

    #[test]
    fn test_input_reordered_in_place_keeps_multiset() {
        // 装载只重排输入，不丢不增
        let original = random_rects(300, 5);
        let mut rects = original.clone();
        let _tree = RTree::bulk_load_with(&mut rects, 8, 8);

        let key = |r: &Rectangle| (r.min, r.max);
        let mut a = original;
        let mut b = rects;
        a.sort_unstable_by_key(key);
        b.sort_unstable_by_key(key);
        assert_eq!(a, b);
    }

    #[test]
    fn test_leaf_tiling_counts() {
        // 64个矩形、叶子容量8：目标8个叶子 → 3个x条（22/22/20），
        // 每条打包出3个叶子，共9个
        let mut rects = random_rects(64, 3);
        let tree = RTree::bulk_load_with(&mut rects, 8, 4);

        let stats = tree.stats();
        assert_eq!(stats.leaf_nodes, 9);
        check_invariants(tree.root_ref().unwrap(), 8, 4);
    }

    #[test]
    fn test_two_level_tree() {
        // 4个矩形、叶子容量2：2个叶子 + 1个根，共2层
        let mut rects = random_rects(4, 17);
        let tree = RTree::bulk_load_with(&mut rects, 2, 2);

        let stats = tree.stats();
        assert_eq!(stats.leaf_nodes, 2);
        assert_eq!(stats.index_nodes, 1);
        assert_eq!(tree.depth(), 2);
        assert_eq!(stats.max_depth, 2);
    }

    #[test]
    fn test_single_leaf_is_root() {
        // 全部矩形装进一个叶子时，该叶子本身就是根，不做多余包装
        let mut rects = random_rects(5, 29);
        let tree = RTree::bulk_load_with(&mut rects, 8, 4);

        let stats = tree.stats();
        assert_eq!(stats.total_nodes, 1);
        assert_eq!(stats.leaf_nodes, 1);
        assert_eq!(stats.index_nodes, 0);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    #[should_panic(expected = "Fanout must be at least 2")]
    fn test_rejects_degenerate_fanout() {
        let mut rects = vec![Rectangle::new(0, 0, 1, 1)];
        let _ = RTree::bulk_load_with(&mut rects, 4, 1);
    }
}
