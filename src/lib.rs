//! # strtree：批量装载的STR R-tree空间索引
//!
//! 对静态矩形数据集一次性批量构建（Sort-Tile-Recurse，自底向上，
//! 无需逐条插入也没有再平衡），之后反复执行矩形相交（窗口）查询。
//! 树构建后不可变，可以在多个线程间以共享引用安全地并发查询。
//!
//! ## 主要特性
//!
//! - STR批量装载：排序-切片-递归铺砖，一次构建平衡且空间紧凑的树
//! - MBR剪枝的窗口查询（递归与显式栈迭代两种形式，结果一致）
//! - 并行查询分发器：每批次线程池 + 原子游标动态分块，无锁负载均衡
//! - 查询序列的Z-order（Morton码）重排，提升搜索阶段的缓存局部性
//!
//! ## 使用示例
//!
//! ### 构建与查询
//! ```rust
//! use strtree::{RTree, Rectangle};
//!
//! let mut rects = vec![
//!     Rectangle::new(0, 0, 10, 10),
//!     Rectangle::new(20, 20, 30, 30),
//! ];
//!
//! // 批量装载（会原地重排输入切片）
//! let tree = RTree::bulk_load(&mut rects);
//!
//! // 窗口查询：统计相交矩形数
//! assert_eq!(tree.search(&Rectangle::new(5, 5, 25, 25)), 2);
//! ```
//!
//! ### 并行批量查询
//! ```rust
//! use strtree::{ParallelOptions, RTree, Rectangle};
//!
//! let mut rects = vec![Rectangle::new(0, 0, 10, 10)];
//! let tree = RTree::bulk_load(&mut rects);
//!
//! let queries = vec![Rectangle::new(5, 5, 6, 6), Rectangle::new(50, 50, 60, 60)];
//! let results = tree.search_batch_parallel(&queries, &ParallelOptions::default());
//! assert_eq!(results, vec![1, 0]);
//! ```

pub mod algorithms;
pub mod config;
pub mod dataset;
pub mod node;
pub mod rectangle;
pub mod report;
pub mod rtree;
pub mod zorder;

use std::error::Error;

// 重新导出主要的公共接口
pub use node::{Node, NodeKind};
pub use rectangle::Rectangle;
pub use rtree::{DEFAULT_BUNDLE_FACTOR, DEFAULT_FANOUT, RTree, RTreeStats};

// 并行查询分发器
pub use algorithms::parallel::{DEFAULT_CHUNK_SIZE, ParallelOptions};

// 配置与报告
pub use config::StrtreeConfig;
pub use report::RunReport;

pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;
