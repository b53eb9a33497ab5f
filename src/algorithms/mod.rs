// R-tree算法模块
//
// 这个模块包含R-tree的核心算法实现，按功能分解为不同的子模块：
// - bulk_load: STR批量装载（排序-切片-递归，自底向上一次构建）
// - search: 窗口查询（递归与显式栈迭代两种形式，MBR剪枝）
// - parallel: 并行查询分发器（每批次线程池，原子游标动态分块）

pub mod bulk_load;
pub mod parallel;
pub mod search;
