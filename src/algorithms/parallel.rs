//! 并行查询分发器
//!
//! 每个查询批次新建一个固定大小的工作线程池，批次结束前全部join，
//! 批次之间不保留任何状态。工作分配是动态的：一个批次作用域内的
//! 原子游标从0开始，哪个线程先到就用fetch-and-add认领下一个固定
//! 大小的查询块，认领到的起点越过查询总数即退出。这样不需要静态
//! 划分也不需要锁就能获得近似的负载均衡，原子自增是唯一的同步点。
//! 树和查询数组只读共享；各线程认领的下标区间互不重叠，结果槽
//! 各自只有一个写者。批次一旦发起就运行到完成，不支持取消。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use tracing::debug;

use crate::rectangle::Rectangle;
use crate::rtree::RTree;

/// 动态分块的默认块大小
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// 并行查询分发器选项
#[derive(Debug, Clone)]
pub struct ParallelOptions {
    /// 工作线程数；0表示自动使用可用的逻辑处理器数
    pub threads: usize,
    /// 每次从共享游标认领的查询块大小
    pub chunk_size: usize,
}

impl Default for ParallelOptions {
    fn default() -> Self {
        Self {
            threads: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ParallelOptions {
    /// 解析实际使用的线程数（0 → 可用逻辑处理器数，至少1）
    pub fn resolved_threads(&self) -> usize {
        if self.threads > 0 {
            self.threads
        } else {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }
    }
}

/// 每个工作线程的参数槽
///
/// 按缓存行对齐：相邻槽位不落在同一缓存行上，避免各核心
/// 之间对线程私有状态的伪共享。
#[repr(align(64))]
struct WorkerArgs<'a> {
    thread_id: usize,
    chunk_size: usize,
    queries: &'a [Rectangle],
    results: &'a [AtomicUsize],
    cursor: &'a AtomicUsize,
    tree: &'a RTree,
}

impl WorkerArgs<'_> {
    /// 工作线程主循环
    ///
    /// 反复从共享游标认领`[start, min(start+chunk, total))`区间，
    /// 对区间内每个查询串行执行树搜索，把计数写入查询自己下标
    /// 对应的结果槽。认领区间互不重叠，写结果无需同步。
    fn run(&self) {
        let total = self.queries.len();
        let mut processed = 0usize;

        loop {
            let start = self.cursor.fetch_add(self.chunk_size, Ordering::SeqCst);
            if start >= total {
                break;
            }

            let end = (start + self.chunk_size).min(total);
            for i in start..end {
                self.results[i].store(self.tree.search(&self.queries[i]), Ordering::Relaxed);
            }
            processed += end - start;
        }

        debug!("Worker {} finished after {} queries", self.thread_id, processed);
    }
}

impl RTree {
    /// 顺序批量查询
    ///
    /// 结果与查询数组下标对齐：results[i]是queries[i]的相交计数。
    pub fn search_batch(&self, queries: &[Rectangle]) -> Vec<usize> {
        queries.iter().map(|q| self.search(q)).collect()
    }

    /// 并行批量查询（动态分块线程池）
    ///
    /// 与`search_batch`对同一批查询返回完全相同的结果向量。
    /// 线程池为本次调用创建、调用返回前全部join；游标的生命周期
    /// 同样只在本次调用内，重复调用无需任何外部重置。
    /// 工作线程的panic会在join时传播（批次要么完整结束要么中止，
    /// 没有部分结果语义）。
    ///
    /// # 参数
    /// * `queries` - 查询矩形序列
    /// * `options` - 线程数与块大小；`chunk_size`必须 >= 1
    pub fn search_batch_parallel(
        &self,
        queries: &[Rectangle],
        options: &ParallelOptions,
    ) -> Vec<usize> {
        assert!(options.chunk_size >= 1, "Chunk size must be at least 1");
        let threads = options.resolved_threads();

        let results: Vec<AtomicUsize> = (0..queries.len()).map(|_| AtomicUsize::new(0)).collect();
        let cursor = AtomicUsize::new(0);

        let args: Vec<WorkerArgs<'_>> = (0..threads)
            .map(|thread_id| WorkerArgs {
                thread_id,
                chunk_size: options.chunk_size,
                queries,
                results: &results,
                cursor: &cursor,
                tree: self,
            })
            .collect();

        thread::scope(|scope| {
            for worker in &args {
                scope.spawn(move || worker.run());
            }
        });

        // 参数槽借用着结果数组，先释放再取回计数
        drop(args);
        results.into_iter().map(AtomicUsize::into_inner).collect()
    }
}
