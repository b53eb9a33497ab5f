//! 运行报告与计时日志
//!
//! 核心只产出普通数值（计数与秒数）；序列化格式和落盘由这里决定。
//! 计时日志是追加写入的JSON行文件，每次运行一行。

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 报告写入错误
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write timing log: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// 单次运行的汇总报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// 运行时刻（Unix时间戳，秒）
    pub timestamp_secs: u64,
    /// 数据集矩形数
    pub num_rects: usize,
    /// 查询数
    pub num_queries: usize,
    /// 并行查询使用的线程数
    pub num_threads: usize,
    /// 动态分块大小
    pub chunk_size: usize,
    /// 树构建耗时（秒）
    pub build_secs: f64,
    /// 顺序查询耗时（秒）
    pub seq_secs: f64,
    /// 并行查询耗时（秒）
    pub par_secs: f64,
    /// 顺序查询的相交计数总和
    pub seq_overlaps: u64,
    /// 并行查询的相交计数总和
    pub par_overlaps: u64,
}

impl RunReport {
    /// 并行加速比（顺序耗时 / 并行耗时）
    pub fn speedup(&self) -> f64 {
        if self.par_secs > 0.0 {
            self.seq_secs / self.par_secs
        } else {
            0.0
        }
    }

    /// 顺序与并行的相交计数总和是否一致
    pub fn results_match(&self) -> bool {
        self.seq_overlaps == self.par_overlaps
    }

    /// 导出为JSON字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 追加到日志目录下的timing.jsonl（目录不存在时创建）
    ///
    /// 每次运行追加一行JSON；文件只追加，不覆盖历史记录。
    pub fn append_to_log(&self, dir: &Path) -> Result<(), ReportError> {
        fs::create_dir_all(dir)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("timing.jsonl"))?;
        writeln!(file, "{}", serde_json::to_string(self)?)?;
        Ok(())
    }
}

/// 当前Unix时间戳（秒）
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
