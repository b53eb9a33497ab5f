//! 数据集加载与生成
//!
//! 核心索引只消费内存中的矩形序列；这里提供周边的两种来源：
//! 从分隔文本文件读取真实数据集，或用固定种子生成均匀分布的
//! 合成数据集（可复现）。

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::info;

use crate::rectangle::Rectangle;

/// 数据集读取错误
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed rectangle at line {line}: '{content}'")]
    Parse { line: usize, content: String },
}

/// 从分隔文本文件读取矩形序列
///
/// 每行一个矩形：四个以逗号分隔的整数，表示两个角点。角点顺序
/// 无关，读入时逐坐标归一化为min/max。空行跳过。
///
/// # 错误
/// 文件无法打开或读取时返回`DatasetError::Io`；
/// 某行无法解析为四个整数时返回`DatasetError::Parse`（带行号）。
pub fn read_rects_from_file(path: impl AsRef<Path>) -> Result<Vec<Rectangle>, DatasetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let reader = BufReader::new(file);

    let mut rects = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| DatasetError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let rect = parse_line(&line).ok_or_else(|| DatasetError::Parse {
            line: idx + 1,
            content: line.clone(),
        })?;
        rects.push(rect);
    }

    info!("Read {} rects from {}", rects.len(), path.display());
    Ok(rects)
}

/// 解析一行"x1,y1,x2,y2"；字段数不对或数字非法返回None
fn parse_line(line: &str) -> Option<Rectangle> {
    let mut parts = line.split(',');
    let x1: i32 = parts.next()?.trim().parse().ok()?;
    let y1: i32 = parts.next()?.trim().parse().ok()?;
    let x2: i32 = parts.next()?.trim().parse().ok()?;
    let y2: i32 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Rectangle::from_corners((x1, y1), (x2, y2)))
}

/// 生成均匀分布的合成矩形数据集
///
/// 固定种子下结果可复现。左下角在`[0, extent)`内均匀分布，
/// 边长在`[1, max_side]`内均匀分布。
///
/// # 参数
/// * `count` - 矩形数量
/// * `extent` - 坐标范围上界，必须 > 0
/// * `max_side` - 最大边长，必须 > 0
/// * `seed` - 随机数种子
pub fn generate_uniform(count: usize, extent: i32, max_side: i32, seed: u64) -> Vec<Rectangle> {
    assert!(extent > 0, "Extent must be positive");
    assert!(max_side > 0, "Max side must be positive");

    let mut rng = StdRng::seed_from_u64(seed);
    let mut rects = Vec::with_capacity(count);
    for _ in 0..count {
        let x = rng.gen_range(0..extent);
        let y = rng.gen_range(0..extent);
        let w = rng.gen_range(1..=max_side);
        let h = rng.gen_range(1..=max_side);
        rects.push(Rectangle::new(
            x,
            y,
            x.saturating_add(w),
            y.saturating_add(h),
        ));
    }
    rects
}
