use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use colored::Colorize;
use strtree::dataset;
use strtree::report::{RunReport, unix_timestamp};
use strtree::zorder;
use strtree::{ParallelOptions, RTree, Result, StrtreeConfig};
use tracing::{Level, error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = "strtree.toml")]
    config: String,

    /// 生成默认配置文件并退出
    #[arg(long)]
    generate_config: bool,

    /// 数据集文件（每行四个逗号分隔的整数；省略时生成合成数据）
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// 查询集文件（省略时生成合成查询）
    #[arg(short, long)]
    queries: Option<PathBuf>,

    /// 合成数据集大小
    #[arg(long, default_value_t = 1_000_000)]
    num_rects: usize,

    /// 合成查询集大小
    #[arg(long, default_value_t = 100_000)]
    num_queries: usize,

    /// 工作线程数（覆盖配置文件；0 = 自动）
    #[arg(short, long)]
    threads: Option<usize>,

    /// 动态分块大小（覆盖配置文件）
    #[arg(long)]
    chunk_size: Option<usize>,

    /// 计时日志目录
    #[arg(long, default_value = "log")]
    log_dir: PathBuf,

    /// 日志级别（覆盖配置文件）
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 生成默认配置文件
    if args.generate_config {
        let config = StrtreeConfig::default();
        config.save_to_file(&args.config)?;
        println!("✅ Generated default configuration: {}", args.config);
        return Ok(());
    }

    // 加载配置，命令行参数覆盖配置文件
    let mut config = StrtreeConfig::from_file(&args.config)?;
    if let Some(threads) = args.threads {
        config.query.threads = threads;
    }
    if let Some(chunk_size) = args.chunk_size {
        config.query.chunk_size = chunk_size;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    config.validate()?;

    // 初始化日志系统
    let level: Level = config.logging.level.parse()?;
    tracing_subscriber::fmt().with_max_level(level).init();
    config.print_summary();

    // 加载或生成数据集
    let mut rects = match &args.data {
        Some(path) => dataset::read_rects_from_file(path)?,
        None => dataset::generate_uniform(args.num_rects, 1_000_000, 100, 42),
    };
    println!("Read {} rects successfully.", rects.len());

    // R-tree构建（顺序）
    let build_start = Instant::now();
    let tree = RTree::bulk_load_with(&mut rects, config.index.bundle_factor, config.index.fanout);
    let build_secs = build_start.elapsed().as_secs_f64();
    println!("\nR-tree construction time = {:.2} s", build_secs);

    println!("\n=== R-Tree Stats ===");
    println!("{}", tree.stats());
    println!("====================\n");

    // 加载或生成查询集
    let mut query_rects = match &args.queries {
        Some(path) => dataset::read_rects_from_file(path)?,
        None => dataset::generate_uniform(args.num_queries, 1_000_000, 1_000, 7),
    };
    println!("Read {} query rects.", query_rects.len());

    // 按Z-order重排查询序列，提升搜索阶段的空间/缓存局部性
    if config.query.zorder {
        zorder::zorder_sort(&mut query_rects);
        info!("Z-sorted {} query rects", query_rects.len());
    }

    // === 顺序查询 ===
    let seq_start = Instant::now();
    let seq_results = tree.search_batch(&query_rects);
    let seq_secs = seq_start.elapsed().as_secs_f64();
    let seq_overlaps: u64 = seq_results.iter().map(|&c| c as u64).sum();
    println!(
        "\n[Sequential] Overlaps = {}, Time = {:.2} s",
        seq_overlaps, seq_secs
    );

    // === 并行查询（每批次线程池 + 动态分块）===
    let options = ParallelOptions {
        threads: config.query.threads,
        chunk_size: config.query.chunk_size,
    };
    let num_threads = options.resolved_threads();

    let par_start = Instant::now();
    let par_results = tree.search_batch_parallel(&query_rects, &options);
    let par_secs = par_start.elapsed().as_secs_f64();
    let par_overlaps: u64 = par_results.iter().map(|&c| c as u64).sum();
    println!(
        "[Parallel]   Overlaps = {}, Time = {:.2} s (Threads: {})",
        par_overlaps, par_secs, num_threads
    );

    let report = RunReport {
        timestamp_secs: unix_timestamp(),
        num_rects: rects.len(),
        num_queries: query_rects.len(),
        num_threads,
        chunk_size: config.query.chunk_size,
        build_secs,
        seq_secs,
        par_secs,
        seq_overlaps,
        par_overlaps,
    };
    println!("⚡ Speedup = {:.2}x", report.speedup());

    // 顺序与并行结果校验
    if report.results_match() {
        println!(
            "{}",
            "✅ Results match between sequential and parallel runs.".green()
        );
    } else {
        error!("Mismatch between sequential and parallel results!");
        println!(
            "{}",
            "❌ Mismatch between sequential and parallel results!".red()
        );
    }

    // === 追加计时日志 ===
    report.append_to_log(&args.log_dir)?;
    println!(
        "📁 Timing log saved to: {}",
        args.log_dir.join("timing.jsonl").display()
    );

    Ok(())
}
