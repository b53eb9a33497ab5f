use serde::{Deserialize, Serialize};

/// strtree 运行配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrtreeConfig {
    /// 索引构建配置
    pub index: IndexConfig,

    /// 查询执行配置
    pub query: QueryConfig,

    /// 日志配置
    pub logging: LoggingConfig,
}

/// 索引构建配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// 叶子容量（每个叶子的最大矩形数）
    #[serde(default = "default_bundle_factor")]
    pub bundle_factor: usize,

    /// 索引节点扇出（每个索引节点的最大子节点数）
    #[serde(default = "default_fanout")]
    pub fanout: usize,
}

/// 查询执行配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// 工作线程数（0 = 自动，使用可用逻辑处理器数）
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// 动态分块大小
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// 查询前是否按Z-order重排查询序列
    #[serde(default = "default_zorder")]
    pub zorder: bool,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别：trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ============================================================================
// 默认值函数
// ============================================================================

fn default_bundle_factor() -> usize {
    crate::rtree::DEFAULT_BUNDLE_FACTOR
}

fn default_fanout() -> usize {
    crate::rtree::DEFAULT_FANOUT
}

fn default_threads() -> usize {
    0
}

fn default_chunk_size() -> usize {
    crate::algorithms::parallel::DEFAULT_CHUNK_SIZE
}

fn default_zorder() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

// ============================================================================
// 实现
// ============================================================================

impl Default for StrtreeConfig {
    fn default() -> Self {
        Self {
            index: IndexConfig {
                bundle_factor: default_bundle_factor(),
                fanout: default_fanout(),
            },
            query: QueryConfig {
                threads: default_threads(),
                chunk_size: default_chunk_size(),
                zorder: default_zorder(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
            },
        }
    }
}

impl StrtreeConfig {
    /// 从文件加载配置
    ///
    /// 配置加载顺序（优先级从低到高）：
    /// 1. 默认配置（内嵌的 default.toml）
    /// 2. 用户配置文件（可选）
    /// 3. 环境变量（STRTREE__ 前缀，使用双下划线分隔嵌套）
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use strtree::config::StrtreeConfig;
    ///
    /// // 加载配置（如果文件不存在，使用默认配置）
    /// let config = StrtreeConfig::from_file("strtree.toml").unwrap();
    /// ```
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let settings = config::Config::builder()
            // 1. 加载默认配置（内嵌）
            .add_source(config::File::from_str(
                include_str!("default.toml"),
                config::FileFormat::Toml,
            ))
            // 2. 加载用户配置（可选，不存在不报错）
            .add_source(config::File::with_name(path).required(false))
            // 3. 加载环境变量（STRTREE__ 前缀，双下划线分隔嵌套）
            .add_source(config::Environment::with_prefix("STRTREE").separator("__"))
            .build()
            .map_err(|e| format!("Failed to load config: {}", e))?;

        Ok(settings
            .try_deserialize()
            .map_err(|e| format!("Failed to parse config: {}", e))?)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &str) -> crate::Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        std::fs::write(path, toml_string)
            .map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }

    /// 验证配置
    ///
    /// 检查配置的合法性，包括：
    /// - 叶子容量与扇出
    /// - 分块大小
    /// - 日志级别
    pub fn validate(&self) -> Result<(), String> {
        if self.index.bundle_factor < 1 {
            return Err("Bundle factor must be at least 1".to_string());
        }

        if self.index.fanout < 2 {
            return Err(format!(
                "Fanout {} is too small (must be at least 2)",
                self.index.fanout
            ));
        }

        if self.query.chunk_size < 1 {
            return Err("Chunk size must be at least 1".to_string());
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(format!(
                    "Invalid log level: '{}'. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ));
            }
        }

        Ok(())
    }

    /// 打印配置摘要
    pub fn print_summary(&self) {
        println!("📋 strtree Configuration:");
        println!("   Bundle Factor: {}", self.index.bundle_factor);
        println!("   Fanout:        {}", self.index.fanout);
        println!(
            "   Threads:       {}",
            if self.query.threads == 0 {
                "auto".to_string()
            } else {
                self.query.threads.to_string()
            }
        );
        println!("   Chunk Size:    {}", self.query.chunk_size);
        println!(
            "   Z-order:       {}",
            if self.query.zorder { "enabled" } else { "disabled" }
        );
        println!("   Log Level:     {}", self.logging.level);
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StrtreeConfig::default();
        assert_eq!(config.index.bundle_factor, 1024);
        assert_eq!(config.index.fanout, 128);
        assert_eq!(config.query.threads, 0);
        assert_eq!(config.query.chunk_size, 10_000);
        assert!(config.query.zorder);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_validation() {
        let mut config = StrtreeConfig::default();

        // 有效配置
        assert!(config.validate().is_ok());

        // 无效扇出
        config.index.fanout = 1;
        assert!(config.validate().is_err());
        config.index.fanout = 128;

        // 无效分块大小
        config.query.chunk_size = 0;
        assert!(config.validate().is_err());
        config.query.chunk_size = 10_000;

        // 无效日志级别
        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strtree.toml");
        let path = path.to_str().unwrap();

        let mut config = StrtreeConfig::default();
        config.index.fanout = 64;
        config.query.chunk_size = 500;

        // 保存
        config.save_to_file(path).unwrap();

        // 加载
        let loaded = StrtreeConfig::from_file(path).unwrap();
        assert_eq!(loaded.index.fanout, 64);
        assert_eq!(loaded.query.chunk_size, 500);
    }
}
