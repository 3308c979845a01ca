use anyhow::Result;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::time::Duration;

static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub log: LogConfig,
    pub cors: CorsConfig,
    pub game: GameConfig,
    pub word_bank: WordBankConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 前端静态文件目录
    pub static_dir: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allow_all_origins: Option<bool>,
    pub allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub max_attempts: u32,
    /// 为 true 时服务端拒绝超过 max_attempts 的猜测
    pub enforce_attempt_limit: bool,
    /// 抽取不重复单词的最大抽取次数
    pub selection_budget: usize,
    /// 词池少于该数量时拒绝开局
    pub min_pool_size: usize,
    /// 会话闲置多久后被清理，0 表示永不清理
    pub session_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WordBankConfig {
    pub file_path: String,
    /// 每日词池大小
    pub target_pool_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: "public".to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_all_origins: Some(true),
            allowed_origins: None,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_attempts: 9,
            enforce_attempt_limit: false,
            selection_budget: 200,
            min_pool_size: 5,
            session_ttl_secs: 0,
            sweep_interval_secs: 300,
        }
    }
}

impl Default for WordBankConfig {
    fn default() -> Self {
        Self {
            file_path: "words.json".to_string(),
            target_pool_size: 200,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("TERMO").separator("__"))
            .build()?;

        Ok(config.try_deserialize::<Config>()?)
    }

    /// 从 TOML 文本加载，缺省项使用默认值
    pub fn from_toml(content: &str) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize::<Config>()?)
    }

    /// 初始化全局配置
    pub fn init() -> crate::Result<()> {
        let config = Self::load().map_err(|e| crate::Error::Config(e.to_string()))?;
        CONFIG
            .set(config)
            .map_err(|_| crate::Error::Config("配置已经初始化".to_string()))?;
        Ok(())
    }

    /// 获取全局配置实例
    pub fn get() -> &'static Config {
        CONFIG.get().expect("配置未初始化，请先调用 Config::init()")
    }

    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn log_filter(&self) -> String {
        format!(
            "termo_server={level},tower_http={level}",
            level = self.log.level
        )
    }
}

impl GameConfig {
    /// 会话闲置清理时长，未开启时为 None
    pub fn session_ttl(&self) -> Option<Duration> {
        (self.session_ttl_secs > 0).then(|| Duration::from_secs(self.session_ttl_secs))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}
