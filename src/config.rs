use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub roulette: RouletteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouletteConfig {
    /// 目录变更后概率总和不足/超出 100% 时是否自动等比归一化
    /// (false = 直接拒绝该次变更)
    #[serde(default)]
    pub auto_normalize: bool,
    /// 后台任务打印待审核队列状态的间隔（秒）
    #[serde(default = "default_queue_report_interval")]
    pub queue_report_interval_secs: u64,
}

fn default_queue_report_interval() -> u64 {
    600
}

impl Default for RouletteConfig {
    fn default() -> Self {
        Self {
            auto_normalize: false,
            queue_report_interval_secs: default_queue_report_interval(),
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量与默认值
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("解析配置文件失败: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Config {
                server: ServerConfig {
                    host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                    port: env::var("SERVER_PORT")
                        .ok()
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(8080u16),
                },
                roulette: RouletteConfig::default(),
            },
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("ROULETTE_AUTO_NORMALIZE")
            && let Ok(b) = v.parse()
        {
            config.roulette.auto_normalize = b;
        }
        if let Ok(v) = env::var("ROULETTE_QUEUE_REPORT_INTERVAL_SECS")
            && let Ok(n) = v.parse()
        {
            config.roulette.queue_report_interval_secs = n;
        }

        Ok(config)
    }
}
