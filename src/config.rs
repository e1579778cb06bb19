use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::exception::Exception;
use crate::param::{DEFAULT_CACHE_MAX_AGE, DEFAULT_NOT_FOUND_CODE};

use log::{error, warn};
use std::fs::File;
use std::io::prelude::*;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_cache_max_age")]
    cache_max_age: u32,
    #[serde(default = "default_not_found_code")]
    not_found_code: u16,
    #[serde(default)]
    worker_threads: usize,
    #[serde(default = "default_log_config")]
    log_config: String,
}

fn default_cache_max_age() -> u32 {
    DEFAULT_CACHE_MAX_AGE
}

fn default_not_found_code() -> u16 {
    DEFAULT_NOT_FOUND_CODE
}

fn default_log_config() -> String {
    "config/log4rs.yaml".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            cache_max_age: default_cache_max_age(),
            not_found_code: default_not_found_code(),
            worker_threads: num_cpus::get(),
            log_config: default_log_config(),
        }
    }

    /// 从 TOML 文件读取配置，并修正不合理的取值。
    pub fn from_toml(filename: &str) -> Result<Self, Exception> {
        let mut file = File::open(filename)
            .map_err(|e| Exception::ConfigUnreadable(format!("{}: {}", filename, e)))?;
        let mut str_val = String::new();
        file.read_to_string(&mut str_val)
            .map_err(|e| Exception::ConfigUnreadable(format!("{}: {}", filename, e)))?;

        let mut raw_config: Config =
            toml::from_str(&str_val).map_err(|e| Exception::ConfigMalformed(e.to_string()))?;
        if raw_config.worker_threads == 0 {
            raw_config.worker_threads = num_cpus::get();
        }
        if !(100..=599).contains(&raw_config.not_found_code) {
            warn!(
                "not_found_code被设置为{}，这不是合法的HTTP状态码，因此该值将被改为{}。",
                raw_config.not_found_code, DEFAULT_NOT_FOUND_CODE
            );
            raw_config.not_found_code = DEFAULT_NOT_FOUND_CODE;
        }
        Ok(raw_config)
    }

    /// 同 `from_toml`，但任何错误都退回默认配置。
    pub fn load(filename: &str) -> Self {
        match Self::from_toml(filename) {
            Ok(config) => config,
            Err(e) => {
                error!("无法成功从配置文件构建配置对象，使用默认配置：{}", e);
                Config::new()
            }
        }
    }
}

impl Config {
    pub fn cache_max_age(&self) -> u32 {
        self.cache_max_age
    }

    pub fn not_found_code(&self) -> u16 {
        self.not_found_code
    }

    pub fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    pub fn log_config(&self) -> &str {
        &self.log_config
    }
}
