//! 响应负载的数据结构。前端本身不解读这些字段，只负责序列化。

use chrono::prelude::*;
use serde_derive::{Deserialize, Serialize};

use std::env;

/// 启动时采集的构建与部署信息，由 `/status` 路由原样返回。
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub platform: String,
    pub commit: String,
    pub branch: String,
    pub release: String,
    pub timestamp: String,
}

impl Status {
    /// 从部署流水线注入的环境变量构建，`timestamp` 取启动时刻。
    pub fn from_env() -> Self {
        let var = |name: &str| env::var(name).unwrap_or_default();
        Self {
            platform: var("PLATFORM"),
            commit: var("COMMIT"),
            branch: var("BRANCH"),
            release: var("RELEASE"),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true),
        }
    }
}

/// 计算器的结果。`result` 已按请求的区域设置格式化。
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CalculationResult {
    pub locale: String,
    pub op: String,
    pub val1: f64,
    pub val2: f64,
    pub result: String,
}
