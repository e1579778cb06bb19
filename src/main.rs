// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # API 前端本地调用入口
//!
//! 托管运行时之外的最小调用壳：
//! - 从标准输入逐行读取 API Gateway 代理事件（每行一个 JSON）
//! - 每个事件在阻塞线程池上交给同一个 `Front` 处理
//! - 响应以单行 JSON 写到标准输出
//!
//! 日志写到标准错误，标准输出只承载响应。

use apifront::{exception::Exception, Config, Front, FrontConfig, Status};

use log::{debug, error, info, warn, LevelFilter};
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    runtime::Builder,
};

use std::{env, process, sync::Arc};

const CONFIG_FILE: &str = "config/development.toml";

/// # 程序入口点
///
/// 加载配置、初始化日志、构建唯一的 `Front` 实例并启动事件循环。
fn main() {
    // 1. 环境配置加载：日志系统尚未就绪，错误稍后再记录
    let (config, config_error) = match Config::from_toml(CONFIG_FILE) {
        Ok(config) => (config, None),
        Err(e) => (Config::new(), Some(e)),
    };

    // 2. 初始化日志系统：优先使用 YAML 配置，失败时退回标准错误输出
    if let Err(e) = init_logger(config.log_config()) {
        eprintln!("{}", e);
    }
    match config_error {
        Some(e) => error!("无法成功从配置文件构建配置对象，使用默认配置：{}", e),
        None => info!("配置文件已载入"),
    }

    // 3. 启动信息：由部署流水线通过环境变量注入
    let status = Status::from_env();
    info!("Starting {} API", status.release);
    info!(
        "Commit {} Timestamp {}",
        status.commit,
        env::var("TIMESTAMP").unwrap_or_default()
    );

    // 4. 异步运行时定制：工作线程数来自配置文件
    let runtime = match Builder::new_multi_thread()
        .worker_threads(config.worker_threads())
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("无法创建Tokio运行时：{}", e);
            process::exit(1);
        }
    };

    // 5. 只读共享状态：整个进程只有一个 Front
    let front = Arc::new(Front::with_config(FrontConfig::from_config(&config, status)));

    runtime.block_on(serve(front));
}

fn init_logger(path: &str) -> Result<(), Exception> {
    if log4rs::init_file(path, Default::default()).is_ok() {
        return Ok(());
    }

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d} {h({l})} {t} - {m}{n}")))
        .build();
    let config = log4rs::config::Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Info))
        .map_err(|e| Exception::LoggerInitFailed(e.to_string()))?;
    log4rs::init_config(config).map_err(|e| Exception::LoggerInitFailed(e.to_string()))?;
    warn!("无法从{}载入日志配置，使用默认的标准错误输出", path);
    Ok(())
}

/// # 事件循环
///
/// 逐行读取调用事件，直到标准输入关闭。
async fn serve(front: Arc<Front>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut id: u128 = 0;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("标准输入已关闭，正在退出...");
                break;
            }
            Err(e) => {
                error!("读取调用事件时遇到错误: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        debug!("[ID{}]收到调用事件，长度: {}", id, line.len());

        // handler 是同步阻塞的，不能占用异步工作线程
        let front_clone = Arc::clone(&front);
        let response = match tokio::task::spawn_blocking(move || front_clone.invoke(&line)).await {
            Ok(response) => response,
            Err(e) => {
                error!("[ID{}]调用任务异常结束: {}", id, e);
                id += 1;
                continue;
            }
        };

        let mut out = match serde_json::to_string(&response) {
            Ok(out) => out,
            Err(e) => {
                error!("[ID{}]无法序列化响应: {}", id, e);
                id += 1;
                continue;
            }
        };
        out.push('\n');
        if let Err(e) = stdout.write_all(out.as_bytes()).await {
            error!("[ID{}]写出响应失败: {}", id, e);
            break;
        }
        if let Err(e) = stdout.flush().await {
            error!("[ID{}]刷新标准输出失败: {}", id, e);
            break;
        }
        debug!("[ID{}]响应已写出，状态码: {}", id, response.status_code());
        id += 1;
    }
}
