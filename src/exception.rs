// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # Exception 模块
//!
//! 该模块定义了 API 前端在请求处理生命周期中使用的两类错误。
//!
//! ## 设计意图
//! - **`ApiError`**：面向客户端的应用错误，携带 HTTP 状态码与消息，最终被序列化为
//!   `{"message": ..., "code": ...}` 返回给调用方。
//! - **`Exception`**：进程内部的运行期错误（配置、日志、调用事件解析），只记录日志，不直接暴露给客户端。

use serde_derive::Serialize;

use std::{error::Error, fmt};

/// `ApiError` 在线路上的结构化表示。
///
/// 字段顺序即 JSON 输出顺序：先 `message` 后 `code`。
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorBody {
    pub message: String,
    pub code: u16,
}

/// 携带状态码的应用错误。构造后不可变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    body: ApiErrorBody,
}

/// 以 `format!` 的方式构造 `ApiError`。
///
/// ```
/// use apifront::api_error;
///
/// let err = api_error!(400, "Missing parameter {}", "val1");
/// assert_eq!(err.status_code(), 400);
/// assert_eq!(err.message(), "Missing parameter val1");
/// ```
#[macro_export]
macro_rules! api_error {
    ($code:expr, $($arg:tt)*) => {
        $crate::exception::ApiError::new($code, format!($($arg)*))
    };
}

impl ApiError {
    /// 直接构造。状态码原样保存，不做范围校验，由调用方负责。
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            body: ApiErrorBody {
                message: message.into(),
                code,
            },
        }
    }

    /// 将任意错误归一化为 `ApiError`。
    ///
    /// 如果传入的本身就是 `ApiError`，原样保留其状态码与消息；
    /// 否则生成 500 错误，消息取自该错误的 `Display` 输出。
    pub fn wrap(err: &(dyn Error + 'static)) -> Self {
        match err.downcast_ref::<ApiError>() {
            Some(api_error) => api_error.clone(),
            None => Self::new(500, err.to_string()),
        }
    }

    pub fn message(&self) -> &str {
        &self.body.message
    }

    pub fn status_code(&self) -> u16 {
        self.body.code
    }

    /// 可直接序列化的 `{message, code}` 视图
    pub fn error_body(&self) -> ApiErrorBody {
        self.body.clone()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.body.message)
    }
}

impl Error for ApiError {}

/// 进程内部的运行期异常。
///
/// 这些错误只出现在启动与事件接入阶段，不会进入 `Front::handle` 的响应体。
#[derive(Debug)]
pub enum Exception {
    /// 配置文件不存在或无法读取
    ConfigUnreadable(String),
    /// 配置文件内容无法解析为 `Config`
    ConfigMalformed(String),
    /// 日志配置初始化失败
    LoggerInitFailed(String),
    /// 调用事件不是合法的 API Gateway 代理事件 JSON
    InvalidEvent(String),
}

use Exception::*;

impl fmt::Display for Exception {
    /// 根据错误类型写入人类可读的描述文本。
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigUnreadable(reason) => write!(f, "Config file can't be read: {}", reason),
            ConfigMalformed(reason) => write!(f, "Config file is malformed: {}", reason),
            LoggerInitFailed(reason) => write!(f, "Logger initialisation failed: {}", reason),
            InvalidEvent(reason) => write!(f, "Invalid event: {}", reason),
        }
    }
}

impl Error for Exception {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_accessors() {
        let err = ApiError::new(123, "Testing testing 1 2 3");

        assert_eq!(err.message(), "Testing testing 1 2 3");
        assert_eq!(err.to_string(), "Testing testing 1 2 3");
        assert_eq!(err.status_code(), 123);
        assert_eq!(
            err.error_body(),
            ApiErrorBody {
                message: "Testing testing 1 2 3".to_string(),
                code: 123,
            }
        );
    }

    #[test]
    fn test_api_error_macro_formats() {
        let err = api_error!(123, "Testing testing {} {} {}", 1, "2", 3);

        assert_eq!(err.message(), "Testing testing 1 2 3");
        assert_eq!(err.status_code(), 123);
    }

    #[test]
    fn test_wrap_plain_error() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "I am an error");
        let err = ApiError::wrap(&inner);

        assert_eq!(err.message(), "I am an error");
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_wrap_keeps_api_error() {
        let inner = api_error!(123, "I am an {}", "API error");
        let err = ApiError::wrap(&inner);

        assert_eq!(err, inner);
        assert_eq!(err.status_code(), 123);
        assert_eq!(err.message(), "I am an API error");
    }

    #[test]
    fn test_wrap_is_idempotent() {
        let err = ApiError::wrap(&ApiError::wrap(&api_error!(418, "x")));

        assert_eq!(err.status_code(), 418);
        assert_eq!(err.message(), "x");
    }

    #[test]
    fn test_wrap_boxed_api_error() {
        let boxed: Box<dyn Error + Send + Sync> = Box::new(ApiError::new(409, "conflict"));
        let err = ApiError::wrap(boxed.as_ref());

        assert_eq!(err.status_code(), 409);
        assert_eq!(err.message(), "conflict");
    }

    #[test]
    fn test_error_body_serialization() {
        let body = ApiError::new(345, "A simulated error: error").error_body();

        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"message":"A simulated error: error","code":345}"#
        );
    }

    #[test]
    fn test_exception_display() {
        let e = Exception::InvalidEvent("expected value at line 1 column 1".to_string());
        assert_eq!(e.to_string(), "Invalid event: expected value at line 1 column 1");
    }
}
