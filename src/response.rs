use crate::{exception::ApiError, param::*, util::json_stringify};

use chrono::prelude::*;
use log::{debug, error};
use serde_derive::Serialize;

use std::collections::BTreeMap;

/// handler 返回的成功负载：任何能序列化为 JSON 的值。
pub trait Payload {
    fn to_json(&self) -> serde_json::Result<String>;
}

impl<T: serde::Serialize + ?Sized> Payload for T {
    fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// handler 的执行结果：成功负载或应用错误，二者只取其一。
pub type HandlerResult = Result<Box<dyn Payload>, ApiError>;

/// 每个请求只构建一次的出站响应。
///
/// 序列化后的字段名与 API Gateway 代理响应一致：`statusCode`、`headers`、`body`。
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    status_code: u16,
    headers: BTreeMap<String, String>,
    body: String,
}

impl Response {
    /// 将 handler 的执行结果转换为响应。
    ///
    /// 该函数不会失败：成功负载序列化失败时，响应被改写为固定的 500
    /// `Unmarshallable data` 响应体。
    pub fn build(outcome: HandlerResult, cache_max_age: u32) -> Self {
        let (mut body, mut status_code) = match outcome {
            Err(err) => {
                let body = json_stringify(&err.error_body());
                error!("Returning {}: {}", err.status_code(), err.message());
                (body, err.status_code())
            }
            Ok(payload) => (json_stringify(payload.as_ref()), 200),
        };

        if body.is_empty() {
            status_code = 500;
            body = UNMARSHALLABLE_BODY.to_string();
            error!("Returning {}: {}", status_code, UNMARSHALLABLE_MESSAGE);
        }

        let mut response = Self {
            status_code,
            headers: BTreeMap::new(),
            body,
        };
        response.set_headers(cache_max_age);
        debug!(
            "响应构建完成：{} {}，响应体{}字节",
            response.status_code,
            response.information(),
            response.body.len()
        );
        response
    }

    /// 直接由应用错误构建响应
    pub fn from_error(err: ApiError, cache_max_age: u32) -> Self {
        Self::build(Err(err), cache_max_age)
    }

    fn set_headers(&mut self, cache_max_age: u32) -> &mut Self {
        self.headers.insert(
            HEADER_CACHE_CONTROL.to_string(),
            format!("max-age={}", cache_max_age),
        );
        self.headers
            .insert(HEADER_ALLOW_ORIGIN.to_string(), "*".to_string());
        self.headers
            .insert(HEADER_TIMESTAMP.to_string(), format_timestamp(&Utc::now()));
        self
    }
}

impl Response {
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// 状态码对应的原因短语，未登记的状态码为空字符串
    pub fn information(&self) -> &str {
        reason_phrase(self.status_code)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn is_error(&self) -> bool {
        self.status_code >= 400
    }
}

// RFC3339，纳秒精度，UTC 以 `Z` 结尾
fn format_timestamp(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Nanos, true)
}
