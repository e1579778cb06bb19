// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # API 前端协议参数与常量模块
//!
//! 该模块定义了 `apifront` 遵循的响应约定常量，包括：
//! - 每个响应都必须携带的固定响应头名称。
//! - 常见 HTTP 状态码及其原因短语（Reason Phrase）。
//! - 序列化失败时使用的兜底响应体。

use std::collections::HashMap;
use lazy_static::lazy_static;

/// 缓存时长响应头
pub const HEADER_CACHE_CONTROL: &str = "Cache-Control";

/// 跨域许可响应头
pub const HEADER_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";

/// 响应生成时间戳响应头
pub const HEADER_TIMESTAMP: &str = "X-Timestamp";

/// 计算器读取区域设置的请求头
pub const HEADER_LOCALE: &str = "Accept-Language";

/// 未携带区域设置时使用的占位值
pub const UNDEFINED_LOCALE: &str = "undefined";

/// 默认缓存时长（秒）
pub const DEFAULT_CACHE_MAX_AGE: u32 = 60;

/// 路由未命中时的默认状态码
pub const DEFAULT_NOT_FOUND_CODE: u16 = 404;

/// 成功负载无法序列化时的兜底消息
pub const UNMARSHALLABLE_MESSAGE: &str = "Unmarshallable data";

/// 成功负载无法序列化时的兜底响应体，固定为 500
pub const UNMARSHALLABLE_BODY: &str = r#"{"message":"Unmarshallable data","code":500}"#;

lazy_static! {
    /// HTTP 状态码与其对应的标准原因短语映射表。
    ///
    /// 参考标准：[RFC 9110: HTTP Semantics](https://www.rfc-editor.org/rfc/rfc9110.html)。
    pub static ref STATUS_CODES: HashMap<u16, &'static str> = {
        let mut map = HashMap::new();
        // 2xx: 成功响应 (Successful)
        map.insert(200, "OK");
        map.insert(201, "Created");
        map.insert(202, "Accepted");
        map.insert(204, "No Content");

        // 3xx: 重定向 (Redirection)
        map.insert(301, "Moved Permanently");
        map.insert(302, "Found");
        map.insert(304, "Not Modified");

        // 4xx: 客户端错误 (Client Error)
        map.insert(400, "Bad Request");
        map.insert(401, "Unauthorized");
        map.insert(403, "Forbidden");
        map.insert(404, "Not Found");
        map.insert(405, "Method Not Allowed");
        map.insert(406, "Not Acceptable");
        map.insert(409, "Conflict");
        map.insert(410, "Gone");
        map.insert(415, "Unsupported Media Type");
        map.insert(418, "I'm a teapot");
        map.insert(422, "Unprocessable Content");
        map.insert(429, "Too Many Requests");

        // 5xx: 服务端错误 (Server Error)
        map.insert(500, "Internal Server Error");
        map.insert(501, "Not Implemented");
        map.insert(502, "Bad Gateway");
        map.insert(503, "Service Unavailable");
        map.insert(504, "Gateway Timeout");
        map
    };
}

/// 查询状态码的原因短语。
///
/// 与 Web 服务器不同，handler 可以返回任意状态码，因此未登记的状态码不会 panic，
/// 而是返回空字符串。
pub fn reason_phrase(code: u16) -> &'static str {
    STATUS_CODES.get(&code).copied().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_phrase_known() {
        assert_eq!(reason_phrase(200), "OK");
        assert_eq!(reason_phrase(404), "Not Found");
        assert_eq!(reason_phrase(500), "Internal Server Error");
    }

    #[test]
    fn test_reason_phrase_unknown() {
        assert_eq!(reason_phrase(345), "");
    }

    #[test]
    fn test_unmarshallable_body_matches_message() {
        let value: serde_json::Value = serde_json::from_str(UNMARSHALLABLE_BODY).unwrap();
        assert_eq!(value["message"], UNMARSHALLABLE_MESSAGE);
        assert_eq!(value["code"], 500);
    }
}
