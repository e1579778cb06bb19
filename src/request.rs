// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 请求模块
//!
//! 将 API Gateway 代理事件解析为强类型的 `Request`。前端只消费其中几类字段：
//! 1. 请求上下文中的 HTTP 方法与资源路径模板（二者拼接成路由键）。
//! 2. 路径参数。
//! 3. 查询字符串参数。
//! 4. 请求头。
//!
//! 网关对空集合会发送 `null`，解析时统一视为空表。

use crate::exception::Exception;
use log::error;
use serde::Deserializer;
use serde_derive::Deserialize;

use std::collections::HashMap;

/// 网关填充的请求上下文
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(default)]
    http_method: String,
    /// 资源路径模板，例如 `/calc/{op}`，而不是实际请求路径
    #[serde(default)]
    resource_path: String,
}

/// 一次调用的入站请求。
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(default)]
    request_context: RequestContext,
    #[serde(default, deserialize_with = "null_as_empty")]
    path_parameters: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    query_string_parameters: HashMap<String, String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    headers: HashMap<String, String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let parameters: Option<HashMap<String, String>> = serde::Deserialize::deserialize(deserializer)?;
    Ok(parameters.unwrap_or_default())
}

impl Request {
    pub fn new(http_method: &str, resource_path: &str) -> Self {
        Self {
            request_context: RequestContext {
                http_method: http_method.to_string(),
                resource_path: resource_path.to_string(),
            },
            ..Default::default()
        }
    }

    /// 从代理事件 JSON 文本构建 `Request`。
    ///
    /// # 错误处理
    /// 文本不是合法的事件 JSON 时返回 `Exception::InvalidEvent`。
    pub fn try_from(event: &str) -> Result<Self, Exception> {
        match serde_json::from_str(event) {
            Ok(request) => Ok(request),
            Err(e) => {
                error!("无法解析调用事件：{}", e);
                Err(Exception::InvalidEvent(e.to_string()))
            }
        }
    }

    pub fn with_path_parameter(mut self, name: &str, value: &str) -> Self {
        self.path_parameters
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_query_parameter(mut self, name: &str, value: &str) -> Self {
        self.query_string_parameters
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// 路由键：HTTP 方法与资源路径模板直接拼接，中间没有分隔符，例如 `GET/calc/{op}`
    pub fn route_key(&self) -> String {
        [
            self.request_context.http_method.as_str(),
            self.request_context.resource_path.as_str(),
        ]
        .concat()
    }
}

// --- Getter 访问器实现 ---

impl Request {
    /// 获取 HTTP 请求方法
    pub fn http_method(&self) -> &str {
        &self.request_context.http_method
    }

    /// 获取资源路径模板
    pub fn resource_path(&self) -> &str {
        &self.request_context.resource_path
    }

    /// 获取路径参数
    pub fn path_parameter(&self, name: &str) -> Option<&str> {
        self.path_parameters.get(name).map(String::as_str)
    }

    /// 获取查询字符串参数
    pub fn query_parameter(&self, name: &str) -> Option<&str> {
        self.query_string_parameters.get(name).map(String::as_str)
    }

    /// 获取请求头。按 HTTP 语义，字段名大小写不敏感。
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 验证常规代理事件的解析
    #[test]
    fn test_parse_proxy_event() {
        let event = r#"{
            "resource": "/calc/{op}",
            "path": "/calc/add",
            "httpMethod": "GET",
            "headers": {"Accept-Language": "en-GB"},
            "queryStringParameters": {"val1": "3.5", "val2": "2.25"},
            "pathParameters": {"op": "add"},
            "requestContext": {"resourcePath": "/calc/{op}", "httpMethod": "GET"}
        }"#;

        let request = Request::try_from(event).unwrap();

        assert_eq!(request.http_method(), "GET");
        assert_eq!(request.resource_path(), "/calc/{op}");
        assert_eq!(request.route_key(), "GET/calc/{op}");
        assert_eq!(request.path_parameter("op"), Some("add"));
        assert_eq!(request.query_parameter("val1"), Some("3.5"));
        assert_eq!(request.header("Accept-Language"), Some("en-GB"));
    }

    /// 网关对空集合发送 null
    #[test]
    fn test_null_collections() {
        let event = r#"{
            "headers": null,
            "queryStringParameters": null,
            "pathParameters": null,
            "requestContext": {"resourcePath": "/status", "httpMethod": "GET"}
        }"#;

        let request = Request::try_from(event).unwrap();

        assert_eq!(request.route_key(), "GET/status");
        assert_eq!(request.query_parameter("val1"), None);
        assert_eq!(request.header("Accept-Language"), None);
    }

    /// 缺失请求上下文时路由键为空串，交由路由器返回未命中
    #[test]
    fn test_missing_context() {
        let request = Request::try_from("{}").unwrap();
        assert_eq!(request.route_key(), "");
    }

    #[test]
    fn test_invalid_event() {
        let result = Request::try_from("not json");

        assert!(result.is_err());
        match result.unwrap_err() {
            Exception::InvalidEvent(_) => {}
            _ => panic!("Expected InvalidEvent error"),
        }
    }

    /// 验证 Header 字段名是否大小写不敏感
    #[test]
    fn test_case_insensitive_headers() {
        let request = Request::new("GET", "/calc/{op}").with_header("accept-language", "fr-FR");

        assert_eq!(request.header("Accept-Language"), Some("fr-FR"));
        assert_eq!(request.header("ACCEPT-LANGUAGE"), Some("fr-FR"));
    }

    #[test]
    fn test_builder() {
        let request = Request::new("POST", "/calc/{op}")
            .with_path_parameter("op", "mul")
            .with_query_parameter("val1", "1.5");

        assert_eq!(request.route_key(), "POST/calc/{op}");
        assert_eq!(request.path_parameter("op"), Some("mul"));
        assert_eq!(request.query_parameter("val1"), Some("1.5"));
        assert_eq!(request.query_parameter("val2"), None);
    }
}
