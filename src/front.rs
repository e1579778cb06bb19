// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 请求分发前端
//!
//! `Front` 是每次调用的唯一入口：
//! 1. 由请求上下文计算路由键，经路由表选出 handler。
//! 2. 同步执行 handler，得到成功负载或 `ApiError`。
//! 3. 交给 `Response::build` 生成带固定响应头的 JSON 响应。
//!
//! 第 1、2 步包在故障屏障里：handler 中的任何 panic 都被转换为 500 `ApiError`，
//! 并把消息与调用栈以单行 JSON 写入错误日志。`handle` 永远返回完整的响应。

use crate::{
    config::Config,
    exception::ApiError,
    fault,
    handlers::{self, LocaleFormatter},
    model::Status,
    param::DEFAULT_NOT_FOUND_CODE,
    request::Request,
    response::{HandlerResult, Response},
    router::Router,
    util::json_stack,
};

use log::{error, info};

/// 前端的只读配置，启动时设置一次。
#[derive(Debug, Clone)]
pub struct FrontConfig {
    /// 由 `/status` 路由原样返回
    pub status: Status,
    /// `Cache-Control: max-age=` 的秒数
    pub cache_max_age: u32,
    /// 路由未命中时的状态码
    pub not_found_code: u16,
}

impl FrontConfig {
    pub fn new(status: Status, cache_max_age: u32) -> Self {
        Self {
            status,
            cache_max_age,
            not_found_code: DEFAULT_NOT_FOUND_CODE,
        }
    }

    pub fn from_config(config: &Config, status: Status) -> Self {
        Self {
            status,
            cache_max_age: config.cache_max_age(),
            not_found_code: config.not_found_code(),
        }
    }
}

#[derive(Debug)]
pub struct Front {
    config: FrontConfig,
    router: Router,
}

impl Front {
    pub fn new(status: Status, cache_max_age: u32) -> Self {
        Self::with_config(FrontConfig::new(status, cache_max_age))
    }

    /// 使用内置路由表：`GET/status` 与 `GET/calc/{op}`
    pub fn with_config(config: FrontConfig) -> Self {
        let router = Self::default_routes(&config);
        Self::with_router(config, router)
    }

    pub fn with_router(config: FrontConfig, router: Router) -> Self {
        info!("前端已就绪，路由表：{:?}", router);
        Self { config, router }
    }

    fn default_routes(config: &FrontConfig) -> Router {
        let status = config.status.clone();
        let formatter = LocaleFormatter;
        Router::new(config.not_found_code)
            .route("GET/status", move |_| handlers::status(&status))
            .route("GET/calc/{op}", move |request| {
                handlers::calc(request, &formatter)
            })
    }

    /// 处理一次调用。该函数不会失败，也不会向外传播 panic：
    /// 所有失败信息都编码在响应的状态码与响应体中。
    pub fn handle(&self, request: &Request) -> Response {
        let max_age = self.config.cache_max_age;
        // 负载的序列化也会执行 handler 提供的代码，必须在屏障之内
        match fault::guard(|| Response::build(self.dispatch(request), max_age)) {
            Ok(response) => response,
            Err(fault) => {
                error!("{}", json_stack(fault.message(), fault.trace()));
                Response::build(Err(ApiError::wrap(&fault)), max_age)
            }
        }
    }

    /// 处理一条原始代理事件 JSON。事件无法解析时返回 400 响应。
    pub fn invoke(&self, event: &str) -> Response {
        match Request::try_from(event) {
            Ok(request) => self.handle(&request),
            Err(e) => Response::from_error(ApiError::new(400, e.to_string()), self.config.cache_max_age),
        }
    }

    fn dispatch(&self, request: &Request) -> HandlerResult {
        let route = request.route_key();
        info!("Handling a request for {}.", route);
        let handler = self.router.resolve(&route);
        handler(request)
    }
}

impl Front {
    pub fn status(&self) -> &Status {
        &self.config.status
    }

    pub fn cache_max_age(&self) -> u32 {
        self.config.cache_max_age
    }

    pub fn not_found_code(&self) -> u16 {
        self.config.not_found_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_error;

    fn front_with(router: Router) -> Front {
        Front::with_router(FrontConfig::new(Status::default(), 123), router)
    }

    #[test]
    fn test_front_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Front>();
    }

    #[test]
    fn test_from_config() {
        let config = Config::new();
        let front = Front::with_config(FrontConfig::from_config(&config, Status::default()));

        assert_eq!(front.cache_max_age(), 60);
        assert_eq!(front.not_found_code(), 404);
    }

    #[test]
    fn test_panic_recovery() {
        let front = front_with(Router::new(404).route("GET/whatever", |_| panic!("Simulated panic")));
        let response = front.handle(&Request::new("GET", "/whatever"));

        assert_eq!(response.status_code(), 500);
        assert_eq!(response.body(), r#"{"message":"Simulated panic","code":500}"#);
        assert_eq!(response.header("Cache-Control"), Some("max-age=123"));
    }

    #[test]
    fn test_error_passthrough() {
        let front = front_with(
            Router::new(404).route("GET/whatever", |_| Err(api_error!(345, "A simulated error: {}", "error"))),
        );
        let response = front.handle(&Request::new("GET", "/whatever"));

        assert_eq!(response.status_code(), 345);
        assert_eq!(response.body(), r#"{"message":"A simulated error: error","code":345}"#);
    }

    #[test]
    fn test_invoke_raw_event() {
        let front = Front::new(Status::default(), 123);
        let response = front.invoke(
            r#"{"requestContext": {"httpMethod": "GET", "resourcePath": "/nowhere"}, "headers": null}"#,
        );

        assert_eq!(response.status_code(), 404);
        assert_eq!(response.body(), r#"{"message":"No such route as GET/nowhere","code":404}"#);
    }

    #[test]
    fn test_invoke_malformed_event() {
        let front = Front::new(Status::default(), 123);
        let response = front.invoke("{not json");
        let body: serde_json::Value = serde_json::from_str(response.body()).unwrap();

        assert_eq!(response.status_code(), 400);
        assert_eq!(body["code"], 400);
        assert!(body["message"].as_str().unwrap().starts_with("Invalid event: "));
    }

    #[test]
    fn test_front_survives_repeated_panics() {
        let front = front_with(Router::new(404).route("GET/whatever", |_| panic!("again")));

        for _ in 0..3 {
            assert_eq!(front.handle(&Request::new("GET", "/whatever")).status_code(), 500);
        }
    }
}
