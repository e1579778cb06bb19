//! # 路由表
//!
//! 路由键（HTTP 方法 + 资源路径模板）到 handler 的精确映射。路由表在前端构造时一次性建好，
//! 之后只读，因此可以在并发调用之间共享而无需加锁。

use crate::{api_error, request::Request, response::HandlerResult};

use log::debug;

use std::{collections::HashMap, fmt, sync::Arc};

/// 路由到的处理函数
pub type Handler = Arc<dyn Fn(&Request) -> HandlerResult + Send + Sync>;

pub struct Router {
    routes: HashMap<String, Handler>,
    not_found: Handler,
}

impl Router {
    /// 创建空路由表。未命中的路由由内置 handler 以 `not_found_code` 响应。
    pub fn new(not_found_code: u16) -> Self {
        let not_found: Handler = Arc::new(move |request: &Request| -> HandlerResult {
            Err(api_error!(
                not_found_code,
                "No such route as {}",
                request.route_key()
            ))
        });
        Self {
            routes: HashMap::new(),
            not_found,
        }
    }

    /// 登记一条路由。同一个键重复登记时，后者覆盖前者。
    pub fn route<F>(mut self, key: &str, handler: F) -> Self
    where
        F: Fn(&Request) -> HandlerResult + Send + Sync + 'static,
    {
        self.routes.insert(key.to_string(), Arc::new(handler));
        self
    }

    /// 精确匹配路由键；未命中时返回内置的 not-found handler。
    pub fn resolve(&self, route_key: &str) -> Handler {
        match self.routes.get(route_key) {
            Some(handler) => Arc::clone(handler),
            None => {
                debug!("路由{}未登记", route_key);
                Arc::clone(&self.not_found)
            }
        }
    }

    pub fn contains(&self, route_key: &str) -> bool {
        self.routes.contains_key(route_key)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.routes.keys().collect();
        keys.sort();
        f.debug_struct("Router").field("routes", &keys).finish()
    }
}
