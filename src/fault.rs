//! # 故障屏障
//!
//! 把一段代码包进 `catch_unwind`，将其中的 panic 转换为普通的错误值 `Fault`。
//!
//! panic 发生时调用栈已经展开，所以调用栈必须在 panic hook 里采集：hook 只在屏障内的线程上
//! 记录调用栈，屏障外的 panic 仍交给原有 hook 处理。

use log::debug;

use std::{
    any::Any,
    backtrace::Backtrace,
    cell::{Cell, RefCell},
    error::Error,
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::Once,
};

thread_local! {
    static GUARDED: Cell<bool> = const { Cell::new(false) };
    static LAST_TRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

fn install_hook() {
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if GUARDED.with(Cell::get) {
                let trace = Backtrace::force_capture().to_string();
                LAST_TRACE.with(|t| *t.borrow_mut() = Some(trace));
            } else {
                previous(info);
            }
        }));
    });
}

/// 屏障内捕获到的 panic
#[derive(Debug, Clone)]
pub struct Fault {
    message: String,
    trace: String,
}

impl Fault {
    pub fn message(&self) -> &str {
        &self.message
    }

    /// panic 发生处的调用栈
    pub fn trace(&self) -> &str {
        &self.trace
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for Fault {}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Unprintable".to_string()
    }
}

/// 执行 `f`；`f` 内的任何 panic 都被拦截并以 `Err(Fault)` 返回，不会越过调用方。
pub fn guard<T, F>(f: F) -> Result<T, Fault>
where
    F: FnOnce() -> T,
{
    install_hook();
    let outer = GUARDED.with(|g| g.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    GUARDED.with(|g| g.set(outer));

    result.map_err(|payload| {
        let message = panic_message(payload.as_ref());
        let trace = LAST_TRACE
            .with(|t| t.borrow_mut().take())
            .unwrap_or_default();
        debug!("故障屏障拦截到panic：{}", message);
        Fault { message, trace }
    })
}
