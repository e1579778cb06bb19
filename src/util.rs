use log::error;
use serde_derive::Serialize;

use crate::response::Payload;

/// 序列化为 JSON 字符串；失败时返回空字符串，由调用方决定兜底策略。
pub fn json_stringify<P: Payload + ?Sized>(data: &P) -> String {
    match data.to_json() {
        Ok(json) => json,
        Err(e) => {
            error!("JSON序列化失败：{}", e);
            String::new()
        }
    }
}

#[derive(Serialize)]
struct TraceData<'a> {
    #[serde(rename = "Panic")]
    panic: &'a str,
    #[serde(rename = "Stack")]
    stack: Vec<&'a str>,
}

/// 将 panic 消息与调用栈合并为单行 JSON，方便日志检索。
pub fn json_stack(panic_msg: &str, raw_trace: &str) -> String {
    let trace = raw_trace.replace('\t', "");
    let data = TraceData {
        panic: panic_msg,
        stack: trace.lines().map(str::trim_start).collect(),
    };
    match serde_json::to_string(&data) {
        Ok(json) => json,
        Err(_) => format!("Panic:{}: {}", panic_msg, trace),
    }
}
