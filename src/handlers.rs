//! # 业务 handler
//!
//! 前端内置的两个路由实现：
//! - `status`：原样返回启动时采集的 `Status`。
//! - `calc`：四则运算（以及乘方、开方），结果按请求的区域设置格式化。
//!
//! handler 把客户端错误作为 `ApiError` 值返回；只有意料之外的故障才会以 panic 的形式
//! 交给前端的故障屏障处理。

use crate::{
    api_error,
    exception::ApiError,
    model::{CalculationResult, Status},
    param::{HEADER_LOCALE, UNDEFINED_LOCALE},
    request::Request,
    response::HandlerResult,
};

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

/// 数字格式化协作者：handler 只把它的输出原样放进结果。
#[cfg_attr(test, mockall::automock)]
pub trait NumberFormatter {
    fn format(&self, value: f64, locale: &str) -> String;
}

lazy_static! {
    // 形如 `en`、`en-GB`、`fr_FR`，或 `Accept-Language` 的首个条目 `de-DE,de;q=0.9`
    static ref LOCALE_TAG: Regex = Regex::new(r"^\s*([A-Za-z]{2,3})(?:[-_]([A-Za-z]{2}))?").unwrap();
}

/// 内置的区域格式化实现：千位分组，按语言选择分组符与小数点。
///
/// | 语言 | 分组符 | 小数点 |
/// |------|--------|--------|
/// | en（及未知语言） | `,` | `.` |
/// | fr | U+00A0 | `,` |
/// | de / es / it / nl | `.` | `,` |
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleFormatter;

impl LocaleFormatter {
    fn separators(locale: &str) -> (&'static str, &'static str) {
        let language = LOCALE_TAG
            .captures(locale)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_default();
        match language.as_str() {
            "fr" => ("\u{a0}", ","),
            "de" | "es" | "it" | "nl" => (".", ","),
            _ => (",", "."),
        }
    }
}

impl NumberFormatter for LocaleFormatter {
    fn format(&self, value: f64, locale: &str) -> String {
        let (group, decimal) = Self::separators(locale);
        // f64 的 Display 输出最短可往返表示，且不使用科学计数法
        let text = value.abs().to_string();
        let (integer, fraction) = match text.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (text.as_str(), None),
        };

        let mut out = String::new();
        if value < 0.0 {
            out.push('-');
        }
        for (index, digit) in integer.chars().enumerate() {
            if index > 0 && (integer.len() - index) % 3 == 0 {
                out.push_str(group);
            }
            out.push(digit);
        }
        if let Some(f) = fraction {
            out.push_str(decimal);
            out.push_str(f);
        }
        out
    }
}

/// `GET/status`
pub fn status(status: &Status) -> HandlerResult {
    Ok(Box::new(status.clone()))
}

/// `GET/calc/{op}`
///
/// `op` 只看前三个字符：`add`、`sub`、`mul`、`div`、`pow`、`roo`（开方）。
pub fn calc(request: &Request, formatter: &dyn NumberFormatter) -> HandlerResult {
    let op = request.path_parameter("op").unwrap_or_default();
    let val1 = float_parameter(request, "val1")?;
    let val2 = float_parameter(request, "val2")?;
    let locale = request.header(HEADER_LOCALE).unwrap_or(UNDEFINED_LOCALE);

    let (name, value) = match op.get(..3) {
        Some("add") => ("add", val1 + val2),
        Some("sub") => ("subtract", val1 - val2),
        Some("mul") => ("multiply", val1 * val2),
        Some("div") => ("divide", val1 / val2),
        Some("pow") => ("power", val1.powf(val2)),
        Some("roo") => ("root", val1.powf(1.0 / val2)),
        _ => return Err(api_error!(400, "Unknown calc operation: {}", op)),
    };

    if !value.is_finite() {
        return Err(api_error!(400, "Out of limits: {} {} {}", val1, name, val2));
    }
    debug!("计算完成：{} {} {} = {}", val1, name, val2, value);

    Ok(Box::new(CalculationResult {
        locale: locale.to_string(),
        op: name.to_string(),
        val1,
        val2,
        result: formatter.format(value, locale),
    }))
}

fn float_parameter(request: &Request, key: &str) -> Result<f64, ApiError> {
    let raw = match request.query_parameter(key) {
        Some(raw) => raw,
        None => return Err(api_error!(400, "Missing parameter {}", key)),
    };
    raw.trim()
        .parse::<f64>()
        .map_err(|_| api_error!(400, "Invalid parameter {}: {}", key, raw))
}
