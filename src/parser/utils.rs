//! ASS 文档中使用的标量转换工具：时间、颜色、布尔标志和媒体路径。

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AssKfxError, Result};

/// 用于解析ASS时间戳字符串 (H:MM:SS.CS)
static ASS_TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2})\.(\d{2})$").expect("编译 ASS_TIME_REGEX 失败")
});

/// 用于解析 `&HAABBGGRR` 形式的颜色，透明度部分可省略
static ASS_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&H([0-9A-Fa-f]{2})?([0-9A-Fa-f]{2})([0-9A-Fa-f]{2})([0-9A-Fa-f]{2})&?$")
        .expect("编译 ASS_COLOR_REGEX 失败")
});

/// 解析 ASS 时间字符串 (H:MM:SS.CS) 并转换为毫秒。
pub fn parse_ass_time(time_str: &str) -> Result<i64> {
    let time_str = time_str.trim();
    let caps = ASS_TIME_REGEX
        .captures(time_str)
        .ok_or_else(|| AssKfxError::InvalidTime(time_str.to_string()))?;

    let h: i64 = caps[1].parse()?;
    let m: i64 = caps[2].parse()?;
    let s: i64 = caps[3].parse()?;
    let cs: i64 = caps[4].parse()?;
    h.checked_mul(3_600_000)
        .and_then(|ms| ms.checked_add(m * 60_000 + s * 1000 + cs * 10))
        .ok_or_else(|| AssKfxError::InvalidTime(time_str.to_string()))
}

/// 将毫秒时间格式化为 ASS 时间字符串 `H:MM:SS.CS`。负数时间按 0 处理。
pub fn format_ass_time(ms: i64) -> String {
    let total_cs = ms.max(0).saturating_add(5) / 10; // 四舍五入到厘秒
    let cs = total_cs % 100;
    let total_seconds = total_cs / 100;
    let seconds = total_seconds % 60;
    let total_minutes = total_seconds / 60;
    let minutes = total_minutes % 60;
    let hours = total_minutes / 60;
    format!("{hours}:{minutes:02}:{seconds:02}.{cs:02}")
}

/// 将 `&HAABBGGRR` 拆分为颜色 `&HBBGGRR&` 与透明度 `&HAA&`。
pub fn split_color_alpha(value: &str) -> Result<(String, String)> {
    let value = value.trim();
    let caps = ASS_COLOR_REGEX
        .captures(value)
        .ok_or_else(|| AssKfxError::InvalidColor(value.to_string()))?;

    let alpha = caps.get(1).map_or("00", |m| m.as_str());
    let color = format!("&H{}{}{}&", &caps[2], &caps[3], &caps[4]).to_uppercase();
    Ok((color, format!("&H{}&", alpha.to_uppercase())))
}

/// ASS 中的布尔字段用 `-1` 表示真、`0` 表示假，这里把任何非零值都视为真。
pub fn parse_flag(value: &str) -> Result<bool> {
    Ok(value.trim().parse::<i32>()? != 0)
}

/// 将 `Audio File` / `Video File` 的值解析为相对于字幕文件目录的路径。
///
/// 开头的每个 `../` 都会让基准目录上移一级。`?dummy` 开头的虚拟视频、
/// 没有基准目录以及解析后文件不存在的情况都保持原值。
pub fn resolve_media_path(value: &str, base_dir: Option<&Path>) -> String {
    if value.starts_with("?dummy") {
        return value.to_string();
    }
    let Some(mut dir) = base_dir else {
        return value.to_string();
    };

    let mut rest = value;
    while let Some(stripped) = rest.strip_prefix("../") {
        dir = dir.parent().unwrap_or(dir);
        rest = stripped;
    }

    let candidate = dir.join(rest);
    if candidate.is_file() {
        candidate.to_string_lossy().into_owned()
    } else {
        value.to_string()
    }
}
