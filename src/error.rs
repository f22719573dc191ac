//! 定义了整个 `ass-kfx` 库的错误类型 `AssKfxError`。

use std::{fmt, io, num::ParseFloatError, num::ParseIntError, path::PathBuf};
use thiserror::Error;

/// `ass-kfx` 库的通用错误枚举。
#[derive(Error, Debug)]
pub enum AssKfxError {
    /// I/O 错误 (源自 `io::Error`)
    #[error("I/O 错误: {0}")]
    Io(#[from] io::Error),

    /// JSON 序列化或解析失败 (源自 `serde_json::Error`)
    #[error("JSON 处理失败: {0}")]
    Json(#[from] serde_json::Error),

    /// 字符串格式化错误
    #[error("格式错误: {0}")]
    Format(#[from] fmt::Error),

    /// 整数解析失败 (源自 `std::num::ParseIntError`)
    #[error("整数解析失败: {0}")]
    ParseInt(#[from] ParseIntError),

    /// 浮点数解析失败 (源自 `std::num::ParseFloatError`)
    #[error("浮点数解析失败: {0}")]
    ParseFloat(#[from] ParseFloatError),

    /// 无效的 ASS 时间字符串
    #[error("无效的时间格式: {0}")]
    InvalidTime(String),

    /// 无效的 ASS 颜色字符串
    #[error("无效的颜色格式: {0}")]
    InvalidColor(String),

    /// 无法解析的样式行
    #[error("无效的样式行: {0}")]
    InvalidStyle(String),

    /// 无法解析的事件行
    #[error("无效的事件行: {0}")]
    InvalidEvent(String),

    /// 写入输出时传入的值不是一个合法的字幕行
    #[error("类型不匹配: 期望一个合法的字幕行，实际为 {0}")]
    TypeMismatch(String),

    /// 字体加载或度量失败
    #[error("字体错误: {0}")]
    Font(String),

    /// 找不到输入的字幕文件
    #[error("无效的字幕文件路径: {0}")]
    FileNotFound(PathBuf),

    /// 找不到用户配置目录
    #[error("无法找到用户配置目录")]
    ConfigDirNotFound,
}

/// `AssKfxError` 的 `Result` 类型别名，方便在函数签名中使用。
pub type Result<T> = std::result::Result<T, AssKfxError>;
