//! 字体度量提供者。
//!
//! 排版核心只通过 [`FontMetricsProvider`] 获取文本尺寸与字体度量，
//! 提供者内部如何读取字体、是否缓存，对核心不可见。

pub mod fixed;
pub mod system;

use serde::{Deserialize, Serialize};

use crate::model::{Extents, Style};

pub use fixed::FixedAdvanceMetrics;
pub use system::SystemFontMetrics;

/// 一个样式对应字体的四项度量值。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FontMetrics {
    /// 上升高度
    pub ascent: f64,
    /// 下降高度 (正值)
    pub descent: f64,
    /// 内部行距
    pub internal_leading: f64,
    /// 外部行距
    pub external_leading: f64,
}

/// 字体度量提供者。
///
/// 对于相同的 `(style, text)`，两个方法都必须返回相同的结果，
/// 并且可以被多个线程同时调用。
pub trait FontMetricsProvider: Send + Sync {
    /// 测量 `text` 在 `style` 下的宽度和高度。
    fn measure(&self, style: &Style, text: &str) -> (f64, f64);

    /// 返回 `style` 所用字体的度量值。
    fn metrics(&self, style: &Style) -> FontMetrics;
}

/// 组合一段文本的尺寸和已知的字体度量。
pub(crate) fn extents_of(
    provider: &dyn FontMetricsProvider,
    style: &Style,
    text: &str,
    metrics: &FontMetrics,
) -> Extents {
    let (width, height) = provider.measure(style, text);
    Extents {
        width,
        height,
        ascent: metrics.ascent,
        descent: metrics.descent,
        internal_leading: metrics.internal_leading,
        external_leading: metrics.external_leading,
    }
}
