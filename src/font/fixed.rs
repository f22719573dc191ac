//! 不依赖字体文件的定宽度量。
//!
//! 每个字符 (扩展字素簇) 的宽度是字号的固定比例，东亚全角字符占满一个字号。
//! 结果完全确定，适合测试以及没有系统字体的无头环境。

use unicode_segmentation::UnicodeSegmentation;

use crate::font::{FontMetrics, FontMetricsProvider};
use crate::model::Style;

/// 定宽字体度量提供者。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvanceMetrics {
    /// 半角字符的步进宽度，以字号为单位
    pub advance: f64,
    /// 全角字符的步进宽度，以字号为单位
    pub wide_advance: f64,
    /// 上升高度，以字号为单位
    pub ascent: f64,
    /// 下降高度，以字号为单位
    pub descent: f64,
}

impl Default for FixedAdvanceMetrics {
    fn default() -> Self {
        Self {
            advance: 0.5,
            wide_advance: 1.0,
            ascent: 0.8,
            descent: 0.2,
        }
    }
}

fn is_wide(c: char) -> bool {
    matches!(c,
        '\u{1100}'..='\u{115F}'
        | '\u{2E80}'..='\u{A4CF}'
        | '\u{AC00}'..='\u{D7A3}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{FE30}'..='\u{FE4F}'
        | '\u{FF00}'..='\u{FF60}'
        | '\u{FFE0}'..='\u{FFE6}'
        | '\u{20000}'..='\u{3FFFD}')
}

impl FontMetricsProvider for FixedAdvanceMetrics {
    fn measure(&self, style: &Style, text: &str) -> (f64, f64) {
        if text.is_empty() {
            return (0.0, 0.0);
        }

        let (units, count) = text.graphemes(true).fold((0.0, 0usize), |(units, count), g| {
            let wide = g.chars().next().is_some_and(is_wide);
            let step = if wide { self.wide_advance } else { self.advance };
            (units + step, count + 1)
        });

        let width = units * style.fontsize * style.scale_x / 100.0 + style.spacing * count as f64;
        let height = (self.ascent + self.descent) * style.fontsize * style.scale_y / 100.0;
        (width, height)
    }

    fn metrics(&self, style: &Style) -> FontMetrics {
        let scale = style.fontsize * style.scale_y / 100.0;
        FontMetrics {
            ascent: self.ascent * scale,
            descent: self.descent * scale,
            internal_leading: ((self.ascent + self.descent - 1.0) * scale).max(0.0),
            external_leading: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(fontsize: f64) -> Style {
        Style {
            fontsize,
            ..Default::default()
        }
    }

    #[test]
    fn test_half_and_full_width() {
        let provider = FixedAdvanceMetrics::default();

        assert_eq!(provider.measure(&style(40.0), "ab"), (40.0, 40.0));
        assert_eq!(provider.measure(&style(40.0), "漢字"), (80.0, 40.0));
        assert_eq!(provider.measure(&style(40.0), ""), (0.0, 0.0));
    }

    #[test]
    fn test_scale_and_spacing() {
        let provider = FixedAdvanceMetrics::default();
        let style = Style {
            fontsize: 20.0,
            scale_x: 200.0,
            scale_y: 50.0,
            spacing: 3.0,
            ..Default::default()
        };

        // 3 个字符: 3 * 0.5 * 20 * 2 + 3 * 3
        assert_eq!(provider.measure(&style, "abc"), (69.0, 10.0));
    }

    #[test]
    fn test_combining_mark_is_one_character() {
        let provider = FixedAdvanceMetrics::default();
        assert_eq!(provider.measure(&style(10.0), "e\u{301}"), (5.0, 10.0));
    }
}
