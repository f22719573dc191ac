//! 排版核心：把每一行拆分为单词、音节和字符，并计算它们的尺寸、位置与时间。
//!
//! 每一行的计算相互独立，可以在 rayon 线程池中并行进行；
//! 行前/行后时间依赖于所有行，在全部行完成后单独计算。

pub mod chars;
pub mod chunks;
pub mod lead;
pub mod position;
pub mod syllables;
pub mod words;

use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::LoadOptions;
use crate::font::{FontMetricsProvider, extents_of};
use crate::model::{Line, LineExtension, Meta, Style};

pub use chars::segment_chars;
pub use chunks::{TagChunk, split_tag_chunks, strip_tags};
pub use lead::{LEAD_SENTINEL_MS, compute_lead_times};
pub use position::{Canvas, Flowable, Margins, flow_horizontal, place_line, stack_vertical};
pub use syllables::extract_syllables;
pub use words::segment_words;

/// 一次扩展计算中所有行共享的只读上下文。
#[derive(Clone, Copy)]
pub struct LayoutContext<'a> {
    /// 样式名到样式的映射
    pub styles: &'a HashMap<String, Arc<Style>>,
    /// 脚本分辨率；不为正时不计算任何位置
    pub canvas: Option<Canvas>,
    /// 字体度量提供者
    pub provider: &'a dyn FontMetricsProvider,
    /// 是否启用竖排
    pub vertical_kanji: bool,
}

impl<'a> LayoutContext<'a> {
    /// 由文档数据和加载选项构造上下文。
    pub fn new(
        styles: &'a HashMap<String, Arc<Style>>,
        meta: &Meta,
        provider: &'a dyn FontMetricsProvider,
        options: &LoadOptions,
    ) -> Self {
        Self {
            styles,
            canvas: Canvas::from_meta(meta),
            provider,
            vertical_kanji: options.vertical_kanji,
        }
    }

    /// 计算一行的扩展信息。
    pub fn extend_line(&self, line: &mut Line) {
        let duration = line.end_time - line.start_time;

        let Some(style) = self.styles.get(&line.style) else {
            warn!("第 {} 行使用了未定义的样式 '{}'，跳过排版。", line.i, line.style);
            line.extension = Some(LineExtension {
                duration,
                ..Default::default()
            });
            return;
        };

        let provider = self.provider;
        let metrics = provider.metrics(style);
        let measure = |text: &str| extents_of(provider, style, text, &metrics);

        let alignment = style.alignment;
        let space_width = provider.measure(style, " ").0;
        let spacing = style.spacing;
        let vertical = self.vertical_kanji && (4..=6).contains(&alignment);

        let mut extents = measure(&line.text);
        let mut placement = self.canvas.map(|canvas| {
            let margins = Margins::resolve(line, style);
            place_line(canvas, alignment, margins, extents.width, extents.height)
        });

        let mut words = segment_words(&line.text, line.start_time, line.end_time, style);
        for word in &mut words {
            word.extents = measure(&word.text);
        }

        let mut syls = extract_syllables(&split_tag_chunks(&line.raw_text), style);
        for syl in &mut syls {
            syl.extents = measure(&syl.text);
        }

        if let (Some(canvas), Some(line_placement)) = (self.canvas, placement.as_mut()) {
            if vertical && !words.is_empty() {
                stack_vertical(&mut words, &mut extents, line_placement, alignment, canvas);
            } else {
                flow_horizontal(&mut words, line_placement, alignment, space_width, spacing);
            }

            if vertical && !syls.is_empty() {
                stack_vertical(&mut syls, &mut extents, line_placement, alignment, canvas);
            } else {
                flow_horizontal(&mut syls, line_placement, alignment, space_width, spacing);
            }
        }

        let mut chars = segment_chars(&syls, &words);
        for c in &mut chars {
            c.extents = measure(&c.text);
        }
        if let Some(line_placement) = &placement {
            flow_horizontal(&mut chars, line_placement, alignment, space_width, spacing);
        }

        debug!(
            "第 {} 行: {} 个单词, {} 个音节, {} 个字符。",
            line.i,
            words.len(),
            syls.len(),
            chars.len()
        );

        line.extension = Some(LineExtension {
            duration,
            styleref: Some(Arc::clone(style)),
            extents: Some(extents),
            placement,
            words,
            syls,
            chars,
            ..Default::default()
        });
    }
}

/// 对所有行进行扩展计算，然后计算行前/行后时间。
pub fn compute_extended(
    lines: &mut [Line],
    styles: &HashMap<String, Arc<Style>>,
    meta: &Meta,
    provider: &dyn FontMetricsProvider,
    options: &LoadOptions,
) {
    let ctx = LayoutContext::new(styles, meta, provider, options);

    if ctx.canvas.is_none() {
        warn!("脚本分辨率无效，将不计算任何位置。");
    }

    if options.parallel {
        lines.par_iter_mut().for_each(|line| ctx.extend_line(line));
    } else {
        lines.iter_mut().for_each(|line| ctx.extend_line(line));
    }

    compute_lead_times(lines);
}
