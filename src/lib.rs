#![warn(missing_docs)]

//! # ASS KFX RS
//!
//! 一个用于制作卡拉OK特效 (KFX) 的 ASS 字幕排版库。
//!
//! ## 主要功能
//!
//! - **文档读取**: 解析 `[Script Info]`、`[V4+ Styles]` 和 `[Events]`，得到元信息、样式表和事件行。
//! - **分层排版**: 把每一行拆分为单词、卡拉OK音节和字符，计算它们的时间、尺寸和九宫格对齐下的位置，
//!   支持对齐方式为 4、5、6 时的竖排。
//! - **行前/行后时间**: 按样式分组计算相邻行之间的间隔。
//! - **特效输出**: 追加新生成的事件行并写回 ASS 文件。
//!
//! ## 示例
//!
//! ```rust,no_run
//! use ass_kfx_rs::{Ass, config::LoadOptions, font::FixedAdvanceMetrics};
//!
//! let mut ass = Ass::from_path("in.ass", &LoadOptions::default(), &FixedAdvanceMetrics::default())?;
//!
//! let lines = ass.lines().to_vec();
//! for line in &lines {
//!     for syl in line.syls() {
//!         let mut fx = line.clone();
//!         fx.start_time = line.start_time + syl.start_time;
//!         fx.end_time = line.start_time + syl.end_time;
//!         fx.text = format!("{{\\an5\\pos({:.3},{:.3})}}{}", syl.placement.map_or(0.0, |p| p.center),
//!             syl.placement.map_or(0.0, |p| p.middle), syl.text);
//!         ass.write_line(&fx)?;
//!     }
//! }
//! ass.save("out.ass")?;
//! # Ok::<(), ass_kfx_rs::AssKfxError>(())
//! ```
pub mod config;
pub mod error;
pub mod font;
pub mod generator;
pub mod layout;
pub mod model;
pub mod parser;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

pub use crate::{
    error::{AssKfxError, Result},
    model::{Char, Extents, Line, Meta, Placement, Style, Syllable, Word},
};

use crate::{
    config::LoadOptions,
    font::FontMetricsProvider,
    generator::{format_dialogue_line, render_output},
    layout::compute_extended,
    parser::{ParsedDocument, parse_document},
};

// ==========================================================
//  顶层 API
// ==========================================================

/// 一个已加载的 ASS 文档。
///
/// 这是与本库交互的主要入口点：读取文档、访问排版结果、追加生成的行并保存。
#[derive(Debug, Clone)]
pub struct Ass {
    path_input: Option<PathBuf>,
    meta: Meta,
    styles: HashMap<String, Arc<Style>>,
    lines: Vec<Line>,
    output: Vec<String>,
    produced_lines: usize,
    started_at: Instant,
}

/// `to_json` 输出的数据视图。
#[derive(Serialize)]
struct AssData<'a> {
    meta: &'a Meta,
    styles: &'a HashMap<String, Arc<Style>>,
    lines: &'a [Line],
}

impl Ass {
    /// 从文件读取 ASS 文档。
    ///
    /// 音频和视频路径会相对于字幕文件所在目录解析。
    ///
    /// # 返回
    /// 文件不存在时返回 [`AssKfxError::FileNotFound`]。
    pub fn from_path(
        path: impl AsRef<Path>,
        options: &LoadOptions,
        provider: &dyn FontMetricsProvider,
    ) -> Result<Self> {
        let started_at = Instant::now();
        let path = path.as_ref();
        if !path.is_file() {
            return Err(AssKfxError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let parsed = parse_document(&content, path.parent(), options.keep_original);
        info!("已读取 {:?}: {} 个事件行。", path, parsed.lines.len());

        let mut ass = Self::from_parsed(parsed, options, provider, started_at);
        ass.path_input = Some(path.to_path_buf());
        Ok(ass)
    }

    /// 从字符串读取 ASS 文档。媒体路径保持原样。
    pub fn from_str_with(
        content: &str,
        options: &LoadOptions,
        provider: &dyn FontMetricsProvider,
    ) -> Self {
        let started_at = Instant::now();
        let parsed = parse_document(content, None, options.keep_original);
        Self::from_parsed(parsed, options, provider, started_at)
    }

    fn from_parsed(
        parsed: ParsedDocument,
        options: &LoadOptions,
        provider: &dyn FontMetricsProvider,
        started_at: Instant,
    ) -> Self {
        let ParsedDocument {
            meta,
            styles,
            mut lines,
            output,
        } = parsed;

        if options.extended {
            compute_extended(&mut lines, &styles, &meta, provider, options);
        }

        Self {
            path_input: None,
            meta,
            styles,
            lines,
            output,
            produced_lines: 0,
            started_at,
        }
    }

    /// 输入文件的路径；从字符串读取时为 `None`。
    pub fn path_input(&self) -> Option<&Path> {
        self.path_input.as_deref()
    }

    /// 文档元信息
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// 样式名到样式的映射
    pub fn styles(&self) -> &HashMap<String, Arc<Style>> {
        &self.styles
    }

    /// 所有事件行，按文档顺序排列
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// 同时返回元信息、样式表和事件行。
    pub fn data(&self) -> (&Meta, &HashMap<String, Arc<Style>>, &[Line]) {
        (&self.meta, &self.styles, &self.lines)
    }

    /// 已通过 [`Ass::write_line`] 追加的行数
    pub fn produced_lines(&self) -> usize {
        self.produced_lines
    }

    /// 在输出缓冲区末尾追加一行，调用 [`Ass::save`] 时写入文件。
    ///
    /// # 返回
    /// 行中含有无法写入的字段时返回 [`AssKfxError::TypeMismatch`]，此时输出缓冲区保持不变。
    pub fn write_line(&mut self, line: &Line) -> Result<()> {
        let record = format_dialogue_line(line)?;
        self.output.push(record);
        self.produced_lines += 1;
        Ok(())
    }

    /// 当前输出缓冲区对应的完整文档文本。
    pub fn to_ass_string(&self) -> String {
        render_output(&self.output)
    }

    /// 将输出缓冲区写入文件。
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if self.produced_lines == 0 {
            warn!("保存到 {:?} 时还没有生成任何行。", path);
        }

        // 与 Aegisub 一致，以带 BOM 的 UTF-8 写出
        fs::write(path, format!("\u{feff}{}", self.to_ass_string()))?;
        info!(
            "已保存到 {:?}: 生成了 {} 行，耗时 {:.3} 秒。",
            path,
            self.produced_lines,
            self.started_at.elapsed().as_secs_f64()
        );
        Ok(())
    }

    /// 将元信息、样式表和事件行序列化为 JSON。
    pub fn to_json(&self) -> Result<String> {
        let data = AssData {
            meta: &self.meta,
            styles: &self.styles,
            lines: &self.lines,
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }
}
