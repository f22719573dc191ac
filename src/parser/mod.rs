//! ASS 文档解析器
//!
//! 逐行读取 `[Script Info]`、`[V4+ Styles]` 和 `[Events]` 三个部分，
//! 同时构建写回文件时使用的输出缓冲区。无法解析的样式行和事件行会被记录并跳过，
//! 不会导致整个文档加载失败。

pub mod utils;

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use strum_macros::EnumString;
use tracing::{debug, warn};

use crate::error::{AssKfxError, Result};
use crate::layout::strip_tags;
use crate::model::{Line, Meta, Style};
use utils::{parse_ass_time, parse_flag, resolve_media_path, split_color_alpha};

/// 用于匹配节标题 `[Section Name]`
static SECTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]*)").expect("编译 SECTION_REGEX 失败"));

/// 用于匹配 [Events] 部分的 Dialogue 或 Comment 行
static EVENT_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<Type>Dialogue|Comment):\s*(?P<Body>.*)$").expect("编译 EVENT_LINE_REGEX 失败")
});

/// `[V4+ Styles]` 中一行样式的字段数
const STYLE_FIELD_COUNT: usize = 23;

/// 事件行的字段数，最后一个字段 (文本) 中可以包含逗号
const EVENT_FIELD_COUNT: usize = 10;

/// 文档中的节。
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum Section {
    /// 脚本信息，Aegisub 的项目信息也按脚本信息解析
    #[strum(serialize = "Script Info", serialize = "Aegisub Project Garbage")]
    ScriptInfo,
    /// 样式表
    #[strum(serialize = "V4+ Styles")]
    Styles,
    /// 事件
    #[strum(serialize = "Events")]
    Events,
    /// 其他节 (例如 `[Fonts]`)，内容原样保留
    #[strum(disabled)]
    Other,
}

/// 解析 ASS 文档得到的全部数据。
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    /// 文档元信息
    pub meta: Meta,
    /// 样式名到样式的映射
    pub styles: HashMap<String, Arc<Style>>,
    /// 所有成功解析的事件行，按文档顺序排列
    pub lines: Vec<Line>,
    /// 写回文件时使用的输出缓冲区 (每项为一行，不含换行符)
    pub output: Vec<String>,
}

/// 解析 `Style:` 之后的部分。
///
/// 字段顺序: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour,
/// BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle,
/// BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
pub fn parse_style(body: &str) -> Result<Style> {
    let fields: Vec<&str> = body.split(',').map(str::trim).collect();
    if fields.len() < STYLE_FIELD_COUNT {
        return Err(AssKfxError::InvalidStyle(format!(
            "需要 {STYLE_FIELD_COUNT} 个字段，实际只有 {} 个: {body}",
            fields.len()
        )));
    }

    let (color1, alpha1) = split_color_alpha(fields[3])?;
    let (color2, alpha2) = split_color_alpha(fields[4])?;
    let (color3, alpha3) = split_color_alpha(fields[5])?;
    let (color4, alpha4) = split_color_alpha(fields[6])?;

    Ok(Style {
        name: fields[0].to_string(),
        fontname: fields[1].to_string(),
        fontsize: fields[2].parse()?,
        color1,
        alpha1,
        color2,
        alpha2,
        color3,
        alpha3,
        color4,
        alpha4,
        bold: parse_flag(fields[7])?,
        italic: parse_flag(fields[8])?,
        underline: parse_flag(fields[9])?,
        strikeout: parse_flag(fields[10])?,
        scale_x: fields[11].parse()?,
        scale_y: fields[12].parse()?,
        spacing: fields[13].parse()?,
        angle: fields[14].parse()?,
        border_style: fields[15] == "3",
        outline: fields[16].parse()?,
        shadow: fields[17].parse()?,
        alignment: fields[18].parse()?,
        margin_l: fields[19].parse()?,
        margin_r: fields[20].parse()?,
        margin_v: fields[21].parse()?,
        encoding: fields[22].parse()?,
    })
}

/// 解析一行 `Dialogue:` 或 `Comment:` 事件。
///
/// 字段顺序: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
pub fn parse_event(event_line: &str, i: usize) -> Result<Line> {
    let caps = EVENT_LINE_REGEX
        .captures(event_line)
        .ok_or_else(|| AssKfxError::InvalidEvent(event_line.to_string()))?;

    let fields: Vec<&str> = caps["Body"].splitn(EVENT_FIELD_COUNT, ',').collect();
    if fields.len() < EVENT_FIELD_COUNT {
        return Err(AssKfxError::InvalidEvent(format!(
            "需要 {EVENT_FIELD_COUNT} 个字段，实际只有 {} 个: {event_line}",
            fields.len()
        )));
    }

    let raw_text = fields[9].to_string();
    Ok(Line {
        i,
        comment: &caps["Type"] == "Comment",
        layer: fields[0].trim().parse()?,
        start_time: parse_ass_time(fields[1])?,
        end_time: parse_ass_time(fields[2])?,
        style: fields[3].trim().to_string(),
        actor: fields[4].trim().to_string(),
        margin_l: fields[5].trim().parse()?,
        margin_r: fields[6].trim().parse()?,
        margin_v: fields[7].trim().parse()?,
        effect: fields[8].trim().to_string(),
        text: strip_tags(&raw_text),
        raw_text,
        extension: None,
    })
}

impl ParsedDocument {
    /// 处理 `[Script Info]` 中的一行，返回写入输出缓冲区的内容。
    fn apply_script_info(&mut self, line: &str, base_dir: Option<&Path>) -> String {
        let Some((key, value)) = line.split_once(':') else {
            return line.to_string();
        };
        let value = value.trim();

        let parsed = match key.trim() {
            "WrapStyle" => value.parse().map(|v| self.meta.wrap_style = v),
            "ScaledBorderAndShadow" => {
                self.meta.scaled_border_and_shadow = value.eq_ignore_ascii_case("yes");
                Ok(())
            }
            "PlayResX" => value.parse().map(|v| self.meta.play_res_x = v),
            "PlayResY" => value.parse().map(|v| self.meta.play_res_y = v),
            "Audio File" => {
                self.meta.audio = resolve_media_path(value, base_dir);
                return format!("Audio File: {}", self.meta.audio);
            }
            "Video File" => {
                self.meta.video = resolve_media_path(value, base_dir);
                return format!("Video File: {}", self.meta.video);
            }
            _ => Ok(()),
        };

        if let Err(e) = parsed {
            warn!("无法解析脚本信息 '{line}': {e}");
        }
        line.to_string()
    }
}

/// 解析 ASS 文档。
///
/// `base_dir` 是字幕文件所在的目录，用于解析音频和视频的路径。
/// `keep_original` 为 `true` 时，原有的事件会以 `Comment:` 的形式保留在输出缓冲区中；
/// 否则事件部分只保留 `Format:` 行。
pub fn parse_document(content: &str, base_dir: Option<&Path>, keep_original: bool) -> ParsedDocument {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut doc = ParsedDocument::default();
    let mut section = Section::Other;

    for (line_num, line) in content.lines().enumerate() {
        let line_num = line_num + 1;

        if let Some(caps) = SECTION_REGEX.captures(line) {
            section = caps[1].parse().unwrap_or(Section::Other);
            doc.output.push(line.to_string());
            continue;
        }

        match section {
            Section::ScriptInfo => {
                let out = doc.apply_script_info(line, base_dir);
                doc.output.push(out);
            }
            Section::Styles => {
                doc.output.push(line.to_string());
                let Some(body) = line.strip_prefix("Style:") else {
                    continue;
                };
                match parse_style(body) {
                    Ok(style) => {
                        doc.styles.insert(style.name.clone(), Arc::new(style));
                    }
                    Err(e) => warn!("跳过第 {line_num} 行无法解析的样式: {e}"),
                }
            }
            Section::Events => {
                if keep_original {
                    doc.output.push(comment_out(line));
                } else if line.trim_start().starts_with("Format:") {
                    doc.output.push(line.to_string());
                }

                if !EVENT_LINE_REGEX.is_match(line) {
                    continue;
                }
                match parse_event(line, doc.lines.len()) {
                    Ok(event) => doc.lines.push(event),
                    Err(e) => warn!("跳过第 {line_num} 行无法解析的事件: {e}"),
                }
            }
            Section::Other => doc.output.push(line.to_string()),
        }
    }

    debug!(
        "解析完成: {} 个样式, {} 个事件行。",
        doc.styles.len(),
        doc.lines.len()
    );
    doc
}

/// 将 `Dialogue:` 事件改为 `Comment:`，其他行原样返回。
fn comment_out(line: &str) -> String {
    match line.strip_prefix("Dialogue:") {
        Some(rest) => format!("Comment:{rest}"),
        None => line.to_string(),
    }
}
