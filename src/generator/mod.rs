//! ASS 事件行生成器

use std::fmt::Write;

use crate::error::{AssKfxError, Result};
use crate::model::Line;
use crate::parser::utils::format_ass_time;

/// 检查一行是否可以安全地写成一条事件记录。
///
/// 任何字段都不能包含换行；样式、说话人和特效字段位于逗号分隔的字段中间，不能包含逗号。
pub fn validate_line(line: &Line) -> Result<()> {
    let fields = [
        ("style", &line.style),
        ("actor", &line.actor),
        ("effect", &line.effect),
        ("text", &line.text),
    ];

    for (name, value) in fields {
        if value.contains(['\n', '\r']) {
            return Err(AssKfxError::TypeMismatch(format!(
                "字段 {name} 中包含换行: {value:?}"
            )));
        }
        if name != "text" && value.contains(',') {
            return Err(AssKfxError::TypeMismatch(format!(
                "字段 {name} 中包含逗号: {value:?}"
            )));
        }
    }
    Ok(())
}

/// 将一行格式化为 `Dialogue:` 或 `Comment:` 事件记录。
///
/// 写出的文本是行的 `text` 字段，起止时间小于 0 时按 0 处理。
pub fn format_dialogue_line(line: &Line) -> Result<String> {
    validate_line(line)?;

    let mut record = String::with_capacity(64 + line.text.len());
    write!(
        record,
        "{}: {},{},{},{},{},{:04},{:04},{:04},{},{}",
        if line.comment { "Comment" } else { "Dialogue" },
        line.layer,
        format_ass_time(line.start_time),
        format_ass_time(line.end_time),
        line.style,
        line.actor,
        line.margin_l,
        line.margin_r,
        line.margin_v,
        line.effect,
        line.text
    )?;
    Ok(record)
}

/// 将输出缓冲区拼接为完整的文档文本。
pub fn render_output(output: &[String]) -> String {
    let mut content = String::with_capacity(output.iter().map(|l| l.len() + 1).sum());
    for line in output {
        content.push_str(line);
        content.push('\n');
    }
    content
}
