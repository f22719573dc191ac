//! 将一行的原始文本切分为 "标签 + 随后文本" 的片段。

use std::sync::LazyLock;

use regex::Regex;

/// 匹配一个或多个连续的 `{...}` 标签块
static TAG_RUN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\{.*?\})+").expect("编译 TAG_RUN_REGEX 失败"));

/// 原始文本中的一个片段。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagChunk<'a> {
    /// 去掉外层花括号、合并了相邻 `}{` 之后的标签内容
    pub tags: String,
    /// 紧随标签之后、直到下一个标签块之前的文本
    pub text: &'a str,
    /// 此片段所属单词的索引值
    pub word_i: usize,
}

/// 去掉一行中所有的 `{...}` 标签。
pub fn strip_tags(raw_text: &str) -> String {
    static TAG_REGEX: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\{.*?\}").expect("编译 TAG_REGEX 失败"));
    TAG_REGEX.replace_all(raw_text, "").into_owned()
}

/// 将原始文本切分为有序的 [`TagChunk`] 序列。
///
/// - 没有任何标签时，返回唯一一个标签为空、包含全部文本的片段。
/// - 第一个标签块不在开头时，开头的文本单独成为一个标签为空的片段。
/// - 每当一个片段的文本以空白结尾，后续片段的单词索引加一。
pub fn split_tag_chunks(raw_text: &str) -> Vec<TagChunk<'_>> {
    let runs: Vec<_> = TAG_RUN_REGEX.find_iter(raw_text).collect();

    let Some(first) = runs.first() else {
        return vec![TagChunk {
            tags: String::new(),
            text: raw_text,
            word_i: 0,
        }];
    };

    let mut chunks = Vec::with_capacity(runs.len() + 1);
    if first.start() != 0 {
        chunks.push(TagChunk {
            tags: String::new(),
            text: &raw_text[..first.start()],
            word_i: 0,
        });
    }

    let mut word_i = 0;
    for (index, run) in runs.iter().enumerate() {
        let text_end = runs.get(index + 1).map_or(raw_text.len(), |next| next.start());
        let run_str = run.as_str();
        let chunk = TagChunk {
            tags: run_str[1..run_str.len() - 1].replace("}{", ""),
            text: &raw_text[run.end()..text_end],
            word_i,
        };

        if chunk.text.ends_with(char::is_whitespace) {
            word_i += 1;
        }
        chunks.push(chunk);
    }

    chunks
}
