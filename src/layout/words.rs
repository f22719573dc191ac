//! 将去除标签后的文本按空白切分为单词。

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::model::{Style, Word};

/// (前导空白)(非空白文本)(尾随空白)
static WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\s*)(\S+)(\s*)").expect("编译 WORD_REGEX 失败"));

/// 切分单词。
///
/// 空白按贪婪规则归属：单词之间的空白全部记为前一个单词的尾随空白，
/// 只有行首的空白会成为第一个单词的前导空白。单词的时间与行相同。
pub fn segment_words(text: &str, start_time: i64, end_time: i64, styleref: &Arc<Style>) -> Vec<Word> {
    WORD_REGEX
        .captures_iter(text)
        .enumerate()
        .map(|(i, caps)| Word {
            i,
            start_time,
            end_time,
            duration: end_time - start_time,
            styleref: Arc::clone(styleref),
            text: caps[2].to_string(),
            prespace: caps[1].chars().count(),
            postspace: caps[3].chars().count(),
            ..Default::default()
        })
        .collect()
}
