//! 将音节或单词展开为单个字符。

use std::sync::Arc;

use crate::model::{Char, Syllable, Word};

fn padded(prespace: usize, text: &str, postspace: usize) -> String {
    format!("{}{}{}", " ".repeat(prespace), text, " ".repeat(postspace))
}

/// 展开字符。音节非空时以音节为来源，否则以单词为来源。
///
/// 前导和尾随空白会被还原为空格字符；一个字符是一个 Unicode 码位，
/// 组合附加符号会成为独立的字符。
pub fn segment_chars(syls: &[Syllable], words: &[Word]) -> Vec<Char> {
    let mut chars = Vec::new();

    if syls.is_empty() {
        for word in words {
            let text = padded(word.prespace, &word.text, word.postspace);
            for c in text.chars() {
                chars.push(Char {
                    i: chars.len(),
                    word_i: word.i,
                    start_time: word.start_time,
                    end_time: word.end_time,
                    duration: word.duration,
                    styleref: Arc::clone(&word.styleref),
                    text: c.to_string(),
                    ..Default::default()
                });
            }
        }
    } else {
        for syl in syls {
            let text = padded(syl.prespace, &syl.text, syl.postspace);
            for (syl_char_i, c) in text.chars().enumerate() {
                chars.push(Char {
                    i: chars.len(),
                    word_i: syl.word_i,
                    syl_i: Some(syl.i),
                    syl_char_i: Some(syl_char_i),
                    start_time: syl.start_time,
                    end_time: syl.end_time,
                    duration: syl.duration,
                    styleref: Arc::clone(&syl.styleref),
                    text: c.to_string(),
                    inline_fx: syl.inline_fx.clone(),
                    ..Default::default()
                });
            }
        }
    }

    chars
}
