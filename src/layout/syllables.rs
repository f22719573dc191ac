//! 从标签片段中解析卡拉OK音节。

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::debug;

use crate::layout::chunks::TagChunk;
use crate::model::{Style, Syllable};

/// 卡拉OK时长标签: `\k`, `\K`, `\kf`, `\ko` 后跟厘秒数
static KARAOKE_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[kK][of]?([0-9]+)").expect("编译 KARAOKE_TAG_REGEX 失败"));

/// 内联特效标签 `\-特效名`
static INLINE_FX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\-([^\\]+)").expect("编译 INLINE_FX_REGEX 失败"));

/// 从标签字符串开头剥离出的一个卡拉OK标签。
#[derive(Debug, PartialEq, Eq)]
struct KaraokeTag<'a> {
    /// 卡拉OK标签之前的其他标签
    pre_tags: &'a str,
    /// 时长 (毫秒)
    duration_ms: i64,
    /// 卡拉OK标签之后尚未处理的部分
    rest: &'a str,
}

/// 找到 `tags` 中的第一个卡拉OK标签。时长溢出时视为没有标签。
fn next_karaoke_tag(tags: &str) -> Option<KaraokeTag<'_>> {
    let caps = KARAOKE_TAG_REGEX.captures(tags)?;
    let whole = caps.get(0)?;
    let centiseconds: i64 = caps.get(1)?.as_str().parse().ok()?;

    Some(KaraokeTag {
        pre_tags: &tags[..whole.start()],
        duration_ms: centiseconds.checked_mul(10)?,
        rest: &tags[whole.end()..],
    })
}

/// 贯穿整行扫描的累积状态。
#[derive(Debug, Default)]
struct ScanState {
    next_i: usize,
    clock_ms: i64,
    inline_fx: String,
}

impl ScanState {
    /// 内联特效会一直沿用到被下一个 `\-` 标签覆盖为止。
    fn apply_inline_fx(&mut self, syl: &mut Syllable) {
        if let Some(caps) = INLINE_FX_REGEX.captures(&syl.tags) {
            self.inline_fx = caps[1].to_string();
        }
        syl.inline_fx.clone_from(&self.inline_fx);
    }
}

/// 将音节后的文本拆分为 (前导空白数, 文本, 尾随空白数)。
///
/// 纯空白的文本原样保留，前后空白数都记为 0。
fn split_spaces(text: &str) -> (usize, &str, usize) {
    if !text.is_empty() && text.trim().is_empty() {
        return (0, text, 0);
    }
    let without_leading = text.trim_start();
    let core = without_leading.trim_end();
    let prespace = text[..text.len() - without_leading.len()].chars().count();
    let postspace = without_leading[core.len()..].chars().count();
    (prespace, core, postspace)
}

/// 处理一个片段；片段中没有任何卡拉OK标签或时钟溢出时返回 `None`。
fn scan_chunk(
    chunk: &TagChunk<'_>,
    styleref: &Arc<Style>,
    state: &mut ScanState,
) -> Option<Vec<Syllable>> {
    let mut remaining = chunk.tags.as_str();
    let mut syls = Vec::new();

    while let Some(tag) = next_karaoke_tag(remaining) {
        // 累计时钟溢出时整行按没有卡拉OK标签处理
        let end_time = state.clock_ms.checked_add(tag.duration_ms)?;
        syls.push(Syllable {
            i: state.next_i,
            word_i: chunk.word_i,
            start_time: state.clock_ms,
            end_time,
            duration: tag.duration_ms,
            styleref: Arc::clone(styleref),
            tags: tag.pre_tags.to_string(),
            ..Default::default()
        });
        state.next_i += 1;
        state.clock_ms = end_time;
        remaining = tag.rest;
    }

    let mut last = syls.pop()?;

    // 最后一个之前的音节之间没有任何文本，它们是隐藏音节
    for hidden in &mut syls {
        state.apply_inline_fx(hidden);
        hidden.hidden = true;
    }

    last.tags.push_str(remaining);
    state.apply_inline_fx(&mut last);
    let (prespace, text, postspace) = split_spaces(chunk.text);
    last.prespace = prespace;
    last.text = text.to_string();
    last.postspace = postspace;

    syls.push(last);
    Some(syls)
}

/// 从一行的标签片段中解析出全部音节。
///
/// 只要有一个片段不包含卡拉OK标签，整行就没有音节，返回空序列。
/// 音节的时间相对于行的开始时间。
pub fn extract_syllables(chunks: &[TagChunk<'_>], styleref: &Arc<Style>) -> Vec<Syllable> {
    let scanned = chunks
        .iter()
        .try_fold((ScanState::default(), Vec::new()), |(mut state, mut syls), chunk| {
            syls.extend(scan_chunk(chunk, styleref, &mut state)?);
            Some((state, syls))
        });

    match scanned {
        Some((_, syls)) => syls,
        None => {
            debug!("行中存在不含卡拉OK标签的片段，将不生成音节。");
            Vec::new()
        }
    }
}
