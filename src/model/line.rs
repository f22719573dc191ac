//! 定义了字幕行 `Line` 及其下属的单词、音节和字符层级。
//!
//! 基础字段在读取文档时即被填充；时长、行前/行后时间、尺寸、位置以及
//! 单词/音节/字符序列只有在扩展计算之后才存在，统一存放在 [`LineExtension`] 中。

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::style::Style;

/// 文本的尺寸与字体度量。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Extents {
    /// 文本宽度
    pub width: f64,
    /// 文本高度
    pub height: f64,
    /// 字体上升高度
    pub ascent: f64,
    /// 字体下降高度
    pub descent: f64,
    /// 字体内部行距
    pub internal_leading: f64,
    /// 字体外部行距
    pub external_leading: f64,
}

/// 元素在画面上的位置。
///
/// `x`/`y` 是按对齐方式选出的参考点，其余六个值是包围盒的坐标。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// 水平参考坐标（取决于对齐方式）
    pub x: f64,
    /// 垂直参考坐标（取决于对齐方式）
    pub y: f64,
    /// 左侧横坐标
    pub left: f64,
    /// 中心横坐标
    pub center: f64,
    /// 右侧横坐标
    pub right: f64,
    /// 顶部纵坐标
    pub top: f64,
    /// 中心纵坐标
    pub middle: f64,
    /// 底部纵坐标
    pub bottom: f64,
}

/// `Line` 包括了 ASS 中每一个事件行的信息。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// 行索引值 (在文档事件中的顺序)
    pub i: usize,
    /// 是否为注释行。注释行不会在屏幕上显示。
    pub comment: bool,
    /// 行的层号。层号较高的行将显示在层号较低的行上方。
    pub layer: i32,
    /// 行开始时间（毫秒）
    pub start_time: i64,
    /// 行结束时间（毫秒）
    pub end_time: i64,
    /// 此行使用的样式名称
    pub style: String,
    /// 说话人
    pub actor: String,
    /// 该行的左边距 (0 表示使用样式的值)
    pub margin_l: i32,
    /// 该行的右边距 (0 表示使用样式的值)
    pub margin_r: i32,
    /// 该行的垂直边距 (0 表示使用样式的值)
    pub margin_v: i32,
    /// 特效
    pub effect: String,
    /// 该行的原始文本（包含标签）
    pub raw_text: String,
    /// 该行的文本（已去除所有 `{...}` 标签）
    pub text: String,
    /// 扩展信息，仅在扩展计算后存在。
    pub extension: Option<LineExtension>,
}

/// 行的扩展信息。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineExtension {
    /// 行持续时间（毫秒）
    pub duration: i64,
    /// 行前时间（毫秒，同样式中的第一行为 1000.1）
    pub leadin: f64,
    /// 行后时间（毫秒，同样式中的最后一行为 1000.1）
    pub leadout: f64,
    /// 此行样式的引用；样式名无法解析时为 `None`
    pub styleref: Option<Arc<Style>>,
    /// 行文本的尺寸与字体度量；仅当样式可解析时存在
    pub extents: Option<Extents>,
    /// 行的位置；仅当样式可解析且脚本分辨率为正时存在
    pub placement: Option<Placement>,
    /// 此行内的单词
    pub words: Vec<Word>,
    /// 此行内的音节；没有完整的卡拉OK标签时为空
    pub syls: Vec<Syllable>,
    /// 此行内的字符
    pub chars: Vec<Char>,
}

impl Line {
    /// 行持续时间；未进行扩展计算时直接由起止时间得出。
    pub fn duration(&self) -> i64 {
        self.extension
            .as_ref()
            .map_or(self.end_time - self.start_time, |ext| ext.duration)
    }

    /// 行前时间
    pub fn leadin(&self) -> Option<f64> {
        self.extension.as_ref().map(|ext| ext.leadin)
    }

    /// 行后时间
    pub fn leadout(&self) -> Option<f64> {
        self.extension.as_ref().map(|ext| ext.leadout)
    }

    /// 此行的样式引用
    pub fn styleref(&self) -> Option<&Arc<Style>> {
        self.extension.as_ref().and_then(|ext| ext.styleref.as_ref())
    }

    /// 行文本的尺寸
    pub fn extents(&self) -> Option<&Extents> {
        self.extension.as_ref().and_then(|ext| ext.extents.as_ref())
    }

    /// 行的位置
    pub fn placement(&self) -> Option<&Placement> {
        self.extension.as_ref().and_then(|ext| ext.placement.as_ref())
    }

    /// 此行内的单词
    pub fn words(&self) -> &[Word] {
        self.extension.as_ref().map_or(&[], |ext| &ext.words)
    }

    /// 此行内的音节
    pub fn syls(&self) -> &[Syllable] {
        self.extension.as_ref().map_or(&[], |ext| &ext.syls)
    }

    /// 此行内的字符
    pub fn chars(&self) -> &[Char] {
        self.extension.as_ref().map_or(&[], |ext| &ext.chars)
    }
}

/// `Word` 是行内以空白分隔的一个单词。
///
/// 单词没有独立的时间轴，其时间与所在行相同。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// 单词索引值
    pub i: usize,
    /// 单词开始时间（与行开始时间相同）（毫秒）
    pub start_time: i64,
    /// 单词结束时间（与行结束时间相同）（毫秒）
    pub end_time: i64,
    /// 单词持续时间（与行持续时间相同）（毫秒）
    pub duration: i64,
    /// 所在行的样式引用
    pub styleref: Arc<Style>,
    /// 单词文本
    pub text: String,
    /// 文本之前的空白数量
    pub prespace: usize,
    /// 文本之后的空白数量
    pub postspace: usize,
    /// 单词文本的尺寸
    pub extents: Extents,
    /// 单词的位置
    pub placement: Option<Placement>,
}

/// `Syllable` 是由卡拉OK标签 (`\k`, `\ko`, `\kf`) 分隔出的一段文本。
///
/// 例如在 `{\k0}Hel{\k0}lo {\k0}Pyon{\k0}FX {\k0}users!` 中，"Pyon" 和 "FX" 是两个不同的音节。
/// 音节的时间相对于所在行的开始时间。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Syllable {
    /// 音节索引值
    pub i: usize,
    /// 音节所在单词的索引值
    pub word_i: usize,
    /// 音节开始时间（毫秒，相对于行开始时间）
    pub start_time: i64,
    /// 音节结束时间（毫秒，相对于行开始时间）
    pub end_time: i64,
    /// 音节持续时间（毫秒）
    pub duration: i64,
    /// 所在行的样式引用
    pub styleref: Arc<Style>,
    /// 音节文本
    pub text: String,
    /// 除卡拉OK标签之外，音节前面的所有标签
    pub tags: String,
    /// 音节内联特效 (在 K 值后使用 `\-特效名`)
    pub inline_fx: String,
    /// 文本之前的空白数量
    pub prespace: usize,
    /// 文本之后的空白数量
    pub postspace: usize,
    /// 是否为隐藏音节 (两个卡拉OK标签之间没有任何文本)
    pub hidden: bool,
    /// 音节文本的尺寸
    pub extents: Extents,
    /// 音节的位置
    pub placement: Option<Placement>,
}

/// `Char` 是音节 (优先) 或单词中的单个字符。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Char {
    /// 字符索引值
    pub i: usize,
    /// 字符所在单词的索引值
    pub word_i: usize,
    /// 字符所在音节的索引值；字符来自单词时为 `None`
    pub syl_i: Option<usize>,
    /// 字符在所在音节中的索引值；字符来自单词时为 `None`
    pub syl_char_i: Option<usize>,
    /// 字符开始时间（毫秒）
    pub start_time: i64,
    /// 字符结束时间（毫秒）
    pub end_time: i64,
    /// 字符持续时间（毫秒）
    pub duration: i64,
    /// 所在行的样式引用
    pub styleref: Arc<Style>,
    /// 字符文本 (单个字符或一个空格)
    pub text: String,
    /// 所在音节的内联特效；字符来自单词时为空
    pub inline_fx: String,
    /// 字符文本的尺寸
    pub extents: Extents,
    /// 字符的位置
    pub placement: Option<Placement>,
}
