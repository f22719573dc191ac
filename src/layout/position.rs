//! 九宫格对齐下的位置计算。
//!
//! 行的位置由对齐方式、边距和脚本分辨率决定；单词、音节和字符在行内
//! 从左到右依次排列，竖排模式下则自上而下堆叠，并以堆叠结果覆盖行的包围盒。

use crate::model::{
    Char, Extents, HorizontalAlign, Line, Meta, Placement, Style, Syllable, VerticalAlign, Word,
};

/// 脚本分辨率构成的画布。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    /// 画布宽度
    pub width: f64,
    /// 画布高度
    pub height: f64,
}

impl Canvas {
    /// 只有宽高都为正时才存在画布。
    pub fn from_meta(meta: &Meta) -> Option<Self> {
        meta.has_play_res().then(|| Self {
            width: f64::from(meta.play_res_x),
            height: f64::from(meta.play_res_y),
        })
    }
}

/// 行实际使用的边距。行上的边距为 0 时使用样式的边距。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    /// 左边距
    pub left: f64,
    /// 右边距
    pub right: f64,
    /// 垂直边距
    pub vertical: f64,
}

impl Margins {
    /// 解析行的边距。
    pub fn resolve(line: &Line, style: &Style) -> Self {
        let pick = |own: i32, fallback: i32| f64::from(if own != 0 { own } else { fallback });
        Self {
            left: pick(line.margin_l, style.margin_l),
            right: pick(line.margin_r, style.margin_r),
            vertical: pick(line.margin_v, style.margin_v),
        }
    }
}

/// 由左上角和尺寸构造位置，参考点按对齐方式所在的行列选出。
fn boxed(left: f64, top: f64, width: f64, height: f64, alignment: i32) -> Placement {
    let right = left + width;
    let center = left + width / 2.0;
    let bottom = top + height;
    let middle = top + height / 2.0;

    Placement {
        x: match HorizontalAlign::from_alignment(alignment) {
            HorizontalAlign::Left => left,
            HorizontalAlign::Center => center,
            HorizontalAlign::Right => right,
        },
        y: match VerticalAlign::from_alignment(alignment) {
            VerticalAlign::Top => top,
            VerticalAlign::Middle => middle,
            VerticalAlign::Bottom => bottom,
        },
        left,
        center,
        right,
        top,
        middle,
        bottom,
    }
}

/// 计算整行的位置。
pub fn place_line(canvas: Canvas, alignment: i32, margins: Margins, width: f64, height: f64) -> Placement {
    let left = match HorizontalAlign::from_alignment(alignment) {
        HorizontalAlign::Left => margins.left,
        HorizontalAlign::Center => {
            canvas.width / 2.0 - width / 2.0 + margins.left / 2.0 - margins.right / 2.0
        }
        HorizontalAlign::Right => canvas.width - margins.right - width,
    };
    let top = match VerticalAlign::from_alignment(alignment) {
        VerticalAlign::Top => margins.vertical,
        VerticalAlign::Middle => canvas.height / 2.0 - height / 2.0,
        VerticalAlign::Bottom => canvas.height - margins.vertical - height,
    };

    boxed(left, top, width, height, alignment)
}

/// 可以在行内排列的元素。
pub trait Flowable {
    /// 元素的尺寸
    fn extents(&self) -> &Extents;

    /// 文本之前的空白数量
    fn prespace(&self) -> usize {
        0
    }

    /// 文本之后的空白数量
    fn postspace(&self) -> usize {
        0
    }

    /// 写入计算出的位置
    fn set_placement(&mut self, placement: Placement);
}

impl Flowable for Word {
    fn extents(&self) -> &Extents {
        &self.extents
    }
    fn prespace(&self) -> usize {
        self.prespace
    }
    fn postspace(&self) -> usize {
        self.postspace
    }
    fn set_placement(&mut self, placement: Placement) {
        self.placement = Some(placement);
    }
}

impl Flowable for Syllable {
    fn extents(&self) -> &Extents {
        &self.extents
    }
    fn prespace(&self) -> usize {
        self.prespace
    }
    fn postspace(&self) -> usize {
        self.postspace
    }
    fn set_placement(&mut self, placement: Placement) {
        self.placement = Some(placement);
    }
}

// 字符的空白已经展开为空格字符本身
impl Flowable for Char {
    fn extents(&self) -> &Extents {
        &self.extents
    }
    fn set_placement(&mut self, placement: Placement) {
        self.placement = Some(placement);
    }
}

/// 从行的左边界开始，自左向右排列元素。
///
/// 每个元素前进 `前导空白 × (空格宽度 + 字间距)`、自身宽度、
/// `尾随空白 × (空格宽度 + 字间距)` 以及一个字间距。
/// 元素的垂直坐标与行相同。
pub fn flow_horizontal<T: Flowable>(
    items: &mut [T],
    line: &Placement,
    alignment: i32,
    space_width: f64,
    spacing: f64,
) {
    let space_step = space_width + spacing;
    let mut cursor = line.left;

    for item in items {
        cursor += item.prespace() as f64 * space_step;

        let width = item.extents().width;
        let mut placement = boxed(cursor, line.top, width, line.bottom - line.top, alignment);
        placement.y = line.y;
        item.set_placement(placement);

        cursor += width + item.postspace() as f64 * space_step + spacing;
    }
}

/// 竖排模式：元素自上而下堆叠并在画布上垂直居中。
///
/// 行的宽高和包围盒会被覆盖为所有元素的并集，水平方向保持行原有的锚点
/// (左列保持左边界，中列保持中心，右列保持右边界)。
pub fn stack_vertical<T: Flowable>(
    items: &mut [T],
    line_extents: &mut Extents,
    line: &mut Placement,
    alignment: i32,
    canvas: Canvas,
) {
    let (max_width, sum_height) = items.iter().fold((0.0_f64, 0.0), |(w, h), item| {
        (w.max(item.extents().width), h + item.extents().height)
    });

    let mut cursor_y = canvas.height / 2.0 - sum_height / 2.0;

    line_extents.width = max_width;
    line_extents.height = sum_height;
    line.top = cursor_y;
    line.middle = canvas.height / 2.0;
    line.bottom = cursor_y + sum_height;

    let h_align = HorizontalAlign::from_alignment(alignment);
    match h_align {
        HorizontalAlign::Left => {
            line.center = line.left + max_width / 2.0;
            line.right = line.left + max_width;
        }
        HorizontalAlign::Center => {
            line.left = line.center - max_width / 2.0;
            line.right = line.left + max_width;
        }
        HorizontalAlign::Right => {
            line.left = line.right - max_width;
            line.center = line.left + max_width / 2.0;
        }
    }

    for item in items {
        let Extents { width, height, .. } = *item.extents();
        let x_fix = (max_width - width) / 2.0;

        let (left, x) = match h_align {
            HorizontalAlign::Left => {
                let left = line.left + x_fix;
                (left, left)
            }
            HorizontalAlign::Center => (line.center - width / 2.0, line.center),
            HorizontalAlign::Right => {
                let left = line.right - width - x_fix;
                (left, left + width)
            }
        };

        item.set_placement(Placement {
            x,
            y: cursor_y + height / 2.0,
            left,
            center: left + width / 2.0,
            right: left + width,
            top: cursor_y,
            middle: cursor_y + height / 2.0,
            bottom: cursor_y + height,
        });
        cursor_y += height;
    }
}
