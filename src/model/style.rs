//! 定义了样式 `Style` 以及 ASS 九宫格对齐方式的辅助类型。

use serde::{Deserialize, Serialize};

/// `Style` 包含一组应用于对话行的排版格式规则。
///
/// 可以在此获取样式的更多信息: <https://aegi.vmoe.info/docs/3.2/ASS_Tags/>。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// 样式名
    pub name: String,
    /// 字体名
    pub fontname: String,
    /// 字体大小（点数）
    pub fontsize: f64,
    /// 主要颜色 (`&HBBGGRR&`)
    pub color1: String,
    /// 主要颜色的透明度 (`&HAA&`)
    pub alpha1: String,
    /// 次要颜色（用于卡拉OK效果）
    pub color2: String,
    /// 次要颜色的透明度
    pub alpha2: String,
    /// 边框颜色
    pub color3: String,
    /// 边框颜色的透明度
    pub alpha3: String,
    /// 阴影颜色
    pub color4: String,
    /// 阴影颜色的透明度
    pub alpha4: String,
    /// 字体是否加粗
    pub bold: bool,
    /// 字体是否为斜体
    pub italic: bool,
    /// 字体是否有下划线
    pub underline: bool,
    /// 字体是否有删除线
    pub strikeout: bool,
    /// 文本水平缩放 (百分比)
    pub scale_x: f64,
    /// 文本垂直缩放 (百分比)
    pub scale_y: f64,
    /// 字间距 (像素)
    pub spacing: f64,
    /// 旋转角度
    pub angle: f64,
    /// 是否是不透明背景 (`BorderStyle` 为 3)
    pub border_style: bool,
    /// 边框厚度
    pub outline: f64,
    /// 阴影距离
    pub shadow: f64,
    /// 对齐方式 (1-9，小键盘布局)
    pub alignment: i32,
    /// 左边距
    pub margin_l: i32,
    /// 右边距
    pub margin_r: i32,
    /// 垂直边距
    pub margin_v: i32,
    /// 字符编码
    pub encoding: i32,
}

impl Default for Style {
    /// 与 Aegisub 新建脚本时的 `Default` 样式一致。
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            fontname: "Arial".to_string(),
            fontsize: 20.0,
            color1: "&HFFFFFF&".to_string(),
            alpha1: "&H00&".to_string(),
            color2: "&H0000FF&".to_string(),
            alpha2: "&H00&".to_string(),
            color3: "&H000000&".to_string(),
            alpha3: "&H00&".to_string(),
            color4: "&H000000&".to_string(),
            alpha4: "&H00&".to_string(),
            bold: false,
            italic: false,
            underline: false,
            strikeout: false,
            scale_x: 100.0,
            scale_y: 100.0,
            spacing: 0.0,
            angle: 0.0,
            border_style: false,
            outline: 2.0,
            shadow: 2.0,
            alignment: 2,
            margin_l: 10,
            margin_r: 10,
            margin_v: 10,
            encoding: 1,
        }
    }
}

/// 九宫格中的列，决定水平锚点。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HorizontalAlign {
    /// 1, 4, 7
    Left,
    /// 2, 5, 8
    Center,
    /// 3, 6, 9
    Right,
}

/// 九宫格中的行，决定垂直锚点。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerticalAlign {
    /// 7, 8, 9
    Top,
    /// 4, 5, 6
    Middle,
    /// 1, 2, 3
    Bottom,
}

impl HorizontalAlign {
    /// 根据对齐代码计算所在的列。
    pub fn from_alignment(alignment: i32) -> Self {
        if (alignment - 1).rem_euclid(3) == 0 {
            Self::Left
        } else if (alignment - 2).rem_euclid(3) == 0 {
            Self::Center
        } else {
            Self::Right
        }
    }
}

impl VerticalAlign {
    /// 根据对齐代码计算所在的行。
    pub fn from_alignment(alignment: i32) -> Self {
        if alignment > 6 {
            Self::Top
        } else if alignment > 3 {
            Self::Middle
        } else {
            Self::Bottom
        }
    }
}

impl Style {
    /// 此样式的水平对齐列。
    pub fn horizontal_align(&self) -> HorizontalAlign {
        HorizontalAlign::from_alignment(self.alignment)
    }

    /// 此样式的垂直对齐行。
    pub fn vertical_align(&self) -> VerticalAlign {
        VerticalAlign::from_alignment(self.alignment)
    }
}
