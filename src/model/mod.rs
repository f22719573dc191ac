//! 定义了文档解析与排版计算产出的核心数据模型。

pub mod line;
pub mod meta;
pub mod style;

pub use line::{Char, Extents, Line, LineExtension, Placement, Syllable, Word};
pub use meta::Meta;
pub use style::{HorizontalAlign, Style, VerticalAlign};
