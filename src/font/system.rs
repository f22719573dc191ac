//! 基于系统字体的度量提供者。
//!
//! 通过 `fontdb` 按字体名、粗体和斜体查找字体，再用 `ttf-parser` 读取字形步进和
//! hhea 度量。字体数据和字形步进都缓存在并发哈希表中，可以在 rayon 线程池中共享。

use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use fontdb::{Database, Family, ID as FontId, Query, Stretch, Style as FontStyle, Weight};
use tracing::{debug, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{AssKfxError, Result};
use crate::font::{FixedAdvanceMetrics, FontMetrics, FontMetricsProvider};
use crate::model::Style;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FaceKey {
    family: String,
    bold: bool,
    italic: bool,
}

impl From<&Style> for FaceKey {
    fn from(style: &Style) -> Self {
        Self {
            family: style.fontname.clone(),
            bold: style.bold,
            italic: style.italic,
        }
    }
}

/// 已加载的字体数据及其 hhea 度量 (字体单位)。
struct FaceData {
    id: FontId,
    data: Vec<u8>,
    index: u32,
    units_per_em: f64,
    ascender: f64,
    descender: f64,
    line_gap: f64,
}

/// 使用系统字体测量文本的度量提供者。
///
/// 找不到匹配字体时回退到 [`FixedAdvanceMetrics`]。
pub struct SystemFontMetrics {
    database: Database,
    faces: DashMap<FaceKey, Option<Arc<FaceData>>>,
    advances: DashMap<(FontId, char), f64>,
    fallback: FixedAdvanceMetrics,
}

impl SystemFontMetrics {
    /// 加载所有系统字体。
    pub fn new() -> Self {
        let mut database = Database::new();
        database.load_system_fonts();
        debug!("已加载 {} 个系统字体。", database.len());
        Self::from_database(database)
    }

    /// 使用一个已经准备好的字体数据库。
    pub fn from_database(database: Database) -> Self {
        Self {
            database,
            faces: DashMap::new(),
            advances: DashMap::new(),
            fallback: FixedAdvanceMetrics::default(),
        }
    }

    /// 额外加载一个字体文件，例如随字幕附带的字体。
    pub fn load_font_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.database
            .load_font_file(path)
            .map_err(|e| AssKfxError::Font(format!("加载字体文件 {path:?} 失败: {e}")))?;
        self.faces.clear();
        Ok(())
    }

    fn face(&self, style: &Style) -> Option<Arc<FaceData>> {
        let key = FaceKey::from(style);
        if let Some(entry) = self.faces.get(&key) {
            return entry.value().clone();
        }

        let loaded = self.load_face(&key).map(Arc::new);
        if loaded.is_none() {
            warn!("找不到字体 '{}'，将使用定宽度量。", key.family);
        }
        self.faces.insert(key, loaded.clone());
        loaded
    }

    fn load_face(&self, key: &FaceKey) -> Option<FaceData> {
        let query = Query {
            families: &[Family::Name(&key.family), Family::SansSerif],
            weight: if key.bold {
                Weight::BOLD
            } else {
                Weight::NORMAL
            },
            stretch: Stretch::Normal,
            style: if key.italic {
                FontStyle::Italic
            } else {
                FontStyle::Normal
            },
        };

        let id = self.database.query(&query)?;
        self.database
            .with_face_data(id, |data, index| {
                let face = ttf_parser::Face::parse(data, index).ok()?;
                Some(FaceData {
                    id,
                    data: data.to_vec(),
                    index,
                    units_per_em: f64::from(face.units_per_em()),
                    ascender: f64::from(face.ascender()),
                    descender: f64::from(face.descender()),
                    line_gap: f64::from(face.line_gap()),
                })
            })
            .flatten()
    }

    /// 一段文本的字形步进总和 (字体单位)；字体中缺失的字形计为 0。
    ///
    /// 只有遇到未缓存的字符时才解析一次字体，同一次调用中的其余字符共用该结果。
    fn text_advance(&self, face_data: &FaceData, text: &str) -> f64 {
        let mut parsed: Option<Option<ttf_parser::Face<'_>>> = None;

        text.chars()
            .map(|c| {
                if let Some(advance) = self.advances.get(&(face_data.id, c)) {
                    return *advance;
                }

                let face = parsed.get_or_insert_with(|| {
                    ttf_parser::Face::parse(&face_data.data, face_data.index).ok()
                });
                let advance = face
                    .as_ref()
                    .and_then(|face| face.glyph_hor_advance(face.glyph_index(c)?))
                    .map_or(0.0, f64::from);
                self.advances.insert((face_data.id, c), advance);
                advance
            })
            .sum()
    }
}

impl Default for SystemFontMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl FontMetricsProvider for SystemFontMetrics {
    fn measure(&self, style: &Style, text: &str) -> (f64, f64) {
        if text.is_empty() {
            return (0.0, 0.0);
        }
        let Some(face_data) = self.face(style) else {
            return self.fallback.measure(style, text);
        };

        let scale = style.fontsize / face_data.units_per_em;
        let units = self.text_advance(&face_data, text);
        let count = text.graphemes(true).count();

        let width = units * scale * style.scale_x / 100.0 + style.spacing * count as f64;
        let height =
            (face_data.ascender - face_data.descender) * scale * style.scale_y / 100.0;
        (width, height)
    }

    fn metrics(&self, style: &Style) -> FontMetrics {
        let Some(face_data) = self.face(style) else {
            return self.fallback.metrics(style);
        };

        let scale = style.fontsize / face_data.units_per_em * style.scale_y / 100.0;
        let internal =
            (face_data.ascender - face_data.descender - face_data.units_per_em).max(0.0);
        FontMetrics {
            ascent: face_data.ascender * scale,
            descent: -face_data.descender * scale,
            internal_leading: internal * scale,
            external_leading: face_data.line_gap * scale,
        }
    }
}
