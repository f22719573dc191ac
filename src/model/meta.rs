//! 定义了文档级别的元信息 `Meta`。

use serde::{Deserialize, Serialize};

/// `Meta` 包含了 ASS 文件 `[Script Info]` 中与排版相关的信息。
///
/// 可以在此获取它们的更多信息: <https://aegi.vmoe.info/docs/3.2/Styles/>。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// 决定字幕行如何换行。
    pub wrap_style: i32,
    /// 为 `true` 时使用脚本分辨率缩放边框和阴影，否则使用视频分辨率。
    pub scaled_border_and_shadow: bool,
    /// 脚本分辨率宽度。
    pub play_res_x: i32,
    /// 脚本分辨率高度。
    pub play_res_y: i32,
    /// 加载的音频的绝对路径 (若无法解析则保持原样)。
    pub audio: String,
    /// 加载的视频的绝对路径 (若无法解析则保持原样)。
    pub video: String,
}

impl Meta {
    /// 只有当脚本分辨率的宽高都为正数时，才能计算位置信息。
    pub fn has_play_res(&self) -> bool {
        self.play_res_x > 0 && self.play_res_y > 0
    }
}
