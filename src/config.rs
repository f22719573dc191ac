//! 负责处理文档加载选项及其持久化配置。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::error::{AssKfxError, Result};

const CONFIG_DIR_NAME: &str = "ass-kfx";
const LOAD_OPTIONS_FILE: &str = "load_options.json";

/// 加载 ASS 文档时使用的选项。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// 是否计算扩展信息 (时长、行前/行后时间、单词/音节/字符及其位置)。
    pub extended: bool,
    /// 为 `true` 时，对齐方式为 4、5、6 的行将被竖直排列。
    pub vertical_kanji: bool,
    /// 为 `true` 时，原文件的所有事件行会被注释后保留在输出中。
    pub keep_original: bool,
    /// 为 `true` 时，逐行的排版计算将在 rayon 线程池中并行执行。
    pub parallel: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            extended: true,
            vertical_kanji: true,
            keep_original: true,
            parallel: false,
        }
    }
}

/// 获取应用配置目录下指定文件的完整路径。
///
/// # 参数
/// * `filename` - 目标配置文件的名称，例如 "load_options.json"。
pub(crate) fn get_config_file_path(filename: &str) -> Result<PathBuf> {
    let mut config_dir = dirs::config_dir().ok_or(AssKfxError::ConfigDirNotFound)?;
    config_dir.push(CONFIG_DIR_NAME);
    fs::create_dir_all(&config_dir)?;
    config_dir.push(filename);
    Ok(config_dir)
}

/// 从缓存加载加载选项；若配置文件不存在，则创建并保存一份默认配置。
pub fn load_options() -> Result<LoadOptions> {
    let config_path = get_config_file_path(LOAD_OPTIONS_FILE)?;

    match fs::read_to_string(&config_path) {
        Ok(content) => {
            let options: LoadOptions = serde_json::from_str(&content)?;
            info!("已从 {:?} 加载文档加载选项。", config_path);
            Ok(options)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("加载选项配置文件不存在，将创建默认配置。");
            let options = LoadOptions::default();
            save_options(&options)?;
            Ok(options)
        }
        Err(e) => Err(e.into()),
    }
}

/// 将加载选项序列化为 JSON 并保存到配置文件。
pub fn save_options(options: &LoadOptions) -> Result<()> {
    let config_path = get_config_file_path(LOAD_OPTIONS_FILE)?;
    let content = serde_json::to_string_pretty(options)?;
    fs::write(config_path, content)?;
    info!("文档加载选项已保存。");
    Ok(())
}
