//! 用于演示 `ass-kfx` 库的核心功能：读取一个卡拉OK字幕，为每个音节生成特效并保存。
//!
//! ## 如何运行
//!
//! ```bash
//! cargo run --package ass_kfx_rs --example demo -- tests/test_data/karaoke.ass Output.ass
//! ```

use std::env;

use ass_kfx_rs::{
    Ass, Line, Syllable,
    config::{self, LoadOptions},
    error::Result,
    font::SystemFontMetrics,
};

use tracing::{Level, info, warn};

/// 音节入场: 从行前时间的一半开始淡入
fn leadin_effect(line: &Line, syl: &Syllable, mut fx: Line) -> Option<Line> {
    let placement = syl.placement?;
    let leadin = line.leadin().unwrap_or(0.0) / 2.0;

    fx.layer = 0;
    fx.start_time = line.start_time - leadin as i64;
    fx.end_time = line.start_time + syl.start_time;
    fx.text = format!(
        "{{\\an5\\pos({:.3},{:.3})\\fad({},0)}}{}",
        placement.center, placement.middle, leadin as i64, syl.text
    );
    Some(fx)
}

/// 音节高亮: 在演唱期间放大并变色
fn highlight_effect(line: &Line, syl: &Syllable, mut fx: Line) -> Option<Line> {
    let placement = syl.placement?;
    let styleref = line.styleref()?;

    fx.layer = 1;
    fx.start_time = line.start_time + syl.start_time;
    fx.end_time = line.start_time + syl.end_time;
    fx.text = format!(
        "{{\\an5\\pos({:.3},{:.3})\\t(0,{half},\\fscx125\\fscy125\\1c{c2})\\t({half},{dur},\\fscx100\\fscy100\\1c{c1})}}{}",
        placement.center,
        placement.middle,
        syl.text,
        half = syl.duration / 2,
        dur = syl.duration,
        c1 = styleref.color1,
        c2 = styleref.color2,
    );
    Some(fx)
}

/// 音节退场: 在行后时间的一半内淡出
fn leadout_effect(line: &Line, syl: &Syllable, mut fx: Line) -> Option<Line> {
    let placement = syl.placement?;
    let leadout = line.leadout().unwrap_or(0.0) / 2.0;

    fx.layer = 0;
    fx.start_time = line.start_time + syl.end_time;
    fx.end_time = line.end_time + leadout as i64;
    fx.text = format!(
        "{{\\an5\\pos({:.3},{:.3})\\fad(0,{})}}{}",
        placement.center, placement.middle, leadout as i64, syl.text
    );
    Some(fx)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let mut args = env::args().skip(1);
    let input = args
        .next()
        .unwrap_or_else(|| "tests/test_data/karaoke.ass".to_string());
    let output = args.next().unwrap_or_else(|| "Output.ass".to_string());

    let options = config::load_options().unwrap_or_else(|e| {
        warn!("读取加载选项失败，将使用默认值: {e}");
        LoadOptions::default()
    });

    info!("正在加载系统字体...");
    let provider = SystemFontMetrics::new();
    let mut ass = Ass::from_path(&input, &options, &provider)?;

    let lines: Vec<Line> = ass
        .lines()
        .iter()
        .filter(|l| !l.comment && !l.syls().is_empty())
        .cloned()
        .collect();
    info!("共有 {} 个卡拉OK行。", lines.len());

    for line in &lines {
        let mut fx = line.clone();
        fx.comment = false;
        fx.effect = "fx".to_string();

        for syl in line.syls().iter().filter(|s| !s.hidden && !s.text.trim().is_empty()) {
            let effects = [
                leadin_effect(line, syl, fx.clone()),
                highlight_effect(line, syl, fx.clone()),
                leadout_effect(line, syl, fx.clone()),
            ];
            for effect in effects.into_iter().flatten() {
                ass.write_line(&effect)?;
            }
        }
    }

    ass.save(&output)?;
    Ok(())
}
