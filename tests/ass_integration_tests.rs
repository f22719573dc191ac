use ass_kfx_rs::{
    Ass, AssKfxError, Line,
    config::LoadOptions,
    font::FixedAdvanceMetrics,
    layout::LEAD_SENTINEL_MS,
};

use regex::Regex;
use std::path::Path;

fn fixture_path(filename: &str) -> std::path::PathBuf {
    Path::new("tests/test_data").join(filename)
}

fn load_fixture(filename: &str, options: &LoadOptions) -> Ass {
    let path = fixture_path(filename);
    Ass::from_path(&path, options, &FixedAdvanceMetrics::default())
        .unwrap_or_else(|e| panic!("读取测试文件 '{:?}' 失败: {}", path, e))
}

fn load_karaoke() -> Ass {
    load_fixture("karaoke.ass", &LoadOptions::default())
}

fn line_with_text<'a>(ass: &'a Ass, text: &str) -> &'a Line {
    ass.lines()
        .iter()
        .find(|l| l.text == text)
        .unwrap_or_else(|| panic!("找不到文本为 '{text}' 的行"))
}

/// 生成一个只有一个样式和一行卡拉OK的文档
fn document_with_alignment(alignment: i32) -> String {
    format!(
        "[Script Info]
PlayResX: 1280
PlayResY: 720

[V4+ Styles]
Style: Default,Arial,40,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,2,{alignment},30,50,20,1

[Events]
Dialogue: 0,0:00:01.00,0:00:04.00,Default,,0,0,0,,{{\\k20}}Pyon {{\\k25}}FX {{\\kf40}}users!
"
    )
}

#[test_log::test]
fn test_load_karaoke_fixture() {
    let ass = load_karaoke();
    let (meta, styles, lines) = ass.data();

    assert_eq!((meta.play_res_x, meta.play_res_y), (1280, 720));
    assert!(meta.scaled_border_and_shadow);
    assert_eq!(meta.audio, "song.wav", "不存在的音频文件应保持原值");
    assert_eq!(styles.len(), 3);
    assert_eq!(lines.len(), 5, "无法解析的事件行应被跳过");
    assert_eq!(
        lines.iter().map(|l| l.i).collect::<Vec<_>>(),
        vec![0, 1, 2, 3, 4]
    );
    assert!(ass.path_input().is_some());
}

#[test_log::test]
fn test_karaoke_round_trip_line() {
    let ass = load_karaoke();
    let line = &ass.lines()[0];

    assert_eq!(line.text, "Hello world");
    assert_eq!(line.duration(), 3000);

    let syls = line.syls();
    assert_eq!(syls.len(), 3);
    assert_eq!(
        syls.iter().map(|s| s.duration).collect::<Vec<_>>(),
        vec![500, 300, 400]
    );
    assert_eq!(
        syls.iter().map(|s| s.word_i).collect::<Vec<_>>(),
        vec![0, 0, 1]
    );
    assert_eq!(line.words().len(), 2);
}

#[test_log::test]
fn test_plain_line_uses_word_granularity() {
    let ass = load_karaoke();
    let line = line_with_text(&ass, "Hi there");

    assert!(line.syls().is_empty());
    assert_eq!(
        line.words()
            .iter()
            .map(|w| (w.text.as_str(), w.prespace, w.postspace))
            .collect::<Vec<_>>(),
        vec![("Hi", 0, 1), ("there", 0, 0)]
    );
    assert_eq!(line.chars().len(), 8);
    assert!(line.chars().iter().all(|c| c.syl_i.is_none()));
}

#[test_log::test]
fn test_hidden_syllables_and_tag_durations() {
    let ass = load_karaoke();
    let karaoke_tag = Regex::new(r"\\[kK][of]?(\d+)").unwrap();

    for line in ass.lines().iter().filter(|l| !l.syls().is_empty()) {
        let expected: i64 = karaoke_tag
            .captures_iter(&line.raw_text)
            .map(|caps| caps[1].parse::<i64>().unwrap() * 10)
            .sum();
        let total: i64 = line.syls().iter().map(|s| s.duration).sum();
        assert_eq!(total, expected, "行 '{}' 的音节时长之和不一致", line.raw_text);
    }

    let line = line_with_text(&ass, "PyonFX users!");
    let syls = line.syls();
    assert_eq!(syls.len(), 4);
    assert!(syls[1].hidden);
    assert_eq!((syls[1].start_time, syls[1].end_time), (200, 200));
    assert_eq!(syls[1].extents.width, 0.0);
    assert_eq!((syls[2].text.as_str(), syls[2].postspace), ("FX", 1));
    assert_eq!(syls[3].word_i, 1);
}

#[test_log::test]
fn test_char_count_matches_source_sequence() {
    let ass = load_karaoke();

    for line in ass.lines() {
        let expected: usize = if line.syls().is_empty() {
            line.words()
                .iter()
                .map(|w| w.prespace + w.text.chars().count() + w.postspace)
                .sum()
        } else {
            line.syls()
                .iter()
                .map(|s| s.prespace + s.text.chars().count() + s.postspace)
                .sum()
        };
        assert_eq!(line.chars().len(), expected, "行 {} 的字符数不一致", line.i);
    }
}

#[test_log::test]
fn test_lead_times_per_style() {
    let ass = load_karaoke();
    let lines = ass.lines();

    // Romaji: 1.00-4.00 和 5.00-8.00
    assert_eq!(lines[0].leadin(), Some(LEAD_SENTINEL_MS));
    assert_eq!(lines[0].leadout(), Some(1000.0));
    assert_eq!(lines[1].leadin(), Some(1000.0));
    assert_eq!(lines[1].leadout(), Some(LEAD_SENTINEL_MS));

    // 单独一行的样式
    for line in &lines[2..] {
        assert_eq!(line.leadin(), Some(LEAD_SENTINEL_MS));
        assert_eq!(line.leadout(), Some(LEAD_SENTINEL_MS));
    }
}

#[test_log::test]
fn test_unresolved_style_is_skipped() {
    let ass = load_karaoke();
    let line = line_with_text(&ass, "Undefined style");

    assert!(line.comment);
    assert!(line.styleref().is_none());
    assert!(line.extents().is_none());
    assert!(line.placement().is_none());
    assert!(line.words().is_empty());
    assert_eq!(line.duration(), 1000);
}

#[test_log::test]
fn test_vertical_kanji_line() {
    let ass = load_karaoke();
    let line = line_with_text(&ass, "漢字列");
    let placement = line.placement().unwrap();

    assert_eq!(line.extents().unwrap().height, 120.0);
    assert_eq!((placement.top, placement.bottom), (300.0, 420.0));
    assert_eq!(
        line.syls()
            .iter()
            .map(|s| s.placement.unwrap().top)
            .collect::<Vec<_>>(),
        vec![300.0, 340.0, 380.0]
    );
    for c in line.chars() {
        assert_eq!(c.placement.unwrap().y, placement.y, "字符不应被竖排");
    }

    let horizontal = load_fixture(
        "karaoke.ass",
        &LoadOptions {
            vertical_kanji: false,
            ..Default::default()
        },
    );
    let line = line_with_text(&horizontal, "漢字列");
    assert_eq!(line.placement().unwrap().top, 340.0);
    assert!(
        line.syls()
            .iter()
            .all(|s| s.placement.unwrap().top == 340.0)
    );
}

#[test_log::test]
fn test_span_matches_line_for_every_alignment() {
    let space = 20.0;

    for alignment in 1..=9 {
        let options = LoadOptions {
            vertical_kanji: false,
            ..Default::default()
        };
        let ass = Ass::from_str_with(
            &document_with_alignment(alignment),
            &options,
            &FixedAdvanceMetrics::default(),
        );
        let line = &ass.lines()[0];
        let placement = line.placement().unwrap();

        let words = line.words();
        let first = words.first().unwrap();
        let last = words.last().unwrap();
        assert_eq!(
            first.placement.unwrap().left - first.prespace as f64 * space,
            placement.left,
            "对齐方式 {alignment}"
        );
        assert_eq!(
            last.placement.unwrap().right + last.postspace as f64 * space,
            placement.right,
            "对齐方式 {alignment}"
        );

        let syls = line.syls();
        assert_eq!(syls.first().unwrap().placement.unwrap().left, placement.left);
        assert_eq!(syls.last().unwrap().placement.unwrap().right, placement.right);

        let last_char = line.chars().last().unwrap().placement.unwrap();
        assert_eq!(last_char.right, placement.right);
    }
}

#[test_log::test]
fn test_line_margins_override_style_margins() {
    let content = document_with_alignment(7).replace(",Default,,0,0,0,", ",Default,,0100,0000,0200,");
    let ass = Ass::from_str_with(&content, &LoadOptions::default(), &FixedAdvanceMetrics::default());
    let placement = ass.lines()[0].placement().unwrap();

    assert_eq!(placement.left, 100.0);
    assert_eq!(placement.top, 200.0);
}

#[test_log::test]
fn test_non_positive_play_res_skips_geometry() {
    let ass = load_fixture("no_play_res.ass", &LoadOptions::default());
    let line = &ass.lines()[0];

    assert!(line.placement().is_none());
    assert!(line.extents().is_some());
    assert_eq!(line.syls().len(), 2);
    assert!(line.words().iter().all(|w| w.placement.is_none()));
    assert!(line.syls().iter().all(|s| s.placement.is_none()));
    assert!(line.chars().iter().all(|c| c.placement.is_none()));
    assert_eq!(line.syls()[1].end_time, 1000);
}

#[test_log::test]
fn test_extended_disabled_keeps_base_fields() {
    let options = LoadOptions {
        extended: false,
        ..Default::default()
    };
    let ass = load_fixture("karaoke.ass", &options);

    assert!(ass.lines().iter().all(|l| l.extension.is_none()));
    assert_eq!(ass.lines()[0].text, "Hello world");
    assert_eq!(ass.lines()[0].duration(), 3000);
}

#[test_log::test]
fn test_parallel_layout_matches_sequential() {
    let sequential = load_karaoke();
    let parallel = load_fixture(
        "karaoke.ass",
        &LoadOptions {
            parallel: true,
            ..Default::default()
        },
    );

    assert_eq!(sequential.lines(), parallel.lines());
}

#[test_log::test]
fn test_write_line_and_save() {
    let mut ass = load_karaoke();
    let source = ass.lines()[0].clone();

    for syl in source.syls() {
        let mut fx = source.clone();
        fx.layer = 1;
        fx.start_time = source.start_time + syl.start_time;
        fx.end_time = source.start_time + syl.end_time;
        fx.effect = "fx".to_string();
        fx.text = format!("{{\\an5\\pos({},{})}}{}", syl.placement.unwrap().center, syl.placement.unwrap().middle, syl.text);
        ass.write_line(&fx).unwrap();
    }
    assert_eq!(ass.produced_lines(), 3);

    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("out.ass");
    ass.save(&out_path).unwrap();

    let written = std::fs::read_to_string(&out_path).unwrap();
    assert!(written.starts_with('\u{feff}'), "输出文件应以 BOM 开头");
    assert!(!written[3..].starts_with('\u{feff}'));
    assert!(written.contains("Comment: 0,0:00:01.00,0:00:04.00,Romaji,,0,0,0,karaoke,"));
    assert!(written.contains("Dialogue: 1,0:00:01.00,0:00:01.50,Romaji,,0000,0000,0000,fx,"));
    assert!(!written.contains("Dialogue: 0,"), "原有的事件行应全部被注释");

    let reloaded = Ass::from_path(&out_path, &LoadOptions::default(), &FixedAdvanceMetrics::default()).unwrap();
    assert_eq!(reloaded.lines().len(), 5 + 3);
    assert_eq!(reloaded.lines().iter().filter(|l| !l.comment).count(), 3);
}

#[test_log::test]
fn test_write_malformed_line_is_rejected() {
    let mut ass = load_karaoke();
    let before = ass.to_ass_string();

    let mut bad = ass.lines()[0].clone();
    bad.text = "first\nsecond".to_string();

    assert!(matches!(
        ass.write_line(&bad),
        Err(AssKfxError::TypeMismatch(_))
    ));
    assert_eq!(ass.to_ass_string(), before);
    assert_eq!(ass.produced_lines(), 0);
}

#[test_log::test]
fn test_keep_original_disabled() {
    let options = LoadOptions {
        keep_original: false,
        ..Default::default()
    };
    let ass = load_fixture("karaoke.ass", &options);
    let output = ass.to_ass_string();

    assert!(output.contains("[Events]\nFormat: Layer, Start, End"));
    assert!(!output.contains("Comment: 0,0:00:01.00"));
    assert!(output.contains("Style: Romaji,"));
    assert_eq!(ass.lines().len(), 5, "行仍然应该被解析");
}

#[test_log::test]
fn test_missing_file() {
    let result = Ass::from_path(
        fixture_path("does_not_exist.ass"),
        &LoadOptions::default(),
        &FixedAdvanceMetrics::default(),
    );

    assert!(matches!(result, Err(AssKfxError::FileNotFound(_))));
}

#[test_log::test]
fn test_media_paths_resolve_relative_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let sub_dir = dir.path().join("subs");
    std::fs::create_dir(&sub_dir).unwrap();
    std::fs::write(dir.path().join("song.wav"), b"RIFF").unwrap();

    let content = "[Script Info]\nAudio File: ../song.wav\nVideo File: ?dummy:23.976:40000:1280:720:47:163:254:\n";
    let input = sub_dir.join("in.ass");
    std::fs::write(&input, content).unwrap();

    let ass = Ass::from_path(&input, &LoadOptions::default(), &FixedAdvanceMetrics::default()).unwrap();
    let expected = dir.path().join("song.wav");

    assert_eq!(Path::new(&ass.meta().audio), expected);
    assert!(ass.meta().video.starts_with("?dummy"));
    assert!(
        ass.to_ass_string()
            .contains(&format!("Audio File: {}", expected.display())),
        "输出中的音频路径应被替换为解析后的路径"
    );
}

#[test_log::test]
fn test_to_json_contains_hierarchy() {
    let ass = load_karaoke();
    let json: serde_json::Value = serde_json::from_str(&ass.to_json().unwrap()).unwrap();

    assert_eq!(json["meta"]["play_res_x"], 1280);
    assert_eq!(json["styles"]["Kanji"]["alignment"], 5);
    assert_eq!(json["lines"][0]["extension"]["syls"][2]["text"], "world");
    assert_eq!(json["lines"][0]["extension"]["leadin"], LEAD_SENTINEL_MS);
}
