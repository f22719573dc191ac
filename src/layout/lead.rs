//! 行前/行后时间。

use std::collections::HashMap;

use crate::model::Line;

/// 同样式中第一行的行前时间和最后一行的行后时间。
pub const LEAD_SENTINEL_MS: f64 = 1000.1;

/// 按样式名分组计算每行的行前和行后时间。
///
/// 组内按 `(开始时间, 行索引)` 排序，行前时间是与上一行结束时间的间隔，
/// 行后时间是与下一行开始时间的间隔。只处理带有扩展信息的行。
pub fn compute_lead_times(lines: &mut [Line]) {
    let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
    for (pos, line) in lines.iter().enumerate() {
        if line.extension.is_some() {
            groups.entry(line.style.as_str()).or_default().push(pos);
        }
    }

    // 先计算出所有结果，再写回，避免借用冲突
    let mut leads = Vec::new();
    for mut group in groups.into_values() {
        group.sort_by_key(|&pos| (lines[pos].start_time, lines[pos].i));

        for (k, &pos) in group.iter().enumerate() {
            let line = &lines[pos];
            let leadin = k.checked_sub(1).map_or(LEAD_SENTINEL_MS, |prev| {
                (line.start_time - lines[group[prev]].end_time) as f64
            });
            let leadout = group.get(k + 1).map_or(LEAD_SENTINEL_MS, |&next| {
                (lines[next].start_time - line.end_time) as f64
            });
            leads.push((pos, leadin, leadout));
        }
    }

    for (pos, leadin, leadout) in leads {
        if let Some(ext) = lines[pos].extension.as_mut() {
            ext.leadin = leadin;
            ext.leadout = leadout;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LineExtension;

    fn line(i: usize, style: &str, start_time: i64, end_time: i64) -> Line {
        Line {
            i,
            style: style.to_string(),
            start_time,
            end_time,
            extension: Some(LineExtension::default()),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_line_gets_sentinels() {
        let mut lines = vec![line(0, "Default", 0, 1000)];
        compute_lead_times(&mut lines);

        assert_eq!(lines[0].leadin(), Some(LEAD_SENTINEL_MS));
        assert_eq!(lines[0].leadout(), Some(LEAD_SENTINEL_MS));
    }

    #[test]
    fn test_neighbours_in_same_style() {
        let mut lines = vec![line(0, "A", 0, 1000), line(1, "A", 1500, 3000)];
        compute_lead_times(&mut lines);

        assert_eq!(lines[0].leadout(), Some(500.0));
        assert_eq!(lines[1].leadin(), Some(500.0));
        assert_eq!(lines[0].leadin(), Some(LEAD_SENTINEL_MS));
        assert_eq!(lines[1].leadout(), Some(LEAD_SENTINEL_MS));
    }

    #[test]
    fn test_groups_are_per_style_and_sorted_by_start() {
        let mut lines = vec![
            line(0, "A", 5000, 6000),
            line(1, "B", 0, 100),
            line(2, "A", 1000, 2000),
        ];
        compute_lead_times(&mut lines);

        assert_eq!(lines[2].leadout(), Some(3000.0));
        assert_eq!(lines[0].leadin(), Some(3000.0));
        assert_eq!(lines[1].leadin(), Some(LEAD_SENTINEL_MS));
        assert_eq!(lines[1].leadout(), Some(LEAD_SENTINEL_MS));
    }

    #[test]
    fn test_equal_start_times_use_line_index() {
        let mut lines = vec![line(0, "A", 0, 2000), line(1, "A", 0, 1000)];
        compute_lead_times(&mut lines);

        // 行 0 排在前面
        assert_eq!(lines[0].leadout(), Some(-2000.0));
        assert_eq!(lines[1].leadin(), Some(-2000.0));
    }

    #[test]
    fn test_overlapping_lines_have_negative_leads() {
        let mut lines = vec![line(0, "A", 0, 2000), line(1, "A", 1000, 3000)];
        compute_lead_times(&mut lines);

        assert_eq!(lines[0].leadout(), Some(-1000.0));
    }
}
