use chrono::NaiveDate;

use crate::domain::ComparisonRow;

/// Render the comparison rows as a standalone HTML page.
///
/// Gains and losses get their own classes so the table reads at a glance;
/// missing comparison data renders as a dash.
pub fn render_report(rows: &[ComparisonRow], date: NaiveDate) -> String {
    let mut body = String::new();
    for row in rows {
        body.push_str(&render_row(row));
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Experience Changes</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 20px; background: #f9f9f9; }}
        table {{ border-collapse: collapse; width: 100%; margin-top: 20px; }}
        th, td {{ border: 1px solid #ccc; padding: 8px; text-align: left; }}
        th {{ background: #444; color: #fff; }}
        tr:nth-child(even) {{ background: #eee; }}
        .gain {{ color: green; font-weight: bold; }}
        .loss {{ color: red; font-weight: bold; }}
    </style>
</head>
<body>
    <h2>Experience Changes ({date})</h2>
    <table>
        <tr><th>Rank</th><th>Name</th><th>Level</th><th>Experience</th><th>Day</th><th>Rank +/-</th><th>Week</th><th>Month</th></tr>
{body}    </table>
</body>
</html>
"#
    )
}

fn render_row(row: &ComparisonRow) -> String {
    let rank = row
        .rank
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "        <tr><td>{rank}</td><td>{name}</td><td>{level:.1}</td><td>{exp}</td>{day}{rank_delta}{week}{month}</tr>\n",
        name = escape(&row.name),
        level = row.level,
        exp = group_thousands(row.experience),
        day = delta_cell(row.exp_day_change),
        rank_delta = delta_cell(row.rank_day_change),
        week = delta_cell(row.exp_week_change),
        month = delta_cell(row.exp_month_change),
    )
}

fn delta_cell(change: Option<i64>) -> String {
    match change {
        Some(c) if c > 0 => format!("<td class='gain'>{}</td>", signed(c)),
        Some(c) if c < 0 => format!("<td class='loss'>{}</td>", signed(c)),
        Some(_) => "<td>0</td>".to_string(),
        None => "<td>-</td>".to_string(),
    }
}

fn signed(value: i64) -> String {
    match value {
        v if v > 0 => format!("+{}", group_thousands(v as u64)),
        v if v < 0 => format!("-{}", group_thousands(v.unsigned_abs())),
        _ => "0".to_string(),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
