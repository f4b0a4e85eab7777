//! Plain-text rendering of the banner, connection modal and output table.
use chrono::{Local, TimeZone};
use std::fmt::Write;

use crate::model::OutputRecord;

const HEADERS: [&str; 3] = ["ID", "Content", "Date"];
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn banner(message: Option<&str>) -> Option<String> {
    message
        .filter(|m| !m.is_empty())
        .map(|m| format!("!! {} !!", m))
}

pub fn modal(notice: &str) -> String {
    let width = notice.chars().count() + 4;
    let rule = "-".repeat(width);
    format!("+{rule}+\n|  {notice}  |\n+{rule}+\n  [Enter] Close")
}

/// Table in the local time zone.
pub fn table(records: &[OutputRecord]) -> String {
    table_in(records, &Local)
}

pub fn table_in<Tz>(records: &[OutputRecord], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let rows: Vec<[String; 3]> = records
        .iter()
        .map(|r| {
            [
                r.id.to_string(),
                r.content.replace('\n', " "),
                r.created_at.with_timezone(tz).format(DATE_FORMAT).to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(String::from), &widths);
    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", sep.join("-+-"));
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 3], widths: &[usize; 3]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}
