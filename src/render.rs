//! Terminal presentation of a [`Frame`].

use std::fmt::Write;

use chrono::NaiveDateTime;

use crate::simulator::Frame;

const BAR_WIDTH: usize = 40;

/// Zero-padded `HH:MM:SS` for a count of seconds. Hours are not wrapped, so a
/// full day renders as `24:00:00`.
pub fn format_hms(seconds: u32) -> String {
    let hours = seconds / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

pub fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

pub fn format_percent(percent: f64) -> String {
    format!("{percent:.2}%")
}

pub fn format_clock(now: &NaiveDateTime) -> String {
    now.format("%H:%M:%S").to_string()
}

pub fn progress_bar(percent_elapsed: f64, width: usize) -> String {
    let filled = ((percent_elapsed / 100.0) * width as f64)
        .round()
        .clamp(0.0, width as f64) as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn render_card(frame: &Frame) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Daily Time Tracker ({} theme)", frame.theme);
    let _ = writeln!(
        out,
        "Weather: {} {}°C {}",
        frame.icon.glyph(),
        frame.temperature_c,
        frame.weather
    );
    let _ = writeln!(
        out,
        "Current Time: {}   Remaining Time: {}",
        format_hms(frame.seconds_elapsed),
        format_hms(frame.seconds_remaining)
    );
    let _ = writeln!(
        out,
        "Seconds Passed: {}   Seconds Remaining: {}",
        group_thousands(frame.seconds_elapsed),
        group_thousands(frame.seconds_remaining)
    );
    let _ = writeln!(out, "{}", progress_bar(frame.percent_elapsed, BAR_WIDTH));
    let _ = writeln!(
        out,
        "{} Passed   {} Remaining",
        format_percent(frame.percent_elapsed),
        format_percent(frame.percent_remaining)
    );
    let _ = write!(out, "Clock: {}", format_clock(&frame.now));
    out
}
