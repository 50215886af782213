//! Centralized formatting utilities.
//!
//! Event rendering goes through this module so that game timestamps and
//! resource values look the same in log output, the parse worker and any
//! downstream consumer.

/// Game loops per game second at "faster" speed.
pub const FRAMES_PER_SECOND: f64 = 22.4;

/// Format a number of game seconds as a replay timestamp.
///
/// - Below one hour: `MM.SS`
/// - One hour or more: `HH.MM.SS`
///
/// # Examples
/// ```
/// use tracker_types::formatting::format_game_time;
/// assert_eq!(format_game_time(0), "00.00");
/// assert_eq!(format_game_time(75), "01.15");
/// assert_eq!(format_game_time(3_725), "01.02.05");
/// ```
pub fn format_game_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let mins = (seconds / 60) % 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{:02}.{:02}.{:02}", hours, mins, secs)
    } else {
        format!("{:02}.{:02}", mins, secs)
    }
}

/// Whole game seconds elapsed at `frame`.
///
/// # Examples
/// ```
/// use tracker_types::formatting::frame_to_seconds;
/// assert_eq!(frame_to_seconds(0), 0);
/// assert_eq!(frame_to_seconds(22), 0);
/// assert_eq!(frame_to_seconds(224), 10);
/// ```
#[inline]
pub fn frame_to_seconds(frame: u32) -> u64 {
    (frame as f64 / FRAMES_PER_SECOND) as u64
}

/// Format a large number with K/M suffix for compact display.
///
/// - Values >= 1,000,000 are formatted as `X.XXM`
/// - Values >= 1,000 are formatted as `X.XXK`
/// - Values below 1,000 are formatted as-is
///
/// # Examples
/// ```
/// use tracker_types::formatting::format_compact;
/// assert_eq!(format_compact(500), "500");
/// assert_eq!(format_compact(1_500), "1.50K");
/// assert_eq!(format_compact(15_000), "15.00K");
/// assert_eq!(format_compact(1_500_000), "1.50M");
/// ```
pub fn format_compact(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        format!("{}", n)
    }
}

/// Format a supply value, dropping the fraction when it is whole.
///
/// # Examples
/// ```
/// use tracker_types::formatting::format_supply;
/// assert_eq!(format_supply(12.0), "12");
/// assert_eq!(format_supply(12.5), "12.5");
/// ```
pub fn format_supply(food: f64) -> String {
    if food.fract() == 0.0 {
        format!("{:.0}", food)
    } else {
        format!("{:.1}", food)
    }
}
