//! Log line layout: `YYYY-MM-DD HH:MM:SS.mmm [LEVEL] message`.

use crate::log::LogLevel;
use chrono::{DateTime, Local};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug, Clone, Copy, Default)]
pub struct LogFormatter;

impl LogFormatter {
    pub fn format(&self, level: LogLevel, message: &str) -> String {
        self.format_at(&Local::now(), level, message)
    }

    pub(super) fn format_at(&self, at: &DateTime<Local>, level: LogLevel, message: &str) -> String {
        format!("{} [{}] {}", at.format(TIMESTAMP_FORMAT), level.as_str(), message)
    }
}
