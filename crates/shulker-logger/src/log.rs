use crate::severity::LogSeverity;
use crate::time::now;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable holding the initial minimum severity.
pub const LOG_ENV: &str = "SHULKER_LOG";

static MIN_SEVERITY: Lazy<AtomicU8> = Lazy::new(|| {
    let initial = std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| value.parse::<LogSeverity>().ok())
        .unwrap_or(LogSeverity::Info);
    AtomicU8::new(initial as u8)
});

pub fn min_severity() -> LogSeverity {
    LogSeverity::from_u8(MIN_SEVERITY.load(Ordering::Relaxed))
}

pub fn set_min_severity(severity: LogSeverity) {
    MIN_SEVERITY.store(severity as u8, Ordering::Relaxed);
}

pub fn enabled(severity: LogSeverity) -> bool {
    severity >= min_severity()
}

/// Formats one log line.
pub fn format_line(msg: &str, log_severity: LogSeverity, stamp: &str) -> String {
    format!("[{}] {} {}", log_severity, stamp, msg)
}

/// Writes `msg` to stderr if `log_severity` passes the configured minimum.
pub fn log(msg: String, log_severity: LogSeverity) {
    if enabled(log_severity) {
        eprintln!("{}", format_line(&msg, log_severity, &now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line("decoded", LogSeverity::Debug, "2026-01-02 03:04:05 UTC"),
            "[DEBUG] 2026-01-02 03:04:05 UTC decoded"
        );
    }

    #[test]
    fn test_threshold() {
        set_min_severity(LogSeverity::Warning);
        assert!(!enabled(LogSeverity::Info));
        assert!(enabled(LogSeverity::Warning));
        assert!(enabled(LogSeverity::Fatal));
        assert_eq!(min_severity(), LogSeverity::Warning);
        set_min_severity(LogSeverity::Info);
    }
}
