use std::fmt;
use std::time::Duration;

/// Percentage of `index` out of `total`, 0.0 when `total` is zero.
pub fn percent_complete(index: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    index as f64 * 100.0 / total as f64
}

/// `HH:MM:SS` rendering of an elapsed duration.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressLine {
    pub index: usize,
    pub total: usize,
    pub identifier: String,
    pub status: String,
    pub elapsed: Duration,
}

impl fmt::Display for ProgressLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{}] {:5.1}% {} {} (elapsed {})",
            self.index,
            self.total,
            percent_complete(self.index, self.total),
            self.identifier,
            self.status,
            format_elapsed(self.elapsed)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{format_elapsed, percent_complete, ProgressLine};
    use std::time::Duration;

    #[test]
    fn percent_handles_zero_total() {
        assert_eq!(percent_complete(3, 0), 0.0);
        assert_eq!(percent_complete(1, 4), 25.0);
    }

    #[test]
    fn elapsed_is_zero_padded() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "00:00:00");
        assert_eq!(format_elapsed(Duration::from_secs(3_723)), "01:02:03");
    }

    #[test]
    fn progress_line_renders_all_parts() {
        let line = ProgressLine {
            index: 1,
            total: 2,
            identifier: "2024/01/01".into(),
            status: "queued for save".into(),
            elapsed: Duration::from_secs(61),
        };
        assert_eq!(
            line.to_string(),
            "[1/2]  50.0% 2024/01/01 queued for save (elapsed 00:01:01)"
        );
    }
}
