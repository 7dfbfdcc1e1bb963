/// `MM:SS`. Minutes keep growing past 59.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Daily budget in the "X Hrs Y Min" style.
pub fn format_work_time(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    match (hours, minutes) {
        (0, m) => format!("{m} Min"),
        (h, 0) => format!("{h} Hrs"),
        (h, m) => format!("{h} Hrs {m} Min"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pads_both_fields() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(1650), "27:30");
        assert_eq!(format_clock(6000), "100:00");
    }

    #[test]
    fn work_time_drops_empty_parts() {
        assert_eq!(format_work_time(16_200), "4 Hrs 30 Min");
        assert_eq!(format_work_time(7200), "2 Hrs");
        assert_eq!(format_work_time(300), "5 Min");
        assert_eq!(format_work_time(59), "0 Min");
    }
}
