use chrono::NaiveTime;

use crate::error::{Error, Result};

/// Exam start/end times travel as 12-hour clock strings ("09:30 AM").
/// They are validated here once at write time and stored verbatim.
pub fn parse_12h(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%I:%M %p").map_err(|_| {
        Error::InvalidFormat(format!(
            "Time '{}' is not in 12-hour HH:MM AM/PM form",
            raw
        ))
    })
}

pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_12_hour_times() {
        assert!(parse_12h("09:30 AM").is_ok());
        assert!(parse_12h("12:00 PM").is_ok());
        assert!(parse_12h(" 1:05 PM ").is_ok());
    }

    #[test]
    fn rejects_24_hour_and_garbage() {
        assert!(parse_12h("21:30").is_err());
        assert!(parse_12h("09:30").is_err());
        assert!(parse_12h("13:00 PM").is_err());
        assert!(parse_12h("noonish").is_err());
    }
}
