use chrono::Duration;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("duration is empty")]
    Empty,
    #[error("duration '{0}' must be in HH:MM format")]
    Pattern(String),
    #[error("duration '{0}' is not two colon-separated whole numbers")]
    Malformed(String),
    #[error("duration '{0}' is too large")]
    Overflow(String),
}

/// Length of a study task, stored as whole minutes.
///
/// Two parsers exist. [`StudyDuration::parse_entry`] is the strict one used when a
/// task is typed in (`H:MM` or `HH:MM`). [`StudyDuration::parse`] is the lenient one
/// applied to stored rows when a timetable is generated: any two non-negative
/// integers separated by a colon, minutes not capped at 59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StudyDuration {
    total_minutes: u32,
}

impl StudyDuration {
    pub const ZERO: StudyDuration = StudyDuration { total_minutes: 0 };

    pub fn from_minutes(total_minutes: u32) -> Self {
        Self { total_minutes }
    }

    pub fn from_hours_minutes(hours: u32, minutes: u32) -> Option<Self> {
        hours
            .checked_mul(60)
            .and_then(|h| h.checked_add(minutes))
            .map(Self::from_minutes)
    }

    pub fn parse(input: &str) -> Result<Self, DurationParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DurationParseError::Empty);
        }
        let mut parts = trimmed.split(':');
        let (Some(hours_s), Some(minutes_s), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(DurationParseError::Malformed(input.to_string()));
        };
        let hours = hours_s
            .trim()
            .parse::<u32>()
            .map_err(|_| DurationParseError::Malformed(input.to_string()))?;
        let minutes = minutes_s
            .trim()
            .parse::<u32>()
            .map_err(|_| DurationParseError::Malformed(input.to_string()))?;
        Self::from_hours_minutes(hours, minutes)
            .ok_or_else(|| DurationParseError::Overflow(input.to_string()))
    }

    pub fn parse_entry(input: &str) -> Result<Self, DurationParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DurationParseError::Empty);
        }
        let Some((hours_s, minutes_s)) = trimmed.split_once(':') else {
            return Err(DurationParseError::Pattern(input.to_string()));
        };
        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !(1..=2).contains(&hours_s.len())
            || minutes_s.len() != 2
            || !all_digits(hours_s)
            || !all_digits(minutes_s)
        {
            return Err(DurationParseError::Pattern(input.to_string()));
        }
        Self::parse(trimmed)
    }

    pub fn total_minutes(&self) -> u32 {
        self.total_minutes
    }

    pub fn hours(&self) -> u32 {
        self.total_minutes / 60
    }

    pub fn minutes(&self) -> u32 {
        self.total_minutes % 60
    }

    pub fn is_zero(&self) -> bool {
        self.total_minutes == 0
    }

    pub fn to_chrono(&self) -> Duration {
        Duration::minutes(i64::from(self.total_minutes))
    }
}

impl fmt::Display for StudyDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hours(), self.minutes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1:30", 90)]
    #[case("01:30", 90)]
    #[case("12:05", 725)]
    #[case(" 0:45 ", 45)]
    fn entry_parser_accepts_clock_style_durations(#[case] input: &str, #[case] minutes: u32) {
        assert_eq!(
            StudyDuration::parse_entry(input).unwrap().total_minutes(),
            minutes
        );
    }

    #[rstest]
    #[case("130")]
    #[case("1:3")]
    #[case("123:00")]
    #[case("1:300")]
    #[case("a:30")]
    #[case("1:-5")]
    #[case("1:30:00")]
    fn entry_parser_rejects_other_shapes(#[case] input: &str) {
        assert_eq!(
            StudyDuration::parse_entry(input),
            Err(DurationParseError::Pattern(input.to_string()))
        );
    }

    #[test]
    fn lenient_parser_does_not_cap_minutes() {
        let duration = StudyDuration::parse("1:75").unwrap();
        assert_eq!(duration.total_minutes(), 135);
        assert_eq!(duration.to_string(), "2:15");
    }

    #[test]
    fn lenient_parser_tolerates_spaces_and_long_hours() {
        assert_eq!(StudyDuration::parse("100 : 5").unwrap().total_minutes(), 6005);
    }

    #[test]
    fn lenient_parser_rejects_garbage() {
        assert_eq!(
            StudyDuration::parse("abc"),
            Err(DurationParseError::Malformed("abc".into()))
        );
        assert_eq!(StudyDuration::parse("   "), Err(DurationParseError::Empty));
        assert!(matches!(
            StudyDuration::parse("99999999:00"),
            Err(DurationParseError::Overflow(_))
        ));
    }

    #[test]
    fn converts_to_chrono_minutes() {
        assert_eq!(
            StudyDuration::from_minutes(75).to_chrono(),
            Duration::minutes(75)
        );
    }
}
