//! 기본 수집 기준일 정책.
//!
//! 제공자는 당일 기준가를 오전 8시 무렵 공개합니다. 그 이전에 실행하면
//! 전일 데이터를 수집합니다. 명시적으로 지정한 기준일에는 적용하지 않습니다.

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;

/// 기본 기준 시각 (시)
pub const DEFAULT_CUTOVER_HOUR: u32 = 8;

/// 명령행 기준일 형식 (우선순위 순)
const DATE_ARG_FORMATS: [&str; 2] = ["%Y%m%d", "%Y-%m-%d"];

/// 기준일 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulePolicy {
    cutover_hour: u32,
    timezone: Option<Tz>,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            cutover_hour: DEFAULT_CUTOVER_HOUR,
            timezone: None,
        }
    }
}

impl SchedulePolicy {
    /// `timezone`이 없으면 시스템 로컬 시간대를 사용합니다.
    pub fn new(cutover_hour: u32, timezone: Option<Tz>) -> Self {
        Self {
            cutover_hour,
            timezone,
        }
    }

    pub fn cutover_hour(&self) -> u32 {
        self.cutover_hour
    }

    pub fn timezone(&self) -> Option<Tz> {
        self.timezone
    }

    /// 현지 벽시계 시각.
    pub fn local_now(&self) -> NaiveDateTime {
        match self.timezone {
            Some(tz) => Utc::now().with_timezone(&tz).naive_local(),
            None => Local::now().naive_local(),
        }
    }

    /// 현지 시각 `now` 기준의 기본 기준일.
    pub fn default_date(&self, now: NaiveDateTime) -> NaiveDate {
        let today = now.date();
        if now.hour() < self.cutover_hour {
            today.pred_opt().unwrap_or(today)
        } else {
            today
        }
    }

    /// 수집 기준일을 결정합니다. 명시한 날짜는 그대로 사용합니다.
    pub fn target_date(&self, explicit: Option<NaiveDate>) -> NaiveDate {
        explicit.unwrap_or_else(|| self.default_date(self.local_now()))
    }
}

/// 기본 정책(오전 8시 기준)의 기본 기준일.
pub fn default_date(now: NaiveDateTime) -> NaiveDate {
    SchedulePolicy::default().default_date(now)
}

/// 명령행 기준일 파싱 (`YYYYMMDD` 또는 `YYYY-MM-DD`).
pub fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    DATE_ARG_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value.trim(), format).ok())
        .ok_or_else(|| format!("Invalid date \"{}\".", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_cutover_boundary() {
        assert_eq!(
            default_date(at(2015, 7, 1, 7, 59)),
            NaiveDate::from_ymd_opt(2015, 6, 30).unwrap()
        );
        assert_eq!(
            default_date(at(2015, 7, 1, 8, 0)),
            NaiveDate::from_ymd_opt(2015, 7, 1).unwrap()
        );
    }

    #[test]
    fn test_midnight_crosses_year() {
        assert_eq!(
            default_date(at(2016, 1, 1, 0, 0)),
            NaiveDate::from_ymd_opt(2015, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_custom_cutover() {
        let policy = SchedulePolicy::new(0, None);
        assert_eq!(
            policy.default_date(at(2015, 7, 1, 0, 0)),
            NaiveDate::from_ymd_opt(2015, 7, 1).unwrap()
        );
    }

    #[test]
    fn test_explicit_date_bypasses_policy() {
        let explicit = NaiveDate::from_ymd_opt(2001, 2, 3).unwrap();
        assert_eq!(SchedulePolicy::default().target_date(Some(explicit)), explicit);
    }

    #[test]
    fn test_parse_date_arg() {
        let expected = NaiveDate::from_ymd_opt(2015, 6, 30).unwrap();
        assert_eq!(parse_date_arg("20150630"), Ok(expected));
        assert_eq!(parse_date_arg("2015-06-30"), Ok(expected));
        assert!(parse_date_arg("20150631").is_err());
        assert!(parse_date_arg("yesterday").is_err());
    }

    proptest! {
        #[test]
        fn prop_default_date_is_today_or_yesterday(
            days in 0i64..40_000,
            hour in 0u32..24,
            minute in 0u32..60,
        ) {
            let date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() + chrono::Duration::days(days);
            let now = date.and_hms_opt(hour, minute, 0).unwrap();
            let result = default_date(now);

            if hour < DEFAULT_CUTOVER_HOUR {
                prop_assert_eq!(result, date.pred_opt().unwrap());
            } else {
                prop_assert_eq!(result, date);
            }
        }
    }
}
