//! Business-hours policy for journeys.
//!
//! A journey counts when its start or its end (or both, see [`MatchRule`])
//! falls on a working day, inside that day's time window, and outside every
//! holiday range. All checks use local time in the policy's timezone.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::binning::Bin;

/// Invalid policy configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("{day} window starts at {start} but ends at {end}")]
    InvertedWindow {
        day: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    },

    #[error("holiday {name:?} starts on {start} but ends on {end}")]
    InvertedHoliday {
        name: String,
        start: NaiveDate,
        end: NaiveDate,
    },
}

const fn clock(hour: u32, minute: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, minute, 0) {
        Some(time) => time,
        None => panic!("invalid clock time"),
    }
}

const SIX: NaiveTime = clock(6, 0);
const TWO_PM: NaiveTime = clock(14, 0);
const FOUR_PM: NaiveTime = clock(16, 0);
const SIX_PM: NaiveTime = clock(18, 0);
const TEN_PM: NaiveTime = clock(22, 0);

/// A closed range of local wall-clock times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(with = "hh_mm")]
    pub start: NaiveTime,
    #[serde(with = "hh_mm")]
    pub end: NaiveTime,
}

impl TimeWindow {
    pub const fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Both ends inclusive.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Allowed travel windows for Monday to Friday.
///
/// A missing day allows no travel. Weekends are never allowed and cannot be
/// configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeekdayWindows {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mon: Option<TimeWindow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tue: Option<TimeWindow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wed: Option<TimeWindow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thu: Option<TimeWindow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fri: Option<TimeWindow>,
}

impl WeekdayWindows {
    /// The window for `day`, if travel is allowed on it at all.
    pub const fn window(&self, day: Weekday) -> Option<&TimeWindow> {
        match day {
            Weekday::Mon => self.mon.as_ref(),
            Weekday::Tue => self.tue.as_ref(),
            Weekday::Wed => self.wed.as_ref(),
            Weekday::Thu => self.thu.as_ref(),
            Weekday::Fri => self.fri.as_ref(),
            Weekday::Sat | Weekday::Sun => None,
        }
    }

    fn iter(&self) -> impl Iterator<Item = (Weekday, &TimeWindow)> {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ]
        .into_iter()
        .filter_map(|day| self.window(day).map(|window| (day, window)))
    }
}

impl Default for WeekdayWindows {
    fn default() -> Self {
        Self {
            mon: Some(TimeWindow::new(SIX, TEN_PM)),
            tue: Some(TimeWindow::new(SIX, SIX_PM)),
            wed: Some(TimeWindow::new(SIX, TEN_PM)),
            thu: Some(TimeWindow::new(SIX, TWO_PM)),
            fri: Some(TimeWindow::new(SIX, FOUR_PM)),
        }
    }
}

/// A closed range of calendar dates, e.g. a school or construction holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRange {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl HolidayRange {
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    /// Both ends inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Which journey endpoints must be allowed for the journey to count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchRule {
    /// Start or end. A trip that runs past closing time still counts.
    #[default]
    Either,
    /// Start and end.
    Both,
}

/// Configuration for [`TemporalPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Timezone whose wall clock the windows and holidays refer to.
    pub timezone: Tz,
    pub weekdays: WeekdayWindows,
    pub holidays: Vec<HolidayRange>,
    pub match_rule: MatchRule,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Europe::Amsterdam,
            weekdays: WeekdayWindows::default(),
            holidays: Vec::new(),
            match_rule: MatchRule::default(),
        }
    }
}

/// Accepts or rejects bins by when their journey took place.
#[derive(Debug, Clone)]
pub struct TemporalPolicy {
    config: PolicyConfig,
}

impl TemporalPolicy {
    /// Validates `config` and builds the policy.
    pub fn new(config: PolicyConfig) -> Result<Self, PolicyError> {
        for (day, window) in config.weekdays.iter() {
            if window.start > window.end {
                return Err(PolicyError::InvertedWindow {
                    day,
                    start: window.start,
                    end: window.end,
                });
            }
        }
        if let Some(holiday) = config.holidays.iter().find(|h| h.start > h.end) {
            return Err(PolicyError::InvertedHoliday {
                name: holiday.name.clone(),
                start: holiday.start,
                end: holiday.end,
            });
        }
        Ok(Self { config })
    }

    pub const fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Whether the bin's journey took place within business hours.
    ///
    /// The journey starts at the start of its first event and ends at the end
    /// of its last event.
    pub fn accepts(&self, bin: &Bin) -> bool {
        let journey_start = bin.journey().first().duration().start;
        let journey_end = bin.journey().last().duration().end;

        let accepted = match self.config.match_rule {
            MatchRule::Either => self.is_allowed(journey_start) || self.is_allowed(journey_end),
            MatchRule::Both => self.is_allowed(journey_start) && self.is_allowed(journey_end),
        };
        debug!(
            start = %journey_start,
            end = %journey_end,
            accepted,
            "evaluated journey"
        );
        accepted
    }

    /// Outside every holiday and inside the window of a working day.
    pub fn is_allowed(&self, at: DateTime<Tz>) -> bool {
        !self.in_holiday(at) && self.in_weekday_window(at)
    }

    pub fn in_weekday_window(&self, at: DateTime<Tz>) -> bool {
        let local = at.with_timezone(&self.config.timezone);
        self.config
            .weekdays
            .window(local.weekday())
            .is_some_and(|window| window.contains(local.time()))
    }

    pub fn in_holiday(&self, at: DateTime<Tz>) -> bool {
        let date = at.with_timezone(&self.config.timezone).date_naive();
        self.config
            .holidays
            .iter()
            .any(|holiday| holiday.contains(date))
    }
}

/// `HH:MM` clock times, with seconds only when they are not zero.
mod hh_mm {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    #[expect(
        clippy::trivially_copy_pass_by_ref,
        reason = "serde `with` passes the field by reference"
    )]
    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if time.second() == 0 {
            serializer.collect_str(&time.format("%H:%M"))
        } else {
            serializer.collect_str(&time.format("%H:%M:%S"))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
            .map_err(|e| serde::de::Error::custom(format!("invalid clock time {s:?}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{activity, bin_with_journey, local, place};
    use chrono::{Duration, TimeZone};
    use chrono_tz::UTC;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    fn dutch_holidays_2023() -> Vec<HolidayRange> {
        vec![
            HolidayRange::new("meivakantie", date(2023, 5, 1), date(2023, 5, 5)),
            HolidayRange::new("bouwvak", date(2023, 8, 7), date(2023, 8, 25)),
            HolidayRange::new("kerst", date(2023, 12, 25), date(2023, 12, 31)),
        ]
    }

    fn policy() -> TemporalPolicy {
        TemporalPolicy::new(PolicyConfig {
            holidays: dutch_holidays_2023(),
            ..PolicyConfig::default()
        })
        .unwrap()
    }

    fn strict_policy() -> TemporalPolicy {
        TemporalPolicy::new(PolicyConfig {
            holidays: dutch_holidays_2023(),
            match_rule: MatchRule::Both,
            ..PolicyConfig::default()
        })
        .unwrap()
    }

    /// A journey running from `start` to `end`, made of two events.
    fn journey(start: DateTime<Tz>, end: DateTime<Tz>) -> Bin {
        let mut first = place(start);
        let mut last = activity(start, "WALKING", 200.0);
        if let crate::event::TimelineEvent::PlaceVisit(visit) = &mut first {
            visit.duration.end = start + Duration::minutes(30);
        }
        if let crate::event::TimelineEvent::ActivitySegment(walk) = &mut last {
            walk.duration.start = start + Duration::minutes(30);
            walk.duration.end = end;
        }
        bin_with_journey(vec![first, last])
    }

    #[test]
    fn monday_lunchtime_journey_is_accepted() {
        let bin = journey(local(2023, 5, 15, 12, 0), local(2023, 5, 15, 13, 0));

        assert!(policy().accepts(&bin));
    }

    #[test]
    fn starting_in_range_and_ending_late_is_accepted() {
        let bin = journey(local(2023, 5, 15, 12, 0), local(2023, 5, 15, 23, 30));

        assert!(policy().accepts(&bin));
        assert!(!strict_policy().accepts(&bin));
    }

    #[test]
    fn starting_on_saturday_and_ending_monday_is_accepted() {
        let bin = journey(local(2023, 5, 13, 12, 0), local(2023, 5, 15, 13, 30));

        assert!(policy().accepts(&bin));
        assert!(!strict_policy().accepts(&bin));
    }

    #[test]
    fn weekend_journey_is_rejected() {
        let bin = journey(local(2023, 5, 13, 12, 0), local(2023, 5, 13, 13, 30));

        assert!(!policy().accepts(&bin));
    }

    #[test]
    fn friday_night_into_saturday_is_rejected() {
        let bin = journey(local(2023, 5, 19, 23, 0), local(2023, 5, 20, 1, 0));

        assert!(!policy().accepts(&bin));
    }

    #[test]
    fn journeys_during_holidays_are_rejected() {
        let may = journey(local(2023, 5, 3, 12, 0), local(2023, 5, 3, 13, 0));
        let august = journey(local(2023, 8, 7, 9, 0), local(2023, 8, 7, 10, 0));
        let christmas = journey(local(2023, 12, 27, 9, 0), local(2023, 12, 27, 10, 0));
        let after_may = journey(local(2023, 5, 8, 9, 0), local(2023, 5, 8, 10, 0));

        assert!(!policy().accepts(&may));
        assert!(!policy().accepts(&august));
        assert!(!policy().accepts(&christmas));
        assert!(policy().accepts(&after_may));
    }

    #[test]
    fn holiday_includes_its_last_day() {
        let policy = policy();

        assert!(policy.in_holiday(local(2023, 5, 5, 23, 59)));
        assert!(policy.in_holiday(local(2023, 5, 1, 0, 0)));
        assert!(!policy.in_holiday(local(2023, 4, 30, 23, 59)));
        assert!(!policy.in_holiday(local(2023, 5, 6, 0, 0)));
    }

    #[test]
    fn windows_differ_per_weekday() {
        let policy = policy();

        // Tuesday 2023-06-06 closes at 18:00, inclusive.
        assert!(policy.in_weekday_window(local(2023, 6, 6, 18, 0)));
        assert!(!policy.in_weekday_window(local(2023, 6, 6, 18, 1)));
        assert!(!policy.in_weekday_window(local(2023, 6, 6, 5, 59)));
        // Wednesday runs until 22:00, Thursday only until 14:00.
        assert!(policy.in_weekday_window(local(2023, 6, 7, 21, 0)));
        assert!(!policy.in_weekday_window(local(2023, 6, 8, 15, 0)));
        // Friday until 16:00.
        assert!(policy.in_weekday_window(local(2023, 6, 9, 16, 0)));
        assert!(!policy.in_weekday_window(local(2023, 6, 9, 16, 30)));
    }

    #[test]
    fn weekends_have_no_window() {
        let windows = WeekdayWindows::default();

        assert!(windows.window(Weekday::Sat).is_none());
        assert!(windows.window(Weekday::Sun).is_none());
        assert!(!policy().is_allowed(local(2023, 6, 10, 12, 0)));
    }

    #[test]
    fn checks_use_the_policy_timezone() {
        // 04:30 UTC is 06:30 in Amsterdam during summer time.
        let early = UTC.with_ymd_and_hms(2023, 5, 15, 4, 30, 0).unwrap();

        assert!(policy().in_weekday_window(early));

        let utc_policy = TemporalPolicy::new(PolicyConfig {
            timezone: UTC,
            ..PolicyConfig::default()
        })
        .unwrap();
        assert!(!utc_policy.in_weekday_window(early));
    }

    #[test]
    fn holiday_date_is_taken_in_policy_timezone() {
        // 22:30 UTC on April 30 is already May 1 in Amsterdam.
        let late = UTC.with_ymd_and_hms(2023, 4, 30, 22, 30, 0).unwrap();

        assert!(policy().in_holiday(late));
    }

    #[test]
    fn missing_day_allows_no_travel() {
        let policy = TemporalPolicy::new(PolicyConfig {
            weekdays: WeekdayWindows {
                wed: None,
                ..WeekdayWindows::default()
            },
            ..PolicyConfig::default()
        })
        .unwrap();

        assert!(!policy.in_weekday_window(local(2023, 6, 7, 12, 0)));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let config = PolicyConfig {
            weekdays: WeekdayWindows {
                thu: Some(TimeWindow::new(clock(18, 0), clock(8, 0))),
                ..WeekdayWindows::default()
            },
            ..PolicyConfig::default()
        };

        let err = TemporalPolicy::new(config).unwrap_err();

        assert_eq!(
            err,
            PolicyError::InvertedWindow {
                day: Weekday::Thu,
                start: clock(18, 0),
                end: clock(8, 0),
            }
        );
        assert_eq!(err.to_string(), "Thu window starts at 18:00:00 but ends at 08:00:00");
    }

    #[test]
    fn inverted_holiday_is_rejected() {
        let config = PolicyConfig {
            holidays: vec![HolidayRange::new("oops", date(2023, 5, 5), date(2023, 5, 1))],
            ..PolicyConfig::default()
        };

        let err = TemporalPolicy::new(config).unwrap_err();

        assert!(matches!(err, PolicyError::InvertedHoliday { ref name, .. } if name == "oops"));
    }

    #[test]
    fn config_deserializes_from_json() {
        let json = r#"{
            "timezone": "Europe/Brussels",
            "weekdays": {"mon": {"start": "07:00", "end": "17:30"}},
            "holidays": [{"name": "meivakantie", "start": "2023-05-01", "end": "2023-05-05"}],
            "match_rule": "both"
        }"#;

        let config: PolicyConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.timezone, chrono_tz::Europe::Brussels);
        assert_eq!(
            config.weekdays.mon,
            Some(TimeWindow::new(clock(7, 0), clock(17, 30)))
        );
        assert_eq!(config.weekdays.tue, None);
        assert_eq!(config.holidays[0].end, date(2023, 5, 5));
        assert_eq!(config.match_rule, MatchRule::Both);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: PolicyConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config, PolicyConfig::default());
    }

    #[test]
    fn weekend_windows_are_not_configurable() {
        let json = r#"{"weekdays": {"sat": {"start": "06:00", "end": "22:00"}}}"#;

        assert!(serde_json::from_str::<PolicyConfig>(json).is_err());
    }

    #[test]
    fn clock_times_serialize_as_hours_and_minutes() {
        let window = TimeWindow::new(clock(6, 0), NaiveTime::from_hms_opt(22, 0, 30).unwrap());

        let json = serde_json::to_string(&window).unwrap();

        assert_eq!(json, r#"{"start":"06:00","end":"22:00:30"}"#);
        let parsed: TimeWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, window);
    }

    #[test]
    fn malformed_clock_time_is_an_error() {
        let result: Result<TimeWindow, _> =
            serde_json::from_str(r#"{"start": "six", "end": "22:00"}"#);

        assert!(result.is_err());
    }
}
