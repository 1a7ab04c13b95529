//! Weekly location-activity heatmap.
//!
//! Locations report sparse `(year-week, value)` observations. The heatmap
//! needs a rectangular grid, so every location is padded to the union of all
//! reported weeks and ordered chronologically.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use tracing::debug;

use crate::charts::types::{HeatmapCell, HeatmapRow, LocationActivity, WeekObservation};
use crate::error::{PipelineError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// An ISO 8601 week, read from `YYYY-Www` or `YYYY-w[w]` and written `YYYY-ww`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearWeek {
    pub year: i32,
    pub week: u32,
}

/// Inclusive Monday-to-Sunday span of an ISO week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Number of ISO weeks in `year` (52 or 53). December 28 always falls in the
/// last week of its ISO year.
fn weeks_in_year(year: i32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, 12, 28).map(|d| d.iso_week().week())
}

impl FromStr for YearWeek {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || PipelineError::InvalidYearWeek(s.to_string());

        let (year, week) = s.trim().split_once('-').ok_or_else(invalid)?;
        let week = week
            .strip_prefix('W')
            .or_else(|| week.strip_prefix('w'))
            .unwrap_or(week);
        if year.is_empty()
            || week.is_empty()
            || !year.bytes().all(|b| b.is_ascii_digit())
            || !week.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let week: u32 = week.parse().map_err(|_| invalid())?;
        let weeks = weeks_in_year(year).ok_or_else(invalid)?;
        if week == 0 || week > weeks {
            return Err(invalid());
        }

        Ok(YearWeek { year, week })
    }
}

impl fmt::Display for YearWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.week)
    }
}

impl YearWeek {
    /// Monday through Sunday of this week.
    ///
    /// January 4 is always in week 1, so its Monday anchors the count.
    pub fn date_range(&self) -> Option<DateRange> {
        let jan4 = NaiveDate::from_ymd_opt(self.year, 1, 4)?;
        let week1_monday =
            jan4.checked_sub_days(Days::new(jan4.weekday().num_days_from_monday() as u64))?;
        let start = week1_monday.checked_add_days(Days::new((self.week as u64 - 1) * 7))?;
        let end = start.checked_add_days(Days::new(6))?;
        Some(DateRange { start, end })
    }
}

/// Date span of a `YYYY-Www` identifier; malformed input is an error.
pub fn get_date_range_from_year_week(year_week: &str) -> Result<DateRange> {
    let parsed: YearWeek = year_week.parse()?;
    parsed
        .date_range()
        .ok_or_else(|| PipelineError::InvalidYearWeek(year_week.to_string()))
}

fn cell(week: YearWeek, observation: Option<&WeekObservation>) -> Result<HeatmapCell> {
    let reported = observation.and_then(|o| Some((o.start_date.clone()?, o.end_date.clone()?)));
    let (start_date, end_date) = match reported {
        Some(dates) => dates,
        None => {
            let range = week
                .date_range()
                .ok_or_else(|| PipelineError::InvalidYearWeek(week.to_string()))?;
            (
                range.start.format(DATE_FORMAT).to_string(),
                range.end.format(DATE_FORMAT).to_string(),
            )
        }
    };

    Ok(HeatmapCell {
        x: week.to_string(),
        y: observation.map(|o| o.y).unwrap_or(0.0),
        start_date,
        end_date,
    })
}

/// First observation of each week a location reports.
fn observations_by_week(location: &LocationActivity) -> Result<HashMap<YearWeek, &WeekObservation>> {
    let mut by_week = HashMap::new();
    for observation in &location.data {
        by_week.entry(observation.x.parse()?).or_insert(observation);
    }
    Ok(by_week)
}

/// Pads every location to the same chronologically sorted set of weeks.
///
/// Weeks are matched by value, so `2024-1` and `2024-W01` are one column,
/// labelled `2024-01`. Missing weeks get value 0 and a date range derived
/// from the week itself. Observations without their own dates get the
/// derived range as well. When a location reports a week twice, the first
/// observation is used.
pub fn normalize_heatmap(locations: &[LocationActivity]) -> Result<Vec<HeatmapRow>> {
    let reported = locations
        .iter()
        .map(observations_by_week)
        .collect::<Result<Vec<_>>>()?;

    let mut weeks: Vec<YearWeek> = reported.iter().flat_map(|w| w.keys().copied()).collect();
    weeks.sort_unstable();
    weeks.dedup();

    locations
        .iter()
        .zip(&reported)
        .map(|(location, by_week)| {
            let data = weeks
                .iter()
                .map(|week| cell(*week, by_week.get(week).copied()))
                .collect::<Result<Vec<_>>>()?;

            debug!(
                location = %location.id,
                reported = by_week.len(),
                padded = weeks.len() - by_week.len(),
                "Heatmap location normalised"
            );

            Ok(HeatmapRow {
                id: location.address.clone(),
                address: location.address.clone(),
                location_id: location.id.clone(),
                data,
            })
        })
        .collect()
}
