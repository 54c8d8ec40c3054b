// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! The `strftime`/`FORMAT_DATE` format-string <-> [`TimeUnit`] table shared
//! by the SQLite and BigQuery dialect generators. Grounded on
//! `deepdive/viz/helper.py`'s `FORMAT_STRING_TO_TIME_UNIT` (the inverse of
//! `TIME_UNIT_TO_FORMAT_STRING`, built once at import time in the original;
//! built here as a plain match since the table is small and static).

use sqlviz_ir::TimeUnit;

pub fn time_unit_from_format_string(format: &str) -> Option<TimeUnit> {
    Some(match format {
        "%Y-%m-%d %H:%M:%S" => TimeUnit::Second,
        "%Y-%m-%d %H:%M" => TimeUnit::Minute,
        "%Y-%m-%d %H" => TimeUnit::Hour,
        "%H" => TimeUnit::HourOfDay,
        "%Y-%m-%d" => TimeUnit::Day,
        "%w" => TimeUnit::DayOfWeek,
        "%d" => TimeUnit::DayOfMonth,
        "%Y-%W" => TimeUnit::WeekOfYearLong,
        "%W" => TimeUnit::WeekOfYear,
        "%Y-%m" => TimeUnit::Month,
        "%Y" => TimeUnit::Year,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_format_strings() {
        assert_eq!(time_unit_from_format_string("%Y-%m"), Some(TimeUnit::Month));
        assert_eq!(time_unit_from_format_string("%H"), Some(TimeUnit::HourOfDay));
    }

    #[test]
    fn unknown_format_string_is_none() {
        assert_eq!(time_unit_from_format_string("%Q"), None);
    }
}
