// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! The emit-direction counterpart of `sqlviz-generator`'s
//! `time_format::time_unit_from_format_string` inference table. Grounded on
//! `deepdive/viz/helper.py::TIME_UNIT_TO_FORMAT_STRING`, shared by SQLite's
//! `strftime` and BigQuery's `FORMAT_DATE` since both dialects accept the
//! same strftime-style format tokens.

use sqlviz_ir::TimeUnit;

pub fn time_unit_to_format_string(time_unit: TimeUnit) -> Option<&'static str> {
    Some(match time_unit {
        TimeUnit::Second => "%Y-%m-%d %H:%M:%S",
        TimeUnit::Minute => "%Y-%m-%d %H:%M",
        TimeUnit::Hour => "%Y-%m-%d %H",
        TimeUnit::HourOfDay => "%H",
        TimeUnit::Day => "%Y-%m-%d",
        TimeUnit::DayOfWeek => "%w",
        TimeUnit::DayOfMonth => "%d",
        TimeUnit::WeekOfYearLong => "%Y-%W",
        TimeUnit::WeekOfYear => "%W",
        TimeUnit::Month => "%Y-%m",
        TimeUnit::Year => "%Y",
        TimeUnit::Week | TimeUnit::MonthOfYear => return None,
    })
}
