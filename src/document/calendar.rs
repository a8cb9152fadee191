//! Gregorian/Hijri calendar conversion.
//!
//! Conversion uses the Umm al-Qura tables shipped with the `hijri_date` crate, so
//! identical Gregorian input always yields the same Hijri date regardless of the
//! host locale. The "current" date comes from an injected [`Clock`].

use chrono::{Datelike, Local, NaiveDate, Weekday};
use hijri_date::HijriDate as UmmAlQuraDate;
use serde::Serialize;
use std::sync::Arc;

use super::DocumentError;

/// Minimum Gregorian year covered by the Umm al-Qura tables.
pub const GREGORIAN_MIN_YEAR: i32 = 1938;
/// Maximum Gregorian year covered by the Umm al-Qura tables.
pub const GREGORIAN_MAX_YEAR: i32 = 2076;
/// Hijri years fully inside the supported Gregorian range.
pub const HIJRI_MIN_YEAR: u32 = 1357;
pub const HIJRI_MAX_YEAR: u32 = 1499;

/// Hijri date components. `month` is 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HijriDate {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

/// Gregorian date components plus the Arabic weekday name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GregorianDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub day_name: &'static str,
}

/// The same day expressed in both calendars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDate {
    pub gregorian: GregorianDate,
    pub hijri: HijriDate,
}

/// Source of "today".
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall-clock date in the server's local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a fixed date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Arabic weekday name.
pub fn arabic_day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "الأحد",
        Weekday::Mon => "الاثنين",
        Weekday::Tue => "الثلاثاء",
        Weekday::Wed => "الأربعاء",
        Weekday::Thu => "الخميس",
        Weekday::Fri => "الجمعة",
        Weekday::Sat => "السبت",
    }
}

/// Converts dates between calendars and supplies the current date.
#[derive(Clone)]
pub struct CalendarConverter {
    clock: Arc<dyn Clock>,
}

impl CalendarConverter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Converter backed by the system clock.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Convert a Gregorian date to its Umm al-Qura Hijri equivalent.
    pub fn to_hijri(&self, date: NaiveDate) -> Result<HijriDate, DocumentError> {
        let year = date.year();
        if !(GREGORIAN_MIN_YEAR..=GREGORIAN_MAX_YEAR).contains(&year) {
            return Err(DocumentError::CalendarConversion(format!(
                "{date} is outside the supported range ({GREGORIAN_MIN_YEAR}-{GREGORIAN_MAX_YEAR})"
            )));
        }

        let converted =
            UmmAlQuraDate::from_gr(year as usize, date.month() as usize, date.day() as usize)
                .map_err(|e| DocumentError::CalendarConversion(format!("{date}: {e}")))?;

        Ok(HijriDate {
            year: converted.year() as u32,
            month: converted.month() as u32,
            day: converted.day() as u32,
        })
    }

    /// Convert a Hijri date back to the Gregorian calendar.
    pub fn to_gregorian(&self, hijri: HijriDate) -> Result<NaiveDate, DocumentError> {
        let HijriDate { year, month, day } = hijri;
        if !(HIJRI_MIN_YEAR..=HIJRI_MAX_YEAR).contains(&year)
            || !(1..=12).contains(&month)
            || !(1..=30).contains(&day)
        {
            return Err(DocumentError::CalendarConversion(format!(
                "invalid or unsupported Hijri date {year}-{month}-{day}"
            )));
        }

        let converted = UmmAlQuraDate::from_hijri(year as usize, month as usize, day as usize)
            .map_err(|e| {
                DocumentError::CalendarConversion(format!("{year}-{month}-{day} (Hijri): {e}"))
            })?;

        let date = NaiveDate::from_ymd_opt(
            converted.year_gr() as i32,
            converted.month_gr() as u32,
            converted.day_gr() as u32,
        )
        .ok_or_else(|| {
            DocumentError::CalendarConversion(format!(
                "{year}-{month}-{day} (Hijri) has no Gregorian equivalent"
            ))
        })?;

        // Day 30 of a 29-day month rolls over into the next month.
        if self.to_hijri(date)? != hijri {
            return Err(DocumentError::CalendarConversion(format!(
                "{year}-{month}-{day} (Hijri) does not exist"
            )));
        }

        Ok(date)
    }

    /// Expand a Gregorian date into both calendars.
    pub fn calendar_date(&self, date: NaiveDate) -> Result<CalendarDate, DocumentError> {
        let hijri = self.to_hijri(date)?;
        Ok(CalendarDate {
            gregorian: GregorianDate {
                year: date.year(),
                month: date.month(),
                day: date.day(),
                day_name: arabic_day_name(date.weekday()),
            },
            hijri,
        })
    }

    /// Today's date in both calendars, according to the injected clock.
    pub fn current_dates(&self) -> Result<CalendarDate, DocumentError> {
        self.calendar_date(self.clock.today())
    }
}

impl std::fmt::Debug for CalendarConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarConverter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter_on(y: i32, m: u32, d: u32) -> CalendarConverter {
        CalendarConverter::new(Arc::new(FixedClock(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        )))
    }

    #[test]
    fn test_start_of_ramadan_1445() {
        let converter = converter_on(2024, 1, 1);
        let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        let hijri = converter.to_hijri(date).unwrap();
        assert_eq!(
            hijri,
            HijriDate {
                year: 1445,
                month: 9,
                day: 1
            }
        );
    }

    #[test]
    fn test_round_trip_to_gregorian() {
        let converter = converter_on(2024, 1, 1);
        let date = NaiveDate::from_ymd_opt(2015, 8, 20).unwrap();
        let hijri = converter.to_hijri(date).unwrap();
        assert_eq!(converter.to_gregorian(hijri).unwrap(), date);
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let converter = converter_on(2024, 1, 1);
        let date = NaiveDate::from_ymd_opt(2012, 2, 29).unwrap();
        assert_eq!(
            converter.to_hijri(date).unwrap(),
            converter.to_hijri(date).unwrap()
        );
    }

    #[test]
    fn test_out_of_range_is_an_error() {
        let converter = converter_on(2024, 1, 1);
        let date = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
        let err = converter.to_hijri(date).unwrap_err();
        assert_eq!(err.kind(), "CalendarConversionError");

        let bad = HijriDate {
            year: 1445,
            month: 13,
            day: 1,
        };
        assert!(converter.to_gregorian(bad).is_err());
    }

    #[test]
    fn test_day_thirty_of_short_month_is_an_error() {
        let converter = converter_on(2024, 1, 1);
        // Sha'ban 1445 has 29 days; its day 30 would be 1 Ramadan.
        let missing = HijriDate {
            year: 1445,
            month: 8,
            day: 30,
        };
        let err = converter.to_gregorian(missing).unwrap_err();
        assert_eq!(err.kind(), "CalendarConversionError");
        assert!(err.to_string().contains("does not exist"));

        let last = HijriDate {
            year: 1445,
            month: 8,
            day: 29,
        };
        assert_eq!(
            converter.to_gregorian(last).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        );
    }

    #[test]
    fn test_debug_does_not_read_the_clock() {
        let converter = converter_on(2024, 3, 11);
        assert_eq!(format!("{:?}", converter), "CalendarConverter { .. }");
    }

    #[test]
    fn test_current_dates_follow_the_clock() {
        let converter = converter_on(2024, 3, 11);
        let today = converter.current_dates().unwrap();
        assert_eq!(today.gregorian.year, 2024);
        assert_eq!(today.gregorian.month, 3);
        assert_eq!(today.gregorian.day, 11);
        assert_eq!(today.gregorian.day_name, "الاثنين");
        assert_eq!(today.hijri.month, 9);
    }
}
