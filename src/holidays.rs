/// Public holiday calendars feeding the meeting exclusion set.
///
/// `MarketHolidays` follows the US exchange calendar: fixed-date holidays
/// falling on a Saturday are observed the Friday before, on a Sunday the
/// Monday after. New Year's Day on a Saturday is not observed at all.
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Source of holidays for a calendar year.
pub trait HolidaySource {
    fn holidays(&self, year: i32) -> Vec<NaiveDate>;
}

/// No holidays. Only cancellations block meetings.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidaySource for NoHolidays {
    fn holidays(&self, _year: i32) -> Vec<NaiveDate> {
        Vec::new()
    }
}

/// US market holiday calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketHolidays;

impl HolidaySource for MarketHolidays {
    fn holidays(&self, year: i32) -> Vec<NaiveDate> {
        let mut days = Vec::with_capacity(10);

        if let Some(d) = ymd(year, 1, 1) {
            // Saturday New Year's Day would land in the previous year.
            if d.weekday() != Weekday::Sat {
                days.push(observed(d));
            }
        }
        days.extend(nth_weekday(year, 1, Weekday::Mon, 3));
        days.extend(nth_weekday(year, 2, Weekday::Mon, 3));
        days.extend(easter_sunday(year).map(|d| d - Duration::days(2)));
        days.extend(last_weekday(year, 5, Weekday::Mon));
        if year >= 2022 {
            days.extend(ymd(year, 6, 19).map(observed));
        }
        days.extend(ymd(year, 7, 4).map(observed));
        days.extend(nth_weekday(year, 9, Weekday::Mon, 1));
        days.extend(nth_weekday(year, 11, Weekday::Thu, 4));
        days.extend(ymd(year, 12, 25).map(observed));

        days.sort();
        days
    }
}

/// Select a holiday calendar by name. Unknown names yield `None`.
pub fn by_name(name: &str) -> Option<Box<dyn HolidaySource>> {
    match name.trim().to_lowercase().as_str() {
        "market" | "nyse" | "us" => Some(Box::new(MarketHolidays)),
        "none" | "" => Some(Box::new(NoHolidays)),
        _ => None,
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn observed(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date - Duration::days(1),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

/// The `n`-th (1-based) `weekday` of a month.
fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n as u8)
}

fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        ymd(year + 1, 1, 1)?
    } else {
        ymd(year, month + 1, 1)?
    };
    let last = first_of_next.pred_opt()?;
    let back = (7 + last.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
    Some(last - Duration::days(back as i64))
}

/// Gregorian Easter Sunday (anonymous algorithm).
fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    ymd(year, month as u32, day as u32)
}
