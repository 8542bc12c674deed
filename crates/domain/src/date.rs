use chrono::TimeZone;
use chrono_tz::Tz;

/// Validates a `yyyy-mm-dd` invoice due date and returns its parts
pub fn is_valid_due_date(datestr: &str) -> anyhow::Result<(i32, u32, u32)> {
    let datestr = String::from(datestr);
    let dates = datestr.split('-').collect::<Vec<_>>();
    if dates.len() != 3 {
        return Err(anyhow::Error::msg(datestr));
    }
    let year = dates[0].parse();
    let month = dates[1].parse();
    let day = dates[2].parse();

    if year.is_err() || month.is_err() || day.is_err() {
        return Err(anyhow::Error::msg(datestr));
    }

    let year = year.unwrap();
    let month = month.unwrap();
    let day = day.unwrap();
    if !(1970..=2100).contains(&year) || month < 1 || month > 12 {
        return Err(anyhow::Error::msg(datestr));
    }

    let month_length = get_month_length(year, month);

    if day < 1 || day > month_length {
        return Err(anyhow::Error::msg(datestr));
    }

    Ok((year, month, day))
}

pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 100 != 0 && year % 4 == 0)
}

// month: January -> 1
pub fn get_month_length(year: i32, month: u32) -> u32 {
    match month - 1 {
        0 => 31,
        1 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        2 => 31,
        3 => 30,
        4 => 31,
        5 => 30,
        6 => 31,
        7 => 31,
        8 => 30,
        9 => 31,
        10 => 30,
        11 => 31,
        _ => panic!("Invalid month"),
    }
}

/// Canonical form of a due date, used when deriving idempotency keys so that
/// zero-padded and unpadded inputs map to the same reminder identity
pub fn format_due_date(year: i32, month: u32, day: u32) -> String {
    format!("{}-{}-{}", year, month, day)
}

/// Resolves a due date to midnight in the tenant timezone, in epoch millis.
/// Returns `None` for the rare local times that do not exist in the timezone.
pub fn due_date_midnight_millis(timezone: &Tz, year: i32, month: u32, day: u32) -> Option<i64> {
    timezone
        .ymd_opt(year, month, day)
        .and_hms_opt(0, 0, 0)
        .single()
        .map(|date| date.timestamp_millis())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_accepts_valid_due_dates() {
        let valid_dates = vec![
            "2018-1-1",
            "2025-12-31",
            "2020-1-12",
            "2020-2-29",
            "2020-02-2",
            "2020-02-02",
            "2020-2-09",
        ];

        for date in &valid_dates {
            assert!(is_valid_due_date(date).is_ok());
        }
    }

    #[test]
    fn it_rejects_invalid_due_dates() {
        let invalid_dates = vec![
            "2018--1-1",
            "2020-1-32",
            "2020-2-30",
            "2020-0-1",
            "2020-1-0",
            "first of may",
        ];

        for date in &invalid_dates {
            assert!(is_valid_due_date(date).is_err());
        }
    }

    #[test]
    fn it_normalizes_padded_and_unpadded_dates_equally() {
        let (y1, m1, d1) = is_valid_due_date("2026-02-05").unwrap();
        let (y2, m2, d2) = is_valid_due_date("2026-2-5").unwrap();
        assert_eq!(format_due_date(y1, m1, d1), format_due_date(y2, m2, d2));
    }

    #[test]
    fn it_resolves_due_dates_in_the_tenant_timezone() {
        let utc = due_date_midnight_millis(&chrono_tz::UTC, 2026, 3, 1).unwrap();
        let oslo = due_date_midnight_millis(&chrono_tz::Europe::Oslo, 2026, 3, 1).unwrap();
        // Midnight in Oslo (UTC+1) arrives one hour before midnight UTC
        assert_eq!(utc - oslo, 1000 * 60 * 60);
    }
}
