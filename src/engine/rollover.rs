use chrono::{Datelike, NaiveDate};

/// Upper bound on month steps (~100 years). A renewal date further in the
/// past than this is treated as corrupt rather than looped over.
const MAX_MONTH_STEPS: u32 = 1200;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RolloverError {
    #[error("renewal date {0} is too far in the past to roll forward")]
    DateOutOfRange(NaiveDate),
}

/// Advances a stale renewal date by whole calendar months until it lands
/// on or after `today`. A date that is not stale comes back unchanged.
///
/// When the day-of-month does not exist in a target month it is clamped to
/// that month's last day, and the clamped day becomes the basis for any
/// further steps: Jan 31 -> Feb 29 -> Mar 29.
pub fn next_renewal_date(
    renewal_date: NaiveDate,
    today: NaiveDate,
) -> Result<NaiveDate, RolloverError> {
    if renewal_date >= today {
        return Ok(renewal_date);
    }
    let mut date = renewal_date;
    for _ in 0..MAX_MONTH_STEPS {
        date = match add_one_month(date) {
            Some(next) => next,
            None => return Err(RolloverError::DateOutOfRange(renewal_date)),
        };
        if date >= today {
            return Ok(date);
        }
    }
    Err(RolloverError::DateOutOfRange(renewal_date))
}

fn add_one_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year().checked_add(1)?, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    let day = date.day().min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next_first.signed_duration_since(first).num_days() as u32)
}
