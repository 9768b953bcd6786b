//! Profile completion percentage.
//!
//! Essential fields carry 80 points split evenly, optional fields the
//! remaining 20. Computed from saved values only; in-progress edits never
//! move the number.

use crate::record::UserRecord;

/// Fields a usable account must have. Worth 80 points together.
const ESSENTIAL: usize = 10;

/// Fields that round the profile out. Worth 20 points together.
const OPTIONAL: usize = 8;

fn essential_filled(record: &UserRecord) -> usize {
    let p = &record.profile;
    [
        record.first_name.as_str(),
        record.last_name.as_str(),
        record.email.as_str(),
        record.phone.as_deref().unwrap_or(""),
        p.region.as_str(),
        p.city.as_str(),
        p.district.as_str(),
        p.postal_code.as_str(),
        p.property_type.as_str(),
        p.property_ownership.as_str(),
    ]
    .iter()
    .filter(|v| !v.trim().is_empty())
    .count()
}

fn optional_filled(record: &UserRecord) -> usize {
    let p = &record.profile;
    [
        p.street.as_str(),
        p.roof_size.as_str(),
        p.electricity_bill.as_str(),
        p.employment_status.as_str(),
        p.employer.as_str(),
        p.job_title.as_str(),
        p.monthly_income.as_str(),
        p.preferred_language.as_str(),
    ]
    .iter()
    .filter(|v| !v.trim().is_empty())
    .count()
}

/// Completion percentage in `0..=100`.
///
/// Proportional within each bucket, truncating division. Every essential
/// field filled and no optional ones is exactly 80; everything filled is 100.
pub fn completion(record: &UserRecord) -> u8 {
    let essential = 80 * essential_filled(record) / ESSENTIAL;
    let optional = 20 * optional_filled(record) / OPTIONAL;
    (essential + optional) as u8
}
