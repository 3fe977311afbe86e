//! Eco tip rotation

use chrono::{Datelike, NaiveDate};

pub const ECO_TIPS: [&str; 10] = [
    "Carry a reusable bottle and refill instead of buying plastic.",
    "Keep separate bins for dry and wet waste to boost recycling quality.",
    "Say no to single-use cutlery - travel with a compact reusable set.",
    "Compost your kitchen scraps to cut methane from landfills.",
    "Buy in bulk and choose minimal packaging to reduce waste.",
    "Fix and reuse glass jars as storage containers.",
    "Switch to rechargeable batteries to cut e-waste.",
    "Donate old electronics to certified e-waste recyclers.",
    "Bring your own shopping bag - avoid plastic carry bags.",
    "Use cloth towels instead of paper for everyday cleaning.",
];

/// Tip for a calendar day, indexed by the proleptic Gregorian day number.
/// Returns an empty string for an empty list.
pub fn tip_for<'a>(date: NaiveDate, tips: &[&'a str]) -> &'a str {
    if tips.is_empty() {
        return "";
    }
    let day = date.num_days_from_ce().rem_euclid(tips.len() as i32) as usize;
    tips[day]
}

pub fn tip_of_the_day(date: NaiveDate) -> &'static str {
    tip_for(date, &ECO_TIPS)
}
