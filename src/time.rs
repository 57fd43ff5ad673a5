//! Julian dates, calendar conversion and Greenwich sidereal time.
//!
//! The calendar routines use the Julian leap rule (`year % 4 == 0`). That is
//! only correct between 1901 and 2099, which covers every epoch an element set
//! can encode (1957–2056); keeping the simple rule preserves bit-compatibility
//! with reference propagation outputs.

use serde::{Deserialize, Serialize};

use crate::constants::*;

const MONTH_DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A broken-down calendar instant (UT).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

impl Calendar {
    /// Seconds elapsed since the start of the day.
    pub fn seconds_of_day(&self) -> f64 {
        self.hour as f64 * 3600.0 + self.minute as f64 * 60.0 + self.second
    }

    /// Julian date of this instant as a `(whole, fraction)` pair.
    pub fn julian_date(&self) -> (f64, f64) {
        julian_date(self.year, self.month, self.day, self.hour, self.minute, self.second)
    }
}

/// Julian date split into a day number ending in .5 and a day fraction.
///
/// Any whole days in the fraction are carried into the day number, so the
/// returned fraction always satisfies `|jd_frac| <= 1`.
pub fn julian_date(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> (f64, f64) {
    let year = year as f64;
    let month = month as f64;

    let mut jd = 367.0 * year - (7.0 * (year + ((month + 9.0) / 12.0).floor()) * 0.25).floor()
        + (275.0 * month / 9.0).floor()
        + day as f64
        + 1_721_013.5;
    let mut jd_frac = (second + minute as f64 * 60.0 + hour as f64 * 3600.0) / 86_400.0;

    if jd_frac.abs() > 1.0 {
        let carry = jd_frac.floor();
        jd += carry;
        jd_frac -= carry;
    }

    (jd, jd_frac)
}

fn is_leap(year: i32) -> bool {
    year % 4 == 0
}

/// Month, day and time of day from a fractional day-of-year (1.0 = Jan 1 00:00).
pub fn calendar_from_day_of_year(year: i32, days: f64) -> Calendar {
    let mut month_days = MONTH_DAYS;
    if is_leap(year) {
        month_days[1] = 29;
    }

    let day_of_year = days.floor();
    let mut month = 1usize;
    let mut elapsed = 0.0;
    while month < 12 && day_of_year > elapsed + month_days[month - 1] as f64 {
        elapsed += month_days[month - 1] as f64;
        month += 1;
    }
    let day = (day_of_year - elapsed) as u32;

    let mut temp = (days - day_of_year) * 24.0;
    let hour = temp.floor();
    temp = (temp - hour) * 60.0;
    let minute = temp.floor();
    let second = (temp - minute) * 60.0;

    Calendar {
        year,
        month: month as u32,
        day,
        hour: hour as u32,
        minute: minute as u32,
        second,
    }
}

/// Calendar instant from a Julian date split into whole and fractional parts.
pub fn inverse_julian_date(jd: f64, jd_frac: f64) -> Calendar {
    let mut jd = jd;
    let mut jd_frac = jd_frac;

    if jd_frac.abs() >= 1.0 {
        let carry = jd_frac.floor();
        jd += carry;
        jd_frac -= carry;
    }

    // Move any fraction of a day hiding in `jd` over to `jd_frac`.
    let dt = jd - jd.floor() - 0.5;
    if dt.abs() > 1.0e-8 {
        jd -= dt;
        jd_frac += dt;
    }

    let temp = jd - 2_415_019.5;
    let mut year = 1900 + (temp / 365.25).floor() as i32;
    let mut leap_years = ((year - 1901) as f64 * 0.25).floor();
    let mut days = (temp - ((year - 1900) as f64 * 365.0 + leap_years)).floor();

    if days + jd_frac < 1.0 {
        year -= 1;
        leap_years = ((year - 1901) as f64 * 0.25).floor();
        days = (temp - ((year - 1900) as f64 * 365.0 + leap_years)).floor();
    }

    calendar_from_day_of_year(year, days + jd_frac)
}

/// Day of year (1.0 = Jan 1 00:00) of a Julian date.
pub fn day_of_year(jd: f64, jd_frac: f64) -> f64 {
    let cal = inverse_julian_date(jd, jd_frac);
    let (jan0, _) = julian_date(cal.year, 1, 0, 0, 0, 0.0);
    (jd - jan0) + jd_frac
}

/// Greenwich mean sidereal time (rad, `[0, 2π)`) for a UT1 Julian date.
pub fn greenwich_sidereal_time(jd_ut1: f64) -> f64 {
    let tut1 = (jd_ut1 - JD_J2000) / DAYS_PER_CENTURY;
    let seconds = -6.2e-6 * tut1 * tut1 * tut1
        + 0.093_104 * tut1 * tut1
        + (876_600.0 * 3600.0 + 8_640_184.812_866) * tut1
        + 67_310.548_41;

    // 360° / 86400 s = 1/240 °/s
    let mut gst = (seconds * DEG2RAD / 240.0) % TAU;
    if gst < 0.0 {
        gst += TAU;
    }
    gst
}

/// Sidereal time (rad) from the AFSPC closed form referenced to 1970.
///
/// `epoch` is days since 1949-12-31 00:00 UT, the SGP4 internal epoch.
pub fn legacy_sidereal_time(epoch: f64) -> f64 {
    const C1: f64 = 1.720_279_169_407_036_39e-2;
    const THGR70: f64 = 1.732_134_385_650_937_4;
    const FK5R: f64 = 5.075_514_194_322_694_42e-15;

    let ts70 = epoch - 7305.0;
    let ds70 = (ts70 + 1.0e-8).floor();
    let tfrac = ts70 - ds70;
    let c1p2p = C1 + TAU;

    let mut gst = (THGR70 + C1 * ds70 + c1p2p * tfrac + ts70 * ts70 * FK5R) % TAU;
    if gst < 0.0 {
        gst += TAU;
    }
    gst
}
