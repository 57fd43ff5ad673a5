//! Two-Line Element (TLE) set parser.
//!
//! Parses the fixed-column NORAD/Space-Track format (2-line and 3-line with
//! name), including Alpha-5 catalog numbers, and converts the result into the
//! working units the propagator is initialized from.
//!
//! # TLE Format Reference
//! ```text
//! Line 0 (optional): Satellite Name (up to 24 chars)
//! Line 1: 1 NNNNNC NNNNNAAA NNNNN.NNNNNNNN +.NNNNNNNN +NNNNN-N +NNNNN-N N NNNNN
//! Line 2: 2 NNNNN NNN.NNNN NNN.NNNN NNNNNNN NNN.NNNN NNN.NNNN NN.NNNNNNNNNNNNNN
//! ```
//!
//! # Example
//! ```
//! use sgp4_core::tle::Tle;
//!
//! let line1 = "1 25544U 98067A   24001.50000000  .00016717  00000-0  10270-3 0  9009";
//! let line2 = "2 25544  51.6400 208.5000 0007417  68.0000 292.1000 15.49560000400004";
//!
//! let tle = Tle::parse(line1, line2).unwrap();
//! assert_eq!(tle.norad_id, 25544);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::satrec::ElementSet;
use crate::time::{calendar_from_day_of_year, julian_date};

/// TLE parsing errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TleError {
    #[error("Line 1 must start with '1', got '{0}'")]
    InvalidLine1Start(char),

    #[error("Line 2 must start with '2', got '{0}'")]
    InvalidLine2Start(char),

    #[error("Line {line} is too short: need {required} characters, got {actual}")]
    LineTooShort {
        line: u8,
        required: usize,
        actual: usize,
    },

    #[error("Line {0} contains non-ASCII characters")]
    NonAscii(u8),

    #[error("Catalog numbers don't match between lines: {0} vs {1}")]
    CatalogMismatch(String, String),

    #[error("Checksum failed on line {line}: expected {expected}, computed {computed}")]
    ChecksumFailed {
        line: u8,
        expected: u8,
        computed: u8,
    },

    #[error("Failed to parse field '{field}': {source}")]
    ParseField {
        field: &'static str,
        source: std::num::ParseFloatError,
    },

    #[error("Failed to parse integer field '{field}': {source}")]
    ParseIntField {
        field: &'static str,
        source: std::num::ParseIntError,
    },

    #[error("Failed to parse implied-decimal field '{0}'")]
    ImpliedDecimal(String),

    #[error("Invalid catalog number '{0}'")]
    InvalidCatalog(String),

    #[error("No TLEs found in input")]
    Empty,
}

/// A parsed Two-Line Element set, in element-set units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tle {
    /// Satellite name (from line 0, if present).
    pub name: Option<String>,
    /// Catalog number exactly as written (may be Alpha-5, e.g. "J1234").
    pub satnum: String,
    /// Numeric catalog number (Alpha-5 decoded).
    pub norad_id: u32,
    /// Classification (U=unclassified, C=classified, S=secret).
    pub classification: char,
    /// International designator (launch year, launch number, piece).
    pub intl_designator: String,
    /// Epoch year (full 4-digit year).
    pub epoch_year: i32,
    /// Epoch day of year (fractional, 1.0 = Jan 1 00:00 UT).
    pub epoch_day: f64,
    /// First derivative of mean motion / 2 (rev/day²).
    pub mean_motion_dot: f64,
    /// Second derivative of mean motion / 6 (rev/day³).
    pub mean_motion_ddot: f64,
    /// B* drag term (1/Earth radii).
    pub bstar: f64,
    /// Ephemeris type (usually 0).
    pub ephemeris_type: u8,
    /// Element set number.
    pub element_set: u16,
    /// Inclination (degrees).
    pub inclination_deg: f64,
    /// Right ascension of ascending node (degrees).
    pub raan_deg: f64,
    /// Eccentricity (dimensionless).
    pub eccentricity: f64,
    /// Argument of perigee (degrees).
    pub arg_perigee_deg: f64,
    /// Mean anomaly (degrees).
    pub mean_anomaly_deg: f64,
    /// Mean motion (revolutions per day).
    pub mean_motion_rev_day: f64,
    /// Revolution number at epoch.
    pub rev_number: u32,
}

impl Tle {
    /// Parse a TLE from two lines (without satellite name), verifying checksums.
    pub fn parse(line1: &str, line2: &str) -> Result<Self, TleError> {
        Self::parse_inner(None, line1, line2, true)
    }

    /// Parse a TLE from three lines (with satellite name on line 0).
    pub fn parse_3line(line0: &str, line1: &str, line2: &str) -> Result<Self, TleError> {
        let name = line0.trim().trim_start_matches("0 ").to_string();
        Self::parse_inner(Some(name), line1, line2, true)
    }

    /// Parse without checksum verification.
    ///
    /// Lines only need to reach the end of the mean-motion field (column 63).
    pub fn parse_lenient(line1: &str, line2: &str) -> Result<Self, TleError> {
        Self::parse_inner(None, line1, line2, false)
    }

    fn parse_inner(
        name: Option<String>,
        line1: &str,
        line2: &str,
        verify_checksum: bool,
    ) -> Result<Self, TleError> {
        let line1 = line1.trim_end();
        let line2 = line2.trim_end();

        if !line1.is_ascii() {
            return Err(TleError::NonAscii(1));
        }
        if !line2.is_ascii() {
            return Err(TleError::NonAscii(2));
        }

        // Lenient lines need to reach B* on line 1 and mean motion on line 2
        let (required1, required2) = if verify_checksum { (69, 69) } else { (61, 63) };
        if line1.len() < required1 {
            return Err(TleError::LineTooShort { line: 1, required: required1, actual: line1.len() });
        }
        if line2.len() < required2 {
            return Err(TleError::LineTooShort { line: 2, required: required2, actual: line2.len() });
        }

        // Pad so optional trailing fields can be sliced uniformly
        let l1 = format!("{:<69}", line1);
        let l2 = format!("{:<69}", line2);

        let c1 = l1.as_bytes()[0] as char;
        let c2 = l2.as_bytes()[0] as char;
        if c1 != '1' {
            return Err(TleError::InvalidLine1Start(c1));
        }
        if c2 != '2' {
            return Err(TleError::InvalidLine2Start(c2));
        }

        if verify_checksum {
            verify_line_checksum(1, &l1)?;
            verify_line_checksum(2, &l2)?;
        }

        // ── Parse Line 1 ──
        let satnum = l1[2..7].trim().to_string();
        let satnum_2 = l2[2..7].trim();
        if satnum != satnum_2 {
            return Err(TleError::CatalogMismatch(satnum, satnum_2.to_string()));
        }
        let norad_id = decode_alpha5(&satnum)?;

        let classification = l1.as_bytes()[7] as char;
        let intl_designator = l1[9..17].trim().to_string();

        let epoch_year_2d = l1[18..20].trim().parse::<i32>().map_err(|e| TleError::ParseIntField {
            field: "epoch_year",
            source: e,
        })?;
        let epoch_year = if epoch_year_2d < 57 {
            2000 + epoch_year_2d
        } else {
            1900 + epoch_year_2d
        };

        let epoch_day = parse_float(&l1[20..32], "epoch_day")?;
        let mean_motion_dot = parse_float(&l1[33..43], "mean_motion_dot")?;
        let mean_motion_ddot = parse_implied_decimal(&l1[44..52])?;
        let bstar = parse_implied_decimal(&l1[53..61])?;

        let ephemeris_type = l1[62..63].trim().parse::<u8>().unwrap_or(0);
        let element_set = l1[64..68].trim().parse::<u16>().unwrap_or(0);

        // ── Parse Line 2 ──
        let inclination_deg = parse_float(&l2[8..16], "inclination")?;
        let raan_deg = parse_float(&l2[17..25], "raan")?;

        // Eccentricity has implied leading decimal point
        let eccentricity = parse_float(&format!("0.{}", l2[26..33].trim()), "eccentricity")?;

        let arg_perigee_deg = parse_float(&l2[34..42], "arg_perigee")?;
        let mean_anomaly_deg = parse_float(&l2[43..51], "mean_anomaly")?;
        let mean_motion_rev_day = parse_float(&l2[52..63], "mean_motion")?;
        let rev_number = l2[63..68].trim().parse::<u32>().unwrap_or(0);

        Ok(Tle {
            name,
            satnum,
            norad_id,
            classification,
            intl_designator,
            epoch_year,
            epoch_day,
            mean_motion_dot,
            mean_motion_ddot,
            bstar,
            ephemeris_type,
            element_set,
            inclination_deg,
            raan_deg,
            eccentricity,
            arg_perigee_deg,
            mean_anomaly_deg,
            mean_motion_rev_day,
            rev_number,
        })
    }

    /// Parse a string containing multiple TLEs (2-line or 3-line format).
    ///
    /// Handles mixed formats: lines starting with '1' begin a 2-line TLE,
    /// other non-empty lines are treated as satellite names (line 0).
    pub fn parse_batch(input: &str) -> Result<Vec<Self>, TleError> {
        let lines: Vec<&str> = input
            .lines()
            .map(|l| l.trim_end())
            .filter(|l| !l.is_empty())
            .collect();

        if lines.is_empty() {
            return Err(TleError::Empty);
        }

        let mut tles = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
                tles.push(Tle::parse(lines[i], lines[i + 1])?);
                i += 2;
            } else if i + 2 < lines.len()
                && lines[i + 1].starts_with("1 ")
                && lines[i + 2].starts_with("2 ")
            {
                tles.push(Tle::parse_3line(lines[i], lines[i + 1], lines[i + 2])?);
                i += 3;
            } else {
                i += 1;
            }
        }

        if tles.is_empty() {
            return Err(TleError::Empty);
        }

        Ok(tles)
    }

    /// Epoch as a Julian date split into `(day number, day fraction)`.
    pub fn epoch_jd(&self) -> (f64, f64) {
        let cal = calendar_from_day_of_year(self.epoch_year, self.epoch_day);
        julian_date(cal.year, cal.month, cal.day, cal.hour, cal.minute, cal.second)
    }

    /// Orbital period (minutes), from the Kozai mean motion.
    pub fn period_minutes(&self) -> f64 {
        MINUTES_PER_DAY / self.mean_motion_rev_day
    }

    /// Elements converted to propagator working units (radians, minutes).
    pub fn to_element_set(&self) -> ElementSet {
        let (epoch_jd, epoch_jd_frac) = self.epoch_jd();
        ElementSet {
            satnum: self.satnum.clone(),
            epoch_jd,
            epoch_jd_frac,
            bstar: self.bstar,
            ndot: self.mean_motion_dot / (XPDOTP * MINUTES_PER_DAY),
            nddot: self.mean_motion_ddot / (XPDOTP * MINUTES_PER_DAY * MINUTES_PER_DAY),
            ecco: self.eccentricity,
            argpo: self.arg_perigee_deg * DEG2RAD,
            inclo: self.inclination_deg * DEG2RAD,
            mo: self.mean_anomaly_deg * DEG2RAD,
            no_kozai: self.mean_motion_rev_day / XPDOTP,
            nodeo: self.raan_deg * DEG2RAD,
        }
    }
}

impl std::fmt::Display for Tle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (NORAD {}), epoch {}/{:.8}, {:.4}° inc, {:.7} ecc, {:.8} rev/day",
            self.name.as_deref().unwrap_or("UNKNOWN"),
            self.satnum,
            self.epoch_year,
            self.epoch_day,
            self.inclination_deg,
            self.eccentricity,
            self.mean_motion_rev_day,
        )
    }
}

/// Decode a catalog number, expanding a leading Alpha-5 letter.
///
/// The letter maps to `(letter - 'A') + 10`, which replaces the first digit,
/// so "J1234" becomes 191234. Plain digits parse as-is.
pub fn decode_alpha5(satnum: &str) -> Result<u32, TleError> {
    let invalid = || TleError::InvalidCatalog(satnum.to_string());

    let mut chars = satnum.chars();
    let first = chars.next().ok_or_else(invalid)?;
    let rest = chars.as_str();

    if first.is_ascii_alphabetic() {
        if rest.len() != 4 || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let prefix = (first.to_ascii_uppercase() as u32 - 'A' as u32) + 10;
        let digits = rest.parse::<u32>().map_err(|_| invalid())?;
        Ok(prefix * 10_000 + digits)
    } else {
        satnum.parse::<u32>().map_err(|_| invalid())
    }
}

fn parse_float(s: &str, field: &'static str) -> Result<f64, TleError> {
    s.trim()
        .parse::<f64>()
        .map_err(|e| TleError::ParseField { field, source: e })
}

/// Parse the TLE "implied decimal" format: " NNNNN-N" → float.
///
/// Examples: " 16538-4" → 0.16538e-4, "-11606-4" → -0.11606e-4
fn parse_implied_decimal(s: &str) -> Result<f64, TleError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0.0);
    }

    // Exponent sign is the last + or - that isn't the leading sign
    let exp_pos = s
        .bytes()
        .enumerate()
        .skip(1)
        .filter(|&(_, b)| b == b'+' || b == b'-')
        .map(|(i, _)| i)
        .last();

    let (mantissa, exponent) = match exp_pos {
        Some(pos) => (&s[..pos], &s[pos..]),
        None => (s, "+0"),
    };

    let sign = if mantissa.starts_with('-') { "-" } else { "" };
    let digits = mantissa.trim_start_matches(['+', '-', ' ']);
    let full = format!("{}0.{}e{}", sign, digits, exponent);
    full.parse::<f64>()
        .map_err(|_| TleError::ImpliedDecimal(s.to_string()))
}

fn verify_line_checksum(line: u8, text: &str) -> Result<(), TleError> {
    let expected = match text.as_bytes()[68] {
        b @ b'0'..=b'9' => b - b'0',
        _ => 0,
    };
    let computed = compute_checksum(&text[..68]);
    if expected != computed {
        return Err(TleError::ChecksumFailed {
            line,
            expected,
            computed,
        });
    }
    Ok(())
}

/// Compute TLE checksum (mod-10 of sum of digits, '-' counts as 1).
pub fn compute_checksum(line: &str) -> u8 {
    let sum: u32 = line
        .bytes()
        .map(|b| match b {
            b'0'..=b'9' => (b - b'0') as u32,
            b'-' => 1,
            _ => 0,
        })
        .sum();
    (sum % 10) as u8
}
