//! # sgp4-core
//!
//! Analytical SGP4/SDP4 orbit propagation from two-line element sets.
//!
//! Parses TLEs, initializes a propagation record from the mean elements and
//! produces TEME position and velocity at any time offset from epoch.
//! Orbits with periods of 225 minutes or more pick up lunar-solar
//! perturbations and, near 12- and 24-hour periods, Earth-resonance
//! integration.
//!
//! ```no_run
//! use sgp4_core::{Satrec, Sgp4Options, Tle};
//!
//! let tle = Tle::parse(
//!     "1 25544U 98067A   23054.45075046  .00020310  00000-0  36478-3 0  9992",
//!     "2 25544  51.6417 203.5231 0005102 218.5493 303.0730 15.49367633384651",
//! )?;
//! let mut sat = Satrec::from_tle(&tle, Sgp4Options::default());
//! let state = sat.propagate(90.0)?;
//! println!("r = {:?} km", state.r);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod constants;
pub mod deep_space;
pub mod elements;
pub mod gravity;
pub mod init;
pub mod math;
pub mod propagator;
pub mod satrec;
pub mod time;
pub mod tle;

pub use gravity::{GravityConstants, GravityError, GravityModel};
pub use propagator::{propagate_catalog, StateVector};
pub use satrec::{ElementSet, OpsMode, Resonance, Satrec, Sgp4Error, Sgp4Options};
pub use tle::{Tle, TleError};

#[cfg(feature = "python")]
mod pybridge;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn sgp4_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pybridge::register(m)?;
    Ok(())
}
