//! SI base units and physical constants.
//!
//! Every physical quantity in Perseid is expressed in this one unit
//! system: a length is a multiple of [`METER`], an energy a multiple of
//! [`JOULE`], and so on. The table is a process-wide immutable set of
//! `const` values; no runtime mutation path exists. Values follow the
//! CODATA 2006 recommendations and IAU 2012/2015 resolutions.

use std::f64::consts::PI;

// SI base units
/// Meter, the base length unit (1 by construction).
pub const METER: f64 = 1.0;
/// Second, the base time unit.
pub const SECOND: f64 = 1.0;
/// Kilogram, the base mass unit.
pub const KILOGRAM: f64 = 1.0;
/// Ampere, the base current unit.
pub const AMPERE: f64 = 1.0;
/// Kelvin, the base temperature unit.
pub const KELVIN: f64 = 1.0;

// derived units
/// Newton.
pub const NEWTON: f64 = KILOGRAM * METER / SECOND / SECOND;
/// Joule.
pub const JOULE: f64 = NEWTON * METER;
/// Tesla.
pub const TESLA: f64 = NEWTON / AMPERE / METER;
/// Volt.
pub const VOLT: f64 = KILOGRAM * METER * METER / AMPERE / SECOND / SECOND / SECOND;
/// Coulomb.
pub const COULOMB: f64 = AMPERE * SECOND;

// physical constants
/// Elementary charge in coulomb.
pub const ELEMENTARY_CHARGE: f64 = 1.602176487e-19 * COULOMB;
/// Speed of light in vacuum, m/s.
pub const C_LIGHT: f64 = 2.99792458e8 * METER / SECOND;
/// Speed of light squared.
pub const C_SQUARED: f64 = C_LIGHT * C_LIGHT;
/// Proton mass, kg.
pub const MASS_PROTON: f64 = 1.67262158e-27 * KILOGRAM;
/// Neutron mass, kg.
pub const MASS_NEUTRON: f64 = 1.67492735e-27 * KILOGRAM;
/// Electron mass, kg.
pub const MASS_ELECTRON: f64 = 9.10938291e-31 * KILOGRAM;
/// Boltzmann constant, J/K.
pub const K_BOLTZMANN: f64 = 1.3806488e-23 * JOULE / KELVIN;

// magnetic field strengths
/// Gauss, in tesla.
pub const GAUSS: f64 = 1e-4 * TESLA;
/// Microgauss.
pub const MICROGAUSS: f64 = 1e-6 * GAUSS;
/// Nanogauss.
pub const NANOGAUSS: f64 = 1e-9 * GAUSS;

// electron volt
/// Electronvolt, in joule.
pub const ELECTRONVOLT: f64 = ELEMENTARY_CHARGE * JOULE;
/// Electronvolt shorthand.
pub const EV: f64 = ELECTRONVOLT;
/// Kiloelectronvolt.
pub const KEV: f64 = 1e3 * ELECTRONVOLT;
/// Megaelectronvolt.
pub const MEV: f64 = 1e6 * ELECTRONVOLT;
/// Gigaelectronvolt.
pub const GEV: f64 = 1e9 * ELECTRONVOLT;
/// Teraelectronvolt.
pub const TEV: f64 = 1e12 * ELECTRONVOLT;
/// Petaelectronvolt.
pub const PEV: f64 = 1e15 * ELECTRONVOLT;
/// Exaelectronvolt.
pub const EEV: f64 = 1e18 * ELECTRONVOLT;

// astronomical distances
/// Astronomical unit, m.
pub const AU: f64 = 149_597_870_700.0 * METER;
/// Parsec, m.
pub const PARSEC: f64 = 648_000.0 / PI * AU;
/// Kiloparsec.
pub const KPC: f64 = 1e3 * PARSEC;
/// Megaparsec.
pub const MPC: f64 = 1e6 * PARSEC;
/// Gigaparsec.
pub const GPC: f64 = 1e9 * PARSEC;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsec_magnitude() {
        assert!((PARSEC / 3.0857e16 - 1.0).abs() < 1e-4);
    }

    #[test]
    fn electronvolt_matches_elementary_charge() {
        assert_eq!(EV, ELEMENTARY_CHARGE);
    }

    #[test]
    fn distance_prefixes() {
        assert_eq!(KPC, 1e3 * PARSEC);
        assert_eq!(MPC, 1e3 * KPC);
        assert_eq!(GPC, 1e3 * MPC);
    }
}
