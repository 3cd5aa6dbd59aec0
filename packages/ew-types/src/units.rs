//! Typed scalar wrappers for the RF chain.
//!
//! Distinct newtypes prevent the classic "mixed up dBm and dB" class of bug;
//! each carries just the conversions its unit actually needs.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

macro_rules! scalar_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
        pub struct $name(pub f64);

        impl $name {
            pub fn value(self) -> f64 {
                self.0
            }
        }

        impl From<f64> for $name {
            fn from(v: f64) -> Self {
                $name(v)
            }
        }

        impl Add for $name {
            type Output = $name;
            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = $name;
            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }
    };
}

scalar_newtype!(Hz);
scalar_newtype!(Db);
scalar_newtype!(Dbi);
scalar_newtype!(Dbm);
scalar_newtype!(Degrees);

impl Hz {
    pub fn from_mhz(mhz: f64) -> Hz {
        Hz(mhz * 1.0e6)
    }

    pub fn from_ghz(ghz: f64) -> Hz {
        Hz(ghz * 1.0e9)
    }

    pub fn mhz(self) -> f64 {
        self.0 / 1.0e6
    }

    pub fn ghz(self) -> f64 {
        self.0 / 1.0e9
    }

    /// Wavelength in meters for this frequency, using c = 299_792_458 m/s.
    pub fn wavelength_m(self) -> f64 {
        299_792_458.0 / self.0
    }
}

impl Dbm {
    /// Convert dBm to linear milliwatts.
    pub fn to_mw(self) -> f64 {
        10f64.powf(self.0 / 10.0)
    }

    pub fn from_mw(mw: f64) -> Dbm {
        Dbm(10.0 * mw.max(1e-300).log10())
    }
}

impl Degrees {
    pub fn normalized_0_360(self) -> Degrees {
        let mut v = self.0 % 360.0;
        if v < 0.0 {
            v += 360.0;
        }
        Degrees(v)
    }

    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }
}
