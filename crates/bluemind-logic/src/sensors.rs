//! Buoy sensor reading generator.
//!
//! Produces hourly readings with diurnal and seasonal cycles plus
//! Gaussian measurement noise. The random source is injected so a seeded
//! generator reproduces the exact same series. Readings are auxiliary
//! data for consumers and never feed the population model.
//!
//! ```
//! use bluemind_logic::sensors::{SensorGenerator, SensorSite};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut a = SensorGenerator::new(SensorSite::default(), StdRng::seed_from_u64(7));
//! let mut b = SensorGenerator::new(SensorSite::default(), StdRng::seed_from_u64(7));
//! assert_eq!(a.next_reading(), b.next_reading());
//! ```

use std::f64::consts::TAU;

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Fixed description of where a buoy sits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSite {
    pub base_temperature: f64,
    pub base_salinity: f64,
    /// Depth in metres; temperature drops 0.05 °C per metre.
    pub depth: f64,
}

impl Default for SensorSite {
    fn default() -> Self {
        Self {
            base_temperature: 20.0,
            base_salinity: 35.0,
            depth: 0.0,
        }
    }
}

impl SensorSite {
    /// Site whose base temperature follows the latitude band: tropical
    /// below 23.5°, subtropical below 40°, temperate below 60°, else polar.
    pub fn at_latitude(latitude: f64, depth: f64) -> Self {
        let lat = latitude.abs();
        let base_temperature = if lat < 23.5 {
            27.0
        } else if lat < 40.0 {
            22.0
        } else if lat < 60.0 {
            15.0
        } else {
            5.0
        };
        Self {
            base_temperature,
            depth,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Hours since the generator started.
    pub hour: u64,
    pub temperature: f64,
    pub salinity: f64,
    pub ph: f64,
    pub dissolved_oxygen: f64,
    pub turbidity: f64,
    pub nitrate: f64,
    pub phosphate: f64,
    pub silicate: f64,
    pub phytoplankton_count: f64,
    pub bacteria_count: f64,
}

/// Oceanographic events that distort a single reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorEvent {
    AlgalBloom,
    Upwelling,
    Storm,
    Pollution,
}

impl SensorEvent {
    pub fn apply(self, reading: &mut SensorReading) {
        match self {
            Self::AlgalBloom => {
                reading.phytoplankton_count *= 5.0;
                reading.turbidity *= 3.0;
                reading.dissolved_oxygen *= 1.5;
                reading.ph += 0.2;
            }
            Self::Upwelling => {
                reading.temperature -= 5.0;
                reading.nitrate *= 3.0;
                reading.phosphate *= 2.5;
                reading.phytoplankton_count *= 2.0;
            }
            Self::Storm => {
                reading.turbidity *= 4.0;
                reading.dissolved_oxygen *= 1.3;
                reading.temperature -= 2.0;
            }
            Self::Pollution => {
                reading.ph -= 0.3;
                reading.dissolved_oxygen *= 0.6;
                reading.turbidity *= 2.0;
                reading.bacteria_count *= 3.0;
            }
        }
    }
}

/// Standard deviation of the measurement noise on each channel.
mod noise {
    pub const TEMPERATURE: f64 = 0.3;
    pub const SALINITY: f64 = 0.2;
    pub const PH: f64 = 0.05;
    pub const DISSOLVED_OXYGEN: f64 = 0.3;
    pub const TURBIDITY: f64 = 0.3;
    pub const NITRATE: f64 = 1.0;
    pub const PHOSPHATE: f64 = 0.3;
    pub const SILICATE: f64 = 1.5;
    pub const PHYTOPLANKTON: f64 = 200.0;
    pub const BACTERIA: f64 = 800.0;
}

pub struct SensorGenerator<R: Rng> {
    site: SensorSite,
    rng: R,
    hour: u64,
}

impl<R: Rng> SensorGenerator<R> {
    pub fn new(site: SensorSite, rng: R) -> Self {
        Self { site, rng, hour: 0 }
    }

    pub fn site(&self) -> &SensorSite {
        &self.site
    }

    /// Produce the reading for the current hour and advance one hour.
    pub fn next_reading(&mut self) -> SensorReading {
        let hour_of_day = (self.hour % 24) as f64;
        let day_of_year = ((self.hour / 24) % 365) as f64;

        let diurnal = 2.0 * (TAU * hour_of_day / 24.0).sin();
        let seasonal = 5.0 * (TAU * day_of_year / 365.0).sin();
        let temperature = self.site.base_temperature + diurnal + seasonal - 0.05 * self.site.depth
            + self.noise(noise::TEMPERATURE);

        let salinity = self.site.base_salinity + self.noise(noise::SALINITY);
        let ph = 8.1 + 0.1 * (TAU * hour_of_day / 24.0).sin() + self.noise(noise::PH);

        let night_cycle = (TAU * (hour_of_day + 12.0) / 24.0).sin();
        let dissolved_oxygen = (10.0 - (temperature - 20.0) * 0.2
            + night_cycle
            + self.noise(noise::DISSOLVED_OXYGEN))
        .max(4.0);

        let turbidity = (1.5 + self.noise(noise::TURBIDITY)).max(0.1);
        let nitrate = (5.0 + self.noise(noise::NITRATE)).max(0.0);
        let phosphate = (1.5 + self.noise(noise::PHOSPHATE)).max(0.0);
        let silicate = (8.0 + self.noise(noise::SILICATE)).max(0.0);

        let daylight = (6.0..=18.0).contains(&hour_of_day);
        let phyto_base = if daylight { 1500.0 } else { 800.0 };
        let phytoplankton_count = (phyto_base + self.noise(noise::PHYTOPLANKTON)).max(0.0);
        let bacteria_count = (5000.0 + self.noise(noise::BACTERIA)).max(0.0);

        let reading = SensorReading {
            hour: self.hour,
            temperature,
            salinity,
            ph,
            dissolved_oxygen,
            turbidity,
            nitrate,
            phosphate,
            silicate,
            phytoplankton_count,
            bacteria_count,
        };
        self.hour += 1;
        reading
    }

    /// A reading with `event` applied on top.
    pub fn reading_with_event(&mut self, event: SensorEvent) -> SensorReading {
        let mut reading = self.next_reading();
        event.apply(&mut reading);
        reading
    }

    /// Zero-mean Gaussian sample scaled to `std_dev`.
    fn noise(&mut self, std_dev: f64) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        std_dev * z
    }
}
