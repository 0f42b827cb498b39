//! Slider-controlled simulation parameters

use super::StormError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Discharge strength at or above which insulators break down
pub const BREAKDOWN_THRESHOLD: f32 = 15.0;

pub const DISCHARGE_RANGE: (f32, f32) = (1.0, 20.0);
pub const RANDOMNESS_RANGE: (f32, f32) = (0.0, 100.0);
pub const MAX_BURN_TRAIL: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StormParams {
    /// 1-20; drives strike probability, extra strikes and breakdown
    pub discharge_strength: f32,
    /// 0-1; minimum conductivity a secondary arc will jump to
    pub conductivity_threshold: f32,
    /// 0-100 percent of random jitter added to neighbor weights
    pub arc_randomness: f32,
    /// Ticks a burned cell stays lit
    pub burn_trail_duration: u32,
}

impl Default for StormParams {
    fn default() -> Self {
        Self {
            discharge_strength: 10.0,
            conductivity_threshold: 0.5,
            arc_randomness: 30.0,
            burn_trail_duration: 50,
        }
    }
}

/// The four numeric controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    DischargeStrength,
    ConductivityThreshold,
    ArcRandomness,
    BurnTrailDuration,
}

impl FromStr for Parameter {
    type Err = StormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dischargeStrength" | "discharge_strength" => Ok(Parameter::DischargeStrength),
            "conductivityThreshold" | "conductivity_threshold" => {
                Ok(Parameter::ConductivityThreshold)
            },
            "arcRandomness" | "arc_randomness" => Ok(Parameter::ArcRandomness),
            "burnTrailDuration" | "burn_trail_duration" | "burnTrails" => {
                Ok(Parameter::BurnTrailDuration)
            },
            other => Err(StormError::UnknownParameter(other.to_string())),
        }
    }
}

impl StormParams {
    /// Set one parameter, clamping to its slider range
    pub fn set(&mut self, param: Parameter, value: f32) {
        let value = if value.is_finite() { value } else { 0.0 };
        match param {
            Parameter::DischargeStrength => {
                self.discharge_strength = value.clamp(DISCHARGE_RANGE.0, DISCHARGE_RANGE.1);
            },
            Parameter::ConductivityThreshold => {
                self.conductivity_threshold = value.clamp(0.0, 1.0);
            },
            Parameter::ArcRandomness => {
                self.arc_randomness = value.clamp(RANDOMNESS_RANGE.0, RANDOMNESS_RANGE.1);
            },
            Parameter::BurnTrailDuration => {
                self.burn_trail_duration = value.round().clamp(0.0, MAX_BURN_TRAIL as f32) as u32;
            },
        }
    }

    pub fn get(&self, param: Parameter) -> f32 {
        match param {
            Parameter::DischargeStrength => self.discharge_strength,
            Parameter::ConductivityThreshold => self.conductivity_threshold,
            Parameter::ArcRandomness => self.arc_randomness,
            Parameter::BurnTrailDuration => self.burn_trail_duration as f32,
        }
    }

    /// Insulators become traversable under high enough voltage
    #[inline]
    pub fn breaks_down_insulators(&self) -> bool {
        self.discharge_strength >= BREAKDOWN_THRESHOLD
    }

    /// Clamp every field into range (for values read from config files)
    pub fn sanitized(mut self) -> Self {
        for param in [
            Parameter::DischargeStrength,
            Parameter::ConductivityThreshold,
            Parameter::ArcRandomness,
            Parameter::BurnTrailDuration,
        ] {
            let v = self.get(param);
            self.set(param, v);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_names() {
        assert_eq!("dischargeStrength".parse(), Ok(Parameter::DischargeStrength));
        assert_eq!("arc_randomness".parse(), Ok(Parameter::ArcRandomness));
        assert_eq!("burnTrails".parse(), Ok(Parameter::BurnTrailDuration));
        assert!(matches!(
            "voltage".parse::<Parameter>(),
            Err(StormError::UnknownParameter(_))
        ));
    }

    #[test]
    fn test_set_clamps_to_slider_range() {
        let mut p = StormParams::default();
        p.set(Parameter::DischargeStrength, 99.0);
        assert_eq!(p.discharge_strength, 20.0);
        p.set(Parameter::DischargeStrength, -3.0);
        assert_eq!(p.discharge_strength, 1.0);
        p.set(Parameter::ConductivityThreshold, 1.5);
        assert_eq!(p.conductivity_threshold, 1.0);
        p.set(Parameter::ArcRandomness, f32::NAN);
        assert_eq!(p.arc_randomness, 0.0);
        p.set(Parameter::BurnTrailDuration, 42.6);
        assert_eq!(p.burn_trail_duration, 43);
    }

    #[test]
    fn test_breakdown_threshold_inclusive() {
        let mut p = StormParams::default();
        p.set(Parameter::DischargeStrength, 14.9);
        assert!(!p.breaks_down_insulators());
        p.set(Parameter::DischargeStrength, 15.0);
        assert!(p.breaks_down_insulators());
    }
}
