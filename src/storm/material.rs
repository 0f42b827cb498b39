//! Material table
//!
//! Static electrical properties for every paintable material. Conductivity
//! drives neighbor weighting, resistance orders the search frontier.

use super::StormError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    #[default]
    Air,
    Conductor,
    Insulator,
    Ground,
    Cloud,
    #[serde(alias = "semicond")]
    Semiconductor,
}

/// Per-material constants. `color` is only read by renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialProperties {
    pub conductivity: f32,
    pub resistance: f32,
    pub color: (u8, u8, u8),
    pub name: &'static str,
}

const AIR: MaterialProperties = MaterialProperties {
    conductivity: 0.001,
    resistance: 1000.0,
    color: (0x00, 0x11, 0x33),
    name: "Air",
};

const CONDUCTOR: MaterialProperties = MaterialProperties {
    conductivity: 0.95,
    resistance: 0.1,
    color: (0xFF, 0xD7, 0x00),
    name: "Wire/Conductor",
};

const INSULATOR: MaterialProperties = MaterialProperties {
    conductivity: 0.0,
    resistance: 10000.0,
    color: (0x8B, 0x45, 0x13),
    name: "Insulator",
};

const GROUND: MaterialProperties = MaterialProperties {
    conductivity: 1.0,
    resistance: 0.0,
    color: (0x5D, 0x40, 0x37),
    name: "Ground",
};

const CLOUD: MaterialProperties = MaterialProperties {
    conductivity: 0.8,
    resistance: 0.5,
    color: (0x41, 0x69, 0xE1),
    name: "Cloud",
};

const SEMICONDUCTOR: MaterialProperties = MaterialProperties {
    conductivity: 0.3,
    resistance: 10.0,
    color: (0xFF, 0x6B, 0x35),
    name: "Semi-Conductor",
};

impl Material {
    /// Every material, in palette order (keys 1-6 in the front end)
    pub const ALL: [Material; 6] = [
        Material::Air,
        Material::Conductor,
        Material::Insulator,
        Material::Ground,
        Material::Cloud,
        Material::Semiconductor,
    ];

    #[inline]
    pub const fn properties(self) -> &'static MaterialProperties {
        match self {
            Material::Air => &AIR,
            Material::Conductor => &CONDUCTOR,
            Material::Insulator => &INSULATOR,
            Material::Ground => &GROUND,
            Material::Cloud => &CLOUD,
            Material::Semiconductor => &SEMICONDUCTOR,
        }
    }

    #[inline]
    pub fn conductivity(self) -> f32 {
        self.properties().conductivity
    }

    #[inline]
    pub fn resistance(self) -> f32 {
        self.properties().resistance
    }

    /// Brush diameter in cells when painting this material
    pub const fn brush_thickness(self) -> i32 {
        match self {
            Material::Air => 1,
            Material::Conductor | Material::Semiconductor => 2,
            Material::Insulator => 3,
            Material::Ground => 4,
            Material::Cloud => 5,
        }
    }

    /// Protected from `clear`
    #[inline]
    pub const fn is_fixture(self) -> bool {
        matches!(self, Material::Ground | Material::Cloud)
    }

    pub const fn key(self) -> &'static str {
        match self {
            Material::Air => "air",
            Material::Conductor => "conductor",
            Material::Insulator => "insulator",
            Material::Ground => "ground",
            Material::Cloud => "cloud",
            Material::Semiconductor => "semiconductor",
        }
    }

    /// Parse a material key, substituting air for anything unrecognised
    pub fn from_key_or_air(key: &str) -> Self {
        key.parse().unwrap_or_else(|e: StormError| {
            warn!("{}, painting air instead", e);
            Material::Air
        })
    }
}

impl FromStr for Material {
    type Err = StormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "air" => Ok(Material::Air),
            "conductor" | "wire" => Ok(Material::Conductor),
            "insulator" => Ok(Material::Insulator),
            "ground" => Ok(Material::Ground),
            "cloud" => Ok(Material::Cloud),
            "semiconductor" | "semicond" => Ok(Material::Semiconductor),
            _ => Err(StormError::InvalidMaterial(s.to_string())),
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.properties().name)
    }
}
