//! Disaster, terrain, and resource category enums.
//!
//! The per-kind constants here (base spread probability, terrain
//! susceptibility, terrain difficulty) are the static tables of the hazard
//! model.  Tunable multipliers on top of them live in [`crate::config`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

// ── DisasterKind ──────────────────────────────────────────────────────────────

/// The disaster driving a scenario.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisasterKind {
    #[default]
    Earthquake,
    Fire,
    Flood,
    Hurricane,
    Tornado,
}

impl DisasterKind {
    pub const ALL: [DisasterKind; 5] = [
        DisasterKind::Earthquake,
        DisasterKind::Fire,
        DisasterKind::Flood,
        DisasterKind::Hurricane,
        DisasterKind::Tornado,
    ];

    /// Per-neighbour spread probability before terrain, saturation, and
    /// overlay factors are applied.
    pub fn base_spread_prob(self) -> f64 {
        match self {
            DisasterKind::Earthquake => 0.12,
            DisasterKind::Fire       => 0.30,
            DisasterKind::Flood      => 0.25,
            DisasterKind::Hurricane  => 0.20,
            DisasterKind::Tornado    => 0.18,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisasterKind::Earthquake => "earthquake",
            DisasterKind::Fire       => "fire",
            DisasterKind::Flood      => "flood",
            DisasterKind::Hurricane  => "hurricane",
            DisasterKind::Tornado    => "tornado",
        }
    }
}

impl fmt::Display for DisasterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisasterKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DisasterKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::Parse(format!("unknown disaster kind '{s}'")))
    }
}

// ── TerrainKind ───────────────────────────────────────────────────────────────

/// Static land-cover category of a cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainKind {
    Urban,
    #[default]
    Road,
    Bare,
    Vegetation,
    Water,
}

impl TerrainKind {
    pub const ALL: [TerrainKind; 5] = [
        TerrainKind::Urban,
        TerrainKind::Road,
        TerrainKind::Bare,
        TerrainKind::Vegetation,
        TerrainKind::Water,
    ];

    /// How readily a disaster of `kind` spreads into this terrain, in `[0, 1]`.
    ///
    /// | Terrain    | Quake | Fire | Flood | Hurricane | Tornado |
    /// |------------|-------|------|-------|-----------|---------|
    /// | Urban      | 1.0   | 0.8  | 0.6   | 0.9       | 0.9     |
    /// | Road       | 0.8   | 0.4  | 0.8   | 0.7       | 0.8     |
    /// | Bare       | 0.6   | 0.3  | 0.7   | 0.7       | 0.8     |
    /// | Vegetation | 0.4   | 1.0  | 0.5   | 0.8       | 0.7     |
    /// | Water      | 0.2   | 0.0  | 1.0   | 0.8       | 0.5     |
    pub fn susceptibility(self, kind: DisasterKind) -> f64 {
        use DisasterKind as D;
        use TerrainKind as T;
        match (self, kind) {
            (T::Urban, D::Earthquake)      => 1.0,
            (T::Urban, D::Fire)            => 0.8,
            (T::Urban, D::Flood)           => 0.6,
            (T::Urban, D::Hurricane)       => 0.9,
            (T::Urban, D::Tornado)         => 0.9,
            (T::Road, D::Earthquake)       => 0.8,
            (T::Road, D::Fire)             => 0.4,
            (T::Road, D::Flood)            => 0.8,
            (T::Road, D::Hurricane)        => 0.7,
            (T::Road, D::Tornado)          => 0.8,
            (T::Bare, D::Earthquake)       => 0.6,
            (T::Bare, D::Fire)             => 0.3,
            (T::Bare, D::Flood)            => 0.7,
            (T::Bare, D::Hurricane)        => 0.7,
            (T::Bare, D::Tornado)          => 0.8,
            (T::Vegetation, D::Earthquake) => 0.4,
            (T::Vegetation, D::Fire)       => 1.0,
            (T::Vegetation, D::Flood)      => 0.5,
            (T::Vegetation, D::Hurricane)  => 0.8,
            (T::Vegetation, D::Tornado)    => 0.7,
            (T::Water, D::Earthquake)      => 0.2,
            (T::Water, D::Fire)            => 0.0,
            (T::Water, D::Flood)           => 1.0,
            (T::Water, D::Hurricane)       => 0.8,
            (T::Water, D::Tornado)         => 0.5,
        }
    }

    /// Extra movement effort for crossing this terrain, in `[0, 1]`.
    /// Drives energy drain only; it does not enter the planner's cost.
    pub fn difficulty(self) -> f64 {
        match self {
            TerrainKind::Road       => 0.0,
            TerrainKind::Bare       => 0.1,
            TerrainKind::Urban      => 0.2,
            TerrainKind::Vegetation => 0.3,
            TerrainKind::Water      => 0.5,
        }
    }

    /// Single-letter code used in compact text dumps.
    pub fn as_char(self) -> char {
        match self {
            TerrainKind::Urban      => 'U',
            TerrainKind::Road       => 'R',
            TerrainKind::Bare       => 'B',
            TerrainKind::Vegetation => 'V',
            TerrainKind::Water      => 'W',
        }
    }
}

impl fmt::Display for TerrainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TerrainKind::Urban      => "urban",
            TerrainKind::Road       => "road",
            TerrainKind::Bare       => "bare",
            TerrainKind::Vegetation => "vegetation",
            TerrainKind::Water      => "water",
        };
        f.write_str(s)
    }
}

// ── ResourceKind ──────────────────────────────────────────────────────────────

/// Equipment the rescue agent can pick up and spend on rescues.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Ambulance,
    FireTruck,
    Boat,
    Helicopter,
    MedicalSupplies,
    HeavyMachinery,
    EmergencyShelter,
}

impl ResourceKind {
    /// `true` if this kind is the specialised equipment for `disaster`.
    /// Holding one raises the rescue success bonus.
    pub fn is_preferred_for(self, disaster: DisasterKind) -> bool {
        use DisasterKind as D;
        use ResourceKind as R;
        matches!(
            (self, disaster),
            (R::HeavyMachinery, D::Earthquake)
                | (R::Ambulance, D::Earthquake)
                | (R::FireTruck, D::Fire)
                | (R::Boat, D::Flood)
                | (R::Helicopter, D::Flood)
                | (R::Helicopter, D::Hurricane)
                | (R::EmergencyShelter, D::Hurricane)
                | (R::HeavyMachinery, D::Tornado)
        )
    }

    /// Cache mix placed on the map for a scenario of `disaster`:
    /// `(kind, number of caches)`.
    pub fn cache_mix(disaster: DisasterKind) -> &'static [(ResourceKind, u32)] {
        use ResourceKind as R;
        match disaster {
            DisasterKind::Earthquake => &[(R::Ambulance, 3), (R::MedicalSupplies, 4), (R::HeavyMachinery, 1)],
            DisasterKind::Fire       => &[(R::FireTruck, 4), (R::MedicalSupplies, 3), (R::Helicopter, 1)],
            DisasterKind::Flood      => &[(R::Boat, 3), (R::Helicopter, 2), (R::MedicalSupplies, 4)],
            DisasterKind::Hurricane  => &[(R::Helicopter, 3), (R::MedicalSupplies, 5), (R::EmergencyShelter, 2)],
            DisasterKind::Tornado    => &[(R::MedicalSupplies, 4), (R::Ambulance, 2), (R::HeavyMachinery, 1)],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Ambulance        => "ambulance",
            ResourceKind::FireTruck        => "fire_truck",
            ResourceKind::Boat             => "boat",
            ResourceKind::Helicopter       => "helicopter",
            ResourceKind::MedicalSupplies  => "medical_supplies",
            ResourceKind::HeavyMachinery   => "heavy_machinery",
            ResourceKind::EmergencyShelter => "emergency_shelter",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
