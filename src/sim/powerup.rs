//! Power-up table
//!
//! Charges are earned at streak milestones and spent with a single key.

use serde::{Deserialize, Serialize};

/// Power-up kinds (also the stable ids)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    /// Adds seconds to the round clock
    TimeBoost,
    /// Grows the target
    SizeBoost,
    /// Pins the target in place for a short window
    FreezeMovement,
}

impl PowerUpKind {
    /// All power-ups in tray order
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::TimeBoost,
        PowerUpKind::SizeBoost,
        PowerUpKind::FreezeMovement,
    ];

    /// Number of power-up kinds
    pub const COUNT: usize = Self::ALL.len();

    pub fn id(&self) -> &'static str {
        match self {
            PowerUpKind::TimeBoost => "time_boost",
            PowerUpKind::SizeBoost => "size_boost",
            PowerUpKind::FreezeMovement => "freeze_movement",
        }
    }

    /// Input token that activates this power-up
    pub fn key(&self) -> &'static str {
        match self {
            PowerUpKind::TimeBoost => "1",
            PowerUpKind::SizeBoost => "2",
            PowerUpKind::FreezeMovement => "3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::TimeBoost => "Time +2s",
            PowerUpKind::SizeBoost => "Grow +10",
            PowerUpKind::FreezeMovement => "Freeze 1s",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PowerUpKind::TimeBoost => "Adds 2 seconds to the timer.",
            PowerUpKind::SizeBoost => "Temporarily makes the target larger.",
            PowerUpKind::FreezeMovement => "Stops target movement for 1 second.",
        }
    }

    /// One charge is granted each time the streak reaches a multiple of this
    pub fn award_every(&self) -> u32 {
        match self {
            PowerUpKind::TimeBoost => 5,
            PowerUpKind::SizeBoost => 10,
            PowerUpKind::FreezeMovement => 15,
        }
    }

    /// Whether reaching `streak` grants a charge of this power-up
    pub fn awards_at(&self, streak: u32) -> bool {
        streak > 0 && streak % self.award_every() == 0
    }

    /// Short text shown in the tray under the power-up
    pub fn hint(&self, charges: u32) -> String {
        if charges > 0 {
            format!("Ready: press {}", self.key())
        } else {
            format!("Unlock: streak {}", self.award_every())
        }
    }

    /// Look up the power-up bound to an input token
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    #[inline]
    fn index(&self) -> usize {
        match self {
            PowerUpKind::TimeBoost => 0,
            PowerUpKind::SizeBoost => 1,
            PowerUpKind::FreezeMovement => 2,
        }
    }
}

/// Available charges per power-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PowerUpCharges {
    counts: [u32; PowerUpKind::COUNT],
}

impl PowerUpCharges {
    pub fn get(&self, kind: PowerUpKind) -> u32 {
        self.counts[kind.index()]
    }

    pub fn grant(&mut self, kind: PowerUpKind) {
        self.counts[kind.index()] += 1;
    }

    /// Spend one charge; false (and no change) when none are available
    pub fn consume(&mut self, kind: PowerUpKind) -> bool {
        let count = &mut self.counts[kind.index()];
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// (kind, charges) pairs in tray order
    pub fn iter(&self) -> impl Iterator<Item = (PowerUpKind, u32)> + '_ {
        PowerUpKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }
}
