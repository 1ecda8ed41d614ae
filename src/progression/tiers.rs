//! Static mastery tier table
//!
//! Belts order White through Black, each carrying stripes 0-4. Every step
//! names the cumulative cycle count and quality floors required to hold it;
//! advancement walks these steps strictly one at a time.

use serde::{Deserialize, Serialize};

/// Mastery belts, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Belt {
    White,
    Blue,
    Purple,
    Brown,
    Black,
}

impl Belt {
    pub fn all() -> &'static [Belt] {
        &[Belt::White, Belt::Blue, Belt::Purple, Belt::Brown, Belt::Black]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Belt::White => "White",
            Belt::Blue => "Blue",
            Belt::Purple => "Purple",
            Belt::Brown => "Brown",
            Belt::Black => "Black",
        }
    }

    fn next(&self) -> Option<Belt> {
        match self {
            Belt::White => Some(Belt::Blue),
            Belt::Blue => Some(Belt::Purple),
            Belt::Purple => Some(Belt::Brown),
            Belt::Brown => Some(Belt::Black),
            Belt::Black => None,
        }
    }
}

/// Stripes per belt (0 through STRIPES_PER_BELT - 1)
pub const STRIPES_PER_BELT: u8 = 5;

/// A position on the mastery ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rank {
    pub belt: Belt,
    pub stripe: u8,
}

impl Rank {
    pub fn start() -> Self {
        Self { belt: Belt::White, stripe: 0 }
    }

    /// The next rung up, if any
    pub fn next(&self) -> Option<Rank> {
        if self.stripe + 1 < STRIPES_PER_BELT {
            return Some(Rank { belt: self.belt, stripe: self.stripe + 1 });
        }
        self.belt.next().map(|belt| Rank { belt, stripe: 0 })
    }

    /// Zero-based index on the full ladder
    pub fn ladder_index(&self) -> usize {
        let belt_index = Belt::all()
            .iter()
            .position(|b| *b == self.belt)
            .unwrap_or(0);
        belt_index * STRIPES_PER_BELT as usize + self.stripe as usize
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} belt, {} stripe(s)", self.belt.name(), self.stripe)
    }
}

/// Requirements for holding a rank
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RankRequirement {
    /// Minimum cumulative completed cycles
    pub min_cycles: u32,
    pub min_effectiveness: f32,
    pub min_efficiency: f32,
    pub min_cultural_fit: f32,
    /// Required from Blue upward; None below
    pub min_innovation: Option<f32>,
}

/// Requirement to advance INTO a rank
///
/// Thresholds rise with the ladder; innovation starts gating at Blue.
/// The entry rank (White, 0 stripes) has no requirement.
pub fn requirement_for(rank: Rank) -> RankRequirement {
    let index = rank.ladder_index() as u32;
    let fraction = index as f32 / (Belt::all().len() as f32 * STRIPES_PER_BELT as f32);

    RankRequirement {
        // 3 cycles for the first stripe, growing ~40% per step
        min_cycles: 3 * index * (index + 2) / 2,
        min_effectiveness: (0.30 + 0.55 * fraction).min(0.95),
        min_efficiency: (0.25 + 0.50 * fraction).min(0.90),
        min_cultural_fit: (0.20 + 0.55 * fraction).min(0.90),
        min_innovation: if rank.belt >= Belt::Blue {
            Some((0.25 + 0.45 * fraction).min(0.85))
        } else {
            None
        },
    }
}
