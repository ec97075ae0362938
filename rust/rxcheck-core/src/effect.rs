//! The effect lattice.
//!
//! Effect levels are ordered from most to least restrictive:
//!
//! ```text
//! Pure < ShallowReactive < Reactive < Unrestricted
//! ```
//!
//! `a.leq(b)` holds when a callee at level `a` may be used wherever level `b`
//! is in force. `join` picks the less restrictive level and has `Pure` as its
//! identity; `meet` picks the more restrictive one and has `Unrestricted` as
//! its identity.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EffectLevel {
    /// No externally observable mutation at all.
    Pure,
    /// Reactive, but callees are not checked transitively.
    ShallowReactive,
    /// Reactive: may only call reactive code.
    Reactive,
    /// No restriction. The default for unannotated code.
    #[default]
    Unrestricted,
}

impl EffectLevel {
    /// Position in the lattice, 0 being the bottom.
    pub const fn rank(self) -> u8 {
        match self {
            EffectLevel::Pure => 0,
            EffectLevel::ShallowReactive => 1,
            EffectLevel::Reactive => 2,
            EffectLevel::Unrestricted => 3,
        }
    }

    pub const BOTTOM: EffectLevel = EffectLevel::Pure;
    pub const TOP: EffectLevel = EffectLevel::Unrestricted;

    /// True if `self` is at least as restrictive as `other`.
    pub fn leq(self, other: EffectLevel) -> bool {
        self.rank() <= other.rank()
    }

    /// The least restrictive of the two levels.
    pub fn join(self, other: EffectLevel) -> EffectLevel {
        if self.rank() >= other.rank() {
            self
        } else {
            other
        }
    }

    /// The most restrictive of the two levels.
    pub fn meet(self, other: EffectLevel) -> EffectLevel {
        if self.rank() <= other.rank() {
            self
        } else {
            other
        }
    }

    /// Join of any number of levels; `Pure` for none.
    pub fn join_all<I: IntoIterator<Item = EffectLevel>>(levels: I) -> EffectLevel {
        levels.into_iter().fold(EffectLevel::BOTTOM, EffectLevel::join)
    }
}
