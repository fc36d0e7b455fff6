//! Symmetric embeddings of a production's left-hand side.
//!
//! A triangular pattern has three rotations that map candidate roles onto
//! each other. Productions list the orientations they accept; anything else
//! is rejected before validation starts.

use serde::{Deserialize, Serialize};

use crate::grammar_error::GrammarError;

/// Cyclic rotation of a three-role pattern (group C₃).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Roles are taken in enumeration order.
    #[default]
    Identity,
    /// Enumeration starts at the second role.
    Rotate1,
    /// Enumeration starts at the third role.
    Rotate2,
}

impl Orientation {
    pub const ALL: [Orientation; 3] = [
        Orientation::Identity,
        Orientation::Rotate1,
        Orientation::Rotate2,
    ];

    /// Number of positions the enumeration is shifted by.
    #[inline]
    pub const fn shift(self) -> usize {
        match self {
            Orientation::Identity => 0,
            Orientation::Rotate1 => 1,
            Orientation::Rotate2 => 2,
        }
    }

    /// Rotate `roles` left by [`Orientation::shift`].
    pub fn apply<T: Copy>(self, roles: [T; 3]) -> [T; 3] {
        let k = self.shift();
        [roles[k % 3], roles[(k + 1) % 3], roles[(k + 2) % 3]]
    }

    /// Group law: applying `self` then `other`.
    #[inline]
    pub fn compose(self, other: Orientation) -> Orientation {
        Orientation::ALL[(self.shift() + other.shift()) % 3]
    }

    #[inline]
    pub fn inverse(self) -> Orientation {
        Orientation::ALL[(3 - self.shift()) % 3]
    }
}

impl TryFrom<u8> for Orientation {
    type Error = GrammarError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Orientation::ALL
            .get(usize::from(raw))
            .copied()
            .ok_or(GrammarError::UnknownOrientation(raw))
    }
}

impl From<Orientation> for u8 {
    fn from(o: Orientation) -> u8 {
        o.shift() as u8
    }
}
