//! Discrete block orientations
//!
//! An orientation is a (forward, up) pair of perpendicular axis directions,
//! which yields exactly the 24 rotations of a cube. The engine treats it as
//! opaque; only the reference library decides how a mirrored copy is
//! oriented.

use glam::IVec3;
use serde::{Deserialize, Serialize};

/// One of the six axis-aligned directions in construct-local space
///
/// Forward points down -Z, Up points along +Y, Right along +X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Forward,
        Direction::Backward,
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit vector for this direction
    pub fn vector(self) -> IVec3 {
        match self {
            Direction::Forward => IVec3::NEG_Z,
            Direction::Backward => IVec3::Z,
            Direction::Left => IVec3::NEG_X,
            Direction::Right => IVec3::X,
            Direction::Up => IVec3::Y,
            Direction::Down => IVec3::NEG_Y,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    pub fn is_perpendicular(self, other: Direction) -> bool {
        self.vector().dot(other.vector()) == 0
    }

    /// Reflect across the YZ plane (mirror_x) and/or the XZ plane (mirror_y)
    pub fn reflected(self, mirror_x: bool, mirror_y: bool) -> Direction {
        match self {
            Direction::Left | Direction::Right if mirror_x => self.opposite(),
            Direction::Up | Direction::Down if mirror_y => self.opposite(),
            _ => self,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Rotation of a block, as the directions its local forward and up face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawOrientation", into = "RawOrientation")]
pub struct Orientation {
    forward: Direction,
    up: Direction,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawOrientation {
    forward: Direction,
    up: Direction,
}

impl TryFrom<RawOrientation> for Orientation {
    type Error = String;

    fn try_from(raw: RawOrientation) -> Result<Self, Self::Error> {
        Orientation::new(raw.forward, raw.up).ok_or_else(|| {
            format!(
                "forward ({}) and up ({}) must be perpendicular",
                raw.forward, raw.up
            )
        })
    }
}

impl From<Orientation> for RawOrientation {
    fn from(o: Orientation) -> Self {
        RawOrientation {
            forward: o.forward,
            up: o.up,
        }
    }
}

impl Orientation {
    /// Forward facing -Z, up facing +Y
    pub const IDENTITY: Orientation = Orientation {
        forward: Direction::Forward,
        up: Direction::Up,
    };

    /// Build an orientation; None unless forward and up are perpendicular
    pub fn new(forward: Direction, up: Direction) -> Option<Self> {
        forward
            .is_perpendicular(up)
            .then_some(Self { forward, up })
    }

    pub fn forward(&self) -> Direction {
        self.forward
    }

    pub fn up(&self) -> Direction {
        self.up
    }

    /// All 24 cube rotations
    pub fn all() -> impl Iterator<Item = Orientation> {
        Direction::ALL.into_iter().flat_map(|forward| {
            Direction::ALL
                .into_iter()
                .filter_map(move |up| Orientation::new(forward, up))
        })
    }

    /// Reflect both facing directions across the mirror plane(s)
    ///
    /// This is the geometric mirror of the block's frame. It is not the same
    /// as negating the orientation: a block mirrored across X keeps facing
    /// forward and only swaps left and right.
    pub fn reflected(&self, mirror_x: bool, mirror_y: bool) -> Orientation {
        Orientation {
            forward: self.forward.reflected(mirror_x, mirror_y),
            up: self.up.reflected(mirror_x, mirror_y),
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[Forward: {}, Up: {}]", self.forward, self.up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_exactly_24_orientations() {
        let all: HashSet<Orientation> = Orientation::all().collect();
        assert_eq!(all.len(), 24);
    }

    #[test]
    fn test_new_rejects_parallel_axes() {
        assert!(Orientation::new(Direction::Up, Direction::Up).is_none());
        assert!(Orientation::new(Direction::Up, Direction::Down).is_none());
        assert!(Orientation::new(Direction::Forward, Direction::Left).is_some());
    }

    #[test]
    fn test_reflect_x_keeps_forward() {
        let o = Orientation::new(Direction::Forward, Direction::Right).unwrap();
        let m = o.reflected(true, false);
        assert_eq!(m.forward(), Direction::Forward);
        assert_eq!(m.up(), Direction::Left);
    }

    #[test]
    fn test_reflection_differs_from_negation() {
        // Negating both axes of the identity gives backward/down; the
        // X mirror of the identity is the identity itself.
        let o = Orientation::IDENTITY;
        assert_eq!(o.reflected(true, false), o);
        assert_ne!(
            o.reflected(true, false),
            Orientation::new(Direction::Backward, Direction::Down).unwrap()
        );
    }

    #[test]
    fn test_reflection_is_involution() {
        for o in Orientation::all() {
            for (mx, my) in [(true, false), (false, true), (true, true)] {
                assert_eq!(o.reflected(mx, my).reflected(mx, my), o);
            }
        }
    }

    #[test]
    fn test_serde_validates_perpendicular() {
        let ok: Orientation = toml::from_str("forward = \"backward\"\nup = \"up\"").unwrap();
        assert_eq!(ok.forward(), Direction::Backward);

        let bad: Result<Orientation, _> = toml::from_str("forward = \"up\"\nup = \"down\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Orientation::IDENTITY.to_string(),
            "[Forward: Forward, Up: Up]"
        );
    }
}
