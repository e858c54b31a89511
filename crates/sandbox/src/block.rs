use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

/// Material of a block. Each kind maps to one texture image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Stone,
    Mud,
    Wood,
    Grass,
}

impl BlockKind {
    pub const ALL: [BlockKind; 4] = [Self::Stone, Self::Mud, Self::Wood, Self::Grass];

    pub fn name(self) -> &'static str {
        match self {
            Self::Stone => "stone",
            Self::Mud => "mud",
            Self::Wood => "wood",
            Self::Grass => "grass",
        }
    }

    /// Texture path relative to the asset root.
    pub fn texture_path(self) -> &'static str {
        match self {
            Self::Stone => "textures/stone.jpg",
            Self::Mud => "textures/mud.jpg",
            Self::Wood => "textures/wood.jpg",
            Self::Grass => "textures/grass.jpg",
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for BlockKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown block kind `{s}`"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u64);

/// A unit cube centred on `position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub position: Vec3,
}

impl Block {
    pub const HALF_EXTENT: f32 = 0.5;

    pub fn min(&self) -> Vec3 {
        self.position - Vec3::splat(Self::HALF_EXTENT)
    }

    pub fn max(&self) -> Vec3 {
        self.position + Vec3::splat(Self::HALF_EXTENT)
    }

    pub fn cell(&self) -> IVec3 {
        cell_of(self.position)
    }
}

/// Lattice cell holding a block centre.
///
/// Blocks sit on integer `x`/`z` and half-integer `y`, so a block resting on
/// the ground at `y = 0.5` fills cell `y = 0`.
pub fn cell_of(center: Vec3) -> IVec3 {
    IVec3::new(
        center.x.round() as i32,
        center.y.floor() as i32,
        center.z.round() as i32,
    )
}

/// Centre of the cell containing `point`.
pub fn snap_to_cell(point: Vec3) -> Vec3 {
    Vec3::new(point.x.round(), point.y.floor() + 0.5, point.z.round())
}
