//! Voxel sandbox: place textured unit blocks on a ground plane by pointing at
//! existing faces, pick the block kind from an inventory, look around with the
//! pointer and dolly with the wheel.
//!
//! # Invariants
//! - Blocks never overlap; each occupies one lattice cell.
//! - Placement only happens with a block kind selected.
//! - Every mutation produces a [`SandboxEvent`].

pub mod block;
pub mod picking;
pub mod sandbox;

pub use block::{Block, BlockId, BlockKind};
pub use picking::{Hit, HitTarget};
pub use sandbox::{PlaceError, PointerButton, Sandbox, SandboxEvent};

pub fn crate_info() -> &'static str {
    "blockrun-sandbox v0.1.0"
}
