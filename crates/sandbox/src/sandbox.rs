use crate::block::{Block, BlockId, BlockKind, cell_of, snap_to_cell};
use crate::picking::{self, Hit};
use blockrun_common::{PerspectiveCamera, SandboxConfig, WindowSize, pixel_to_ndc};
use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Pointer buttons the sandbox reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Places the selected block.
    Primary,
    /// Opens and closes the inventory.
    Secondary,
}

/// Record of every sandbox mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SandboxEvent {
    Placed {
        id: BlockId,
        kind: BlockKind,
        position: Vec3,
    },
    InventoryToggled { open: bool },
    Selected { kind: BlockKind },
}

/// Reasons a placement request did not add a block.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlaceError {
    #[error("no block kind selected")]
    NothingSelected,
    #[error("pointer does not hit any surface")]
    NoSurface,
    #[error("cell {0} is already occupied")]
    Occupied(IVec3),
}

/// The voxel sandbox world plus its camera and inventory state.
#[derive(Debug, Clone)]
pub struct Sandbox {
    blocks: BTreeMap<BlockId, Block>,
    occupied: HashMap<IVec3, BlockId>,
    next_id: u64,
    selected: Option<BlockKind>,
    inventory_open: bool,
    camera: PerspectiveCamera,
    window: WindowSize,
    ground_half_size: f32,
    look_sensitivity: f32,
    zoom_step: f32,
    event_log: Vec<SandboxEvent>,
}

impl Sandbox {
    /// Empty sandbox with the camera placed per `config`.
    pub fn empty(config: &SandboxConfig, window: WindowSize) -> Self {
        let mut camera = PerspectiveCamera::new(config.fov_degrees, window.aspect(), 0.1, 1000.0);
        camera.position = Vec3::from_array(config.camera_position);
        Self {
            blocks: BTreeMap::new(),
            occupied: HashMap::new(),
            next_id: 0,
            selected: None,
            inventory_open: false,
            camera,
            window,
            ground_half_size: config.ground_size * 0.5,
            look_sensitivity: config.look_sensitivity,
            zoom_step: config.zoom_step,
            event_log: Vec::new(),
        }
    }

    /// Sandbox seeded with three starter blocks in a row so the scene is not empty.
    pub fn new(config: &SandboxConfig, window: WindowSize) -> Self {
        let mut sandbox = Self::empty(config, window);
        for (x, kind) in [
            (0.0, BlockKind::Stone),
            (1.0, BlockKind::Wood),
            (-1.0, BlockKind::Grass),
        ] {
            let position = Vec3::new(x, 0.5, 0.0);
            sandbox.insert(cell_of(position), position, kind);
        }
        sandbox.event_log.clear();
        sandbox
    }

    pub fn blocks(&self) -> &BTreeMap<BlockId, Block> {
        &self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn block_at(&self, cell: IVec3) -> Option<&Block> {
        self.occupied.get(&cell).and_then(|id| self.blocks.get(id))
    }

    pub fn selected(&self) -> Option<BlockKind> {
        self.selected
    }

    pub fn is_inventory_open(&self) -> bool {
        self.inventory_open
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn window(&self) -> WindowSize {
        self.window
    }

    /// Edge length of the ground square.
    pub fn ground_size(&self) -> f32 {
        self.ground_half_size * 2.0
    }

    pub fn events(&self) -> &[SandboxEvent] {
        &self.event_log
    }

    pub fn drain_events(&mut self) -> Vec<SandboxEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Add a block centred at `position`.
    pub fn add_block(&mut self, position: Vec3, kind: BlockKind) -> Result<BlockId, PlaceError> {
        let cell = cell_of(position);
        if self.occupied.contains_key(&cell) {
            return Err(PlaceError::Occupied(cell));
        }
        Ok(self.insert(cell, position, kind))
    }

    /// Callers guarantee `cell` is free.
    fn insert(&mut self, cell: IVec3, position: Vec3, kind: BlockKind) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        self.blocks.insert(id, Block { kind, position });
        self.occupied.insert(cell, id);
        self.event_log.push(SandboxEvent::Placed { id, kind, position });
        tracing::debug!(id = id.0, %kind, ?position, "block placed");
        id
    }

    /// Choose the kind to place. Closes the inventory.
    pub fn select(&mut self, kind: BlockKind) {
        self.selected = Some(kind);
        self.inventory_open = false;
        self.event_log.push(SandboxEvent::Selected { kind });
    }

    pub fn toggle_inventory(&mut self) -> bool {
        self.inventory_open = !self.inventory_open;
        self.event_log.push(SandboxEvent::InventoryToggled {
            open: self.inventory_open,
        });
        self.inventory_open
    }

    /// Closest surface under the pointer at window pixel `(px, py)`.
    pub fn pick(&self, px: f32, py: f32) -> Option<Hit> {
        let ndc = pixel_to_ndc(
            px,
            py,
            self.window.width as f32,
            self.window.height as f32,
        );
        let ray = self.camera.ray_from_ndc(ndc);
        picking::pick(&ray, &self.blocks, self.ground_half_size)
    }

    /// Place the selected kind against the face under the pointer.
    pub fn place_at_pointer(&mut self, px: f32, py: f32) -> Result<BlockId, PlaceError> {
        let kind = self.selected.ok_or(PlaceError::NothingSelected)?;
        let hit = self.pick(px, py).ok_or(PlaceError::NoSurface)?;
        let position = snap_to_cell(hit.point + hit.normal * Block::HALF_EXTENT);
        self.add_block(position, kind)
    }

    /// Pointer press. Secondary toggles the inventory; primary places a block
    /// when a kind is selected. Rejected placements are logged and dropped.
    pub fn pointer_down(&mut self, button: PointerButton, px: f32, py: f32) {
        match button {
            PointerButton::Secondary => {
                self.toggle_inventory();
            }
            PointerButton::Primary => {
                if self.selected.is_none() {
                    return;
                }
                if let Err(err) = self.place_at_pointer(px, py) {
                    tracing::debug!(%err, px, py, "placement rejected");
                }
            }
        }
    }

    /// Relative pointer motion. Rotates the camera while the primary button
    /// is held.
    pub fn pointer_move(&mut self, dx: f32, dy: f32, primary_held: bool) {
        if !primary_held {
            return;
        }
        self.camera.rotation.y -= dx * self.look_sensitivity;
        self.camera.rotation.x -= dy * self.look_sensitivity;
    }

    /// Wheel scroll. Only the sign of `delta_y` matters.
    pub fn wheel(&mut self, delta_y: f32) {
        let step = if delta_y > 0.0 {
            1.0
        } else if delta_y < 0.0 {
            -1.0
        } else {
            0.0
        };
        self.camera.position.z += step * self.zoom_step;
    }

    pub fn resize(&mut self, window: WindowSize) {
        self.window = window;
        self.camera.set_aspect(window.aspect());
    }
}
