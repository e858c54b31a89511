use blockrun_runner::{GameState, ObstacleId, RunnerEvent};
use blockrun_sandbox::{BlockKind, Sandbox};
use glam::Vec3;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

/// What a scene object depicts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObjectKind {
    Agent,
    Obstacle,
    Block(BlockKind),
    /// Square ground plane of the given edge length.
    Ground { size: f32, texture: BlockKind },
}

impl ObjectKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Obstacle => "obstacle",
            Self::Block(kind) => kind.name(),
            Self::Ground { .. } => "ground",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneObject {
    pub kind: ObjectKind,
    pub position: Vec3,
}

/// Flat scene graph: the set of things a renderer draws this frame.
///
/// BTreeMap keeps draw order stable (insertion order, since ids only grow).
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: BTreeMap<ObjectId, SceneObject>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, object);
        id
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        self.objects.remove(&id)
    }

    /// Move an object. Returns false if it does not exist.
    pub fn set_position(&mut self, id: ObjectId, position: Vec3) -> bool {
        match self.objects.get_mut(&id) {
            Some(obj) => {
                obj.position = position;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ObjectId, &SceneObject)> {
        self.objects.iter()
    }

    pub fn count_of(&self, pred: impl Fn(&ObjectKind) -> bool) -> usize {
        self.objects.values().filter(|o| pred(&o.kind)).count()
    }

    /// Scene for the voxel sandbox: ground plus one object per block.
    pub fn from_sandbox(sandbox: &Sandbox) -> Self {
        let mut scene = Self::new();
        scene.sync_sandbox(sandbox);
        scene
    }

    /// Replace the contents with the sandbox's current ground and blocks.
    pub fn sync_sandbox(&mut self, sandbox: &Sandbox) {
        self.clear();
        self.add(SceneObject {
            kind: ObjectKind::Ground {
                size: sandbox.ground_size(),
                texture: BlockKind::Mud,
            },
            position: Vec3::ZERO,
        });
        for block in sandbox.blocks().values() {
            self.add(SceneObject {
                kind: ObjectKind::Block(block.kind),
                position: block.position,
            });
        }
    }
}

/// Runner scene kept in step with a [`GameState`].
///
/// Obstacle objects are added and removed from the runner's drained events;
/// positions are refreshed from the state each frame.
#[derive(Debug, Clone)]
pub struct RunnerScene {
    scene: Scene,
    agent: ObjectId,
    obstacles: HashMap<ObstacleId, ObjectId>,
}

impl RunnerScene {
    pub fn new(state: &GameState) -> Self {
        let mut scene = Scene::new();
        scene.add(SceneObject {
            kind: ObjectKind::Ground {
                size: state.config().lane_half_width * 2.0 + 2.0,
                texture: BlockKind::Stone,
            },
            position: Vec3::ZERO,
        });
        let agent = scene.add(SceneObject {
            kind: ObjectKind::Agent,
            position: state.agent().position,
        });
        let mut this = Self {
            scene,
            agent,
            obstacles: HashMap::new(),
        };
        for o in state.obstacles() {
            this.add_obstacle(o.id, o.position);
        }
        this
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn obstacle_objects(&self) -> usize {
        self.obstacles.len()
    }

    /// Mirror obstacle lifetimes from drained runner events.
    pub fn apply(&mut self, events: &[RunnerEvent]) {
        for event in events {
            match event {
                RunnerEvent::ObstacleSpawned { id, position } => self.add_obstacle(*id, *position),
                RunnerEvent::ObstacleDespawned { id } => {
                    if let Some(obj) = self.obstacles.remove(id) {
                        self.scene.remove(obj);
                    }
                }
                RunnerEvent::Reset => {
                    for (_, obj) in self.obstacles.drain() {
                        self.scene.remove(obj);
                    }
                }
                _ => {}
            }
        }
    }

    /// Copy current agent and obstacle positions into the scene.
    pub fn refresh(&mut self, state: &GameState) {
        self.scene.set_position(self.agent, state.agent().position);
        for o in state.obstacles() {
            match self.obstacles.get(&o.id) {
                Some(obj) => {
                    self.scene.set_position(*obj, o.position);
                }
                None => {
                    tracing::warn!(id = o.id.0, "obstacle missing from scene, adding");
                    self.add_obstacle(o.id, o.position);
                }
            }
        }
    }

    fn add_obstacle(&mut self, id: ObstacleId, position: Vec3) {
        let obj = self.scene.add(SceneObject {
            kind: ObjectKind::Obstacle,
            position,
        });
        self.obstacles.insert(id, obj);
    }
}
