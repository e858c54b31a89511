use crate::block::{Block, BlockId};
use blockrun_common::Ray;
use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Block(BlockId),
    Ground,
}

/// Closest intersection of a pick ray with the sandbox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub target: HitTarget,
    /// Distance along the ray.
    pub distance: f32,
    pub point: Vec3,
    /// Outward normal of the face that was hit.
    pub normal: Vec3,
}

/// Slab test against an axis-aligned box. Returns entry distance and face normal.
///
/// Rays starting inside the box report no hit, so picking never selects the
/// block the camera is embedded in.
pub fn ray_box(ray: &Ray, min: Vec3, max: Vec3) -> Option<(f32, Vec3)> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    let mut normal = Vec3::ZERO;

    for axis in 0..3 {
        let o = ray.origin[axis];
        let d = ray.direction[axis];
        if d.abs() < f32::EPSILON {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let mut t0 = (min[axis] - o) / d;
        let mut t1 = (max[axis] - o) / d;
        // Entering through the min face means the face points toward -axis.
        let mut sign = -1.0;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
            sign = 1.0;
        }
        if t0 > t_near {
            t_near = t0;
            normal = Vec3::ZERO;
            normal[axis] = sign;
        }
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }

    if t_near < 0.0 {
        return None;
    }
    Some((t_near, normal))
}

/// Intersection with the upward-facing ground square centred on the origin.
/// The plane is one-sided: rays from below pass through.
pub fn ray_ground(ray: &Ray, half_size: f32) -> Option<(f32, Vec3)> {
    if ray.direction.y >= 0.0 || ray.origin.y <= 0.0 {
        return None;
    }
    let t = -ray.origin.y / ray.direction.y;
    let p = ray.at(t);
    if p.x.abs() > half_size || p.z.abs() > half_size {
        return None;
    }
    Some((t, Vec3::Y))
}

/// Nearest hit among `blocks` and the ground.
pub fn pick<'a>(
    ray: &Ray,
    blocks: impl IntoIterator<Item = (&'a BlockId, &'a Block)>,
    ground_half_size: f32,
) -> Option<Hit> {
    let mut best: Option<Hit> = None;
    let mut consider = |target: HitTarget, (distance, normal): (f32, Vec3)| {
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(Hit {
                target,
                distance,
                point: ray.at(distance),
                normal,
            });
        }
    };

    for (id, block) in blocks {
        if let Some(hit) = ray_box(ray, block.min(), block.max()) {
            consider(HitTarget::Block(*id), hit);
        }
    }
    if let Some(hit) = ray_ground(ray, ground_half_size) {
        consider(HitTarget::Ground, hit);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;
    use approx::assert_relative_eq;
    use std::collections::BTreeMap;

    fn unit_block(x: f32, y: f32, z: f32) -> Block {
        Block {
            kind: BlockKind::Stone,
            position: Vec3::new(x, y, z),
        }
    }

    #[test]
    fn box_hit_from_above_reports_top_face() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        let b = unit_block(0.0, 0.5, 0.0);
        let (t, n) = ray_box(&ray, b.min(), b.max()).unwrap();
        assert_relative_eq!(t, 4.0);
        assert_eq!(n, Vec3::Y);
    }

    #[test]
    fn box_hit_from_side_reports_side_face() {
        let ray = Ray::new(Vec3::new(5.0, 0.5, 0.0), Vec3::NEG_X);
        let b = unit_block(0.0, 0.5, 0.0);
        let (t, n) = ray_box(&ray, b.min(), b.max()).unwrap();
        assert_relative_eq!(t, 4.5);
        assert_eq!(n, Vec3::X);
    }

    #[test]
    fn box_miss_and_behind() {
        let b = unit_block(0.0, 0.5, 0.0);
        let miss = Ray::new(Vec3::new(3.0, 5.0, 0.0), Vec3::NEG_Y);
        assert!(ray_box(&miss, b.min(), b.max()).is_none());
        let behind = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::Y);
        assert!(ray_box(&behind, b.min(), b.max()).is_none());
    }

    #[test]
    fn ground_is_finite_and_one_sided() {
        let down = Ray::new(Vec3::new(1.0, 2.0, 1.0), Vec3::NEG_Y);
        let (t, n) = ray_ground(&down, 50.0).unwrap();
        assert_relative_eq!(t, 2.0);
        assert_eq!(n, Vec3::Y);

        let off_edge = Ray::new(Vec3::new(80.0, 2.0, 0.0), Vec3::NEG_Y);
        assert!(ray_ground(&off_edge, 50.0).is_none());

        let from_below = Ray::new(Vec3::new(0.0, -2.0, 0.0), Vec3::Y);
        assert!(ray_ground(&from_below, 50.0).is_none());
    }

    #[test]
    fn pick_prefers_the_nearest_target() {
        let mut blocks = BTreeMap::new();
        blocks.insert(BlockId(0), unit_block(0.0, 0.5, 0.0));
        blocks.insert(BlockId(1), unit_block(0.0, 1.5, 0.0));
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y);

        let hit = pick(&ray, &blocks, 50.0).unwrap();
        assert_eq!(hit.target, HitTarget::Block(BlockId(1)));
        assert_relative_eq!(hit.point.y, 2.0);
    }

    #[test]
    fn pick_falls_back_to_ground() {
        let blocks: BTreeMap<BlockId, Block> = BTreeMap::new();
        let ray = Ray::new(Vec3::new(4.0, 10.0, 4.0), Vec3::NEG_Y);
        let hit = pick(&ray, &blocks, 50.0).unwrap();
        assert_eq!(hit.target, HitTarget::Ground);
        assert_relative_eq!(hit.point.y, 0.0);
    }
}
