use minicraft_blocks::BlockRegistry;
use minicraft_geom::Vec3;
use minicraft_world::VoxelAccess;

/// Body sample points relative to the feet position: a ring at the feet, one
/// below, a ring at chest height and one above the head. Order matters, since
/// each correction moves the body before the next point is tested.
pub const COLLISION_POINTS: [Vec3; 10] = [
    Vec3::new(0.3, 0.0, 0.0),
    Vec3::new(-0.3, 0.0, 0.0),
    Vec3::new(0.0, 0.0, 0.3),
    Vec3::new(0.0, 0.0, -0.3),
    Vec3::new(0.0, -0.5, 0.0),
    Vec3::new(0.3, 1.0, 0.0),
    Vec3::new(-0.3, 1.0, 0.0),
    Vec3::new(0.0, 1.0, 0.3),
    Vec3::new(0.0, 1.0, -0.3),
    Vec3::new(0.0, 1.5, 0.0),
];

/// Push `position` out of every colliding cell a sample point lands in.
///
/// A point only corrects the axes it is offset along; the two purely vertical
/// points correct Y. Corrections snap the point to the nearest cell boundary
/// and accumulate across points.
pub fn resolve<W>(mut position: Vec3, world: &W, reg: &BlockRegistry) -> Vec3
where
    W: VoxelAccess + ?Sized,
{
    for offset in COLLISION_POINTS {
        let sample = position + offset + Vec3::HALF;
        let Some(id) = world.block_at(sample.floor_to_cell()) else {
            continue;
        };
        if !reg.flags(id).collides() {
            continue;
        }
        if offset.x != 0.0 {
            position.x += sample.x.round() - sample.x;
        }
        if offset.z != 0.0 {
            position.z += sample.z.round() - sample.z;
        }
        if offset.x == 0.0 && offset.z == 0.0 {
            position.y += sample.y.round() - sample.y;
        }
    }
    position
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashMap;
    use minicraft_geom::IVec3;

    fn reg() -> BlockRegistry {
        BlockRegistry::builtin().unwrap()
    }

    #[test]
    fn free_space_leaves_position_alone() {
        let world: HashMap<IVec3, u16> = HashMap::new();
        let p = Vec3::new(3.2, 7.9, -1.4);
        assert_eq!(resolve(p, &world, &reg()), p);
    }

    #[test]
    fn wall_on_positive_x_pushes_back() {
        let reg = reg();
        let stone = reg.id_by_name("stone").unwrap();
        let mut world: HashMap<IVec3, u16> = HashMap::new();
        world.insert(IVec3::new(1, 0, 0), stone);
        // Right ring point at x = 0.4 + 0.3 + 0.5 = 1.2, inside cell 1.
        let out = resolve(Vec3::new(0.4, 0.0, 0.0), &world, &reg);
        assert!((out.x - 0.2).abs() < 1e-5, "{out:?}");
        assert_eq!(out.y, 0.0);
        assert_eq!(out.z, 0.0);
    }

    #[test]
    fn floor_lifts_feet_to_resting_height() {
        let reg = reg();
        let stone = reg.id_by_name("stone").unwrap();
        let mut world: HashMap<IVec3, u16> = HashMap::new();
        world.insert(IVec3::new(0, 0, 0), stone);
        let out = resolve(Vec3::new(0.0, 0.8, 0.0), &world, &reg);
        assert!((out.y - 1.0).abs() < 1e-5, "{out:?}");
    }

    #[test]
    fn wall_and_floor_corrections_combine() {
        let reg = reg();
        let stone = reg.id_by_name("stone").unwrap();
        let mut world: HashMap<IVec3, u16> = HashMap::new();
        world.insert(IVec3::new(0, 0, 0), stone);
        world.insert(IVec3::new(1, 1, 0), stone);
        // Right ring point hits the wall, the foot point hits the floor.
        let out = resolve(Vec3::new(0.4, 0.8, 0.0), &world, &reg);
        assert!((out.x - 0.2).abs() < 1e-5, "{out:?}");
        assert!((out.y - 1.0).abs() < 1e-5, "{out:?}");
        assert_eq!(out.z, 0.0);
    }

    #[test]
    fn later_points_sample_the_corrected_position() {
        let reg = reg();
        let stone = reg.id_by_name("stone").unwrap();
        let mut world: HashMap<IVec3, u16> = HashMap::new();
        world.insert(IVec3::new(1, 0, 0), stone);
        world.insert(IVec3::new(1, 0, 1), stone);
        // From the start position the +Z point lands in (1, 0, 1), but the
        // +X point runs first and pulls the body back to x = 0.2, so the +Z
        // point then samples the open cell (0, 0, 1) and Z stays put.
        let out = resolve(Vec3::new(0.6, 0.0, 0.4), &world, &reg);
        assert!((out.x - 0.2).abs() < 1e-5, "{out:?}");
        assert_eq!(out.y, 0.0);
        assert!((out.z - 0.4).abs() < 1e-6, "{out:?}");
    }

    #[test]
    fn table_has_two_vertical_points() {
        let vertical = COLLISION_POINTS
            .iter()
            .filter(|p| p.x == 0.0 && p.z == 0.0)
            .count();
        assert_eq!(vertical, 2);
    }
}
