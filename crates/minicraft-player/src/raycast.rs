//! Pick rays through the block grid. Pure geometry; callers decide which
//! cells count as hits.

use minicraft_geom::{IVec3, Vec3};

use crate::config::RayMode;

fn unit_or_none(dir: Vec3) -> Option<Vec3> {
    let len = dir.length();
    if !(len > 1e-6) || !len.is_finite() {
        return None;
    }
    Some(dir / len)
}

/// Fixed-step ray march. Samples `origin + dir * step * k` for
/// `k = 1..=floor(max_distance / step)`, floors each sample to a cell and
/// drops consecutive repeats.
#[derive(Clone, Debug)]
pub struct RayMarch {
    origin: Vec3,
    dir: Vec3,
    step: f32,
    k: u32,
    steps: u32,
    last: Option<IVec3>,
}

impl RayMarch {
    pub fn new(origin: Vec3, dir: Vec3, max_distance: f32, step: f32) -> Self {
        let (dir, steps) = match unit_or_none(dir) {
            Some(d) if step > 0.0 && max_distance > 0.0 => {
                let n = (max_distance / step).floor();
                (d, if n.is_finite() { n as u32 } else { 0 })
            }
            _ => (Vec3::ZERO, 0),
        };
        Self {
            origin,
            dir,
            step,
            k: 0,
            steps,
            last: None,
        }
    }
}

impl Iterator for RayMarch {
    type Item = IVec3;

    fn next(&mut self) -> Option<IVec3> {
        while self.k < self.steps {
            self.k += 1;
            let p = self.origin + self.dir * (self.step * self.k as f32);
            let cell = p.floor_to_cell();
            if self.last != Some(cell) {
                self.last = Some(cell);
                return Some(cell);
            }
        }
        None
    }
}

#[inline]
fn inv_or_max(v: f32) -> f32 {
    if v.abs() < 1e-8 { f32::MAX } else { 1.0 / v.abs() }
}

#[inline]
fn axis_setup(o: f32, d: f32) -> (i32, f32, f32) {
    let step = if d > 0.0 {
        1
    } else if d < 0.0 {
        -1
    } else {
        0
    };
    let inv = inv_or_max(d);
    let frac = o - o.floor();
    let (t_max, t_delta) = match step {
        1 => ((1.0 - frac) * inv, inv),
        -1 => (frac * inv, inv),
        _ => (f32::MAX, f32::MAX),
    };
    (step, t_max, t_delta)
}

/// Exact grid traversal (Amanatides & Woo). Yields the origin cell, then every
/// cell the ray enters, up to `max_distance`.
#[derive(Clone, Debug)]
pub struct VoxelTraversal {
    cell: IVec3,
    step: IVec3,
    t_max: Vec3,
    t_delta: Vec3,
    t: f32,
    max_distance: f32,
    done: bool,
}

impl VoxelTraversal {
    pub fn new(origin: Vec3, dir: Vec3, max_distance: f32) -> Self {
        let Some(d) = unit_or_none(dir) else {
            return Self {
                cell: origin.floor_to_cell(),
                step: IVec3::ZERO,
                t_max: Vec3::splat(f32::MAX),
                t_delta: Vec3::splat(f32::MAX),
                t: 0.0,
                max_distance,
                done: true,
            };
        };
        let (sx, tmx, tdx) = axis_setup(origin.x, d.x);
        let (sy, tmy, tdy) = axis_setup(origin.y, d.y);
        let (sz, tmz, tdz) = axis_setup(origin.z, d.z);
        Self {
            cell: origin.floor_to_cell(),
            step: IVec3::new(sx, sy, sz),
            t_max: Vec3::new(tmx, tmy, tmz),
            t_delta: Vec3::new(tdx, tdy, tdz),
            t: 0.0,
            max_distance,
            done: !(max_distance >= 0.0),
        }
    }

    fn advance(&mut self) {
        let tm = &mut self.t_max;
        if tm.x < tm.y {
            if tm.x < tm.z {
                self.cell.x += self.step.x;
                self.t = tm.x;
                tm.x += self.t_delta.x;
            } else {
                self.cell.z += self.step.z;
                self.t = tm.z;
                tm.z += self.t_delta.z;
            }
        } else if tm.y < tm.z {
            self.cell.y += self.step.y;
            self.t = tm.y;
            tm.y += self.t_delta.y;
        } else {
            self.cell.z += self.step.z;
            self.t = tm.z;
            tm.z += self.t_delta.z;
        }
    }
}

impl Iterator for VoxelTraversal {
    type Item = IVec3;

    fn next(&mut self) -> Option<IVec3> {
        if self.done || self.t > self.max_distance {
            self.done = true;
            return None;
        }
        let out = self.cell;
        self.advance();
        Some(out)
    }
}

/// Candidate cells nearest first, using the fixed-step march.
pub fn cast(origin: Vec3, dir: Vec3, max_distance: f32, step: f32) -> Vec<IVec3> {
    RayMarch::new(origin, dir, max_distance, step).collect()
}

pub fn cast_with(mode: RayMode, origin: Vec3, dir: Vec3, max_distance: f32, step: f32) -> Vec<IVec3> {
    match mode {
        RayMode::Sampled => cast(origin, dir, max_distance, step),
        RayMode::Exact => VoxelTraversal::new(origin, dir, max_distance).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn march_along_negative_z_visits_each_cell_once() {
        let cells = cast(Vec3::new(1.5, 1.5, 4.5), Vec3::FORWARD, 5.0, 0.1);
        let zs: Vec<i32> = cells.iter().map(|c| c.z).collect();
        assert_eq!(zs, vec![4, 3, 2, 1, 0, -1]);
        assert!(cells.iter().all(|c| c.x == 1 && c.y == 1));
    }

    #[test]
    fn sample_count_bounds_length() {
        // Two samples at 0.1 and 0.2 only.
        let cells = cast(Vec3::new(0.95, 0.5, 0.5), Vec3::RIGHT, 0.25, 0.1);
        assert_eq!(cells, vec![IVec3::new(1, 0, 0)]);
        assert!(cast(Vec3::ZERO, Vec3::RIGHT, 0.05, 0.1).is_empty());
    }

    #[test]
    fn zero_direction_yields_nothing() {
        assert!(cast(Vec3::ZERO, Vec3::ZERO, 5.0, 0.1).is_empty());
        assert_eq!(VoxelTraversal::new(Vec3::ZERO, Vec3::ZERO, 5.0).count(), 0);
    }

    #[test]
    fn direction_is_normalized() {
        let a = cast(Vec3::new(0.5, 0.5, 0.5), Vec3::new(0.0, 0.0, -10.0), 3.0, 0.1);
        let b = cast(Vec3::new(0.5, 0.5, 0.5), Vec3::FORWARD, 3.0, 0.1);
        assert_eq!(a, b);
    }

    #[test]
    fn traversal_includes_origin_and_stays_face_connected() {
        let dir = Vec3::new(0.6, 0.3, -0.74);
        let cells: Vec<_> = VoxelTraversal::new(Vec3::new(0.2, 0.7, 0.4), dir, 6.0).collect();
        assert_eq!(cells[0], IVec3::new(0, 0, 0));
        for w in cells.windows(2) {
            let d = w[1] - w[0];
            assert_eq!(d.x.abs() + d.y.abs() + d.z.abs(), 1, "{:?} -> {:?}", w[0], w[1]);
        }
    }

    #[test]
    fn exact_mode_finds_cells_the_march_can_skip() {
        // Grazing a corner: the march steps diagonally past (1,0,0) or (0,1,0).
        let origin = Vec3::new(0.5, 0.5, 0.5);
        let dir = Vec3::new(1.0, 1.0, 0.0);
        let sampled = cast_with(RayMode::Sampled, origin, dir, 2.0, 0.1);
        let exact = cast_with(RayMode::Exact, origin, dir, 2.0, 0.1);
        assert!(sampled.windows(2).any(|w| (w[1] - w[0]).chebyshev(IVec3::ZERO) == 1
            && (w[1].x != w[0].x && w[1].y != w[0].y)));
        assert!(exact.len() > sampled.len());
    }
}
