use minicraft_geom::Vec3;
use raylib::prelude::{Color, Vector3};

pub fn vec3_to_rl(v: Vec3) -> Vector3 {
    Vector3::new(v.x, v.y, v.z)
}

pub fn color_to_rl(rgb: [u8; 3]) -> Color {
    Color::new(rgb[0], rgb[1], rgb[2], 255)
}
