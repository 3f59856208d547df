//! Triangle-soup mesh generation
//!
//! The simulation runs in `f64`; vertices narrow to `f32` only here, at
//! the GPU boundary. Output is a flat triangle list (no indices) in
//! stable scene order, so a renderer can upload one buffer per frame.

use bytemuck::{Pod, Zeroable};
use glam::DVec3;

use crate::sim::{Cuboid, Face, Paddle, Scene, Shape};

/// Position-and-color vertex, tightly packed for buffer upload
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

fn to_f32(v: DVec3) -> [f32; 3] {
    [v.x as f32, v.y as f32, v.z as f32]
}

fn to_rgb(color: [u8; 3]) -> [f32; 3] {
    [
        color[0] as f32 / 255.0,
        color[1] as f32 / 255.0,
        color[2] as f32 / 255.0,
    ]
}

/// Two triangles covering one face quad (6 vertices)
pub fn face_vertices(face: &Face, out: &mut Vec<Vertex>) {
    let [a, b, c, d] = face.vertices();
    let color = to_rgb(face.color);
    for corner in [a, b, c, a, c, d] {
        out.push(Vertex::new(to_f32(corner), color));
    }
}

/// All six faces of a solid (36 vertices)
pub fn cuboid_vertices(cuboid: &Cuboid, out: &mut Vec<Vertex>) {
    for face in cuboid.faces() {
        face_vertices(face, out);
    }
}

/// Axis-aligned rectangle in the z = `z` plane
fn rect(x0: f64, x1: f64, y0: f64, y1: f64, z: f64, color: [f32; 3], out: &mut Vec<Vertex>) {
    let corners = [
        DVec3::new(x0, y0, z),
        DVec3::new(x1, y0, z),
        DVec3::new(x1, y1, z),
        DVec3::new(x0, y1, z),
    ];
    let [a, b, c, d] = corners;
    for corner in [a, b, c, a, c, d] {
        out.push(Vertex::new(to_f32(corner), color));
    }
}

/// The paddle draws as a rectangular frame: four bars around an open
/// middle, so the player can see the ball through it (24 vertices).
pub fn paddle_vertices(paddle: &Paddle, out: &mut Vec<Vertex>) {
    let color = to_rgb(paddle.color);
    let t = paddle.thickness;
    let (x0, x1) = (paddle.x - paddle.width / 2.0, paddle.x + paddle.width / 2.0);
    let (y0, y1) = (paddle.y - paddle.height / 2.0, paddle.y + paddle.height / 2.0);
    // top and bottom bars span the full width
    rect(x0 - t, x1 + t, y1, y1 + t, paddle.z, color, out);
    rect(x0 - t, x1 + t, y0 - t, y0, paddle.z, color, out);
    // side bars fill the remaining height
    rect(x0 - t, x0, y0, y1, paddle.z, color, out);
    rect(x1, x1 + t, y0, y1, paddle.z, color, out);
}

/// Build the whole scene's triangle list: live visible obstacles in
/// stable id order, then movers, then the paddle frame.
pub fn scene_mesh(scene: &Scene) -> Vec<Vertex> {
    let mut out = Vec::new();
    for obstacle in scene.obstacles() {
        match &obstacle.shape {
            Shape::Face(face) => {
                if face.visible {
                    face_vertices(face, &mut out);
                }
            }
            Shape::Cuboid(cuboid) => cuboid_vertices(cuboid, &mut out),
        }
    }
    for mover in scene.movers() {
        cuboid_vertices(&mover.body, &mut out);
    }
    paddle_vertices(scene.paddle(), &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level;
    use crate::sim::Axis;
    use crate::tuning::Tuning;

    #[test]
    fn test_face_emits_two_triangles() {
        let face = Face::new(Axis::Z, 10.0, (-1.0, 1.0), (-2.0, 2.0), [255, 0, 0]);
        let mut out = Vec::new();
        face_vertices(&face, &mut out);
        assert_eq!(out.len(), 6);
        for v in &out {
            assert_eq!(v.position[2], 10.0);
            assert_eq!(v.color, [1.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn test_cuboid_emits_36_vertices() {
        let cuboid = Cuboid::new(DVec3::ZERO, DVec3::splat(2.0));
        let mut out = Vec::new();
        cuboid_vertices(&cuboid, &mut out);
        assert_eq!(out.len(), 36);
    }

    #[test]
    fn test_paddle_frame_leaves_middle_open() {
        let paddle = Paddle {
            x: 0.0,
            y: 0.0,
            z: 1000.0,
            width: 100.0,
            height: 100.0,
            thickness: 10.0,
            color: [255, 255, 255],
        };
        let mut out = Vec::new();
        paddle_vertices(&paddle, &mut out);
        assert_eq!(out.len(), 24);
        // No triangle corner lands strictly inside the opening
        for v in &out {
            let inside = v.position[0].abs() < 50.0 && v.position[1].abs() < 50.0;
            assert!(!inside, "frame vertex inside opening: {:?}", v.position);
        }
    }

    #[test]
    fn test_scene_mesh_skips_invisible_faces() {
        let scene = Scene::new(&level::level_one(), Tuning::default());
        let mesh = scene_mesh(&scene);
        // 5 visible walls (near wall skipped) + 9 bricks + ball + paddle
        let expected = 5 * 6 + 9 * 36 + 36 + 24;
        assert_eq!(mesh.len(), expected);
    }
}
