use std::f32::consts::{PI, TAU};

use egui::{Color32, Mesh, Rect};
use terrain_core::{Rgb, TerrainState};

use crate::camera::{OrbitCamera, Vec3, cross, dot, spherical, sub};

pub const BASE_RADIUS: f32 = 200.0;
// Height units per unit of radius when bumps are on
const BUMP_DIVISOR: f32 = 15.0;
// Upper bound on quads per side of the preview mesh
pub const MAX_QUADS_PER_SIDE: usize = 128;

pub fn to_color32([r, g, b]: Rgb) -> Color32 {
    let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgb(q(r), q(g), q(b))
}

// The height grid wrapped onto a sphere: x runs around the equator,
// y from pole to pole. Only every `stride`-th cell is used.
pub struct ShellMesh {
    stride: usize,
    side: usize, // sampled vertices per side
    positions: Vec<Vec3>,
    colors: Vec<Color32>,
}

impl ShellMesh {
    pub fn build(state: &TerrainState, bumpy: bool) -> Self {
        let grid = state.grid();
        let last = grid.size() - 1;
        let stride = (last / MAX_QUADS_PER_SIDE).max(1);
        let side = last / stride + 1;

        let d_theta = TAU / last as f32;
        let d_phi = PI / last as f32;

        let mut positions = Vec::with_capacity(side * side);
        for y in (0..=last).step_by(stride) {
            for x in (0..=last).step_by(stride) {
                let r = if bumpy {
                    BASE_RADIUS + grid[(x, y)] / BUMP_DIVISOR
                } else {
                    BASE_RADIUS
                };
                positions.push(spherical(r, d_theta * x as f32, d_phi * y as f32));
            }
        }

        let mut shell = Self {
            stride,
            side,
            positions,
            colors: Vec::new(),
        };
        shell.recolor(state);
        shell
    }

    // Refresh vertex colors after a scheme change; geometry is untouched
    pub fn recolor(&mut self, state: &TerrainState) {
        let grid = state.grid();
        let last = grid.size() - 1;
        self.colors = (0..=last)
            .step_by(self.stride)
            .flat_map(|y| (0..=last).step_by(self.stride).map(move |x| (x, y)))
            .map(|(x, y)| to_color32(state.color_of(grid[(x, y)])))
            .collect();
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    // Vertex indices of every triangle, two per quad, wound so the
    // front face points away from the sphere center
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let side = self.side;
        (0..side - 1).flat_map(move |i| {
            (0..side - 1).flat_map(move |j| {
                let at = |di: usize, dj: usize| (j + dj) * side + i + di;
                let quad = [at(0, 0), at(0, 1), at(1, 1), at(1, 0)];
                [[quad[0], quad[1], quad[2]], [quad[0], quad[2], quad[3]]]
            })
        })
    }

    // Front-facing triangles projected for `camera`, painted far to near
    pub fn paint_mesh(&self, camera: &OrbitCamera, viewport: Rect) -> Mesh {
        let project = camera.projector(viewport);
        let eye = camera.eye();

        let mut visible = Vec::new();
        for tri in self.triangles() {
            let [a, b, c] = tri.map(|v| self.positions[v]);
            let normal = cross(sub(b, a), sub(c, a));
            if dot(normal, sub(eye, a)) <= 0.0 {
                continue;
            }
            let (Some(pa), Some(pb), Some(pc)) = (project(a), project(b), project(c)) else {
                continue;
            };
            let depth = (pa.1 + pb.1 + pc.1) / 3.0;
            visible.push((depth, tri, [pa.0, pb.0, pc.0]));
        }
        visible.sort_by(|l, r| r.0.total_cmp(&l.0));

        let mut mesh = Mesh::default();
        for (_, tri, screen) in visible {
            let base = mesh.vertices.len() as u32;
            for (v, pos) in tri.into_iter().zip(screen) {
                mesh.colored_vertex(pos, self.colors[v]);
            }
            mesh.add_triangle(base, base + 1, base + 2);
        }
        mesh
    }
}
