use std::f32::consts::FRAC_PI_4;

use egui::{Pos2, Rect, pos2};
use serde::{Deserialize, Serialize};

pub type Vec3 = [f32; 3];

const ZOOM_STEP: f32 = 0.99;
// Pixels of mouse drag per radian of orbit
const DRAG_SCALE: f32 = 500.0;

pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: Vec3) -> Option<Vec3> {
    let len = dot(v, v).sqrt();
    (len > 1e-6).then(|| [v[0] / len, v[1] / len, v[2] / len])
}

// Point on a sphere of radius `r`; theta around +z, phi down from +z
pub fn spherical(r: f32, theta: f32, phi: f32) -> Vec3 {
    [
        r * theta.cos() * phi.sin(),
        r * theta.sin() * phi.sin(),
        r * phi.cos(),
    ]
}

// Camera orbiting the origin with +z up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitCamera {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
    pub fov_y: f32, // radians
    pub near: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            radius: 500.0,
            theta: 0.0,
            phi: FRAC_PI_4,
            fov_y: 60f32.to_radians(),
            near: 1.0,
        }
    }
}

// Camera-space axes for one frame
struct Basis {
    eye: Vec3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
}

impl OrbitCamera {
    pub fn eye(&self) -> Vec3 {
        spherical(self.radius, self.theta, self.phi)
    }

    pub fn zoom_in(&mut self) {
        self.radius *= ZOOM_STEP;
    }

    pub fn zoom_out(&mut self) {
        self.radius /= ZOOM_STEP;
    }

    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.theta -= dx / DRAG_SCALE;
        self.phi -= dy / DRAG_SCALE;
    }

    fn basis(&self) -> Basis {
        let eye = self.eye();
        let forward = normalize(sub([0.0; 3], eye)).unwrap_or([0.0, 0.0, -1.0]);
        // Looking straight along z: any horizontal right vector will do
        let right = normalize(cross(forward, [0.0, 0.0, 1.0])).unwrap_or([1.0, 0.0, 0.0]);
        let up = cross(right, forward);
        Basis {
            eye,
            right,
            up,
            forward,
        }
    }

    // Perspective-project world points into `viewport`.
    // Each result is the screen position and the view depth, or None when
    // the point sits in front of the near plane.
    pub fn projector(&self, viewport: Rect) -> impl Fn(Vec3) -> Option<(Pos2, f32)> + '_ {
        let basis = self.basis();
        let focal = 1.0 / (self.fov_y / 2.0).tan();
        let aspect = (viewport.width() / viewport.height().max(1.0)).max(1e-3);
        let center = viewport.center();
        let (half_w, half_h) = (viewport.width() / 2.0, viewport.height() / 2.0);

        move |p| {
            let rel = sub(p, basis.eye);
            let depth = dot(rel, basis.forward);
            if depth < self.near {
                return None;
            }
            let ndc_x = focal / aspect * dot(rel, basis.right) / depth;
            let ndc_y = focal * dot(rel, basis.up) / depth;
            Some((
                pos2(center.x + ndc_x * half_w, center.y - ndc_y * half_h),
                depth,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    fn viewport() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0))
    }

    #[test]
    fn camera_default_eye() {
        let cam = OrbitCamera::default();
        let [x, y, z] = cam.eye();
        let expected = 500.0 * FRAC_PI_4.sin();
        assert!((x - expected).abs() < 1e-3);
        assert!(y.abs() < 1e-3);
        assert!((z - expected).abs() < 1e-3);
    }

    #[test]
    fn camera_origin_projects_to_center() {
        let cam = OrbitCamera::default();
        let project = cam.projector(viewport());
        let (pos, depth) = project([0.0; 3]).unwrap();
        assert!((pos.x - 400.0).abs() < 1e-3);
        assert!((pos.y - 300.0).abs() < 1e-3);
        assert!((depth - 500.0).abs() < 1e-2);
    }

    #[test]
    fn camera_up_is_up_on_screen() {
        let cam = OrbitCamera::default();
        let project = cam.projector(viewport());
        let (pos, _) = project([0.0, 0.0, 50.0]).unwrap();
        assert!(pos.y < 300.0);
    }

    #[test]
    fn camera_culls_points_behind() {
        let cam = OrbitCamera::default();
        let project = cam.projector(viewport());
        let behind = spherical(1000.0, cam.theta, cam.phi);
        assert!(project(behind).is_none());
    }

    #[test]
    fn camera_zoom_and_drag() {
        let mut cam = OrbitCamera::default();
        cam.zoom_in();
        assert!((cam.radius - 495.0).abs() < 1e-3);
        cam.zoom_out();
        assert!((cam.radius - 500.0).abs() < 1e-3);

        cam.drag(50.0, -100.0);
        assert!((cam.theta + 0.1).abs() < 1e-6);
        assert!((cam.phi - (FRAC_PI_4 + 0.2)).abs() < 1e-6);
    }

    #[test]
    fn camera_over_the_pole_still_projects() {
        let cam = OrbitCamera {
            phi: 0.0,
            ..Default::default()
        };
        let project = cam.projector(viewport());
        assert!(project([0.0; 3]).is_some());
    }
}
