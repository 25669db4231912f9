use glam::{Mat4, Vec3};

/// Fixed viewer looking down -Z at the origin.
pub struct Camera {
    pub eye: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            eye: Vec3::new(0.0, 0.0, 3.0),
            fov_y: 45f32.to_radians(),
            aspect: 1.0,
            z_near: 0.1,
            z_far: 100.0,
        };
        camera.set_aspect(width, height);
        camera
    }

    /// Ignores zero-sized framebuffers (minimized windows).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(-self.eye)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_pushes_origin_back() {
        let cam = Camera::new(800, 800);
        let origin = cam.view().transform_point3(Vec3::ZERO);
        assert_eq!(origin, Vec3::new(0.0, 0.0, -3.0));
    }

    #[test]
    fn test_zero_height_keeps_aspect() {
        let mut cam = Camera::new(800, 400);
        assert_eq!(cam.aspect, 2.0);
        cam.set_aspect(800, 0);
        assert_eq!(cam.aspect, 2.0);
    }

    #[test]
    fn test_origin_projects_inside_depth_range() {
        let cam = Camera::new(800, 800);
        let clip = cam.projection() * cam.view() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc_z = clip.z / clip.w;
        assert!(ndc_z > 0.0 && ndc_z < 1.0, "ndc z = {ndc_z}");
    }
}
