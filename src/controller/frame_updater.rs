use std::fmt;
use std::str::FromStr;

use glam::{Mat4, Vec3, Vec4};

use crate::model::cube::{self, CORNER_COUNT, FACES, FACE_COUNT};

/// Radians added per frame for each held rotation key.
pub const DEFAULT_ROTATION_STEP: f32 = 0.0005;

/// Elementary rotations, listed in the order they are composed within one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    PitchUp,
    PitchDown,
    YawRight,
    YawLeft,
    RollCw,
    RollCcw,
}

impl Rotation {
    pub const ALL: [Rotation; 6] = [
        Rotation::PitchUp,
        Rotation::PitchDown,
        Rotation::YawRight,
        Rotation::YawLeft,
        Rotation::RollCw,
        Rotation::RollCcw,
    ];

    /// Signed rotation axis; the angle is always the positive step.
    pub fn axis(self) -> Vec3 {
        match self {
            Rotation::PitchUp => Vec3::X,
            Rotation::PitchDown => Vec3::NEG_X,
            Rotation::YawRight => Vec3::NEG_Y,
            Rotation::YawLeft => Vec3::Y,
            Rotation::RollCw => Vec3::Z,
            Rotation::RollCcw => Vec3::NEG_Z,
        }
    }

    pub fn opposite(self) -> Rotation {
        match self {
            Rotation::PitchUp => Rotation::PitchDown,
            Rotation::PitchDown => Rotation::PitchUp,
            Rotation::YawRight => Rotation::YawLeft,
            Rotation::YawLeft => Rotation::YawRight,
            Rotation::RollCw => Rotation::RollCcw,
            Rotation::RollCcw => Rotation::RollCw,
        }
    }

    pub fn matrix(self, step: f32) -> Mat4 {
        Mat4::from_axis_angle(self.axis(), step)
    }
}

/// Which rotation keys are held this frame. Any combination is allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotationInputs {
    pub pitch_up: bool,
    pub pitch_down: bool,
    pub yaw_right: bool,
    pub yaw_left: bool,
    pub roll_cw: bool,
    pub roll_ccw: bool,
}

impl RotationInputs {
    pub fn only(rotation: Rotation) -> Self {
        let mut inputs = Self::default();
        inputs.set(rotation, true);
        inputs
    }

    pub fn is_held(&self, rotation: Rotation) -> bool {
        match rotation {
            Rotation::PitchUp => self.pitch_up,
            Rotation::PitchDown => self.pitch_down,
            Rotation::YawRight => self.yaw_right,
            Rotation::YawLeft => self.yaw_left,
            Rotation::RollCw => self.roll_cw,
            Rotation::RollCcw => self.roll_ccw,
        }
    }

    pub fn set(&mut self, rotation: Rotation, held: bool) {
        let slot = match rotation {
            Rotation::PitchUp => &mut self.pitch_up,
            Rotation::PitchDown => &mut self.pitch_down,
            Rotation::YawRight => &mut self.yaw_right,
            Rotation::YawLeft => &mut self.yaw_left,
            Rotation::RollCw => &mut self.roll_cw,
            Rotation::RollCcw => &mut self.roll_ccw,
        };
        *slot = held;
    }

    /// Held rotations in composition order.
    pub fn held(&self) -> impl Iterator<Item = Rotation> + '_ {
        Rotation::ALL.into_iter().filter(|r| self.is_held(*r))
    }

    pub fn any(&self) -> bool {
        self.held().next().is_some()
    }
}

/// How face depth keys are computed and whether they drive the draw sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DepthOrder {
    /// Z-sum of the first three corners of each face. The order is reported
    /// but faces are always drawn in index order.
    #[default]
    Reference,
    /// Average Z of all four corners; faces are drawn back to front.
    Sorted,
}

impl DepthOrder {
    pub fn toggled(self) -> Self {
        match self {
            DepthOrder::Reference => DepthOrder::Sorted,
            DepthOrder::Sorted => DepthOrder::Reference,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DepthOrder::Reference => "reference",
            DepthOrder::Sorted => "sorted",
        }
    }
}

impl fmt::Display for DepthOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DepthOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reference" | "fixed" => Ok(DepthOrder::Reference),
            "sorted" | "back-to-front" => Ok(DepthOrder::Sorted),
            other => Err(format!("unknown depth order '{other}' (expected 'reference' or 'sorted')")),
        }
    }
}

/// Result of one frame step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    /// Accumulated rotation, fed back as the next frame's input.
    pub transform: Mat4,
    pub depth_keys: [f32; FACE_COUNT],
    /// Face indices by ascending depth key (farthest first).
    pub face_order: [usize; FACE_COUNT],
    pub depth_order: DepthOrder,
}

impl FrameUpdate {
    /// Sequence in which faces should be submitted to the GPU.
    pub fn draw_order(&self) -> [usize; FACE_COUNT] {
        match self.depth_order {
            DepthOrder::Reference => std::array::from_fn(|i| i),
            DepthOrder::Sorted => self.face_order,
        }
    }
}

/// Per-frame rotation and face ordering. Holds no state between frames.
#[derive(Debug, Clone, Copy)]
pub struct FrameUpdater {
    pub step: f32,
    pub depth_order: DepthOrder,
}

impl Default for FrameUpdater {
    fn default() -> Self {
        Self::new(DEFAULT_ROTATION_STEP, DepthOrder::default())
    }
}

impl FrameUpdater {
    pub fn new(step: f32, depth_order: DepthOrder) -> Self {
        Self { step, depth_order }
    }

    pub fn update(&self, previous: Mat4, inputs: RotationInputs) -> FrameUpdate {
        let transform = rotate(previous, inputs, self.step);
        let corners = transformed_corners(&transform);
        let depth_keys = depth_keys(&corners, self.depth_order);
        FrameUpdate {
            transform,
            depth_keys,
            face_order: order_by_depth(&depth_keys),
            depth_order: self.depth_order,
        }
    }
}

/// Composes `previous` with one step per held rotation, in the cube's own frame.
pub fn rotate(previous: Mat4, inputs: RotationInputs, step: f32) -> Mat4 {
    inputs
        .held()
        .fold(previous, |acc, rotation| acc * rotation.matrix(step))
}

pub fn transformed_corners(transform: &Mat4) -> [Vec4; CORNER_COUNT] {
    std::array::from_fn(|i| *transform * cube::corner_point(i))
}

pub fn depth_keys(corners: &[Vec4; CORNER_COUNT], mode: DepthOrder) -> [f32; FACE_COUNT] {
    std::array::from_fn(|face| {
        let ids = &FACES[face];
        match mode {
            DepthOrder::Reference => ids[..3].iter().map(|&c| corners[c].z).sum(),
            DepthOrder::Sorted => ids.iter().map(|&c| corners[c].z).sum::<f32>() / ids.len() as f32,
        }
    })
}

/// Stable ascending sort of face indices by key; ties keep index order.
pub fn order_by_depth(keys: &[f32; FACE_COUNT]) -> [usize; FACE_COUNT] {
    let mut order: [usize; FACE_COUNT] = std::array::from_fn(|i| i);
    order.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]));
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat3;
    use std::f32::consts::FRAC_PI_2;

    fn assert_rigid(m: &Mat4, eps: f32) {
        let r = Mat3::from_mat4(*m);
        assert!(
            (r * r.transpose()).abs_diff_eq(Mat3::IDENTITY, eps),
            "rotation block drifted: {r:?}"
        );
        assert!(m.w_axis.abs_diff_eq(Vec4::W, eps), "translation leaked: {:?}", m.w_axis);
        assert!(m.row(3).abs_diff_eq(Vec4::W, eps), "projective row leaked: {:?}", m.row(3));
    }

    // Deterministic xorshift so the input mix varies without an RNG crate.
    fn input_stream(len: usize) -> impl Iterator<Item = RotationInputs> {
        let mut state: u32 = 0x9E37_79B9;
        (0..len).map(move |_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let mut inputs = RotationInputs::default();
            for (bit, rotation) in Rotation::ALL.into_iter().enumerate() {
                inputs.set(rotation, state & (1 << bit) != 0);
            }
            inputs
        })
    }

    #[test]
    fn test_stays_rigid_over_many_frames() {
        let updater = FrameUpdater::default();
        let mut transform = Mat4::IDENTITY;
        for inputs in input_stream(10_000) {
            transform = updater.update(transform, inputs).transform;
        }
        assert_rigid(&transform, 1e-3);
        assert_ne!(transform, Mat4::IDENTITY);
    }

    #[test]
    fn test_no_input_is_bitwise_identity() {
        let updater = FrameUpdater::default();
        let start = Mat4::from_rotation_x(0.7) * Mat4::from_rotation_y(-1.3);
        let mut transform = start;
        for _ in 0..100 {
            transform = updater.update(transform, RotationInputs::default()).transform;
        }
        assert_eq!(transform.to_cols_array(), start.to_cols_array());
    }

    #[test]
    fn test_opposite_inputs_cancel() {
        let updater = FrameUpdater::default();
        let start = Mat4::from_rotation_z(0.4) * Mat4::from_rotation_x(0.2);
        for rotation in Rotation::ALL {
            let mut transform = start;
            for _ in 0..1000 {
                transform = updater.update(transform, RotationInputs::only(rotation)).transform;
            }
            assert!(!transform.abs_diff_eq(start, 1e-3), "{rotation:?} had no effect");
            for _ in 0..1000 {
                transform = updater
                    .update(transform, RotationInputs::only(rotation.opposite()))
                    .transform;
            }
            assert!(transform.abs_diff_eq(start, 1e-4), "{rotation:?} did not cancel");
        }
    }

    #[test]
    fn test_single_yaw_right_from_identity() {
        let updater = FrameUpdater::default();
        let update = updater.update(Mat4::IDENTITY, RotationInputs::only(Rotation::YawRight));

        let expected = Mat4::from_rotation_y(-DEFAULT_ROTATION_STEP);
        assert!(update.transform.abs_diff_eq(expected, 1e-6));

        let (s, c) = (-DEFAULT_ROTATION_STEP).sin_cos();
        let corners = transformed_corners(&update.transform);
        for (i, moved) in corners.iter().enumerate() {
            let p = cube::corner(i);
            let want = Vec4::new(p.x * c + p.z * s, p.y, -p.x * s + p.z * c, 1.0);
            assert!(moved.abs_diff_eq(want, 1e-6), "corner {i}: {moved:?} vs {want:?}");
        }
    }

    #[test]
    fn test_composition_follows_enumeration_order() {
        let step = 0.3;
        let updater = FrameUpdater::new(step, DepthOrder::Reference);
        let inputs = RotationInputs { pitch_up: true, yaw_left: true, roll_ccw: true, ..Default::default() };
        let got = updater.update(Mat4::IDENTITY, inputs).transform;
        let want = Rotation::PitchUp.matrix(step)
            * Rotation::YawLeft.matrix(step)
            * Rotation::RollCcw.matrix(step);
        assert!(got.abs_diff_eq(want, 1e-6));

        let reversed = Rotation::RollCcw.matrix(step)
            * Rotation::YawLeft.matrix(step)
            * Rotation::PitchUp.matrix(step);
        assert!(!got.abs_diff_eq(reversed, 1e-3));
    }

    #[test]
    fn test_reference_keys_at_identity() {
        let update = FrameUpdater::default().update(Mat4::IDENTITY, RotationInputs::default());
        let want = [0.3, 0.3, 0.3, 0.3, 0.9, -0.9];
        for (got, want) in update.depth_keys.iter().zip(want) {
            assert!((got - want).abs() < 1e-6, "{got} vs {want}");
        }
        assert_eq!(update.face_order, [5, 0, 1, 2, 3, 4]);
        assert_eq!(update.draw_order(), [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sorted_mode_draws_back_to_front() {
        let updater = FrameUpdater::new(DEFAULT_ROTATION_STEP, DepthOrder::Sorted);
        // Quarter turn about Y brings the +x face toward the viewer.
        let update = updater.update(Mat4::from_rotation_y(-FRAC_PI_2), RotationInputs::default());
        let order = update.draw_order();
        assert_eq!(order, update.face_order);
        assert_eq!(order[FACE_COUNT - 1], 0, "+x face should be drawn last: {order:?}");
        assert_eq!(order[0], 2, "-x face should be drawn first: {order:?}");
        for pair in order.windows(2) {
            assert!(update.depth_keys[pair[0]] <= update.depth_keys[pair[1]]);
        }
    }

    #[test]
    fn test_sorted_keys_respect_cube_symmetry() {
        let symmetries = [
            Mat4::from_rotation_x(FRAC_PI_2),
            Mat4::from_rotation_y(FRAC_PI_2),
            Mat4::from_rotation_z(FRAC_PI_2),
            Mat4::from_rotation_z(FRAC_PI_2) * Mat4::from_rotation_x(FRAC_PI_2),
        ];
        let base = Mat4::from_rotation_x(0.35) * Mat4::from_rotation_y(-0.8) * Mat4::from_rotation_z(0.1);

        for sym in symmetries {
            // Corner permutation induced by the symmetry.
            let perm: [usize; CORNER_COUNT] = std::array::from_fn(|c| {
                let moved = sym.transform_point3(cube::corner(c));
                (0..CORNER_COUNT)
                    .find(|&d| cube::corner(d).abs_diff_eq(moved, 1e-5))
                    .expect("symmetry maps corners onto corners")
            });
            // Face f lands on the face made of its permuted corners.
            let relabel: [usize; FACE_COUNT] = std::array::from_fn(|f| {
                let mut image: Vec<usize> = FACES[f].iter().map(|&c| perm[c]).collect();
                image.sort_unstable();
                FACES
                    .iter()
                    .position(|g| g.as_slice() == image.as_slice())
                    .expect("symmetry maps faces onto faces")
            });

            let keys = depth_keys(&transformed_corners(&(base * sym)), DepthOrder::Sorted);
            let base_keys = depth_keys(&transformed_corners(&base), DepthOrder::Sorted);
            for f in 0..FACE_COUNT {
                assert!(
                    (keys[f] - base_keys[relabel[f]]).abs() < 1e-5,
                    "face {f} -> {}: {} vs {}",
                    relabel[f],
                    keys[f],
                    base_keys[relabel[f]]
                );
            }
        }
    }

    #[test]
    fn test_ties_keep_index_order() {
        let keys = [1.0, 0.0, 1.0, 0.0, -2.0, 1.0];
        assert_eq!(order_by_depth(&keys), [4, 1, 3, 0, 2, 5]);
    }

    #[test]
    fn test_depth_order_parse() {
        assert_eq!("Sorted".parse::<DepthOrder>(), Ok(DepthOrder::Sorted));
        assert_eq!(" reference ".parse::<DepthOrder>(), Ok(DepthOrder::Reference));
        assert!("painter".parse::<DepthOrder>().is_err());
        assert_eq!(DepthOrder::Reference.toggled(), DepthOrder::Sorted);
    }
}
