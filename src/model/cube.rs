use glam::{Vec3, Vec4};
use bytemuck::{NoUninit};

/// Half the edge length of the cube.
pub const HALF_EXTENT: f32 = 0.3;

pub const CORNER_COUNT: usize = 8;
pub const FACE_COUNT: usize = 6;
pub const INDICES_PER_FACE: usize = 6;

/// Cube corners, indexed 0..8. Bit 2 of the index selects -x, bit 1 -y, bit 0 -z.
pub const CORNERS: [[f32; 3]; CORNER_COUNT] = [
    [HALF_EXTENT, HALF_EXTENT, HALF_EXTENT],
    [HALF_EXTENT, HALF_EXTENT, -HALF_EXTENT],
    [HALF_EXTENT, -HALF_EXTENT, HALF_EXTENT],
    [HALF_EXTENT, -HALF_EXTENT, -HALF_EXTENT],
    [-HALF_EXTENT, HALF_EXTENT, HALF_EXTENT],
    [-HALF_EXTENT, HALF_EXTENT, -HALF_EXTENT],
    [-HALF_EXTENT, -HALF_EXTENT, HALF_EXTENT],
    [-HALF_EXTENT, -HALF_EXTENT, -HALF_EXTENT],
];

/// Corner indices of each face: +x, +y, -x, -y, +z, -z.
pub const FACES: [[usize; 4]; FACE_COUNT] = [
    [0, 1, 2, 3],
    [0, 1, 4, 5],
    [4, 5, 6, 7],
    [2, 3, 6, 7],
    [0, 2, 4, 6],
    [1, 3, 5, 7],
];

/// Triangle list, face-major: face `k` owns indices `6k..6k + 6`.
pub const INDICES: [u32; FACE_COUNT * INDICES_PER_FACE] = [
    0, 1, 2, 1, 2, 3, // +x
    0, 1, 4, 1, 4, 5, // +y
    4, 5, 6, 5, 6, 7, // -x
    2, 6, 7, 2, 3, 7, // -y
    0, 2, 6, 0, 4, 6, // +z
    1, 3, 7, 1, 5, 7, // -z
];

/// Flat RGBA color of each face.
pub const FACE_COLORS: [[f32; 4]; FACE_COUNT] = [
    [1.0, 0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [1.0, 0.7, 0.0, 1.0],
    [0.0, 0.0, 1.0, 1.0],
    [1.0, 1.0, 1.0, 1.0],
    [1.0, 1.0, 0.0, 1.0],
];

#[repr(C)]
#[derive(Debug, Clone, Copy, NoUninit)]
pub struct Vertex {
    pub pos: [f32; 3],
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// The cube as an indexed triangle list.
    pub fn cube() -> Self {
        Self {
            vertices: CORNERS.iter().map(|&pos| Vertex { pos }).collect(),
            indices: INDICES.to_vec(),
        }
    }

    /// Index range of a single face inside `indices`.
    pub fn face_range(face: usize) -> std::ops::Range<u32> {
        let start = (face * INDICES_PER_FACE) as u32;
        start..start + INDICES_PER_FACE as u32
    }
}

pub fn corner(index: usize) -> Vec3 {
    Vec3::from_array(CORNERS[index])
}

/// Corner as a homogeneous point (w = 1).
pub fn corner_point(index: usize) -> Vec4 {
    corner(index).extend(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faces_are_planar() {
        for face in FACES {
            // Every face sits on one axis-aligned plane.
            let points: Vec<Vec3> = face.iter().map(|&i| corner(i)).collect();
            let shared_axis = (0..3).filter(|&axis| {
                points.iter().all(|p| p[axis] == points[0][axis])
            }).count();
            assert_eq!(shared_axis, 1, "face {face:?} is not a cube side");
        }
    }

    #[test]
    fn test_each_corner_touches_three_faces() {
        for c in 0..CORNER_COUNT {
            let count = FACES.iter().filter(|f| f.contains(&c)).count();
            assert_eq!(count, 3, "corner {c}");
        }
    }

    #[test]
    fn test_triangles_stay_within_their_face() {
        let mesh = Mesh::cube();
        assert_eq!(mesh.vertices.len(), CORNER_COUNT);
        for (face, corners) in FACES.iter().enumerate() {
            let range = Mesh::face_range(face);
            for i in range {
                let idx = mesh.indices[i as usize] as usize;
                assert!(corners.contains(&idx), "index {idx} leaks out of face {face}");
            }
        }
    }

    #[test]
    fn test_face_triangles_cover_all_four_corners() {
        for (face, corners) in FACES.iter().enumerate() {
            let range = Mesh::face_range(face);
            let used: Vec<usize> = INDICES[range.start as usize..range.end as usize]
                .iter()
                .map(|&i| i as usize)
                .collect();
            for c in corners {
                assert!(used.contains(c), "face {face} never references corner {c}");
            }
        }
    }
}
