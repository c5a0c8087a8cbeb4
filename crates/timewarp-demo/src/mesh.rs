//! Grid mesh standing in for the scene geometry under the overlay.

use timewarp_engine::coords::Viewport;
use timewarp_engine::effect::Vertex;

/// Indexed triangle grid covering a viewport, in logical pixels.
#[derive(Debug, Clone, Default)]
pub struct GridMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    viewport: Viewport,
}

impl GridMesh {
    /// `columns × rows` quads spanning `(0, 0)..(width, height)`; both counts
    /// are at least 1. UVs run `0..1` across the grid.
    pub fn new(viewport: Viewport, columns: u32, rows: u32, color: [f32; 4]) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);

        let mut vertices = Vec::with_capacity(((columns + 1) * (rows + 1)) as usize);
        for row in 0..=rows {
            let v = row as f32 / rows as f32;
            for col in 0..=columns {
                let u = col as f32 / columns as f32;
                vertices.push(Vertex {
                    position: [u * viewport.width, v * viewport.height, 0.0],
                    color,
                    uv: [u, v],
                });
            }
        }

        let stride = columns + 1;
        let mut indices = Vec::with_capacity((columns * rows * 6) as usize);
        for row in 0..rows {
            for col in 0..columns {
                let tl = row * stride + col;
                let tr = tl + 1;
                let bl = tl + stride;
                let br = bl + 1;
                indices.extend_from_slice(&[tl, tr, br, tl, br, bl]);
            }
        }

        Self { vertices, indices, viewport }
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn counts_match_resolution() {
        let mesh = GridMesh::new(Viewport::new(100.0, 50.0), 4, 2, WHITE);
        assert_eq!(mesh.vertices.len(), 5 * 3);
        assert_eq!(mesh.indices.len(), 4 * 2 * 6);
    }

    #[test]
    fn corners_span_viewport() {
        let mesh = GridMesh::new(Viewport::new(100.0, 50.0), 4, 2, WHITE);
        assert_eq!(mesh.vertices[0].position, [0.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices.last().map(|v| v.position), Some([100.0, 50.0, 0.0]));
        assert_eq!(mesh.vertices.last().map(|v| v.uv), Some([1.0, 1.0]));
    }

    #[test]
    fn indices_stay_in_bounds() {
        let mesh = GridMesh::new(Viewport::new(10.0, 10.0), 7, 3, WHITE);
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn zero_resolution_still_yields_one_quad() {
        let mesh = GridMesh::new(Viewport::new(10.0, 10.0), 0, 0, WHITE);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 3, 0, 3, 2]);
    }
}
