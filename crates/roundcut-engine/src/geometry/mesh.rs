use super::Vertex;

/// Indexed triangle list held on the CPU.
///
/// Growable while being built; renderers treat it as immutable afterwards and
/// convert it to the backend's byte layout only at upload time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterates triangles as resolved vertex triples.
    ///
    /// Out-of-range indices are skipped rather than panicking.
    pub fn triangles(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            let a = *self.vertices.get(tri[0] as usize)?;
            let b = *self.vertices.get(tri[1] as usize)?;
            let c = *self.vertices.get(tri[2] as usize)?;
            Some([a, b, c])
        })
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Incremental builder that offsets appended indices by the running vertex count.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    mesh: Mesh,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            mesh: Mesh {
                vertices: Vec::with_capacity(vertices),
                indices: Vec::with_capacity(indices),
            },
        }
    }

    /// Index the next pushed vertex will receive.
    #[inline]
    pub fn next_index(&self) -> u32 {
        self.mesh.vertices.len() as u32
    }

    #[inline]
    pub fn index_len(&self) -> usize {
        self.mesh.indices.len()
    }

    pub fn push_vertex(&mut self, v: Vertex) -> u32 {
        let idx = self.next_index();
        self.mesh.vertices.push(v);
        idx
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.mesh.indices.extend_from_slice(&[a, b, c]);
    }

    pub fn finish(self) -> Mesh {
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_returns_running_indices() {
        let mut b = MeshBuilder::new();
        assert_eq!(b.push_vertex(Vertex::new(0.0, 0.0, 0.0)), 0);
        assert_eq!(b.push_vertex(Vertex::new(1.0, 0.0, 0.0)), 1);
        assert_eq!(b.next_index(), 2);
    }

    #[test]
    fn triangles_skip_out_of_range_indices() {
        let mesh = Mesh {
            vertices: vec![Vertex::new(0.0, 0.0, 0.0), Vertex::new(1.0, 0.0, 0.0)],
            indices: vec![0, 1, 0, 0, 1, 7],
        };
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.triangles().count(), 1);
    }

    #[test]
    fn byte_views_match_element_sizes() {
        let mesh = Mesh {
            vertices: vec![Vertex::default(); 4],
            indices: vec![0, 1, 2, 0, 2, 3],
        };
        assert_eq!(mesh.vertex_bytes().len(), 4 * 12);
        assert_eq!(mesh.index_bytes().len(), 6 * 4);
    }
}
