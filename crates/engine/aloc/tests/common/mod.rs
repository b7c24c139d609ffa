//! Synthetic ALOC buffer builder shared by the integration tests

#![allow(dead_code)]

/// Little-endian byte writer with ALOC section helpers
#[derive(Default)]
pub struct AlocBuilder {
    data: Vec<u8>,
}

impl AlocBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header: data type, collision type, 15-byte signature, 4-byte mesh tag
    pub fn header(data_type: u32, collision_type: u32) -> Self {
        let mut builder = Self::new();
        builder.u32(data_type).u32(collision_type);
        builder.bytes(b"ALOC-SIGNATURE\0");
        builder.bytes(b"MESH");
        builder
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }

    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.data.push(value);
        self
    }

    pub fn u16(&mut self, value: u16) -> &mut Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn u32(&mut self, value: u32) -> &mut Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn u32_be(&mut self, value: u32) -> &mut Self {
        self.bytes(&value.to_be_bytes())
    }

    pub fn i32(&mut self, value: i32) -> &mut Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn i32_be(&mut self, value: i32) -> &mut Self {
        self.bytes(&value.to_be_bytes())
    }

    pub fn u64(&mut self, value: u64) -> &mut Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn f32(&mut self, value: f32) -> &mut Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn floats(&mut self, values: &[f32]) -> &mut Self {
        for &value in values {
            self.f32(value);
        }
        self
    }

    pub fn zeros(&mut self, n: usize) -> &mut Self {
        self.data.resize(self.data.len() + n, 0);
        self
    }

    pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn convex_mesh(&mut self, mesh: &ConvexFixture) -> &mut Self {
        self.u32(mesh.collision_layer);
        self.floats(&mesh.position);
        self.floats(&mesh.rotation);
        self.zeros(44);

        let vertex_count = mesh.vertices.len();
        let grb_bit = if mesh.has_grb_data { 0x8000 } else { 0 };
        self.u32(vertex_count as u32);
        self.u32(grb_bit | mesh.edge_count);
        self.u32(mesh.polygon_count);
        self.u32(mesh.polygons_vertex_count);
        for vertex in &mesh.vertices {
            self.floats(vertex);
        }
        self.zeros(mesh.polygon_count as usize * 20);
        self.zeros(mesh.polygons_vertex_count as usize);
        self.zeros(mesh.edge_count as usize * 2);
        self.zeros(vertex_count * 3);
        if mesh.has_grb_data {
            self.zeros(mesh.edge_count as usize * 8);
        }

        self.f32(mesh.sanity);
        self.floats(&[-1.0, -1.0, -1.0, 1.0, 1.0, 1.0]);
        self.f32(mesh.mass);
        self.floats(&[1.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 3.0]);
        self.floats(&[0.25, 0.5, 0.75]);
        match &mesh.gauss_map {
            Some(gauss) => {
                self.f32(1.0);
                self.zeros(24);
                self.i32(gauss.subdiv);
                self.i32(gauss.num_samples);
                self.zeros(gauss.num_samples as usize * 2);
                self.zeros(8);
                self.i32(gauss.num_svm_verts);
                self.i32(gauss.num_svm_adj_verts);
                self.i32(gauss.svm_max_index);
                let width = if gauss.svm_max_index <= 255 { 1 } else { 2 };
                self.zeros(gauss.num_svm_verts as usize * width);
                self.zeros(gauss.num_svm_adj_verts as usize);
            }
            None => {
                self.f32(0.0);
            }
        }
        self.f32(mesh.bounding_radius);
        self.floats(&[1.0, 1.0, 1.0])
    }

    pub fn triangle_mesh(&mut self, mesh: &TriangleFixture) -> &mut Self {
        let triangle_count = mesh.indices.len() / 3;
        let width = index_width(mesh.serial_flags);

        self.u32(mesh.collision_layer);
        self.zeros(16);
        self.zeros(4);
        self.u32(mesh.serial_flags);
        self.u32(mesh.vertices.len() as u32);
        self.u32(triangle_count as u32);
        for vertex in &mesh.vertices {
            self.floats(vertex);
        }
        self.index_array(&mesh.indices, width);

        if mesh.serial_flags & 0b1 != 0 {
            self.zeros(triangle_count * 2);
        }
        if mesh.serial_flags & 0b10 != 0 {
            self.i32(triangle_count as i32 - 1);
            self.zeros(triangle_count * width);
        }
        if mesh.serial_flags & 0b1_0000 != 0 {
            self.zeros(triangle_count * 3 * 4);
        }

        self.bytes(b"BV4\0");
        self.i32_be(mesh.bv4_version);
        self.zeros(20);
        self.zeros(24);
        self.i32_be(mesh.bv4_nodes as i32);
        self.zeros(mesh.bv4_nodes * 16);

        self.zeros(4 + 24);
        self.i32(mesh.extra_triangle_bytes as i32);
        self.zeros(mesh.extra_triangle_bytes);

        if mesh.serial_flags & 0b10_0000 != 0 {
            self.index_array(&mesh.indices, width);
            self.zeros(triangle_count * 16);
            self.zeros(triangle_count * 4);
            self.bytes(b"BV32");
            self.i32_be(2);
            self.zeros(20);
            self.u32(mesh.bv32_nodes.len() as u32);
            self.u32_be(mesh.bv32_nodes.len() as u32);
            for &nb in &mesh.bv32_nodes {
                self.u32(nb);
                self.u32(1);
                self.zeros(nb as usize * (4 + 16 + 16));
            }
        }
        self
    }

    fn index_array(&mut self, indices: &[u32], width: usize) -> &mut Self {
        for &index in indices {
            match width {
                1 => self.u8(index as u8),
                2 => self.u16(index as u16),
                _ => self.u32(index),
            };
        }
        self
    }

    pub fn primitive_box(&mut self, half_extents: [f32; 3], layer: u64, position: [f32; 3], rotation: [f32; 4]) -> &mut Self {
        self.bytes(b"BOX\0");
        self.floats(&half_extents).u64(layer).floats(&position).floats(&rotation)
    }

    pub fn primitive_capsule(&mut self, radius: f32, length: f32, layer: u64, position: [f32; 3], rotation: [f32; 4]) -> &mut Self {
        self.bytes(b"CAP\0");
        self.f32(radius).f32(length).u64(layer).floats(&position).floats(&rotation)
    }

    pub fn primitive_sphere(&mut self, radius: f32, layer: u64, position: [f32; 3], rotation: [f32; 4]) -> &mut Self {
        self.bytes(b"SPH\0");
        self.f32(radius).u64(layer).floats(&position).floats(&rotation)
    }
}

/// Index width in bytes for the given serial flags (8-bit wins over 16-bit)
pub fn index_width(serial_flags: u32) -> usize {
    if serial_flags & 0b100 != 0 {
        1
    } else if serial_flags & 0b1000 != 0 {
        2
    } else {
        4
    }
}

pub struct GaussFixture {
    pub subdiv: i32,
    pub num_samples: i32,
    pub num_svm_verts: i32,
    pub num_svm_adj_verts: i32,
    pub svm_max_index: i32,
}

pub struct ConvexFixture {
    pub collision_layer: u32,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub vertices: Vec<[f32; 3]>,
    pub has_grb_data: bool,
    pub edge_count: u32,
    pub polygon_count: u32,
    pub polygons_vertex_count: u32,
    pub sanity: f32,
    pub mass: f32,
    pub gauss_map: Option<GaussFixture>,
    pub bounding_radius: f32,
}

impl Default for ConvexFixture {
    /// A tetrahedron
    fn default() -> Self {
        Self {
            collision_layer: 1,
            position: [1.0, 2.0, 3.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
            vertices: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
            ],
            has_grb_data: false,
            edge_count: 6,
            polygon_count: 4,
            polygons_vertex_count: 12,
            sanity: 0.0,
            mass: 10.0,
            gauss_map: None,
            bounding_radius: 1.5,
        }
    }
}

pub struct TriangleFixture {
    pub collision_layer: u32,
    pub serial_flags: u32,
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub bv4_version: i32,
    pub bv4_nodes: usize,
    pub extra_triangle_bytes: usize,
    pub bv32_nodes: Vec<u32>,
}

impl Default for TriangleFixture {
    /// A unit quad split into two triangles
    fn default() -> Self {
        Self {
            collision_layer: 2,
            serial_flags: 0,
            vertices: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
            bv4_version: 3,
            bv4_nodes: 2,
            extra_triangle_bytes: 0,
            bv32_nodes: vec![2],
        }
    }
}
