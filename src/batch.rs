//! A [`DrawSink`] that collects quads into a vertex buffer.
//!
//! Each batch becomes one draw call over a run of triangles sharing a
//! texture. The vertex data can be uploaded as-is with [`QuadBatcher::vertex_bytes`].

use glyphstring_fonts::TextureId;

use crate::renderer::{DrawSink, SolidQuad, TexturedQuad};

/// Vertex layout for text quads.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TextVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
    pub color: [f32; 4], // RGBA, 0-1
}

/// A run of vertices drawn with one texture binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    /// `None` for untextured quads
    pub texture: Option<TextureId>,
    pub first_vertex: u32,
    pub vertex_count: u32,
}

pub const VERTICES_PER_QUAD: usize = 6;

#[derive(Debug, Default)]
pub struct QuadBatcher {
    vertices: Vec<TextVertex>,
    draw_calls: Vec<DrawCall>,
    texture: Option<TextureId>,
    color: [f32; 4],
    batch_start: usize,
}

impl QuadBatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[TextVertex] {
        &self.vertices
    }

    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    /// Vertex data ready for upload to a GPU buffer.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Drop all vertices and draw calls, e.g. at the start of a frame.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.draw_calls.clear();
        self.batch_start = 0;
    }

    fn push_quad(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, uv: [f32; 4]) {
        let [u1, v1, u2, v2] = uv;
        let color = self.color;
        let corner = |x, y, u, v| TextVertex {
            position: [x, y],
            tex_coords: [u, v],
            color,
        };
        let top_left = corner(x1, y1, u1, v1);
        let top_right = corner(x2, y1, u2, v1);
        let bottom_left = corner(x1, y2, u1, v2);
        let bottom_right = corner(x2, y2, u2, v2);
        self.vertices.extend_from_slice(&[
            top_left,
            bottom_left,
            top_right,
            top_right,
            bottom_left,
            bottom_right,
        ]);
    }
}

impl DrawSink for QuadBatcher {
    fn begin_batch(&mut self) {
        self.batch_start = self.vertices.len();
    }

    fn set_color(&mut self, rgba: [u8; 4]) {
        self.color = rgba.map(|c| c as f32 / 255.0);
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        self.texture = texture;
    }

    fn add_textured_quad(&mut self, quad: TexturedQuad) {
        self.push_quad(
            quad.x1,
            quad.y1,
            quad.x2,
            quad.y2,
            [quad.u1, quad.v1, quad.u2, quad.v2],
        );
    }

    fn add_solid_quad(&mut self, quad: SolidQuad) {
        self.push_quad(quad.x1, quad.y1, quad.x2, quad.y2, [0.0; 4]);
    }

    fn flush(&mut self) {
        let count = self.vertices.len() - self.batch_start;
        if count > 0 {
            self.draw_calls.push(DrawCall {
                texture: self.texture,
                first_vertex: self.batch_start as u32,
                vertex_count: count as u32,
            });
        }
        self.batch_start = self.vertices.len();
    }
}
