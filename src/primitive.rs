//! Renderable primitives.
//!
//! Every primitive is an ordered list of object-space vertices. The pipeline
//! only ever asks for that list; fill and lighting are engaged when at least
//! three of them survive projection.

use crate::math::Vec3;

/// A position in object-local space.
pub type Vertex = Vec3;

/// Anything the pipeline can project: a list of object-space vertices.
pub trait Renderable {
    fn vertices(&self) -> &[Vertex];
}

/// Exactly three vertices, immutable after construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(a: Vertex, b: Vertex, c: Vertex) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }
}

impl From<[Vertex; 3]> for Triangle {
    fn from(vertices: [Vertex; 3]) -> Self {
        Self { vertices }
    }
}

impl Renderable for Triangle {
    fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }
}

/// A single-vertex actor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    vertex: [Vertex; 1],
}

impl Point {
    pub fn new(vertex: Vertex) -> Self {
        Self { vertex: [vertex] }
    }
}

impl Renderable for Point {
    fn vertices(&self) -> &[Vertex] {
        &self.vertex
    }
}

/// An arbitrary vertex list. Every pair of its vertices gets connected.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    vertices: Vec<Vertex>,
}

impl Polyline {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }
}

impl Renderable for Polyline {
    fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Point(Point),
    Polyline(Polyline),
    Triangle(Triangle),
}

impl Renderable for Primitive {
    fn vertices(&self) -> &[Vertex] {
        match self {
            Primitive::Point(p) => p.vertices(),
            Primitive::Polyline(l) => l.vertices(),
            Primitive::Triangle(t) => t.vertices(),
        }
    }
}

impl From<Triangle> for Primitive {
    fn from(t: Triangle) -> Self {
        Primitive::Triangle(t)
    }
}

impl From<Point> for Primitive {
    fn from(p: Point) -> Self {
        Primitive::Point(p)
    }
}

impl From<Polyline> for Primitive {
    fn from(l: Polyline) -> Self {
        Primitive::Polyline(l)
    }
}
