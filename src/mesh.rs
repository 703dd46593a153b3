//! Triangle mesh sources: Wavefront OBJ files and a built-in cube.
//!
//! Loading produces a flat list of triangles in object-local space. Faces
//! with more than three vertices are fan-triangulated from their first vertex
//! by tobj; anything malformed fails the whole load.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

use crate::math::Vec3;

/// Triangles as vertex triples, in object-local space.
pub type TriangleList = Vec<[Vec3; 3]>;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid OBJ data: {0}")]
    Parse(#[from] tobj::LoadError),

    #[error("model '{model}' has a face with fewer than 3 vertices")]
    DegenerateFace { model: String },

    #[error("model '{model}' references vertex {index} but has only {count}")]
    IndexOutOfRange {
        model: String,
        index: usize,
        count: usize,
    },

    #[error("no triangles found")]
    Empty,
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

/// Loads every triangle of every object in an OBJ file.
pub fn load_obj(path: impl AsRef<Path>) -> Result<TriangleList, LoadError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let triangles = parse_obj(&source)?;
    info!("loaded {} triangles from {}", triangles.len(), path.display());
    Ok(triangles)
}

/// Parses OBJ text. Materials are ignored.
pub fn parse_obj(source: &str) -> Result<TriangleList, LoadError> {
    let mut reader = Cursor::new(source.as_bytes());
    let (models, _materials) = tobj::load_obj_buf(&mut reader, &load_options(), |_| Ok(Default::default()))?;

    let mut triangles = TriangleList::new();
    for model in &models {
        let mesh = &model.mesh;
        if mesh.indices.len() % 3 != 0 {
            return Err(LoadError::DegenerateFace {
                model: model.name.clone(),
            });
        }

        let count = mesh.positions.len() / 3;
        let vertex = |index: u32| -> Result<Vec3, LoadError> {
            let i = index as usize;
            if i >= count {
                return Err(LoadError::IndexOutOfRange {
                    model: model.name.clone(),
                    index: i,
                    count,
                });
            }
            Ok(Vec3::new(
                mesh.positions[3 * i],
                mesh.positions[3 * i + 1],
                mesh.positions[3 * i + 2],
            ))
        };

        for face in mesh.indices.chunks_exact(3) {
            triangles.push([vertex(face[0])?, vertex(face[1])?, vertex(face[2])?]);
        }
    }

    if triangles.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(triangles)
}

// =============================================================================
// Built-in cube
// =============================================================================

const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(-1.0, -1.0, 1.0),
];

// Zero-based indices into CUBE_VERTICES, two triangles per side.
const CUBE_FACES: [[usize; 3]; 12] = [
    // front
    [0, 1, 2],
    [0, 2, 3],
    // right
    [3, 2, 4],
    [3, 4, 5],
    // back
    [5, 4, 6],
    [5, 6, 7],
    // left
    [7, 6, 1],
    [7, 1, 0],
    // top
    [1, 6, 4],
    [1, 4, 2],
    // bottom
    [5, 7, 0],
    [5, 0, 3],
];

/// A 2x2x2 cube centred on the origin.
pub fn cube() -> TriangleList {
    CUBE_FACES
        .iter()
        .map(|&[a, b, c]| [CUBE_VERTICES[a], CUBE_VERTICES[b], CUBE_VERTICES[c]])
        .collect()
}
