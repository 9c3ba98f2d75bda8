//! WGSL shader loading.
//!
//! Each program is stored as two files, one per stage, with entry points `vs_main` and
//! `fs_main`. They are compiled into separate modules by
//! [`PipelineBuilder::with_shader_pair`](crate::renderer::pipeline_builder::PipelineBuilder::with_shader_pair).

use crate::assets::AssetError;
use std::path::{Path, PathBuf};

/// Vertex and fragment WGSL sources read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPair {
    /// Vertex stage source.
    pub vertex: String,
    /// Fragment stage source.
    pub fragment: String,
    /// Where the vertex source came from, for labels and logs.
    pub vertex_path: PathBuf,
    /// Where the fragment source came from.
    pub fragment_path: PathBuf,
}

/// Reads both stages of a shader program.
///
/// # Errors
/// [`AssetError::Io`] naming whichever file could not be read.
pub fn load_shader_pair(vertex_path: &Path, fragment_path: &Path) -> Result<ShaderPair, AssetError> {
    let vertex =
        std::fs::read_to_string(vertex_path).map_err(|e| AssetError::io(vertex_path, e))?;
    let fragment =
        std::fs::read_to_string(fragment_path).map_err(|e| AssetError::io(fragment_path, e))?;

    log::debug!(
        "Loaded shaders {} + {}",
        vertex_path.display(),
        fragment_path.display()
    );

    Ok(ShaderPair {
        vertex,
        fragment,
        vertex_path: vertex_path.to_path_buf(),
        fragment_path: fragment_path.to_path_buf(),
    })
}
