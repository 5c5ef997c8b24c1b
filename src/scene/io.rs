//! Scene file loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable parameter and
//! control point files.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{ControlPoints, RenderParameters, SceneError, SceneResult};

fn load_ron<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> SceneResult<T> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| SceneError::io(path, e))?;
    debug!(path = %path.display(), bytes = contents.len(), "Loaded scene file");
    Ok(ron::from_str(&contents)?)
}

fn save_ron<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> SceneResult<()> {
    let path = path.as_ref();
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(value, config)?;
    fs::write(path, contents).map_err(|e| SceneError::io(path, e))?;
    debug!(path = %path.display(), "Saved scene file");
    Ok(())
}

/// Load control points from a RON list of 16 points
pub fn load_control_points<P: AsRef<Path>>(path: P) -> SceneResult<ControlPoints> {
    load_ron(path)
}

pub fn save_control_points<P: AsRef<Path>>(points: &ControlPoints, path: P) -> SceneResult<()> {
    save_ron(points, path)
}

/// Load render parameters; missing fields take their defaults and values are clamped
pub fn load_render_parameters<P: AsRef<Path>>(path: P) -> SceneResult<RenderParameters> {
    let params: RenderParameters = load_ron(path)?;
    Ok(params.clamped())
}

pub fn save_render_parameters<P: AsRef<Path>>(params: &RenderParameters, path: P) -> SceneResult<()> {
    save_ron(params, path)
}

/// Parse control points from a RON string (for embedded patches or testing)
pub fn control_points_from_str(s: &str) -> SceneResult<ControlPoints> {
    Ok(ron::from_str(s)?)
}

/// Parse render parameters from a RON string
pub fn render_parameters_from_str(s: &str) -> SceneResult<RenderParameters> {
    let params: RenderParameters = ron::from_str(s)?;
    Ok(params.clamped())
}
