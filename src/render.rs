#![forbid(unsafe_code)]
//! Handing the graph description to the external renderer and viewer.
//!
//! Layout and rasterization belong to Graphviz; displaying the image
//! belongs to the platform viewer. This module only writes the dot
//! source, invokes the tools, and reports their failures.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info};

use crate::error::{ProbeError, Result};
use crate::graph::GraphDescription;

/// Renderer configuration; the CLI maps its flags onto this.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Graphviz output format (`-T` argument).
    pub format: String,
    /// Graphviz layout program to invoke.
    pub dot_program: String,
    /// Open the rendered image in the platform viewer.
    pub view: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: "png".to_string(),
            dot_program: "dot".to_string(),
            view: true,
        }
    }
}

/// Renders `graph` into a fresh temporary directory and returns the
/// image path.
///
/// Each call obtains its own directory; nothing is reused or cached
/// across invocations. The directory is kept on disk so the viewer can
/// still read the image after this function returns.
pub fn render(graph: &GraphDescription, options: &RenderOptions) -> Result<PathBuf> {
    let dir = tempfile::Builder::new().prefix("rbprobe-").tempdir()?;
    let dir = dir.keep();

    let dot_path = dir.join("tree.dot");
    fs::write(&dot_path, format!("{graph}\n"))?;
    debug!(path = %dot_path.display(), "wrote dot source");

    let image_path = dir.join(format!("tree.{}", options.format));
    let output = Command::new(&options.dot_program)
        .arg(format!("-T{}", options.format))
        .arg("-o")
        .arg(&image_path)
        .arg(&dot_path)
        .output()
        .map_err(|err| {
            ProbeError::Render(format!("failed to run {}: {err}", options.dot_program))
        })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ProbeError::Render(format!(
            "{} exited with {}: {}",
            options.dot_program,
            output.status,
            stderr.trim()
        )));
    }
    info!(path = %image_path.display(), "rendered tree image");

    if options.view {
        open_viewer(&image_path)?;
    }
    Ok(image_path)
}

#[cfg(target_os = "macos")]
const VIEWER: &str = "open";
#[cfg(not(target_os = "macos"))]
const VIEWER: &str = "xdg-open";

fn open_viewer(image: &std::path::Path) -> Result<()> {
    // Spawn and detach; the viewer outlives the inspection command.
    Command::new(VIEWER)
        .arg(image)
        .spawn()
        .map_err(|err| ProbeError::Render(format!("failed to open viewer {VIEWER}: {err}")))?;
    Ok(())
}
