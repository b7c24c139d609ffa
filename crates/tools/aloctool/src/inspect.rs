//! Per-file container summaries for the `inspect` command

use aloc::{classify, decode, CollisionType, Container, DataType, LayerFilter, UnimplementedSection};
use anyhow::Context;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSummary {
    pub path: PathBuf,
    pub size: usize,
    pub data_type: DataType,
    pub collision_type: CollisionType,
    pub convex_meshes: usize,
    pub triangle_meshes: usize,
    pub primitive_boxes: usize,
    pub primitive_capsules: usize,
    pub primitive_spheres: usize,
    pub shatters: usize,
    pub vertices: usize,
    pub triangles: usize,
    /// Distinct layers in code order
    pub layers: Vec<String>,
    pub collidable: bool,
    pub convex_section_truncated: bool,
    pub unimplemented: Option<UnimplementedSection>,
    pub trailing_bytes: usize,
}

impl FileSummary {
    pub fn new(path: &Path, size: usize, container: &Container, filter: &LayerFilter) -> Self {
        let codes: BTreeSet<u64> = container.layer_codes().collect();
        let vertices = container
            .convex_meshes
            .iter()
            .map(|m| m.vertices.len())
            .chain(container.triangle_meshes.iter().map(|m| m.vertices.len()))
            .sum();

        Self {
            path: path.to_path_buf(),
            size,
            data_type: container.data_type,
            collision_type: container.collision_type,
            convex_meshes: container.convex_meshes.len(),
            triangle_meshes: container.triangle_meshes.len(),
            primitive_boxes: container.primitive_boxes.len(),
            primitive_capsules: container.primitive_capsules.len(),
            primitive_spheres: container.primitive_spheres.len(),
            shatters: container.shatters.len(),
            vertices,
            triangles: container
                .triangle_meshes
                .iter()
                .map(|m| m.triangle_data.len() / 3)
                .sum(),
            layers: codes.into_iter().map(|code| classify(code).to_string()).collect(),
            collidable: container.is_collidable(filter),
            convex_section_truncated: container.convex_section_truncated,
            unimplemented: container.unimplemented,
            trailing_bytes: container.trailing_bytes,
        }
    }
}

impl fmt::Display for FileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} bytes)", self.path.display(), self.size)?;
        writeln!(f, "  data type:      {:?}", self.data_type)?;
        writeln!(f, "  collision type: {:?}", self.collision_type)?;

        let counts = [
            ("convex meshes", self.convex_meshes),
            ("triangle meshes", self.triangle_meshes),
            ("boxes", self.primitive_boxes),
            ("capsules", self.primitive_capsules),
            ("spheres", self.primitive_spheres),
            ("shatters", self.shatters),
        ];
        for (label, count) in counts.iter().filter(|(_, count)| *count > 0) {
            writeln!(f, "  {label}: {count}")?;
        }
        if self.vertices > 0 {
            writeln!(f, "  vertices: {}, triangles: {}", self.vertices, self.triangles)?;
        }

        if self.layers.is_empty() {
            writeln!(f, "  layers: none")?;
        } else {
            writeln!(f, "  layers: {}", self.layers.join(", "))?;
        }
        writeln!(f, "  collidable: {}", if self.collidable { "yes" } else { "no" })?;

        if self.convex_section_truncated {
            writeln!(f, "  convex section ended early at a short polygon record")?;
        }
        if let Some(UnimplementedSection::Shatter { declared_count }) = self.unimplemented {
            writeln!(f, "  shatter section not decoded ({declared_count} declared)")?;
        }
        if self.trailing_bytes > 0 {
            writeln!(f, "  trailing bytes: {}", self.trailing_bytes)?;
        }
        Ok(())
    }
}

/// Result of inspecting one file; failures don't stop a batch
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InspectOutcome {
    Decoded(FileSummary),
    Failed { path: PathBuf, error: String },
}

impl InspectOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, InspectOutcome::Failed { .. })
    }
}

impl fmt::Display for InspectOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InspectOutcome::Decoded(summary) => fmt::Display::fmt(summary, f),
            InspectOutcome::Failed { path, error } => {
                writeln!(f, "{}: FAILED: {error}", path.display())
            }
        }
    }
}

pub fn inspect_file(path: &Path, filter: &LayerFilter) -> anyhow::Result<FileSummary> {
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let container = decode(&data).with_context(|| format!("failed to decode {}", path.display()))?;
    Ok(FileSummary::new(path, data.len(), &container, filter))
}

pub fn inspect_files(paths: &[PathBuf], filter: &LayerFilter) -> Vec<InspectOutcome> {
    paths
        .iter()
        .map(|path| match inspect_file(path, filter) {
            Ok(summary) => InspectOutcome::Decoded(summary),
            Err(err) => {
                tracing::warn!("{err:#}");
                InspectOutcome::Failed {
                    path: path.clone(),
                    error: format!("{err:#}"),
                }
            }
        })
        .collect()
}
