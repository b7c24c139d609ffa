//! Scenario placement
//!
//! A scenario JSON lists entity instances by asset hash. Each hash names an
//! `.aloc` file in a sibling directory; every collidable file is paired with
//! the transforms of its instances.

use aloc::{decode, Container, LayerFilter};
use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f32::consts::TAU;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse scenario {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to list aloc directory {path}: {source}")]
    AlocDir { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct JsonVec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<JsonVec3> for Vec3 {
    fn from(v: JsonVec3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

/// Euler angles in radians as the scenario exporter writes them
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct JsonRotation {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct JsonScale {
    pub data: JsonVec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct JsonEntity {
    pub position: JsonVec3,
    pub rotation: JsonRotation,
    pub scale: JsonScale,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScenarioEntity {
    #[serde(alias = "primHash")]
    pub hash: String,
    pub entity: JsonEntity,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub entities: Vec<ScenarioEntity>,
}

impl Scenario {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let json = fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| ScenarioError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Instance transforms per asset hash, each list in file order
    pub fn transforms_by_hash(&self) -> HashMap<&str, Vec<InstanceTransform>> {
        let mut transforms: HashMap<&str, Vec<InstanceTransform>> = HashMap::new();
        for entity in &self.entities {
            transforms
                .entry(entity.hash.as_str())
                .or_default()
                .push(InstanceTransform::from_entity(&entity.entity));
        }
        transforms
    }
}

/// World placement of one instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InstanceTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl InstanceTransform {
    /// Roll is stored mirrored (`2π - roll`); all three angles are negated and
    /// applied about X, then Y, then Z.
    pub fn from_entity(entity: &JsonEntity) -> Self {
        let JsonRotation { yaw, pitch, roll } = entity.rotation;
        let roll = TAU - roll;
        Self {
            translation: entity.position.into(),
            rotation: Quat::from_euler(EulerRot::ZYX, -roll, -pitch, -yaw),
            scale: entity.scale.data.into(),
        }
    }
}

/// A collidable asset and every instance of it in the scenario
#[derive(Debug, Clone, Serialize)]
pub struct PlacedAsset {
    pub hash: String,
    pub path: PathBuf,
    pub instances: Vec<InstanceTransform>,
    pub container: Container,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    Unreadable(String),
    Undecodable(String),
    NotCollidable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedAsset {
    pub hash: String,
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// One instance of one asset
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    pub hash: &'a str,
    pub path: &'a Path,
    pub instance: usize,
    pub transform: &'a InstanceTransform,
    pub container: &'a Container,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScenarioReport {
    pub assets: Vec<PlacedAsset>,
    pub skipped: Vec<SkippedAsset>,
}

impl ScenarioReport {
    /// Every placed instance, assets in file-name order
    pub fn placements(&self) -> impl Iterator<Item = Placement<'_>> {
        self.assets.iter().flat_map(|asset| {
            asset
                .instances
                .iter()
                .enumerate()
                .map(move |(instance, transform)| Placement {
                    hash: &asset.hash,
                    path: &asset.path,
                    instance,
                    transform,
                    container: &asset.container,
                })
        })
    }

    pub fn instance_count(&self) -> usize {
        self.assets.iter().map(|asset| asset.instances.len()).sum()
    }
}

/// `<scenario dir>/<dir_name>`
pub fn aloc_dir_for(scenario_path: &Path, dir_name: &str) -> PathBuf {
    scenario_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(dir_name)
}

/// `.aloc` files in `dir` (extension matched ignoring case), sorted by path
pub fn scan_aloc_dir(dir: &Path) -> Result<Vec<PathBuf>, ScenarioError> {
    let entries = fs::read_dir(dir).map_err(|source| ScenarioError::AlocDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| ScenarioError::AlocDir {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        let is_aloc = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("aloc"));
        if is_aloc && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Pair each `.aloc` file in `aloc_dir` with the scenario's instances of it.
///
/// Files no entity references are ignored. Files that fail to read or decode,
/// or whose records all sit on excluded layers, are reported as skipped.
pub fn place(
    scenario: &Scenario,
    aloc_dir: &Path,
    filter: &LayerFilter,
) -> Result<ScenarioReport, ScenarioError> {
    let mut transforms = scenario.transforms_by_hash();
    let mut report = ScenarioReport::default();

    for path in scan_aloc_dir(aloc_dir)? {
        let Some(hash) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let Some(instances) = transforms.remove(hash) else {
            debug!("{} is not referenced by the scenario", path.display());
            continue;
        };
        let hash = hash.to_string();

        let skip = |reason: SkipReason| SkippedAsset {
            hash: hash.clone(),
            path: path.clone(),
            reason,
        };

        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(err) => {
                warn!("Failed to read {}: {err}", path.display());
                report.skipped.push(skip(SkipReason::Unreadable(err.to_string())));
                continue;
            }
        };
        let container = match decode(&data) {
            Ok(container) => container,
            Err(err) => {
                warn!("Failed to decode {}: {err}", path.display());
                report.skipped.push(skip(SkipReason::Undecodable(err.to_string())));
                continue;
            }
        };
        if !container.is_collidable(filter) {
            debug!("{hash} has no collidable records");
            report.skipped.push(skip(SkipReason::NotCollidable));
            continue;
        }

        debug!("Placing {hash} x{}", instances.len());
        report.assets.push(PlacedAsset {
            hash,
            path,
            instances,
            container,
        });
    }

    if !transforms.is_empty() {
        debug!("{} scenario hashes have no .aloc file", transforms.len());
    }
    info!(
        "Placed {} assets ({} instances), skipped {}",
        report.assets.len(),
        report.instance_count(),
        report.skipped.len()
    );
    Ok(report)
}

/// Load a scenario and place it against `aloc_dir`
pub fn load_scenario(
    scenario_path: &Path,
    aloc_dir: &Path,
    filter: &LayerFilter,
) -> Result<ScenarioReport, ScenarioError> {
    let scenario = Scenario::load(scenario_path)?;
    place(&scenario, aloc_dir, filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn entity(hash_key: &str, hash: &str, yaw: f32, pitch: f32, roll: f32) -> String {
        format!(
            r#"{{"{hash_key}": "{hash}", "entity": {{
                "position": {{"x": 1.0, "y": 2.0, "z": 3.0}},
                "rotation": {{"yaw": {yaw}, "pitch": {pitch}, "roll": {roll}}},
                "scale": {{"type": "SVector3", "data": {{"x": 1.0, "y": 1.0, "z": 2.0}}}}
            }}}}"#
        )
    }

    fn assert_same_rotation(a: Quat, b: Quat) {
        for v in [Vec3::X, Vec3::Y, Vec3::Z] {
            assert!((a * v).abs_diff_eq(b * v, 1e-5), "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn test_parse_entities_with_alias() {
        let json = format!(
            r#"{{"entities": [{}, {}]}}"#,
            entity("hash", "00ABC", 0.0, 0.0, 0.0),
            entity("primHash", "00DEF", 0.0, 0.0, 0.0)
        );
        let scenario = Scenario::from_json(&json).unwrap();

        assert_eq!(scenario.entities.len(), 2);
        assert_eq!(scenario.entities[0].hash, "00ABC");
        assert_eq!(scenario.entities[1].hash, "00DEF");
        assert_eq!(scenario.entities[0].entity.scale.data.z, 2.0);
    }

    #[test]
    fn test_missing_entities_is_empty() {
        let scenario = Scenario::from_json("{}").unwrap();
        assert!(scenario.entities.is_empty());
    }

    #[test]
    fn test_transforms_grouped_in_file_order() {
        let json = format!(
            r#"{{"entities": [{}, {}, {}]}}"#,
            entity("hash", "A", 0.1, 0.0, 0.0),
            entity("hash", "B", 0.0, 0.0, 0.0),
            entity("hash", "A", 0.2, 0.0, 0.0)
        );
        let scenario = Scenario::from_json(&json).unwrap();
        let transforms = scenario.transforms_by_hash();

        assert_eq!(transforms.len(), 2);
        assert_eq!(transforms["A"].len(), 2);
        assert_eq!(transforms["B"].len(), 1);
        assert_same_rotation(transforms["A"][0].rotation, Quat::from_rotation_x(-0.1));
        assert_same_rotation(transforms["A"][1].rotation, Quat::from_rotation_x(-0.2));
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let scenario = Scenario::from_json(&format!(
            r#"{{"entities": [{}]}}"#,
            entity("hash", "A", 0.0, 0.0, 0.0)
        ))
        .unwrap();
        let transform = InstanceTransform::from_entity(&scenario.entities[0].entity);

        // roll 0 mirrors to a full turn
        assert_same_rotation(transform.rotation, Quat::IDENTITY);
        assert_eq!(transform.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.scale, Vec3::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn test_roll_is_mirrored() {
        let entity = JsonEntity {
            position: JsonVec3::default(),
            rotation: JsonRotation {
                yaw: 0.0,
                pitch: 0.0,
                roll: FRAC_PI_2,
            },
            scale: JsonScale {
                data: JsonVec3 {
                    x: 1.0,
                    y: 1.0,
                    z: 1.0,
                },
            },
        };
        let transform = InstanceTransform::from_entity(&entity);

        // -(2π - π/2) about Z is a quarter turn
        assert_same_rotation(transform.rotation, Quat::from_rotation_z(FRAC_PI_2));
    }

    #[test]
    fn test_axes_apply_x_then_y_then_z() {
        let entity = JsonEntity {
            position: JsonVec3::default(),
            rotation: JsonRotation {
                yaw: -0.3,
                pitch: -0.5,
                roll: TAU + 0.7,
            },
            scale: JsonScale {
                data: JsonVec3::default(),
            },
        };
        let transform = InstanceTransform::from_entity(&entity);
        let expected =
            Quat::from_rotation_z(0.7) * Quat::from_rotation_y(0.5) * Quat::from_rotation_x(0.3);
        assert_same_rotation(transform.rotation, expected);
    }

    #[test]
    fn test_aloc_dir_is_sibling_of_scenario() {
        assert_eq!(
            aloc_dir_for(Path::new("/data/level/scene.json"), "aloc"),
            PathBuf::from("/data/level/aloc")
        );
        assert_eq!(
            aloc_dir_for(Path::new("scene.json"), "collision"),
            PathBuf::from("collision")
        );
    }
}
