use anyhow::Result;
use glam::Vec3;
use meshpick_camera::{Camera, ClipDepth, Viewport};
use meshpick_picking::{HitSelection, IntersectOptions};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::{debug, warn};

const DEFAULT_CONFIG_PATH: &str = "meshpick.toml";

/// Camera, viewport and picking settings for the `meshpick` binary.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PickConfig {
    pub camera: CameraConfig,
    pub viewport: ViewportConfig,
    pub picking: PickingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub up: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub clip_depth: ClipDepth,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let camera = Camera::default();
        Self {
            position: camera.position.to_array(),
            target: camera.target.to_array(),
            up: camera.up.to_array(),
            fov_degrees: camera.fov.to_degrees(),
            near: camera.near,
            far: camera.far,
            clip_depth: camera.clip_depth,
        }
    }
}

impl CameraConfig {
    /// Build the camera, replacing unusable lens settings with defaults.
    pub fn to_camera(&self) -> Camera {
        let defaults = Camera::default();
        let mut camera = Camera {
            position: Vec3::from_array(self.position),
            target: Vec3::from_array(self.target),
            up: Vec3::from_array(self.up),
            fov: self.fov_degrees.to_radians(),
            near: self.near,
            far: self.far,
            clip_depth: self.clip_depth,
        };

        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            warn!(
                "camera.fov_degrees {} out of range (0, 180). Using {}",
                self.fov_degrees,
                defaults.fov.to_degrees()
            );
            camera.fov = defaults.fov;
        }
        if !(self.near > 0.0 && self.far > self.near) {
            warn!(
                "camera near/far planes {}/{} invalid. Using {}/{}",
                self.near, self.far, defaults.near, defaults.far
            );
            camera.near = defaults.near;
            camera.far = defaults.far;
        }
        if camera.position == camera.target {
            warn!("camera.position equals camera.target. Using default camera placement");
            camera.position = defaults.position;
            camera.target = defaults.target;
        }

        let forward = camera.target - camera.position;
        if !spans_view_plane(camera.up, forward) {
            // First axis not parallel to the view direction
            let up = [defaults.up, Vec3::Z, Vec3::X]
                .into_iter()
                .find(|axis| spans_view_plane(*axis, forward))
                .unwrap_or(defaults.up);
            warn!(
                "camera.up {:?} is zero or parallel to the view direction. Using {:?}",
                self.up,
                up.to_array()
            );
            camera.up = up;
        }
        camera
    }
}

/// Whether `up` and `forward` define a view orientation `look_at_rh` can build.
fn spans_view_plane(up: Vec3, forward: Vec3) -> bool {
    let area = up.cross(forward).length_squared();
    area > 0.0 && area.is_finite()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 800.0,
            height: 600.0,
        }
    }
}

impl ViewportConfig {
    /// Build the viewport, falling back to the default size when degenerate.
    pub fn to_viewport(&self) -> Viewport {
        let usable = |size: f32| size > 0.0 && size.is_finite();
        if usable(self.width) && usable(self.height) {
            Viewport::new(self.x, self.y, self.width, self.height)
        } else {
            let defaults = ViewportConfig::default();
            warn!(
                "viewport size {}x{} is not positive and finite. Using {}x{}",
                self.width, self.height, defaults.width, defaults.height
            );
            Viewport::new(self.x, self.y, defaults.width, defaults.height)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PickingConfig {
    /// Which hit a vertex pick snaps to.
    pub vertex_hit: HitSelection,
    /// Upper bound on intersector shots per query.
    pub max_shots: u32,
    /// World-space distance the intersector steps past each hit.
    pub epsilon: f32,
}

impl Default for PickingConfig {
    fn default() -> Self {
        let options = IntersectOptions::default();
        Self {
            vertex_hit: HitSelection::default(),
            max_shots: options.max_shots,
            epsilon: options.epsilon,
        }
    }
}

impl PickingConfig {
    pub fn intersect_options(&self) -> IntersectOptions {
        let defaults = IntersectOptions::default();
        let mut options = IntersectOptions {
            max_shots: self.max_shots,
            epsilon: self.epsilon,
            ..defaults
        };
        if self.max_shots == 0 {
            warn!("picking.max_shots must be at least 1. Using {}", defaults.max_shots);
            options.max_shots = defaults.max_shots;
        }
        if !(self.epsilon > 0.0 && self.epsilon.is_finite()) {
            warn!("picking.epsilon {} must be positive. Using {}", self.epsilon, defaults.epsilon);
            options.epsilon = defaults.epsilon;
        }
        options
    }
}

impl PickConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<PickConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    PickConfig::default()
                }
            },
            Err(err) => {
                if path == Path::new(DEFAULT_CONFIG_PATH)
                    && err.kind() == std::io::ErrorKind::NotFound
                {
                    debug!("No config at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                PickConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}
