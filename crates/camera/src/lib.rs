#![warn(missing_docs)]
//! Camera transforms and screen/world mapping for mesh picking.
//!
//! Window coordinates follow the OpenGL convention: `x` grows to the right,
//! `y` grows upward from the bottom edge of the viewport and the window depth
//! `z` runs from `0` at the near plane to `1` at the far plane.

use glam::{Mat4, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// How normalized device depth relates to window depth for a projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipDepth {
    /// NDC depth in `[-1, 1]` (`Mat4::perspective_rh_gl`, OpenGL).
    #[default]
    NegOneToOne,
    /// NDC depth in `[0, 1]` (`Mat4::perspective_rh`, wgpu/Vulkan/D3D).
    ZeroToOne,
}

impl ClipDepth {
    /// Map window depth in `[0, 1]` to NDC depth.
    pub fn ndc_from_window(self, depth: f32) -> f32 {
        match self {
            ClipDepth::NegOneToOne => depth * 2.0 - 1.0,
            ClipDepth::ZeroToOne => depth,
        }
    }

    /// Map NDC depth back to window depth in `[0, 1]`.
    pub fn window_from_ndc(self, depth: f32) -> f32 {
        match self {
            ClipDepth::NegOneToOne => (depth + 1.0) * 0.5,
            ClipDepth::ZeroToOne => depth,
        }
    }

    /// Perspective projection matching this depth convention.
    pub fn perspective(self, fov: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        match self {
            ClipDepth::NegOneToOne => Mat4::perspective_rh_gl(fov, aspect, near, far),
            ClipDepth::ZeroToOne => Mat4::perspective_rh(fov, aspect, near, far),
        }
    }
}

/// Viewport rectangle in window pixels plus the depth convention of the
/// projection rendered into it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Left edge in pixels.
    pub x: f32,
    /// Bottom edge in pixels.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Depth convention used when mapping window depth to NDC.
    pub clip_depth: ClipDepth,
}

impl Viewport {
    /// Create a viewport with the OpenGL depth convention.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            clip_depth: ClipDepth::default(),
        }
    }

    /// Viewport covering a `width` x `height` window from the origin.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    /// Build a viewport from an `(x, y, width, height)` vector.
    pub fn from_vec4(rect: Vec4) -> Self {
        Self::new(rect.x, rect.y, rect.z, rect.w)
    }

    /// Same rectangle with a different depth convention.
    pub fn with_clip_depth(self, clip_depth: ClipDepth) -> Self {
        Self { clip_depth, ..self }
    }

    /// The rectangle as `(x, y, width, height)`.
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.x, self.y, self.width, self.height)
    }

    /// Width over height.
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Convert a position measured from the top-left corner (as window
    /// systems report cursor positions) into bottom-left window coordinates.
    pub fn flip_top_left(&self, position: Vec2) -> Vec2 {
        Vec2::new(position.x, self.y + self.height - position.y)
    }
}

/// Map a window-space point back into world space.
///
/// `win` holds the window `x`, `y` and depth. `model` is the model-view
/// matrix and `proj` the projection. The result is undefined (non-finite)
/// when `proj * model` is singular.
pub fn unproject(win: Vec3, model: &Mat4, proj: &Mat4, viewport: &Viewport) -> Vec3 {
    let inverse = (*proj * *model).inverse();
    let ndc = Vec4::new(
        (win.x - viewport.x) / viewport.width * 2.0 - 1.0,
        (win.y - viewport.y) / viewport.height * 2.0 - 1.0,
        viewport.clip_depth.ndc_from_window(win.z),
        1.0,
    );
    let world = inverse * ndc;
    world.truncate() / world.w
}

/// Map a world-space point into window space (the inverse of [`unproject`]).
pub fn project(world: Vec3, model: &Mat4, proj: &Mat4, viewport: &Viewport) -> Vec3 {
    let clip = *proj * *model * world.extend(1.0);
    let ndc = clip.truncate() / clip.w;
    Vec3::new(
        viewport.x + (ndc.x + 1.0) * 0.5 * viewport.width,
        viewport.y + (ndc.y + 1.0) * 0.5 * viewport.height,
        viewport.clip_depth.window_from_ndc(ndc.z),
    )
}

/// The complete set of transforms a pick query needs: what the renderer
/// drew with, captured as a value instead of read from ambient state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Model-view matrix (world space -> camera space).
    pub view: Mat4,
    /// Projection matrix (camera space -> clip space).
    pub proj: Mat4,
    /// Viewport the frame was rendered into.
    pub viewport: Viewport,
}

impl CameraState {
    /// Bundle explicit transforms.
    pub fn new(view: Mat4, proj: Mat4, viewport: Viewport) -> Self {
        Self {
            view,
            proj,
            viewport,
        }
    }

    /// Unproject a window-space point with these transforms.
    pub fn unproject(&self, win: Vec3) -> Vec3 {
        unproject(win, &self.view, &self.proj, &self.viewport)
    }

    /// Project a world-space point with these transforms.
    pub fn project(&self, world: Vec3) -> Vec3 {
        project(world, &self.view, &self.proj, &self.viewport)
    }
}

/// Look-at perspective camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// World up hint.
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
    /// Depth convention of the projection matrix.
    pub clip_depth: ClipDepth,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: std::f32::consts::FRAC_PI_3, // 60 degrees
            near: 0.1,
            far: 100.0,
            clip_depth: ClipDepth::default(),
        }
    }
}

impl Camera {
    /// Create a camera at `position` looking at `target`.
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            ..Default::default()
        }
    }

    /// Get the forward direction vector (where the camera is looking).
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// Compute the view matrix (world space -> camera space).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Compute the projection matrix (camera space -> clip space).
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        self.clip_depth
            .perspective(self.fov, aspect, self.near, self.far)
    }

    /// Capture the transforms for rendering into `viewport`.
    ///
    /// The viewport's depth convention is replaced by the camera's so the
    /// two can never disagree.
    pub fn state(&self, viewport: Viewport) -> CameraState {
        let viewport = viewport.with_clip_depth(self.clip_depth);
        CameraState::new(
            self.view_matrix(),
            self.projection_matrix(viewport.aspect()),
            viewport,
        )
    }
}
