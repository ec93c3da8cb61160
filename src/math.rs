// Math utilities for BoxPick-3D

use glam::{Mat4, Quat, Vec3};

/// Represents a 3D transformation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Create a new transform
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Create an identity transform
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Translation and scale without rotation.
    pub fn from_translation_scale(position: Vec3, scale: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY, scale)
    }

    /// Placement of a stacked object: lifted to `position`, turned by
    /// `yaw_degrees` about Y and then `pitch_degrees` about X.
    pub fn from_yaw_pitch(position: Vec3, yaw_degrees: f32, pitch_degrees: f32) -> Self {
        let rotation = Quat::from_rotation_y(yaw_degrees.to_radians())
            * Quat::from_rotation_x(pitch_degrees.to_radians());
        Self::new(position, rotation, Vec3::ONE)
    }

    /// Generate transformation matrix
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Projection used by a [`Camera`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Orthographic box spanning `[-half_width, half_width] x [-half_height, half_height]`.
    Parallel {
        half_width: f32,
        half_height: f32,
        near: f32,
        far: f32,
    },
    Perspective {
        fovy_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
}

/// A look-at camera with a fixed projection.
///
/// The projection ignores the window size; resizing the window stretches the
/// image instead of correcting the aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub projection: Projection,
}

impl Camera {
    /// Parallel camera with a 1x1 view plane and near/far at 1/20.
    pub fn new(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        Self {
            eye,
            target,
            up,
            projection: Projection::Parallel {
                half_width: 1.0,
                half_height: 1.0,
                near: 1.0,
                far: 20.0,
            },
        }
    }

    pub fn with_parallel(mut self, half_width: f32, half_height: f32, near: f32, far: f32) -> Self {
        self.projection = Projection::Parallel {
            half_width,
            half_height,
            near,
            far,
        };
        self
    }

    pub fn with_perspective(mut self, fovy_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        self.projection = Projection::Perspective {
            fovy_degrees,
            aspect,
            near,
            far,
        };
        self
    }

    pub fn is_parallel(&self) -> bool {
        matches!(self.projection, Projection::Parallel { .. })
    }

    /// Projection matrix with wgpu's 0..1 clip depth.
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Parallel {
                half_width,
                half_height,
                near,
                far,
            } => Mat4::orthographic_rh(-half_width, half_width, -half_height, half_height, near, far),
            Projection::Perspective {
                fovy_degrees,
                aspect,
                near,
                far,
            } => Mat4::perspective_rh(fovy_degrees.to_radians(), aspect, near, far),
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}
