use bon::bon;
use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::geometry::{FloatType, WorldPoint, WorldVector};
use crate::scene::CameraPose;

/// Pitch is kept within this many radians of the horizon.
pub const PITCH_LIMIT: FloatType = 1.5;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Radians per pixel of pointer drag.
    pub rotation_speed: FloatType,
    /// Distance moved per wheel event.
    pub zoom_step: FloatType,
    /// Distance moved per key press.
    pub move_speed: FloatType,
}

impl Default for CameraSettings {
    fn default() -> Self {
        CameraSettings {
            rotation_speed: 0.005,
            zoom_step: 0.2,
            move_speed: 0.1,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveKey {
    Forward,
    Back,
    Left,
    Right,
}

impl MoveKey {
    /// Maps WASD key names, case insensitive.
    pub fn from_key_name(name: &str) -> Option<MoveKey> {
        match name.to_ascii_lowercase().as_str() {
            "w" => Some(MoveKey::Forward),
            "s" => Some(MoveKey::Back),
            "a" => Some(MoveKey::Left),
            "d" => Some(MoveKey::Right),
            _ => None,
        }
    }
}

/// Semantic camera input, already separated from platform events.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CameraInput {
    /// Pointer drag by a number of pixels.
    Drag { dx: FloatType, dy: FloatType },
    /// Wheel scroll, negative values scroll toward the scene.
    Wheel { delta: FloatType },
    Key(MoveKey),
}

/// First person camera: position plus yaw and pitch.
///
/// The orientation is `Ry(yaw) * Rx(pitch)`; the camera looks along its local -Z.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraRig {
    position: WorldPoint,
    yaw: FloatType,
    pitch: FloatType,
    settings: CameraSettings,
}

#[bon]
impl CameraRig {
    #[builder]
    pub fn new(
        #[builder(default = WorldPoint::origin())] position: WorldPoint,
        #[builder(default)] yaw: FloatType,
        #[builder(default)] pitch: FloatType,
        #[builder(default)] settings: CameraSettings,
    ) -> CameraRig {
        CameraRig {
            position,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            settings,
        }
    }
}

impl CameraRig {
    pub fn from_pose(pose: &CameraPose, settings: CameraSettings) -> CameraRig {
        CameraRig::builder()
            .position(WorldPoint::from(pose.position))
            .yaw(pose.yaw)
            .pitch(pose.pitch)
            .settings(settings)
            .build()
    }

    pub fn position(&self) -> WorldPoint {
        self.position
    }

    pub fn yaw(&self) -> FloatType {
        self.yaw
    }

    pub fn pitch(&self) -> FloatType {
        self.pitch
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position.into(),
            yaw: self.yaw,
            pitch: self.pitch,
        }
    }

    pub fn rotation(&self) -> Rotation3<FloatType> {
        Rotation3::from_axis_angle(&Vector3::y_axis(), self.yaw)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), self.pitch)
    }

    /// Rotation as nine floats, column major.
    pub fn matrix(&self) -> [FloatType; 9] {
        let mut ret = [0.0; 9];
        ret.copy_from_slice(self.rotation().matrix().as_slice());
        ret
    }

    /// First column of the rotation. Pitch does not affect it, so it stays horizontal.
    pub fn right(&self) -> WorldVector {
        self.rotation().matrix().column(0).into_owned()
    }

    pub fn up(&self) -> WorldVector {
        self.rotation().matrix().column(1).into_owned()
    }

    /// Viewing direction, including pitch.
    pub fn forward(&self) -> WorldVector {
        -self.rotation().matrix().column(2).into_owned()
    }

    /// Rotates by a pointer drag. Returns true if the orientation changed.
    pub fn orbit(&mut self, dx: FloatType, dy: FloatType) -> bool {
        let yaw = self.yaw - dx * self.settings.rotation_speed;
        let pitch =
            (self.pitch + dy * self.settings.rotation_speed).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        let changed = yaw != self.yaw || pitch != self.pitch;
        self.yaw = yaw;
        self.pitch = pitch;
        changed
    }

    /// Moves one zoom step along the view direction, forward for negative deltas.
    /// Returns true if the camera moved.
    pub fn dolly(&mut self, delta: FloatType) -> bool {
        if delta == 0.0 || delta.is_nan() {
            return false;
        }
        let direction = if delta < 0.0 { 1.0 } else { -1.0 };
        self.translate(self.forward() * (self.settings.zoom_step * direction))
    }

    /// Moves by one key press. Forward and back follow the view direction, strafing is horizontal.
    pub fn step(&mut self, key: MoveKey) -> bool {
        let speed = self.settings.move_speed;
        let offset = match key {
            MoveKey::Forward => self.forward() * speed,
            MoveKey::Back => -self.forward() * speed,
            MoveKey::Left => -self.right() * speed,
            MoveKey::Right => self.right() * speed,
        };
        self.translate(offset)
    }

    /// Applies an input event. Returns true if the pose changed.
    pub fn apply(&mut self, input: &CameraInput) -> bool {
        match *input {
            CameraInput::Drag { dx, dy } => self.orbit(dx, dy),
            CameraInput::Wheel { delta } => self.dolly(delta),
            CameraInput::Key(key) => self.step(key),
        }
    }

    fn translate(&mut self, offset: WorldVector) -> bool {
        let position = self.position + offset;
        let changed = position != self.position;
        self.position = position;
        changed
    }
}
