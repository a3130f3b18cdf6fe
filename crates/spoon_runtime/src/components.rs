//! Scene components used by the runtime's systems.

use glam::{EulerRot, Mat4, Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in degrees.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Model matrix: translation * rotation(Z * Y * X) * scale.
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::ZYX,
            self.rotation.z.to_radians(),
            self.rotation.y.to_radians(),
            self.rotation.x.to_radians(),
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }

    pub fn forward(&self) -> Vec3 {
        let pitch = self.rotation.x.to_radians();
        let yaw = self.rotation.y.to_radians();
        Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

/// Linear velocity in units per second plus spin in degrees per second.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    pub linear: Vec3,
    pub angular: Vec3,
}

/// Handle to GPU-side mesh data; the runtime only needs its index count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshHandle {
    pub id: u32,
    pub index_count: u32,
}

impl MeshHandle {
    pub const CUBE: MeshHandle = MeshHandle {
        id: 0,
        index_count: 36,
    };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshRenderer {
    pub mesh: MeshHandle,
    pub visible: bool,
}

impl MeshRenderer {
    pub fn new(mesh: MeshHandle) -> Self {
        Self {
            mesh,
            visible: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Euler angles in degrees.
    pub rotation: Vec3,
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn view(&self) -> Mat4 {
        let transform = Transform {
            position: self.position,
            rotation: self.rotation,
            scale: Vec3::ONE,
        };
        Mat4::look_to_rh(self.position, transform.forward(), Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(2.0, 2.0, 3.0),
            rotation: Vec3::ZERO,
            fov_y_degrees: 45.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Marks an entity as a camera. The active camera with the highest priority wins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraComponent {
    pub camera: Camera,
    pub is_active: bool,
    pub priority: i32,
}

impl CameraComponent {
    pub fn new(priority: i32) -> Self {
        Self {
            camera: Camera::default(),
            is_active: true,
            priority,
        }
    }
}
