use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::math::EulerRot;
use bevy::prelude::*;
use bevy::render::render_resource::TextureUsages;

use crate::constants::render_settings::{
    CAMERA_SMOOTHING, CLEAR_COLOUR, MAX_ORBIT_DISTANCE, MIN_ORBIT_DISTANCE, ORBIT_SENSITIVITY,
    PAN_SENSITIVITY, PITCH_LIMIT, ZOOM_STEP,
};
use crate::engine::assets::scene_manifest::CameraSettings;
use crate::engine::render::water::DepthRange;

/// Orbit state. The camera sits `distance` away from `focus_point` and looks at it.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl ViewportCamera {
    pub fn looking_at(eye: Vec3, focus_point: Vec3) -> Self {
        let offset = eye - focus_point;
        let distance = offset.length().clamp(MIN_ORBIT_DISTANCE, MAX_ORBIT_DISTANCE);
        let direction = offset.normalize_or(Vec3::Z);
        Self {
            focus_point,
            distance,
            yaw: direction.x.atan2(direction.z),
            pitch: (-direction.y.asin()).clamp(-PITCH_LIMIT, PITCH_LIMIT),
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    pub fn eye_position(&self) -> Vec3 {
        self.focus_point + self.rotation() * Vec3::Z * self.distance
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye_position()).with_rotation(self.rotation())
    }

    pub fn orbit(&mut self, delta: Vec2) {
        self.yaw -= delta.x * ORBIT_SENSITIVITY;
        self.pitch = (self.pitch - delta.y * ORBIT_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Slide the focus point in the view plane, scaled so the ground tracks the cursor.
    pub fn pan(&mut self, delta: Vec2) {
        let rotation = self.rotation();
        let scale = self.distance * PAN_SENSITIVITY;
        self.focus_point += (rotation * Vec3::NEG_X * delta.x + rotation * Vec3::Y * delta.y) * scale;
    }

    /// Positive scroll moves closer.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance * (1.0 - scroll * ZOOM_STEP))
            .clamp(MIN_ORBIT_DISTANCE, MAX_ORBIT_DISTANCE);
    }

    /// Move the focus point across the ground plane. `input.y` is forward.
    pub fn walk(&mut self, input: Vec2, delta_secs: f32) {
        if input == Vec2::ZERO {
            return;
        }
        let yaw = Quat::from_rotation_y(self.yaw);
        let forward = yaw * Vec3::NEG_Z;
        let right = yaw * Vec3::X;
        let speed = self.distance.clamp(2.0, 200.0);
        self.focus_point += (right * input.x + forward * input.y).normalize() * speed * delta_secs;
    }
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self::looking_at(Vec3::new(10.0, 20.0, 10.0), Vec3::ZERO)
    }
}

/// Spawn the scene camera and its orbit state from the manifest's camera block.
///
/// Depth must be sampleable and single-sampled so the compositor can read it,
/// and tonemapping stays off so the main texture holds display-ready sRGB.
pub fn spawn_viewport_camera(commands: &mut Commands, settings: &CameraSettings) {
    let eye = Vec3::from_array(settings.eye);
    let focus = Vec3::from_array(settings.focus);
    let viewport_camera = ViewportCamera::looking_at(eye, focus);

    commands.spawn((
        Camera3d {
            depth_texture_usages: (TextureUsages::RENDER_ATTACHMENT
                | TextureUsages::TEXTURE_BINDING)
                .into(),
            ..default()
        },
        Camera {
            clear_color: ClearColorConfig::Custom(CLEAR_COLOUR),
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: settings.fov_degrees.to_radians(),
            near: settings.near,
            far: settings.far,
            ..default()
        }),
        DepthRange {
            near: settings.near,
            far: settings.far,
        },
        Msaa::Off,
        Tonemapping::None,
        viewport_camera.transform(),
    ));
    commands.insert_resource(viewport_camera);
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut viewport_camera: ResMut<ViewportCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|motion| motion.delta).sum();
    if mouse_delta != Vec2::ZERO {
        if mouse_button.pressed(MouseButton::Left) {
            viewport_camera.orbit(mouse_delta);
        } else if mouse_button.pressed(MouseButton::Right) {
            viewport_camera.pan(mouse_delta);
        }
    }

    let scroll: f32 = scroll_events
        .read()
        .map(|event| match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y * 0.05,
        })
        .sum();
    if scroll.abs() > f32::EPSILON {
        viewport_camera.zoom(scroll);
    }

    let mut move_input = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        move_input.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        move_input.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        move_input.x += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        move_input.x -= 1.0;
    }
    viewport_camera.walk(move_input, time.delta_secs());

    let target = viewport_camera.transform();
    let lerp_speed = (CAMERA_SMOOTHING * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform
        .translation
        .lerp(target.translation, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target.rotation, lerp_speed);
}
