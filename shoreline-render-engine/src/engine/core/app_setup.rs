use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::render::extract_resource::ExtractResourcePlugin;
use bevy_common_assets::json::JsonAssetPlugin;

// Crate engine modules
use crate::constants::render_settings::LOG_FILTER;
use crate::engine::assets::scene_manifest::SceneManifest;
use crate::engine::camera::viewport_camera::camera_controller;
use crate::engine::core::app_state::{AppState, transition_to_running};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::manifest_loader::{ManifestLoader, load_manifest_system, start_loading};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::loading::scene_creator::create_scene_when_ready;
use crate::engine::loading::terrain_load::{TerrainLoad, poll_terrain_load};
use crate::engine::loading::terrain_loader::{TerrainMaps, TerrainMapsLoader};
use crate::engine::loading::texture_loader::check_water_textures;
use crate::engine::render::compositing::FrameCompositorPlugin;
use crate::engine::render::water::WaterSurfacePlugin;
use crate::engine::scene::terrain_material::TerrainMaterial;
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::engine::systems::render_mode::debug_view_system;
// Web RPC
use crate::rpc::web_rpc::WebRpcPlugin;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::systems::fps_tracking::{fps_text_update_system, spawn_fps_overlay};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers SceneManifest as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<SceneManifest>::new(&["json"]))
        // Mirrors the published manifest into the render world.
        .add_plugins(ExtractResourcePlugin::<SceneManifest>::default())
        .init_asset::<TerrainMaps>()
        .init_asset_loader::<TerrainMapsLoader>()
        .add_plugins(MaterialPlugin::<TerrainMaterial>::default())
        .add_plugins(WaterSurfacePlugin)
        .add_plugins(FrameCompositorPlugin)
        .add_plugins(WebRpcPlugin);

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<ManifestLoader>()
        .init_resource::<TerrainLoad>();

    // State-based system scheduling
    app.add_systems(Startup, start_loading)
        .add_systems(
            Update,
            (
                load_manifest_system,
                create_scene_when_ready,
                check_water_textures,
                transition_to_running,
            )
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        // Terrain may arrive late or not at all; it never gates the water.
        .add_systems(Update, poll_terrain_load)
        .add_systems(
            Update,
            (camera_controller, debug_view_system, fps_notification_system)
                .run_if(in_state(AppState::Running)),
        );

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Startup, spawn_fps_overlay)
            .add_systems(Update, fps_text_update_system);
    }

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    let log_config = LogPlugin {
        filter: LOG_FILTER.to_string(),
        ..default()
    };

    DefaultPlugins
        .set(window_config)
        .set(asset_config)
        .set(log_config)
}
