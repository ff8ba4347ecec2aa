use bevy::prelude::*;
use bevy::window::PresentMode;

/// On WASM the engine draws into the page's `#bevy` canvas and leaves
/// browser input handling alone so the parent panel keeps working.
pub fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            canvas: Some("#bevy".into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "Shoreline".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}
