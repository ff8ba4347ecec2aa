use bevy::prelude::*;
use bevy::render::extract_resource::ExtractResource;
use serde::{Deserialize, Serialize};

/// Which quantity the water pass writes to the screen.
#[derive(
    Resource, ExtractResource, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WaterDebugView {
    #[default]
    Shaded = 0,
    WaterDepth = 1,
    Shallowness = 2,
    FoamMask = 3,
}

impl WaterDebugView {
    pub fn label(self) -> &'static str {
        match self {
            WaterDebugView::Shaded => "Shaded",
            WaterDebugView::WaterDepth => "Water Depth",
            WaterDebugView::Shallowness => "Shallowness",
            WaterDebugView::FoamMask => "Foam Mask",
        }
    }

    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    fn from_key(keyboard: &ButtonInput<KeyCode>) -> Option<Self> {
        [
            (KeyCode::Digit1, WaterDebugView::Shaded),
            (KeyCode::Digit2, WaterDebugView::WaterDepth),
            (KeyCode::Digit3, WaterDebugView::Shallowness),
            (KeyCode::Digit4, WaterDebugView::FoamMask),
        ]
        .into_iter()
        .find_map(|(key, view)| keyboard.just_pressed(key).then_some(view))
    }
}

/// Switch the water debug view with keys 1-4 on native builds.
/// On WASM the view is set over RPC; this system only reports the change.
pub fn debug_view_system(
    mut debug_view: ResMut<WaterDebugView>,
    #[cfg(not(target_arch = "wasm32"))] keyboard: Res<ButtonInput<KeyCode>>,
) {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Some(view) = WaterDebugView::from_key(&keyboard) {
            if debug_view.set_if_neq(view) {
                println!("Water view: {}", view.label());
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    {
        if debug_view.is_changed() && !debug_view.is_added() {
            info!("Water view changed to: {:?}", *debug_view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_views() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        assert_eq!(WaterDebugView::from_key(&keyboard), None);

        keyboard.press(KeyCode::Digit3);
        assert_eq!(
            WaterDebugView::from_key(&keyboard),
            Some(WaterDebugView::Shallowness)
        );
    }

    #[test]
    fn serialises_as_snake_case() {
        assert_eq!(
            serde_json::to_value(WaterDebugView::FoamMask).unwrap(),
            serde_json::json!("foam_mask")
        );
        let parsed: WaterDebugView = serde_json::from_str("\"water_depth\"").unwrap();
        assert_eq!(parsed, WaterDebugView::WaterDepth);
    }
}
