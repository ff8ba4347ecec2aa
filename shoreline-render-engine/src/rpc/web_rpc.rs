use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::engine::assets::scene_manifest::SceneManifest;
use crate::engine::loading::terrain_load::{TerrainLoad, TerrainStatus};
use crate::engine::render::water::WaterSurface;
use crate::engine::render::water::params::WaterParams;
use crate::engine::systems::render_mode::WaterDebugView;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<Value>,
    pub error: Option<RpcError>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<Value>,
}

/// Outgoing message queues, flushed once per frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    pub fn send_notification(&mut self, method: &str, params: Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Engine state the RPC methods read and edit, copied out of the world for one request.
pub struct WaterControls<'a> {
    /// `None` until the water surface exists.
    pub params: Option<&'a mut WaterParams>,
    pub debug_view: &'a mut WaterDebugView,
    /// What `reset_water_params` restores.
    pub defaults: WaterParams,
    pub terrain: TerrainStatus,
}

/// Plugin establishing the WebRPC layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    notify_terrain_status,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(error) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", error);
        }
    }

    // Ownership passes to JS; the listener lives as long as the page.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut surfaces: Query<&mut WaterParams, With<WaterSurface>>,
    mut debug_view: ResMut<WaterDebugView>,
    terrain_load: Res<TerrainLoad>,
    manifest: Option<Res<SceneManifest>>,
) {
    let defaults = manifest
        .map(|manifest| manifest.water.params)
        .filter(|params| params.validate().is_ok())
        .unwrap_or_default();

    for event in events.read() {
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("Discarding malformed RPC message: {parse_error}");
                continue;
            }
        };

        let mut params = surfaces.single().ok().copied();
        let mut view = *debug_view;
        let response = handle_rpc_request(
            &request,
            &mut WaterControls {
                params: params.as_mut(),
                debug_view: &mut view,
                defaults,
                terrain: terrain_load.status(),
            },
        );

        // The single push point for panel edits: unchanged values leave the
        // component untouched, so the render world skips the upload.
        if let (Some(updated), Ok(mut current)) = (params, surfaces.single_mut()) {
            if current.set_if_neq(updated) {
                info!("Water parameters updated over RPC");
            }
        }
        debug_view.set_if_neq(view);

        if let Some(response) = response {
            rpc_interface.queue_response(response);
        }
    }
}

fn notify_terrain_status(terrain_load: Res<TerrainLoad>, mut rpc_interface: ResMut<WebRpcInterface>) {
    if !terrain_load.is_changed() {
        return;
    }
    if let Ok(status) = serde_json::to_value(terrain_load.status()) {
        rpc_interface.send_notification("terrain_status", status);
    }
}

/// Dispatch one request. Notifications (no id) are executed but get no response.
pub fn handle_rpc_request(request: &RpcRequest, controls: &mut WaterControls) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "get_water_params" => handle_get_water_params(controls),
        "set_water_params" => handle_set_water_params(&request.params, controls),
        "reset_water_params" => handle_reset_water_params(controls),
        "set_debug_view" => handle_set_debug_view(&request.params, controls),
        "get_terrain_status" => {
            serde_json::to_value(&controls.terrain).map_err(|e| RpcError::internal_error(&e.to_string()))
        }
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            let id = request.id.clone()?;
            return Some(create_error_response(
                id,
                -32601,
                "Method not found",
                Some(json!({"method": request.method})),
            ));
        }
    };

    let id = request.id.clone()?;
    Some(match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    })
}

fn water_params_mut<'a>(controls: &'a mut WaterControls) -> Result<&'a mut WaterParams, RpcError> {
    controls
        .params
        .as_deref_mut()
        .ok_or_else(|| RpcError::internal_error("Water surface not created yet"))
}

fn params_value(params: &WaterParams) -> Result<Value, RpcError> {
    serde_json::to_value(params).map_err(|e| RpcError::internal_error(&e.to_string()))
}

fn handle_get_water_params(controls: &mut WaterControls) -> Result<Value, RpcError> {
    params_value(water_params_mut(controls)?)
}

/// Overlay the given fields on the current parameters. Nothing is applied
/// unless the merged result passes validation.
fn handle_set_water_params(patch: &Value, controls: &mut WaterControls) -> Result<Value, RpcError> {
    let current = water_params_mut(controls)?;
    let merged = merge_water_params(current, patch)?;
    *current = merged;
    params_value(&merged)
}

pub fn merge_water_params(current: &WaterParams, patch: &Value) -> Result<WaterParams, RpcError> {
    let Some(fields) = patch.as_object() else {
        return Err(RpcError::invalid_params("Expected an object of water parameters"));
    };

    let mut merged = params_value(current)?;
    let Some(target) = merged.as_object_mut() else {
        return Err(RpcError::internal_error("Water parameters did not serialise to an object"));
    };
    for (key, value) in fields {
        if !target.contains_key(key) {
            return Err(RpcError::invalid_params(&format!("Unknown water parameter: {key}")));
        }
        target.insert(key.clone(), value.clone());
    }

    let params = serde_json::from_value::<WaterParams>(merged)
        .map_err(|e| RpcError::invalid_params(&e.to_string()))?;
    params
        .validate()
        .map_err(|e| RpcError::invalid_params(&e.to_string()))?;
    Ok(params)
}

fn handle_reset_water_params(controls: &mut WaterControls) -> Result<Value, RpcError> {
    let defaults = controls.defaults;
    let current = water_params_mut(controls)?;
    *current = defaults;
    params_value(&defaults)
}

fn handle_set_debug_view(params: &Value, controls: &mut WaterControls) -> Result<Value, RpcError> {
    #[derive(Deserialize)]
    struct DebugViewParams {
        view: WaterDebugView,
    }

    let parsed = serde_json::from_value::<DebugViewParams>(params.clone()).map_err(|_| {
        RpcError::invalid_params(
            "Expected 'view': one of shaded, water_depth, shallowness, foam_mask",
        )
    })?;
    *controls.debug_view = parsed.view;

    Ok(json!({
        "success": true,
        "view": parsed.view,
    }))
}

fn create_error_response(id: Value, code: i32, message: &str, data: Option<Value>) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications, then responses, to the parent window.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str, params: Value) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".into(),
            method: method.into(),
            params,
            id: Some(json!(7)),
        }
    }

    fn terrain_ready() -> TerrainStatus {
        TerrainLoad::Spawned.status()
    }

    #[test]
    fn partial_update_keeps_other_fields() {
        let current = WaterParams::default();
        let merged = merge_water_params(&current, &json!({"depth_falloff": 1.25})).unwrap();
        assert_eq!(merged.depth_falloff, 1.25);
        assert_eq!(merged.surface_color, current.surface_color);
    }

    #[test]
    fn invalid_update_changes_nothing() {
        let mut params = WaterParams::default();
        let mut view = WaterDebugView::Shaded;
        let mut controls = WaterControls {
            params: Some(&mut params),
            debug_view: &mut view,
            defaults: WaterParams::default(),
            terrain: terrain_ready(),
        };

        let response = handle_rpc_request(
            &request(
                "set_water_params",
                json!({"depth_falloff": 1.0, "shallow_transmit_alpha": 3.0}),
            ),
            &mut controls,
        )
        .unwrap();
        assert_eq!(response.error.unwrap().code, -32602);
        assert_eq!(params, WaterParams::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = merge_water_params(&WaterParams::default(), &json!({"wave_height": 2.0}))
            .unwrap_err();
        assert!(error.message.contains("wave_height"));
        assert!(merge_water_params(&WaterParams::default(), &json!([1, 2])).is_err());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut params = WaterParams {
            depth_falloff: 1.9,
            ..default()
        };
        let defaults = WaterParams {
            depth_falloff: 0.8,
            ..default()
        };
        let mut view = WaterDebugView::Shaded;
        let mut controls = WaterControls {
            params: Some(&mut params),
            debug_view: &mut view,
            defaults,
            terrain: terrain_ready(),
        };
        let response =
            handle_rpc_request(&request("reset_water_params", Value::Null), &mut controls).unwrap();
        assert!(response.error.is_none());
        assert_eq!(params, defaults);
    }

    #[test]
    fn debug_view_is_parsed_from_snake_case() {
        let mut view = WaterDebugView::Shaded;
        let mut controls = WaterControls {
            params: None,
            debug_view: &mut view,
            defaults: WaterParams::default(),
            terrain: terrain_ready(),
        };
        let response = handle_rpc_request(
            &request("set_debug_view", json!({"view": "foam_mask"})),
            &mut controls,
        )
        .unwrap();
        assert!(response.error.is_none());
        assert_eq!(view, WaterDebugView::FoamMask);
    }

    #[test]
    fn missing_surface_and_unknown_method_are_errors() {
        let mut view = WaterDebugView::Shaded;
        let mut controls = WaterControls {
            params: None,
            debug_view: &mut view,
            defaults: WaterParams::default(),
            terrain: terrain_ready(),
        };

        let response =
            handle_rpc_request(&request("get_water_params", Value::Null), &mut controls).unwrap();
        assert_eq!(response.error.unwrap().code, -32603);

        let response = handle_rpc_request(&request("make_waves", Value::Null), &mut controls).unwrap();
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[test]
    fn terrain_status_is_reported() {
        let mut view = WaterDebugView::Shaded;
        let mut controls = WaterControls {
            params: None,
            debug_view: &mut view,
            defaults: WaterParams::default(),
            terrain: TerrainLoad::Failed("bad png".into()).status(),
        };
        let response =
            handle_rpc_request(&request("get_terrain_status", Value::Null), &mut controls).unwrap();
        assert_eq!(
            response.result.unwrap(),
            json!({"state": "failed", "error": "bad png"})
        );
    }

    #[test]
    fn notifications_get_no_response() {
        let mut view = WaterDebugView::Shaded;
        let mut controls = WaterControls {
            params: None,
            debug_view: &mut view,
            defaults: WaterParams::default(),
            terrain: terrain_ready(),
        };
        let mut notification = request("set_debug_view", json!({"view": "shallowness"}));
        notification.id = None;
        assert!(handle_rpc_request(&notification, &mut controls).is_none());
        assert_eq!(view, WaterDebugView::Shallowness);
    }
}
