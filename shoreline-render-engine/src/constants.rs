/// Asset paths used by the render engine, relative to the asset root.
pub mod path;

/// Fixed render and logging settings.
pub mod render_settings;
