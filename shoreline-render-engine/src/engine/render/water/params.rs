//! Editable look of the water surface.
//!
//! [`WaterParams`] is what the parameter panel and the scene manifest edit.
//! Colours are sRGB triples; the GPU-side uniform converts them to linear
//! when it is derived (see `uniforms::WaterSurfaceUniform`).

use bevy::prelude::*;
use constants::water::{
    COLOR_CHANNEL_RANGE, DEFAULT_DEEP_COLOR, DEFAULT_DEEP_TRANSMIT_ALPHA, DEFAULT_DEPTH_FALLOFF,
    DEFAULT_FOAM_COLOR, DEFAULT_FOAM_VELOCITY, DEFAULT_HIGHLIGHT_COLOR,
    DEFAULT_SHADOW_COLOR, DEFAULT_SHALLOW_TRANSMIT_ALPHA, DEFAULT_SURFACE_COLOR,
    DEPTH_FALLOFF_RANGE, FOAM_VELOCITY_RANGE, TRANSMIT_ALPHA_RANGE,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum WaterParamsError {
    #[error("{name} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("depth falloff must be positive, got {0}")]
    NonPositiveFalloff(f32),
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterParams {
    pub foam_color: [f32; 3],
    pub surface_color: [f32; 3],
    pub deep_color: [f32; 3],
    pub highlight_color: [f32; 3],
    pub shadow_color: [f32; 3],
    /// World units of water over which shallowness decays by 1/e.
    pub depth_falloff: f32,
    pub foam_velocity: [f32; 2],
    /// Fraction of the underlying scene visible through shallow water.
    pub shallow_transmit_alpha: f32,
    pub deep_transmit_alpha: f32,
}

impl Default for WaterParams {
    fn default() -> Self {
        Self {
            foam_color: DEFAULT_FOAM_COLOR,
            surface_color: DEFAULT_SURFACE_COLOR,
            deep_color: DEFAULT_DEEP_COLOR,
            highlight_color: DEFAULT_HIGHLIGHT_COLOR,
            shadow_color: DEFAULT_SHADOW_COLOR,
            depth_falloff: DEFAULT_DEPTH_FALLOFF,
            foam_velocity: DEFAULT_FOAM_VELOCITY,
            shallow_transmit_alpha: DEFAULT_SHALLOW_TRANSMIT_ALPHA,
            deep_transmit_alpha: DEFAULT_DEEP_TRANSMIT_ALPHA,
        }
    }
}

impl WaterParams {
    /// Check every field against the panel's editable ranges.
    ///
    /// A falloff of exactly zero is in range for the panel but would divide by
    /// zero in the shader, so it is rejected separately.
    pub fn validate(&self) -> Result<(), WaterParamsError> {
        let colours = [
            ("foam_color", self.foam_color),
            ("surface_color", self.surface_color),
            ("deep_color", self.deep_color),
            ("highlight_color", self.highlight_color),
            ("shadow_color", self.shadow_color),
        ];
        for (name, colour) in colours {
            for channel in colour {
                check_range(name, channel, COLOR_CHANNEL_RANGE)?;
            }
        }

        check_range("depth_falloff", self.depth_falloff, DEPTH_FALLOFF_RANGE)?;
        if self.depth_falloff <= 0.0 {
            return Err(WaterParamsError::NonPositiveFalloff(self.depth_falloff));
        }
        for component in self.foam_velocity {
            check_range("foam_velocity", component, FOAM_VELOCITY_RANGE)?;
        }
        check_range(
            "shallow_transmit_alpha",
            self.shallow_transmit_alpha,
            TRANSMIT_ALPHA_RANGE,
        )?;
        check_range(
            "deep_transmit_alpha",
            self.deep_transmit_alpha,
            TRANSMIT_ALPHA_RANGE,
        )
    }
}

fn check_range(name: &'static str, value: f32, (min, max): (f32, f32)) -> Result<(), WaterParamsError> {
    // NaN is never contained.
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(WaterParamsError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

/// Convert an sRGB triple to linear RGBA with full alpha.
pub fn srgb_to_linear_vec4(colour: [f32; 3]) -> Vec4 {
    let linear = Color::srgb(colour[0], colour[1], colour[2]).to_linear();
    Vec4::from_array(linear.to_f32_array())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(WaterParams::default().validate(), Ok(()));
    }

    #[test]
    fn out_of_range_fields_are_named() {
        let params = WaterParams {
            foam_velocity: [0.1, 1.5],
            ..default()
        };
        assert!(matches!(
            params.validate(),
            Err(WaterParamsError::OutOfRange { name: "foam_velocity", .. })
        ));

        let params = WaterParams {
            deep_color: [0.0, -0.1, 0.0],
            ..default()
        };
        assert!(matches!(
            params.validate(),
            Err(WaterParamsError::OutOfRange { name: "deep_color", .. })
        ));
    }

    #[test]
    fn zero_falloff_is_rejected() {
        let params = WaterParams {
            depth_falloff: 0.0,
            ..default()
        };
        assert_eq!(params.validate(), Err(WaterParamsError::NonPositiveFalloff(0.0)));
    }

    #[test]
    fn nan_is_out_of_range() {
        let params = WaterParams {
            shallow_transmit_alpha: f32::NAN,
            ..default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let params: WaterParams =
            serde_json::from_str(r#"{ "depth_falloff": 1.2, "foam_color": [1.0, 1.0, 1.0] }"#)
                .unwrap();
        assert_eq!(params.depth_falloff, 1.2);
        assert_eq!(params.foam_color, [1.0, 1.0, 1.0]);
        assert_eq!(params.surface_color, DEFAULT_SURFACE_COLOR);
    }

    #[test]
    fn linear_conversion_keeps_endpoints() {
        assert_eq!(srgb_to_linear_vec4([0.0, 1.0, 0.0]), Vec4::new(0.0, 1.0, 0.0, 1.0));
        let mid = srgb_to_linear_vec4([0.5, 0.5, 0.5]);
        assert!(mid.x > 0.2 && mid.x < 0.25);
    }
}
