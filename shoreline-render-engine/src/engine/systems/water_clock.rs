use bevy::prelude::*;
use bevy::render::extract_resource::ExtractResource;

/// Seconds of water animation. Only ever moves forward.
#[derive(Resource, ExtractResource, Clone, Copy, Debug, Default, PartialEq)]
pub struct WaterClock {
    elapsed: f32,
}

impl WaterClock {
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advance by `delta_secs`; negative deltas are ignored.
    pub fn tick(&mut self, delta_secs: f32) {
        self.elapsed += delta_secs.max(0.0);
    }
}

pub fn advance_water_clock(time: Res<Time>, mut clock: ResMut<WaterClock>) {
    clock.tick(time.delta_secs());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_frame_deltas() {
        let mut clock = WaterClock::default();
        clock.tick(0.016);
        clock.tick(0.034);
        assert!((clock.elapsed() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn never_runs_backwards() {
        let mut clock = WaterClock::default();
        clock.tick(1.0);
        clock.tick(-0.5);
        assert_eq!(clock.elapsed(), 1.0);
    }
}
