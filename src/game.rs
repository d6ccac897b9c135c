//! Game session: simulation, renderer and telemetry behind one `tick`

use log::info;

use crate::error::ConfigError;
use crate::renderer::{Renderer, SpriteAsset, Surface};
use crate::settings::Settings;
use crate::sim::{self, GameEvent, GameState, GridMap, Intent};
use crate::telemetry::Telemetry;
use crate::tuning::Tuning;

/// One playthrough of one map
pub struct Game {
    state: GameState,
    renderer: Renderer,
    telemetry: Telemetry,
}

impl Game {
    /// Validate the configuration and set up a fresh session
    pub fn new(map: GridMap, tuning: Tuning, settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        tuning.validate()?;
        settings.validate()?;
        if map.tile_size() != tuning.geometry.tile_size {
            return Err(ConfigError::InvalidTuning(format!(
                "map tile size {} does not match geometry.tile_size {}",
                map.tile_size(),
                tuning.geometry.tile_size
            )));
        }

        info!(
            "Starting session: {}x{} map, seed {}, quality {}, {} rays",
            map.width(),
            map.height(),
            seed,
            settings.quality.as_str(),
            settings.num_rays()
        );

        let state = GameState::new(map, tuning, settings.fov, seed);
        Ok(Self {
            state,
            renderer: Renderer::new(settings),
            telemetry: Telemetry::new(),
        })
    }

    /// Advance the simulation by `dt_ms` and draw the resulting frame
    pub fn tick(
        &mut self,
        intent: &Intent,
        dt_ms: f32,
        surface: &mut dyn Surface,
        sprite: &dyn SpriteAsset,
    ) {
        self.step(intent, dt_ms);
        self.renderer.render(&self.state, surface, sprite);
    }

    /// Advance the simulation without rendering
    pub fn step(&mut self, intent: &Intent, dt_ms: f32) {
        sim::tick(&mut self.state, intent, dt_ms);
        self.telemetry.record(&self.state);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Events raised by the most recent tick
    pub fn events(&self) -> &[GameEvent] {
        &self.state.events
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }
}
