// scheduler.rs - Per-display-frame loop: throttled ticks, decode, draw, FPS
//
// The host pumps display frames; the scheduler asks for one frame at a time
// and only ever has a single request outstanding. Configuration is held in
// plain fields and read on every frame, so a rate change takes effect on the
// very next callback.

use log::{debug, error, info, warn};
use thiserror::Error;

use crate::config::{ConfigError, GridDimensions, Palette, RateConfig, RenderConfig};
use crate::decoder::decode;
use crate::engine::{Engine, EngineFactory, EngineOptions};
use crate::fps::{FpsMeter, FpsStats};
use crate::input::{map_to_cell, CellCoord};
use crate::render::{draw_cells, draw_grid, surface_size};
use crate::surface::Surface;

/// Identifies one requested display frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// The host's display-frame pump and clock.
pub trait FrameHost {
    /// Ask for one callback on the next display frame.
    fn request_frame(&mut self) -> FrameHandle;
    /// Withdraw a request. Unknown or already delivered handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
    /// Monotonic milliseconds.
    fn now_ms(&self) -> f64;
}

/// Display frames to let pass between ticks, or `None` when ticking is off.
///
/// A target of zero means "never advance"; a target above the native rate
/// ticks on every frame.
pub fn skip_count(native_frame_rate: u32, target_renders_per_second: u32) -> Option<u32> {
    if target_renders_per_second == 0 {
        return None;
    }
    Some(native_frame_rate.div_ceil(target_renders_per_second).max(1))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerConfig {
    pub render: RenderConfig,
    pub rate: RateConfig,
    pub native_frame_rate: u32,
    pub palette: Palette,
    /// Options handed to the factory on every reset.
    pub engine: EngineOptions,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            rate: RateConfig::default(),
            native_frame_rate: 60,
            palette: Palette::default(),
            engine: EngineOptions::default(),
        }
    }
}

/// What happened during one frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Not the pending request, or the session is idle.
    Stale,
    /// Sampled FPS. `ticked`: the engine advanced. `drawn`: the new
    /// generation reached the surface (false when its buffer failed to decode).
    Sampled { ticked: bool, drawn: bool, stats: FpsStats },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct AnimationSession {
    running: bool,
    pending: Option<FrameHandle>,
}

/// Drives one engine onto one surface.
pub struct AnimationScheduler<F: EngineFactory, S: Surface, H: FrameHost> {
    factory: F,
    engine: Option<F::Engine>,
    surface: S,
    host: H,
    config: SchedulerConfig,
    session: AnimationSession,
    frame_counter: u32,
    fps: FpsMeter,
    last_stats: Option<FpsStats>,
    population: usize,
}

impl<F, S, H> AnimationScheduler<F, S, H>
where
    F: EngineFactory,
    S: Surface,
    H: FrameHost,
{
    /// Build the first engine, size the surface to it and draw it. Idle.
    pub fn new(mut factory: F, surface: S, host: H, config: SchedulerConfig) -> Result<Self, F::Error> {
        let engine = factory.create(config.engine)?;
        let fps = FpsMeter::new(host.now_ms());
        let mut scheduler = Self {
            factory,
            engine: Some(engine),
            surface,
            host,
            config,
            session: AnimationSession::default(),
            frame_counter: 0,
            fps,
            last_stats: None,
            population: 0,
        };
        scheduler.fit_surface();
        scheduler.redraw();
        Ok(scheduler)
    }

    pub fn is_running(&self) -> bool {
        self.session.running
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.session.pending
    }

    pub fn start(&mut self) {
        if self.session.running {
            return;
        }
        debug!("animation start");
        self.session.running = true;
        self.frame_counter = 0;
        self.fps.reseed(self.host.now_ms());
        self.session.pending = Some(self.host.request_frame());
    }

    pub fn stop(&mut self) {
        if !self.session.running {
            return;
        }
        debug!("animation stop");
        self.session.running = false;
        if let Some(handle) = self.session.pending.take() {
            self.host.cancel_frame(handle);
        }
    }

    pub fn toggle_running(&mut self) {
        if self.session.running { self.stop() } else { self.start() }
    }

    /// Display-frame callback for `handle`, delivered at `now_ms`.
    pub fn on_frame(&mut self, handle: FrameHandle, now_ms: f64) -> FrameOutcome {
        if !self.session.running || self.session.pending != Some(handle) {
            debug!("ignoring stale frame {:?}", handle);
            return FrameOutcome::Stale;
        }
        self.session.pending = None;

        self.frame_counter = self.frame_counter.saturating_add(1);
        let due = match skip_count(self.config.native_frame_rate, self.config.rate.target()) {
            Some(skip) => self.frame_counter >= skip,
            None => false,
        };
        let (ticked, drawn) = if due {
            self.frame_counter = 0;
            self.advance()
        } else {
            (false, false)
        };

        let stats = self.fps.record(now_ms);
        self.last_stats = Some(stats);
        self.session.pending = Some(self.host.request_frame());

        FrameOutcome::Sampled { ticked, drawn, stats }
    }

    /// Tick once and redraw, outside the frame loop (e.g. a "step" button).
    /// Returns whether the engine advanced.
    pub fn step(&mut self) -> bool {
        self.advance().0
    }

    /// (ticked, drawn)
    fn advance(&mut self) -> (bool, bool) {
        let Some(engine) = self.engine.as_mut() else {
            debug!("no engine, skipping tick");
            return (false, false);
        };
        engine.tick();
        (true, self.redraw())
    }

    /// Decode the engine buffer and repaint grid and cells.
    /// Returns false when nothing could be drawn.
    pub fn redraw(&mut self) -> bool {
        let Some(engine) = self.engine.as_ref() else {
            debug!("no engine, skipping redraw");
            return false;
        };

        let dims = engine.dims();
        let states = match decode(engine.cells(), dims, engine.encoding()) {
            Ok(states) => states,
            Err(err) => {
                warn!("skipping frame: {err}");
                return false;
            }
        };

        let cell_size = self.config.render.cell_size();
        draw_grid(&mut self.surface, dims, cell_size, self.config.palette.grid);
        draw_cells(&mut self.surface, &states, cell_size, &self.config.palette);
        self.population = states.alive_count();
        true
    }

    /// Map a pointer click onto the grid and apply `action` to the engine.
    ///
    /// Clicks outside the grid are ignored. Returns the cell that changed.
    pub fn click(&mut self, pointer: egui::Pos2, bounds: egui::Rect, action: ClickAction) -> Option<(u32, u32)> {
        let engine = self.engine.as_mut()?;
        let (width, height) = self.surface.size();
        let intrinsic = egui::vec2(width as f32, height as f32);
        let coord: CellCoord = map_to_cell(pointer, bounds, intrinsic, self.config.render.cell_size());
        let (row, col) = coord.within(engine.dims())?;

        match action {
            ClickAction::Toggle => engine.toggle_cell(col, row),
            ClickAction::Glider => engine.set_glider(col, row),
        }
        self.redraw();
        Some((row, col))
    }

    /// Edit the engine directly, then redraw. `None` when there is no engine.
    pub fn with_engine<R>(&mut self, edit: impl FnOnce(&mut F::Engine) -> R) -> Option<R> {
        let result = edit(self.engine.as_mut()?);
        self.redraw();
        Some(result)
    }

    /// Takes effect on the next frame callback.
    pub fn set_target_rate(&mut self, target: u32) -> Result<(), ConfigError> {
        self.config.rate = RateConfig::new(target)?;
        Ok(())
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.config.palette = palette;
        self.redraw();
    }

    pub fn set_cell_size(&mut self, cell_size: u32) -> Result<(), ResetError<F::Error>> {
        self.config.render = RenderConfig::new(cell_size)?;
        self.reset(self.config.engine)
    }

    pub fn set_grid_size(&mut self, dims: GridDimensions) -> Result<(), ResetError<F::Error>> {
        let options = EngineOptions { size: Some(dims), ..self.config.engine };
        self.reset(options)
    }

    /// Stop, replace the engine with a fresh one, refit the surface and draw.
    /// The session is left idle.
    /// A requested size outside `1..=MAX_GRID_SIDE` is refused before
    /// anything is torn down.
    pub fn reset(&mut self, options: EngineOptions) -> Result<(), ResetError<F::Error>> {
        if let Some(dims) = options.size {
            dims.validate()?;
        }
        self.stop();
        self.engine = None;
        self.config.engine = options;
        self.frame_counter = 0;
        self.population = 0;

        let engine = self.factory.create(options).map_err(|err| {
            error!("could not build engine: {err}");
            ResetError::Engine(err)
        })?;
        info!("new {}x{} grid ({})", engine.width(), engine.height(), engine.encoding());
        self.engine = Some(engine);
        self.fit_surface();
        self.redraw();
        Ok(())
    }

    fn fit_surface(&mut self) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        let (width, height) = surface_size(engine.dims(), self.config.render.cell_size());
        if self.surface.size() != (width, height) {
            self.surface.resize(width, height);
        }
    }

    pub fn engine(&self) -> Option<&F::Engine> {
        self.engine.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn fps(&self) -> Option<FpsStats> {
        self.last_stats
    }

    /// Live cells in the last frame that reached the surface.
    pub fn population(&self) -> usize {
        self.population
    }
}

/// Which engine call a click turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    Toggle,
    Glider,
}

#[derive(Debug, Error)]
pub enum ResetError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("engine construction failed")]
    Engine(#[source] E),
}
