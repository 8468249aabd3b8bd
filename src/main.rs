// main.rs - Conway's Game of Life viewer
// The universe is drawn through the grid_display frame loop; ui.rs holds the controls.

use anyhow::Context as _;
use clap::Parser;
use eframe::egui;
use env_logger::Env;

use conway::UniverseFactory;
use grid_display::{AnimationScheduler, Engine, Palette, PixelSurface};

mod config; // Command-line options
mod host;   // egui-backed display frames
mod ui;     // Controls, canvas and status line

use config::CliArgs;
use host::RepaintHost;

pub type Scheduler = AnimationScheduler<UniverseFactory, PixelSurface, RepaintHost>;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let config = args.scheduler_config().context("invalid settings")?;
    let factory = UniverseFactory::new(args.encoding.into(), args.seed);
    let scheduler = AnimationScheduler::new(factory, PixelSurface::new(0, 0), RepaintHost::new(), config)
        .context("could not build the universe")?;
    let app = GameOfLife::new(scheduler, args.zoom);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 950.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Conway's Game of Life",
        options,
        Box::new(move |cc| {
            let mut app = app;
            app.scheduler.host_mut().attach(cc.egui_ctx.clone());
            Box::new(app)
        }),
    )
    .map_err(|err| anyhow::anyhow!("window closed with an error: {err}"))
}

/// Viewer state: the frame loop plus whatever the controls are bound to.
pub struct GameOfLife {
    pub scheduler: Scheduler,
    texture: Option<egui::TextureHandle>,
    uploaded_revision: u64,

    pub zoom: f32,
    pub rate: u32,
    pub cell_size: u32,
    pub grid_width: u32,
    pub grid_height: u32,
    pub empty: bool,
    pub palette: Palette,
    pub selected_pattern: usize,
}

impl GameOfLife {
    pub fn new(scheduler: Scheduler, zoom: f32) -> Self {
        let config = *scheduler.config();
        let (grid_width, grid_height) = scheduler
            .engine()
            .map(|universe| (universe.width(), universe.height()))
            .unwrap_or((conway::DEFAULT_SIZE, conway::DEFAULT_SIZE));

        Self {
            scheduler,
            texture: None,
            uploaded_revision: 0,
            zoom: zoom.clamp(ui::MIN_ZOOM, ui::MAX_ZOOM),
            rate: config.rate.target(),
            cell_size: config.render.cell_size(),
            grid_width,
            grid_height,
            empty: config.engine.empty,
            palette: config.palette,
            selected_pattern: 0,
        }
    }

    /// Push the surface to the GPU if it changed since the last upload.
    fn texture_id(&mut self, ctx: &egui::Context) -> egui::TextureId {
        let surface = self.scheduler.surface();
        let revision = surface.revision();
        let options = egui::TextureOptions::NEAREST;

        let mut fresh = false;
        let texture = self.texture.get_or_insert_with(|| {
            fresh = true;
            ctx.load_texture("universe", surface.to_color_image(), options)
        });
        if !fresh && revision != self.uploaded_revision {
            texture.set(surface.to_color_image(), options);
        }
        self.uploaded_revision = revision;
        texture.id()
    }
}
