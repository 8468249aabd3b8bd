// ui.rs - Controls, canvas and status line

use eframe::egui;
use egui::{Color32, Modifiers, Rect, Sense, Vec2};
use log::{debug, error};

use conway::PATTERNS;
use grid_display::{ClickAction, Engine, EngineOptions, FrameHost, GridDimensions, Palette, Surface};

use crate::GameOfLife;

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 4.0;

/// Quick picks shown next to the rate slider.
const RATE_MARKS: [u32; 6] = [4, 10, 15, 20, 30, 60];

/// Command/ctrl-click stamps a glider, a plain click toggles one cell.
pub fn click_action(modifiers: Modifiers) -> ClickAction {
    if modifiers.command || modifiers.ctrl {
        ClickAction::Glider
    } else {
        ClickAction::Toggle
    }
}

impl eframe::App for GameOfLife {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}

impl GameOfLife {
    /// One egui pass: deliver the pending display frame, then lay out the window.
    pub fn show(&mut self, ctx: &egui::Context) {
        // Deliver the frame requested last time round
        let now = self.scheduler.host().now_ms();
        if let Some(handle) = self.scheduler.host_mut().take_due() {
            self.scheduler.on_frame(handle, now);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Conway's Game of Life");

            self.controls(ui);
            ui.separator();
            self.settings(ui);
            ui.separator();

            ui.label("Click a cell to toggle it. Ctrl/⌘-click drops a glider.");
            ui.separator();

            self.canvas(ui, ctx);
            ui.separator();
            self.status(ui);
        });
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let button_text = if self.scheduler.is_running() { "⏸ Pause" } else { "▶ Play" };
            if ui.button(button_text).clicked() {
                self.scheduler.toggle_running();
            }

            if ui.add_enabled(!self.scheduler.is_running(), egui::Button::new("⏭ Step")).clicked() {
                self.scheduler.step();
            }

            if ui.button("⏹ Clear").clicked() {
                self.scheduler.stop();
                self.scheduler.with_engine(|universe| universe.clear());
            }

            if ui.button("🎲 New").clicked() {
                self.rebuild();
            }
            ui.checkbox(&mut self.empty, "Empty");

            ui.separator();

            // Pattern dropdown
            ui.label("Pattern:");
            egui::ComboBox::from_id_source("pattern_selector")
                .selected_text(PATTERNS[self.selected_pattern].name)
                .show_ui(ui, |ui| {
                    for (i, pattern) in PATTERNS.iter().enumerate() {
                        ui.selectable_value(&mut self.selected_pattern, i, pattern.name);
                    }
                });

            if ui.button("Apply Pattern").clicked() {
                self.scheduler.stop();
                if let Some(pattern) = PATTERNS.get(self.selected_pattern) {
                    self.scheduler.with_engine(|universe| universe.apply_pattern(pattern));
                }
            }
        });
    }

    fn settings(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Speed:");
            let slider = egui::Slider::new(&mut self.rate, 0..=60).suffix(" gen/sec");
            let mut changed = ui.add(slider).changed();
            for mark in RATE_MARKS {
                if ui.small_button(mark.to_string()).clicked() {
                    self.rate = mark;
                    changed = true;
                }
            }
            if changed {
                if let Err(err) = self.scheduler.set_target_rate(self.rate) {
                    error!("{err}");
                }
            }
        });

        ui.horizontal(|ui| {
            ui.label("Grid:");
            let width = ui.add(egui::Slider::new(&mut self.grid_width, 8..=256).text("wide"));
            let height = ui.add(egui::Slider::new(&mut self.grid_height, 8..=256).text("high"));
            if width.changed() || height.changed() {
                let dims = GridDimensions::new(self.grid_width, self.grid_height);
                if let Err(err) = self.scheduler.set_grid_size(dims) {
                    error!("could not resize grid: {err}");
                }
            }

            ui.separator();

            ui.label("Cell:");
            if ui.add(egui::Slider::new(&mut self.cell_size, 1..=20).suffix(" px")).changed() {
                if let Err(err) = self.scheduler.set_cell_size(self.cell_size) {
                    error!("could not change cell size: {err}");
                }
            }

            ui.separator();

            ui.label("Zoom:");
            ui.add(egui::Slider::new(&mut self.zoom, MIN_ZOOM..=MAX_ZOOM).suffix("×"));
        });

        ui.horizontal(|ui| {
            let before = self.palette;
            ui.label("Alive:");
            ui.color_edit_button_srgba(&mut self.palette.alive);
            ui.label("Dead:");
            ui.color_edit_button_srgba(&mut self.palette.dead);
            ui.label("Grid:");
            ui.color_edit_button_srgba(&mut self.palette.grid);
            if ui.button("Reset colors").clicked() {
                self.palette = Palette::default();
            }
            if self.palette != before {
                self.scheduler.set_palette(self.palette);
            }
        });
    }

    /// Throw the universe away and start a new one with the current settings.
    fn rebuild(&mut self) {
        let options = EngineOptions {
            empty: self.empty,
            size: Some(GridDimensions::new(self.grid_width, self.grid_height)),
        };
        if let Err(err) = self.scheduler.reset(options) {
            error!("could not build a new universe: {err}");
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let texture_id = self.texture_id(ctx);
        let display_size = self.display_size();
        let modifiers = ui.input(|i| i.modifiers);

        egui::ScrollArea::both()
            .max_height(ui.available_height() - 40.0)
            .show(ui, |ui| {
                let (response, painter) = ui.allocate_painter(display_size, Sense::click());
                let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                painter.image(texture_id, response.rect, uv, Color32::WHITE);

                if response.clicked() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        let action = click_action(modifiers);
                        if let Some((row, col)) = self.scheduler.click(pos, response.rect, action) {
                            debug!("{action:?} at row {row}, col {col}");
                        }
                    }
                }
            });
    }

    /// On-screen size of the canvas: the surface's own resolution times the zoom.
    pub fn display_size(&self) -> Vec2 {
        let (width, height) = self.scheduler.surface().size();
        Vec2::new(width as f32, height as f32) * self.zoom
    }

    fn status(&self, ui: &mut egui::Ui) {
        let (generation, total) = match self.scheduler.engine() {
            Some(universe) => (universe.generation(), universe.dims().cell_count()),
            None => (0, 0),
        };
        let live_cells = self.scheduler.population();

        ui.horizontal(|ui| {
            match self.scheduler.fps() {
                Some(fps) if self.scheduler.is_running() => {
                    ui.label(format!("FPS: {}", fps.latest));
                    ui.label(format!("avg {}", fps.avg));
                    ui.label(format!("min {}", fps.min));
                    ui.label(format!("max {}", fps.max));
                }
                _ => {
                    ui.label("FPS: -");
                }
            }
            ui.separator();
            ui.label(format!("Generation: {generation}"));
            ui.label(format!("Live cells: {live_cells}"));
            let population = if total == 0 { 0.0 } else { live_cells as f32 / total as f32 * 100.0 };
            ui.label(format!("Population: {population:.1}%"));
        });
    }
}
