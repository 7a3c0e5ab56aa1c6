mod camera;
mod shell;

use std::time::Instant;

use eframe::{App, Frame, NativeOptions, run_native};
use egui::{Color32, Key, Sense};
use log::{error, info};
use serde::{Deserialize, Serialize};
use terrain_core::{ColorScheme, TerrainConfig, TerrainState, export::save_png};

use camera::OrbitCamera;
use shell::ShellMesh;

// Everything that survives a restart
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct Settings {
    config: TerrainConfig,
    scheme: ColorScheme,
    camera: OrbitCamera,
    bumpy: bool,
}

struct TerrainViewer {
    settings: Settings,
    // slider is for n; size = 2^n + 1
    exp: u32,

    state: Option<TerrainState>,
    shell: Option<ShellMesh>,

    status_message: String,
}

impl TerrainViewer {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings: Settings = cc
            .storage
            .and_then(|s| eframe::get_value(s, eframe::APP_KEY))
            .unwrap_or_default();
        let exp = settings.config.exponent().unwrap_or(10);

        let mut viewer = Self {
            settings,
            exp,
            state: None,
            shell: None,
            status_message: String::new(),
        };
        viewer.generate();
        viewer
    }

    fn generate(&mut self) {
        let start = Instant::now();
        let config = TerrainConfig {
            size: (1 << self.exp) + 1,
            ..self.settings.config.clone()
        };

        // Reuse the live session; a rejected config leaves the old terrain up
        let result = if let Some(state) = self.state.as_mut() {
            state.reconfigure(config)
        } else {
            TerrainState::with_scheme(config, self.settings.scheme).map(|state| {
                self.state = Some(state);
            })
        };
        self.finish_generation(start, result);
    }

    // Step to the next seed, keeping every other setting
    fn next_seed(&mut self) {
        let Some(state) = &mut self.state else {
            self.generate();
            return;
        };
        let start = Instant::now();
        let result = state.reseed(state.config().seed.wrapping_add(1));
        self.finish_generation(start, result);
    }

    fn finish_generation(&mut self, start: Instant, result: terrain_core::Result<()>) {
        if let Err(e) = result {
            error!("terrain generation failed: {}", e);
            self.status_message = format!("Generation error: {}", e);
            return;
        }
        let Some(state) = &self.state else {
            return;
        };

        self.shell = Some(ShellMesh::build(state, self.settings.bumpy));
        self.settings.config = state.config().clone();
        self.status_message = format!(
            "Generated {0}×{0} in {1:.2} ms (seed {2}, max height {3:.1})",
            state.grid().size(),
            start.elapsed().as_secs_f32() * 1000.0,
            state.config().seed,
            state.max_height()
        );
        if state.terrain().repaired_cells > 0 {
            self.status_message += &format!(
                ", {} cells repaired",
                state.terrain().repaired_cells
            );
        }
    }

    fn set_scheme(&mut self, scheme: ColorScheme) {
        self.settings.scheme = scheme;
        if let Some(state) = &mut self.state {
            state.set_scheme(scheme);
            if let Some(shell) = &mut self.shell {
                shell.recolor(state);
            }
        }
        info!("color scheme: {}", scheme);
    }

    fn rebuild_geometry(&mut self) {
        if let Some(state) = &self.state {
            self.shell = Some(ShellMesh::build(state, self.settings.bumpy));
        }
    }

    fn save_png(&mut self) {
        let Some(state) = &self.state else {
            self.status_message = "Nothing to save yet".into();
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG image", &["png"])
            .set_file_name(format!("terrain_{}.png", state.config().seed))
            .save_file()
        else {
            return;
        };

        self.status_message = match save_png(state, &path) {
            Ok(()) => format!("Saved {}", path.display()),
            Err(e) => {
                error!("saving {:?} failed: {}", path, e);
                format!("Save error: {}", e)
            }
        };
    }

    // n cycles the scheme, 3 and 4 zoom out and in
    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (next, zoom_out, zoom_in) = ctx.input(|i| {
            (
                i.key_pressed(Key::N),
                i.key_pressed(Key::Num3),
                i.key_pressed(Key::Num4),
            )
        });
        if next {
            self.set_scheme(self.settings.scheme.next());
        }
        if zoom_out {
            self.settings.camera.zoom_out();
        }
        if zoom_in {
            self.settings.camera.zoom_in();
        }
    }
}

impl App for TerrainViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.handle_keys(ctx);
        let size = (1usize << self.exp) + 1;

        egui::SidePanel::left("controls").show(ctx, |ui| {
            ui.heading("Terrain Shell");
            ui.separator();

            ui.label("Color Scheme");
            let mut scheme = self.settings.scheme;
            egui::ComboBox::from_label("Scheme (n)")
                .selected_text(scheme.label())
                .show_ui(ui, |ui| {
                    for s in ColorScheme::ALL {
                        ui.selectable_value(&mut scheme, s, s.label());
                    }
                });
            if scheme != self.settings.scheme {
                self.set_scheme(scheme);
            }

            ui.separator();

            // Resolution slider
            ui.horizontal(|ui| {
                ui.label("Resolution 2^n+1:");
                ui.add(
                    egui::Slider::new(&mut self.exp, 1..=10)
                        .text(format!("{}×{}", size, size))
                        .step_by(1.0),
                );
            });

            ui.label("Seed");
            ui.add(egui::DragValue::new(&mut self.settings.config.seed).speed(1.0));

            ui.label("Roughness");
            ui.add(egui::Slider::new(&mut self.settings.config.roughness, 0.0..=2.0));

            if ui.checkbox(&mut self.settings.bumpy, "Bumpy shell").changed() {
                self.rebuild_geometry();
            }

            ui.separator();

            if ui.button("Generate Terrain").clicked() {
                self.generate();
                ctx.request_repaint();
            }

            if ui.button("Next Seed").clicked() {
                self.next_seed();
                ctx.request_repaint();
            }

            if ui.button("Save PNG…").clicked() {
                self.save_png();
            }

            if ui.button("Reset Camera").clicked() {
                self.settings.camera = OrbitCamera::default();
            }

            ui.separator();
            if let Some(shell) = &self.shell {
                ui.label(format!(
                    "Preview: every {} cells, {} vertices",
                    shell.stride(),
                    shell.vertex_count()
                ));
            }
            ui.label("Drag to orbit, 3/4 to zoom");
            ui.label(&self.status_message);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(Color32::BLACK))
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), Sense::drag());
                let delta = response.drag_delta();
                if delta != egui::Vec2::ZERO {
                    self.settings.camera.drag(delta.x, delta.y);
                }

                match &self.shell {
                    Some(shell) => {
                        let mesh = shell.paint_mesh(&self.settings.camera, response.rect);
                        painter.add(egui::Shape::mesh(mesh));
                    }
                    None => {
                        painter.text(
                            response.rect.center(),
                            egui::Align2::CENTER_CENTER,
                            "Click “Generate Terrain” to start",
                            egui::FontId::proportional(16.0),
                            Color32::GRAY,
                        );
                    }
                }
            });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }
}

fn main() -> eframe::Result {
    env_logger::init();

    let opts = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    run_native(
        "Terrain Shell",
        opts,
        Box::new(|cc| Ok(Box::new(TerrainViewer::new(cc)))),
    )
}
