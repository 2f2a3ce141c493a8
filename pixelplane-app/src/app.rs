use std::time::Instant;

use eframe::egui;
use tracing::{error, info};

use pixelplane_core::Camera;
use pixelplane_render::{PlotSession, Rgba, ViewportState};

use crate::frame_clock::FrameClock;
use crate::preferences::AppPreferences;

pub(crate) const HUD_MARGIN: f32 = 8.0;
pub(crate) const HUD_CORNER_RADIUS: f32 = 6.0;

// ---------------------------------------------------------------------------
// Application struct
// ---------------------------------------------------------------------------

pub(crate) struct PlotApp {
    // Plot state
    pub(crate) session: PlotSession,
    pub(crate) camera: Camera,
    /// Size of the drawing area, which is also the pixel buffer size.
    pub(crate) panel_size: [u32; 2],

    // Display
    pub(crate) texture: Option<egui::TextureHandle>,
    pub(crate) last_frame_seq: Option<u64>,
    pub(crate) clock: FrameClock,

    // UI state
    pub(crate) show_debug: bool,
    pub(crate) show_grid: bool,
    pub(crate) show_help: bool,
    pub(crate) cursor_world: Option<(f64, f64)>,
    pub(crate) closing: bool,

    pub(crate) preferences: AppPreferences,
}

// ---------------------------------------------------------------------------
// Constructor
// ---------------------------------------------------------------------------

impl PlotApp {
    pub(crate) fn new(prefs: AppPreferences) -> pixelplane_render::Result<Self> {
        let w = (prefs.window_width as u32).max(1);
        let h = (prefs.window_height as u32).max(1);
        let camera = prefs.initial_camera();
        let state = ViewportState::new(camera.bounds(w, h)?, w, h)?;
        let session = PlotSession::spawn(std::sync::Arc::new(state), prefs.shader)?;
        info!(
            width = w,
            height = h,
            shader = prefs.shader.label(),
            "Plot session started"
        );

        Ok(Self {
            session,
            camera,
            panel_size: [w, h],

            texture: None,
            last_frame_seq: None,
            clock: FrameClock::default(),

            show_debug: prefs.show_debug_panel,
            show_grid: prefs.show_grid,
            show_help: false,
            cursor_world: None,
            closing: false,

            preferences: prefs,
        })
    }

    /// Copy the published frame into the staging texture if it changed.
    fn upload_frame(&mut self, ctx: &egui::Context) {
        let last = self.last_frame_seq.unwrap_or(u64::MAX);
        let fresh = self.session.state().with_frame_if_newer(last, |frame| {
            egui::ColorImage::from_rgba_unmultiplied(
                [frame.width() as usize, frame.height() as usize],
                frame.pixels(),
            )
        });
        let Some((seq, image)) = fresh else {
            return;
        };
        self.last_frame_seq = Some(seq);
        if let Some(texture) = self.texture.as_mut() {
            texture.set(image, egui::TextureOptions::NEAREST);
        } else {
            self.texture = Some(ctx.load_texture("plot", image, egui::TextureOptions::NEAREST));
        }
    }

    fn draw_plot(&mut self, ctx: &egui::Context) {
        let Rgba { r, g, b, .. } = Rgba::BACKDROP;
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::from_rgb(r, g, b)))
            .show(ctx, |ui| {
                let available = ui.available_size();
                let width = available.x.max(1.0) as u32;
                let height = available.y.max(1.0) as u32;

                self.check_resize(width, height);
                self.upload_frame(ctx);

                let (response, painter) =
                    ui.allocate_painter(available, egui::Sense::click_and_drag());

                if let Some(ref tex) = self.texture {
                    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    painter.image(tex.id(), response.rect, uv, egui::Color32::WHITE);
                }

                if self.show_grid {
                    self.draw_grid(&painter, response.rect);
                }

                self.handle_canvas_input(ctx, &response);
            });
    }

    /// Close the window once the compute side has stopped on its own.
    fn check_worker(&mut self, ctx: &egui::Context) {
        if self.closing || self.session.is_alive() {
            return;
        }
        self.closing = true;
        error!("Compute worker stopped, closing window");
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }
}

// ---------------------------------------------------------------------------
// eframe::App
// ---------------------------------------------------------------------------

impl eframe::App for PlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());
        self.clock.tick(Instant::now());
        self.check_worker(ctx);

        self.draw_plot(ctx);
        self.handle_keyboard(ctx);
        self.show_debug_panel(ctx);

        ctx.request_repaint_after(FrameClock::repaint_interval(self.preferences.target_fps));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        let [w, h] = self.panel_size;
        self.preferences.window_width = w as f32;
        self.preferences.window_height = h as f32;
        self.preferences.show_grid = self.show_grid;
        self.preferences.show_debug_panel = self.show_debug;
        self.preferences.save();

        if let Err(e) = self.session.shutdown() {
            error!("Compute worker did not shut down cleanly: {e}");
        }
        info!("Saved preferences on exit");
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub(crate) fn run() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting PixelPlane");

    let prefs = AppPreferences::load();

    let viewport = egui::ViewportBuilder::default()
        .with_title("PixelPlane")
        .with_inner_size([prefs.window_width, prefs.window_height])
        .with_min_inner_size([64.0, 48.0]);

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "PixelPlane",
        options,
        Box::new(move |_cc| create_app(prefs)),
    )
}

fn create_app(
    prefs: AppPreferences,
) -> Result<Box<dyn eframe::App>, Box<dyn std::error::Error + Send + Sync>> {
    Ok(Box::new(PlotApp::new(prefs)?))
}
