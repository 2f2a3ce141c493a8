mod app;
mod frame_clock;
mod input;
mod navigation;
mod preferences;
mod ui;

fn main() -> eframe::Result {
    app::run()
}
