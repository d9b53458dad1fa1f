use anyhow::Result;

mod app;
mod camera;
mod color;
mod engine;
mod geometry;
mod lighting;
mod orbit;
mod rendering;
mod rocket;
mod scene_graph;
mod viewer;

fn main() -> Result<()> {
    pretty_env_logger::init();

    pollster::block_on(app::run())?;

    Ok(())
}
