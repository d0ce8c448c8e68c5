use std::time::Instant;

use anyhow::Result;

use pose_overlay::app::App;
use pose_overlay::config::Config;
use pose_overlay::osc::OscReceiver;
use pose_overlay::render::MinifbRenderer;

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_PATH.to_string());
    let config = Config::load_or_default(&config_path);

    println!("Pose Overlay ({})", env!("GIT_VERSION"));
    println!("OSC port: {}", config.osc.port);
    println!("Canvas: {}x{}", config.canvas.width, config.canvas.height);
    println!(
        "Store: {:?} (max {}, timeout {:.1}s)",
        config.store.policy, config.store.max_poses, config.store.timeout_secs
    );
    println!(
        "Render: {:?}, threshold {}",
        config.render.profile, config.render.confidence_threshold
    );
    println!("Press ESC to exit");
    println!();

    let mut receiver = OscReceiver::bind(config.osc.port)?;
    let mut renderer = MinifbRenderer::new(
        "Pose Overlay",
        config.canvas.width as usize,
        config.canvas.height as usize,
    )?;
    let mut app = App::new(&config);

    let profile = config.render.profile;
    let threshold = config.render.confidence_threshold;

    // 統計表示用
    let mut tick_count = 0u32;
    let mut message_count = 0u32;
    let mut stats_timer = Instant::now();
    let mut first_frame = true;

    while renderer.is_open() {
        let messages = receiver.drain();
        message_count += messages.len() as u32;

        let dirty = app.tick(&messages, Instant::now());

        // 新着があったtickだけキャンバスを描き直す
        if dirty || first_frame {
            renderer.redraw(app.poses(), profile, threshold);
            first_frame = false;
        }
        renderer.present()?;

        tick_count += 1;
        let elapsed = stats_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            let pose_count = app.pose_count();
            let avg_confidence = if pose_count > 0 {
                app.poses().map(|p| p.average_confidence()).sum::<f32>() / pose_count as f32
            } else {
                0.0
            };
            println!(
                "ticks/s: {:.0}, messages: {}, poses: {}, avg confidence: {:.2}",
                tick_count as f32 / elapsed,
                message_count,
                pose_count,
                avg_confidence
            );
            tick_count = 0;
            message_count = 0;
            stats_timer = Instant::now();
        }
    }

    println!("Shutting down...");
    Ok(())
}
