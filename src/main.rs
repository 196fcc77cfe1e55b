//! Shimmer Sky headless driver
//!
//! Runs the star field against a counting backend and logs frame
//! statistics. Usage: `shimmer-sky [config.json] [seconds]`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use shimmer_sky::StarfieldConfig;
    use shimmer_sky::renderer::CountingBackend;
    use shimmer_sky::seeded_rng;
    use shimmer_sky::sim::Starfield;

    env_logger::init();
    log::info!("Shimmer Sky (native) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => match StarfieldConfig::from_json(&json) {
                Ok(config) => config,
                Err(e) => {
                    log::error!("Invalid config {}: {}", path, e);
                    return;
                }
            },
            Err(e) => {
                log::error!("Failed to read {}: {}", path, e);
                return;
            }
        },
        None => StarfieldConfig::default(),
    };
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(10.0);

    let mut sky = match Starfield::new(config, seeded_rng(0x5EED)) {
        Ok(sky) => sky,
        Err(e) => {
            log::error!("Failed to build star field: {}", e);
            return;
        }
    };

    // Start collapsed like a window that has not been laid out yet
    let mut backend = CountingBackend::new(0, 0);
    sky.sync_surface(&backend);
    let stats = sky.render_frame(0.0, 0.0, false, &mut backend);
    log::info!("Zero-sized surface: {} draw calls", stats.draw_calls());

    backend = CountingBackend::new(1920, 1080);
    sky.sync_surface(&backend);

    let dt = 1.0 / 60.0;
    let frames = (seconds / dt) as u32;
    let mut t = 0.0;
    for frame in 0..frames {
        backend.reset();
        // First frame after a resize has no history
        let step = if frame == 0 { 0.0 } else { dt };
        t += step;
        let stats = sky.render_frame(t, step, false, &mut backend);
        if frame % 60 == 0 {
            log::info!(
                "t={:.2}s rot={:.3} buckets {}/{} stars {} batches {} comets {}",
                t,
                stats.rotation,
                stats.visible_buckets,
                stats.visible_buckets + stats.culled_buckets,
                stats.stars_drawn,
                stats.star_batches,
                stats.comets_drawn
            );
        }
    }

    backend.reset();
    let debug = sky.render_frame(t, 0.0, true, &mut backend);
    log::info!(
        "Debug frame: {} stars in {} batches, {} outline vertices",
        debug.stars_drawn,
        debug.star_batches,
        debug.line_vertices
    );
    println!(
        "{} stars total, {} drawn, {} draw calls on the last frame",
        sky.grid().total_stars(),
        sky.grid().used_stars(),
        backend.draw_calls()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library and drive `Starfield` from their own frame callback
}
