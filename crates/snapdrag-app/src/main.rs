//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() {
    env_logger::init();
    log::info!("Starting SnapDrag");

    let config = match std::env::args().nth(1) {
        Some(path) => match snapdrag_app::AppConfig::from_file(&path) {
            Ok(config) => {
                log::info!("Loaded drag config from: {}", path);
                config
            }
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => snapdrag_app::AppConfig::default(),
    };

    if let Err(e) = snapdrag_app::App::run(config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
