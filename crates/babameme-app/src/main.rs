//! Native entry point: replay a gesture script and print the final snapshot.

#[cfg(feature = "native")]
fn main() {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: babameme <script.json>");
        std::process::exit(2);
    };
    log::info!("Replaying {}", path);

    let result = babameme_app::Script::load(&path).and_then(|script| babameme_app::run_script(&script));
    let session = match result {
        Ok(session) => session,
        Err(e) => {
            log::error!("Replay failed: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match session.snapshot().to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize snapshot: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
