mod config;
mod main_lib;

use main_lib::{init_tracing, run};
use settle_core::RecommendationEmitter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let mut emitter = RecommendationEmitter::default();
    let outcome = run(&mut emitter).await;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let written = match outcome {
        Ok(code) => emitter.emit(code, &mut out),
        Err(e) => {
            tracing::error!("Resolution aborted: {:#}", e);
            emitter.emit_unresolved(&mut out)
        }
    };
    if let Err(e) = written {
        tracing::error!("Failed to write recommendation: {}", e);
        std::process::exit(1);
    }
}
