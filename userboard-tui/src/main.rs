mod app;
mod modals;
mod ui;

use std::fs::File;

use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;
use userboard_lib::api::DEFAULT_ENDPOINT;
use userboard_lib::api::UserClient;

#[tokio::main]
async fn main() {
    let log_file = File::create("userboard-tui.log").expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let client = UserClient::new(DEFAULT_ENDPOINT).expect("Default endpoint is invalid");

    // One fetch at startup; the result is delivered to the event loop over a
    // channel so the UI stays responsive while loading.
    let (tx, rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        let _ = tx.send(client.fetch_users().await);
    });

    // The terminal loop blocks on input, so it runs on a blocking task while
    // the fetch task proceeds on the runtime.
    match tokio::task::spawn_blocking(move || app::run(rx)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => eprintln!("Error: {e}"),
        Err(e) => eprintln!("Error: {e}"),
    }
}
