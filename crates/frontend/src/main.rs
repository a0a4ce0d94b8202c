mod app;
mod config;
mod context;
mod guard;
mod routes;
mod storage;
mod views;

use app::App;
use tracing_subscriber::prelude::*;
use tracing_web::MakeWebConsoleWriter;

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    init_tracing();
    yew::Renderer::<App>::new().render();
}

fn init_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new());

    // `log` records already go through wasm_logger
    let subscriber = tracing_subscriber::registry().with(fmt_layer);
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        gloo::console::warn!(format!("Tracing not initialized: {err}"));
    }
}
