use anyhow::Result;

mod app;
mod client;
mod config;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use client::ChatClient;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let _logger = logging::init()?;
    tui::install_panic_hook();

    let config = Config::load().unwrap_or_else(|_| Config::new());
    log::info!("starting with endpoint {}", config.endpoint_url);

    let mut app = App::new(ChatClient::new(&config.endpoint_url));
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        if let Some(event) = events.next().await {
            handler::handle_event(&mut app, event);
        }
        app.poll_response().await;
    }

    tui::restore()?;
    Ok(())
}
