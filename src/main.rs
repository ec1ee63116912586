use std::{thread, time::Duration};

use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use wlwindow::Window;

const FRAME: Duration = Duration::from_millis(16);

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wlwindow=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let title = std::env::args().nth(1).unwrap_or_else(|| "wlwindow".to_owned());
    let mut window = Window::new(title);

    if !window.connect() {
        match window.last_error() {
            Some(err) => anyhow::bail!("failed to open a window: {err}"),
            None => anyhow::bail!("failed to open a window"),
        }
    }

    let (width, height) = window.current_size();
    info!("window is {width}x{height}, handles {:?}", window.native_handles());

    while !window.close_requested() {
        if !window.dispatch_pending() {
            window.request_close();
            break;
        }
        thread::sleep(FRAME);
    }

    window.disconnect();
    Ok(())
}
