use clap::Parser;
use placeholder_image::config::setup_logging;
use placeholder_image::render::FontSet;
use placeholder_image::web::AppState;
use tracing::{error, info};

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = placeholder_image::cli::CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        return;
    }

    let font_dir = cli.font_dir.clone();
    let extra_fonts = cli.fonts.clone();
    let loader = tokio::task::spawn_blocking(move || FontSet::discover(&font_dir, &extra_fonts));
    let fonts = match loader.await {
        Ok(fonts) => fonts,
        Err(err) => {
            error!("Font loading failed: {}", err);
            return;
        }
    };
    info!("Font fallback chain: {}", fonts.names().join(" -> "));

    if let Err(err) = placeholder_image::web::setup_server(
        &cli.listen_address,
        cli.port,
        AppState::new(fonts, cli.jpeg_quality),
    )
    .await
    {
        error!("Application error: {}", err);
    }
}
