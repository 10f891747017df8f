mod app;
mod landing;
mod subscribe;

use std::sync::Arc;

use arxiv_core::{ApiClient, AppConfig, Worker};
use eframe::{egui, NativeOptions};
use reqwest::{redirect, ClientBuilder};
use tokio::runtime::Runtime;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::app::{AppInit, ArxivApp};

fn main() -> eframe::Result<()> {
    init_tracing();

    let runtime = Arc::new(Runtime::new().expect("failed to initialise Tokio runtime"));
    let config = AppConfig::load();
    let client = ClientBuilder::new()
        .redirect(redirect::Policy::limited(5))
        .user_agent("arXivAgent/0.1")
        .build()
        .expect("failed to build HTTP client");
    let api = match ApiClient::new(client, &config.api) {
        Ok(api) => api,
        Err(e) => {
            error!(error = %e, server_url = %config.api.server_url, "invalid API configuration");
            std::process::exit(2);
        }
    };
    info!(base_url = %api.base_url(), "using backend");
    let (worker, events) = Worker::new(api, runtime.handle().clone());

    let window_size = [config.ui.window_width, config.ui.window_height];
    let init = AppInit {
        runtime,
        worker,
        events,
        config,
    };

    eframe::run_native(
        "arXiv Agent",
        NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(window_size)
                .with_min_inner_size([640.0, 520.0]),
            ..Default::default()
        },
        Box::new(move |cc| {
            install_cjk_fonts(&cc.egui_ctx);
            Box::new(ArxivApp::new(init))
        }),
    )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Translated titles and abstracts come back in Chinese; egui's bundled
/// fonts have no CJK glyphs, so add whichever system font is available as a
/// fallback.
fn install_cjk_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();

    let candidates = [
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
        "/System/Library/Fonts/PingFang.ttc",
        "C:\\Windows\\Fonts\\msyh.ttc",
    ];

    let Some((path, bytes)) = candidates
        .iter()
        .find_map(|path| std::fs::read(path).ok().map(|bytes| (path, bytes)))
    else {
        info!("no CJK font found; translated text may not render");
        return;
    };

    let name = "cjk-fallback".to_owned();
    fonts
        .font_data
        .insert(name.clone(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts.families.entry(family).or_default().push(name.clone());
    }
    info!(%path, "installed CJK fallback font");
    ctx.set_fonts(fonts);
}
