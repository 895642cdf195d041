#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use llm_coding_toolset::app;
use llm_coding_toolset::app::Services;
use llm_coding_toolset::config::{self, AppConfig};
use llm_coding_toolset::web_assets;
use std::borrow::Cow;
use std::sync::{Arc, Mutex};
use tao::{
    event::{Event, StartCause, WindowEvent},
    event_loop::{ControlFlow, EventLoopBuilder},
    window::WindowBuilder,
};
use wry::http::{header::CONTENT_TYPE, Request, Response, StatusCode};
use wry::WebViewBuilder;

const ASSET_PROTOCOL: &str = "toolset";

#[cfg(windows)]
const START_URL: &str = "http://toolset.localhost/index.html";
#[cfg(not(windows))]
const START_URL: &str = "toolset://localhost/index.html";

fn serve_asset(request: Request<Vec<u8>>) -> Response<Cow<'static, [u8]>> {
    match web_assets::load(request.uri().path()) {
        Some((data, content_type)) => Response::builder()
            .header(CONTENT_TYPE, content_type)
            .body(data),
        None => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Cow::Borrowed(&b"Not Found"[..])),
    }
    .unwrap_or_else(|e| {
        tracing::error!("Failed to build asset response: {}", e);
        Response::new(Cow::Borrowed(&b""[..]))
    })
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let initial_config = AppConfig::load(None).unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });
    let (width, height) = initial_config.window_size;
    let (pos_x, pos_y) = initial_config.window_position;
    let auto_update = initial_config.auto_update;

    // Create the event loop and window
    let event_loop = EventLoopBuilder::<app::events::UserEvent>::with_user_event().build();

    let window = WindowBuilder::new()
        .with_title("LLM-Coding Tools")
        .with_inner_size(tao::dpi::LogicalSize::new(width, height))
        .with_position(tao::dpi::LogicalPosition::new(pos_x, pos_y))
        .with_min_inner_size(tao::dpi::LogicalSize::new(640, 480))
        .build(&event_loop)
        .expect("Failed to build Window");

    let window = Arc::new(window);

    // Create the shared application state and the event loop proxy
    let proxy = event_loop.create_proxy();
    let state = Arc::new(Mutex::new(app::state::AppState::with_config(
        initial_config,
        None,
    )));
    let services = Services::native().expect("Failed to create HTTP client");

    let ipc_handler_state = state.clone();
    let ipc_handler_proxy = proxy.clone();
    let ipc_handler_services = services.clone();
    let ipc_handler = move |message: String| {
        app::handle_ipc_message(
            message,
            &ipc_handler_services,
            ipc_handler_proxy.clone(),
            ipc_handler_state.clone(),
        );
    };

    let webview = WebViewBuilder::new(&*window)
        .with_custom_protocol(ASSET_PROTOCOL.into(), serve_asset)
        .with_url(START_URL)
        .with_devtools(cfg!(debug_assertions))
        .with_ipc_handler(ipc_handler)
        .build()
        .expect("Failed to build WebView");

    if auto_update {
        app::tasks::start_update_check(services.updates.clone(), proxy.clone(), state.clone());
    }

    let state_for_events = state.clone();
    let window_for_events = window.clone();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::NewEvents(StartCause::Init) => {
                tracing::info!("Application initialized.");
            }
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            }
            | Event::UserEvent(app::events::UserEvent::ExitRequested) => {
                tracing::info!("Close requested. Saving final window state...");
                let Ok(mut state_guard) = state_for_events.lock() else {
                    *control_flow = ControlFlow::Exit;
                    return;
                };
                state_guard.cancel_update_check();
                let size = window_for_events
                    .inner_size()
                    .to_logical::<f64>(window_for_events.scale_factor());
                let position = window_for_events
                    .outer_position()
                    .unwrap_or_default()
                    .to_logical::<f64>(window_for_events.scale_factor());
                state_guard.config.window_size = (size.width, size.height);
                state_guard.config.window_position = (position.x, position.y);

                if let Err(e) = config::settings::save_config(
                    &state_guard.config,
                    state_guard.config_path.as_deref(),
                ) {
                    tracing::error!("Failed to save config on exit: {}", e);
                }
                *control_flow = ControlFlow::Exit;
            }
            Event::UserEvent(user_event) => {
                app::handle_user_event(user_event, &webview);
            }
            _ => (),
        }
    });
}
