mod api;
mod camera;
mod components;
mod download;

use api::ApiClient;
use camera::BrowserCamera;
use components::handlers;
use gloo_file::File as GlooFile;
use shared::{
    CameraGuard, ClientConfig, ExportError, PredictError, PredictionResult, RawUpload, Session,
};
use yew::prelude::*;

// Yew msg components
pub enum Msg {
    // Camera path
    StartCamera,
    CameraReady(CameraGuard<BrowserCamera>),
    StopCamera,
    Capture,

    // Upload path
    FileSelected(GlooFile),
    FileRead(RawUpload),

    // Prediction and export
    PredictionFinished(u64, Result<PredictionResult, PredictError>),
    Download,
    ExportFinished(u64, Result<(), ExportError>),

    // UI states
    SetError(Option<String>),
}

// Main component
pub struct Model {
    session: Session<BrowserCamera>,
    config: ClientConfig,
    api: ApiClient,
    error: Option<String>,
    /// Camera permission prompt or file read still pending.
    acquiring: bool,
    /// Data URL of the current image, refreshed on every acquisition.
    preview_url: Option<String>,
}

fn load_config() -> ClientConfig {
    let mut config = ClientConfig::default();
    if let Some(endpoint) = option_env!("SKINSCAN_ENDPOINT") {
        config.endpoint = endpoint.to_string();
    }
    config
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let config = load_config();
        Self {
            session: Session::new(),
            api: ApiClient::new(config.endpoint.clone()),
            config,
            error: None,
            acquiring: false,
            preview_url: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // Camera path
            Msg::StartCamera => handlers::handle_start_camera(self, ctx),
            Msg::CameraReady(camera) => handlers::handle_camera_ready(self, camera),
            Msg::StopCamera => handlers::handle_stop_camera(self),
            Msg::Capture => handlers::handle_capture(self, ctx),

            // Upload path
            Msg::FileSelected(file) => handlers::handle_file_selected(self, ctx, file),
            Msg::FileRead(upload) => handlers::handle_file_read(self, ctx, upload),

            // Prediction and export
            Msg::PredictionFinished(ticket, outcome) => {
                handlers::handle_prediction_finished(self, ticket, outcome)
            }
            Msg::Download => handlers::handle_download(self, ctx),
            Msg::ExportFinished(ticket, outcome) => {
                handlers::handle_export_finished(self, ticket, outcome)
            }

            // UI states
            Msg::SetError(error) => {
                self.error = error;
                self.acquiring = false;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { components::header::render_header() }

                <main class="main-content">
                { components::controls::render_controls(self, ctx) }
                { components::utils::render_error_message(self) }
                { components::preview::render_preview(self, ctx) }
                { components::results::render_results(self, ctx) }
                </main>

                <footer class="app-footer">
                    <p>{"Skin Detector | Fullstack Rust WASM"}</p>
                </footer>
            </div>
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        if let Some(camera) = self.session.camera() {
            camera.attach();
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.session.reset();
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
