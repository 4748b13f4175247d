use yew::prelude::*;
use super::super::Model;
use super::super::Msg;
use crate::camera::{self, BrowserCamera};
use crate::download::BrowserDownload;
use gloo_file::File as GlooFile;
use shared::codec;
use shared::session::PendingPrediction;
use shared::{
    Action, ArtifactSink, CameraGuard, ExportError, PredictError, PredictionResult, Predictor,
    RawUpload, SessionError,
};
use wasm_bindgen_futures::spawn_local;

pub fn handle_start_camera(model: &mut Model, ctx: &Context<Model>) -> bool {
    if model.acquiring || !model.session.allows(Action::StartCamera) {
        return false;
    }
    model.acquiring = true;
    model.error = None;

    let link = ctx.link().clone();
    spawn_local(async move {
        match camera::request_device().await {
            // Guarded before it leaves the task: if the component is gone the
            // message is dropped and the guard stops the tracks.
            Ok(stream) => {
                let camera = CameraGuard::new(BrowserCamera::new(stream));
                link.send_message(Msg::CameraReady(camera))
            }
            Err(e) => {
                log::error!("camera request failed: {}", e);
                link.send_message(Msg::SetError(Some(format!("Camera unavailable: {}", e))))
            }
        }
    });

    true
}

pub fn handle_camera_ready(model: &mut Model, camera: CameraGuard<BrowserCamera>) -> bool {
    model.acquiring = false;
    match model.session.start_camera(camera) {
        Ok(()) => {
            model.preview_url = None;
            model.error = None;
        }
        Err(e) => model.error = Some(e.to_string()),
    }
    true
}

pub fn handle_stop_camera(model: &mut Model) -> bool {
    match model.session.stop_camera() {
        Ok(()) => true,
        Err(e) => {
            log::warn!("stop camera rejected: {}", e);
            false
        }
    }
}

pub fn handle_capture(model: &mut Model, ctx: &Context<Model>) -> bool {
    match model.session.begin_capture() {
        Ok(pending) => {
            model.error = None;
            refresh_preview(model);
            send_prediction_request(model, ctx, pending);
        }
        Err(e) => model.error = Some(format!("Capture failed: {}", e)),
    }
    true
}

pub fn handle_file_selected(model: &mut Model, ctx: &Context<Model>, file: GlooFile) -> bool {
    if model.acquiring || !model.session.allows(Action::Upload) {
        return false;
    }
    model.acquiring = true;
    model.error = None;

    let link = ctx.link().clone();
    spawn_local(async move {
        match gloo_file::futures::read_as_bytes(&file).await {
            Ok(bytes) => {
                let upload = RawUpload::new(Some(file.name()), Some(file.raw_mime_type()), bytes);
                link.send_message(Msg::FileRead(upload));
            }
            Err(e) => link.send_message(Msg::SetError(Some(format!(
                "Failed to read {}: {}",
                file.name(),
                e
            )))),
        }
    });

    true
}

pub fn handle_file_read(model: &mut Model, ctx: &Context<Model>, upload: RawUpload) -> bool {
    model.acquiring = false;
    match model.session.begin_upload(&upload, model.config.limits()) {
        Ok(pending) => {
            model.error = None;
            refresh_preview(model);
            send_prediction_request(model, ctx, pending);
        }
        Err(e) => model.error = Some(format!("Upload failed: {}", e)),
    }
    true
}

/// Runs the prediction off the update loop and reports back with its ticket.
pub fn send_prediction_request(model: &Model, ctx: &Context<Model>, pending: PendingPrediction) {
    let api = model.api.clone();
    let link = ctx.link().clone();

    spawn_local(async move {
        let outcome = api.predict(&pending.image).await;
        link.send_message(Msg::PredictionFinished(pending.ticket, outcome));
    });
}

pub fn handle_prediction_finished(
    model: &mut Model,
    ticket: u64,
    outcome: Result<PredictionResult, PredictError>,
) -> bool {
    match model.session.complete_prediction(ticket, outcome) {
        Ok(_) => {
            model.error = None;
            true
        }
        Err(SessionError::StaleResult(_)) => false,
        Err(e) => {
            model.error = Some(e.to_string());
            true
        }
    }
}

pub fn handle_download(model: &mut Model, ctx: &Context<Model>) -> bool {
    let job = match model.session.begin_export() {
        Ok(job) => job,
        Err(e) => {
            log::warn!("download rejected: {}", e);
            return false;
        }
    };

    let link = ctx.link().clone();
    spawn_local(async move {
        let outcome = job
            .build()
            .and_then(|artifact| BrowserDownload.save(&artifact));
        link.send_message(Msg::ExportFinished(job.ticket, outcome));
    });

    true
}

pub fn handle_export_finished(
    model: &mut Model,
    ticket: u64,
    outcome: Result<(), ExportError>,
) -> bool {
    match model.session.finish_export(ticket, outcome) {
        Ok(()) => true,
        Err(SessionError::StaleResult(_)) => false,
        Err(e) => {
            model.error = Some(format!("Download failed: {}", e));
            true
        }
    }
}

fn refresh_preview(model: &mut Model) {
    model.preview_url = model
        .session
        .acquisition()
        .map(|acquisition| codec::to_data_url(acquisition.image()));
}
