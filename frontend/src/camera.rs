use shared::codec;
use shared::{AcquireError, CameraStream, EncodedImage};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};

use crate::components::utils::js_error;

pub const VIDEO_ELEMENT_ID: &str = "camera-feed";

/// Prompts for camera permission and opens a video-only stream.
pub async fn request_device() -> Result<MediaStream, AcquireError> {
    let unavailable = |e: JsValue| AcquireError::DeviceUnavailable(js_error(e));

    let window = web_sys::window()
        .ok_or_else(|| AcquireError::DeviceUnavailable("no global `window`".into()))?;
    let devices = window.navigator().media_devices().map_err(unavailable)?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&JsValue::TRUE);

    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(unavailable)?;
    let stream = JsFuture::from(promise).await.map_err(unavailable)?;
    stream.dyn_into::<MediaStream>().map_err(unavailable)
}

#[derive(Debug)]
pub struct BrowserCamera {
    stream: MediaStream,
}

impl BrowserCamera {
    pub fn new(stream: MediaStream) -> Self {
        Self { stream }
    }

    /// Points the `<video>` preview at this stream once it is in the DOM.
    pub fn attach(&self) {
        if let Some(video) = video_element() {
            if video.src_object().is_none() {
                video.set_src_object(Some(&self.stream));
            }
        }
    }
}

impl CameraStream for BrowserCamera {
    fn capture_frame(&self) -> Result<EncodedImage, AcquireError> {
        let failed = |e: JsValue| AcquireError::Capture(js_error(e));

        let video = video_element()
            .ok_or_else(|| AcquireError::Capture("video preview is not mounted".into()))?;
        let (width, height) = (video.video_width(), video.video_height());
        if width == 0 || height == 0 {
            return Err(AcquireError::Capture(
                "camera has not produced a frame yet".into(),
            ));
        }

        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| AcquireError::Capture("no document".into()))?;
        let canvas = document
            .create_element("canvas")
            .map_err(failed)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| AcquireError::Capture("not a canvas element".into()))?;
        canvas.set_width(width);
        canvas.set_height(height);

        let context = canvas
            .get_context("2d")
            .map_err(failed)?
            .ok_or_else(|| AcquireError::Capture("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| AcquireError::Capture("unexpected context type".into()))?;
        context
            .draw_image_with_html_video_element(&video, 0.0, 0.0)
            .map_err(failed)?;

        let data_url = canvas.to_data_url_with_type("image/jpeg").map_err(failed)?;
        Ok(codec::to_transferable_buffer(&data_url)?.into())
    }

    fn release(&mut self) {
        for track in self.stream.get_tracks().iter() {
            track.unchecked_into::<MediaStreamTrack>().stop();
        }
        if let Some(video) = video_element() {
            video.set_src_object(None);
        }
    }
}

fn video_element() -> Option<HtmlVideoElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(VIDEO_ELEMENT_ID)?
        .dyn_into::<HtmlVideoElement>()
        .ok()
}
