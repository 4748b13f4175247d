use super::super::{Model, Msg};
use super::utils::debounce;
use crate::camera::VIDEO_ELEMENT_ID;
use shared::{Action, SessionState};
use yew::prelude::*;

pub fn render_preview(model: &Model, ctx: &Context<Model>) -> Html {
    if model.session.state() == SessionState::CameraActive {
        return render_live_feed(model, ctx);
    }

    let Some(url) = &model.preview_url else {
        return html! {};
    };

    html! {
        <div id="preview-container">
            <img class="preview-image" src={url.clone()} alt="Current image" />
            {
                if model.session.state() == SessionState::AwaitingPrediction {
                    html! {
                        <div class="loading">
                            <div class="spinner"></div>
                            <p>{"Analyzing..."}</p>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

fn render_live_feed(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link().clone();

    // The stream is attached in `rendered` once the element exists.
    html! {
        <div id="preview-container">
            <video id={VIDEO_ELEMENT_ID} class="camera-feed" autoplay=true playsinline=true muted=true />
            <div class="button-container">
                <button
                    class="analyze-btn"
                    onclick={debounce(300, move || link.send_message(Msg::Capture))}
                    disabled={!model.session.allows(Action::Capture)}
                >
                    <i class="fa-solid fa-camera"></i>{" Capture"}
                </button>
            </div>
        </div>
    }
}
