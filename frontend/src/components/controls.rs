use super::super::{Model, Msg};
use super::utils::{debounce, first_image_file};
use shared::{Action, SessionState, Source};
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub fn render_controls(model: &Model, ctx: &Context<Model>) -> Html {
    html! {
        <section class="controls">
            { render_camera_button(model, ctx) }
            { render_upload_input(model, ctx) }
        </section>
    }
}

fn camera_label(model: &Model) -> &'static str {
    let captured = model
        .session
        .acquisition()
        .is_some_and(|acquisition| acquisition.source() == Source::Camera);

    match model.session.state() {
        SessionState::CameraActive => "Stop Camera",
        SessionState::Predicted if captured => "Retake",
        _ => "Start Camera",
    }
}

fn render_camera_button(model: &Model, ctx: &Context<Model>) -> Html {
    let active = model.session.state() == SessionState::CameraActive;
    let (action, icon) = if active {
        (Action::StopCamera, "fa-solid fa-video-slash")
    } else {
        (Action::StartCamera, "fa-solid fa-video")
    };
    let link = ctx.link().clone();

    html! {
        <button
            class="camera-btn"
            onclick={debounce(300, move || {
                link.send_message(if active { Msg::StopCamera } else { Msg::StartCamera })
            })}
            disabled={model.acquiring || !model.session.allows(action)}
        >
            <i class={icon}></i>{ format!(" {}", camera_label(model)) }
        </button>
    }
}

fn render_upload_input(model: &Model, ctx: &Context<Model>) -> Html {
    let onchange = ctx.link().batch_callback(|event: Event| {
        let input: HtmlInputElement = event.target_unchecked_into();
        let selected = input.files().map(|files| first_image_file(&files));
        // Allow picking the same file twice in a row.
        input.set_value("");

        match selected {
            Some(Some(file)) => Some(Msg::FileSelected(file)),
            Some(None) => Some(Msg::SetError(Some("Please choose an image file.".into()))),
            None => None,
        }
    });

    html! {
        <label class="upload-btn">
            <i class="fa-solid fa-upload"></i>{" Upload Image"}
            <input
                id="file-input"
                type="file"
                accept="image/*"
                style="display: none;"
                {onchange}
                disabled={model.acquiring || !model.session.allows(Action::Upload)}
            />
        </label>
    }
}
