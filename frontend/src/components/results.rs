use super::super::{Model, Msg};
use super::utils::debounce;
use shared::export::{ARCHIVE_FILE_NAME, RESULTS_FILE_NAME};
use shared::{Action, Source};
use yew::prelude::*;

pub fn render_results(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(result) = model.session.prediction() else {
        return html! {};
    };

    let file_name = match model.session.acquisition().map(|a| a.source()) {
        Some(Source::Camera) => ARCHIVE_FILE_NAME,
        _ => RESULTS_FILE_NAME,
    };
    let link = ctx.link().clone();

    html! {
        <div class="results-container">
            <div class="result-header">
                <h2>{ format!("Prediction: {}", result.class_name) }</h2>
                <div class="confidence-meter">
                    <div class="meter-label">{"Confidence Score:"}</div>
                    <div class="meter">
                        <div class="meter-fill" style={format!("width: {}%", result.confidence_score.clamp(0.0, 100.0))}></div>
                    </div>
                    <div class="meter-value">{ format!("{}%", result.confidence_score) }</div>
                </div>
            </div>
            <div class="button-container">
                <button
                    class="analyze-btn"
                    title={format!("Save {}", file_name)}
                    onclick={debounce(300, move || link.send_message(Msg::Download))}
                    disabled={!model.session.allows(Action::Download)}
                >
                    <i class="fa-solid fa-download"></i>{" Download Results"}
                </button>
            </div>
        </div>
    }
}
