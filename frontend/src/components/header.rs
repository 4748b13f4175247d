use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-microscope"></i> {" Skin Detector"}</h1>
            <p class="subtitle">{"Take a photo or upload an image to classify it"}</p>
        </header>
    }
}
