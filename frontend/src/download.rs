use gloo_file::{Blob, ObjectUrl};
use shared::{Artifact, ArtifactSink, ExportError};
use wasm_bindgen::JsCast;
use web_sys::HtmlAnchorElement;

use crate::components::utils::js_error;

/// Saves artifacts through a hidden `<a download>` click.
pub struct BrowserDownload;

impl ArtifactSink for BrowserDownload {
    fn save(&mut self, artifact: &Artifact) -> Result<(), ExportError> {
        let fail = |reason: String| ExportError::Save {
            file_name: artifact.file_name.clone(),
            reason,
        };

        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| fail("no document".into()))?;
        let body = document.body().ok_or_else(|| fail("no body".into()))?;

        let blob = Blob::new_with_options(artifact.bytes.as_slice(), Some(artifact.mime));
        let url = ObjectUrl::from(blob);

        let anchor = document
            .create_element("a")
            .map_err(|e| fail(js_error(e)))?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| fail("not an anchor element".into()))?;
        anchor.set_href(&url);
        anchor.set_download(&artifact.file_name);
        anchor
            .style()
            .set_property("display", "none")
            .map_err(|e| fail(js_error(e)))?;

        body.append_child(&anchor).map_err(|e| fail(js_error(e)))?;
        anchor.click();
        body.remove_child(&anchor).map_err(|e| fail(js_error(e)))?;

        log::info!("downloaded {} ({} bytes)", artifact.file_name, artifact.bytes.len());
        Ok(())
    }
}
