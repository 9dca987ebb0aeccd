use chrono::{DateTime, Utc};
use gloo_timers::callback::Timeout;
use js_sys::Array;
use log::{error, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlElement, Url};
use yew::prelude::*;

use crate::components::toast::Toaster;
use crate::storage::LocalStore;

const REVOKE_DELAY_MS: u32 = 1000;

pub fn export_filename(at: DateTime<Utc>) -> String {
    format!("senda-datos-{}.json", at.format("%Y-%m-%dT%H-%M-%SZ"))
}

/// Pretty-printed snapshot of everything the site keeps in localStorage.
pub fn export_json(store: &LocalStore) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&store.export())
}

fn download(filename: &str, mime_type: &str, content: &str) -> Result<(), JsValue> {
    let parts = Array::new();
    parts.push(&JsValue::from_str(content));

    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document unavailable"))?;
    let link = document.create_element("a")?;
    link.set_attribute("href", &url)?;
    link.set_attribute("download", filename)?;
    if let Some(link) = link.dyn_ref::<HtmlElement>() {
        link.click();
    }

    // Revoking right after the click can cancel the download in some browsers.
    Timeout::new(REVOKE_DELAY_MS, move || {
        if let Err(e) = Url::revoke_object_url(&url) {
            warn!("Could not revoke export URL: {:?}", e);
        }
    })
    .forget();
    Ok(())
}

/// "Export my data" / "Delete my data" links for the footer.
#[function_component(DataControls)]
pub fn data_controls() -> Html {
    let store = use_context::<LocalStore>().unwrap_or_else(LocalStore::open);
    let toaster = use_context::<Toaster>();

    let on_export = {
        let store = store.clone();
        let toaster = toaster.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            let result = export_json(&store)
                .map_err(|e| JsValue::from_str(&e.to_string()))
                .and_then(|json| download(&export_filename(Utc::now()), "application/json", &json));
            match result {
                Ok(()) => {
                    info!("Exported local data");
                    if let Some(toaster) = &toaster {
                        toaster.info("Tus datos se están descargando");
                    }
                }
                Err(e) => {
                    error!("Export failed: {:?}", e);
                    if let Some(toaster) = &toaster {
                        toaster.error("No se pudieron exportar tus datos");
                    }
                }
            }
        })
    };

    let on_clear = Callback::from(move |e: MouseEvent| {
        e.prevent_default();
        match store.clear_all() {
            Ok(()) => {
                info!("Cleared local data");
                if let Some(toaster) = &toaster {
                    toaster.success("Tus datos locales han sido eliminados");
                }
            }
            Err(e) => {
                error!("Clearing local data failed: {}", e);
                if let Some(toaster) = &toaster {
                    toaster.error("No se pudieron eliminar tus datos");
                }
            }
        }
    });

    html! {
        <div class="data-controls">
            <button type="button" class="footer-link" onclick={on_export}>{"Exportar mis datos"}</button>
            <button type="button" class="footer-link" onclick={on_clear}>{"Borrar mis datos"}</button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryBackend, StorageKey};
    use chrono::TimeZone;
    use serde_json::Value;

    #[test]
    fn filename_carries_a_timestamp() {
        let at = Utc.with_ymd_and_hms(2025, 6, 9, 8, 5, 3).unwrap();
        assert_eq!(export_filename(at), "senda-datos-2025-06-09T08-05-03Z.json");
    }

    #[test]
    fn object_url_outlives_the_click() {
        assert!(REVOKE_DELAY_MS >= 100);
    }

    #[test]
    fn export_lists_every_key() {
        let store = LocalStore::with_backend(MemoryBackend::default());
        store.set(StorageKey::WaitlistEmail, "ana@senda.mx").unwrap();

        let json = export_json(&store).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["senda_waitlist_email"], "ana@senda.mx");
        assert!(parsed["senda_survey_draft"].is_null());
        assert_eq!(parsed.as_object().unwrap().len(), StorageKey::ALL.len());
    }
}
