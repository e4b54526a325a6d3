//! Multipart file upload with progress reporting
//!
//! `fetch` does not expose upload progress, so uploads go through
//! `XMLHttpRequest`. The XHR callbacks are bridged into a future with a
//! oneshot channel; the closures stay alive until the request settles.

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{File, FormData, ProgressEvent, XmlHttpRequest};

use crate::api::ApiError;
use crate::config::Environment;
use crate::types::UploadReceipt;

/// Multipart field name the backend expects
const FILE_FIELD: &str = "file";

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Loaded,
    Failed,
    Aborted,
}

fn browser_err(e: JsValue) -> ApiError {
    ApiError::Browser(format!("{:?}", e))
}

/// Upload one file to `POST {api}/upload`.
///
/// `on_progress(loaded, total)` is called for every progress event whose
/// length is computable.
pub async fn upload_file<F>(
    env: &Environment,
    token: &str,
    file: &File,
    on_progress: F,
) -> Result<UploadReceipt, ApiError>
where
    F: Fn(f64, f64) + 'static,
{
    let form = FormData::new().map_err(browser_err)?;
    form.append_with_blob_and_filename(FILE_FIELD, file, &file.name())
        .map_err(browser_err)?;

    let xhr = XmlHttpRequest::new().map_err(browser_err)?;
    xhr.open("POST", &env.upload_url()).map_err(browser_err)?;
    xhr.set_request_header("Authorization", &format!("Bearer {}", token))
        .map_err(browser_err)?;

    let progress = Closure::<dyn FnMut(ProgressEvent)>::new(move |ev: ProgressEvent| {
        if ev.length_computable() {
            on_progress(ev.loaded(), ev.total());
        }
    });
    xhr.upload()
        .map_err(browser_err)?
        .set_onprogress(Some(progress.as_ref().unchecked_ref()));

    let (tx, rx) = oneshot::channel::<Outcome>();
    let tx = Rc::new(RefCell::new(Some(tx)));
    let settle = |outcome: Outcome| {
        let tx = tx.clone();
        Closure::<dyn FnMut(ProgressEvent)>::new(move |_: ProgressEvent| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(outcome);
            }
        })
    };
    let on_load = settle(Outcome::Loaded);
    let on_error = settle(Outcome::Failed);
    let on_abort = settle(Outcome::Aborted);
    xhr.set_onload(Some(on_load.as_ref().unchecked_ref()));
    xhr.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    xhr.set_onabort(Some(on_abort.as_ref().unchecked_ref()));

    tracing::info!(file = %file.name(), bytes = file.size(), "Uploading");
    xhr.send_with_opt_form_data(Some(&form))
        .map_err(browser_err)?;

    let outcome = rx
        .await
        .map_err(|_| ApiError::Network("upload was interrupted".to_string()))?;
    drop((progress, on_load, on_error, on_abort));

    match outcome {
        Outcome::Loaded => {}
        Outcome::Failed => return Err(ApiError::Network("upload request failed".to_string())),
        Outcome::Aborted => return Err(ApiError::Network("upload was aborted".to_string())),
    }

    let status = xhr.status().map_err(browser_err)?;
    let body = xhr
        .response_text()
        .map_err(browser_err)?
        .unwrap_or_default();
    parse_upload_response(status, &body)
}

/// Turn the finished request into a receipt or an error
pub(crate) fn parse_upload_response(status: u16, body: &str) -> Result<UploadReceipt, ApiError> {
    if !(200..300).contains(&status) {
        return Err(ApiError::from_response(status, body));
    }
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_body_becomes_receipt() {
        let body = r#"{"filename":"a.pdf","gcs_uri":"gs://b/x.pdf","size":3,"message":"ok"}"#;
        let receipt = parse_upload_response(200, body).unwrap();
        assert_eq!(receipt.filename, "a.pdf");
        assert_eq!(receipt.size, 3);
    }

    #[test]
    fn rejected_type_surfaces_detail() {
        let body = r#"{"detail":"Invalid file type: text/plain. Only PDF is allowed."}"#;
        let err = parse_upload_response(400, body).unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 400, .. }));
        assert_eq!(
            err.to_string(),
            "Invalid file type: text/plain. Only PDF is allowed."
        );
    }

    #[test]
    fn malformed_success_body_is_decode_error() {
        let err = parse_upload_response(200, "not json").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
