//! `Transport` over the browser's `fetch`.

use async_trait::async_trait;
use lx_client::{ApiError, ApiRequest, ApiResponse, ClientConfig, FormValue, MultipartForm, RequestBody, Transport};
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Headers, Request, RequestInit, Response};

use crate::dom;

pub struct FetchTransport {
    base: String,
}

impl FetchTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            base: config.api_base.trim_end_matches('/').to_string(),
        }
    }
}

fn transport_err(value: JsValue) -> ApiError {
    ApiError::Transport(dom::js_message(&value))
}

fn form_data(form: &MultipartForm) -> Result<FormData, JsValue> {
    let data = FormData::new()?;
    for (name, value) in form.fields() {
        match value {
            FormValue::Text(text) => data.append_with_str(name, text)?,
            FormValue::File {
                file_name,
                content_type,
                bytes,
            } => {
                let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes.as_slice()));
                let options = BlobPropertyBag::new();
                options.set_type(content_type);
                let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
                data.append_with_blob_and_filename(name, &blob, file_name)?;
            }
        }
    }
    Ok(data)
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.base, request.path);
        debug!(method = request.method.as_str(), url = %url, "fetch");

        let opts = RequestInit::new();
        opts.set_method(request.method.as_str());
        let headers = Headers::new().map_err(transport_err)?;
        headers.set("Accept", "application/json").map_err(transport_err)?;

        match &request.body {
            RequestBody::Empty => {}
            RequestBody::Json(value) => {
                headers
                    .set("Content-Type", "application/json")
                    .map_err(transport_err)?;
                opts.set_body(&JsValue::from_str(&value.to_string()));
            }
            // The browser writes the multipart boundary header itself.
            RequestBody::Multipart(form) => {
                let data: FormData = form_data(form).map_err(transport_err)?;
                opts.set_body(&data);
            }
        }
        opts.set_headers(&headers);

        let req = Request::new_with_str_and_init(&url, &opts).map_err(transport_err)?;
        let window = dom::window().ok_or_else(|| ApiError::Transport("no window".to_string()))?;
        let resp: Response = JsFuture::from(window.fetch_with_request(&req))
            .await
            .map_err(transport_err)?
            .dyn_into()
            .map_err(|_| ApiError::Transport("response is not a Response".to_string()))?;

        let text = JsFuture::from(resp.text().map_err(transport_err)?)
            .await
            .map_err(transport_err)?
            .as_string()
            .unwrap_or_default();

        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(body) => body,
                Err(err) if resp.ok() => return Err(ApiError::Decode(format!("{url}: {err}"))),
                Err(_) => serde_json::Value::Null,
            }
        };
        Ok(ApiResponse::new(resp.status(), body))
    }
}
