use async_trait::async_trait;
use lx_client::{ApiError, ApiRequest, ApiResponse, FormValue, MultipartForm, RequestBody, Transport};
use reqwest::multipart::{Form, Part};
use tracing::debug;

/// `Transport` over reqwest, for native tools and integration tests.
///
/// Reads `LX_API_URL` from the environment when no endpoint is given
/// (default: `http://localhost:5000`).
pub struct RestTransport {
    endpoint: String,
    http: reqwest::Client,
}

impl Default for RestTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl RestTransport {
    pub fn new(endpoint: Option<String>) -> Self {
        Self::with_client(endpoint, reqwest::Client::new())
    }

    pub fn with_client(endpoint: Option<String>, http: reqwest::Client) -> Self {
        let endpoint = endpoint
            .or_else(|| std::env::var("LX_API_URL").ok())
            .unwrap_or_else(|| "http://localhost:5000".to_string());
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }
}

fn multipart(form: MultipartForm) -> Result<Form, ApiError> {
    let mut out = Form::new();
    for (name, value) in form.fields().iter().cloned() {
        out = match value {
            FormValue::Text(text) => out.text(name, text),
            FormValue::File {
                file_name,
                content_type,
                bytes,
            } => {
                let part = Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(&content_type)
                    .map_err(|err| ApiError::Transport(format!("multipart {name}: {err}")))?;
                out.part(name, part)
            }
        };
    }
    Ok(out)
}

#[async_trait(?Send)]
impl Transport for RestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let url = self.url(&request.path);
        debug!(method = %method, url = %url, "sending request");

        let builder = self.http.request(method, &url);
        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(multipart(form)?),
        };

        let response = builder
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(body) => body,
                Err(err) if status.is_success() => {
                    return Err(ApiError::Decode(format!("{url}: {err}")));
                }
                Err(_) => serde_json::Value::Null,
            }
        };
        Ok(ApiResponse::new(status.as_u16(), body))
    }
}
