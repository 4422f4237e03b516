//! The seam between client logic and whatever performs HTTP.
//!
//! The browser build implements [`Transport`] over `fetch`, native builds over
//! reqwest, and tests over scripted responses.

use async_trait::async_trait;
use lx_api_types::HttpMethod;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File {
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

/// Ordered multipart fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    fields: Vec<(String, FormValue)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_text(name, value);
        self
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields
            .push((name.into(), FormValue::Text(value.into())));
    }

    pub fn push_file(
        &mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) {
        self.fields.push((
            name.into(),
            FormValue::File {
                file_name: file_name.into(),
                content_type: content_type.into(),
                bytes,
            },
        ));
    }

    pub fn fields(&self) -> &[(String, FormValue)] {
        &self.fields
    }

    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|(n, v)| match v {
            FormValue::Text(t) if n == name => Some(t.as_str()),
            _ => None,
        })
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            body: RequestBody::Empty,
        }
    }

    pub fn json<B: Serialize + ?Sized>(
        method: HttpMethod,
        path: impl Into<String>,
        body: &B,
    ) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|err| ApiError::Decode(err.to_string()))?;
        Ok(Self {
            method,
            path: path.into(),
            body: RequestBody::Json(value),
        })
    }

    pub fn multipart(method: HttpMethod, path: impl Into<String>, form: MultipartForm) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Multipart(form),
        }
    }

    /// JSON body, if any.
    pub fn json_body(&self) -> Option<&serde_json::Value> {
        match &self.body {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Decoded JSON body; `Null` when the body was empty.
    pub body: serde_json::Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `message` or `error` text carried in the body, if present.
    pub fn server_message(&self) -> String {
        ["message", "error"]
            .iter()
            .find_map(|key| self.body.get(*key).and_then(|v| v.as_str()))
            .unwrap_or_default()
            .to_owned()
    }

    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(self.body).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_keeps_field_order() {
        let mut form = MultipartForm::new().text("name", "Tourbillon").text("price", "1200");
        form.push_file("image", "watch.png", "image/png", vec![1, 2, 3]);

        let names: Vec<&str> = form.fields().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["name", "price", "image"]);
        assert_eq!(form.get_text("price"), Some("1200"));
        assert_eq!(form.get_text("image"), None);
        assert!(form.has_field("image"));
    }

    #[test]
    fn server_message_prefers_message_over_error() {
        let response = ApiResponse::new(
            400,
            serde_json::json!({"message": "Email is required.", "error": "bad"}),
        );
        assert_eq!(response.server_message(), "Email is required.");
        assert!(!response.is_success());

        let response = ApiResponse::new(400, serde_json::json!({"error": "Order ID is required"}));
        assert_eq!(response.server_message(), "Order ID is required");
    }
}
