// ============================================================================
// TRANSPORT - Costura HTTP entre el cliente API y el navegador
// ============================================================================
// `ApiClient` construye `HttpRequest`s planos; el transporte los envía.
// En el navegador se usa gloo-net; en tests, un transporte en memoria.
// ============================================================================

use std::rc::Rc;

use gloo_net::http::{Request, RequestBuilder};
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// Imagen elegida en un `<input type="file">`, ya leída a memoria
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    File(ImageUpload),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub value: FieldValue,
}

impl FormField {
    pub fn text(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: FieldValue::Text(value.to_string()),
        }
    }

    pub fn file(name: &str, upload: &ImageUpload) -> Self {
        Self {
            name: name.to_string(),
            value: FieldValue::File(upload.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FormField>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(method: Method, url: String) -> Self {
        Self {
            method,
            url,
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.headers
            .push(("Authorization".to_string(), format!("Bearer {}", token)));
        self
    }

    pub fn query(mut self, params: Vec<(String, String)>) -> Self {
        self.query = params;
        self
    }

    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    pub fn multipart(mut self, fields: Vec<FormField>) -> Self {
        self.body = RequestBody::Multipart(fields);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Status + cuerpo crudo; la interpretación la hace `ApiClient`
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Envío de una petición. Solo los fallos de transporte son `Err`;
/// cualquier status HTTP llega como `Ok(HttpResponse)`.
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: HttpTransport> HttpTransport for Rc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).send(request).await
    }
}

/// Transporte real sobre `fetch` (gloo-net)
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

impl HttpTransport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        log::debug!("🌐 [API] {:?} {}", request.method, request.url);

        let mut builder: RequestBuilder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Put => Request::put(&request.url),
            Method::Delete => Request::delete(&request.url),
        };
        if !request.query.is_empty() {
            builder = builder.query(
                request
                    .query
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str())),
            );
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let prepared = match &request.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(fields) => builder.body(build_form_data(fields)?),
        }
        .map_err(|e| ApiError::Network(format!("Request build error: {}", e)))?;

        let response = prepared.send().await.map_err(|e| {
            log::error!("❌ [API] Network error on {}: {}", request.url, e);
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !(200..300).contains(&status) {
            log::warn!("⚠️ [API] HTTP {} on {}", status, request.url);
        }
        Ok(HttpResponse { status, body })
    }
}

fn build_form_data(fields: &[FormField]) -> Result<FormData, ApiError> {
    let form = FormData::new().map_err(js_error)?;
    for field in fields {
        match &field.value {
            FieldValue::Text(text) => form.append_with_str(&field.name, text).map_err(js_error)?,
            FieldValue::File(upload) => {
                let bytes = js_sys::Uint8Array::from(upload.bytes.as_slice());
                let parts = js_sys::Array::of1(&bytes);
                let options = BlobPropertyBag::new();
                options.set_type(&upload.content_type);
                let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
                    .map_err(js_error)?;
                form.append_with_blob_and_filename(&field.name, &blob, &upload.file_name)
                    .map_err(js_error)?;
            }
        }
    }
    Ok(form)
}

fn js_error(err: JsValue) -> ApiError {
    ApiError::Network(format!("{:?}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_attaches_bearer_and_query() {
        let request = HttpRequest::new(Method::Get, "https://api.test/api/shops/allShops".into())
            .bearer("t0k")
            .query(vec![("page".into(), "2".into()), ("limit".into(), "8".into())]);
        assert_eq!(request.header("authorization"), Some("Bearer t0k"));
        assert_eq!(request.query_value("page"), Some("2"));
        assert_eq!(request.query_value("search"), None);
        assert_eq!(request.body, RequestBody::Empty);
    }

    #[test]
    fn only_2xx_is_ok() {
        assert!(HttpResponse { status: 201, body: String::new() }.ok());
        assert!(!HttpResponse { status: 304, body: String::new() }.ok());
    }
}
