//! AWS query-protocol transport shared by the EC2 and SNS adapters.
//!
//! Requests are form-encoded POSTs to the service root, signed with SigV4.
//! Responses and errors are XML.

use std::sync::Arc;

use guardwire_types::error::CollaboratorError;

use super::credentials::CredentialsProvider;
use super::sigv4::{SigV4Signer, SignableRequest};
use crate::http::{status_error, transport_error};

pub(crate) const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

pub struct QueryClient {
    http: reqwest::Client,
    credentials: Arc<CredentialsProvider>,
    signer: SigV4Signer,
    endpoint: reqwest::Url,
    version: &'static str,
}

impl QueryClient {
    pub fn new(
        http: reqwest::Client,
        credentials: Arc<CredentialsProvider>,
        signer: SigV4Signer,
        endpoint: &str,
        version: &'static str,
    ) -> Result<Self, CollaboratorError> {
        let endpoint = reqwest::Url::parse(endpoint).map_err(|e| {
            CollaboratorError::Configuration(format!("invalid endpoint {endpoint}: {e}"))
        })?;
        Ok(Self {
            http,
            credentials,
            signer,
            endpoint,
            version,
        })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }

    /// Invoke `action` and return the raw XML response body.
    pub async fn call(&self, action: &str, params: &[(&str, &str)]) -> Result<String, CollaboratorError> {
        let mut form: Vec<(&str, &str)> = vec![("Action", action), ("Version", self.version)];
        form.extend_from_slice(params);
        let body = serde_urlencoded::to_string(&form)
            .map_err(|e| CollaboratorError::Configuration(format!("failed to encode request: {e}")))?;

        let credentials = self.credentials.credentials().await?;
        let signed = self.signer.sign(
            &credentials,
            &SignableRequest {
                method: "POST",
                url: &self.endpoint,
                headers: &[("content-type", FORM_CONTENT_TYPE)],
                body: body.as_bytes(),
            },
            chrono::Utc::now(),
        )?;

        let mut request = self
            .http
            .post(self.endpoint.clone())
            .header("content-type", FORM_CONTENT_TYPE);
        for (name, value) in &signed {
            request = request.header(name.as_str(), value.as_str());
        }

        tracing::debug!(action, endpoint = %self.endpoint, "calling AWS query API");
        let response = request.body(body).send().await.map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(parse_error(status, &text));
        }
        Ok(text)
    }
}

/// Map an error document to [`CollaboratorError::Api`]. Both the EC2
/// (`Response/Errors/Error`) and SNS (`ErrorResponse/Error`) shapes carry
/// `Code` and `Message` elements.
pub(crate) fn parse_error(status: reqwest::StatusCode, body: &str) -> CollaboratorError {
    let Ok(doc) = roxmltree::Document::parse(body) else {
        return status_error(status, body);
    };
    let text_of = |name: &str| {
        doc.descendants()
            .find(|n| n.is_element() && n.tag_name().name() == name)
            .and_then(|n| n.text())
            .map(str::trim)
            .map(str::to_string)
    };
    match text_of("Code") {
        Some(code) => CollaboratorError::Api {
            code,
            message: text_of("Message").unwrap_or_default(),
        },
        None => status_error(status, body),
    }
}

/// Direct child element text, trimmed.
pub(crate) fn child_text(node: roxmltree::Node<'_, '_>, name: &str) -> Option<String> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
        .and_then(|c| c.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

pub(crate) fn parse_document(body: &str) -> Result<roxmltree::Document<'_>, CollaboratorError> {
    roxmltree::Document::parse(body)
        .map_err(|e| CollaboratorError::Deserialization(format!("invalid XML response: {e}")))
}
