use crate::error::WaitlistError;
use crate::payload::SignupPayload;

/// Sends the uncontrolled-mode POST.
#[allow(async_fn_in_trait)]
pub trait SignupTransport {
    /// One POST of the JSON payload. Any 2xx is success.
    async fn post_json(&self, url: &str, payload: &SignupPayload) -> Result<(), WaitlistError>;
}

/// [`SignupTransport`] over `reqwest` (fetch on wasm targets).
#[cfg(feature = "http")]
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[cfg(feature = "http")]
impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "http")]
impl SignupTransport for ReqwestTransport {
    async fn post_json(&self, url: &str, payload: &SignupPayload) -> Result<(), WaitlistError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| WaitlistError::transport(format!("Signup request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WaitlistError::http_status(
                status.as_u16(),
                format!("Signup endpoint returned {status}: {body}"),
            ));
        }

        tracing::info!(url, status = status.as_u16(), "Signup submitted");
        Ok(())
    }
}
