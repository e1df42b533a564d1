//! Blocking HTTP GET adapter.
//!
//! Implements [`HttpPort`] — the hexagonal boundary for the remote
//! configuration service.  Every call is bounded by the configured timeout
//! and the response body by [`MAX_RESPONSE_BYTES`].
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::http::client::EspHttpConnection`
//!   wrapped in the `embedded-svc` blocking client.
//! - **all other targets**: an in-memory route table for host-side tests.

use log::{debug, warn};

use crate::app::ports::{HttpPort, HttpResponse, MAX_RESPONSE_BYTES};
use crate::error::TransportError;

#[cfg(not(target_os = "espidf"))]
use crate::app::ports::ResponseBody;

/// Only plain and TLS HTTP URLs are accepted.
fn check_url(url: &str) -> Result<(), TransportError> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .ok_or(TransportError::InvalidUrl)?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(TransportError::InvalidUrl);
    }
    Ok(())
}

pub struct HttpAdapter {
    timeout_ms: u32,
    #[cfg(not(target_os = "espidf"))]
    routes: Vec<(String, u16, ResponseBody)>,
}

impl HttpAdapter {
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            #[cfg(not(target_os = "espidf"))]
            routes: Vec::new(),
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        use core::time::Duration;

        use embedded_svc::http::Status;
        use embedded_svc::http::client::Client;
        use embedded_svc::io::Read;
        use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
        use esp_idf_svc::io::EspIOError;
        use esp_idf_svc::sys::{ESP_ERR_HTTP_EAGAIN, ESP_ERR_TIMEOUT, EspError};

        fn classify(e: &EspError) -> TransportError {
            let code = e.code();
            if code == ESP_ERR_TIMEOUT as i32 || code == ESP_ERR_HTTP_EAGAIN as i32 {
                TransportError::Timeout
            } else {
                TransportError::ConnectFailed
            }
        }
        let io = |e: EspIOError| classify(&e.0);

        let conf = Configuration {
            timeout: Some(Duration::from_millis(u64::from(self.timeout_ms))),
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        };
        let connection = EspHttpConnection::new(&conf).map_err(|e| classify(&e))?;
        let mut client = Client::wrap(connection);

        let request = client.get(url).map_err(io)?;
        let mut response = request.submit().map_err(io)?;
        let status = response.status();

        let mut body = heapless::Vec::new();
        let mut chunk = [0u8; 256];
        loop {
            let read = response.read(&mut chunk).map_err(io)?;
            if read == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..read])
                .map_err(|_| TransportError::ResponseTooLarge)?;
        }
        Ok(HttpResponse { status, body })
    }

    /// Register a canned response for `url`.  Later registrations win.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_route(&mut self, url: &str, status: u16, body: &[u8]) -> Result<(), TransportError> {
        let body = ResponseBody::from_slice(body).map_err(|_| TransportError::ResponseTooLarge)?;
        self.routes.retain(|(u, _, _)| u != url);
        self.routes.push((url.to_owned(), status, body));
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        self.routes
            .iter()
            .find(|(u, _, _)| u == url)
            .map(|(_, status, body)| HttpResponse {
                status: *status,
                body: body.clone(),
            })
            .ok_or(TransportError::ConnectFailed)
    }
}

impl HttpPort for HttpAdapter {
    fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        check_url(url)?;
        debug!("HTTP: GET {}", url);
        let result = self.platform_get(url);
        match &result {
            Ok(r) => debug!("HTTP: {} ({} of max {} bytes)", r.status, r.body.len(), MAX_RESPONSE_BYTES),
            Err(e) => warn!("HTTP: GET {} failed: {}", url, e),
        }
        result
    }
}
