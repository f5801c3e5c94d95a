use crate::fatal;

/// A simple wrapper around `reqwest::Client` used to manage HTTP requests
/// with a preconfigured base URL and a bounded per-request timeout.
///
/// This client is used for all REST calls to the trajectory/compute service.
/// The timeout is mandatory: no request issued through this client can wait
/// unboundedly.
#[derive(Debug)]
pub struct HTTPClient {
    /// The underlying `reqwest::Client` used to perform HTTP requests.
    client: reqwest::Client,
    /// Base URL for the API, prepended to all endpoint paths.
    base_url: String,
}

impl HTTPClient {
    /// Constructs a new `HTTPClient` with the given base URL and timeout.
    ///
    /// # Arguments
    /// * `base_url` – The root URL for all HTTP requests (e.g., `"http://localhost:3010"`).
    /// * `timeout` – Per-request timeout applied to every call.
    ///
    /// # Returns
    /// A configured `HTTPClient` instance.
    pub fn new(base_url: &str, timeout: std::time::Duration) -> HTTPClient {
        HTTPClient {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|e| fatal!("could not build HTTP client: {e}")),
            base_url: String::from(base_url),
        }
    }

    /// Returns a reference to the internal `reqwest::Client`.
    pub(super) fn client(&self) -> &reqwest::Client { &self.client }
    /// Returns the base URL that the client was initialized with.
    pub fn url(&self) -> &str { self.base_url.as_str() }
}
