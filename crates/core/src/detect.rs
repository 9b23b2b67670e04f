use crate::types::HttpResponse;

/// Server header prefix that identifies the CDN's edge.
pub const SERVER_TOKEN: &str = "cloudflare";

/// Whether a response is the anti-automation interstitial instead of the
/// requested page.
///
/// This is the sole gate into the solve pipeline: when it returns false
/// the caller must pass the response through unchanged.
pub fn is_challenged(response: &HttpResponse) -> bool {
    (response.status == 503 || response.status == 429)
        && response
            .header("server")
            .map(|v| v.starts_with(SERVER_TOKEN))
            .unwrap_or(false)
}
