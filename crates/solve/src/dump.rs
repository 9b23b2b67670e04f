use tracing::debug;

use cfgate_core::{Diagnostics, HttpRequest, HttpResponse};

/// Debug dumps of the solve exchanges, gated by the explicit diagnostics
/// value. The one-line summary is always emitted; headers and bodies only
/// when asked for.
pub fn dump_request(request: &HttpRequest, diagnostics: &Diagnostics) {
    debug!("{} {}", request.method, request.url);
    if !diagnostics.log_exchanges {
        return;
    }
    for (name, value) in &request.headers {
        debug!("> {}: {}", name, value);
    }
    if diagnostics.log_bodies {
        if let Some(body) = &request.body {
            debug!("> {}", String::from_utf8_lossy(body));
        }
    }
}

pub fn dump_response(response: &HttpResponse, request: &HttpRequest, diagnostics: &Diagnostics) {
    debug!("{} {}", response.status, request.url);
    if !diagnostics.log_exchanges {
        return;
    }
    for (name, value) in &response.headers {
        debug!("< {}: {}", name, value);
    }
    if diagnostics.log_bodies {
        debug!("< {}", response.body_text());
    }
}

/// Full dump regardless of the configured flags; used when extraction
/// fails and the offending page needs investigating.
pub fn dump_response_full(response: &HttpResponse, request: &HttpRequest) {
    let everything = Diagnostics {
        log_exchanges: true,
        log_bodies: true,
    };
    dump_response(response, request, &everything);
}
