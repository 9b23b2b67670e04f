use url::{form_urlencoded, Url};

use cfgate_core::{ChallengeForm, FormMethod, HttpRequest, HttpResponse, SolveError, ANSWER_FIELD};

/// Merge the form template and the computed answer into the outbound
/// submission request.
///
/// Headers established by the submission protocol are set first; the
/// original request's headers are then copied first-wins, so a blanket
/// copy never overwrites them. Every cookie the challenge response set is
/// attached, and Referer is forced to the effective original URL.
pub fn build(
    form: &ChallengeForm,
    answer: &str,
    original: &HttpRequest,
    challenge: &HttpResponse,
) -> Result<HttpRequest, SolveError> {
    let scheme = original.url.scheme();
    let host = request_host(&original.url);
    let submit_url = form.submit_url(scheme, &host)?;

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in &form.fields {
        serializer.append_pair(name, value);
    }
    serializer.append_pair(ANSWER_FIELD, answer);
    let encoded = serializer.finish();

    let mut request = match form.method {
        FormMethod::Post => {
            let mut request = HttpRequest {
                method: FormMethod::Post.as_str().to_string(),
                url: submit_url,
                headers: Vec::new(),
                body: Some(encoded.into_bytes()),
            };
            request.set_header("Content-Type", "application/x-www-form-urlencoded");
            request
        }
        FormMethod::Get => {
            let mut url = submit_url;
            url.set_query(Some(&encoded));
            HttpRequest {
                method: FormMethod::Get.as_str().to_string(),
                url,
                headers: Vec::new(),
                body: None,
            }
        }
    };

    let established: Vec<String> = request
        .headers
        .iter()
        .map(|(n, _)| n.to_ascii_lowercase())
        .collect();
    for (name, value) in &original.headers {
        if !established.contains(&name.to_ascii_lowercase()) {
            request.headers.push((name.clone(), value.clone()));
        }
    }

    for (name, value) in challenge.cookies() {
        request.add_cookie(&name, &value);
    }

    // The edge checks Referer against the page that served the challenge:
    // the redirect target when there was one, the original URL otherwise,
    // with any explicit default TLS port dropped from the authority.
    let mut referer = challenge
        .location
        .as_ref()
        .unwrap_or(&original.url)
        .clone();
    if referer.port() == Some(443) {
        let _ = referer.set_port(None);
    }
    request.set_header("Referer", referer.as_str());

    Ok(request)
}

/// Host component the way the server saw it requested, explicit
/// non-default port included.
pub(crate) fn request_host(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}
