use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;

use cfgate_core::{
    detect::is_challenged, Diagnostics, HttpRequest, HttpResponse, SolveError, Transport,
};
use cfgate_extract::{extract_form, extract_script};
use cfgate_solve::{eval::solve_challenge, pipeline, BoaEngine};

const GET_PAGE: &str = include_str!("fixtures/challenge_get.html");
const POST_PAGE: &str = include_str!("fixtures/challenge_post.html");

fn challenge_response(page: &str) -> HttpResponse {
    HttpResponse {
        status: 503,
        headers: vec![
            ("Server".to_string(), "cloudflare".to_string()),
            ("Content-Type".to_string(), "text/html".to_string()),
            (
                "Set-Cookie".to_string(),
                "__cfduid=dfa2b7e62be9d5b8c46b2e1a9b; path=/; HttpOnly".to_string(),
            ),
        ],
        body: page.as_bytes().to_vec(),
        location: None,
    }
}

fn original_request(url: &str) -> HttpRequest {
    let mut request = HttpRequest::get(Url::parse(url).unwrap());
    request.set_header("User-Agent", "agent/1.0");
    request.set_header("Accept", "text/html");
    request
}

struct StubTransport {
    status: u16,
    fail: bool,
    sent: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    fn with_status(status: u16) -> Self {
        Self {
            status,
            fail: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            status: 0,
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, SolveError> {
        self.sent.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(SolveError::Transport("connection reset".to_string()));
        }
        Ok(HttpResponse {
            status: self.status,
            headers: vec![(
                "Set-Cookie".to_string(),
                "cf_clearance=solved-token; path=/; HttpOnly".to_string(),
            )],
            body: Vec::new(),
            location: None,
        })
    }
}

#[test]
fn stored_get_page_evaluates_to_its_known_answer() {
    let script = extract_script(GET_PAGE).unwrap();
    assert_eq!(script.wait_millis, 4000);
    assert!(script.dom_key.is_none());

    let engine = BoaEngine::new();
    let result = solve_challenge(&script, "example-site.com", &engine).unwrap();
    assert_eq!(result.answer, "699.0000000000");

    // same body, same host, same answer
    let again = solve_challenge(&script, "example-site.com", &engine).unwrap();
    assert_eq!(again.answer, result.answer);
}

#[test]
fn stored_post_page_evaluates_to_its_known_answer() {
    let script = extract_script(POST_PAGE).unwrap();
    assert_eq!(script.wait_millis, 8000);
    assert_eq!(script.dom_key.as_deref(), Some("cf-dn-hQzMplWtrs"));
    assert_eq!(script.dom_content, "2.5");

    let engine = BoaEngine::new();
    let result = solve_challenge(&script, "beacon-point.net", &engine).unwrap();
    assert_eq!(result.answer, "63.5000000000");
}

#[test]
fn stored_pages_parse_into_stable_forms() {
    let first = extract_form(GET_PAGE).unwrap();
    let second = extract_form(GET_PAGE).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.fields.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
        vec!["jschl_vc", "pass"]
    );

    let post = extract_form(POST_PAGE).unwrap();
    assert_eq!(
        post.fields.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
        vec!["r", "jschl_vc", "pass"]
    );
}

#[test]
fn challenge_responses_are_classified_as_such() {
    assert!(is_challenged(&challenge_response(GET_PAGE)));

    let mut plain = challenge_response(GET_PAGE);
    plain.status = 200;
    assert!(!is_challenged(&plain));
}

#[tokio::test(start_paused = true)]
async fn pipeline_submits_the_answer_with_replayed_semantics() {
    let response = challenge_response(GET_PAGE);
    let original = original_request("https://example-site.com/path");
    let transport = StubTransport::with_status(302);
    let engine = BoaEngine::new();

    let outcome = pipeline::solve(
        &response,
        &original,
        &transport,
        &engine,
        &Diagnostics::default(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.status, 302);
    assert_eq!(
        outcome.cookies(),
        vec![("cf_clearance".to_string(), "solved-token".to_string())]
    );

    let sent = transport.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let submission = &sent[0];
    assert_eq!(submission.method, "GET");
    assert_eq!(submission.url.path(), "/cdn-cgi/l/chk_jschl");
    assert!(submission
        .url
        .query()
        .unwrap()
        .contains("jschl_answer=699.0000000000"));
    assert_eq!(submission.header("user-agent"), Some("agent/1.0"));
    assert_eq!(
        submission.header("referer"),
        Some("https://example-site.com/path")
    );
    assert_eq!(
        submission.header("cookie"),
        Some("__cfduid=dfa2b7e62be9d5b8c46b2e1a9b")
    );
}

#[tokio::test(start_paused = true)]
async fn rejected_proof_is_still_blocked() {
    let response = challenge_response(POST_PAGE);
    let original = original_request("https://beacon-point.net/");
    let transport = StubTransport::with_status(503);
    let engine = BoaEngine::new();

    let outcome = pipeline::solve(
        &response,
        &original,
        &transport,
        &engine,
        &Diagnostics::default(),
    )
    .await;

    assert!(matches!(outcome, Err(SolveError::StillBlocked)));
}

#[tokio::test(start_paused = true)]
async fn transport_failure_propagates_without_a_response() {
    let response = challenge_response(GET_PAGE);
    let original = original_request("https://example-site.com/");
    let transport = StubTransport::failing();
    let engine = BoaEngine::new();

    let outcome = pipeline::solve(
        &response,
        &original,
        &transport,
        &engine,
        &Diagnostics::default(),
    )
    .await;

    assert!(matches!(outcome, Err(SolveError::Transport(_))));
}

#[tokio::test(start_paused = true)]
async fn mandatory_field_failure_happens_before_any_evaluation() {
    struct PanickyEngine;
    impl cfgate_core::ScriptEngine for PanickyEngine {
        fn evaluate(&self, _code: &str) -> Result<String, SolveError> {
            panic!("evaluation must not be reached");
        }
    }

    let page = GET_PAGE.replace("name=\"jschl_vc\"", "name=\"other\"");
    let response = challenge_response(&page);
    let original = original_request("https://example-site.com/");
    let transport = StubTransport::with_status(200);

    let outcome = pipeline::solve(
        &response,
        &original,
        &transport,
        &PanickyEngine,
        &Diagnostics::default(),
    )
    .await;

    match outcome {
        Err(SolveError::MissingMandatoryParam(name)) => assert_eq!(name, "jschl_vc"),
        other => panic!("expected MissingMandatoryParam, got {:?}", other.err()),
    }
    assert!(transport.sent.lock().unwrap().is_empty());
}
