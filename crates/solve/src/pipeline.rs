use tracing::debug;

use cfgate_core::{
    Diagnostics, HttpRequest, HttpResponse, ScriptEngine, SolveError, Transport,
};
use cfgate_extract::{extract_form, extract_script};

use crate::delay::DelayGate;
use crate::dump;
use crate::eval::solve_challenge;
use crate::submit;

/// Solve one challenge response: extract the form and script, evaluate
/// the answer, wait out the mandated delay, resubmit, validate.
///
/// Single-shot: every failure is terminal for this attempt. On success
/// the resubmission response is returned unchanged so the caller can
/// harvest the authorization cookies from it.
pub async fn solve(
    response: &HttpResponse,
    original: &HttpRequest,
    transport: &dyn Transport,
    engine: &dyn ScriptEngine,
    diagnostics: &Diagnostics,
) -> Result<HttpResponse, SolveError> {
    // The delay is measured from when the challenge response was read,
    // so extraction and evaluation time count toward it.
    let gate = DelayGate::start();

    let body = response.body_text();

    // An extraction miss means the remote format drifted; dump the page
    // in full so it can be diagnosed offline.
    let form = match extract_form(&body) {
        Ok(form) => form,
        Err(e) => {
            dump::dump_response_full(response, original);
            return Err(e);
        }
    };
    let script = match extract_script(&body) {
        Ok(script) => script,
        Err(e) => {
            dump::dump_response_full(response, original);
            return Err(e);
        }
    };

    let host = submit::request_host(&original.url);
    let result = solve_challenge(&script, &host, engine)?;
    debug!(
        answer = %result.answer,
        wait_millis = result.wait_millis,
        "challenge evaluated"
    );

    let submission = submit::build(&form, &result.answer, original, response)?;

    gate.hold(result.wait_millis).await;

    dump::dump_request(&submission, diagnostics);
    let outcome = transport.send(&submission).await?;
    dump::dump_response(&outcome, &submission, diagnostics);

    // 503 on the resubmission means the proof was rejected, distinct from
    // the initial detection.
    if outcome.status == 503 {
        return Err(SolveError::StillBlocked);
    }
    Ok(outcome)
}
