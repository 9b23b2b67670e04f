use once_cell::sync::Lazy;
use regex::Regex;
use url::form_urlencoded;

use cfgate_core::{ChallengeForm, FormMethod, SolveError, ANSWER_FIELD, MANDATORY_FIELDS};

static FORM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)<form.*?id="challenge-form".*?/form>"#).unwrap());
static METHOD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?s)method="(.*?)""#).unwrap());
static ACTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?s)action="(.*?)""#).unwrap());
static INPUT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?s)<input.*?(?:/>|</input>)"#).unwrap());
static INPUT_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?s)name="(.*?)""#).unwrap());
static INPUT_VALUE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?s)value="(.*?)""#).unwrap());

/// Parse the challenge page's form block into a submission template.
///
/// The answer field is never copied over; it is computed by the evaluator
/// and merged in by the submission builder. Inputs lacking a name or a
/// value are skipped. A GET form's action query string is decoded into the
/// ordinary field set, since the CDN sometimes hides extra required
/// parameters there.
pub fn extract_form(body: &str) -> Result<ChallengeForm, SolveError> {
    let block = FORM_RE.find(body).ok_or(SolveError::MissingForm)?.as_str();

    let method = METHOD_RE
        .captures(block)
        .and_then(|c| FormMethod::parse(&c[1]))
        .ok_or(SolveError::MissingFormMethod)?;

    let action = ACTION_RE
        .captures(block)
        .map(|c| c[1].to_string())
        .ok_or(SolveError::MissingFormAction)?;

    let mut form = ChallengeForm {
        method,
        action,
        fields: Vec::new(),
    };

    if form.method == FormMethod::Get {
        if let Some(query) = form.action.split_once('?').map(|(_, q)| q.to_string()) {
            for (name, value) in form_urlencoded::parse(query.as_bytes()) {
                form.set_field(&name, &value);
            }
        }
    }

    let mut saw_input = false;
    for input in INPUT_RE.find_iter(block) {
        saw_input = true;
        let input = input.as_str();
        let name = INPUT_NAME_RE.captures(input).map(|c| c[1].to_string());
        let value = INPUT_VALUE_RE.captures(input).map(|c| c[1].to_string());
        let (Some(name), Some(value)) = (name, value) else {
            continue;
        };
        if name != ANSWER_FIELD {
            form.set_field(&name, &value);
        }
    }
    if !saw_input {
        return Err(SolveError::MissingFormInput);
    }

    for name in MANDATORY_FIELDS {
        if form.field(name).map(str::is_empty).unwrap_or(true) {
            return Err(SolveError::MissingMandatoryParam(name.to_string()));
        }
    }

    Ok(form)
}
