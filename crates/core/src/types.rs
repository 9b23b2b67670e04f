use std::borrow::Cow;

use async_trait::async_trait;
use url::Url;

use crate::error::SolveError;

/// Field name the challenge page expects the computed answer under.
/// It is never copied from the form; the evaluator produces it.
pub const ANSWER_FIELD: &str = "jschl_answer";

/// Proof fields that must come back verbatim from the challenge form.
/// Without them the computation is pointless, so extraction fails early.
pub const MANDATORY_FIELDS: [&str; 2] = ["jschl_vc", "pass"];

/// Delay the server expects when the page does not advertise one.
pub const DEFAULT_WAIT_MILLIS: u64 = 8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    Get,
    Post,
}

impl FormMethod {
    /// Challenge forms only ever submit with GET or POST; anything else in
    /// the method attribute is as unusable as a missing one.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Submission template parsed out of the challenge page's form block.
/// Built once per response, consumed once by the submission builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeForm {
    pub method: FormMethod,
    /// The action attribute as found on the page; may be relative and may
    /// carry its own query string.
    pub action: String,
    /// Ordered name/value pairs, unique names, answer field excluded.
    pub fields: Vec<(String, String)>,
}

impl ChallengeForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or overwrite a field, keeping first-seen ordering.
    pub fn set_field(&mut self, name: &str, value: &str) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.fields.push((name.to_string(), value.to_string())),
        }
    }

    /// Where the answer gets submitted. A POST keeps the action's query
    /// string in the URL; a GET strips it (those parameters are re-encoded
    /// into the field set instead).
    pub fn submit_url(&self, scheme: &str, host: &str) -> Result<Url, SolveError> {
        let path = match self.method {
            FormMethod::Post => self.action.as_str(),
            FormMethod::Get => self.action.split('?').next().unwrap_or_default(),
        };
        let raw = format!("{}://{}{}", scheme, host, path);
        Url::parse(&raw).map_err(|e| SolveError::InvalidUrl(format!("{}: {}", raw, e)))
    }
}

/// The answer-computing snippet and everything needed to run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeScript {
    /// Normalized snippet body, ready for the execution environment.
    pub code: String,
    /// Server-mandated minimum wait before submitting the answer.
    pub wait_millis: u64,
    /// Element id the snippet reads through the document stub, when the
    /// script stashes one in its helper variable.
    pub dom_key: Option<String>,
    /// Inner content of that element, empty when unresolved.
    pub dom_content: String,
}

/// What the evaluator produced for one challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveResult {
    /// Submitted verbatim; no rounding or reformatting on top of what the
    /// snippet itself produced.
    pub answer: String,
    pub wait_millis: u64,
}

/// Transport-agnostic outbound request. The submission built for a solve
/// attempt is one of these: built once, sent once, never reused.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: String,
    pub url: Url,
    /// Ordered, possibly repeating header pairs.
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: "GET".to_string(),
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    /// Replace every value of `name` with a single one.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// Append a cookie pair to the Cookie header, creating it if needed.
    pub fn add_cookie(&mut self, name: &str, value: &str) {
        let pair = format!("{}={}", name, value);
        match self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case("cookie"))
        {
            Some((_, existing)) if existing.is_empty() => *existing = pair,
            Some((_, existing)) => {
                existing.push_str("; ");
                existing.push_str(&pair);
            }
            None => self.headers.push(("Cookie".to_string(), pair)),
        }
    }
}

/// Transport-agnostic response, body already read into memory.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Ordered, possibly repeating header pairs (all Set-Cookie values
    /// survive).
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Resolved redirect target, when the response carried a Location.
    pub location: Option<Url>,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn headers_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.headers
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Name/value pairs of every Set-Cookie header, attributes dropped.
    pub fn cookies(&self) -> Vec<(String, String)> {
        self.headers_all("set-cookie")
            .filter_map(|raw| {
                let pair = raw.split(';').next()?;
                let (name, value) = pair.split_once('=')?;
                Some((name.trim().to_string(), value.trim().to_string()))
            })
            .collect()
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Delivers one constructed request. Kept abstract so the same solve logic
/// serves a direct client and an intercepting-proxy context, and so tests
/// can run against a canned transport.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, SolveError>;
}

/// Evaluates a self-contained expression and returns its string value.
/// Implementations must be safe to call from concurrent solves; any
/// per-evaluation state belongs inside `evaluate`, never in the instance.
pub trait ScriptEngine: Send + Sync {
    fn evaluate(&self, code: &str) -> Result<String, SolveError>;
}
