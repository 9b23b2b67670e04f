use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use cfgate_core::{ChallengeScript, SolveError, DEFAULT_WAIT_MILLIS};

use crate::rewrite;

static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)<script type="text/javascript">\n(.*?)</script>"#).unwrap());

// Anchored on the deferred-execution idiom: the snippet that assigns the
// answer lives inside `setTimeout(function(){ ... }, NNNN)`, starting with
// the obfuscator's fixed variable list and ending on the `a.value =` line.
// A mismatch here is the primary signal the remote format has drifted.
static CHALLENGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)setTimeout\(function\(\)\{\s*(var s,t,o,p.?b,r,e,a,k,i,n,g,f.+?\r?\n[\s\S]+?a\.value\s*=.+?)\r?\n(?:[^\{<>]*\},\s*(\d{4,}))?"#,
    )
    .unwrap()
});

/// The helper variable challenge scripts use to stash a DOM element id.
const DOM_KEY_VAR: &str = "k";

/// Locate the embedded script, isolate the answer-computing snippet and
/// the mandated wait, and resolve the indirect DOM-content reference the
/// snippet may need.
pub fn extract_script(body: &str) -> Result<ChallengeScript, SolveError> {
    let script = SCRIPT_RE
        .captures(body)
        .map(|c| c.get(1).map_or("", |m| m.as_str()))
        .ok_or(SolveError::ScriptNotFound)?;

    let caps = CHALLENGE_RE
        .captures(script)
        .ok_or(SolveError::ChallengePatternMismatch)?;

    let code = rewrite::apply(caps.get(1).map_or("", |m| m.as_str()));

    let wait_millis = caps
        .get(2)
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .unwrap_or(DEFAULT_WAIT_MILLIS);

    let (dom_key, dom_content) = resolve_dom_reference(script, body);

    Ok(ChallengeScript {
        code,
        wait_millis,
        dom_key,
        dom_content,
    })
}

/// Scan the script's top-level statements for an assignment of a string
/// literal to the helper variable, then capture the inner content of the
/// page element carrying that id. Content stays empty when either side of
/// the reference is absent; the evaluator's stub then returns empty text.
fn resolve_dom_reference(script: &str, body: &str) -> (Option<String>, String) {
    let mut dom_key = None;
    let mut dom_content = String::new();

    for statement in script.split(';') {
        let Some((lhs, rhs)) = statement.split_once('=') else {
            continue;
        };
        if lhs.trim() != DOM_KEY_VAR {
            continue;
        }
        let id = rhs.trim().trim_matches(|c| c == '\'' || c == '"').trim();
        if id.is_empty() {
            continue;
        }

        let pattern = format!(r#"(?s)<div.*?id="{}".*?>(.*?)</div>"#, regex::escape(id));
        let Ok(element_re) = Regex::new(&pattern) else {
            continue;
        };
        dom_key = Some(id.to_string());
        match element_re.captures(body) {
            Some(caps) => dom_content = caps[1].to_string(),
            None => debug!(id, "challenge references a DOM element missing from the page"),
        }
    }

    (dom_key, dom_content)
}
