use cfgate_core::{ChallengeScript, ScriptEngine, SolveError, SolveResult};

/// Run the extracted snippet against a minimal simulated document and
/// return the proof answer exactly as the script produced it.
pub fn solve_challenge(
    script: &ChallengeScript,
    host: &str,
    engine: &dyn ScriptEngine,
) -> Result<SolveResult, SolveError> {
    let answer = engine.evaluate(&wrap(script, host))?;
    Ok(SolveResult {
        answer,
        wait_millis: script.wait_millis,
    })
}

/// Wrap the snippet in an immediately-invoked function whose document stub
/// exposes the only two capabilities challenge scripts are known to use:
/// an element whose first child's href resolves to the current host, and
/// an id lookup returning the inner content captured during extraction.
fn wrap(script: &ChallengeScript, host: &str) -> String {
    format!(
        concat!(
            "(function () {{\n",
            "var document = {{\n",
            "    createElement: function () {{\n",
            "        return {{ firstChild: {{ href: \"http://{host}/\" }} }};\n",
            "    }},\n",
            "    getElementById: function () {{\n",
            "        return {{ \"innerHTML\": \"{content}\" }};\n",
            "    }}\n",
            "}};\n",
            "{code};\n",
            "return a.value;\n",
            "}})()"
        ),
        host = escape_js(host),
        content = escape_js(&script.dom_content),
        code = script.code,
    )
}

/// Escape page-derived text for inclusion in a double-quoted JS literal.
fn escape_js(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}
