use anyhow::{Context, Result};

use cfgate_extract::{extract_form, extract_script};
use cfgate_solve::{eval, BoaEngine};

pub fn run(file: String, host: String) -> Result<()> {
    let body = std::fs::read_to_string(&file).with_context(|| format!("reading {}", file))?;

    let form = extract_form(&body)?;
    println!("form:    {} {}", form.method.as_str(), form.action);
    for (name, value) in &form.fields {
        println!("field:   {} = {}", name, value);
    }

    let script = extract_script(&body)?;
    println!("wait:    {} ms", script.wait_millis);
    if let Some(key) = &script.dom_key {
        println!("dom:     #{} -> {:?}", key, script.dom_content);
    }

    let engine = BoaEngine::new();
    let result = eval::solve_challenge(&script, &host, &engine)?;
    println!("answer:  {}", result.answer);

    Ok(())
}
