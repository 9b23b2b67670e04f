use boa_engine::{Context, Source};

use cfgate_core::{ScriptEngine, SolveError};

/// In-process JavaScript engine backed by Boa, with the legacy Annex B
/// string helpers enabled: challenge snippets lean on `substr` to peel
/// the host out of an href.
///
/// A fresh context is built for every evaluation: the document stub the
/// evaluator bakes into the expression closes over per-solve state, so
/// contexts are never pooled or shared between concurrent solves.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoaEngine;

impl BoaEngine {
    pub fn new() -> Self {
        Self
    }
}

impl ScriptEngine for BoaEngine {
    fn evaluate(&self, code: &str) -> Result<String, SolveError> {
        let mut context = Context::default();
        let value = context
            .eval(Source::from_bytes(code))
            .map_err(|e| SolveError::Evaluation(e.to_string()))?;
        let text = value
            .to_string(&mut context)
            .map_err(|e| SolveError::ResultParse(e.to_string()))?;
        Ok(text.to_std_string_escaped())
    }
}
