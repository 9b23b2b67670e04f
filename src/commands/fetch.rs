use anyhow::{Context, Result};
use tracing::info;
use url::Url;

use cfgate_core::{config::AppConfig, HttpRequest};
use cfgate_solve::BoaEngine;

pub async fn run(config: AppConfig, url: String, output: Option<String>) -> Result<()> {
    let url = Url::parse(&url).context("invalid target URL")?;
    let client = cfgate_client::build_client(&config.http)?;
    let transport = cfgate_client::ReqwestTransport::new(client);

    let mut request = HttpRequest::get(url);
    request.set_header("User-Agent", &config.http.user_agent);
    request.set_header(
        "Accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
    );

    let engine = BoaEngine::new();
    let response = cfgate_client::run(&transport, &request, &engine, &config.diagnostics).await?;

    info!(status = response.status, bytes = response.body.len(), "fetch finished");

    match output {
        Some(path) => {
            std::fs::write(&path, &response.body).with_context(|| format!("writing {}", path))?
        }
        None => {
            use std::io::Write;
            std::io::stdout().write_all(&response.body)?;
        }
    }

    Ok(())
}
