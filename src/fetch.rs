use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::info;

use tversu_structs::settings::Settings;
use tversu_structs::SourceDocuments;

const USER_AGENT: &str = concat!("tversu_structs/", env!("CARGO_PKG_VERSION"));

/// Download all four sources concurrently. Any failed request aborts the run.
pub async fn fetch_sources(settings: &Settings) -> Result<SourceDocuments> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message("Fetching directory, about page, catalog and groups...");
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = tokio::try_join!(
        fetch_text(&client, &settings.directory_url),
        fetch_text(&client, &settings.about_url),
        fetch_json(&client, &settings.catalog_url),
        fetch_json(&client, &settings.groups_url),
    );
    pb.finish_and_clear();

    let (directory_html, about_html, catalog, groups) = result?;
    Ok(SourceDocuments {
        directory_html,
        about_html,
        catalog,
        groups,
    })
}

async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    info!("Fetching {}", url);
    let body = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("Failed to fetch {}", url))?
        .text()
        .await
        .with_context(|| format!("Failed to read body of {}", url))?;
    info!("Fetched {} ({} bytes)", url, body.len());
    Ok(body)
}

async fn fetch_json(client: &reqwest::Client, url: &str) -> Result<Value> {
    let body = fetch_text(client, url).await?;
    serde_json::from_str(&body).with_context(|| format!("{} did not return JSON", url))
}

/// Read previously saved copies of the four sources from `dir`.
pub fn read_sources(dir: &Path) -> Result<SourceDocuments> {
    let read = |file: &str| {
        let path = dir.join(file);
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    };
    let json = |file: &str| -> Result<Value> {
        serde_json::from_str(&read(file)?).with_context(|| format!("{} is not valid JSON", file))
    };

    info!("Reading sources from {}", dir.display());
    Ok(SourceDocuments {
        directory_html: read("directory.html")?,
        about_html: read("about.html")?,
        catalog: json("catalog.json")?,
        groups: json("groups.json")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_fixture_directory() {
        let docs = read_sources(Path::new("tests/fixtures")).unwrap();
        assert!(docs.directory_html.contains("Факультеты и институты"));
        assert!(docs.catalog["data"].is_array());
        assert!(docs.groups["groups"].is_array());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_sources(Path::new("tests/no-such-dir")).unwrap_err();
        assert!(err.to_string().contains("directory.html"));
    }
}
