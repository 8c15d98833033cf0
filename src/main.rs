mod fetch;
mod output;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use tversu_structs::settings::Settings;

#[derive(Parser)]
#[command(
    name = "tversu_structs",
    about = "Collect faculties, institutes and departments of Tver State University"
)]
struct Cli {
    /// Write JSON to this file
    #[arg(short, long, conflicts_with = "output_auto")]
    output: Option<PathBuf>,
    /// Write JSON to structs-YYYY-MM-DD.json
    #[arg(short = 'a', long)]
    output_auto: bool,
    /// Directory for the output file (created if missing)
    #[arg(short = 'd', long)]
    output_directory: Option<PathBuf>,
    /// Indent the JSON output
    #[arg(short, long)]
    prettify: bool,
    /// Log warnings and progress, not only errors
    #[arg(short, long)]
    warnings: bool,
    /// Read directory.html, about.html, catalog.json and groups.json from here
    /// instead of downloading them
    #[arg(short, long)]
    input_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.warnings { "info" } else { "error" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .init();

    let t0 = Instant::now();
    let settings = Settings::load().context("Failed to load settings")?;
    let opts = settings.parse_options()?;

    let docs = match &cli.input_dir {
        Some(dir) => fetch::read_sources(dir)?,
        None => fetch::fetch_sources(&settings).await?,
    };
    info!("Sources loaded in {}", format_duration(t0.elapsed()));

    let orgs = tversu_structs::collect_organizations(&docs, &opts)?;

    let file = match (&cli.output, cli.output_auto) {
        (Some(path), _) => Some(path.to_string_lossy().into_owned()),
        (None, true) => Some(output::auto_file_name(chrono::Local::now().date_naive())),
        (None, false) => None,
    };

    match file {
        Some(file) => {
            let path = output::resolve_path(cli.output_directory.as_deref(), &file)?;
            output::write_json(&path, &orgs, cli.prettify)?;
            println!("Saved {} organizations to {}", orgs.len(), path.display());
        }
        None => output::print_table(&orgs),
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    let (h, m, s) = (secs / 3600, secs % 3600 / 60, secs % 60);
    match (h, m) {
        (0, 0) => format!("{:.1}s", d.as_secs_f64()),
        (0, _) => format!("{}m {}s", m, s),
        _ => format!("{}h {}m {}s", h, m, s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn durations() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m 5s");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h 0m 0s");
    }

    #[test]
    fn output_and_auto_conflict() {
        assert!(Cli::try_parse_from(["tversu_structs", "-o", "a.json", "-a"]).is_err());
        let cli = Cli::try_parse_from(["tversu_structs", "-a", "-d", "out", "-p"]).unwrap();
        assert!(cli.output_auto && cli.prettify);
        assert_eq!(cli.output_directory, Some(PathBuf::from("out")));
    }
}
