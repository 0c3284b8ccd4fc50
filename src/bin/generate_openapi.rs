//! Prints the OpenAPI document for the logger's HTTP API.
//!
//!   cargo run --bin generate_openapi > openapi.json
//!   cargo run --bin generate_openapi -- --output docs/openapi.json

use std::{env, fs, io::Write, path::PathBuf};

use anyhow::{bail, Context, Result};
use utoipa::OpenApi;
use water_level_logger::api::handlers::ApiDoc;

fn main() -> Result<()> {
    let output = output_path(env::args().skip(1))?;
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .context("failed to serialise OpenAPI document")?;

    match output {
        Some(path) => {
            fs::write(&path, &json).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("OpenAPI document written to {}", path.display());
        }
        None => std::io::stdout()
            .write_all(json.as_bytes())
            .context("writing to stdout")?,
    }
    Ok(())
}

fn output_path(mut args: impl Iterator<Item = String>) -> Result<Option<PathBuf>> {
    match args.next().as_deref() {
        None => Ok(None),
        Some("--output") => match args.next() {
            Some(path) => Ok(Some(PathBuf::from(path))),
            None => bail!("--output needs a path"),
        },
        Some(other) => bail!("unexpected argument: {other}"),
    }
}
