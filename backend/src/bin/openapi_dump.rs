//! Print the OpenAPI document as JSON, or write it to `--output`.

use std::io::{self, Write as _};
use std::path::PathBuf;

use backend::doc::ApiDoc;
use clap::Parser;
use utoipa::OpenApi;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "openapi-dump",
    about = "Emit the blog API OpenAPI document",
    version
)]
struct CliArgs {
    /// Write the document to this file instead of stdout.
    #[arg(long, value_name = "path")]
    output: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .map_err(io::Error::other)?;
    match args.output {
        Some(path) => std::fs::write(path, format!("{json}\n")),
        None => writeln!(io::stdout().lock(), "{json}"),
    }
}
