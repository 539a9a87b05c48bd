use std::path::PathBuf;

use anyhow::{bail, Context};
use rolodex::{Pipeline, RolodexConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const USAGE: &str = "usage: rolodex [--config <path>] <command>

commands:
  search <owner> <query...>   rank the owner's connections against a query
  enrich <key...>             collect and enrich one or more people (platform:handle)
  show <key>                  print the stored record for a person";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("rolodex=info"))?)
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let mut config_path: Option<PathBuf> = None;
    if args.first().map(String::as_str) == Some("--config") {
        if args.len() < 2 {
            bail!("--config needs a path\n\n{USAGE}");
        }
        config_path = Some(PathBuf::from(args.remove(1)));
        args.remove(0);
    }

    let Some(command) = args.first().cloned() else {
        bail!("{USAGE}");
    };
    let rest = &args[1..];

    let config = match config_path {
        Some(path) => RolodexConfig::load(Some(&path)),
        None => RolodexConfig::from_env(),
    }
    .context("loading configuration")?;
    let pipeline = Pipeline::from_config(&config).await.context("starting pipeline")?;

    let output = match (command.as_str(), rest) {
        ("search", [owner, query @ ..]) if !query.is_empty() => {
            serde_json::to_string_pretty(&pipeline.search(&query.join(" "), owner).await)?
        }
        ("enrich", [key]) => {
            let profile = pipeline
                .collect_and_enrich(key)
                .await
                .with_context(|| format!("enriching {key}"))?;
            serde_json::to_string_pretty(&profile)?
        }
        ("enrich", keys) if !keys.is_empty() => serde_json::to_string_pretty(&pipeline.batch_enrich(keys).await)?,
        ("show", [key]) => match pipeline.person(key).await? {
            Some(person) => serde_json::to_string_pretty(&person)?,
            None => bail!("no stored record for {key}"),
        },
        _ => bail!("{USAGE}"),
    };

    println!("{output}");
    Ok(())
}
