//! Sidecar - page data loader for static site pipelines.

use anyhow::Result;
use clap::Parser;
use sidecar::{
    build::build_pages,
    cli::{Cli, Commands},
    config::SidecarConfig,
    loader::{Context, load_page},
    log,
};
use std::{
    io::{Write, stdout},
    path::{Path, PathBuf},
    sync::Arc,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = cli.root.clone().unwrap_or_else(|| PathBuf::from("./"));
    let config = load_config(&cli, &root)?;
    let ctx = Arc::new(Context::new(&root, &config)?);

    match &cli.command {
        Commands::Load { pages } => print_pages(&ctx, pages).await,
        Commands::Build { output } => {
            build_pages(Arc::clone(&ctx), &config.source.extension, output.as_deref()).await?;
            Ok(())
        }
        Commands::Check => {
            check(&ctx, &config);
            Ok(())
        }
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli, root: &Path) -> Result<SidecarConfig> {
    let mut config = SidecarConfig::load(root, &cli.config)?;
    config.update_with_cli(cli);
    config.validate()?;
    Ok(config)
}

/// Print each page's pocket as pretty JSON, in argument order.
async fn print_pages(ctx: &Context, pages: &[PathBuf]) -> Result<()> {
    for page in pages {
        let pocket = load_page(ctx, page).await?;
        let json = serde_json::to_string_pretty(&*pocket)?;
        writeln!(stdout().lock(), "{json}")?;
    }
    Ok(())
}

fn check(ctx: &Context, config: &SidecarConfig) {
    match &config.config_path {
        Some(path) => log!("config"; "loaded {}", path.display()),
        None => log!("config"; "no config file, using defaults"),
    }
    log!("config"; "root:    {}", ctx.root().display());
    log!("config"; "html:    {}", ctx.html_dir().display());
    log!("config"; "pages:   {}", ctx.pages_dir().display());
    log!("config"; "imports: {}", ctx.imports_dir().display());
    log!("config"; "entry:   {}", ctx.entry());
}
