//! `bdl run [links.txt]` – download every URL of a links file.

use anyhow::Result;
use bdl_core::config::BdlConfig;
use bdl_core::input;
use std::path::Path;

use super::batch::{run_urls, BatchOptions};

pub async fn run_links(cfg: &BdlConfig, links: &Path, opts: BatchOptions) -> Result<()> {
    let urls = input::read_url_list(links)?;
    tracing::info!(file = %links.display(), count = urls.len(), "read links file");
    if urls.is_empty() {
        println!("No URLs in {}.", links.display());
        return Ok(());
    }
    run_urls(cfg, &urls, opts).await
}
