//! `bdl get <url>...` – download URLs given on the command line.

use anyhow::Result;
use bdl_core::config::BdlConfig;

use super::batch::{run_urls, BatchOptions};

pub async fn run_get(cfg: &BdlConfig, urls: &[String], opts: BatchOptions) -> Result<()> {
    run_urls(cfg, urls, opts).await
}
