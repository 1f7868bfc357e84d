//! Serve command - run the prediction web server

use anyhow::Result;
use std::path::Path;

use crate::server;

pub fn run(artifacts: &Path, host: &str, port: u16) -> Result<()> {
    server::run(artifacts, host, port)
}
