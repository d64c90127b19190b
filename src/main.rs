//! playpush - publish an APK to a Google Play release track.
//!
//! Exits with status 0 when the edit is committed and 1 on any failure.

use playpush::cli;
use std::process;

#[tokio::main]
async fn main() {
    let exit_code = cli::run().await;
    process::exit(exit_code);
}
