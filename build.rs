//! Renders the `sink-receiver(1)` manual page from the clap definition.
//!
//! The page lands in `$OUT_DIR/man`, or in `SINK_RECEIVER_MAN_DIR` when that
//! variable is set for packaging.

use std::{env, fs, path::PathBuf};

use clap::CommandFactory;
use clap_mangen::Man;

#[path = "src/cli.rs"]
mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-env-changed=SINK_RECEIVER_MAN_DIR");

    let man_dir = match env::var_os("SINK_RECEIVER_MAN_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(env::var_os("OUT_DIR").ok_or("OUT_DIR not set")?).join("man"),
    };
    fs::create_dir_all(&man_dir)?;

    let command = cli::Cli::command();
    let page = man_dir.join(format!("{}.1", command.get_name()));
    let mut rendered = Vec::new();
    Man::new(command).render(&mut rendered)?;
    fs::write(page, rendered)?;

    Ok(())
}
