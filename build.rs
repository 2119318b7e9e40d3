//! Build script for man page generation.
//!
//! Renders a man page for the `forte-client` binary with `clap_mangen`. The
//! CLI definitions come from the `cli-defs` crate so the build script does
//! not depend on the networking code.

use std::{env, fs, io, path::PathBuf};

use clap::CommandFactory;
use clap_mangen::Man;
use cli_defs::Cli;

fn main() -> io::Result<()> {
    println!("cargo::rerun-if-changed=cli-defs");

    let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else {
        return Ok(());
    };

    let cmd = Cli::command();
    let bin_name = cmd.get_name().to_owned();
    let man = Man::new(cmd);

    let man_path = out_dir.join(format!("{bin_name}.1"));
    let mut file = fs::File::create(&man_path)?;
    man.render(&mut file)?;

    Ok(())
}
