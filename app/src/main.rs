/*++

Licensed under the Apache-2.0 license.

File Name:

   main.rs

Abstract:

    Main entry point for the Bootgate verification application

--*/
use std::path::PathBuf;

use clap::{arg, value_parser, Command};

mod verify;

/// Entry point
fn main() {
    let sub_cmds = vec![Command::new("verify")
        .about("Verify a boot file tree against its signed manifest")
        .arg(
            arg!(--"root" <DIR> "Directory holding the boot manifest and the files it lists")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )];

    let cmd = Command::new("bootgate-app")
        .arg_required_else_help(true)
        .subcommands(sub_cmds)
        .about("Bootgate boot-integrity tools")
        .get_matches();

    let result = match cmd.subcommand().unwrap() {
        ("verify", args) => verify::run_cmd(args),
        (_, _) => unreachable!(),
    };

    if let Err(err) = result {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}
