/*++

Licensed under the Apache-2.0 license.

File Name:

   mod.rs

Abstract:

    File contains implementation of the Bootgate verify command.

--*/

use std::path::PathBuf;

use anyhow::anyhow;
use bootgate_crypto::RustCrypto;
use bootgate_drivers::HostFs;
use bootgate_verify::verify_boot_manifest;
use clap::ArgMatches;

pub(crate) fn run_cmd(args: &ArgMatches) -> anyhow::Result<()> {
    let root: &PathBuf = args
        .get_one::<PathBuf>("root")
        .ok_or_else(|| anyhow!("root arg not specified"))?;

    let fs = HostFs::new(root);
    let manifest = verify_boot_manifest(&fs, &RustCrypto::default())
        .map_err(|err| anyhow!("Verification failed: {err}"))?;

    for entry in manifest.entries() {
        println!("verified {entry}");
    }

    Ok(())
}
