#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

use anyhow::Result;
use vergen::EmitBuilder;

fn main() -> Result<()> {
    let res = EmitBuilder::builder().all_build().all_git().emit();
    if res.is_err() {
        // Tarball builds have no git metadata.
        println!("cargo:rustc-env=VERGEN_GIT_DESCRIBE=unknown");
    }

    return Ok(());
}
