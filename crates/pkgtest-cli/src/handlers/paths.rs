//! Show resolved paths for pkgtest directories.

use std::path::Path;

use anyhow::Result;

use pkgtest_core::paths::{cache_root, data_root};
use pkgtest_core::{BuildSettings, MANIFEST_NAME, Recipe};

/// Execute the paths command.
///
/// Always prints the persistent roots; when a package-test root is given,
/// also prints the layout a host-default run would use there.
pub fn execute(root: Option<&Path>) -> Result<()> {
    println!("Data root:   {}", data_root()?.display());
    println!("Cache root:  {}", cache_root()?.display());

    if let Some(root) = root {
        let settings = BuildSettings::host_defaults();
        // The manifest may not exist yet; fall back to an empty recipe so
        // the layout can still be shown.
        let recipe = Recipe::load(root).unwrap_or_else(|_| Recipe::empty());
        let ctx = pkgtest_core::TestContext::new(root, settings, recipe, None);

        println!();
        println!("Manifest:    {}", root.join(MANIFEST_NAME).display());
        println!("Build dir:   {}", ctx.layout.build_dir.display());
        println!("Sources:     {}", ctx.layout.source_dir.display());
    }
    Ok(())
}
