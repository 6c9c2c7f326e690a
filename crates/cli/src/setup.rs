//! `shelf setup`: install an environment template as `.env`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use shelf_kernel::settings::Environment;

const TARGET_FILE: &str = ".env";

/// Result of a successful install.
#[derive(Debug)]
pub struct Installed {
    pub template: PathBuf,
    pub target: PathBuf,
}

/// Copy `env.<environment>` from `dir` to `dir/.env`.
///
/// Refuses to replace an existing `.env` unless `force` is set.
pub fn install_env(dir: &Path, environment: Environment, force: bool) -> anyhow::Result<Installed> {
    let template = dir.join(format!("env.{}", environment));
    let target = dir.join(TARGET_FILE);

    if !template.is_file() {
        bail!("environment template {} not found", template.display());
    }
    if target.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            target.display()
        );
    }

    std::fs::copy(&template, &target).with_context(|| {
        format!(
            "failed to copy {} to {}",
            template.display(),
            target.display()
        )
    })?;

    Ok(Installed { template, target })
}

pub fn print_next_steps(installed: &Installed, environment: Environment) {
    println!("Environment configured for {}", environment);
    println!(
        "Copied {} to {}",
        installed.template.display(),
        installed.target.display()
    );

    if environment == Environment::Production {
        println!();
        println!("Before going live, review in .env:");
        println!("  - SHELF_SERVER__CORS_ORIGINS (allowed browser origins)");
        println!("  - SHELF_STORAGE__PATH (where books are stored)");
    }

    println!();
    println!("Next steps:");
    println!("  1. Review and edit .env if needed");
    println!("  2. Start the server: shelf serve");
}
