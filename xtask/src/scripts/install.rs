use crate::cli;
use color_eyre::eyre::{eyre, Result};
use duct::cmd;
use std::env;
use std::path::{Path, PathBuf};

pub fn install(args: &cli::InstallArgs) -> Result<()> {
    println!("Building {} in release mode...", args.name);

    cmd!("cargo", "build", "--bin", &args.name, "--release").run()?;

    let install_dir = resolve_install_dir(args)?;
    if !install_dir.exists() {
        println!("Creating directory: {}", install_dir.display());
        std::fs::create_dir_all(&install_dir)?;
    }

    let source_path = PathBuf::from("target").join("release").join(&args.name);
    let dest_path = install_dir.join(&args.name);

    println!("Installing {} to {}", args.name, dest_path.display());
    std::fs::copy(&source_path, &dest_path)?;

    // Make it executable (Unix-like systems)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(&dest_path)?.permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&dest_path, perms)?;
    }

    println!("✓ Installed {} to {}", args.name, dest_path.display());

    warn_if_not_in_path(&install_dir);

    Ok(())
}

fn resolve_install_dir(args: &cli::InstallArgs) -> Result<PathBuf> {
    if let Some(path) = &args.path {
        return Ok(PathBuf::from(path));
    }

    let home = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map_err(|_| eyre!("Could not determine home directory"))?;

    Ok(PathBuf::from(home).join(".local").join("bin"))
}

fn warn_if_not_in_path(install_dir: &Path) {
    if let Ok(path_var) = env::var("PATH") {
        let install_dir_str = install_dir.to_string_lossy();
        if !path_var.split(':').any(|p| p == install_dir_str) {
            println!("\nNote: {} is not in your PATH.", install_dir.display());
            println!("Add this line to your shell config:");
            println!("  export PATH=\"{}:$PATH\"", install_dir.display());
        }
    }
}
