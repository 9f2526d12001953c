use anyhow::Context;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

/// Verify the workspace layering: domain depends on nothing internal,
/// shared depends only on domain, client may depend on both.
fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: serde_json::Value =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;

    let allowed: &[(&str, &[&str])] = &[
        ("taleweave-domain", &[]),
        ("taleweave-shared", &["taleweave-domain"]),
        ("taleweave-client", &["taleweave-domain", "taleweave-shared"]),
    ];

    let packages = metadata["packages"]
        .as_array()
        .context("metadata has no packages")?;

    for package in packages {
        let name = package["name"].as_str().unwrap_or_default();
        let Some((_, allowed_deps)) = allowed.iter().find(|(n, _)| *n == name) else {
            continue;
        };
        for dep in package["dependencies"].as_array().into_iter().flatten() {
            let dep_name = dep["name"].as_str().unwrap_or_default();
            if dep_name.starts_with("taleweave-") && !allowed_deps.contains(&dep_name) {
                anyhow::bail!("{name} must not depend on {dep_name}");
            }
        }
    }

    Ok(())
}
