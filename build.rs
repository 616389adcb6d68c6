fn main() {
    // ── Build identification ─────────────────────────────────────────────────
    //
    // The short git hash is embedded so `/health` can report exactly which
    // build is serving requests. Outside a git checkout the hash is empty.
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    let hash = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_default();

    println!("cargo:rustc-env=GIT_HASH={hash}");
}
