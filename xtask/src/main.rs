//! Build tooling for Strand plugins.
//!
//! Usage: cargo xtask bundle <package> [--release] [--install]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 || args[1] != "bundle" {
        print_usage();
        std::process::exit(1);
    }

    let package = &args[2];
    let release = args.iter().any(|a| a == "--release");
    let install = args.iter().any(|a| a == "--install");

    if let Err(e) = bundle(package, release, install) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage: cargo xtask bundle <package> [--release] [--install]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  bundle    Build a plugin and assemble its .lv2 bundle");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --release    Build in release mode");
    eprintln!("  --install    Install to the per-user LV2 directory");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  cargo xtask bundle midi-randomizer --release --install");
}

fn bundle(package: &str, release: bool, install: bool) -> Result<(), String> {
    println!("Bundling {} (release: {})...", package, release);

    let workspace_root = get_workspace_root()?;
    let package_dir = workspace_root.join("plugins").join(package);
    if !package_dir.is_dir() {
        return Err(format!("Plugin not found: {}", package_dir.display()));
    }

    // Build the plugin
    println!("Building...");
    let mut cmd = Command::new("cargo");
    cmd.arg("build")
        .arg("-p")
        .arg(package)
        .current_dir(&workspace_root);

    if release {
        cmd.arg("--release");
    }

    let status = cmd.status().map_err(|e| format!("Failed to run cargo: {}", e))?;
    if !status.success() {
        return Err("Build failed".to_string());
    }

    let profile = if release { "release" } else { "debug" };
    let target_dir = workspace_root.join("target").join(profile);

    let binary_name = library_file_name(package);
    let binary_path = target_dir.join(&binary_name);
    if !binary_path.exists() {
        return Err(format!("Built library not found: {}", binary_path.display()));
    }

    let source = fs::read_to_string(package_dir.join("src/lib.rs"))
        .map_err(|e| format!("Failed to read plugin source: {}", e))?;
    let uri = detect_lv2_uri(&source)
        .ok_or_else(|| "No Lv2Config::new(c\"...\") found in plugin source".to_string())?;
    println!("Detected plugin URI: {}", uri);

    // Create the bundle directory
    let bundle_name = format!("{}.lv2", package);
    let bundle_dir = target_dir.join(&bundle_name);
    println!("Creating LV2 bundle at {}...", bundle_dir.display());

    if bundle_dir.exists() {
        fs::remove_dir_all(&bundle_dir).map_err(|e| format!("Failed to remove old bundle: {}", e))?;
    }
    fs::create_dir_all(&bundle_dir).map_err(|e| format!("Failed to create bundle dir: {}", e))?;

    fs::copy(&binary_path, bundle_dir.join(&binary_name))
        .map_err(|e| format!("Failed to copy library: {}", e))?;

    // Copy the plugin description, then describe the bundle around it
    let ttl_name = format!("{}.ttl", package);
    let ttl_path = package_dir.join("bundle").join(&ttl_name);
    fs::copy(&ttl_path, bundle_dir.join(&ttl_name))
        .map_err(|e| format!("Failed to copy {}: {}", ttl_path.display(), e))?;

    // Factory presets are optional
    let presets_path = package_dir.join("bundle").join(PRESETS_FILE);
    let presets = if presets_path.exists() {
        fs::copy(&presets_path, bundle_dir.join(PRESETS_FILE))
            .map_err(|e| format!("Failed to copy {}: {}", presets_path.display(), e))?;
        let content = fs::read_to_string(&presets_path)
            .map_err(|e| format!("Failed to read {}: {}", presets_path.display(), e))?;
        detect_presets(&content)
    } else {
        Vec::new()
    };
    println!("Found {} preset(s)", presets.len());

    let manifest = create_manifest(&uri, &binary_name, &ttl_name, &presets);
    fs::write(bundle_dir.join("manifest.ttl"), manifest)
        .map_err(|e| format!("Failed to write manifest.ttl: {}", e))?;

    println!("LV2 bundle created: {}", bundle_dir.display());

    if install {
        install_lv2(&bundle_dir, &bundle_name)?;
    }

    Ok(())
}

/// Platform file name of a cdylib built from `package`.
fn library_file_name(package: &str) -> String {
    // Cargo replaces hyphens with underscores in library names
    let lib_name = package.replace('-', "_");

    if cfg!(target_os = "windows") {
        format!("{}.dll", lib_name)
    } else if cfg!(target_os = "macos") {
        format!("lib{}.dylib", lib_name)
    } else {
        format!("lib{}.so", lib_name)
    }
}

/// Extract the plugin URI from plugin source code.
///
/// Looks for the pattern `Lv2Config::new(c"...")`.
fn detect_lv2_uri(content: &str) -> Option<String> {
    const PATTERN: &str = "Lv2Config::new(c\"";

    let start = content.find(PATTERN)? + PATTERN.len();
    let rest = &content[start..];
    let end = rest.find('"')?;
    let uri = &rest[..end];

    (!uri.is_empty()).then(|| uri.to_string())
}

/// Preset description file, looked up next to the plugin's own Turtle.
const PRESETS_FILE: &str = "presets.ttl";

/// Subjects of every `pset:Preset` in a presets file.
///
/// Expects each preset to start with its URI alone on a line, followed by
/// `a pset:Preset`, which is how `presets.ttl` files are laid out here.
fn detect_presets(content: &str) -> Vec<String> {
    let mut presets = Vec::new();
    let mut subject = None;

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('<') && line.ends_with('>') {
            subject = Some(&line[1..line.len() - 1]);
        } else if line.starts_with("a pset:Preset") {
            if let Some(uri) = subject.take() {
                presets.push(uri.to_string());
            }
        }
    }

    presets
}

fn create_manifest(uri: &str, binary_name: &str, ttl_name: &str, presets: &[String]) -> String {
    let mut manifest = format!(
        r#"@prefix lv2:  <http://lv2plug.in/ns/lv2core#> .
@prefix pset: <http://lv2plug.in/ns/ext/presets#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

<{uri}>
    a lv2:Plugin ;
    lv2:binary <{binary}> ;
    rdfs:seeAlso <{ttl}> .
"#,
        uri = uri,
        binary = binary_name,
        ttl = ttl_name
    );

    for preset in presets {
        manifest.push_str(&format!(
            r#"
<{preset}>
    a pset:Preset ;
    lv2:appliesTo <{uri}> ;
    rdfs:seeAlso <{file}> .
"#,
            preset = preset,
            uri = uri,
            file = PRESETS_FILE
        ));
    }

    manifest
}

/// Per-user LV2 directory for the current platform.
fn lv2_install_dir() -> Result<PathBuf, String> {
    if cfg!(target_os = "windows") {
        let appdata = std::env::var("APPDATA").map_err(|_| "APPDATA not set")?;
        Ok(PathBuf::from(appdata).join("LV2"))
    } else if cfg!(target_os = "macos") {
        let home = std::env::var("HOME").map_err(|_| "HOME not set")?;
        Ok(PathBuf::from(home)
            .join("Library")
            .join("Audio")
            .join("Plug-Ins")
            .join("LV2"))
    } else {
        let home = std::env::var("HOME").map_err(|_| "HOME not set")?;
        Ok(PathBuf::from(home).join(".lv2"))
    }
}

fn install_lv2(bundle_dir: &Path, bundle_name: &str) -> Result<(), String> {
    let lv2_dir = lv2_install_dir()?;

    // Create LV2 directory if needed
    fs::create_dir_all(&lv2_dir).map_err(|e| format!("Failed to create LV2 dir: {}", e))?;

    let dest = lv2_dir.join(bundle_name);

    // Remove existing installation
    if dest.exists() {
        fs::remove_dir_all(&dest).map_err(|e| format!("Failed to remove old installation: {}", e))?;
    }

    copy_dir_all(bundle_dir, &dest)?;

    println!("LV2 bundle installed to: {}", dest.display());
    Ok(())
}

fn get_workspace_root() -> Result<PathBuf, String> {
    let output = Command::new("cargo")
        .args(["locate-project", "--workspace", "--message-format=plain"])
        .output()
        .map_err(|e| format!("Failed to locate workspace: {}", e))?;

    if !output.status.success() {
        return Err("Failed to locate workspace".to_string());
    }

    let cargo_toml = String::from_utf8_lossy(&output.stdout);
    let path = PathBuf::from(cargo_toml.trim());
    path.parent()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| "Invalid workspace path".to_string())
}

fn copy_dir_all(src: &Path, dst: &Path) -> Result<(), String> {
    fs::create_dir_all(dst).map_err(|e| format!("Failed to create dir: {}", e))?;

    for entry in fs::read_dir(src).map_err(|e| format!("Failed to read dir: {}", e))? {
        let entry = entry.map_err(|e| format!("Failed to read entry: {}", e))?;
        let ty = entry
            .file_type()
            .map_err(|e| format!("Failed to get file type: {}", e))?;

        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if ty.is_dir() {
            copy_dir_all(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path).map_err(|e| format!("Failed to copy file: {}", e))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_lv2_uri() {
        let source = r#"
            pub const LV2_CONFIG: Lv2Config = Lv2Config::new(c"http://example.org/midi-randomizer");
        "#;
        assert_eq!(
            detect_lv2_uri(source).as_deref(),
            Some("http://example.org/midi-randomizer")
        );
        assert_eq!(detect_lv2_uri("Lv2Config::new(c\"\")"), None);
        assert_eq!(detect_lv2_uri("no config here"), None);
    }

    #[test]
    fn test_library_file_name() {
        let name = library_file_name("midi-randomizer");
        assert!(name.contains("midi_randomizer"));
    }

    #[test]
    fn test_manifest_names_binary_and_description() {
        let manifest = create_manifest(
            "http://example.org/midi-randomizer",
            "libmidi_randomizer.so",
            "midi-randomizer.ttl",
            &[],
        );
        assert!(manifest.contains("<http://example.org/midi-randomizer>"));
        assert!(manifest.contains("lv2:binary <libmidi_randomizer.so> ;"));
        assert!(manifest.contains("rdfs:seeAlso <midi-randomizer.ttl> ."));
        assert!(!manifest.contains("a pset:Preset"));
    }

    #[test]
    fn test_detect_presets() {
        let content = include_str!("../../plugins/midi-randomizer/bundle/presets.ttl");
        assert_eq!(
            detect_presets(content),
            [
                "http://example.org/midi-randomizer#subtle-groove",
                "http://example.org/midi-randomizer#human-feel",
                "http://example.org/midi-randomizer#chaotic",
            ]
        );
        // Only subjects that are presets count
        let content = "<http://example.org/a>\n    a lv2:Plugin ;\n<http://example.org/b>\n";
        assert!(detect_presets(content).is_empty());
    }

    #[test]
    fn test_manifest_lists_presets() {
        let presets = ["http://example.org/midi-randomizer#chaotic".to_string()];
        let manifest = create_manifest(
            "http://example.org/midi-randomizer",
            "libmidi_randomizer.so",
            "midi-randomizer.ttl",
            &presets,
        );
        assert!(manifest.contains(
            "<http://example.org/midi-randomizer#chaotic>\n    a pset:Preset ;\n    \
             lv2:appliesTo <http://example.org/midi-randomizer> ;\n    \
             rdfs:seeAlso <presets.ttl> ."
        ));
    }
}
