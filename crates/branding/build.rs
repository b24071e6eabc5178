use std::{
    env, fs,
    path::{Path, PathBuf},
    process::Command,
};

use toml::Table;

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR"));

    println!("cargo:rerun-if-env-changed=MESHDESK_BUILD_OVERRIDE");

    if let Some(git_dir) = git_directory(&manifest_dir) {
        emit_rerun_if_exists(&git_dir.join("HEAD"));
        emit_rerun_if_exists(&git_dir.join("refs/heads"));
        emit_rerun_if_exists(&git_dir.join("packed-refs"));
    }

    let workspace_root = workspace_root(&manifest_dir).unwrap_or_else(|| manifest_dir.clone());
    emit_rerun_if_exists(&workspace_root.join("Cargo.toml"));

    let metadata = load_workspace_metadata(&workspace_root);
    let build_revision = determine_build_revision(&manifest_dir);

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR"));
    let dest = out_dir.join("branding_generated.rs");
    fs::write(&dest, metadata.render(&build_revision))
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", dest.display()));
}

fn determine_build_revision(manifest_dir: &Path) -> String {
    if let Ok(over) = env::var("MESHDESK_BUILD_OVERRIDE") {
        let trimmed = over.trim();
        if !trimmed.is_empty() {
            return trimmed.to_owned();
        }
    }
    git_revision(manifest_dir).unwrap_or_else(|| "unknown".to_owned())
}

fn git_revision(manifest_dir: &Path) -> Option<String> {
    run_git(manifest_dir, &["rev-parse", "--short", "HEAD"])
}

fn git_directory(manifest_dir: &Path) -> Option<PathBuf> {
    run_git(manifest_dir, &["rev-parse", "--git-dir"]).map(|output| {
        let path = PathBuf::from(output);
        if path.is_relative() {
            manifest_dir.join(path)
        } else {
            path
        }
    })
}

fn workspace_root(manifest_dir: &Path) -> Option<PathBuf> {
    run_git(manifest_dir, &["rev-parse", "--show-toplevel"]).map(PathBuf::from)
}

fn run_git(manifest_dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).current_dir(manifest_dir).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn emit_rerun_if_exists(path: &Path) {
    if path.exists() {
        println!("cargo:rerun-if-changed={}", path.display());
    }
}

struct WorkspaceMetadata {
    brand: String,
    release_version: String,
    protocol_major: u32,
    protocol_minor: u32,
    peer_bin: String,
    relay_bin: String,
    default_relay_port: u16,
    default_peer_port: u16,
    source: String,
}

fn load_workspace_metadata(workspace_root: &Path) -> WorkspaceMetadata {
    let manifest_path = workspace_root.join("Cargo.toml");
    let manifest = fs::read_to_string(&manifest_path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", manifest_path.display()));
    let table: Table = manifest
        .parse()
        .unwrap_or_else(|err| panic!("failed to parse {}: {err}", manifest_path.display()));

    let meshdesk_table = table
        .get("workspace")
        .and_then(toml::Value::as_table)
        .and_then(|w| w.get("metadata"))
        .and_then(toml::Value::as_table)
        .and_then(|m| m.get("meshdesk"))
        .and_then(toml::Value::as_table)
        .unwrap_or_else(|| panic!("workspace.metadata.meshdesk missing in {}", manifest_path.display()));

    WorkspaceMetadata {
        brand: str_field(meshdesk_table, "brand"),
        release_version: str_field(meshdesk_table, "release_version"),
        protocol_major: int_field(meshdesk_table, "protocol_major"),
        protocol_minor: int_field(meshdesk_table, "protocol_minor"),
        peer_bin: str_field(meshdesk_table, "peer_bin"),
        relay_bin: str_field(meshdesk_table, "relay_bin"),
        default_relay_port: int_field(meshdesk_table, "default_relay_port") as u16,
        default_peer_port: int_field(meshdesk_table, "default_peer_port") as u16,
        source: str_field(meshdesk_table, "source"),
    }
}

fn str_field(table: &Table, key: &str) -> String {
    table
        .get(key)
        .and_then(toml::Value::as_str)
        .unwrap_or_else(|| panic!("workspace.metadata.meshdesk.{key} missing"))
        .to_owned()
}

fn int_field(table: &Table, key: &str) -> u32 {
    table
        .get(key)
        .and_then(toml::Value::as_integer)
        .unwrap_or_else(|| panic!("workspace.metadata.meshdesk.{key} missing")) as u32
}

impl WorkspaceMetadata {
    fn render(&self, build_revision: &str) -> String {
        format!(
            r#"pub const BRAND: &str = "{brand}";
pub const RELEASE_VERSION: &str = "{release_version}";
pub const PROTOCOL_VERSION_MAJOR: u16 = {protocol_major};
pub const PROTOCOL_VERSION_MINOR: u16 = {protocol_minor};
pub const PEER_PROGRAM_NAME: &str = "{peer_bin}";
pub const RELAY_PROGRAM_NAME: &str = "{relay_bin}";
pub const DEFAULT_RELAY_PORT: u16 = {default_relay_port};
pub const DEFAULT_PEER_PORT: u16 = {default_peer_port};
pub const SOURCE_URL: &str = "{source}";
pub const BUILD_REVISION: &str = "{build_revision}";
"#,
            brand = self.brand,
            release_version = self.release_version,
            protocol_major = self.protocol_major,
            protocol_minor = self.protocol_minor,
            peer_bin = self.peer_bin,
            relay_bin = self.relay_bin,
            default_relay_port = self.default_relay_port,
            default_peer_port = self.default_peer_port,
            source = self.source,
            build_revision = sanitize_revision(build_revision),
        )
    }
}

fn sanitize_revision(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return "unknown".to_owned();
    }
    let head = trimmed.split(['\r', '\n']).next().unwrap_or("");
    let cleaned = head.trim();
    if cleaned.is_empty() || cleaned.chars().any(char::is_control) {
        "unknown".to_owned()
    } else {
        cleaned.to_owned()
    }
}
