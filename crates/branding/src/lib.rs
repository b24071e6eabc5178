//! Central source of truth for product identity, protocol version and
//! default ports, generated at build time from the workspace manifest.

include!(concat!(env!("OUT_DIR"), "/branding_generated.rs"));

/// Returns the sanitized build revision embedded in the binaries.
#[must_use]
pub const fn build_revision() -> &'static str {
    BUILD_REVISION
}

/// Returns the `major.minor` protocol version string advertised during the
/// handshake.
#[must_use]
pub fn protocol_version_string() -> String {
    format!("{PROTOCOL_VERSION_MAJOR}.{PROTOCOL_VERSION_MINOR}")
}
