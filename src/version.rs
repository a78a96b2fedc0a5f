// Copyright (c) 2024 Mike Tsao. All rights reserved.

/// The version string `machina --version` reports. Prefers the git
/// description the build environment supplies, if any.
pub fn app_version() -> &'static str {
    option_env!("GIT_DESCRIBE").unwrap_or(env!("CARGO_PKG_VERSION"))
}
