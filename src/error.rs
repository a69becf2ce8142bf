//! Error types.

use thiserror::Error;

/// Errors surfaced through the imperative component handle.
///
/// The change-callback path never produces these; late animation ticks are
/// dropped silently instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeError {
    /// The component is not mounted: never rendered, or already unmounted.
    #[error("component is not mounted")]
    Unmounted,

    /// The component is mounted but has not reported a node.
    #[error("component has not reported a node")]
    NoNode,
}

/// Errors that can occur while loading a [`BridgeConfig`](crate::config::BridgeConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
