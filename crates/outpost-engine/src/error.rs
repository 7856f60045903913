//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and simulation execution.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: outpost_core::config::ConfigError,
    },

    /// Simulation clock initialization failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: outpost_core::clock::ClockError,
    },

    /// World grid construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: outpost_world::WorldError,
    },

    /// Survivor spawning failed.
    #[error("spawner error: {source}")]
    Spawner {
        /// The underlying roster error.
        #[from]
        source: outpost_agents::AgentError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: outpost_core::runner::RunnerError,
    },

    /// The configured layout cannot be built.
    #[error("scenario error: {message}")]
    Scenario {
        /// Description of the layout problem.
        message: String,
    },

    /// The final report could not be serialized.
    #[error("report error: {source}")]
    Report {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
