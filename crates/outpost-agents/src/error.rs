//! Error types for the `outpost-agents` crate.
//!
//! Task failures are not errors at this level: they are carried inside task
//! reports (see [`crate::task::TaskFailure`]) so the queue never stalls.
//! [`AgentError`] covers roster bookkeeping.

use outpost_types::SurvivorId;
use outpost_world::WorldError;

/// Errors that can occur during survivor and roster operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    /// Survivor with the given ID was not found in the roster.
    #[error("survivor not found: {0}")]
    SurvivorNotFound(SurvivorId),

    /// Survivor name already exists in the roster.
    #[error("duplicate survivor name: {0}")]
    DuplicateName(String),

    /// The name pool has been exhausted.
    #[error("no names left in the survivor name pool")]
    NamePoolEmpty,

    /// An arithmetic overflow occurred during a survivor computation.
    #[error("arithmetic overflow in survivor computation: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },

    /// A world-grid or ledger operation failed.
    #[error(transparent)]
    World(#[from] WorldError),
}
