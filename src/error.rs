use thiserror::Error;

/// Errors surfaced by containers and bound action sets.
///
/// Registry deletion is deliberately not represented here: retiring a
/// missing or still-subscribed instance is an idempotent no-op, not an
/// error.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// The container was torn down; no further updates are accepted.
    #[error("container is unmounted")]
    Unmounted,

    /// Dispatch of an action name the bound set does not contain.
    #[error("unknown action `{0}`")]
    UnknownAction(String),
}
