//! All-or-nothing execution over in-memory contract state.
//!
//! Every public operation of a contract either commits all of its effects
//! or none of them. State that participates implements [`Revertible`]; the
//! operation takes a snapshot up front and restores it if the body fails.

use tracing::trace;

/// State that can be captured and later restored wholesale.
pub trait Revertible {
    type Snapshot;

    fn snapshot(&self) -> Self::Snapshot;

    fn restore(&mut self, snapshot: Self::Snapshot);
}

/// Run `body` against `state`, rolling `state` back if `body` fails.
pub fn atomically<S, R, E>(
    state: &mut S,
    body: impl FnOnce(&mut S) -> Result<R, E>,
) -> Result<R, E>
where
    S: Revertible + ?Sized,
{
    let snapshot = state.snapshot();
    match body(state) {
        Ok(value) => Ok(value),
        Err(err) => {
            trace!("operation failed, restoring snapshot");
            state.restore(snapshot);
            Err(err)
        }
    }
}
