//! # Reducers
//!
//! A reducer is a pure `(state, action) -> state` transition. States travel
//! as `Arc` snapshots: returning the *same* `Arc` means "nothing changed",
//! which is how the history wrapper tells edits from no-ops.
//!
//! | Reducer | State | Action |
//! |---------|-------|--------|
//! | [`FilterReducer`] | `FilterConfiguration` | `FilterAction` |
//! | [`QueryReducer`] | `GraphQuery` | `QueryAction` |
//! | [`FnReducer`] | any | any |

pub mod filter;
pub mod query;

use std::marker::PhantomData;
use std::sync::Arc;

pub use filter::{FilterReducer, reduce};
pub use query::QueryReducer;

// ============================================================================
// Reducer trait
// ============================================================================

/// The contract between a state machine and the history wrapper.
///
/// Implementations must be pure: no I/O, no randomness, no mutation of the
/// input snapshot. They must also be total: an action that does not apply
/// returns `Arc::clone(state)`.
pub trait Reducer {
    type State;
    type Action;

    fn reduce(&self, state: &Arc<Self::State>, action: &Self::Action) -> Arc<Self::State>;
}

// ============================================================================
// Closure adapter
// ============================================================================

/// Adapts a plain function or closure into a [`Reducer`].
pub struct FnReducer<S, A, F> {
    f: F,
    _marker: PhantomData<fn(&S, &A) -> S>,
}

impl<S, A, F> Reducer for FnReducer<S, A, F>
where
    F: Fn(&Arc<S>, &A) -> Arc<S>,
{
    type State = S;
    type Action = A;

    fn reduce(&self, state: &Arc<S>, action: &A) -> Arc<S> {
        (self.f)(state, action)
    }
}

/// Wrap `f` as a reducer.
pub fn from_fn<S, A, F>(f: F) -> FnReducer<S, A, F>
where
    F: Fn(&Arc<S>, &A) -> Arc<S>,
{
    FnReducer { f, _marker: PhantomData }
}

/// Keep the old snapshot when `next` is structurally equal to it.
pub(crate) fn commit<S: PartialEq>(state: &Arc<S>, next: S) -> Arc<S> {
    if **state == next {
        Arc::clone(state)
    } else {
        Arc::new(next)
    }
}
