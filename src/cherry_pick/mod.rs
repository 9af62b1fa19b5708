//! Cherry-pick pipeline for merged pull requests
//!
//! Same gather / decide / act split as the rest of the crate:
//! 1. Discover - list recently merged PRs (effectful, read-only)
//! 2. Check - classify commits (pure) and probe mergeability through a
//!    disposable PR that is always closed again
//! 3. Materialize - with an explicit [`Confirmation`], cut a branch from the
//!    target tip and open a PR documenting the cherry-pick (effectful)

mod cancel;
mod commits;
mod confirm;
mod discovery;
mod materialize;
mod probe;
mod request;

pub use cancel::{CancelHandle, Cancellation};
pub use commits::{cherry_pick_args, cherry_pickable_commits};
pub use confirm::Confirmation;
pub use discovery::{list_merged_prs, lookback_cutoff, merged_since};
pub use materialize::{
    CherryPickBatch, cherry_pick_body, cherry_pick_title, create_cherry_pick_pr,
    create_cherry_pick_prs,
};
pub use probe::{
    PROBE_TITLE_PREFIX, ProbeSchedule, ProbeStatus, check_cherry_pick_conflicts, interpret_probe,
    probe_title,
};
pub use request::{PickRequest, cherry_pick_branch_name};
