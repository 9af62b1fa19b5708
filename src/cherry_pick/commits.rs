//! Commit classification - pure functions, no I/O

use crate::types::Commit;

/// Keep only the commits that can be cherry-picked (exactly one parent)
///
/// Merge commits and parentless commits are dropped; the order of the
/// remaining commits is the order the host reported them in.
pub fn cherry_pickable_commits(commits: &[Commit]) -> Vec<Commit> {
    commits
        .iter()
        .filter(|c| c.parents.len() == 1)
        .cloned()
        .collect()
}

/// SHAs of `commits`, space-separated, as `git cherry-pick` takes them
pub fn cherry_pick_args(commits: &[Commit]) -> String {
    commits
        .iter()
        .map(|c| c.sha.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(sha: &str, parents: &[&str]) -> Commit {
        Commit {
            sha: sha.to_string(),
            parents: parents.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_drops_merge_commits_keeps_order() {
        let commits = vec![
            commit("m", &["a", "b"]),
            commit("c1", &["m"]),
            commit("c2", &["c1"]),
        ];
        let picked = cherry_pickable_commits(&commits);
        let shas: Vec<_> = picked.iter().map(|c| c.sha.as_str()).collect();
        assert_eq!(shas, vec!["c1", "c2"]);
    }

    #[test]
    fn test_interleaved_merges() {
        let commits = vec![
            commit("c1", &["base"]),
            commit("m1", &["c1", "main"]),
            commit("c2", &["m1"]),
            commit("m2", &["c2", "main", "other"]),
            commit("c3", &["m2"]),
        ];
        let picked = cherry_pickable_commits(&commits);
        assert_eq!(cherry_pick_args(&picked), "c1 c2 c3");
    }

    #[test]
    fn test_root_commit_is_not_pickable() {
        let commits = vec![commit("root", &[]), commit("c1", &["root"])];
        assert_eq!(cherry_pickable_commits(&commits).len(), 1);
    }

    #[test]
    fn test_all_merges_yields_empty() {
        let commits = vec![commit("m1", &["a", "b"]), commit("m2", &["m1", "c"])];
        assert!(cherry_pickable_commits(&commits).is_empty());
        assert!(cherry_pickable_commits(&[]).is_empty());
    }
}
