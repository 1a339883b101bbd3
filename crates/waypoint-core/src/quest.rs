//! Read-only queries over quest trees.
//!
//! A quest is a tree of [`QuestNode`]s. Each node sits at one POI and lists
//! ordered objectives; completing an objective unlocks its `next_node`.
//! Authoring data is a DAG in practice, so the same node can hang under
//! several parents. Every traversal here carries a per-call visited set
//! keyed by [`NodeKey`] and stops descending at a repeat instead of
//! revisiting it.
//!
//! # Completion gating
//!
//! Traversals that model what an entity has *unlocked* only descend into a
//! child when the parent objective is complete. Two sources of completion
//! exist:
//!
//! - the `is_completed` flag the quest-log API reports on each
//!   [`Objective`], used by [`collect_reachable_points_of_interest`] and
//!   [`pending_challenges`];
//! - a caller-supplied predicate over challenge ids, normally
//!   [`CaptureResolver::is_objective_complete_for`](crate::capture::CaptureResolver::is_objective_complete_for),
//!   used by [`count_progress`] and the `_by` variants.

use std::collections::{BTreeSet, HashSet};

use waypoint_types::{
    Challenge, ChallengeId, Objective, PoiId, PointOfInterest, Quest, QuestId, QuestNode,
};

// ---------------------------------------------------------------------------
// Node identity and the visited guard
// ---------------------------------------------------------------------------

/// Stable identity of a quest node: its POI plus its ordered challenge ids.
///
/// Two nodes at the same POI with different objective lists are distinct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeKey {
    /// The node's POI.
    pub poi: PoiId,
    /// Challenge ids of the node's objectives, in order.
    pub challenges: Vec<ChallengeId>,
}

impl NodeKey {
    /// Compute the key for a node.
    pub fn of(node: &QuestNode) -> Self {
        Self {
            poi: node.point_of_interest.id,
            challenges: node.objectives.iter().map(|o| o.challenge.id).collect(),
        }
    }
}

/// Per-call visited set.
#[derive(Debug, Default)]
struct Visited {
    seen: BTreeSet<NodeKey>,
}

impl Visited {
    /// Record `node`; returns `false` if it was already visited in this walk.
    fn enter(&mut self, node: &QuestNode, walk: &'static str) -> bool {
        let key = NodeKey::of(node);
        if self.seen.contains(&key) {
            tracing::debug!(
                walk,
                poi = %key.poi,
                objectives = key.challenges.len(),
                "quest node already visited, not descending"
            );
            return false;
        }
        self.seen.insert(key);
        true
    }
}

// ---------------------------------------------------------------------------
// Next-task lookup
// ---------------------------------------------------------------------------

/// Result of [`find_node_for_challenge`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeMatch<'a> {
    /// Node whose objective list contains the challenge.
    pub current_node: &'a QuestNode,
    /// The matching objective.
    pub objective: &'a Objective,
    /// Node unlocked by the objective, or `None` when the branch ends.
    pub next_node: Option<&'a QuestNode>,
}

/// Find the node holding `challenge_id` and the node it unlocks.
///
/// Depth-first: objectives in node order, each objective's subtree fully
/// explored before its next sibling. The first match wins. `None` means the
/// challenge is not part of this quest.
pub fn find_node_for_challenge(
    root: &QuestNode,
    challenge_id: ChallengeId,
) -> Option<NodeMatch<'_>> {
    let mut visited = Visited::default();
    find_in(root, challenge_id, &mut visited)
}

fn find_in<'a>(
    node: &'a QuestNode,
    challenge_id: ChallengeId,
    visited: &mut Visited,
) -> Option<NodeMatch<'a>> {
    if !visited.enter(node, "find_node_for_challenge") {
        return None;
    }
    for objective in &node.objectives {
        if objective.challenge.id == challenge_id {
            return Some(NodeMatch {
                current_node: node,
                objective,
                next_node: objective.next_node.as_deref(),
            });
        }
        if let Some(found) = objective
            .next_node
            .as_deref()
            .and_then(|child| find_in(child, challenge_id, visited))
        {
            return Some(found);
        }
    }
    None
}

/// Search several quests for `challenge_id`, returning the owning quest id
/// with the match.
pub fn find_in_quests(
    quests: &[Quest],
    challenge_id: ChallengeId,
) -> Option<(QuestId, NodeMatch<'_>)> {
    quests.iter().find_map(|quest| {
        find_node_for_challenge(&quest.root_node, challenge_id).map(|m| (quest.id, m))
    })
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Completed and total node counts over the unlocked part of a quest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Visited nodes whose objectives are all complete.
    pub completed: u32,
    /// Visited nodes.
    pub total: u32,
}

impl Progress {
    /// Whether every unlocked node is complete.
    pub const fn is_complete(self) -> bool {
        self.completed == self.total
    }
}

/// Count unlocked and completed nodes beneath `root`.
///
/// Every visited node adds one to `total`; a node whose objectives are all
/// complete also adds one to `completed` (a node with no objectives counts as
/// complete). Children are only visited through completed objectives.
pub fn count_progress(
    root: &QuestNode,
    is_objective_complete: impl Fn(ChallengeId) -> bool,
) -> Progress {
    let mut progress = Progress::default();
    let mut visited = Visited::default();
    count_in(root, &is_objective_complete, &mut visited, &mut progress);
    progress
}

fn count_in(
    node: &QuestNode,
    is_objective_complete: &impl Fn(ChallengeId) -> bool,
    visited: &mut Visited,
    progress: &mut Progress,
) {
    if !visited.enter(node, "count_progress") {
        return;
    }
    progress.total = progress.total.saturating_add(1);
    if node.objectives.iter().all(|o| is_objective_complete(o.challenge.id)) {
        progress.completed = progress.completed.saturating_add(1);
    }
    for objective in &node.objectives {
        if !is_objective_complete(objective.challenge.id) {
            continue;
        }
        if let Some(child) = objective.next_node.as_deref() {
            count_in(child, is_objective_complete, visited, progress);
        }
    }
}

/// Whether every unlocked node of `quest` is complete.
pub fn is_quest_complete(
    quest: &Quest,
    is_objective_complete: impl Fn(ChallengeId) -> bool,
) -> bool {
    count_progress(&quest.root_node, is_objective_complete).is_complete()
}

// ---------------------------------------------------------------------------
// Reachable POIs
// ---------------------------------------------------------------------------

/// POIs an entity has unlocked across `quests`, using the API-reported
/// objective completion.
///
/// Roots are always included. A child node's POI is included only when its
/// parent objective is complete, so locked branches never leak POIs.
/// Duplicates are dropped, keeping the first occurrence.
pub fn collect_reachable_points_of_interest(quests: &[Quest]) -> Vec<&PointOfInterest> {
    collect_reachable_points_of_interest_by(quests, |objective| objective.is_completed)
}

/// [`collect_reachable_points_of_interest`] with a caller-supplied
/// completion predicate.
pub fn collect_reachable_points_of_interest_by(
    quests: &[Quest],
    is_complete: impl Fn(&Objective) -> bool,
) -> Vec<&PointOfInterest> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    for quest in quests {
        let mut visited = Visited::default();
        walk(
            &quest.root_node,
            &mut visited,
            "collect_reachable",
            &|o: &Objective| is_complete(o),
            &mut |node| {
                let poi = &node.point_of_interest;
                if seen.insert(poi.id) {
                    out.push(poi);
                }
            },
        );
    }
    out
}

/// Every POI id in `quest`, ignoring completion. Used for tracked quests,
/// whose whole route is highlighted.
pub fn all_point_of_interest_ids(quest: &Quest) -> Vec<PoiId> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    let mut visited = Visited::default();
    walk(
        &quest.root_node,
        &mut visited,
        "all_point_of_interest_ids",
        &|_: &Objective| true,
        &mut |node| {
            let id = node.point_of_interest.id;
            if seen.insert(id) {
                out.push(id);
            }
        },
    );
    out
}

/// Every distinct node in `quest`, ignoring completion, in pre-order.
///
/// Unlike the POI collectors this keeps nodes that reuse a POI, so each
/// node's own challenge list is seen.
pub fn all_nodes(quest: &Quest) -> Vec<&QuestNode> {
    let mut out = Vec::new();
    let mut visited = Visited::default();
    walk(
        &quest.root_node,
        &mut visited,
        "all_nodes",
        &|_: &Objective| true,
        &mut |node| out.push(node),
    );
    out
}

/// Union of [`all_point_of_interest_ids`] over the quests listed in `tracked`.
pub fn tracked_point_of_interest_ids(quests: &[Quest], tracked: &[QuestId]) -> BTreeSet<PoiId> {
    quests
        .iter()
        .filter(|q| tracked.contains(&q.id))
        .flat_map(all_point_of_interest_ids)
        .collect()
}

/// Whether `poi` is the root POI of any quest.
pub fn is_root_point_of_interest(quests: &[Quest], poi: PoiId) -> bool {
    quests.iter().any(|q| q.root_node.point_of_interest.id == poi)
}

/// Tag names across every POI in the quest, deduplicated in first-seen order.
pub fn quest_tags(quest: &Quest) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut visited = Visited::default();
    walk(
        &quest.root_node,
        &mut visited,
        "quest_tags",
        &|_: &Objective| true,
        &mut |node| {
            for tag in &node.point_of_interest.tags {
                if !out.contains(&tag.name) {
                    out.push(tag.name.clone());
                }
            }
        },
    );
    out
}

/// Unlocked objectives the quest log still lists as open, in tree order.
pub fn pending_challenges(quest: &Quest) -> Vec<&Challenge> {
    pending_challenges_by(quest, |objective| objective.is_completed)
}

/// [`pending_challenges`] with a caller-supplied completion predicate.
pub fn pending_challenges_by(
    quest: &Quest,
    is_complete: impl Fn(&Objective) -> bool,
) -> Vec<&Challenge> {
    let mut out = Vec::new();
    let mut visited = Visited::default();
    walk(
        &quest.root_node,
        &mut visited,
        "pending_challenges",
        &|o: &Objective| is_complete(o),
        &mut |node| {
            out.extend(
                node.objectives
                    .iter()
                    .filter(|o| !is_complete(o))
                    .map(|o| &o.challenge),
            );
        },
    );
    out
}

/// Challenges the quest log reports complete anywhere in the tree.
pub fn reported_completions(quest: &Quest) -> BTreeSet<ChallengeId> {
    let mut out = BTreeSet::new();
    let mut visited = Visited::default();
    walk(
        &quest.root_node,
        &mut visited,
        "reported_completions",
        &|_: &Objective| true,
        &mut |node| {
            out.extend(
                node.objectives
                    .iter()
                    .filter(|o| o.is_completed)
                    .map(|o| o.challenge.id),
            );
        },
    );
    out
}

/// Pre-order walk, descending only through objectives accepted by `descend`.
fn walk<'a>(
    node: &'a QuestNode,
    visited: &mut Visited,
    name: &'static str,
    descend: &dyn Fn(&Objective) -> bool,
    visit: &mut dyn FnMut(&'a QuestNode),
) {
    if !visited.enter(node, name) {
        return;
    }
    visit(node);
    for objective in &node.objectives {
        if !descend(objective) {
            continue;
        }
        if let Some(child) = objective.next_node.as_deref() {
            walk(child, visited, name, descend, visit);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use waypoint_types::{Coordinate, Tag, TagId};

    use super::*;

    fn poi(name: &str) -> PointOfInterest {
        PointOfInterest {
            id: PoiId::new(),
            coordinate: Coordinate::new(44.97, -93.26),
            clue: format!("clue for {name}"),
            name: name.to_owned(),
            description: String::new(),
            image_url: String::new(),
            tags: Vec::new(),
            challenges: Vec::new(),
        }
    }

    fn objective(poi: &PointOfInterest, completed: bool, next: Option<QuestNode>) -> Objective {
        Objective {
            challenge: Challenge {
                id: ChallengeId::new(),
                poi_id: poi.id,
                tier: 1,
                question: String::from("what?"),
                reward_item_id: None,
            },
            next_node: next.map(Box::new),
            is_completed: completed,
        }
    }

    fn node(poi: PointOfInterest, objectives: Vec<Objective>) -> QuestNode {
        QuestNode {
            point_of_interest: poi,
            objectives,
        }
    }

    fn quest(root: QuestNode) -> Quest {
        Quest {
            id: QuestId::new(),
            name: String::from("Stone Arch"),
            description: String::new(),
            image_url: String::new(),
            root_node: root,
            is_completed: false,
        }
    }

    /// root (done) -> child (open) -> grandchild (open)
    fn three_node_chain() -> Quest {
        let (a, b, c) = (poi("a"), poi("b"), poi("c"));
        let grand_objective = objective(&c, false, None);
        let grandchild = node(c, vec![grand_objective]);
        let child_objective = objective(&b, false, Some(grandchild));
        let child = node(b, vec![child_objective]);
        let root_objective = objective(&a, true, Some(child));
        quest(node(a, vec![root_objective]))
    }

    fn reported(quest: &Quest) -> impl Fn(ChallengeId) -> bool {
        let done = reported_completions(quest);
        move |id| done.contains(&id)
    }

    #[test]
    fn progress_counts_only_unlocked_nodes() {
        let quest = three_node_chain();
        let progress = count_progress(&quest.root_node, reported(&quest));
        assert_eq!(progress, Progress { completed: 1, total: 2 });
        assert!(!progress.is_complete());
    }

    #[test]
    fn progress_node_needs_every_objective() {
        let a = poi("a");
        let done = objective(&a, true, None);
        let open = objective(&a, false, None);
        let quest = quest(node(a, vec![done, open]));
        let progress = count_progress(&quest.root_node, reported(&quest));
        assert_eq!(progress, Progress { completed: 0, total: 1 });
    }

    #[test]
    fn quest_complete_when_every_reached_node_is() {
        let quest = three_node_chain();
        assert!(!is_quest_complete(&quest, |_| false));
        assert!(is_quest_complete(&quest, |_| true));
    }

    #[test]
    fn find_returns_current_and_next() {
        let quest = three_node_chain();
        let root_challenge = quest.root_node.objectives.first().unwrap().challenge.id;
        let found = find_node_for_challenge(&quest.root_node, root_challenge).unwrap();
        assert_eq!(found.current_node.point_of_interest.name, "a");
        assert_eq!(found.next_node.unwrap().point_of_interest.name, "b");
    }

    #[test]
    fn find_reports_branch_end() {
        let quest = three_node_chain();
        let leaf = pending_challenges(&quest);
        // Only the child's objective is unlocked and open.
        assert_eq!(leaf.len(), 1);
        let child_challenge = leaf.first().unwrap().id;
        let found = find_node_for_challenge(&quest.root_node, child_challenge).unwrap();
        assert_eq!(found.current_node.point_of_interest.name, "b");
        assert_eq!(found.next_node.unwrap().point_of_interest.name, "c");

        let c_node = found.next_node.unwrap();
        let c_challenge = c_node.objectives.first().unwrap().challenge.id;
        let last = find_node_for_challenge(&quest.root_node, c_challenge).unwrap();
        assert!(last.next_node.is_none());
    }

    #[test]
    fn find_missing_challenge_is_none() {
        let quest = three_node_chain();
        assert!(find_node_for_challenge(&quest.root_node, ChallengeId::new()).is_none());
        assert!(find_in_quests(&[quest], ChallengeId::new()).is_none());
    }

    #[test]
    fn find_explores_first_subtree_before_sibling() {
        let (a, b, c) = (poi("a"), poi("b"), poi("c"));
        let deep = objective(&b, false, None);
        let shared = deep.challenge.clone();
        let first_branch = node(b, vec![deep]);
        // Second sibling's node reuses the same challenge id at a different POI.
        let mut sibling_objective = objective(&c, false, None);
        sibling_objective.challenge = shared.clone();
        let second_branch = node(c, vec![sibling_objective]);
        let root = node(
            a.clone(),
            vec![
                objective(&a, true, Some(first_branch)),
                objective(&a, true, Some(second_branch)),
            ],
        );
        let found = find_node_for_challenge(&root, shared.id).unwrap();
        assert_eq!(found.current_node.point_of_interest.name, "b");
    }

    #[test]
    fn reachable_pois_respect_gating() {
        let quest = three_node_chain();
        let names: Vec<_> = collect_reachable_points_of_interest(std::slice::from_ref(&quest))
            .into_iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, ["a", "b"]);

        let all = all_point_of_interest_ids(&quest);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn reachable_pois_with_custom_predicate() {
        let quest = three_node_chain();
        let all = collect_reachable_points_of_interest_by(std::slice::from_ref(&quest), |_| true);
        assert_eq!(all.len(), 3);
        let roots =
            collect_reachable_points_of_interest_by(std::slice::from_ref(&quest), |_| false);
        assert_eq!(roots.len(), 1);
    }

    #[test]
    fn shared_node_is_visited_once() {
        let (a, b) = (poi("a"), poi("b"));
        let shared_objective = objective(&b, false, None);
        let shared = node(b, vec![shared_objective]);
        let root = node(
            a.clone(),
            vec![
                objective(&a, true, Some(shared.clone())),
                objective(&a, true, Some(shared)),
            ],
        );
        let quest = quest(root);
        let progress = count_progress(&quest.root_node, reported(&quest));
        assert_eq!(progress.total, 2);
        assert_eq!(pending_challenges(&quest).len(), 1);
        assert_eq!(collect_reachable_points_of_interest(std::slice::from_ref(&quest)).len(), 2);
        assert_eq!(all_nodes(&quest).len(), 2);
        assert_eq!(all_nodes(&three_node_chain()).len(), 3);
    }

    #[test]
    fn tracked_ids_and_roots() {
        let first = three_node_chain();
        let second = three_node_chain();
        let root_poi = first.root_node.point_of_interest.id;
        let tracked = tracked_point_of_interest_ids(&[first.clone(), second.clone()], &[first.id]);
        assert_eq!(tracked.len(), 3);
        assert!(tracked.contains(&root_poi));
        assert!(is_root_point_of_interest(&[first, second.clone()], root_poi));
        let child_poi = second
            .root_node
            .objectives
            .first()
            .and_then(|o| o.next_node.as_deref())
            .unwrap()
            .point_of_interest
            .id;
        assert!(!is_root_point_of_interest(&[second], child_poi));
    }

    #[test]
    fn tags_are_deduplicated_in_order() {
        let mut quest = three_node_chain();
        let history = Tag { id: TagId::new(), name: String::from("history") };
        let art = Tag { id: TagId::new(), name: String::from("art") };
        quest.root_node.point_of_interest.tags = vec![history.clone(), art];
        if let Some(child) = quest
            .root_node
            .objectives
            .first_mut()
            .and_then(|o| o.next_node.as_deref_mut())
        {
            child.point_of_interest.tags = vec![history];
        }
        assert_eq!(quest_tags(&quest), ["history", "art"]);
    }

    #[test]
    fn pending_with_external_completion() {
        let quest = three_node_chain();
        let done = reported_completions(&quest);
        assert_eq!(done.len(), 1);

        let everything_done = pending_challenges_by(&quest, |_| true);
        assert!(everything_done.is_empty());
        let nothing_done = pending_challenges_by(&quest, |_| false);
        assert_eq!(nothing_done.len(), 1);
    }
}
