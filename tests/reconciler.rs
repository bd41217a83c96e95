mod common;

use campus::entity::CommunityDraft;
use campus::store::{
    Collections, FollowOutcome, MembershipRepository, StoreError, UnfollowOutcome,
};
use campus::{MutationState, QueryKey, Reconciler};
use common::TestStore;
use pretty_assertions::assert_eq;
use std::sync::Arc;

struct Fixture {
    store: Arc<TestStore>,
    reconciler: Reconciler<TestStore>,
    memberships: MembershipRepository<TestStore>,
    community_id: String,
}

/// Community "Chess" administered by `a`, with followers `[a]`, cached under
/// both query keys.
async fn fixture() -> Fixture {
    let store = Arc::new(TestStore::new());
    let collections = Arc::new(Collections::default());
    let reconciler = Reconciler::new(Arc::clone(&store), Arc::clone(&collections));
    let memberships = MembershipRepository::new(Arc::clone(&store), collections);

    let draft = CommunityDraft::new("Chess").validate().expect("valid draft");
    let community_id = reconciler.create_community(draft, "a").await.expect("create").outcome.id;

    reconciler.refresh(QueryKey::AllCommunities).await.expect("refresh all");
    reconciler.refresh(QueryKey::Community(community_id.clone())).await.expect("refresh one");

    Fixture { store, reconciler, memberships, community_id }
}

fn members(list: &campus::CachedCommunityList, community_id: &str) -> Vec<String> {
    list.find(community_id).expect("community cached").members.clone()
}

#[tokio::test]
async fn test_failed_follow_restores_snapshot_exactly() {
    let f = fixture().await;
    let all_before = f.reconciler.current_snapshot(&QueryKey::AllCommunities).await;
    let one_key = QueryKey::Community(f.community_id.clone());
    let one_before = f.reconciler.current_snapshot(&one_key).await;
    assert_eq!(members(&all_before, &f.community_id), vec!["a".to_string()]);

    f.store.fail_writes(true);
    let err = f.reconciler.follow("b", &f.community_id).await.unwrap_err();

    assert!(matches!(err, StoreError::Unavailable { .. }));
    assert_eq!(f.reconciler.current_snapshot(&QueryKey::AllCommunities).await, all_before);
    assert_eq!(f.reconciler.current_snapshot(&one_key).await, one_before);
    assert_eq!(f.reconciler.in_flight(), 0);
    assert!(!f.memberships.is_member("b", &f.community_id).await.unwrap());
}

#[tokio::test]
async fn test_successful_follow_is_visible_after_refetch() {
    let f = fixture().await;

    let report = f.reconciler.follow("b", &f.community_id).await.unwrap();
    assert_eq!(report.state, MutationState::Committed);
    assert!(matches!(report.outcome, FollowOutcome::Created(_)));
    assert!(report.refreshed);

    let fetched = f.reconciler.refresh(QueryKey::AllCommunities).await.unwrap();
    assert_eq!(members(&fetched, &f.community_id), vec!["a".to_string(), "b".to_string()]);
}

#[tokio::test]
async fn test_speculative_change_is_visible_while_pending() {
    let f = fixture().await;
    f.store.hold_writes(true);

    let observe = async {
        f.store.entered.notified().await;
        let snapshot = f.reconciler.current_snapshot(&QueryKey::AllCommunities).await;
        let in_flight = f.reconciler.in_flight();
        f.store.release.notify_one();
        (snapshot, in_flight)
    };
    let (result, (pending_snapshot, in_flight)) =
        tokio::join!(f.reconciler.follow("b", &f.community_id), observe);

    result.unwrap();
    assert_eq!(in_flight, 1);
    assert_eq!(members(&pending_snapshot, &f.community_id), vec!["a".to_string(), "b".to_string()]);
    assert_eq!(f.reconciler.in_flight(), 0);
}

#[tokio::test]
async fn test_pending_unfollow_rolls_back_on_failure() {
    let f = fixture().await;
    f.reconciler.follow("b", &f.community_id).await.unwrap();
    let before = f.reconciler.current_snapshot(&QueryKey::AllCommunities).await;

    f.store.hold_writes(true);
    f.store.fail_writes(true);
    let observe = async {
        f.store.entered.notified().await;
        let snapshot = f.reconciler.current_snapshot(&QueryKey::AllCommunities).await;
        f.store.release.notify_one();
        snapshot
    };
    let (result, pending_snapshot) =
        tokio::join!(f.reconciler.unfollow("b", &f.community_id), observe);

    assert!(result.is_err());
    assert_eq!(members(&pending_snapshot, &f.community_id), vec!["a".to_string()]);
    assert_eq!(f.reconciler.current_snapshot(&QueryKey::AllCommunities).await, before);
}

#[tokio::test]
async fn test_follow_twice_is_idempotent() {
    let f = fixture().await;

    f.reconciler.follow("b", &f.community_id).await.unwrap();
    let second = f.reconciler.follow("b", &f.community_id).await.unwrap();

    assert!(matches!(second.outcome, FollowOutcome::AlreadyMember(_)));
    let snapshot = f.reconciler.current_snapshot(&QueryKey::AllCommunities).await;
    assert_eq!(members(&snapshot, &f.community_id), vec!["a".to_string(), "b".to_string()]);
}

#[tokio::test]
async fn test_failed_refetch_keeps_speculative_entry() {
    let f = fixture().await;
    f.store.fail_reads_of(Some("communities"));

    let report = f.reconciler.follow("b", &f.community_id).await.unwrap();

    assert_eq!(report.state, MutationState::Committed);
    assert!(!report.refreshed);
    let snapshot = f.reconciler.current_snapshot(&QueryKey::AllCommunities).await;
    assert_eq!(members(&snapshot, &f.community_id), vec!["a".to_string(), "b".to_string()]);
}

#[tokio::test]
async fn test_failed_promote_restores_snapshot() {
    let f = fixture().await;
    f.reconciler.follow("b", &f.community_id).await.unwrap();
    let before = f.reconciler.current_snapshot(&QueryKey::AllCommunities).await;

    f.store.fail_writes(true);
    let err = f.reconciler.promote_admin(&f.community_id, "b").await.unwrap_err();

    assert!(err.is_unavailable());
    assert_eq!(f.reconciler.current_snapshot(&QueryKey::AllCommunities).await, before);
}

#[tokio::test]
async fn test_create_community_appears_in_directory() {
    let f = fixture().await;

    let draft = CommunityDraft::new("Go Club").validate().unwrap();
    let report = f.reconciler.create_community(draft, "c").await.unwrap();

    let snapshot = f.reconciler.current_snapshot(&QueryKey::AllCommunities).await;
    assert_eq!(snapshot.len(), 2);
    let created = snapshot.find(&report.outcome.id).unwrap();
    assert_eq!(created.admins, vec!["c".to_string()]);
    assert_eq!(created.members, vec!["c".to_string()]);
}

#[tokio::test]
async fn test_overlapping_mutations_last_commit_wins() {
    let f = fixture().await;
    f.store.hold_writes(true);

    // follow(b) is held at its write; unfollow(b) finds nothing remote and settles first
    let overlap = async {
        f.store.entered.notified().await;
        let report = f.reconciler.unfollow("b", &f.community_id).await;
        let settled = f.reconciler.current_snapshot(&QueryKey::AllCommunities).await;
        let in_flight = f.reconciler.in_flight();
        f.store.release.notify_one();
        (report, settled, in_flight)
    };
    let (first, (second, after_second, in_flight)) =
        tokio::join!(f.reconciler.follow("b", &f.community_id), overlap);

    assert_eq!(second.unwrap().outcome, UnfollowOutcome::NotMember);
    assert_eq!(members(&after_second, &f.community_id), vec!["a".to_string()]);
    assert_eq!(in_flight, 1);

    assert_eq!(first.unwrap().state, MutationState::Committed);
    let settled = f.reconciler.current_snapshot(&QueryKey::AllCommunities).await;
    assert_eq!(members(&settled, &f.community_id), vec!["a".to_string(), "b".to_string()]);
    assert_eq!(f.reconciler.in_flight(), 0);
    assert!(f.memberships.is_member("b", &f.community_id).await.unwrap());
}

#[tokio::test]
async fn test_overlapping_mutations_last_rollback_restores_its_snapshot() {
    let f = fixture().await;
    let before_follow = f.reconciler.current_snapshot(&QueryKey::AllCommunities).await;
    f.store.hold_writes(true);

    let overlap = async {
        f.store.entered.notified().await;
        f.reconciler.unfollow("b", &f.community_id).await.unwrap();
        f.store.fail_writes(true);
        f.store.release.notify_one();
    };
    let (first, ()) = tokio::join!(f.reconciler.follow("b", &f.community_id), overlap);

    assert!(first.unwrap_err().is_unavailable());
    assert_eq!(f.reconciler.current_snapshot(&QueryKey::AllCommunities).await, before_follow);
    assert_eq!(f.reconciler.in_flight(), 0);
    assert!(!f.memberships.is_member("b", &f.community_id).await.unwrap());
}
