//! End-to-end lifecycle tests
//!
//! One registry, several experiments with different persistence scopes,
//! resolved and tracked the way an embedding application would: resolve
//! per render, milestones emitted fire-and-forget, durable stickiness
//! across a restart.

use cohort::assign::{AssignmentSource, SequenceSource};
use cohort::experiment::{ExperimentContext, PersistenceScope, Segment};
use cohort::store::AssignmentStore;
use cohort::Experiments;

fn login_experiment() -> ExperimentContext {
    ExperimentContext::builder(5, 1)
        .segment(Segment::builder(9, "A", 0.5).preview_token("oOwLEFn97lM").build())
        .segment(Segment::builder(10, "B", 0.5).preview_token("4QU_6QcF_QY").build())
        .build()
}

fn button_color_experiment() -> ExperimentContext {
    ExperimentContext::builder(8, 7)
        .segment(Segment::new(15, "control", 0.5))
        .segment(Segment::new(16, "variant-blue", 0.5))
        .persistence(PersistenceScope::None)
        .storage_key("btn_color_exp_segment")
        .build()
}

#[tokio::test]
async fn test_full_visitor_lifecycle() {
    let experiments = Experiments::builder()
        .experiment(login_experiment())
        .experiment(button_color_experiment())
        .endpoint("http://127.0.0.1:9/webhook/event")
        .random_source(SequenceSource::new(vec![0.2, 0.9, 0.9]))
        .build()
        .unwrap();

    // 1. First render resolves and persists (session scope).
    let login = experiments.resolve(5, None).await.unwrap();
    assert_eq!(login.segment().id(), 9);
    assert_eq!(login.source(), AssignmentSource::Drawn);
    experiments.track(5, &login, "login_button_view", None);

    // 2. Reload: same visitor, same segment, no re-roll.
    let reload = experiments.resolve(5, None).await.unwrap();
    assert_eq!(reload.segment().id(), 9);
    assert_eq!(reload.source(), AssignmentSource::Sticky);

    // 3. The unpersisted experiment re-rolls per render.
    let button = experiments.resolve(8, None).await.unwrap();
    assert_eq!(button.segment().id(), 16);
    experiments.track(8, &button, "signin_view", None);
    experiments.track(8, &button, "signin_attempt", Some("user-42"));

    // 4. A conversion milestone still attributes to the resolved segment.
    experiments.track(5, &login, "signin_success", Some("user-42"));
}

#[tokio::test]
async fn test_preview_deep_link_for_qa() {
    let experiments = Experiments::builder()
        .experiment(login_experiment())
        .endpoint("http://127.0.0.1:9/webhook/event")
        .random_source(SequenceSource::fixed(0.2))
        .build()
        .unwrap();

    // QA opens the page with ?x=<token>: forced segment, every time.
    for _ in 0..3 {
        let assignment = experiments
            .resolve(5, Some("?utm_source=qa&x=4QU_6QcF_QY"))
            .await
            .unwrap();
        assert_eq!(assignment.segment().name(), "B");
        assert_eq!(assignment.source(), AssignmentSource::Override);
    }

    // Organic visitors are unaffected by QA traffic.
    let organic = experiments.resolve(5, None).await.unwrap();
    assert_eq!(organic.segment().id(), 9);
}

#[tokio::test]
async fn test_durable_assignment_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("assignments.json");

    let durable = ExperimentContext::builder(6, 1)
        .segment(Segment::new(11, "control", 0.5))
        .segment(Segment::new(12, "variant", 0.5))
        .persistence(PersistenceScope::Durable)
        .build();

    let first_run = Experiments::builder()
        .experiment(durable.clone())
        .endpoint("http://127.0.0.1:9/webhook/event")
        .durable_path(&path)
        .random_source(SequenceSource::fixed(0.8))
        .build()
        .unwrap();
    let assigned = first_run.resolve(6, None).await.unwrap();
    assert_eq!(assigned.segment().id(), 12);
    drop(first_run);

    // New process, new roll that would flip the segment: the stored
    // assignment wins.
    let second_run = Experiments::builder()
        .experiment(durable)
        .endpoint("http://127.0.0.1:9/webhook/event")
        .durable_path(&path)
        .random_source(SequenceSource::fixed(0.1))
        .build()
        .unwrap();
    let restored = second_run.resolve(6, None).await.unwrap();
    assert_eq!(restored.segment().id(), 12);
    assert_eq!(restored.source(), AssignmentSource::Sticky);
}

#[tokio::test]
async fn test_scopes_do_not_bleed_into_each_other() {
    let dir = tempfile::tempdir().unwrap();

    let experiments = Experiments::builder()
        .experiment(login_experiment())
        .experiment(
            ExperimentContext::builder(6, 1)
                .segment(Segment::new(11, "control", 0.5))
                .segment(Segment::new(12, "variant", 0.5))
                .persistence(PersistenceScope::Durable)
                .build(),
        )
        .endpoint("http://127.0.0.1:9/webhook/event")
        .durable_path(dir.path().join("assignments.json"))
        .random_source(SequenceSource::fixed(0.2))
        .build()
        .unwrap();

    experiments.resolve(5, None).await.unwrap();
    experiments.resolve(6, None).await.unwrap();

    // Session experiment persisted only in the session store, durable
    // experiment only on disk.
    assert!(experiments
        .session_store()
        .get("exp_5_segment")
        .await
        .unwrap()
        .is_some());
    assert!(experiments
        .session_store()
        .get("exp_6_segment")
        .await
        .unwrap()
        .is_none());
    assert!(experiments
        .durable_store()
        .get("exp_6_segment")
        .await
        .unwrap()
        .is_some());
    assert!(experiments
        .durable_store()
        .get("exp_5_segment")
        .await
        .unwrap()
        .is_none());
}
