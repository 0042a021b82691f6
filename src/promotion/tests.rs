//! Promotion controller tests

use super::*;
use crate::registry::{
    EvaluationRun, InMemoryRegistry, MetricKey, RegistryClient, RegistryError, RunStatus, TagKey,
};

/// Registry with one model and `count` versions, each correlated to
/// training run `train-{n}`.
fn registry_with_versions(model: &str, count: u32) -> InMemoryRegistry {
    let mut registry = InMemoryRegistry::new();
    registry.create_registered_model(model, None).expect("operation should succeed");
    for n in 1..=count {
        let run_id = format!("train-{n}");
        registry
            .create_model_version(model, &format!("runs:/{run_id}/model"), Some(run_id.as_str()), None)
            .expect("operation should succeed");
    }
    registry
}

/// Record a finished evaluation of `train-{version}` with the given F1.
fn record_f1(registry: &mut InMemoryRegistry, version: u32, f1: f64, end_time_ms: i64) {
    registry.insert_run(
        EvaluationRun::new(&format!("eval-{version}"), RunStatus::Finished)
            .evaluating(&format!("train-{version}"))
            .ended_at(end_time_ms)
            .with_metric("f1_score", f1),
    );
}

// ---------------------------------------------------------------------
// Guarded promotion scenarios
// ---------------------------------------------------------------------

#[test]
fn test_improving_candidate_is_promoted() {
    let mut registry = registry_with_versions("churn", 5);
    record_f1(&mut registry, 3, 0.80, 100);
    record_f1(&mut registry, 5, 0.83, 200);
    registry.set_alias("churn", "champion", 3).expect("operation should succeed");
    registry.set_alias("churn", "staging", 5).expect("operation should succeed");

    let mut controller = PromotionController::new(registry);
    let outcome = controller
        .promote(&PromotionRequest::new("churn"))
        .expect("promotion should not error");

    match outcome {
        PromotionOutcome::Promoted {
            version,
            improvement: Some(improvement),
        } => {
            assert_eq!(version, 5);
            assert!((improvement.absolute - 0.03).abs() < 1e-9);
            assert!((improvement.relative_pct - 3.75).abs() < 1e-9);
        }
        other => panic!("expected Promoted with improvement, got {other:?}"),
    }

    let client = controller.client();
    let champion = client
        .get_version_by_alias("churn", "champion")
        .expect("operation should succeed")
        .expect("alias should resolve");
    assert_eq!(champion.version, 5);
    // The staging marker is cleared by the swap
    assert!(client
        .get_version_by_alias("churn", "staging")
        .expect("operation should succeed")
        .is_none());
}

#[test]
fn test_regressing_candidate_is_blocked() {
    let mut registry = registry_with_versions("churn", 6);
    record_f1(&mut registry, 5, 0.83, 100);
    record_f1(&mut registry, 6, 0.78, 200);
    registry.set_alias("churn", "champion", 5).expect("operation should succeed");

    let before = registry.snapshot();
    let mut controller = PromotionController::new(registry);
    let outcome = controller
        .promote(&PromotionRequest::new("churn"))
        .expect("promotion should not error");

    match &outcome {
        PromotionOutcome::Blocked(BlockReason::Regression {
            metric,
            candidate_version,
            candidate_value,
            baseline_version,
            baseline_value,
        }) => {
            assert_eq!(*metric, MetricKey::F1Score);
            assert_eq!(*candidate_version, 6);
            assert_eq!(*baseline_version, 5);
            assert!((*candidate_value - 0.78).abs() < 1e-9);
            assert!((*baseline_value - 0.83).abs() < 1e-9);
        }
        other => panic!("expected Blocked(Regression), got {other:?}"),
    }

    // A blocked promotion leaves the registry exactly as it found it
    assert_eq!(controller.client().snapshot(), before);
}

#[test]
fn test_equal_metric_is_blocked() {
    let mut registry = registry_with_versions("churn", 2);
    record_f1(&mut registry, 1, 0.80, 100);
    record_f1(&mut registry, 2, 0.80, 200);
    registry.set_alias("churn", "champion", 1).expect("operation should succeed");

    let mut controller = PromotionController::new(registry);
    let outcome = controller
        .promote(&PromotionRequest::new("churn"))
        .expect("promotion should not error");
    assert!(matches!(outcome, PromotionOutcome::Blocked(_)));
}

#[test]
fn test_candidate_without_metric_is_aborted() {
    let mut registry = registry_with_versions("churn", 5);
    record_f1(&mut registry, 3, 0.80, 100);
    // No evaluation ever recorded f1_score for train-5
    registry.insert_run(
        EvaluationRun::new("eval-5", RunStatus::Finished)
            .evaluating("train-5")
            .ended_at(200)
            .with_metric("accuracy", 0.91),
    );
    registry.set_alias("churn", "champion", 3).expect("operation should succeed");

    let before = registry.snapshot();
    let mut controller = PromotionController::new(registry);
    let outcome = controller
        .promote(&PromotionRequest::new("churn"))
        .expect("promotion should not error");

    assert_eq!(
        outcome,
        PromotionOutcome::Aborted(AbortReason::CandidateMetricMissing {
            version: 5,
            metric: MetricKey::F1Score,
        })
    );
    assert_eq!(controller.client().snapshot(), before);
}

#[test]
fn test_unmeasurable_baseline_does_not_block() {
    let mut registry = registry_with_versions("churn", 4);
    // Candidate proves itself; the incumbent was never evaluated
    record_f1(&mut registry, 4, 0.83, 100);
    registry.set_alias("churn", "champion", 2).expect("operation should succeed");

    let mut controller = PromotionController::new(registry);
    let outcome = controller
        .promote(&PromotionRequest::new("churn"))
        .expect("promotion should not error");

    assert_eq!(
        outcome,
        PromotionOutcome::Promoted {
            version: 4,
            improvement: None,
        }
    );
}

// ---------------------------------------------------------------------
// Unguarded and unheld-alias promotion
// ---------------------------------------------------------------------

#[test]
fn test_unheld_alias_promotes_without_metrics() {
    // No champion, no evaluation runs at all, guard on: still promotes
    let registry = registry_with_versions("churn", 2);

    let mut controller = PromotionController::new(registry);
    let outcome = controller
        .promote(&PromotionRequest::new("churn"))
        .expect("promotion should not error");

    assert_eq!(
        outcome,
        PromotionOutcome::Promoted {
            version: 2,
            improvement: None,
        }
    );
}

#[test]
fn test_unguarded_promotion_skips_comparison() {
    let mut registry = registry_with_versions("churn", 2);
    record_f1(&mut registry, 1, 0.90, 100);
    record_f1(&mut registry, 2, 0.10, 200);
    registry.set_alias("churn", "champion", 1).expect("operation should succeed");

    let mut controller = PromotionController::new(registry);
    let outcome = controller
        .promote(&PromotionRequest::new("churn").unguarded())
        .expect("promotion should not error");

    assert_eq!(
        outcome,
        PromotionOutcome::Promoted {
            version: 2,
            improvement: None,
        }
    );
}

#[test]
fn test_repeated_promotion_converges() {
    let registry = registry_with_versions("churn", 3);
    let mut controller = PromotionController::new(registry);
    let request = PromotionRequest::new("churn").unguarded();

    controller.promote(&request).expect("promotion should not error");
    let after_first = controller.client().snapshot();

    controller.promote(&request).expect("promotion should not error");
    let after_second = controller.client().snapshot();

    // Same alias state, and promotion never creates versions
    assert_eq!(after_first, after_second);
    assert_eq!(after_second.versions.len(), 3);
}

// ---------------------------------------------------------------------
// Candidate resolution
// ---------------------------------------------------------------------

#[test]
fn test_candidate_resolution_is_numeric() {
    let mut registry = registry_with_versions("churn", 10);
    // Leave versions 2, 9 and 10; a lexical sort would pick 9
    for gone in [1, 3, 4, 5, 6, 7, 8] {
        registry.delete_model_version("churn", gone).expect("operation should succeed");
    }

    let mut controller = PromotionController::new(registry);
    let outcome = controller
        .promote(&PromotionRequest::new("churn"))
        .expect("promotion should not error");

    assert_eq!(
        outcome,
        PromotionOutcome::Promoted {
            version: 10,
            improvement: None,
        }
    );
}

#[test]
fn test_explicit_candidate_version() {
    let registry = registry_with_versions("churn", 5);
    let mut controller = PromotionController::new(registry);

    let outcome = controller
        .promote(&PromotionRequest::new("churn").with_version(3).unguarded())
        .expect("promotion should not error");
    assert_eq!(
        outcome,
        PromotionOutcome::Promoted {
            version: 3,
            improvement: None,
        }
    );
}

#[test]
fn test_explicit_missing_version_is_an_error() {
    let registry = registry_with_versions("churn", 2);
    let mut controller = PromotionController::new(registry);

    let err = controller
        .promote(&PromotionRequest::new("churn").with_version(9))
        .unwrap_err();
    assert!(matches!(
        err,
        PromotionError::Registry(RegistryError::VersionNotFound(_, 9))
    ));
}

#[test]
fn test_no_versions_aborts() {
    let mut registry = InMemoryRegistry::new();
    registry.create_registered_model("churn", None).expect("operation should succeed");

    let mut controller = PromotionController::new(registry);
    let outcome = controller
        .promote(&PromotionRequest::new("churn"))
        .expect("promotion should not error");
    assert_eq!(
        outcome,
        PromotionOutcome::Aborted(AbortReason::NoVersions {
            model: "churn".to_string(),
        })
    );
}

#[test]
fn test_unknown_model_is_an_error() {
    let mut controller = PromotionController::new(InMemoryRegistry::new());
    let err = controller.promote(&PromotionRequest::new("ghost")).unwrap_err();
    assert!(matches!(
        err,
        PromotionError::Registry(RegistryError::ModelNotFound(_))
    ));
}

#[test]
fn test_invalid_request_is_rejected_before_any_call() {
    let mut controller = PromotionController::new(InMemoryRegistry::new());
    let err = controller
        .promote(&PromotionRequest::new("churn").with_aliases("champion", "champion"))
        .unwrap_err();
    assert!(matches!(err, PromotionError::InvalidRequest(_)));
}

// ---------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------

#[test]
fn test_register_creates_model_lazily() {
    let mut controller = PromotionController::new(InMemoryRegistry::new());

    let registration = controller
        .register("runs:/abc123/model", "churn", &[], Some("churn classifier"))
        .expect("registration should succeed");
    assert_eq!(registration.version.version, 1);
    assert_eq!(registration.version.run_id.as_deref(), Some("abc123"));
    assert!(registration.failed_tags.is_empty());

    let model = controller
        .client()
        .get_registered_model("churn")
        .expect("operation should succeed")
        .expect("model should exist");
    assert_eq!(model.description.as_deref(), Some("churn classifier"));
}

#[test]
fn test_register_is_idempotent_at_model_level() {
    let mut controller = PromotionController::new(InMemoryRegistry::new());
    controller
        .register("runs:/a/model", "churn", &[], None)
        .expect("registration should succeed");
    let second = controller
        .register("runs:/b/model", "churn", &[], None)
        .expect("registration should succeed");

    // Same model, fresh version
    assert_eq!(second.version.version, 2);
    let models = controller
        .client()
        .list_registered_models(10)
        .expect("operation should succeed");
    assert_eq!(models.len(), 1);
}

#[test]
fn test_register_attaches_tags() {
    let mut controller = PromotionController::new(InMemoryRegistry::new());
    let registration = controller
        .register(
            "runs:/abc/model",
            "churn",
            &[(TagKey::Framework, "xgboost"), (TagKey::TrainedBy, "nightly")],
            None,
        )
        .expect("registration should succeed");
    assert!(registration.failed_tags.is_empty());

    let version = controller
        .client()
        .get_model_version("churn", registration.version.version)
        .expect("operation should succeed");
    assert_eq!(version.tags.get("framework").map(String::as_str), Some("xgboost"));
    assert_eq!(version.tags.get("trained_by").map(String::as_str), Some("nightly"));
}

#[test]
fn test_register_without_runs_uri_has_no_run_id() {
    let mut controller = PromotionController::new(InMemoryRegistry::new());
    let registration = controller
        .register("s3://models/churn/v1", "churn", &[], None)
        .expect("registration should succeed");
    assert!(registration.version.run_id.is_none());
}

// ---------------------------------------------------------------------
// Model info
// ---------------------------------------------------------------------

#[test]
fn test_model_info_aggregates_versions() {
    let mut registry = registry_with_versions("churn", 3);
    registry
        .transition_stage("churn", 3, crate::registry::ModelStage::Production, false)
        .expect("operation should succeed");

    let controller = PromotionController::new(registry);
    let info = controller.model_info("churn").expect("operation should succeed");
    assert_eq!(info.name, "churn");
    assert_eq!(info.versions.len(), 3);
    assert_eq!(info.versions[2].version, 3);
    assert_eq!(info.versions[2].stage, crate::registry::ModelStage::Production);
}

#[test]
fn test_model_info_unknown_model_fails() {
    let controller = PromotionController::new(InMemoryRegistry::new());
    let err = controller.model_info("ghost").unwrap_err();
    assert!(matches!(
        err,
        PromotionError::Registry(RegistryError::ModelNotFound(_))
    ));
}
