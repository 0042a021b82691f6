//! Latest-evaluation metric lookup

use crate::registry::{MetricKey, RegistryClient, Result, RunQuery};

/// Resolve the value of `metric` for the training run `run_id`.
///
/// Considers only `Finished` evaluation runs tagged with
/// `source_run_id == run_id` and reads the metric from the most recent
/// one: latest `end_time_ms`, ties broken by run id so the choice is
/// reproducible. Returns `Ok(None)` when no such run exists or the
/// chosen run never recorded the metric.
///
/// A training run may be evaluated more than once (reruns,
/// reprocessing); only the latest successful evaluation is
/// authoritative.
pub fn resolve_metric<C: RegistryClient + ?Sized>(
    client: &C,
    run_id: &str,
    metric: MetricKey,
) -> Result<Option<f64>> {
    let runs = client.search_runs(&RunQuery::finished_evaluations_of(run_id))?;
    let latest = runs.into_iter().max_by(|a, b| {
        (a.end_time_ms, a.run_id.as_str()).cmp(&(b.end_time_ms, b.run_id.as_str()))
    });
    Ok(latest.and_then(|run| run.metrics.get(metric.as_str()).copied()))
}
