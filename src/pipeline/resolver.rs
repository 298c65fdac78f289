use hashbrown::HashSet;
use tracing::debug;

use crate::error::{EnrichError, Result};
use crate::models::{Plan, SamplePoint};
use crate::registry::PlanRegistry;

/// Drop umbrella plans and exact duplicates, keeping first-seen order.
pub fn filter_unique_plans<I>(candidates: I) -> Vec<Plan>
where
    I: IntoIterator<Item = Plan>,
{
    let mut seen: HashSet<Plan> = HashSet::new();
    let mut unique = Vec::new();

    for plan in candidates {
        if plan.is_parapluplan {
            continue;
        }
        if seen.insert(plan.clone()) {
            unique.push(plan);
        }
    }
    unique
}

/// Search the registry once per sample point and merge the results.
///
/// The first failing search aborts resolution for the whole station.
pub async fn resolve_plans<R: PlanRegistry>(
    registry: &R,
    points: &[SamplePoint],
) -> Result<Vec<Plan>> {
    let mut candidates = Vec::new();

    for sample in points {
        let point = sample.point;
        let found = registry
            .search_plans(point)
            .await
            .map_err(|source| EnrichError::PlanQueryFailed {
                lon: point.lon,
                lat: point.lat,
                source,
            })?;
        debug!(
            "{} point ({}, {}): {} plans",
            sample.direction,
            point.lon,
            point.lat,
            found.len()
        );
        candidates.extend(found);
    }

    Ok(filter_unique_plans(candidates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use crate::geometry::ring_around;
    use crate::models::{DestinationArea, GeoPoint};
    use std::cell::{Cell, RefCell};

    fn plan(id: &str, naam: &str, umbrella: bool) -> Plan {
        Plan {
            id: id.into(),
            naam: naam.into(),
            is_parapluplan: umbrella,
        }
    }

    /// Answers each search from a queue, recording the queried points.
    struct ScriptedRegistry {
        answers: RefCell<Vec<Result<Vec<Plan>, RegistryError>>>,
        queried: RefCell<Vec<GeoPoint>>,
        calls: Cell<usize>,
    }

    impl ScriptedRegistry {
        fn new(mut answers: Vec<Result<Vec<Plan>, RegistryError>>) -> Self {
            answers.reverse();
            Self {
                answers: RefCell::new(answers),
                queried: RefCell::new(Vec::new()),
                calls: Cell::new(0),
            }
        }
    }

    impl PlanRegistry for ScriptedRegistry {
        async fn search_plans(&self, point: GeoPoint) -> Result<Vec<Plan>, RegistryError> {
            self.calls.set(self.calls.get() + 1);
            self.queried.borrow_mut().push(point);
            self.answers
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn fetch_areas(&self, _plan_id: &str) -> Result<Vec<DestinationArea>, RegistryError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_filter_drops_umbrella_and_duplicates() {
        let plans = filter_unique_plans(vec![
            plan("P1", "Centrum", false),
            plan("U1", "Paraplu parkeren", true),
            plan("P2", "Haven", false),
            plan("P1", "Centrum", false),
            plan("U1", "Paraplu parkeren", true),
        ]);
        assert_eq!(plans, vec![plan("P1", "Centrum", false), plan("P2", "Haven", false)]);
    }

    #[test]
    fn test_same_id_different_name_is_kept() {
        let plans = filter_unique_plans(vec![
            plan("P1", "Centrum", false),
            plan("P1", "Centrum (herzien)", false),
        ]);
        assert_eq!(plans.len(), 2);
    }

    #[tokio::test]
    async fn test_one_search_per_sample_point() {
        let registry =
            ScriptedRegistry::new((0..5).map(|_| Ok(vec![plan("P1", "Test", false)])).collect());
        let points = ring_around(GeoPoint::new(4.895, 52.370), 1.0);

        let plans = resolve_plans(&registry, &points).await.unwrap();

        assert_eq!(plans, vec![plan("P1", "Test", false)]);
        assert_eq!(registry.calls.get(), 5);
        let queried = registry.queried.borrow();
        let expected: Vec<GeoPoint> = points.iter().map(|p| p.point).collect();
        assert_eq!(*queried, expected);
    }

    #[tokio::test]
    async fn test_merge_preserves_first_seen_order() {
        let registry = ScriptedRegistry::new(vec![
            Ok(vec![plan("B", "Bedrijventerrein", false)]),
            Ok(vec![plan("A", "Agrarisch", false), plan("B", "Bedrijventerrein", false)]),
            Ok(vec![plan("U", "Paraplu", true)]),
            Ok(vec![]),
            Ok(vec![plan("C", "Centrum", false)]),
        ]);
        let points = ring_around(GeoPoint::new(5.0, 52.0), 1.0);

        let plans = resolve_plans(&registry, &points).await.unwrap();
        let ids: Vec<&str> = plans.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
    }

    #[tokio::test]
    async fn test_search_failure_aborts_station() {
        let registry = ScriptedRegistry::new(vec![
            Ok(vec![plan("P1", "Test", false)]),
            Err(RegistryError::Status {
                status: 500,
                body: "boom".into(),
            }),
        ]);
        let points = ring_around(GeoPoint::new(5.0, 52.0), 1.0);

        let err = resolve_plans(&registry, &points).await.unwrap_err();
        match err {
            EnrichError::PlanQueryFailed { lon, lat, .. } => {
                assert_eq!((lon, lat), (points[1].point.lon, points[1].point.lat));
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(registry.calls.get(), 2);
    }
}
