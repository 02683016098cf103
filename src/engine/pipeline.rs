//! End-to-end allocation pipeline.
//!
//! # Algorithm
//!
//! 1. Resolve relationship pairs (request, then injected source, then none).
//! 2. Validate the roster, pairs and room catalog.
//! 3. Build the conflict graph and color it with DSatur.
//! 4. Pack color groups into rooms.
//! 5. Seat each room's examinees.
//!
//! Every stage is deterministic, so identical requests produce identical
//! outcomes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::SeatingSource;
use crate::config::EngineConfig;
use crate::error::AllocationError;
use crate::graph::{color_groups, dsatur, ColorGroup, ColoringStats, ConflictGraphBuilder};
use crate::models::{
    ExamSession, Examinee, RelationshipMap, RelationshipPair, RoomAllocation, RoomConfig,
    SeatingPlan,
};
use crate::rooms::RoomAllocator;
use crate::seating::SeatPlacer;
use crate::validation::validate_input;

/// Inputs of one allocation run.
#[derive(Debug, Clone)]
pub struct AllocationRequest {
    /// Examinees to seat.
    pub examinees: Vec<Examinee>,
    /// Room catalog.
    pub rooms: Vec<RoomConfig>,
    /// Relationship pairs. `None` defers to the engine's source.
    pub relationships: Option<Vec<RelationshipPair>>,
}

impl AllocationRequest {
    /// Creates a request without relationship data.
    pub fn new(examinees: Vec<Examinee>, rooms: Vec<RoomConfig>) -> Self {
        Self {
            examinees,
            rooms,
            relationships: None,
        }
    }

    /// Sets explicit relationship pairs.
    pub fn with_relationships(mut self, pairs: Vec<RelationshipPair>) -> Self {
        self.relationships = Some(pairs);
        self
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    /// Color groups in color order.
    pub groups: Vec<ColorGroup>,
    /// Coloring statistics.
    pub stats: ColoringStats,
    /// Room membership.
    pub allocation: RoomAllocation,
    /// Seats and adjacency violations.
    pub seating: SeatingPlan,
}

/// Outcome of one exam session.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub session: ExamSession,
    pub result: Result<AllocationOutcome, AllocationError>,
}

/// Runs the allocation pipeline.
///
/// # Example
///
/// ```
/// use u_seating::engine::{AllocationRequest, SeatingEngine};
/// use u_seating::models::{Examinee, ExamSlot, RoomConfig};
///
/// let roster = vec![
///     Examinee::new("S1", "Maths", "2024-05-01", ExamSlot::Morning).with_department("CSE"),
///     Examinee::new("S2", "Maths", "2024-05-01", ExamSlot::Afternoon).with_department("CSE"),
/// ];
/// let request = AllocationRequest::new(roster, vec![RoomConfig::new("R1", 30)]);
///
/// let outcome = SeatingEngine::new().allocate(&request).unwrap();
/// assert_eq!(outcome.seating.seated_count(), 2);
/// ```
#[derive(Clone, Default)]
pub struct SeatingEngine {
    config: EngineConfig,
    source: Option<Arc<dyn SeatingSource>>,
}

impl fmt::Debug for SeatingEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeatingEngine")
            .field("config", &self.config)
            .field("has_source", &self.source.is_some())
            .finish()
    }
}

impl SeatingEngine {
    /// Creates an engine with default configuration and no source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Injects a data source.
    pub fn with_source(mut self, source: Arc<dyn SeatingSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs the full pipeline on one request.
    ///
    /// # Errors
    /// - [`AllocationError::InvalidInput`] if validation fails.
    /// - [`AllocationError::CapacityExceeded`] /
    ///   [`AllocationError::InfeasibleAllocation`] from room allocation.
    pub fn allocate(&self, request: &AllocationRequest) -> Result<AllocationOutcome, AllocationError> {
        let pairs = self.resolve_relationships(request.relationships.as_deref());
        validate_input(&request.examinees, &pairs, &request.rooms)
            .map_err(AllocationError::InvalidInput)?;
        self.run(&request.examinees, &pairs, &request.rooms)
    }

    /// Runs the pipeline on the injected source's roster.
    ///
    /// # Errors
    /// [`AllocationError::Source`] if no source is configured or the roster
    /// cannot be read; otherwise as [`allocate`](Self::allocate).
    pub fn allocate_from_source(
        &self,
        rooms: Vec<RoomConfig>,
    ) -> Result<AllocationOutcome, AllocationError> {
        let examinees = self.source_roster()?;
        self.allocate(&AllocationRequest::new(examinees, rooms))
    }

    /// Splits the roster by (date, slot) and runs each session separately,
    /// in chronological order, against the full room catalog.
    ///
    /// Validation covers the whole roster up front; a failure inside one
    /// session does not affect the others.
    pub fn allocate_sessions(
        &self,
        request: &AllocationRequest,
    ) -> Result<Vec<SessionOutcome>, AllocationError> {
        let pairs = self.resolve_relationships(request.relationships.as_deref());
        validate_input(&request.examinees, &pairs, &request.rooms)
            .map_err(AllocationError::InvalidInput)?;

        let mut sessions: BTreeMap<ExamSession, Vec<Examinee>> = BTreeMap::new();
        for e in &request.examinees {
            sessions.entry(e.session()).or_default().push(e.clone());
        }
        info!(event = "sessions_split", sessions = sessions.len());

        Ok(sessions
            .into_iter()
            .map(|(session, examinees)| {
                debug!(event = "session_start", session = %session, examinees = examinees.len());
                let result = self.run(&examinees, &pairs, &request.rooms);
                if let Err(err) = &result {
                    warn!(event = "session_failed", session = %session, error = %err);
                }
                SessionOutcome { session, result }
            })
            .collect())
    }

    fn run(
        &self,
        examinees: &[Examinee],
        pairs: &[RelationshipPair],
        rooms: &[RoomConfig],
    ) -> Result<AllocationOutcome, AllocationError> {
        info!(
            event = "allocate_start",
            examinees = examinees.len(),
            rooms = rooms.len(),
            relationship_pairs = pairs.len()
        );

        let graph = ConflictGraphBuilder::new(examinees)
            .with_relationships(pairs)
            .with_options(self.config.graph)
            .build();
        let coloring = dsatur(&graph);
        let groups = color_groups(&graph, &coloring);
        let stats = ColoringStats::collect(&graph, &coloring);
        debug!(
            event = "coloring_complete",
            nodes = stats.total_examinees,
            edges = stats.graph_edges,
            relationship_edges = stats.relationship_pairs_applied,
            groups = stats.total_groups
        );

        let allocation = RoomAllocator::new()
            .with_budget(self.config.search)
            .allocate(&groups, examinees, rooms)?;

        let relationships = if self.config.graph.relationship_separation {
            RelationshipMap::from_pairs(pairs)
        } else {
            RelationshipMap::new()
        };
        let seating = SeatPlacer::new(examinees)
            .with_relationships(&relationships)
            .with_options(self.config.placement)
            .place(&allocation, rooms)?;

        info!(
            event = "allocate_complete",
            groups = groups.len(),
            rooms_used = allocation.room_count(),
            seated = seating.seated_count(),
            violations = seating.violations.len()
        );

        Ok(AllocationOutcome {
            groups,
            stats,
            allocation,
            seating,
        })
    }

    /// Explicit pairs win; otherwise ask the source. A failing source
    /// degrades to no relationship data.
    fn resolve_relationships(&self, explicit: Option<&[RelationshipPair]>) -> Vec<RelationshipPair> {
        if let Some(pairs) = explicit {
            return pairs.to_vec();
        }
        let Some(source) = &self.source else {
            return Vec::new();
        };
        match source.relationship_pairs() {
            Ok(pairs) => pairs,
            Err(err) => {
                warn!(
                    event = "relationships_unavailable",
                    error = %err,
                    "continuing without relationship data"
                );
                Vec::new()
            }
        }
    }

    fn source_roster(&self) -> Result<Vec<Examinee>, AllocationError> {
        let source = self.source.as_ref().ok_or_else(|| {
            crate::error::SourceError::Unavailable("no data source configured".to_string())
        })?;
        Ok(source.roster()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{InMemorySource, RoomDiversity};
    use crate::error::SourceError;
    use crate::models::ExamSlot;
    use crate::rooms::SearchBudget;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::{HashMap, HashSet};

    fn two_slot_roster() -> Vec<Examinee> {
        let mut roster = Vec::new();
        for i in 0..6 {
            roster.push(
                Examinee::new(format!("M{i}"), "Maths", "2024-05-01", ExamSlot::Morning)
                    .with_department("CSE")
                    .with_batch("A"),
            );
        }
        for i in 0..6 {
            roster.push(
                Examinee::new(format!("A{i}"), "Physics", "2024-05-01", ExamSlot::Afternoon)
                    .with_department("CSE")
                    .with_batch("B"),
            );
        }
        roster
    }

    /// Checks the structural invariants every successful outcome must hold.
    fn assert_outcome_valid(outcome: &AllocationOutcome, examinees: &[Examinee], rooms: &[RoomConfig]) {
        // Same session never shares a color.
        let color_of: HashMap<&str, usize> = outcome
            .groups
            .iter()
            .flat_map(|g| g.members.iter().map(move |m| (m.as_str(), g.color)))
            .collect();
        for (i, a) in examinees.iter().enumerate() {
            for b in &examinees[i + 1..] {
                if a.shares_session(b) {
                    assert_ne!(color_of[a.id.as_str()], color_of[b.id.as_str()]);
                }
            }
        }

        // Every examinee in exactly one room, within capacity and ceilings.
        assert_eq!(outcome.allocation.examinee_count(), examinees.len());
        for e in examinees {
            assert!(outcome.allocation.room_of(&e.id).is_some());
        }
        for d in RoomDiversity::measure(&outcome.allocation, examinees) {
            let room = rooms.iter().find(|r| r.id == d.room_id).unwrap();
            assert!(d.satisfies(room), "room {} violates its ceilings", room.id);
        }
        for a in &outcome.allocation.assignments {
            let room = rooms.iter().find(|r| r.id == a.room_id).unwrap();
            assert!(a.occupancy() <= room.capacity);
        }

        // Unique in-bounds cells per room.
        assert_eq!(outcome.seating.seated_count(), examinees.len());
        for seating in &outcome.seating.rooms {
            let cells: HashSet<(usize, usize)> =
                seating.seats.iter().map(|s| (s.x, s.y)).collect();
            assert_eq!(cells.len(), seating.seats.len());
            assert!(seating
                .seats
                .iter()
                .all(|s| s.x < seating.columns && s.y < seating.rows));
        }
    }

    fn random_roster(rng: &mut StdRng, n: usize) -> Vec<Examinee> {
        let slots = [ExamSlot::Morning, ExamSlot::Afternoon, ExamSlot::Evening];
        let subjects = ["Maths", "Physics", "Chemistry", "Biology"];
        let depts = ["CSE", "ECE", "ME"];
        (0..n)
            .map(|i| {
                Examinee::new(
                    format!("S{i:03}"),
                    subjects[rng.random_range(0..subjects.len())],
                    if rng.random_bool(0.5) { "2024-05-01" } else { "2024-05-02" },
                    slots[rng.random_range(0..slots.len())].clone(),
                )
                .with_department(depts[rng.random_range(0..depts.len())])
                .with_year(rng.random_range(1..=4))
                .with_batch(if rng.random_bool(0.5) { "A" } else { "B" })
            })
            .collect()
    }

    #[test]
    fn test_end_to_end_two_slots() {
        let roster = two_slot_roster();
        let rooms = vec![RoomConfig::new("R1", 12).with_grid(6, 2)];

        let outcome = SeatingEngine::new()
            .allocate(&AllocationRequest::new(roster.clone(), rooms.clone()))
            .unwrap();

        // Each slot is a K6; colors pair one morning with one afternoon examinee.
        assert_eq!(outcome.groups.len(), 6);
        assert!(outcome.groups.iter().all(|g| g.size() == 2));
        assert_eq!(outcome.stats.chromatic_number, 6);

        let room = outcome.seating.room("R1").unwrap();
        assert_eq!(room.occupancy(), 12);
        assert_outcome_valid(&outcome, &roster, &rooms);
        assert!(outcome.seating.is_clean());
    }

    #[test]
    fn test_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        let roster = random_roster(&mut rng, 40);
        let rooms: Vec<RoomConfig> = (0..4)
            .map(|i| RoomConfig::new(format!("R{i}"), 30).unrestricted())
            .collect();
        let request = AllocationRequest::new(roster, rooms)
            .with_relationships(vec![RelationshipPair::new("S001", "S002")]);

        let engine = SeatingEngine::new();
        let first = engine.allocate(&request).unwrap();
        let second = engine.allocate(&request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_random_rosters_unrestricted_rooms() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let n = rng.random_range(10..60);
            let roster = random_roster(&mut rng, n);
            let rooms: Vec<RoomConfig> = (0..3)
                .map(|i| RoomConfig::new(format!("R{i}"), 30).unrestricted())
                .collect();

            let outcome = SeatingEngine::new()
                .allocate(&AllocationRequest::new(roster.clone(), rooms.clone()))
                .unwrap();
            assert_outcome_valid(&outcome, &roster, &rooms);
        }
    }

    #[test]
    fn test_random_rosters_default_ceilings() {
        let mut rng = StdRng::seed_from_u64(1234);
        let config = EngineConfig::new().with_search(SearchBudget::unlimited().with_node_limit(20_000));
        let engine = SeatingEngine::new().with_config(config);

        for _ in 0..20 {
            let n = rng.random_range(5..25);
            let roster = random_roster(&mut rng, n);
            let rooms: Vec<RoomConfig> = (0..6).map(|i| RoomConfig::new(format!("R{i}"), 30)).collect();

            match engine.allocate(&AllocationRequest::new(roster.clone(), rooms.clone())) {
                Ok(outcome) => assert_outcome_valid(&outcome, &roster, &rooms),
                Err(AllocationError::InfeasibleAllocation(_)) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_capacity_exceeded_has_no_partial_output() {
        let roster: Vec<Examinee> = (0..50)
            .map(|i| {
                Examinee::new(format!("S{i}"), "Maths", "2024-05-01", ExamSlot::Morning)
                    .with_department("CSE")
            })
            .collect();
        let rooms = vec![
            RoomConfig::new("R1", 20).with_grid(5, 4),
            RoomConfig::new("R2", 20).with_grid(5, 4),
        ];

        let err = SeatingEngine::new()
            .allocate(&AllocationRequest::new(roster, rooms))
            .unwrap_err();
        assert_eq!(
            err,
            AllocationError::CapacityExceeded {
                required: 50,
                available: 40,
                shortage: 10,
            }
        );
    }

    #[test]
    fn test_relationships_separate_seats() {
        let roster: Vec<Examinee> = (0..6)
            .map(|i| {
                Examinee::new(format!("S{i}"), "Maths", "2024-05-01", ExamSlot::Morning)
                    .with_department("CSE")
            })
            .collect();
        let pairs = vec![
            RelationshipPair::new("S0", "S1"),
            RelationshipPair::new("S1", "S2"),
            RelationshipPair::new("S3", "S4"),
        ];
        let rooms = vec![RoomConfig::new("R1", 30)];

        let outcome = SeatingEngine::new()
            .allocate(&AllocationRequest::new(roster, rooms).with_relationships(pairs.clone()))
            .unwrap();

        assert_eq!(outcome.stats.relationship_pairs_applied, 3);
        assert!(outcome.seating.is_clean());
        for p in &pairs {
            let a = outcome.seating.seat_for(&p.first).unwrap();
            let b = outcome.seating.seat_for(&p.second).unwrap();
            assert!(a.x.abs_diff(b.x) > 1 || a.y.abs_diff(b.y) > 1);
        }
    }

    #[test]
    fn test_relationship_separation_disabled() {
        let roster = vec![
            Examinee::new("A", "Maths", "2024-05-01", ExamSlot::Morning).with_department("CSE"),
            Examinee::new("B", "Maths", "2024-05-01", ExamSlot::Afternoon).with_department("CSE"),
        ];
        let rooms = vec![RoomConfig::new("R1", 2).with_grid(2, 1)];
        let request = AllocationRequest::new(roster, rooms)
            .with_relationships(vec![RelationshipPair::new("A", "B")]);

        let engine = SeatingEngine::new()
            .with_config(EngineConfig::new().with_relationship_separation(false));
        let outcome = engine.allocate(&request).unwrap();
        assert_eq!(outcome.stats.relationship_pairs_applied, 0);
        assert!(outcome.seating.is_clean());

        // Enabled: the only two cells are adjacent, so a violation is reported.
        let outcome = SeatingEngine::new().allocate(&request).unwrap();
        assert_eq!(outcome.seating.violations.len(), 1);
    }

    #[test]
    fn test_invalid_input_rejected() {
        let roster = vec![
            Examinee::new("S1", "Maths", "2024-05-01", ExamSlot::Morning).with_department("CSE"),
            Examinee::new("S1", "Maths", "2024-05-01", ExamSlot::Morning).with_department("CSE"),
        ];
        let err = SeatingEngine::new()
            .allocate(&AllocationRequest::new(roster, vec![RoomConfig::new("R1", 30)]))
            .unwrap_err();
        match err {
            AllocationError::InvalidInput(errors) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_source_supplies_roster_and_relationships() {
        let source = InMemorySource::new(vec![
            Examinee::new("A", "Maths", "2024-05-01", ExamSlot::Morning).with_department("CSE"),
            Examinee::new("B", "Maths", "2024-05-01", ExamSlot::Afternoon).with_department("CSE"),
        ])
        .with_relationships(vec![RelationshipPair::new("A", "B")]);

        let engine = SeatingEngine::new().with_source(Arc::new(source));
        let outcome = engine
            .allocate_from_source(vec![RoomConfig::new("R1", 30)])
            .unwrap();
        assert_eq!(outcome.seating.seated_count(), 2);
        assert_eq!(outcome.stats.relationship_pairs_applied, 1);
    }

    struct FailingSource;

    impl SeatingSource for FailingSource {
        fn roster(&self) -> Result<Vec<Examinee>, SourceError> {
            Err(SourceError::Unavailable("offline".into()))
        }

        fn relationship_pairs(&self) -> Result<Vec<RelationshipPair>, SourceError> {
            Err(SourceError::Unavailable("offline".into()))
        }
    }

    #[test]
    fn test_failing_source() {
        let engine = SeatingEngine::new().with_source(Arc::new(FailingSource));

        let err = engine
            .allocate_from_source(vec![RoomConfig::new("R1", 30)])
            .unwrap_err();
        assert!(matches!(err, AllocationError::Source(_)));

        // Relationship lookup failure degrades to none.
        let outcome = engine
            .allocate(&AllocationRequest::new(two_slot_roster(), vec![RoomConfig::new("R1", 30)]))
            .unwrap();
        assert_eq!(outcome.stats.relationship_pairs_applied, 0);
    }

    #[test]
    fn test_no_source_configured() {
        let err = SeatingEngine::new()
            .allocate_from_source(vec![RoomConfig::new("R1", 30)])
            .unwrap_err();
        assert!(matches!(err, AllocationError::Source(SourceError::Unavailable(_))));
    }

    #[test]
    fn test_sessions_run_independently() {
        let mut roster = two_slot_roster();
        roster.push(
            Examinee::new("E0", "Maths", "2024-05-02", ExamSlot::Morning)
                .with_department("ME")
                .with_year(4),
        );
        let rooms = vec![RoomConfig::new("R1", 6).with_grid(3, 2)];

        let outcomes = SeatingEngine::new()
            .allocate_sessions(&AllocationRequest::new(roster, rooms))
            .unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].session.slot, ExamSlot::Morning);
        assert_eq!(outcomes[1].session.slot, ExamSlot::Afternoon);
        assert_eq!(outcomes[2].session.date, "2024-05-02");
        for o in &outcomes {
            assert!(o.result.is_ok());
        }
        let morning = outcomes[0].result.as_ref().unwrap();
        assert_eq!(morning.groups.len(), 6);
        assert_eq!(morning.seating.seated_count(), 6);
    }

    #[test]
    fn test_session_failure_is_isolated() {
        let mut roster = two_slot_roster();
        for i in 0..4 {
            roster.push(
                Examinee::new(format!("X{i}"), "Maths", "2024-05-01", ExamSlot::Morning)
                    .with_department("CSE"),
            );
        }
        let rooms = vec![RoomConfig::new("R1", 6).with_grid(3, 2)];

        let outcomes = SeatingEngine::new()
            .allocate_sessions(&AllocationRequest::new(roster, rooms))
            .unwrap();
        assert!(matches!(
            outcomes[0].result,
            Err(AllocationError::CapacityExceeded { shortage: 4, .. })
        ));
        assert!(outcomes[1].result.is_ok());
    }

    #[test]
    fn test_outcome_serializes() {
        let outcome = SeatingEngine::new()
            .allocate(&AllocationRequest::new(
                two_slot_roster(),
                vec![RoomConfig::new("R1", 12).with_grid(6, 2)],
            ))
            .unwrap();

        let json = serde_json::to_value(&outcome).unwrap();
        let seats = json["seating"]["rooms"][0]["seats"].as_array().unwrap();
        assert_eq!(seats.len(), 12);
        assert_eq!(seats[0]["seat_number"], 1);
        assert!(json["seating"]["violations"].as_array().unwrap().is_empty());

        let back: AllocationOutcome = serde_json::from_value(json).unwrap();
        assert_eq!(back, outcome);
    }
}
