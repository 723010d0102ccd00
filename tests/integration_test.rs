// Integration tests for rankwise
use rankwise::request::{load_config, SimilarityRequest, TopsisRequest};
use rankwise::{
    Alternative, AuditContext, Criterion, EngineConfig, EntityId, Error, FilterCondition,
    HashEmbedder, MemoryAuditSink, MissingValuePolicy, Mode, Parameters, ProfileVector,
    RawAlternative, Recommender, RemapPolicy, SimilarityEngine, SimilarityQuery, TopsisRanker,
    ValidationError,
};
use std::io::Write;
use std::sync::Arc;

fn staff_criteria() -> Vec<Criterion> {
    vec![
        Criterion::cost("carga", 0.4),
        Criterion::benefit("sesiones", 0.3),
        Criterion::benefit("rating", 0.3),
    ]
}

fn staff() -> Vec<Alternative> {
    vec![
        Alternative::new(1u64, vec![10.0, 5.0, 4.5]),
        Alternative::new(2u64, vec![5.0, 8.0, 4.0]),
        Alternative::new(3u64, vec![20.0, 2.0, 3.0]),
    ]
}

fn activity_catalog() -> Vec<ProfileVector> {
    vec![
        ProfileVector::new("A", vec![1.0, 0.0, 0.0]),
        ProfileVector::new("B", vec![0.0, 1.0, 0.0]),
        ProfileVector::new("C", vec![0.7, 0.7, 0.0]),
    ]
}

#[test]
fn test_therapist_assignment() {
    let recommender = Recommender::new(EngineConfig::default()).unwrap();
    let bundle = recommender
        .rank_alternatives("case-1", &staff_criteria(), &staff(), None)
        .unwrap();

    let ranked = bundle.ranked().unwrap();
    let order: Vec<_> = ranked.iter().map(|r| r.id.clone()).collect();
    assert_eq!(
        order,
        vec![EntityId::Integer(2), EntityId::Integer(1), EntityId::Integer(3)]
    );
    assert!((ranked[0].score - 0.935_729_2).abs() < 1e-6);
    assert!((ranked[1].score - 0.620_522_1).abs() < 1e-6);
    assert_eq!(ranked[2].score, 0.0);

    let display = bundle.rounded(4);
    assert_eq!(display.ranked().unwrap()[0].score, 0.9357);
}

#[test]
fn test_activity_recommendation() {
    let recommender = Recommender::new(EngineConfig::default()).unwrap();
    let subject = ProfileVector::new("child-1", vec![1.0, 0.0, 0.0]);
    let bundle = recommender
        .recommend_similar(&subject, &activity_catalog(), &SimilarityQuery::new().top_n(2), None)
        .unwrap();

    assert_eq!(bundle.mode(), Mode::Similarity);
    let results = bundle.similar().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].candidate_id, EntityId::from("A"));
    assert_eq!(results[0].score, 1.0);
    assert_eq!(results[1].candidate_id, EntityId::from("C"));
    assert!((results[1].score - 0.854).abs() < 1e-3);
    assert_eq!(results.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn test_rankers_are_idempotent() {
    let ranker = TopsisRanker::default();
    let first = serde_json::to_string(&ranker.rank(&staff_criteria(), &staff()).unwrap()).unwrap();
    let second = serde_json::to_string(&ranker.rank(&staff_criteria(), &staff()).unwrap()).unwrap();
    assert_eq!(first, second);

    let engine = SimilarityEngine::default();
    let subject = ProfileVector::new("s", vec![0.2, 0.9, -0.4]);
    let a = engine.recommend(&subject, &activity_catalog(), 3, None).unwrap();
    let b = engine.recommend(&subject, &activity_catalog(), 3, None).unwrap();
    assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
}

#[test]
fn test_empty_catalog_bundle() {
    let recommender = Recommender::new(EngineConfig::default()).unwrap();
    let subject = ProfileVector::new("child-1", vec![1.0, 0.0, 0.0]);
    let bundle = recommender
        .recommend_similar(&subject, &[], &SimilarityQuery::new(), None)
        .unwrap();
    assert!(bundle.is_empty());
}

#[test]
fn test_concurrent_calls_share_one_recommender() {
    let sink = Arc::new(MemoryAuditSink::new());
    let recommender = Recommender::new(EngineConfig::default())
        .unwrap()
        .with_audit_sink(sink.clone());
    let criteria = staff_criteria();
    let alternatives = staff();
    let catalog = activity_catalog();
    let subject = ProfileVector::new("child-1", vec![1.0, 0.0, 0.0]);

    let expected = recommender
        .rank_alternatives("case", &criteria, &alternatives, None)
        .unwrap();

    std::thread::scope(|scope| {
        for worker in 0..8 {
            let recommender = &recommender;
            let criteria = &criteria;
            let alternatives = &alternatives;
            let catalog = &catalog;
            let subject = &subject;
            let expected = &expected;
            scope.spawn(move || {
                let ctx = AuditContext::new().with_tag("worker", worker.to_string());
                let ranked = recommender
                    .rank_alternatives("case", criteria, alternatives, Some(&ctx))
                    .unwrap();
                assert_eq!(ranked.results, expected.results);
                let similar = recommender
                    .recommend_similar(subject, catalog, &SimilarityQuery::new(), Some(&ctx))
                    .unwrap();
                assert_eq!(similar.len(), 3);
            });
        }
    });

    assert_eq!(sink.len(), 1 + 8 * 2);
}

#[test]
fn test_activity_filters_and_embedding() {
    let embedder = HashEmbedder::new(128).unwrap();
    let activities = [
        ("balance-beam", serde_json::json!({"name": "balance beam walk", "category": "motor", "difficulty": 2})),
        ("obstacle", serde_json::json!({"name": "balance obstacle course", "category": "motor", "difficulty": 5})),
        ("cards", serde_json::json!({"name": "picture naming cards", "category": "speech", "difficulty": 1})),
    ];
    let catalog: Vec<ProfileVector> = activities
        .iter()
        .map(|(id, attrs)| rankwise::embed_profile(&embedder, *id, attrs.clone()).unwrap())
        .collect();
    let child = rankwise::embed_profile(
        &embedder,
        "child-1",
        serde_json::json!({"name": "balance", "category": "motor"}),
    )
    .unwrap();

    let recommender = Recommender::new(EngineConfig::default().with_vector_dim(128)).unwrap();
    let query = SimilarityQuery::new()
        .filter(FilterCondition::equals("category", "motor").and(FilterCondition::at_most("difficulty", 3.0)));
    let bundle = recommender.recommend_similar(&child, &catalog, &query, None).unwrap();

    assert_eq!(bundle.ids(), vec![&EntityId::from("balance-beam")]);
    let Parameters::Similarity(params) = &bundle.parameters else {
        panic!("expected similarity parameters");
    };
    assert_eq!(params.candidate_count, 3);
    assert_eq!(params.filtered_count, 1);
}

#[test]
fn test_missing_rating_policy_is_visible() {
    let recommender = Recommender::new(EngineConfig::default()).unwrap();
    let raw = vec![
        RawAlternative::new(1u64, vec![Some(10.0), Some(5.0), Some(4.5)]),
        RawAlternative::new(2u64, vec![Some(5.0), Some(8.0), None]),
        RawAlternative::new(3u64, vec![None, Some(2.0), Some(3.0)]),
    ];

    let err = recommender
        .rank_incomplete("case", &staff_criteria(), &raw, &MissingValuePolicy::Reject, None)
        .unwrap_err();
    assert!(err.is_validation());

    let policy = MissingValuePolicy::substitute([("rating", 3.0), ("carga", 0.0)]);
    let bundle = recommender
        .rank_incomplete("case", &staff_criteria(), &raw, &policy, None)
        .unwrap();
    let json = serde_json::to_value(&bundle).unwrap();
    assert_eq!(json["parameters"]["missing_values"]["policy"], "substitute");
    assert_eq!(json["parameters"]["substitutions"].as_array().unwrap().len(), 2);
}

#[test]
fn test_validation_errors_name_the_constraint() {
    let recommender = Recommender::new(EngineConfig::default()).unwrap();
    let bad = vec![Criterion::benefit("rating", 0.0)];
    let err = recommender
        .rank_alternatives("case", &bad, &[Alternative::new(1u64, vec![1.0])], None)
        .unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::NonPositiveWeight { .. })));
    assert!(err.to_string().contains("rating"));

    let subject = ProfileVector::new("child", vec![1.0, 0.0]);
    let err = recommender
        .recommend_similar(&subject, &activity_catalog(), &SimilarityQuery::new(), None)
        .unwrap_err();
    assert!(err.to_string().contains("dimension"));
}

#[test]
fn test_topsis_request_roundtrip() {
    let request: TopsisRequest = serde_json::from_value(serde_json::json!({
        "subject_id": "case-9",
        "criteria": [
            {"name": "carga", "weight": 0.4, "direction": "COST"},
            {"name": "sesiones", "weight": 0.3, "direction": "BENEFIT"},
            {"name": "rating", "weight": 0.3, "direction": "BENEFIT"}
        ],
        "alternatives": [
            {"id": 1, "values": [10, 5, 4.5]},
            {"id": 2, "values": [5, 8, null]},
            {"id": 3, "values": [20, 2, 3.0]}
        ],
        "missing_values": {"policy": "substitute", "defaults": {"rating": 3.0}},
        "context": {"actor": "coordinator-7"}
    }))
    .unwrap();

    let recommender = Recommender::new(EngineConfig::default()).unwrap();
    let bundle = request.run(&recommender).unwrap();
    assert_eq!(bundle.subject_id, EntityId::from("case-9"));
    assert_eq!(bundle.len(), 3);
    assert_eq!(bundle.context.as_ref().unwrap().actor.as_deref(), Some("coordinator-7"));
}

#[test]
fn test_similarity_request_with_vectors() {
    let request: SimilarityRequest = serde_json::from_value(serde_json::json!({
        "subject_id": "child-1",
        "subject_vector": [1, 0, 0],
        "candidates": [
            {"id": "A", "vector": [1, 0, 0]},
            {"id": "B", "vector": [0, 1, 0]},
            {"id": "C", "vector": [0.7, 0.7, 0]}
        ],
        "top_n": 2
    }))
    .unwrap();

    let recommender = Recommender::new(EngineConfig::default()).unwrap();
    let bundle = request.run(&recommender, &HashEmbedder::default()).unwrap();
    assert_eq!(bundle.ids(), vec![&EntityId::from("A"), &EntityId::from("C")]);
}

#[test]
fn test_load_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"remap": "clamped", "default_top_n": 5, "vector_dim": 3}}"#).unwrap();

    let config = load_config(Some(file.path())).unwrap();
    assert_eq!(config.remap, RemapPolicy::Clamped);
    assert_eq!(config.default_top_n, 5);
    assert_eq!(config.vector_dim, Some(3));

    assert_eq!(load_config(None).unwrap(), EngineConfig::default());

    let mut bad = tempfile::NamedTempFile::new().unwrap();
    write!(bad, r#"{{"default_top_n": 99}}"#).unwrap();
    assert!(load_config(Some(bad.path())).is_err());
}
