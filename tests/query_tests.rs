mod common;

use std::sync::Arc;

use common::{GUARD, MEDIC, SNIPER};
use opdex::data::repository::{Snapshot, SnapshotRepository};
use opdex::ingest::run_cycle;
use opdex::query::{
    resolve_by_id, search, search_resolved, CalcParams, FacetQuery, QueryError, ValidationError,
};

fn snapshot() -> Arc<Snapshot> {
    let repo = SnapshotRepository::new();
    run_cycle(&repo, &common::fixture_source()).expect("fixture should ingest");
    repo.current()
}

fn ids(snapshot: &Snapshot, facets: &FacetQuery) -> Vec<String> {
    search(snapshot, facets, &CalcParams::default())
        .expect("query should succeed")
        .iter()
        .map(|record| record.id.clone())
        .collect()
}

#[test]
fn empty_query_lists_everything() {
    let snapshot = snapshot();
    assert_eq!(ids(&snapshot, &FacetQuery::default()), vec![SNIPER, MEDIC, GUARD]);
}

#[test]
fn facets_combine_with_and() {
    let snapshot = snapshot();
    let facets = FacetQuery {
        profession: Some("SNIPER".into()),
        rarity: Some(6),
        ..FacetQuery::default()
    };
    assert_eq!(ids(&snapshot, &facets), vec![SNIPER]);

    let facets = FacetQuery {
        profession: Some("SNIPER".into()),
        rarity: Some(5),
        ..FacetQuery::default()
    };
    assert!(ids(&snapshot, &facets).is_empty());
}

#[test]
fn tag_set_requires_every_tag() {
    let snapshot = snapshot();
    let facets = FacetQuery {
        tags: vec!["输出".into(), "远程位".into()],
        ..FacetQuery::default()
    };
    assert_eq!(ids(&snapshot, &facets), vec![SNIPER]);

    let facets = FacetQuery {
        tags: vec!["远程位".into()],
        ..FacetQuery::default()
    };
    assert_eq!(ids(&snapshot, &facets), vec![SNIPER, MEDIC]);
}

#[test]
fn display_names_and_codes_both_match() {
    let snapshot = snapshot();
    let by = |facets: FacetQuery| ids(&snapshot, &facets);

    assert_eq!(
        by(FacetQuery { profession: Some("狙击".into()), ..Default::default() }),
        vec![SNIPER]
    );
    assert_eq!(
        by(FacetQuery { profession: Some("warrior".into()), ..Default::default() }),
        vec![GUARD]
    );
    assert_eq!(
        by(FacetQuery { position: Some("近战位".into()), ..Default::default() }),
        vec![GUARD]
    );
    assert_eq!(
        by(FacetQuery { sub_profession: Some("医师".into()), ..Default::default() }),
        vec![MEDIC]
    );
    assert_eq!(
        by(FacetQuery { sub_profession: Some("LORD".into()), ..Default::default() }),
        vec![GUARD]
    );
    assert_eq!(
        by(FacetQuery { nation: Some("拉特兰".into()), ..Default::default() }),
        vec![SNIPER]
    );
    assert_eq!(
        by(FacetQuery { nation: Some("rhodes".into()), ..Default::default() }),
        vec![MEDIC]
    );
}

#[test]
fn text_facets_match_case_insensitively() {
    let snapshot = snapshot();
    let by = |facets: FacetQuery| ids(&snapshot, &facets);

    assert_eq!(by(FacetQuery { name: Some("exu".into()), ..Default::default() }), vec![SNIPER]);
    assert_eq!(
        by(FacetQuery { char_id: Some(GUARD.into()), ..Default::default() }),
        vec![GUARD]
    );
    assert_eq!(
        by(FacetQuery { gender: Some("女".into()), ..Default::default() }),
        vec![SNIPER, MEDIC]
    );
    assert_eq!(
        by(FacetQuery { race: Some("萨卡兹".into()), ..Default::default() }),
        vec![MEDIC]
    );
    assert_eq!(
        by(FacetQuery { birth_place: Some("拉特兰".into()), ..Default::default() }),
        vec![SNIPER]
    );
    assert_eq!(
        by(FacetQuery { obtain_approach: Some("招募寻访".into()), ..Default::default() }),
        vec![SNIPER, MEDIC]
    );
}

#[test]
fn single_match_is_validated_against_its_own_limits() {
    let snapshot = snapshot();
    let only_sniper = FacetQuery {
        char_id: Some(SNIPER.into()),
        ..FacetQuery::default()
    };
    let params = CalcParams {
        elite: Some(2),
        level: Some(80),
        ..CalcParams::default()
    };

    let err = search(&snapshot, &only_sniper, &params).expect_err("level 80 is past elite 2 cap");
    match &err {
        QueryError::Validation(ValidationError::Level { elite, max, .. }) => {
            assert_eq!((*elite, *max), (2, 70));
        }
        other => panic!("expected level validation, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "Operator 'Exusiai' at Elite 2 cannot reach Level 80. Max Level is 70."
    );

    let only_guard = FacetQuery {
        char_id: Some(GUARD.into()),
        ..FacetQuery::default()
    };
    let err = search(&snapshot, &only_guard, &CalcParams { elite: Some(2), ..Default::default() })
        .expect_err("guard has one tier");
    assert_eq!(
        err.to_string(),
        "Operator 'Mudrock' cannot reach Elite 2. Max Elite phase is 0."
    );

    let only_medic = FacetQuery {
        char_id: Some(MEDIC.into()),
        ..FacetQuery::default()
    };
    let err = search(&snapshot, &only_medic, &CalcParams { potential: Some(3), ..Default::default() })
        .expect_err("medic has no potential ranks");
    assert_eq!(
        err.to_string(),
        "Operator 'Warfarin' does not have 3 potential levels. Max potential upgrade count is 0."
    );
}

#[test]
fn unsupplied_parameters_are_not_validated() {
    let snapshot = snapshot();
    let only_medic = FacetQuery {
        char_id: Some(MEDIC.into()),
        ..FacetQuery::default()
    };
    // Default potential is 5 but the medic has no ranks; only explicit input is checked.
    let hits = search_resolved(&snapshot, &only_medic, &CalcParams::default()).expect("no explicit params");
    assert_eq!(hits.len(), 1);

    let hits = search_resolved(&snapshot, &only_medic, &CalcParams { trust: Some(150), ..Default::default() })
        .expect("trust is not character specific");
    assert_eq!(hits[0].attributes.atk, 380);
}

#[test]
fn multiple_matches_clamp_instead_of_validating() {
    let snapshot = snapshot();
    let ranged = FacetQuery {
        position: Some("RANGED".into()),
        ..FacetQuery::default()
    };
    let params = CalcParams {
        elite: Some(2),
        level: Some(90),
        potential: Some(5),
        ..CalcParams::default()
    };

    let hits = search_resolved(&snapshot, &ranged, &params).expect("multi-match clamps");
    assert_eq!(hits.len(), 2);
    let medic = hits.iter().find(|hit| hit.record.id == MEDIC).expect("medic hit");
    // Elite 1, level 70 is the medic's ceiling.
    assert_eq!(medic.attributes.atk, 380);
    let sniper = hits.iter().find(|hit| hit.record.id == SNIPER).expect("sniper hit");
    assert_eq!(sniper.attributes.atk, 585);
}

#[test]
fn zero_matches_skip_validation() {
    let snapshot = snapshot();
    let nobody = FacetQuery {
        name: Some("nobody".into()),
        ..FacetQuery::default()
    };
    let hits = search_resolved(&snapshot, &nobody, &CalcParams { elite: Some(2), ..Default::default() })
        .expect("nothing to validate");
    assert!(hits.is_empty());
}

#[test]
fn boundary_ranges_are_enforced_for_every_query() {
    let snapshot = snapshot();
    let everyone = FacetQuery::default();

    let cases = [
        CalcParams { elite: Some(3), ..Default::default() },
        CalcParams { level: Some(0), ..Default::default() },
        CalcParams { level: Some(91), ..Default::default() },
        CalcParams { trust: Some(201), ..Default::default() },
        CalcParams { potential: Some(-1), ..Default::default() },
    ];
    for params in cases {
        assert!(
            matches!(search(&snapshot, &everyone, &params), Err(QueryError::Boundary { .. })),
            "{params:?} should be rejected"
        );
    }

    let err = search(&snapshot, &FacetQuery { rarity: Some(7), ..Default::default() }, &CalcParams::default())
        .expect_err("rarity is 1-6");
    assert_eq!(err.to_string(), "rarity must be between 1 and 6, got 7");

    assert!(search(&snapshot, &everyone, &CalcParams { trust: Some(200), ..Default::default() }).is_ok());
}

#[test]
fn resolve_by_id_validates_and_resolves() {
    let snapshot = snapshot();

    let hit = resolve_by_id(&snapshot, SNIPER, &CalcParams::default()).expect("sniper resolves");
    assert_eq!(hit.attributes.atk, 585);

    let hit = resolve_by_id(
        &snapshot,
        SNIPER,
        &CalcParams {
            elite: Some(2),
            level: Some(35),
            trust: Some(0),
            potential: Some(0),
        },
    )
    .expect("explicit progression");
    assert_eq!(hit.attributes.atk, 297);

    assert!(matches!(
        resolve_by_id(&snapshot, "char_999_ghost", &CalcParams::default()),
        Err(QueryError::UnknownCharacter(_))
    ));
    assert!(matches!(
        resolve_by_id(&snapshot, GUARD, &CalcParams { level: Some(41), ..Default::default() }),
        Err(QueryError::Validation(ValidationError::Level { .. }))
    ));
}
