use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use zenith_core::share::alphabet::encode_bytes;
use zenith_core::{
    decode, decode_optional, encode, is_token_char, DecodeError, Goal, GoalCategory,
    GoalValidationError, StructureError,
};

fn scenario_goals() -> Vec<Goal> {
    vec![
        Goal {
            id: "goal-1".to_string(),
            title: "Run a marathon".to_string(),
            category: GoalCategory::Health,
            kr_number: "KR1".to_string(),
            target: 42.2,
            actual: 10.0,
            unit: "km".to_string(),
            description: "Train weekly".to_string(),
            due_date: None,
        },
        Goal {
            id: "goal-2".to_string(),
            title: "Increase income".to_string(),
            category: GoalCategory::Career,
            kr_number: "KR2".to_string(),
            target: 100000.0,
            actual: 30000.0,
            unit: "NTD/month".to_string(),
            description: "Freelance growth".to_string(),
            due_date: Some("2026-12-31".to_string()),
        },
    ]
}

const TEXT_POOL: &[&str] = &[
    "run", "年度", "目標", "🚀", "café", " ", "\"quoted\"", "back\\slash", "line\nbreak", "tab\t",
    "#data=", "&", "%20", "+/=", "", "KR", "ñ", "\u{0}", "\u{2028}",
];

const FLOAT_POOL: &[f64] = &[
    0.0,
    0.1,
    42.2,
    1e-300,
    5e-324,
    1.7976931348623157e308,
    100000.0,
    1.0 / 3.0,
];

fn random_text(rng: &mut StdRng) -> String {
    let parts = rng.gen_range(0..6);
    (0..parts)
        .map(|_| TEXT_POOL[rng.gen_range(0..TEXT_POOL.len())])
        .collect()
}

fn random_amount(rng: &mut StdRng) -> f64 {
    if rng.gen_bool(0.3) {
        FLOAT_POOL[rng.gen_range(0..FLOAT_POOL.len())]
    } else {
        rng.gen_range(0.0..1_000_000.0)
    }
}

fn random_goal(rng: &mut StdRng, index: usize) -> Goal {
    Goal {
        id: format!("id-{index}-{}", rng.gen::<u32>()),
        title: random_text(rng),
        category: GoalCategory::ALL[rng.gen_range(0..GoalCategory::ALL.len())],
        kr_number: format!("KR{}", index + 1),
        target: random_amount(rng),
        actual: if rng.gen_bool(0.1) {
            -random_amount(rng)
        } else {
            random_amount(rng)
        },
        unit: random_text(rng),
        description: random_text(rng),
        due_date: rng.gen_bool(0.5).then(|| {
            format!(
                "20{:02}-{:02}-{:02}",
                rng.gen_range(0..100),
                rng.gen_range(1..=12),
                rng.gen_range(1..=28)
            )
        }),
    }
}

fn random_goal_list(rng: &mut StdRng) -> Vec<Goal> {
    let len = rng.gen_range(0..8);
    (0..len).map(|index| random_goal(rng, index)).collect()
}

#[test]
fn scenario_two_goals_roundtrip_in_order() {
    let goals = scenario_goals();
    let token = encode(&goals).unwrap();
    let decoded = decode(&token).unwrap();

    assert_eq!(decoded, goals);
    assert_eq!(decoded[0].title, "Run a marathon");
    assert_eq!(decoded[0].target, 42.2);
    assert_eq!(decoded[1].unit, "NTD/month");
    assert_eq!(decoded[1].actual, 30000.0);
}

#[test]
fn empty_list_is_a_valid_token_but_empty_token_is_missing() {
    let token = encode(&[]).unwrap();
    assert!(!token.is_empty());
    assert_eq!(decode(&token), Ok(Vec::new()));

    assert_eq!(decode(""), Err(DecodeError::EmptyOrMissing));
    assert_eq!(decode_optional(None), Err(DecodeError::EmptyOrMissing));
    assert_eq!(decode_optional(Some(&token)), Ok(Vec::new()));
}

#[test]
fn unicode_and_long_descriptions_roundtrip() {
    let mut goals = scenario_goals();
    goals[0].title = "跑完全馬 🏃‍♀️ über café".to_string();
    goals[1].description = "每週接案，累積作品集。".repeat(200);

    let token = encode(&goals).unwrap();
    assert_eq!(decode(&token).unwrap(), goals);
}

#[test]
fn encoding_is_deterministic() {
    let goals = scenario_goals();
    let first = encode(&goals).unwrap();
    let second = encode(&goals.clone()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn randomized_lists_roundtrip_with_safe_alphabet() {
    let mut rng = StdRng::seed_from_u64(0x5eed_2026);
    for _ in 0..1_200 {
        let goals = random_goal_list(&mut rng);
        let token = encode(&goals).unwrap();

        if let Some(bad) = token.chars().find(|c| !is_token_char(*c)) {
            panic!("token contains unsafe character {bad:?}");
        }
        assert_eq!(decode(&token).unwrap(), goals);
    }
}

#[test]
fn truncating_a_token_by_one_character_is_rejected() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut lists = vec![Vec::new(), scenario_goals()];
    lists.extend((0..200).map(|_| random_goal_list(&mut rng)));

    for goals in lists {
        let token = encode(&goals).unwrap();
        let truncated = &token[..token.len() - 1];
        match decode(truncated) {
            Err(DecodeError::MalformedAlphabet(_)) | Err(DecodeError::MalformedStructure(_)) => {}
            other => panic!("truncated token must be rejected, got {other:?}"),
        }
    }
}

#[test]
fn foreign_characters_are_malformed_alphabet() {
    let token = encode(&scenario_goals()).unwrap();
    for corrupted in [
        format!("{token}="),
        token.replacen(|c: char| c.is_ascii_alphabetic(), "+", 1),
        format!("{token}%20"),
    ] {
        assert!(matches!(
            decode(&corrupted),
            Err(DecodeError::MalformedAlphabet(_))
        ));
    }
}

#[test]
fn unknown_category_is_invalid_record() {
    let token = encode_bytes(
        br#"{"v":1,"goals":[{"id":"g1","title":"Paint","category":"Hobby","krNumber":"KR1","target":10,"actual":0,"unit":"works","description":""}]}"#,
    );
    assert_eq!(
        decode(&token),
        Err(DecodeError::InvalidRecord {
            index: 0,
            reason: GoalValidationError::UnknownCategory("Hobby".to_string()),
        })
    );
}

#[test]
fn one_bad_record_rejects_the_whole_list() {
    let token = encode_bytes(
        br#"{"v":1,"goals":[
            {"id":"g1","title":"ok","category":"Health","krNumber":"KR1","target":1,"actual":0,"unit":"u","description":""},
            {"id":"g2","title":"bad","category":"Health","krNumber":"KR2","target":"lots","actual":0,"unit":"u","description":""}
        ]}"#,
    );
    match decode(&token) {
        Err(DecodeError::InvalidRecord { index, reason }) => {
            assert_eq!(index, 1);
            assert!(matches!(
                reason,
                GoalValidationError::InvalidField { field: "target", .. }
            ));
        }
        other => panic!("expected invalid record, got {other:?}"),
    }
}

#[test]
fn missing_and_negative_fields_are_invalid_records() {
    let missing = encode_bytes(br#"{"v":1,"goals":[{"id":"g1","title":"t","category":"Health"}]}"#);
    assert_eq!(
        decode(&missing),
        Err(DecodeError::InvalidRecord {
            index: 0,
            reason: GoalValidationError::MissingField("krNumber"),
        })
    );

    let negative = encode_bytes(
        br#"{"v":1,"goals":[{"id":"g1","title":"t","category":"Health","krNumber":"KR1","target":-5,"actual":0,"unit":"u","description":""}]}"#,
    );
    assert_eq!(
        decode(&negative),
        Err(DecodeError::InvalidRecord {
            index: 0,
            reason: GoalValidationError::InvalidTarget(-5.0),
        })
    );
}

#[test]
fn truncated_json_is_malformed_structure() {
    let token = encode_bytes(br#"{"v":1,"goals":[{"id":"g1""#);
    assert!(matches!(
        decode(&token),
        Err(DecodeError::MalformedStructure(StructureError::Json(_)))
    ));
}

#[test]
fn unknown_keys_are_ignored_for_forward_compatibility() {
    let token = encode_bytes(
        br#"{"v":1,"theme":"dark","goals":[{"id":"g1","title":"t","category":"Finance","krNumber":"KR1","target":5,"actual":1,"unit":"u","description":"d","color":"blue"}]}"#,
    );
    let goals = decode(&token).unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].category, GoalCategory::Finance);
}

#[test]
fn impossible_due_date_is_invalid_record() {
    let token = encode_bytes(
        br#"{"v":1,"goals":[{"id":"g1","title":"t","category":"Health","krNumber":"KR1","target":5,"actual":1,"unit":"u","description":"","dueDate":"2026-02-31"}]}"#,
    );
    assert_eq!(
        decode(&token),
        Err(DecodeError::InvalidRecord {
            index: 0,
            reason: GoalValidationError::InvalidDueDate("2026-02-31".to_string()),
        })
    );

    let mut goals = scenario_goals();
    goals[1].due_date = Some("2025-02-29".to_string());
    assert!(encode(&goals).is_err());

    goals[1].due_date = Some("2024-02-29".to_string());
    let token = encode(&goals).unwrap();
    assert_eq!(decode(&token).unwrap(), goals);
}
