use zenith_core::{parse_plan_draft, GoalCategory, GoalValidationError, PlanDraftError};

#[test]
fn parses_generator_output_in_order() {
    let drafts = parse_plan_draft(
        r#"[
            {"title":"Run 5k","category":"Health","krNumber":"KR1","target":5,"unit":"km","description":"Three runs a week"},
            {"title":"Learn Rust","category":"Learning","krNumber":"KR2","target":1,"unit":"course","description":"Finish the book","extra":"ignored"}
        ]"#,
    )
    .unwrap();

    assert_eq!(drafts.len(), 2);
    assert_eq!(drafts[0].title, "Run 5k");
    assert_eq!(drafts[0].target, 5.0);
    assert_eq!(drafts[1].category, GoalCategory::Learning);
}

#[test]
fn empty_array_yields_no_drafts() {
    assert_eq!(parse_plan_draft("[]"), Ok(Vec::new()));
}

#[test]
fn non_array_output_is_malformed() {
    assert!(matches!(
        parse_plan_draft(r#"{"title":"Run"}"#),
        Err(PlanDraftError::Malformed(_))
    ));
    assert!(matches!(
        parse_plan_draft("Here is your plan: ..."),
        Err(PlanDraftError::Malformed(_))
    ));
}

#[test]
fn first_invalid_item_rejects_the_batch() {
    let unknown_category = parse_plan_draft(
        r#"[
            {"title":"ok","category":"Finance","krNumber":"KR1","target":1,"unit":"u","description":"d"},
            {"title":"bad","category":"Spirituality","krNumber":"KR2","target":1,"unit":"u","description":"d"}
        ]"#,
    );
    assert_eq!(
        unknown_category,
        Err(PlanDraftError::InvalidItem {
            index: 1,
            reason: GoalValidationError::UnknownCategory("Spirituality".to_string()),
        })
    );

    let missing_unit = parse_plan_draft(
        r#"[{"title":"t","category":"Lifestyle","krNumber":"KR1","target":3,"description":"d"}]"#,
    );
    assert_eq!(
        missing_unit,
        Err(PlanDraftError::InvalidItem {
            index: 0,
            reason: GoalValidationError::MissingField("unit"),
        })
    );

    let negative_target = parse_plan_draft(
        r#"[{"title":"t","category":"Lifestyle","krNumber":"KR1","target":-1,"unit":"u","description":"d"}]"#,
    );
    assert_eq!(
        negative_target,
        Err(PlanDraftError::InvalidItem {
            index: 0,
            reason: GoalValidationError::InvalidTarget(-1.0),
        })
    );
}
