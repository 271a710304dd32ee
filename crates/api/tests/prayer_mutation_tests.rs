mod common;

use api::gql::build_schema;
use async_graphql::Variables;
use common::*;
use serde_json::json;

const INTERACT: &str = r#"
    mutation Interact($id: ID!, $action: PrayerAction!) {
        interactWithPrayer(id: $id, action: $action) {
            id
            answer
            flagCount
            prayerCount
            isSaved
        }
    }
"#;

fn interact_vars(id: &str, action: &str) -> Option<Variables> {
    Some(Variables::from_json(json!({ "id": id, "action": action })))
}

fn node_vars(id: &str) -> Option<Variables> {
    Some(Variables::from_json(json!({ "nodeId": id })))
}

#[tokio::test]
async fn test_add_prayer_creates_request_for_viewer() {
    let (store, state) = setup_test_state();
    let schema = build_schema(state.clone());

    let query = r#"
        mutation Add($text: String!, $isAnonymous: Boolean!) {
            addPrayer(text: $text, isAnonymous: $isAnonymous) {
                id
                text
                answer
                firstName
                prayerCount
                flagCount
                isAnonymous
                isPublic
                campus { name }
            }
        }
    "#;
    let variables = Variables::from_json(json!({
        "text": "  Jesus Rocks  ",
        "isAnonymous": false,
    }));

    let response = execute_graphql(
        &schema,
        query,
        Some(variables),
        Some(claims_for(ISAAC, "member")),
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    let prayer = &data["addPrayer"];
    assert_eq!(prayer["id"], prayer_node_id(&state, 4));
    assert_eq!(prayer["text"], "Jesus Rocks");
    assert_eq!(prayer["answer"], json!(null));
    assert_eq!(prayer["firstName"], "Isaac");
    assert_eq!(prayer["prayerCount"], 0);
    assert_eq!(prayer["flagCount"], 0);
    assert_eq!(prayer["isAnonymous"], false);
    assert_eq!(prayer["isPublic"], true);
    assert_eq!(prayer["campus"]["name"], "Rock Campus");

    let stored = store.prayer(4).unwrap();
    assert_eq!(stored.requested_by_person_alias_id, Some(ISAAC_ALIAS));
    assert!(stored.is_active);
}

#[tokio::test]
async fn test_add_prayer_anonymous_is_redacted_in_feeds() {
    let (_store, state) = setup_test_state();
    let schema = build_schema(state.clone());

    let response = execute_graphql(
        &schema,
        r#"mutation {
            addPrayer(text: "Quiet request", isAnonymous: true) { firstName isAnonymous }
        }"#,
        None,
        Some(claims_for(ISAAC, "member")),
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["addPrayer"]["firstName"], json!(null));
    assert_eq!(data["addPrayer"]["isAnonymous"], true);

    let feed = execute_graphql(
        &schema,
        r#"query { prayers { text firstName } }"#,
        None,
        None,
    )
    .await;
    let data = feed.data.into_json().unwrap();
    let added = data["prayers"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["text"] == "Quiet request")
        .cloned()
        .unwrap();
    assert_eq!(added["firstName"], json!(null));
}

#[tokio::test]
async fn test_add_prayer_validation() {
    let (_store, state) = setup_test_state();
    let schema = build_schema(state);

    let blank = execute_graphql(
        &schema,
        r#"mutation { addPrayer(text: "   ", isAnonymous: false) { id } }"#,
        None,
        Some(claims_for(ISAAC, "member")),
    )
    .await;
    assert_eq!(error_code(&blank).as_deref(), Some("VALIDATION_ERROR"));

    let signed_out = execute_graphql(
        &schema,
        r#"mutation { addPrayer(text: "Hello", isAnonymous: false) { id } }"#,
        None,
        None,
    )
    .await;
    assert_eq!(error_code(&signed_out).as_deref(), Some("UNAUTHORIZED"));

    // Rich has no campus, and category 1 needs one
    let campus_only = execute_graphql(
        &schema,
        r#"mutation { addPrayer(text: "Hello", isAnonymous: false, categoryId: "1") { id } }"#,
        None,
        Some(claims_for(RICH, "member")),
    )
    .await;
    assert_eq!(error_code(&campus_only).as_deref(), Some("VALIDATION_ERROR"));

    let unknown_category = execute_graphql(
        &schema,
        r#"mutation { addPrayer(text: "Hello", isAnonymous: false, categoryId: "42") { id } }"#,
        None,
        Some(claims_for(ISAAC, "member")),
    )
    .await;
    assert_eq!(error_code(&unknown_category).as_deref(), Some("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_increment_and_flag_update_counts() {
    let (store, state) = setup_test_state();
    let schema = build_schema(state.clone());
    let id = prayer_node_id(&state, 1);
    let claims = Some(claims_for(RICH, "member"));

    let response = execute_graphql(
        &schema,
        INTERACT,
        interact_vars(&id, "INCREMENT"),
        claims.clone(),
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["interactWithPrayer"]["prayerCount"], 5);

    let response = execute_graphql(&schema, INTERACT, interact_vars(&id, "FLAG"), claims).await;
    let data = response.data.into_json().unwrap();
    assert_eq!(data["interactWithPrayer"]["flagCount"], 1);

    let logged: Vec<(i64, i64, String)> = store
        .interactions()
        .into_iter()
        .map(|i| (i.prayer_request_id, i.person_id, i.operation))
        .collect();
    assert_eq!(
        logged,
        vec![(1, RICH, "prayed".to_string()), (1, RICH, "flagged".to_string())]
    );
}

#[tokio::test]
async fn test_save_is_idempotent() {
    let (_store, state) = setup_test_state();
    let schema = build_schema(state.clone());
    let id = prayer_node_id(&state, 1);
    let claims = Some(claims_for(RICH, "member"));
    let saved_query = r#"query { savedPrayers { id isSaved } }"#;

    let first = execute_graphql(
        &schema,
        INTERACT,
        interact_vars(&id, "SAVE"),
        claims.clone(),
    )
    .await;
    assert!(first.errors.is_empty(), "{:?}", first.errors);
    let first_data = first.data.into_json().unwrap();
    assert_eq!(first_data["interactWithPrayer"]["isSaved"], true);
    let after_once = execute_graphql(&schema, saved_query, None, claims.clone())
        .await
        .data
        .into_json()
        .unwrap();

    let second = execute_graphql(
        &schema,
        INTERACT,
        interact_vars(&id, "SAVE"),
        claims.clone(),
    )
    .await;
    assert!(second.errors.is_empty(), "{:?}", second.errors);
    assert_eq!(second.data.into_json().unwrap(), first_data);
    let after_twice = execute_graphql(&schema, saved_query, None, claims.clone())
        .await
        .data
        .into_json()
        .unwrap();

    assert_eq!(after_once, after_twice);
    assert_eq!(after_twice["savedPrayers"], json!([{ "id": id, "isSaved": true }]));

    for _ in 0..2 {
        let response =
            execute_graphql(&schema, INTERACT, interact_vars(&id, "UNSAVE"), claims.clone()).await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
    }
    let emptied = execute_graphql(&schema, saved_query, None, claims).await;
    assert_eq!(emptied.data.into_json().unwrap()["savedPrayers"], json!([]));
}

#[tokio::test]
async fn test_answer_round_trip() {
    let (store, state) = setup_test_state();
    let schema = build_schema(state.clone());
    let id = prayer_node_id(&state, 2);
    let claims = Some(claims_for(RICH, "member"));

    let response = execute_graphql(
        &schema,
        r#"mutation Answer($id: ID!) { answerPrayer(id: $id, answer: "X") { answer } }"#,
        Some(Variables::from_json(json!({ "id": id }))),
        claims.clone(),
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(response.data.into_json().unwrap()["answerPrayer"]["answer"], "X");
    assert_eq!(store.prayer(2).unwrap().answer.as_deref(), Some("X"));

    let response = execute_graphql(
        &schema,
        INTERACT,
        interact_vars(&id, "REMOVE_ANSWER"),
        claims.clone(),
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(response.data.into_json().unwrap()["interactWithPrayer"]["answer"], json!(null));

    // Nothing left to remove
    let again = execute_graphql(
        &schema,
        INTERACT,
        interact_vars(&id, "REMOVE_ANSWER"),
        claims,
    )
    .await;
    assert!(again.errors.is_empty(), "{:?}", again.errors);
    assert_eq!(again.data.into_json().unwrap()["interactWithPrayer"]["answer"], json!(null));
    assert_eq!(store.prayer(2).unwrap().answer, None);
}

#[tokio::test]
async fn test_answer_requires_owner_or_moderator() {
    let (_store, state) = setup_test_state();
    let schema = build_schema(state.clone());
    let query = r#"mutation Answer($id: ID!) { answerPrayer(id: $id, answer: "Done") { answer } }"#;
    let vars = || Some(Variables::from_json(json!({ "id": prayer_node_id(&state, 1) })));

    let stranger = execute_graphql(&schema, query, vars(), Some(claims_for(RICH, "member"))).await;
    assert_eq!(error_code(&stranger).as_deref(), Some("UNAUTHORIZED"));

    let moderator =
        execute_graphql(&schema, query, vars(), Some(claims_for(MODERATOR, "moderator"))).await;
    assert!(moderator.errors.is_empty(), "{:?}", moderator.errors);
    assert_eq!(moderator.data.into_json().unwrap()["answerPrayer"]["answer"], "Done");
}

#[tokio::test]
async fn test_delete_hides_request_and_repeats_safely() {
    let (store, state) = setup_test_state();
    let schema = build_schema(state.clone());
    let id = prayer_node_id(&state, 1);

    let stranger = execute_graphql(
        &schema,
        INTERACT,
        interact_vars(&id, "DELETE"),
        Some(claims_for(RICH, "member")),
    )
    .await;
    assert_eq!(error_code(&stranger).as_deref(), Some("UNAUTHORIZED"));

    let owner = Some(claims_for(ISAAC, "member"));
    for _ in 0..2 {
        let response = execute_graphql(
            &schema,
            INTERACT,
            interact_vars(&id, "DELETE"),
            owner.clone(),
        )
        .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
    }
    assert!(!store.prayer(1).unwrap().is_active);

    let feed = execute_graphql(&schema, r#"query { prayers { id } }"#, None, None).await;
    assert_eq!(
        feed.data.into_json().unwrap()["prayers"],
        json!([{ "id": prayer_node_id(&state, 3) }])
    );

    let lookup = execute_graphql(
        &schema,
        r#"query Prayer($id: ID!) { prayer(id: $id) { id } }"#,
        Some(Variables::from_json(json!({ "id": id }))),
        owner.clone(),
    )
    .await;
    assert_eq!(error_code(&lookup).as_deref(), Some("NOT_FOUND"));

    let flag = execute_graphql(&schema, INTERACT, interact_vars(&id, "FLAG"), owner).await;
    assert_eq!(error_code(&flag).as_deref(), Some("NOT_FOUND"));
}

#[tokio::test]
async fn test_deprecated_mutations_match_interact() {
    let (store, state) = setup_test_state();
    let schema = build_schema(state.clone());
    let id = prayer_node_id(&state, 3);
    let claims = Some(claims_for(ISAAC, "member"));

    let saved = execute_graphql(
        &schema,
        r#"mutation Save($nodeId: ID!) { savePrayer(nodeId: $nodeId) { id isSaved prayerCount } }"#,
        node_vars(&id),
        claims.clone(),
    )
    .await;
    assert!(saved.errors.is_empty(), "{:?}", saved.errors);
    let via_interact = execute_graphql(
        &schema,
        r#"mutation Save($id: ID!) {
            interactWithPrayer(id: $id, action: SAVE) { id isSaved prayerCount }
        }"#,
        Some(Variables::from_json(json!({ "id": id }))),
        claims.clone(),
    )
    .await;
    assert_eq!(
        saved.data.into_json().unwrap()["savePrayer"],
        via_interact.data.into_json().unwrap()["interactWithPrayer"]
    );

    let flagged = execute_graphql(
        &schema,
        r#"mutation Flag($nodeId: ID!) { flagPrayer(nodeId: $nodeId) { flagCount } }"#,
        node_vars(&id),
        claims.clone(),
    )
    .await;
    assert_eq!(flagged.data.into_json().unwrap()["flagPrayer"]["flagCount"], 1);

    let incremented = execute_graphql(
        &schema,
        r#"mutation Pray($nodeId: ID!) { incrementPrayerCount(nodeId: $nodeId) { prayerCount } }"#,
        node_vars(&id),
        claims.clone(),
    )
    .await;
    assert_eq!(incremented.data.into_json().unwrap()["incrementPrayerCount"]["prayerCount"], 3);

    let unsaved = execute_graphql(
        &schema,
        r#"mutation Unsave($nodeId: ID!) { unSavePrayer(nodeId: $nodeId) { isSaved } }"#,
        node_vars(&id),
        claims,
    )
    .await;
    assert_eq!(unsaved.data.into_json().unwrap()["unSavePrayer"]["isSaved"], false);

    let deleted = execute_graphql(
        &schema,
        r#"mutation Delete($nodeId: ID!) { deletePrayer(nodeId: $nodeId) { id } }"#,
        node_vars(&id),
        Some(claims_for(RICH, "member")),
    )
    .await;
    assert!(deleted.errors.is_empty(), "{:?}", deleted.errors);
    assert!(!store.prayer(3).unwrap().is_active);
}

#[tokio::test]
async fn test_interactions_require_sign_in() {
    let (_store, state) = setup_test_state();
    let schema = build_schema(state.clone());

    let response = execute_graphql(
        &schema,
        INTERACT,
        interact_vars(&prayer_node_id(&state, 1), "INCREMENT"),
        None,
    )
    .await;
    assert_eq!(error_code(&response).as_deref(), Some("UNAUTHORIZED"));
}

#[tokio::test]
async fn test_private_request_interactions_are_owner_only() {
    let (_store, state) = setup_test_state();
    let schema = build_schema(state.clone());

    let response = execute_graphql(
        &schema,
        INTERACT,
        interact_vars(&prayer_node_id(&state, 2), "SAVE"),
        Some(claims_for(ISAAC, "member")),
    )
    .await;
    assert_eq!(error_code(&response).as_deref(), Some("UNAUTHORIZED"));
}

#[tokio::test]
async fn test_disabled_actions_are_rejected() {
    let (store, state) = setup_test_state_with(config_with(&[("PRAYER_DISABLED_ACTIONS", "flag")]));
    let schema = build_schema(state.clone());
    let id = prayer_node_id(&state, 1);
    let claims = Some(claims_for(RICH, "member"));

    let unified = execute_graphql(
        &schema,
        INTERACT,
        interact_vars(&id, "FLAG"),
        claims.clone(),
    )
    .await;
    assert_eq!(error_code(&unified).as_deref(), Some("INVALID_ACTION"));

    let deprecated = execute_graphql(
        &schema,
        r#"mutation Flag($nodeId: ID!) { flagPrayer(nodeId: $nodeId) { flagCount } }"#,
        node_vars(&id),
        claims.clone(),
    )
    .await;
    assert_eq!(error_code(&deprecated).as_deref(), Some("INVALID_ACTION"));
    assert_eq!(store.prayer(1).unwrap().flag_count, 0);

    let other = execute_graphql(&schema, INTERACT, interact_vars(&id, "INCREMENT"), claims).await;
    assert!(other.errors.is_empty(), "{:?}", other.errors);
}

#[tokio::test]
async fn test_unknown_action_fails_validation() {
    let (_store, state) = setup_test_state();
    let schema = build_schema(state.clone());

    let response = execute_graphql(
        &schema,
        INTERACT,
        interact_vars(&prayer_node_id(&state, 1), "PRAISE"),
        Some(claims_for(ISAAC, "member")),
    )
    .await;
    assert!(!response.errors.is_empty());
}
