//! End-to-end serialize/deserialize behaviour over a small game-account schema.

use std::sync::Arc;

use fieldspec::{
    deserialize, serialize, DeserializeError, FieldSpec, Instance, ModelType, SerializeError,
    ShapeError, Value,
};
use indexmap::IndexMap;

struct Schema {
    statistics: Arc<ModelType>,
    account: Arc<ModelType>,
    player: Arc<ModelType>,
}

fn schema() -> Schema {
    let statistics = ModelType::builder("Statistics")
        .field("level", FieldSpec::integer_range(0, 60).required())
        .field("xp_collected", FieldSpec::integer().required())
        .field("time_played", FieldSpec::float().nullable())
        .field(
            "achievements",
            FieldSpec::list_of(
                FieldSpec::string()
                    .required()
                    .allowed(["first wave", "lord of goats", "smeller of cheese"]),
            )
            .required()
            .max_length(50),
        )
        .field(
            "infractions",
            FieldSpec::dict(FieldSpec::string(), FieldSpec::integer())
                .required()
                .nullable(),
        )
        .build()
        .unwrap();

    let account = ModelType::builder("Account")
        .field(
            "username",
            FieldSpec::string().required().forbidden(["intxparts", "bob"]),
        )
        .field("stats", FieldSpec::object(&statistics).required())
        .build()
        .unwrap();

    let player = ModelType::builder("Player")
        .field("email", FieldSpec::string().required())
        .field(
            "accounts",
            FieldSpec::list_of(FieldSpec::object(&account).required()).required(),
        )
        .build()
        .unwrap();

    Schema {
        statistics,
        account,
        player,
    }
}

fn new_player(schema: &Schema, email: &str, username: &str) -> Instance {
    let stats = Instance::new(&schema.statistics)
        .with("level", 0)
        .unwrap()
        .with("xp_collected", 0)
        .unwrap()
        .with("time_played", 0.0)
        .unwrap()
        .with("achievements", Vec::<Value>::new())
        .unwrap()
        .with("infractions", Value::Null)
        .unwrap();

    let account = Instance::new(&schema.account)
        .with("username", username)
        .unwrap()
        .with("stats", stats)
        .unwrap();

    Instance::new(&schema.player)
        .with("email", email)
        .unwrap()
        .with("accounts", vec![Value::from(account)])
        .unwrap()
}

#[test]
fn test_player_round_trip() {
    let schema = schema();
    let player = new_player(&schema, "John Doe", "django");

    let text = serialize(&player).unwrap();
    assert_eq!(
        text,
        concat!(
            r#"{"email": "John Doe", "accounts": [{"username": "django", "stats": "#,
            r#"{"level": 0, "xp_collected": 0, "time_played": 0.0, "achievements": [], "#,
            r#""infractions": null}}]}"#
        )
    );

    let decoded = deserialize(&schema.player, &text).unwrap();
    assert_eq!(decoded, player);

    let account = decoded.get("accounts").unwrap().as_list().unwrap()[0]
        .as_object()
        .unwrap();
    assert!(Arc::ptr_eq(account.model_type(), &schema.account));
}

#[test]
fn test_nested_statistics_serialize_alone() {
    let schema = schema();
    let player = new_player(&schema, "John Doe", "django");
    let accounts = player.get("accounts").unwrap().as_list().unwrap();
    let stats = accounts[0].as_object().unwrap().get("stats").unwrap();

    assert_eq!(
        serialize(stats.as_object().unwrap()).unwrap(),
        concat!(
            r#"{"level": 0, "xp_collected": 0, "time_played": 0.0, "achievements": [], "#,
            r#""infractions": null}"#
        )
    );
}

#[test]
fn test_forbidden_username_blocks_serialization() {
    let schema = schema();
    let player = new_player(&schema, "John Doe", "bob");

    let err = match serialize(&player) {
        Err(SerializeError::Validation(err)) => err,
        other => panic!("expected a validation error, got {other:?}"),
    };
    assert_eq!(err.model, "Player");
    assert_eq!(err.errors, vec!["accounts[0].username value \"bob\" is forbidden"]);
}

#[test]
fn test_deserialize_collects_every_error() {
    let schema = schema();
    let text = r#"{
        "level": 61,
        "xp_collected": 1.5,
        "achievements": ["first wave", "smeller of feet"],
        "infractions": {"spam": "many"}
    }"#;

    let err = deserialize(&schema.statistics, text).unwrap_err();
    assert_eq!(
        err.validation_errors().unwrap(),
        &[
            "level must be between 0 and 60, found 61",
            "xp_collected must be of type integer, found float",
            "achievements[1] value \"smeller of feet\" is not allowed",
            "infractions[spam] must be of type integer, found string",
        ]
    );
}

#[test]
fn test_dict_round_trip() {
    let schema = schema();
    let mut infractions = IndexMap::new();
    infractions.insert("spam".to_string(), Value::from(2));
    infractions.insert("afk".to_string(), Value::from(7));

    let stats = Instance::new(&schema.statistics)
        .with("level", 5)
        .unwrap()
        .with("xp_collected", 1200)
        .unwrap()
        .with("achievements", vec![Value::from("lord of goats")])
        .unwrap()
        .with("infractions", infractions)
        .unwrap();

    let text = serialize(&stats).unwrap();
    assert!(text.ends_with(r#""infractions": {"spam": 2, "afk": 7}}"#));
    assert_eq!(deserialize(&schema.statistics, &text).unwrap(), stats);
}

#[test]
fn test_key_order_follows_insertion_not_declaration() {
    let schema = schema();
    let account = Instance::new(&schema.account)
        .with(
            "stats",
            Instance::new(&schema.statistics)
                .with("achievements", Vec::<Value>::new())
                .unwrap()
                .with("infractions", Value::Null)
                .unwrap()
                .with("xp_collected", 3)
                .unwrap()
                .with("level", 1)
                .unwrap(),
        )
        .unwrap()
        .with("username", "alice")
        .unwrap();

    let text = serialize(&account).unwrap();
    assert_eq!(
        text,
        concat!(
            r#"{"stats": {"achievements": [], "infractions": null, "xp_collected": 3, "level": 1}, "#,
            r#""username": "alice"}"#
        )
    );
    let names: Vec<String> = deserialize(&schema.account, &text)
        .unwrap()
        .attributes()
        .map(|(name, _)| name.to_string())
        .collect();
    assert_eq!(names, vec!["stats", "username"]);
}

#[test]
fn test_required_but_absent_fails_serialization() {
    let schema = schema();
    let account = Instance::new(&schema.account).with("username", "alice").unwrap();

    let validation = account.validate();
    assert_eq!(validation.errors(), &["stats is required"]);
    assert!(matches!(
        serialize(&account),
        Err(SerializeError::Validation(_))
    ));
}

#[test]
fn test_strict_model_rejects_unknown_attribute_on_deserialize() {
    let schema = schema();
    let err = deserialize(
        &schema.account,
        r#"{"username": "alice", "stats": null, "nickname": "al", "rank": 3}"#,
    )
    .unwrap_err();
    assert_eq!(
        err.validation_errors().unwrap(),
        &[
            "stats is not nullable",
            "nickname is not a field of Account",
            "rank is not a field of Account",
        ]
    );
}

#[test]
fn test_permissive_model_round_trips_unknown_attribute() {
    let model = ModelType::builder("Loose")
        .field("id", FieldSpec::integer().required())
        .allow_unknown_attributes(true)
        .build()
        .unwrap();

    let instance = Instance::new(&model)
        .with("id", 1)
        .unwrap()
        .with("note", "kept")
        .unwrap();
    assert!(instance.validate().is_valid());

    let text = serialize(&instance).unwrap();
    assert_eq!(text, r#"{"id": 1, "note": "kept"}"#);
    assert_eq!(deserialize(&model, &text).unwrap(), instance);
}

#[test]
fn test_heterogeneous_list_round_trip() {
    let model = ModelType::builder("Tagged")
        .field(
            "pair",
            FieldSpec::list([FieldSpec::integer(), FieldSpec::bool()]).required(),
        )
        .build()
        .unwrap();

    let instance = Instance::new(&model)
        .with("pair", vec![Value::from(4), Value::from(true)])
        .unwrap();
    let text = serialize(&instance).unwrap();
    assert_eq!(text, r#"{"pair": [4, true]}"#);
    assert_eq!(deserialize(&model, &text).unwrap(), instance);
}

#[test]
fn test_heterogeneous_list_arity_is_a_shape_fault() {
    let model = ModelType::builder("Tagged")
        .field("pair", FieldSpec::list([FieldSpec::integer(), FieldSpec::bool()]))
        .build()
        .unwrap();

    let err = deserialize(&model, r#"{"pair": [1, true, 2]}"#).unwrap_err();
    assert_eq!(
        err,
        DeserializeError::Shape(ShapeError::ArityMismatch {
            field: "pair".to_string(),
            expected: 2,
            actual: 3,
        })
    );
    assert!(err.validation_errors().is_none());
}

#[test]
fn test_lists_of_lists_of_objects_round_trip() {
    let point = ModelType::builder("Point")
        .field("x", FieldSpec::integer().required())
        .field("y", FieldSpec::integer().required())
        .build()
        .unwrap();
    let board = ModelType::builder("Board")
        .field(
            "rows",
            FieldSpec::list_of(FieldSpec::list_of(FieldSpec::object(&point))),
        )
        .field(
            "corners",
            FieldSpec::list([FieldSpec::object(&point), FieldSpec::object(&point)]),
        )
        .build()
        .unwrap();

    let p = |x: i64, y: i64| {
        Value::from(
            Instance::new(&point)
                .with("x", x)
                .unwrap()
                .with("y", y)
                .unwrap(),
        )
    };
    let instance = Instance::new(&board)
        .with(
            "rows",
            vec![
                Value::from(vec![p(0, 0), p(1, 0)]),
                Value::from(Vec::<Value>::new()),
                Value::from(vec![p(0, 2)]),
            ],
        )
        .unwrap()
        .with("corners", vec![p(0, 0), p(9, 9)])
        .unwrap();

    let text = serialize(&instance).unwrap();
    let decoded = deserialize(&board, &text).unwrap();
    assert_eq!(decoded, instance);

    let first = decoded.get("rows").unwrap().as_list().unwrap()[0]
        .as_list()
        .unwrap()[1]
        .as_object()
        .unwrap();
    assert!(Arc::ptr_eq(first.model_type(), &point));
    assert_eq!(first.get("x"), Some(&Value::Integer(1)));
}

#[test]
fn test_nested_object_errors_surface_on_deserialize() {
    let schema = schema();
    let text = r#"{"email": "a@b.c", "accounts": [{"username": "intxparts", "stats": 5}]}"#;
    let err = deserialize(&schema.player, text).unwrap_err();
    assert_eq!(
        err.validation_errors().unwrap(),
        &[
            "accounts[0].username value \"intxparts\" is forbidden",
            "accounts[0].stats must be of type Statistics, found integer",
        ]
    );
}

#[test]
fn test_top_level_must_be_object() {
    let schema = schema();
    assert!(matches!(
        deserialize(&schema.player, "[1, 2, 3]"),
        Err(DeserializeError::Shape(ShapeError::ExpectedObject { found: "array", .. }))
    ));
    assert!(matches!(
        deserialize(&schema.player, "not json"),
        Err(DeserializeError::Decode(_))
    ));
}

#[test]
fn test_extended_model_round_trips() {
    let schema = schema();
    let bot = ModelType::builder("BotStatistics")
        .extends(&schema.statistics)
        .field("servers_visited", FieldSpec::integer().required())
        .build()
        .unwrap();
    let bot_account = ModelType::builder("BotAccount")
        .extends(&schema.account)
        .field("stats", FieldSpec::object(&bot).required())
        .build()
        .unwrap();

    let stats = Instance::new(&bot)
        .with("level", 2)
        .unwrap()
        .with("xp_collected", 9)
        .unwrap()
        .with("achievements", Vec::<Value>::new())
        .unwrap()
        .with("infractions", Value::Null)
        .unwrap()
        .with("servers_visited", 4)
        .unwrap();
    let account = Instance::new(&bot_account)
        .with("username", "beep")
        .unwrap()
        .with("stats", stats.clone())
        .unwrap();
    assert!(account.validate().is_valid());

    let text = serialize(&account).unwrap();
    let decoded = deserialize(&bot_account, &text).unwrap();
    assert_eq!(decoded, account);
    let decoded_stats = decoded.get("stats").unwrap().as_object().unwrap();
    assert!(Arc::ptr_eq(decoded_stats.model_type(), &bot));

    // A field declared as Statistics holds exactly Statistics, so the
    // extended instance is refused before it could be written.
    let account = Instance::new(&schema.account)
        .with("username", "beep")
        .unwrap()
        .with("stats", stats)
        .unwrap();
    assert_eq!(
        account.validate().into_errors(),
        vec!["stats must be an instance of Statistics, found BotStatistics"]
    );
    assert!(matches!(
        serialize(&account),
        Err(SerializeError::Validation(_))
    ));
}
