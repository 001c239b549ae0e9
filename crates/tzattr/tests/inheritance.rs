mod common;

use common::columns;
use std::sync::Arc;
use tzattr::{
    GlobalConfig, MemoryDeprecations, ModelHierarchy, PolicyConfig, Settings, TypeTag, Value,
    TIME_ZONE_CONVERSION,
};

fn hierarchy() -> ModelHierarchy {
    let global = GlobalConfig {
        time_zone_aware_attributes: true,
        ..Default::default()
    };
    ModelHierarchy::new(global, PolicyConfig::default())
}

fn decorated(models: &ModelHierarchy, class: tzattr::ClassId, name: &str) -> bool {
    models
        .attribute(class, name)
        .unwrap()
        .is_decorated_with(TIME_ZONE_CONVERSION)
}

#[test]
fn test_subclass_exclusions_do_not_leak_to_parent() {
    let mut models = hierarchy();
    let a = models.derive(models.root(), "A").unwrap();
    models.load_schema(a, columns()).unwrap();

    let b = models.derive(a, "B").unwrap();
    models.policy_mut(b).unwrap().skip_attribute("started_at");
    models.load_schema(b, columns()).unwrap();

    assert!(decorated(&models, a, "started_at"));
    assert!(!decorated(&models, b, "started_at"));

    // A re-resolving its schema still evaluates its own policy.
    models.load_schema(a, columns()).unwrap();
    assert!(decorated(&models, a, "started_at"));
}

#[test]
fn test_parent_edits_after_derivation_do_not_reach_child() {
    let mut models = hierarchy();
    let a = models.derive(models.root(), "A").unwrap();
    let b = models.derive(a, "B").unwrap();

    models
        .policy_mut(a)
        .unwrap()
        .set_allowed_types([TypeTag::Integer]);
    models.load_schema(a, columns()).unwrap();
    models.load_schema(b, columns()).unwrap();

    assert!(!decorated(&models, a, "started_at"));
    assert!(decorated(&models, a, "attempts"));
    assert!(decorated(&models, b, "started_at"));
    assert!(!decorated(&models, b, "attempts"));
}

#[test]
fn test_rederive_picks_up_parent_edits_without_stacking() {
    let mut models = hierarchy();
    let a = models.derive(models.root(), "A").unwrap();
    let b = models.derive(a, "B").unwrap();

    models.policy_mut(a).unwrap().skip_attribute("created_at");
    models.rederive(b).unwrap();
    models.rederive(b).unwrap();
    models.load_schema(b, columns()).unwrap();

    assert_eq!(models.decorations(b).unwrap().len(), 1);
    assert!(!decorated(&models, b, "created_at"));
    assert_eq!(
        models.attribute(b, "started_at").unwrap().decorations,
        vec![TIME_ZONE_CONVERSION]
    );
}

#[test]
fn test_root_settings_flow_into_every_subclass() {
    let settings = Settings {
        time_zone_aware_attributes: true,
        default_timezone: "+01:00".to_string(),
        skip_time_zone_conversion_for_attributes: vec!["created_at".to_string()],
        ..Default::default()
    };
    let sink = Arc::new(MemoryDeprecations::new());
    let mut models = settings.hierarchy().unwrap().with_deprecations(sink.clone());
    let a = models.derive(models.root(), "A").unwrap();
    let b = models.derive(a, "B").unwrap();
    models.load_schema(b, columns()).unwrap();

    assert!(!decorated(&models, b, "created_at"));
    let value = models
        .read_attribute(b, "started_at", Value::Text("2024-03-01 08:00:00".into()))
        .unwrap();
    assert_eq!(
        value.as_datetime().unwrap().to_rfc3339(),
        "2024-03-01T09:00:00+01:00"
    );
    assert!(sink.is_empty());
}
