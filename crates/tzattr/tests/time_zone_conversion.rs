mod common;

use common::{columns, DateTimeColumn};
use serde_json::json;
use std::sync::Arc;
use tzattr::{
    CanonicalZone, Converter, GlobalConfig, MemoryDeprecations, ModelHierarchy, PolicyConfig,
    TemporalConverter, TypeTag, UntypedInputPolicy, UserInput, Value, TIME_ZONE_CONVERSION,
};

fn setup(zone: &str) -> (ModelHierarchy, tzattr::ClassId) {
    let global = GlobalConfig {
        time_zone_aware_attributes: true,
        default_timezone: CanonicalZone::parse(zone).unwrap(),
        untyped_input: UntypedInputPolicy::Delegate,
    };
    let policy = PolicyConfig::new(Vec::<String>::new(), [TypeTag::DateTime]);
    let mut models = ModelHierarchy::new(global, policy)
        .with_deprecations(Arc::new(MemoryDeprecations::new()));
    let job = models.derive(models.root(), "Job").unwrap();
    models.load_schema(job, columns()).unwrap();
    (models, job)
}

#[test]
fn test_user_input_with_offset_lands_in_canonical_zone() {
    let (models, job) = setup("UTC");

    let value = models
        .write_attribute(job, "started_at", "2024-03-01T10:00:00+02:00".into())
        .unwrap();

    let dt = value.as_datetime().unwrap();
    assert_eq!(dt.to_rfc3339(), "2024-03-01T08:00:00+00:00");
    assert_eq!(dt.format("%Y-%m-%dT%H:%M:%SZ").to_string(), "2024-03-01T08:00:00Z");
}

#[test]
fn test_storage_reads_are_shifted_into_zone() {
    let (models, job) = setup("+05:30");

    let value = models
        .read_attribute(job, "started_at", Value::Text("2024-03-01 08:00:00".into()))
        .unwrap();

    assert_eq!(
        value.as_datetime().unwrap().to_rfc3339(),
        "2024-03-01T13:30:00+05:30"
    );
}

#[test]
fn test_malformed_input_becomes_null() {
    let (models, job) = setup("UTC");

    let result = models.write_attribute(job, "started_at", "not-a-date".into());

    assert_eq!(result, Ok(Value::Null));
}

#[test]
fn test_non_temporal_attributes_are_untouched() {
    let (models, job) = setup("UTC");

    assert!(models.attribute(job, "attempts").unwrap().decorations.is_empty());
    assert_eq!(
        models.write_attribute(job, "attempts", "3".into()).unwrap(),
        Value::Integer(3)
    );
}

#[test]
fn test_json_form_arrays_keep_their_shape() {
    let (models, job) = setup("UTC");

    let input = UserInput::from_json(json!([
        "2024-03-01T10:00:00+02:00",
        "",
        ["2024-03-01 12:00"]
    ]));
    let value = models.write_attribute(job, "started_at", input).unwrap();

    let items = value.as_seq().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(
        items[0].as_datetime().unwrap().to_rfc3339(),
        "2024-03-01T08:00:00+00:00"
    );
    assert_eq!(items[1], Value::Null);
    assert_eq!(
        items[2].as_seq().unwrap()[0].as_datetime().unwrap().to_rfc3339(),
        "2024-03-01T12:00:00+00:00"
    );
}

#[test]
fn test_excluded_attribute_keeps_base_behavior() {
    let global = GlobalConfig {
        time_zone_aware_attributes: true,
        default_timezone: CanonicalZone::parse("+02:00").unwrap(),
        ..Default::default()
    };
    let mut models = ModelHierarchy::new(global, PolicyConfig::default());
    let job = models.derive(models.root(), "Job").unwrap();
    models.policy_mut(job).unwrap().skip_attribute("created_at");
    models.load_schema(job, columns()).unwrap();

    assert!(models
        .attribute(job, "started_at")
        .unwrap()
        .is_decorated_with(TIME_ZONE_CONVERSION));
    assert!(!models
        .attribute(job, "created_at")
        .unwrap()
        .is_decorated_with(TIME_ZONE_CONVERSION));

    let raw = Value::Text("2024-03-01 08:00:00".into());
    assert_eq!(
        models
            .read_attribute(job, "created_at", raw.clone())
            .unwrap()
            .as_datetime()
            .unwrap()
            .to_rfc3339(),
        "2024-03-01T08:00:00+00:00"
    );
    assert_eq!(
        models
            .read_attribute(job, "started_at", raw)
            .unwrap()
            .as_datetime()
            .unwrap()
            .to_rfc3339(),
        "2024-03-01T10:00:00+02:00"
    );
}

#[test]
fn test_decorator_composes_with_any_converter() {
    let converter = TemporalConverter::new(
        Box::new(DateTimeColumn),
        CanonicalZone::parse("-03:00").unwrap(),
        UntypedInputPolicy::Drop,
    );

    assert_eq!(converter.type_tag(), TypeTag::DateTime);
    assert_eq!(
        converter.from_user_input(UserInput::Other(Value::Integer(1))),
        Ok(Value::Null)
    );
    let read = converter
        .from_storage(Value::Text("2024-03-01T08:00:00Z".into()))
        .unwrap();
    assert_eq!(
        read.as_datetime().unwrap().to_rfc3339(),
        "2024-03-01T05:00:00-03:00"
    );
    assert_eq!(converter.from_storage(read.clone()).unwrap(), read);
}
