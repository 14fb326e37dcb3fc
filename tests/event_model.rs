use chrono::{NaiveDate, NaiveDateTime};
use timefield::record::MethodPreparser;
use timefield::{
    FieldErrorKind, FieldOptions, FieldStates, NaturalParser, ParserKind, Preparser,
    TimeFieldError, TimeFields, TimeRecord,
};

/// A host model with its own typed columns.
#[derive(Debug, Default)]
struct Event {
    starts_at: Option<NaiveDateTime>,
    ends_at: Option<NaiveDateTime>,
    states: FieldStates,
}

impl Event {
    fn european(&self, text: &str) -> String {
        // "01.03.2024 09:30" -> "2024-03-01 09:30"
        let mut parts = text.splitn(2, ' ');
        let date = parts.next().unwrap_or_default();
        let time = parts.next().unwrap_or_default();
        let ymd: Vec<&str> = date.split('.').rev().collect();
        format!("{} {}", ymd.join("-"), time).trim().to_string()
    }
}

impl TimeRecord for Event {
    fn read_time(&self, attr: &str) -> Option<NaiveDateTime> {
        match attr {
            "starts_at" => self.starts_at,
            "ends_at" => self.ends_at,
            _ => None,
        }
    }

    fn write_time(&mut self, attr: &str, value: Option<NaiveDateTime>) {
        match attr {
            "starts_at" => self.starts_at = value,
            "ends_at" => self.ends_at = value,
            _ => {}
        }
    }

    fn field_states(&self) -> &FieldStates {
        &self.states
    }

    fn field_states_mut(&mut self) -> &mut FieldStates {
        &mut self.states
    }

    fn preparser(name: &str) -> Option<MethodPreparser<Self>> {
        match name {
            "european" => Some(Event::european),
            _ => None,
        }
    }
}

fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, d)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn bounded_fields() -> TimeFields<Event> {
    let mut fields = TimeFields::new();
    fields
        .register(
            &["starts_at"],
            FieldOptions::new()
                .with_parser_kind(ParserKind::Strict)
                .with_allow_nil(false)
                .with_minimum(at(1, 0, 0))
                .with_maximum(at(10, 0, 0)),
        )
        .unwrap();
    fields
}

#[test]
fn unset_attribute_is_blank() {
    let fields = bounded_fields();
    let event = Event::default();

    let errors = fields.validate(&event);

    assert_eq!(errors.len(), 1);
    let error = errors.on("starts_at").unwrap();
    assert_eq!(error.kind, FieldErrorKind::Blank);
    assert_eq!(error.message, "can't be blank");
}

#[test]
fn garbage_is_invalid_and_keeps_value() {
    let fields = bounded_fields();
    let mut event = Event {
        starts_at: Some(at(5, 9, 0)),
        ..Default::default()
    };

    fields
        .set_text(&mut event, "starts_at", Some("garbage"))
        .unwrap();

    assert_eq!(event.starts_at, Some(at(5, 9, 0)));
    assert_eq!(
        fields.text(&event, "starts_at").unwrap().as_deref(),
        Some("garbage")
    );
    let errors = fields.validate(&event);
    let error = errors.on("starts_at").unwrap();
    assert_eq!(error.kind, FieldErrorKind::InvalidFormat);
    assert_eq!(error.message, "is invalid");
}

#[test]
fn below_minimum_is_too_early_with_rendered_bound() {
    let fields = bounded_fields();
    let mut event = Event::default();

    fields
        .set_text(&mut event, "starts_at", Some("2024-02-29 23:59"))
        .unwrap();

    let errors = fields.validate(&event);
    let error = errors.on("starts_at").unwrap();
    assert_eq!(error.kind, FieldErrorKind::TooEarly);
    assert_eq!(error.message, "cannot be before 2024-03-01 00:00");
}

#[test]
fn exactly_maximum_is_too_late() {
    let fields = bounded_fields();
    let mut event = Event::default();

    fields
        .set_value(&mut event, "starts_at", Some(at(10, 0, 0)))
        .unwrap();

    let errors = fields.validate(&event);
    let error = errors.on("starts_at").unwrap();
    assert_eq!(error.kind, FieldErrorKind::TooLate);
    assert_eq!(error.message, "cannot be on or after 2024-03-10 00:00");
}

#[test]
fn value_within_bounds_is_valid() {
    let fields = bounded_fields();
    for value in [at(1, 0, 0), at(5, 12, 0), at(9, 23, 59)] {
        let mut event = Event::default();
        fields.set_value(&mut event, "starts_at", Some(value)).unwrap();
        assert!(fields.validate(&event).is_empty(), "{value}");
    }
}

#[test]
fn text_survives_until_value_is_set_directly() {
    let fields = bounded_fields();
    let mut event = Event::default();

    fields
        .set_text(&mut event, "starts_at", Some("2024-03-05T09:00:00"))
        .unwrap();
    assert_eq!(event.starts_at, Some(at(5, 9, 0)));
    assert_eq!(
        fields.text(&event, "starts_at").unwrap().as_deref(),
        Some("2024-03-05T09:00:00")
    );

    fields
        .set_value(&mut event, "starts_at", Some(at(6, 9, 0)))
        .unwrap();
    assert_eq!(
        fields.text(&event, "starts_at").unwrap().as_deref(),
        Some("2024-03-06 09:00")
    );
}

#[test]
fn correcting_bad_input_clears_the_error() {
    let fields = bounded_fields();
    let mut event = Event::default();

    fields
        .set_text(&mut event, "starts_at", Some("not a date"))
        .unwrap();
    assert!(!fields.validate(&event).is_empty());

    fields
        .set_text(&mut event, "starts_at", Some("2024-03-05 09:00"))
        .unwrap();
    assert!(fields.validate(&event).is_empty());
}

#[test]
fn named_preparser_is_resolved_on_the_model() {
    let mut fields = TimeFields::<Event>::new();
    fields
        .register(
            &["starts_at", "ends_at"],
            FieldOptions::new()
                .with_parser_kind(ParserKind::Strict)
                .with_preparser(Preparser::Method("european".into())),
        )
        .unwrap();
    let mut event = Event::default();

    fields
        .set_text(&mut event, "ends_at", Some("05.03.2024 17:45"))
        .unwrap();

    assert_eq!(event.ends_at, Some(at(5, 17, 45)));
    assert_eq!(event.starts_at, None);
}

#[test]
fn unknown_preparser_fails_registration() {
    let mut fields = TimeFields::<Event>::new();
    let err = fields
        .register(
            &["starts_at"],
            FieldOptions::new().with_preparser(Preparser::Method("american".into())),
        )
        .unwrap_err();

    assert!(matches!(err, TimeFieldError::UnknownPreparser(_)));
    assert!(fields.is_empty());
}

#[test]
fn natural_language_input() {
    let mut fields = TimeFields::<Event>::new();
    fields
        .register(
            &["starts_at", "ends_at"],
            FieldOptions::new().with_parser(NaturalParser::at(at(6, 10, 15))),
        )
        .unwrap();
    let mut event = Event::default();

    fields
        .set_text(&mut event, "starts_at", Some("tomorrow at 9am"))
        .unwrap();
    fields
        .set_text(&mut event, "ends_at", Some("in 3 hours"))
        .unwrap();

    assert_eq!(event.starts_at, Some(at(7, 9, 0)));
    assert_eq!(event.ends_at, Some(at(6, 13, 15)));
    assert!(fields.validate(&event).is_empty());
}

#[test]
fn options_file_drives_registration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("event.json");
    std::fs::write(
        &path,
        r#"{
            "format": "%d.%m.%Y %H:%M",
            "allowNil": false,
            "maximum": "2024-03-10T00:00:00",
            "tooLate": "must end before %s",
            "parser": "strict",
            "preparser": "european"
        }"#,
    )
    .unwrap();

    let options = FieldOptions::load(&path).unwrap();
    let mut fields = TimeFields::<Event>::new();
    fields.register(&["ends_at"], options).unwrap();
    let mut event = Event::default();

    fields
        .set_text(&mut event, "ends_at", Some("12.03.2024 08:00"))
        .unwrap();

    let errors = fields.validate(&event);
    assert_eq!(
        errors.full_messages(),
        vec!["ends_at must end before 10.03.2024 00:00"]
    );
}
