//! Request validation
//!
//! Turns a raw JSON body into a typed record. Presence and type of every field
//! are checked first, in declared order; then physical ranges (irradiation,
//! ambient temperature, module temperature, first violation wins); then
//! calendar ranges; then the timestamp is parsed.

use std::ops::RangeInclusive;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use super::error::{PipelineError, RangeViolation, ValidationError};

pub const IRRADIATION_RANGE: RangeInclusive<f64> = 0.0..=1500.0;
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = -50.0..=100.0;
pub const HOUR_RANGE: RangeInclusive<i64> = 0..=23;
pub const DAY_RANGE: RangeInclusive<i64> = 1..=31;
pub const MONTH_RANGE: RangeInclusive<i64> = 1..=12;

/// Validated generation request (environment + timestamp)
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationInput {
    /// Timestamp exactly as received, echoed back in the response
    pub raw_time: String,
    pub timestamp: NaiveDateTime,
    pub irradiation: f64,
    pub ambient_temp: f64,
    pub module_temp: f64,
}

/// Validated source-keyed request (environment + calendar + source)
#[derive(Debug, Clone, PartialEq)]
pub struct SourceInput {
    pub ambient_temp: f64,
    pub module_temp: f64,
    pub irradiation: f64,
    pub calendar: CalendarFields,
    pub source_key: String,
}

/// Validated consumption request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsumptionInput {
    pub calendar: CalendarFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFields {
    pub hour: u32,
    pub day: u32,
    pub month: u32,
}

pub fn validate_generation(raw: &Value) -> Result<GenerationInput, PipelineError> {
    let fields = object(raw)?;
    let raw_time = text(fields, "dateTime")?.to_string();
    let irradiation = real(fields, "irradiation")?;
    let ambient_temp = real(fields, "ambientTemp")?;
    let module_temp = real(fields, "moduleTemp")?;

    check_environment(irradiation, ambient_temp, module_temp)?;
    let timestamp = parse_timestamp(&raw_time)?;

    Ok(GenerationInput {
        raw_time,
        timestamp,
        irradiation,
        ambient_temp,
        module_temp,
    })
}

pub fn validate_source(raw: &Value) -> Result<SourceInput, PipelineError> {
    let fields = object(raw)?;
    let ambient_temp = real(fields, "ambient_temp")?;
    let module_temp = real(fields, "module_temp")?;
    let irradiation = real(fields, "irradiation")?;
    let calendar = calendar_fields(fields)?;
    let source_key = text(fields, "source_key")?.to_string();

    check_environment(irradiation, ambient_temp, module_temp)?;
    let calendar = check_calendar(calendar)?;

    Ok(SourceInput {
        ambient_temp,
        module_temp,
        irradiation,
        calendar,
        source_key,
    })
}

pub fn validate_consumption(raw: &Value) -> Result<ConsumptionInput, PipelineError> {
    let fields = object(raw)?;
    let calendar = check_calendar(calendar_fields(fields)?)?;
    Ok(ConsumptionInput { calendar })
}

/// Parse an ISO-8601-like timestamp; `T` or a space separates date and time
///
/// A trailing offset (`Z`, `+02:00`) is accepted and the wall-clock time kept.
/// An hour without minutes means the top of that hour; a bare date means midnight.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, PipelineError> {
    let normalized = normalize_timestamp(raw);
    let invalid = |detail: String| ValidationError::InvalidTimestamp {
        raw: raw.to_string(),
        detail,
    };

    let mut first_err = None;
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        match NaiveDateTime::parse_from_str(&normalized, fmt) {
            Ok(dt) => return Ok(dt),
            Err(e) => {
                first_err.get_or_insert(e);
            }
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, fmt) {
            return Ok(dt.naive_local());
        }
    }
    // Hour-only time of day, e.g. `2024-06-01T12`
    if let Ok(dt) = NaiveDateTime::parse_from_str(&format!("{normalized}:00"), "%Y-%m-%d %H:%M") {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }

    let detail = first_err
        .map(|e| e.to_string())
        .unwrap_or_else(|| "unrecognized format".to_string());
    Err(invalid(detail).into())
}

fn normalize_timestamp(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut normalized = trimmed.replacen('T', " ", 1);
    if normalized.ends_with('Z') {
        normalized.pop();
        normalized.push_str("+00:00");
    }
    normalized
}

fn check_environment(irradiation: f64, ambient_temp: f64, module_temp: f64) -> Result<(), PipelineError> {
    if !IRRADIATION_RANGE.contains(&irradiation) {
        return Err(RangeViolation::Irradiation.into());
    }
    if !TEMPERATURE_RANGE.contains(&ambient_temp) {
        return Err(RangeViolation::AmbientTemperature.into());
    }
    if !TEMPERATURE_RANGE.contains(&module_temp) {
        return Err(RangeViolation::ModuleTemperature.into());
    }
    Ok(())
}

fn calendar_fields(fields: &Map<String, Value>) -> Result<(i64, i64, i64), PipelineError> {
    Ok((
        integer(fields, "hour")?,
        integer(fields, "day")?,
        integer(fields, "month")?,
    ))
}

fn check_calendar((hour, day, month): (i64, i64, i64)) -> Result<CalendarFields, PipelineError> {
    if !HOUR_RANGE.contains(&hour) {
        return Err(RangeViolation::Hour.into());
    }
    if !DAY_RANGE.contains(&day) {
        return Err(RangeViolation::Day.into());
    }
    if !MONTH_RANGE.contains(&month) {
        return Err(RangeViolation::Month.into());
    }
    // Ranges above keep every value within u32.
    Ok(CalendarFields {
        hour: hour as u32,
        day: day as u32,
        month: month as u32,
    })
}

fn object(raw: &Value) -> Result<&Map<String, Value>, ValidationError> {
    raw.as_object().ok_or(ValidationError::NotAnObject)
}

fn present<'a>(fields: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value, ValidationError> {
    match fields.get(name) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(name)),
        Some(v) => Ok(v),
    }
}

/// JSON number or numeric string, finite
fn real(fields: &Map<String, Value>, name: &'static str) -> Result<f64, ValidationError> {
    let invalid = ValidationError::InvalidField {
        field: name,
        expected: "a real number",
    };
    let value = match present(fields, name)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite()).ok_or(invalid)
}

/// JSON integer, integral float or integer string
fn integer(fields: &Map<String, Value>, name: &'static str) -> Result<i64, ValidationError> {
    let invalid = ValidationError::InvalidField {
        field: name,
        expected: "an integer",
    };
    let value = match present(fields, name)? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    value.ok_or(invalid)
}

fn text<'a>(fields: &'a Map<String, Value>, name: &'static str) -> Result<&'a str, ValidationError> {
    match present(fields, name)? {
        Value::String(s) if !s.trim().is_empty() => Ok(s.as_str()),
        _ => Err(ValidationError::InvalidField {
            field: name,
            expected: "a non-empty string",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use rstest::rstest;
    use serde_json::json;

    fn generation(irradiation: Value, ambient: Value, module: Value) -> Value {
        json!({
            "dateTime": "2024-06-01T12:00",
            "irradiation": irradiation,
            "ambientTemp": ambient,
            "moduleTemp": module,
        })
    }

    fn range_error(v: RangeViolation) -> PipelineError {
        v.into()
    }

    #[test]
    fn test_valid_generation_request() {
        let input = validate_generation(&generation(json!(800), json!(30), json!(45))).unwrap();
        assert_eq!(input.irradiation, 800.0);
        assert_eq!(input.ambient_temp, 30.0);
        assert_eq!(input.module_temp, 45.0);
        assert_eq!(input.raw_time, "2024-06-01T12:00");
        assert_eq!(input.timestamp.hour(), 12);
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let input = validate_generation(&generation(json!("800.5"), json!(" 30 "), json!("-4"))).unwrap();
        assert_eq!(input.irradiation, 800.5);
        assert_eq!(input.ambient_temp, 30.0);
        assert_eq!(input.module_temp, -4.0);
    }

    #[rstest]
    #[case(json!(0), None)]
    #[case(json!(1500), None)]
    #[case(json!(-0.01), Some(RangeViolation::Irradiation))]
    #[case(json!(1500.01), Some(RangeViolation::Irradiation))]
    #[case(json!(2000), Some(RangeViolation::Irradiation))]
    fn test_irradiation_bounds(#[case] irradiation: Value, #[case] expected: Option<RangeViolation>) {
        let result = validate_generation(&generation(irradiation, json!(25), json!(30)));
        match expected {
            None => assert!(result.is_ok()),
            Some(v) => assert_eq!(result.unwrap_err(), range_error(v)),
        }
    }

    #[rstest]
    #[case(json!(-50), json!(100), None)]
    #[case(json!(-50.5), json!(30), Some(RangeViolation::AmbientTemperature))]
    #[case(json!(101), json!(30), Some(RangeViolation::AmbientTemperature))]
    #[case(json!(20), json!(-51), Some(RangeViolation::ModuleTemperature))]
    #[case(json!(20), json!(100.1), Some(RangeViolation::ModuleTemperature))]
    fn test_temperature_bounds(
        #[case] ambient: Value,
        #[case] module: Value,
        #[case] expected: Option<RangeViolation>,
    ) {
        let result = validate_generation(&generation(json!(500), ambient, module));
        match expected {
            None => assert!(result.is_ok()),
            Some(v) => assert_eq!(result.unwrap_err(), range_error(v)),
        }
    }

    #[test]
    fn test_first_range_violation_wins() {
        let err = validate_generation(&generation(json!(-1), json!(500), json!(500))).unwrap_err();
        assert_eq!(err, range_error(RangeViolation::Irradiation));

        let err = validate_generation(&generation(json!(10), json!(500), json!(500))).unwrap_err();
        assert_eq!(err, range_error(RangeViolation::AmbientTemperature));
    }

    #[test]
    fn test_range_checked_before_timestamp() {
        let mut body = generation(json!(2000), json!(25), json!(30));
        body["dateTime"] = json!("not a date");
        let err = validate_generation(&body).unwrap_err();
        assert_eq!(err, range_error(RangeViolation::Irradiation));
    }

    #[test]
    fn test_missing_and_invalid_fields() {
        let err = validate_generation(&json!({"dateTime": "2024-06-01 12:00", "irradiation": 1, "ambientTemp": 2}))
            .unwrap_err();
        assert_eq!(err.to_string(), "field 'moduleTemp' missing");

        let err = validate_generation(&generation(json!("bright"), json!(25), json!(30))).unwrap_err();
        assert_eq!(err.to_string(), "field 'irradiation' invalid: expected a real number");

        let err = validate_generation(&generation(json!(true), json!(25), json!(30))).unwrap_err();
        assert!(matches!(err, PipelineError::Validation(ValidationError::InvalidField { field: "irradiation", .. })));

        let err = validate_generation(&generation(json!("NaN"), json!(25), json!(30))).unwrap_err();
        assert!(matches!(err, PipelineError::Validation(ValidationError::InvalidField { .. })));

        let err = validate_generation(&generation(json!(null), json!(25), json!(30))).unwrap_err();
        assert_eq!(err.to_string(), "field 'irradiation' missing");
    }

    #[test]
    fn test_non_object_body() {
        let err = validate_generation(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err, PipelineError::Validation(ValidationError::NotAnObject));
    }

    #[rstest]
    #[case("2024-06-01T12:00", 12, 0)]
    #[case("2024-06-01 12:30", 12, 30)]
    #[case("2024-06-01T23:59:59", 23, 59)]
    #[case("2024-06-01 06:15:00.250", 6, 15)]
    #[case("2024-06-01T08:45:00+02:00", 8, 45)]
    #[case("2024-06-01T08:45Z", 8, 45)]
    #[case("2024-06-01", 0, 0)]
    #[case("2024-06-01T12", 12, 0)]
    #[case("2024-06-01 07", 7, 0)]
    fn test_timestamp_shapes(#[case] raw: &str, #[case] hour: u32, #[case] minute: u32) {
        let dt = parse_timestamp(raw).unwrap();
        assert_eq!((dt.hour(), dt.minute()), (hour, minute));
    }

    #[rstest]
    #[case("yesterday")]
    #[case("2024-06-01T24:00")]
    #[case("2024-06-01T12:60")]
    #[case("2024-13-01T12:00")]
    #[case("01/06/2024 12:00")]
    #[case("2024-06-01T25")]
    fn test_timestamp_rejections(#[case] raw: &str) {
        let err = parse_timestamp(raw).unwrap_err();
        match err {
            PipelineError::Validation(ValidationError::InvalidTimestamp { raw: echoed, detail }) => {
                assert_eq!(echoed, raw);
                assert!(!detail.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn source(overrides: Value) -> Value {
        let mut body = json!({
            "ambient_temp": 25.0,
            "module_temp": 40.0,
            "irradiation": 0.6,
            "hour": 12,
            "day": 15,
            "month": 5,
            "source_key": "1BY6WEcLGh8j5v7",
        });
        if let (Some(base), Some(extra)) = (body.as_object_mut(), overrides.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        body
    }

    #[test]
    fn test_valid_source_request() {
        let input = validate_source(&source(json!({}))).unwrap();
        assert_eq!(input.calendar, CalendarFields { hour: 12, day: 15, month: 5 });
        assert_eq!(input.source_key, "1BY6WEcLGh8j5v7");
        assert_eq!(input.irradiation, 0.6);
    }

    #[rstest]
    #[case(json!({"hour": 24}), "Hour should be between 0-23")]
    #[case(json!({"day": 0}), "Day should be between 1-31")]
    #[case(json!({"month": 13}), "Month should be between 1-12")]
    #[case(json!({"hour": 5.5}), "field 'hour' invalid: expected an integer")]
    #[case(json!({"source_key": ""}), "field 'source_key' invalid: expected a non-empty string")]
    #[case(json!({"source_key": 17}), "field 'source_key' invalid: expected a non-empty string")]
    #[case(json!({"irradiation": 1600, "hour": 99}), "Irradiation should be between 0-1500 W/m²")]
    #[case(json!({"ambient_temp": 101}), "Ambient temperature out of range")]
    #[case(json!({"ambient_temp": -50.5}), "Ambient temperature out of range")]
    #[case(json!({"module_temp": 100.5}), "Module temperature out of range")]
    #[case(json!({"module_temp": -51, "ambient_temp": 200}), "Ambient temperature out of range")]
    #[case(json!({"module_temp": -51, "month": 0}), "Module temperature out of range")]
    fn test_source_rejections(#[case] overrides: Value, #[case] message: &str) {
        let err = validate_source(&source(overrides)).unwrap_err();
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn test_integer_coercion() {
        let input = validate_source(&source(json!({"hour": "7", "day": 3.0}))).unwrap();
        assert_eq!(input.calendar.hour, 7);
        assert_eq!(input.calendar.day, 3);
    }

    #[test]
    fn test_consumption_request() {
        let input = validate_consumption(&json!({"hour": 0, "day": 31, "month": 12})).unwrap();
        assert_eq!(input.calendar, CalendarFields { hour: 0, day: 31, month: 12 });

        let err = validate_consumption(&json!({"hour": 0, "month": 12})).unwrap_err();
        assert_eq!(err.to_string(), "field 'day' missing");
    }
}
