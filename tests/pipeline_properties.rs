mod common;

use proptest::prelude::*;
use serde_json::json;
use solar_inference::ml::{InferenceEngine, PostProcessing, Variant};
use solar_inference::pipeline::{self, features::encode_cyclical, PredictionResponse};

use common::{consumption_artifact, generation_artifact};

const IRRADIATION_ERROR: &str = "Irradiation should be between 0-1500 W/m²";

fn generation_engine() -> InferenceEngine {
    InferenceEngine::new(Variant::Generation, generation_artifact(), PostProcessing::default()).unwrap()
}

fn error_of(response: &PredictionResponse) -> Option<String> {
    match response {
        PredictionResponse::Error(body) => Some(body.error.clone()),
        _ => None,
    }
}

proptest! {
    #[test]
    fn irradiation_in_range_is_accepted(
        irradiation in 0.0f64..=1500.0,
        ambient in -50.0f64..=100.0,
        module in -50.0f64..=100.0,
        hour in 0u32..24,
        minute in 0u32..60,
    ) {
        let engine = generation_engine();
        let body = json!({
            "dateTime": format!("2024-06-01 {hour:02}:{minute:02}:00"),
            "irradiation": irradiation,
            "ambientTemp": ambient,
            "moduleTemp": module,
        });
        let response = pipeline::predict_generation(&engine, &body);
        prop_assert_eq!(error_of(&response), None);
    }

    #[test]
    fn irradiation_out_of_range_is_rejected(
        irradiation in prop_oneof![-1.0e6f64..-1.0e-9, 1500.000_001f64..1.0e6],
    ) {
        let engine = generation_engine();
        let body = json!({
            "dateTime": "2024-06-01T12:00",
            "irradiation": irradiation,
            "ambientTemp": 30,
            "moduleTemp": 45,
        });
        let response = pipeline::predict_generation(&engine, &body);
        prop_assert_eq!(error_of(&response), Some(IRRADIATION_ERROR.to_string()));
    }

    #[test]
    fn predictions_are_never_negative(irradiation in 0.0f64..=1500.0) {
        let engine = generation_engine();
        let body = json!({
            "dateTime": "2024-06-01T05:45",
            "irradiation": irradiation,
            "ambientTemp": 12,
            "moduleTemp": 10,
        });
        match pipeline::predict_generation(&engine, &body) {
            PredictionResponse::Generation(p) => prop_assert!(p.predicted_power >= 0.0),
            other => prop_assert!(false, "unexpected response {:?}", other),
        }
    }

    #[test]
    fn negative_load_is_clamped(hour in 0u32..24, day in 1u32..=31, month in 1u32..=12) {
        let engine = InferenceEngine::new(
            Variant::Consumption,
            consumption_artifact(true),
            PostProcessing::default(),
        )
        .unwrap();
        let body = json!({"hour": hour, "day": day, "month": month});
        match pipeline::predict_consumption(&engine, &body) {
            PredictionResponse::Consumption(p) => prop_assert_eq!(p.predicted_load, 0.0),
            other => prop_assert!(false, "unexpected response {:?}", other),
        }
    }

    #[test]
    fn cyclical_encoding_lies_on_unit_circle(hour in 0u32..=24, minute in 0u32..=60) {
        let t = encode_cyclical(hour, minute);
        prop_assert!((t.hour_sin.powi(2) + t.hour_cos.powi(2) - 1.0).abs() < 1e-9);
        prop_assert!((t.minute_sin.powi(2) + t.minute_cos.powi(2) - 1.0).abs() < 1e-9);
    }
}
