//! Mapping of dynamb properties onto Agora sensor attributes.
//!
//! Each recognised dynamb property has exactly one [`AttributeMapping`]: the
//! Agora attribute key it is reported under and the function converting the
//! raw value. Properties without a mapping are never reported.

use serde_json::Value;

/// Largest magnitude at which every integer is exactly representable as `f64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// How one dynamb property is reported to Agora.
#[derive(Debug)]
pub struct AttributeMapping {
    /// Property name in the dynamb, e.g. `batteryPercentage`.
    pub property: &'static str,
    /// Attribute key in the Agora record, e.g. `battery-percentage`.
    pub attribute: &'static str,
    transform: fn(&Value) -> Value,
}

impl AttributeMapping {
    /// Converts a raw dynamb value into the attribute value.
    pub fn apply(&self, raw: &Value) -> Value {
        (self.transform)(raw)
    }
}

pub static ATTRIBUTE_MAPPINGS: [AttributeMapping; 9] = [
    AttributeMapping {
        property: "acceleration",
        attribute: "acceleration-g",
        transform: magnitude,
    },
    AttributeMapping {
        property: "angleOfRotation",
        attribute: "angle-degree",
        transform: passthrough,
    },
    AttributeMapping {
        property: "batteryPercentage",
        attribute: "battery-percentage",
        transform: hundredths,
    },
    AttributeMapping {
        property: "illuminance",
        attribute: "brightness-lux",
        transform: passthrough,
    },
    AttributeMapping {
        property: "isContactDetected",
        attribute: "switch",
        transform: any_detected,
    },
    AttributeMapping {
        property: "isMotionDetected",
        attribute: "activityDetection",
        transform: any_detected,
    },
    AttributeMapping {
        property: "pressure",
        attribute: "pressure-hpa",
        transform: hundredths,
    },
    AttributeMapping {
        property: "relativeHumidity",
        attribute: "humidity-percentage",
        transform: hundredths,
    },
    AttributeMapping {
        property: "temperature",
        attribute: "temperature-celsius",
        transform: passthrough,
    },
];

/// Looks up the mapping for a dynamb property.
pub fn mapping_for(property: &str) -> Option<&'static AttributeMapping> {
    ATTRIBUTE_MAPPINGS.iter().find(|m| m.property == property)
}

/// Encodes a computed number the way Agora expects it on the wire.
///
/// Integral values are written without a fraction (`45`, not `45.0`) and
/// non-finite values become `null`.
pub(crate) fn wire_number(value: f64) -> Value {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

fn passthrough(raw: &Value) -> Value {
    match raw {
        Value::Number(n) if n.is_f64() => n.as_f64().map_or(Value::Null, wire_number),
        other => other.clone(),
    }
}

fn hundredths(raw: &Value) -> Value {
    raw.as_f64()
        .map_or(Value::Null, |value| wire_number(value / 100.0))
}

/// Euclidean norm over all axes. Any non-numeric component poisons the result.
fn magnitude(raw: &Value) -> Value {
    let Some(axes) = raw.as_array() else {
        return Value::Null;
    };

    axes.iter()
        .map(|axis| axis.as_f64().map(|a| a * a))
        .sum::<Option<f64>>()
        .map_or(Value::Null, |sum| wire_number(sum.sqrt()))
}

fn any_detected(raw: &Value) -> Value {
    let detected = raw
        .as_array()
        .is_some_and(|flags| flags.iter().any(|f| f.as_bool() == Some(true)));
    Value::Bool(detected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apply(property: &str, raw: Value) -> Value {
        mapping_for(property)
            .unwrap_or_else(|| panic!("no mapping for {property}"))
            .apply(&raw)
    }

    #[test]
    fn every_property_has_a_distinct_attribute() {
        let mut attributes: Vec<_> = ATTRIBUTE_MAPPINGS.iter().map(|m| m.attribute).collect();
        attributes.sort_unstable();
        attributes.dedup();
        assert_eq!(attributes.len(), ATTRIBUTE_MAPPINGS.len());
    }

    #[test]
    fn acceleration_is_euclidean_norm() {
        assert_eq!(apply("acceleration", json!([3, 4, 0])), json!(5));
        assert_eq!(apply("acceleration", json!([0.0, 0.0, -1.0])), json!(1));
        assert_eq!(apply("acceleration", json!([])), json!(0));

        let tilted = apply("acceleration", json!([0.5, 0.5, 0.5]));
        let g = tilted.as_f64().expect("numeric magnitude");
        assert!((g - 0.75_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn acceleration_with_bad_component_is_null() {
        assert_eq!(apply("acceleration", json!([1, "x", 0])), Value::Null);
        assert_eq!(apply("acceleration", json!(9.81)), Value::Null);
    }

    #[test]
    fn percentages_and_pressure_are_scaled() {
        assert_eq!(apply("batteryPercentage", json!(50)), json!(0.5));
        assert_eq!(apply("relativeHumidity", json!(4500)), json!(45));
        assert_eq!(apply("pressure", json!(101325)), json!(1013.25));
        assert_eq!(apply("pressure", json!("high")), Value::Null);
    }

    #[test]
    fn identity_attributes_keep_their_value() {
        assert_eq!(apply("temperature", json!(21.5)), json!(21.5));
        assert_eq!(apply("temperature", json!(21.0)), json!(21));
        assert_eq!(apply("angleOfRotation", json!(-90)), json!(-90));
        assert_eq!(apply("illuminance", json!(350)), json!(350));
    }

    #[test]
    fn detection_flags_are_any_true() {
        assert_eq!(apply("isContactDetected", json!([false, true])), json!(true));
        assert_eq!(apply("isContactDetected", json!([false, false])), json!(false));
        assert_eq!(apply("isMotionDetected", json!([true])), json!(true));
        assert_eq!(apply("isMotionDetected", json!([])), json!(false));
        assert_eq!(apply("isMotionDetected", json!(true)), json!(false));
    }

    #[test]
    fn unknown_properties_have_no_mapping() {
        assert!(mapping_for("deviceId").is_none());
        assert!(mapping_for("timestamp").is_none());
        assert!(mapping_for("Temperature").is_none());
    }

    #[test]
    fn wire_number_drops_integral_fraction() {
        assert_eq!(serde_json::to_string(&wire_number(45.0)).unwrap(), "45");
        assert_eq!(serde_json::to_string(&wire_number(0.5)).unwrap(), "0.5");
        assert_eq!(wire_number(f64::NAN), Value::Null);
    }
}
