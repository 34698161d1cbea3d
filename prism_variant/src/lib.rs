pub mod bag;
pub mod variant;

pub use bag::*;
pub use variant::*;

#[cfg(test)]
mod tests {
    use prism_ids::ObjectID;
    use serde_json::json;

    use super::*;

    // -------------------- Number Tests --------------------

    #[test]
    fn test_number_type_checks() {
        assert!(Number::I32(42).is_int());
        assert!(Number::U64(100).is_int());
        assert!(!Number::F32(3.5).is_int());
        assert!(Number::F64(2.71).is_float());
    }

    #[test]
    fn test_number_as_i64_lossy() {
        assert_eq!(Number::I32(-5).as_i64_lossy(), Some(-5));
        assert_eq!(Number::U64(u64::MAX).as_i64_lossy(), None);
        assert_eq!(Number::F64(2.0).as_i64_lossy(), None);
    }

    #[test]
    fn test_number_as_f64_lossy() {
        assert_eq!(Number::I32(42).as_f64_lossy(), 42.0);
        assert_eq!(Number::F32(0.5).as_f64_lossy(), 0.5);
    }

    // -------------------- Variant --------------------

    #[test]
    fn test_variant_accessors() {
        assert_eq!(Variant::Bool(true).as_bool(), Some(true));
        assert_eq!(Variant::string("linear").as_str(), Some("linear"));
        assert_eq!(Variant::range(-1.0, 4.0).as_range(), Some([-1.0, 4.0]));
        assert_eq!(Variant::from(0.25f64).as_f64(), Some(0.25));
        let id = ObjectID::from_parts(9, 1);
        assert_eq!(Variant::from(id).as_object_ref(), Some(id));
        assert_eq!(Variant::Null.as_bool(), None);
    }

    #[test]
    fn test_variant_equality_is_structural() {
        assert_eq!(Variant::range(0.0, 1.0), Variant::range(0.0, 1.0));
        assert_ne!(Variant::range(0.0, 1.0), Variant::range(0.0, 2.0));
        assert_ne!(Variant::from(1i32), Variant::from(1i64));
        assert_eq!(
            Variant::Array(vec![Variant::from(1i32)]),
            Variant::Array(vec![Variant::from(1i32)])
        );
    }

    #[test]
    fn test_variant_nan_equals_itself() {
        assert_eq!(Variant::from(f64::NAN), Variant::from(f64::NAN));
        assert_eq!(Number::F32(f32::NAN), Number::F32(f32::NAN));
        assert_eq!(Variant::range(f64::NAN, 1.0), Variant::range(f64::NAN, 1.0));
        assert_eq!(
            Variant::from([f64::NAN, 0.0, 1.0]),
            Variant::from([f64::NAN, 0.0, 1.0])
        );
        assert_ne!(Variant::from(0.0f64), Variant::from(-0.0f64));
    }

    #[test]
    fn test_variant_vec3_and_map_accessors() {
        let spacing = Variant::from([1.0, 0.5, 2.0]);
        assert_eq!(spacing.as_vec3(), Some([1.0, 0.5, 2.0]));
        assert_eq!(Variant::range(0.0, 1.0).as_vec3(), None);

        let nested = Variant::from_json_value(&json!({"preset": "Cool to Warm", "opacity": 0.5}));
        let map = nested.as_map().expect("object converts to a map");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("preset").and_then(Variant::as_str), Some("Cool to Warm"));
        assert_eq!(map.get("opacity").and_then(Variant::as_f64), Some(0.5));
        assert!(Variant::Null.as_map().is_none());
    }

    #[test]
    fn test_variant_display() {
        assert_eq!(Variant::range(0.0, 2.5).to_string(), "[0, 2.5]");
        assert_eq!(Variant::string("x").to_string(), "\"x\"");
    }

    // -------------------- PropertyBag --------------------

    #[test]
    fn bag_keeps_insertion_order() {
        let bag = PropertyBag::new()
            .with("visibility", true)
            .with("pickable", false)
            .with("scale", [1.0, 1.0, 2.0]);
        let keys: Vec<&str> = bag.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["visibility", "pickable", "scale"]);
    }

    #[test]
    fn bag_replace_keeps_position() {
        let mut bag = PropertyBag::new().with("a", 1i32).with("b", 2i32);
        let previous = bag.set("a", 3i32);
        assert_eq!(previous, Some(Variant::from(1i32)));
        let keys: Vec<&str> = bag.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(bag.get("a"), Some(&Variant::from(3i32)));
    }

    #[test]
    fn bag_merged_prefers_override() {
        let base = PropertyBag::new().with("visibility", true).with("pickable", true);
        let over = PropertyBag::new().with("visibility", false);
        let merged = base.merged(&over);
        assert_eq!(merged.get("visibility"), Some(&Variant::Bool(false)));
        assert_eq!(merged.get("pickable"), Some(&Variant::Bool(true)));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn bag_from_json_object() {
        let bag = PropertyBag::from_json(&json!({
            "sampleDistance": 0.7,
            "blendMode": 0,
            "label": "ct"
        }))
        .expect("object converts");
        assert_eq!(bag.len(), 3);
        assert_eq!(bag.get("sampleDistance"), Some(&Variant::from(0.7f64)));
        assert_eq!(bag.get("blendMode"), Some(&Variant::from(0i64)));
        assert_eq!(bag.get("label").and_then(Variant::as_str), Some("ct"));
    }

    #[test]
    fn bag_from_json_rejects_non_objects() {
        assert!(PropertyBag::from_json(&json!([1, 2])).is_none());
        assert!(PropertyBag::from_json(&json!("x")).is_none());
    }

    #[test]
    fn bag_json_keeps_values() {
        let bag = PropertyBag::new().with("shade", true).with("ambient", 0.2f64);
        let json = bag.to_json();
        assert_eq!(json, json!({ "shade": true, "ambient": 0.2 }));
        assert_eq!(PropertyBag::from_json(&json), Some(bag));
    }
}
