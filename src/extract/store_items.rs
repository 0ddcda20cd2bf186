use log::warn;
use serde_json::{json, Value};

use crate::config::StoreSelection;
use crate::model::CombinedDocument;

/// Prefix on log lines that carry a created JSON payload.
pub const CREATED_JSON_PREFIX: &str = "__standard__: Successfully created JSON: ";

/// Collect every JSON object the run logged, in log order.
///
/// Lines without the prefix contribute nothing. Lines whose payload does not
/// decode are skipped; a run with a few garbled entries still yields the rest.
pub fn collect_objects(log: &[String]) -> Vec<Value> {
    let mut objects = Vec::new();
    for entry in log {
        let Some(payload) = entry.strip_prefix(CREATED_JSON_PREFIX) else {
            continue;
        };
        match serde_json::from_str(payload.trim()) {
            Ok(value) => objects.push(value),
            Err(err) => warn!("Skipping undecodable JSON payload: {err}"),
        }
    }
    objects
}

/// Split the collected objects into the designated store and its items.
///
/// With no collected objects the store is an empty object and the item list
/// is empty.
pub fn combine(objects: Vec<Value>, selection: StoreSelection) -> CombinedDocument {
    let mut items = objects;
    match selection {
        StoreSelection::LastIsStore => {
            let store = items.pop().unwrap_or_else(|| json!({}));
            CombinedDocument { store, items }
        }
        StoreSelection::FirstIsStore => {
            if items.is_empty() {
                return CombinedDocument {
                    store: json!({}),
                    items,
                };
            }
            let store = items.remove(0);
            items.retain(|item| !has_location_address(item));
            CombinedDocument { store, items }
        }
    }
}

/// True when the object exposes location/address fields. Such objects are
/// store-location lookups the pipeline logs after the store itself, not
/// purchasable items. The `location.adress` spelling appears in real runs.
fn has_location_address(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };
    if object.contains_key("address") || object.contains_key("location") {
        return true;
    }
    if object.contains_key("location.address") || object.contains_key("location.adress") {
        return true;
    }
    matches!(object.get("location"), Some(Value::Object(location)) if location.contains_key("address"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_line(payload: &str) -> String {
        format!("{CREATED_JSON_PREFIX}{payload}")
    }

    #[test]
    fn test_collect_preserves_log_order() {
        let log = vec![
            log_line(r#"{"name": "milk"}"#),
            "__standard__: some other message".to_string(),
            log_line(r#"{"name": "eggs"}"#),
        ];

        let objects = collect_objects(&log);

        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0]["name"], "milk");
        assert_eq!(objects[1]["name"], "eggs");
    }

    #[test]
    fn test_collect_skips_malformed_payloads() {
        let log = vec![
            log_line(r#"{"name": "milk"}"#),
            log_line(r#"{"name": "eggs""#),
            log_line("not json at all"),
        ];

        let objects = collect_objects(&log);

        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0]["name"], "milk");
    }

    #[test]
    fn test_collect_trims_payload_whitespace() {
        let log = vec![log_line(r#"  {"name": "milk"}  "#)];
        assert_eq!(collect_objects(&log).len(), 1);
    }

    #[test]
    fn test_combine_last_is_store() {
        let objects = vec![
            json!({"name": "milk"}),
            json!({"name": "eggs"}),
            json!({"store": "corner shop"}),
        ];

        let combined = combine(objects, StoreSelection::LastIsStore);

        assert_eq!(combined.store["store"], "corner shop");
        assert_eq!(combined.items.len(), 2);
        assert_eq!(combined.items[0]["name"], "milk");
        assert_eq!(combined.items[1]["name"], "eggs");
    }

    #[test]
    fn test_combine_first_is_store_filters_locations() {
        let objects = vec![
            json!({"store": "corner shop"}),
            json!({"name": "milk"}),
            json!({"location": {"address": "12 High St"}}),
            json!({"location.adress": "12 High St"}),
            json!({"name": "eggs"}),
        ];

        let combined = combine(objects, StoreSelection::FirstIsStore);

        assert_eq!(combined.store["store"], "corner shop");
        assert_eq!(combined.items.len(), 2);
        assert_eq!(combined.items[0]["name"], "milk");
        assert_eq!(combined.items[1]["name"], "eggs");
    }

    #[test]
    fn test_combine_items_never_contain_the_store() {
        let objects = vec![json!({"a": 1}), json!({"b": 2})];

        let last = combine(objects.clone(), StoreSelection::LastIsStore);
        assert!(!last.items.contains(&last.store));

        let first = combine(objects, StoreSelection::FirstIsStore);
        assert!(!first.items.contains(&first.store));
    }

    #[test]
    fn test_combine_empty_collection() {
        for selection in [StoreSelection::LastIsStore, StoreSelection::FirstIsStore] {
            let combined = combine(Vec::new(), selection);
            assert_eq!(combined.store, json!({}));
            assert!(combined.items.is_empty());
        }
    }

    #[test]
    fn test_has_location_address_shapes() {
        assert!(has_location_address(&json!({"address": "x"})));
        assert!(has_location_address(&json!({"location": "x"})));
        assert!(has_location_address(&json!({"location.address": "x"})));
        assert!(has_location_address(&json!({"location.adress": "x"})));
        assert!(!has_location_address(&json!({"name": "milk"})));
        assert!(!has_location_address(&json!("not an object")));
    }
}
