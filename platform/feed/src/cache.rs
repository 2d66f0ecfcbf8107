use std::collections::HashMap;

use serde_json::{Map, Value};

const ROOT_QUERY: &str = "ROOT_QUERY";
const REF_KEY: &str = "__ref";
const TYPENAME_KEY: &str = "__typename";

/// Normalized store of query results keyed by `<Typename>:<id>`.
///
/// Objects carrying both `__typename` and `id` are stored once and referenced
/// from everywhere they appear, so a fragment write is visible to every query
/// that selected the same entity.
#[derive(Debug, Default, Clone)]
pub struct Cache {
    entities: HashMap<String, Map<String, Value>>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identify(typename: &str, id: impl std::fmt::Display) -> String {
        format!("{typename}:{id}")
    }

    pub fn contains(&self, cache_id: &str) -> bool {
        self.entities.contains_key(cache_id)
    }

    /// Stores the `data` of a query under the root entry and normalizes
    /// every identifiable object it contains.
    pub fn write_query_result(&mut self, data: Value) {
        let Value::Object(fields) = data else {
            tracing::warn!("ignoring non-object query result");
            return;
        };

        let fields = fields
            .into_iter()
            .map(|(key, value)| (key, self.normalize(value)))
            .collect();

        self.merge(ROOT_QUERY.to_string(), fields);
    }

    /// Reads a root field back, with references resolved.
    pub fn read_query(&self, field: &str) -> Option<Value> {
        let value = self.entities.get(ROOT_QUERY)?.get(field)?;
        Some(self.resolve(value, &mut Vec::new()))
    }

    /// Merges `fields` into the entry, creating it when absent.
    pub fn write_fragment(&mut self, cache_id: &str, fields: Map<String, Value>) {
        let fields = fields
            .into_iter()
            .map(|(key, value)| (key, self.normalize(value)))
            .collect();

        self.merge(cache_id.to_string(), fields);
    }

    /// Reads an entry with its references resolved.
    pub fn read_fragment(&self, cache_id: &str) -> Option<Value> {
        let mut stack = vec![cache_id.to_string()];
        let entity = self.entities.get(cache_id)?;
        Some(self.resolve_object(entity, &mut stack))
    }

    pub fn evict(&mut self, cache_id: &str) -> bool {
        self.entities.remove(cache_id).is_some()
    }

    fn merge(&mut self, cache_id: String, fields: Map<String, Value>) {
        let entity = self.entities.entry(cache_id).or_default();
        for (key, value) in fields {
            entity.insert(key, value);
        }
    }

    fn normalize(&mut self, value: Value) -> Value {
        match value {
            Value::Array(items) => Value::Array(items.into_iter().map(|item| self.normalize(item)).collect()),
            Value::Object(object) => {
                let cache_id = entity_id(&object);
                let object: Map<String, Value> = object
                    .into_iter()
                    .map(|(key, value)| (key, self.normalize(value)))
                    .collect();

                match cache_id {
                    Some(cache_id) => {
                        self.merge(cache_id.clone(), object);
                        let mut reference = Map::new();
                        reference.insert(REF_KEY.to_string(), Value::String(cache_id));
                        Value::Object(reference)
                    }
                    None => Value::Object(object),
                }
            }
            other => other,
        }
    }

    fn resolve(&self, value: &Value, stack: &mut Vec<String>) -> Value {
        match value {
            Value::Array(items) => Value::Array(items.iter().map(|item| self.resolve(item, stack)).collect()),
            Value::Object(object) => match object.get(REF_KEY).and_then(Value::as_str) {
                // cycles stay as references
                Some(cache_id) if stack.iter().any(|id| id == cache_id) => value.clone(),
                Some(cache_id) => match self.entities.get(cache_id) {
                    Some(entity) => {
                        stack.push(cache_id.to_string());
                        let resolved = self.resolve_object(entity, stack);
                        stack.pop();
                        resolved
                    }
                    None => Value::Null,
                },
                None => self.resolve_object(object, stack),
            },
            other => other.clone(),
        }
    }

    fn resolve_object(&self, object: &Map<String, Value>, stack: &mut Vec<String>) -> Value {
        Value::Object(
            object
                .iter()
                .map(|(key, value)| (key.clone(), self.resolve(value, stack)))
                .collect(),
        )
    }
}

fn entity_id(object: &Map<String, Value>) -> Option<String> {
    let typename = object.get(TYPENAME_KEY)?.as_str()?;
    match object.get("id")? {
        Value::Number(id) => Some(Cache::identify(typename, id)),
        Value::String(id) => Some(Cache::identify(typename, id)),
        _ => None,
    }
}
