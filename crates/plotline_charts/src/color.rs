use std::sync::Arc;

use indexmap::IndexMap;

use crate::config::{ColorConfig, ColorEntry};

#[derive(Clone, Debug, PartialEq)]
struct Resolved {
    color: String,
    entry: Option<usize>,
}

/// Ordinal series-id → color mapping.
///
/// Resolution order per id:
/// 1. a schema entry whose `key` equals the id
/// 2. the schema entry at the id's position in the series order
/// 3. the default color
#[derive(Clone, Debug, PartialEq)]
pub struct ColorScale {
    resolved: IndexMap<Arc<str>, Resolved>,
    schema: Vec<ColorEntry>,
    default_color: String,
}

impl ColorScale {
    pub fn new<'a>(ids: impl IntoIterator<Item = &'a Arc<str>>, config: &ColorConfig) -> Self {
        let mut resolved = IndexMap::new();
        for (i, id) in ids.into_iter().enumerate() {
            let exact = config
                .schema
                .iter()
                .position(|e| e.key.as_deref() == Some(&**id));
            let entry = exact.or_else(|| (i < config.schema.len()).then_some(i));
            let color = match entry {
                Some(e) => config.schema[e].value.clone(),
                None => config.default_color.clone(),
            };
            resolved.insert(id.clone(), Resolved { color, entry });
        }
        Self {
            resolved,
            schema: config.schema.clone(),
            default_color: config.default_color.clone(),
        }
    }

    /// Color for `id`; ids outside the domain get the default color.
    pub fn color(&self, id: &str) -> &str {
        self.resolved
            .get(id)
            .map(|r| r.color.as_str())
            .unwrap_or(self.default_color.as_str())
    }

    /// Schema entry backing `id`'s color, if any (for extra styling fields).
    pub fn entry(&self, id: &str) -> Option<&ColorEntry> {
        self.resolved
            .get(id)
            .and_then(|r| r.entry)
            .and_then(|i| self.schema.get(i))
    }

    pub fn domain(&self) -> impl Iterator<Item = &Arc<str>> + '_ {
        self.resolved.keys()
    }

    /// `(id, color)` pairs in series order.
    pub fn legend(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.resolved
            .iter()
            .map(|(id, r)| (&**id, r.color.as_str()))
    }

    pub fn default_color(&self) -> &str {
        &self.default_color
    }
}
