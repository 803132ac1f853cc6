// 🏷️ Attribute Classification
// Decides which pair of conversions applies to which record field

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// ATTRIBUTE KINDS
// ============================================================================

/// Semantic type of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    /// Date plus time of day (`DATETIME`/`TIMESTAMP` columns)
    Datetime,
    /// Calendar day only (`DATE` columns)
    Date,
    /// Currency amount in reais
    Money,
    /// Any other decimal quantity
    Numeric,
    /// 0/1 flag rendered as Sim/Não
    Boolean,
}

impl AttributeKind {
    /// Every kind, in the order classification lists are processed
    pub const ALL: [AttributeKind; 5] = [
        AttributeKind::Datetime,
        AttributeKind::Date,
        AttributeKind::Money,
        AttributeKind::Numeric,
        AttributeKind::Boolean,
    ];

    pub fn name(&self) -> &str {
        match self {
            AttributeKind::Datetime => "datetime",
            AttributeKind::Date => "date",
            AttributeKind::Money => "money",
            AttributeKind::Numeric => "numeric",
            AttributeKind::Boolean => "boolean",
        }
    }

    /// Name of the classification list that declares this kind
    pub fn list_name(&self) -> &str {
        match self {
            AttributeKind::Datetime => "datetime_attributes",
            AttributeKind::Date => "date_attributes",
            AttributeKind::Money => "money_attributes",
            AttributeKind::Numeric => "numeric_attributes",
            AttributeKind::Boolean => "boolean_attributes",
        }
    }
}

// ============================================================================
// CLASSIFICATION LISTS (as declared in configuration)
// ============================================================================

/// The five per-record classification lists.
///
/// A missing list means "no attributes of that type".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationLists {
    pub datetime_attributes: Vec<String>,
    pub date_attributes: Vec<String>,
    pub money_attributes: Vec<String>,
    pub numeric_attributes: Vec<String>,
    pub boolean_attributes: Vec<String>,
}

impl ClassificationLists {
    /// Field names declared for one kind
    pub fn list(&self, kind: AttributeKind) -> &[String] {
        match kind {
            AttributeKind::Datetime => &self.datetime_attributes,
            AttributeKind::Date => &self.date_attributes,
            AttributeKind::Money => &self.money_attributes,
            AttributeKind::Numeric => &self.numeric_attributes,
            AttributeKind::Boolean => &self.boolean_attributes,
        }
    }
}

// ============================================================================
// CLASSIFICATION ERROR
// ============================================================================

/// A field was declared under two different kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationError {
    pub field: String,
    pub existing: AttributeKind,
    pub requested: AttributeKind,
}

impl std::fmt::Display for ClassificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "attribute '{}' is listed in both {} and {}",
            self.field,
            self.existing.list_name(),
            self.requested.list_name()
        )
    }
}

impl std::error::Error for ClassificationError {}

// ============================================================================
// ATTRIBUTE CLASSIFICATION
// ============================================================================

/// Field name → semantic kind.
///
/// Each name maps to exactly one kind; overlapping declarations are rejected
/// when the classification is built, never resolved at dispatch time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeClassification {
    kinds: HashMap<String, AttributeKind>,
    order: Vec<String>,
}

impl AttributeClassification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `name` as `kind`.
    ///
    /// Declaring the same kind twice is a no-op.
    pub fn classify(
        &mut self,
        name: impl Into<String>,
        kind: AttributeKind,
    ) -> Result<(), ClassificationError> {
        let name = name.into();

        match self.kinds.get(&name) {
            Some(existing) if *existing == kind => Ok(()),
            Some(existing) => Err(ClassificationError {
                field: name,
                existing: *existing,
                requested: kind,
            }),
            None => {
                self.kinds.insert(name.clone(), kind);
                self.order.push(name);
                Ok(())
            }
        }
    }

    /// Builder: classify and return self
    pub fn with(
        mut self,
        name: impl Into<String>,
        kind: AttributeKind,
    ) -> Result<Self, ClassificationError> {
        self.classify(name, kind)?;
        Ok(self)
    }

    /// Kind of a field, if it is classified
    pub fn kind_of(&self, name: &str) -> Option<AttributeKind> {
        self.kinds.get(name).copied()
    }

    /// Field names of one kind, in declaration order
    pub fn names(&self, kind: AttributeKind) -> Vec<&str> {
        self.order
            .iter()
            .filter(|name| self.kinds.get(name.as_str()) == Some(&kind))
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Back to the list form used in configuration
    pub fn to_lists(&self) -> ClassificationLists {
        let collect = |kind| self.names(kind).into_iter().map(str::to_string).collect();

        ClassificationLists {
            datetime_attributes: collect(AttributeKind::Datetime),
            date_attributes: collect(AttributeKind::Date),
            money_attributes: collect(AttributeKind::Money),
            numeric_attributes: collect(AttributeKind::Numeric),
            boolean_attributes: collect(AttributeKind::Boolean),
        }
    }
}

impl TryFrom<&ClassificationLists> for AttributeClassification {
    type Error = ClassificationError;

    fn try_from(lists: &ClassificationLists) -> Result<Self, Self::Error> {
        let mut classification = AttributeClassification::new();

        for kind in AttributeKind::ALL {
            for name in lists.list(kind) {
                classification.classify(name.as_str(), kind)?;
            }
        }

        Ok(classification)
    }
}

impl TryFrom<ClassificationLists> for AttributeClassification {
    type Error = ClassificationError;

    fn try_from(lists: ClassificationLists) -> Result<Self, Self::Error> {
        AttributeClassification::try_from(&lists)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product_lists() -> ClassificationLists {
        ClassificationLists {
            datetime_attributes: vec!["published_at".to_string()],
            date_attributes: vec!["release_date".to_string()],
            money_attributes: vec!["price".to_string(), "cost".to_string()],
            numeric_attributes: vec!["weight".to_string()],
            boolean_attributes: vec!["active".to_string()],
        }
    }

    #[test]
    fn test_classification_from_lists() {
        let classification = AttributeClassification::try_from(product_lists()).unwrap();

        assert_eq!(classification.len(), 6);
        assert_eq!(classification.kind_of("price"), Some(AttributeKind::Money));
        assert_eq!(classification.kind_of("release_date"), Some(AttributeKind::Date));
        assert_eq!(classification.kind_of("active"), Some(AttributeKind::Boolean));
        assert_eq!(classification.kind_of("name"), None);
    }

    #[test]
    fn test_names_keep_declaration_order() {
        let classification = AttributeClassification::try_from(product_lists()).unwrap();

        assert_eq!(classification.names(AttributeKind::Money), vec!["price", "cost"]);
        assert!(classification.names(AttributeKind::Datetime).contains(&"published_at"));
    }

    #[test]
    fn test_overlap_is_rejected() {
        let mut lists = product_lists();
        lists.boolean_attributes.push("price".to_string());

        let err = AttributeClassification::try_from(lists).unwrap_err();
        assert_eq!(err.field, "price");
        assert_eq!(err.existing, AttributeKind::Money);
        assert_eq!(err.requested, AttributeKind::Boolean);
        assert_eq!(
            err.to_string(),
            "attribute 'price' is listed in both money_attributes and boolean_attributes"
        );
    }

    #[test]
    fn test_same_kind_twice_is_allowed() {
        let classification = AttributeClassification::new()
            .with("price", AttributeKind::Money)
            .and_then(|c| c.with("price", AttributeKind::Money))
            .unwrap();

        assert_eq!(classification.len(), 1);
    }

    #[test]
    fn test_empty_lists_classify_nothing() {
        let classification = AttributeClassification::try_from(ClassificationLists::default()).unwrap();
        assert!(classification.is_empty());
    }

    #[test]
    fn test_lists_deserialize_with_missing_entries() {
        let lists: ClassificationLists =
            serde_json::from_str(r#"{"money_attributes": ["price"]}"#).unwrap();

        assert_eq!(lists.money_attributes, vec!["price"]);
        assert!(lists.datetime_attributes.is_empty());
    }

    #[test]
    fn test_to_lists_round_trip() {
        let lists = product_lists();
        let classification = AttributeClassification::try_from(&lists).unwrap();

        assert_eq!(classification.to_lists(), lists);
    }
}
