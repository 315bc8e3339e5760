use bson::{Bson, Document};

/// Specifies the direction for sorting documents.
///
/// Converts into the `1` / `-1` values the server expects in a sort specification.
///
/// ```text
/// let options = order_by("age", SortOrder::Descending);   // { "age": -1 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort from smallest to largest value
    Ascending,
    /// Sort from largest to smallest value
    Descending,
}

impl SortOrder {
    pub fn as_i32(&self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

impl From<SortOrder> for Bson {
    fn from(order: SortOrder) -> Self {
        Bson::Int32(order.as_i32())
    }
}

/// Builds a sort specification from `(field, order)` pairs, keeping their order.
pub fn sort_spec(fields: &[(&str, SortOrder)]) -> Document {
    let mut spec = Document::new();
    for (field, order) in fields {
        spec.insert(*field, *order);
    }
    spec
}

/// Appends `field` to an optional sort specification, creating it when absent.
pub(crate) fn push_sort(sort: Option<Document>, field: &str, order: SortOrder) -> Document {
    let mut spec = sort.unwrap_or_default();
    spec.insert(field, order);
    spec
}
