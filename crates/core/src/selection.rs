//! Requested field sets.
//!
//! A [`SelectionSet`] is the already-parsed field selection of a query: a tree
//! of field names, each with an optional response alias and, for nested
//! fields, its own selection.

/// One requested field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Schema field name.
    pub name: String,
    /// Response key, when it differs from the field name.
    pub alias: Option<String>,
    /// Sub-selection for nested fields.
    pub selection_set: Option<SelectionSet>,
}

impl Selection {
    /// Select a field by name.
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            selection_set: None,
        }
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn with_selection(mut self, selection_set: SelectionSet) -> Self {
        self.selection_set = Some(selection_set);
        self
    }

    /// Key under which the field appears in the output.
    #[must_use]
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// An ordered set of requested fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    pub selections: Vec<Selection>,
}

impl SelectionSet {
    #[must_use]
    pub const fn new(selections: Vec<Selection>) -> Self {
        Self { selections }
    }

    /// Select flat fields by name.
    #[must_use]
    pub fn fields(names: &[&str]) -> Self {
        names.iter().map(|name| Selection::field(*name)).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Selection> {
        self.selections.iter()
    }
}

impl FromIterator<Selection> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = Selection>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a Selection;
    type IntoIter = std::slice::Iter<'a, Selection>;

    fn into_iter(self) -> Self::IntoIter {
        self.selections.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_key_prefers_alias() {
        assert_eq!(Selection::field("topCategory").response_key(), "topCategory");
        assert_eq!(
            Selection::field("topCategory")
                .with_alias("category")
                .response_key(),
            "category"
        );
    }

    #[test]
    fn test_fields_preserves_order() {
        let set = SelectionSet::fields(&["topCategory", "id"]);
        let names: Vec<_> = set.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["topCategory", "id"]);
    }
}
