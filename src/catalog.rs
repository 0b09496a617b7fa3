use crate::model::Datasource;

/// Substring marking a column identifier as a parameter rather than a
/// calculated field. This mirrors the naming convention Tableau uses for
/// parameter columns (`[Parameter 1]`, `[Parameter 2]`, ...); the match is
/// unanchored.
pub const PARAMETER_MARKER: &str = "Parameter";

/// Mapping from internal field identifier to bracketed display caption,
/// e.g. `[Calculation_17]` → `[Revenue]`.
///
/// Entries are ordered by descending identifier length (ties broken
/// lexicographically) so that substitution never partially replaces an
/// identifier that is a substring of another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldCatalog {
    entries: Vec<(String, String)>,
}

impl FieldCatalog {
    /// Builds the catalog from every captioned, calculated, non-parameter
    /// column across all datasources. The first caption seen for an
    /// identifier wins.
    pub fn from_datasources(datasources: &[Datasource]) -> Self {
        let columns = datasources.iter().flat_map(|datasource| &datasource.columns);
        Self::from_entries(columns.filter_map(|column| {
            let caption = column.caption.as_deref()?;
            if column.calculation.is_none() || column.name.contains(PARAMETER_MARKER) {
                return None;
            }
            Some((column.name.clone(), format!("[{caption}]")))
        }))
    }

    /// Builds the catalog from raw (identifier, bracketed caption) pairs,
    /// applying the same ordering and uniqueness rules as
    /// [`from_datasources`](Self::from_datasources).
    pub fn from_entries(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut entries: Vec<(String, String)> = Vec::new();
        for (identifier, caption) in pairs {
            if identifier.is_empty() {
                continue;
            }
            if entries.iter().any(|(existing, _)| existing == &identifier) {
                continue;
            }
            entries.push((identifier, caption));
        }
        entries.sort_by(|lhs, rhs| {
            rhs.0
                .len()
                .cmp(&lhs.0.len())
                .then_with(|| lhs.0.cmp(&rhs.0))
        });
        Self { entries }
    }

    /// Iterates the (identifier, bracketed caption) pairs in substitution
    /// order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(identifier, caption)| (identifier.as_str(), caption.as_str()))
    }

    /// Iterates the bracketed captions in substitution order.
    pub fn captions(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(_, caption)| caption.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
