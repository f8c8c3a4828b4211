//! Field registry: the static declaration of what a table exposes.
//!
//! Built once at service startup and shared immutably by every request.
//! Each field is exactly one kind (plain, foreign, enumerated), and the
//! registry decides which fields participate in the global search. Schema
//! validation happens here, at build time, never per request.

use std::collections::HashMap;
use std::fmt;

/// One (stored value, display label) pair of an enumerated field's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub stored: String,
    pub label: String,
}

/// How a registered field derives its value from a backing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Value read directly from the backing row.
    Plain,
    /// Value read through a dotted path into a related record.
    Foreign { path: String },
    /// Value constrained to a fixed vocabulary; rendered as its label.
    Enumerated { choices: Vec<Choice> },
}

/// A single declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
    pub searchable: bool,
}

impl FieldDef {
    /// The store-level target this field filters and sorts on: foreign
    /// fields address their path, everything else the field name itself.
    #[must_use]
    pub fn target(&self) -> &str {
        match &self.kind {
            FieldKind::Foreign { path } => path,
            _ => &self.name,
        }
    }
}

/// Errors raised while building or validating a registry. These abort
/// service startup; none of them can occur per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    EmptyFieldName,
    DuplicateField { name: String },
    EmptyChoiceSet { field: String },
    DuplicateChoice { field: String, stored: String },
    UnknownSearchable { name: String },
    MissingSchemaColumn { field: String, column: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFieldName => write!(f, "field names must be non-empty"),
            Self::DuplicateField { name } => {
                write!(f, "field '{name}' is declared more than once")
            }
            Self::EmptyChoiceSet { field } => {
                write!(f, "enumerated field '{field}' has an empty choice set")
            }
            Self::DuplicateChoice { field, stored } => {
                write!(f, "enumerated field '{field}' declares stored value '{stored}' twice")
            }
            Self::UnknownSearchable { name } => {
                write!(f, "searchable field '{name}' is not declared")
            }
            Self::MissingSchemaColumn { field, column } => {
                write!(f, "field '{field}' expects backing column '{column}' which does not exist")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Ordered, immutable field declarations for one table.
///
/// The declaration order is also the rendering order of the output rows.
#[derive(Debug, Clone)]
pub struct ColumnRegistry {
    fields: Vec<FieldDef>,
    index: HashMap<String, usize>,
}

impl ColumnRegistry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.index.get(name).map(|i| &self.fields[*i])
    }

    /// The kind of a declared field, `None` if the name is not declared.
    #[must_use]
    pub fn classify(&self, name: &str) -> Option<&FieldKind> {
        self.field(name).map(|f| &f.kind)
    }

    #[must_use]
    pub fn is_searchable(&self, name: &str) -> bool {
        self.field(name).is_some_and(|f| f.searchable)
    }

    /// Choice set of an enumerated field, in declaration order.
    #[must_use]
    pub fn choice_set(&self, name: &str) -> Option<&[Choice]> {
        match self.classify(name)? {
            FieldKind::Enumerated { choices } => Some(choices),
            _ => None,
        }
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn searchable_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.searchable)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Checks every declared field against the backing schema's column
    /// names. Foreign fields are checked on the first segment of their
    /// path (the relation alias the backing source exposes).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MissingSchemaColumn`] for the first field
    /// whose backing column is absent.
    pub fn validate_schema(&self, columns: &[&str]) -> Result<(), RegistryError> {
        for field in &self.fields {
            let expected = match &field.kind {
                FieldKind::Foreign { path } => path.split('.').next().unwrap_or(path),
                _ => field.name.as_str(),
            };
            if !columns.contains(&expected) {
                return Err(RegistryError::MissingSchemaColumn {
                    field: field.name.clone(),
                    column: expected.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Builder for [`ColumnRegistry`]. Declaration order is preserved.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    fields: Vec<FieldDef>,
    searchable: Vec<String>,
}

impl RegistryBuilder {
    /// Declare a plain field read directly from the backing row.
    #[must_use]
    pub fn plain(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            kind: FieldKind::Plain,
            searchable: false,
        });
        self
    }

    /// Declare a foreign field resolved through `path` into a related record.
    #[must_use]
    pub fn foreign(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            kind: FieldKind::Foreign { path: path.into() },
            searchable: false,
        });
        self
    }

    /// Declare an enumerated field with its `(stored, label)` vocabulary.
    #[must_use]
    pub fn enumerated<I, K, V>(mut self, name: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.fields.push(FieldDef {
            name: name.into(),
            kind: FieldKind::Enumerated {
                choices: choices
                    .into_iter()
                    .map(|(stored, label)| Choice {
                        stored: stored.into(),
                        label: label.into(),
                    })
                    .collect(),
            },
            searchable: false,
        });
        self
    }

    /// Mark the named fields as participating in the global search.
    #[must_use]
    pub fn searchable<I, T>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.searchable.extend(names.into_iter().map(Into::into));
        self
    }

    /// Validates the declarations and builds the registry.
    ///
    /// # Errors
    ///
    /// Fails on empty or duplicate field names, empty or duplicated choice
    /// sets, and searchable names that were never declared.
    pub fn build(self) -> Result<ColumnRegistry, RegistryError> {
        let mut fields = self.fields;
        let mut index = HashMap::with_capacity(fields.len());

        for (position, field) in fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(RegistryError::EmptyFieldName);
            }
            if index.insert(field.name.clone(), position).is_some() {
                return Err(RegistryError::DuplicateField {
                    name: field.name.clone(),
                });
            }
            if let FieldKind::Enumerated { choices } = &field.kind {
                if choices.is_empty() {
                    return Err(RegistryError::EmptyChoiceSet {
                        field: field.name.clone(),
                    });
                }
                let mut stored_seen = Vec::with_capacity(choices.len());
                for choice in choices {
                    if stored_seen.contains(&&choice.stored) {
                        return Err(RegistryError::DuplicateChoice {
                            field: field.name.clone(),
                            stored: choice.stored.clone(),
                        });
                    }
                    stored_seen.push(&choice.stored);
                }
            }
        }

        for name in &self.searchable {
            match index.get(name) {
                Some(position) => fields[*position].searchable = true,
                None => {
                    return Err(RegistryError::UnknownSearchable { name: name.clone() });
                }
            }
        }

        Ok(ColumnRegistry { fields, index })
    }
}
