//! Field resolution: grouping placeholder occurrences by name.
//!
//! The first occurrence that declares a default decides the field's default,
//! title, and visibility. A field may be referenced with a bare `$NAME$`
//! before the occurrence that defines it.

use std::collections::HashMap;

use kubeapp_common::constants::{AUTOGEN_DEFAULT, USER_DOMAIN_LIST_DEFAULT};
use rand::Rng;
use serde::Serialize;

use crate::autogen::generate_token;
use crate::lexer::Placeholder;

/// One distinct placeholder name found in a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Placeholder name.
    pub name: String,
    /// Human label.
    pub title: Option<String>,
    /// Resolved default value.
    pub default_value: Option<String>,
    /// Whether the field is generated or deferred and must not be edited.
    pub hidden: bool,
    /// Raw occurrence texts, in document order.
    pub occurrences: Vec<String>,
}

impl Field {
    fn from_occurrence<R: Rng + ?Sized>(placeholder: &Placeholder<'_>, rng: &mut R) -> Self {
        let mut field = Self {
            name: placeholder.name.to_owned(),
            title: None,
            default_value: None,
            hidden: false,
            occurrences: vec![placeholder.text.to_owned()],
        };
        field.absorb_definition(placeholder, rng);
        field
    }

    /// Takes the default and title from `placeholder` if still unset.
    fn absorb_definition<R: Rng + ?Sized>(&mut self, placeholder: &Placeholder<'_>, rng: &mut R) {
        if self.title.is_none() {
            self.title = placeholder.title.map(str::to_owned);
        }
        if self.default_value.is_some() {
            return;
        }
        let Some(raw) = placeholder.default else {
            return;
        };

        let (value, hidden) = if raw == AUTOGEN_DEFAULT {
            (generate_token(rng), true)
        } else if raw.eq_ignore_ascii_case(USER_DOMAIN_LIST_DEFAULT) {
            (placeholder.text.to_owned(), true)
        } else {
            (raw.to_owned(), false)
        };
        tracing::debug!(field = %self.name, hidden, "resolved field default");
        self.default_value = Some(value);
        self.hidden = hidden;
    }
}

/// Ordered collection of fields with a by-name index.
#[derive(Debug, Clone, Default)]
pub struct FieldTable {
    fields: Vec<Field>,
    by_name: HashMap<String, usize>,
}

impl FieldTable {
    /// Resolves the fields for a sequence of scanned occurrences.
    pub fn resolve<R: Rng + ?Sized>(placeholders: &[Placeholder<'_>], rng: &mut R) -> Self {
        let mut table = Self::default();
        for placeholder in placeholders {
            match table.index_of(placeholder.name) {
                Some(idx) => {
                    let field = &mut table.fields[idx];
                    field.occurrences.push(placeholder.text.to_owned());
                    field.absorb_definition(placeholder, rng);
                }
                None => {
                    let _ = table
                        .by_name
                        .insert(placeholder.name.to_owned(), table.fields.len());
                    table.fields.push(Field::from_occurrence(placeholder, rng));
                }
            }
        }
        table
    }

    /// Fields in order of first occurrence.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.by_name.get(name).map(|&idx| &self.fields[idx])
    }

    /// Position of a field in [`fields`](Self::fields).
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Number of distinct fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the template has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
