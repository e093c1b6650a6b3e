//! In-memory schema built by replaying migration operations.

use std::collections::BTreeMap;

use super::{Field, FieldKind, Operation};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("model '{0}' already exists")]
    DuplicateModel(String),

    #[error("model '{0}' does not exist")]
    UnknownModel(String),

    #[error("field '{field}' already exists on '{model}'")]
    DuplicateField { model: String, field: String },

    #[error("field '{field}' does not exist on '{model}'")]
    UnknownField { model: String, field: String },

    #[error("index '{0}' already exists")]
    DuplicateIndex(String),

    #[error("non-nullable field '{field}' added to '{model}' without a default")]
    MissingDefault { model: String, field: String },

    #[error("foreign key '{field}' on '{model}' has no target")]
    MissingTarget { model: String, field: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    /// Name as declared, e.g. `CurrencyRate`.
    pub name: String,
    pub fields: Vec<Field>,
    /// Index name to indexed columns.
    pub indexes: BTreeMap<String, Vec<String>>,
}

impl Model {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The schema of every app, keyed by `app` then lowercase model name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectState {
    models: BTreeMap<(String, String), Model>,
}

impl ProjectState {
    #[must_use]
    pub fn model(&self, app: &str, name: &str) -> Option<&Model> {
        self.models.get(&(app.to_string(), name.to_lowercase()))
    }

    #[must_use]
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    pub fn models(&self) -> impl Iterator<Item = (&str, &Model)> {
        self.models.iter().map(|((app, _), m)| (app.as_str(), m))
    }

    /// Apply one operation belonging to `app`. On error the state is
    /// unchanged.
    pub fn apply(&mut self, app: &str, op: &Operation) -> Result<(), SchemaError> {
        match op {
            Operation::CreateModel { name, fields } => {
                let key = (app.to_string(), name.to_lowercase());
                if self.models.contains_key(&key) {
                    return Err(SchemaError::DuplicateModel(name.clone()));
                }
                let mut model = Model {
                    name: name.clone(),
                    ..Model::default()
                };
                for field in fields {
                    check_field(name, field)?;
                    if model.field(&field.name).is_some() {
                        return Err(SchemaError::DuplicateField {
                            model: name.clone(),
                            field: field.name.clone(),
                        });
                    }
                    model.fields.push(field.clone());
                }
                self.models.insert(key, model);
            }
            Operation::AddField { model, field } => {
                let target = self.model_mut(app, model)?;
                check_field(model, field)?;
                if target.field(&field.name).is_some() {
                    return Err(SchemaError::DuplicateField {
                        model: model.clone(),
                        field: field.name.clone(),
                    });
                }
                if !field.null && !field.primary_key && field.default.is_none() {
                    return Err(SchemaError::MissingDefault {
                        model: model.clone(),
                        field: field.name.clone(),
                    });
                }
                target.fields.push(field.clone());
            }
            Operation::AddIndex {
                model,
                name,
                fields,
            } => {
                if self.models.values().any(|m| m.indexes.contains_key(name)) {
                    return Err(SchemaError::DuplicateIndex(name.clone()));
                }
                let target = self.model_mut(app, model)?;
                if let Some(missing) = fields.iter().find(|f| target.field(f).is_none()) {
                    return Err(SchemaError::UnknownField {
                        model: model.clone(),
                        field: missing.clone(),
                    });
                }
                target.indexes.insert(name.clone(), fields.clone());
            }
        }
        Ok(())
    }

    fn model_mut(&mut self, app: &str, name: &str) -> Result<&mut Model, SchemaError> {
        self.models
            .get_mut(&(app.to_string(), name.to_lowercase()))
            .ok_or_else(|| SchemaError::UnknownModel(format!("{app}.{name}")))
    }
}

fn check_field(model: &str, field: &Field) -> Result<(), SchemaError> {
    if field.kind == FieldKind::ForeignKey && field.to.as_deref().map_or(true, str::is_empty) {
        return Err(SchemaError::MissingTarget {
            model: model.to_string(),
            field: field.name.clone(),
        });
    }
    Ok(())
}
