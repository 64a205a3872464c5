use serde_json::Value;
use tudu_core::{AppError, AppResult};

/// Input kind of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text input.
    Text,
    /// `datetime-local` input converted to and from the wire format.
    DateTime,
    /// Select over a closed set of wire values.
    Select {
        /// Allowed wire values in display order.
        values: &'static [&'static str],
        /// Value preselected on edit forms when the entity has none.
        default: &'static str,
    },
    /// Many-to-many relation picked from a multi-select of ids.
    ManyRelation {
        /// Slice name of the related entity type.
        target: &'static str,
    },
    /// Many-to-one relation picked from a single select of ids.
    OneRelation {
        /// Slice name of the related entity type.
        target: &'static str,
    },
}

/// One row of an entity's form configuration table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    name: &'static str,
    kind: FieldKind,
    required: bool,
}

impl FieldSpec {
    /// Creates an optional field.
    #[must_use]
    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }

    /// Creates a required field.
    #[must_use]
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    /// Returns the wire name of the field.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the input kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns whether a value must be present on submission.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    fn validate_value(&self, entity: &str, value: Option<&Value>) -> AppResult<()> {
        let value = value.filter(|value| !value.is_null());

        if self.required {
            let present = match value {
                Some(Value::String(text)) => !text.trim().is_empty(),
                Some(_) => true,
                None => false,
            };
            if !present {
                return Err(AppError::Validation(format!(
                    "{entity}.{} is required",
                    self.name
                )));
            }
        }

        if let (FieldKind::Select { values, .. }, Some(value)) = (self.kind, value) {
            let accepted = value
                .as_str()
                .map(|text| values.contains(&text))
                .unwrap_or(false);
            if !accepted {
                return Err(AppError::Validation(format!(
                    "{entity}.{} must be one of {}",
                    self.name,
                    values.join(", ")
                )));
            }
        }

        Ok(())
    }
}

/// Form configuration table for one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSchema {
    entity: &'static str,
    fields: Vec<FieldSpec>,
}

impl FormSchema {
    /// Creates a schema from an ordered field table.
    #[must_use]
    pub fn new(entity: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self { entity, fields }
    }

    /// Returns fields in form order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Looks up a field by wire name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Checks required fields and enumeration membership of a serialized entity.
    pub fn validate(&self, entity: &Value) -> AppResult<()> {
        let object = entity.as_object().ok_or_else(|| {
            AppError::Validation(format!("{} payload must be a JSON object", self.entity))
        })?;

        for field in &self.fields {
            field.validate_value(self.entity, object.get(field.name))?;
        }

        Ok(())
    }
}
