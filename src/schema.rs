use std::fmt;

use jsonschema::error::ValidationErrorKind;
use jsonschema::Validator;
use serde_json::{json, Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("schema compile error: {0}")]
    Compile(String),
}

/// Primitive types a tool argument field may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Object,
}

impl FieldType {
    fn json_name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
        }
    }
}

/// Named format constraints beyond the primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFormat {
    /// `local@domain`, both parts non-empty, domain containing a dot.
    Email,
}

impl FieldFormat {
    fn json_name(self) -> &'static str {
        match self {
            Self::Email => "email",
        }
    }
}

#[derive(Debug, Clone)]
struct FieldSpec {
    name: String,
    field_type: FieldType,
    description: String,
    required: bool,
    format: Option<FieldFormat>,
}

/// Declarative argument schema for a single tool.
///
/// Renders to a JSON Schema object for client-side discovery and compiles
/// to a validator for server-side enforcement, so the two views cannot
/// drift apart.
#[derive(Debug, Clone, Default)]
pub struct ToolSchema {
    fields: Vec<FieldSpec>,
}

impl ToolSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(self, name: &str, field_type: FieldType, description: &str) -> Self {
        self.field(name, field_type, description, true)
    }

    pub fn optional(self, name: &str, field_type: FieldType, description: &str) -> Self {
        self.field(name, field_type, description, false)
    }

    /// Attach a format constraint to a previously declared field.
    pub fn format(mut self, name: &str, format: FieldFormat) -> Self {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.format = Some(format);
        }
        self
    }

    fn field(
        mut self,
        name: &str,
        field_type: FieldType,
        description: &str,
        required: bool,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: name.to_string(),
            field_type,
            description: description.to_string(),
            required,
            format: None,
        });
        self
    }

    /// Render the declaration as a JSON Schema object.
    ///
    /// Strict mode adds `additionalProperties: false` so stray fields are
    /// rejected instead of ignored.
    pub fn to_json_schema(&self, strict: bool) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in &self.fields {
            let mut spec = Map::new();
            spec.insert("type".to_string(), json!(field.field_type.json_name()));
            spec.insert("description".to_string(), json!(field.description));
            if let Some(format) = field.format {
                spec.insert("format".to_string(), json!(format.json_name()));
            }
            properties.insert(field.name.clone(), Value::Object(spec));

            if field.required {
                required.push(json!(field.name));
            }
        }

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".to_string(), Value::Array(required));
        }
        if strict {
            schema.insert("additionalProperties".to_string(), json!(false));
        }
        Value::Object(schema)
    }

    /// Compile into an enforcing validator (JSON Schema draft 2020-12 with
    /// format assertion enabled).
    pub fn compile(&self, strict: bool) -> Result<CompiledSchema, SchemaError> {
        let declaration = self.to_json_schema(strict);
        let validator = jsonschema::options()
            .should_validate_formats(true)
            .with_format("email", is_plausible_email)
            .build(&declaration)
            .map_err(|e| SchemaError::Compile(e.to_string()))?;

        Ok(CompiledSchema {
            declaration,
            validator,
        })
    }
}

/// A compiled schema: the discovery-facing declaration plus its validator.
pub struct CompiledSchema {
    declaration: Value,
    validator: Validator,
}

impl CompiledSchema {
    pub fn declaration(&self) -> &Value {
        &self.declaration
    }

    /// Validate an argument object, collecting every violation at once so a
    /// single failure tells the caller everything wrong with the call.
    pub fn validate(&self, args: &Value) -> Result<(), FieldErrors> {
        let errors: Vec<FieldError> = self.validator.iter_errors(args).map(field_error).collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(FieldErrors::new(errors))
        }
    }
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("declaration", &self.declaration)
            .finish_non_exhaustive()
    }
}

/// One violated constraint: the offending field path plus a human message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Ordered list of field errors, displayed as one combined string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{error}")?;
            first = false;
        }
        Ok(())
    }
}

fn field_error(error: jsonschema::ValidationError<'_>) -> FieldError {
    let path = match error.kind() {
        // Missing-property errors point at the object root; name the
        // property itself instead.
        ValidationErrorKind::Required { property } => property
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| property.to_string()),
        _ => {
            let pointer = error.instance_path().to_string();
            let trimmed = pointer.trim_start_matches('/');
            if trimmed.is_empty() {
                "arguments".to_string()
            } else {
                trimmed.replace('/', ".")
            }
        }
    };

    FieldError {
        path,
        message: error.to_string(),
    }
}

/// Syntactic email check: `local@domain`, both parts non-empty, domain
/// containing at least one dot, no whitespace anywhere.
fn is_plausible_email(value: &str) -> bool {
    if value.contains(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && domain.contains('.'),
        None => false,
    }
}
