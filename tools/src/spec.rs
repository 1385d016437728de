//! Tool parameter specifications.
//!
//! Describes the arguments a tool accepts, renders them as JSON Schema for
//! function calling, and validates raw arguments before dispatch.

use serde::{Deserialize, Serialize};

/// Specification for a tool's parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Input parameters for the tool.
    pub inputs: Vec<ToolInput>,
}

impl ToolSpec {
    /// Create a new empty tool spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an input parameter.
    pub fn with_input(mut self, input: ToolInput) -> Self {
        self.inputs.push(input);
        self
    }

    /// Generate JSON Schema from inputs.
    pub fn generate_schema(&self) -> serde_json::Value {
        object_schema(&self.inputs)
    }

    /// Validate input values against the spec.
    pub fn validate_inputs(&self, values: &serde_json::Value) -> Result<(), String> {
        validate_object(&self.inputs, values, "Input")
    }
}

fn object_schema(inputs: &[ToolInput]) -> serde_json::Value {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();

    for input in inputs {
        properties.insert(input.name.clone(), input.to_schema());
        if input.required {
            required.push(serde_json::Value::String(input.name.clone()));
        }
    }

    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

fn validate_object(
    inputs: &[ToolInput],
    values: &serde_json::Value,
    label: &str,
) -> Result<(), String> {
    let obj = values
        .as_object()
        .ok_or_else(|| format!("{label} must be an object"))?;

    for input in inputs {
        match obj.get(&input.name) {
            Some(value) => input.validate(value)?,
            None if input.required => {
                return Err(format!("Missing required input: {}", input.name));
            }
            None => {}
        }
    }

    Ok(())
}

/// An input parameter for a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInput {
    /// Parameter name.
    pub name: String,

    /// Data type.
    pub data_type: DataType,

    /// Description of the parameter.
    pub description: String,

    /// Whether the parameter is required.
    pub required: bool,

    /// Default value (if not required).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    /// Validation constraints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<InputConstraints>,

    /// Fields of an object parameter.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<ToolInput>,
}

impl ToolInput {
    /// Create a new required input parameter.
    pub fn required(
        name: impl Into<String>,
        data_type: DataType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type,
            description: description.into(),
            required: true,
            default: None,
            constraints: None,
            properties: Vec::new(),
        }
    }

    /// Create a new optional input parameter.
    pub fn optional(
        name: impl Into<String>,
        data_type: DataType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            required: false,
            ..Self::required(name, data_type, description)
        }
    }

    /// Set a default value.
    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self.required = false;
        self
    }

    /// Add constraints.
    pub fn with_constraints(mut self, constraints: InputConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    /// Declare the fields of an object parameter.
    pub fn with_properties(mut self, properties: Vec<ToolInput>) -> Self {
        self.properties = properties;
        self
    }

    /// Convert to JSON Schema.
    pub fn to_schema(&self) -> serde_json::Value {
        let mut schema = if self.data_type == DataType::Object && !self.properties.is_empty() {
            object_schema(&self.properties)
        } else {
            serde_json::json!({ "type": self.data_type.to_json_type() })
        };
        schema["description"] = serde_json::json!(self.description);

        if let Some(default) = &self.default {
            schema["default"] = default.clone();
        }

        if let Some(constraints) = &self.constraints {
            constraints.apply_to_schema(&mut schema);
        }

        schema
    }

    /// Validate a value against this input's type and constraints.
    pub fn validate(&self, value: &serde_json::Value) -> Result<(), String> {
        // Type checking
        let valid_type = match self.data_type {
            DataType::String => value.is_string(),
            DataType::Integer => value.is_i64() || value.is_u64(),
            DataType::Number => value.is_number(),
            DataType::Boolean => value.is_boolean(),
            DataType::Array => value.is_array(),
            DataType::Object => value.is_object(),
        };

        if !valid_type {
            return Err(format!(
                "Invalid type for {}: expected {}",
                self.name,
                self.data_type.to_json_type()
            ));
        }

        if self.data_type == DataType::Object && !self.properties.is_empty() {
            validate_object(&self.properties, value, &self.name)?;
        }

        // Constraint checking
        if let Some(constraints) = &self.constraints {
            constraints.validate(value, &self.name)?;
        }

        Ok(())
    }
}

/// Data types for tool parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl DataType {
    /// Convert to JSON Schema type string.
    pub fn to_json_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

/// Constraints for input validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConstraints {
    /// Minimum value (for numbers).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Maximum value (for numbers).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Minimum length (for strings).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    /// Enumeration of allowed values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
}

impl InputConstraints {
    /// Require a string of at least `min` characters.
    pub fn min_length(min: usize) -> Self {
        Self {
            min_length: Some(min),
            ..Default::default()
        }
    }

    /// Create constraints from an enum of allowed values.
    pub fn enum_of(values: Vec<serde_json::Value>) -> Self {
        Self {
            enum_values: Some(values),
            ..Default::default()
        }
    }

    /// Apply constraints to a JSON Schema object.
    pub fn apply_to_schema(&self, schema: &mut serde_json::Value) {
        if let Some(min) = self.min {
            schema["minimum"] = serde_json::json!(min);
        }
        if let Some(max) = self.max {
            schema["maximum"] = serde_json::json!(max);
        }
        if let Some(min_len) = self.min_length {
            schema["minLength"] = serde_json::json!(min_len);
        }
        if let Some(enum_vals) = &self.enum_values {
            schema["enum"] = serde_json::json!(enum_vals);
        }
    }

    /// Validate a value against these constraints.
    pub fn validate(&self, value: &serde_json::Value, name: &str) -> Result<(), String> {
        if let Some(num) = value.as_f64() {
            if let Some(min) = self.min {
                if num < min {
                    return Err(format!("{name}: value {num} is less than minimum {min}"));
                }
            }
            if let Some(max) = self.max {
                if num > max {
                    return Err(format!("{name}: value {num} is greater than maximum {max}"));
                }
            }
        }

        if let (Some(s), Some(min)) = (value.as_str(), self.min_length) {
            if s.trim().chars().count() < min {
                return Err(format!("{name} must be a non-empty string"));
            }
        }

        if let Some(enum_vals) = &self.enum_values {
            if !enum_vals.contains(value) {
                return Err(format!("{name}: value {value} is not one of {enum_vals:?}"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_tool_spec_schema_generation() {
        let spec = ToolSpec::new()
            .with_input(ToolInput::required("message", DataType::String, "Query"))
            .with_input(
                ToolInput::optional("top_k", DataType::Integer, "Result count")
                    .with_default(json!(5)),
            );

        let schema = spec.generate_schema();
        assert_eq!(schema["properties"]["message"]["type"], json!("string"));
        assert_eq!(schema["properties"]["top_k"]["default"], json!(5));
        assert_eq!(schema["required"], json!(["message"]));
    }

    #[test]
    fn test_nested_object_schema() {
        let input = ToolInput::required("position", DataType::Object, "Where").with_properties(
            vec![
                ToolInput::required("x", DataType::Number, "x"),
                ToolInput::required("y", DataType::Number, "y"),
            ],
        );

        let schema = input.to_schema();
        assert_eq!(schema["type"], json!("object"));
        assert_eq!(schema["description"], json!("Where"));
        assert_eq!(schema["required"], json!(["x", "y"]));
        assert_eq!(schema["properties"]["y"]["type"], json!("number"));
    }

    #[test]
    fn test_input_validation() {
        let input = ToolInput::required("count", DataType::Integer, "Count")
            .with_constraints(InputConstraints {
                min: Some(0.0),
                max: Some(100.0),
                ..Default::default()
            });

        assert!(input.validate(&json!(50)).is_ok());
        assert!(input.validate(&json!(150)).is_err());
        assert!(input.validate(&json!(2.5)).is_err());
        assert!(input.validate(&json!("50")).is_err());
    }

    #[test]
    fn test_nested_validation() {
        let spec = ToolSpec::new().with_input(
            ToolInput::required("position", DataType::Object, "Where")
                .with_properties(vec![ToolInput::required("z", DataType::Number, "z")]),
        );

        assert!(spec.validate_inputs(&json!({ "position": { "z": 1.5 } })).is_ok());
        assert_eq!(
            spec.validate_inputs(&json!({ "position": { "x": 1.5 } })),
            Err("Missing required input: z".to_string())
        );
        assert!(spec.validate_inputs(&json!({ "position": { "z": "far" } })).is_err());
    }

    #[test]
    fn test_missing_and_non_object() {
        let spec = ToolSpec::new().with_input(ToolInput::required("message", DataType::String, "q"));

        assert_eq!(
            spec.validate_inputs(&json!({})),
            Err("Missing required input: message".to_string())
        );
        assert_eq!(
            spec.validate_inputs(&json!("hello")),
            Err("Input must be an object".to_string())
        );
    }

    #[test]
    fn test_enum_and_min_length() {
        let unit = ToolInput::required("unit", DataType::String, "Unit")
            .with_constraints(InputConstraints::enum_of(vec![json!("km"), json!("au")]));
        assert!(unit.validate(&json!("au")).is_ok());
        assert!(unit.validate(&json!("parsec")).is_err());

        let message = ToolInput::required("message", DataType::String, "Query")
            .with_constraints(InputConstraints::min_length(1));
        assert!(message.validate(&json!("Mars")).is_ok());
        assert!(message.validate(&json!("  ")).is_err());
    }
}
