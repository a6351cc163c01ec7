//! Column metadata for the query builder's field picker.
//!
//! Catalog rows (`information_schema.columns` style) become field
//! descriptors whose names are the dotted `table.column` references the
//! compiler resolves.

use miniserde::json::{self, Array, Object, Value as JsonValue};
use tracing::debug;

use crate::builder::ParseError;

/// Editor widget used for a column's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub enum InputType {
    Number,
    Checkbox,
    Date,
    DateTimeLocal,
    Time,
    #[default]
    Text,
}

impl InputType {
    /// HTML input type name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Checkbox => "checkbox",
            Self::Date => "date",
            Self::DateTimeLocal => "datetime-local",
            Self::Time => "time",
            Self::Text => "text",
        }
    }

    /// Input type for a Postgres data type name, ignoring case.
    ///
    /// ```
    /// use rowscout_sql::InputType;
    ///
    /// assert_eq!(InputType::for_postgres_type("BIGINT"), InputType::Number);
    /// assert_eq!(InputType::for_postgres_type("timestamptz"), InputType::DateTimeLocal);
    /// assert_eq!(InputType::for_postgres_type("uuid"), InputType::Text);
    /// ```
    pub fn for_postgres_type(data_type: &str) -> Self {
        POSTGRES_INPUT_TYPES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(data_type))
            .map_or(Self::Text, |(_, input)| *input)
    }
}

/// Postgres type names with a dedicated editor. Everything else is text.
pub const POSTGRES_INPUT_TYPES: &[(&str, InputType)] = &[
    ("integer", InputType::Number),
    ("bigint", InputType::Number),
    ("int8", InputType::Number),
    ("int4", InputType::Number),
    ("numeric", InputType::Number),
    ("real", InputType::Number),
    ("double precision", InputType::Number),
    ("boolean", InputType::Checkbox),
    ("date", InputType::Date),
    ("timestamp", InputType::DateTimeLocal),
    ("timestamptz", InputType::DateTimeLocal),
    ("time", InputType::Time),
];

/// One column from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Postgres type name, e.g. `integer` or `timestamp`.
    pub data_type: String,
    /// Whether the column accepts `NULL`.
    pub nullable: bool,
}

impl ColumnInfo {
    /// Describe a column.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable,
        }
    }

    /// Read one catalog row.
    ///
    /// Accepts raw catalog keys (`column_name`, `data_type`, `is_nullable`
    /// as `"YES"`/`"NO"`) as well as the short form (`name`, `type`,
    /// `nullable` as a boolean). Returns `None` when the row has no name.
    pub fn from_json(json: &JsonValue) -> Option<Self> {
        let JsonValue::Object(obj) = json else {
            return None;
        };
        let name = string_of(obj, &["column_name", "name"]).filter(|n| !n.is_empty())?;
        let data_type = string_of(obj, &["data_type", "type"]).unwrap_or_default();
        let nullable = match (obj.get("is_nullable"), obj.get("nullable")) {
            (Some(JsonValue::String(flag)), _) => flag == "YES",
            (_, Some(JsonValue::Bool(flag))) => *flag,
            _ => false,
        };
        Some(Self {
            name,
            data_type,
            nullable,
        })
    }

    /// Parse a JSON array of catalog rows. Rows without a column name are
    /// skipped.
    pub fn parse_catalog(json_str: &str) -> Result<Vec<Self>, ParseError> {
        let json: JsonValue = json::from_str(json_str).map_err(|_| ParseError::InvalidJson)?;
        let JsonValue::Array(rows) = json else {
            return Err(ParseError::ExpectedArray);
        };
        let mut columns = Vec::with_capacity(rows.len());
        for row in rows.iter() {
            match Self::from_json(row) {
                Some(column) => columns.push(column),
                None => debug!(row = %json::to_string(row), "skipping catalog row without a column name"),
            }
        }
        Ok(columns)
    }

    /// Editor widget for this column.
    pub fn input_type(&self) -> InputType {
        InputType::for_postgres_type(&self.data_type)
    }
}

fn string_of(obj: &Object, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(JsonValue::String(s)) => Some(s.clone()),
        _ => None,
    })
}

/// A filterable field as offered to the query builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// `table.column`, usable as a rule field.
    pub name: String,
    /// Display label.
    pub label: String,
    /// Editor widget.
    pub input_type: InputType,
}

impl FieldDescriptor {
    /// `{"name", "label", "inputType"}` object.
    pub fn to_json(&self) -> JsonValue {
        let mut obj = Object::new();
        obj.insert("name".into(), JsonValue::String(self.name.clone()));
        obj.insert("label".into(), JsonValue::String(self.label.clone()));
        obj.insert(
            "inputType".into(),
            JsonValue::String(self.input_type.as_str().to_string()),
        );
        JsonValue::Object(obj)
    }
}

/// Field descriptors for every column of `table`.
///
/// ```
/// use rowscout_sql::{ColumnInfo, InputType, field_descriptors};
///
/// let fields = field_descriptors("users", &[ColumnInfo::new("age", "integer", true)]);
/// assert_eq!(fields[0].name, "users.age");
/// assert_eq!(fields[0].input_type, InputType::Number);
/// ```
pub fn field_descriptors(table: &str, columns: &[ColumnInfo]) -> Vec<FieldDescriptor> {
    columns
        .iter()
        .map(|col| {
            let name = format!("{table}.{}", col.name);
            FieldDescriptor {
                label: name.clone(),
                name,
                input_type: col.input_type(),
            }
        })
        .collect()
}

/// Render descriptors as a JSON array.
pub fn fields_to_json(fields: &[FieldDescriptor]) -> String {
    let mut arr = Array::new();
    for field in fields {
        arr.push(field.to_json());
    }
    json::to_string(&JsonValue::Array(arr))
}
