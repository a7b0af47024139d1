//! Request body → model feature vector.
//!
//! The column order below is the schema the charge model was trained with and
//! must not change without retraining:
//!
//! `[age, bmi, children, sex, smoker, region_northwest, region_southeast, region_southwest]`
//!
//! Northeast is the dropped one-hot category, so it encodes as all three
//! region flags false.

use ndarray::Array2;
use serde_json::{Map, Value};
use thiserror::Error;

pub const FEATURE_COUNT: usize = 8;

pub const REQUIRED_FIELDS: [&str; 6] = ["age", "bmi", "children", "sex", "smoker", "region"];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FeatureError {
    #[error("Request body is not valid JSON: {0}")]
    MalformedJson(String),
    #[error("Request body must be a JSON object")]
    NotAnObject,
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Field '{field}' must be a number, got {found}")]
    NotANumber { field: &'static str, found: String },
    #[error("Field '{field}' cannot be converted to an integer: {found}")]
    NotAnInteger { field: &'static str, found: String },
    #[error("Unknown region {0}, expected one of northeast, northwest, southeast, southwest")]
    UnknownRegion(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// `"male"` is male; every other value, including non-strings, is female.
    pub fn from_value(value: &Value) -> Self {
        match value.as_str() {
            Some("male") => Sex::Male,
            _ => Sex::Female,
        }
    }

    pub fn encode(self) -> f64 {
        match self {
            Sex::Male => 0.0,
            Sex::Female => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl Region {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "northeast" => Some(Region::Northeast),
            "northwest" => Some(Region::Northwest),
            "southeast" => Some(Region::Southeast),
            "southwest" => Some(Region::Southwest),
            _ => None,
        }
    }

    /// `[is_northwest, is_southeast, is_southwest]`
    pub fn one_hot(self) -> [f64; 3] {
        match self {
            Region::Northeast => [0.0, 0.0, 0.0],
            Region::Northwest => [1.0, 0.0, 0.0],
            Region::Southeast => [0.0, 1.0, 0.0],
            Region::Southwest => [0.0, 0.0, 1.0],
        }
    }
}

/// A validated prediction request.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub age: f64,
    pub bmi: i64,
    pub children: i64,
    pub sex: Sex,
    pub smoker: bool,
    pub region: Region,
}

impl PredictionRequest {
    /// Parse a raw request body.
    pub fn from_slice(body: &[u8], strict_region: bool) -> Result<Self, FeatureError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| FeatureError::MalformedJson(e.to_string()))?;
        Self::from_json(&value, strict_region)
    }

    /// Extract the request fields from a JSON object.
    ///
    /// All six fields must be present. With `strict_region` off, any region
    /// label other than the three explicit ones falls through to northeast.
    pub fn from_json(value: &Value, strict_region: bool) -> Result<Self, FeatureError> {
        let object = value.as_object().ok_or(FeatureError::NotAnObject)?;

        if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !object.contains_key(**f)) {
            return Err(FeatureError::MissingField(*missing));
        }

        let region_value = field(object, "region")?;
        let region = match region_value.as_str().and_then(Region::from_label) {
            Some(region) => region,
            None if strict_region => {
                return Err(FeatureError::UnknownRegion(display_value(region_value)))
            }
            None => Region::Northeast,
        };

        Ok(Self {
            age: number_field(object, "age")?,
            bmi: integer_field(object, "bmi")?,
            children: integer_field(object, "children")?,
            sex: Sex::from_value(field(object, "sex")?),
            smoker: field(object, "smoker")?.as_str() == Some("yes"),
            region,
        })
    }

    pub fn features(&self) -> FeatureVector {
        let [northwest, southeast, southwest] = self.region.one_hot();
        FeatureVector([
            self.age,
            self.bmi as f64,
            self.children as f64,
            self.sex.encode(),
            if self.smoker { 1.0 } else { 0.0 },
            northwest,
            southeast,
            southwest,
        ])
    }
}

/// Fixed-width, fixed-order model input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// One-row matrix ready for [`crate::inference::Regressor::predict`].
    pub fn to_row(&self) -> Array2<f64> {
        Array2::from_shape_fn((1, FEATURE_COUNT), |(_, j)| self.0[j])
    }
}

fn field<'a>(object: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value, FeatureError> {
    object.get(name).ok_or(FeatureError::MissingField(name))
}

fn number_field(object: &Map<String, Value>, name: &'static str) -> Result<f64, FeatureError> {
    let value = field(object, name)?;
    value.as_f64().ok_or_else(|| FeatureError::NotANumber {
        field: name,
        found: display_value(value),
    })
}

/// Integer coercion: numbers truncate toward zero, booleans map to 0/1 and
/// strings must hold a base-10 integer.
fn integer_field(object: &Map<String, Value>, name: &'static str) -> Result<i64, FeatureError> {
    let value = field(object, name)?;
    let not_an_integer = || FeatureError::NotAnInteger {
        field: name,
        found: display_value(value),
    };

    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(i),
            None => n
                .as_f64()
                .map(f64::trunc)
                .filter(|f| *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
                .ok_or_else(not_an_integer),
        },
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| not_an_integer()),
        _ => Err(not_an_integer()),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s),
        other => other.to_string(),
    }
}
