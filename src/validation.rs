use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use validator::{ValidateLength, ValidateRange, ValidateUrl};

use crate::models::{Genre, MoviePatch, NewMovie};

pub const YEAR_MIN: i64 = 1900;
pub const YEAR_MAX: i64 = 2025;
pub const RATE_MIN: f64 = 0.0;
pub const RATE_MAX: f64 = 10.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub code: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, code: &'static str, message: impl Into<String>) -> Self {
        Self { field: field.into(), code, message: message.into() }
    }
}

/// Every constraint violation found in one request body, in field order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn single(field: impl Into<String>, code: &'static str, message: impl Into<String>) -> Self {
        Self(vec![FieldError::new(field, code, message)])
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl Extend<FieldError> for FieldErrors {
    fn extend<I: IntoIterator<Item = FieldError>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for FieldErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

type Check<T> = fn(&'static str, &Value) -> Result<T, FieldErrors>;

/// Validates a complete movie body. `rate` defaults to 0 when absent.
pub fn validate_movie(input: &Value) -> Result<NewMovie, FieldErrors> {
    let obj = as_object(input)?;
    let mut errors = FieldErrors::default();

    let title = required(obj, "title", check_text, &mut errors);
    let year = required(obj, "year", check_year, &mut errors);
    let director = required(obj, "director", check_text, &mut errors);
    let duration = required(obj, "duration", check_duration, &mut errors);
    let rate = optional(obj, "rate", check_rate, &mut errors);
    let poster = required(obj, "poster", check_poster, &mut errors);
    let genre = required(obj, "genre", check_genres_non_empty, &mut errors);

    match (title, year, director, duration, poster, genre) {
        (Some(title), Some(year), Some(director), Some(duration), Some(poster), Some(genre))
            if errors.is_empty() =>
        {
            Ok(NewMovie {
                title,
                year,
                director,
                duration,
                rate: rate.unwrap_or(0.0),
                poster,
                genre,
            })
        }
        _ => Err(errors),
    }
}

/// Validates only the fields present in the body; absent fields stay `None`.
pub fn validate_partial_movie(input: &Value) -> Result<MoviePatch, FieldErrors> {
    let obj = as_object(input)?;
    let mut errors = FieldErrors::default();

    let patch = MoviePatch {
        title: optional(obj, "title", check_text, &mut errors),
        year: optional(obj, "year", check_year, &mut errors),
        director: optional(obj, "director", check_text, &mut errors),
        duration: optional(obj, "duration", check_duration, &mut errors),
        rate: optional(obj, "rate", check_rate, &mut errors),
        poster: optional(obj, "poster", check_poster, &mut errors),
        genre: optional(obj, "genre", check_genres, &mut errors),
    };

    if errors.is_empty() { Ok(patch) } else { Err(errors) }
}

fn as_object(input: &Value) -> Result<&Map<String, Value>, FieldErrors> {
    input.as_object().ok_or_else(|| {
        FieldErrors::single(
            "body",
            "invalid_type",
            format!("expected a JSON object, received {}", type_name(input)),
        )
    })
}

fn required<T>(
    obj: &Map<String, Value>,
    field: &'static str,
    check: Check<T>,
    errors: &mut FieldErrors,
) -> Option<T> {
    if !obj.contains_key(field) {
        errors.push(FieldError::new(field, "required", format!("{field} is required")));
        return None;
    }
    optional(obj, field, check, errors)
}

fn optional<T>(
    obj: &Map<String, Value>,
    field: &'static str,
    check: Check<T>,
    errors: &mut FieldErrors,
) -> Option<T> {
    let value = obj.get(field)?;
    match check(field, value) {
        Ok(v) => Some(v),
        Err(e) => {
            errors.extend(e);
            None
        }
    }
}

fn check_text(field: &'static str, value: &Value) -> Result<String, FieldErrors> {
    let text = value.as_str().ok_or_else(|| invalid_type(field, "string", value))?;
    if !text.trim().validate_length(Some(1_u64), None, None) {
        return Err(FieldErrors::single(field, "too_small", format!("{field} must not be empty")));
    }
    Ok(text.to_string())
}

fn check_year(field: &'static str, value: &Value) -> Result<i32, FieldErrors> {
    let year = as_integer(field, value)?;
    if !year.validate_range(Some(YEAR_MIN), Some(YEAR_MAX), None, None) {
        let code = if year < YEAR_MIN { "too_small" } else { "too_big" };
        return Err(FieldErrors::single(
            field,
            code,
            format!("{field} must be between {YEAR_MIN} and {YEAR_MAX}"),
        ));
    }
    // Bounded by the range check above.
    Ok(year as i32)
}

fn check_duration(field: &'static str, value: &Value) -> Result<u32, FieldErrors> {
    let duration = as_integer(field, value)?;
    if !duration.validate_range(Some(1), None, None, None) {
        return Err(FieldErrors::single(field, "too_small", format!("{field} must be positive")));
    }
    u32::try_from(duration)
        .map_err(|_| FieldErrors::single(field, "too_big", format!("{field} is too large")))
}

fn check_rate(field: &'static str, value: &Value) -> Result<f64, FieldErrors> {
    let rate = value.as_f64().ok_or_else(|| invalid_type(field, "number", value))?;
    if !rate.validate_range(Some(RATE_MIN), Some(RATE_MAX), None, None) {
        let code = if rate < RATE_MIN { "too_small" } else { "too_big" };
        return Err(FieldErrors::single(
            field,
            code,
            format!("{field} must be between {RATE_MIN} and {RATE_MAX}"),
        ));
    }
    Ok(rate)
}

fn check_poster(field: &'static str, value: &Value) -> Result<String, FieldErrors> {
    let poster = value.as_str().ok_or_else(|| invalid_type(field, "string", value))?;
    if !poster.validate_url() {
        return Err(FieldErrors::single(field, "invalid_url", format!("{field} must be a valid URL")));
    }
    Ok(poster.to_string())
}

fn check_genres(field: &'static str, value: &Value) -> Result<Vec<Genre>, FieldErrors> {
    let items = value.as_array().ok_or_else(|| invalid_type(field, "array", value))?;
    let mut errors = FieldErrors::default();
    let mut genres = Vec::with_capacity(items.len());

    for (i, item) in items.iter().enumerate() {
        match item.as_str().and_then(Genre::from_name) {
            Some(genre) => genres.push(genre),
            None => errors.push(FieldError::new(
                field,
                "invalid_enum_value",
                format!("{field}[{i}] must be one of {}", genre_names()),
            )),
        }
    }

    if errors.is_empty() { Ok(genres) } else { Err(errors) }
}

fn check_genres_non_empty(field: &'static str, value: &Value) -> Result<Vec<Genre>, FieldErrors> {
    let genres = check_genres(field, value)?;
    if genres.is_empty() {
        return Err(FieldErrors::single(
            field,
            "too_small",
            format!("{field} must contain at least one genre"),
        ));
    }
    Ok(genres)
}

/// Accepts integral JSON numbers, including ones written as `2000.0`.
fn as_integer(field: &'static str, value: &Value) -> Result<i64, FieldErrors> {
    if let Some(n) = value.as_i64() {
        return Ok(n);
    }
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => Ok(f as i64),
        Some(_) => Err(FieldErrors::single(field, "invalid_type", format!("{field} must be an integer"))),
        None => Err(invalid_type(field, "integer", value)),
    }
}

fn invalid_type(field: &'static str, expected: &str, value: &Value) -> FieldErrors {
    FieldErrors::single(
        field,
        "invalid_type",
        format!("{field} must be a {expected}, received {}", type_name(value)),
    )
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn genre_names() -> String {
    Genre::ALL.iter().map(|g| g.as_str()).collect::<Vec<_>>().join(", ")
}
