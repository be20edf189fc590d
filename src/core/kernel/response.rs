use crate::core::errors::ExchangeError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Transport output: the body text plus the HTTP status, on any status.
/// Interpretation belongs to [`classify`], not to the transport.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Caller-selected response representation, chosen explicitly on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnFormat {
    /// The body verbatim, valid JSON or not.
    RawText,
    /// The body parsed into a generic JSON tree.
    GenericJson,
    /// The generic tree run through an endpoint-specific mapping function.
    TypedObject,
}

/// A materialized response value; the variant always matches the requested
/// [`ReturnFormat`].
#[derive(Debug)]
pub enum Materialized<T = Value> {
    RawText(String),
    GenericJson(Value),
    Typed(T),
}

impl<T> Materialized<T> {
    pub fn into_raw(self) -> Result<String, ExchangeError> {
        match self {
            Self::RawText(text) => Ok(text),
            _ => Err(ExchangeError::DeserializationError(
                "response was not materialized as raw text".to_string(),
            )),
        }
    }

    pub fn into_json(self) -> Result<Value, ExchangeError> {
        match self {
            Self::GenericJson(value) => Ok(value),
            _ => Err(ExchangeError::DeserializationError(
                "response was not materialized as generic JSON".to_string(),
            )),
        }
    }

    pub fn into_typed(self) -> Result<T, ExchangeError> {
        match self {
            Self::Typed(typed) => Ok(typed),
            _ => Err(ExchangeError::DeserializationError(
                "response was not materialized as a typed object".to_string(),
            )),
        }
    }
}

/// Wire shape of an upstream error payload.
#[derive(Debug, Deserialize)]
struct UpstreamError {
    code: i64,
    msg: String,
}

/// Classify a raw response, passing healthy bodies through.
///
/// An upstream `{"code":…,"msg":…}` payload wins on any HTTP status and is
/// surfaced unmodified so callers can branch on the exchange's own code. A
/// non-success status without that payload is reported with the HTTP status
/// standing in as the code.
pub fn classify(response: RawResponse) -> Result<RawResponse, ExchangeError> {
    if let Ok(upstream) = serde_json::from_str::<UpstreamError>(&response.body) {
        if upstream.code != 0 {
            return Err(ExchangeError::ApiError {
                status: response.status,
                code: upstream.code,
                message: upstream.msg,
            });
        }
    }

    if !(200..300).contains(&response.status) {
        return Err(ExchangeError::ApiError {
            status: response.status,
            code: i64::from(response.status),
            message: response.body,
        });
    }

    Ok(response)
}

fn parse_json(body: &str) -> Result<Value, ExchangeError> {
    serde_json::from_str(body).map_err(|e| {
        ExchangeError::DeserializationError(format!("Failed to parse JSON response: {}", e))
    })
}

/// Convert a classified response into the requested representation.
///
/// `mapper` is the endpoint-specific field mapping owned by the calling
/// facade; it is required for (and only consulted by) `TypedObject`, and any
/// error it raises propagates as a deserialization failure.
pub fn materialize<T, F>(
    response: RawResponse,
    format: ReturnFormat,
    mapper: Option<F>,
) -> Result<Materialized<T>, ExchangeError>
where
    F: FnOnce(Value) -> Result<T, ExchangeError>,
{
    match format {
        ReturnFormat::RawText => Ok(Materialized::RawText(response.body)),
        ReturnFormat::GenericJson => Ok(Materialized::GenericJson(parse_json(&response.body)?)),
        ReturnFormat::TypedObject => {
            let mapper = mapper.ok_or_else(|| {
                ExchangeError::InvalidParameters(
                    "TypedObject materialization requires a mapping function".to_string(),
                )
            })?;
            let value = parse_json(&response.body)?;
            Ok(Materialized::Typed(mapper(value)?))
        }
    }
}

/// Standard mapping function for serde-derived records.
pub fn from_json<T: DeserializeOwned>(value: Value) -> Result<T, ExchangeError> {
    serde_json::from_value(value).map_err(|e| {
        ExchangeError::DeserializationError(format!("Failed to deserialize JSON: {}", e))
    })
}

/// Typed field extraction over a generic JSON tree.
///
/// Hand-written mappers (heterogeneous-array wire shapes, mostly) go through
/// this one utility so missing-field behavior is defined in a single place:
/// required accessors fail with a deserialization error naming the field,
/// `opt_*` accessors return `None`, and defaults exist only where the call
/// site states one explicitly via `*_or`.
pub struct JsonReader<'a> {
    value: &'a Value,
    context: &'a str,
}

impl<'a> JsonReader<'a> {
    pub fn new(value: &'a Value, context: &'a str) -> Self {
        Self { value, context }
    }

    fn missing(&self, field: &str) -> ExchangeError {
        ExchangeError::DeserializationError(format!(
            "{}: missing or mistyped field '{}'",
            self.context, field
        ))
    }

    pub fn str_field(&self, field: &str) -> Result<&'a str, ExchangeError> {
        self.value
            .get(field)
            .and_then(Value::as_str)
            .ok_or_else(|| self.missing(field))
    }

    pub fn opt_str_field(&self, field: &str) -> Option<&'a str> {
        self.value.get(field).and_then(Value::as_str)
    }

    pub fn u64_field(&self, field: &str) -> Result<u64, ExchangeError> {
        self.value
            .get(field)
            .and_then(Value::as_u64)
            .ok_or_else(|| self.missing(field))
    }

    pub fn u64_field_or(&self, field: &str, default: u64) -> u64 {
        self.value.get(field).and_then(Value::as_u64).unwrap_or(default)
    }

    pub fn bool_field_or(&self, field: &str, default: bool) -> bool {
        self.value
            .get(field)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    pub fn decimal_field(&self, field: &str) -> Result<rust_decimal::Decimal, ExchangeError> {
        let raw = self.str_field(field)?;
        raw.parse().map_err(|e| {
            ExchangeError::DeserializationError(format!(
                "{}: field '{}' is not a decimal: {}",
                self.context, field, e
            ))
        })
    }

    /// Element of a heterogeneous wire array, as string.
    pub fn str_at(&self, index: usize) -> Result<&'a str, ExchangeError> {
        self.value
            .get(index)
            .and_then(Value::as_str)
            .ok_or_else(|| self.missing(&index.to_string()))
    }

    /// Element of a heterogeneous wire array, as u64.
    pub fn u64_at(&self, index: usize) -> Result<u64, ExchangeError> {
        self.value
            .get(index)
            .and_then(Value::as_u64)
            .ok_or_else(|| self.missing(&index.to_string()))
    }

    /// Element of a heterogeneous wire array: a decimal carried as a string.
    pub fn decimal_at(&self, index: usize) -> Result<rust_decimal::Decimal, ExchangeError> {
        let raw = self.str_at(index)?;
        raw.parse().map_err(|e| {
            ExchangeError::DeserializationError(format!(
                "{}: element {} is not a decimal: {}",
                self.context, index, e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok_response(body: &str) -> RawResponse {
        RawResponse {
            status: 200,
            body: body.to_string(),
        }
    }

    #[test]
    fn raw_text_returns_body_unchanged() {
        for body in ["{\"a\":1}", "not json at all", "", "<html>teapot</html>"] {
            let materialized: Materialized = materialize(
                ok_response(body),
                ReturnFormat::RawText,
                None::<fn(Value) -> Result<Value, ExchangeError>>,
            )
            .unwrap();
            assert_eq!(materialized.into_raw().unwrap(), body);
        }
    }

    #[test]
    fn generic_json_parses_tree() {
        let materialized: Materialized = materialize(
            ok_response(r#"{"serverTime":1499827319559}"#),
            ReturnFormat::GenericJson,
            None::<fn(Value) -> Result<Value, ExchangeError>>,
        )
        .unwrap();
        let value = materialized.into_json().unwrap();
        assert_eq!(value["serverTime"], 1_499_827_319_559_u64);
    }

    #[test]
    fn malformed_json_is_deserialization_error() {
        let err = materialize(
            ok_response("{not json"),
            ReturnFormat::GenericJson,
            None::<fn(Value) -> Result<Value, ExchangeError>>,
        )
        .unwrap_err();
        assert!(matches!(err, ExchangeError::DeserializationError(_)));
    }

    #[test]
    fn typed_object_runs_mapper() {
        let materialized = materialize(
            ok_response(r#"{"serverTime":7}"#),
            ReturnFormat::TypedObject,
            Some(|v: Value| Ok(v["serverTime"].as_u64().unwrap_or_default())),
        )
        .unwrap();
        assert_eq!(materialized.into_typed().unwrap(), 7);
    }

    #[test]
    fn mapper_failure_propagates_as_deserialization() {
        let err = materialize(
            ok_response(r#"{"serverTime":7}"#),
            ReturnFormat::TypedObject,
            Some(|_: Value| -> Result<u64, ExchangeError> {
                Err(ExchangeError::DeserializationError("bad field".to_string()))
            }),
        )
        .unwrap_err();
        assert!(matches!(err, ExchangeError::DeserializationError(_)));
    }

    #[test]
    fn typed_object_without_mapper_is_rejected() {
        let err = materialize(
            ok_response("{}"),
            ReturnFormat::TypedObject,
            None::<fn(Value) -> Result<Value, ExchangeError>>,
        )
        .unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidParameters(_)));
    }

    #[test]
    fn upstream_error_payload_wins_on_any_status() {
        let err = classify(RawResponse {
            status: 200,
            body: r#"{"code":-1121,"msg":"Invalid symbol."}"#.to_string(),
        })
        .unwrap_err();
        match err {
            ExchangeError::ApiError { code, message, .. } => {
                assert_eq!(code, -1121);
                assert_eq!(message, "Invalid symbol.");
            }
            other => panic!("expected ApiError, got {:?}", other),
        }
    }

    #[test]
    fn non_success_without_payload_uses_http_status() {
        let err = classify(RawResponse {
            status: 503,
            body: "<html>unavailable</html>".to_string(),
        })
        .unwrap_err();
        match err {
            ExchangeError::ApiError { status, code, .. } => {
                assert_eq!(status, 503);
                assert_eq!(code, 503);
            }
            other => panic!("expected ApiError, got {:?}", other),
        }
    }

    #[test]
    fn healthy_body_passes_classification() {
        let response = classify(ok_response(r#"{"status":0,"msg":"normal"}"#)).unwrap();
        // `msg` without `code` is not an error payload.
        assert_eq!(response.status, 200);
    }

    #[test]
    fn reader_reports_missing_fields_by_name() {
        let value = json!({"symbol": "BTCUSD"});
        let reader = JsonReader::new(&value, "order");
        let err = reader.str_field("price").unwrap_err();
        assert!(err.to_string().contains("price"));
        assert_eq!(reader.opt_str_field("price"), None);
        assert_eq!(reader.u64_field_or("orderId", 0), 0);
    }

    #[test]
    fn reader_extracts_array_elements() {
        let value = json!([1_499_040_000_000_u64, "0.01634790", "0.80000000"]);
        let reader = JsonReader::new(&value, "kline");
        assert_eq!(reader.u64_at(0).unwrap(), 1_499_040_000_000);
        assert_eq!(reader.decimal_at(1).unwrap().to_string(), "0.01634790");
        assert!(reader.str_at(9).is_err());
    }
}
