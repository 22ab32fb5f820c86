use crate::error::AppError;
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

/// Grid captured alongside a payment. Any non-empty rectangular matrix of
/// strings is accepted; it is not required to be a generated 10x10 grid.
pub type GridSnapshot = Vec<Vec<String>>;

pub const INVALID_NAME: &str = "Invalid name";
pub const INVALID_AMOUNT: &str = "Invalid amount";
pub const INVALID_CODE: &str = "Invalid code";
pub const INVALID_GRID: &str = "Invalid grid";
/// A positive amount that `Decimal` cannot hold (above ~7.9e28 or below 1e-28).
pub const AMOUNT_OUT_OF_RANGE: &str = "Amount out of range";

/// A strictly positive payment amount, serialized as a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Amount(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, AppError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(AppError::Validation(vec![INVALID_AMOUNT.to_string()]))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Reads a JSON number. Non-numbers and values `<= 0` are invalid;
    /// positive values outside the `Decimal` range are reported separately.
    fn from_json(value: Option<&Value>) -> Result<Self, &'static str> {
        let number = value
            .and_then(Value::as_f64)
            .filter(|n| n.is_finite() && *n > 0.0)
            .ok_or(INVALID_AMOUNT)?;

        Decimal::from_f64(number)
            .filter(|d| *d > Decimal::ZERO)
            .map(Self)
            .ok_or(AMOUNT_OUT_OF_RANGE)
    }
}

/// A recorded payment event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub name: String,
    pub amount: Amount,
    pub code: String,
    pub grid: GridSnapshot,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

fn serialize_timestamp<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl Payment {
    /// Stamps validated input with a fresh id and creation time.
    pub fn new(input: NewPayment) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            amount: input.amount,
            code: input.code,
            grid: input.grid,
            created_at: Utc::now(),
        }
    }

    /// Merges the provided fields into this payment.
    pub fn apply(&mut self, update: PaymentUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
    }
}

/// Validated input for creating a payment.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub name: String,
    pub amount: Amount,
    pub code: String,
    pub grid: GridSnapshot,
}

/// Validated partial update; only name and amount are mutable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentUpdate {
    pub name: Option<String>,
    pub amount: Option<Amount>,
}

/// Untyped create payload as received from a client.
///
/// Fields are kept as raw JSON so that every problem can be reported at once
/// instead of failing on the first type mismatch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentDraft {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub grid: Option<Value>,
}

impl PaymentDraft {
    pub fn validate(self) -> Result<NewPayment, AppError> {
        let name = trimmed_text(self.name.as_ref());
        let amount = Amount::from_json(self.amount.as_ref());
        let code = trimmed_text(self.code.as_ref());
        let grid = grid_snapshot(self.grid.as_ref());

        match (name, amount, code, grid) {
            (Some(name), Ok(amount), Some(code), Some(grid)) => Ok(NewPayment {
                name,
                amount,
                code,
                grid,
            }),
            (name, amount, code, grid) => {
                let errors = [
                    name.is_none().then_some(INVALID_NAME),
                    amount.err(),
                    code.is_none().then_some(INVALID_CODE),
                    grid.is_none().then_some(INVALID_GRID),
                ]
                .into_iter()
                .flatten()
                .map(str::to_string)
                .collect();
                Err(AppError::Validation(errors))
            }
        }
    }
}

/// Untyped update payload; absent or `null` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentPatch {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
}

impl PaymentPatch {
    pub fn validate(self) -> Result<PaymentUpdate, AppError> {
        let mut errors = Vec::new();
        let mut update = PaymentUpdate::default();

        if let Some(raw) = self.name.as_ref() {
            match trimmed_text(Some(raw)) {
                Some(name) => update.name = Some(name),
                None => errors.push(INVALID_NAME.to_string()),
            }
        }
        if let Some(raw) = self.amount.as_ref() {
            match Amount::from_json(Some(raw)) {
                Ok(amount) => update.amount = Some(amount),
                Err(message) => errors.push(message.to_string()),
            }
        }

        if errors.is_empty() {
            Ok(update)
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

fn trimmed_text(value: Option<&Value>) -> Option<String> {
    let trimmed = value?.as_str()?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn grid_snapshot(value: Option<&Value>) -> Option<GridSnapshot> {
    let rows = value?.as_array()?;
    let width = rows.first()?.as_array()?.len();
    if width == 0 {
        return None;
    }

    rows.iter()
        .map(|row| {
            let cells = row.as_array().filter(|cells| cells.len() == width)?;
            cells
                .iter()
                .map(|cell| cell.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn draft(value: Value) -> PaymentDraft {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(1.0)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0.0)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-1.0)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_valid_draft_is_trimmed() {
        let input = draft(json!({
            "name": "  Test  ",
            "amount": 100,
            "code": " 12 ",
            "grid": [["a", "b"], ["c", "d"]],
        }))
        .validate()
        .unwrap();

        assert_eq!(input.name, "Test");
        assert_eq!(input.code, "12");
        assert_eq!(input.amount.value(), dec!(100));
        assert_eq!(input.grid, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_invalid_draft_lists_every_error() {
        let err = draft(json!({"name": " ", "amount": -10, "code": "", "grid": []}))
            .validate()
            .unwrap_err();

        match err {
            AppError::Validation(errors) => assert_eq!(
                errors,
                vec![INVALID_NAME, INVALID_AMOUNT, INVALID_CODE, INVALID_GRID]
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_amount_must_be_a_number() {
        let err = draft(json!({
            "name": "x",
            "amount": "100",
            "code": "12",
            "grid": [["a"]],
        }))
        .validate()
        .unwrap_err();

        assert!(matches!(err, AppError::Validation(e) if e == vec![INVALID_AMOUNT]));
    }

    #[test]
    fn test_amount_range_boundaries() {
        let amount = |value: Value| Amount::from_json(Some(&value));

        assert!(amount(json!(7e28)).unwrap().value() > Decimal::from(u64::MAX));
        assert!(amount(json!(1e-20)).is_ok());
        assert!(amount(json!(0.01)).is_ok());

        assert_eq!(amount(json!(1e29)), Err(AMOUNT_OUT_OF_RANGE));
        assert_eq!(amount(json!(1e300)), Err(AMOUNT_OUT_OF_RANGE));
        assert_eq!(amount(json!(1e-30)), Err(AMOUNT_OUT_OF_RANGE));

        assert_eq!(amount(json!(0)), Err(INVALID_AMOUNT));
        assert_eq!(amount(json!(-1e29)), Err(INVALID_AMOUNT));
        assert_eq!(amount(json!(null)), Err(INVALID_AMOUNT));
    }

    #[test]
    fn test_grid_shape_checks() {
        assert!(grid_snapshot(Some(&json!([["a", "b"], ["c", "d"]]))).is_some());
        assert!(grid_snapshot(Some(&json!([]))).is_none());
        assert!(grid_snapshot(Some(&json!([[]]))).is_none());
        assert!(grid_snapshot(Some(&json!([["a", "b"], ["c"]]))).is_none());
        assert!(grid_snapshot(Some(&json!([["a", 1]]))).is_none());
        assert!(grid_snapshot(Some(&json!("abc"))).is_none());
        assert!(grid_snapshot(None).is_none());
    }

    #[test]
    fn test_patch_only_checks_present_fields() {
        let update: PaymentPatch = serde_json::from_value(json!({"name": " New "})).unwrap();
        let update = update.validate().unwrap();
        assert_eq!(update.name.as_deref(), Some("New"));
        assert!(update.amount.is_none());

        let bad: PaymentPatch = serde_json::from_value(json!({"amount": 0})).unwrap();
        assert!(matches!(bad.validate(), Err(AppError::Validation(e)) if e == vec![INVALID_AMOUNT]));
    }

    #[test]
    fn test_payment_serialization() {
        let mut payment = Payment::new(NewPayment {
            name: "Test".to_string(),
            amount: Amount::new(dec!(100)).unwrap(),
            code: "12".to_string(),
            grid: vec![vec!["a".to_string()]],
        });
        payment.apply(PaymentUpdate {
            name: None,
            amount: Some(Amount::new(dec!(250.5)).unwrap()),
        });

        let json = serde_json::to_value(&payment).unwrap();
        assert_eq!(json["name"], "Test");
        assert_eq!(json["amount"].as_f64(), Some(250.5));
        assert_eq!(json["id"], payment.id.to_string());

        let created_at = json["createdAt"].as_str().unwrap();
        assert_eq!(created_at.len(), "2024-01-01T00:00:00.000Z".len());
        assert!(created_at.ends_with('Z'));
    }
}
