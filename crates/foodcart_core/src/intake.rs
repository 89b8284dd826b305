//! Validation and registration of incoming customer orders.
//!
//! Payload shape:
//!
//! ```json
//! {
//!   "firstname": "Ivan", "lastname": "Petrov",
//!   "address": "Moscow, Lenina 1", "phonenumber": "+79991234567",
//!   "products": [{"product": 1, "quantity": 2}]
//! }
//! ```
//!
//! Errors are collected per field, e.g. `{"products": ["This list may not be empty."]}`.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::error::StoreError;
use crate::models::{Order, OrderItem, PaymentMethod, Product, ProductId};
use crate::store::{NewOrder, OrderStore};

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";
const NOT_BLANK: &str = "This field may not be blank.";
const NOT_STRING: &str = "Not a valid string.";
const EMPTY_LIST: &str = "This list may not be empty.";
const BAD_PHONE: &str = "Enter a valid phone number.";
const BAD_QUANTITY: &str = "Ensure this value is greater than or equal to 1.";
const NOT_INTEGER: &str = "A valid integer is required.";

/// Field name → messages.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
            .collect();
        write!(f, "invalid order: {}", rendered.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub firstname: String,
    pub lastname: String,
    pub address: String,
    /// Normalized to `+<country><number>`.
    pub phonenumber: String,
    pub lines: Vec<(Product, u32)>,
}

impl OrderRequest {
    /// Order rows with the unit price fixed at the current product price.
    pub fn into_new_order(self, registered_at: DateTime<Utc>) -> NewOrder {
        NewOrder {
            firstname: self.firstname,
            lastname: self.lastname,
            phonenumber: self.phonenumber,
            address: self.address,
            payment_method: PaymentMethod::default(),
            comment: String::new(),
            items: self
                .lines
                .into_iter()
                .map(|(product, quantity)| OrderItem {
                    product: product.id,
                    quantity,
                    price: product.price,
                })
                .collect(),
            registered_at,
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn required_string(payload: &Value, field: &str, errors: &mut ValidationErrors) -> Option<String> {
    match payload.get(field) {
        None => errors.add(field, REQUIRED),
        Some(Value::Null) => errors.add(field, NOT_NULL),
        Some(Value::String(text)) if text.trim().is_empty() => errors.add(field, NOT_BLANK),
        Some(Value::String(text)) => return Some(text.trim().to_string()),
        Some(_) => errors.add(field, NOT_STRING),
    }
    None
}

/// Normalize a phone number to `+<digits>`.
///
/// Russian national numbers (`8XXXXXXXXXX`) become `+7XXXXXXXXXX`. Spaces,
/// dashes and parentheses are ignored.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let compact: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    let (international, digits) = match compact.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, compact.as_str()),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    if international {
        let valid = match digits.strip_prefix('7') {
            Some(national) => national.len() == 10,
            None => (8..=15).contains(&digits.len()),
        };
        return valid.then(|| format!("+{digits}"));
    }

    match (digits.len(), digits.chars().next()) {
        (11, Some('8')) | (11, Some('7')) => Some(format!("+7{}", &digits[1..])),
        _ => None,
    }
}

fn product_line<S: OrderStore + ?Sized>(
    store: &S,
    index: usize,
    line: &Value,
    errors: &mut ValidationErrors,
) -> Option<(Product, u32)> {
    let product_field = format!("products[{index}].product");
    let quantity_field = format!("products[{index}].quantity");

    let product = match line.get("product") {
        None => {
            errors.add(product_field, REQUIRED);
            None
        }
        Some(Value::Number(number)) => match number.as_u64() {
            Some(raw) => {
                let found = store.product(ProductId(raw));
                if found.is_none() {
                    errors.add(
                        product_field,
                        format!("Invalid pk \"{raw}\" - object does not exist."),
                    );
                }
                found
            }
            None => {
                errors.add(product_field, format!("Invalid pk \"{number}\" - object does not exist."));
                None
            }
        },
        Some(other) => {
            errors.add(
                product_field,
                format!("Incorrect type. Expected pk value, received {}.", json_type(other)),
            );
            None
        }
    };

    let quantity = match line.get("quantity") {
        None => {
            errors.add(quantity_field, REQUIRED);
            None
        }
        Some(Value::Number(number)) => match number.as_i64() {
            Some(raw) if raw >= 1 => match u32::try_from(raw) {
                Ok(quantity) => Some(quantity),
                Err(_) => {
                    errors.add(quantity_field, NOT_INTEGER);
                    None
                }
            },
            Some(_) => {
                errors.add(quantity_field, BAD_QUANTITY);
                None
            }
            None => {
                errors.add(quantity_field, NOT_INTEGER);
                None
            }
        },
        Some(_) => {
            errors.add(quantity_field, NOT_INTEGER);
            None
        }
    };

    product.zip(quantity)
}

/// Check an order payload against the catalog in `store`.
pub fn validate_order_payload<S: OrderStore + ?Sized>(
    payload: &Value,
    store: &S,
) -> Result<OrderRequest, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if !payload.is_object() {
        errors.add(
            "non_field_errors",
            format!("Invalid data. Expected a dictionary, but got {}.", json_type(payload)),
        );
        return Err(errors);
    }

    let mut lines = Vec::new();
    match payload.get("products") {
        None => errors.add("products", REQUIRED),
        Some(Value::Null) => errors.add("products", NOT_NULL),
        Some(Value::Array(items)) if items.is_empty() => errors.add("products", EMPTY_LIST),
        Some(Value::Array(items)) => {
            for (index, line) in items.iter().enumerate() {
                if !line.is_object() {
                    errors.add(
                        format!("products[{index}]"),
                        format!("Invalid data. Expected a dictionary, but got {}.", json_type(line)),
                    );
                    continue;
                }
                lines.extend(product_line(store, index, line, &mut errors));
            }
        }
        Some(other) => errors.add(
            "products",
            format!("Expected a list of items but got type \"{}\".", json_type(other)),
        ),
    }

    let firstname = required_string(payload, "firstname", &mut errors);
    let lastname = required_string(payload, "lastname", &mut errors);
    let address = required_string(payload, "address", &mut errors);
    let phonenumber = required_string(payload, "phonenumber", &mut errors).and_then(|raw| {
        let normalized = normalize_phone(&raw);
        if normalized.is_none() {
            errors.add("phonenumber", BAD_PHONE);
        }
        normalized
    });

    match (firstname, lastname, address, phonenumber) {
        (Some(firstname), Some(lastname), Some(address), Some(phonenumber)) if errors.is_empty() => {
            Ok(OrderRequest {
                firstname,
                lastname,
                address,
                phonenumber,
                lines,
            })
        }
        _ => Err(errors),
    }
}

/// Validate `payload` and store it as a new raw order.
pub fn register_order<S: OrderStore + ?Sized>(
    store: &mut S,
    payload: &Value,
    registered_at: DateTime<Utc>,
) -> Result<Order, IntakeError> {
    let request = validate_order_payload(payload, &*store)?;
    Ok(store.create_order(request.into_new_order(registered_at))?)
}
