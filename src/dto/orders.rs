use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Customer, Order, OrderItem, OrderStatus};
use crate::validation::{FieldError, Validate};

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderItemInput {
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl OrderItemInput {
    fn collect_errors(&self, prefix: &str, errors: &mut Vec<FieldError>) {
        if self.product_name.trim().is_empty() {
            errors.push(FieldError::new(
                format!("{prefix}.product_name"),
                "must not be empty",
            ));
        }
        if self.quantity <= 0 {
            errors.push(FieldError::new(
                format!("{prefix}.quantity"),
                "must be a positive integer",
            ));
        }
        if self.unit_price <= Decimal::ZERO {
            errors.push(FieldError::new(
                format!("{prefix}.unit_price"),
                "must be a positive number",
            ));
        }
    }
}

fn check_status(errors: &mut Vec<FieldError>, value: &str) {
    if value.parse::<OrderStatus>().is_err() {
        let allowed = OrderStatus::ALL.map(|s| s.as_str()).join(", ");
        errors.push(FieldError::new("status", format!("must be one of: {allowed}")));
    }
}

fn check_items(errors: &mut Vec<FieldError>, items: &[OrderItemInput]) {
    if items.is_empty() {
        errors.push(FieldError::new("items", "must contain at least one item"));
    }
    for (index, item) in items.iter().enumerate() {
        item.collect_errors(&format!("items[{index}]"), errors);
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: String,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<OrderItemInput>,
}

impl Validate for CreateOrderRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.customer_id.trim().is_empty() {
            errors.push(FieldError::new("customer_id", "must not be empty"));
        } else if Uuid::parse_str(self.customer_id.trim()).is_err() {
            errors.push(FieldError::new("customer_id", "must be a valid id"));
        }
        if let Some(status) = &self.status {
            check_status(&mut errors, status);
        }
        check_items(&mut errors, &self.items);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Partial merge; when `items` is present the whole item set is replaced.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub customer_id: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub items: Option<Vec<OrderItemInput>>,
}

impl Validate for UpdateOrderRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if let Some(customer_id) = &self.customer_id
            && Uuid::parse_str(customer_id.trim()).is_err()
        {
            errors.push(FieldError::new("customer_id", "must be a valid id"));
        }
        if let Some(status) = &self.status {
            check_status(&mut errors, status);
        }
        if let Some(items) = &self.items {
            check_items(&mut errors, items);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetail {
    pub order: Order,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, quantity: i32, unit_price: Decimal) -> OrderItemInput {
        OrderItemInput {
            product_name: name.into(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn create_requires_customer_and_items() {
        let payload = CreateOrderRequest {
            customer_id: "".into(),
            status: None,
            notes: None,
            items: vec![],
        };
        let errors = payload.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["customer_id", "items"]);
    }

    #[test]
    fn create_rejects_unknown_status_and_bad_items() {
        let payload = CreateOrderRequest {
            customer_id: Uuid::new_v4().to_string(),
            status: Some("PAID".into()),
            notes: None,
            items: vec![item("", 0, Decimal::ZERO)],
        };
        let errors = payload.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            [
                "status",
                "items[0].product_name",
                "items[0].quantity",
                "items[0].unit_price"
            ]
        );
    }

    #[test]
    fn update_allows_everything_absent() {
        let payload = UpdateOrderRequest {
            customer_id: None,
            status: None,
            notes: None,
            items: None,
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn update_rejects_empty_replacement_items() {
        let payload = UpdateOrderRequest {
            customer_id: None,
            status: None,
            notes: None,
            items: Some(vec![]),
        };
        let errors = payload.validate().unwrap_err();
        assert_eq!(errors[0].field, "items");
    }
}
