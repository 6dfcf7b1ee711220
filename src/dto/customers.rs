use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::orders::OrderWithItems;
use crate::models::Customer;
use crate::validation::{FieldError, Validate, check_email, check_length};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCustomerRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl Validate for CreateCustomerRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_email(&mut errors, "email", &self.email);
        check_length(&mut errors, "first_name", &self.first_name, 1, 50);
        check_length(&mut errors, "last_name", &self.last_name, 1, 50);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Partial merge: absent fields leave the stored value untouched.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCustomerRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl Validate for UpdateCustomerRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if let Some(email) = &self.email {
            check_email(&mut errors, "email", email);
        }
        if let Some(first_name) = &self.first_name {
            check_length(&mut errors, "first_name", first_name, 1, 50);
        }
        if let Some(last_name) = &self.last_name {
            check_length(&mut errors, "last_name", last_name, 1, 50);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Listing row: customer columns plus an order-count aggregate.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct CustomerSummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub order_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerList {
    pub items: Vec<CustomerSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerWithOrders {
    pub customer: Customer,
    pub orders: Vec<OrderWithItems>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerDeleted {
    pub deleted_orders_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_collects_all_field_errors() {
        let payload = CreateCustomerRequest {
            email: "bad".into(),
            first_name: "".into(),
            last_name: "x".repeat(51),
            phone: None,
            address: None,
        };
        let errors = payload.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["email", "first_name", "last_name"]);
    }

    #[test]
    fn update_skips_absent_fields() {
        let payload = UpdateCustomerRequest {
            email: None,
            first_name: None,
            last_name: None,
            phone: Some("555-0100".into()),
            address: None,
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn update_still_validates_present_fields() {
        let payload = UpdateCustomerRequest {
            email: Some("not-an-email".into()),
            first_name: Some("Alice".into()),
            last_name: None,
            phone: None,
            address: None,
        };
        let errors = payload.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "email");
    }
}
