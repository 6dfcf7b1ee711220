pub mod auth_service;
pub mod customer_service;
pub mod order_service;
