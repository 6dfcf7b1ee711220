use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::customers::{
        CreateCustomerRequest, CustomerDeleted, CustomerList, CustomerSummary, CustomerWithOrders,
        UpdateCustomerRequest,
    },
    dto::orders::OrderWithItems,
    entity::{
        customers::{ActiveModel as CustomerActive, Entity as Customers, Model as CustomerModel},
        order_items::Entity as OrderItems,
        orders::{Column as OrderCol, Entity as Orders},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Customer,
    response::{ApiResponse, PageMeta},
    routes::params::Pagination,
    services::order_service::order_from_entity,
    state::AppState,
    validation::Validate,
};

pub async fn create_customer(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCustomerRequest,
) -> AppResult<ApiResponse<Customer>> {
    payload.validate()?;

    let active = CustomerActive {
        id: Set(Uuid::new_v4()),
        email: Set(payload.email.trim().to_string()),
        first_name: Set(payload.first_name.trim().to_string()),
        last_name: Set(payload.last_name.trim().to_string()),
        phone: Set(payload.phone),
        address: Set(payload.address),
        created_at: NotSet,
        updated_at: NotSet,
    };
    // A duplicate email trips the unique index and surfaces as 409.
    let customer = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "customer_create",
        Some("customers"),
        Some(serde_json::json!({ "customer_id": customer.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Customer created",
        customer_from_entity(customer),
    ))
}

pub async fn list_customers(
    state: &AppState,
    query: Pagination,
) -> AppResult<ApiResponse<CustomerList>> {
    let (page, limit, offset) = query.normalize();

    let items = sqlx::query_as::<_, CustomerSummary>(
        r#"
        SELECT c.*, count(o.id) AS order_count
        FROM customers c
        LEFT JOIN orders o ON o.customer_id = c.id
        GROUP BY c.id
        ORDER BY c.created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT count(*) FROM customers")
        .fetch_one(&state.pool)
        .await?;

    let meta = PageMeta::new(page, limit, total.0);
    Ok(ApiResponse::paginated(
        "Customers",
        CustomerList { items },
        meta,
    ))
}

/// Eagerly loads the customer's orders, each with its items.
pub async fn get_customer(state: &AppState, id: Uuid) -> AppResult<ApiResponse<CustomerWithOrders>> {
    let customer = Customers::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;

    let orders = Orders::find()
        .filter(OrderCol::CustomerId.eq(id))
        .order_by_desc(OrderCol::CreatedAt)
        .find_with_related(OrderItems)
        .all(&state.orm)
        .await?;

    let mut with_items = Vec::with_capacity(orders.len());
    for (order, items) in orders {
        with_items.push(OrderWithItems {
            order: order_from_entity(order)?,
            items: items
                .into_iter()
                .map(crate::services::order_service::order_item_from_entity)
                .collect(),
        });
    }

    Ok(ApiResponse::success(
        "Customer",
        CustomerWithOrders {
            customer: customer_from_entity(customer),
            orders: with_items,
        },
    ))
}

pub async fn update_customer(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCustomerRequest,
) -> AppResult<ApiResponse<Customer>> {
    payload.validate()?;

    let existing = Customers::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;

    let mut active: CustomerActive = existing.into();
    if let Some(email) = payload.email {
        active.email = Set(email.trim().to_string());
    }
    if let Some(first_name) = payload.first_name {
        active.first_name = Set(first_name.trim().to_string());
    }
    if let Some(last_name) = payload.last_name {
        active.last_name = Set(last_name.trim().to_string());
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(address) = payload.address {
        active.address = Set(Some(address));
    }
    active.updated_at = Set(Utc::now().into());

    let customer = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "customer_update",
        Some("customers"),
        Some(serde_json::json!({ "customer_id": customer.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Customer updated",
        customer_from_entity(customer),
    ))
}

/// Deletes the customer; the schema cascades to orders and items. The count
/// of removed orders is reported so the caller can surface it.
pub async fn delete_customer(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<CustomerDeleted>> {
    let order_count = Orders::find()
        .filter(OrderCol::CustomerId.eq(id))
        .count(&state.orm)
        .await?;

    let result = Customers::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Customer not found".into()));
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "customer_delete",
        Some("customers"),
        Some(serde_json::json!({ "customer_id": id, "deleted_orders": order_count })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let message = if order_count > 0 {
        format!("Customer and {order_count} associated orders deleted")
    } else {
        "Customer deleted".to_string()
    };
    Ok(ApiResponse::success(
        message,
        CustomerDeleted {
            deleted_orders_count: order_count,
        },
    ))
}

pub fn customer_from_entity(model: CustomerModel) -> Customer {
    Customer {
        id: model.id,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        phone: model.phone,
        address: model.address,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
