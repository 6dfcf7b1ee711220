use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{
        CreateOrderRequest, OrderDetail, OrderItemInput, OrderList, OrderWithItems,
        UpdateOrderRequest,
    },
    entity::{
        customers::Entity as Customers,
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem, OrderStatus},
    response::{ApiResponse, PageMeta},
    routes::params::OrderListQuery,
    services::customer_service::customer_from_entity,
    state::AppState,
    validation::Validate,
};

pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderDetail>> {
    payload.validate()?;

    let customer_id = Uuid::parse_str(payload.customer_id.trim())
        .map_err(|_| AppError::BadRequest("Invalid customer id".into()))?;
    let status = match payload.status.as_deref() {
        Some(s) => s
            .parse::<OrderStatus>()
            .map_err(|_| AppError::BadRequest("Invalid order status".into()))?,
        None => OrderStatus::Pending,
    };

    let txn = state.orm.begin().await?;

    let customer = Customers::find_by_id(customer_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;

    let total_amount = items_total(&payload.items);
    let order_number = next_order_number(&txn).await?;

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        customer_id: Set(customer_id),
        order_number: Set(order_number),
        status: Set(status.as_str().to_string()),
        total_amount: Set(total_amount),
        notes: Set(payload.notes),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(payload.items.len());
    for input in &payload.items {
        let item = insert_item(&txn, order.id, input).await?;
        items.push(order_item_from_entity(item));
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_create",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "customer_id": customer_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order created",
        OrderDetail {
            order: order_from_entity(order)?,
            customer: customer_from_entity(customer),
            items,
        },
    ))
}

pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<OrderDetail>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

    let customer = order
        .find_related(Customers)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("order {} has no customer", order.id)))?;

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Order",
        OrderDetail {
            order: order_from_entity(order)?,
            customer: customer_from_entity(customer),
            items,
        },
    ))
}

pub async fn list_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }
    if let Some(customer_id) = query.customer_id.as_ref().filter(|s| !s.is_empty()) {
        let customer_id = Uuid::parse_str(customer_id.trim())
            .map_err(|_| AppError::BadRequest("Invalid customer id".into()))?;
        condition = condition.add(OrderCol::CustomerId.eq(customer_id));
    }

    let finder = Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let meta = PageMeta::new(page, limit, total);
    Ok(ApiResponse::paginated("Orders", OrderList { items }, meta))
}

pub async fn update_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    payload.validate()?;

    let txn = state.orm.begin().await?;

    let existing = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;
    let order_id = existing.id;

    let mut active: OrderActive = existing.into();

    if let Some(customer_id) = payload.customer_id {
        let customer_id = Uuid::parse_str(customer_id.trim())
            .map_err(|_| AppError::BadRequest("Invalid customer id".into()))?;
        Customers::find_by_id(customer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer not found".into()))?;
        active.customer_id = Set(customer_id);
    }
    if let Some(status) = payload.status {
        let status = status
            .parse::<OrderStatus>()
            .map_err(|_| AppError::BadRequest("Invalid order status".into()))?;
        active.status = Set(status.as_str().to_string());
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes));
    }

    // Replacing items is all-or-nothing: the old set is dropped and the
    // total recomputed inside the same transaction.
    let items = match payload.items {
        Some(inputs) => {
            OrderItems::delete_many()
                .filter(OrderItemCol::OrderId.eq(order_id))
                .exec(&txn)
                .await?;

            let mut items = Vec::with_capacity(inputs.len());
            for input in &inputs {
                let item = insert_item(&txn, order_id, input).await?;
                items.push(order_item_from_entity(item));
            }
            active.total_amount = Set(items_total(&inputs));
            items
        }
        None => OrderItems::find()
            .filter(OrderItemCol::OrderId.eq(order_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(order_item_from_entity)
            .collect(),
    };

    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order updated",
        OrderWithItems {
            order: order_from_entity(order)?,
            items,
        },
    ))
}

pub async fn delete_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Orders::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Order not found".into()));
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_delete",
        Some("orders"),
        Some(serde_json::json!({ "order_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order deleted successfully",
        serde_json::json!({}),
    ))
}

fn line_total(input: &OrderItemInput) -> Decimal {
    input.unit_price * Decimal::from(input.quantity)
}

fn items_total(inputs: &[OrderItemInput]) -> Decimal {
    inputs.iter().map(line_total).sum()
}

async fn insert_item<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
    input: &OrderItemInput,
) -> AppResult<OrderItemModel> {
    let item = OrderItemActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        product_name: Set(input.product_name.trim().to_string()),
        quantity: Set(input.quantity),
        unit_price: Set(input.unit_price),
        total_price: Set(line_total(input)),
        created_at: NotSet,
    }
    .insert(conn)
    .await?;
    Ok(item)
}

/// Draws the next value from the dedicated Postgres sequence, so concurrent
/// creations can never collide on a number.
async fn next_order_number<C: ConnectionTrait>(conn: &C) -> AppResult<String> {
    let backend = conn.get_database_backend();
    let row = conn
        .query_one(Statement::from_string(
            backend,
            "SELECT nextval('order_number_seq') AS seq".to_string(),
        ))
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("order_number_seq returned no row")))?;
    let seq: i64 = row.try_get("", "seq")?;
    Ok(format_order_number(Utc::now().year(), seq))
}

fn format_order_number(year: i32, seq: i64) -> String {
    format!("ORD-{year}-{seq:06}")
}

pub fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    let status = model
        .status
        .parse::<OrderStatus>()
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
    Ok(Order {
        id: model.id,
        customer_id: model.customer_id,
        order_number: model.order_number,
        status,
        total_amount: model.total_amount,
        notes: model.notes,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

pub fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_name: model.product_name,
        quantity: model.quantity,
        unit_price: model.unit_price,
        total_price: model.total_price,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
