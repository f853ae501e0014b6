/// Orders and their line items
use crate::db::{order_repo, product_repo};
use crate::error::{AppError, Result};
use crate::filters::OrderFilter;
use crate::middleware::{check_owner_or_staff, Principal};
use crate::models::{
    CreateOrderRequest, Order, OrderResponse, OrderStatus, PatchOrderRequest, PositionInput,
    ReplaceOrderRequest, UserSummary,
};
use crate::validators::{check_money, first_duplicate, first_missing, MONEY_SCALE};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;
use validator::Validate;

/// Sum of `price * quantity` over all lines, at two decimal places.
///
/// Returns `None` if the arithmetic overflows.
pub fn compute_total<I>(lines: I) -> Option<Decimal>
where
    I: IntoIterator<Item = (Decimal, i32)>,
{
    let mut total = Decimal::ZERO;
    for (price, quantity) in lines {
        let line = price.checked_mul(Decimal::from(quantity))?;
        total = total.checked_add(line)?;
    }
    total.rescale(MONEY_SCALE);
    Some(total)
}

pub struct OrderService {
    pool: PgPool,
}

impl OrderService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Staff see every order, everyone else only their own
    pub async fn list(
        &self,
        caller: &Principal,
        filter: &OrderFilter,
    ) -> Result<Vec<OrderResponse>> {
        let owner = (!caller.is_staff).then_some(caller.user_id);
        let orders = order_repo::list_orders(&self.pool, filter, owner).await?;
        self.assemble(orders).await
    }

    pub async fn get(&self, caller: &Principal, order_id: i64) -> Result<OrderResponse> {
        let order = order_repo::find_order(&self.pool, order_id)
            .await?
            .ok_or_else(|| not_found(order_id))?;
        check_owner_or_staff(caller, order.user_id)?;

        self.assemble_one(order).await
    }

    pub async fn create(
        &self,
        caller: &Principal,
        req: &CreateOrderRequest,
    ) -> Result<OrderResponse> {
        req.validate()?;
        check_status_change(caller, req.order_status)?;

        let mut tx = self.pool.begin().await?;
        let total = price_positions(&mut tx, &req.products).await?;

        let order = order_repo::create_order(
            &mut *tx,
            caller.user_id,
            req.order_status.unwrap_or_default(),
            total,
        )
        .await?;
        write_positions(&mut tx, order.id, &req.products).await?;
        tx.commit().await?;

        tracing::info!(
            order_id = order.id,
            user_id = caller.user_id,
            total = %total,
            positions = req.products.len(),
            "order created"
        );
        self.assemble_one(order).await
    }

    /// Full update: positions are replaced and the total recomputed
    pub async fn replace(
        &self,
        caller: &Principal,
        order_id: i64,
        req: &ReplaceOrderRequest,
    ) -> Result<OrderResponse> {
        let patch = PatchOrderRequest {
            products: Some(req.products.clone()),
            order_status: req.order_status,
        };
        self.apply_update(caller, order_id, &patch).await
    }

    /// Partial update: only the supplied fields change
    pub async fn patch(
        &self,
        caller: &Principal,
        order_id: i64,
        req: &PatchOrderRequest,
    ) -> Result<OrderResponse> {
        self.apply_update(caller, order_id, req).await
    }

    pub async fn delete(&self, caller: &Principal, order_id: i64) -> Result<()> {
        let order = order_repo::find_order(&self.pool, order_id)
            .await?
            .ok_or_else(|| not_found(order_id))?;
        check_owner_or_staff(caller, order.user_id)?;

        order_repo::delete_order(&self.pool, order_id).await?;
        tracing::info!(order_id, user_id = caller.user_id, "order deleted");
        Ok(())
    }

    async fn apply_update(
        &self,
        caller: &Principal,
        order_id: i64,
        req: &PatchOrderRequest,
    ) -> Result<OrderResponse> {
        let mut tx = self.pool.begin().await?;
        let existing = order_repo::lock_order(&mut *tx, order_id)
            .await?
            .ok_or_else(|| not_found(order_id))?;
        check_owner_or_staff(caller, existing.user_id)?;

        req.validate()?;
        check_status_change(caller, req.order_status)?;

        let total = match &req.products {
            Some(positions) => {
                let total = price_positions(&mut tx, positions).await?;
                order_repo::delete_positions(&mut *tx, order_id).await?;
                write_positions(&mut tx, order_id, positions).await?;
                Some(total)
            }
            None => None,
        };

        let order = order_repo::update_order(&mut *tx, order_id, req.order_status, total).await?;
        tx.commit().await?;

        tracing::info!(
            order_id,
            user_id = caller.user_id,
            status = %order.status(),
            positions_replaced = total.is_some(),
            "order updated"
        );
        self.assemble_one(order).await
    }

    async fn assemble_one(&self, order: Order) -> Result<OrderResponse> {
        self.assemble(vec![order])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("order vanished while loading".to_string()))
    }

    /// Attach owners and positions to orders, keeping their order
    async fn assemble(&self, orders: Vec<Order>) -> Result<Vec<OrderResponse>> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }
        let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        let mut user_ids: Vec<i64> = orders.iter().map(|o| o.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let mut positions: HashMap<i64, Vec<_>> = HashMap::new();
        for position in order_repo::list_positions(&self.pool, &order_ids).await? {
            positions.entry(position.order_id).or_default().push(position);
        }
        let users: HashMap<i64, UserSummary> = order_repo::user_summaries(&self.pool, &user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let mut responses = Vec::with_capacity(orders.len());
        for order in orders {
            let user = users.get(&order.user_id).cloned().ok_or_else(|| {
                AppError::Internal(format!("owner of order {} is missing", order.id))
            })?;
            let lines = positions.remove(&order.id).unwrap_or_default();
            responses.push(OrderResponse::new(order, user, lines));
        }
        Ok(responses)
    }
}

/// Only staff may set an order's status
fn check_status_change(caller: &Principal, status: Option<OrderStatus>) -> Result<()> {
    if status.is_some() && !caller.is_staff {
        return Err(AppError::BadRequest(
            "Only staff members can change the order status".to_string(),
        ));
    }
    Ok(())
}

/// Validate positions against the catalogue and return the order total
async fn price_positions(conn: &mut PgConnection, positions: &[PositionInput]) -> Result<Decimal> {
    if positions.is_empty() {
        return Err(AppError::Validation(
            "an order needs at least one product".to_string(),
        ));
    }
    for position in positions {
        position.validate()?;
    }
    if let Some(duplicate) = first_duplicate(positions.iter().map(|p| p.product)) {
        return Err(AppError::BadRequest(format!(
            "Product {} is listed more than once",
            duplicate
        )));
    }

    let requested: Vec<i64> = positions.iter().map(|p| p.product).collect();
    let products = product_repo::find_products(&mut *conn, &requested).await?;
    let existing: Vec<i64> = products.iter().map(|p| p.id).collect();
    if let Some(missing) = first_missing(&requested, &existing) {
        return Err(AppError::BadRequest(format!(
            "Product {} does not exist",
            missing
        )));
    }

    let prices: HashMap<i64, Decimal> = products.iter().map(|p| (p.id, p.price)).collect();
    let lines = positions
        .iter()
        .filter_map(|p| prices.get(&p.product).map(|price| (*price, p.quantity)));
    let total = compute_total(lines)
        .ok_or_else(|| AppError::Validation("order total is too large".to_string()))?;
    check_money("total", total)?;
    Ok(total)
}

async fn write_positions(
    conn: &mut PgConnection,
    order_id: i64,
    positions: &[PositionInput],
) -> Result<()> {
    let product_ids: Vec<i64> = positions.iter().map(|p| p.product).collect();
    let quantities: Vec<i32> = positions.iter().map(|p| p.quantity).collect();
    order_repo::insert_positions(&mut *conn, order_id, &product_ids, &quantities).await?;
    Ok(())
}

fn not_found(order_id: i64) -> AppError {
    AppError::NotFound(format!("Order {} not found", order_id))
}
