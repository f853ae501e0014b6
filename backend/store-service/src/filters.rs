/// Query-string filters for list endpoints
///
/// Parameter names follow the `field__lookup` convention (`price__lte`,
/// `name__icontains`, ...). Each filter appends `AND` conditions to a
/// `QueryBuilder` whose base query already ends in a `WHERE` clause.
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};

/// Escape LIKE wildcards so user input matches literally
pub fn like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() + 2);
    escaped.push('%');
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub price: Option<Decimal>,
    #[serde(rename = "price__lte")]
    pub price_lte: Option<Decimal>,
    #[serde(rename = "price__gte")]
    pub price_gte: Option<Decimal>,
    pub name: Option<String>,
    #[serde(rename = "name__iexact")]
    pub name_iexact: Option<String>,
    #[serde(rename = "name__icontains")]
    pub name_icontains: Option<String>,
    #[serde(rename = "description__icontains")]
    pub description_icontains: Option<String>,
}

impl ProductFilter {
    /// Conditions on the `p` alias of `products`
    pub fn push_conditions(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(price) = self.price {
            qb.push(" AND p.price = ").push_bind(price);
        }
        if let Some(price) = self.price_lte {
            qb.push(" AND p.price <= ").push_bind(price);
        }
        if let Some(price) = self.price_gte {
            qb.push(" AND p.price >= ").push_bind(price);
        }
        if let Some(name) = &self.name {
            qb.push(" AND p.name = ").push_bind(name.clone());
        }
        if let Some(name) = &self.name_iexact {
            qb.push(" AND LOWER(p.name) = LOWER(")
                .push_bind(name.clone())
                .push(")");
        }
        if let Some(name) = &self.name_icontains {
            qb.push(" AND p.name ILIKE ").push_bind(like_pattern(name));
        }
        if let Some(text) = &self.description_icontains {
            qb.push(" AND p.description ILIKE ")
                .push_bind(like_pattern(text));
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewFilter {
    pub user: Option<i64>,
    pub product: Option<i64>,
    #[serde(rename = "created_at__date")]
    pub created_at_date: Option<NaiveDate>,
}

impl ReviewFilter {
    /// Conditions on the `r` alias of `product_reviews`
    pub fn push_conditions(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(user_id) = self.user {
            qb.push(" AND r.user_id = ").push_bind(user_id);
        }
        if let Some(product_id) = self.product {
            qb.push(" AND r.product_id = ").push_bind(product_id);
        }
        if let Some(date) = self.created_at_date {
            qb.push(" AND (r.created_at AT TIME ZONE 'UTC')::date = ")
                .push_bind(date);
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilter {
    #[serde(rename = "order_status__iexact")]
    pub order_status_iexact: Option<String>,
    pub total: Option<Decimal>,
    #[serde(rename = "total__lte")]
    pub total_lte: Option<Decimal>,
    #[serde(rename = "total__gte")]
    pub total_gte: Option<Decimal>,
    #[serde(rename = "created_at__date")]
    pub created_at_date: Option<NaiveDate>,
    #[serde(rename = "updated_at__date")]
    pub updated_at_date: Option<NaiveDate>,
    #[serde(rename = "products__id")]
    pub products_id: Option<i64>,
}

impl OrderFilter {
    /// Conditions on the `o` alias of `orders`
    pub fn push_conditions(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(status) = &self.order_status_iexact {
            qb.push(" AND LOWER(o.order_status) = LOWER(")
                .push_bind(status.clone())
                .push(")");
        }
        if let Some(total) = self.total {
            qb.push(" AND o.total = ").push_bind(total);
        }
        if let Some(total) = self.total_lte {
            qb.push(" AND o.total <= ").push_bind(total);
        }
        if let Some(total) = self.total_gte {
            qb.push(" AND o.total >= ").push_bind(total);
        }
        if let Some(date) = self.created_at_date {
            qb.push(" AND (o.created_at AT TIME ZONE 'UTC')::date = ")
                .push_bind(date);
        }
        if let Some(date) = self.updated_at_date {
            qb.push(" AND (o.updated_at AT TIME ZONE 'UTC')::date = ")
                .push_bind(date);
        }
        if let Some(product_id) = self.products_id {
            qb.push(
                " AND EXISTS (SELECT 1 FROM product_order_positions pop \
                 WHERE pop.order_id = o.id AND pop.product_id = ",
            )
            .push_bind(product_id)
            .push(")");
        }
    }
}
