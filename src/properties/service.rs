//! Property service
//!
//! The data-access layer for listings: filtered public search, owner-scoped
//! mutations, the one-way approve and disable transitions, and the paginated
//! owner/pending views. Queries are built with `sqlx::QueryBuilder` from the
//! coerced allow-list filters; the same filter set feeds both the bounded
//! fetch and the unbounded count of a page.

use crate::error::AppError;
use crate::properties::models::{BindValue, Property, PropertyField};
use crate::properties::pagination::{PageInfo, Pagination};
use crate::properties::params::{build_params, validate_required_params};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

/// Visibility predicate for public read paths
const PUBLIC: &str = "is_disabled = 0 AND is_approve = 1";

/// A coerced equality filter, ready to append to a WHERE clause
type ColumnFilter = (&'static str, BindValue);

/// One page of properties plus its count-derived metadata
#[derive(Debug, Serialize)]
pub struct PropertyPage {
    /// Properties on the requested page
    pub properties: Vec<Property>,
    /// Page metadata computed from the matching total
    pub pagination: PageInfo,
}

/// Property service over the shared connection pool
#[derive(Clone)]
pub struct PropertyService {
    pool: SqlitePool,
}

impl PropertyService {
    /// Create the service over an already-connected pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find publicly visible properties with filters and pagination
    ///
    /// The same object carries pagination parameters (`limit`, `page`,
    /// `sortName`, `sort`) and allow-listed property field filters; anything
    /// else is dropped.
    pub async fn find_all(&self, filters: &Map<String, Value>) -> Result<PropertyPage, AppError> {
        let pagination = Pagination::from_params(filters);
        let query = coerce_filters(&build_params(&PropertyField::ALL, filters))?;

        let properties = self.fetch_page(PUBLIC, &query, &pagination).await?;
        let page_info = self.count_page(PUBLIC, &query, &pagination).await?;

        Ok(PropertyPage {
            properties,
            pagination: page_info,
        })
    }

    /// Find a property by id
    ///
    /// Only approved, non-disabled properties are visible here.
    pub async fn find_by_id(&self, property_id: &str) -> Result<Property, AppError> {
        let property = sqlx::query_as::<_, Property>(
            "SELECT * FROM properties WHERE id = ? AND is_disabled = 0 AND is_approve = 1",
        )
        .bind(property_id)
        .fetch_optional(&self.pool)
        .await?;

        property.ok_or(AppError::NotFound)
    }

    /// Insert one property
    ///
    /// Every allow-listed field is required; the created listing starts
    /// unapproved and enabled, owned by `offerer_id`.
    pub async fn insert(
        &self,
        offerer_id: &str,
        property: &Map<String, Value>,
    ) -> Result<Property, AppError> {
        let params = build_params(&PropertyField::ALL, property);
        validate_required_params(&PropertyField::ALL, &params)?;
        let values = coerce_filters(&params)?;

        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now().timestamp();

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO properties (id, offerer, created_at, is_approve, is_disabled");
        for (column, _) in &values {
            qb.push(", ");
            qb.push(*column);
        }
        qb.push(") VALUES (");
        qb.push_bind(id.clone());
        qb.push(", ");
        qb.push_bind(offerer_id.to_string());
        qb.push(", ");
        qb.push_bind(created_at);
        qb.push(", 0, 0");
        for (_, value) in &values {
            qb.push(", ");
            push_bind_value(&mut qb, value);
        }
        qb.push(")");

        qb.build().execute(&self.pool).await?;

        debug!("Created property {} for offerer {}", id, offerer_id);

        let created = sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = ?")
            .bind(&id)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    /// Update a property's allow-listed fields
    ///
    /// Scoped to the owning offerer and to non-disabled rows; anything but
    /// exactly one modified row is a server error.
    pub async fn update(
        &self,
        property_id: &str,
        property: &Map<String, Value>,
        offerer_id: &str,
    ) -> Result<(), AppError> {
        let values = coerce_filters(&build_params(&PropertyField::ALL, property))?;
        if values.is_empty() {
            // An empty update set modifies zero rows
            return Err(AppError::Server("error to update property".to_string()));
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE properties SET ");
        let mut sep = qb.separated(", ");
        for (column, value) in &values {
            sep.push(format!("{} = ", column));
            push_bind_value_separated(&mut sep, value);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(property_id.to_string());
        qb.push(" AND is_disabled = 0 AND offerer = ");
        qb.push_bind(offerer_id.to_string());

        let result = qb.build().execute(&self.pool).await?;
        if result.rows_affected() != 1 {
            return Err(AppError::Server("error to update property".to_string()));
        }

        debug!("Updated property {}", property_id);
        Ok(())
    }

    /// Soft-delete a property
    ///
    /// Flips `is_disabled`; rows are never removed. Same scoping and
    /// modified-count contract as `update`.
    pub async fn destroy(&self, property_id: &str, offerer_id: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE properties SET is_disabled = 1 \
             WHERE id = ? AND is_disabled = 0 AND offerer = ?",
        )
        .bind(property_id)
        .bind(offerer_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() != 1 {
            return Err(AppError::Server("error to delete property".to_string()));
        }

        debug!("Disabled property {}", property_id);
        Ok(())
    }

    /// Approve a property, making it publicly discoverable
    ///
    /// Admin path: no owner scoping, only non-disabled rows qualify. Role
    /// enforcement is assumed upstream.
    pub async fn approve(&self, property_id: &str) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE properties SET is_approve = 1 WHERE id = ? AND is_disabled = 0")
                .bind(property_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() != 1 {
            return Err(AppError::Server("error to approve property".to_string()));
        }

        debug!("Approved property {}", property_id);
        Ok(())
    }

    /// Find all non-disabled properties of one offerer, approved or not
    pub async fn find_my_properties(
        &self,
        offerer_id: &str,
        queries: &Map<String, Value>,
    ) -> Result<PropertyPage, AppError> {
        if offerer_id.trim().is_empty() {
            return Err(AppError::FieldsRequired("offerer".to_string()));
        }

        let pagination = Pagination::from_params(queries);
        let query: Vec<ColumnFilter> =
            vec![("offerer", BindValue::Text(offerer_id.to_string()))];

        let properties = self.fetch_page("is_disabled = 0", &query, &pagination).await?;
        let page_info = self.count_page("is_disabled = 0", &query, &pagination).await?;

        Ok(PropertyPage {
            properties,
            pagination: page_info,
        })
    }

    /// Find all unapproved properties (the pending-approval queue)
    pub async fn find_unapproved_properties(
        &self,
        queries: &Map<String, Value>,
    ) -> Result<PropertyPage, AppError> {
        let pagination = Pagination::from_params(queries);

        let properties = self.fetch_page("is_approve = 0", &[], &pagination).await?;
        let page_info = self.count_page("is_approve = 0", &[], &pagination).await?;

        Ok(PropertyPage {
            properties,
            pagination: page_info,
        })
    }

    /// Bounded fetch of one page under `base` plus equality filters
    async fn fetch_page(
        &self,
        base: &str,
        filters: &[ColumnFilter],
        pagination: &Pagination,
    ) -> Result<Vec<Property>, AppError> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM properties WHERE ");
        qb.push(base);
        push_filters(&mut qb, filters);
        // sort_column comes from the pagination whitelist, never from input
        qb.push(" ORDER BY ");
        qb.push(pagination.sort_column);
        qb.push(" ");
        qb.push(pagination.sort_direction.as_sql());
        qb.push(" LIMIT ");
        qb.push_bind(pagination.limit);
        qb.push(" OFFSET ");
        qb.push_bind(pagination.skip);

        let properties = qb
            .build_query_as::<Property>()
            .fetch_all(&self.pool)
            .await?;
        Ok(properties)
    }

    /// Unbounded count over the same predicate as `fetch_page`
    async fn count_page(
        &self,
        base: &str,
        filters: &[ColumnFilter],
        pagination: &Pagination,
    ) -> Result<PageInfo, AppError> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM properties WHERE ");
        qb.push(base);
        push_filters(&mut qb, filters);

        let (total_items,): (i64,) = qb.build_query_as().fetch_one(&self.pool).await?;
        Ok(PageInfo::new(total_items, pagination.limit, pagination.page))
    }
}

/// Coerce filtered params to their column types, keeping allow-list order
fn coerce_filters(params: &[(PropertyField, Value)]) -> Result<Vec<ColumnFilter>, AppError> {
    params
        .iter()
        .map(|(field, value)| Ok((field.column(), BindValue::coerce(*field, value)?)))
        .collect()
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filters: &[ColumnFilter]) {
    for (column, value) in filters {
        qb.push(" AND ");
        qb.push(*column);
        qb.push(" = ");
        push_bind_value(qb, value);
    }
}

fn push_bind_value(qb: &mut QueryBuilder<'_, Sqlite>, value: &BindValue) {
    match value {
        BindValue::Text(s) => qb.push_bind(s.clone()),
        BindValue::Int(i) => qb.push_bind(*i),
        BindValue::Real(f) => qb.push_bind(*f),
        BindValue::Bool(b) => qb.push_bind(*b),
    };
}

fn push_bind_value_separated(
    sep: &mut sqlx::query_builder::Separated<'_, '_, Sqlite, &str>,
    value: &BindValue,
) {
    match value {
        BindValue::Text(s) => sep.push_bind_unseparated(s.clone()),
        BindValue::Int(i) => sep.push_bind_unseparated(*i),
        BindValue::Real(f) => sep.push_bind_unseparated(*f),
        BindValue::Bool(b) => sep.push_bind_unseparated(*b),
    };
}
