use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};
use uuid::Uuid;

use super::row_helpers::{id_list, id_list_json, none_if_empty};
use crate::models::*;

fn map_kost_row(row: &SqliteRow) -> Kost {
    Kost {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        name: row.get("name"),
        description: row.get("description"),
        address: row.get("address"),
        city: row.get("city"),
        total_rooms: row.get("total_rooms"),
        monthly_price: row.get("monthly_price"),
        discount: row.get("discount"),
        deposit: row.get("deposit"),
        is_approved: row.get("is_approved"),
        facility_ids: id_list(row, "facility_ids"),
        rule_ids: id_list(row, "rule_ids"),
        qris_image: none_if_empty(row.get("qris_image")),
        qris_url: None,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Append optional listing filters to a base query. Only approved listings
/// are visible publicly.
fn push_filters(sql: &mut String, query: &KostListQuery) {
    if query.city.is_some() {
        sql.push_str(" AND city = ?");
    }
    if query.max_price.is_some() {
        sql.push_str(" AND (monthly_price - discount) <= ?");
    }
    if query.q.is_some() {
        sql.push_str(" AND (name LIKE ? OR address LIKE ?)");
    }
}

fn bind_filters<'q>(
    mut q: sqlx::query::Query<'q, Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    query: &'q KostListQuery,
) -> sqlx::query::Query<'q, Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    if let Some(city) = &query.city {
        q = q.bind(city);
    }
    if let Some(max_price) = query.max_price {
        q = q.bind(max_price);
    }
    if let Some(needle) = &query.q {
        let pattern = format!("%{}%", needle);
        q = q.bind(pattern.clone());
        q = q.bind(pattern);
    }
    q
}

pub struct KostRepo;

impl KostRepo {
    pub async fn list(
        pool: &Pool<Sqlite>,
        query: &KostListQuery,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Kost>> {
        let mut sql = String::from("SELECT * FROM kosts WHERE is_approved = 1");
        push_filters(&mut sql, query);
        sql.push_str(" ORDER BY created_at DESC LIMIT ? OFFSET ?");

        let q = bind_filters(sqlx::query(&sql), query).bind(limit).bind(offset);
        let rows = q.fetch_all(pool).await?;
        Ok(rows.iter().map(map_kost_row).collect())
    }

    pub async fn count(pool: &Pool<Sqlite>, query: &KostListQuery) -> Result<i64> {
        let mut sql = String::from("SELECT COUNT(*) FROM kosts WHERE is_approved = 1");
        push_filters(&mut sql, query);

        let row = bind_filters(sqlx::query(&sql), query).fetch_one(pool).await?;
        Ok(row.get(0))
    }

    pub async fn list_by_owner(pool: &Pool<Sqlite>, owner_id: &str) -> Result<Vec<Kost>> {
        let rows = sqlx::query("SELECT * FROM kosts WHERE owner_id = ? ORDER BY created_at DESC")
            .bind(owner_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.iter().map(map_kost_row).collect())
    }

    pub async fn get(pool: &Pool<Sqlite>, id: &str) -> Result<Option<Kost>> {
        let row = sqlx::query("SELECT * FROM kosts WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.as_ref().map(map_kost_row))
    }

    pub async fn create(
        pool: &Pool<Sqlite>,
        owner_id: &str,
        req: &CreateKostRequest,
    ) -> Result<Kost> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO kosts
                (id, owner_id, name, description, address, city, total_rooms,
                 monthly_price, discount, deposit, is_approved, facility_ids,
                 rule_ids, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(owner_id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.address)
        .bind(&req.city)
        .bind(req.total_rooms)
        .bind(req.monthly_price)
        .bind(req.discount)
        .bind(req.deposit)
        .bind(id_list_json(&req.facility_ids))
        .bind(id_list_json(&req.rule_ids))
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Self::get(pool, &id)
            .await?
            .context("Kost not found after creation")
    }

    pub async fn update(pool: &Pool<Sqlite>, id: &str, req: &CreateKostRequest) -> Result<Kost> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE kosts SET name = ?, description = ?, address = ?, city = ?,
                total_rooms = ?, monthly_price = ?, discount = ?, deposit = ?,
                facility_ids = ?, rule_ids = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.address)
        .bind(&req.city)
        .bind(req.total_rooms)
        .bind(req.monthly_price)
        .bind(req.discount)
        .bind(req.deposit)
        .bind(id_list_json(&req.facility_ids))
        .bind(id_list_json(&req.rule_ids))
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("Kost", id).into());
        }

        Self::get(pool, id)
            .await?
            .context("Kost not found after update")
    }

    pub async fn set_approved(pool: &Pool<Sqlite>, id: &str, approved: bool) -> Result<Kost> {
        let result = sqlx::query("UPDATE kosts SET is_approved = ?, updated_at = ? WHERE id = ?")
            .bind(approved)
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("Kost", id).into());
        }

        Self::get(pool, id)
            .await?
            .context("Kost not found after update")
    }

    pub async fn set_qris(pool: &Pool<Sqlite>, id: &str, path: &str) -> Result<()> {
        let result = sqlx::query("UPDATE kosts SET qris_image = ?, updated_at = ? WHERE id = ?")
            .bind(path)
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("Kost", id).into());
        }
        Ok(())
    }

    pub async fn delete(pool: &Pool<Sqlite>, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM kosts WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("Kost", id).into());
        }
        Ok(())
    }

    /// Rooms currently considered occupied for availability display:
    /// APPROVED reservations not yet departed (occupancy AKTIF or not yet
    /// activated) whose checkout has not passed.
    pub async fn occupied_room_count(
        pool: &Pool<Sqlite>,
        kost_id: &str,
        today: NaiveDate,
    ) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM reservations
            WHERE kost_id = ?
              AND status = 'APPROVED'
              AND (occupancy_status IS NULL OR occupancy_status = 'AKTIF')
              AND (check_out_date IS NULL OR check_out_date > ?)
            "#,
        )
        .bind(kost_id)
        .bind(today)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
