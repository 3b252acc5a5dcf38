use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};
use uuid::Uuid;

use super::row_helpers::none_if_empty;
use crate::models::*;

fn map_facility_row(row: &SqliteRow) -> Facility {
    Facility {
        id: row.get("id"),
        name: row.get("name"),
        icon: none_if_empty(row.get("icon")),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn map_rule_row(row: &SqliteRow) -> Rule {
    Rule {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn map_unit_row(row: &SqliteRow) -> LaundryUnit {
    LaundryUnit {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Build a `?, ?, ...` placeholder list for an IN clause
pub(super) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

pub struct MasterRepo;

impl MasterRepo {
    // ========== Facilities ==========

    pub async fn list_facilities(pool: &Pool<Sqlite>) -> Result<Vec<Facility>> {
        let rows = sqlx::query("SELECT * FROM facilities ORDER BY name")
            .fetch_all(pool)
            .await?;
        Ok(rows.iter().map(map_facility_row).collect())
    }

    pub async fn facilities_by_ids(pool: &Pool<Sqlite>, ids: &[String]) -> Result<Vec<Facility>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT * FROM facilities WHERE id IN ({}) ORDER BY name",
            placeholders(ids.len())
        );
        let mut q = sqlx::query(&sql);
        for id in ids {
            q = q.bind(id);
        }
        let rows = q.fetch_all(pool).await?;
        Ok(rows.iter().map(map_facility_row).collect())
    }

    pub async fn create_facility(
        pool: &Pool<Sqlite>,
        req: &CreateFacilityRequest,
    ) -> Result<Facility> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO facilities (id, name, icon, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&req.name)
        .bind(&req.icon)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        let row = sqlx::query("SELECT * FROM facilities WHERE id = ?")
            .bind(&id)
            .fetch_optional(pool)
            .await?;
        row.as_ref()
            .map(map_facility_row)
            .context("Facility not found after creation")
    }

    pub async fn update_facility(
        pool: &Pool<Sqlite>,
        id: &str,
        req: &CreateFacilityRequest,
    ) -> Result<Facility> {
        let result =
            sqlx::query("UPDATE facilities SET name = ?, icon = ?, updated_at = ? WHERE id = ?")
                .bind(&req.name)
                .bind(&req.icon)
                .bind(Utc::now())
                .bind(id)
                .execute(pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("Facility", id).into());
        }

        let row = sqlx::query("SELECT * FROM facilities WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        row.as_ref()
            .map(map_facility_row)
            .context("Facility not found after update")
    }

    pub async fn delete_facility(pool: &Pool<Sqlite>, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM facilities WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("Facility", id).into());
        }
        Ok(())
    }

    // ========== Rules ==========

    pub async fn list_rules(pool: &Pool<Sqlite>) -> Result<Vec<Rule>> {
        let rows = sqlx::query("SELECT * FROM rules ORDER BY name")
            .fetch_all(pool)
            .await?;
        Ok(rows.iter().map(map_rule_row).collect())
    }

    pub async fn rules_by_ids(pool: &Pool<Sqlite>, ids: &[String]) -> Result<Vec<Rule>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT * FROM rules WHERE id IN ({}) ORDER BY name",
            placeholders(ids.len())
        );
        let mut q = sqlx::query(&sql);
        for id in ids {
            q = q.bind(id);
        }
        let rows = q.fetch_all(pool).await?;
        Ok(rows.iter().map(map_rule_row).collect())
    }

    pub async fn create_rule(pool: &Pool<Sqlite>, req: &CreateRuleRequest) -> Result<Rule> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query("INSERT INTO rules (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(&req.name)
            .bind(now)
            .bind(now)
            .execute(pool)
            .await?;

        let row = sqlx::query("SELECT * FROM rules WHERE id = ?")
            .bind(&id)
            .fetch_optional(pool)
            .await?;
        row.as_ref()
            .map(map_rule_row)
            .context("Rule not found after creation")
    }

    pub async fn update_rule(
        pool: &Pool<Sqlite>,
        id: &str,
        req: &CreateRuleRequest,
    ) -> Result<Rule> {
        let result = sqlx::query("UPDATE rules SET name = ?, updated_at = ? WHERE id = ?")
            .bind(&req.name)
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("Rule", id).into());
        }

        let row = sqlx::query("SELECT * FROM rules WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        row.as_ref()
            .map(map_rule_row)
            .context("Rule not found after update")
    }

    pub async fn delete_rule(pool: &Pool<Sqlite>, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM rules WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("Rule", id).into());
        }
        Ok(())
    }

    // ========== Laundry service units ==========

    pub async fn list_laundry_units(pool: &Pool<Sqlite>) -> Result<Vec<LaundryUnit>> {
        let rows = sqlx::query("SELECT * FROM laundry_units ORDER BY name")
            .fetch_all(pool)
            .await?;
        Ok(rows.iter().map(map_unit_row).collect())
    }

    pub async fn get_laundry_unit(pool: &Pool<Sqlite>, id: &str) -> Result<Option<LaundryUnit>> {
        let row = sqlx::query("SELECT * FROM laundry_units WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.as_ref().map(map_unit_row))
    }

    pub async fn create_laundry_unit(
        pool: &Pool<Sqlite>,
        req: &CreateLaundryUnitRequest,
    ) -> Result<LaundryUnit> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO laundry_units (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&req.name)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Self::get_laundry_unit(pool, &id)
            .await?
            .context("Laundry unit not found after creation")
    }

    pub async fn update_laundry_unit(
        pool: &Pool<Sqlite>,
        id: &str,
        req: &CreateLaundryUnitRequest,
    ) -> Result<LaundryUnit> {
        let result = sqlx::query("UPDATE laundry_units SET name = ?, updated_at = ? WHERE id = ?")
            .bind(&req.name)
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("Laundry unit", id).into());
        }

        Self::get_laundry_unit(pool, id)
            .await?
            .context("Laundry unit not found after update")
    }

    pub async fn delete_laundry_unit(pool: &Pool<Sqlite>, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM laundry_units WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("Laundry unit", id).into());
        }
        Ok(())
    }
}
