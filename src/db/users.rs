use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};
use uuid::Uuid;

use super::row_helpers::none_if_empty;
use crate::models::*;

fn map_user_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        phone: row.get("phone"),
        role: row.get("role"),
        avatar: none_if_empty(row.get("avatar")),
        avatar_url: None,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

pub struct UserRepo;

impl UserRepo {
    pub async fn list(pool: &Pool<Sqlite>, limit: i64, offset: i64) -> Result<Vec<User>> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY created_at DESC LIMIT ? OFFSET ?")
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        Ok(rows.iter().map(map_user_row).collect())
    }

    pub async fn count(pool: &Pool<Sqlite>) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn get(pool: &Pool<Sqlite>, id: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.as_ref().map(map_user_row))
    }

    pub async fn get_by_email(pool: &Pool<Sqlite>, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?;
        Ok(row.as_ref().map(map_user_row))
    }

    pub async fn create(
        pool: &Pool<Sqlite>,
        req: &RegisterRequest,
        password_hash: &str,
    ) -> Result<User> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, phone, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&req.name)
        .bind(&req.email)
        .bind(password_hash)
        .bind(&req.phone)
        .bind(&req.role)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Self::get(pool, &id)
            .await?
            .context("User not found after creation")
    }

    pub async fn update(pool: &Pool<Sqlite>, id: &str, req: &UpdateUserRequest) -> Result<User> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE users SET name = ?, phone = ?, role = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&req.name)
        .bind(&req.phone)
        .bind(&req.role)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("User", id).into());
        }

        Self::get(pool, id)
            .await?
            .context("User not found after update")
    }

    pub async fn set_avatar(pool: &Pool<Sqlite>, id: &str, path: &str) -> Result<()> {
        let result = sqlx::query("UPDATE users SET avatar = ?, updated_at = ? WHERE id = ?")
            .bind(path)
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("User", id).into());
        }
        Ok(())
    }

    pub async fn delete(pool: &Pool<Sqlite>, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(super::NotFoundError::new("User", id).into());
        }
        Ok(())
    }
}
