use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};
use uuid::Uuid;

use super::row_helpers::{json_column, none_if_empty};
use super::{advance_in_sequence, ForbiddenError, NotFoundError, ValidationError};
use crate::models::laundry_order_status as status;
use crate::models::*;

fn map_provider_row(row: &SqliteRow) -> LaundryProvider {
    LaundryProvider {
        id: row.get("id"),
        kost_id: row.get("kost_id"),
        name: row.get("name"),
        is_active: row.get("is_active"),
        rekening_info: json_column(row, "rekening_info"),
        qris_image: none_if_empty(row.get("qris_image")),
        qris_url: None,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn map_service_row(row: &SqliteRow) -> LaundryService {
    LaundryService {
        id: row.get("id"),
        provider_id: row.get("provider_id"),
        name: row.get("name"),
        unit_id: row.get("unit_id"),
        unit_name: row.try_get("unit_name").ok(),
        price: row.get("price"),
        is_available: row.get("is_available"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn map_order_row(row: &SqliteRow) -> LaundryOrder {
    LaundryOrder {
        id: row.get("id"),
        user_id: row.get("user_id"),
        provider_id: row.get("provider_id"),
        status: row.get("status"),
        total_price: row.get("total_price"),
        note: row.get("note"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn map_payment_row(row: &SqliteRow) -> LaundryPayment {
    LaundryPayment {
        id: row.get("id"),
        order_id: row.get("order_id"),
        amount: row.get("amount"),
        method: row.get("method"),
        proof: row.get("proof"),
        proof_url: None,
        status: row.get("status"),
        verified_by: row.get("verified_by"),
        verified_at: row.get("verified_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

pub struct LaundryRepo;

impl LaundryRepo {
    // ========== Providers ==========

    pub async fn list_providers_by_kost(
        pool: &Pool<Sqlite>,
        kost_id: &str,
    ) -> Result<Vec<LaundryProvider>> {
        let rows = sqlx::query("SELECT * FROM laundry_providers WHERE kost_id = ? ORDER BY name")
            .bind(kost_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.iter().map(map_provider_row).collect())
    }

    pub async fn get_provider(pool: &Pool<Sqlite>, id: &str) -> Result<Option<LaundryProvider>> {
        let row = sqlx::query("SELECT * FROM laundry_providers WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.as_ref().map(map_provider_row))
    }

    /// Provider together with the id of the pengelola who manages its kost
    pub async fn provider_owner(
        pool: &Pool<Sqlite>,
        id: &str,
    ) -> Result<Option<(LaundryProvider, String)>> {
        let row = sqlx::query(
            r#"
            SELECT p.*, k.owner_id AS kost_owner_id
            FROM laundry_providers p
            JOIN kosts k ON k.id = p.kost_id
            WHERE p.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row
            .as_ref()
            .map(|r| (map_provider_row(r), r.get("kost_owner_id"))))
    }

    pub async fn create_provider(
        pool: &Pool<Sqlite>,
        kost_id: &str,
        name: &str,
        rekening_info: &RekeningInfo,
        qris_image: Option<&str>,
    ) -> Result<LaundryProvider> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO laundry_providers
                (id, kost_id, name, is_active, rekening_info, qris_image, created_at, updated_at)
            VALUES (?, ?, ?, 1, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(kost_id)
        .bind(name)
        .bind(serde_json::to_string(rekening_info)?)
        .bind(qris_image)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Self::get_provider(pool, &id)
            .await?
            .context("Provider not found after creation")
    }

    pub async fn update_provider(
        pool: &Pool<Sqlite>,
        id: &str,
        req: &UpdateProviderRequest,
    ) -> Result<LaundryProvider> {
        let current = Self::get_provider(pool, id)
            .await?
            .ok_or_else(|| NotFoundError::new("Laundry provider", id))?;
        let rekening = req.rekening_info.as_ref().unwrap_or(&current.rekening_info);

        sqlx::query(
            r#"
            UPDATE laundry_providers
            SET name = ?, is_active = ?, rekening_info = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&req.name)
        .bind(req.is_active)
        .bind(serde_json::to_string(rekening)?)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

        Self::get_provider(pool, id)
            .await?
            .context("Provider not found after update")
    }

    pub async fn set_provider_qris(pool: &Pool<Sqlite>, id: &str, path: &str) -> Result<()> {
        let result =
            sqlx::query("UPDATE laundry_providers SET qris_image = ?, updated_at = ? WHERE id = ?")
                .bind(path)
                .bind(Utc::now())
                .bind(id)
                .execute(pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(NotFoundError::new("Laundry provider", id).into());
        }
        Ok(())
    }

    // ========== Price list ==========

    pub async fn list_services_by_provider(
        pool: &Pool<Sqlite>,
        provider_id: &str,
    ) -> Result<Vec<LaundryService>> {
        let rows = sqlx::query(
            r#"
            SELECT s.*, u.name AS unit_name
            FROM laundry_services s
            JOIN laundry_units u ON u.id = s.unit_id
            WHERE s.provider_id = ?
            ORDER BY s.name
            "#,
        )
        .bind(provider_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.iter().map(map_service_row).collect())
    }

    pub async fn get_service(pool: &Pool<Sqlite>, id: &str) -> Result<Option<LaundryService>> {
        let row = sqlx::query(
            r#"
            SELECT s.*, u.name AS unit_name
            FROM laundry_services s
            JOIN laundry_units u ON u.id = s.unit_id
            WHERE s.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.as_ref().map(map_service_row))
    }

    pub async fn create_service(
        pool: &Pool<Sqlite>,
        provider_id: &str,
        req: &CreateLaundryServiceRequest,
    ) -> Result<LaundryService> {
        if req.price < 0 {
            return Err(ValidationError::new("price must not be negative").into());
        }
        super::master::MasterRepo::get_laundry_unit(pool, &req.unit_id)
            .await?
            .ok_or_else(|| NotFoundError::new("Laundry unit", &req.unit_id))?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO laundry_services
                (id, provider_id, name, unit_id, price, is_available, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(provider_id)
        .bind(&req.name)
        .bind(&req.unit_id)
        .bind(req.price)
        .bind(req.is_available)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Self::get_service(pool, &id)
            .await?
            .context("Service not found after creation")
    }

    pub async fn update_service(
        pool: &Pool<Sqlite>,
        id: &str,
        req: &CreateLaundryServiceRequest,
    ) -> Result<LaundryService> {
        if req.price < 0 {
            return Err(ValidationError::new("price must not be negative").into());
        }
        super::master::MasterRepo::get_laundry_unit(pool, &req.unit_id)
            .await?
            .ok_or_else(|| NotFoundError::new("Laundry unit", &req.unit_id))?;

        let result = sqlx::query(
            r#"
            UPDATE laundry_services
            SET name = ?, unit_id = ?, price = ?, is_available = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&req.name)
        .bind(&req.unit_id)
        .bind(req.price)
        .bind(req.is_available)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(NotFoundError::new("Laundry service", id).into());
        }

        Self::get_service(pool, id)
            .await?
            .context("Service not found after update")
    }

    pub async fn delete_service(pool: &Pool<Sqlite>, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM laundry_services WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(NotFoundError::new("Laundry service", id).into());
        }
        Ok(())
    }

    // ========== Orders ==========

    /// Place an order: identical orchestration to the catering flow, kept
    /// separate because the status sequences and cancellation windows of
    /// the two domains differ.
    pub async fn place_order(
        pool: &Pool<Sqlite>,
        user_id: &str,
        items: &[LaundryOrderItemInput],
        payment_method: &str,
        note: Option<&str>,
        proof_path: &str,
    ) -> Result<LaundryOrderDetail> {
        if items.is_empty() {
            return Err(ValidationError::new("order must contain at least one item").into());
        }
        if items.iter().any(|i| i.quantity < 1) {
            return Err(ValidationError::new("item quantity must be at least 1").into());
        }

        let mut ids: Vec<&str> = items.iter().map(|i| i.service_id.as_str()).collect();
        ids.sort();
        ids.dedup();

        let mut tx = pool.begin().await?;

        let sql = format!(
            r#"
            SELECT s.id, s.name, s.price, s.provider_id, p.kost_id
            FROM laundry_services s
            JOIN laundry_providers p ON p.id = s.provider_id
            WHERE s.id IN ({}) AND s.is_available = 1 AND p.is_active = 1
            "#,
            super::master::placeholders(ids.len())
        );
        let mut q = sqlx::query(&sql);
        for id in &ids {
            q = q.bind(*id);
        }
        let rows = q.fetch_all(&mut *tx).await?;

        if rows.len() != ids.len() {
            let found: Vec<String> = rows.iter().map(|r| r.get("id")).collect();
            let missing: Vec<&str> = ids
                .iter()
                .filter(|id| !found.iter().any(|f| f == *id))
                .copied()
                .collect();
            return Err(NotFoundError::new("Laundry service", &missing.join(", ")).into());
        }

        struct Entry {
            price: i64,
            provider_id: String,
            kost_id: String,
        }
        let catalog: std::collections::HashMap<String, Entry> = rows
            .iter()
            .map(|r| {
                (
                    r.get("id"),
                    Entry {
                        price: r.get("price"),
                        provider_id: r.get("provider_id"),
                        kost_id: r.get("kost_id"),
                    },
                )
            })
            .collect();

        let first = &catalog[&items[0].service_id];
        let provider_id = first.provider_id.clone();
        let kost_id = first.kost_id.clone();
        for item in items {
            let entry = &catalog[&item.service_id];
            if entry.provider_id != provider_id {
                return Err(
                    ValidationError::new("all items must belong to the same provider").into(),
                );
            }
            if entry.kost_id != kost_id {
                return Err(ValidationError::new("all items must belong to the same kost").into());
            }
        }

        let provider_active: Option<bool> =
            sqlx::query_scalar("SELECT is_active FROM laundry_providers WHERE id = ?")
                .bind(&provider_id)
                .fetch_optional(&mut *tx)
                .await?;
        if !provider_active.unwrap_or(false) {
            return Err(ValidationError::new("provider is not active").into());
        }

        let active_tenancy: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM reservations
            WHERE user_id = ? AND kost_id = ?
              AND status = 'APPROVED' AND occupancy_status = 'AKTIF'
            "#,
        )
        .bind(user_id)
        .bind(&kost_id)
        .fetch_one(&mut *tx)
        .await?;
        if active_tenancy == 0 {
            return Err(
                ForbiddenError::new("no active reservation at this provider's kost").into(),
            );
        }

        let total: i64 = items
            .iter()
            .map(|i| catalog[&i.service_id].price * i.quantity)
            .sum();

        let order_id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO laundry_orders
                (id, user_id, provider_id, status, total_price, note, created_at, updated_at)
            VALUES (?, ?, ?, 'PENDING', ?, ?, ?, ?)
            "#,
        )
        .bind(&order_id)
        .bind(user_id)
        .bind(&provider_id)
        .bind(total)
        .bind(note)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO laundry_order_items (id, order_id, service_id, quantity, unit_price)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&order_id)
            .bind(&item.service_id)
            .bind(item.quantity)
            .bind(catalog[&item.service_id].price)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO laundry_payments
                (id, order_id, amount, method, proof, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 'PENDING', ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&order_id)
        .bind(total)
        .bind(payment_method)
        .bind(proof_path)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Self::order_detail(pool, &order_id).await
    }

    pub async fn get_order(pool: &Pool<Sqlite>, id: &str) -> Result<Option<LaundryOrder>> {
        let row = sqlx::query("SELECT * FROM laundry_orders WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.as_ref().map(map_order_row))
    }

    pub async fn order_detail(pool: &Pool<Sqlite>, id: &str) -> Result<LaundryOrderDetail> {
        let order = Self::get_order(pool, id)
            .await?
            .ok_or_else(|| NotFoundError::new("Order", id))?;

        let item_rows = sqlx::query(
            r#"
            SELECT i.id, i.service_id, s.name AS service_name, u.name AS unit_name,
                   i.quantity, i.unit_price
            FROM laundry_order_items i
            JOIN laundry_services s ON s.id = i.service_id
            JOIN laundry_units u ON u.id = s.unit_id
            WHERE i.order_id = ?
            "#,
        )
        .bind(id)
        .fetch_all(pool)
        .await?;
        let items = item_rows
            .iter()
            .map(|r| {
                let quantity: i64 = r.get("quantity");
                let unit_price: i64 = r.get("unit_price");
                LaundryOrderItemDetail {
                    id: r.get("id"),
                    service_id: r.get("service_id"),
                    service_name: r.get("service_name"),
                    unit_name: r.try_get("unit_name").ok(),
                    quantity,
                    unit_price,
                    line_total: quantity * unit_price,
                }
            })
            .collect();

        let payment_row = sqlx::query("SELECT * FROM laundry_payments WHERE order_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
        let payment = map_payment_row(&payment_row);

        Ok(LaundryOrderDetail {
            order,
            items,
            payment,
        })
    }

    pub async fn list_orders_by_user(
        pool: &Pool<Sqlite>,
        user_id: &str,
    ) -> Result<Vec<LaundryOrder>> {
        let rows =
            sqlx::query("SELECT * FROM laundry_orders WHERE user_id = ? ORDER BY created_at DESC")
                .bind(user_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.iter().map(map_order_row).collect())
    }

    pub async fn list_orders_by_provider(
        pool: &Pool<Sqlite>,
        provider_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LaundryOrder>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM laundry_orders WHERE provider_id = ?
            ORDER BY created_at DESC LIMIT ? OFFSET ?
            "#,
        )
        .bind(provider_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
        Ok(rows.iter().map(map_order_row).collect())
    }

    pub async fn count_orders_by_provider(pool: &Pool<Sqlite>, provider_id: &str) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM laundry_orders WHERE provider_id = ?")
                .bind(provider_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Move an order forward along
    /// PENDING → DITERIMA → DIPROSES → SELESAI → DIAMBIL
    pub async fn update_order_status(
        pool: &Pool<Sqlite>,
        id: &str,
        new_status: &str,
    ) -> Result<LaundryOrder> {
        let order = Self::get_order(pool, id)
            .await?
            .ok_or_else(|| NotFoundError::new("Order", id))?;

        advance_in_sequence(status::SEQUENCE, &order.status, new_status)
            .map_err(ValidationError::new)?;

        let result = sqlx::query(
            "UPDATE laundry_orders SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
        )
        .bind(new_status)
        .bind(Utc::now())
        .bind(id)
        .bind(&order.status)
        .execute(pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(ValidationError::new("order status changed concurrently").into());
        }

        Self::get_order(pool, id)
            .await?
            .context("Order not found after update")
    }

    /// Cancel an order; laundry orders are cancellable while PENDING or
    /// DITERIMA (before processing begins)
    pub async fn cancel_order(pool: &Pool<Sqlite>, id: &str) -> Result<LaundryOrder> {
        let order = Self::get_order(pool, id)
            .await?
            .ok_or_else(|| NotFoundError::new("Order", id))?;

        if !status::cancellable_from(&order.status) {
            return Err(ValidationError::new("order can no longer be cancelled").into());
        }

        let result = sqlx::query(
            r#"
            UPDATE laundry_orders SET status = 'DIBATALKAN', updated_at = ?
            WHERE id = ? AND status IN ('PENDING', 'DITERIMA')
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(ValidationError::new("order can no longer be cancelled").into());
        }

        Self::get_order(pool, id)
            .await?
            .context("Order not found after cancellation")
    }

    /// Verify or reject the payment proof attached to an order
    pub async fn verify_payment(
        pool: &Pool<Sqlite>,
        order_id: &str,
        new_status: &str,
        acting_user_id: &str,
    ) -> Result<LaundryPayment> {
        if new_status != payment_status::TERVERIFIKASI && new_status != payment_status::DITOLAK {
            return Err(ValidationError::new(format!(
                "status must be {} or {}",
                payment_status::TERVERIFIKASI,
                payment_status::DITOLAK
            ))
            .into());
        }

        let result = sqlx::query(
            r#"
            UPDATE laundry_payments
            SET status = ?, verified_by = ?, verified_at = ?, updated_at = ?
            WHERE order_id = ? AND status = 'PENDING'
            "#,
        )
        .bind(new_status)
        .bind(acting_user_id)
        .bind(Utc::now())
        .bind(Utc::now())
        .bind(order_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            let row = sqlx::query("SELECT * FROM laundry_payments WHERE order_id = ?")
                .bind(order_id)
                .fetch_optional(pool)
                .await?;
            return match row {
                Some(_) => Err(ValidationError::new("payment has already been verified").into()),
                None => Err(NotFoundError::new("Payment for order", order_id).into()),
            };
        }

        let row = sqlx::query("SELECT * FROM laundry_payments WHERE order_id = ?")
            .bind(order_id)
            .fetch_one(pool)
            .await?;
        Ok(map_payment_row(&row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::*;

    async fn seed_order(store: &crate::db::Store) -> (String, String) {
        let owner = seed_user(store, "PENGELOLA").await;
        let tenant = seed_user(store, "PENGHUNI").await;
        let kost = seed_kost(store, &owner.id, 3, 1_000_000).await;
        seed_active_tenancy(store, &tenant.id, &kost.id, &owner.id).await;

        let provider = seed_laundry_provider(store, &kost.id).await;
        let service = seed_laundry_service(store, &provider.id, "Cuci Kering", 7_000).await;

        let items = vec![LaundryOrderItemInput {
            service_id: service.id.clone(),
            quantity: 3,
        }];
        let detail = LaundryRepo::place_order(
            store.pool(),
            &tenant.id,
            &items,
            "transfer",
            None,
            "payment-proofs/laundry.jpg",
        )
        .await
        .unwrap();
        (detail.order.id, tenant.id)
    }

    #[tokio::test]
    async fn test_place_order_prices_per_unit() {
        let store = memory_store().await;
        let (order_id, _) = seed_order(&store).await;

        let detail = LaundryRepo::order_detail(store.pool(), &order_id).await.unwrap();
        assert_eq!(detail.order.total_price, 21_000);
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].unit_price, 7_000);
        assert_eq!(detail.items[0].line_total, 21_000);
        assert_eq!(detail.payment.amount, 21_000);
        assert_eq!(detail.payment.status, "PENDING");
    }

    #[tokio::test]
    async fn test_cancel_window_includes_diterima() {
        // Unlike catering, a laundry order is still cancellable once the
        // provider has received it.
        let store = memory_store().await;
        let (order_id, _) = seed_order(&store).await;

        LaundryRepo::update_order_status(store.pool(), &order_id, "DITERIMA")
            .await
            .unwrap();
        let cancelled = LaundryRepo::cancel_order(store.pool(), &order_id).await.unwrap();
        assert_eq!(cancelled.status, "DIBATALKAN");
    }

    #[tokio::test]
    async fn test_cancel_rejected_once_processing() {
        let store = memory_store().await;
        let (order_id, _) = seed_order(&store).await;

        LaundryRepo::update_order_status(store.pool(), &order_id, "DITERIMA")
            .await
            .unwrap();
        LaundryRepo::update_order_status(store.pool(), &order_id, "DIPROSES")
            .await
            .unwrap();

        let err = LaundryRepo::cancel_order(store.pool(), &order_id).await.unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());
    }

    #[tokio::test]
    async fn test_status_sequence_ends_at_pickup() {
        let store = memory_store().await;
        let (order_id, _) = seed_order(&store).await;

        for next in ["DITERIMA", "DIPROSES", "SELESAI", "DIAMBIL"] {
            LaundryRepo::update_order_status(store.pool(), &order_id, next)
                .await
                .unwrap();
        }

        // Terminal: nothing moves after pickup
        let err = LaundryRepo::update_order_status(store.pool(), &order_id, "SELESAI")
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());
    }

    #[tokio::test]
    async fn test_service_requires_known_unit() {
        let store = memory_store().await;
        let owner = seed_user(&store, "PENGELOLA").await;
        let kost = seed_kost(&store, &owner.id, 3, 1_000_000).await;
        let provider = seed_laundry_provider(&store, &kost.id).await;

        let err = LaundryRepo::create_service(
            store.pool(),
            &provider.id,
            &CreateLaundryServiceRequest {
                name: "Cuci Basah".to_string(),
                unit_id: "does-not-exist".to_string(),
                price: 5_000,
                is_available: true,
            },
        )
        .await
        .unwrap_err();
        assert!(err.downcast_ref::<crate::db::NotFoundError>().is_some());
    }
}
