use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};
use uuid::Uuid;

use super::row_helpers::{json_column, none_if_empty};
use super::{advance_in_sequence, ForbiddenError, NotFoundError, ValidationError};
use crate::models::catering_order_status as status;
use crate::models::*;

fn map_provider_row(row: &SqliteRow) -> CateringProvider {
    CateringProvider {
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

fn map_menu_row(row: &SqliteRow) -> CateringMenu {
    CateringMenu {
        id: row.get("id"),
        provider_id: row.get("provider_id"),
        name: row.get("name"),
        price: row.get("price"),
        photo: none_if_empty(row.get("photo")),
        photo_url: None,
        is_available: row.get("is_available"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn map_order_row(row: &SqliteRow) -> CateringOrder {
    CateringOrder {
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

fn map_payment_row(row: &SqliteRow) -> CateringPayment {
    CateringPayment {
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

pub struct CateringRepo;

impl CateringRepo {
    // ========== Providers ==========

    pub async fn list_providers_by_kost(
        pool: &Pool<Sqlite>,
        kost_id: &str,
    ) -> Result<Vec<CateringProvider>> {
        let rows =
            sqlx::query("SELECT * FROM catering_providers WHERE kost_id = ? ORDER BY name")
                .bind(kost_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.iter().map(map_provider_row).collect())
    }

    pub async fn get_provider(pool: &Pool<Sqlite>, id: &str) -> Result<Option<CateringProvider>> {
        let row = sqlx::query("SELECT * FROM catering_providers WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.as_ref().map(map_provider_row))
    }

    /// Provider together with the id of the pengelola who manages its kost,
    /// used by ownership checks.
    pub async fn provider_owner(
        pool: &Pool<Sqlite>,
        id: &str,
    ) -> Result<Option<(CateringProvider, String)>> {
        let row = sqlx::query(
            r#"
            SELECT p.*, k.owner_id AS kost_owner_id
            FROM catering_providers p
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
    ) -> Result<CateringProvider> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO catering_providers
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
    ) -> Result<CateringProvider> {
        let current = Self::get_provider(pool, id)
            .await?
            .ok_or_else(|| NotFoundError::new("Catering provider", id))?;
        let rekening = req.rekening_info.as_ref().unwrap_or(&current.rekening_info);

        sqlx::query(
            r#"
            UPDATE catering_providers
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
            sqlx::query("UPDATE catering_providers SET qris_image = ?, updated_at = ? WHERE id = ?")
                .bind(path)
                .bind(Utc::now())
                .bind(id)
                .execute(pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(NotFoundError::new("Catering provider", id).into());
        }
        Ok(())
    }

    // ========== Menus ==========

    pub async fn list_menus_by_provider(
        pool: &Pool<Sqlite>,
        provider_id: &str,
    ) -> Result<Vec<CateringMenu>> {
        let rows = sqlx::query("SELECT * FROM catering_menus WHERE provider_id = ? ORDER BY name")
            .bind(provider_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.iter().map(map_menu_row).collect())
    }

    pub async fn get_menu(pool: &Pool<Sqlite>, id: &str) -> Result<Option<CateringMenu>> {
        let row = sqlx::query("SELECT * FROM catering_menus WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.as_ref().map(map_menu_row))
    }

    pub async fn create_menu(
        pool: &Pool<Sqlite>,
        provider_id: &str,
        name: &str,
        price: i64,
        photo: Option<&str>,
    ) -> Result<CateringMenu> {
        if price < 0 {
            return Err(ValidationError::new("price must not be negative").into());
        }
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO catering_menus
                (id, provider_id, name, price, photo, is_available, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 1, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(provider_id)
        .bind(name)
        .bind(price)
        .bind(photo)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Self::get_menu(pool, &id)
            .await?
            .context("Menu not found after creation")
    }

    pub async fn update_menu(
        pool: &Pool<Sqlite>,
        id: &str,
        req: &UpdateCateringMenuRequest,
    ) -> Result<CateringMenu> {
        if req.price < 0 {
            return Err(ValidationError::new("price must not be negative").into());
        }
        let result = sqlx::query(
            r#"
            UPDATE catering_menus
            SET name = ?, price = ?, is_available = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&req.name)
        .bind(req.price)
        .bind(req.is_available)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(NotFoundError::new("Menu", id).into());
        }

        Self::get_menu(pool, id)
            .await?
            .context("Menu not found after update")
    }

    pub async fn set_menu_photo(pool: &Pool<Sqlite>, id: &str, path: &str) -> Result<()> {
        let result =
            sqlx::query("UPDATE catering_menus SET photo = ?, updated_at = ? WHERE id = ?")
                .bind(path)
                .bind(Utc::now())
                .bind(id)
                .execute(pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(NotFoundError::new("Menu", id).into());
        }
        Ok(())
    }

    pub async fn delete_menu(pool: &Pool<Sqlite>, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM catering_menus WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(NotFoundError::new("Menu", id).into());
        }
        Ok(())
    }

    // ========== Orders ==========

    /// Place an order: all validation runs inside the same transaction as
    /// the order + line-item + payment inserts, so a failure at any step
    /// persists nothing. Unit prices always come from the price list, never
    /// from the client.
    pub async fn place_order(
        pool: &Pool<Sqlite>,
        user_id: &str,
        items: &[CateringOrderItemInput],
        payment_method: &str,
        note: Option<&str>,
        proof_path: &str,
    ) -> Result<CateringOrderDetail> {
        if items.is_empty() {
            return Err(ValidationError::new("order must contain at least one item").into());
        }
        if items.iter().any(|i| i.quantity < 1) {
            return Err(ValidationError::new("item quantity must be at least 1").into());
        }

        let mut ids: Vec<&str> = items.iter().map(|i| i.menu_id.as_str()).collect();
        ids.sort();
        ids.dedup();

        let mut tx = pool.begin().await?;

        // Load every referenced price-list entry in one query, restricted to
        // available menus of active providers.
        let sql = format!(
            r#"
            SELECT m.id, m.name, m.price, m.provider_id, p.kost_id
            FROM catering_menus m
            JOIN catering_providers p ON p.id = m.provider_id
            WHERE m.id IN ({}) AND m.is_available = 1 AND p.is_active = 1
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
            return Err(NotFoundError::new("Menu", &missing.join(", ")).into());
        }

        struct Entry {
            name: String,
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
                        name: r.get("name"),
                        price: r.get("price"),
                        provider_id: r.get("provider_id"),
                        kost_id: r.get("kost_id"),
                    },
                )
            })
            .collect();

        // Single-provider, single-property order invariant
        let first = &catalog[&items[0].menu_id];
        let provider_id = first.provider_id.clone();
        let kost_id = first.kost_id.clone();
        for item in items {
            let entry = &catalog[&item.menu_id];
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
            sqlx::query_scalar("SELECT is_active FROM catering_providers WHERE id = ?")
                .bind(&provider_id)
                .fetch_optional(&mut *tx)
                .await?;
        if !provider_active.unwrap_or(false) {
            return Err(ValidationError::new("provider is not active").into());
        }

        // The buyer must currently live at the provider's kost
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
            .map(|i| catalog[&i.menu_id].price * i.quantity)
            .sum();

        let order_id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO catering_orders
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
                INSERT INTO catering_order_items (id, order_id, menu_id, quantity, unit_price)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&order_id)
            .bind(&item.menu_id)
            .bind(item.quantity)
            .bind(catalog[&item.menu_id].price)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO catering_payments
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

    pub async fn get_order(pool: &Pool<Sqlite>, id: &str) -> Result<Option<CateringOrder>> {
        let row = sqlx::query("SELECT * FROM catering_orders WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.as_ref().map(map_order_row))
    }

    pub async fn order_detail(pool: &Pool<Sqlite>, id: &str) -> Result<CateringOrderDetail> {
        let order = Self::get_order(pool, id)
            .await?
            .ok_or_else(|| NotFoundError::new("Order", id))?;

        let item_rows = sqlx::query(
            r#"
            SELECT i.id, i.menu_id, m.name AS menu_name, i.quantity, i.unit_price
            FROM catering_order_items i
            JOIN catering_menus m ON m.id = i.menu_id
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
                CateringOrderItemDetail {
                    id: r.get("id"),
                    menu_id: r.get("menu_id"),
                    menu_name: r.get("menu_name"),
                    quantity,
                    unit_price,
                    line_total: quantity * unit_price,
                }
            })
            .collect();

        let payment_row = sqlx::query("SELECT * FROM catering_payments WHERE order_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
        let payment = map_payment_row(&payment_row);

        Ok(CateringOrderDetail {
            order,
            items,
            payment,
        })
    }

    pub async fn list_orders_by_user(
        pool: &Pool<Sqlite>,
        user_id: &str,
    ) -> Result<Vec<CateringOrder>> {
        let rows =
            sqlx::query("SELECT * FROM catering_orders WHERE user_id = ? ORDER BY created_at DESC")
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
    ) -> Result<Vec<CateringOrder>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM catering_orders WHERE provider_id = ?
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
            sqlx::query_scalar("SELECT COUNT(*) FROM catering_orders WHERE provider_id = ?")
                .bind(provider_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Move an order forward along PENDING → DITERIMA → DIPROSES → SELESAI
    pub async fn update_order_status(
        pool: &Pool<Sqlite>,
        id: &str,
        new_status: &str,
    ) -> Result<CateringOrder> {
        let order = Self::get_order(pool, id)
            .await?
            .ok_or_else(|| NotFoundError::new("Order", id))?;

        advance_in_sequence(status::SEQUENCE, &order.status, new_status)
            .map_err(ValidationError::new)?;

        // Guard on the previous status so concurrent updates cannot move the
        // order backwards
        let result = sqlx::query(
            "UPDATE catering_orders SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
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

    /// Cancel an order; catering orders are cancellable only while PENDING
    pub async fn cancel_order(pool: &Pool<Sqlite>, id: &str) -> Result<CateringOrder> {
        let order = Self::get_order(pool, id)
            .await?
            .ok_or_else(|| NotFoundError::new("Order", id))?;

        if !status::cancellable_from(&order.status) {
            return Err(ValidationError::new("order can no longer be cancelled").into());
        }

        let result = sqlx::query(
            "UPDATE catering_orders SET status = 'DIBATALKAN', updated_at = ? WHERE id = ? AND status = 'PENDING'",
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

    /// Verify or reject the payment proof attached to an order. Independent
    /// of the order status sequence.
    pub async fn verify_payment(
        pool: &Pool<Sqlite>,
        order_id: &str,
        new_status: &str,
        acting_user_id: &str,
    ) -> Result<CateringPayment> {
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
            UPDATE catering_payments
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
            let row = sqlx::query("SELECT * FROM catering_payments WHERE order_id = ?")
                .bind(order_id)
                .fetch_optional(pool)
                .await?;
            return match row {
                Some(_) => Err(ValidationError::new("payment has already been verified").into()),
                None => Err(NotFoundError::new("Payment for order", order_id).into()),
            };
        }

        let row = sqlx::query("SELECT * FROM catering_payments WHERE order_id = ?")
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

    #[tokio::test]
    async fn test_place_order_totals_and_payment() {
        // Quantities [2, 1] at unit prices [15000, 5000] -> total 35000
        let store = memory_store().await;
        let owner = seed_user(&store, "PENGELOLA").await;
        let tenant = seed_user(&store, "PENGHUNI").await;
        let kost = seed_kost(&store, &owner.id, 3, 1_000_000).await;
        seed_active_tenancy(&store, &tenant.id, &kost.id, &owner.id).await;

        let provider = seed_catering_provider(&store, &kost.id).await;
        let nasi = seed_catering_menu(&store, &provider.id, "Nasi Ayam", 15_000).await;
        let teh = seed_catering_menu(&store, &provider.id, "Es Teh", 5_000).await;

        let items = vec![
            CateringOrderItemInput {
                menu_id: nasi.id.clone(),
                quantity: 2,
            },
            CateringOrderItemInput {
                menu_id: teh.id.clone(),
                quantity: 1,
            },
        ];
        let detail = CateringRepo::place_order(
            store.pool(),
            &tenant.id,
            &items,
            "transfer",
            Some("tanpa sambal"),
            "payment-proofs/order.jpg",
        )
        .await
        .unwrap();

        assert_eq!(detail.order.total_price, 35_000);
        assert_eq!(detail.order.status, "PENDING");
        assert_eq!(detail.items.len(), 2);
        assert_eq!(detail.payment.amount, 35_000);
        assert_eq!(detail.payment.status, "PENDING");
        let nasi_item = detail.items.iter().find(|i| i.menu_id == nasi.id).unwrap();
        assert_eq!(nasi_item.unit_price, 15_000);
        assert_eq!(nasi_item.line_total, 30_000);
    }

    #[tokio::test]
    async fn test_unavailable_menu_fails_with_no_rows() {
        // One item's price-list entry is unavailable: the whole order fails
        let store = memory_store().await;
        let owner = seed_user(&store, "PENGELOLA").await;
        let tenant = seed_user(&store, "PENGHUNI").await;
        let kost = seed_kost(&store, &owner.id, 3, 1_000_000).await;
        seed_active_tenancy(&store, &tenant.id, &kost.id, &owner.id).await;

        let provider = seed_catering_provider(&store, &kost.id).await;
        let available = seed_catering_menu(&store, &provider.id, "Nasi Ayam", 15_000).await;
        let hidden = seed_catering_menu(&store, &provider.id, "Habis", 10_000).await;
        CateringRepo::update_menu(
            store.pool(),
            &hidden.id,
            &UpdateCateringMenuRequest {
                name: hidden.name.clone(),
                price: hidden.price,
                is_available: false,
            },
        )
        .await
        .unwrap();

        let items = vec![
            CateringOrderItemInput {
                menu_id: available.id.clone(),
                quantity: 1,
            },
            CateringOrderItemInput {
                menu_id: hidden.id.clone(),
                quantity: 1,
            },
        ];
        let err = CateringRepo::place_order(
            store.pool(),
            &tenant.id,
            &items,
            "transfer",
            None,
            "payment-proofs/order.jpg",
        )
        .await
        .unwrap_err();
        let nf = err.downcast_ref::<crate::db::NotFoundError>().unwrap();
        assert!(nf.to_string().contains(&hidden.id));

        let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catering_orders")
            .fetch_one(store.pool())
            .await
            .unwrap();
        let payments: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catering_payments")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!((orders, payments), (0, 0));
    }

    #[tokio::test]
    async fn test_cross_provider_order_rejected() {
        let store = memory_store().await;
        let owner = seed_user(&store, "PENGELOLA").await;
        let tenant = seed_user(&store, "PENGHUNI").await;
        let kost = seed_kost(&store, &owner.id, 3, 1_000_000).await;
        seed_active_tenancy(&store, &tenant.id, &kost.id, &owner.id).await;

        let provider_a = seed_catering_provider(&store, &kost.id).await;
        let provider_b = seed_catering_provider(&store, &kost.id).await;
        let from_a = seed_catering_menu(&store, &provider_a.id, "Nasi", 12_000).await;
        let from_b = seed_catering_menu(&store, &provider_b.id, "Mie", 11_000).await;

        let items = vec![
            CateringOrderItemInput {
                menu_id: from_a.id.clone(),
                quantity: 1,
            },
            CateringOrderItemInput {
                menu_id: from_b.id.clone(),
                quantity: 1,
            },
        ];
        let err = CateringRepo::place_order(
            store.pool(),
            &tenant.id,
            &items,
            "transfer",
            None,
            "payment-proofs/order.jpg",
        )
        .await
        .unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());

        let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catering_orders")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(orders, 0);
    }

    #[tokio::test]
    async fn test_order_requires_active_tenancy() {
        let store = memory_store().await;
        let owner = seed_user(&store, "PENGELOLA").await;
        let outsider = seed_user(&store, "PENGHUNI").await;
        let kost = seed_kost(&store, &owner.id, 3, 1_000_000).await;

        let provider = seed_catering_provider(&store, &kost.id).await;
        let menu = seed_catering_menu(&store, &provider.id, "Nasi", 12_000).await;

        let items = vec![CateringOrderItemInput {
            menu_id: menu.id.clone(),
            quantity: 1,
        }];
        let err = CateringRepo::place_order(
            store.pool(),
            &outsider.id,
            &items,
            "transfer",
            None,
            "payment-proofs/order.jpg",
        )
        .await
        .unwrap_err();
        assert!(err.downcast_ref::<ForbiddenError>().is_some());
    }

    #[tokio::test]
    async fn test_status_moves_forward_only_and_cancel_window() {
        let store = memory_store().await;
        let owner = seed_user(&store, "PENGELOLA").await;
        let tenant = seed_user(&store, "PENGHUNI").await;
        let kost = seed_kost(&store, &owner.id, 3, 1_000_000).await;
        seed_active_tenancy(&store, &tenant.id, &kost.id, &owner.id).await;

        let provider = seed_catering_provider(&store, &kost.id).await;
        let menu = seed_catering_menu(&store, &provider.id, "Nasi", 12_000).await;
        let items = vec![CateringOrderItemInput {
            menu_id: menu.id.clone(),
            quantity: 1,
        }];
        let detail = CateringRepo::place_order(
            store.pool(),
            &tenant.id,
            &items,
            "transfer",
            None,
            "payment-proofs/order.jpg",
        )
        .await
        .unwrap();

        let accepted =
            CateringRepo::update_order_status(store.pool(), &detail.order.id, "DITERIMA")
                .await
                .unwrap();
        assert_eq!(accepted.status, "DITERIMA");

        // Backwards is rejected
        let err = CateringRepo::update_order_status(store.pool(), &detail.order.id, "PENDING")
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());

        // Catering orders are only cancellable while still PENDING
        let err = CateringRepo::cancel_order(store.pool(), &detail.order.id)
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());
    }

    #[tokio::test]
    async fn test_verify_payment_once() {
        let store = memory_store().await;
        let owner = seed_user(&store, "PENGELOLA").await;
        let tenant = seed_user(&store, "PENGHUNI").await;
        let kost = seed_kost(&store, &owner.id, 3, 1_000_000).await;
        seed_active_tenancy(&store, &tenant.id, &kost.id, &owner.id).await;

        let provider = seed_catering_provider(&store, &kost.id).await;
        let menu = seed_catering_menu(&store, &provider.id, "Nasi", 12_000).await;
        let items = vec![CateringOrderItemInput {
            menu_id: menu.id.clone(),
            quantity: 1,
        }];
        let detail = CateringRepo::place_order(
            store.pool(),
            &tenant.id,
            &items,
            "transfer",
            None,
            "payment-proofs/order.jpg",
        )
        .await
        .unwrap();

        let payment = CateringRepo::verify_payment(
            store.pool(),
            &detail.order.id,
            "TERVERIFIKASI",
            &owner.id,
        )
        .await
        .unwrap();
        assert_eq!(payment.status, "TERVERIFIKASI");
        assert_eq!(payment.verified_by.as_deref(), Some(owner.id.as_str()));

        let err = CateringRepo::verify_payment(store.pool(), &detail.order.id, "DITOLAK", &owner.id)
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());
    }
}
