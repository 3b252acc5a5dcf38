use anyhow::{Context, Result};
use chrono::{Months, NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Pool, Row, Sqlite};
use uuid::Uuid;

use super::{ConflictError, NotFoundError, ValidationError};
use crate::models::reservation_status as rstatus;
use crate::models::*;

fn map_reservation_row(row: &SqliteRow) -> Reservation {
    Reservation {
        id: row.get("id"),
        user_id: row.get("user_id"),
        kost_id: row.get("kost_id"),
        check_in_date: row.get("check_in_date"),
        duration_months: row.get("duration_months"),
        check_out_date: row.get("check_out_date"),
        total_price: row.get("total_price"),
        deposit: row.get("deposit"),
        payment_method: row.get("payment_method"),
        payment_proof: row.get("payment_proof"),
        proof_url: None,
        note: row.get("note"),
        status: row.get("status"),
        rejection_reason: row.get("rejection_reason"),
        occupancy_status: row.get("occupancy_status"),
        validated_by: row.get("validated_by"),
        validated_at: row.get("validated_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn map_summary_row(row: &SqliteRow) -> ReservationSummary {
    ReservationSummary {
        reservation: map_reservation_row(row),
        kost_name: row.get("kost_name"),
        kost_city: row.get("kost_city"),
    }
}

/// Rooms consumed for the capacity check at creation time: pending requests
/// and approved reservations that have not departed. An approved reservation
/// with NULL occupancy (not yet activated) still consumes a slot.
const CAPACITY_CONDITION: &str = "(status = 'PENDING' \
     OR (status = 'APPROVED' AND (occupancy_status IS NULL OR occupancy_status = 'AKTIF')))";

pub struct ReservationRepo;

impl ReservationRepo {
    pub async fn get(pool: &Pool<Sqlite>, id: &str) -> Result<Option<Reservation>> {
        let row = sqlx::query("SELECT * FROM reservations WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.as_ref().map(map_reservation_row))
    }

    /// Create a PENDING reservation. The room-capacity limit and the
    /// one-active-reservation-per-tenant rule are re-checked by the
    /// conditional insert itself, inside the same transaction that writes
    /// the row, so a concurrent conflicting commit cannot double-book.
    pub async fn create(pool: &Pool<Sqlite>, req: &NewReservation) -> Result<Reservation> {
        if req.duration_months < 1 {
            return Err(ValidationError::new("duration must be at least one month").into());
        }

        let kost = super::kost::KostRepo::get(pool, &req.kost_id)
            .await?
            .ok_or_else(|| NotFoundError::new("Kost", &req.kost_id))?;
        if !kost.is_approved {
            return Err(ValidationError::new("kost is not accepting reservations").into());
        }

        let check_out = req
            .check_in_date
            .checked_add_months(Months::new(req.duration_months as u32))
            .ok_or_else(|| ValidationError::new("check-in date out of range"))?;
        let total_price = kost.final_monthly_price() * req.duration_months;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let mut tx = pool.begin().await?;

        let insert_sql = format!(
            r#"
            INSERT INTO reservations
                (id, user_id, kost_id, check_in_date, duration_months,
                 check_out_date, total_price, deposit, payment_method,
                 payment_proof, note, status, created_at, updated_at)
            SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'PENDING', ?, ?
            WHERE (SELECT COUNT(*) FROM reservations
                   WHERE kost_id = ? AND {cond}) < ?
              AND NOT EXISTS
                  (SELECT 1 FROM reservations
                   WHERE kost_id = ? AND user_id = ?
                     AND status = 'APPROVED' AND occupancy_status = 'AKTIF')
            "#,
            cond = CAPACITY_CONDITION
        );

        let result = sqlx::query(&insert_sql)
            .bind(&id)
            .bind(&req.user_id)
            .bind(&req.kost_id)
            .bind(req.check_in_date)
            .bind(req.duration_months)
            .bind(check_out)
            .bind(total_price)
            .bind(kost.deposit)
            .bind(&req.payment_method)
            .bind(&req.payment_proof)
            .bind(&req.note)
            .bind(now)
            .bind(now)
            .bind(&req.kost_id)
            .bind(kost.total_rooms)
            .bind(&req.kost_id)
            .bind(&req.user_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // Classify the 409 within the same transaction
            let occupied_sql = format!(
                "SELECT COUNT(*) FROM reservations WHERE kost_id = ? AND {}",
                CAPACITY_CONDITION
            );
            let occupied: i64 = sqlx::query(&occupied_sql)
                .bind(&req.kost_id)
                .fetch_one(&mut *tx)
                .await?
                .get(0);
            if occupied >= kost.total_rooms {
                return Err(ConflictError::new("no rooms available at this kost").into());
            }
            return Err(ConflictError::new(
                "tenant already has an active reservation at this kost",
            )
            .into());
        }

        tx.commit().await?;

        Self::get(pool, &id)
            .await?
            .context("Reservation not found after creation")
    }

    /// Approve or reject a PENDING reservation. The decision is terminal:
    /// a second attempt is an error, not a no-op.
    pub async fn update_status(
        pool: &Pool<Sqlite>,
        id: &str,
        new_status: &str,
        acting_user_id: &str,
        rejection_reason: Option<String>,
    ) -> Result<Reservation> {
        if new_status != rstatus::APPROVED && new_status != rstatus::REJECTED {
            return Err(ValidationError::new(format!(
                "status must be {} or {}",
                rstatus::APPROVED,
                rstatus::REJECTED
            ))
            .into());
        }

        let current = Self::get(pool, id)
            .await?
            .ok_or_else(|| NotFoundError::new("Reservation", id))?;
        if current.status != rstatus::PENDING {
            return Err(ValidationError::new("reservation has already been decided").into());
        }

        let reason: Option<String> = if new_status == rstatus::REJECTED {
            Some(
                rejection_reason
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| "Tanpa keterangan".to_string()),
            )
        } else {
            None
        };

        let now = Utc::now();
        // On rejection occupancy is forced back to NULL; on approval it is
        // left NULL for the date sweep to populate.
        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET status = ?, rejection_reason = ?, occupancy_status = NULL,
                validated_by = ?, validated_at = ?, updated_at = ?
            WHERE id = ? AND status = 'PENDING'
            "#,
        )
        .bind(new_status)
        .bind(&reason)
        .bind(acting_user_id)
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ValidationError::new("reservation has already been decided").into());
        }

        Self::get(pool, id)
            .await?
            .context("Reservation not found after update")
    }

    /// Extend an approved, still-running reservation. The extension is
    /// additive: months are added to the existing checkout and the cost of
    /// the added months (at the kost's current price) is added to the
    /// existing total, preserving the historical price of months already
    /// paid for.
    pub async fn extend(
        pool: &Pool<Sqlite>,
        id: &str,
        ext: &NewExtension,
        today: NaiveDate,
    ) -> Result<Reservation> {
        if ext.additional_months < 1 {
            return Err(ValidationError::new("extension must be at least one month").into());
        }

        let reservation = Self::get(pool, id)
            .await?
            .ok_or_else(|| NotFoundError::new("Reservation", id))?;
        if reservation.status != rstatus::APPROVED {
            return Err(ValidationError::new("only an approved reservation can be extended").into());
        }

        let base = reservation
            .check_out_date
            .unwrap_or(reservation.check_in_date);
        if base <= today {
            return Err(ValidationError::new("reservation has already ended").into());
        }

        let kost = super::kost::KostRepo::get(pool, &reservation.kost_id)
            .await?
            .ok_or_else(|| NotFoundError::new("Kost", &reservation.kost_id))?;

        let new_check_out = base
            .checked_add_months(Months::new(ext.additional_months as u32))
            .ok_or_else(|| ValidationError::new("extension out of range"))?;
        let additional_cost = kost.final_monthly_price() * ext.additional_months;

        sqlx::query(
            r#"
            UPDATE reservations
            SET duration_months = duration_months + ?, check_out_date = ?,
                total_price = total_price + ?, payment_method = ?,
                payment_proof = ?, note = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(ext.additional_months)
        .bind(new_check_out)
        .bind(additional_cost)
        .bind(&ext.payment_method)
        .bind(&ext.payment_proof)
        .bind(&ext.note)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

        Self::get(pool, id)
            .await?
            .context("Reservation not found after extension")
    }

    /// Date-driven occupancy sweep, run opportunistically on reads of
    /// reservation views. Both statements are bulk conditional updates, so
    /// the sweep is idempotent and safe under concurrent invocation.
    /// Returns (activated, departed) row counts.
    pub async fn sync_occupancy(pool: &Pool<Sqlite>, today: NaiveDate) -> Result<(u64, u64)> {
        let now = Utc::now();

        let activated = sqlx::query(
            r#"
            UPDATE reservations
            SET occupancy_status = 'AKTIF', updated_at = ?
            WHERE status = 'APPROVED'
              AND (occupancy_status IS NULL OR occupancy_status != 'AKTIF')
              AND check_in_date <= ?
              AND (check_out_date IS NULL OR check_out_date > ?)
            "#,
        )
        .bind(now)
        .bind(today)
        .bind(today)
        .execute(pool)
        .await?
        .rows_affected();

        let departed = sqlx::query(
            r#"
            UPDATE reservations
            SET occupancy_status = 'KELUAR', updated_at = ?
            WHERE status = 'APPROVED'
              AND occupancy_status = 'AKTIF'
              AND check_out_date IS NOT NULL
              AND check_out_date <= ?
            "#,
        )
        .bind(now)
        .bind(today)
        .execute(pool)
        .await?
        .rows_affected();

        Ok((activated, departed))
    }

    pub async fn list_by_user(pool: &Pool<Sqlite>, user_id: &str) -> Result<Vec<ReservationSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT r.*, k.name AS kost_name, k.city AS kost_city
            FROM reservations r
            JOIN kosts k ON k.id = r.kost_id
            WHERE r.user_id = ?
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.iter().map(map_summary_row).collect())
    }

    /// Partition a tenant's reservations into pending-or-upcoming, active
    /// and history buckets for the dashboard view.
    pub async fn dashboard(
        pool: &Pool<Sqlite>,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<ReservationDashboard> {
        let all = Self::list_by_user(pool, user_id).await?;

        let mut dashboard = ReservationDashboard {
            pending: Vec::new(),
            active: Vec::new(),
            history: Vec::new(),
        };
        for summary in all {
            let r = &summary.reservation;
            if r.status == rstatus::PENDING
                || (r.status == rstatus::APPROVED && r.check_in_date > today)
            {
                dashboard.pending.push(summary);
            } else if r.status == rstatus::APPROVED
                && r.occupancy_status.as_deref() == Some(occupancy_status::AKTIF)
            {
                dashboard.active.push(summary);
            } else {
                dashboard.history.push(summary);
            }
        }
        Ok(dashboard)
    }

    pub async fn list_by_kost(
        pool: &Pool<Sqlite>,
        kost_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReservationSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT r.*, k.name AS kost_name, k.city AS kost_city
            FROM reservations r
            JOIN kosts k ON k.id = r.kost_id
            WHERE r.kost_id = ?
            ORDER BY r.created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(kost_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
        Ok(rows.iter().map(map_summary_row).collect())
    }

    pub async fn count_by_kost(pool: &Pool<Sqlite>, kost_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE kost_id = ?")
            .bind(kost_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::*;

    fn new_reservation(
        user_id: &str,
        kost_id: &str,
        check_in: NaiveDate,
        months: i64,
    ) -> NewReservation {
        NewReservation {
            user_id: user_id.to_string(),
            kost_id: kost_id.to_string(),
            check_in_date: check_in,
            duration_months: months,
            payment_method: "transfer".to_string(),
            payment_proof: "payment-proofs/test.jpg".to_string(),
            note: None,
        }
    }

    #[tokio::test]
    async fn test_checkout_uses_calendar_months() {
        let store = memory_store().await;
        let owner = seed_user(&store, "PENGELOLA").await;
        let tenant = seed_user(&store, "PENGHUNI").await;
        let kost = seed_kost(&store, &owner.id, 3, 1_500_000).await;

        let check_in = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let r = ReservationRepo::create(
            store.pool(),
            &new_reservation(&tenant.id, &kost.id, check_in, 1),
        )
        .await
        .unwrap();

        // Calendar-month arithmetic, not 30-day arithmetic
        assert_eq!(r.check_out_date, NaiveDate::from_ymd_opt(2025, 2, 28));
        assert_eq!(r.total_price, 1_500_000);
        assert_eq!(r.status, "PENDING");
        assert!(r.occupancy_status.is_none());
    }

    #[tokio::test]
    async fn test_capacity_conflict_leaves_no_row() {
        // One room, already held by an APPROVED + AKTIF reservation;
        // a second attempt must fail with a conflict and insert nothing.
        let store = memory_store().await;
        let owner = seed_user(&store, "PENGELOLA").await;
        let tenant_a = seed_user(&store, "PENGHUNI").await;
        let tenant_b = seed_user(&store, "PENGHUNI").await;
        let kost = seed_kost(&store, &owner.id, 1, 1_000_000).await;

        let today = Utc::now().date_naive();
        let r = ReservationRepo::create(
            store.pool(),
            &new_reservation(&tenant_a.id, &kost.id, today, 2),
        )
        .await
        .unwrap();
        ReservationRepo::update_status(store.pool(), &r.id, "APPROVED", &owner.id, None)
            .await
            .unwrap();
        ReservationRepo::sync_occupancy(store.pool(), today).await.unwrap();

        let err = ReservationRepo::create(
            store.pool(),
            &new_reservation(&tenant_b.id, &kost.id, today, 1),
        )
        .await
        .unwrap_err();
        assert!(err.downcast_ref::<ConflictError>().is_some());

        let count = ReservationRepo::count_by_kost(store.pool(), &kost.id)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_duplicate_active_reservation_conflict() {
        let store = memory_store().await;
        let owner = seed_user(&store, "PENGELOLA").await;
        let tenant = seed_user(&store, "PENGHUNI").await;
        let kost = seed_kost(&store, &owner.id, 5, 1_000_000).await;

        let today = Utc::now().date_naive();
        let r = ReservationRepo::create(
            store.pool(),
            &new_reservation(&tenant.id, &kost.id, today, 1),
        )
        .await
        .unwrap();
        ReservationRepo::update_status(store.pool(), &r.id, "APPROVED", &owner.id, None)
            .await
            .unwrap();
        ReservationRepo::sync_occupancy(store.pool(), today).await.unwrap();

        let err = ReservationRepo::create(
            store.pool(),
            &new_reservation(&tenant.id, &kost.id, today, 1),
        )
        .await
        .unwrap_err();
        let conflict = err.downcast_ref::<ConflictError>().unwrap();
        assert!(conflict.to_string().contains("active reservation"));
    }

    #[tokio::test]
    async fn test_decision_is_terminal() {
        let store = memory_store().await;
        let owner = seed_user(&store, "PENGELOLA").await;
        let tenant = seed_user(&store, "PENGHUNI").await;
        let kost = seed_kost(&store, &owner.id, 2, 800_000).await;

        let today = Utc::now().date_naive();
        let r = ReservationRepo::create(
            store.pool(),
            &new_reservation(&tenant.id, &kost.id, today, 1),
        )
        .await
        .unwrap();

        let rejected =
            ReservationRepo::update_status(store.pool(), &r.id, "REJECTED", &owner.id, None)
                .await
                .unwrap();
        assert_eq!(rejected.status, "REJECTED");
        assert_eq!(rejected.rejection_reason.as_deref(), Some("Tanpa keterangan"));
        assert!(rejected.occupancy_status.is_none());
        assert_eq!(rejected.validated_by.as_deref(), Some(owner.id.as_str()));

        // A second decision is an error, not a no-op
        let err =
            ReservationRepo::update_status(store.pool(), &r.id, "APPROVED", &owner.id, None)
                .await
                .unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());
    }

    #[tokio::test]
    async fn test_sweep_activates_then_departs_and_is_idempotent() {
        // Approved reservation, check-in today, checkout in one month.
        let store = memory_store().await;
        let owner = seed_user(&store, "PENGELOLA").await;
        let tenant = seed_user(&store, "PENGHUNI").await;
        let kost = seed_kost(&store, &owner.id, 2, 900_000).await;

        let today = Utc::now().date_naive();
        let r = ReservationRepo::create(
            store.pool(),
            &new_reservation(&tenant.id, &kost.id, today, 1),
        )
        .await
        .unwrap();

        // Not approved yet: sweep must not touch it
        ReservationRepo::sync_occupancy(store.pool(), today).await.unwrap();
        let pending = ReservationRepo::get(store.pool(), &r.id).await.unwrap().unwrap();
        assert!(pending.occupancy_status.is_none());

        ReservationRepo::update_status(store.pool(), &r.id, "APPROVED", &owner.id, None)
            .await
            .unwrap();

        let (activated, _) = ReservationRepo::sync_occupancy(store.pool(), today).await.unwrap();
        assert_eq!(activated, 1);
        let active = ReservationRepo::get(store.pool(), &r.id).await.unwrap().unwrap();
        assert_eq!(active.occupancy_status.as_deref(), Some("AKTIF"));

        // Re-running the sweep is a no-op
        let (activated, departed) =
            ReservationRepo::sync_occupancy(store.pool(), today).await.unwrap();
        assert_eq!((activated, departed), (0, 0));

        // After checkout has passed the tenant departs
        let later = active.check_out_date.unwrap();
        let (_, departed) = ReservationRepo::sync_occupancy(store.pool(), later).await.unwrap();
        assert_eq!(departed, 1);
        let departed_row = ReservationRepo::get(store.pool(), &r.id).await.unwrap().unwrap();
        assert_eq!(departed_row.occupancy_status.as_deref(), Some("KELUAR"));

        // Departed reservations are not re-activated by a later sweep
        ReservationRepo::sync_occupancy(store.pool(), later).await.unwrap();
        let still_departed = ReservationRepo::get(store.pool(), &r.id).await.unwrap().unwrap();
        assert_eq!(still_departed.occupancy_status.as_deref(), Some("KELUAR"));
    }

    #[tokio::test]
    async fn test_extension_is_additive() {
        // Total 2,000,000; extending 2 months at 1,000,000/month doubles it.
        let store = memory_store().await;
        let owner = seed_user(&store, "PENGELOLA").await;
        let tenant = seed_user(&store, "PENGHUNI").await;
        let kost = seed_kost(&store, &owner.id, 2, 1_000_000).await;

        let today = Utc::now().date_naive();
        let r = ReservationRepo::create(
            store.pool(),
            &new_reservation(&tenant.id, &kost.id, today, 2),
        )
        .await
        .unwrap();
        assert_eq!(r.total_price, 2_000_000);
        ReservationRepo::update_status(store.pool(), &r.id, "APPROVED", &owner.id, None)
            .await
            .unwrap();

        let ext = NewExtension {
            additional_months: 2,
            payment_method: "transfer".to_string(),
            payment_proof: "payment-proofs/ext.jpg".to_string(),
            note: Some("perpanjang".to_string()),
        };
        let extended = ReservationRepo::extend(store.pool(), &r.id, &ext, today)
            .await
            .unwrap();

        assert_eq!(extended.total_price, 4_000_000);
        assert_eq!(extended.duration_months, 4);
        let expected = r
            .check_out_date
            .unwrap()
            .checked_add_months(Months::new(2))
            .unwrap();
        assert_eq!(extended.check_out_date, Some(expected));
    }

    #[tokio::test]
    async fn test_extension_rejected_after_checkout() {
        let store = memory_store().await;
        let owner = seed_user(&store, "PENGELOLA").await;
        let tenant = seed_user(&store, "PENGHUNI").await;
        let kost = seed_kost(&store, &owner.id, 2, 1_000_000).await;

        let today = Utc::now().date_naive();
        let r = ReservationRepo::create(
            store.pool(),
            &new_reservation(&tenant.id, &kost.id, today, 1),
        )
        .await
        .unwrap();
        ReservationRepo::update_status(store.pool(), &r.id, "APPROVED", &owner.id, None)
            .await
            .unwrap();

        let ext = NewExtension {
            additional_months: 1,
            payment_method: "transfer".to_string(),
            payment_proof: "payment-proofs/ext.jpg".to_string(),
            note: None,
        };
        // "today" at or past the checkout date: extension no longer allowed
        let past_checkout = r.check_out_date.unwrap();
        let err = ReservationRepo::extend(store.pool(), &r.id, &ext, past_checkout)
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());
    }

    #[tokio::test]
    async fn test_unapproved_kost_rejects_reservations() {
        let store = memory_store().await;
        let owner = seed_user(&store, "PENGELOLA").await;
        let tenant = seed_user(&store, "PENGHUNI").await;
        let kost = seed_unapproved_kost(&store, &owner.id, 2, 700_000).await;

        let today = Utc::now().date_naive();
        let err = ReservationRepo::create(
            store.pool(),
            &new_reservation(&tenant.id, &kost.id, today, 1),
        )
        .await
        .unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());
    }

    #[tokio::test]
    async fn test_dashboard_partition() {
        let store = memory_store().await;
        let owner = seed_user(&store, "PENGELOLA").await;
        let tenant = seed_user(&store, "PENGHUNI").await;
        let kost = seed_kost(&store, &owner.id, 5, 1_000_000).await;

        let today = Utc::now().date_naive();

        // Create all three while PENDING, then decide; once one is
        // APPROVED + AKTIF the duplicate-active rule would block further
        // creations for this tenant at this kost.
        let active = ReservationRepo::create(
            store.pool(),
            &new_reservation(&tenant.id, &kost.id, today, 1),
        )
        .await
        .unwrap();
        let rejected = ReservationRepo::create(
            store.pool(),
            &new_reservation(&tenant.id, &kost.id, today + Months::new(6), 1),
        )
        .await
        .unwrap();
        let pending = ReservationRepo::create(
            store.pool(),
            &new_reservation(&tenant.id, &kost.id, today + Months::new(2), 1),
        )
        .await
        .unwrap();

        ReservationRepo::update_status(store.pool(), &active.id, "APPROVED", &owner.id, None)
            .await
            .unwrap();
        ReservationRepo::update_status(store.pool(), &rejected.id, "REJECTED", &owner.id, None)
            .await
            .unwrap();
        ReservationRepo::sync_occupancy(store.pool(), today).await.unwrap();

        let dashboard = ReservationRepo::dashboard(store.pool(), &tenant.id, today)
            .await
            .unwrap();
        assert_eq!(dashboard.active.len(), 1);
        assert_eq!(dashboard.active[0].reservation.id, active.id);
        assert_eq!(dashboard.pending.len(), 1);
        assert_eq!(dashboard.pending[0].reservation.id, pending.id);
        assert_eq!(dashboard.history.len(), 1);
        assert_eq!(dashboard.history[0].reservation.id, rejected.id);
    }
}
