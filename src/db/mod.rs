mod catering;
mod kost;
mod laundry;
mod master;
mod reservations;
pub(crate) mod row_helpers;
mod users;

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

use crate::models::*;

pub use catering::CateringRepo;
pub use kost::KostRepo;
pub use laundry::LaundryRepo;
pub use master::MasterRepo;
pub use reservations::ReservationRepo;
pub use users::UserRepo;

/// Typed error for "resource not found" — enables reliable downcast
/// in the API error handler instead of fragile string matching.
#[derive(Debug)]
pub struct NotFoundError {
    pub resource: String,
    pub id: String,
}

impl NotFoundError {
    pub fn new(resource: &str, id: &str) -> Self {
        Self {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }
}

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} not found: {}", self.resource, self.id)
    }
}

impl std::error::Error for NotFoundError {}

/// Typed error for capacity/uniqueness conflicts (HTTP 409)
#[derive(Debug)]
pub struct ConflictError(pub String);

impl ConflictError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl std::fmt::Display for ConflictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ConflictError {}

/// Typed error for ownership violations detected inside the db layer (403)
#[derive(Debug)]
pub struct ForbiddenError(pub String);

impl ForbiddenError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl std::fmt::Display for ForbiddenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ForbiddenError {}

/// Typed error for semantically invalid input (400)
#[derive(Debug)]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

/// Check that an order status change moves strictly forward along the
/// domain's sequence. Cancelled and unknown current states accept nothing.
pub(crate) fn advance_in_sequence(
    sequence: &[&str],
    current: &str,
    next: &str,
) -> Result<(), String> {
    let current_idx = sequence
        .iter()
        .position(|s| *s == current)
        .ok_or_else(|| "order can no longer be updated".to_string())?;
    let next_idx = sequence
        .iter()
        .position(|s| *s == next)
        .ok_or_else(|| format!("unknown status '{}'", next))?;
    if next_idx <= current_idx {
        return Err("order status can only move forward".to_string());
    }
    Ok(())
}

/// Store handles all database operations, delegating to per-entity repo
/// modules. Constructed once at process start and injected into the
/// application state; never accessed as ambient global state.
#[derive(Clone)]
pub struct Store {
    pool: Pool<Sqlite>,
}

impl Store {
    /// Create a new database store with a specific pool size
    pub async fn with_pool_size(db_path: &str, max_connections: u32) -> Result<Self> {
        let db_url = format!("sqlite:{}?mode=rwc", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&db_url)
            .await
            .context("Failed to connect to database")?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Close the pool; called on graceful shutdown
    pub async fn close(&self) {
        self.pool.close().await;
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run database migrations and idempotent seeds
    async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;

        self.seed_default_admin().await?;
        self.seed_default_laundry_units().await?;
        self.seed_default_facilities().await?;
        self.seed_default_rules().await?;

        Ok(())
    }

    async fn seed_default_admin(&self) -> Result<()> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'ADMIN'")
            .fetch_one(&self.pool)
            .await?;

        if count == 0 {
            let password_hash = bcrypt::hash("admin", bcrypt::DEFAULT_COST)
                .map_err(|e| anyhow::anyhow!("Failed to hash default password: {}", e))?;
            let req = RegisterRequest {
                name: "Administrator".to_string(),
                email: "admin@kost.local".to_string(),
                password: String::new(),
                phone: String::new(),
                role: "ADMIN".to_string(),
            };
            UserRepo::create(&self.pool, &req, &password_hash).await?;
            tracing::info!("Created default admin user (email: admin@kost.local, password: admin)");
        }

        Ok(())
    }

    async fn seed_default_laundry_units(&self) -> Result<()> {
        for name in ["kg", "pcs"] {
            sqlx::query(
                r#"
                INSERT INTO laundry_units (id, name, created_at, updated_at)
                SELECT ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP
                WHERE NOT EXISTS (SELECT 1 FROM laundry_units WHERE name = ?)
                "#,
            )
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(name)
            .bind(name)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn seed_default_facilities(&self) -> Result<()> {
        let defaults = [
            ("WiFi", "wifi"),
            ("AC", "ac"),
            ("Kamar Mandi Dalam", "bathroom"),
            ("Parkir Motor", "parking"),
            ("Dapur Bersama", "kitchen"),
        ];
        for (name, icon) in defaults {
            sqlx::query(
                r#"
                INSERT INTO facilities (id, name, icon, created_at, updated_at)
                SELECT ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP
                WHERE NOT EXISTS (SELECT 1 FROM facilities WHERE name = ?)
                "#,
            )
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(name)
            .bind(icon)
            .bind(name)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn seed_default_rules(&self) -> Result<()> {
        let defaults = [
            "Dilarang merokok di dalam kamar",
            "Tamu wajib lapor ke pengelola",
            "Jam malam 22.00",
        ];
        for name in defaults {
            sqlx::query(
                r#"
                INSERT INTO rules (id, name, created_at, updated_at)
                SELECT ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP
                WHERE NOT EXISTS (SELECT 1 FROM rules WHERE name = ?)
                "#,
            )
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(name)
            .bind(name)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    // ========== User Operations ==========

    pub async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        UserRepo::list(&self.pool, limit, offset).await
    }

    pub async fn count_users(&self) -> Result<i64> {
        UserRepo::count(&self.pool).await
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<User>> {
        UserRepo::get(&self.pool, id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        UserRepo::get_by_email(&self.pool, email).await
    }

    pub async fn create_user(&self, req: &RegisterRequest, password_hash: &str) -> Result<User> {
        UserRepo::create(&self.pool, req, password_hash).await
    }

    pub async fn update_user(&self, id: &str, req: &UpdateUserRequest) -> Result<User> {
        UserRepo::update(&self.pool, id, req).await
    }

    pub async fn set_user_avatar(&self, id: &str, path: &str) -> Result<()> {
        UserRepo::set_avatar(&self.pool, id, path).await
    }

    pub async fn delete_user(&self, id: &str) -> Result<()> {
        UserRepo::delete(&self.pool, id).await
    }

    // ========== Kost Operations ==========

    pub async fn list_kosts(
        &self,
        query: &KostListQuery,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Kost>> {
        KostRepo::list(&self.pool, query, limit, offset).await
    }

    pub async fn count_kosts(&self, query: &KostListQuery) -> Result<i64> {
        KostRepo::count(&self.pool, query).await
    }

    pub async fn list_kosts_by_owner(&self, owner_id: &str) -> Result<Vec<Kost>> {
        KostRepo::list_by_owner(&self.pool, owner_id).await
    }

    pub async fn get_kost(&self, id: &str) -> Result<Option<Kost>> {
        KostRepo::get(&self.pool, id).await
    }

    pub async fn create_kost(&self, owner_id: &str, req: &CreateKostRequest) -> Result<Kost> {
        KostRepo::create(&self.pool, owner_id, req).await
    }

    pub async fn update_kost(&self, id: &str, req: &CreateKostRequest) -> Result<Kost> {
        KostRepo::update(&self.pool, id, req).await
    }

    pub async fn set_kost_approved(&self, id: &str, approved: bool) -> Result<Kost> {
        KostRepo::set_approved(&self.pool, id, approved).await
    }

    pub async fn set_kost_qris(&self, id: &str, path: &str) -> Result<()> {
        KostRepo::set_qris(&self.pool, id, path).await
    }

    pub async fn delete_kost(&self, id: &str) -> Result<()> {
        KostRepo::delete(&self.pool, id).await
    }

    /// Occupied rooms right now, with the occupancy sweep applied first
    pub async fn occupied_room_count(&self, kost_id: &str) -> Result<i64> {
        let today = Utc::now().date_naive();
        ReservationRepo::sync_occupancy(&self.pool, today).await?;
        KostRepo::occupied_room_count(&self.pool, kost_id, today).await
    }

    // ========== Master Data Operations ==========

    pub async fn list_facilities(&self) -> Result<Vec<Facility>> {
        MasterRepo::list_facilities(&self.pool).await
    }

    pub async fn facilities_by_ids(&self, ids: &[String]) -> Result<Vec<Facility>> {
        MasterRepo::facilities_by_ids(&self.pool, ids).await
    }

    pub async fn create_facility(&self, req: &CreateFacilityRequest) -> Result<Facility> {
        MasterRepo::create_facility(&self.pool, req).await
    }

    pub async fn update_facility(&self, id: &str, req: &CreateFacilityRequest) -> Result<Facility> {
        MasterRepo::update_facility(&self.pool, id, req).await
    }

    pub async fn delete_facility(&self, id: &str) -> Result<()> {
        MasterRepo::delete_facility(&self.pool, id).await
    }

    pub async fn list_rules(&self) -> Result<Vec<Rule>> {
        MasterRepo::list_rules(&self.pool).await
    }

    pub async fn rules_by_ids(&self, ids: &[String]) -> Result<Vec<Rule>> {
        MasterRepo::rules_by_ids(&self.pool, ids).await
    }

    pub async fn create_rule(&self, req: &CreateRuleRequest) -> Result<Rule> {
        MasterRepo::create_rule(&self.pool, req).await
    }

    pub async fn update_rule(&self, id: &str, req: &CreateRuleRequest) -> Result<Rule> {
        MasterRepo::update_rule(&self.pool, id, req).await
    }

    pub async fn delete_rule(&self, id: &str) -> Result<()> {
        MasterRepo::delete_rule(&self.pool, id).await
    }

    pub async fn list_laundry_units(&self) -> Result<Vec<LaundryUnit>> {
        MasterRepo::list_laundry_units(&self.pool).await
    }

    pub async fn create_laundry_unit(&self, req: &CreateLaundryUnitRequest) -> Result<LaundryUnit> {
        MasterRepo::create_laundry_unit(&self.pool, req).await
    }

    pub async fn update_laundry_unit(
        &self,
        id: &str,
        req: &CreateLaundryUnitRequest,
    ) -> Result<LaundryUnit> {
        MasterRepo::update_laundry_unit(&self.pool, id, req).await
    }

    pub async fn delete_laundry_unit(&self, id: &str) -> Result<()> {
        MasterRepo::delete_laundry_unit(&self.pool, id).await
    }

    // ========== Reservation Operations ==========

    pub async fn create_reservation(&self, req: &NewReservation) -> Result<Reservation> {
        ReservationRepo::create(&self.pool, req).await
    }

    pub async fn get_reservation(&self, id: &str) -> Result<Option<Reservation>> {
        ReservationRepo::get(&self.pool, id).await
    }

    pub async fn update_reservation_status(
        &self,
        id: &str,
        new_status: &str,
        acting_user_id: &str,
        rejection_reason: Option<String>,
    ) -> Result<Reservation> {
        ReservationRepo::update_status(&self.pool, id, new_status, acting_user_id, rejection_reason)
            .await
    }

    pub async fn extend_reservation(&self, id: &str, ext: &NewExtension) -> Result<Reservation> {
        ReservationRepo::extend(&self.pool, id, ext, Utc::now().date_naive()).await
    }

    /// Reservation views run the occupancy sweep first, so occupancy state
    /// is always date-correct on read.
    pub async fn reservation_dashboard(&self, user_id: &str) -> Result<ReservationDashboard> {
        let today = Utc::now().date_naive();
        ReservationRepo::sync_occupancy(&self.pool, today).await?;
        ReservationRepo::dashboard(&self.pool, user_id, today).await
    }

    pub async fn reservations_by_user(&self, user_id: &str) -> Result<Vec<ReservationSummary>> {
        ReservationRepo::sync_occupancy(&self.pool, Utc::now().date_naive()).await?;
        ReservationRepo::list_by_user(&self.pool, user_id).await
    }

    pub async fn reservations_by_kost(
        &self,
        kost_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReservationSummary>> {
        ReservationRepo::sync_occupancy(&self.pool, Utc::now().date_naive()).await?;
        ReservationRepo::list_by_kost(&self.pool, kost_id, limit, offset).await
    }

    pub async fn count_reservations_by_kost(&self, kost_id: &str) -> Result<i64> {
        ReservationRepo::count_by_kost(&self.pool, kost_id).await
    }

    // ========== Catering Operations ==========

    pub async fn catering_providers_by_kost(&self, kost_id: &str) -> Result<Vec<CateringProvider>> {
        CateringRepo::list_providers_by_kost(&self.pool, kost_id).await
    }

    pub async fn get_catering_provider(&self, id: &str) -> Result<Option<CateringProvider>> {
        CateringRepo::get_provider(&self.pool, id).await
    }

    pub async fn catering_provider_owner(
        &self,
        id: &str,
    ) -> Result<Option<(CateringProvider, String)>> {
        CateringRepo::provider_owner(&self.pool, id).await
    }

    pub async fn create_catering_provider(
        &self,
        kost_id: &str,
        name: &str,
        rekening_info: &RekeningInfo,
        qris_image: Option<&str>,
    ) -> Result<CateringProvider> {
        CateringRepo::create_provider(&self.pool, kost_id, name, rekening_info, qris_image).await
    }

    pub async fn update_catering_provider(
        &self,
        id: &str,
        req: &UpdateProviderRequest,
    ) -> Result<CateringProvider> {
        CateringRepo::update_provider(&self.pool, id, req).await
    }

    pub async fn set_catering_provider_qris(&self, id: &str, path: &str) -> Result<()> {
        CateringRepo::set_provider_qris(&self.pool, id, path).await
    }

    pub async fn catering_menus_by_provider(&self, provider_id: &str) -> Result<Vec<CateringMenu>> {
        CateringRepo::list_menus_by_provider(&self.pool, provider_id).await
    }

    pub async fn get_catering_menu(&self, id: &str) -> Result<Option<CateringMenu>> {
        CateringRepo::get_menu(&self.pool, id).await
    }

    pub async fn create_catering_menu(
        &self,
        provider_id: &str,
        name: &str,
        price: i64,
        photo: Option<&str>,
    ) -> Result<CateringMenu> {
        CateringRepo::create_menu(&self.pool, provider_id, name, price, photo).await
    }

    pub async fn update_catering_menu(
        &self,
        id: &str,
        req: &UpdateCateringMenuRequest,
    ) -> Result<CateringMenu> {
        CateringRepo::update_menu(&self.pool, id, req).await
    }

    pub async fn set_catering_menu_photo(&self, id: &str, path: &str) -> Result<()> {
        CateringRepo::set_menu_photo(&self.pool, id, path).await
    }

    pub async fn delete_catering_menu(&self, id: &str) -> Result<()> {
        CateringRepo::delete_menu(&self.pool, id).await
    }

    pub async fn place_catering_order(
        &self,
        user_id: &str,
        items: &[CateringOrderItemInput],
        payment_method: &str,
        note: Option<&str>,
        proof_path: &str,
    ) -> Result<CateringOrderDetail> {
        CateringRepo::place_order(&self.pool, user_id, items, payment_method, note, proof_path)
            .await
    }

    pub async fn get_catering_order(&self, id: &str) -> Result<Option<CateringOrder>> {
        CateringRepo::get_order(&self.pool, id).await
    }

    pub async fn catering_order_detail(&self, id: &str) -> Result<CateringOrderDetail> {
        CateringRepo::order_detail(&self.pool, id).await
    }

    pub async fn catering_orders_by_user(&self, user_id: &str) -> Result<Vec<CateringOrder>> {
        CateringRepo::list_orders_by_user(&self.pool, user_id).await
    }

    pub async fn catering_orders_by_provider(
        &self,
        provider_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CateringOrder>> {
        CateringRepo::list_orders_by_provider(&self.pool, provider_id, limit, offset).await
    }

    pub async fn count_catering_orders_by_provider(&self, provider_id: &str) -> Result<i64> {
        CateringRepo::count_orders_by_provider(&self.pool, provider_id).await
    }

    pub async fn update_catering_order_status(
        &self,
        id: &str,
        new_status: &str,
    ) -> Result<CateringOrder> {
        CateringRepo::update_order_status(&self.pool, id, new_status).await
    }

    pub async fn cancel_catering_order(&self, id: &str) -> Result<CateringOrder> {
        CateringRepo::cancel_order(&self.pool, id).await
    }

    pub async fn verify_catering_payment(
        &self,
        order_id: &str,
        new_status: &str,
        acting_user_id: &str,
    ) -> Result<CateringPayment> {
        CateringRepo::verify_payment(&self.pool, order_id, new_status, acting_user_id).await
    }

    // ========== Laundry Operations ==========

    pub async fn laundry_providers_by_kost(&self, kost_id: &str) -> Result<Vec<LaundryProvider>> {
        LaundryRepo::list_providers_by_kost(&self.pool, kost_id).await
    }

    pub async fn get_laundry_provider(&self, id: &str) -> Result<Option<LaundryProvider>> {
        LaundryRepo::get_provider(&self.pool, id).await
    }

    pub async fn laundry_provider_owner(
        &self,
        id: &str,
    ) -> Result<Option<(LaundryProvider, String)>> {
        LaundryRepo::provider_owner(&self.pool, id).await
    }

    pub async fn create_laundry_provider(
        &self,
        kost_id: &str,
        name: &str,
        rekening_info: &RekeningInfo,
        qris_image: Option<&str>,
    ) -> Result<LaundryProvider> {
        LaundryRepo::create_provider(&self.pool, kost_id, name, rekening_info, qris_image).await
    }

    pub async fn update_laundry_provider(
        &self,
        id: &str,
        req: &UpdateProviderRequest,
    ) -> Result<LaundryProvider> {
        LaundryRepo::update_provider(&self.pool, id, req).await
    }

    pub async fn set_laundry_provider_qris(&self, id: &str, path: &str) -> Result<()> {
        LaundryRepo::set_provider_qris(&self.pool, id, path).await
    }

    pub async fn laundry_services_by_provider(
        &self,
        provider_id: &str,
    ) -> Result<Vec<LaundryService>> {
        LaundryRepo::list_services_by_provider(&self.pool, provider_id).await
    }

    pub async fn get_laundry_service(&self, id: &str) -> Result<Option<LaundryService>> {
        LaundryRepo::get_service(&self.pool, id).await
    }

    pub async fn create_laundry_service(
        &self,
        provider_id: &str,
        req: &CreateLaundryServiceRequest,
    ) -> Result<LaundryService> {
        LaundryRepo::create_service(&self.pool, provider_id, req).await
    }

    pub async fn update_laundry_service(
        &self,
        id: &str,
        req: &CreateLaundryServiceRequest,
    ) -> Result<LaundryService> {
        LaundryRepo::update_service(&self.pool, id, req).await
    }

    pub async fn delete_laundry_service(&self, id: &str) -> Result<()> {
        LaundryRepo::delete_service(&self.pool, id).await
    }

    pub async fn place_laundry_order(
        &self,
        user_id: &str,
        items: &[LaundryOrderItemInput],
        payment_method: &str,
        note: Option<&str>,
        proof_path: &str,
    ) -> Result<LaundryOrderDetail> {
        LaundryRepo::place_order(&self.pool, user_id, items, payment_method, note, proof_path).await
    }

    pub async fn get_laundry_order(&self, id: &str) -> Result<Option<LaundryOrder>> {
        LaundryRepo::get_order(&self.pool, id).await
    }

    pub async fn laundry_order_detail(&self, id: &str) -> Result<LaundryOrderDetail> {
        LaundryRepo::order_detail(&self.pool, id).await
    }

    pub async fn laundry_orders_by_user(&self, user_id: &str) -> Result<Vec<LaundryOrder>> {
        LaundryRepo::list_orders_by_user(&self.pool, user_id).await
    }

    pub async fn laundry_orders_by_provider(
        &self,
        provider_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LaundryOrder>> {
        LaundryRepo::list_orders_by_provider(&self.pool, provider_id, limit, offset).await
    }

    pub async fn count_laundry_orders_by_provider(&self, provider_id: &str) -> Result<i64> {
        LaundryRepo::count_orders_by_provider(&self.pool, provider_id).await
    }

    pub async fn update_laundry_order_status(
        &self,
        id: &str,
        new_status: &str,
    ) -> Result<LaundryOrder> {
        LaundryRepo::update_order_status(&self.pool, id, new_status).await
    }

    pub async fn cancel_laundry_order(&self, id: &str) -> Result<LaundryOrder> {
        LaundryRepo::cancel_order(&self.pool, id).await
    }

    pub async fn verify_laundry_payment(
        &self,
        order_id: &str,
        new_status: &str,
        acting_user_id: &str,
    ) -> Result<LaundryPayment> {
        LaundryRepo::verify_payment(&self.pool, order_id, new_status, acting_user_id).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    pub async fn memory_store() -> Store {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        let store = Store { pool };
        store.migrate().await.expect("migrations");
        store
    }

    pub async fn seed_user(store: &Store, role: &str) -> User {
        let req = RegisterRequest {
            name: "Test User".to_string(),
            email: format!("{}@test.local", Uuid::new_v4()),
            password: String::new(),
            phone: "0812000000".to_string(),
            role: role.to_string(),
        };
        UserRepo::create(store.pool(), &req, "not-a-real-hash")
            .await
            .expect("seed user")
    }

    pub async fn seed_kost(store: &Store, owner_id: &str, rooms: i64, price: i64) -> Kost {
        let kost = seed_unapproved_kost(store, owner_id, rooms, price).await;
        KostRepo::set_approved(store.pool(), &kost.id, true)
            .await
            .expect("approve kost")
    }

    pub async fn seed_unapproved_kost(
        store: &Store,
        owner_id: &str,
        rooms: i64,
        price: i64,
    ) -> Kost {
        let req = CreateKostRequest {
            name: "Kost Test".to_string(),
            description: String::new(),
            address: "Jl. Test 1".to_string(),
            city: "Bandung".to_string(),
            total_rooms: rooms,
            monthly_price: price,
            discount: 0,
            deposit: 100_000,
            facility_ids: Vec::new(),
            rule_ids: Vec::new(),
        };
        KostRepo::create(store.pool(), owner_id, &req)
            .await
            .expect("seed kost")
    }

    /// Create + approve + activate a reservation so the tenant currently
    /// lives at the kost.
    pub async fn seed_active_tenancy(
        store: &Store,
        tenant_id: &str,
        kost_id: &str,
        owner_id: &str,
    ) -> Reservation {
        let today = Utc::now().date_naive();
        let req = NewReservation {
            user_id: tenant_id.to_string(),
            kost_id: kost_id.to_string(),
            check_in_date: today,
            duration_months: 1,
            payment_method: "transfer".to_string(),
            payment_proof: "payment-proofs/seed.jpg".to_string(),
            note: None,
        };
        let r = ReservationRepo::create(store.pool(), &req)
            .await
            .expect("seed reservation");
        ReservationRepo::update_status(store.pool(), &r.id, "APPROVED", owner_id, None)
            .await
            .expect("approve reservation");
        ReservationRepo::sync_occupancy(store.pool(), today)
            .await
            .expect("sweep");
        ReservationRepo::get(store.pool(), &r.id)
            .await
            .expect("reload")
            .expect("reservation exists")
    }

    pub async fn seed_catering_provider(store: &Store, kost_id: &str) -> CateringProvider {
        CateringRepo::create_provider(
            store.pool(),
            kost_id,
            "Catering Bu Sri",
            &RekeningInfo {
                bank: "BCA".to_string(),
                account_number: "1234567890".to_string(),
                account_holder: "Sri".to_string(),
            },
            None,
        )
        .await
        .expect("seed catering provider")
    }

    pub async fn seed_catering_menu(
        store: &Store,
        provider_id: &str,
        name: &str,
        price: i64,
    ) -> CateringMenu {
        CateringRepo::create_menu(store.pool(), provider_id, name, price, None)
            .await
            .expect("seed menu")
    }

    pub async fn seed_laundry_provider(store: &Store, kost_id: &str) -> LaundryProvider {
        LaundryRepo::create_provider(
            store.pool(),
            kost_id,
            "Laundry Kilat",
            &RekeningInfo {
                bank: "BRI".to_string(),
                account_number: "0987654321".to_string(),
                account_holder: "Ujang".to_string(),
            },
            None,
        )
        .await
        .expect("seed laundry provider")
    }

    pub async fn seed_laundry_service(
        store: &Store,
        provider_id: &str,
        name: &str,
        price: i64,
    ) -> LaundryService {
        let units = MasterRepo::list_laundry_units(store.pool())
            .await
            .expect("units");
        let unit = units.first().expect("seeded laundry unit");
        LaundryRepo::create_service(
            store.pool(),
            provider_id,
            &CreateLaundryServiceRequest {
                name: name.to_string(),
                unit_id: unit.id.clone(),
                price,
                is_available: true,
            },
        )
        .await
        .expect("seed service")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_in_sequence() {
        let seq = &["PENDING", "DITERIMA", "DIPROSES", "SELESAI"];
        assert!(advance_in_sequence(seq, "PENDING", "DITERIMA").is_ok());
        // Forward skips are allowed, backwards moves are not
        assert!(advance_in_sequence(seq, "PENDING", "SELESAI").is_ok());
        assert!(advance_in_sequence(seq, "DIPROSES", "DITERIMA").is_err());
        assert!(advance_in_sequence(seq, "SELESAI", "SELESAI").is_err());
        // Cancelled or unknown current state accepts nothing
        assert!(advance_in_sequence(seq, "DIBATALKAN", "DITERIMA").is_err());
        assert!(advance_in_sequence(seq, "PENDING", "NOPE").is_err());
    }
}
