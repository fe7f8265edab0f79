//! PostgreSQL implementation of the engine's store capability.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use motorpool_engine::{
    Customer, CustomerPatch, DateInterval, RentalStore, Reservation, ReservationPatch,
    ReservationStatus, StoreError, StoreResult, Vehicle, VehiclePatch, VehicleStatus,
};
use sqlx::{PgPool, Row};

/// A [`RentalStore`] backed by PostgreSQL.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Check if a SQL error is a unique constraint violation.
fn is_unique_violation(e: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = e {
        // PostgreSQL unique violation code is "23505"
        db_err.code().map(|c| c == "23505").unwrap_or(false)
    } else {
        false
    }
}

/// Map an insert error, attributing unique violations to `key`.
fn map_insert_err(e: sqlx::Error, key: &str) -> StoreError {
    if is_unique_violation(&e) {
        StoreError::DuplicateKey(key.to_string())
    } else {
        StoreError::Unavailable(e.to_string())
    }
}

fn map_err(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

// ── Row types ──────────────────────────────────────────────

#[derive(Debug)]
struct VehicleRow {
    id: String,
    make: String,
    model: String,
    year: i32,
    daily_rate: i64,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for VehicleRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(VehicleRow {
            id: row.try_get("id")?,
            make: row.try_get("make")?,
            model: row.try_get("model")?,
            year: row.try_get("year")?,
            daily_rate: row.try_get("daily_rate")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl VehicleRow {
    fn into_vehicle(self) -> StoreResult<Vehicle> {
        let status = VehicleStatus::parse(&self.status).ok_or_else(|| {
            StoreError::Unavailable(format!(
                "corrupt vehicle row {}: unknown status '{}'",
                self.id, self.status
            ))
        })?;
        Ok(Vehicle {
            id: self.id,
            make: self.make,
            model: self.model,
            year: self.year,
            daily_rate: self.daily_rate,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug)]
struct CustomerRow {
    id: String,
    full_name: String,
    phone: String,
    email: Option<String>,
    licence_no: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for CustomerRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(CustomerRow {
            id: row.try_get("id")?,
            full_name: row.try_get("full_name")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            licence_no: row.try_get("licence_no")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            full_name: row.full_name,
            phone: row.phone,
            email: row.email,
            licence_no: row.licence_no,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug)]
struct ReservationRow {
    id: String,
    vehicle_id: String,
    customer_id: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: String,
    advance_amount: i64,
    total_amount: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ReservationRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(ReservationRow {
            id: row.try_get("id")?,
            vehicle_id: row.try_get("vehicle_id")?,
            customer_id: row.try_get("customer_id")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            status: row.try_get("status")?,
            advance_amount: row.try_get("advance_amount")?,
            total_amount: row.try_get("total_amount")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl ReservationRow {
    fn into_reservation(self) -> StoreResult<Reservation> {
        let status = ReservationStatus::parse(&self.status).ok_or_else(|| {
            StoreError::Unavailable(format!(
                "corrupt reservation row {}: unknown status '{}'",
                self.id, self.status
            ))
        })?;
        let period = DateInterval::new(self.start_date, self.end_date).map_err(|_| {
            StoreError::Unavailable(format!(
                "corrupt reservation row {}: start after end",
                self.id
            ))
        })?;
        Ok(Reservation {
            id: self.id,
            vehicle_id: self.vehicle_id,
            customer_id: self.customer_id,
            period,
            status,
            advance_amount: self.advance_amount,
            total_amount: self.total_amount,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

// ── Store implementation ───────────────────────────────────

#[async_trait]
impl RentalStore for PgStore {
    async fn insert_vehicle(&self, vehicle: Vehicle) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO vehicles (id, make, model, year, daily_rate, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&vehicle.id)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(vehicle.daily_rate)
        .bind(vehicle.status.as_str())
        .bind(vehicle.created_at)
        .bind(vehicle.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_err(e, &vehicle.id))?;
        Ok(())
    }

    async fn update_vehicle(&self, id: &str, patch: VehiclePatch) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE vehicles
            SET make       = COALESCE($2, make),
                model      = COALESCE($3, model),
                year       = COALESCE($4, year),
                daily_rate = COALESCE($5, daily_rate),
                status     = COALESCE($6, status),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.make)
        .bind(patch.model)
        .bind(patch.year)
        .bind(patch.daily_rate)
        .bind(patch.status.map(|s| s.as_str().to_string()))
        .execute(&self.pool)
        .await
        .map_err(map_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn get_vehicle(&self, id: &str) -> StoreResult<Option<Vehicle>> {
        let row = sqlx::query_as::<_, VehicleRow>(
            r#"
            SELECT id, make, model, year, daily_rate, status, created_at, updated_at
            FROM vehicles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;

        row.map(VehicleRow::into_vehicle).transpose()
    }

    async fn list_vehicles(&self) -> StoreResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, VehicleRow>(
            r#"
            SELECT id, make, model, year, daily_rate, status, created_at, updated_at
            FROM vehicles
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;

        rows.into_iter().map(VehicleRow::into_vehicle).collect()
    }

    async fn insert_customer(&self, customer: Customer) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO customers (id, full_name, phone, email, licence_no, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.full_name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.licence_no)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_err(e, &customer.id))?;
        Ok(())
    }

    async fn update_customer(&self, id: &str, patch: CustomerPatch) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET full_name  = COALESCE($2, full_name),
                phone      = COALESCE($3, phone),
                email      = COALESCE($4, email),
                licence_no = COALESCE($5, licence_no),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.full_name)
        .bind(patch.phone)
        .bind(patch.email)
        .bind(patch.licence_no)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn get_customer(&self, id: &str) -> StoreResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, full_name, phone, email, licence_no, created_at, updated_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;

        Ok(row.map(Customer::from))
    }

    async fn count_customers(&self) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM customers"#)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(count as u64)
    }

    async fn insert_reservation(&self, reservation: Reservation) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reservations (
                id, vehicle_id, customer_id, start_date, end_date,
                status, advance_amount, total_amount, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&reservation.id)
        .bind(&reservation.vehicle_id)
        .bind(&reservation.customer_id)
        .bind(reservation.period.start())
        .bind(reservation.period.end())
        .bind(reservation.status.as_str())
        .bind(reservation.advance_amount)
        .bind(reservation.total_amount)
        .bind(reservation.created_at)
        .bind(reservation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_err(e, &reservation.id))?;
        Ok(())
    }

    async fn update_reservation(&self, id: &str, patch: ReservationPatch) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET vehicle_id     = COALESCE($2, vehicle_id),
                customer_id    = COALESCE($3, customer_id),
                start_date     = COALESCE($4, start_date),
                end_date       = COALESCE($5, end_date),
                status         = COALESCE($6, status),
                advance_amount = COALESCE($7, advance_amount),
                total_amount   = COALESCE($8, total_amount),
                updated_at     = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.vehicle_id)
        .bind(patch.customer_id)
        .bind(patch.period.map(|p| p.start()))
        .bind(patch.period.map(|p| p.end()))
        .bind(patch.status.map(|s| s.as_str().to_string()))
        .bind(patch.advance_amount)
        .bind(patch.total_amount)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn get_reservation(&self, id: &str) -> StoreResult<Option<Reservation>> {
        let row = sqlx::query_as::<_, ReservationRow>(
            r#"
            SELECT id, vehicle_id, customer_id, start_date, end_date,
                   status, advance_amount, total_amount, created_at, updated_at
            FROM reservations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;

        row.map(ReservationRow::into_reservation).transpose()
    }

    async fn reservations_for_vehicle(
        &self,
        vehicle_id: &str,
        status_in: &[ReservationStatus],
    ) -> StoreResult<Vec<Reservation>> {
        let statuses: Vec<String> = status_in.iter().map(|s| s.as_str().to_string()).collect();

        let rows = sqlx::query_as::<_, ReservationRow>(
            r#"
            SELECT id, vehicle_id, customer_id, start_date, end_date,
                   status, advance_amount, total_amount, created_at, updated_at
            FROM reservations
            WHERE vehicle_id = $1 AND status = ANY($2)
            ORDER BY id
            "#,
        )
        .bind(vehicle_id)
        .bind(&statuses)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;

        rows.into_iter()
            .map(ReservationRow::into_reservation)
            .collect()
    }

    async fn count_reservations_prefixed(&self, id_prefix: &str) -> StoreResult<u64> {
        let count: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM reservations WHERE id LIKE $1 || '%'"#)
                .bind(id_prefix)
                .fetch_one(&self.pool)
                .await
                .map_err(map_err)?;
        Ok(count as u64)
    }
}
