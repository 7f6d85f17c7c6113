//! Database-backed Patient Storage
//! Plain parameterized CRUD over a single SQLite connection

use crate::models::{Patient, PatientInput};
use anyhow::{Context, Result};
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::Arc;
use tracing::{debug, info};

const SCHEMA_SQL: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;

CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,
    gender TEXT NOT NULL DEFAULT '',
    contact_number TEXT NOT NULL DEFAULT '',
    email TEXT NOT NULL DEFAULT '',
    address TEXT NOT NULL DEFAULT '',
    medical_history TEXT NOT NULL DEFAULT '',
    created_by INTEGER NOT NULL,
    updated_by INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_patients_name
    ON patients(last_name, first_name);
"#;

const SELECT_COLUMNS: &str = "id, first_name, last_name, date_of_birth, gender, contact_number, \
     email, address, medical_history, created_by, updated_by, created_at, updated_at";

/// Patient records store
pub struct PatientStore {
    conn: Arc<Mutex<Connection>>,
}

impl PatientStore {
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open patient database at {}", db_path))?;
        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to initialize patient schema")?;

        info!("Patient store ready at {}", db_path);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Insert a patient on behalf of a staff member, returning the new id
    pub fn create(&self, input: &PatientInput, staff_id: i64) -> Result<i64> {
        let now = Utc::now().to_rfc3339();
        let conn = self.conn.lock();

        conn.execute(
            "INSERT INTO patients (first_name, last_name, date_of_birth, gender, contact_number,
                                   email, address, medical_history, created_by, updated_by,
                                   created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9, ?10, ?10)",
            params![
                input.first_name,
                input.last_name,
                input.date_of_birth,
                input.gender,
                input.contact_number,
                input.email,
                input.address,
                input.medical_history,
                staff_id,
                now,
            ],
        )
        .context("Failed to insert patient")?;

        let id = conn.last_insert_rowid();
        debug!(patient_id = id, staff_id, "Patient created");
        Ok(id)
    }

    pub fn get(&self, id: i64) -> Result<Option<Patient>> {
        let conn = self.conn.lock();

        conn.query_row(
            &format!("SELECT {} FROM patients WHERE id = ?1", SELECT_COLUMNS),
            params![id],
            row_to_patient,
        )
        .optional()
        .context("Failed to load patient")
    }

    /// Overwrite a patient's fields. Returns false when no such patient exists.
    pub fn update(&self, id: i64, input: &PatientInput, staff_id: i64) -> Result<bool> {
        let now = Utc::now().to_rfc3339();
        let conn = self.conn.lock();

        let rows = conn
            .execute(
                "UPDATE patients
                 SET first_name = ?1, last_name = ?2, date_of_birth = ?3, gender = ?4,
                     contact_number = ?5, email = ?6, address = ?7, medical_history = ?8,
                     updated_by = ?9, updated_at = ?10
                 WHERE id = ?11",
                params![
                    input.first_name,
                    input.last_name,
                    input.date_of_birth,
                    input.gender,
                    input.contact_number,
                    input.email,
                    input.address,
                    input.medical_history,
                    staff_id,
                    now,
                    id,
                ],
            )
            .context("Failed to update patient")?;

        Ok(rows > 0)
    }

    /// Returns false when no such patient exists.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock();
        let rows = conn
            .execute("DELETE FROM patients WHERE id = ?1", params![id])
            .context("Failed to delete patient")?;

        Ok(rows > 0)
    }
}

fn row_to_patient(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        date_of_birth: row.get(3)?,
        gender: row.get(4)?,
        contact_number: row.get(5)?,
        email: row.get(6)?,
        address: row.get(7)?,
        medical_history: row.get(8)?,
        created_by: row.get(9)?,
        updated_by: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}
