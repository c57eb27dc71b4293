//! Shared database fixtures for integration tests.
//!
//! Tests connect through `DATABASE_URL` (a `.env` file is honored) and skip
//! when it is unset. Each test works inside a transaction on temporary
//! `companies`/`jobs` tables that shadow any real ones, so nothing survives
//! the test.

#![allow(dead_code)]

use jobly::GenericClient;
use tokio_postgres::{Client, NoTls, Transaction};

pub async fn try_connect() -> Option<Client> {
    let _ = dotenvy::dotenv();
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let (client, connection) = tokio_postgres::connect(&database_url, NoTls)
        .await
        .expect("Failed to connect to DATABASE_URL with NoTls");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("tokio-postgres connection error: {e}");
        }
    });
    Some(client)
}

const SCHEMA: &str = "
CREATE TEMP TABLE companies (
  handle VARCHAR(25) PRIMARY KEY CHECK (handle = lower(handle)),
  name TEXT UNIQUE NOT NULL,
  num_employees INTEGER CHECK (num_employees >= 0),
  description TEXT NOT NULL,
  logo_url TEXT
) ON COMMIT DROP;

CREATE TEMP TABLE jobs (
  id SERIAL PRIMARY KEY,
  title TEXT NOT NULL,
  salary INTEGER CHECK (salary >= 0),
  equity NUMERIC CHECK (equity <= 1.0),
  company_handle VARCHAR(25) NOT NULL REFERENCES pg_temp.companies ON DELETE CASCADE
) ON COMMIT DROP;

INSERT INTO companies (handle, name, num_employees, description, logo_url) VALUES
  ('c1', 'C1', 1, 'Desc1', 'http://c1.img'),
  ('c2', 'C2', 2, 'Desc2', 'http://c2.img'),
  ('c3', 'C3', 3, 'Desc3', 'http://c3.img');
";

/// Ids of Job1..Job4, all owned by `c1`.
pub struct Fixtures {
    pub job_ids: [i32; 4],
}

pub async fn seed(tx: &Transaction<'_>) -> Fixtures {
    tx.batch_execute(SCHEMA).await.expect("create fixture schema");

    let rows = GenericClient::query(
        tx,
        "INSERT INTO jobs (title, salary, equity, company_handle) VALUES
           ('Job1', 100, '0.1', 'c1'),
           ('Job2', 200, '0.2', 'c1'),
           ('Job3', 300, '0', 'c1'),
           ('Job4', NULL, NULL, 'c1')
         RETURNING id",
        &[],
    )
    .await
    .expect("insert fixture jobs");

    let ids: Vec<i32> = rows.iter().map(|r| r.get("id")).collect();
    Fixtures {
        job_ids: ids.try_into().expect("four fixture jobs"),
    }
}
