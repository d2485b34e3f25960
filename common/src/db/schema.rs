// Tables created at startup when missing. Not a migration system: nothing here alters existing tables.

pub const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username VARCHAR(50) NOT NULL UNIQUE,
        email VARCHAR(255) NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

/// Executed in order inside one transaction
pub const STATEMENTS: &[&str] = &[CREATE_USERS_TABLE];
