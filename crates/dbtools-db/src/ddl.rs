//! SQL statement builders for schema management.
//!
//! Identifiers are always double-quoted and literals single-quoted with
//! embedded quotes doubled, so configured names can never break out of the
//! statement.

/// Name of the zero-argument function holding the recorded schema version.
pub const VERSION_FUNCTION: &str = "schema_version";

/// Quote a SQL identifier, doubling embedded double quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a SQL string literal, doubling embedded single quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub fn create_schema(schema: &str) -> String {
    format!("CREATE SCHEMA {}", quote_ident(schema))
}

pub fn drop_schema(schema: &str) -> String {
    format!("DROP SCHEMA IF EXISTS {} CASCADE", quote_ident(schema))
}

pub fn set_search_path(schema: &str) -> String {
    format!("SET search_path TO {}", quote_ident(schema))
}

/// Query answering whether `schema` holds a version function.
pub fn version_exists(schema: &str) -> String {
    format!(
        "SELECT EXISTS(\
            SELECT 1 FROM pg_catalog.pg_proc p \
            JOIN pg_catalog.pg_namespace n ON n.oid = p.pronamespace \
            WHERE n.nspname = {} AND p.proname = {}\
        )",
        quote_literal(schema),
        quote_literal(VERSION_FUNCTION)
    )
}

/// Query returning the recorded version text.
pub fn select_version(schema: &str) -> String {
    format!("SELECT {}.{VERSION_FUNCTION}()", quote_ident(schema))
}

/// (Re)install the version function so that it returns `version`.
pub fn replace_version(schema: &str, version: &str) -> String {
    format!(
        "CREATE OR REPLACE FUNCTION {}.{VERSION_FUNCTION}() \
         RETURNS text AS $$ BEGIN RETURN {}; END; $$ \
         IMMUTABLE LANGUAGE plpgsql",
        quote_ident(schema),
        quote_literal(version)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("data"), r#""data""#);
        assert_eq!(quote_ident(r#"my"schema"#), r#""my""schema""#);
    }

    #[test]
    fn test_quote_literal() {
        assert_eq!(quote_literal("1.0.0"), "'1.0.0'");
        assert_eq!(quote_literal("it's"), "'it''s'");
    }

    #[test]
    fn test_schema_statements() {
        assert_eq!(create_schema("api"), r#"CREATE SCHEMA "api""#);
        assert_eq!(drop_schema("api"), r#"DROP SCHEMA IF EXISTS "api" CASCADE"#);
        assert_eq!(set_search_path("data"), r#"SET search_path TO "data""#);
    }

    #[test]
    fn test_version_statements() {
        assert_eq!(select_version("data"), r#"SELECT "data".schema_version()"#);
        assert_eq!(
            replace_version("data", "1.2.0"),
            "CREATE OR REPLACE FUNCTION \"data\".schema_version() RETURNS text AS $$ \
             BEGIN RETURN '1.2.0'; END; $$ IMMUTABLE LANGUAGE plpgsql"
        );
        let exists = version_exists("data");
        assert!(exists.contains("n.nspname = 'data'"));
        assert!(exists.contains("p.proname = 'schema_version'"));
    }
}
