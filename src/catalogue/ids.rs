//! Database identifiers

pub const DB000: &str = "db000";
pub const DB001: &str = "db001";
pub const DB002: &str = "db002";
pub const DB003: &str = "db003";
pub const DB004: &str = "db004";
pub const DB005: &str = "db005";
pub const DB006: &str = "db006";
pub const DB007: &str = "db007";
pub const DB008: &str = "db008";
pub const DB009: &str = "db009";
pub const DB010: &str = "db010";
pub const DB011: &str = "db011";
pub const DB012: &str = "db012";
pub const DB013: &str = "db013";
pub const DB014: &str = "db014";
pub const DB015: &str = "db015";
pub const DB016: &str = "db016";
pub const DB017: &str = "db017";
pub const DB018: &str = "db018";
pub const DB019: &str = "db019";
pub const DB020: &str = "db020";
pub const DB021: &str = "db021";
pub const DB022: &str = "db022";
pub const DB023: &str = "db023";
pub const DB024: &str = "db024";

pub const HOPSWORKS: &str = "hopsworks";
pub const BENCHMARK: &str = "rdrs_bench";

/// Applied last. If this database exists, every other one was created successfully.
pub const SENTINEL: &str = "sentinel";

/// Fixed schemas and their resource paths
pub const FIXED_SCHEMAS: &[(&str, &str)] = &[
    (HOPSWORKS, "fixed/hopsworks.sql"),
    (DB000, "fixed/DB000.sql"),
    (DB001, "fixed/DB001.sql"),
    (DB002, "fixed/DB002.sql"),
    (DB003, "fixed/DB003.sql"),
    (DB004, "fixed/DB004.sql"),
    (DB005, "fixed/DB005.sql"),
    (DB006, "fixed/DB006.sql"),
    (DB007, "fixed/DB007.sql"),
    (DB008, "fixed/DB008.sql"),
    (DB009, "fixed/DB009.sql"),
    (DB010, "fixed/DB010.sql"),
    (DB011, "fixed/DB011.sql"),
    (DB013, "fixed/DB013.sql"),
    (DB019, "fixed/DB019.sql"),
    (DB020, "fixed/DB020.sql"),
    (DB021, "fixed/DB021.sql"),
    (DB022, "fixed/DB022.sql"),
    (DB023, "fixed/DB023.sql"),
    (DB024, "fixed/DB024.sql"),
    (SENTINEL, "fixed/sentinel.sql"),
];

/// Check if a string is a valid database identifier (lowercase alphanumeric + underscore)
pub fn is_valid_identifier(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
