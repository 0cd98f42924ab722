//! Terminal output helpers.

use chrono::SecondsFormat;
use console::style;
use keeper_types::Secret;
use tabled::settings::Style;
use tabled::{Table, Tabled};

pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

pub fn warning(msg: &str) {
    println!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Listing row. Never carries decrypted content.
#[derive(Debug, Tabled)]
pub struct SecretRow {
    #[tabled(rename = "NAME")]
    pub name: String,
    #[tabled(rename = "TYPE")]
    pub secret_type: String,
    #[tabled(rename = "OWNER")]
    pub owner: String,
    #[tabled(rename = "UPDATED")]
    pub updated: String,
}

impl From<&Secret> for SecretRow {
    fn from(s: &Secret) -> Self {
        Self {
            name: s.name.clone(),
            secret_type: s.secret_type.to_string(),
            owner: s.owner.clone(),
            updated: s.updated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

pub fn secret_rows(secrets: &[Secret]) -> Vec<SecretRow> {
    secrets.iter().map(SecretRow::from).collect()
}

pub fn secret_table(secrets: &[Secret]) -> String {
    let mut table = Table::new(secret_rows(secrets));
    table.with(Style::sharp());
    table.to_string()
}

pub fn print_secrets(secrets: &[Secret]) {
    if secrets.is_empty() {
        println!("{}", style("(no secrets)").dim());
        return;
    }
    println!("{}", secret_table(secrets));
}
