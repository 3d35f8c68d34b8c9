use colored::*;
use migration::Migrator;
use sea_orm::DatabaseConnection;
use sea_orm_migration::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

const STATUS_COLUMN: usize = 72;

/// Applies pending migrations one step at a time, printing a status line per step.
pub async fn apply_pending(db: &DatabaseConnection) -> Result<(), DbErr> {
    let pending = Migrator::get_pending_migrations(db).await?;
    if pending.is_empty() {
        println!("{}", "Schema is up to date".green());
        return Ok(());
    }

    for migration in pending {
        let label = format!("Applying {}", migration.name().bold());
        let dots = ".".repeat(STATUS_COLUMN.saturating_sub(label.len()));
        print!("{label}{dots} ");
        io::stdout().flush().ok();

        let started = Instant::now();
        match Migrator::up(db, Some(1)).await {
            Ok(()) => {
                let elapsed = format!("({:.2?})", started.elapsed()).dimmed();
                println!("{} {}", "done".green(), elapsed);
            }
            Err(e) => {
                println!("{}", "failed".red());
                return Err(e);
            }
        }
    }
    Ok(())
}

/// Prints every known migration with its applied state.
pub async fn print_status(db: &DatabaseConnection) -> Result<(), DbErr> {
    let applied: Vec<String> = Migrator::get_applied_migrations(db)
        .await?
        .iter()
        .map(|m| m.name().to_string())
        .collect();

    for migration in Migrator::migrations() {
        let name = migration.name().to_string();
        let state = if applied.contains(&name) {
            "applied".green()
        } else {
            "pending".yellow()
        };
        println!("{name:<width$} {state}", width = STATUS_COLUMN);
    }
    Ok(())
}
