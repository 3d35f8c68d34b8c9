use std::{fs, path::Path, process};
use util::config;

mod runner;

#[tokio::main]
async fn main() {
    let db_path = config::database_path();
    let url = format!("sqlite://{}?mode=rwc", db_path);
    let command = std::env::args().nth(1);

    let result = match command.as_deref() {
        Some("clean") => {
            remove_db_file(&db_path);
            Ok(())
        }
        Some("fresh") => {
            remove_db_file(&db_path);
            migrate(&db_path, &url).await
        }
        Some("status") => match sea_orm::Database::connect(&url).await {
            Ok(db) => runner::print_status(&db).await,
            Err(e) => Err(e),
        },
        _ => migrate(&db_path, &url).await,
    };

    if let Err(e) = result {
        eprintln!("Migration failed: {e}");
        process::exit(1);
    }
}

async fn migrate(db_path: &str, url: &str) -> Result<(), sea_orm::DbErr> {
    if let Some(parent) = Path::new(db_path).parent() {
        fs::create_dir_all(parent).ok();
    }
    let db = sea_orm::Database::connect(url).await?;
    runner::apply_pending(&db).await
}

fn remove_db_file(path: &str) {
    let db_path = Path::new(path);
    if !db_path.exists() {
        println!("DB file does not exist: {}", db_path.display());
        return;
    }
    match fs::remove_file(db_path) {
        Ok(()) => println!("Deleted DB: {}", db_path.display()),
        Err(e) => eprintln!("Failed to delete {}: {e}", db_path.display()),
    }
}
