//! One-off operator utility: wipe every admin account and recreate the
//! configured default admin. Use when the credentials are lost.

use portfolio_api::config::AppConfig;
use portfolio_api::db;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = AppConfig::load();

    let pool = match db::init_pool(&config).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = db::run_migrations(pool.as_ref()).await {
        eprintln!("Failed to run migrations: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = sqlx::query("DELETE FROM admins").execute(pool.as_ref()).await {
        eprintln!("Failed to remove existing admins: {}", e);
        std::process::exit(1);
    }
    println!("Existing admins removed");

    if let Err(e) = db::seed_default_admin(pool.as_ref(), &config).await {
        eprintln!("Failed to create admin: {}", e);
        std::process::exit(1);
    }

    println!("New admin created:");
    println!("Username: {}", config.admin_username);
    println!("Password: (value of ADMIN_PASSWORD)");
}
