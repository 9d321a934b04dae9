//! Creates the dashboard admin user, or resets its password if it exists.
//! Run with: cargo run --bin seed

use dashboard_api::{config::Config, db::Database, error::AppError, services::UserService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    println!("Connecting to database...");
    let db = Database::connect(&config).await?;
    db.run_migrations().await?;
    println!("Connected successfully!");

    let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let email = std::env::var("ADMIN_EMAIL").ok();
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "Admin@123".to_string());

    let users = UserService::new(db);
    let user = match users.create(&username, email.as_deref(), &password).await {
        Ok(user) => {
            println!("Admin user created successfully!");
            user
        }
        Err(AppError::DuplicateKey(_)) => {
            println!("Updating existing admin password...");
            let user = users.reset_password(&username, &password).await?;
            println!("Admin password updated successfully!");
            user
        }
        Err(e) => return Err(e.into()),
    };

    println!();
    println!("========================================");
    println!("  Admin Login Credentials");
    println!("========================================");
    println!("  Username: {}", user.username);
    println!("  Password: {}", password);
    println!("========================================");
    println!();
    println!("Please change the password after first login!");

    Ok(())
}
