use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(registrar_records_migration::Migrator).await;
}
