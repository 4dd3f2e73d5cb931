use std::path::Path;

use forgeboard_core::store::Store;

/// Create (or verify) the database schema at `db`.
pub fn run(db: &Path) -> anyhow::Result<()> {
    Store::open(db)?;
    println!("database ready at {}", db.display());
    Ok(())
}
