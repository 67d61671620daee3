use crate::store::ProfileStore;
use anyhow::Result;

pub fn execute(store: &ProfileStore, name: &str) -> Result<()> {
    let key = store.public_key(name)?;
    println!("{}", key.trim_end());
    Ok(())
}
