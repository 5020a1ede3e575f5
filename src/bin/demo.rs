use chaintable::{HashTable, TableError};
use log::info;

fn main() -> Result<(), TableError> {
    env_logger::builder().init();

    let mut table = HashTable::new_with_capacity(15)?;

    for i in 1..=20 {
        table.store(&format!("key{i}"), &format!("value{i}"))?;
    }
    info!(
        "stored {} entries across {} buckets (load factor {:.2})",
        table.used(),
        table.capacity(),
        table.load_factor()
    );

    println!("key7 = {:?}", table.get("key7"));

    let old = table.store("key7", "overwritten")?;
    println!("key7 = {:?} (was {old:?})", table.get("key7"));

    table.remove("key7");
    println!("after remove, key7 = {:?}", table.get("key7"));

    let freed = table.clear();
    println!("cleared {freed} entries");
    Ok(())
}
