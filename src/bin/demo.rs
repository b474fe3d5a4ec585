//! Builds a six-bucket table of integers, prints every chain, then releases
//! the structure while the integers stay with the caller.

use chain_table::ChainTable;
use std::io::{self, Write};

const BUCKETS: usize = 6;

fn modulo(buckets: usize, v: &&i32) -> usize {
    v.rem_euclid(buckets as i32) as usize
}

fn same(a: &&i32, b: &&i32) -> bool {
    a == b
}

fn print_table<H, E>(table: &ChainTable<&i32, H, E>, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Hash Table:\n")?;
    for bucket in 0..table.bucket_count() {
        write!(out, "Index {bucket}: ")?;
        for v in table.chain(bucket) {
            write!(out, "{v}, ")?;
        }
        writeln!(out)?;
    }
    writeln!(out)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(io::stderr)
        .init();

    let mut values = [0i32; BUCKETS];
    values[2] = 2;
    values[5] = 22;

    let mut table: ChainTable<&i32, _, _> = ChainTable::new(
        BUCKETS,
        modulo as fn(usize, &&i32) -> usize,
        same as fn(&&i32, &&i32) -> bool,
    )?;
    for v in values.iter() {
        table.insert(v);
    }

    print_table(&table, &mut io::stdout().lock())?;

    let released = table.teardown();
    tracing::debug!(count = released.len(), "elements returned to caller");
    Ok(())
}
