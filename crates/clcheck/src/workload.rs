//! Seeded random workload mirrored against a `Vec`

use anyhow::{ensure, Context, Result};
use cachedlist::CachedList;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::scenarios::check;

/// Largest item value drawn
const ITEM_RANGE: u32 = 10_000;

/// Random lookups after the mutation phase
const SEARCHES: usize = 200;

#[derive(Debug, Clone, Copy)]
enum Op {
    AddHead(u32),
    AddTail(u32),
    PopHead,
    PopTail,
    Insert(u32, usize),
    Remove(usize),
}

fn pick(rng: &mut StdRng, len: usize) -> Op {
    let item = rng.random_range(0..ITEM_RANGE);
    let index = if len == 0 { 0 } else { rng.random_range(0..len) };
    match rng.random_range(0..6) {
        0 => Op::AddHead(item),
        1 => Op::AddTail(item),
        2 => Op::PopHead,
        3 => Op::PopTail,
        4 => Op::Insert(item, index),
        _ => Op::Remove(index),
    }
}

fn apply(list: &mut CachedList<u32>, model: &mut Vec<u32>, op: Op) -> Result<()> {
    match op {
        Op::AddHead(item) => {
            list.add_head(item);
            model.insert(0, item);
        }
        Op::AddTail(item) => {
            list.add_tail(item);
            model.push(item);
        }
        Op::PopHead => {
            let expected = (!model.is_empty()).then(|| model.remove(0));
            ensure!(list.pop_head() == expected, "pop_head returned the wrong item");
        }
        Op::PopTail => {
            ensure!(list.pop_tail() == model.pop(), "pop_tail returned the wrong item");
        }
        Op::Insert(item, index) => {
            list.insert(item, index)?;
            model.insert(index, item);
        }
        Op::Remove(index) => {
            let expected = (!model.is_empty()).then(|| model.remove(index));
            ensure!(list.remove(index)? == expected, "remove returned the wrong item");
        }
    }
    Ok(())
}

/// Run `ops` random mutations, then random positional reads
pub(crate) fn run(seed: u64, ops: usize) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut list = CachedList::new();
    let mut model = Vec::new();

    for step in 0..ops {
        let op = pick(&mut rng, model.len());
        debug!(step, ?op, "applying");
        apply(&mut list, &mut model, op).with_context(|| format!("step {}: {:?}", step, op))?;
        check(&list, &format!("step {} ({:?})", step, op))?;
        ensure!(list == model, "step {}: list diverged from model", step);
    }

    // Top up so there is something to search
    for _ in 0..10 {
        let item = rng.random_range(0..ITEM_RANGE);
        list.add_tail(item);
        model.push(item);
    }

    list.stats().reset();
    for _ in 0..SEARCHES {
        let index = rng.random_range(0..model.len());
        let item = *list.get_item(index)?;
        ensure!(item == model[index], "get_item({}) returned {}", index, item);
    }
    check(&list, "random searches")?;

    let stats = list.stats();
    info!(
        len = list.len(),
        rebuilds = stats.rebuilds(),
        mean_steps = stats.mean_steps(),
        cache_ratio = stats.cache_ratio(),
        "random workload finished"
    );
    Ok(())
}
