//! Fixed scenarios with known outcomes

use std::fmt::Debug;

use anyhow::{ensure, Context, Result};
use cachedlist::{CachedList, Error};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

const FRUIT: [&str; 8] = [
    "apple",
    "orange",
    "pear",
    "banana",
    "grape",
    "lemon",
    "lime",
    "grapefruit",
];

/// Fruit list after inserting "coconut" at 3 and "tomato" at 0
const FRUIT_AFTER_INSERTS: [&str; 10] = [
    "tomato",
    "apple",
    "orange",
    "pear",
    "coconut",
    "banana",
    "grape",
    "lemon",
    "lime",
    "grapefruit",
];

/// Validate `list` after `op`
pub(crate) fn check<T: Debug>(list: &CachedList<T>, op: &str) -> Result<()> {
    debug!(op, items = ?list, cache = %list.describe_cache(), "after operation");
    list.validate()
        .with_context(|| format!("list invalid after {}", op))
}

/// Validate `list` and compare it with `expected`
pub(crate) fn expect<T>(list: &CachedList<T>, op: &str, expected: &[T]) -> Result<()>
where
    T: PartialEq + Debug,
{
    check(list, op)?;
    ensure!(
        *list == *expected,
        "after {}: got {:?}, expected {:?}",
        op,
        list,
        expected
    );
    Ok(())
}

fn fruit_list() -> Result<CachedList<&'static str>> {
    let mut list: CachedList<_> = FRUIT.into_iter().collect();
    list.insert("coconut", 3)?;
    list.insert("tomato", 0)?;
    Ok(list)
}

/// Head/tail operations, inserts and out-of-range reads
pub(crate) fn basic() -> Result<()> {
    let mut callsigns: CachedList<_> = ["alpha", "bravo", "charlie", "delta", "echo", "foxtrot"]
        .into_iter()
        .collect();
    callsigns.reverse_list();
    callsigns.reverse_list();
    check(&callsigns, "reverse twice")?;
    callsigns.pop_head();
    callsigns.pop_tail();
    expect(
        &callsigns,
        "pop_head, pop_tail",
        &["bravo", "charlie", "delta", "echo"],
    )?;
    callsigns.add_head("A");
    callsigns.add_tail("F");
    check(&callsigns, "add_head, add_tail")?;

    let mut numbers = CachedList::new();
    numbers.add_head("two");
    numbers.add_head("one");
    expect(&numbers, "add_head twice", &["one", "two"])?;
    numbers.pop_head();
    numbers.pop_head();
    expect(&numbers, "pop_head twice", &[])?;
    numbers.add_head("zzz");
    expect(&numbers, "add_head", &["zzz"])?;

    let fruit = fruit_list()?;
    expect(&fruit, "insert", &FRUIT_AFTER_INSERTS)?;
    for bad in [17, 10, 500] {
        ensure!(
            matches!(fruit.get_item(bad), Err(Error::IndexOutOfRange { .. })),
            "get_item({}) did not report out of range",
            bad
        );
    }
    Ok(())
}

/// Searches expected to succeed and to fail
pub(crate) fn find() -> Result<()> {
    let fruit = fruit_list()?;

    let hits = [
        ("coconut", Some(0), false, 4),
        ("apple", Some(4), true, 1),
        ("lime", Some(3), false, 8),
        ("pear", None, true, 3),
    ];
    for (item, start, backwards, expected) in hits {
        let found = fruit
            .find_item(&item, start, backwards)
            .with_context(|| format!("find {} from {:?}", item, start))?;
        ensure!(found == expected, "found {} at {}, expected {}", item, found, expected);
    }

    let misses = [
        ("apple", Some(4), false),
        ("sandwich", None, false),
        ("kiwi", None, true),
        ("lemon", Some(4), true),
        ("banana", Some(77), false),
    ];
    for (item, start, backwards) in misses {
        ensure!(
            fruit.find_item(&item, start, backwards).is_err(),
            "found {} from {:?} where a miss was expected",
            item,
            start
        );
    }
    Ok(())
}

/// Letter sort plus a random list sorted both ways
pub(crate) fn sort(seed: u64) -> Result<()> {
    let mut letters: CachedList<char> = "hbjeacfdgi".chars().collect();
    letters.sort(false);
    let ascending: Vec<char> = "abcdefghij".chars().collect();
    expect(&letters, "sort letters", &ascending)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut expected: Vec<u32> = (0..500).map(|_| rng.random_range(0..10_000)).collect();
    let mut numbers: CachedList<u32> = expected.iter().copied().collect();

    expected.sort();
    numbers.sort(false);
    expect(&numbers, "sort", &expected)?;

    expected.reverse();
    numbers.sort(true);
    expect(&numbers, "sort reverse", &expected)
}

/// Join and split round trips
pub(crate) fn join_split() -> Result<()> {
    let mut first: CachedList<_> = ["elephant", "giraffe", "hippo"].into_iter().collect();
    let mut second: CachedList<_> = ["gazelle", "rhinoceros"].into_iter().collect();
    let all = ["elephant", "giraffe", "hippo", "gazelle", "rhinoceros"];

    first.join(&mut second);
    expect(&first, "join", &all)?;
    expect(&second, "join donor", &[])?;
    second.join(&mut first);
    expect(&second, "join into empty", &all)?;

    let mut split_off = second.split(2)?;
    expect(&second, "split", &["elephant", "giraffe"])?;
    let mut empty_tail = second.split(2)?;
    empty_tail.add_tail("bat");
    second.join(&mut empty_tail);
    expect(&second, "split at end, join", &["elephant", "giraffe", "bat"])?;

    split_off.join(&mut ["meerkat"].into_iter().collect());
    expect(
        &split_off,
        "join meerkat",
        &["hippo", "gazelle", "rhinoceros", "meerkat"],
    )?;

    let mut combined = second.clone();
    combined.join(&mut split_off);
    expect(
        &combined,
        "copy, join",
        &[
            "elephant",
            "giraffe",
            "bat",
            "hippo",
            "gazelle",
            "rhinoceros",
            "meerkat",
        ],
    )
}

/// Iteration yields items in order with matching positions
pub(crate) fn iterate() -> Result<()> {
    let fruit = fruit_list()?;
    for (index, item) in fruit.iter().enumerate() {
        ensure!(
            fruit.get_item(index)? == item,
            "iterator and get_item disagree at {}",
            index
        );
    }
    expect(&fruit, "iterate", &FRUIT_AFTER_INSERTS)
}
