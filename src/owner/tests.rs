#![cfg(test)]

use super::*;
use crate::buffer::InvalidCapacity;
use crate::scope::{EventKind, Journal, Scope};
use crate::util::alloc::CountedDrop;
use crate::util::log::capture;
use crate::util::panic::assert_panics;
use crate::util::result::ResultExtension;

/// A ResourceOwner paired with a drop counter. Fields drop in declaration order, so the counter
/// only moves once the owner and its buffer are gone.
struct Watched {
    _owner: ResourceOwner,
    _counter: CountedDrop,
}

impl Watched {
    fn new(line: &str, counter: &CountedDrop) -> Result<Watched, OwnerError> {
        Ok(Watched {
            _owner: ResourceOwner::new(line)?,
            _counter: counter.clone(),
        })
    }
}

#[test]
fn test_construction() {
    let owner = ResourceOwner::new("x").expect("a single character fits");
    assert_eq!(owner.content(), "x\n");
    assert_eq!(owner.buffer().cap(), OWNER_CAP);
    assert_eq!(owner.to_string(), "x\n");

    let longest = "a".repeat(OWNER_CAP - 2);
    assert!(ResourceOwner::new(&longest).is_ok(), "8 bytes of text should just fit.");

    assert_eq!(
        ResourceOwner::new("cccccccccc"),
        Err(OwnerError::InsufficientCapacity(InsufficientCapacity {
            line_len: 10,
            cap: OWNER_CAP,
        }))
    );
}

#[test]
fn test_with_cap() {
    let owner = ResourceOwner::with_cap(32, "cccccccccc").expect("fits in 32 bytes");
    assert_eq!(owner.content(), "cccccccccc\n");

    let error = ResourceOwner::with_cap(0, "").expect_err("zero capacity is invalid");
    assert!(error.is_invalid_capacity());
    assert_eq!(error, OwnerError::from(InvalidCapacity));

    assert!(
        ResourceOwner::with_cap(1, "")
            .expect_err("an empty line still needs two bytes")
            .is_insufficient_capacity()
    );
}

#[test]
fn test_error_display() {
    let error = ResourceOwner::new("cccccccccc").expect_err("doesn't fit");
    assert_eq!(
        error.to_string(),
        "not enough capacity: a line of 10 bytes needs more than 10 bytes"
    );
}

#[test]
fn test_failed_construction_never_drops() {
    let counter = CountedDrop::new();

    assert!(Watched::new("cccccccccc", &counter).is_err());
    assert_eq!(counter.drops(), 0, "A failed owner should never be dropped.");

    drop(Watched::new("b", &counter));
    assert_eq!(counter.drops(), 1);
}

#[test]
fn test_failed_construction_releases_storage() {
    let (result, log) = capture(|| ResourceOwner::new("cccccccccc"));

    assert!(result.is_err());
    assert_eq!(log.allocations(), 1);
    assert_eq!(log.releases(), 1, "The buffer of a failed owner should still be released.");
    assert_eq!(log.count("constructed"), 0);
    assert_eq!(log.count("about to destroy"), 0);
}

#[test]
fn test_owner_cleanup_runs_before_buffer_release() {
    let ((), log) = capture(|| {
        let owner = ResourceOwner::new("x").expect("a single character fits");
        drop(owner);
    });

    assert_eq!(
        log.messages(),
        [
            "allocated buffer storage",
            "constructed",
            "about to destroy",
            "released buffer storage",
        ]
    );
}

#[test]
fn test_nested_failure_releases_enclosing_owner() {
    let a_counter = CountedDrop::new();
    let b_counter = CountedDrop::new();

    let result = (|| -> Result<(), OwnerError> {
        let _a = Watched::new("a", &a_counter)?;
        {
            let _b = Watched::new("bbbbbbbbbbbbbbbb", &b_counter)?;
        }
        Ok(())
    })();

    assert!(result.is_err());
    assert_eq!(a_counter.drops(), 1, "a should be destroyed exactly once while unwinding.");
    assert_eq!(b_counter.drops(), 0, "b never finished construction.");
}

fn fn_c(parent: &Scope) -> Result<(), OwnerError> {
    let mut scope = parent.nested("fn_c");
    scope.acquire("c", || ResourceOwner::new("cccccccccc"))?;
    Ok(())
}

fn fn_b(parent: &Scope) -> Result<(), OwnerError> {
    let mut scope = parent.nested("fn_b");
    scope.acquire("b", || ResourceOwner::new("b"))?;
    fn_c(&scope)
}

#[test]
fn test_call_stack_unwinding() {
    let journal = Journal::new();

    let (result, log) = capture(|| -> Result<(), OwnerError> {
        let mut scope = Scope::with_journal("try", journal.clone());
        scope.acquire("a", || ResourceOwner::new("a"))?;
        fn_b(&scope)?;
        scope.acquire("d", || ResourceOwner::new("d"))?;
        Ok(())
    });

    assert!(result.is_err_and(|error| error.is_insufficient_capacity()));
    assert_eq!(journal.acquired(), ["a", "b"]);
    assert_eq!(
        (log.allocations(), log.releases()),
        (3, 3),
        "a, b and the failed c should each release their buffer once."
    );
    assert_eq!(
        journal.released(),
        ["b", "a"],
        "Every fully constructed owner should be released in reverse order."
    );
    assert_eq!(journal.count("a", EventKind::Released), 1);
    assert_eq!(journal.count("c", EventKind::Released), 0);
    assert_eq!(journal.count("d", EventKind::Acquired), 0);
}

#[test]
fn test_unhandled_failure_still_unwinds() {
    let journal = Journal::new();

    assert_panics!({
        let mut scope = Scope::with_journal("main", journal.clone());
        scope.acquire("a", || ResourceOwner::new("a")).throw();
        scope.acquire("b", || ResourceOwner::new("cccccccccc")).throw();
    });

    assert_eq!(journal.released(), ["a"]);
}
