#![cfg(test)]

use std::ptr::NonNull;

use super::*;
use crate::util::alloc::CountedDrop;

#[test]
fn test_states() {
    let empty: OwningHandle<u32> = OwningHandle::new();
    assert!(empty.state().is_empty());
    assert_eq!(empty.get(), None);

    let owning = OwningHandle::new_with(5_u32);
    assert!(owning.state().is_owning());
    assert_eq!(owning.get(), Some(&5));

    let adopted = OwningHandle::from_box(Box::new(6_u32));
    assert_eq!(adopted.state(), HandleState::Owning);

    let from_none: OwningHandle<u32> = OwningHandle::from(None);
    assert!(from_none.is_empty());
}

#[test]
fn test_drop() {
    let counter = CountedDrop::new();
    let handle = OwningHandle::new_with(counter.clone());

    assert_eq!(counter.drops(), 0);
    drop(handle);
    assert_eq!(counter.drops(), 1, "Dropping the handle should destroy the value once.");

    let empty: OwningHandle<CountedDrop> = OwningHandle::new();
    drop(empty);
    assert_eq!(counter.drops(), 1, "Dropping an empty handle should do nothing.");
}

#[test]
fn test_move_uniqueness() {
    let counter = CountedDrop::new();
    let mut a = OwningHandle::new_with(counter.clone());
    let value_ptr = a.ptr;

    let b = a.take();
    assert!(a.is_empty(), "The source of a move should be left empty.");
    assert_eq!(b.ptr, value_ptr, "The destination should own the original value.");

    drop(a);
    assert_eq!(counter.drops(), 0, "Dropping the moved-from handle shouldn't touch the value.");

    fn consumer(handle: OwningHandle<CountedDrop>) -> bool {
        handle.is_owning()
    }

    assert!(consumer(b));
    assert_eq!(
        counter.drops(),
        1,
        "The value should be destroyed when the consuming function returns."
    );
}

#[test]
fn test_move_from() {
    let old = CountedDrop::new();
    let new = CountedDrop::new();
    let mut destination = OwningHandle::new_with(old.clone());
    let mut source = OwningHandle::new_with(new.clone());

    destination.move_from(&mut source);

    assert_eq!(old.drops(), 1, "The destination's previous value should be destroyed.");
    assert_eq!(new.drops(), 0, "The transferred value should still be alive.");
    assert!(source.is_empty());
    assert!(destination.is_owning());

    let mut empty = OwningHandle::new();
    destination.move_from(&mut empty);
    assert_eq!(new.drops(), 1, "Moving an empty handle in should destroy the held value.");
    assert!(destination.is_empty());
}

#[test]
#[allow(clippy::self_assignment)]
fn test_self_move() {
    let counter = CountedDrop::new();
    let mut handle = OwningHandle::new_with(counter.clone());
    let value_ptr = handle.ptr;

    handle = handle;

    assert_eq!(counter.drops(), 0, "A self move shouldn't destroy the value.");
    assert_eq!(handle.ptr, value_ptr);
}

#[test]
fn test_release() {
    let counter = CountedDrop::new();
    let mut handle = OwningHandle::new_with(counter.clone());

    let value = handle.release().expect("the handle owns a value");
    assert!(handle.is_empty());
    assert_eq!(handle.release().map(|_| ()), None, "Releasing twice should yield nothing.");

    drop(handle);
    assert_eq!(counter.drops(), 0, "The released value should outlive the handle.");

    drop(value);
    assert_eq!(counter.drops(), 1, "The caller should be responsible for the value.");
}

#[test]
fn test_raw_round_trip() {
    let counter = CountedDrop::new();
    let mut handle = OwningHandle::new_with(counter.clone());

    let ptr: NonNull<CountedDrop> = handle.release_raw().expect("the handle owns a value");
    drop(handle);
    assert_eq!(counter.drops(), 0);

    // SAFETY: ptr was just released and nothing else owns it.
    let readopted = unsafe { OwningHandle::from_raw(ptr) };
    assert!(readopted.is_owning());
    drop(readopted);
    assert_eq!(counter.drops(), 1);
}

#[test]
fn test_reset_and_get_mut() {
    let first = CountedDrop::new();
    let mut handle = OwningHandle::new_with(first.clone());

    handle.reset(None);
    assert_eq!(first.drops(), 1);
    assert!(handle.is_empty());

    let mut numbers = OwningHandle::new_with(vec![1, 2]);
    if let Some(numbers) = numbers.get_mut() {
        numbers.push(3);
    }
    assert_eq!(numbers.get(), Some(&vec![1, 2, 3]));

    numbers.reset(Some(Box::new(vec![4])));
    assert_eq!(numbers.get(), Some(&vec![4]));
}

#[test]
fn test_debug() {
    assert_eq!(format!("{:?}", OwningHandle::new_with(3)), "Owning(3)");
    assert_eq!(format!("{:?}", OwningHandle::<u8>::new()), "Empty");
}
