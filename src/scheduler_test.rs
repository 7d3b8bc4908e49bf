use super::*;

#[test]
fn new_scheduler_is_empty() {
    let s: FrameScheduler<u64, i32> = FrameScheduler::new();
    assert!(s.is_empty());
    assert_eq!(s.dropped(), 0);
}

#[test]
fn second_payload_for_same_key_is_dropped() {
    let mut s = FrameScheduler::new();
    assert!(s.schedule(1u64, "first"));
    assert!(!s.schedule(1u64, "second"));
    assert_eq!(s.dropped(), 1);
    assert_eq!(s.flush(), vec![(1, "first")]);
}

#[test]
fn keys_are_independent() {
    let mut s = FrameScheduler::new();
    assert!(s.schedule(1u64, 10));
    assert!(s.schedule(2u64, 20));
    assert!(s.is_pending(&1));
    assert!(s.is_pending(&2));
    assert_eq!(s.flush(), vec![(1, 10), (2, 20)]);
}

#[test]
fn flush_frees_every_slot() {
    let mut s = FrameScheduler::new();
    s.schedule(1u64, 'a');
    let _ = s.flush();
    assert!(s.is_empty());
    assert!(s.schedule(1u64, 'b'));
    assert_eq!(s.flush(), vec![(1, 'b')]);
}

#[test]
fn cancel_discards_pending_for_key() {
    let mut s = FrameScheduler::new();
    s.schedule(1u64, 1);
    s.schedule(2u64, 2);
    s.cancel(&1);
    assert!(!s.is_pending(&1));
    assert_eq!(s.flush(), vec![(2, 2)]);
}
