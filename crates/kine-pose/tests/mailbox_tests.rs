use kine_pose::{FrameMailbox, MailboxPolicy, PutOutcome};
use kine_video::Frame;
use std::sync::Arc;
use std::thread;

fn frame(tag: u8) -> Frame {
    Frame::new(vec![tag; 2 * 2 * 3], 2, 2)
}

#[test]
fn test_second_put_is_dropped_while_occupied() {
    let mailbox = FrameMailbox::new();
    let f1 = frame(1);
    let f2 = frame(2);

    assert_eq!(mailbox.try_put(f1), PutOutcome::Stored);
    assert_eq!(mailbox.try_put(f2), PutOutcome::Dropped(frame(2)));
    assert_eq!(mailbox.try_take(), Some(frame(1)));
    assert_eq!(mailbox.try_take(), None);
}

#[test]
fn test_take_on_empty_mailbox() {
    let mailbox: FrameMailbox = FrameMailbox::new();
    assert!(!mailbox.is_occupied());
    assert_eq!(mailbox.try_take(), None);
}

#[test]
fn test_slot_is_reusable_after_take() {
    let mailbox = FrameMailbox::new();
    assert!(mailbox.try_put(frame(1)).is_accepted());
    assert_eq!(mailbox.try_take(), Some(frame(1)));
    assert!(mailbox.try_put(frame(2)).is_accepted());
    assert!(mailbox.is_occupied());
    assert_eq!(mailbox.try_take(), Some(frame(2)));
}

#[test]
fn test_latest_wins_evicts_pending_frame() {
    let mailbox = FrameMailbox::with_policy(MailboxPolicy::LatestWins);
    assert_eq!(mailbox.policy(), MailboxPolicy::LatestWins);

    assert_eq!(mailbox.try_put(frame(1)), PutOutcome::Stored);
    assert_eq!(mailbox.try_put(frame(2)), PutOutcome::Replaced(frame(1)));
    assert_eq!(mailbox.try_take(), Some(frame(2)));
    assert_eq!(mailbox.try_take(), None);
}

#[test]
fn test_default_policy_is_drop_newest() {
    let mailbox: FrameMailbox = FrameMailbox::default();
    assert_eq!(mailbox.policy(), MailboxPolicy::DropNewest);
}

#[test]
fn test_counters() {
    let mailbox = FrameMailbox::new();
    let _ = mailbox.try_put(frame(1));
    let _ = mailbox.try_put(frame(2));
    let _ = mailbox.try_put(frame(3));
    let _ = mailbox.try_take();
    let _ = mailbox.try_put(frame(4));

    assert_eq!(mailbox.accepted_count(), 2);
    assert_eq!(mailbox.dropped_count(), 2);

    let latest = FrameMailbox::with_policy(MailboxPolicy::LatestWins);
    let _ = latest.try_put(frame(1));
    let _ = latest.try_put(frame(2));
    assert_eq!(latest.accepted_count(), 2);
    assert_eq!(latest.dropped_count(), 1);
}

#[test]
fn test_generic_payload() {
    let mailbox = FrameMailbox::<u32>::new();
    assert_eq!(mailbox.try_put(7), PutOutcome::Stored);
    assert_eq!(mailbox.try_put(8), PutOutcome::Dropped(8));
    assert_eq!(mailbox.try_take(), Some(7));
}

#[test]
fn test_each_frame_is_taken_at_most_once() {
    const FRAMES: u32 = 10_000;
    let mailbox = Arc::new(FrameMailbox::<u32>::new());

    let producer = {
        let mailbox = Arc::clone(&mailbox);
        thread::spawn(move || {
            let mut stored = Vec::new();
            for i in 0..FRAMES {
                if let PutOutcome::Stored = mailbox.try_put(i) {
                    stored.push(i);
                }
            }
            stored
        })
    };

    let mut taken = Vec::new();
    loop {
        if let Some(i) = mailbox.try_take() {
            taken.push(i);
        } else if producer.is_finished() && !mailbox.is_occupied() {
            break;
        }
    }
    let stored = producer.join().unwrap();
    if let Some(i) = mailbox.try_take() {
        taken.push(i);
    }

    // every stored frame comes out exactly once, in order
    assert_eq!(taken, stored);
}

#[test]
fn test_hand_off_moves_pixels_without_copying() {
    let mailbox = FrameMailbox::new();
    let stored = frame(1);
    let stored_ptr = stored.pixels().as_ptr();
    let offered = frame(2);
    let offered_ptr = offered.pixels().as_ptr();

    assert_eq!(mailbox.try_put(stored), PutOutcome::Stored);
    match mailbox.try_put(offered) {
        PutOutcome::Dropped(back) => assert_eq!(back.pixels().as_ptr(), offered_ptr),
        other => panic!("expected the offered frame back, got {other:?}"),
    }

    let taken = mailbox.try_take().unwrap();
    assert_eq!(taken.pixels().as_ptr(), stored_ptr);
}

#[test]
fn test_evicted_frame_keeps_its_buffer() {
    let mailbox = FrameMailbox::with_policy(MailboxPolicy::LatestWins);
    let first = frame(1);
    let first_ptr = first.pixels().as_ptr();
    let second = frame(2);
    let second_ptr = second.pixels().as_ptr();

    let _ = mailbox.try_put(first);
    match mailbox.try_put(second) {
        PutOutcome::Replaced(evicted) => assert_eq!(evicted.pixels().as_ptr(), first_ptr),
        other => panic!("expected the pending frame back, got {other:?}"),
    }
    assert_eq!(mailbox.try_take().unwrap().pixels().as_ptr(), second_ptr);
}
