use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::*;

fn board() -> CardBoard {
    CardBoard::new(Arc::new(RiddleCatalog::builtin().unwrap()))
}

fn settle(board: &mut CardBoard) {
    board.advance(BoardTiming::default().total());
}

#[test]
fn selecting_draws_a_riddle_of_the_card_color() {
    let mut b = board();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let ClickOutcome::Selected { riddle } = b.click(2, &mut rng) else {
        panic!("expected selection");
    };
    assert_eq!(riddle.color, Color::Yellow);
    assert_eq!(b.selected(), Some(2));
    assert_eq!(b.card(2).unwrap().riddle.as_ref(), Some(&riddle));
    assert!(!b.is_browsing());
}

#[test]
fn other_cards_are_locked_while_one_is_selected() {
    let mut b = board();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    b.click(0, &mut rng);
    for i in 1..4 {
        assert_eq!(b.click(i, &mut rng), ClickOutcome::Locked);
    }
    settle(&mut b);
    assert_eq!(b.click(3, &mut rng), ClickOutcome::Locked);
    assert_eq!(b.cards().iter().filter(|c| c.selected).count(), 1);
}

#[test]
fn flip_toggles_after_grow_delay_then_reveals() {
    let mut b = board();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    b.click(1, &mut rng);

    b.advance(Duration::from_millis(399));
    assert!(!b.card(1).unwrap().flipped);

    b.advance(Duration::from_millis(1));
    assert!(b.card(1).unwrap().flipped);
    assert!(matches!(b.card(1).unwrap().phase, CardPhase::Selecting { .. }));

    b.advance(Duration::from_millis(600));
    assert_eq!(b.card(1).unwrap().phase, CardPhase::Revealed);
    assert!(b.card(1).unwrap().flipped);
}

#[test]
fn clicks_during_animation_are_ignored() {
    let mut b = board();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    b.click(1, &mut rng);
    b.advance(Duration::from_millis(500));
    assert_eq!(b.click(1, &mut rng), ClickOutcome::Animating);
    assert!(b.card(1).unwrap().flipped);
}

#[test]
fn reclicking_revealed_card_toggles_flip_but_stays_selected() {
    let mut b = board();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    b.click(0, &mut rng);
    settle(&mut b);
    let riddle = b.card(0).unwrap().riddle.clone();

    assert_eq!(b.click(0, &mut rng), ClickOutcome::Toggling);
    settle(&mut b);
    let card = b.card(0).unwrap();
    assert!(!card.flipped);
    assert!(card.selected);
    assert_eq!(card.riddle, riddle);
    assert_eq!(b.selected(), Some(0));
}

#[test]
fn reset_restores_every_card_from_any_state() {
    let mut b = board();
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    b.reset();
    assert!(b.cards().iter().all(|c| !c.flipped && !c.selected));

    b.click(3, &mut rng);
    b.advance(Duration::from_millis(450));
    b.reset();
    assert!(b.cards().iter().all(|c| !c.flipped && !c.selected));
    assert!(b.cards().iter().all(|c| c.phase == CardPhase::Idle && c.riddle.is_none()));
    assert_eq!(b.selected(), None);

    assert!(matches!(b.click(1, &mut rng), ClickOutcome::Selected { .. }));
}

#[test]
fn advance_without_selection_is_a_noop() {
    let mut b = board();
    b.advance(Duration::from_secs(5));
    assert!(b.cards().iter().all(|c| c.phase == CardPhase::Idle));
}

#[test]
fn out_of_range_click() {
    let mut b = board();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    assert_eq!(b.click(9, &mut rng), ClickOutcome::OutOfRange);
    assert_eq!(b.selected(), None);
}
