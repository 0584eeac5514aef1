use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::*;

#[test]
fn builtin_catalog_loads_all_sixteen_riddles() {
    let catalog = RiddleCatalog::builtin().unwrap();
    assert_eq!(catalog.iter().count(), 16);
    assert!(catalog.iter().all(|r| !r.question.is_empty()));
}

#[test]
fn colors_are_in_grid_order() {
    let catalog = RiddleCatalog::builtin().unwrap();
    assert_eq!(
        catalog.colors(),
        [Color::Blue, Color::Green, Color::Yellow, Color::Red]
    );
}

#[test]
fn random_riddle_stays_within_color_and_covers_all_suits() {
    let catalog = RiddleCatalog::builtin().unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for color in catalog.colors() {
        let mut seen = BTreeSet::new();
        for _ in 0..200 {
            let r = catalog.random_riddle(color, &mut rng);
            assert_eq!(r.color, color);
            assert_eq!(r, catalog.riddle(color, r.suit));
            seen.insert(r.suit);
        }
        assert_eq!(seen.len(), 4, "color {color} did not cover every suit");
    }
}

#[test]
fn blue_heart_is_the_map_riddle() {
    let catalog = RiddleCatalog::builtin().unwrap();
    let r = catalog.riddle(Color::Blue, Suit::Heart);
    assert!(r.question.starts_with("Cities but no houses"));
    assert_eq!(r.answer, "Map");
}

#[test]
fn unknown_color_name_is_a_validation_error() {
    let catalog = RiddleCatalog::builtin().unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let err = catalog.random_riddle_named("purple", &mut rng).unwrap_err();
    assert!(matches!(err, RiddleError::Validation(_)));
    assert!(catalog.random_riddle_named("YELLOW", &mut rng).is_ok());
}

#[test]
fn replacement_table_must_be_complete() {
    let err = RiddleCatalog::from_json_str(r#"{"blue": {"spade": {"question": "q"}}}"#)
        .unwrap_err();
    assert!(err.to_string().contains("missing blue/club"));
}

#[test]
fn replacement_table_rejects_empty_questions() {
    let mut table = serde_json::Map::new();
    for color in Color::ALL {
        let mut suits = serde_json::Map::new();
        for suit in Suit::ALL {
            suits.insert(
                suit.to_string(),
                serde_json::json!({ "question": format!("{color} {suit}?") }),
            );
        }
        table.insert(color.to_string(), serde_json::Value::Object(suits));
    }
    table["red"]["club"] = serde_json::json!({ "question": "  " });

    let err = RiddleCatalog::from_json_str(&serde_json::Value::Object(table).to_string())
        .unwrap_err();
    assert!(err.to_string().contains("red/club"));
}

#[test]
fn replacement_table_swaps_content_and_defaults_answer() {
    let mut table = serde_json::Map::new();
    for color in Color::ALL {
        let mut suits = serde_json::Map::new();
        for suit in Suit::ALL {
            suits.insert(
                suit.to_string(),
                serde_json::json!({ "question": format!("{color} {suit}?") }),
            );
        }
        table.insert(color.to_string(), serde_json::Value::Object(suits));
    }

    let catalog =
        RiddleCatalog::from_json_str(&serde_json::Value::Object(table).to_string()).unwrap();
    let r = catalog.riddle(Color::Green, Suit::Diamond);
    assert_eq!(r.question, "green diamond?");
    assert_eq!(r.answer, "");
}

#[test]
fn suit_glyphs_and_ink() {
    assert_eq!(Suit::Spade.glyph(), '♠');
    assert_eq!(Suit::Diamond.glyph(), '♦');
    assert_eq!(Suit::Club.ink(), Rgba8::BLACK);
    assert_eq!(Suit::Heart.ink(), Rgba8::rgb(0xef, 0x44, 0x44));
}
