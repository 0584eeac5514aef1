use super::*;
use crate::catalog::Suit;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let pairs: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

#[test]
fn empty_object_is_the_default_config() {
    let cfg = AppConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, AppConfig::default());
    assert_eq!(cfg.encode_timeout(), Duration::from_secs(10));
    assert_eq!(cfg.share.meta.title, "GDG Noida Riddle Card");
    assert!(cfg.share.command_share().is_none());
}

#[test]
fn partial_theme_keeps_other_defaults() {
    let cfg = AppConfig::from_json_str(
        r##"{
            "theme": { "palette": { "red": "#ff0000" }, "format": "jpeg" },
            "share": { "title": "Riddles", "command": { "program": "xdg-open" } },
            "camera": { "ready_timeout_ms": 500 }
        }"##,
    )
    .unwrap();
    assert_eq!(cfg.theme.palette.red, Rgba8::rgb(0xff, 0, 0));
    assert_eq!(cfg.theme.palette.blue, Rgba8::rgb(0x42, 0x85, 0xf4));
    assert_eq!(cfg.theme.format, OutputFormat::Jpeg);
    assert_eq!(cfg.share.meta.title, "Riddles");
    assert_eq!(cfg.share.meta.text, "Check out this riddle from GDG Noida!");
    assert_eq!(cfg.capture_settings().ready_timeout, Duration::from_millis(500));
    assert_eq!(cfg.capture_settings().ready_poll, Duration::from_millis(100));

    let share = cfg.share.command_share().unwrap();
    assert_eq!(share.program, PathBuf::from("xdg-open"));
}

#[test]
fn request_uses_palette_accent() {
    let mut theme = ThemeConfig::default();
    theme.palette.green = Rgba8::rgb(1, 2, 3);
    let riddle = Riddle {
        color: Color::Green,
        suit: Suit::Club,
        question: "q".to_owned(),
        answer: String::new(),
    };
    let req = theme.request_for(&riddle);
    assert_eq!(req.accent, Rgba8::rgb(1, 2, 3));
    assert_eq!(req.canvas, Canvas::STORY);
    assert_eq!(req.filename(&theme.filename_prefix), "gdg-riddle-green-club.png");
}

#[test]
fn rejects_bad_values() {
    assert!(AppConfig::from_json_str(r#"{"theme":{"quality":1.5}}"#).is_err());
    assert!(AppConfig::from_json_str(r#"{"theme":{"filename_prefix":"a/b"}}"#).is_err());
    assert!(AppConfig::from_json_str(r#"{"encode":{"timeout_ms":0}}"#).is_err());
    assert!(matches!(
        AppConfig::from_json_str("{not json"),
        Err(RiddleError::Serde(_))
    ));
}

#[test]
fn env_overrides_apply_and_ignore_garbage() {
    let mut cfg = AppConfig::default();
    cfg.apply_env_overrides(env(&[
        (ENV_FONT, "/fonts/Inter.ttf"),
        (ENV_ENCODE_TIMEOUT_MS, "2500"),
        (ENV_READY_TIMEOUT_MS, "soon"),
    ]));
    assert_eq!(cfg.fonts.regular, Some(PathBuf::from("/fonts/Inter.ttf")));
    assert_eq!(cfg.encode.timeout_ms, 2500);
    assert_eq!(cfg.camera.ready_timeout_ms, 3000);
}

#[test]
fn gradient_end_follows_configured_background() {
    let riddle = Riddle {
        color: Color::Blue,
        suit: Suit::Heart,
        question: "q".to_owned(),
        answer: String::new(),
    };

    let cfg = AppConfig::from_json_str(r##"{"theme":{"background":"#202020"}}"##).unwrap();
    let req = cfg.theme.request_for(&riddle);
    assert_eq!(req.background, Rgba8::rgb(0x20, 0x20, 0x20));
    assert!(req.background_end.r < req.background.r);
    assert_eq!(req.background_end, Rgba8::rgb(0x20, 0x20, 0x20).darken(BACKGROUND_SHADE));

    let stock = ThemeConfig::default().request_for(&riddle);
    assert_eq!(stock.background_end, Rgba8::rgb(0xf8, 0xf8, 0xf8));

    let cfg = AppConfig::from_json_str(
        r##"{"theme":{"background":"#202020","background_end":"#ff0000"}}"##,
    )
    .unwrap();
    assert_eq!(cfg.theme.request_for(&riddle).background_end, Rgba8::rgb(0xff, 0, 0));
}
