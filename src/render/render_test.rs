use chrono::{TimeZone, Utc};

use super::*;

fn ticket() -> Ticket {
    Ticket::default()
        .with_id(1)
        .with_channel_id("c-1")
        .with_creator("Ann", "u-1")
        .with_topic("Billing")
        .with_transcript_id("abc123def")
        .with_created_at(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
        .with_closed_at(Utc.with_ymd_and_hms(2024, 5, 1, 11, 30, 0).unwrap())
        .with_closed_by_name("Mod1")
}

#[test]
fn test_render_transcript_page() {
    let renderer = Renderer::from_config(&RenderConfig::default()).unwrap();
    let messages = vec![
        Message::new("Ann", "<b>hi</b>")
            .with_timestamp(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()),
    ];

    let page = renderer.render(&ticket(), &messages);
    assert!(page.contains("&lt;b&gt;hi&lt;/b&gt;"));
    assert!(!page.contains("<b>hi</b>"));
    assert!(page.contains("Ticket #abc123<"));
    assert!(!page.contains("abc123def"));
    assert!(page.contains("Billing"));
    assert!(page.contains("<dd>Ann</dd>"));
    assert!(page.contains("<dd>Mod1</dd>"));
    assert!(page.contains("<dd>01.05.2024, 10:00:00</dd>"));
    assert!(page.contains("<dd>01.05.2024, 11:30:00</dd>"));
    assert!(!page.contains("%%TICKET_"));
}

#[test]
fn test_render_uses_configured_options() {
    let config = RenderConfig {
        timestamp_format: "%Y-%m-%d %H:%M".to_string(),
        utc_offset_minutes: 90,
        default_avatar: "https://example.com/fallback.png".to_string(),
        ..RenderConfig::default()
    };
    let renderer = Renderer::from_config(&config).unwrap();
    let messages = vec![
        Message::new("Ann", "hi").with_timestamp(Utc.with_ymd_and_hms(2024, 5, 1, 23, 0, 0).unwrap()),
    ];

    let page = renderer.render(&ticket(), &messages);
    assert!(page.contains("2024-05-02 00:30"));
    assert!(page.contains("https://example.com/fallback.png"));
}

#[test]
fn test_template_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ticket.html");
    std::fs::write(&path, "<title>%%TICKET_TOPIC%%</title><ul>%%TICKET_MESSAGES%%</ul>").unwrap();

    let config = RenderConfig {
        template_path: Some(path.to_string_lossy().to_string()),
        ..RenderConfig::default()
    };
    let renderer = Renderer::from_config(&config).unwrap();
    let page = renderer.render(&ticket(), &[]);
    assert_eq!(page, "<title>Billing</title><ul></ul>");
}

#[test]
fn test_invalid_config() {
    let config = RenderConfig {
        template_path: Some("/nonexistent/ticket.html".to_string()),
        ..RenderConfig::default()
    };
    assert!(Renderer::from_config(&config).is_err());

    let config = RenderConfig {
        timestamp_format: "%Q".to_string(),
        ..RenderConfig::default()
    };
    assert!(Renderer::from_config(&config).is_err());

    for utc_offset_minutes in [24 * 60, -24 * 60, i32::MAX, i32::MIN] {
        let config = RenderConfig {
            utc_offset_minutes,
            ..RenderConfig::default()
        };
        assert!(Renderer::from_config(&config).is_err(), "{utc_offset_minutes}");
    }
}
