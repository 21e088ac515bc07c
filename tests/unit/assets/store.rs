use super::*;

#[test]
fn normalize_rel_path_cleans_and_rejects() {
    assert_eq!(normalize_rel_path("a/./b//c.svg").unwrap(), "a/b/c.svg");
    assert_eq!(normalize_rel_path("fonts\\card.ttf").unwrap(), "fonts/card.ttf");
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("/etc/passwd").is_err());
    assert!(normalize_rel_path("../secret.png").is_err());
    assert!(normalize_rel_path("./.").is_err());
}

#[test]
fn template_without_resources_loads_empty_assets() {
    let assets = CardAssets::load(&Template::default(), Path::new(".")).unwrap();
    assert!(assets.background.is_none());
    assert!(assets.font.is_none());
}

#[test]
fn load_reads_svg_background_and_font_bytes() {
    let dir = std::env::temp_dir().join(format!("cardframe-store-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("card.svg"),
        br#"<svg xmlns="http://www.w3.org/2000/svg" width="945" height="1299"><rect width="945" height="1299" fill="red"/></svg>"#,
    )
    .unwrap();
    std::fs::write(dir.join("name.ttf"), b"font-bytes").unwrap();

    let template = Template {
        background: Some(PathBuf::from("card.svg")),
        font: Some(PathBuf::from("./name.ttf")),
        ..Template::default()
    };
    let assets = CardAssets::load(&template, &dir).unwrap();
    assert!(matches!(assets.background, Some(Background::Svg(_))));
    assert_eq!(assets.font.as_deref().map(Vec::as_slice), Some(&b"font-bytes"[..]));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_background_reports_path() {
    let template = Template {
        background: Some(PathBuf::from("nope.png")),
        ..Template::default()
    };
    let err = CardAssets::load(&template, Path::new("/nonexistent-root")).unwrap_err();
    assert!(err.to_string().contains("nope.png"), "{err}");
}
