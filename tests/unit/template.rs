use super::*;

#[test]
fn defaults_match_deployment_constants() {
    let t = Template::default();
    assert_eq!(t.width, 945.0);
    assert_eq!(t.height, 1299.0);
    assert_eq!(t.mask_center, Point::new(471.5, 567.0));
    assert_eq!(t.mask_radius, 247.0);
    assert_eq!(t.name_y, 980.0);
    assert_eq!(t.font_size, 72.0);
    assert_eq!(t.mask_diameter(), 494.0);
    assert_eq!(t.name_color.to_hex(), "#FAEE65");
    t.validate().unwrap();
}

#[test]
fn partial_json_fills_defaults() {
    let json = br#"{ "mask_radius": 100, "background": "card.svg" }"#;
    let t = Template::from_reader(&json[..]).unwrap();
    assert_eq!(t.mask_radius, 100.0);
    assert_eq!(t.width, TEMPLATE_WIDTH);
    assert_eq!(t.background.as_deref(), Some(std::path::Path::new("card.svg")));
    assert!(t.font.is_none());
}

#[test]
fn unknown_fields_are_rejected() {
    let json = br#"{ "mask_radiuss": 100 }"#;
    let err = Template::from_reader(&json[..]).unwrap_err();
    assert!(err.to_string().contains("serialization error:"));
}

#[test]
fn validate_rejects_bad_geometry() {
    let t = Template {
        width: 0.0,
        ..Template::default()
    };
    assert!(t.validate().is_err());

    let t = Template {
        mask_radius: 600.0,
        ..Template::default()
    };
    assert!(t.validate().is_err());

    let t = Template {
        name_y: 5000.0,
        ..Template::default()
    };
    assert!(t.validate().is_err());

    let t = Template {
        fit_margin: -1.0,
        ..Template::default()
    };
    assert!(t.validate().is_err());
}

#[test]
fn from_path_reports_missing_file() {
    let err = Template::from_path("/definitely/not/here/template.json").unwrap_err();
    assert!(err.to_string().contains("open template JSON"));
}
