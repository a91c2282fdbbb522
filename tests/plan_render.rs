use serde_json::json;

use yardkit::plan::{PlanRenderOpts, load_config, render_plan, validate_and_fix};

fn near(a: [u8; 4], b: [u8; 3], tol: i32) -> bool {
    a.iter()
        .zip(b)
        .all(|(&x, y)| (i32::from(x) - i32::from(y)).abs() <= tol)
}

fn small_plan() -> serde_json::Value {
    json!({
        "title": "Test Garden",
        "canvas": {"width": 400, "height": 300, "margin": 40, "bg_color": "#FDFBF8"},
        "house": {"rect": [0.0, 0.0, 0.5, 0.5]},
        "zones": [
            {"id": "lawn", "rect": [0.6, 0.6, 0.3, 0.3], "style_preset": "lawn",
             "name_cn": "草坪", "name_en": "Lawn"}
        ],
        "paths": [{"points": [[0.5, 0.25], [0.9, 0.25]]}],
        "features": [{"type": "tree", "position": [0.8, 0.2], "size": 0.05}]
    })
}

#[test]
fn background_and_house_colors_land_where_expected() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("plan.png");

    let repair = validate_and_fix(small_plan());
    assert!(repair.errors.is_empty(), "{:?}", repair.errors);
    let cfg = repair.into_config().unwrap();

    let opts = PlanRenderOpts {
        dpi: 100,
        ..PlanRenderOpts::default()
    };
    let outcome = render_plan(&cfg, &out, &opts).unwrap();
    assert_eq!((outcome.width, outcome.height), (400, 300));

    let img = image::open(&out).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (400, 300));
    assert!(near(img.get_pixel(2, 2).0, [0xFD, 0xFB, 0xF8], 1));
    assert!(near(img.get_pixel(397, 297).0, [0xFD, 0xFB, 0xF8], 1));
    // House spans x 40..200, y 40..150; stay clear of the outline and the centred label.
    assert!(near(img.get_pixel(60, 60).0, [0xC5, 0xB4, 0xA5], 3));
}

#[test]
fn dpi_scales_the_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("plan.png");
    let cfg = validate_and_fix(small_plan()).into_config().unwrap();

    let opts = PlanRenderOpts {
        dpi: 200,
        ..PlanRenderOpts::default()
    };
    let outcome = render_plan(&cfg, &out, &opts).unwrap();
    assert_eq!((outcome.width, outcome.height), (800, 600));
    assert_eq!(image::image_dimensions(&out).unwrap(), (800, 600));
}

#[test]
fn yaml_config_loads_and_repairs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garden.yaml");
    std::fs::write(
        &path,
        "title: Yard\ncanvas: {width: 300, height: 200}\nhouse: {}\n",
    )
    .unwrap();

    let repair = validate_and_fix(load_config(&path).unwrap());
    assert!(!repair.is_fatal(), "{:?}", repair.errors);
    assert!(repair.fixes.iter().any(|f| f.contains("'zones'")));
    assert!(repair.fixes.iter().any(|f| f.contains("'rect'")));

    let cfg = repair.into_config().unwrap();
    assert_eq!(cfg.canvas.margin, 40.0);
    assert!(cfg.zones.is_empty());
}

#[test]
fn missing_or_unknown_config_files_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_config(&dir.path().join("nope.yaml")).is_err());

    let toml = dir.path().join("garden.toml");
    std::fs::write(&toml, "title = 'x'").unwrap();
    let err = load_config(&toml).unwrap_err().to_string();
    assert!(err.contains("unsupported"), "{err}");
}
