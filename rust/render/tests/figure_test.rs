// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use cylfit_core::{Point3, PointCloud};
use cylfit_geometry::{compute_deviations, CylinderModel, Vector3};
use cylfit_render::{palette, render_deviations, render_points, save_png, RenderOptions};

fn bumpy_cylinder() -> (PointCloud, CylinderModel) {
    let model = CylinderModel::new(Point3::origin(), 3.0, Vector3::z_axis());
    let cloud = (0..400)
        .map(|i| {
            let angle = i as f64 * 0.11;
            let p = model.surface_point(angle, (i % 20) as f64 * 0.5);
            p + model.perpendicular(&p).normalize() * (0.2 * (2.0 * angle).cos())
        })
        .collect();
    (cloud, model)
}

#[test]
fn test_figures_are_written_as_png() {
    let dir = tempfile::tempdir().unwrap();
    let (cloud, model) = bumpy_cylinder();
    let deviations = compute_deviations(&cloud, &model);
    let options = RenderOptions {
        width: 320,
        height: 240,
        ..Default::default()
    };

    let scan = render_points(&cloud, palette::SCAN, &options).unwrap();
    let colored = render_deviations(&cloud, &deviations, &options).unwrap();

    let scan_path = dir.path().join("scan.png");
    let deviation_path = dir.path().join("deviation.png");
    save_png(&scan, &scan_path).unwrap();
    save_png(&colored, &deviation_path).unwrap();

    for path in [&scan_path, &deviation_path] {
        let decoded = image::open(path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (320, 240));
    }
    let decoded = image::open(&scan_path).unwrap().to_rgb8();
    assert!(decoded.pixels().any(|p| *p == palette::SCAN));
}

#[test]
fn test_save_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (cloud, _) = bumpy_cylinder();
    let figure = render_points(&cloud, palette::CORRECTED, &RenderOptions::default()).unwrap();

    assert!(save_png(&figure, dir.path().join("missing").join("out.png")).is_err());
}
