use std::sync::Arc;

use plotboard::ChartError;
use plotboard::core::{ImageRef, RecordSet, Scalar};
use plotboard::extensions::{DemoData, ImageResolver, RecordImageResolver};

fn wheels() -> Arc<RecordSet> {
    Arc::new(
        RecordSet::from_rows(
            &["wheels", "color", "image"],
            vec![
                vec![1.into(), "red".into(), "redwheels1.png".into()],
                vec![2.into(), "blue".into(), "bluewheels2.png".into()],
            ],
        )
        .expect("wheels"),
    )
}

#[test]
fn resolves_matching_file_to_data_uri() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("bluewheels2.png"), b"\x89PNG").expect("write image");

    let resolver = RecordImageResolver::new(wheels(), "image", dir.path());
    let keys = [("wheels", Scalar::from(2)), ("color", Scalar::from("blue"))];
    assert_eq!(resolver.file_name(&keys).expect("file name"), "bluewheels2.png");

    let image = resolver.resolve(&keys).expect("resolve");
    assert_eq!(image, ImageRef::from_png_bytes(b"\x89PNG"));
    assert!(image.as_str().starts_with("data:image/png;base64,"));
}

#[test]
fn unmatched_keys_and_missing_files_are_missing_images() {
    let dir = tempfile::tempdir().expect("temp dir");
    let resolver = RecordImageResolver::new(wheels(), "image", dir.path()).with_mime("image/gif");

    let err = resolver
        .resolve(&[("wheels", Scalar::from(3)), ("color", Scalar::from("red"))])
        .expect_err("no row");
    assert!(format!("{err}").contains("wheels=3, color=red"));

    let err = resolver
        .resolve(&[("wheels", Scalar::from(1)), ("color", Scalar::from("red"))])
        .expect_err("file absent");
    assert!(matches!(err, ChartError::MissingImage { .. }));
}

#[test]
fn demo_data_loads_from_directory() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(
        dir.path().join("gapminder.csv"),
        "country,continent,year,gdpPercap,lifeExp\nChina,Asia,2007,4959.11,72.96\n",
    )
    .expect("gapminder");
    std::fs::write(
        dir.path().join("mpg.csv"),
        "mpg,cylinders,displacement,horsepower,weight,acceleration,model_year,name\n\
         18,8,307,130,3504,12,70,chevrolet chevelle malibu\n",
    )
    .expect("mpg");
    std::fs::write(
        dir.path().join("wheels.csv"),
        "wheels,color,image\n1,red,redwheels1.png\n",
    )
    .expect("wheels");
    std::fs::create_dir(dir.path().join("images")).expect("image dir");
    std::fs::write(dir.path().join("images").join("redwheels1.png"), b"png").expect("image");

    let data = DemoData::load(dir.path()).expect("load demo data");
    assert_eq!(data.gapminder.len(), 1);
    assert_eq!(data.mpg.value(0, "year"), Some(&Scalar::from(1970)));
    let image = data
        .images
        .resolve(&[("wheels", Scalar::from(1)), ("color", Scalar::from("red"))])
        .expect("image");
    assert_eq!(image, ImageRef::from_png_bytes(b"png"));

    assert!(DemoData::load(&dir.path().join("nope")).is_err());
}
