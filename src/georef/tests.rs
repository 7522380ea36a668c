//! Tests for CRS parsing, transforms and sidecars

use std::fs;
use tempfile::tempdir;

use super::{Crs, GeoMetadata, GeoReference, GeoTransform};
use crate::error::ConvertError;
use crate::raster::DataType;

#[test]
fn test_crs_text_forms() {
    assert_eq!("EPSG:4326".parse::<Crs>().unwrap(), Crs::Wgs84);
    assert_eq!("epsg:32633".parse::<Crs>().unwrap(), Crs::Utm { zone: 33, north: true });
    assert_eq!("+init=epsg:32733".parse::<Crs>().unwrap(), Crs::Utm { zone: 33, north: false });
    assert_eq!("3035".parse::<Crs>().unwrap(), Crs::Epsg(3035));
    let wkt = r#"PROJCS["WGS 84 / Pseudo-Mercator",GEOGCS["WGS 84",AUTHORITY["EPSG","4326"]],AUTHORITY["EPSG","3857"]]"#;
    assert_eq!(wkt.parse::<Crs>().unwrap(), Crs::WebMercator);
    assert!(matches!("LOCAL_CS[\"x\"]".parse::<Crs>(), Err(ConvertError::InvalidCrs(_))));
}

#[test]
fn test_crs_geographic_and_display() {
    assert!(Crs::Wgs84.is_geographic());
    assert!(!Crs::from_epsg(32633).is_geographic());
    assert!(!Crs::from_epsg(4087).is_geographic());
    assert!(!Crs::from_epsg(4499).is_geographic());
    assert!(Crs::from_epsg(6318).is_geographic());
    assert!(Crs::from_epsg(7844).is_geographic());
    assert!(Crs::from_epsg(4269).is_geographic());
    assert!(!Crs::from_epsg(3035).is_geographic());
    assert_eq!(Crs::from_epsg(32633).to_string(), "EPSG:32633");
    assert_eq!(Crs::from_epsg(32633).description(), "UTM Zone 33N (EPSG:32633)");
}

#[test]
fn test_transform_json_accepts_six_or_nine_values() {
    let nine: GeoTransform = serde_json::from_str("[10, 0, 500000, 0, -10, 4000000, 0, 0, 1]").unwrap();
    let six: GeoTransform = serde_json::from_str("[10, 0, 500000, 0, -10, 4000000]").unwrap();
    assert_eq!(nine, six);
    assert_eq!(serde_json::to_string(&six).unwrap(), "[10.0,0.0,500000.0,0.0,-10.0,4000000.0,0.0,0.0,1.0]");
    assert!(serde_json::from_str::<GeoTransform>("[1, 0, 0, 0, 1, 0, 0, 1, 1]").is_err());
    assert!(serde_json::from_str::<GeoTransform>("[1, 0, 0]").is_err());
}

#[test]
fn test_transform_geometry() {
    let t = GeoTransform::from_origin(500000.0, 4000000.0, 10.0, 10.0);
    assert_eq!(t.apply(1.0, 2.0), (500010.0, 3999980.0));
    assert!(t.is_rectilinear());
    assert_eq!(t.translate_pixels(-0.5, -0.5).apply(0.0, 0.0), (499995.0, 4000005.0));
    assert!(!GeoTransform::new(1.0, 0.5, 0.0, 0.0, -1.0, 0.0).is_rectilinear());
}

#[test]
fn test_sidecar_round_trip_and_defaults() {
    let dir = tempdir().unwrap();
    let georef = GeoReference::new(GeoTransform::from_origin(10.0, 50.0, 0.5, 0.5), Some(Crs::Wgs84), Some(-1.0));
    let metadata = GeoMetadata::new(DataType::Uint16, 40, 30, 3, &georef);

    let path = GeoMetadata::sidecar_path(dir.path(), "nested/tile.png");
    assert_eq!(path, dir.path().join("nested").join("tile.json"));
    metadata.save(&path).unwrap();
    let loaded = GeoMetadata::load(&path).unwrap();
    assert_eq!(loaded, metadata);
    assert_eq!(loaded.georeference(), georef);

    let minimal = dir.path().join("minimal.json");
    fs::write(&minimal, r#"{"dtype": "uint8", "width": 2, "height": 2, "count": 1,
        "crs": {"init": "epsg:3857"}, "transform": [1, 0, 0, 0, -1, 0]}"#).unwrap();
    let loaded = GeoMetadata::load(&minimal).unwrap();
    assert_eq!(loaded.driver, "GTiff");
    assert_eq!(loaded.nodata, None);
    assert_eq!(loaded.crs, Some(Crs::WebMercator));
}

#[test]
fn test_missing_and_malformed_sidecars() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    assert!(matches!(GeoMetadata::load(&missing), Err(ConvertError::MissingSidecar(_))));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{\"dtype\": \"uint8\"").unwrap();
    assert!(matches!(GeoMetadata::load(&broken), Err(ConvertError::Json(_))));
}
