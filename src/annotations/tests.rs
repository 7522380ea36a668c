//! Tests for the CVAT parser, mask decoding and label numbering

use super::parser::{parse_hex_color, parse_points};
use super::{decode_rle, parse_cvat_str, parse_rle, LabelMap, Shape};

const EXPORT: &str = r##"<?xml version="1.0" encoding="utf-8"?>
<annotations>
  <version>1.1</version>
  <meta>
    <task>
      <name>fields</name>
      <labels>
        <label>
          <name>crop</name>
          <color>#33ddff</color>
          <attributes>
            <attribute><name>stage</name><values>early</values></attribute>
          </attributes>
        </label>
        <label>
          <name>water</name>
          <color>#0000ff</color>
          <attributes/>
        </label>
      </labels>
    </task>
  </meta>
  <image id="0" name="tiles/tile1.png" width="100" height="80">
    <box label="crop" occluded="0" source="manual" xtl="10.00" ytl="10.00" xbr="50.00" ybr="50.00" z_order="0"/>
    <polygon label="water" occluded="0" points="30.0,30.0;70.0,30.0;70.0,70.0;30.0,70.0" z_order="0">
      <attribute name="depth">deep</attribute>
    </polygon>
    <polyline label="crop" points="1,1;2,2"/>
    <mask label="road" rle="3, 2, 4" left="5" top="6" width="3" height="3" z_order="1"/>
    <tag label="crop"/>
  </image>
  <image id="1" name="tile2.png" width="20" height="20">
  </image>
  <track id="0" label="crop">
    <box frame="0" xtl="1" ytl="1" xbr="2" ybr="2" outside="0"/>
  </track>
</annotations>
"##;

#[test]
fn test_parses_labels_images_and_shapes_in_order() {
    let set = parse_cvat_str(EXPORT).unwrap();

    let names: Vec<&str> = set.labels.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["crop", "water"]);
    assert_eq!(set.labels[0].color, Some([0x33, 0xdd, 0xff]));

    assert_eq!(set.images.len(), 2);
    let image = &set.images[0];
    assert_eq!((image.name.as_str(), image.width, image.height), ("tiles/tile1.png", 100, 80));

    let kinds: Vec<&str> = image.annotations.iter().map(|a| a.shape.kind()).collect();
    assert_eq!(kinds, vec!["box", "polygon", "mask"]);
    assert_eq!(image.annotations[0].shape, Shape::Box {
        xtl: 10.0, ytl: 10.0, xbr: 50.0, ybr: 50.0, rotation: 0.0,
    });
    assert_eq!(image.annotations[2].shape, Shape::Mask {
        rle: vec![3, 2, 4], left: 5, top: 6, width: 3, height: 3,
    });
    assert!(set.images[1].annotations.is_empty());
}

#[test]
fn test_box_rotation_is_read() {
    let xml = r#"<annotations><image name="a.png" width="4" height="4">
        <box label="x" xtl="0" ytl="0" xbr="2" ybr="2" rotation="45.5"/>
        </image></annotations>"#;
    let set = parse_cvat_str(xml).unwrap();
    match &set.images[0].annotations[0].shape {
        Shape::Box { rotation, .. } => assert_eq!(*rotation, 45.5),
        other => panic!("unexpected shape {:?}", other),
    }
}

#[test]
fn test_missing_shape_attribute_is_error() {
    let xml = r#"<annotations><image name="a.png" width="4" height="4">
        <box label="x" xtl="0" ytl="0" xbr="2"/>
        </image></annotations>"#;
    let err = parse_cvat_str(xml).unwrap_err();
    assert!(err.to_string().contains("ybr"));
}

#[test]
fn test_unparseable_coordinate_is_error() {
    let xml = r#"<annotations><image name="a.png" width="4" height="4">
        <polygon label="x" points="0,0;1,abc;2,2"/>
        </image></annotations>"#;
    assert!(parse_cvat_str(xml).is_err());
}

#[test]
fn test_malformed_xml_is_error() {
    assert!(parse_cvat_str("<annotations><image name=\"a\" width=\"1\" height=\"1\"></annotations>").is_err());
    assert!(parse_cvat_str("<annotations><image name=\"a\" width=\"1\" height=\"1\">").is_err());
}

#[test]
fn test_hex_colors() {
    assert_eq!(parse_hex_color("#ff8000"), Some([255, 128, 0]));
    assert_eq!(parse_hex_color(" #FF8000 "), Some([255, 128, 0]));
    assert_eq!(parse_hex_color("ff8000"), None);
    assert_eq!(parse_hex_color("#ff80"), None);
    assert_eq!(parse_hex_color("#gg8000"), None);
}

#[test]
fn test_points_parse_with_trailing_separator() {
    assert_eq!(parse_points("1,2;3.5,4;").unwrap(), vec![(1.0, 2.0), (3.5, 4.0)]);
    assert!(parse_points("1;2").is_err());
}

#[test]
fn test_rle_decodes_alternating_runs() {
    let runs = parse_rle("3, 2, 4").unwrap();
    let mask = decode_rle(&runs, 3, 3);
    let expected = [false, false, false, true, true, false, false, false, false];
    assert_eq!(mask, expected.to_vec());
}

#[test]
fn test_rle_empty_and_overlong() {
    assert!(parse_rle("").unwrap().is_empty());
    assert_eq!(decode_rle(&[], 2, 2), vec![false; 4]);
    // 1 background, then 10 foreground on a 2x2 mask
    assert_eq!(decode_rle(&[1, 10], 2, 2), vec![false, true, true, true]);
    assert!(parse_rle("1, x").is_err());
}

#[test]
fn test_label_map_numbers_declared_then_undeclared() {
    let set = parse_cvat_str(EXPORT).unwrap();
    let labels = LabelMap::build(&set).unwrap();

    assert_eq!(labels.len(), 3);
    assert_eq!(labels.value_of("crop"), Some(1));
    assert_eq!(labels.value_of("water"), Some(2));
    assert_eq!(labels.value_of("road"), Some(3));
    assert_eq!(labels.value_of("sky"), None);

    let palette = labels.palette().unwrap();
    assert_eq!(palette[0], [0, 0, 0]);
    assert_eq!(palette[2], [0, 0, 255]);
    assert_eq!(palette[3], [0, 0, 0]);
}

#[test]
fn test_label_map_rejects_more_than_255_labels() {
    let labels: String = (0..256)
        .map(|i| format!("<label><name>class{}</name></label>", i))
        .collect();
    let xml = format!("<annotations><meta><task><labels>{}</labels></task></meta></annotations>", labels);
    let set = parse_cvat_str(&xml).unwrap();
    assert!(LabelMap::build(&set).is_err());
    assert!(LabelMap::build(&set).unwrap_err().to_string().contains("256"));
    assert_eq!(set.labels.len(), 256);
}
