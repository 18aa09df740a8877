use detdecode::{
    decode_outputs, DecodeConfig, Decoder, DetectError, LabelMap, OwnedTensor, Rect, ShapeError,
    TensorView,
};

#[test]
fn decode_outputs_reads_coordinates_then_confidence() {
    let coords = OwnedTensor::new(vec![0.5f64, 0.5, 0.2, 0.2], 1, 4).unwrap();
    // Same element type for both outputs, as a runtime hands them over.
    let conf = OwnedTensor::new(vec![0.05f64, 0.7, 0.1, 0.0], 1, 4).unwrap();

    let out = decode_outputs(&[coords.view(), conf.view()], &DecodeConfig::default()).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].label_index, 1);
}

#[test]
fn decode_outputs_reports_missing_tensors() {
    let coords = OwnedTensor::new(vec![0.5f32, 0.5, 0.2, 0.2], 1, 4).unwrap();

    let err = decode_outputs::<f32>(&[], &DecodeConfig::default()).unwrap_err();
    assert_eq!(
        err,
        DetectError::MissingInput {
            tensor: "coordinates"
        }
    );

    let err = decode_outputs(&[coords.view()], &DecodeConfig::default()).unwrap_err();
    assert_eq!(
        err,
        DetectError::MissingInput {
            tensor: "confidence"
        }
    );
}

#[test]
fn empty_confidence_with_present_coordinates_is_a_mismatch() {
    let conf: [f32; 0] = [];
    let coords = [0.5f32, 0.5, 0.2, 0.2];
    let conf = TensorView::from_slice(&conf, 0, 3).unwrap();
    let coords = TensorView::from_slice(&coords, 1, 4).unwrap();
    let err = Decoder::new().decode(conf, coords).unwrap_err();
    assert_eq!(
        err,
        DetectError::ShapeMismatch(ShapeError::BoxCount {
            confidence: 0,
            coordinates: 1,
        })
    );
}

#[test]
fn malformed_shapes_are_rejected() {
    let conf = [0.9f32, 0.1];
    let coords = [0.5f32, 0.5, 0.2, 0.2, 0.0, 0.0];

    let conf_view = TensorView::from_slice(&conf, 1, 2).unwrap();
    let wide = TensorView::from_slice(&coords, 1, 6).unwrap();
    assert_eq!(
        Decoder::new().decode(conf_view, wide).unwrap_err(),
        DetectError::ShapeMismatch(ShapeError::CoordinateWidth { got: 6 })
    );

    let no_classes = TensorView::from_slice(&conf[..0], 1, 0).unwrap();
    let coords_view = TensorView::from_slice(&coords[..4], 1, 4).unwrap();
    assert_eq!(
        Decoder::new().decode(no_classes, coords_view).unwrap_err(),
        DetectError::ShapeMismatch(ShapeError::NoClasses { boxes: 1 })
    );

    let err = TensorView::from_shape(&conf, &[2], "confidence").unwrap_err();
    assert_eq!(
        err,
        DetectError::ShapeMismatch(ShapeError::Rank {
            tensor: "confidence",
            rank: 1,
        })
    );
}

#[test]
fn invalid_thresholds_fail_before_decoding() {
    let conf = [0.9f32];
    let coords = [0.5f32, 0.5, 0.2, 0.2];
    let decoder = Decoder::new().with_config(DecodeConfig {
        nms_threshold: 1.5,
        ..DecodeConfig::default()
    });
    let err = decoder
        .decode(
            TensorView::from_slice(&conf, 1, 1).unwrap(),
            TensorView::from_slice(&coords, 1, 4).unwrap(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        DetectError::InvalidThreshold {
            name: "nms_threshold",
            value: 1.5,
        }
    );
}

#[test]
fn labeled_decode_attaches_names() {
    let labels = LabelMap::from_lines("person\nbicycle\n");
    let decoder = Decoder::new().with_labels(labels);

    let conf = [0.1f32, 0.8, 0.0, 0.0, 0.0, 0.9];
    let coords = [0.2f32, 0.2, 0.1, 0.1, 0.8, 0.8, 0.1, 0.1];
    let out = decoder
        .decode_labeled(
            TensorView::from_slice(&conf, 2, 3).unwrap(),
            TensorView::from_slice(&coords, 2, 4).unwrap(),
        )
        .unwrap();

    assert_eq!(out.len(), 2);
    // Class 2 is beyond the label list.
    assert_eq!(out[0].prediction.label_index, 2);
    assert_eq!(out[0].label, None);
    assert_eq!(out[1].label, Some("bicycle"));
}

#[test]
fn prediction_box_maps_to_frame_pixels() {
    let conf = [0.9f64];
    let coords = [0.5f64, 0.5, 0.5, 0.25];
    let out = Decoder::new()
        .decode(
            TensorView::from_slice(&conf, 1, 1).unwrap(),
            TensorView::from_slice(&coords, 1, 4).unwrap(),
        )
        .unwrap();
    let pixels = out[0].bounding_box.to_pixels(640.0, 480.0);
    assert_eq!(pixels, Rect::new(160.0, 180.0, 320.0, 120.0));
}
