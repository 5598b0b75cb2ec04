use approx::assert_abs_diff_eq;
use minc::engine::IMAGE_ATTR_PATH;
use minc::{
    volume_from_data, volume_from_file, volume_from_instance, CopyOptions, DimClass,
    DirectionCosines, Engine, FileEngine, MincError, NumericKind, OpenMode, Volume, VolumeOptions,
};
use ndarray::Array3;
use pretty_assertions::assert_eq;
use std::fs;

mod util;

use util::{gradient, gradient_description, scratch, write_gradient, write_volume, ZYX};

#[test]
fn open_reads_header() {
    let dir = scratch();
    let path = write_gradient(dir.path());

    let volume = volume_from_file(&path, true, &VolumeOptions::new()).unwrap();
    assert!(volume.is_open());
    assert!(volume.is_readonly());
    assert_eq!(volume.volume_type(), Some(NumericKind::Double));
    assert_eq!(volume.dtype(), Some(NumericKind::Double));
    assert_eq!(volume.ndims(), 3);
    assert_eq!(volume.sizes(), vec![12, 20, 30]);
    assert_eq!(volume.dimnames(), ZYX.to_vec());
    assert_eq!(volume.starts(), vec![-10., -20., -30.]);
    assert_eq!(volume.separations(), vec![2., 1., 0.5]);
    assert!(volume.is_data_loadable());
    assert!(!volume.is_data_loaded());
    assert!(volume
        .history()
        .contains(">>> (default history added after minc usage)"));
    assert!(volume.history().ends_with('\n'));
    assert_eq!(volume.valid_range().unwrap(), (0., 1319.));
}

#[test]
fn open_missing_or_garbage_fails() {
    let dir = scratch();
    let garbage = dir.path().join("garbage.mnc");
    fs::write(&garbage, b"definitely not a MINC container").unwrap();

    for path in &[garbage, dir.path().join("missing.mnc")] {
        match Volume::open(path, true, &VolumeOptions::new()) {
            Err(MincError::Open(p, _)) => assert_eq!(&p, path),
            other => panic!("expected an open error, got {:?}", other),
        }
    }
}

#[test]
fn every_kind_survives_write_and_reopen() {
    let dir = scratch();
    // 123 at most, which fits every kind
    let data = gradient((2, 3, 4));
    for &kind in NumericKind::ALL.iter() {
        let name = format!("{}.mnc", kind);
        let path = write_volume(dir.path(), &name, data.clone(), kind);

        let mut volume = volume_from_file(&path, true, &VolumeOptions::new()).unwrap();
        assert_eq!(volume.volume_type(), Some(kind), "type of {}", name);
        let back = volume.data().unwrap().to_reals();
        assert_abs_diff_eq!(back, data.clone().into_dyn(), epsilon = 0.5);
    }
}

#[test]
fn float_data_reads_back_exactly() {
    let dir = scratch();
    let data = gradient((3, 4, 5)).mapv(|v| v / 7.);
    let path = write_volume(dir.path(), "float.mnc", data.clone(), NumericKind::Float);

    let mut volume = volume_from_file(&path, true, &VolumeOptions::new()).unwrap();
    let back = volume.data().unwrap().to_reals();
    let expected = data.mapv(|v| f64::from(v as f32)).into_dyn();
    assert_eq!(back, expected);
}

#[test]
fn close_twice_is_a_no_op() {
    let dir = scratch();
    let path = write_gradient(dir.path());
    let mut volume = volume_from_file(&path, false, &VolumeOptions::new()).unwrap();
    volume.close().unwrap();
    assert!(!volume.is_open());
    volume.close().unwrap();
    // opened for writing, but never created by the volume
    assert!(path.exists());
}

#[test]
fn read_only_volume_refuses_writes() {
    let dir = scratch();
    let path = write_gradient(dir.path());
    let mut volume = volume_from_file(&path, true, &VolumeOptions::new()).unwrap();

    let slab = volume.get_hyperslab(&[0, 0, 0], &[1, 2, 2], None).unwrap();
    assert!(matches!(volume.set_hyperslab(&slab), Err(MincError::ReadOnly(_))));
    assert!(matches!(volume.write_file(), Err(MincError::ReadOnly(_))));
    assert!(matches!(volume.append_history("edit"), Err(MincError::ReadOnly(_))));
    assert!(matches!(volume.set_volume_range(0., 1.), Err(MincError::ReadOnly(_))));
}

#[test]
fn default_cosines_are_exact() {
    let dir = scratch();
    let path = write_gradient(dir.path());
    let volume = volume_from_file(&path, true, &VolumeOptions::new()).unwrap();
    assert_eq!(volume.direction_cosines("xspace"), Some([1., 0., 0.]));
    assert_eq!(volume.direction_cosines("yspace"), Some([0., 1., 0.]));
    assert_eq!(volume.direction_cosines("zspace"), Some([0., 0., 1.]));
    assert_eq!(volume.direction_cosines("time"), None);
}

#[test]
fn explicit_cosines_round_trip() {
    let dir = scratch();
    let path = dir.path().join("oblique.mnc");
    let (s, c) = (0.2f64.sin(), 0.2f64.cos());
    let cosines = DirectionCosines {
        x: [c, s, 0.],
        y: [-s, c, 0.],
        z: [0., 0., 1.],
    };
    let description = gradient_description(NumericKind::Float).cosines(cosines);
    let mut volume =
        volume_from_data(&path, gradient((2, 3, 4)), &description, &VolumeOptions::new()).unwrap();
    volume.write_file().unwrap();

    let volume = volume_from_file(&path, true, &VolumeOptions::new()).unwrap();
    let back = volume.cosines();
    assert_abs_diff_eq!(&back.x[..], &cosines.x[..], epsilon = 1e-8);
    assert_abs_diff_eq!(&back.y[..], &cosines.y[..], epsilon = 1e-8);
    assert_abs_diff_eq!(&back.z[..], &cosines.z[..], epsilon = 1e-8);

    let world = volume.convert_voxel_to_world(&[1., 2., 3.]).unwrap();
    let voxel = volume.convert_world_to_voxel(&world).unwrap();
    assert_abs_diff_eq!(&voxel[..], &[1., 2., 3.][..], epsilon = 1e-9);
}

#[test]
fn coordinates_follow_calibration() {
    let dir = scratch();
    let path = write_gradient(dir.path());
    let volume = volume_from_file(&path, true, &VolumeOptions::new()).unwrap();
    // start + index * step on each axis
    let world = volume.convert_voxel_to_world(&[1., 2., 4.]).unwrap();
    assert_abs_diff_eq!(&world[..], &[-28., -18., -8.][..]);
    assert!(matches!(
        volume.convert_voxel_to_world(&[1., 2.]),
        Err(MincError::Storage(_))
    ));
    assert!(matches!(
        volume.convert_world_to_voxel(&[1.]),
        Err(MincError::Storage(_))
    ));
}

#[test]
fn write_file_marks_image_complete() {
    let dir = scratch();
    let path = write_gradient(dir.path());
    let container = FileEngine::new().open(&path, OpenMode::Read).unwrap();
    let attrs = container.attributes(IMAGE_ATTR_PATH).unwrap();
    assert!(attrs
        .iter()
        .any(|a| a.name == "complete" && a.value == "true"));
}

#[test]
fn explicit_history_replaces_the_default_entry() {
    let dir = scratch();
    let path = dir.path().join("history.mnc");
    let mut volume = volume_from_data(
        &path,
        gradient((2, 2, 2)),
        &gradient_description(NumericKind::Double),
        &VolumeOptions::new(),
    )
    .unwrap();
    volume.append_history("gradient fixture").unwrap();
    volume.write_file().unwrap();

    let volume = volume_from_file(&path, true, &VolumeOptions::new()).unwrap();
    assert_eq!(volume.history(), "gradient fixture\n");
}

#[test]
fn apparent_order_permutes_loaded_data() {
    let dir = scratch();
    let path = write_gradient(dir.path());
    let mut volume = volume_from_file(&path, true, &VolumeOptions::new()).unwrap();
    let zyx = volume.data().unwrap().to_reals();

    volume.set_apparent_dimension_order(&["x", "y", "z"]).unwrap();
    assert_eq!(volume.dimnames(), vec!["xspace", "yspace", "zspace"]);
    assert_eq!(volume.sizes(), vec![30, 20, 12]);
    assert_eq!(volume.separations(), vec![0.5, 1., 2.]);
    let xyz = volume.data().unwrap().to_reals();
    assert_eq!(xyz[&[29, 1, 3][..]], zyx[&[3, 1, 29][..]]);
    assert_eq!(xyz[&[29, 1, 3][..]], 339.);

    // hyperslabs read from the container follow the new order as well
    volume.close().unwrap();
    let mut volume = volume_from_file(&path, true, &VolumeOptions::new()).unwrap();
    volume.set_apparent_dimension_order(&["xspace", "yspace", "zspace"]).unwrap();
    let slab = volume.get_hyperslab(&[29, 1, 3], &[1, 1, 1], None).unwrap();
    assert_eq!(slab.data().mean(), Some(339.));
    assert!(volume.set_apparent_dimension_order(&["x", "t", "z"]).is_err());
}

#[test]
fn label_volumes_default_to_unsigned_types() {
    let dir = scratch();
    let path = write_volume(dir.path(), "labels.mnc", gradient((2, 2, 2)), NumericKind::Short);
    let options = VolumeOptions::new().labels(true);
    let mut volume = volume_from_file(&path, true, &options).unwrap();
    assert!(volume.is_labels());
    assert_eq!(volume.dtype(), Some(NumericKind::UShort));
    assert_eq!(volume.data().unwrap().kind(), NumericKind::UShort);

    let options = VolumeOptions::new().labels(true).dtype(NumericKind::UInt);
    let volume = volume_from_file(&path, true, &options).unwrap();
    assert_eq!(volume.dtype(), Some(NumericKind::UInt));
}

#[test]
fn labels_must_fit_the_volume_type() {
    let dir = scratch();
    let path = dir.path().join("too_big.mnc");
    let mut labels = Array3::<u16>::zeros((2, 2, 2));
    labels[[1, 1, 1]] = 300;
    let options = VolumeOptions::new().labels(true);
    let description = gradient_description(NumericKind::UByte);
    let mut volume = volume_from_data(&path, labels, &description, &options).unwrap();

    match volume.write_file() {
        Err(MincError::LabelRangeViolation(min, max, kind)) => {
            assert_eq!((min, max, kind), (0., 300., NumericKind::UByte));
        }
        other => panic!("expected a label range violation, got {:?}", other),
    }
    volume.close().unwrap();
    assert!(!path.exists());
}

#[test]
fn label_ranges_collapse_to_the_data() {
    let dir = scratch();
    let path = dir.path().join("labels.mnc");
    let labels = Array3::<u8>::from_shape_fn((2, 2, 2), |(z, y, x)| (z + y + x) as u8 + 1);
    let options = VolumeOptions::new().labels(true);
    let description = gradient_description(NumericKind::UByte);
    let mut volume = volume_from_data(&path, labels.clone(), &description, &options).unwrap();
    volume.write_file().unwrap();

    let mut volume = volume_from_file(&path, true, &options).unwrap();
    assert_eq!(volume.valid_range().unwrap(), (1., 4.));
    assert_eq!(volume.volume_range().unwrap(), (1., 4.));
    let back = volume.data().unwrap().to_array::<u8>();
    assert_eq!(back, labels.into_dyn());
}

#[test]
fn dropping_an_unwritten_volume_removes_its_file() {
    let dir = scratch();
    let path = dir.path().join("dropped.mnc");
    {
        let volume = volume_from_data(
            &path,
            gradient((2, 2, 2)),
            &gradient_description(NumericKind::Float),
            &VolumeOptions::new(),
        )
        .unwrap();
        assert!(volume.path().exists());
    }
    assert!(!path.exists());
}

#[test]
fn history_gains_one_line_per_step() {
    let dir = scratch();
    let first = dir.path().join("step1.mnc");
    let mut volume = volume_from_data(
        &first,
        gradient((2, 2, 2)),
        &gradient_description(NumericKind::Float),
        &VolumeOptions::new(),
    )
    .unwrap();
    volume.append_history("step1").unwrap();
    volume.write_file().unwrap();

    let mut source = volume_from_file(&first, true, &VolumeOptions::new()).unwrap();
    assert_eq!(source.history(), "step1\n");
    let second = dir.path().join("step2.mnc");
    let copy = CopyOptions::new().data(true);
    let mut volume =
        volume_from_instance(&mut source, &second, &copy, &VolumeOptions::new()).unwrap();
    volume.append_history("step2").unwrap();
    volume.write_file().unwrap();

    let volume = volume_from_file(&second, true, &VolumeOptions::new()).unwrap();
    assert_eq!(volume.history(), "step1\nstep2\n");
}

#[test]
fn container_without_image_has_no_data() {
    let dir = scratch();
    let path = dir.path().join("partial.mnc");
    let engine = FileEngine::new();
    let dims = ZYX
        .iter()
        .map(|name| engine.create_dimension(name, DimClass::Spatial, 2).unwrap())
        .collect::<Vec<_>>();
    engine
        .create(&path, &dims, NumericKind::Short)
        .unwrap()
        .close()
        .unwrap();

    let mut volume = volume_from_file(&path, true, &VolumeOptions::new()).unwrap();
    assert!(!volume.is_data_loadable());
    assert!(matches!(
        volume.get_hyperslab(&[0, 0, 0], &[1, 1, 1], None),
        Err(MincError::NoData)
    ));
    assert!(matches!(volume.data(), Err(MincError::NoData)));
    assert!(!volume.is_data_loaded());
    volume.close().unwrap();
    // opened, not created, so the file stays
    assert!(path.exists());
}
