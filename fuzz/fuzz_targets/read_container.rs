#![no_main]
use libfuzzer_sys::fuzz_target;
use minc::engine::file::FileContainer;
use minc::{Container, DimOrder, NumericKind, OpenMode};

fuzz_target!(|data: &[u8]| {
    if let Ok(container) = FileContainer::read_from(data, "fuzz.mnc", OpenMode::Read) {
        let _ = container.history();
        let _ = container.attributes("/");
        if let Ok(dims) = container.dimensions(DimOrder::Apparent) {
            let count: Vec<usize> = dims.iter().map(|d| d.size()).collect();
            let start = vec![0; count.len()];
            let _ = container.read_hyperslab(NumericKind::Double, &start, &count);
            let _ = container.voxel_to_world(&vec![0.; count.len()]);
        }
    }
});
