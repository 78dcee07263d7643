use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::path::PathBuf;

use mx_matrix::{Matrix, MatmulBackend, MatrixError, NativeBackend, NativeSymbols};

/// Locates the `mx-ffi` cdylib that cargo builds next to the test binaries.
fn cdylib_path() -> PathBuf {
    let file = format!("{}mx_ffi{}", DLL_PREFIX, DLL_SUFFIX);
    let exe = std::env::current_exe().unwrap();
    let deps = exe.parent().unwrap();
    [deps.to_path_buf(), deps.parent().unwrap().to_path_buf()]
        .into_iter()
        .map(|dir| dir.join(&file))
        .find(|path| path.exists())
        .unwrap_or_else(|| panic!("{} not found near {}", file, deps.display()))
}

#[test]
fn load_resolves_default_symbols() {
    let path = cdylib_path();
    let backend = unsafe { NativeBackend::load(&path, &NativeSymbols::default()) }.unwrap();
    assert!(backend.name().starts_with("native:"));

    let a = Matrix::new(1, 3, vec![2, 3, 4]).unwrap();
    let b = Matrix::new(3, 1, vec![5, 6, 7]).unwrap();
    assert_eq!(a.matmul(&b, &backend).unwrap().as_slice(), &[56]);

    let a = Matrix::new(2, 2, vec![1.5f32, 2.5, 3.5, 4.5]).unwrap();
    let b = Matrix::new(2, 2, vec![0.5f32, 1.0, 1.5, 2.0]).unwrap();
    assert_eq!(
        a.matmul(&b, &backend).unwrap().as_slice(),
        &[4.5, 6.5, 8.5, 12.5]
    );

    let a = Matrix::new(1, 2, vec![0.5f64, 0.25]).unwrap();
    let b = Matrix::new(2, 1, vec![4.0f64, 8.0]).unwrap();
    assert_eq!(a.matmul(&b, &backend).unwrap().as_slice(), &[4.0]);
}

#[test]
fn loaded_backend_runs_rectangular_product() {
    let backend = {
        let path = cdylib_path();
        unsafe { NativeBackend::load(path, &NativeSymbols::default()) }.unwrap()
    };
    let mut out = [0i32; 4];
    backend
        .matmul_i32(2, 3, 2, &[2, 3, 4, 1, 2, 3], &[1, 4, 2, 5, 3, 6], &mut out)
        .unwrap();
    assert_eq!(out, [20, 47, 14, 32]);
}

#[test]
fn load_reports_missing_symbols() {
    let err = unsafe { NativeBackend::load(cdylib_path(), &NativeSymbols::legacy()) }.unwrap_err();
    match err {
        MatrixError::Library(msg) => assert!(msg.contains("multiplyIntMatrices"), "{msg}"),
        other => panic!("expected Library error, got {other:?}"),
    }
}
