use crate::tensor::Tensor;

#[test]
fn test_display() {
    let tensor = Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let text = format!("{tensor}");
    assert!(text.starts_with("[[  1.0000,   2.0000],\n [  3.0000,   4.0000]]"));
    assert!(text.ends_with("形状: [2, 2]\n"));
}
