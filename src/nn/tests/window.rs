/*
 * @Description  : 二维窗口几何（Window → Filter2d）的单元测试
 */

use crate::assert_err;
use crate::nn::nodes::raw_node::Filter2d;
use crate::nn::{Graph, GraphError, NodeShape, Window};

fn input(height: usize, width: usize) -> NodeShape {
    NodeShape::new(0, height, width)
}

#[test]
fn test_valid_window() -> Result<(), GraphError> {
    let filter = Filter2d::new("Test", input(5, 4), Window::valid(3, 2))?;
    assert_eq!(filter.stride, 1);
    assert_eq!(filter.padding, (0, 0));
    assert_eq!(filter.output, (3, 3));
    assert_eq!(filter.output_shape(20), NodeShape::new(20, 3, 3));
    Ok(())
}

#[test]
fn test_stride_window_derives_output_and_padding() -> Result<(), GraphError> {
    // (5 - 2 + 1) / 2 + 1 = 3；覆盖 2·2 + 2 = 6，比输入多1，居中时上/左填充为0
    let filter = Filter2d::new("Test", input(5, 4), Window::with_stride(2, 2, 2))?;
    assert_eq!(filter.output, (3, 2));
    assert_eq!(filter.padding, (0, 0));

    let filter = Filter2d::new("Test", input(7, 7), Window::with_stride(3, 3, 3))?;
    assert_eq!(filter.output, (3, 3));
    assert_eq!(filter.padding, (1, 1));
    Ok(())
}

#[test]
fn test_output_window_centers_padding() -> Result<(), GraphError> {
    let filter = Filter2d::new("Test", input(3, 3), Window::with_output(3, 3, 1, (3, 3)))?;
    assert_eq!(filter.padding, (1, 1));
    assert_eq!(filter.input_index(0, 0, 0, 0), None);
    assert_eq!(filter.input_index(0, 0, 1, 1), Some(0));
    assert_eq!(filter.input_index(2, 2, 2, 2), None);
    assert_eq!(filter.input_index(1, 2, 1, 1), Some(5));

    let mut visited = Vec::new();
    filter.for_each_in_window(0, 0, |i, j, index| visited.push((i, j, index)));
    assert_eq!(visited, vec![(1, 1, 0), (1, 2, 1), (2, 1, 3), (2, 2, 4)]);
    Ok(())
}

#[test]
fn test_explicit_window_is_kept() -> Result<(), GraphError> {
    let window = Window::explicit(2, 3, 2, (1, 0), (4, 1));
    assert_eq!(window.kernel(), (2, 3));
    let filter = Filter2d::new("Test", input(6, 3), window)?;
    assert_eq!(filter.kernel, (2, 3));
    assert_eq!(filter.stride, 2);
    assert_eq!(filter.padding, (1, 0));
    assert_eq!(filter.output, (4, 1));
    assert!(filter.check_windows_nonempty().is_ok());
    Ok(())
}

#[test]
fn test_invalid_windows() {
    assert_err!(
        Filter2d::new("Test", input(3, 3), Window::valid(0, 2)),
        GraphError::ShapeMismatch([3, 3], [0, 2], "Test的窗口必须非空且不能大于输入")
    );
    assert_err!(
        Filter2d::new("Test", input(3, 3), Window::valid(2, 4)),
        GraphError::ShapeMismatch([3, 3], [2, 4], "Test的窗口必须非空且不能大于输入")
    );
    assert_err!(
        Filter2d::new("Test", input(3, 3), Window::with_stride(2, 2, 0)),
        GraphError::PreconditionViolation("Test的步长必须≥1")
    );
    assert_err!(
        Filter2d::new("Test", input(3, 3), Window::explicit(2, 2, 1, (0, 0), (0, 2))),
        GraphError::PreconditionViolation("Test的输出尺寸必须≥1，实际为(0, 2)")
    );
    // 输出太小，窗口覆盖不了整个输入
    assert_err!(
        Filter2d::new("Test", input(5, 5), Window::with_output(2, 2, 1, (2, 2))),
        GraphError::PreconditionViolation(_)
    );
}

#[test]
fn test_degenerate_windows_reported_in_row_major_order() -> Result<(), GraphError> {
    let filter = Filter2d::new("Test", input(3, 3), Window::explicit(2, 2, 1, (0, 0), (5, 5)))?;
    assert_err!(
        filter.check_windows_nonempty(),
        GraphError::DegenerateWindow { row: 0, col: 3 }
    );
    let filter = Filter2d::new("Test", input(3, 3), Window::explicit(2, 2, 1, (0, 0), (4, 2)))?;
    assert_err!(
        filter.check_windows_nonempty(),
        GraphError::DegenerateWindow { row: 3, col: 0 }
    );
    Ok(())
}

#[test]
fn test_window_span_overflow_is_rejected() -> Result<(), GraphError> {
    assert_err!(
        Filter2d::new("Test", input(2, 2), Window::with_output(1, 1, usize::MAX, (2, 2))),
        GraphError::PreconditionViolation(msg) if msg.starts_with("Test的窗口覆盖范围超出可表示的范围")
    );
    // 由步长推导输出时，(4 - 2) 向上除以步长不再经过`+ stride - 1`
    assert_err!(
        Filter2d::new("Test", input(4, 4), Window::with_stride(2, 2, usize::MAX)),
        GraphError::PreconditionViolation(
            "Test的窗口覆盖范围超出可表示的范围：步长18446744073709551615，输出尺寸2，窗口尺寸2"
        )
    );
    assert_err!(
        Filter2d::new("Test", input(4, 4), Window::explicit(2, 2, usize::MAX, (0, 0), (2, 1))),
        GraphError::PreconditionViolation(
            "Test的窗口覆盖范围超出可表示的范围：步长18446744073709551615，输出尺寸2，窗口尺寸2"
        )
    );

    // 输出只有一个位置时，步长再大也不参与覆盖范围
    let filter = Filter2d::new("Test", input(3, 3), Window::with_stride(3, 3, usize::MAX))?;
    assert_eq!(filter.output, (1, 1));
    assert_eq!(filter.padding, (0, 0));

    let mut graph = Graph::new();
    let x = graph.new_leaf2(2, 2)?;
    assert_err!(
        graph.new_avg_pool2d(x, Window::with_output(1, 1, usize::MAX, (2, 2))),
        GraphError::PreconditionViolation(_)
    );
    assert_eq!(graph.nodes_count(), 1);
    Ok(())
}
