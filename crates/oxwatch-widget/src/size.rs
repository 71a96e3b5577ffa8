//! Dashboard grid units. A row is [`FULL_WIDTH`] units wide.

pub const FULL_WIDTH: u32 = 24;
pub const HALF_WIDTH: u32 = FULL_WIDTH / 2;
pub const THIRD_WIDTH: u32 = FULL_WIDTH / 3;
pub const QUARTER_WIDTH: u32 = FULL_WIDTH / 4;
pub const SIXTH_WIDTH: u32 = FULL_WIDTH / 6;
pub const TWO_THIRDS_WIDTH: u32 = 2 * THIRD_WIDTH;
pub const THREE_QUARTERS_WIDTH: u32 = 3 * QUARTER_WIDTH;

pub const DEFAULT_GRAPH_WIDGET_HEIGHT: u32 = 5;
pub const DEFAULT_TWO_LINER_GRAPH_WIDGET_HEIGHT: u32 = 6;
pub const DEFAULT_SUMMARY_WIDGET_HEIGHT: u32 = 6;
pub const HEADER_WIDGET_HEIGHT: u32 = 1;
pub const DEFAULT_TEXT_WIDGET_HEIGHT: u32 = 1;

/// Widest width that does not take more rows than the narrowest one,
/// for `num_widgets` widgets.
pub fn recommended_widget_width(num_widgets: usize) -> u32 {
    let rows_taken = |items: usize, size: u32| (items as u32 * size).div_ceil(FULL_WIDTH);

    let items = num_widgets.max(1);
    let widths = [QUARTER_WIDTH, THIRD_WIDTH, HALF_WIDTH, FULL_WIDTH];
    let mut i = 0;
    while i < widths.len() - 1 && rows_taken(items, widths[i + 1]) == rows_taken(items, widths[i]) {
        i += 1;
    }
    widths[i]
}

/// Width of each of `num_groups` widgets: an even split of one row when
/// the row divides exactly, the recommended width otherwise.
pub fn group_width(num_groups: usize) -> u32 {
    match u32::try_from(num_groups) {
        Ok(n) if n > 0 && FULL_WIDTH % n == 0 => FULL_WIDTH / n,
        _ => recommended_widget_width(num_groups),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommended_widths() {
        assert_eq!(recommended_widget_width(0), FULL_WIDTH);
        assert_eq!(recommended_widget_width(1), FULL_WIDTH);
        assert_eq!(recommended_widget_width(2), HALF_WIDTH);
        assert_eq!(recommended_widget_width(3), THIRD_WIDTH);
        assert_eq!(recommended_widget_width(4), QUARTER_WIDTH);
        assert_eq!(recommended_widget_width(5), THIRD_WIDTH);
        assert_eq!(recommended_widget_width(7), QUARTER_WIDTH);
    }

    #[test]
    fn groups_tile_one_row() {
        for n in [1, 2, 3, 4, 6, 8, 12] {
            assert_eq!(group_width(n) * n as u32, FULL_WIDTH);
        }
        assert_eq!(group_width(5), THIRD_WIDTH);
    }
}
