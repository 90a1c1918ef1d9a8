mod common;

use common::{assert_conforms, scenarios};
use filter_accel::LineBufferFilter;

#[test]
fn line_buffer_matches_reference() {
    let mut accel = LineBufferFilter::new();
    for scenario in scenarios() {
        assert_conforms(&mut accel, &scenario);
    }
}

#[test]
fn line_buffer_never_reads_kernel_padding() {
    let mut accel = LineBufferFilter::new();
    for scenario in scenarios() {
        assert_conforms(&mut accel, &scenario.with_dirty_padding(0x55));
    }
}
