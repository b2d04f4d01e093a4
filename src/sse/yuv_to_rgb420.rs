/*
 * Copyright (c) Radzivon Bartoshyk, 11/2024. All rights reserved.
 *
 * Redistribution and use in source and binary forms, with or without modification,
 * are permitted provided that the following conditions are met:
 *
 * 1.  Redistributions of source code must retain the above copyright notice, this
 * list of conditions and the following disclaimer.
 *
 * 2.  Redistributions in binary form must reproduce the above copyright notice,
 * this list of conditions and the following disclaimer in the documentation
 * and/or other materials provided with the distribution.
 *
 * 3.  Neither the name of the copyright holder nor the names of its
 * contributors may be used to endorse or promote products derived from
 * this software without specific prior written permission.
 *
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
use crate::internals::{ProcessedOffset, TILE_WIDTH};
use crate::sse::sse_ycbcr::{sse_widen_chroma, sse_ycbcr_to_rgb, SseInverseWeights};
use crate::sse::utils::{_mm_load_si128_x, _xx_load_si64, sse_store_rgb_u8};
use crate::yuv_support::{CbCrInverseTransform, YuvChromaRange};
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Converts full 16x2 tiles of a planar YUV 4:2:0 row pair into RGB24.
///
/// Rows must hold at least `width` pixels and chroma rows `width.div_ceil(2)` samples.
/// With `ALIGNED` every row must start at a 16 bytes boundary.
pub(crate) fn sse_yuv_to_rgb_row420<const ALIGNED: bool>(
    range: &YuvChromaRange,
    transform: &CbCrInverseTransform<i32>,
    y_plane0: &[u8],
    y_plane1: &[u8],
    u_plane: &[u8],
    v_plane: &[u8],
    rgb0: &mut [u8],
    rgb1: &mut [u8],
    width: usize,
) -> ProcessedOffset {
    debug_assert!(y_plane0.len() >= width && y_plane1.len() >= width);
    debug_assert!(rgb0.len() >= width * 3 && rgb1.len() >= width * 3);
    debug_assert!(u_plane.len() >= width / 2 && v_plane.len() >= width / 2);
    unsafe {
        sse_yuv_to_rgb_row_impl420::<ALIGNED>(
            range, transform, y_plane0, y_plane1, u_plane, v_plane, rgb0, rgb1, width,
        )
    }
}

#[target_feature(enable = "sse4.1")]
unsafe fn sse_yuv_to_rgb_row_impl420<const ALIGNED: bool>(
    range: &YuvChromaRange,
    transform: &CbCrInverseTransform<i32>,
    y_plane0: &[u8],
    y_plane1: &[u8],
    u_plane: &[u8],
    v_plane: &[u8],
    rgb0: &mut [u8],
    rgb1: &mut [u8],
    width: usize,
) -> ProcessedOffset {
    let weights = SseInverseWeights::new(range, transform);

    let mut cx = 0usize;
    let mut uv_x = 0usize;

    let y_ptr0 = y_plane0.as_ptr();
    let y_ptr1 = y_plane1.as_ptr();
    let u_ptr = u_plane.as_ptr();
    let v_ptr = v_plane.as_ptr();
    let rgb_ptr0 = rgb0.as_mut_ptr();
    let rgb_ptr1 = rgb1.as_mut_ptr();

    while cx + TILE_WIDTH <= width {
        let y_values0 = _mm_load_si128_x::<ALIGNED>(y_ptr0.add(cx));
        let y_values1 = _mm_load_si128_x::<ALIGNED>(y_ptr1.add(cx));

        let u_values = _xx_load_si64(u_ptr.add(uv_x));
        let v_values = _xx_load_si64(v_ptr.add(uv_x));

        let chroma = sse_widen_chroma(
            _mm_unpacklo_epi8(u_values, u_values),
            _mm_unpacklo_epi8(v_values, v_values),
            &weights,
        );

        let (r0, g0, b0) = sse_ycbcr_to_rgb(y_values0, &chroma, &weights);
        let (r1, g1, b1) = sse_ycbcr_to_rgb(y_values1, &chroma, &weights);

        let dst_shift = cx * 3;
        sse_store_rgb_u8::<ALIGNED>(rgb_ptr0.add(dst_shift), r0, g0, b0);
        sse_store_rgb_u8::<ALIGNED>(rgb_ptr1.add(dst_shift), r1, g1, b1);

        cx += TILE_WIDTH;
        uv_x += TILE_WIDTH / 2;
    }

    ProcessedOffset { cx, ux: uv_x }
}
