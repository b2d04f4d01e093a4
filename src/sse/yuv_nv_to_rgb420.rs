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
use crate::sse::utils::{
    _mm_load_si128_x, sse_interleave_even, sse_interleave_odd, sse_store_rgb_u8,
};
use crate::yuv_support::{CbCrInverseTransform, YuvChromaRange, YuvNVOrder};
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Converts full 16x2 tiles of an NV12 or NV21 row pair into RGB24.
///
/// `uv_plane` is one row of interleaved chroma, at least `width` bytes for the tiled part.
pub(crate) fn sse_yuv_nv_to_rgb_row420<const UV_ORDER: u8, const ALIGNED: bool>(
    range: &YuvChromaRange,
    transform: &CbCrInverseTransform<i32>,
    y_plane0: &[u8],
    y_plane1: &[u8],
    uv_plane: &[u8],
    rgb0: &mut [u8],
    rgb1: &mut [u8],
    width: usize,
) -> ProcessedOffset {
    debug_assert!(y_plane0.len() >= width && y_plane1.len() >= width);
    debug_assert!(rgb0.len() >= width * 3 && rgb1.len() >= width * 3);
    debug_assert!(uv_plane.len() >= width & !1);
    unsafe {
        sse_yuv_nv_to_rgb_row_impl420::<UV_ORDER, ALIGNED>(
            range, transform, y_plane0, y_plane1, uv_plane, rgb0, rgb1, width,
        )
    }
}

#[target_feature(enable = "sse4.1")]
unsafe fn sse_yuv_nv_to_rgb_row_impl420<const UV_ORDER: u8, const ALIGNED: bool>(
    range: &YuvChromaRange,
    transform: &CbCrInverseTransform<i32>,
    y_plane0: &[u8],
    y_plane1: &[u8],
    uv_plane: &[u8],
    rgb0: &mut [u8],
    rgb1: &mut [u8],
    width: usize,
) -> ProcessedOffset {
    let order: YuvNVOrder = UV_ORDER.into();
    let weights = SseInverseWeights::new(range, transform);

    let mut cx = 0usize;

    let y_ptr0 = y_plane0.as_ptr();
    let y_ptr1 = y_plane1.as_ptr();
    let uv_ptr = uv_plane.as_ptr();
    let rgb_ptr0 = rgb0.as_mut_ptr();
    let rgb_ptr1 = rgb1.as_mut_ptr();

    while cx + TILE_WIDTH <= width {
        let y_values0 = _mm_load_si128_x::<ALIGNED>(y_ptr0.add(cx));
        let y_values1 = _mm_load_si128_x::<ALIGNED>(y_ptr1.add(cx));

        // 8 chroma pairs cover 16 luma columns, so chroma offset equals `cx`
        let uv_values = _mm_load_si128_x::<ALIGNED>(uv_ptr.add(cx));
        let (u_values, v_values) = match order {
            YuvNVOrder::UV => (sse_interleave_even(uv_values), sse_interleave_odd(uv_values)),
            YuvNVOrder::VU => (sse_interleave_odd(uv_values), sse_interleave_even(uv_values)),
        };

        let chroma = sse_widen_chroma(u_values, v_values, &weights);

        let (r0, g0, b0) = sse_ycbcr_to_rgb(y_values0, &chroma, &weights);
        let (r1, g1, b1) = sse_ycbcr_to_rgb(y_values1, &chroma, &weights);

        let dst_shift = cx * 3;
        sse_store_rgb_u8::<ALIGNED>(rgb_ptr0.add(dst_shift), r0, g0, b0);
        sse_store_rgb_u8::<ALIGNED>(rgb_ptr1.add(dst_shift), r1, g1, b1);

        cx += TILE_WIDTH;
    }

    ProcessedOffset { cx, ux: cx / 2 }
}
