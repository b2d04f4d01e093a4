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
use crate::sse::sse_ycbcr::{sse_rgb_to_cbcr, sse_rgb_to_y, SseForwardWeights};
use crate::sse::utils::{_mm_load_deinterleave_rgb_for_yuv, _mm_store_si128_x, _xx_store_si64};
use crate::yuv_support::{CbCrForwardTransform, YuvChromaRange, YuvSourceChannels};

/// Converts full 16x2 tiles of an RGB24 or RGBA32 row pair into YUV 4:2:0.
///
/// Chroma of each 2x2 block is the rounded average of its four pixels.
pub(crate) fn sse_rgb_to_yuv_row420<const ORIGIN_CHANNELS: u8, const ALIGNED: bool>(
    range: &YuvChromaRange,
    transform: &CbCrForwardTransform<i32>,
    y_plane0: &mut [u8],
    y_plane1: &mut [u8],
    u_plane: &mut [u8],
    v_plane: &mut [u8],
    rgba0: &[u8],
    rgba1: &[u8],
    width: usize,
) -> ProcessedOffset {
    let channels = YuvSourceChannels::from(ORIGIN_CHANNELS).get_channels_count();
    debug_assert!(y_plane0.len() >= width && y_plane1.len() >= width);
    debug_assert!(rgba0.len() >= width * channels && rgba1.len() >= width * channels);
    debug_assert!(u_plane.len() >= width / 2 && v_plane.len() >= width / 2);
    unsafe {
        sse_rgb_to_yuv_row_impl420::<ORIGIN_CHANNELS, ALIGNED>(
            range, transform, y_plane0, y_plane1, u_plane, v_plane, rgba0, rgba1, width,
        )
    }
}

#[target_feature(enable = "sse4.1")]
unsafe fn sse_rgb_to_yuv_row_impl420<const ORIGIN_CHANNELS: u8, const ALIGNED: bool>(
    range: &YuvChromaRange,
    transform: &CbCrForwardTransform<i32>,
    y_plane0: &mut [u8],
    y_plane1: &mut [u8],
    u_plane: &mut [u8],
    v_plane: &mut [u8],
    rgba0: &[u8],
    rgba1: &[u8],
    width: usize,
) -> ProcessedOffset {
    let source_channels: YuvSourceChannels = ORIGIN_CHANNELS.into();
    let channels = source_channels.get_channels_count();

    let weights = SseForwardWeights::new(range, transform);

    let mut cx = 0usize;
    let mut uv_x = 0usize;

    let y_ptr0 = y_plane0.as_mut_ptr();
    let y_ptr1 = y_plane1.as_mut_ptr();
    let u_ptr = u_plane.as_mut_ptr();
    let v_ptr = v_plane.as_mut_ptr();
    let rgba_ptr0 = rgba0.as_ptr();
    let rgba_ptr1 = rgba1.as_ptr();

    while cx + TILE_WIDTH <= width {
        let src_shift = cx * channels;
        let rgb0 =
            _mm_load_deinterleave_rgb_for_yuv::<ORIGIN_CHANNELS, ALIGNED>(rgba_ptr0.add(src_shift));
        let rgb1 =
            _mm_load_deinterleave_rgb_for_yuv::<ORIGIN_CHANNELS, ALIGNED>(rgba_ptr1.add(src_shift));

        let y0 = sse_rgb_to_y(rgb0.0, rgb0.1, rgb0.2, &weights);
        let y1 = sse_rgb_to_y(rgb1.0, rgb1.1, rgb1.2, &weights);
        _mm_store_si128_x::<ALIGNED>(y_ptr0.add(cx), y0);
        _mm_store_si128_x::<ALIGNED>(y_ptr1.add(cx), y1);

        let (cb, cr) = sse_rgb_to_cbcr(rgb0, rgb1, &weights);
        _xx_store_si64(u_ptr.add(uv_x), cb);
        _xx_store_si64(v_ptr.add(uv_x), cr);

        cx += TILE_WIDTH;
        uv_x += TILE_WIDTH / 2;
    }

    ProcessedOffset { cx, ux: uv_x }
}
