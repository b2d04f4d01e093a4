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
use crate::yuv_support::YuvSourceChannels;
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Loads 16 bytes, `ALIGNED` requires `ptr` to be 16 bytes aligned
#[inline(always)]
pub(crate) unsafe fn _mm_load_si128_x<const ALIGNED: bool>(ptr: *const u8) -> __m128i {
    if ALIGNED {
        _mm_load_si128(ptr as *const __m128i)
    } else {
        _mm_loadu_si128(ptr as *const __m128i)
    }
}

/// Stores 16 bytes, `ALIGNED` requires `ptr` to be 16 bytes aligned
#[inline(always)]
pub(crate) unsafe fn _mm_store_si128_x<const ALIGNED: bool>(ptr: *mut u8, v: __m128i) {
    if ALIGNED {
        _mm_store_si128(ptr as *mut __m128i, v);
    } else {
        _mm_storeu_si128(ptr as *mut __m128i, v);
    }
}

#[inline(always)]
pub(crate) unsafe fn _xx_load_si64(ptr: *const u8) -> __m128i {
    _mm_loadl_epi64(ptr as *const __m128i)
}

#[inline(always)]
pub(crate) unsafe fn _xx_store_si64(ptr: *mut u8, v: __m128i) {
    _mm_storel_epi64(ptr as *mut __m128i, v);
}

/// Duplicates every even byte: a0 a0 a2 a2 ..
#[inline(always)]
pub(crate) unsafe fn sse_interleave_even(x: __m128i) -> __m128i {
    #[rustfmt::skip]
    let shuffle = _mm_setr_epi8(0, 0, 2, 2, 4, 4, 6, 6,
                                     8, 8, 10, 10, 12, 12, 14, 14);
    _mm_shuffle_epi8(x, shuffle)
}

/// Duplicates every odd byte: a1 a1 a3 a3 ..
#[inline(always)]
pub(crate) unsafe fn sse_interleave_odd(x: __m128i) -> __m128i {
    let shuffle = _mm_setr_epi8(1, 1, 3, 3, 5, 5, 7, 7, 9, 9, 11, 11, 13, 13, 15, 15);
    _mm_shuffle_epi8(x, shuffle)
}

#[inline(always)]
pub(crate) unsafe fn sse_deinterleave_rgba(
    rgba0: __m128i,
    rgba1: __m128i,
    rgba2: __m128i,
    rgba3: __m128i,
) -> (__m128i, __m128i, __m128i, __m128i) {
    let t0 = _mm_unpacklo_epi8(rgba0, rgba1);
    let t1 = _mm_unpackhi_epi8(rgba0, rgba1);
    let t2 = _mm_unpacklo_epi8(rgba2, rgba3);
    let t3 = _mm_unpackhi_epi8(rgba2, rgba3);

    let t4 = _mm_unpacklo_epi16(t0, t2);
    let t5 = _mm_unpackhi_epi16(t0, t2);
    let t6 = _mm_unpacklo_epi16(t1, t3);
    let t7 = _mm_unpackhi_epi16(t1, t3);

    let l1 = _mm_unpacklo_epi32(t4, t6);
    let l2 = _mm_unpackhi_epi32(t4, t6);
    let l3 = _mm_unpacklo_epi32(t5, t7);
    let l4 = _mm_unpackhi_epi32(t5, t7);

    #[rustfmt::skip]
    let shuffle = _mm_setr_epi8(0, 4, 8, 12,
                                        1, 5, 9, 13,
                                        2, 6, 10, 14,
                                        3, 7, 11, 15,
    );

    let r1 = _mm_shuffle_epi8(_mm_unpacklo_epi32(l1, l3), shuffle);
    let r2 = _mm_shuffle_epi8(_mm_unpackhi_epi32(l1, l3), shuffle);
    let r3 = _mm_shuffle_epi8(_mm_unpacklo_epi32(l2, l4), shuffle);
    let r4 = _mm_shuffle_epi8(_mm_unpackhi_epi32(l2, l4), shuffle);

    (r1, r2, r3, r4)
}

#[inline(always)]
pub(crate) unsafe fn sse_deinterleave_rgb(
    rgb0: __m128i,
    rgb1: __m128i,
    rgb2: __m128i,
) -> (__m128i, __m128i, __m128i) {
    #[rustfmt::skip]
    let idx = _mm_setr_epi8(0, 3, 6, 9,
                                    12, 15, 2, 5, 8,
                                    11, 14, 1, 4, 7,
                                    10, 13);

    let r6b5g5_0 = _mm_shuffle_epi8(rgb0, idx);
    let g6r5b5_1 = _mm_shuffle_epi8(rgb1, idx);
    let b6g5r5_2 = _mm_shuffle_epi8(rgb2, idx);

    #[rustfmt::skip]
    let mask010 = _mm_setr_epi8(0, 0, 0, 0,
                                        0, 0, -1, -1, -1,
                                        -1, -1, 0, 0, 0,
                                        0, 0);

    #[rustfmt::skip]
    let mask001 = _mm_setr_epi8(0, 0, 0, 0, 0,
                                    0, 0, 0, 0, 0, 0,
                                    -1, -1, -1, -1, -1);

    let b2g2b1 = _mm_blendv_epi8(b6g5r5_2, g6r5b5_1, mask001);
    let b2b0b1 = _mm_blendv_epi8(b2g2b1, r6b5g5_0, mask010);

    let r0r1b1 = _mm_blendv_epi8(r6b5g5_0, g6r5b5_1, mask010);
    let r0r1r2 = _mm_blendv_epi8(r0r1b1, b6g5r5_2, mask001);

    let g1r1g0 = _mm_blendv_epi8(g6r5b5_1, r6b5g5_0, mask001);
    let g1g2g0 = _mm_blendv_epi8(g1r1g0, b6g5r5_2, mask010);

    let g0g1g2 = _mm_alignr_epi8::<11>(g1g2g0, g1g2g0);
    let b0b1b2 = _mm_alignr_epi8::<6>(b2b0b1, b2b0b1);

    (r0r1r2, g0g1g2, b0b1b2)
}

#[inline(always)]
pub(crate) unsafe fn sse_interleave_rgb(
    r: __m128i,
    g: __m128i,
    b: __m128i,
) -> (__m128i, __m128i, __m128i) {
    let sh_a = _mm_setr_epi8(0, 11, 6, 1, 12, 7, 2, 13, 8, 3, 14, 9, 4, 15, 10, 5);
    let sh_b = _mm_setr_epi8(5, 0, 11, 6, 1, 12, 7, 2, 13, 8, 3, 14, 9, 4, 15, 10);
    let sh_c = _mm_setr_epi8(10, 5, 0, 11, 6, 1, 12, 7, 2, 13, 8, 3, 14, 9, 4, 15);
    let a0 = _mm_shuffle_epi8(r, sh_a);
    let b0 = _mm_shuffle_epi8(g, sh_b);
    let c0 = _mm_shuffle_epi8(b, sh_c);

    let m0 = _mm_setr_epi8(0, 0, -1, 0, 0, -1, 0, 0, -1, 0, 0, -1, 0, 0, -1, 0);
    let m1 = _mm_setr_epi8(0, -1, 0, 0, -1, 0, 0, -1, 0, 0, -1, 0, 0, -1, 0, 0);
    let v0 = _mm_blendv_epi8(_mm_blendv_epi8(a0, b0, m1), c0, m0);
    let v1 = _mm_blendv_epi8(_mm_blendv_epi8(b0, c0, m1), a0, m0);
    let v2 = _mm_blendv_epi8(_mm_blendv_epi8(c0, a0, m1), b0, m0);
    (v0, v1, v2)
}

/// Stores 16 RGB24 pixels, 48 bytes
#[inline(always)]
pub(crate) unsafe fn sse_store_rgb_u8<const ALIGNED: bool>(
    ptr: *mut u8,
    r: __m128i,
    g: __m128i,
    b: __m128i,
) {
    let (v0, v1, v2) = sse_interleave_rgb(r, g, b);
    _mm_store_si128_x::<ALIGNED>(ptr, v0);
    _mm_store_si128_x::<ALIGNED>(ptr.add(16), v1);
    _mm_store_si128_x::<ALIGNED>(ptr.add(32), v2);
}

/// Loads 16 pixels of RGB24 or RGBA32 and splits them into R, G, B vectors,
/// alpha is dropped
#[inline(always)]
pub(crate) unsafe fn _mm_load_deinterleave_rgb_for_yuv<const CHANS: u8, const ALIGNED: bool>(
    ptr: *const u8,
) -> (__m128i, __m128i, __m128i) {
    let source_channels: YuvSourceChannels = CHANS.into();

    match source_channels {
        YuvSourceChannels::Rgb => {
            let row_1 = _mm_load_si128_x::<ALIGNED>(ptr);
            let row_2 = _mm_load_si128_x::<ALIGNED>(ptr.add(16));
            let row_3 = _mm_load_si128_x::<ALIGNED>(ptr.add(32));
            sse_deinterleave_rgb(row_1, row_2, row_3)
        }
        YuvSourceChannels::Rgba => {
            let row_1 = _mm_load_si128_x::<ALIGNED>(ptr);
            let row_2 = _mm_load_si128_x::<ALIGNED>(ptr.add(16));
            let row_3 = _mm_load_si128_x::<ALIGNED>(ptr.add(32));
            let row_4 = _mm_load_si128_x::<ALIGNED>(ptr.add(48));
            let (r, g, b, _) = sse_deinterleave_rgba(row_1, row_2, row_3, row_4);
            (r, g, b)
        }
    }
}
