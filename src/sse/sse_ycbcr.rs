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
use crate::built_coefficients::{CHROMA_SUM_PRECISION, PRECISION};
use crate::numerics::{chroma_sum_bias, luma_bias};
use crate::yuv_support::{interleave_i16, CbCrForwardTransform, CbCrInverseTransform, YuvChromaRange};
#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Broadcast inverse transform weights.
///
/// Every weight is a pair of i16 packed into an i32 lane, so a single
/// `_mm_madd_epi16` against interleaved samples yields the exact i32 sum.
pub(crate) struct SseInverseWeights {
    y_bias: __m128i,
    uv_bias: __m128i,
    y_cr: __m128i,
    y_cb: __m128i,
    y_neg_g1: __m128i,
    neg_g2_rounding: __m128i,
    rounding: __m128i,
    ones: __m128i,
}

impl SseInverseWeights {
    #[inline(always)]
    pub(crate) unsafe fn new(range: &YuvChromaRange, transform: &CbCrInverseTransform<i32>) -> Self {
        let rounding = 1 << (PRECISION - 1);
        Self {
            y_bias: _mm_set1_epi16(range.bias_y as i16),
            uv_bias: _mm_set1_epi16(range.bias_uv as i16),
            y_cr: _mm_set1_epi32(transform.interleaved_y_cr()),
            y_cb: _mm_set1_epi32(transform.interleaved_y_cb()),
            y_neg_g1: _mm_set1_epi32(transform.interleaved_y_neg_g1()),
            neg_g2_rounding: _mm_set1_epi32(interleave_i16(-transform.g_coeff_2, rounding)),
            rounding: _mm_set1_epi32(rounding),
            ones: _mm_set1_epi16(1),
        }
    }
}

/// Chroma of one tile widened to i16 with bias removed, split into
/// low and high halves of 8 lanes.
#[derive(Copy, Clone)]
pub(crate) struct SseChromaPair {
    cb_lo: __m128i,
    cb_hi: __m128i,
    cr_lo: __m128i,
    cr_hi: __m128i,
}

/// Takes 16 Cb and 16 Cr bytes, each already duplicated for both luma columns it covers
#[inline(always)]
pub(crate) unsafe fn sse_widen_chroma(
    cb: __m128i,
    cr: __m128i,
    weights: &SseInverseWeights,
) -> SseChromaPair {
    let zeros = _mm_setzero_si128();
    SseChromaPair {
        cb_lo: _mm_sub_epi16(_mm_unpacklo_epi8(cb, zeros), weights.uv_bias),
        cb_hi: _mm_sub_epi16(_mm_unpackhi_epi8(cb, zeros), weights.uv_bias),
        cr_lo: _mm_sub_epi16(_mm_unpacklo_epi8(cr, zeros), weights.uv_bias),
        cr_hi: _mm_sub_epi16(_mm_unpackhi_epi8(cr, zeros), weights.uv_bias),
    }
}

/// 8 pixels of biased luma against their chroma, returns i16 lanes saturated
/// from exact i32 results
#[inline(always)]
unsafe fn sse_ycbcr_to_rgb_half(
    y: __m128i,
    cb: __m128i,
    cr: __m128i,
    weights: &SseInverseWeights,
) -> (__m128i, __m128i, __m128i) {
    let y_cr_lo = _mm_unpacklo_epi16(y, cr);
    let y_cr_hi = _mm_unpackhi_epi16(y, cr);
    let y_cb_lo = _mm_unpacklo_epi16(y, cb);
    let y_cb_hi = _mm_unpackhi_epi16(y, cb);
    let cb_one_lo = _mm_unpacklo_epi16(cb, weights.ones);
    let cb_one_hi = _mm_unpackhi_epi16(cb, weights.ones);

    let r_lo = _mm_srai_epi32::<PRECISION>(_mm_add_epi32(
        _mm_madd_epi16(y_cr_lo, weights.y_cr),
        weights.rounding,
    ));
    let r_hi = _mm_srai_epi32::<PRECISION>(_mm_add_epi32(
        _mm_madd_epi16(y_cr_hi, weights.y_cr),
        weights.rounding,
    ));

    let b_lo = _mm_srai_epi32::<PRECISION>(_mm_add_epi32(
        _mm_madd_epi16(y_cb_lo, weights.y_cb),
        weights.rounding,
    ));
    let b_hi = _mm_srai_epi32::<PRECISION>(_mm_add_epi32(
        _mm_madd_epi16(y_cb_hi, weights.y_cb),
        weights.rounding,
    ));

    // (cb, 1) * (-g2, rounding) carries the rounding constant
    let g_lo = _mm_srai_epi32::<PRECISION>(_mm_add_epi32(
        _mm_madd_epi16(y_cr_lo, weights.y_neg_g1),
        _mm_madd_epi16(cb_one_lo, weights.neg_g2_rounding),
    ));
    let g_hi = _mm_srai_epi32::<PRECISION>(_mm_add_epi32(
        _mm_madd_epi16(y_cr_hi, weights.y_neg_g1),
        _mm_madd_epi16(cb_one_hi, weights.neg_g2_rounding),
    ));

    (
        _mm_packs_epi32(r_lo, r_hi),
        _mm_packs_epi32(g_lo, g_hi),
        _mm_packs_epi32(b_lo, b_hi),
    )
}

/// Converts 16 luma samples of one row against widened chroma into R, G, B bytes
#[inline(always)]
pub(crate) unsafe fn sse_ycbcr_to_rgb(
    y_values: __m128i,
    chroma: &SseChromaPair,
    weights: &SseInverseWeights,
) -> (__m128i, __m128i, __m128i) {
    let zeros = _mm_setzero_si128();
    let y_lo = _mm_sub_epi16(_mm_unpacklo_epi8(y_values, zeros), weights.y_bias);
    let y_hi = _mm_sub_epi16(_mm_unpackhi_epi8(y_values, zeros), weights.y_bias);

    let (r_lo, g_lo, b_lo) = sse_ycbcr_to_rgb_half(y_lo, chroma.cb_lo, chroma.cr_lo, weights);
    let (r_hi, g_hi, b_hi) = sse_ycbcr_to_rgb_half(y_hi, chroma.cb_hi, chroma.cr_hi, weights);

    (
        _mm_packus_epi16(r_lo, r_hi),
        _mm_packus_epi16(g_lo, g_hi),
        _mm_packus_epi16(b_lo, b_hi),
    )
}

/// Broadcast forward transform weights
pub(crate) struct SseForwardWeights {
    yr_yg: __m128i,
    yb: __m128i,
    cbr_cbg: __m128i,
    cbb: __m128i,
    crr_crg: __m128i,
    crb: __m128i,
    y_bias: __m128i,
    uv_bias: __m128i,
}

impl SseForwardWeights {
    #[inline(always)]
    pub(crate) unsafe fn new(range: &YuvChromaRange, transform: &CbCrForwardTransform<i32>) -> Self {
        Self {
            yr_yg: _mm_set1_epi32(transform.interleaved_yr_yg()),
            yb: _mm_set1_epi32(interleave_i16(transform.yb, 0)),
            cbr_cbg: _mm_set1_epi32(transform.interleaved_cbr_cbg()),
            cbb: _mm_set1_epi32(interleave_i16(transform.cb_b, 0)),
            crr_crg: _mm_set1_epi32(transform.interleaved_crr_crg()),
            crb: _mm_set1_epi32(interleave_i16(transform.cr_b, 0)),
            y_bias: _mm_set1_epi32(luma_bias::<PRECISION>(range.bias_y as i32)),
            uv_bias: _mm_set1_epi32(chroma_sum_bias::<PRECISION>(range.bias_uv as i32)),
        }
    }
}

/// Weighted sum of 8 lanes of three i16 vectors, in two i32 halves
#[inline(always)]
unsafe fn sse_affine_dot(
    v0: __m128i,
    v1: __m128i,
    v2: __m128i,
    w01: __m128i,
    w2: __m128i,
    slope: __m128i,
) -> (__m128i, __m128i) {
    let zeros = _mm_setzero_si128();
    let lo = _mm_add_epi32(
        slope,
        _mm_add_epi32(
            _mm_madd_epi16(_mm_unpacklo_epi16(v0, v1), w01),
            _mm_madd_epi16(_mm_unpacklo_epi16(v2, zeros), w2),
        ),
    );
    let hi = _mm_add_epi32(
        slope,
        _mm_add_epi32(
            _mm_madd_epi16(_mm_unpackhi_epi16(v0, v1), w01),
            _mm_madd_epi16(_mm_unpackhi_epi16(v2, zeros), w2),
        ),
    );
    (lo, hi)
}

/// Luma of 16 pixels
#[inline(always)]
pub(crate) unsafe fn sse_rgb_to_y(
    r: __m128i,
    g: __m128i,
    b: __m128i,
    weights: &SseForwardWeights,
) -> __m128i {
    let zeros = _mm_setzero_si128();
    let (y0_lo, y0_hi) = sse_affine_dot(
        _mm_unpacklo_epi8(r, zeros),
        _mm_unpacklo_epi8(g, zeros),
        _mm_unpacklo_epi8(b, zeros),
        weights.yr_yg,
        weights.yb,
        weights.y_bias,
    );
    let (y1_lo, y1_hi) = sse_affine_dot(
        _mm_unpackhi_epi8(r, zeros),
        _mm_unpackhi_epi8(g, zeros),
        _mm_unpackhi_epi8(b, zeros),
        weights.yr_yg,
        weights.yb,
        weights.y_bias,
    );
    let lo = _mm_packs_epi32(
        _mm_srai_epi32::<PRECISION>(y0_lo),
        _mm_srai_epi32::<PRECISION>(y0_hi),
    );
    let hi = _mm_packs_epi32(
        _mm_srai_epi32::<PRECISION>(y1_lo),
        _mm_srai_epi32::<PRECISION>(y1_hi),
    );
    _mm_packus_epi16(lo, hi)
}

/// Sums every 2x2 block of a 16x2 tile channel into 8 i16 lanes
#[inline(always)]
unsafe fn sse_block_sum(row0: __m128i, row1: __m128i) -> __m128i {
    let zeros = _mm_setzero_si128();
    let lo = _mm_add_epi16(
        _mm_unpacklo_epi8(row0, zeros),
        _mm_unpacklo_epi8(row1, zeros),
    );
    let hi = _mm_add_epi16(
        _mm_unpackhi_epi8(row0, zeros),
        _mm_unpackhi_epi8(row1, zeros),
    );
    _mm_hadd_epi16(lo, hi)
}

/// Cb and Cr of the 8 blocks of a 16x2 tile, result bytes are in the low 8 lanes
#[inline(always)]
pub(crate) unsafe fn sse_rgb_to_cbcr(
    rgb0: (__m128i, __m128i, __m128i),
    rgb1: (__m128i, __m128i, __m128i),
    weights: &SseForwardWeights,
) -> (__m128i, __m128i) {
    let sum_r = sse_block_sum(rgb0.0, rgb1.0);
    let sum_g = sse_block_sum(rgb0.1, rgb1.1);
    let sum_b = sse_block_sum(rgb0.2, rgb1.2);

    let (cb_lo, cb_hi) = sse_affine_dot(
        sum_r,
        sum_g,
        sum_b,
        weights.cbr_cbg,
        weights.cbb,
        weights.uv_bias,
    );
    let (cr_lo, cr_hi) = sse_affine_dot(
        sum_r,
        sum_g,
        sum_b,
        weights.crr_crg,
        weights.crb,
        weights.uv_bias,
    );

    let cb = _mm_packs_epi32(
        _mm_srai_epi32::<CHROMA_SUM_PRECISION>(cb_lo),
        _mm_srai_epi32::<CHROMA_SUM_PRECISION>(cb_hi),
    );
    let cr = _mm_packs_epi32(
        _mm_srai_epi32::<CHROMA_SUM_PRECISION>(cr_lo),
        _mm_srai_epi32::<CHROMA_SUM_PRECISION>(cr_hi),
    );
    let zeros = _mm_setzero_si128();
    (_mm_packus_epi16(cb, zeros), _mm_packus_epi16(cr, zeros))
}
