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
use crate::yuv_support::{CbCrForwardTransform, CbCrInverseTransform};
use crate::YuvStandard;

/// Fixed point precision of every built transform
pub(crate) const PRECISION: i32 = 13;
/// Chroma is computed from a sum of a 2x2 block, so division by 4 is folded into the shift
pub(crate) const CHROMA_SUM_PRECISION: i32 = PRECISION + 2;

static FORWARD_BT601_LIMITED_8_13PREC: CbCrForwardTransform<i32> = CbCrForwardTransform {
    yr: 2103,
    yg: 4129,
    yb: 802,
    cb_r: -1215,
    cb_g: -2384,
    cb_b: 3598,
    cr_r: 3598,
    cr_g: -3013,
    cr_b: -586,
};

static FORWARD_BT709_LIMITED_8_13PREC: CbCrForwardTransform<i32> = CbCrForwardTransform {
    yr: 1495,
    yg: 5031,
    yb: 507,
    cb_r: -825,
    cb_g: -2774,
    cb_b: 3598,
    cr_r: 3598,
    cr_g: -3269,
    cr_b: -330,
};

static FORWARD_JPEG_FULL_8_13PREC: CbCrForwardTransform<i32> = CbCrForwardTransform {
    yr: 2449,
    yg: 4808,
    yb: 933,
    cb_r: -1383,
    cb_g: -2714,
    cb_b: 4096,
    cr_r: 4096,
    cr_g: -3430,
    cr_b: -667,
};

pub(crate) fn get_built_forward_transform(
    standard: YuvStandard,
) -> &'static CbCrForwardTransform<i32> {
    match standard {
        YuvStandard::Bt601 => &FORWARD_BT601_LIMITED_8_13PREC,
        YuvStandard::Bt709 => &FORWARD_BT709_LIMITED_8_13PREC,
        YuvStandard::Jpeg => &FORWARD_JPEG_FULL_8_13PREC,
    }
}

static INVERSE_BT601_LIMITED_8_PREC13: CbCrInverseTransform<i32> = CbCrInverseTransform {
    y_coef: 9538,
    cr_coef: 13074,
    cb_coef: 16525,
    g_coeff_1: 6659,
    g_coeff_2: 3209,
};

static INVERSE_BT709_LIMITED_8_PREC13: CbCrInverseTransform<i32> = CbCrInverseTransform {
    y_coef: 9538,
    cr_coef: 14686,
    cb_coef: 17304,
    g_coeff_1: 4365,
    g_coeff_2: 1746,
};

static INVERSE_JPEG_FULL_8_PREC13: CbCrInverseTransform<i32> = CbCrInverseTransform {
    y_coef: 8192,
    cr_coef: 11485,
    cb_coef: 14516,
    g_coeff_1: 5850,
    g_coeff_2: 2819,
};

pub(crate) fn get_built_inverse_transform(
    standard: YuvStandard,
) -> &'static CbCrInverseTransform<i32> {
    match standard {
        YuvStandard::Bt601 => &INVERSE_BT601_LIMITED_8_PREC13,
        YuvStandard::Bt709 => &INVERSE_BT709_LIMITED_8_PREC13,
        YuvStandard::Jpeg => &INVERSE_JPEG_FULL_8_PREC13,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive_forward(standard: YuvStandard) -> [f64; 9] {
        let range = standard.chroma_range();
        let kr_kb = standard.get_kr_kb();
        let (kr, kb) = (kr_kb.kr as f64, kr_kb.kb as f64);
        let kg = 1. - kr - kb;
        let range_y = range.range_y as f64 / 255.;
        let range_uv = range.range_uv as f64 / 255.;
        [
            kr * range_y,
            kg * range_y,
            kb * range_y,
            -0.5 * kr / (1. - kb) * range_uv,
            -0.5 * kg / (1. - kb) * range_uv,
            0.5 * range_uv,
            0.5 * range_uv,
            -0.5 * kg / (1. - kr) * range_uv,
            -0.5 * kb / (1. - kr) * range_uv,
        ]
    }

    fn derive_inverse(standard: YuvStandard) -> [f64; 5] {
        let range = standard.chroma_range();
        let kr_kb = standard.get_kr_kb();
        let (kr, kb) = (kr_kb.kr as f64, kr_kb.kb as f64);
        let kg = 1. - kr - kb;
        let range_uv = 255. / range.range_uv as f64;
        [
            255. / range.range_y as f64,
            2. * (1. - kr) * range_uv,
            2. * (1. - kb) * range_uv,
            2. * ((1. - kr) * kr / kg) * range_uv,
            2. * ((1. - kb) * kb / kg) * range_uv,
        ]
    }

    #[test]
    fn test_forward_tables_match_derivation() {
        let scale = (1 << PRECISION) as f64;
        for standard in YuvStandard::ALL {
            let t = get_built_forward_transform(standard);
            let built = [
                t.yr, t.yg, t.yb, t.cb_r, t.cb_g, t.cb_b, t.cr_r, t.cr_g, t.cr_b,
            ];
            for (&b, d) in built.iter().zip(derive_forward(standard)) {
                let expected = (d * scale).round() as i32;
                assert!(
                    (b - expected).abs() <= 1,
                    "{:?}: built {}, derived {}",
                    standard,
                    b,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_inverse_tables_match_derivation() {
        let scale = (1 << PRECISION) as f64;
        for standard in YuvStandard::ALL {
            let t = get_built_inverse_transform(standard);
            let built = [t.y_coef, t.cr_coef, t.cb_coef, t.g_coeff_1, t.g_coeff_2];
            for (&b, d) in built.iter().zip(derive_inverse(standard)) {
                let expected = (d * scale).round() as i32;
                assert!(
                    (b - expected).abs() <= 1,
                    "{:?}: built {}, derived {}",
                    standard,
                    b,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_coefficients_fit_i16() {
        for standard in YuvStandard::ALL {
            let f = get_built_forward_transform(standard);
            let i = get_built_inverse_transform(standard);
            for v in [
                f.yr, f.yg, f.yb, f.cb_r, f.cb_g, f.cb_b, f.cr_r, f.cr_g, f.cr_b, i.y_coef,
                i.cr_coef, i.cb_coef, i.g_coeff_1, i.g_coeff_2,
            ] {
                assert!(v >= i16::MIN as i32 && v <= i16::MAX as i32);
            }
        }
    }
}
