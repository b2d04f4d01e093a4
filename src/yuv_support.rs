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
use crate::built_coefficients::{get_built_forward_transform, get_built_inverse_transform};
use crate::YuvError;

/// Coefficients of YCbCr to RGB transform
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CbCrInverseTransform<T> {
    pub y_coef: T,
    pub cr_coef: T,
    pub cb_coef: T,
    pub g_coeff_1: T,
    pub g_coeff_2: T,
}

impl CbCrInverseTransform<i32> {
    /// Packs `y_coef` into low and `cr_coef` into high half of i32 for pairwise multiply-add
    #[inline(always)]
    pub(crate) const fn interleaved_y_cr(&self) -> i32 {
        interleave_i16(self.y_coef, self.cr_coef)
    }

    #[inline(always)]
    pub(crate) const fn interleaved_y_cb(&self) -> i32 {
        interleave_i16(self.y_coef, self.cb_coef)
    }

    /// Green channel subtracts chroma contributions, so coefficients are negated
    #[inline(always)]
    pub(crate) const fn interleaved_y_neg_g1(&self) -> i32 {
        interleave_i16(self.y_coef, -self.g_coeff_1)
    }
}

/// Coefficients of RGB to YCbCr transform
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CbCrForwardTransform<T> {
    pub yr: T,
    pub yg: T,
    pub yb: T,
    pub cb_r: T,
    pub cb_g: T,
    pub cb_b: T,
    pub cr_r: T,
    pub cr_g: T,
    pub cr_b: T,
}

impl CbCrForwardTransform<i32> {
    #[inline(always)]
    pub(crate) const fn interleaved_yr_yg(&self) -> i32 {
        interleave_i16(self.yr, self.yg)
    }

    #[inline(always)]
    pub(crate) const fn interleaved_cbr_cbg(&self) -> i32 {
        interleave_i16(self.cb_r, self.cb_g)
    }

    #[inline(always)]
    pub(crate) const fn interleaved_crr_crg(&self) -> i32 {
        interleave_i16(self.cr_r, self.cr_g)
    }
}

#[inline(always)]
pub(crate) const fn interleave_i16(low: i32, high: i32) -> i32 {
    ((low as i16 as u16 as u32) | ((high as i16 as u16 as u32) << 16)) as i32
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Eq)]
/// Declares YUV range TV (limited) or Full
pub enum YuvRange {
    /// Limited range Y ∈ [16, 235], UV ∈ [16, 240]
    Limited,
    /// Full range Y ∈ [0, 255], UV ∈ [0, 255]
    Full,
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Eq)]
pub struct YuvChromaRange {
    pub bias_y: u32,
    pub bias_uv: u32,
    #[cfg(test)]
    pub(crate) range_y: u32,
    #[cfg(test)]
    pub(crate) range_uv: u32,
    pub range: YuvRange,
}

pub const fn get_yuv_range(range: YuvRange) -> YuvChromaRange {
    match range {
        YuvRange::Limited => YuvChromaRange {
            bias_y: 16,
            bias_uv: 128,
            #[cfg(test)]
            range_y: 219,
            #[cfg(test)]
            range_uv: 224,
            range,
        },
        YuvRange::Full => YuvChromaRange {
            bias_y: 0,
            bias_uv: 128,
            #[cfg(test)]
            range_y: 255,
            #[cfg(test)]
            range_uv: 255,
            range,
        },
    }
}

/// Luma weights of red and blue, only needed to rederive the coefficient tables
#[cfg(test)]
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub(crate) struct YuvBias {
    pub(crate) kr: f32,
    pub(crate) kb: f32,
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
/// Supported YCbCr standards, check [ITU-R](https://www.itu.int/rec/T-REC-H.273/en) for details
pub enum YuvStandard {
    /// ITU-R BT.601, studio range
    Bt601 = 0,
    /// ITU-R BT.709, studio range
    Bt709 = 1,
    /// ITU-T T.871 (JPEG), BT.601 weights with full range luma and chroma
    Jpeg = 2,
}

impl YuvStandard {
    pub const ALL: [YuvStandard; 3] = [YuvStandard::Bt601, YuvStandard::Bt709, YuvStandard::Jpeg];

    #[inline]
    pub const fn range(self) -> YuvRange {
        match self {
            YuvStandard::Bt601 | YuvStandard::Bt709 => YuvRange::Limited,
            YuvStandard::Jpeg => YuvRange::Full,
        }
    }

    #[inline]
    pub const fn chroma_range(self) -> YuvChromaRange {
        get_yuv_range(self.range())
    }

    #[cfg(test)]
    pub(crate) const fn get_kr_kb(self) -> YuvBias {
        match self {
            YuvStandard::Bt601 | YuvStandard::Jpeg => YuvBias {
                kr: 0.299f32,
                kb: 0.114f32,
            },
            YuvStandard::Bt709 => YuvBias {
                kr: 0.2126f32,
                kb: 0.0722f32,
            },
        }
    }

    /// Integer RGB to YCbCr coefficients scaled by 2^13
    #[inline]
    pub fn forward_transform(self) -> &'static CbCrForwardTransform<i32> {
        get_built_forward_transform(self)
    }

    /// Integer YCbCr to RGB coefficients scaled by 2^13
    #[inline]
    pub fn inverse_transform(self) -> &'static CbCrInverseTransform<i32> {
        get_built_inverse_transform(self)
    }
}

impl TryFrom<u8> for YuvStandard {
    type Error = YuvError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(YuvStandard::Bt601),
            1 => Ok(YuvStandard::Bt709),
            2 => Ok(YuvStandard::Jpeg),
            _ => Err(YuvError::UnsupportedStandard(value)),
        }
    }
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum YuvNVOrder {
    UV = 0,
    VU = 1,
}

impl YuvNVOrder {
    #[inline]
    pub const fn get_u_position(&self) -> usize {
        match self {
            YuvNVOrder::UV => 0,
            YuvNVOrder::VU => 1,
        }
    }

    #[inline]
    pub const fn get_v_position(&self) -> usize {
        match self {
            YuvNVOrder::UV => 1,
            YuvNVOrder::VU => 0,
        }
    }
}

impl From<u8> for YuvNVOrder {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => YuvNVOrder::UV,
            1 => YuvNVOrder::VU,
            _ => {
                panic!("Unknown value")
            }
        }
    }
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum YuvSourceChannels {
    Rgb = 0,
    Rgba = 1,
}

impl From<u8> for YuvSourceChannels {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => YuvSourceChannels::Rgb,
            1 => YuvSourceChannels::Rgba,
            _ => {
                panic!("Unknown value")
            }
        }
    }
}

impl YuvSourceChannels {
    #[inline(always)]
    pub const fn get_channels_count(&self) -> usize {
        match self {
            YuvSourceChannels::Rgb => 3,
            YuvSourceChannels::Rgba => 4,
        }
    }

    #[inline(always)]
    pub const fn get_r_channel_offset(&self) -> usize {
        0
    }

    #[inline(always)]
    pub const fn get_g_channel_offset(&self) -> usize {
        1
    }

    #[inline(always)]
    pub const fn get_b_channel_offset(&self) -> usize {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_from_u8() {
        assert_eq!(YuvStandard::try_from(0u8), Ok(YuvStandard::Bt601));
        assert_eq!(YuvStandard::try_from(1u8), Ok(YuvStandard::Bt709));
        assert_eq!(YuvStandard::try_from(2u8), Ok(YuvStandard::Jpeg));
        assert_eq!(
            YuvStandard::try_from(3u8),
            Err(YuvError::UnsupportedStandard(3))
        );
        for standard in YuvStandard::ALL {
            assert_eq!(YuvStandard::try_from(standard as u8), Ok(standard));
        }
    }

    #[test]
    fn test_interleave_i16() {
        let packed = interleave_i16(-3, 7);
        assert_eq!(packed as u32 & 0xffff, (-3i16) as u16 as u32);
        assert_eq!((packed as u32) >> 16, 7);
    }

    #[test]
    fn test_nv_order_positions() {
        assert_eq!(YuvNVOrder::UV.get_u_position(), 0);
        assert_eq!(YuvNVOrder::UV.get_v_position(), 1);
        assert_eq!(YuvNVOrder::VU.get_u_position(), 1);
        assert_eq!(YuvNVOrder::VU.get_v_position(), 0);
    }
}
