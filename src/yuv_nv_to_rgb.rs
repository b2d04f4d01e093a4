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
use crate::dispatch::{default_path, ConversionPath};
use crate::images::chroma_width;
#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
use crate::sse::sse_yuv_nv_to_rgb_row420;
use crate::yuv_error::{check_plane_alignment, check_rgb_plane, YuvPlane};
use crate::yuv_support::{CbCrInverseTransform, YuvChromaRange, YuvNVOrder, YuvStandard};
use crate::yuv_to_rgb::ycbcr_to_rgb_pixel;
use crate::{YuvBiPlanarImage, YuvError};
#[cfg(feature = "rayon")]
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
#[cfg(feature = "rayon")]
use rayon::prelude::{ParallelSlice, ParallelSliceMut};

/// Scalar NV12/NV21 row, starts from luma column `start_cx` which must be even
pub(crate) fn yuv_nv_to_rgb_row420<const UV_ORDER: u8>(
    range: &YuvChromaRange,
    transform: &CbCrInverseTransform<i32>,
    y_plane: &[u8],
    uv_plane: &[u8],
    rgb: &mut [u8],
    start_cx: usize,
    width: usize,
) {
    let order: YuvNVOrder = UV_ORDER.into();
    let bias_y = range.bias_y as i32;
    let bias_uv = range.bias_uv as i32;

    for ((rgb, y_src), uv_src) in rgb[..width * 3]
        .chunks_mut(6)
        .zip(y_plane[..width].chunks(2))
        .zip(uv_plane.chunks_exact(2))
        .skip(start_cx / 2)
    {
        let cb_value = uv_src[order.get_u_position()] as i32 - bias_uv;
        let cr_value = uv_src[order.get_v_position()] as i32 - bias_uv;

        for (dst, &y_value) in rgb.chunks_exact_mut(3).zip(y_src.iter()) {
            ycbcr_to_rgb_pixel(transform, bias_y, y_value, cb_value, cr_value, dst);
        }
    }
}

fn yuv_nv_to_rgb24_impl<const UV_ORDER: u8>(
    bi_planar_image: &YuvBiPlanarImage,
    rgb: &mut [u8],
    rgb_stride: u32,
    standard: YuvStandard,
    path: ConversionPath,
) -> Result<(), YuvError> {
    bi_planar_image.check_constraints()?;
    check_rgb_plane(
        rgb,
        rgb_stride,
        bi_planar_image.width,
        bi_planar_image.height,
        3,
    )?;
    if path.is_aligned() {
        bi_planar_image.check_alignment()?;
        check_plane_alignment(YuvPlane::Rgb, rgb, rgb_stride)?;
    }

    let range = standard.chroma_range();
    let transform = standard.inverse_transform();

    let width = bi_planar_image.width as usize;
    let height = bi_planar_image.height as usize;
    let uv_row_bytes = chroma_width(bi_planar_image.width) as usize * 2;
    let chroma_height = height.div_ceil(2);
    let rgb_stride = rgb_stride as usize;
    let y_stride = bi_planar_image.y_stride as usize;

    let _use_sse = path.uses_simd();
    let _aligned = path.is_aligned();

    let iter;
    #[cfg(feature = "rayon")]
    {
        iter = rgb
            .par_chunks_mut(rgb_stride * 2)
            .zip(bi_planar_image.y_plane.par_chunks(y_stride * 2))
            .zip(
                bi_planar_image
                    .uv_plane
                    .par_chunks(bi_planar_image.uv_stride as usize),
            )
            .take(chroma_height);
    }
    #[cfg(not(feature = "rayon"))]
    {
        iter = rgb
            .chunks_mut(rgb_stride * 2)
            .zip(bi_planar_image.y_plane.chunks(y_stride * 2))
            .zip(
                bi_planar_image
                    .uv_plane
                    .chunks(bi_planar_image.uv_stride as usize),
            )
            .take(chroma_height);
    }

    iter.enumerate()
        .for_each(|(pair, ((rgb, y_plane), uv_plane))| {
            let has_second_row = pair * 2 + 1 < height;
            let (rgb0, mut rgb1) = if has_second_row {
                let (rgb0, rgb1) = rgb.split_at_mut(rgb_stride);
                (&mut rgb0[..width * 3], Some(&mut rgb1[..width * 3]))
            } else {
                (&mut rgb[..width * 3], None)
            };
            let y_plane0 = &y_plane[..width];
            let y_plane1 = if has_second_row {
                Some(&y_plane[y_stride..y_stride + width])
            } else {
                None
            };
            let uv_plane = &uv_plane[..uv_row_bytes];

            let mut _cx = 0usize;

            #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
            if _use_sse {
                if let (Some(rgb1), Some(y_plane1)) = (rgb1.as_deref_mut(), y_plane1) {
                    let processed = if _aligned {
                        sse_yuv_nv_to_rgb_row420::<UV_ORDER, true>(
                            &range, transform, y_plane0, y_plane1, uv_plane, rgb0, rgb1, width,
                        )
                    } else {
                        sse_yuv_nv_to_rgb_row420::<UV_ORDER, false>(
                            &range, transform, y_plane0, y_plane1, uv_plane, rgb0, rgb1, width,
                        )
                    };
                    debug_assert_eq!(processed.ux, processed.cx / 2);
                    _cx = processed.cx;
                }
            }

            yuv_nv_to_rgb_row420::<UV_ORDER>(
                &range, transform, y_plane0, uv_plane, rgb0, _cx, width,
            );
            if let (Some(rgb1), Some(y_plane1)) = (rgb1, y_plane1) {
                yuv_nv_to_rgb_row420::<UV_ORDER>(
                    &range, transform, y_plane1, uv_plane, rgb1, _cx, width,
                );
            }
        });

    Ok(())
}

/// Convert YUV NV12 format to RGB format.
///
/// This function takes YUV NV12 data with 8-bit precision,
/// and converts it to RGB format with 8-bit per channel precision.
/// Chroma plane holds U and V samples interleaved in U, V order.
///
/// # Arguments
///
/// * `bi_planar_image` - Source Bi-Planar image.
/// * `rgb` - A mutable slice to store the converted RGB data.
/// * `rgb_stride` - The stride (bytes per row) for the RGB image data.
/// * `standard` - The YCbCr standard, BT.601, BT.709 or JPEG.
///
/// # Errors
///
/// Returns an error if plane sizes or strides don't fit the image dimensions.
/// Nothing is written in that case.
///
pub fn nv12_to_rgb24(
    bi_planar_image: &YuvBiPlanarImage,
    rgb: &mut [u8],
    rgb_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuv_nv_to_rgb24_impl::<{ YuvNVOrder::UV as u8 }>(
        bi_planar_image,
        rgb,
        rgb_stride,
        standard,
        default_path(),
    )
}

/// Convert YUV NV12 format to RGB format using scalar code only.
///
/// See [`nv12_to_rgb24`] for arguments.
pub fn nv12_to_rgb24_scalar(
    bi_planar_image: &YuvBiPlanarImage,
    rgb: &mut [u8],
    rgb_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuv_nv_to_rgb24_impl::<{ YuvNVOrder::UV as u8 }>(
        bi_planar_image,
        rgb,
        rgb_stride,
        standard,
        ConversionPath::Scalar,
    )
}

/// Convert YUV NV12 format to RGB format using SSE4.1 tiles with unaligned access.
///
/// See [`nv12_to_rgb24`] for arguments.
pub fn nv12_to_rgb24_simd(
    bi_planar_image: &YuvBiPlanarImage,
    rgb: &mut [u8],
    rgb_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuv_nv_to_rgb24_impl::<{ YuvNVOrder::UV as u8 }>(
        bi_planar_image,
        rgb,
        rgb_stride,
        standard,
        ConversionPath::Simd,
    )
}

/// Convert YUV NV12 format to RGB format using SSE4.1 tiles with aligned access.
///
/// Both planes and the RGB buffer must start at a 16 bytes boundary
/// and have a stride multiple of 16, otherwise [`YuvError::UnalignedBuffer`] is returned.
/// See [`nv12_to_rgb24`] for arguments.
pub fn nv12_to_rgb24_simd_aligned(
    bi_planar_image: &YuvBiPlanarImage,
    rgb: &mut [u8],
    rgb_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuv_nv_to_rgb24_impl::<{ YuvNVOrder::UV as u8 }>(
        bi_planar_image,
        rgb,
        rgb_stride,
        standard,
        ConversionPath::SimdAligned,
    )
}

/// Convert YUV NV21 format to RGB format.
///
/// Same as [`nv12_to_rgb24`] except the chroma plane holds V, U pairs.
pub fn nv21_to_rgb24(
    bi_planar_image: &YuvBiPlanarImage,
    rgb: &mut [u8],
    rgb_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuv_nv_to_rgb24_impl::<{ YuvNVOrder::VU as u8 }>(
        bi_planar_image,
        rgb,
        rgb_stride,
        standard,
        default_path(),
    )
}

/// Convert YUV NV21 format to RGB format using scalar code only.
pub fn nv21_to_rgb24_scalar(
    bi_planar_image: &YuvBiPlanarImage,
    rgb: &mut [u8],
    rgb_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuv_nv_to_rgb24_impl::<{ YuvNVOrder::VU as u8 }>(
        bi_planar_image,
        rgb,
        rgb_stride,
        standard,
        ConversionPath::Scalar,
    )
}

/// Convert YUV NV21 format to RGB format using SSE4.1 tiles with unaligned access.
pub fn nv21_to_rgb24_simd(
    bi_planar_image: &YuvBiPlanarImage,
    rgb: &mut [u8],
    rgb_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuv_nv_to_rgb24_impl::<{ YuvNVOrder::VU as u8 }>(
        bi_planar_image,
        rgb,
        rgb_stride,
        standard,
        ConversionPath::Simd,
    )
}

/// Convert YUV NV21 format to RGB format using SSE4.1 tiles with aligned access.
///
/// Alignment requirements are the same as in [`nv12_to_rgb24_simd_aligned`].
pub fn nv21_to_rgb24_simd_aligned(
    bi_planar_image: &YuvBiPlanarImage,
    rgb: &mut [u8],
    rgb_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    yuv_nv_to_rgb24_impl::<{ YuvNVOrder::VU as u8 }>(
        bi_planar_image,
        rgb,
        rgb_stride,
        standard,
        ConversionPath::SimdAligned,
    )
}
