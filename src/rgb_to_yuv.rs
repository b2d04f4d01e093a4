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
use crate::dispatch::{default_path, ConversionPath};
use crate::images::chroma_width;
use crate::numerics::qrshr;
#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
use crate::sse::sse_rgb_to_yuv_row420;
use crate::yuv_error::{check_plane_alignment, check_rgb_plane, YuvPlane};
use crate::yuv_support::{CbCrForwardTransform, YuvChromaRange, YuvSourceChannels, YuvStandard};
use crate::{YuvError, YuvPlanarImageMut};
#[cfg(feature = "rayon")]
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
#[cfg(feature = "rayon")]
use rayon::prelude::{ParallelSlice, ParallelSliceMut};

/// First and second pixel of a horizontal pair, a lone last pixel pairs with itself
#[inline(always)]
fn pixel_pair(block: &[u8], channels: usize) -> (&[u8], &[u8]) {
    if block.len() >= channels * 2 {
        (&block[..channels], &block[channels..channels * 2])
    } else {
        (&block[..channels], &block[..channels])
    }
}

/// Scalar 4:2:0 row pair, starts from luma column `start_cx` which must be even.
///
/// When the image has an odd height the last row comes alone: `y_plane1` is `None`
/// and `rgba1` is the same row as `rgba0`, so chroma averages the row with itself.
pub(crate) fn rgb_to_yuv_row420<const ORIGIN_CHANNELS: u8>(
    range: &YuvChromaRange,
    transform: &CbCrForwardTransform<i32>,
    y_plane0: &mut [u8],
    y_plane1: Option<&mut [u8]>,
    u_plane: &mut [u8],
    v_plane: &mut [u8],
    rgba0: &[u8],
    rgba1: &[u8],
    start_cx: usize,
    width: usize,
) {
    let source_channels: YuvSourceChannels = ORIGIN_CHANNELS.into();
    let channels = source_channels.get_channels_count();
    let r_pos = source_channels.get_r_channel_offset();
    let g_pos = source_channels.get_g_channel_offset();
    let b_pos = source_channels.get_b_channel_offset();

    let bias_y = (range.bias_y as i32) << PRECISION;
    let bias_uv = (range.bias_uv as i32) << CHROMA_SUM_PRECISION;

    let rgba0 = &rgba0[..width * channels];
    let rgba1 = &rgba1[..width * channels];

    let luma = |src: &[u8]| -> u8 {
        let r = src[r_pos] as i32;
        let g = src[g_pos] as i32;
        let b = src[b_pos] as i32;
        qrshr::<PRECISION, 8>(r * transform.yr + g * transform.yg + b * transform.yb + bias_y)
            as u8
    };

    for (y_dst, src) in y_plane0[..width]
        .iter_mut()
        .zip(rgba0.chunks_exact(channels))
        .skip(start_cx)
    {
        *y_dst = luma(src);
    }

    if let Some(y_plane1) = y_plane1 {
        for (y_dst, src) in y_plane1[..width]
            .iter_mut()
            .zip(rgba1.chunks_exact(channels))
            .skip(start_cx)
        {
            *y_dst = luma(src);
        }
    }

    for (((u_dst, v_dst), block0), block1) in u_plane
        .iter_mut()
        .zip(v_plane.iter_mut())
        .zip(rgba0.chunks(channels * 2))
        .zip(rgba1.chunks(channels * 2))
        .skip(start_cx / 2)
    {
        let (p00, p01) = pixel_pair(block0, channels);
        let (p10, p11) = pixel_pair(block1, channels);

        let sum_r = p00[r_pos] as i32 + p01[r_pos] as i32 + p10[r_pos] as i32 + p11[r_pos] as i32;
        let sum_g = p00[g_pos] as i32 + p01[g_pos] as i32 + p10[g_pos] as i32 + p11[g_pos] as i32;
        let sum_b = p00[b_pos] as i32 + p01[b_pos] as i32 + p10[b_pos] as i32 + p11[b_pos] as i32;

        let cb = qrshr::<CHROMA_SUM_PRECISION, 8>(
            sum_r * transform.cb_r + sum_g * transform.cb_g + sum_b * transform.cb_b + bias_uv,
        );
        let cr = qrshr::<CHROMA_SUM_PRECISION, 8>(
            sum_r * transform.cr_r + sum_g * transform.cr_g + sum_b * transform.cr_b + bias_uv,
        );
        *u_dst = cb as u8;
        *v_dst = cr as u8;
    }
}

fn rgbx_to_yuv420<const ORIGIN_CHANNELS: u8>(
    planar_image: &mut YuvPlanarImageMut,
    rgba: &[u8],
    rgba_stride: u32,
    standard: YuvStandard,
    path: ConversionPath,
) -> Result<(), YuvError> {
    let source_channels: YuvSourceChannels = ORIGIN_CHANNELS.into();
    let channels = source_channels.get_channels_count();

    planar_image.check_constraints()?;
    check_rgb_plane(
        rgba,
        rgba_stride,
        planar_image.width,
        planar_image.height,
        channels,
    )?;
    if path.is_aligned() {
        planar_image.check_alignment()?;
        let plane = match source_channels {
            YuvSourceChannels::Rgb => YuvPlane::Rgb,
            YuvSourceChannels::Rgba => YuvPlane::Rgba,
        };
        check_plane_alignment(plane, rgba, rgba_stride)?;
    }

    let range = standard.chroma_range();
    let transform = standard.forward_transform();

    let width = planar_image.width as usize;
    let height = planar_image.height as usize;
    let chroma_width = chroma_width(planar_image.width) as usize;
    let chroma_height = height.div_ceil(2);
    let rgba_stride = rgba_stride as usize;
    let y_stride = planar_image.y_stride as usize;
    let u_stride = planar_image.u_stride as usize;
    let v_stride = planar_image.v_stride as usize;

    let _use_sse = path.uses_simd();
    let _aligned = path.is_aligned();

    let y_plane = planar_image.y_plane.borrow_mut();
    let u_plane = planar_image.u_plane.borrow_mut();
    let v_plane = planar_image.v_plane.borrow_mut();

    let iter;
    #[cfg(feature = "rayon")]
    {
        iter = y_plane
            .par_chunks_mut(y_stride * 2)
            .zip(u_plane.par_chunks_mut(u_stride))
            .zip(v_plane.par_chunks_mut(v_stride))
            .zip(rgba.par_chunks(rgba_stride * 2))
            .take(chroma_height);
    }
    #[cfg(not(feature = "rayon"))]
    {
        iter = y_plane
            .chunks_mut(y_stride * 2)
            .zip(u_plane.chunks_mut(u_stride))
            .zip(v_plane.chunks_mut(v_stride))
            .zip(rgba.chunks(rgba_stride * 2))
            .take(chroma_height);
    }

    iter.enumerate()
        .for_each(|(pair, (((y_plane, u_plane), v_plane), rgba))| {
            let has_second_row = pair * 2 + 1 < height;
            let (y_plane0, mut y_plane1) = if has_second_row {
                let (y_plane0, y_plane1) = y_plane.split_at_mut(y_stride);
                (&mut y_plane0[..width], Some(&mut y_plane1[..width]))
            } else {
                (&mut y_plane[..width], None)
            };
            let rgba0 = &rgba[..width * channels];
            let rgba1 = if has_second_row {
                &rgba[rgba_stride..rgba_stride + width * channels]
            } else {
                rgba0
            };
            let u_plane = &mut u_plane[..chroma_width];
            let v_plane = &mut v_plane[..chroma_width];

            let mut _cx = 0usize;

            #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
            if _use_sse {
                if let Some(y_plane1) = y_plane1.as_deref_mut() {
                    let processed = if _aligned {
                        sse_rgb_to_yuv_row420::<ORIGIN_CHANNELS, true>(
                            &range, transform, y_plane0, y_plane1, u_plane, v_plane, rgba0, rgba1,
                            width,
                        )
                    } else {
                        sse_rgb_to_yuv_row420::<ORIGIN_CHANNELS, false>(
                            &range, transform, y_plane0, y_plane1, u_plane, v_plane, rgba0, rgba1,
                            width,
                        )
                    };
                    debug_assert_eq!(processed.ux, processed.cx / 2);
                    _cx = processed.cx;
                }
            }

            rgb_to_yuv_row420::<ORIGIN_CHANNELS>(
                &range, transform, y_plane0, y_plane1, u_plane, v_plane, rgba0, rgba1, _cx, width,
            );
        });

    Ok(())
}

/// Convert RGB image data to YUV 420 planar format.
///
/// This function performs RGB to YUV conversion and stores the result in YUV420 planar format,
/// with plane for each channel.
/// Chroma of each 2x2 block is the rounded average of its four pixels,
/// pixels of an odd right column or bottom row are counted twice.
///
/// # Arguments
///
/// * `planar_image` - Target planar image.
/// * `rgb` - The input RGB image data slice.
/// * `rgb_stride` - The stride (bytes per row) for the RGB image data.
/// * `standard` - The YCbCr standard, BT.601, BT.709 or JPEG.
///
/// # Errors
///
/// Returns an error if plane sizes or strides don't fit the image dimensions.
/// Nothing is written in that case.
///
pub fn rgb24_to_yuv420(
    planar_image: &mut YuvPlanarImageMut,
    rgb: &[u8],
    rgb_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    rgbx_to_yuv420::<{ YuvSourceChannels::Rgb as u8 }>(
        planar_image,
        rgb,
        rgb_stride,
        standard,
        default_path(),
    )
}

/// Convert RGB image data to YUV 420 planar format using scalar code only.
///
/// See [`rgb24_to_yuv420`] for arguments.
pub fn rgb24_to_yuv420_scalar(
    planar_image: &mut YuvPlanarImageMut,
    rgb: &[u8],
    rgb_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    rgbx_to_yuv420::<{ YuvSourceChannels::Rgb as u8 }>(
        planar_image,
        rgb,
        rgb_stride,
        standard,
        ConversionPath::Scalar,
    )
}

/// Convert RGB image data to YUV 420 planar format using SSE4.1 tiles with unaligned access.
///
/// See [`rgb24_to_yuv420`] for arguments.
pub fn rgb24_to_yuv420_simd(
    planar_image: &mut YuvPlanarImageMut,
    rgb: &[u8],
    rgb_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    rgbx_to_yuv420::<{ YuvSourceChannels::Rgb as u8 }>(
        planar_image,
        rgb,
        rgb_stride,
        standard,
        ConversionPath::Simd,
    )
}

/// Convert RGB image data to YUV 420 planar format using SSE4.1 tiles with aligned access.
///
/// Every plane and the RGB buffer must start at a 16 bytes boundary
/// and have a stride multiple of 16, otherwise [`YuvError::UnalignedBuffer`] is returned.
pub fn rgb24_to_yuv420_simd_aligned(
    planar_image: &mut YuvPlanarImageMut,
    rgb: &[u8],
    rgb_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    rgbx_to_yuv420::<{ YuvSourceChannels::Rgb as u8 }>(
        planar_image,
        rgb,
        rgb_stride,
        standard,
        ConversionPath::SimdAligned,
    )
}

/// Convert RGBA image data to YUV 420 planar format.
///
/// Alpha channel is ignored, everything else is the same as in [`rgb24_to_yuv420`].
pub fn rgba32_to_yuv420(
    planar_image: &mut YuvPlanarImageMut,
    rgba: &[u8],
    rgba_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    rgbx_to_yuv420::<{ YuvSourceChannels::Rgba as u8 }>(
        planar_image,
        rgba,
        rgba_stride,
        standard,
        default_path(),
    )
}

/// Convert RGBA image data to YUV 420 planar format using scalar code only.
pub fn rgba32_to_yuv420_scalar(
    planar_image: &mut YuvPlanarImageMut,
    rgba: &[u8],
    rgba_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    rgbx_to_yuv420::<{ YuvSourceChannels::Rgba as u8 }>(
        planar_image,
        rgba,
        rgba_stride,
        standard,
        ConversionPath::Scalar,
    )
}

/// Convert RGBA image data to YUV 420 planar format using SSE4.1 tiles with unaligned access.
pub fn rgba32_to_yuv420_simd(
    planar_image: &mut YuvPlanarImageMut,
    rgba: &[u8],
    rgba_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    rgbx_to_yuv420::<{ YuvSourceChannels::Rgba as u8 }>(
        planar_image,
        rgba,
        rgba_stride,
        standard,
        ConversionPath::Simd,
    )
}

/// Convert RGBA image data to YUV 420 planar format using SSE4.1 tiles with aligned access.
///
/// Alignment requirements are the same as in [`rgb24_to_yuv420_simd_aligned`].
pub fn rgba32_to_yuv420_simd_aligned(
    planar_image: &mut YuvPlanarImageMut,
    rgba: &[u8],
    rgba_stride: u32,
    standard: YuvStandard,
) -> Result<(), YuvError> {
    rgbx_to_yuv420::<{ YuvSourceChannels::Rgba as u8 }>(
        planar_image,
        rgba,
        rgba_stride,
        standard,
        ConversionPath::SimdAligned,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internals::{
        aligned_stride, aligned_window, copy_with_stride, pack_rows, OVERSIZED_LAYOUTS,
    };
    use crate::{yuv420_to_rgb24, BufferStoreMut};
    use rand::Rng;

    const SIZES: [(u32, u32); 11] = [
        (1, 1),
        (2, 2),
        (15, 3),
        (16, 2),
        (17, 5),
        (31, 7),
        (32, 32),
        (33, 17),
        (47, 9),
        (64, 31),
        (100, 3),
    ];

    type Encode = fn(&mut YuvPlanarImageMut, &[u8], u32, YuvStandard) -> Result<(), YuvError>;

    fn random_bytes(len: usize) -> Vec<u8> {
        let mut rng = rand::rng();
        (0..len).map(|_| rng.random::<u8>()).collect()
    }

    fn planes(image: &YuvPlanarImageMut) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
        (
            image.y_plane.borrow().to_vec(),
            image.u_plane.borrow().to_vec(),
            image.v_plane.borrow().to_vec(),
        )
    }

    fn encode_aligned(
        rgba: &[u8],
        width: u32,
        height: u32,
        channels: usize,
        standard: YuvStandard,
        encode: Encode,
    ) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
        let w = width as usize;
        let h = height as usize;
        let chroma_width = width.div_ceil(2) as usize;
        let chroma_height = h.div_ceil(2);

        let y_stride = aligned_stride(w);
        let uv_stride = aligned_stride(chroma_width);
        let rgba_stride = aligned_stride(w * channels);

        let mut rgba_storage = vec![0u8; rgba_stride * h + 16];
        let rgba_window = aligned_window(&mut rgba_storage, rgba_stride * h);
        copy_with_stride(rgba, w * channels, rgba_window, rgba_stride);

        let mut y_storage = vec![0u8; y_stride * h + 16];
        let mut u_storage = vec![0u8; uv_stride * chroma_height + 16];
        let mut v_storage = vec![0u8; uv_stride * chroma_height + 16];
        let mut image = YuvPlanarImageMut {
            y_plane: BufferStoreMut::Borrowed(aligned_window(&mut y_storage, y_stride * h)),
            y_stride: y_stride as u32,
            u_plane: BufferStoreMut::Borrowed(aligned_window(
                &mut u_storage,
                uv_stride * chroma_height,
            )),
            u_stride: uv_stride as u32,
            v_plane: BufferStoreMut::Borrowed(aligned_window(
                &mut v_storage,
                uv_stride * chroma_height,
            )),
            v_stride: uv_stride as u32,
            width,
            height,
        };
        encode(&mut image, rgba_window, rgba_stride as u32, standard).unwrap();
        (
            pack_rows(image.y_plane.borrow(), w, h, y_stride),
            pack_rows(image.u_plane.borrow(), chroma_width, chroma_height, uv_stride),
            pack_rows(image.v_plane.borrow(), chroma_width, chroma_height, uv_stride),
        )
    }

    #[test]
    fn test_paths_are_bit_exact() {
        let layouts: [(usize, Encode, Encode, Encode); 2] = [
            (
                3,
                rgb24_to_yuv420_scalar,
                rgb24_to_yuv420_simd,
                rgb24_to_yuv420_simd_aligned,
            ),
            (
                4,
                rgba32_to_yuv420_scalar,
                rgba32_to_yuv420_simd,
                rgba32_to_yuv420_simd_aligned,
            ),
        ];
        for (channels, scalar_fn, simd_fn, aligned_fn) in layouts {
            for standard in YuvStandard::ALL {
                for (width, height) in SIZES {
                    let stride = width * channels as u32;
                    let rgba = random_bytes((stride * height) as usize);

                    let mut scalar = YuvPlanarImageMut::alloc(width, height);
                    scalar_fn(&mut scalar, &rgba, stride, standard).unwrap();
                    let mut simd = YuvPlanarImageMut::alloc(width, height);
                    simd_fn(&mut simd, &rgba, stride, standard).unwrap();
                    assert_eq!(
                        planes(&scalar),
                        planes(&simd),
                        "{:?} {}x{} x{} unaligned",
                        standard,
                        width,
                        height,
                        channels
                    );

                    let aligned =
                        encode_aligned(&rgba, width, height, channels, standard, aligned_fn);
                    assert_eq!(
                        planes(&scalar),
                        aligned,
                        "{:?} {}x{} x{} aligned",
                        standard,
                        width,
                        height,
                        channels
                    );
                }
            }
        }
    }

    #[test]
    fn test_bt601_white_and_black() {
        let width = 18u32;
        let height = 3u32;
        let mut image = YuvPlanarImageMut::alloc(width, height);

        let white = vec![255u8; (width * 3 * height) as usize];
        rgb24_to_yuv420(&mut image, &white, width * 3, YuvStandard::Bt601).unwrap();
        assert!(image.y_plane.borrow().iter().all(|&v| v == 235));
        assert!(image.u_plane.borrow().iter().all(|&v| v == 128));
        assert!(image.v_plane.borrow().iter().all(|&v| v == 128));

        let black = vec![0u8; (width * 3 * height) as usize];
        rgb24_to_yuv420(&mut image, &black, width * 3, YuvStandard::Bt601).unwrap();
        assert!(image.y_plane.borrow().iter().all(|&v| v == 16));
        assert!(image.u_plane.borrow().iter().all(|&v| v == 128));
        assert!(image.v_plane.borrow().iter().all(|&v| v == 128));
    }

    #[test]
    fn test_full_range_extremes() {
        let mut image = YuvPlanarImageMut::alloc(4, 2);
        rgb24_to_yuv420(&mut image, &[255u8; 24], 12, YuvStandard::Jpeg).unwrap();
        assert!(image.y_plane.borrow().iter().all(|&v| v == 255));
        rgb24_to_yuv420(&mut image, &[0u8; 24], 12, YuvStandard::Jpeg).unwrap();
        assert!(image.y_plane.borrow().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_grey_round_trip() {
        for standard in YuvStandard::ALL {
            let mut image = YuvPlanarImageMut::alloc(6, 4);
            rgb24_to_yuv420(&mut image, &[128u8; 6 * 3 * 4], 18, standard).unwrap();
            let mut rgb = vec![0u8; 6 * 3 * 4];
            yuv420_to_rgb24(&image.to_fixed(), &mut rgb, 18, standard).unwrap();
            for px in rgb.chunks_exact(3) {
                assert_eq!(px[0], px[1]);
                assert_eq!(px[1], px[2]);
                assert!((px[0] as i32 - 128).abs() <= 1, "{:?}: {:?}", standard, px);
            }
        }
    }

    #[test]
    fn test_round_trip_uniform_blocks() {
        let mut rng = rand::rng();
        for standard in YuvStandard::ALL {
            for (width, height) in [(34u32, 10u32), (17, 9)] {
                let blocks_w = width.div_ceil(2) as usize;
                let blocks_h = height.div_ceil(2) as usize;
                let colors: Vec<[u8; 3]> = (0..blocks_w * blocks_h)
                    .map(|_| [rng.random(), rng.random(), rng.random()])
                    .collect();
                let mut rgb = vec![0u8; (width * 3 * height) as usize];
                for (y, row) in rgb.chunks_exact_mut(width as usize * 3).enumerate() {
                    for (x, px) in row.chunks_exact_mut(3).enumerate() {
                        px.copy_from_slice(&colors[(y / 2) * blocks_w + x / 2]);
                    }
                }

                let mut image = YuvPlanarImageMut::alloc(width, height);
                rgb24_to_yuv420(&mut image, &rgb, width * 3, standard).unwrap();
                let mut decoded = vec![0u8; rgb.len()];
                yuv420_to_rgb24(&image.to_fixed(), &mut decoded, width * 3, standard).unwrap();

                for (&src, &dst) in rgb.iter().zip(decoded.iter()) {
                    assert!(
                        (src as i32 - dst as i32).abs() <= 3,
                        "{:?} {}x{}: {} became {}",
                        standard,
                        width,
                        height,
                        src,
                        dst
                    );
                }
            }
        }
    }

    #[test]
    fn test_odd_edges_replicate_samples() {
        // 3x3 image, black except the last column and the last row which are white
        let width = 3usize;
        let height = 3usize;
        let mut rgb = vec![0u8; width * 3 * height];
        for (y, row) in rgb.chunks_exact_mut(width * 3).enumerate() {
            for (x, px) in row.chunks_exact_mut(3).enumerate() {
                if x == 2 || y == 2 {
                    px.fill(255);
                }
            }
        }
        let mut image = YuvPlanarImageMut::alloc(width as u32, height as u32);
        image.u_plane.borrow_mut().fill(1);
        image.v_plane.borrow_mut().fill(1);
        rgb24_to_yuv420_scalar(&mut image, &rgb, (width * 3) as u32, YuvStandard::Bt601).unwrap();

        // Every block is neutral, so every chroma sample is written as 128
        assert!(image.u_plane.borrow().iter().all(|&v| v == 128));
        assert!(image.v_plane.borrow().iter().all(|&v| v == 128));
        let luma = image.y_plane.borrow();
        assert_eq!(&luma[..3], &[16, 16, 235]);
        assert_eq!(&luma[6..9], &[235, 235, 235]);
    }

    #[test]
    fn test_partial_block_average() {
        // Right edge of a 3x2 image: red column pairs with itself
        let rgb = [0u8, 0, 255, 0, 0, 255, 255, 0, 0, 0, 0, 255, 0, 0, 255, 255, 0, 0];
        let mut image = YuvPlanarImageMut::alloc(3, 2);
        rgb24_to_yuv420_scalar(&mut image, &rgb, 9, YuvStandard::Jpeg).unwrap();
        let mut red = YuvPlanarImageMut::alloc(2, 2);
        rgb24_to_yuv420_scalar(&mut red, &[255u8, 0, 0].repeat(4), 6, YuvStandard::Jpeg).unwrap();
        assert_eq!(image.u_plane.borrow()[1], red.u_plane.borrow()[0]);
        assert_eq!(image.v_plane.borrow()[1], red.v_plane.borrow()[0]);
    }

    #[test]
    fn test_rgba_ignores_alpha() {
        let (width, height) = (29u32, 7u32);
        let rgb = random_bytes((width * 3 * height) as usize);
        let mut rgba = Vec::with_capacity((width * 4 * height) as usize);
        let mut rng = rand::rng();
        for px in rgb.chunks_exact(3) {
            rgba.extend_from_slice(px);
            rgba.push(rng.random());
        }
        let mut from_rgb = YuvPlanarImageMut::alloc(width, height);
        rgb24_to_yuv420(&mut from_rgb, &rgb, width * 3, YuvStandard::Bt709).unwrap();
        let mut from_rgba = YuvPlanarImageMut::alloc(width, height);
        rgba32_to_yuv420(&mut from_rgba, &rgba, width * 4, YuvStandard::Bt709).unwrap();
        assert_eq!(planes(&from_rgb), planes(&from_rgba));
    }

    #[test]
    fn test_stride_independence() {
        let (width, height) = (19u32, 5u32);
        let rgb = random_bytes((width * 3 * height) as usize);
        let mut tight = YuvPlanarImageMut::alloc(width, height);
        rgb24_to_yuv420(&mut tight, &rgb, width * 3, YuvStandard::Bt601).unwrap();

        let rgb_stride = width as usize * 3 + 7;
        let mut rgb_padded = vec![0u8; rgb_stride * height as usize];
        copy_with_stride(&rgb, width as usize * 3, &mut rgb_padded, rgb_stride);

        let y_stride = width as usize + 4;
        let uv_stride = 16usize;
        let mut y_padded = vec![0x5Au8; y_stride * height as usize];
        let mut u_padded = vec![0x5Au8; uv_stride * 3];
        let mut v_padded = vec![0x5Au8; uv_stride * 3];
        let mut padded = YuvPlanarImageMut {
            y_plane: BufferStoreMut::Borrowed(&mut y_padded),
            y_stride: y_stride as u32,
            u_plane: BufferStoreMut::Borrowed(&mut u_padded),
            u_stride: uv_stride as u32,
            v_plane: BufferStoreMut::Borrowed(&mut v_padded),
            v_stride: uv_stride as u32,
            width,
            height,
        };
        rgb24_to_yuv420(&mut padded, &rgb_padded, rgb_stride as u32, YuvStandard::Bt601).unwrap();
        drop(padded);

        assert_eq!(
            pack_rows(&y_padded, width as usize, height as usize, y_stride),
            tight.y_plane.borrow()
        );
        assert_eq!(pack_rows(&u_padded, 10, 3, uv_stride), tight.u_plane.borrow());
        assert_eq!(pack_rows(&v_padded, 10, 3, uv_stride), tight.v_plane.borrow());
        for row in y_padded.chunks_exact(y_stride) {
            assert!(row[width as usize..].iter().all(|&v| v == 0x5A));
        }
        for row in u_padded.chunks_exact(uv_stride).chain(v_padded.chunks_exact(uv_stride)) {
            assert!(row[10..].iter().all(|&v| v == 0x5A));
        }
    }

    #[test]
    fn test_oversized_planes() {
        let (width, height) = (35u32, 5u32);
        let w = width as usize;
        let h = height as usize;
        let chroma_width = width.div_ceil(2) as usize;
        let chroma_height = h.div_ceil(2);
        let encoders: [(usize, [Encode; 3]); 2] = [
            (
                3,
                [rgb24_to_yuv420, rgb24_to_yuv420_scalar, rgb24_to_yuv420_simd],
            ),
            (
                4,
                [
                    rgba32_to_yuv420,
                    rgba32_to_yuv420_scalar,
                    rgba32_to_yuv420_simd,
                ],
            ),
        ];
        for (channels, encoders) in encoders {
            let row_bytes = w * channels;
            let rgba = random_bytes(row_bytes * h);
            let mut tight = YuvPlanarImageMut::alloc(width, height);
            encoders[1](&mut tight, &rgba, row_bytes as u32, YuvStandard::Jpeg).unwrap();
            let (y_tight, u_tight, v_tight) = planes(&tight);

            for layout in OVERSIZED_LAYOUTS {
                let source = layout.plane(Some(rgba.as_slice()), row_bytes, h, 0x11);
                for encode in encoders {
                    let mut y_plane = layout.plane(None, w, h, 0xA5);
                    let mut u_plane = layout.plane(None, chroma_width, chroma_height, 0xA5);
                    let mut v_plane = layout.plane(None, chroma_width, chroma_height, 0xA5);
                    let mut image = YuvPlanarImageMut {
                        y_plane: BufferStoreMut::Borrowed(&mut y_plane),
                        y_stride: layout.stride(w) as u32,
                        u_plane: BufferStoreMut::Borrowed(&mut u_plane),
                        u_stride: layout.stride(chroma_width) as u32,
                        v_plane: BufferStoreMut::Borrowed(&mut v_plane),
                        v_stride: layout.stride(chroma_width) as u32,
                        width,
                        height,
                    };
                    let rgba_stride = layout.stride(row_bytes) as u32;
                    encode(&mut image, &source, rgba_stride, YuvStandard::Jpeg).unwrap();
                    drop(image);

                    let y_stride = layout.stride(w);
                    let uv_stride = layout.stride(chroma_width);
                    assert_eq!(pack_rows(&y_plane, w, h, y_stride), y_tight, "{:?}", layout);
                    let u = pack_rows(&u_plane, chroma_width, chroma_height, uv_stride);
                    let v = pack_rows(&v_plane, chroma_width, chroma_height, uv_stride);
                    assert_eq!(u, u_tight, "{:?}", layout);
                    assert_eq!(v, v_tight, "{:?}", layout);
                    layout.assert_outside_untouched(&y_plane, w, h, 0xA5);
                    layout.assert_outside_untouched(&u_plane, chroma_width, chroma_height, 0xA5);
                    layout.assert_outside_untouched(&v_plane, chroma_width, chroma_height, 0xA5);
                }
            }
        }
    }

    #[test]
    fn test_errors_leave_destination_untouched() {
        let (width, height) = (16u32, 4u32);
        let rgb = random_bytes((width * 3 * height) as usize);
        let mut image = YuvPlanarImageMut::alloc(width, height);
        image.y_plane.borrow_mut().fill(3);
        image.u_plane.borrow_mut().fill(3);
        image.v_plane.borrow_mut().fill(3);

        assert!(matches!(
            rgb24_to_yuv420(&mut image, &rgb, width * 3 - 1, YuvStandard::Bt601),
            Err(YuvError::InvalidStride(_))
        ));
        assert!(matches!(
            rgb24_to_yuv420(&mut image, &rgb[..rgb.len() - 1], width * 3, YuvStandard::Bt601),
            Err(YuvError::PlaneSizeMismatch(_))
        ));
        assert!(matches!(
            rgba32_to_yuv420(&mut image, &rgb, width * 4, YuvStandard::Bt601),
            Err(YuvError::PlaneSizeMismatch(mismatch)) if mismatch.plane == YuvPlane::Rgba
        ));
        assert_eq!(
            rgb24_to_yuv420(&mut image, &[], width * 3, YuvStandard::Bt601),
            Err(YuvError::EmptyPlane(YuvPlane::Rgb))
        );

        image.u_stride = 4;
        assert!(matches!(
            rgb24_to_yuv420(&mut image, &rgb, width * 3, YuvStandard::Bt601),
            Err(YuvError::InvalidStride(mismatch)) if mismatch.plane == YuvPlane::U
        ));
        image.u_stride = 8;

        let mut storage = vec![0u8; rgb.len() + 32];
        let window = aligned_window(&mut storage, rgb.len() + 1);
        window[1..].copy_from_slice(&rgb);
        assert!(matches!(
            rgb24_to_yuv420_simd_aligned(&mut image, &window[1..], width * 3, YuvStandard::Bt601),
            Err(YuvError::UnalignedBuffer(_))
        ));

        assert!(image.y_plane.borrow().iter().all(|&v| v == 3));
        assert!(image.u_plane.borrow().iter().all(|&v| v == 3));
        assert!(image.v_plane.borrow().iter().all(|&v| v == 3));
    }
}
