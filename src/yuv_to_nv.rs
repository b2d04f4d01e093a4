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
use crate::images::{chroma_height, chroma_width};
use crate::yuv_support::YuvNVOrder;
use crate::{YuvBiPlanarImageMut, YuvError, YuvPlanarImage};
#[cfg(feature = "rayon")]
use rayon::iter::{IndexedParallelIterator, ParallelIterator};
#[cfg(feature = "rayon")]
use rayon::prelude::{ParallelSlice, ParallelSliceMut};

fn yuv420_to_nv_impl<const UV_ORDER: u8>(
    planar_image: &YuvPlanarImage,
    bi_planar_image: &mut YuvBiPlanarImageMut,
) -> Result<(), YuvError> {
    let order: YuvNVOrder = UV_ORDER.into();
    planar_image.check_constraints()?;
    bi_planar_image.check_constraints()?;
    if planar_image.width != bi_planar_image.width
        || planar_image.height != bi_planar_image.height
    {
        return Err(YuvError::ImageSizeMismatch {
            source: (planar_image.width, planar_image.height),
            destination: (bi_planar_image.width, bi_planar_image.height),
        });
    }

    let width = planar_image.width as usize;
    let height = planar_image.height as usize;
    let chroma_width = chroma_width(planar_image.width) as usize;
    let chroma_height = chroma_height(planar_image.height) as usize;
    let src_y_stride = planar_image.y_stride as usize;
    let dst_y_stride = bi_planar_image.y_stride as usize;
    let uv_stride = bi_planar_image.uv_stride as usize;
    let u_stride = planar_image.u_stride as usize;
    let v_stride = planar_image.v_stride as usize;

    let y_plane = bi_planar_image.y_plane.borrow_mut();
    let uv_plane = bi_planar_image.uv_plane.borrow_mut();

    let y_iter;
    let uv_iter;
    #[cfg(feature = "rayon")]
    {
        y_iter = y_plane
            .par_chunks_mut(dst_y_stride)
            .zip(planar_image.y_plane.par_chunks(src_y_stride))
            .take(height);
        uv_iter = uv_plane
            .par_chunks_mut(uv_stride)
            .zip(planar_image.u_plane.par_chunks(u_stride))
            .zip(planar_image.v_plane.par_chunks(v_stride))
            .take(chroma_height);
    }
    #[cfg(not(feature = "rayon"))]
    {
        y_iter = y_plane
            .chunks_mut(dst_y_stride)
            .zip(planar_image.y_plane.chunks(src_y_stride))
            .take(height);
        uv_iter = uv_plane
            .chunks_mut(uv_stride)
            .zip(planar_image.u_plane.chunks(u_stride))
            .zip(planar_image.v_plane.chunks(v_stride))
            .take(chroma_height);
    }

    y_iter.for_each(|(dst, src)| {
        dst[..width].copy_from_slice(&src[..width]);
    });

    let u_pos = order.get_u_position();
    let v_pos = order.get_v_position();
    uv_iter.for_each(|((uv_dst, u_src), v_src)| {
        for ((dst, &u), &v) in uv_dst[..chroma_width * 2]
            .chunks_exact_mut(2)
            .zip(u_src[..chroma_width].iter())
            .zip(v_src[..chroma_width].iter())
        {
            dst[u_pos] = u;
            dst[v_pos] = v;
        }
    });

    Ok(())
}

/// Repacks planar YUV 4:2:0 into NV12, luma copied and chroma interleaved as U,V pairs.
///
/// Both images must have the same dimensions, otherwise [`YuvError::ImageSizeMismatch`] is returned.
pub fn yuv420_to_nv12(
    planar_image: &YuvPlanarImage,
    bi_planar_image: &mut YuvBiPlanarImageMut,
) -> Result<(), YuvError> {
    yuv420_to_nv_impl::<{ YuvNVOrder::UV as u8 }>(planar_image, bi_planar_image)
}

/// Repacks planar YUV 4:2:0 into NV21, luma copied and chroma interleaved as V,U pairs.
///
/// Both images must have the same dimensions, otherwise [`YuvError::ImageSizeMismatch`] is returned.
pub fn yuv420_to_nv21(
    planar_image: &YuvPlanarImage,
    bi_planar_image: &mut YuvBiPlanarImageMut,
) -> Result<(), YuvError> {
    yuv420_to_nv_impl::<{ YuvNVOrder::VU as u8 }>(planar_image, bi_planar_image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internals::{pack_rows, OVERSIZED_LAYOUTS};
    use crate::{BufferStoreMut, YuvPlanarImageMut};

    fn gradient_image(width: u32, height: u32) -> YuvPlanarImageMut<'static> {
        let mut image = YuvPlanarImageMut::alloc(width, height);
        for (i, v) in image.y_plane.borrow_mut().iter_mut().enumerate() {
            *v = i as u8;
        }
        for (i, v) in image.u_plane.borrow_mut().iter_mut().enumerate() {
            *v = 100u8.wrapping_add(i as u8);
        }
        for (i, v) in image.v_plane.borrow_mut().iter_mut().enumerate() {
            *v = 200u8.wrapping_add(i as u8);
        }
        image
    }

    #[test]
    fn test_nv12_interleaves_u_first() {
        let planar = gradient_image(5, 3);
        let mut nv12 = YuvBiPlanarImageMut::alloc(5, 3);
        yuv420_to_nv12(&planar.to_fixed(), &mut nv12).unwrap();

        assert_eq!(nv12.y_plane.borrow(), planar.y_plane.borrow());
        assert_eq!(
            nv12.uv_plane.borrow(),
            &[100, 200, 101, 201, 102, 202, 103, 203, 104, 204, 105, 205]
        );
    }

    #[test]
    fn test_nv21_interleaves_v_first() {
        let planar = gradient_image(4, 2);
        let mut nv21 = YuvBiPlanarImageMut::alloc(4, 2);
        yuv420_to_nv21(&planar.to_fixed(), &mut nv21).unwrap();
        assert_eq!(nv21.uv_plane.borrow(), &[200, 100, 201, 101]);
    }

    #[test]
    fn test_padded_destination_keeps_padding() {
        let planar = gradient_image(6, 4);
        let mut y_plane = vec![0xEEu8; 8 * 4];
        let mut uv_plane = vec![0xEEu8; 8 * 2];
        let mut nv12 = YuvBiPlanarImageMut {
            y_plane: BufferStoreMut::Borrowed(&mut y_plane),
            y_stride: 8,
            uv_plane: BufferStoreMut::Borrowed(&mut uv_plane),
            uv_stride: 8,
            width: 6,
            height: 4,
        };
        yuv420_to_nv12(&planar.to_fixed(), &mut nv12).unwrap();
        drop(nv12);

        for (row, src) in y_plane
            .chunks_exact(8)
            .zip(planar.y_plane.borrow().chunks_exact(6))
        {
            assert_eq!(&row[..6], src);
            assert_eq!(&row[6..], &[0xEE, 0xEE]);
        }
        assert_eq!(&uv_plane[..6], &[100, 200, 101, 201, 102, 202]);
        assert_eq!(&uv_plane[6..8], &[0xEE, 0xEE]);
        assert_eq!(&uv_plane[8..14], &[103, 203, 104, 204, 105, 205]);
    }

    #[test]
    fn test_trailing_bytes_after_last_row() {
        let planar = gradient_image(4, 2);
        let mut y_src = planar.y_plane.borrow().to_vec();
        let mut u_src = planar.u_plane.borrow().to_vec();
        let mut v_src = planar.v_plane.borrow().to_vec();
        y_src.extend_from_slice(&[1, 1]);
        u_src.extend_from_slice(&[2, 2]);
        v_src.extend_from_slice(&[3, 3]);
        let source = YuvPlanarImage {
            y_plane: &y_src,
            y_stride: 4,
            u_plane: &u_src,
            u_stride: 2,
            v_plane: &v_src,
            v_stride: 2,
            width: 4,
            height: 2,
        };
        let mut y_plane = vec![0u8; 4 * 2 + 2];
        let mut uv_plane = vec![0u8; 4 + 2];
        let mut nv12 = YuvBiPlanarImageMut {
            y_plane: BufferStoreMut::Borrowed(&mut y_plane),
            y_stride: 4,
            uv_plane: BufferStoreMut::Borrowed(&mut uv_plane),
            uv_stride: 4,
            width: 4,
            height: 2,
        };
        yuv420_to_nv12(&source, &mut nv12).unwrap();
        drop(nv12);

        assert_eq!(&y_plane[..8], planar.y_plane.borrow());
        assert_eq!(&y_plane[8..], &[0, 0]);
        assert_eq!(uv_plane, [100, 200, 101, 201, 0, 0]);
    }

    #[test]
    fn test_rows_past_height_untouched() {
        let planar = gradient_image(4, 4);
        let source = YuvPlanarImage {
            height: 2,
            ..planar.to_fixed()
        };
        let mut nv21 = YuvBiPlanarImageMut::alloc(4, 4);
        nv21.height = 2;
        yuv420_to_nv21(&source, &mut nv21).unwrap();

        let y_plane = nv21.y_plane.borrow();
        assert_eq!(&y_plane[..8], &planar.y_plane.borrow()[..8]);
        assert!(y_plane[8..].iter().all(|&v| v == 0));
        assert_eq!(nv21.uv_plane.borrow(), &[200, 100, 201, 101, 0, 0, 0, 0]);
    }

    #[test]
    fn test_oversized_planes() {
        let (width, height) = (35u32, 5u32);
        let planar = gradient_image(width, height);
        let w = width as usize;
        let h = height as usize;
        let chroma_width = width.div_ceil(2) as usize;
        let chroma_height = h.div_ceil(2);
        let (y_src, u_src, v_src) = (
            planar.y_plane.borrow(),
            planar.u_plane.borrow(),
            planar.v_plane.borrow(),
        );

        let mut tight = YuvBiPlanarImageMut::alloc(width, height);
        yuv420_to_nv12(&planar.to_fixed(), &mut tight).unwrap();
        let uv_row = chroma_width * 2;

        for layout in OVERSIZED_LAYOUTS {
            let y_source = layout.plane(Some(y_src), w, h, 0x11);
            let u_source = layout.plane(Some(u_src), chroma_width, chroma_height, 0x22);
            let v_source = layout.plane(Some(v_src), chroma_width, chroma_height, 0x33);
            let source = YuvPlanarImage {
                y_plane: &y_source,
                y_stride: layout.stride(w) as u32,
                u_plane: &u_source,
                u_stride: layout.stride(chroma_width) as u32,
                v_plane: &v_source,
                v_stride: layout.stride(chroma_width) as u32,
                width,
                height,
            };
            let mut y_plane = layout.plane(None, w, h, 0xA5);
            let mut uv_plane = layout.plane(None, uv_row, chroma_height, 0xA5);
            let mut nv12 = YuvBiPlanarImageMut {
                y_plane: BufferStoreMut::Borrowed(&mut y_plane),
                y_stride: layout.stride(w) as u32,
                uv_plane: BufferStoreMut::Borrowed(&mut uv_plane),
                uv_stride: layout.stride(uv_row) as u32,
                width,
                height,
            };
            yuv420_to_nv12(&source, &mut nv12).unwrap();
            drop(nv12);

            let y_stride = layout.stride(w);
            let uv_stride = layout.stride(uv_row);
            let y = pack_rows(&y_plane, w, h, y_stride);
            let uv = pack_rows(&uv_plane, uv_row, chroma_height, uv_stride);
            assert_eq!(y, tight.y_plane.borrow(), "{:?}", layout);
            assert_eq!(uv, tight.uv_plane.borrow(), "{:?}", layout);
            layout.assert_outside_untouched(&y_plane, w, h, 0xA5);
            layout.assert_outside_untouched(&uv_plane, uv_row, chroma_height, 0xA5);
        }
    }

    #[test]
    fn test_dimension_mismatch() {
        let planar = gradient_image(6, 4);
        let mut nv12 = YuvBiPlanarImageMut::alloc(6, 2);
        assert_eq!(
            yuv420_to_nv12(&planar.to_fixed(), &mut nv12),
            Err(YuvError::ImageSizeMismatch {
                source: (6, 4),
                destination: (6, 2),
            })
        );
        assert!(nv12.y_plane.borrow().iter().all(|&v| v == 0));
    }
}
