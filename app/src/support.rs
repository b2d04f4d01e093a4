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
use anyhow::{ensure, Context, Result};
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ExtendedColorType, ImageEncoder, ImageReader};
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use yuv2rgb::{chroma_height, chroma_width, BufferStoreMut, YuvPlanarImage, YuvPlanarImageMut};

const ALIGNMENT: usize = 16;

/// How rows of a benchmark buffer are laid out in memory
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Layout {
    /// Stride equals the packed row size
    Tight,
    /// Stride rounded up to 16 bytes plus one extra 16 bytes block
    Padded,
}

impl Layout {
    pub(crate) fn stride(self, row_bytes: usize) -> usize {
        match self {
            Layout::Tight => row_bytes,
            Layout::Padded => row_bytes.next_multiple_of(ALIGNMENT) + ALIGNMENT,
        }
    }

    pub(crate) fn suffix(self) -> &'static str {
        match self {
            Layout::Tight => "",
            Layout::Padded => "_padded",
        }
    }
}

impl Display for Layout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::Tight => f.write_str("tight"),
            Layout::Padded => f.write_str("padded"),
        }
    }
}

/// Plane storage which first byte is always 16 bytes aligned
pub(crate) struct Plane {
    storage: Vec<u8>,
    offset: usize,
    len: usize,
    pub(crate) stride: usize,
}

impl Plane {
    pub(crate) fn new(row_bytes: usize, rows: usize, layout: Layout) -> Plane {
        let stride = layout.stride(row_bytes);
        let len = stride * rows;
        let storage = vec![0u8; len + ALIGNMENT];
        let offset = storage.as_ptr().align_offset(ALIGNMENT);
        Plane {
            storage,
            offset,
            len,
            stride,
        }
    }

    pub(crate) fn copy_from(
        src: &[u8],
        src_stride: usize,
        row_bytes: usize,
        rows: usize,
        layout: Layout,
    ) -> Plane {
        let mut plane = Plane::new(row_bytes, rows, layout);
        let stride = plane.stride;
        for (dst, src) in plane
            .as_mut_slice()
            .chunks_mut(stride)
            .zip(src.chunks(src_stride))
            .take(rows)
        {
            dst[..row_bytes].copy_from_slice(&src[..row_bytes]);
        }
        plane
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.storage[self.offset..self.offset + self.len]
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.storage[self.offset..self.offset + self.len]
    }

    pub(crate) fn stride_u32(&self) -> u32 {
        self.stride as u32
    }
}

/// Drops row padding
pub(crate) fn pack_rows(src: &[u8], src_stride: usize, row_bytes: usize, rows: usize) -> Vec<u8> {
    let mut packed = Vec::with_capacity(row_bytes * rows);
    for row in src.chunks(src_stride).take(rows) {
        packed.extend_from_slice(&row[..row_bytes]);
    }
    packed
}

/// Reads tightly packed planar YUV 4:2:0 dump, Y plane followed by U and V
pub(crate) fn read_yuv420<P: AsRef<Path>>(
    path: P,
    width: u32,
    height: u32,
) -> Result<YuvPlanarImageMut<'static>> {
    let path = path.as_ref();
    let data = std::fs::read(path).with_context(|| format!("Can't read {}", path.display()))?;

    let luma_size = width as usize * height as usize;
    let chroma_size = chroma_width(width) as usize * chroma_height(height) as usize;
    ensure!(
        data.len() == luma_size + chroma_size * 2,
        "{} has {} bytes, YUV420 {}x{} needs {}",
        path.display(),
        data.len(),
        width,
        height,
        luma_size + chroma_size * 2
    );

    let (y_plane, chroma) = data.split_at(luma_size);
    let (u_plane, v_plane) = chroma.split_at(chroma_size);

    Ok(YuvPlanarImageMut {
        y_plane: BufferStoreMut::Owned(y_plane.to_vec()),
        y_stride: width,
        u_plane: BufferStoreMut::Owned(u_plane.to_vec()),
        u_stride: chroma_width(width),
        v_plane: BufferStoreMut::Owned(v_plane.to_vec()),
        v_stride: chroma_width(width),
        width,
        height,
    })
}

/// Packs planar image into a raw dump readable by [`read_yuv420`]
pub(crate) fn pack_yuv420(image: &YuvPlanarImage) -> Vec<u8> {
    let width = image.width as usize;
    let height = image.height as usize;
    let chroma_width = chroma_width(image.width) as usize;
    let chroma_height = chroma_height(image.height) as usize;

    let mut packed = pack_rows(image.y_plane, image.y_stride as usize, width, height);
    packed.extend(pack_rows(
        image.u_plane,
        image.u_stride as usize,
        chroma_width,
        chroma_height,
    ));
    packed.extend(pack_rows(
        image.v_plane,
        image.v_stride as usize,
        chroma_width,
        chroma_height,
    ));
    packed
}

/// Decodes an image, usually PPM, into tightly packed RGB24
pub(crate) fn read_rgb<P: AsRef<Path>>(path: P) -> Result<(Vec<u8>, u32, u32)> {
    let path = path.as_ref();
    let img = ImageReader::open(path)
        .with_context(|| format!("Can't open {}", path.display()))?
        .with_guessed_format()?
        .decode()
        .with_context(|| format!("Can't decode {}", path.display()))?
        .to_rgb8();
    let (width, height) = img.dimensions();
    Ok((img.into_raw(), width, height))
}

/// Writes tightly packed RGB24 as binary PPM
pub(crate) fn write_ppm<P: AsRef<Path>>(path: P, rgb: &[u8], width: u32, height: u32) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("Can't create {}", path.display()))?;
    PnmEncoder::new(BufWriter::new(file))
        .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary))
        .write_image(rgb, width, height, ExtendedColorType::Rgb8)?;
    Ok(())
}

/// Appends opaque alpha to every RGB24 pixel
pub(crate) fn rgb_to_rgba(rgb: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(rgb.len() / 3 * 4);
    for px in rgb.chunks_exact(3) {
        rgba.extend_from_slice(px);
        rgba.push(255);
    }
    rgba
}
