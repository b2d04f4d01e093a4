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
/// Position where a vectorized row kernel stopped, scalar code continues from there
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub(crate) struct ProcessedOffset {
    /// Luma column
    pub(crate) cx: usize,
    /// Chroma column
    pub(crate) ux: usize,
}

/// Number of luma columns covered by one vectorized tile
pub(crate) const TILE_WIDTH: usize = 16;

/// Rounds a packed row size up to a stride usable by aligned kernels
#[cfg(test)]
pub(crate) const fn aligned_stride(row_bytes: usize) -> usize {
    (row_bytes + 15) & !15
}

/// Window of `len` bytes in `storage` starting at a 16 bytes boundary,
/// `storage` must be at least `len + 15` bytes
#[cfg(test)]
pub(crate) fn aligned_window(storage: &mut [u8], len: usize) -> &mut [u8] {
    let offset = storage.as_ptr().align_offset(16);
    &mut storage[offset..offset + len]
}

/// Copies tightly packed rows into `dst` laid out with `stride`
#[cfg(test)]
pub(crate) fn copy_with_stride(src: &[u8], row_bytes: usize, dst: &mut [u8], stride: usize) {
    for (dst, src) in dst.chunks_mut(stride).zip(src.chunks_exact(row_bytes)) {
        dst[..row_bytes].copy_from_slice(src);
    }
}

/// Packs rows laid out with `stride` tightly
#[cfg(test)]
pub(crate) fn pack_rows(src: &[u8], row_bytes: usize, rows: usize, stride: usize) -> Vec<u8> {
    let mut packed = Vec::with_capacity(row_bytes * rows);
    for row in src.chunks(stride).take(rows) {
        packed.extend_from_slice(&row[..row_bytes]);
    }
    packed
}

/// Plane layout with bytes the conversions must not touch:
/// row padding, whole rows past the image and loose bytes at the end.
#[cfg(test)]
#[derive(Debug, Copy, Clone)]
pub(crate) struct OversizedLayout {
    pub(crate) padding: usize,
    pub(crate) extra_rows: usize,
    pub(crate) slack: usize,
}

#[cfg(test)]
pub(crate) const OVERSIZED_LAYOUTS: [OversizedLayout; 2] = [
    OversizedLayout {
        padding: 0,
        extra_rows: 0,
        slack: 3,
    },
    OversizedLayout {
        padding: 3,
        extra_rows: 2,
        slack: 5,
    },
];

#[cfg(test)]
impl OversizedLayout {
    pub(crate) const fn stride(&self, row_bytes: usize) -> usize {
        row_bytes + self.padding
    }

    pub(crate) const fn len(&self, row_bytes: usize, rows: usize) -> usize {
        let stride = self.stride(row_bytes);
        if self.extra_rows == 0 {
            stride * (rows - 1) + row_bytes + self.slack
        } else {
            stride * (rows + self.extra_rows) + self.slack
        }
    }

    /// Plane filled with `fill`, with tightly packed `src` rows copied in when given
    pub(crate) fn plane(
        &self,
        src: Option<&[u8]>,
        row_bytes: usize,
        rows: usize,
        fill: u8,
    ) -> Vec<u8> {
        let mut plane = vec![fill; self.len(row_bytes, rows)];
        if let Some(src) = src {
            copy_with_stride(src, row_bytes, &mut plane, self.stride(row_bytes));
        }
        plane
    }

    /// Checks that every byte outside the first `rows` rows of `row_bytes` still holds `fill`
    pub(crate) fn assert_outside_untouched(
        &self,
        plane: &[u8],
        row_bytes: usize,
        rows: usize,
        fill: u8,
    ) {
        let stride = self.stride(row_bytes);
        for (i, &v) in plane.iter().enumerate() {
            let inside = i / stride < rows && i % stride < row_bytes;
            if !inside {
                assert_eq!(v, fill, "byte {} outside the image was written", i);
            }
        }
    }
}
