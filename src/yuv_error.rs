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
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Plane of an image a validation error refers to
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum YuvPlane {
    Y,
    U,
    V,
    /// Interleaved chroma plane of NV12/NV21 image
    UV,
    Rgb,
    Rgba,
}

impl Display for YuvPlane {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            YuvPlane::Y => f.write_str("Y"),
            YuvPlane::U => f.write_str("U"),
            YuvPlane::V => f.write_str("V"),
            YuvPlane::UV => f.write_str("UV"),
            YuvPlane::Rgb => f.write_str("RGB"),
            YuvPlane::Rgba => f.write_str("RGBA"),
        }
    }
}

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct MismatchedSize {
    pub expected: usize,
    pub received: usize,
}

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct PlaneSizeMismatch {
    pub plane: YuvPlane,
    pub size: MismatchedSize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum YuvError {
    /// Width or height is zero
    ZeroBaseSize,
    /// Source and destination describe images of different dimensions
    ImageSizeMismatch {
        source: (u32, u32),
        destination: (u32, u32),
    },
    /// Stride is smaller than one packed row of the plane
    InvalidStride(PlaneSizeMismatch),
    /// Plane slice can't hold all rows for the given stride
    PlaneSizeMismatch(PlaneSizeMismatch),
    /// Required plane is absent
    EmptyPlane(YuvPlane),
    /// Standard selector is not one of known standards
    UnsupportedStandard(u8),
    /// Aligned path was requested for a plane which base or stride is not 16 bytes aligned
    UnalignedBuffer(YuvPlane),
    PointerOverflow,
}

impl Display for YuvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            YuvError::ZeroBaseSize => f.write_str("Zero sized images is not supported"),
            YuvError::ImageSizeMismatch {
                source,
                destination,
            } => f.write_fmt(format_args!(
                "Source image is {}x{} but destination is {}x{}",
                source.0, source.1, destination.0, destination.1
            )),
            YuvError::InvalidStride(mismatch) => f.write_fmt(format_args!(
                "{} plane stride must be at least {}, but it was {}",
                mismatch.plane, mismatch.size.expected, mismatch.size.received
            )),
            YuvError::PlaneSizeMismatch(mismatch) => f.write_fmt(format_args!(
                "{} plane have invalid size, it must be at least {}, but it was {}",
                mismatch.plane, mismatch.size.expected, mismatch.size.received
            )),
            YuvError::EmptyPlane(plane) => {
                f.write_fmt(format_args!("{} plane is required but it is empty", plane))
            }
            YuvError::UnsupportedStandard(value) => {
                f.write_fmt(format_args!("Unknown YCbCr standard {}", value))
            }
            YuvError::UnalignedBuffer(plane) => f.write_fmt(format_args!(
                "{} plane base address and stride must be aligned to 16 bytes",
                plane
            )),
            YuvError::PointerOverflow => f.write_str("Image size overflow pointer capabilities"),
        }
    }
}

impl Error for YuvError {}

/// Natural alignment of 128-bit vector loads and stores
pub(crate) const SIMD_ALIGNMENT: usize = 16;

#[inline]
pub(crate) fn check_image_size(width: u32, height: u32) -> Result<(), YuvError> {
    if width == 0 || height == 0 {
        return Err(YuvError::ZeroBaseSize);
    }
    Ok(())
}

#[inline]
pub(crate) fn check_overflow_v2(v0: usize, v1: usize) -> Result<usize, YuvError> {
    v0.checked_mul(v1).ok_or(YuvError::PointerOverflow)
}

/// Checks that `rows` rows of `row_bytes` each can be addressed with `stride` in `data`.
///
/// The last row doesn't need to be padded up to the stride.
#[inline]
pub(crate) fn check_plane(
    plane: YuvPlane,
    data: &[u8],
    stride: u32,
    row_bytes: usize,
    rows: usize,
) -> Result<(), YuvError> {
    if data.is_empty() {
        return Err(YuvError::EmptyPlane(plane));
    }
    let stride = stride as usize;
    if stride < row_bytes {
        return Err(YuvError::InvalidStride(PlaneSizeMismatch {
            plane,
            size: MismatchedSize {
                expected: row_bytes,
                received: stride,
            },
        }));
    }
    let required = check_overflow_v2(stride, rows - 1)?
        .checked_add(row_bytes)
        .ok_or(YuvError::PointerOverflow)?;
    if data.len() < required {
        return Err(YuvError::PlaneSizeMismatch(PlaneSizeMismatch {
            plane,
            size: MismatchedSize {
                expected: required,
                received: data.len(),
            },
        }));
    }
    Ok(())
}

#[inline]
pub(crate) fn check_rgb_plane(
    data: &[u8],
    stride: u32,
    width: u32,
    height: u32,
    channels: usize,
) -> Result<(), YuvError> {
    let plane = if channels == 4 {
        YuvPlane::Rgba
    } else {
        YuvPlane::Rgb
    };
    let row_bytes = check_overflow_v2(width as usize, channels)?;
    check_plane(plane, data, stride, row_bytes, height as usize)
}

#[inline]
pub(crate) fn check_plane_alignment(
    plane: YuvPlane,
    data: &[u8],
    stride: u32,
) -> Result<(), YuvError> {
    if data.as_ptr() as usize % SIMD_ALIGNMENT != 0 || stride as usize % SIMD_ALIGNMENT != 0 {
        return Err(YuvError::UnalignedBuffer(plane));
    }
    Ok(())
}
