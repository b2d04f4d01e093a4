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
use crate::yuv_error::{check_image_size, check_plane, check_plane_alignment, YuvPlane};
use crate::YuvError;
use std::fmt::Debug;

/// Width of a 4:2:0 chroma plane in samples
#[inline]
pub const fn chroma_width(width: u32) -> u32 {
    width.div_ceil(2)
}

/// Height of a 4:2:0 chroma plane in rows
#[inline]
pub const fn chroma_height(height: u32) -> u32 {
    height.div_ceil(2)
}

#[derive(Debug)]
pub enum BufferStoreMut<'a, T: Copy + Debug> {
    Borrowed(&'a mut [T]),
    Owned(Vec<T>),
}

impl<T: Copy + Debug> BufferStoreMut<'_, T> {
    pub fn borrow(&self) -> &[T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }

    pub fn borrow_mut(&mut self) -> &mut [T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }
}

#[derive(Debug, Clone)]
/// Non-mutable representation of planar YUV 4:2:0 image
pub struct YuvPlanarImage<'a> {
    pub y_plane: &'a [u8],
    /// Stride here always means bytes per row.
    pub y_stride: u32,
    pub u_plane: &'a [u8],
    /// Stride here always means bytes per row.
    pub u_stride: u32,
    pub v_plane: &'a [u8],
    /// Stride here always means bytes per row.
    pub v_stride: u32,
    pub width: u32,
    pub height: u32,
}

impl YuvPlanarImage<'_> {
    pub fn check_constraints(&self) -> Result<(), YuvError> {
        check_planar_constraints(
            self.width,
            self.height,
            [
                (YuvPlane::Y, self.y_plane, self.y_stride),
                (YuvPlane::U, self.u_plane, self.u_stride),
                (YuvPlane::V, self.v_plane, self.v_stride),
            ],
        )
    }

    pub(crate) fn check_alignment(&self) -> Result<(), YuvError> {
        check_plane_alignment(YuvPlane::Y, self.y_plane, self.y_stride)?;
        check_plane_alignment(YuvPlane::U, self.u_plane, self.u_stride)?;
        check_plane_alignment(YuvPlane::V, self.v_plane, self.v_stride)?;
        Ok(())
    }
}

#[derive(Debug)]
/// Mutable representation of planar YUV 4:2:0 image
pub struct YuvPlanarImageMut<'a> {
    pub y_plane: BufferStoreMut<'a, u8>,
    /// Stride here always means bytes per row.
    pub y_stride: u32,
    pub u_plane: BufferStoreMut<'a, u8>,
    /// Stride here always means bytes per row.
    pub u_stride: u32,
    pub v_plane: BufferStoreMut<'a, u8>,
    /// Stride here always means bytes per row.
    pub v_stride: u32,
    pub width: u32,
    pub height: u32,
}

impl YuvPlanarImageMut<'_> {
    /// Allocates tightly packed target planar image
    pub fn alloc(width: u32, height: u32) -> Self {
        let chroma_width = chroma_width(width) as usize;
        let chroma_height = chroma_height(height) as usize;
        Self {
            y_plane: BufferStoreMut::Owned(vec![0u8; width as usize * height as usize]),
            y_stride: width,
            u_plane: BufferStoreMut::Owned(vec![0u8; chroma_width * chroma_height]),
            u_stride: chroma_width as u32,
            v_plane: BufferStoreMut::Owned(vec![0u8; chroma_width * chroma_height]),
            v_stride: chroma_width as u32,
            width,
            height,
        }
    }

    pub fn check_constraints(&self) -> Result<(), YuvError> {
        check_planar_constraints(
            self.width,
            self.height,
            [
                (YuvPlane::Y, self.y_plane.borrow(), self.y_stride),
                (YuvPlane::U, self.u_plane.borrow(), self.u_stride),
                (YuvPlane::V, self.v_plane.borrow(), self.v_stride),
            ],
        )
    }

    pub(crate) fn check_alignment(&self) -> Result<(), YuvError> {
        check_plane_alignment(YuvPlane::Y, self.y_plane.borrow(), self.y_stride)?;
        check_plane_alignment(YuvPlane::U, self.u_plane.borrow(), self.u_stride)?;
        check_plane_alignment(YuvPlane::V, self.v_plane.borrow(), self.v_stride)?;
        Ok(())
    }

    pub fn to_fixed(&self) -> YuvPlanarImage<'_> {
        YuvPlanarImage {
            y_plane: self.y_plane.borrow(),
            y_stride: self.y_stride,
            u_plane: self.u_plane.borrow(),
            u_stride: self.u_stride,
            v_plane: self.v_plane.borrow(),
            v_stride: self.v_stride,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone)]
/// Non-mutable representation of Bi-Planar YUV 4:2:0 image, NV12 or NV21
pub struct YuvBiPlanarImage<'a> {
    pub y_plane: &'a [u8],
    /// Stride here always means bytes per row.
    pub y_stride: u32,
    pub uv_plane: &'a [u8],
    /// Stride here always means bytes per row.
    pub uv_stride: u32,
    pub width: u32,
    pub height: u32,
}

impl YuvBiPlanarImage<'_> {
    pub fn check_constraints(&self) -> Result<(), YuvError> {
        check_image_size(self.width, self.height)?;
        let width = self.width as usize;
        let height = self.height as usize;
        let chroma_height = chroma_height(self.height) as usize;
        check_plane(YuvPlane::Y, self.y_plane, self.y_stride, width, height)?;
        check_plane(
            YuvPlane::UV,
            self.uv_plane,
            self.uv_stride,
            chroma_width(self.width) as usize * 2,
            chroma_height,
        )?;
        Ok(())
    }

    pub(crate) fn check_alignment(&self) -> Result<(), YuvError> {
        check_plane_alignment(YuvPlane::Y, self.y_plane, self.y_stride)?;
        check_plane_alignment(YuvPlane::UV, self.uv_plane, self.uv_stride)?;
        Ok(())
    }
}

#[derive(Debug)]
/// Mutable representation of Bi-Planar YUV 4:2:0 image
pub struct YuvBiPlanarImageMut<'a> {
    pub y_plane: BufferStoreMut<'a, u8>,
    /// Stride here always means bytes per row.
    pub y_stride: u32,
    pub uv_plane: BufferStoreMut<'a, u8>,
    /// Stride here always means bytes per row.
    pub uv_stride: u32,
    pub width: u32,
    pub height: u32,
}

impl YuvBiPlanarImageMut<'_> {
    /// Allocates tightly packed Bi-Planar image
    pub fn alloc(width: u32, height: u32) -> Self {
        let chroma_row = chroma_width(width) as usize * 2;
        let chroma_height = chroma_height(height) as usize;
        Self {
            y_plane: BufferStoreMut::Owned(vec![0u8; width as usize * height as usize]),
            y_stride: width,
            uv_plane: BufferStoreMut::Owned(vec![0u8; chroma_row * chroma_height]),
            uv_stride: chroma_row as u32,
            width,
            height,
        }
    }

    pub fn check_constraints(&self) -> Result<(), YuvError> {
        self.to_fixed().check_constraints()
    }

    pub fn to_fixed(&self) -> YuvBiPlanarImage<'_> {
        YuvBiPlanarImage {
            y_plane: self.y_plane.borrow(),
            y_stride: self.y_stride,
            uv_plane: self.uv_plane.borrow(),
            uv_stride: self.uv_stride,
            width: self.width,
            height: self.height,
        }
    }
}

fn check_planar_constraints(
    width: u32,
    height: u32,
    planes: [(YuvPlane, &[u8], u32); 3],
) -> Result<(), YuvError> {
    check_image_size(width, height)?;
    for (plane, data, stride) in planes {
        let (row_bytes, rows) = match plane {
            YuvPlane::Y => (width as usize, height as usize),
            _ => (
                chroma_width(width) as usize,
                chroma_height(height) as usize,
            ),
        };
        check_plane(plane, data, stride, row_bytes, rows)?;
    }
    Ok(())
}
