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
//! Closed table of every conversion this crate performs and the paths it can take.
//!
//! Harnesses and benchmarks walk [`ConversionKind::ALL`] × [`available_paths`] and call
//! the resolved [`ConversionHandler`] instead of naming each entry point.

use crate::{
    nv12_to_rgb24_scalar, nv12_to_rgb24_simd, nv12_to_rgb24_simd_aligned, nv21_to_rgb24_scalar,
    nv21_to_rgb24_simd, nv21_to_rgb24_simd_aligned, rgb24_to_yuv420_scalar, rgb24_to_yuv420_simd,
    rgb24_to_yuv420_simd_aligned, rgba32_to_yuv420_scalar, rgba32_to_yuv420_simd,
    rgba32_to_yuv420_simd_aligned, yuv420_to_rgb24_scalar, yuv420_to_rgb24_simd,
    yuv420_to_rgb24_simd_aligned, YuvBiPlanarImage, YuvError, YuvPlanarImage, YuvPlanarImageMut,
    YuvStandard,
};
use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

/// Format pairs supported by the conversion engine
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ConversionKind {
    Yuv420ToRgb24,
    Nv12ToRgb24,
    Nv21ToRgb24,
    Rgb24ToYuv420,
    Rgba32ToYuv420,
}

impl ConversionKind {
    pub const ALL: [ConversionKind; 5] = [
        ConversionKind::Yuv420ToRgb24,
        ConversionKind::Nv12ToRgb24,
        ConversionKind::Nv21ToRgb24,
        ConversionKind::Rgb24ToYuv420,
        ConversionKind::Rgba32ToYuv420,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ConversionKind::Yuv420ToRgb24 => "yuv420_rgb24",
            ConversionKind::Nv12ToRgb24 => "nv12_rgb24",
            ConversionKind::Nv21ToRgb24 => "nv21_rgb24",
            ConversionKind::Rgb24ToYuv420 => "rgb24_yuv420",
            ConversionKind::Rgba32ToYuv420 => "rgba32_yuv420",
        }
    }
}

impl Display for ConversionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Implementation a conversion runs through
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ConversionPath {
    /// Portable scalar kernels
    Scalar,
    /// SSE4.1 tiles with unaligned loads and stores
    Simd,
    /// SSE4.1 tiles with aligned loads and stores,
    /// every plane base address and stride must be a multiple of 16
    SimdAligned,
}

impl ConversionPath {
    pub const ALL: [ConversionPath; 3] = [
        ConversionPath::Scalar,
        ConversionPath::Simd,
        ConversionPath::SimdAligned,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ConversionPath::Scalar => "std",
            ConversionPath::Simd => "sse_unaligned",
            ConversionPath::SimdAligned => "sse_aligned",
        }
    }

    /// Whether rows should go through vector kernels on this machine
    #[inline]
    pub(crate) fn uses_simd(self) -> bool {
        self != ConversionPath::Scalar && simd_available()
    }

    #[inline]
    pub(crate) fn is_aligned(self) -> bool {
        self == ConversionPath::SimdAligned
    }
}

impl Display for ConversionPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub type PlanarDecodeFn =
    fn(&YuvPlanarImage<'_>, &mut [u8], u32, YuvStandard) -> Result<(), YuvError>;
pub type BiPlanarDecodeFn =
    fn(&YuvBiPlanarImage<'_>, &mut [u8], u32, YuvStandard) -> Result<(), YuvError>;
pub type EncodeFn =
    fn(&mut YuvPlanarImageMut<'_>, &[u8], u32, YuvStandard) -> Result<(), YuvError>;

/// Typed entry point of one conversion
#[derive(Copy, Clone)]
pub enum ConversionHandler {
    /// Planar YUV 4:2:0 into packed RGB
    PlanarDecode(PlanarDecodeFn),
    /// NV12 or NV21 into packed RGB
    BiPlanarDecode(BiPlanarDecodeFn),
    /// Packed RGB or RGBA into planar YUV 4:2:0
    Encode(EncodeFn),
}

/// Resolves the entry point for `kind` running through `path`
pub fn conversion_handler(kind: ConversionKind, path: ConversionPath) -> ConversionHandler {
    match kind {
        ConversionKind::Yuv420ToRgb24 => ConversionHandler::PlanarDecode(match path {
            ConversionPath::Scalar => yuv420_to_rgb24_scalar,
            ConversionPath::Simd => yuv420_to_rgb24_simd,
            ConversionPath::SimdAligned => yuv420_to_rgb24_simd_aligned,
        }),
        ConversionKind::Nv12ToRgb24 => ConversionHandler::BiPlanarDecode(match path {
            ConversionPath::Scalar => nv12_to_rgb24_scalar,
            ConversionPath::Simd => nv12_to_rgb24_simd,
            ConversionPath::SimdAligned => nv12_to_rgb24_simd_aligned,
        }),
        ConversionKind::Nv21ToRgb24 => ConversionHandler::BiPlanarDecode(match path {
            ConversionPath::Scalar => nv21_to_rgb24_scalar,
            ConversionPath::Simd => nv21_to_rgb24_simd,
            ConversionPath::SimdAligned => nv21_to_rgb24_simd_aligned,
        }),
        ConversionKind::Rgb24ToYuv420 => ConversionHandler::Encode(match path {
            ConversionPath::Scalar => rgb24_to_yuv420_scalar,
            ConversionPath::Simd => rgb24_to_yuv420_simd,
            ConversionPath::SimdAligned => rgb24_to_yuv420_simd_aligned,
        }),
        ConversionKind::Rgba32ToYuv420 => ConversionHandler::Encode(match path {
            ConversionPath::Scalar => rgba32_to_yuv420_scalar,
            ConversionPath::Simd => rgba32_to_yuv420_simd,
            ConversionPath::SimdAligned => rgba32_to_yuv420_simd_aligned,
        }),
    }
}

/// Path taken by the un-suffixed entry points
pub fn default_path() -> ConversionPath {
    if simd_available() {
        ConversionPath::Simd
    } else {
        ConversionPath::Scalar
    }
}

/// Probes the CPU once per process for the vector kernels
pub fn simd_available() -> bool {
    static SIMD_AVAILABLE: OnceLock<bool> = OnceLock::new();
    *SIMD_AVAILABLE.get_or_init(|| {
        let available = detect_simd();
        if available {
            log::debug!("SSE4.1 detected, using vectorized row kernels");
        } else {
            log::debug!("SSE4.1 is not available, using scalar row kernels");
        }
        available
    })
}

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
fn detect_simd() -> bool {
    std::arch::is_x86_feature_detected!("sse4.1")
}

#[cfg(not(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse")))]
fn detect_simd() -> bool {
    false
}

/// Paths that run distinct code on this machine.
///
/// Vector paths are still callable when absent, they fall back to scalar kernels.
pub fn available_paths() -> Vec<ConversionPath> {
    if simd_available() {
        ConversionPath::ALL.to_vec()
    } else {
        vec![ConversionPath::Scalar]
    }
}
