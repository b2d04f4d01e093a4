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
//! 8-bit YCbCr 4:2:0 conversions.
//!
//! Decodes planar YUV420, NV12 and NV21 into packed RGB24 and encodes packed RGB24 or RGBA32
//! into planar YUV420 with BT.601, BT.709 or JPEG coefficients.
//!
//! Every conversion exists in four flavors: the plain one picks the fastest path available
//! on the running CPU, `_scalar` never uses SIMD, `_simd` processes 16x2 pixel tiles with
//! SSE4.1 and `_simd_aligned` does the same with aligned loads and stores.
//! All of them produce byte identical output.
#![deny(deprecated)]
mod built_coefficients;
mod dispatch;
mod images;
mod internals;
mod numerics;
mod rgb_to_yuv;
#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), feature = "sse"))]
mod sse;
mod yuv_error;
mod yuv_nv_to_rgb;
mod yuv_support;
mod yuv_to_nv;
mod yuv_to_rgb;

pub use images::chroma_height;
pub use images::chroma_width;
pub use images::BufferStoreMut;
pub use images::YuvBiPlanarImage;
pub use images::YuvBiPlanarImageMut;
pub use images::YuvPlanarImage;
pub use images::YuvPlanarImageMut;

pub use yuv_error::MismatchedSize;
pub use yuv_error::PlaneSizeMismatch;
pub use yuv_error::YuvError;
pub use yuv_error::YuvPlane;

pub use yuv_support::get_yuv_range;
pub use yuv_support::CbCrForwardTransform;
pub use yuv_support::CbCrInverseTransform;
pub use yuv_support::YuvChromaRange;
pub use yuv_support::YuvNVOrder;
pub use yuv_support::YuvRange;
pub use yuv_support::YuvSourceChannels;
pub use yuv_support::YuvStandard;

pub use dispatch::available_paths;
pub use dispatch::conversion_handler;
pub use dispatch::default_path;
pub use dispatch::simd_available;
pub use dispatch::BiPlanarDecodeFn;
pub use dispatch::ConversionHandler;
pub use dispatch::ConversionKind;
pub use dispatch::ConversionPath;
pub use dispatch::EncodeFn;
pub use dispatch::PlanarDecodeFn;

pub use yuv_to_rgb::yuv420_to_rgb24;
pub use yuv_to_rgb::yuv420_to_rgb24_scalar;
pub use yuv_to_rgb::yuv420_to_rgb24_simd;
pub use yuv_to_rgb::yuv420_to_rgb24_simd_aligned;

pub use yuv_nv_to_rgb::nv12_to_rgb24;
pub use yuv_nv_to_rgb::nv12_to_rgb24_scalar;
pub use yuv_nv_to_rgb::nv12_to_rgb24_simd;
pub use yuv_nv_to_rgb::nv12_to_rgb24_simd_aligned;
pub use yuv_nv_to_rgb::nv21_to_rgb24;
pub use yuv_nv_to_rgb::nv21_to_rgb24_scalar;
pub use yuv_nv_to_rgb::nv21_to_rgb24_simd;
pub use yuv_nv_to_rgb::nv21_to_rgb24_simd_aligned;

pub use rgb_to_yuv::rgb24_to_yuv420;
pub use rgb_to_yuv::rgb24_to_yuv420_scalar;
pub use rgb_to_yuv::rgb24_to_yuv420_simd;
pub use rgb_to_yuv::rgb24_to_yuv420_simd_aligned;
pub use rgb_to_yuv::rgba32_to_yuv420;
pub use rgb_to_yuv::rgba32_to_yuv420_scalar;
pub use rgb_to_yuv::rgba32_to_yuv420_simd;
pub use rgb_to_yuv::rgba32_to_yuv420_simd_aligned;

pub use yuv_to_nv::yuv420_to_nv12;
pub use yuv_to_nv::yuv420_to_nv21;
