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
mod support;

use anyhow::{bail, ensure, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use std::time::{Duration, Instant};
use support::{
    pack_rows, pack_yuv420, read_rgb, read_yuv420, rgb_to_rgba, write_ppm, Layout, Plane,
};
use yuv2rgb::{
    available_paths, chroma_height, chroma_width, conversion_handler, default_path,
    yuv420_to_nv12, yuv420_to_nv21, BufferStoreMut, ConversionHandler, ConversionKind,
    ConversionPath, YuvBiPlanarImage, YuvBiPlanarImageMut, YuvError, YuvPlanarImage,
    YuvPlanarImageMut, YuvStandard,
};

/// Times yuv2rgb conversions on real images and writes their results
#[derive(Parser, Debug)]
#[command(name = "yuv2rgb-app")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Timed runs of every path
    #[arg(long, global = true, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    iterations: u32,

    /// YCbCr standard
    #[arg(long, global = true, value_enum, default_value_t = StandardArg::Bt601)]
    standard: StandardArg,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Planar YUV420 dump to RGB24
    Yuv2rgb(DecodeArgs),
    /// Planar YUV420 dump repacked as NV12, then to RGB24
    #[command(name = "yuv2rgb-nv12")]
    Yuv2rgbNv12(DecodeArgs),
    /// Planar YUV420 dump repacked as NV21, then to RGB24
    #[command(name = "yuv2rgb-nv21")]
    Yuv2rgbNv21(DecodeArgs),
    /// PPM image to planar YUV420
    Rgb2yuv(EncodeArgs),
    /// PPM image with opaque alpha added to planar YUV420
    Rgba2yuv(EncodeArgs),
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Raw YUV420 file
    input: String,
    width: u32,
    height: u32,
    /// Outputs are written to `<template>_<path>.ppm`
    output: String,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// PPM file
    input: String,
    /// Outputs are written to `<template>_<path>.yuv`
    output: String,
}

#[derive(ValueEnum, Copy, Clone, Debug)]
enum StandardArg {
    Bt601,
    Bt709,
    Jpeg,
}

impl From<StandardArg> for YuvStandard {
    fn from(value: StandardArg) -> Self {
        match value {
            StandardArg::Bt601 => YuvStandard::Bt601,
            StandardArg::Bt709 => YuvStandard::Bt709,
            StandardArg::Jpeg => YuvStandard::Jpeg,
        }
    }
}

/// Aligned path can only run on padded buffers
fn layouts(path: ConversionPath) -> &'static [Layout] {
    if path == ConversionPath::SimdAligned {
        &[Layout::Padded]
    } else {
        &[Layout::Tight, Layout::Padded]
    }
}

fn time_iterations<F>(iterations: u32, mut convert: F) -> Result<Duration>
where
    F: FnMut() -> Result<(), YuvError>,
{
    let start = Instant::now();
    for _ in 0..iterations {
        convert()?;
    }
    Ok(start.elapsed() / iterations)
}

/// Every run must match the first one byte for byte
fn check_reference(
    reference: &mut Option<Vec<u8>>,
    output: &[u8],
    path: ConversionPath,
    layout: Layout,
) -> Result<()> {
    match reference {
        Some(expected) => ensure!(
            expected.as_slice() == output,
            "{} path on {} buffers differs from the first run",
            path,
            layout
        ),
        None => *reference = Some(output.to_vec()),
    }
    Ok(())
}

fn decode(cli: &Cli, kind: ConversionKind, args: &DecodeArgs) -> Result<()> {
    let source = read_yuv420(&args.input, args.width, args.height)?;
    let source = source.to_fixed();
    let standard: YuvStandard = cli.standard.into();

    let width = args.width as usize;
    let height = args.height as usize;
    let chroma_width = chroma_width(args.width) as usize;
    let chroma_height = chroma_height(args.height) as usize;
    let rgb_row = width * 3;

    let mut reference = None;
    for path in available_paths() {
        for &layout in layouts(path) {
            let mut y = Plane::copy_from(
                source.y_plane,
                source.y_stride as usize,
                width,
                height,
                layout,
            );
            let mut rgb = Plane::new(rgb_row, height, layout);
            let rgb_stride = rgb.stride_u32();

            let elapsed = match conversion_handler(kind, path) {
                ConversionHandler::PlanarDecode(convert) => {
                    let u = Plane::copy_from(
                        source.u_plane,
                        source.u_stride as usize,
                        chroma_width,
                        chroma_height,
                        layout,
                    );
                    let v = Plane::copy_from(
                        source.v_plane,
                        source.v_stride as usize,
                        chroma_width,
                        chroma_height,
                        layout,
                    );
                    let image = YuvPlanarImage {
                        y_plane: y.as_slice(),
                        y_stride: y.stride_u32(),
                        u_plane: u.as_slice(),
                        u_stride: u.stride_u32(),
                        v_plane: v.as_slice(),
                        v_stride: v.stride_u32(),
                        width: args.width,
                        height: args.height,
                    };
                    time_iterations(cli.iterations, || {
                        convert(&image, rgb.as_mut_slice(), rgb_stride, standard)
                    })?
                }
                ConversionHandler::BiPlanarDecode(convert) => {
                    let mut uv = Plane::new(chroma_width * 2, chroma_height, layout);
                    let y_stride = y.stride_u32();
                    let uv_stride = uv.stride_u32();
                    let mut bi_planar = YuvBiPlanarImageMut {
                        y_plane: BufferStoreMut::Borrowed(y.as_mut_slice()),
                        y_stride,
                        uv_plane: BufferStoreMut::Borrowed(uv.as_mut_slice()),
                        uv_stride,
                        width: args.width,
                        height: args.height,
                    };
                    if kind == ConversionKind::Nv21ToRgb24 {
                        yuv420_to_nv21(&source, &mut bi_planar)?;
                    } else {
                        yuv420_to_nv12(&source, &mut bi_planar)?;
                    }
                    let image: YuvBiPlanarImage = bi_planar.to_fixed();
                    time_iterations(cli.iterations, || {
                        convert(&image, rgb.as_mut_slice(), rgb_stride, standard)
                    })?
                }
                ConversionHandler::Encode(_) => bail!("{} is not a decoding conversion", kind),
            };

            info!("{} {} {}: {:?} per iteration", kind, path, layout, elapsed);

            let output = pack_rows(rgb.as_slice(), rgb.stride, rgb_row, height);
            check_reference(&mut reference, &output, path, layout)?;
            let file = format!("{}_{}{}.ppm", args.output, path, layout.suffix());
            write_ppm(&file, &output, args.width, args.height)?;
        }
    }
    Ok(())
}

fn encode(cli: &Cli, kind: ConversionKind, args: &EncodeArgs) -> Result<()> {
    let (rgb, width, height) = read_rgb(&args.input)?;
    let (source, channels) = if kind == ConversionKind::Rgba32ToYuv420 {
        (rgb_to_rgba(&rgb), 4usize)
    } else {
        (rgb, 3usize)
    };
    let standard: YuvStandard = cli.standard.into();

    let source_row = width as usize * channels;
    let chroma_width = chroma_width(width) as usize;
    let chroma_height = chroma_height(height) as usize;

    let mut reference = None;
    for path in available_paths() {
        let ConversionHandler::Encode(convert) = conversion_handler(kind, path) else {
            bail!("{} is not an encoding conversion", kind);
        };
        for &layout in layouts(path) {
            let src = Plane::copy_from(&source, source_row, source_row, height as usize, layout);
            let mut y = Plane::new(width as usize, height as usize, layout);
            let mut u = Plane::new(chroma_width, chroma_height, layout);
            let mut v = Plane::new(chroma_width, chroma_height, layout);
            let (y_stride, u_stride, v_stride) = (y.stride_u32(), u.stride_u32(), v.stride_u32());

            let mut image = YuvPlanarImageMut {
                y_plane: BufferStoreMut::Borrowed(y.as_mut_slice()),
                y_stride,
                u_plane: BufferStoreMut::Borrowed(u.as_mut_slice()),
                u_stride,
                v_plane: BufferStoreMut::Borrowed(v.as_mut_slice()),
                v_stride,
                width,
                height,
            };
            let elapsed = time_iterations(cli.iterations, || {
                convert(&mut image, src.as_slice(), src.stride_u32(), standard)
            })?;

            info!("{} {} {}: {:?} per iteration", kind, path, layout, elapsed);

            let output = pack_yuv420(&image.to_fixed());
            check_reference(&mut reference, &output, path, layout)?;
            let file = format!("{}_{}{}.yuv", args.output, path, layout.suffix());
            std::fs::write(&file, &output)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    info!(
        "Default path {}, {} iterations, {:?}",
        default_path(),
        cli.iterations,
        cli.standard
    );

    match &cli.command {
        Command::Yuv2rgb(args) => decode(&cli, ConversionKind::Yuv420ToRgb24, args),
        Command::Yuv2rgbNv12(args) => decode(&cli, ConversionKind::Nv12ToRgb24, args),
        Command::Yuv2rgbNv21(args) => decode(&cli, ConversionKind::Nv21ToRgb24, args),
        Command::Rgb2yuv(args) => encode(&cli, ConversionKind::Rgb24ToYuv420, args),
        Command::Rgba2yuv(args) => encode(&cli, ConversionKind::Rgba32ToYuv420, args),
    }
}
